//! Common test utilities for integration tests.
//!
//! This module provides:
//!
//! - [`app_builder::TestAppBuilder`] - Build test Axum apps that mirror main.rs wiring
//! - [`http_mock::MockHttpServer`] - Declarative `wiremock` stubs for outbound HTTP
//! - [`fixtures`] - Upstream JSON payloads and records
//!
//! # App Builder Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::with_mocks().build();
//!     // Use app.oneshot(...) to send requests
//! }
//! ```

#![allow(dead_code)]

pub mod app_builder;
pub mod http_mock;

pub mod fixtures {
    use camara_explorer_api::camara::{
        Autor, DeputadoDetalhes, Proposicao, ProposicaoDetalhes, UltimoStatus,
    };
    use serde_json::{json, Value};

    /// Envelope with `count` proposals and a `last` link to `last_page`.
    pub fn proposicoes_envelope(base_url: &str, count: i64, last_page: u32) -> Value {
        let dados: Vec<Value> = (0..count)
            .map(|i| {
                json!({
                    "id": 2_400_000 + i,
                    "uri": format!("{base_url}/proposicoes/{}", 2_400_000 + i),
                    "siglaTipo": "PL",
                    "codTipo": 139,
                    "numero": 100 + i,
                    "ano": 2024,
                    "ementa": format!("Dispõe sobre saúde pública, item {i}.")
                })
            })
            .collect();

        json!({
            "dados": dados,
            "links": [
                {"rel": "self", "href": format!("{base_url}/proposicoes?pagina=1&itens={count}"), "type": "application/json"},
                {"rel": "next", "href": format!("{base_url}/proposicoes?pagina=2&itens={count}"), "type": "application/json"},
                {"rel": "first", "href": format!("{base_url}/proposicoes?pagina=1&itens={count}"), "type": "application/json"},
                {"rel": "last", "href": format!("{base_url}/proposicoes?pagina={last_page}&itens={count}"), "type": "application/json"}
            ]
        })
    }

    pub fn proposicao(id: i64) -> Proposicao {
        Proposicao {
            id,
            uri: format!("https://dadosabertos.camara.leg.br/api/v2/proposicoes/{id}"),
            sigla_tipo: "PL".into(),
            cod_tipo: 139,
            numero: id % 10_000,
            ano: 2024,
            ementa: format!("Ementa da proposição {id}."),
            data_apresentacao: None,
        }
    }

    pub fn proposicao_detalhes(id: i64) -> ProposicaoDetalhes {
        ProposicaoDetalhes {
            id,
            uri: format!("https://dadosabertos.camara.leg.br/api/v2/proposicoes/{id}"),
            sigla_tipo: "PL".into(),
            cod_tipo: 139,
            numero: 1234,
            ano: 2024,
            ementa: "Altera a Lei nº 8.080, de 19 de setembro de 1990.".into(),
            ementa_detalhada: None,
            data_apresentacao: Some("2024-03-01T10:00".into()),
            uri_autores: Some(format!(
                "https://dadosabertos.camara.leg.br/api/v2/proposicoes/{id}/autores"
            )),
            status_proposicao: None,
        }
    }

    pub fn deputado_detalhes(id: i64, partido: &str, uf: &str) -> DeputadoDetalhes {
        DeputadoDetalhes {
            id,
            uri: format!("https://dadosabertos.camara.leg.br/api/v2/deputados/{id}"),
            nome_civil: Some(format!("Deputado {id}")),
            ultimo_status: UltimoStatus {
                nome: format!("Deputado {id}"),
                sigla_partido: Some(partido.into()),
                sigla_uf: Some(uf.into()),
                email: None,
                url_foto: Some(format!(
                    "https://www.camara.leg.br/internet/deputado/bandep/{id}.jpg"
                )),
                data: None,
                condicao_eleitoral: Some("Titular".into()),
                gabinete: None,
            },
            data_nascimento: None,
            escolaridade: None,
        }
    }

    pub fn autor_deputado(id: i64) -> Autor {
        Autor {
            nome: format!("Deputado {id}"),
            tipo: "Deputado(a)".into(),
            uri: format!("https://dadosabertos.camara.leg.br/api/v2/deputados/{id}"),
            cod_tipo: Some(10_000),
        }
    }

    pub fn autor_orgao(nome: &str) -> Autor {
        Autor {
            nome: nome.into(),
            tipo: "Órgão do Poder Executivo".into(),
            uri: "https://dadosabertos.camara.leg.br/api/v2/orgaos/100".into(),
            cod_tipo: Some(40_000),
        }
    }
}
