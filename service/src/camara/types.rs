//! Data types for Câmara dos Deputados open-data API responses.
//!
//! Field names follow the upstream JSON (camelCase). Optional upstream
//! fields that are frequently `null` are modelled as `Option`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Navigation link attached to paginated collections (`first`, `prev`,
/// `next`, `last`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Link {
    /// Convenience constructor, mostly for tests and fixtures.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            media_type: None,
        }
    }
}

/// Collection envelope: `{ "dados": [...], "links": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub dados: Vec<T>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Singular resource envelope: `{ "dados": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleEnvelope<T> {
    pub dados: T,
}

/// Legislative proposal as listed by `/proposicoes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposicao {
    pub id: i64,
    pub uri: String,
    pub sigla_tipo: String,
    #[serde(default)]
    pub cod_tipo: i64,
    pub numero: i64,
    pub ano: i64,
    #[serde(default)]
    pub ementa: String,
    #[serde(default)]
    pub data_apresentacao: Option<String>,
}

/// Current processing status of a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusProposicao {
    #[serde(default)]
    pub data_hora: Option<String>,
    #[serde(default)]
    pub descricao_tramitacao: Option<String>,
    #[serde(default)]
    pub descricao_situacao: Option<String>,
    #[serde(default)]
    pub despacho: Option<String>,
}

/// Full proposal record from `/proposicoes/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposicaoDetalhes {
    pub id: i64,
    pub uri: String,
    pub sigla_tipo: String,
    #[serde(default)]
    pub cod_tipo: i64,
    pub numero: i64,
    pub ano: i64,
    #[serde(default)]
    pub ementa: String,
    #[serde(default)]
    pub ementa_detalhada: Option<String>,
    #[serde(default)]
    pub data_apresentacao: Option<String>,
    #[serde(default)]
    pub uri_autores: Option<String>,
    #[serde(default)]
    pub status_proposicao: Option<StatusProposicao>,
}

/// Deputy as listed by `/deputados`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deputado {
    pub id: i64,
    pub uri: String,
    pub nome: String,
    #[serde(default)]
    pub sigla_partido: String,
    #[serde(default)]
    pub uri_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: String,
    #[serde(default)]
    pub id_legislatura: Option<i64>,
    #[serde(default)]
    pub url_foto: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Office location of a deputy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gabinete {
    pub nome: Option<String>,
    pub predio: Option<String>,
    pub andar: Option<String>,
    pub sala: Option<String>,
    pub telefone: Option<String>,
}

/// Latest mandate status of a deputy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UltimoStatus {
    pub nome: String,
    #[serde(default)]
    pub sigla_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url_foto: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub condicao_eleitoral: Option<String>,
    #[serde(default)]
    pub gabinete: Option<Gabinete>,
}

/// Full deputy record from `/deputados/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeputadoDetalhes {
    pub id: i64,
    pub uri: String,
    #[serde(default)]
    pub nome_civil: Option<String>,
    pub ultimo_status: UltimoStatus,
    #[serde(default)]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub escolaridade: Option<String>,
}

/// Political party reference record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Partido {
    pub id: i64,
    pub sigla: String,
    pub nome: String,
    #[serde(default)]
    pub uri: Option<String>,
}

/// Author of a proposal: a deputy, a committee, the executive, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Autor {
    pub nome: String,
    pub tipo: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub cod_tipo: Option<i64>,
}

/// A vote session held on a proposal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Votacao {
    pub id: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub data_hora_registro: Option<String>,
    #[serde(default)]
    pub sigla_orgao: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub aprovacao: Option<i64>,
}

/// Deputy reference embedded in an individual vote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeputadoVotante {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub sigla_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: Option<String>,
}

/// One deputy's vote in a vote session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotoDeputado {
    pub tipo_voto: String,
    #[serde(default)]
    pub data_registro_voto: Option<String>,
    #[serde(rename = "deputado_")]
    pub deputado: DeputadoVotante,
}
