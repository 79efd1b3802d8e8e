//! Display items for list views and the transforms that produce them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::camara::{Deputado, Proposicao};

const MISSING_EMENTA: &str = "Sem ementa disponível.";
const MISSING_EMAIL: &str = "Não informado";

/// One row of a list view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub href: String,
    /// Proposal summary kept for the explanation feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ementa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Proposal row: `PL 1234/2024` with its ementa.
#[must_use]
pub fn proposicao_item(prop: Proposicao) -> ListItem {
    let description = if prop.ementa.trim().is_empty() {
        MISSING_EMENTA.to_string()
    } else {
        prop.ementa.clone()
    };

    ListItem {
        id: prop.id.to_string(),
        title: format!("{} {}/{}", prop.sigla_tipo, prop.numero, prop.ano),
        author: format!("ID Proposição: {}", prop.id),
        description,
        href: format!("/proposicoes/{}", prop.id),
        ementa: Some(prop.ementa),
        image_url: None,
    }
}

/// Deputy row: name, party and state, contact email.
#[must_use]
pub fn deputado_item(dep: Deputado) -> ListItem {
    let email = dep
        .email
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| MISSING_EMAIL.to_string());

    ListItem {
        id: dep.id.to_string(),
        title: dep.nome,
        author: format!("Partido: {} - {}", dep.sigla_partido, dep.sigla_uf),
        description: format!("Email: {email}"),
        href: format!("/deputados/{}", dep.id),
        ementa: None,
        image_url: dep.url_foto,
    }
}
