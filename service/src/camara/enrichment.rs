//! Best-effort enrichment of proposal authors with deputy details.
//!
//! Author lists only carry a name, a type and a URI. For authors that are
//! individual deputies, the party, state and photo come from the deputy's
//! own resource. All lookups run concurrently and each failure stays local
//! to its author.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::client::CamaraApiClient;
use super::types::Autor;

/// Author type the upstream assigns to individual deputies.
pub const DEPUTADO_TIPO: &str = "Deputado(a)";

/// An author record, possibly augmented with deputy details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAutor {
    #[serde(flatten)]
    pub autor: Autor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigla_partido: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigla_uf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_foto: Option<String>,
}

impl EnrichedAutor {
    /// Wrap an author without extra fields.
    #[must_use]
    pub fn plain(autor: Autor) -> Self {
        Self {
            autor,
            sigla_partido: None,
            sigla_uf: None,
            url_foto: None,
        }
    }

    /// Whether any deputy field was merged in.
    #[must_use]
    pub fn is_enriched(&self) -> bool {
        self.sigla_partido.is_some() || self.sigla_uf.is_some() || self.url_foto.is_some()
    }

    /// Profile id when this author is an individual deputy.
    #[must_use]
    pub fn deputado_id(&self) -> Option<&str> {
        legislator_id(&self.autor)
    }
}

/// Extract the deputy id from a URI ending in `/deputados/<digits>`.
#[must_use]
pub fn deputado_id_from_uri(uri: &str) -> Option<&str> {
    let (prefix, id) = uri.trim_end_matches('/').rsplit_once('/')?;
    let is_deputado_path = prefix.ends_with("/deputados") || prefix == "deputados";
    if is_deputado_path && !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

/// Id to look up when `autor` is an individual deputy.
fn legislator_id(autor: &Autor) -> Option<&str> {
    if autor.tipo == DEPUTADO_TIPO {
        deputado_id_from_uri(&autor.uri)
    } else {
        None
    }
}

async fn enrich_one(client: &dyn CamaraApiClient, autor: Autor) -> EnrichedAutor {
    let Some(id) = legislator_id(&autor).map(ToString::to_string) else {
        return EnrichedAutor::plain(autor);
    };

    match client.get_deputado(&id).await {
        Ok(detalhes) => {
            let status = detalhes.ultimo_status;
            EnrichedAutor {
                autor,
                sigla_partido: status.sigla_partido,
                sigla_uf: status.sigla_uf,
                url_foto: status.url_foto,
            }
        }
        Err(err) => {
            tracing::warn!(deputado_id = %id, error = %err, "author enrichment failed; keeping base record");
            EnrichedAutor::plain(autor)
        }
    }
}

/// Enrich every deputy author with party, state and photo.
///
/// The output has the same length and order as `autores`. Non-deputy
/// authors never trigger a lookup; a failed lookup leaves that author
/// unchanged.
pub async fn enrich_authors(client: &dyn CamaraApiClient, autores: Vec<Autor>) -> Vec<EnrichedAutor> {
    join_all(autores.into_iter().map(|autor| enrich_one(client, autor))).await
}
