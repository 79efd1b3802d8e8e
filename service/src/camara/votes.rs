//! Latest vote on a proposal.

use serde::Serialize;
use utoipa::ToSchema;

use super::client::CamaraApiClient;
use super::types::{Votacao, VotoDeputado};

/// Vote value recorded for "yes".
pub const VOTO_SIM: &str = "Sim";
/// Vote value recorded for "no".
pub const VOTO_NAO: &str = "Não";

/// The most recent vote session of a proposal with individual votes split
/// by direction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub votacao: Votacao,
    pub sim: Vec<VotoDeputado>,
    pub nao: Vec<VotoDeputado>,
    /// True when no individual votes were recorded (symbolic or unanimous
    /// vote, or the vote list could not be fetched).
    pub symbolic: bool,
}

impl VoteSummary {
    fn from_votes(votacao: Votacao, votos: Vec<VotoDeputado>) -> Self {
        let symbolic = votos.is_empty();
        let (sim, rest): (Vec<_>, Vec<_>) = votos.into_iter().partition(|v| v.tipo_voto == VOTO_SIM);
        let nao = rest.into_iter().filter(|v| v.tipo_voto == VOTO_NAO).collect();
        Self {
            votacao,
            sim,
            nao,
            symbolic,
        }
    }
}

/// Fetch the latest vote session of a proposal and its individual votes.
///
/// Returns `None` when the proposal was never voted on or the vote sessions
/// cannot be listed. A failure fetching individual votes is treated as a
/// symbolic vote.
pub async fn latest_vote(client: &dyn CamaraApiClient, proposicao_id: &str) -> Option<VoteSummary> {
    let votacoes = match client.list_votacoes(proposicao_id).await {
        Ok(votacoes) => votacoes,
        Err(err) => {
            tracing::warn!(proposicao_id, error = %err, "failed to list vote sessions");
            return None;
        }
    };

    let votacao = votacoes.into_iter().next()?;

    let votos = match client.list_votos(&votacao.id).await {
        Ok(votos) => votos,
        Err(err) => {
            tracing::info!(votacao_id = %votacao.id, error = %err, "no individual votes; assuming symbolic vote");
            Vec::new()
        }
    };

    Some(VoteSummary::from_votes(votacao, votos))
}
