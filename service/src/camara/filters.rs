//! Typed filter sets for the paginated list views.
//!
//! Every list view has its own filter struct with a fixed set of keys. Blank
//! values are normalized away on construction, so they are never sent to the
//! upstream API and never written to the URL.

use std::fmt::Debug;

/// A filter value as it appears in a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    /// Multi-valued filter, serialized comma-joined with each value encoded
    /// on its own.
    Many(Vec<String>),
}

impl FilterValue {
    /// Percent-encode the value for use in a query string.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Single(value) => urlencoding::encode(value).into_owned(),
            Self::Many(values) => values
                .iter()
                .map(|value| urlencoding::encode(value).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// Join `key=value` pairs into an encoded query string (without `?`).
#[must_use]
pub fn encode_query(params: &[(&str, FilterValue)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", value.encode()))
        .collect::<Vec<_>>()
        .join("&")
}

/// Trim a raw value, treating blank input as absent.
#[must_use]
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Split a comma-joined raw list, dropping blank entries.
fn clean_list<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| clean(Some(v)))
        .collect()
}

/// Behaviour shared by the per-view filter types.
pub trait ListFilters: Clone + Debug + Default + PartialEq + Send + Sync + 'static {
    /// Query parameters for the upstream collection endpoint.
    fn upstream_params(&self) -> Vec<(&'static str, FilterValue)>;

    /// Query parameters for the browser-facing URL (view state).
    fn url_params(&self) -> Vec<(&'static str, FilterValue)>;

    /// Rebuild filters from decoded URL parameters. Multi-valued keys receive
    /// the raw comma-joined value.
    fn from_url_params(lookup: &dyn Fn(&str) -> Option<String>) -> Self;

    /// Current free-text search term, if any.
    fn search_term(&self) -> Option<&str>;

    /// Copy of these filters with the free-text term replaced.
    #[must_use]
    fn with_search_term(&self, term: &str) -> Self;
}

/// Filters for the proposals list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposicaoFilters {
    keywords: Option<String>,
    sigla_tipo: Vec<String>,
    cod_tema: Option<String>,
    ano: Option<String>,
}

impl ProposicaoFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn keywords(mut self, keywords: &str) -> Self {
        self.keywords = clean(Some(keywords));
        self
    }

    /// Restrict to proposal types such as `PL` or `PEC`.
    #[must_use]
    pub fn sigla_tipo<'a>(mut self, tipos: impl IntoIterator<Item = &'a str>) -> Self {
        self.sigla_tipo = clean_list(tipos);
        self
    }

    #[must_use]
    pub fn cod_tema(mut self, cod_tema: &str) -> Self {
        self.cod_tema = clean(Some(cod_tema));
        self
    }

    #[must_use]
    pub fn ano(mut self, ano: &str) -> Self {
        self.ano = clean(Some(ano));
        self
    }

    pub fn keywords_value(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn sigla_tipo_values(&self) -> &[String] {
        &self.sigla_tipo
    }

    pub fn cod_tema_value(&self) -> Option<&str> {
        self.cod_tema.as_deref()
    }

    pub fn ano_value(&self) -> Option<&str> {
        self.ano.as_deref()
    }

    fn params(&self, keys: [&'static str; 4]) -> Vec<(&'static str, FilterValue)> {
        let [keywords_key, tipo_key, tema_key, ano_key] = keys;
        let mut params = Vec::new();
        if let Some(keywords) = &self.keywords {
            params.push((keywords_key, FilterValue::Single(keywords.clone())));
        }
        if !self.sigla_tipo.is_empty() {
            params.push((tipo_key, FilterValue::Many(self.sigla_tipo.clone())));
        }
        if let Some(tema) = &self.cod_tema {
            params.push((tema_key, FilterValue::Single(tema.clone())));
        }
        if let Some(ano) = &self.ano {
            params.push((ano_key, FilterValue::Single(ano.clone())));
        }
        params
    }
}

impl ListFilters for ProposicaoFilters {
    fn upstream_params(&self) -> Vec<(&'static str, FilterValue)> {
        self.params(["keywords", "siglaTipo", "codTema", "ano"])
    }

    fn url_params(&self) -> Vec<(&'static str, FilterValue)> {
        self.params(["q", "tipo", "tema", "ano"])
    }

    fn from_url_params(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let tipos = lookup("tipo").unwrap_or_default();
        Self {
            keywords: clean(lookup("q").as_deref()),
            sigla_tipo: clean_list(tipos.split(',')),
            cod_tema: clean(lookup("tema").as_deref()),
            ano: clean(lookup("ano").as_deref()),
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    fn with_search_term(&self, term: &str) -> Self {
        self.clone().keywords(term)
    }
}

/// Filters for the deputies list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeputadoFilters {
    nome: Option<String>,
    sigla_partido: Option<String>,
    sigla_uf: Option<String>,
}

impl DeputadoFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn nome(mut self, nome: &str) -> Self {
        self.nome = clean(Some(nome));
        self
    }

    #[must_use]
    pub fn sigla_partido(mut self, sigla: &str) -> Self {
        self.sigla_partido = clean(Some(sigla));
        self
    }

    #[must_use]
    pub fn sigla_uf(mut self, uf: &str) -> Self {
        self.sigla_uf = clean(Some(uf));
        self
    }

    pub fn nome_value(&self) -> Option<&str> {
        self.nome.as_deref()
    }

    pub fn sigla_partido_value(&self) -> Option<&str> {
        self.sigla_partido.as_deref()
    }

    pub fn sigla_uf_value(&self) -> Option<&str> {
        self.sigla_uf.as_deref()
    }

    fn params(&self, keys: [&'static str; 3]) -> Vec<(&'static str, FilterValue)> {
        [&self.nome, &self.sigla_partido, &self.sigla_uf]
            .into_iter()
            .zip(keys)
            .filter_map(|(value, key)| {
                value
                    .as_ref()
                    .map(|v| (key, FilterValue::Single(v.clone())))
            })
            .collect()
    }
}

impl ListFilters for DeputadoFilters {
    fn upstream_params(&self) -> Vec<(&'static str, FilterValue)> {
        self.params(["nome", "siglaPartido", "siglaUf"])
    }

    fn url_params(&self) -> Vec<(&'static str, FilterValue)> {
        self.params(["q", "partido", "uf"])
    }

    fn from_url_params(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            nome: clean(lookup("q").as_deref()),
            sigla_partido: clean(lookup("partido").as_deref()),
            sigla_uf: clean(lookup("uf").as_deref()),
        }
    }

    fn search_term(&self) -> Option<&str> {
        self.nome.as_deref()
    }

    fn with_search_term(&self, term: &str) -> Self {
        self.clone().nome(term)
    }
}
