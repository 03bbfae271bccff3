//! The scraped page every signal, ownership and metadata rule reads from.

use url::Url;

/// A fetched page and the URL it finally resolved to after redirects.
///
/// This is the only input the text heuristics see, so the matching strategy
/// can change (e.g. parsing the embedded player response) without touching
/// the fetch or orchestration code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePage {
    pub body: String,
    pub final_url: String,
}

impl LivePage {
    pub fn new(body: impl Into<String>, final_url: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            final_url: final_url.into(),
        }
    }

    /// Value of a query parameter on the final URL.
    pub fn final_query_param(&self, name: &str) -> Option<String> {
        let url = Url::parse(&self.final_url).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Whether the live redirect landed on a watch page (`/watch?v=...`).
    pub fn is_watch_url(&self) -> bool {
        Url::parse(&self.final_url)
            .map(|url| url.path() == "/watch" && url.query_pairs().any(|(key, _)| key == "v"))
            .unwrap_or(false)
    }
}
