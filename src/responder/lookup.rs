//! Combined web + encyclopedia lookup
//!
//! Each source is queried independently; one failing never hides the other's
//! result. Failures surface as inline advisory text, never as errors.

use super::profile::{Profile, Tone};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const SUMMARY_SENTENCES: usize = 2;
const MAX_OPTIONS: usize = 5;
const USER_AGENT: &str = concat!("zana/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(u16),
    #[error("Invalid source URL: {0}")]
    InvalidUrl(String),
    #[error("No page found")]
    NotFound,
    #[error("Query matches several pages")]
    Ambiguous(Vec<String>),
}

/// Where a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Web,
    Wikipedia,
}

impl SourceKind {
    fn name(self) -> &'static str {
        match self {
            SourceKind::Web => "web",
            SourceKind::Wikipedia => "wikipedia",
        }
    }
}

/// One external text source
#[async_trait]
pub trait LookupSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// A short text snippet for the query, `None` if the source has nothing
    async fn fetch(&self, query: &str) -> Result<Option<String>, LookupError>;
}

/// Text lookup as seen by the dispatcher. Never fails.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, query: &str, profile: &Profile) -> String;
}

/// Queries every configured source concurrently and joins the findings
pub struct CombinedLookup {
    sources: Vec<Arc<dyn LookupSource>>,
}

impl CombinedLookup {
    pub fn new(sources: Vec<Arc<dyn LookupSource>>) -> Self {
        Self { sources }
    }

    /// Web instant answers plus Wikipedia summaries
    pub fn standard(
        web_base: &str,
        wikipedia_base: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::new(vec![
            Arc::new(WebSource::new(client.clone(), web_base)),
            Arc::new(WikipediaSource::new(client, wikipedia_base)),
        ]))
    }

    /// Look up using only the sources of one kind
    pub async fn lookup_from(&self, kind: SourceKind, query: &str, profile: &Profile) -> String {
        let findings = futures::future::join_all(
            self.sources
                .iter()
                .filter(|s| s.kind() == kind)
                .map(|source| Self::query_source(source.as_ref(), query, profile)),
        )
        .await;
        Self::join_findings(findings, query)
    }

    async fn query_source(
        source: &dyn LookupSource,
        query: &str,
        profile: &Profile,
    ) -> Option<String> {
        let kind = source.kind();
        match source.fetch(query).await {
            Ok(Some(text)) => Some(format_finding(kind, query, &text, profile)),
            Ok(None) => None,
            Err(LookupError::Ambiguous(options)) => Some(format!(
                "Wikipedia has multiple entries for {query}: {}",
                options.join(", ")
            )),
            Err(LookupError::NotFound) => Some(format!("Wikipedia has no page for '{query}' 😅")),
            Err(e) => {
                tracing::warn!(source = kind.name(), error = %e, "Lookup source failed");
                Some(match kind {
                    SourceKind::Web => "⚠ Web search failed.".to_string(),
                    SourceKind::Wikipedia => "⚠ Wikipedia lookup failed.".to_string(),
                })
            }
        }
    }

    fn join_findings(findings: Vec<Option<String>>, query: &str) -> String {
        let parts: Vec<String> = findings.into_iter().flatten().collect();
        if parts.is_empty() {
            format!("I couldn't find anything on '{query}' 🤔")
        } else {
            parts.join("\n\n")
        }
    }
}

#[async_trait]
impl Lookup for CombinedLookup {
    async fn lookup(&self, query: &str, profile: &Profile) -> String {
        let findings = futures::future::join_all(
            self.sources
                .iter()
                .map(|source| Self::query_source(source.as_ref(), query, profile)),
        )
        .await;
        Self::join_findings(findings, query)
    }
}

/// Word a finding according to tone and emoji preference
fn format_finding(kind: SourceKind, query: &str, text: &str, profile: &Profile) -> String {
    let emojis = profile.likes_emojis;
    match (kind, profile.tone) {
        (SourceKind::Web, Tone::Playful) if emojis => {
            format!("🔎 The web says this about {query}: {text} 😏")
        }
        (SourceKind::Web, Tone::Playful) => format!("The web says: {text}"),
        (SourceKind::Web, Tone::Analytical) => {
            format!("📊 From a web search on '{query}': {text}")
        }
        (SourceKind::Web, Tone::Friendly) => {
            format!("I looked it up online: {text}{}", if emojis { " 🌐" } else { "" })
        }
        (SourceKind::Wikipedia, Tone::Playful) if emojis => {
            format!("✨ Fun fact about {query}: {text} 😉")
        }
        (SourceKind::Wikipedia, Tone::Playful) => format!("Fun fact about {query}: {text}"),
        (SourceKind::Wikipedia, Tone::Analytical) => {
            format!("📖 According to Wikipedia, here’s the summary on '{query}': {text}")
        }
        (SourceKind::Wikipedia, Tone::Friendly) => {
            format!("Here’s what I found on {query}: {text}{}", if emojis { " 🌿" } else { "" })
        }
    }
}

/// First `count` sentences of a paragraph
fn first_sentences(text: &str, count: usize) -> String {
    let mut out = String::new();
    let mut seen = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|n| n.is_whitespace()) {
            seen += 1;
            if seen == count {
                break;
            }
        }
    }
    out.trim().to_string()
}

// ============================================================================
// Web instant answers
// ============================================================================

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "Definition", default)]
    definition: String,
}

/// DuckDuckGo-compatible instant answer API
pub struct WebSource {
    client: Client,
    base_url: String,
}

impl WebSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LookupSource for WebSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Web
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>, LookupError> {
        let url = Url::parse_with_params(
            &format!("{}/", self.base_url),
            &[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ],
        )
        .map_err(|_| LookupError::InvalidUrl(self.base_url.clone()))?;

        let response = self.client.get(url).send().await?;
        check_status(response.status())?;
        let answer: InstantAnswer = response.json().await?;
        Ok(answer.snippet())
    }
}

impl InstantAnswer {
    /// The abstract, else the definition, else nothing
    fn snippet(self) -> Option<String> {
        [self.abstract_text, self.definition]
            .into_iter()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }
}

fn check_status(status: StatusCode) -> Result<(), LookupError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(LookupError::Status(status.as_u16()))
    }
}

// ============================================================================
// Wikipedia summaries
// ============================================================================

/// `[query, titles, descriptions, urls]`
type OpenSearchResponse = (String, Vec<String>, Vec<String>, Vec<String>);

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    page_type: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia: best title match via opensearch, then its REST summary
pub struct WikipediaSource {
    client: Client,
    base_url: String,
}

impl WikipediaSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        let invalid = || LookupError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let mut url = self.endpoint(&["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("search", query)
            .append_pair("limit", &MAX_OPTIONS.to_string())
            .append_pair("format", "json");

        let response = self.client.get(url).send().await?;
        check_status(response.status())?;
        let (_, titles, _, _): OpenSearchResponse = response.json().await?;
        Ok(titles)
    }
}

/// Top opensearch hit; no hits means no page
fn best_title(titles: &[String]) -> Result<&str, LookupError> {
    titles.first().map(String::as_str).ok_or(LookupError::NotFound)
}

fn summary_status(status: StatusCode) -> Result<(), LookupError> {
    if status == StatusCode::NOT_FOUND {
        Err(LookupError::NotFound)
    } else {
        check_status(status)
    }
}

/// Leading sentences of a summary. Disambiguation pages yield the
/// candidate titles instead.
fn summary_snippet(
    summary: &PageSummary,
    titles: Vec<String>,
) -> Result<Option<String>, LookupError> {
    if summary.page_type == "disambiguation" {
        return Err(LookupError::Ambiguous(titles));
    }
    let text = first_sentences(&summary.extract, SUMMARY_SENTENCES);
    Ok((!text.is_empty()).then_some(text))
}

#[async_trait]
impl LookupSource for WikipediaSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Wikipedia
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>, LookupError> {
        let titles = self.suggest(query).await?;
        let title = best_title(&titles)?;

        let url = self.endpoint(&["api", "rest_v1", "page", "summary", title])?;
        let response = self.client.get(url).send().await?;
        summary_status(response.status())?;

        let summary: PageSummary = response.json().await?;
        summary_snippet(&summary, titles)
    }
}
