//! Crossref REST API lookup (`/works/{doi}`)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::time::Duration;
use tracing::debug;

use super::{LookupError, MetadataLookup};

// ==================== Crossref API Response Types ====================

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    status: String,
    message: CrossrefWork,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CrossrefWork {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(default)]
    container_title: Vec<String>,
    volume: Option<String>,
    issue: Option<String>,
    page: Option<String>,
    publisher: Option<String>,
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "URL")]
    url: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "ISSN", default)]
    issn: Vec<String>,
    issued: Option<CrossrefDate>,
    published: Option<CrossrefDate>,
    published_print: Option<CrossrefDate>,
    published_online: Option<CrossrefDate>,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CrossrefDate {
    #[serde(default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

impl CrossrefDate {
    fn part(&self, index: usize) -> Option<i64> {
        self.date_parts.first()?.get(index).copied().flatten()
    }
}

// ==================== CrossrefLookup ====================

/// Looks DOIs up in the Crossref works API
pub struct CrossrefLookup {
    client: Client,
    base_url: String,
    mailto: Option<String>,
}

impl CrossrefLookup {
    /// # Errors
    ///
    /// Returns [`LookupError::Request`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        mailto: Option<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mailto,
        })
    }

    fn works_url(&self, doi: &str) -> String {
        let mut url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));
        if let Some(mailto) = &self.mailto {
            url.push_str("?mailto=");
            url.push_str(&urlencoding::encode(mailto));
        }
        url
    }
}

impl std::fmt::Debug for CrossrefLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossrefLookup")
            .field("base_url", &self.base_url)
            .field("mailto", &self.mailto)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MetadataLookup for CrossrefLookup {
    #[tracing::instrument(skip(self), fields(lookup = "crossref"))]
    async fn lookup(&self, doi: &str) -> Result<Map<String, Value>, LookupError> {
        let url = self.works_url(doi);
        debug!(api_url = %url, "Calling Crossref API");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(doi.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: CrossrefResponse = response
            .json()
            .await
            .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

        if !body.status.eq_ignore_ascii_case("ok") {
            return Err(LookupError::InvalidResponse(format!(
                "status '{}'",
                body.status
            )));
        }

        Ok(work_to_fields(body.message))
    }
}

/// Convert a Crossref work into library fields
fn work_to_fields(work: CrossrefWork) -> Map<String, Value> {
    let mut fields = Map::new();
    let mut put = |key: &str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            fields.insert(key.to_string(), Value::String(value));
        }
    };

    put("title", work.title.into_iter().next());
    put("journal", work.container_title.into_iter().next());
    put("volume", work.volume);
    put("issue", work.issue);
    put("pages", work.page);
    put("publisher", work.publisher);
    put("doi", work.doi);
    put("url", work.url);
    put("type", work.kind);
    put("issn", work.issn.into_iter().next());

    let authors: Vec<&CrossrefAuthor> = work
        .author
        .iter()
        .filter(|a| a.family.is_some() || a.given.is_some())
        .collect();
    if !authors.is_empty() {
        let names: Vec<String> = authors
            .iter()
            .map(|a| match (&a.family, &a.given) {
                (Some(family), Some(given)) => format!("{family}, {given}"),
                (Some(name), None) | (None, Some(name)) => name.clone(),
                (None, None) => String::new(),
            })
            .collect();
        fields.insert("author".to_string(), Value::String(names.join(" and ")));
        fields.insert(
            "author_list".to_string(),
            Value::Array(
                authors
                    .iter()
                    .map(|a| json!({"family": a.family, "given": a.given}))
                    .collect(),
            ),
        );
    }

    let date = [
        &work.issued,
        &work.published,
        &work.published_print,
        &work.published_online,
    ]
    .into_iter()
    .flatten()
    .find(|d| d.part(0).is_some());
    if let Some(date) = date {
        if let Some(year) = date.part(0) {
            fields.insert("year".to_string(), json!(year));
        }
        if let Some(month) = date.part(1) {
            fields.insert("month".to_string(), json!(month));
        }
    }

    fields
}
