//! CMS HTTP client.
//!
//! The pipeline only depends on [`CmsClient`]; [`SanityClient`] is the
//! production implementation talking to the Sanity HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::CmsConfig;

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Writes require an API token")]
    MissingToken,

    #[error("Unexpected CMS response: {0}")]
    UnexpectedResponse(String),
}

/// Identifier of a document created in the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    pub id: String,
}

#[async_trait]
pub trait CmsClient: Send + Sync {
    /// Run a GROQ query. `params` is an object of `$name` parameters.
    async fn fetch(&self, query: &str, params: Value) -> Result<Value, CmsError>;

    /// Create one document.
    async fn create(&self, document: Value) -> Result<CreatedDocument, CmsError>;
}

pub struct SanityClient {
    http: reqwest::Client,
    base_url: String,
    dataset: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

impl SanityClient {
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url: format!(
                "https://{}.api.sanity.io/v{}",
                config.project_id, config.api_version
            ),
            dataset: config.dataset.clone(),
            token: config.token.clone(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CmsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CmsError::Status { status, body })
    }
}

/// Sanity expects every `$param` as a JSON-encoded query string value.
fn encode_params(params: &Value) -> Vec<(String, String)> {
    params
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(name, value)| (format!("${}", name), value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CmsClient for SanityClient {
    async fn fetch(&self, query: &str, params: Value) -> Result<Value, CmsError> {
        let mut pairs = vec![("query".to_string(), query.to_string())];
        pairs.extend(encode_params(&params));

        let url = format!("{}/data/query/{}", self.base_url, self.dataset);
        debug!("CMS query: {}", query);

        let response = self.authorize(self.http.get(url).query(&pairs)).send().await?;
        let body: QueryResponse = Self::check(response).await?.json().await?;
        Ok(body.result)
    }

    async fn create(&self, document: Value) -> Result<CreatedDocument, CmsError> {
        if self.token.is_none() {
            return Err(CmsError::MissingToken);
        }

        let url = format!(
            "{}/data/mutate/{}?returnIds=true",
            self.base_url, self.dataset
        );
        let mutations = json!({ "mutations": [{ "create": document }] });

        let response = self
            .authorize(self.http.post(url).json(&mutations))
            .send()
            .await?;
        let body: MutateResponse = Self::check(response).await?.json().await?;

        body.results
            .into_iter()
            .next()
            .map(|r| CreatedDocument { id: r.id })
            .ok_or_else(|| CmsError::UnexpectedResponse("mutation returned no ids".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_params_json_values() {
        let pairs = encode_params(&json!({"id": "activity-1", "limit": 3}));
        assert!(pairs.contains(&("$id".to_string(), "\"activity-1\"".to_string())));
        assert!(pairs.contains(&("$limit".to_string(), "3".to_string())));
    }

    #[test]
    fn test_encode_params_non_object() {
        assert!(encode_params(&Value::Null).is_empty());
    }

    #[tokio::test]
    async fn test_create_without_token_fails_fast() {
        let client = SanityClient::new(&CmsConfig {
            project_id: "abc123".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            token: None,
        })
        .unwrap();

        let result = client.create(json!({"_type": "quote"})).await;
        assert!(matches!(result, Err(CmsError::MissingToken)));
    }
}
