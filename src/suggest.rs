//! Related-topic suggestions from an external HTTP service.
//!
//! The service is optional. Every failure path (transport, status, body shape) ends in an
//! empty list for callers of [`SuggestionSource`]; only [`SuggestionsClient::fetch`] reports
//! the underlying error.

use std::time::Duration;

use tracing::instrument;

use crate::config::StudioConfig;
use crate::foundation::error::{ThumbError, ThumbResult};
use crate::titles::Topic;

/// Anything that can offer topic suggestions.
#[async_trait::async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Suggestions for `topic`, in service order. Never fails; unavailable means empty.
    async fn suggestions(&self, topic: &Topic) -> Vec<String>;
}

/// Source used when no endpoint is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSuggestions;

#[async_trait::async_trait]
impl SuggestionSource for NoSuggestions {
    async fn suggestions(&self, _topic: &Topic) -> Vec<String> {
        Vec::new()
    }
}

/// `GET <endpoint>?<param>=<topic>` returning `{"<field>": ["...", ...]}`.
#[derive(Clone, Debug)]
pub struct SuggestionsClient {
    http_client: reqwest::Client,
    endpoint: String,
    param: String,
    field: String,
}

impl SuggestionsClient {
    pub fn new(
        endpoint: impl Into<String>,
        param: impl Into<String>,
        field: impl Into<String>,
        timeout: Duration,
    ) -> ThumbResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ThumbError::config(format!("build http client: {e}")))?;
        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            param: param.into(),
            field: field.into(),
        })
    }

    /// `None` when the config has no endpoint.
    pub fn from_config(config: &StudioConfig) -> ThumbResult<Option<Self>> {
        config
            .suggestions_url
            .as_deref()
            .map(|url| {
                Self::new(
                    url,
                    config.suggestions_param.as_str(),
                    config.suggestions_field.as_str(),
                    config.suggestions_timeout(),
                )
            })
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch suggestions, reporting why the service could not provide them.
    #[instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch(&self, topic: &Topic) -> ThumbResult<Vec<String>> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[(self.param.as_str(), topic.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThumbError::collaborator(format!(
                "suggestions service returned status {status}"
            )));
        }

        let body = response.text().await?;
        let suggestions = parse_suggestions(&body, &self.field)?;
        tracing::debug!(results = suggestions.len(), "suggestions fetched");
        Ok(suggestions)
    }
}

#[async_trait::async_trait]
impl SuggestionSource for SuggestionsClient {
    async fn suggestions(&self, topic: &Topic) -> Vec<String> {
        match self.fetch(topic).await {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(error = %err, "suggestions unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: SuggestionSource + ?Sized> SuggestionSource for Box<S> {
    async fn suggestions(&self, topic: &Topic) -> Vec<String> {
        (**self).suggestions(topic).await
    }
}

/// Extract the string array under `field` from a JSON object body.
pub fn parse_suggestions(body: &str, field: &str) -> ThumbResult<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ThumbError::collaborator(format!("malformed suggestions body: {e}")))?;
    let entries = value
        .get(field)
        .ok_or_else(|| ThumbError::collaborator(format!("suggestions body has no '{field}' field")))?;
    serde_json::from_value::<Vec<String>>(entries.clone()).map_err(|e| {
        ThumbError::collaborator(format!("'{field}' is not an array of strings: {e}"))
    })
}
