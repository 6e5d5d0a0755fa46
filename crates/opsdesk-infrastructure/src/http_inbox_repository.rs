//! HTTP-backed inbox data source.
//!
//! Talks to the remote inbox service's REST API. Endpoints:
//!
//! - `GET  {base}/conversations` - list, with `status`/`platform`/`search`
//!   query parameters
//! - `GET  {base}/conversations/{id}` - conversation with messages
//! - `POST {base}/conversations/{id}/messages` - send an outbound message
//! - `POST {base}/conversations/{id}/quick-actions` - run a quick action

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::time::Duration;

use opsdesk_core::config::LiveConfig;
use opsdesk_core::conversation::{Attachment, ConversationFilter, Message};
use opsdesk_core::error::{OpsdeskError, Result};
use opsdesk_core::inbox::{ConversationDetail, ConversationPage, InboxDataSource};
use opsdesk_core::quick_action::{QuickAction, QuickActionOutcome};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// `InboxDataSource` implementation that talks to the live inbox service.
#[derive(Clone)]
pub struct HttpInboxRepository {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    content: &'a str,
    attachments: Vec<Attachment>,
}

#[derive(Serialize)]
struct QuickActionRequest {
    action: QuickAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl HttpInboxRepository {
    /// Creates a new repository for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
            api_token: None,
        }
    }

    /// Adds a bearer token sent with every request.
    pub fn with_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    /// Builds a repository from live-service settings.
    pub fn from_config(config: &LiveConfig) -> Self {
        let repository = Self::new(config.base_url.clone());
        match &config.api_token {
            Some(token) => repository.with_token(token.clone()),
            None => repository,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "inbox service rejected request");
        match status {
            StatusCode::NOT_FOUND => Err(OpsdeskError::not_found("conversation", body)),
            _ => Err(OpsdeskError::Http {
                status: Some(status.as_u16()),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            }),
        }
    }
}

#[async_trait]
impl InboxDataSource for HttpInboxRepository {
    async fn list_conversations(&self, filter: &ConversationFilter) -> Result<ConversationPage> {
        let mut query: Vec<(&str, String)> = vec![("status", filter.status.to_string())];
        if let Some(platform) = filter.platform {
            query.push(("platform", platform.to_string()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.to_string()));
        }

        let request = self
            .client
            .get(self.endpoint("conversations"))
            .query(&query);
        let response = self.authorize(request).send().await?;
        Ok(self.check(response).await?.json().await?)
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationDetail> {
        let request = self
            .client
            .get(self.endpoint(&format!("conversations/{conversation_id}")));
        let response = self.authorize(request).send().await?;
        Ok(self.check(response).await?.json().await?)
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Message> {
        let request = self
            .client
            .post(self.endpoint(&format!("conversations/{conversation_id}/messages")))
            .json(&SendMessageRequest {
                content,
                attachments,
            });
        let response = self.authorize(request).send().await?;
        Ok(self.check(response).await?.json().await?)
    }

    async fn quick_action(
        &self,
        conversation_id: &str,
        action: QuickAction,
        data: Option<serde_json::Value>,
    ) -> Result<QuickActionOutcome> {
        let request = self
            .client
            .post(self.endpoint(&format!(
                "conversations/{conversation_id}/quick-actions"
            )))
            .json(&QuickActionRequest { action, data });
        let response = self.authorize(request).send().await?;
        Ok(self.check(response).await?.json().await?)
    }
}
