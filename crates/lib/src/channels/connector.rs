//! Bot Framework connector: reply to and delete activities via the REST API at `serviceUrl`.

use crate::activity::{Activity, OutboundActivity};
use crate::channels::auth::TokenProvider;
use crate::channels::turn::TurnContext;
use crate::channels::ChannelError;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;

/// Connector REST client shared by all turns.
pub struct ConnectorClient {
    client: reqwest::Client,
    tokens: Option<TokenProvider>,
}

impl ConnectorClient {
    /// `tokens` None = no Authorization header (local emulator).
    pub fn new(tokens: Option<TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens,
        }
    }

    /// `{serviceUrl}/v3/conversations/{conversationId}/activities[/{activityId}]`, segments percent-encoded.
    fn activities_url(
        service_url: &str,
        conversation_id: &str,
        activity_id: Option<&str>,
    ) -> Result<Url, ChannelError> {
        let mut url = Url::parse(service_url)
            .map_err(|e| ChannelError::InvalidServiceUrl(format!("{}: {}", service_url, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ChannelError::InvalidServiceUrl(service_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["v3", "conversations", conversation_id, "activities"]);
            if let Some(id) = activity_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn authorize(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ChannelError> {
        match &self.tokens {
            Some(tokens) => Ok(req.bearer_auth(tokens.token().await?)),
            None => Ok(req),
        }
    }

    /// Post `reply` into the conversation of `inbound`, as a reply to it when it has an id.
    pub async fn reply(
        &self,
        inbound: &Activity,
        reply: OutboundActivity,
    ) -> Result<(), ChannelError> {
        let service_url = inbound
            .service_url
            .as_deref()
            .ok_or(ChannelError::MissingServiceUrl)?;
        let url = Self::activities_url(
            service_url,
            &inbound.conversation.id,
            inbound.id.as_deref(),
        )?;
        let body = reply.addressed_from(inbound);
        let req = self.authorize(self.client.post(url).json(&body)).await?;
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChannelError::Api(format!("reply failed: {} {}", status, body)));
        }
        Ok(())
    }

    /// Delete an activity from a conversation.
    pub async fn delete_activity(
        &self,
        service_url: &str,
        conversation_id: &str,
        activity_id: &str,
    ) -> Result<(), ChannelError> {
        let url = Self::activities_url(service_url, conversation_id, Some(activity_id))?;
        let req = self.authorize(self.client.delete(url)).await?;
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChannelError::Api(format!("delete failed: {} {}", status, body)));
        }
        Ok(())
    }
}

/// Live turn: an inbound activity bound to the connector it came through.
pub struct ConnectorTurn {
    activity: Activity,
    connector: Arc<ConnectorClient>,
}

impl ConnectorTurn {
    pub fn new(activity: Activity, connector: Arc<ConnectorClient>) -> Self {
        Self {
            activity,
            connector,
        }
    }
}

#[async_trait]
impl TurnContext for ConnectorTurn {
    fn activity(&self) -> &Activity {
        &self.activity
    }

    async fn send(&self, reply: OutboundActivity) -> Result<(), ChannelError> {
        self.connector.reply(&self.activity, reply).await
    }

    async fn delete_triggering_activity(&self) -> Result<(), ChannelError> {
        let Some(ref target) = self.activity.reply_to_id else {
            log::debug!("connector: no replyToId, nothing to delete");
            return Ok(());
        };
        let service_url = self
            .activity
            .service_url
            .as_deref()
            .ok_or(ChannelError::MissingServiceUrl)?;
        self.connector
            .delete_activity(service_url, &self.activity.conversation.id, target)
            .await
    }
}
