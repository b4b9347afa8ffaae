//! Activity wire types (Bot Framework JSON) for inbound events and outbound replies.

use serde::{Deserialize, Serialize};

/// Activity type literals used by the router.
pub mod activity_types {
    pub const MESSAGE: &str = "message";
    pub const CONVERSATION_UPDATE: &str = "conversationUpdate";
    pub const MESSAGE_REACTION: &str = "messageReaction";
}

/// What the router needs to know about an inbound activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Message,
    ConversationUpdate,
    MessageReaction,
    Other,
}

/// A user, bot or conversation participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageReaction {
    #[serde(rename = "type")]
    pub typ: String,
}

/// Entity attached to an activity. Mentions carry `mentioned` and `text`; other kinds keep their raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Entity {
    pub fn mention(account: ChannelAccount, text: impl Into<String>) -> Self {
        Self {
            typ: "mention".to_string(),
            mentioned: Some(account),
            text: Some(text.into()),
        }
    }
}

/// Inbound activity as POSTed by the connector. Only the fields the bot reads are modelled.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub typ: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub recipient: ChannelAccount,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub reply_to_id: Option<String>,
    #[serde(default)]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default)]
    pub reactions_added: Vec<MessageReaction>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self.typ.as_str() {
            activity_types::MESSAGE => ActivityKind::Message,
            activity_types::CONVERSATION_UPDATE => ActivityKind::ConversationUpdate,
            activity_types::MESSAGE_REACTION => ActivityKind::MessageReaction,
            _ => ActivityKind::Other,
        }
    }

    /// Structured value, treating JSON null as absent.
    pub fn value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref().filter(|v| !v.is_null())
    }

    /// `value.cardAction` when the value is an object carrying a string action id.
    pub fn card_action(&self) -> Option<&str> {
        self.value()?.get("cardAction")?.as_str()
    }

    /// Sender display name, or empty when the channel did not send one.
    pub fn sender_name(&self) -> &str {
        self.from.name.as_deref().unwrap_or("")
    }

    /// Text with every mention of the recipient (the bot) removed, trimmed.
    pub fn text_without_recipient_mention(&self) -> String {
        let mut text = self.text.clone().unwrap_or_default();
        for entity in &self.entities {
            if entity.typ != "mention" {
                continue;
            }
            let is_recipient = entity
                .mentioned
                .as_ref()
                .is_some_and(|m| m.id == self.recipient.id);
            if !is_recipient {
                continue;
            }
            if let Some(mention_text) = entity.text.as_deref().filter(|t| !t.is_empty()) {
                text = text.replace(mention_text, "");
            }
        }
        text.trim().to_string()
    }
}

/// Text format of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Plain,
    Markdown,
    Xml,
}

/// Attachment on an outbound message (adaptive cards only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    pub content: serde_json::Value,
}

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

impl Attachment {
    pub fn adaptive_card(content: serde_json::Value) -> Self {
        Self {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
            content,
        }
    }
}

/// Outbound message. Addressing fields are filled in from the inbound activity by the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundActivity {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<TextFormat>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

impl OutboundActivity {
    fn empty() -> Self {
        Self {
            typ: activity_types::MESSAGE.to_string(),
            text: None,
            text_format: None,
            attachments: Vec::new(),
            entities: Vec::new(),
            from: None,
            recipient: None,
            conversation: None,
            reply_to_id: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::empty()
        }
    }

    pub fn card(content: serde_json::Value) -> Self {
        Self {
            attachments: vec![Attachment::adaptive_card(content)],
            ..Self::empty()
        }
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.text_format = Some(format);
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Address this reply back into the conversation the inbound activity came from.
    pub fn addressed_from(mut self, inbound: &Activity) -> Self {
        self.from = Some(inbound.recipient.clone());
        self.recipient = Some(inbound.from.clone());
        self.conversation = Some(inbound.conversation.clone());
        self.reply_to_id = inbound.id.clone();
        self
    }
}
