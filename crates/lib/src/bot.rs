//! Activity router: one inbound activity in, at most a handful of replies out.
//!
//! Message with a value → card action; message with text → text command (or the
//! active dialog); conversation update → welcome card; reaction → echo.
//! Light failures are logged and the confirmation is sent anyway.

use crate::activity::{ActivityKind, Entity, OutboundActivity, TextFormat};
use crate::cards;
use crate::channels::TurnContext;
use crate::commands::{CardAction, TextCommand};
use crate::dialogs::{DialogSet, HELP_DIALOG_ID};
use crate::light::{LightAction, LightControl};
use crate::state::{ConversationState, ConversationStateStore};
use std::sync::Arc;

pub const HELLO_REPLY: &str = "Oh, hello to you as well!";
pub const FALLBACK_REPLY: &str =
    "I'm terribly sorry, but my master hasn't trained me to do anything yet...";

/// Routes activities to handlers. Cheap to share; holds no per-turn state.
pub struct Bot {
    light: Arc<dyn LightControl>,
    state: Arc<ConversationStateStore>,
    dialogs: DialogSet,
}

impl Bot {
    pub fn new(light: Arc<dyn LightControl>, state: Arc<ConversationStateStore>) -> Self {
        Self {
            light,
            state,
            dialogs: DialogSet::standard(),
        }
    }

    /// Handle one inbound activity.
    pub async fn on_turn(&self, turn: &dyn TurnContext) {
        let kind = turn.kind();
        log::debug!(
            "bot: {:?} activity {:?} in {}",
            kind,
            turn.activity().id,
            turn.activity().conversation.id
        );
        match kind {
            ActivityKind::Message => self.on_message(turn).await,
            ActivityKind::ConversationUpdate => self.on_conversation_update(turn).await,
            ActivityKind::MessageReaction => self.on_reaction(turn).await,
            ActivityKind::Other => {}
        }
    }

    async fn on_message(&self, turn: &dyn TurnContext) {
        let conversation_id = turn.activity().conversation.id.clone();
        let mut state = self.state.load(&conversation_id).await;

        if let Some(value) = turn.action_value() {
            match turn.activity().card_action().and_then(CardAction::parse) {
                Some(action) => self.on_card_action(turn, action).await,
                None => log::debug!("bot: ignoring card value {}", value),
            }
        } else {
            match self.dialogs.continue_active(&mut state, turn).await {
                Ok(true) => {}
                Ok(false) => {
                    let text = turn.text();
                    self.on_text(turn, TextCommand::parse(&text), &mut state).await;
                }
                Err(e) => {
                    log::warn!("bot: dialog failed, clearing it: {}", e);
                    state = ConversationState::default();
                }
            }
        }

        self.state.save(&conversation_id, state).await;
    }

    async fn on_text(
        &self,
        turn: &dyn TurnContext,
        command: Option<TextCommand>,
        state: &mut ConversationState,
    ) {
        let name = turn.sender_name().to_string();
        match command {
            Some(TextCommand::MentionMe) => {
                let mention = format!("<at>{}</at>", name);
                let reply = OutboundActivity::text(format!("Hi {} from a 1:1 chat.", mention))
                    .with_entity(Entity::mention(turn.activity().from.clone(), mention));
                self.send(turn, reply).await;
            }
            Some(TextCommand::Hello) => {
                self.send(turn, OutboundActivity::text(HELLO_REPLY)).await;
            }
            Some(TextCommand::Help) => {
                if let Err(e) = self.dialogs.begin(HELP_DIALOG_ID, state, turn).await {
                    log::warn!("bot: help dialog failed, clearing it: {}", e);
                    *state = ConversationState::default();
                }
            }
            Some(TextCommand::ChangeColour) => {
                self.send(turn, OutboundActivity::card(cards::colour_card()))
                    .await;
            }
            Some(TextCommand::TurnOn) => {
                self.apply(LightAction::TurnOn).await;
                let reply = format!("Sure {}, I have turned the light on.", name);
                self.send(turn, OutboundActivity::text(reply)).await;
            }
            Some(TextCommand::TurnOff) => {
                self.apply(LightAction::TurnOff).await;
                let reply = format!("Sure {}, I have turned the light off.", name);
                self.send(turn, OutboundActivity::text(reply)).await;
            }
            None => {
                self.send(turn, OutboundActivity::text(FALLBACK_REPLY)).await;
            }
        }
    }

    /// Card buttons remove their card first, then act and confirm.
    async fn on_card_action(&self, turn: &dyn TurnContext, action: CardAction) {
        if let Err(e) = turn.delete_triggering_activity().await {
            log::warn!("bot: deleting card failed: {}", e);
        }
        let light = action.light_action();
        self.apply(light).await;
        let name = turn.sender_name();
        let reply = match light {
            LightAction::TurnOn => format!("{} turned the light on.", name),
            LightAction::TurnOff => format!("{} turned the light off.", name),
            LightAction::SetColour(colour) => {
                format!("{} changed the colour to {}.", name, colour.name())
            }
        };
        self.send(turn, OutboundActivity::text(reply)).await;
    }

    async fn on_conversation_update(&self, turn: &dyn TurnContext) {
        let activity = turn.activity();
        for member in &activity.members_added {
            if member.id == activity.recipient.id {
                self.send(turn, OutboundActivity::card(cards::welcome_card()))
                    .await;
            }
        }
    }

    async fn on_reaction(&self, turn: &dyn TurnContext) {
        let Some(reaction) = turn.activity().reactions_added.first() else {
            return;
        };
        let text = format!("That was an interesting reaction (<b>{}</b>)", reaction.typ);
        self.send(turn, OutboundActivity::text(text).with_format(TextFormat::Xml))
            .await;
    }

    async fn apply(&self, action: LightAction) {
        if let Err(e) = self.light.apply(action.command()).await {
            log::warn!("bot: light {:?} failed: {}", action, e);
        }
    }

    async fn send(&self, turn: &dyn TurnContext, reply: OutboundActivity) {
        if let Err(e) = turn.send(reply).await {
            log::warn!("bot: reply failed: {}", e);
        }
    }
}
