//! Text commands and card actions, keyed by their literal surface form.

use crate::light::{Colour, LightAction};

/// Commands recognised in message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand {
    MentionMe,
    Hello,
    Help,
    ChangeColour,
    TurnOn,
    TurnOff,
}

/// Prefixes in match priority order.
const TEXT_COMMANDS: &[(&str, TextCommand)] = &[
    ("mentionme", TextCommand::MentionMe),
    ("hello", TextCommand::Hello),
    ("help", TextCommand::Help),
    ("change colour", TextCommand::ChangeColour),
    ("turn on", TextCommand::TurnOn),
    ("turn off", TextCommand::TurnOff),
];

impl TextCommand {
    /// Lower-cases `text` and returns the first command whose prefix it starts with.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        TEXT_COMMANDS
            .iter()
            .find(|(prefix, _)| text.starts_with(prefix))
            .map(|(_, cmd)| *cmd)
    }

    pub fn prefix(self) -> &'static str {
        TEXT_COMMANDS
            .iter()
            .find(|(_, cmd)| *cmd == self)
            .map(|(prefix, _)| *prefix)
            .unwrap_or_default()
    }
}

/// Adaptive-card button actions (`value.cardAction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    TurnOn,
    TurnOff,
    ChangeColourPurple,
    ChangeColourTeal,
    ChangeColourOrange,
}

const CARD_ACTIONS: &[(&str, CardAction)] = &[
    ("turnOn", CardAction::TurnOn),
    ("turnOff", CardAction::TurnOff),
    ("changeColourPurple", CardAction::ChangeColourPurple),
    ("changeColourTeal", CardAction::ChangeColourTeal),
    ("changeColourOrange", CardAction::ChangeColourOrange),
];

impl CardAction {
    /// Case-sensitive lookup.
    pub fn parse(id: &str) -> Option<Self> {
        CARD_ACTIONS
            .iter()
            .find(|(literal, _)| *literal == id)
            .map(|(_, action)| *action)
    }

    /// Wire id, as placed in card `data`.
    pub fn id(self) -> &'static str {
        CARD_ACTIONS
            .iter()
            .find(|(_, action)| *action == self)
            .map(|(literal, _)| *literal)
            .unwrap_or_default()
    }

    pub fn light_action(self) -> LightAction {
        match self {
            CardAction::TurnOn => LightAction::TurnOn,
            CardAction::TurnOff => LightAction::TurnOff,
            CardAction::ChangeColourPurple => LightAction::SetColour(Colour::Purple),
            CardAction::ChangeColourTeal => LightAction::SetColour(Colour::Teal),
            CardAction::ChangeColourOrange => LightAction::SetColour(Colour::Orange),
        }
    }
}
