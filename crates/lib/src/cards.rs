//! Static adaptive cards: welcome (on join) and colour picker (on "change colour").
//!
//! Buttons are `Action.Submit` with `data.cardAction`, which comes back as the activity value.

use crate::commands::CardAction;
use serde_json::{json, Value};

const CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const CARD_VERSION: &str = "1.2";

fn submit(title: &str, action: CardAction) -> Value {
    json!({
        "type": "Action.Submit",
        "title": title,
        "data": { "cardAction": action.id() }
    })
}

fn card(body: Vec<Value>, actions: Vec<Value>) -> Value {
    json!({
        "$schema": CARD_SCHEMA,
        "type": "AdaptiveCard",
        "version": CARD_VERSION,
        "body": body,
        "actions": actions
    })
}

/// Shown once when the bot is added to a conversation.
pub fn welcome_card() -> Value {
    card(
        vec![
            json!({
                "type": "TextBlock",
                "size": "Large",
                "weight": "Bolder",
                "text": "Maze Robo"
            }),
            json!({
                "type": "TextBlock",
                "wrap": true,
                "text": "Hi! I look after the light. Use the buttons below, or type \"turn on\", \"turn off\", \"change colour\" or \"help\"."
            }),
        ],
        vec![
            submit("Turn on", CardAction::TurnOn),
            submit("Turn off", CardAction::TurnOff),
        ],
    )
}

/// Colour picker; each button sets one colour.
pub fn colour_card() -> Value {
    card(
        vec![json!({
            "type": "TextBlock",
            "weight": "Bolder",
            "wrap": true,
            "text": "Pick a colour for the light"
        })],
        vec![
            submit("Purple", CardAction::ChangeColourPurple),
            submit("Teal", CardAction::ChangeColourTeal),
            submit("Orange", CardAction::ChangeColourOrange),
        ],
    )
}
