//! Smart-light API client: one PUT of a fixed JSON body per command.
//!
//! The response is not inspected; any HTTP status counts as applied.

use async_trait::async_trait;
use serde::Serialize;

/// Content type sent with every light PUT.
pub const LIGHT_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

const HUE_ORANGE: u16 = 2002;
const HUE_PURPLE: u16 = 51245;
const HUE_TEAL: u16 = 38775;
const FULL_SATURATION: u8 = 254;

/// Body of a light PUT: `{"on": .., "hue": .., "sat": ..}`; hue and sat are omitted when off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightCommand {
    pub on: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sat: Option<u8>,
}

impl LightCommand {
    const fn colour(hue: u16) -> Self {
        Self {
            on: true,
            hue: Some(hue),
            sat: Some(FULL_SATURATION),
        }
    }

    const OFF: Self = Self {
        on: false,
        hue: None,
        sat: None,
    };
}

/// Named colours the bot can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Purple,
    Teal,
    Orange,
}

impl Colour {
    pub fn name(self) -> &'static str {
        match self {
            Colour::Purple => "purple",
            Colour::Teal => "teal",
            Colour::Orange => "orange",
        }
    }

    fn hue(self) -> u16 {
        match self {
            Colour::Purple => HUE_PURPLE,
            Colour::Teal => HUE_TEAL,
            Colour::Orange => HUE_ORANGE,
        }
    }
}

/// Every state change the bot issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightAction {
    /// Always orange; a previous colour is not restored.
    TurnOn,
    TurnOff,
    SetColour(Colour),
}

impl LightAction {
    pub fn command(self) -> LightCommand {
        match self {
            LightAction::TurnOn => LightCommand::colour(HUE_ORANGE),
            LightAction::TurnOff => LightCommand::OFF,
            LightAction::SetColour(c) => LightCommand::colour(c.hue()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LightError {
    #[error("light request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("light body encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Applies light commands. The live implementation is [`LightClient`].
#[async_trait]
pub trait LightControl: Send + Sync {
    async fn apply(&self, command: LightCommand) -> Result<(), LightError>;
}

/// Client for the light state endpoint.
#[derive(Clone)]
pub struct LightClient {
    url: String,
    client: reqwest::Client,
}

impl LightClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LightControl for LightClient {
    /// PUT the command body. The status is logged, not checked.
    async fn apply(&self, command: LightCommand) -> Result<(), LightError> {
        let body = serde_json::to_vec(&command)?;
        let res = self
            .client
            .put(&self.url)
            .header(reqwest::header::CONTENT_TYPE, LIGHT_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        log::debug!("light: PUT {} -> {}", self.url, res.status());
        Ok(())
    }
}
