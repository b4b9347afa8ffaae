//! Chat channel: the turn interface the router talks to, and the Bot Framework
//! connector that backs it in production.
//!
//! Replies and deletions go out through the connector REST API at the activity's
//! `serviceUrl`, authenticated with an app-credential token when configured.

mod auth;
mod connector;
mod turn;

pub use auth::{TokenProvider, BOT_FRAMEWORK_TOKEN_ENDPOINT};
pub use connector::{ConnectorClient, ConnectorTurn};
pub use turn::TurnContext;

/// Errors from connector and token calls.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("connector request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("connector api error: {0}")]
    Api(String),
    #[error("activity has no serviceUrl")]
    MissingServiceUrl,
    #[error("invalid serviceUrl: {0}")]
    InvalidServiceUrl(String),
    #[error("token request failed: {0}")]
    Token(String),
}
