//! Gateway: HTTP endpoint the chat connector POSTs activities to.
//!
//! Single port serves the messages endpoint and a health probe. Activities are
//! queued and routed one at a time by a processor task.

mod server;

pub use server::{messages_route, run_gateway};
