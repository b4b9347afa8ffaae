//! Maze Robo core library: activity model, router, light client, connector
//! channel, conversation state and the HTTP gateway used by the CLI.

pub mod activity;
pub mod bot;
pub mod cards;
pub mod channels;
pub mod commands;
pub mod config;
pub mod dialogs;
pub mod gateway;
pub mod init;
pub mod light;
pub mod state;
