//! Scripted dialogs. A dialog is a list of steps; its position lives on the
//! conversation's dialog stack so a flow can span turns.

use crate::activity::OutboundActivity;
use crate::channels::{ChannelError, TurnContext};
use crate::commands::TextCommand;
use crate::state::{ConversationState, DialogInstance};

pub const HELP_DIALOG_ID: &str = "help";

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("unknown dialog: {0}")]
    UnknownDialog(String),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// What a step asks the runner to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Run the following step now.
    Next,
    /// Stop here; resume at the following step on the next turn.
    Wait,
    /// Pop the dialog.
    End,
}

/// A single step: send something, then say how to proceed.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    SendText(fn() -> String, StepResult),
}

/// Named sequence of steps.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub id: &'static str,
    pub steps: Vec<Step>,
}

/// Dialogs available to the bot.
#[derive(Debug, Clone, Default)]
pub struct DialogSet {
    dialogs: Vec<Dialog>,
}

impl DialogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bot's dialogs: currently only help.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.add(help_dialog());
        set
    }

    pub fn add(&mut self, dialog: Dialog) {
        self.dialogs.retain(|d| d.id != dialog.id);
        self.dialogs.push(dialog);
    }

    fn find(&self, id: &str) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.id == id)
    }

    /// Push `id` on the stack and run it from its first step.
    pub async fn begin(
        &self,
        id: &str,
        state: &mut ConversationState,
        turn: &dyn TurnContext,
    ) -> Result<(), DialogError> {
        if self.find(id).is_none() {
            return Err(DialogError::UnknownDialog(id.to_string()));
        }
        state.dialog_stack.push(DialogInstance {
            id: id.to_string(),
            step: 0,
        });
        self.run(state, turn).await
    }

    /// Resume the active dialog, if any. Returns false when no dialog was active.
    pub async fn continue_active(
        &self,
        state: &mut ConversationState,
        turn: &dyn TurnContext,
    ) -> Result<bool, DialogError> {
        if state.active_dialog().is_none() {
            return Ok(false);
        }
        self.run(state, turn).await?;
        Ok(true)
    }

    async fn run(
        &self,
        state: &mut ConversationState,
        turn: &dyn TurnContext,
    ) -> Result<(), DialogError> {
        loop {
            let Some(instance) = state.dialog_stack.last_mut() else {
                return Ok(());
            };
            let dialog = self
                .find(&instance.id)
                .ok_or_else(|| DialogError::UnknownDialog(instance.id.clone()))?;
            let Some(step) = dialog.steps.get(instance.step).copied() else {
                state.dialog_stack.pop();
                return Ok(());
            };
            let result = match step {
                Step::SendText(text, result) => {
                    if let Err(e) = turn.send(OutboundActivity::text(text())).await {
                        // A failed step ends its dialog.
                        state.dialog_stack.pop();
                        return Err(e.into());
                    }
                    result
                }
            };
            if let Some(instance) = state.dialog_stack.last_mut() {
                instance.step += 1;
            }
            match result {
                StepResult::Next => continue,
                StepResult::Wait => return Ok(()),
                StepResult::End => {
                    state.dialog_stack.pop();
                    return Ok(());
                }
            }
        }
    }
}

fn help_text() -> String {
    let commands = [
        TextCommand::TurnOn,
        TextCommand::TurnOff,
        TextCommand::ChangeColour,
        TextCommand::Hello,
        TextCommand::MentionMe,
        TextCommand::Help,
    ];
    let list = commands
        .iter()
        .map(|c| format!("\"{}\"", c.prefix()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("I can look after the light for you. Try one of: {}.", list)
}

/// One step: explain the commands, then end.
pub fn help_dialog() -> Dialog {
    Dialog {
        id: HELP_DIALOG_ID,
        steps: vec![Step::SendText(help_text, StepResult::End)],
    }
}
