//! Interaction state machine.
//!
//! Exactly one of idle, a success notice, an error notice or the edit form is
//! active. Entering any state replaces whatever was active before.

use tracing::debug;

use crate::types::Agent;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    ShowingSuccess(String),
    ShowingError(String),
    /// Edit form open on a snapshot of the selected record
    Editing(Box<Agent>),
}

impl InteractionState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Text of the visible notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::ShowingSuccess(message) | Self::ShowingError(message) => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn editing(&self) -> Option<&Agent> {
        match self {
            Self::Editing(agent) => Some(agent.as_ref()),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ShowingSuccess(_) => "success",
            Self::ShowingError(_) => "error",
            Self::Editing(_) => "editing",
        }
    }
}

#[derive(Debug, Default)]
pub struct InteractionMachine {
    state: InteractionState,
}

impl InteractionMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    fn enter(&mut self, next: InteractionState) {
        debug!(from = self.state.name(), to = next.name(), "interaction transition");
        self.state = next;
    }

    /// Any state → success notice.
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.enter(InteractionState::ShowingSuccess(message.into()));
    }

    /// Any state → error notice.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.enter(InteractionState::ShowingError(message.into()));
    }

    /// Open the edit form on a copy of `agent`. A visible notice is closed;
    /// an open form is re-targeted.
    pub fn begin_edit(&mut self, agent: Agent) {
        self.enter(InteractionState::Editing(Box::new(agent)));
    }

    /// Editing → idle. Returns false when no form was open.
    pub fn cancel_edit(&mut self) -> bool {
        if matches!(self.state, InteractionState::Editing(_)) {
            self.enter(InteractionState::Idle);
            true
        } else {
            false
        }
    }

    /// Notice → idle. Returns false when no notice was visible.
    pub fn dismiss(&mut self) -> bool {
        if self.state.notice().is_some() {
            self.enter(InteractionState::Idle);
            true
        } else {
            false
        }
    }
}
