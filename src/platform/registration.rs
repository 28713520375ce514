//! Start-screen flow: at most one registration in flight per page

/// Where the page is in getting a player id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Registration {
    #[default]
    Unregistered,
    /// Request sent, no answer yet
    Pending,
    Registered,
}

/// What a press of Start should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    /// Send a registration request
    Register,
    /// Already have a player; ask for the level config again
    RetryLevel,
    /// A request is already in flight
    Wait,
}

impl Registration {
    /// Decide what Start does and move to `Pending` when registering
    pub fn on_start(&mut self) -> StartAction {
        match self {
            Registration::Unregistered => {
                *self = Registration::Pending;
                StartAction::Register
            }
            Registration::Pending => StartAction::Wait,
            Registration::Registered => StartAction::RetryLevel,
        }
    }

    /// Record the registration response
    pub fn finished(&mut self, ok: bool) {
        *self = if ok {
            Registration::Registered
        } else {
            Registration::Unregistered
        };
    }
}

/// Keys that submit the name field
pub fn is_submit_key(code: &str) -> bool {
    matches!(code, "Enter" | "NumpadEnter")
}
