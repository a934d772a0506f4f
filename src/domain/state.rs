use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::domain::HookIdentity;
use crate::error::{HookError, Result};

/// Target state names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateKind {
    #[default]
    Enabled,
    Disabled,
    Inherited,
}

impl StateKind {
    /// Get the state name as a string
    pub fn name(&self) -> &'static str {
        match self {
            StateKind::Enabled => "enabled",
            StateKind::Disabled => "disabled",
            StateKind::Inherited => "inherited",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StateKind {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "enabled" => Ok(StateKind::Enabled),
            "disabled" => Ok(StateKind::Disabled),
            "inherited" => Ok(StateKind::Inherited),
            other => Err(HookError::config(format!(
                "Unknown state `{}` (expected enabled, disabled or inherited)",
                other
            ))),
        }
    }
}

/// The state a hook should end up in
///
/// Only `Enabled` carries a settings payload; the server needs it to
/// configure the hook before switching it on.
#[derive(Debug, Clone, PartialEq)]
pub enum DesiredState {
    Enabled { settings: Map<String, Value> },
    Disabled,
    Inherited,
}

impl DesiredState {
    /// Build a desired state from its name and the raw settings string.
    ///
    /// All checks here run before any request is sent:
    /// - `enabled` needs `settings` to parse as a JSON object
    /// - `inherited` needs a repository slug on `identity`
    pub fn parse(kind: StateKind, settings: Option<&str>, identity: &HookIdentity) -> Result<Self> {
        match kind {
            StateKind::Enabled => Ok(DesiredState::Enabled {
                settings: parse_settings(settings.unwrap_or(""))?,
            }),
            StateKind::Disabled => Ok(DesiredState::Disabled),
            StateKind::Inherited => {
                if identity.repository.is_empty() {
                    return Err(HookError::config(
                        "Cannot use state `inherited` when repository is not set.",
                    ));
                }
                Ok(DesiredState::Inherited)
            }
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            DesiredState::Enabled { .. } => StateKind::Enabled,
            DesiredState::Disabled => StateKind::Disabled,
            DesiredState::Inherited => StateKind::Inherited,
        }
    }
}

/// Parse a settings payload, accepting only a JSON object.
pub fn parse_settings(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(HookError::config(
            "settings parameter does not provide a valid JSON formatted string.",
        )),
        Err(e) => Err(HookError::config(format!(
            "settings parameter does not provide a valid JSON formatted string. ({})",
            e
        ))),
    }
}
