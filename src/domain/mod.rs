//! Domain types - hook identity and target state, independent of HTTP

pub mod identity;
pub mod state;

pub use identity::{HookIdentity, HookScope};
pub use state::{DesiredState, StateKind};
