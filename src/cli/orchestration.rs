//! Command workflows
//!
//! Glue between parsed command-line arguments and the hook controller. The
//! argument structs here carry no clap types, so workflows can be driven
//! programmatically and tested over a [crate::http::MockTransport].

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ConnectionConfig;
use crate::controller::HookController;
use crate::domain::{DesiredState, HookIdentity, StateKind};
use crate::error::Result;
use crate::http::{ReqwestTransport, RequestHelper, Transport};

/// Arguments for reading a hook
#[derive(Debug, Clone, PartialEq)]
pub struct InfoArgs {
    pub project_key: String,
    /// Empty for a project-level hook
    pub repository: String,
    pub hook_id: String,
}

/// Arguments for changing a hook's state
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyArgs {
    pub project_key: String,
    /// Empty for a project-level hook
    pub repository: String,
    pub hook_id: String,
    pub state: StateKind,
    /// Raw JSON object, required when `state` is enabled
    pub settings: Option<String>,
    /// Report the expected change without calling the server
    pub check_mode: bool,
}

/// Result of the read workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookInfoReport {
    pub changed: bool,
    pub project_key: String,
    pub repository: String,
    pub hook_id: String,
    pub enabled: bool,
    pub json: Map<String, Value>,
}

/// Result of the apply workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookApplyReport {
    pub changed: bool,
    pub project_key: String,
    pub repository: String,
    pub hook_id: String,
    pub state: String,
    pub json: Map<String, Value>,
}

/// Controller over the real HTTP transport
pub fn build_controller(connection: ConnectionConfig) -> Result<HookController<ReqwestTransport>> {
    let transport = ReqwestTransport::new(&connection)?;
    Ok(HookController::new(RequestHelper::new(transport, connection)))
}

/// Read a hook's settings and enabled flag
pub fn run_info<T: Transport>(
    controller: &HookController<T>,
    args: &InfoArgs,
) -> Result<HookInfoReport> {
    let identity = HookIdentity::new(&args.project_key, &args.repository, &args.hook_id);
    let (json, enabled) = controller.get_hook_state(&identity)?;

    Ok(HookInfoReport {
        changed: false,
        project_key: identity.project_key,
        repository: identity.repository,
        hook_id: identity.hook_id,
        enabled,
        json,
    })
}

/// Apply the requested hook state.
///
/// Input is validated before anything is sent, in check mode too. In check
/// mode no request is made and the change is reported as likely.
pub fn run_apply<T: Transport>(
    controller: &HookController<T>,
    args: &ApplyArgs,
) -> Result<HookApplyReport> {
    let identity = HookIdentity::new(&args.project_key, &args.repository, &args.hook_id);
    let desired = DesiredState::parse(args.state, args.settings.as_deref(), &identity)?;

    let (json, changed) = if args.check_mode {
        tracing::info!(state = %desired.kind(), "Check mode, skipping requests");
        (Map::new(), true)
    } else {
        controller.set_hook_state(&identity, &desired)?
    };

    Ok(HookApplyReport {
        changed,
        project_key: identity.project_key,
        repository: identity.repository,
        hook_id: identity.hook_id,
        state: desired.kind().to_string(),
        json,
    })
}
