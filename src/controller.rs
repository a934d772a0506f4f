//! Hook state transitions on top of the request helper.
//!
//! Each operation picks the endpoint family once from the hook identity and
//! issues at most two strictly sequential calls. The decisive response of the
//! sequence is classified by [crate::classify::classify].

use serde_json::{Map, Value};

use crate::classify::classify;
use crate::domain::{DesiredState, HookIdentity, HookScope};
use crate::endpoint::{hook_url, HookResource};
use crate::error::{HookError, Result};
use crate::http::{HttpMethod, RequestHelper, Transport};

/// Reads and applies hook state on a Bitbucket server
pub struct HookController<T: Transport> {
    helper: RequestHelper<T>,
}

impl<T: Transport> HookController<T> {
    pub fn new(helper: RequestHelper<T>) -> Self {
        HookController { helper }
    }

    fn url(
        &self,
        identity: &HookIdentity,
        scope: HookScope,
        resource: HookResource,
    ) -> Result<String> {
        hook_url(&self.helper.connection().base_url, identity, scope, resource)
    }

    /// Fetch a hook's settings and whether it is enabled.
    ///
    /// The `/settings` call is only made when the hook itself was found
    /// (status 200); otherwise the first response is classified.
    pub fn get_hook_state(&self, identity: &HookIdentity) -> Result<(Map<String, Value>, bool)> {
        let scope = identity.scope();
        tracing::info!(
            project = %identity.project_key,
            repository = %identity.repository,
            hook = %identity.hook_id,
            endpoint = scope.endpoint_key(),
            "Reading hook state"
        );

        let mut enabled = false;
        let mut response = self.helper.request(
            &self.url(identity, scope, HookResource::Base)?,
            HttpMethod::Get,
            None,
        )?;

        if response.info.status == 200 {
            enabled = response
                .content
                .get("enabled")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            response = self.helper.request(
                &self.url(identity, scope, HookResource::Settings)?,
                HttpMethod::Get,
                None,
            )?;
        }

        let settings = classify(response, identity, "retrieve hook data")?;
        Ok((settings, enabled))
    }

    /// Drive a hook to `desired`.
    ///
    /// - enabled: PUT `/settings`, then PUT `/enabled`; stops after the first
    ///   call if it is not successful
    /// - disabled: DELETE `/enabled`
    /// - inherited: DELETE the repository-level hook
    ///
    /// # Returns
    /// * `Ok((content, true))` - Server content of the state change
    /// * `Err` - The first failing call, classified
    pub fn set_hook_state(
        &self,
        identity: &HookIdentity,
        desired: &DesiredState,
    ) -> Result<(Map<String, Value>, bool)> {
        let scope = identity.scope();
        tracing::info!(
            project = %identity.project_key,
            repository = %identity.repository,
            hook = %identity.hook_id,
            endpoint = scope.endpoint_key(),
            state = %desired.kind(),
            "Applying hook state"
        );

        let content = match desired {
            DesiredState::Enabled { settings } => {
                let configured = self.helper.request(
                    &self.url(identity, scope, HookResource::Settings)?,
                    HttpMethod::Put,
                    Some(settings),
                )?;
                let content = classify(configured, identity, "update hook setting")?;

                let switched = self.helper.request(
                    &self.url(identity, scope, HookResource::Enabled)?,
                    HttpMethod::Put,
                    None,
                )?;
                classify(switched, identity, "enable hook")?;

                content
            }
            DesiredState::Disabled => {
                let response = self.helper.request(
                    &self.url(identity, scope, HookResource::Enabled)?,
                    HttpMethod::Delete,
                    None,
                )?;
                classify(response, identity, "disable hook")?
            }
            DesiredState::Inherited => {
                if scope == HookScope::ProjectScoped {
                    return Err(HookError::config(
                        "Cannot use state `inherited` when repository is not set.",
                    ));
                }
                let response = self.helper.request(
                    &self.url(identity, HookScope::RepositoryScoped, HookResource::Base)?,
                    HttpMethod::Delete,
                    None,
                )?;
                classify(response, identity, "reset hook to inherited")?
            }
        };

        Ok((content, true))
    }
}
