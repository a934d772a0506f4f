//! REST endpoint templates for hook resources.
//!
//! Templates use `{name}` placeholders. Rendering is a single pass over the
//! template: substituted values are copied verbatim and never re-scanned, and
//! a placeholder without a value is an error, so a rendered URL can never
//! carry an unresolved placeholder.

use crate::domain::{HookIdentity, HookScope};
use crate::error::{HookError, Result};

/// Repository-level hook resource
pub const HOOK: &str =
    "{url}/rest/api/1.0/projects/{projectKey}/repos/{repositorySlug}/settings/hooks/{hookId}";

/// Project-level hook resource
pub const HOOK_PROJECT: &str = "{url}/rest/api/1.0/projects/{projectKey}/settings/hooks/{hookId}";

/// Sub-resource of a hook endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResource {
    /// The hook itself (`GET` for details, `DELETE` to drop a repository override)
    Base,
    /// `/settings`
    Settings,
    /// `/enabled`
    Enabled,
}

impl HookResource {
    fn suffix(&self) -> &'static str {
        match self {
            HookResource::Base => "",
            HookResource::Settings => "/settings",
            HookResource::Enabled => "/enabled",
        }
    }
}

impl HookScope {
    /// Endpoint key, as named in the server's REST documentation
    pub fn endpoint_key(&self) -> &'static str {
        match self {
            HookScope::RepositoryScoped => "hook",
            HookScope::ProjectScoped => "hook-project",
        }
    }

    /// URL template of the base hook resource in this family
    pub fn template(&self) -> &'static str {
        match self {
            HookScope::RepositoryScoped => HOOK,
            HookScope::ProjectScoped => HOOK_PROJECT,
        }
    }
}

/// Build the URL of a hook resource.
///
/// An empty `base_url` yields a host-less path. A trailing `/` on `base_url`
/// is dropped so paths are never doubled.
pub fn hook_url(
    base_url: &str,
    identity: &HookIdentity,
    scope: HookScope,
    resource: HookResource,
) -> Result<String> {
    let template = format!("{}{}", scope.template(), resource.suffix());
    let base = base_url.trim_end_matches('/');

    render(&template, |name| match name {
        "url" => Some(base),
        "projectKey" => Some(identity.project_key.as_str()),
        "repositorySlug" => Some(identity.repository.as_str()),
        "hookId" => Some(identity.hook_id.as_str()),
        _ => None,
    })
}

/// Substitute every `{name}` in `template` using `lookup`.
pub fn render<'a, F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            HookError::endpoint(format!("Unterminated placeholder in template `{}`", template))
        })?;
        let name = &after[..end];
        let value = lookup(name).ok_or_else(|| {
            HookError::endpoint(format!(
                "No value for placeholder `{{{}}}` in template `{}`",
                name, template
            ))
        })?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}
