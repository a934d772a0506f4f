/// Which endpoint family a hook lives under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookScope {
    /// Hook configured on a single repository
    RepositoryScoped,
    /// Hook configured on a project, inherited by its repositories
    ProjectScoped,
}

/// Identifies one hook on the server
///
/// An empty repository slug means the hook is configured at project level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookIdentity {
    pub project_key: String,
    pub repository: String,
    pub hook_id: String,
}

impl HookIdentity {
    /// Create a new hook identity
    pub fn new(
        project_key: impl Into<String>,
        repository: impl Into<String>,
        hook_id: impl Into<String>,
    ) -> Self {
        HookIdentity {
            project_key: project_key.into(),
            repository: repository.into(),
            hook_id: hook_id.into(),
        }
    }

    /// Select the endpoint family for this hook
    pub fn scope(&self) -> HookScope {
        if self.repository.is_empty() {
            HookScope::ProjectScoped
        } else {
            HookScope::RepositoryScoped
        }
    }
}
