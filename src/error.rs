use thiserror::Error;

/// Unified error type for bitbucket-hook operations
#[derive(Error, Debug)]
pub enum HookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Endpoint error: {0}")]
    Endpoint(String),

    #[error("Transport failure for {url} after {attempts} attempt(s): {message}")]
    Transport {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error(
        "The currently authenticated user has insufficient permissions to read {}.",
        permission_target(.project_key, .repository)
    )]
    Permission {
        project_key: String,
        repository: String,
    },

    #[error("Project `{project_key}` or repository `{repository}` does not exist.")]
    NotFound {
        project_key: String,
        repository: String,
    },

    #[error("Failed to {action} for projectKey `{project_key}` and repositorySlug `{repository}`: {info}")]
    Http {
        action: String,
        project_key: String,
        repository: String,
        info: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Names the repository, or the project for a project-level hook
fn permission_target(project_key: &str, repository: &str) -> String {
    if repository.is_empty() {
        format!("`{}` project", project_key)
    } else {
        format!("`{}` repository", repository)
    }
}

/// Convenience type alias for Results in bitbucket-hook
pub type Result<T> = std::result::Result<T, HookError>;

impl HookError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        HookError::Config(msg.into())
    }

    /// Create an endpoint templating error with context
    pub fn endpoint(msg: impl Into<String>) -> Self {
        HookError::Endpoint(msg.into())
    }

    /// True for errors raised before any request was sent
    pub fn is_config(&self) -> bool {
        matches!(self, HookError::Config(_))
    }
}
