//! Status-code classification shared by the read and write paths.

use serde_json::{Map, Value};

use crate::domain::HookIdentity;
use crate::error::{HookError, Result};
use crate::http::{Response, RETRIES_KEY};

/// Whether a status counts as success
pub fn is_success(status: i32) -> bool {
    matches!(status, 200 | 201)
}

/// Turn the decisive response of an operation into content or an error.
///
/// Rules are checked in order and the first match wins:
/// 200/201 success, 401 permission, 404 not found, anything else failure.
/// `action` names the operation in the catch-all message.
pub fn classify(
    response: Response,
    identity: &HookIdentity,
    action: &str,
) -> Result<Map<String, Value>> {
    let Response { info, mut content } = response;

    match info.status {
        status if is_success(status) => {
            content.remove(RETRIES_KEY);
            Ok(content)
        }
        401 => Err(HookError::Permission {
            project_key: identity.project_key.clone(),
            repository: identity.repository.clone(),
        }),
        404 => Err(HookError::NotFound {
            project_key: identity.project_key.clone(),
            repository: identity.repository.clone(),
        }),
        _ => Err(HookError::Http {
            action: action.to_string(),
            project_key: identity.project_key.clone(),
            repository: identity.repository.clone(),
            info: info.to_string(),
        }),
    }
}
