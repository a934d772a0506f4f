use std::time::Duration;

use bitbucket_hook::config::ConnectionConfig;
use bitbucket_hook::domain::{DesiredState, HookIdentity, StateKind};
use bitbucket_hook::http::{HttpMethod, MockTransport, RawResponse, RequestHelper, TransportError};
use bitbucket_hook::{HookController, HookError};
use serde_json::{json, Value};

const BASE: &str = "https://bitbucket.example.com";
const REPO_HOOK: &str =
    "https://bitbucket.example.com/rest/api/1.0/projects/FOO/repos/bar/settings/hooks/X";
const PROJECT_HOOK: &str = "https://bitbucket.example.com/rest/api/1.0/projects/FOO/settings/hooks/X";

fn controller(mock: &MockTransport) -> HookController<MockTransport> {
    let connection = ConnectionConfig {
        retries: 2,
        sleep: Duration::ZERO,
        ..ConnectionConfig::with_token(BASE, "abc")
    };
    HookController::new(RequestHelper::new(mock.clone(), connection))
}

fn enabled(settings: &str, identity: &HookIdentity) -> DesiredState {
    DesiredState::parse(StateKind::Enabled, Some(settings), identity).unwrap()
}

// ============================================================================
// Write path
// ============================================================================

#[test]
fn test_enable_puts_settings_then_enables() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, r#"{"key":"value"}"#));
    mock.push_response(RawResponse::new(200, r#"{"enabled":true}"#));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let (content, changed) = controller(&mock)
        .set_hook_state(&identity, &enabled(r#"{"key":"value"}"#, &identity))
        .unwrap();

    assert!(changed);
    assert_eq!(Value::Object(content), json!({"key": "value"}));

    let sent = mock.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].method, HttpMethod::Put);
    assert_eq!(sent[0].url, format!("{}/settings", REPO_HOOK));
    assert_eq!(sent[0].body.as_deref(), Some(r#"{"key":"value"}"#));
    assert_eq!(sent[1].method, HttpMethod::Put);
    assert_eq!(sent[1].url, format!("{}/enabled", REPO_HOOK));
    assert_eq!(sent[1].body, None);
}

#[test]
fn test_enable_stops_when_settings_update_fails() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(400, r#"{"errors":[]}"#));
    mock.push_response(RawResponse::new(200, "{}"));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &enabled("{}", &identity))
        .unwrap_err();

    assert_eq!(mock.requests().len(), 1);
    match err {
        HookError::Http { action, info, .. } => {
            assert_eq!(action, "update hook setting");
            assert!(info.contains("status=400"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_enable_reports_failure_of_enable_call() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, "{}"));
    mock.push_response(RawResponse::new(401, ""));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &enabled("{}", &identity))
        .unwrap_err();

    assert_eq!(mock.requests().len(), 2);
    assert!(matches!(err, HookError::Permission { .. }));
}

#[test]
fn test_enable_project_hook_uses_project_endpoints() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, "{}"));
    mock.push_response(RawResponse::new(200, "{}"));
    let identity = HookIdentity::new("FOO", "", "X");

    controller(&mock)
        .set_hook_state(&identity, &enabled("{}", &identity))
        .unwrap();

    let urls: Vec<String> = mock.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/settings", PROJECT_HOOK),
            format!("{}/enabled", PROJECT_HOOK)
        ]
    );
}

#[test]
fn test_unauthorized_project_hook_names_project() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(401, ""));
    let identity = HookIdentity::new("FOO", "", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &DesiredState::Disabled)
        .unwrap_err();

    assert_eq!(mock.requests().len(), 1);
    assert!(matches!(err, HookError::Permission { ref project_key, .. } if project_key == "FOO"));
    let msg = err.to_string();
    assert!(msg.contains("`FOO` project"), "message: {}", msg);
}

#[test]
fn test_disable_deletes_enabled() {
    for status in [200, 201] {
        let mock = MockTransport::new();
        mock.push_response(RawResponse::new(status, r#"{"enabled":false}"#));
        let identity = HookIdentity::new("FOO", "bar", "X");

        let (content, changed) = controller(&mock)
            .set_hook_state(&identity, &DesiredState::Disabled)
            .unwrap();

        assert!(changed);
        assert_eq!(Value::Object(content), json!({"enabled": false}));
        let sent = mock.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert_eq!(sent[0].url, format!("{}/enabled", REPO_HOOK));
    }
}

#[test]
fn test_inherited_deletes_repository_hook() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, ""));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let (content, changed) = controller(&mock)
        .set_hook_state(&identity, &DesiredState::Inherited)
        .unwrap();

    assert!(changed);
    assert!(content.is_empty());
    let sent = mock.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, HttpMethod::Delete);
    assert_eq!(sent[0].url, REPO_HOOK);
}

#[test]
fn test_inherited_without_repository_makes_no_calls() {
    let mock = MockTransport::new();
    let identity = HookIdentity::new("FOO", "", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &DesiredState::Inherited)
        .unwrap_err();

    assert!(err.is_config());
    assert!(mock.requests().is_empty());
}

#[test]
fn test_not_found_mentions_identity() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(404, r#"{"errors":[]}"#));
    mock.push_response(RawResponse::new(200, "{}"));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &enabled("{}", &identity))
        .unwrap_err();

    assert_eq!(mock.requests().len(), 1);
    let msg = err.to_string();
    assert!(msg.contains("FOO"));
    assert!(msg.contains("bar"));
}

#[test]
fn test_transport_exhaustion_is_reported_as_transport_error() {
    let mock = MockTransport::new();
    for _ in 0..3 {
        mock.push_error(TransportError::retryable("connection refused"));
    }
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock)
        .set_hook_state(&identity, &DesiredState::Disabled)
        .unwrap_err();

    assert!(matches!(err, HookError::Transport { attempts: 3, .. }));
    assert_eq!(mock.requests().len(), 3);
}

#[test]
fn test_transient_failures_recovered_within_retries() {
    let mock = MockTransport::new();
    mock.push_error(TransportError::retryable("connection reset"));
    mock.push_error(TransportError::retryable("connection reset"));
    mock.push_response(RawResponse::new(200, "{}"));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let (content, changed) = controller(&mock)
        .set_hook_state(&identity, &DesiredState::Disabled)
        .unwrap();

    assert!(changed);
    assert!(content.is_empty());
    assert_eq!(mock.requests().len(), 3);
}

// ============================================================================
// Read path
// ============================================================================

#[test]
fn test_read_enabled_hook() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(
        200,
        r#"{"enabled": true, "details": {"key": "X"}}"#,
    ));
    mock.push_response(RawResponse::new(200, r#"{"foo":"bar"}"#));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let (settings, is_enabled) = controller(&mock).get_hook_state(&identity).unwrap();

    assert!(is_enabled);
    assert_eq!(Value::Object(settings), json!({"foo": "bar"}));
    let sent = mock.requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].method, HttpMethod::Get);
    assert_eq!(sent[0].url, REPO_HOOK);
    assert_eq!(sent[1].method, HttpMethod::Get);
    assert_eq!(sent[1].url, format!("{}/settings", REPO_HOOK));
}

#[test]
fn test_read_project_hook_missing_enabled_flag() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, r#"{"details": {}}"#));
    mock.push_response(RawResponse::new(200, ""));
    let identity = HookIdentity::new("FOO", "", "X");

    let (settings, is_enabled) = controller(&mock).get_hook_state(&identity).unwrap();

    assert!(!is_enabled);
    assert!(settings.is_empty());
    assert_eq!(mock.requests()[0].url, PROJECT_HOOK);
}

#[test]
fn test_read_skips_settings_when_hook_missing() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(404, ""));
    mock.push_response(RawResponse::new(200, r#"{"foo":"bar"}"#));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock).get_hook_state(&identity).unwrap_err();

    assert_eq!(mock.requests().len(), 1);
    assert!(matches!(err, HookError::NotFound { .. }));
}

#[test]
fn test_read_classifies_settings_call() {
    let mock = MockTransport::new();
    mock.push_response(RawResponse::new(200, r#"{"enabled": true}"#));
    mock.push_response(RawResponse::new(500, "oops"));
    let identity = HookIdentity::new("FOO", "bar", "X");

    let err = controller(&mock).get_hook_state(&identity).unwrap_err();

    match err {
        HookError::Http { info, .. } => assert!(info.contains("status=500")),
        other => panic!("unexpected error {:?}", other),
    }
}
