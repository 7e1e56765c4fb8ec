//! HTTP backend against a local mock server
//!
//! Real clock: paused time would fire reqwest timeouts while the runtime
//! waits on sockets.

mod common;

use common::fixtures::{button, make_generic_form, make_merge_form};
use common::recording::{RecordingNotifier, RecordingSurface, ScriptedPrompt};
use mockito::{Matcher, Server};
use playlist_ajax::backend::{Backend, COMPARE_PATH, HttpBackend, REQUESTED_WITH};
use playlist_ajax::error::Error;
use playlist_ajax::listing::PlaylistIndex;
use playlist_ajax::settings::{Settings, Timings};
use playlist_ajax::submit::{CompareButton, CompareOutcome, Outcome, SubmissionController};
use playlist_ajax::types::{ControlId, Field, FormDescriptor, HttpMethod, JobHandle, JobStatus};
use playlist_ajax::ui::Severity;
use serde_json::json;
use std::sync::Arc;
use url::Url;

fn backend_for(server: &Server) -> HttpBackend {
    let settings = Settings::new(Url::parse(&server.url()).unwrap());
    HttpBackend::new(&settings).unwrap()
}

#[tokio::test]
async fn test_submit_posts_form_with_ajax_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/merge")
        .match_header("x-requested-with", REQUESTED_WITH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("name".into(), "Road Mix".into()),
            Matcher::UrlEncoded("playlist".into(), "p1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"message":"Merged"}"#)
        .create_async()
        .await;

    let backend = backend_for(&server);
    let response = backend
        .submit(&make_merge_form(&["p1"], "Road Mix"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body, r#"{"message":"Merged"}"#);
}

#[tokio::test]
async fn test_get_form_sends_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".into(), "lofi beats".into()))
        .with_status(200)
        .create_async()
        .await;

    let form = FormDescriptor::new("/search")
        .with_method(HttpMethod::Get)
        .with_field(Field::text("q", "lofi beats"));
    let response = backend_for(&server).submit(&form).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_non_success_submission_is_not_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/save_queue")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let response = backend_for(&server)
        .submit(&make_generic_form("queue_name", "Later"))
        .await
        .unwrap();

    assert_eq!(response.status, 500);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_fetch_progress_parses_snapshot() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/clean_progress/job-1")
        .match_header("x-requested-with", REQUESTED_WITH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true,"status":"running","processed":3,"total":10}"#)
        .create_async()
        .await;

    let snap = backend_for(&server)
        .fetch_progress(&JobHandle::new("job-1"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(snap.ok);
    assert_eq!(snap.status, JobStatus::Running);
    assert_eq!((snap.processed, snap.total), (3, 10));
}

#[tokio::test]
async fn test_fetch_progress_tolerates_loose_counts() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/clean_progress/nulls")
        .with_status(200)
        .with_body(r#"{"ok":true,"status":"running","processed":null,"total":null}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/clean_progress/floats")
        .with_status(200)
        .with_body(r#"{"ok":true,"status":"running","processed":5.0,"total":10}"#)
        .create_async()
        .await;
    let backend = backend_for(&server);

    let nulls = backend
        .fetch_progress(&JobHandle::new("nulls"))
        .await
        .unwrap();
    let floats = backend
        .fetch_progress(&JobHandle::new("floats"))
        .await
        .unwrap();

    assert_eq!(nulls.status, JobStatus::Running);
    assert_eq!((nulls.processed, nulls.total), (0, 0));
    assert_eq!((floats.processed, floats.total), (5, 10));
}

#[tokio::test]
async fn test_fetch_progress_http_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/clean_progress/gone")
        .with_status(404)
        .create_async()
        .await;

    let err = backend_for(&server)
        .fetch_progress(&JobHandle::new("gone"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus(404)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_fetch_progress_bad_json() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/clean_progress/x")
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let err = backend_for(&server)
        .fetch_progress(&JobHandle::new("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_session_cookie_travels_with_polls() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/clean")
        .with_status(200)
        .with_header("set-cookie", "session=s3cr3t; Path=/")
        .with_body(r#"{"task_id":"abc"}"#)
        .create_async()
        .await;
    let poll = server
        .mock("GET", "/clean_progress/abc")
        .match_header("cookie", Matcher::Regex("session=s3cr3t".into()))
        .with_status(200)
        .with_body(r#"{"ok":true,"status":"done","processed":4,"total":4}"#)
        .create_async()
        .await;

    let backend = backend_for(&server);
    backend
        .submit(&FormDescriptor::new("/clean"))
        .await
        .unwrap();
    let snap = backend.fetch_progress(&JobHandle::new("abc")).await.unwrap();

    poll.assert_async().await;
    assert_eq!(snap.status, JobStatus::Done);
}

#[tokio::test]
async fn test_compare_posts_json_user() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", COMPARE_PATH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"compare_user": "alice"})))
        .with_status(200)
        .with_body(r#"{"ok":true,"url":"/compare/result/1"}"#)
        .create_async()
        .await;

    let controller = SubmissionController::new(
        Arc::new(backend_for(&server)),
        Arc::new(RecordingNotifier::default()),
        Arc::new(RecordingSurface::default()),
        Arc::new(ScriptedPrompt::default()),
        PlaylistIndex::default(),
        Timings::default(),
    );
    let mut cmp = CompareButton::new(ControlId::new("compare_btn"));
    let outcome = controller.compare(&mut cmp, "alice").await;

    mock.assert_async().await;
    assert_eq!(outcome, CompareOutcome::Ready("/compare/result/1".to_string()));
    assert_eq!(cmp.result_url(), Some("/compare/result/1"));
}

#[tokio::test]
async fn test_controller_over_http_tracks_job() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/save_queue")
        .with_status(200)
        .with_body(r#"{"task_id":"q1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/clean_progress/q1")
        .with_status(200)
        .with_body(r#"{"ok":true,"status":"done","message":"Queue saved"}"#)
        .create_async()
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let surface = Arc::new(RecordingSurface::default());
    let controller = SubmissionController::new(
        Arc::new(backend_for(&server)),
        notifier.clone(),
        surface.clone(),
        Arc::new(ScriptedPrompt::default()),
        PlaylistIndex::default(),
        Timings::default(),
    );

    let mut form = make_generic_form("queue_name", "Later");
    let Outcome::Tracking(tracker) = controller.submit(&mut form).await else {
        panic!("expected tracking");
    };
    let resolution = tracker.wait().await;

    assert_eq!(resolution.message, "Queue saved");
    assert_eq!(resolution.severity, Severity::Success);
    assert_eq!(notifier.messages(), vec!["Queue saved"]);
    assert_eq!(surface.busy(&button()), Some(false));
}
