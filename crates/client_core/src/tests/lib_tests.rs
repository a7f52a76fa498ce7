use super::*;
use crate::test_support::{spawn_mock_server, two_envelopes, StubApi, TWO_ENVELOPES_JSON};
use axum::http::StatusCode;
use std::time::Duration;

fn http_challenge(url: &str) -> (EnvelopeChallenge<HttpEnvelopeApi>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let api = HttpEnvelopeApi::new(url, Duration::from_secs(5)).expect("api");
    (EnvelopeChallenge::new(api, notifier.clone()), notifier)
}

fn stub_challenge(api: StubApi) -> (EnvelopeChallenge<StubApi>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    (EnvelopeChallenge::new(api, notifier.clone()), notifier)
}

fn fill_alice<A: EnvelopeApi>(challenge: &mut EnvelopeChallenge<A>) {
    challenge.update_field(Field::Name, "Alice");
    challenge.update_field(Field::Email, "alice@example.com");
    challenge.update_field(Field::Address, "1 Main St");
}

#[tokio::test]
async fn sponsoring_an_envelope_posts_exact_body_and_resets_form() {
    let server = spawn_mock_server(StatusCode::OK, TWO_ENVELOPES_JSON).await;
    let (mut challenge, notifier) = http_challenge(&server.url);

    challenge.mount().await;
    assert_eq!(challenge.envelopes(), two_envelopes().as_slice());

    challenge.select(EnvelopeNumber(1)).expect("select");
    fill_alice(&mut challenge);
    let outcome = challenge.submit().await.expect("submit");

    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(
        server.state.posts().await,
        vec![
            r#"{"envelopeNumber":1,"name":"Alice","email":"alice@example.com","address":"1 Main St"}"#
                .to_string()
        ]
    );
    let form = &challenge.state().form;
    assert_eq!(form.phase(), FormPhase::Idle);
    assert!(form.selected().is_none());
    for field in Field::ALL {
        assert_eq!(form.field(field), "");
    }

    let notices = notifier.snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, "Thank you for your sponsorship!");
}

#[tokio::test]
async fn server_error_keeps_selection_and_fields_for_retry() {
    let server = spawn_mock_server(StatusCode::OK, TWO_ENVELOPES_JSON).await;
    server
        .state
        .set_sponsor_status(StatusCode::INTERNAL_SERVER_ERROR)
        .await;
    let (mut challenge, notifier) = http_challenge(&server.url);

    challenge.mount().await;
    challenge.select(EnvelopeNumber(1)).expect("select");
    fill_alice(&mut challenge);
    let outcome = challenge.submit().await.expect("submit");

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected(ClientError::Status { status: 500 })
    );
    assert_eq!(server.state.posts().await.len(), 1);
    let form = &challenge.state().form;
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.selected().map(|e| e.number), Some(EnvelopeNumber(1)));
    assert_eq!(form.field(Field::Name), "Alice");
    assert_eq!(form.field(Field::Email), "alice@example.com");
    assert_eq!(form.field(Field::Address), "1 Main St");

    let notices = notifier.snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Failure);
    assert_eq!(
        notices[0].message,
        "There was an error sponsoring the envelope. Please try again."
    );
}

#[tokio::test]
async fn retry_after_failure_submits_the_same_draft() {
    let server = spawn_mock_server(StatusCode::OK, TWO_ENVELOPES_JSON).await;
    server.state.set_sponsor_status(StatusCode::CONFLICT).await;
    let (mut challenge, notifier) = http_challenge(&server.url);

    challenge.mount().await;
    challenge.select(EnvelopeNumber(2)).expect("select");
    fill_alice(&mut challenge);
    challenge.submit().await.expect("first submit");

    server.state.set_sponsor_status(StatusCode::CREATED).await;
    let outcome = challenge.submit().await.expect("second submit");

    assert_eq!(outcome, SubmitOutcome::Accepted);
    let posts = server.state.posts().await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0], posts[1]);
    let kinds: Vec<_> = notifier.snapshot().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NoticeKind::Failure, NoticeKind::Success]);
}

#[tokio::test]
async fn catalog_is_fetched_once_per_mount() {
    let server = spawn_mock_server(StatusCode::OK, TWO_ENVELOPES_JSON).await;
    let (mut challenge, _notifier) = http_challenge(&server.url);

    challenge.mount().await;
    challenge.mount().await;

    assert_eq!(server.state.catalog_hits(), 1);
    assert_eq!(challenge.state().catalog.status(), &CatalogStatus::Loaded);
}

#[tokio::test]
async fn catalog_failure_is_silent_and_leaves_catalog_empty() {
    let server = spawn_mock_server(StatusCode::SERVICE_UNAVAILABLE, "").await;
    let (mut challenge, notifier) = http_challenge(&server.url);

    challenge.mount().await;

    assert!(challenge.envelopes().is_empty());
    assert_eq!(
        challenge.state().catalog.status(),
        &CatalogStatus::Failed(ClientError::Status { status: 503 })
    );
    assert!(notifier.snapshot().is_empty());
}

#[tokio::test]
async fn malformed_catalog_is_reported_as_malformed_response() {
    let server = spawn_mock_server(StatusCode::OK, r#"{"envelopes":[]}"#).await;
    let (mut challenge, _notifier) = http_challenge(&server.url);

    challenge.mount().await;

    assert!(challenge.envelopes().is_empty());
    assert!(matches!(
        challenge.state().catalog.status(),
        CatalogStatus::Failed(ClientError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn switching_envelopes_keeps_entered_fields() {
    let (mut challenge, _notifier) = stub_challenge(StubApi::with_catalog(two_envelopes()));
    challenge.mount().await;

    challenge.select(EnvelopeNumber(1)).expect("select first");
    fill_alice(&mut challenge);
    assert!(challenge.select(EnvelopeNumber(2)).expect("select second"));

    let form = &challenge.state().form;
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.selected().map(|e| e.number), Some(EnvelopeNumber(2)));
    assert_eq!(form.field(Field::Name), "Alice");
    assert_eq!(form.field(Field::Email), "alice@example.com");
    assert_eq!(form.field(Field::Address), "1 Main St");
}

#[tokio::test]
async fn reselecting_current_envelope_is_a_no_op() {
    let (mut challenge, _notifier) = stub_challenge(StubApi::with_catalog(two_envelopes()));
    challenge.mount().await;
    challenge.select(EnvelopeNumber(1)).expect("select");
    challenge.update_field(Field::Name, "Alice");
    let before = challenge.state().form.clone();

    assert!(!challenge.select(EnvelopeNumber(1)).expect("reselect"));

    let after = &challenge.state().form;
    assert_eq!(after.phase(), before.phase());
    assert_eq!(after.selected(), before.selected());
    assert_eq!(after.field(Field::Name), before.field(Field::Name));
}

#[tokio::test]
async fn selecting_before_catalog_loads_fails() {
    let (mut challenge, _notifier) = stub_challenge(StubApi::with_catalog(two_envelopes()));

    let err = challenge.select(EnvelopeNumber(1)).expect_err("not loaded yet");

    assert_eq!(err, ClientError::UnknownEnvelope(EnvelopeNumber(1)));
    assert_eq!(challenge.state().form.phase(), FormPhase::Idle);
}

#[tokio::test]
async fn local_guard_failures_issue_no_request_or_notice() {
    let (mut challenge, notifier) = stub_challenge(StubApi::with_catalog(two_envelopes()));
    challenge.mount().await;

    assert_eq!(
        challenge.submit().await.expect_err("no selection"),
        ClientError::NoSelection
    );

    challenge.select(EnvelopeNumber(1)).expect("select");
    challenge.update_field(Field::Email, "alice@example.com");
    challenge.update_field(Field::Address, "1 Main St");
    assert_eq!(
        challenge.submit().await.expect_err("missing name"),
        ClientError::MissingField(Field::Name)
    );

    assert!(challenge.api().submitted().is_empty());
    assert!(notifier.snapshot().is_empty());
    assert_eq!(challenge.state().form.phase(), FormPhase::Editing);
}

#[tokio::test]
async fn transport_failure_notifies_and_preserves_state() {
    let api = StubApi::with_catalog(two_envelopes())
        .with_submit_results(vec![Err(ClientError::Transport("connection reset".into()))]);
    let (mut challenge, notifier) = stub_challenge(api);
    challenge.mount().await;
    challenge.select(EnvelopeNumber(2)).expect("select");
    fill_alice(&mut challenge);

    let outcome = challenge.submit().await.expect("submit");

    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(ClientError::Transport(_))
    ));
    assert_eq!(challenge.state().form.phase(), FormPhase::Editing);
    assert_eq!(notifier.snapshot().len(), 1);
}

#[tokio::test]
async fn unmount_during_catalog_load_drops_the_result() {
    let (mut challenge, _notifier) =
        stub_challenge(StubApi::with_catalog(two_envelopes()).hanging());
    let lifetime = challenge.lifetime();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        lifetime.cancel();
    });

    challenge.mount().await;

    assert!(!challenge.is_mounted());
    assert!(challenge.envelopes().is_empty());
    assert_eq!(challenge.state().catalog.status(), &CatalogStatus::Loading);
    assert_eq!(challenge.api().list_calls(), 1);
}

#[tokio::test]
async fn unmount_during_submit_leaves_state_and_notifies_nobody() {
    let (mut challenge, notifier) =
        stub_challenge(StubApi::with_catalog(two_envelopes()).with_pending_submit());
    challenge.mount().await;
    challenge.select(EnvelopeNumber(1)).expect("select");
    fill_alice(&mut challenge);
    let lifetime = challenge.lifetime();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        lifetime.cancel();
    });

    let outcome = challenge.submit().await.expect("submit");

    assert_eq!(outcome, SubmitOutcome::Abandoned);
    assert_eq!(challenge.api().submitted().len(), 1);
    assert!(notifier.snapshot().is_empty());
    let form = &challenge.state().form;
    assert_eq!(form.selected().map(|e| e.number), Some(EnvelopeNumber(1)));
    assert_eq!(form.field(Field::Name), "Alice");
    assert_eq!(form.field(Field::Address), "1 Main St");
}

#[tokio::test]
async fn submit_after_unmount_sends_nothing() {
    let (mut challenge, notifier) = stub_challenge(StubApi::with_catalog(two_envelopes()));
    challenge.mount().await;
    challenge.select(EnvelopeNumber(1)).expect("select");
    fill_alice(&mut challenge);
    challenge.unmount();

    let outcome = challenge.submit().await.expect("submit");

    assert_eq!(outcome, SubmitOutcome::Abandoned);
    assert!(challenge.api().submitted().is_empty());
    assert!(notifier.snapshot().is_empty());
    assert_eq!(challenge.state().form.phase(), FormPhase::Editing);
    assert_eq!(challenge.state().form.field(Field::Name), "Alice");
}
