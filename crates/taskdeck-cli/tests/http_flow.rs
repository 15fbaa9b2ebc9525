use std::collections::BTreeSet;

use serde_json::json;
use taskdeck_cli::cli::Command;
use taskdeck_cli::commands::dispatch;
use taskdeck_cli::http::HttpTransport;
use taskdeck_core::shared::TaskPriority;
use taskdeck_core::storage::{THEME_KEY, TOKEN_KEY};
use taskdeck_core::{KeyValueStore, MemoryStore, Phase, TaskdeckClient};
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user() -> serde_json::Value {
    json!({ "id": 1, "name": "Ana", "email": "ana@example.com" })
}

async fn mount_session(server: &MockServer, tasks: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/todos/getTasks"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer, store: MemoryStore) -> TaskdeckClient<HttpTransport, MemoryStore> {
    let transport =
        HttpTransport::new(&format!("{}/api/", server.uri())).expect("build transport");
    TaskdeckClient::new(transport, store)
}

#[tokio::test]
async fn login_command_persists_token_and_lists_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(
            json!({ "email": "ana@example.com", "password": "secret1" }),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "token-1", "user": user() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_session(
        &server,
        json!([{ "id": 5, "title": "Walk dog", "category": "home", "priority": "alta", "completed": false }]),
    )
    .await;

    let client = client_for(&server, MemoryStore::new());
    let mut out = Vec::new();
    dispatch(
        &client,
        Command::Login {
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
        },
        &mut out,
    )
    .await
    .expect("login succeeds");

    assert_eq!(client.phase(), Phase::LoggedIn);
    assert_eq!(client.store().get(TOKEN_KEY).as_deref(), Some("token-1"));
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("[success] Welcome back, Ana!"), "{text}");
    assert!(text.contains("[ ] 5  Walk dog  (home, high)"), "{text}");
}

#[tokio::test]
async fn server_error_message_becomes_command_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Email already in use" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryStore::new());
    let mut out = Vec::new();
    let err = dispatch(
        &client,
        Command::Register {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("conflict");

    assert_eq!(err.to_string(), "Email already in use");
}

#[tokio::test]
async fn short_password_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryStore::new());
    let mut out = Vec::new();
    let err = dispatch(
        &client,
        Command::Register {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "12345".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("too short");

    assert!(err.to_string().contains("Minimum 6 characters"), "{err}");
}

#[tokio::test]
async fn add_command_posts_task_with_bearer_then_refreshes() {
    let server = MockServer::start().await;
    mount_session(&server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/todos/sendTask"))
        .and(header("authorization", "Bearer token-1"))
        .and(body_json(
            json!({ "title": "Call bank", "priority": "low", "category": "admin" }),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    dispatch(
        &client,
        Command::Add {
            title: "Call bank".to_string(),
            category: "admin".to_string(),
            priority: TaskPriority::Low,
        },
        &mut out,
    )
    .await
    .expect("task added");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.starts_with("[success] Task added\n"), "{text}");

    let list_calls = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == "/api/todos/getTasks")
        .count();
    assert_eq!(list_calls, 2);
}

#[tokio::test]
async fn toggle_command_sends_negated_flag() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        json!([{ "id": "a1", "title": "Read book", "category": "fun", "priority": "medium", "completed": true }]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/a1"))
        .and(body_json(json!({ "completed": false })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    dispatch(
        &client,
        Command::Toggle {
            id: "a1".to_string(),
        },
        &mut out,
    )
    .await
    .expect("toggled");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.starts_with("[success] Task marked as pending"), "{text}");
}

#[tokio::test]
async fn rejected_token_logs_out_and_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid token" })))
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "stale")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    let err = dispatch(&client, Command::List, &mut out)
        .await
        .expect_err("session rejected");

    assert!(err.to_string().contains("not logged in"), "{err}");
    assert_eq!(client.phase(), Phase::LoggedOut);
    assert_eq!(client.store().get(TOKEN_KEY), None);
}

#[tokio::test]
async fn malformed_task_list_is_reported() {
    let server = MockServer::start().await;
    mount_session(&server, json!([{ "title": "no id" }])).await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    client.start().await;

    assert_eq!(client.phase(), Phase::LoggedIn);
    client.with_state(|state| {
        assert!(state.tasks().is_empty());
        let notice = state.feedback().current().expect("error notice");
        assert_eq!(notice.message, "Something went wrong");
    });
}

/// Profile and task fetches run concurrently, so arrival order is not fixed.
async fn paths_received(server: &MockServer) -> BTreeSet<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect::<BTreeSet<_>>()
}

#[tokio::test]
async fn theme_toggle_never_resumes_the_session() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    dispatch(
        &client,
        Command::Theme {
            action: Some("toggle".to_string()),
        },
        &mut out,
    )
    .await
    .expect("theme toggled");

    assert_eq!(String::from_utf8(out).expect("utf8"), "theme: dark\n");
    assert_eq!(client.store().get(TOKEN_KEY).as_deref(), Some("token-1"));
    assert_eq!(client.store().get(THEME_KEY).as_deref(), Some("dark"));
}

#[tokio::test]
async fn logout_clears_stored_token_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    dispatch(&client, Command::Logout, &mut out)
        .await
        .expect("logged out");

    assert_eq!(client.store().get(TOKEN_KEY), None);
    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text, "[info] You have signed out\n");
}

#[tokio::test]
async fn rm_refuses_ids_the_server_never_listed() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        json!([{ "id": 3, "title": "Water plants", "category": "home" }]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    let err = dispatch(
        &client,
        Command::Rm {
            id: "../users/me".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("unknown id");
    assert!(err.to_string().contains("no task with id"), "{err}");

    let err = dispatch(
        &client,
        Command::Rm {
            id: "..".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("dot segment");
    assert!(err.to_string().contains("invalid task id"), "{err}");

    assert_eq!(
        paths_received(&server).await,
        BTreeSet::from([
            "GET /api/users/me".to_string(),
            "GET /api/todos/getTasks".to_string(),
        ])
    );
}

#[tokio::test]
async fn slash_in_task_id_stays_in_one_path_segment() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        json!([{ "id": "inbox/7", "title": "Reply to Bob", "category": "mail" }]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/todos/inbox%2F7"))
        .and(body_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    dispatch(
        &client,
        Command::Toggle {
            id: "inbox/7".to_string(),
        },
        &mut out,
    )
    .await
    .expect("toggled");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.starts_with("[success] Task marked as completed"), "{text}");
}

#[tokio::test]
async fn login_reports_profile_error_when_profile_load_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "token-1", "user": user() })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Profile store offline" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/todos/getTasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, MemoryStore::new());
    let mut out = Vec::new();
    let err = dispatch(
        &client,
        Command::Login {
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("profile load failed");

    assert_eq!(err.to_string(), "Profile store offline");
    assert_eq!(client.phase(), Phase::LoggedOut);
    assert_eq!(client.store().get(TOKEN_KEY), None);
}

#[tokio::test]
async fn forbidden_delete_keeps_the_session() {
    let server = MockServer::start().await;
    mount_session(
        &server,
        json!([{ "id": 9, "title": "Shared chore", "category": "home" }]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todos/9"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Not your task" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with_entries([(TOKEN_KEY, "token-1")]);
    let client = client_for(&server, store);
    let mut out = Vec::new();
    let err = dispatch(
        &client,
        Command::Rm {
            id: "9".to_string(),
        },
        &mut out,
    )
    .await
    .expect_err("forbidden");

    assert_eq!(err.to_string(), "Not your task");
    assert_eq!(client.phase(), Phase::LoggedIn);
    assert_eq!(client.store().get(TOKEN_KEY).as_deref(), Some("token-1"));
}
