use assetdesk_client::{ClientConfig, HttpClient, Session, SessionStore};
use assetdesk_core::UserRole;
use assetdesk_query::{QueryClient, RefetchPolicy};
use assetdesk_test_utils::{fixtures, wire};
use assetdesk_tui::config::{AppConfig, CacheConfig, ToastConfig};
use assetdesk_tui::keys::Action;
use assetdesk_tui::modal::ModalMode;
use assetdesk_tui::mutations::Mutation;
use assetdesk_tui::nav::Page;
use assetdesk_tui::notifications::NotificationLevel;
use assetdesk_tui::queries;
use assetdesk_tui::state::{App, Effect, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;
use std::net::TcpListener;
use std::path::Path;
use std::time::{Duration, Instant};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn config_for(server: &MockServer, dir: &Path) -> AppConfig {
    AppConfig {
        api_base_url: server.base_url(),
        request_timeout_ms: 5_000,
        refresh_interval_ms: 250,
        persistence_path: dir.join("state.json"),
        log_path: dir.join("assetdesk.log"),
        export_dir: dir.join("exports"),
        cache: CacheConfig::default(),
        toast: ToastConfig::default(),
    }
}

fn app_for(server: &MockServer, dir: &Path, role: Option<UserRole>) -> App {
    let config = config_for(server, dir);
    let store = SessionStore::new();
    if let Some(role) = role {
        store.login(Session {
            token: "tok-123".to_string(),
            user: fixtures::user(1, role),
        });
    }
    let api = HttpClient::new(
        &ClientConfig::new(server.base_url()).with_timeout(Duration::from_secs(5)),
        store,
    )
    .unwrap();
    let queries = QueryClient::new(config.query_config());
    App::new(config, api, queries)
}

fn press(app: &mut App, code: KeyCode) -> Effect {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[tokio::test]
async fn login_screen_signs_in_and_loads_dashboard() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), None);
    assert_eq!(app.screen, Screen::Login);

    assert_eq!(press(&mut app, KeyCode::Enter), Effect::None);
    assert!(app.login.error.is_some());

    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(wire::login("tok-123", "SUPER_ADMIN"));
        })
        .await;
    let stats = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/dashboard/stats")
                .header("authorization", "Bearer tok-123");
            then.status(200).json_body(json!({
                "totalAssets": 12,
                "pendingTransfers": 2,
                "totalBranches": 3
            }));
        })
        .await;

    type_text(&mut app, "user1@example.com");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "secret1");
    let Effect::Login { email, password } = press(&mut app, KeyCode::Enter) else {
        panic!("expected a login effect");
    };
    assert_eq!(email, "user1@example.com");
    assert!(app.login.submitting);

    let result = app.api.auth().login(&email, &password).await;
    app.on_login_finished(result);
    login.assert_async().await;

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.page, Page::Dashboard);
    let state = app.dashboard.stats.as_mut().unwrap().wait_settled().await;
    stats.assert_async().await;
    assert_eq!(state.data.unwrap().total_assets, 12);
    let toast = app.toasts.latest().unwrap();
    assert_eq!(toast.level, NotificationLevel::Success);
    assert!(toast.message.contains("User 1"));
}

#[tokio::test]
async fn added_asset_shows_up_without_manual_refetch() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::SuperAdmin));

    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/assets");
            then.status(200).json_body(json!([wire::asset(1, "Desk", "Active")]));
        })
        .await;
    let branches = server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200)
                .json_body(json!([wire::branch(1, "Head Office"), wire::branch(2, "Kandy")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/assets/master-data");
            then.status(200).json_body(json!({ "categories": [], "years": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/assets/next-code")
                .query_param("category", "Furniture");
            then.status(200).json_body(json!({ "nextCode": "FUR-0002" }));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/assets")
                .json_body_partial(r#"{ "assetId": "FUR-0002", "name": "Chair" }"#);
            then.status(201).json_body(wire::asset(2, "Chair", "Active"));
        })
        .await;

    app.navigate(Page::Assets);
    app.assets.assets.as_mut().unwrap().wait_settled().await;
    app.assets.branches.as_mut().unwrap().wait_settled().await;
    branches.assert_async().await;

    app.handle_action(Action::New);
    assert_eq!(app.modal.current().map(|m| m.mode), Some(ModalMode::CreateAsset));
    app.next_code.as_mut().unwrap().wait_settled().await;
    app.tick(Instant::now());
    assert_eq!(app.modal.current().unwrap().form.value("assetId"), "FUR-0002");

    app.modal.editable_form().unwrap().set_text("name", "Chair");
    let Effect::Mutate { ticket, mutation } = press(&mut app, KeyCode::Enter) else {
        panic!("expected a mutation effect");
    };
    assert!(matches!(&mutation, Mutation::CreateAsset(asset) if asset.name == "Chair"));
    assert!(app.modal.is_submitting());

    let result = mutation.run(&app.queries, &app.api).await;
    app.on_mutation_finished(ticket, &mutation, result);
    create.assert_async().await;

    assert!(!app.modal.is_open());
    assert_eq!(app.toasts.latest().unwrap().message, "Asset added");

    app.assets.assets.as_mut().unwrap().wait_settled().await;
    assert_eq!(app.queries.fetch_count(&queries::assets_key()), 2);
    list.assert_hits_async(2).await;
}

#[tokio::test]
async fn rejected_credential_on_a_query_returns_to_login() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::Admin));
    assert_eq!(app.screen, Screen::Main);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/transfers");
            then.status(401).json_body(json!({ "message": "Token expired" }));
        })
        .await;

    app.navigate(Page::Transfers);
    let state = app.transfers.transfers.as_mut().unwrap().wait_settled().await;
    assert!(state.is_error());

    app.tick(Instant::now());
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.api.session().is_authenticated());
    assert!(app.transfers.transfers.is_none());
    assert_eq!(app.toasts.latest().unwrap().level, NotificationLevel::Warning);
}

#[tokio::test]
async fn failed_save_keeps_form_open_with_server_message() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::SuperAdmin));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200).json_body(json!([wire::branch(1, "Head Office")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/branches");
            then.status(409).json_body(json!({ "message": "Branch already exists" }));
        })
        .await;

    app.navigate(Page::Branches);
    app.branches.branches.as_mut().unwrap().wait_settled().await;

    app.handle_action(Action::New);
    type_text(&mut app, "Kandy");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "Central Province");
    let Effect::Mutate { ticket, mutation } = press(&mut app, KeyCode::Enter) else {
        panic!("expected a mutation effect");
    };

    let result = mutation.run(&app.queries, &app.api).await;
    assert!(result.is_err());
    app.on_mutation_finished(ticket, &mutation, result);

    let open = app.modal.current().expect("modal stays open");
    assert_eq!(open.error.as_deref(), Some("Branch already exists"));
    assert!(!app.modal.is_submitting());
    assert_eq!(open.form.value("name"), "Kandy");
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.queries.fetch_count(&queries::branches_key()), 1);
}

#[tokio::test]
async fn export_writes_only_visible_rows() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::Staff));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/assets");
            then.status(200).json_body(json!([
                wire::asset(1, "Desk", "Active"),
                wire::asset(2, "Broken Chair", "Disposed"),
                wire::asset(3, "Shelf", "In Use")
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200).json_body(json!([wire::branch(1, "Head Office")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/assets/master-data");
            then.status(200).json_body(json!({}));
        })
        .await;

    app.navigate(Page::Assets);
    app.assets.assets.as_mut().unwrap().wait_settled().await;

    app.handle_action(Action::Export);
    let path = dir.path().join("exports").join("assets.csv");
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("Broken Chair"));
    assert_eq!(app.toasts.latest().unwrap().level, NotificationLevel::Success);
}

#[tokio::test]
async fn logout_drops_subscriptions_and_invalidates_cache() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::SuperAdmin));

    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200)
                .json_body(json!([wire::user(1, "SUPER_ADMIN"), wire::user(2, "STAFF")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200).json_body(json!([]));
        })
        .await;

    app.navigate(Page::Users);
    assert_eq!(app.page, Page::Users);
    let state = app.users.users.as_mut().unwrap().wait_settled().await;
    assert_eq!(state.data.unwrap().len(), 2);

    app.handle_action(Action::Logout);
    assert_eq!(app.screen, Screen::Login);
    assert!(app.users.users.is_none());
    let stats = app.queries.stats();
    assert!(!stats.entries.is_empty());
    assert!(stats.entries.iter().all(|e| e.invalidated && e.subscribers == 0));
}

#[tokio::test]
async fn staff_cannot_open_users_page() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path(), Some(UserRole::Staff));
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dashboard/stats");
            then.status(200).json_body(json!({}));
        })
        .await;

    app.navigate(Page::Users);
    assert_eq!(app.page, Page::Dashboard);
    assert!(app.users.users.is_none());
}

#[tokio::test]
async fn two_branch_subscribers_in_one_tick_share_a_request() {
    if !can_bind_localhost() {
        return;
    }
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&server, dir.path(), Some(UserRole::Admin));
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/branches");
            then.status(200)
                .json_body(json!([wire::branch(1, "Head Office"), wire::branch(2, "Kandy")]));
        })
        .await;

    let mut first = queries::branches(&app.queries, &app.api, RefetchPolicy::Always);
    let mut second = queries::branches(&app.queries, &app.api, RefetchPolicy::Always);
    let a = first.wait_settled().await;
    let b = second.wait_settled().await;

    list.assert_hits_async(1).await;
    assert_eq!(a.data.unwrap().len(), 2);
    assert_eq!(b.data.unwrap().len(), 2);
}
