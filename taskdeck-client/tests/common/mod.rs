/// Common test utilities for integration tests
///
/// This module provides the shared infrastructure the end-to-end tests run
/// against: a stub API server speaking the real wire protocol, counters for
/// every route so tests can assert how often the network was actually hit,
/// and a fully wired client over in-memory storage with short staleness
/// windows.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use taskdeck_client::cache::CacheConfig;
use taskdeck_client::client::TaskdeckClient;
use taskdeck_client::config::ClientConfig;
use taskdeck_client::notify::RecordingNotifier;
use taskdeck_client::store::backend::{MemoryStorage, StorageBackend};
use taskdeck_shared::models::auth::LoginCredentials;
use taskdeck_shared::models::user::User;

/// Password every stub account accepts
pub const PASSWORD: &str = "password123";

/// Per-route hit counters and failure switches for the stub server
#[derive(Default)]
pub struct StubState {
    pub login_hits: AtomicUsize,
    pub boards_list_hits: AtomicUsize,
    pub boards_create_hits: AtomicUsize,
    pub board_detail_hits: AtomicUsize,
    pub board_update_hits: AtomicUsize,
    pub tasks_list_hits: AtomicUsize,
    pub tasks_create_hits: AtomicUsize,
    pub task_status_hits: AtomicUsize,

    /// Last Authorization header seen on `GET /boards`
    pub last_boards_authorization: Mutex<Option<String>>,

    /// When set, `PATCH /boards/:id` answers 403
    pub board_update_forbidden: AtomicBool,

    /// When set, `GET /boards` answers 401
    pub boards_unauthorized: AtomicBool,

    /// Artificial latency for `GET /boards`, in milliseconds
    pub boards_delay_ms: AtomicU64,
}

fn user_json(id: &str, role: &str) -> Value {
    json!({
        "id": id,
        "firstName": "Test",
        "lastName": "User",
        "email": format!("{}@example.com", id),
        "role": role,
        "status": "active",
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

fn board_json(id: &str, name: &str, visibility: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "visibility": visibility,
        "isArchived": false,
        "metadata": {},
        "createdById": "admin1",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z",
        "_count": { "tasks": 3, "members": 2 }
    })
}

fn task_json(id: &str, title: &str, assigned_user_id: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": "todo",
        "priority": "medium",
        "tags": [],
        "metadata": {},
        "boardId": "b1",
        "assignedUserId": assigned_user_id,
        "createdById": "admin1",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

async fn login(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_hits.fetch_add(1, Ordering::SeqCst);

    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized", "message": "Invalid credentials" })),
        );
    }

    // The part before the '@' doubles as the user id; accounts are named
    // after their role: admin1, s1 (super admin), u1 (user), g1 (guest).
    let email = body["email"].as_str().unwrap_or_default();
    let id = email.split('@').next().unwrap_or("u1");
    let role = match id {
        "admin1" => "admin",
        "s1" => "super_admin",
        "g1" => "guest",
        _ => "user",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Welcome back",
            "response": {
                "user": user_json(id, role),
                "accessToken": format!("tok-{}", id),
                "refreshToken": format!("ref-{}", id)
            }
        })),
    )
}

async fn list_boards(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.boards_list_hits.fetch_add(1, Ordering::SeqCst);

    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    *state.last_boards_authorization.lock().unwrap() = authorization;

    let delay = state.boards_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.boards_unauthorized.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "unauthorized", "message": "Token expired" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "message": "Boards fetched",
            "response": [
                board_json("b1", "Roadmap", "public"),
                board_json("b2", "Internal", "private")
            ],
            "pagination": { "page": 1, "pages": 1, "count": 2, "perPage": 20 }
        })),
    )
}

async fn create_board(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.boards_create_hits.fetch_add(1, Ordering::SeqCst);

    let name = body["name"].as_str().unwrap_or("Unnamed");
    (
        StatusCode::OK,
        Json(json!({
            "message": "Board created",
            "response": board_json("b3", name, "private")
        })),
    )
}

async fn get_board(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.board_detail_hits.fetch_add(1, Ordering::SeqCst);

    (
        StatusCode::OK,
        Json(json!({
            "message": "Board fetched",
            "response": board_json(&id, "Roadmap", "public")
        })),
    )
}

async fn update_board(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.board_update_hits.fetch_add(1, Ordering::SeqCst);

    if state.board_update_forbidden.load(Ordering::SeqCst) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "forbidden", "message": "Insufficient permissions" })),
        );
    }

    let name = body["name"].as_str().unwrap_or("Roadmap");
    (
        StatusCode::OK,
        Json(json!({
            "message": "Board updated",
            "response": board_json(&id, name, "public")
        })),
    )
}

async fn list_tasks(State(state): State<Arc<StubState>>) -> (StatusCode, Json<Value>) {
    state.tasks_list_hits.fetch_add(1, Ordering::SeqCst);

    (
        StatusCode::OK,
        Json(json!({
            "message": "Tasks fetched",
            "response": [
                task_json("t1", "Write changelog", "u1"),
                task_json("t2", "Review designs", "u2")
            ],
            "pagination": { "page": 1, "pages": 1, "count": 2, "perPage": 20 }
        })),
    )
}

async fn create_task(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.tasks_create_hits.fetch_add(1, Ordering::SeqCst);

    let title = body["title"].as_str().unwrap_or("Untitled");
    (
        StatusCode::OK,
        Json(json!({
            "message": "Task created",
            "response": task_json("t9", title, "u1")
        })),
    )
}

async fn update_task_status(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.task_status_hits.fetch_add(1, Ordering::SeqCst);

    let mut task = task_json(&id, "Write changelog", "u1");
    task["status"] = body["status"].clone();
    (
        StatusCode::OK,
        Json(json!({ "message": "Status updated", "response": task })),
    )
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/boards", get(list_boards).post(create_board))
        .route("/api/v1/boards/:id", get(get_board).patch(update_board))
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route("/api/v1/tasks/:id/status", patch(update_task_status))
        .with_state(state)
}

/// Test context containing the stub server and a wired client
pub struct TestContext {
    pub client: TaskdeckClient,
    pub notifier: Arc<RecordingNotifier>,
    pub storage: Arc<MemoryStorage>,
    pub state: Arc<StubState>,
    pub base_url: String,
}

impl TestContext {
    /// Spins up a stub server and a client pointed at it
    ///
    /// Staleness windows are shrunk so tests can cross them with short
    /// sleeps instead of waiting out the production 30 s.
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let state = Arc::new(StubState::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        let base_url = format!("http://{}/api/v1", addr);
        let storage = Arc::new(MemoryStorage::new());
        let notifier = Arc::new(RecordingNotifier::new());

        let client = Self::build_client(&base_url, storage.clone(), notifier.clone());

        Self { client, notifier, storage, state, base_url }
    }

    /// Builds a client against the stub, reusing the given storage
    ///
    /// Used to simulate a process restart over the same persisted state.
    pub fn build_client(
        base_url: &str,
        storage: Arc<MemoryStorage>,
        notifier: Arc<RecordingNotifier>,
    ) -> TaskdeckClient {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
            storage_dir: std::env::temp_dir(),
        };

        let storage: Arc<dyn StorageBackend> = storage;
        TaskdeckClient::with_parts(
            config,
            storage,
            notifier,
            CacheConfig {
                list_ttl: Duration::from_millis(500),
                lookup_ttl: Duration::from_millis(2000),
            },
        )
        .expect("build client")
    }

    /// Logs in as the given stub account (id doubles as the email prefix)
    pub async fn login_as(&self, id: &str) -> User {
        let credentials = LoginCredentials {
            email: format!("{}@example.com", id),
            password: PASSWORD.to_string(),
        };
        let user = self
            .client
            .auth()
            .login(&credentials)
            .await
            .expect("stub login");
        self.notifier.reset();
        user
    }
}
