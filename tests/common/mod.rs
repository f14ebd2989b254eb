//! In-process stand-in for the GlobeTrans backend.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use globetrans_fleet::{ClientConfig, HttpClient};

pub const CREATED_AT: &str = "2025-01-01 08:00:00";

type Reply = (StatusCode, Json<Value>);

#[derive(Default)]
pub struct Table {
    next_id: i64,
    pub rows: BTreeMap<i64, Value>,
}

impl Table {
    fn insert(&mut self, mut row: Map<String, Value>) -> Value {
        self.next_id += 1;
        row.insert("id".into(), json!(self.next_id));
        let row = Value::Object(row);
        self.rows.insert(self.next_id, row.clone());
        row
    }
}

pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Default)]
pub struct Db {
    pub tables: BTreeMap<&'static str, Table>,
    pub users: Vec<User>,
    /// (method, path) of every request seen, in order.
    pub requests: Vec<(String, String)>,
    /// When set, collection GETs answer 500.
    pub fail_lists: bool,
    /// When set, collection GETs list rows newest first.
    pub newest_first: bool,
}

#[derive(Clone, Default)]
pub struct MockState {
    db: Arc<Mutex<Db>>,
}

impl MockState {
    pub fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap()
    }
}

pub struct MockBackend {
    pub url: String,
    pub state: MockState,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        {
            let mut db = state.db();
            for name in ["drivers", "trucks", "assignments"] {
                db.tables.insert(name, Table::default());
            }
            db.users.push(User {
                username: "ada".into(),
                email: "ada@globetrans.co.ke".into(),
                password: "s3cret-admin".into(),
                role: "admin".into(),
            });
            db.users.push(User {
                username: "bob".into(),
                email: "bob@globetrans.co.ke".into(),
                password: "right-password".into(),
                role: "Fleet Manager".into(),
            });
        }

        let app = create_router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url: format!("http://{addr}"), state, server }
    }

    pub fn client(&self) -> HttpClient {
        HttpClient::new(&ClientConfig::in_memory(self.url.clone())).unwrap()
    }

    /// Inserts a row directly, bypassing the API. Returns its id.
    pub fn seed(&self, collection: &'static str, row: Value) -> i64 {
        let Value::Object(row) = row else { panic!("seed rows must be objects") };
        let mut db = self.state.db();
        let row = db.tables.get_mut(collection).unwrap().insert(row);
        row["id"].as_i64().unwrap()
    }

    pub fn row(&self, collection: &'static str, id: i64) -> Option<Value> {
        self.state.db().tables[collection].rows.get(&id).cloned()
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.db().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests().iter().filter(|(m, p)| m == method && p == path).count()
    }

    pub fn clear_requests(&self) {
        self.state.db().requests.clear();
    }

    pub fn fail_lists(&self, fail: bool) {
        self.state.db().fail_lists = fail;
    }

    pub fn newest_first(&self, on: bool) {
        self.state.db().newest_first = on;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A base URL nothing is listening on.
pub fn dead_url() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .unwrap();
    format!("http://127.0.0.1:{port}")
}

pub fn seed_driver(backend: &MockBackend, name: &str, license: &str) -> i64 {
    backend.seed(
        "drivers",
        json!({
            "name": name,
            "license_number": license,
            "contact_info": "0700 000 000",
            "assigned_truck_id": null,
            "created_at": CREATED_AT
        }),
    )
}

fn create_router(state: MockState) -> Router {
    let assignments = collection("assignments", true)
        .route_layer(middleware::from_fn(require_session));

    Router::new()
        .merge(collection("drivers", false))
        .merge(collection("trucks", false))
        .merge(assignments)
        .route("/login", post(login))
        .route("/register", post(register))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

// Drivers and trucks take PUT for edits, assignments take PATCH.
fn collection(name: &'static str, patch: bool) -> Router<MockState> {
    let item: MethodRouter<MockState> = get(move |State(s): State<MockState>, Path(id): Path<i64>| async move {
        show(&s, name, id)
    })
    .delete(move |State(s): State<MockState>, Path(id): Path<i64>| async move { remove(&s, name, id) });

    let edit = move |State(s): State<MockState>, Path(id): Path<i64>, Json(body): Json<Value>| async move {
        update(&s, name, id, body)
    };
    let item = if patch { item.patch(edit) } else { item.put(edit) };

    Router::new()
        .route(
            &format!("/{name}"),
            get(move |State(s): State<MockState>| async move { list(&s, name) })
                .post(move |State(s): State<MockState>, Json(body): Json<Value>| async move {
                    create(&s, name, body)
                }),
        )
        .route(&format!("/{name}/{{id}}"), item)
}

fn label(collection: &str) -> &'static str {
    match collection {
        "drivers" => "Driver",
        "trucks" => "Truck",
        _ => "Assignment",
    }
}

fn required(collection: &str) -> &'static [&'static str] {
    match collection {
        "drivers" => &["name", "license_number", "contact_info"],
        "trucks" => &["plate_number", "model"],
        _ => &["driver_id", "truck_id", "start_date"],
    }
}

fn error(status: StatusCode, msg: &str) -> Reply {
    (status, Json(json!({ "error": msg })))
}

fn list(state: &MockState, collection: &'static str) -> Reply {
    let db = state.db();
    if db.fail_lists {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred");
    }
    let mut rows: Vec<Value> = db.tables[collection].rows.values().cloned().collect();
    if db.newest_first {
        rows.reverse();
    }
    (StatusCode::OK, Json(Value::Array(rows)))
}

fn show(state: &MockState, collection: &'static str, id: i64) -> Reply {
    match state.db().tables[collection].rows.get(&id) {
        Some(row) => (StatusCode::OK, Json(row.clone())),
        // the real backend answers a missing driver without an error field
        None => (StatusCode::NOT_FOUND, Json(json!({ label(collection): "Not found" }))),
    }
}

fn create(state: &MockState, collection: &'static str, body: Value) -> Reply {
    let Value::Object(mut fields) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object");
    };
    for field in required(collection) {
        let present = fields.get(*field).is_some_and(|v| !v.is_null() && v != "");
        if !present {
            return error(StatusCode::BAD_REQUEST, &format!("Missing required field: {field}"));
        }
    }

    let mut db = state.db();
    let table = db.tables.get_mut(collection).unwrap();
    if collection == "drivers" {
        let taken = table.rows.values().any(|r| r["license_number"] == fields["license_number"]);
        if taken {
            return error(StatusCode::BAD_REQUEST, "License number already exists");
        }
    }

    // ids are ours to assign
    fields.remove("id");
    if collection != "assignments" {
        fields.insert("created_at".into(), json!(CREATED_AT));
    }
    let row = table.insert(fields);
    (StatusCode::CREATED, Json(row))
}

fn update(state: &MockState, collection: &'static str, id: i64, body: Value) -> Reply {
    let Value::Object(fields) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object");
    };
    let mut db = state.db();
    let Some(row) = db.tables.get_mut(collection).unwrap().rows.get_mut(&id) else {
        return error(StatusCode::NOT_FOUND, &format!("{} not found", label(collection)));
    };
    for (key, value) in fields {
        if key != "id" && key != "created_at" {
            row[key.as_str()] = value;
        }
    }
    (StatusCode::OK, Json(row.clone()))
}

fn remove(state: &MockState, collection: &'static str, id: i64) -> Reply {
    let mut db = state.db();
    match db.tables.get_mut(collection).unwrap().rows.remove(&id) {
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "message": format!("{} deleted successfully", label(collection)) })),
        ),
        None => error(StatusCode::NOT_FOUND, &format!("{} not found", label(collection))),
    }
}

async fn login(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let db = state.db();
    let Some(user) = db.users.iter().find(|u| u.username == username && u.password == password) else {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    };

    let cookie = format!("session={}; Path=/; HttpOnly", user.username);
    let mut response = Json(json!({ "user": { "username": user.username, "role": user.role } })).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn register(State(state): State<MockState>, Json(body): Json<Value>) -> Reply {
    let field = |name: &str| body[name].as_str().unwrap_or_default().trim().to_string();
    for name in ["username", "email", "password"] {
        if field(name).is_empty() {
            return error(StatusCode::BAD_REQUEST, &format!("Missing required field: {name}"));
        }
    }

    let mut db = state.db();
    if db.users.iter().any(|u| u.username == field("username")) {
        return error(StatusCode::BAD_REQUEST, "Username already exists");
    }
    db.users.push(User {
        username: field("username"),
        email: field("email"),
        password: field("password"),
        role: field("role"),
    });
    (StatusCode::CREATED, Json(json!({ "message": "User registered successfully" })))
}

async fn require_session(req: Request, next: Next) -> Response {
    let has_session = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.split(';').any(|part| part.trim().starts_with("session=")));
    if !has_session {
        return error(StatusCode::UNAUTHORIZED, "Login required").into_response();
    }
    next.run(req).await
}

async fn record(State(state): State<MockState>, req: Request, next: Next) -> Response {
    state
        .db()
        .requests
        .push((req.method().to_string(), req.uri().path().to_string()));
    next.run(req).await
}
