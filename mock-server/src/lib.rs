use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Default)]
pub struct Store {
    users: HashMap<String, String>,
    sessions: HashMap<String, String>,
    tasks: HashMap<String, Vec<Task>>,
}

impl Store {
    fn user_for(&self, headers: &HeaderMap) -> Option<String> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.sessions.get(token).cloned()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/task/all", get(all_tasks))
        .route("/task/pending", get(pending_tasks))
        .route("/task/completed", get(completed_tasks))
        .route("/task/count", get(count_tasks))
        .route("/task/add", post(add_task))
        .route("/task/complete/batch", put(complete_batch))
        .route("/task/complete/{id}", put(complete_task))
        .route("/upload", post(upload))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "message": "ok", "data": data })).into_response()
}

fn fail(message: &str) -> Response {
    Json(json!({ "success": false, "message": message })).into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": "unauthorized" })),
    )
        .into_response()
}

async fn register(State(db): State<Db>, Json(input): Json<Credentials>) -> Response {
    if input.username.is_empty() || input.password.is_empty() {
        return fail("username and password are required");
    }
    let mut store = db.write().await;
    if store.users.contains_key(&input.username) {
        return fail("username already exists");
    }
    store.users.insert(input.username.clone(), input.password);
    ok(json!({ "username": input.username }))
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Response {
    let mut store = db.write().await;
    if store.users.get(&input.username) != Some(&input.password) {
        return fail("invalid username or password");
    }
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), input.username.clone());
    ok(json!({ "token": token, "username": input.username }))
}

async fn list_tasks(db: &Db, headers: &HeaderMap, filter: Option<bool>) -> Response {
    let store = db.read().await;
    let Some(user) = store.user_for(headers) else {
        return unauthorized();
    };
    let tasks: Vec<&Task> = store
        .tasks
        .get(&user)
        .into_iter()
        .flatten()
        .filter(|t| filter.is_none_or(|completed| t.completed == completed))
        .collect();
    ok(json!(tasks))
}

async fn all_tasks(State(db): State<Db>, headers: HeaderMap) -> Response {
    list_tasks(&db, &headers, None).await
}

async fn pending_tasks(State(db): State<Db>, headers: HeaderMap) -> Response {
    list_tasks(&db, &headers, Some(false)).await
}

async fn completed_tasks(State(db): State<Db>, headers: HeaderMap) -> Response {
    list_tasks(&db, &headers, Some(true)).await
}

/// Bare object, no envelope.
async fn count_tasks(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    let Some(user) = store.user_for(&headers) else {
        return unauthorized();
    };
    let tasks = store.tasks.get(&user).map(Vec::as_slice).unwrap_or_default();
    let completed = tasks.iter().filter(|t| t.completed).count();
    Json(json!({
        "total": tasks.len(),
        "pending": tasks.len() - completed,
        "completed": completed,
    }))
    .into_response()
}

async fn add_task(State(db): State<Db>, headers: HeaderMap, Json(input): Json<NewTask>) -> Response {
    let mut store = db.write().await;
    let Some(user) = store.user_for(&headers) else {
        return unauthorized();
    };
    if input.title.trim().is_empty() {
        return fail("title must not be empty");
    }
    let task = Task {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
        completed: false,
    };
    store.tasks.entry(user).or_default().push(task.clone());
    ok(json!(task))
}

async fn complete_task(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let mut store = db.write().await;
    let Some(user) = store.user_for(&headers) else {
        return unauthorized();
    };
    let task = store
        .tasks
        .get_mut(&user)
        .and_then(|tasks| tasks.iter_mut().find(|t| t.id == id));
    match task {
        Some(task) => {
            task.completed = true;
            ok(json!(task))
        }
        None => fail("task not found"),
    }
}

async fn complete_batch(State(db): State<Db>, headers: HeaderMap, Json(ids): Json<Vec<Uuid>>) -> Response {
    let mut store = db.write().await;
    let Some(user) = store.user_for(&headers) else {
        return unauthorized();
    };
    let mut updated = 0;
    for task in store.tasks.entry(user).or_default() {
        if ids.contains(&task.id) && !task.completed {
            task.completed = true;
            updated += 1;
        }
    }
    ok(json!({ "updated": updated }))
}

/// Bare object describing what was received.
async fn upload(State(db): State<Db>, headers: HeaderMap, mut multipart: Multipart) -> Response {
    if db.read().await.user_for(&headers).is_none() {
        return unauthorized();
    }
    let mut file = Value::Null;
    let mut fields = serde_json::Map::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return err.into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let size = match field.bytes().await {
                    Ok(bytes) => bytes.len(),
                    Err(err) => return err.into_response(),
                };
                file = json!({ "field": name, "filename": file_name, "size": size });
            }
            None => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(err) => return err.into_response(),
                };
                fields.insert(name, Value::String(text));
            }
        }
    }
    Json(json!({ "file": file, "fields": fields })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_to_json() {
        let task = Task {
            id: Uuid::nil(),
            title: "Test".to_string(),
            description: None,
            completed: false,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["completed"], false);
        assert!(json["description"].is_null());
    }

    #[test]
    fn new_task_description_optional() {
        let input: NewTask = serde_json::from_str(r#"{"title":"No description"}"#).unwrap();
        assert_eq!(input.title, "No description");
        assert!(input.description.is_none());
    }

    #[test]
    fn new_task_rejects_missing_title() {
        let result: Result<NewTask, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn user_for_requires_known_bearer_token() {
        let mut store = Store::default();
        store.sessions.insert("tok".to_string(), "alice".to_string());

        let mut headers = HeaderMap::new();
        assert!(store.user_for(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer nope".parse().unwrap());
        assert!(store.user_for(&headers).is_none());

        headers.insert(header::AUTHORIZATION, "Bearer tok".parse().unwrap());
        assert_eq!(store.user_for(&headers).as_deref(), Some("alice"));
    }
}
