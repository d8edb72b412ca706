use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, Task};
use serde_json::Value;
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

async fn call(app: &mut RouterIntoService<String>, request: Request<String>) -> Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

/// Register and log in `alice`, returning her token.
async fn session(app: &mut RouterIntoService<String>) -> String {
    let creds = r#"{"username":"alice","password":"pw"}"#;
    call(app, json_request("POST", "/auth/register", None, creds)).await;
    let resp = call(app, json_request("POST", "/auth/login", None, creds)).await;
    let body: Value = body_json(resp).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn login_unknown_user_is_business_failure() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            r#"{"username":"ghost","password":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid username or password");
}

#[tokio::test]
async fn register_twice_is_rejected() {
    let mut app = app().into_service();
    let creds = r#"{"username":"bob","password":"pw"}"#;

    let resp = call(&mut app, json_request("POST", "/auth/register", None, creds)).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], true);

    let resp = call(&mut app, json_request("POST", "/auth/register", None, creds)).await;
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "username already exists");
}

#[tokio::test]
async fn login_returns_token_in_envelope_data() {
    let mut app = app().into_service();
    let token = session(&mut app).await;
    assert!(!token.is_empty());
}

// --- protected routes ---

#[tokio::test]
async fn task_routes_require_bearer_token() {
    for uri in ["/task/all", "/task/pending", "/task/completed", "/task/count"] {
        let resp = app()
            .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let resp = app()
        .oneshot(json_request("GET", "/task/all", Some("forged"), ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/task/archive").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn complete_bad_uuid_returns_400() {
    let mut app = app().into_service();
    let token = session(&mut app).await;
    let resp = call(
        &mut app,
        json_request("PUT", "/task/complete/not-a-uuid", Some(&token), "{}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_empty_title_is_business_failure() {
    let mut app = app().into_service();
    let token = session(&mut app).await;
    let resp = call(
        &mut app,
        json_request("POST", "/task/add", Some(&token), r#"{"title":"  "}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["success"], false);
}

// --- full task lifecycle ---

#[tokio::test]
async fn task_lifecycle() {
    let mut app = app().into_service();
    let token = session(&mut app).await;
    let token = Some(token.as_str());

    // add two tasks
    let mut ids = Vec::new();
    for title in ["Walk dog", "Buy milk"] {
        let body = format!(r#"{{"title":"{title}"}}"#);
        let resp = call(&mut app, json_request("POST", "/task/add", token, &body)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let envelope: Value = body_json(resp).await;
        assert_eq!(envelope["success"], true);
        let task: Task = serde_json::from_value(envelope["data"].clone()).unwrap();
        assert_eq!(task.title, title);
        assert!(!task.completed);
        ids.push(task.id);
    }

    // complete the first
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/task/complete/{}", ids[0]), token, "{}"),
    )
    .await;
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["data"]["completed"], true);

    // pending holds only the second
    let resp = call(&mut app, json_request("GET", "/task/pending", token, "")).await;
    let envelope: Value = body_json(resp).await;
    let pending: Vec<Task> = serde_json::from_value(envelope["data"].clone()).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, ids[1]);

    // completed holds only the first, all holds both
    let resp = call(&mut app, json_request("GET", "/task/completed", token, "")).await;
    let envelope: Value = body_json(resp).await;
    let completed: Vec<Task> = serde_json::from_value(envelope["data"].clone()).unwrap();
    assert_eq!(completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[0]]);

    let resp = call(&mut app, json_request("GET", "/task/all", token, "")).await;
    let envelope: Value = body_json(resp).await;
    let all: Vec<Task> = serde_json::from_value(envelope["data"].clone()).unwrap();
    assert_eq!(all.len(), 2);

    // count is a bare object
    let resp = call(&mut app, json_request("GET", "/task/count", token, "")).await;
    let count: Value = body_json(resp).await;
    assert!(count.get("success").is_none());
    assert_eq!(count["total"], 2);
    assert_eq!(count["pending"], 1);
    assert_eq!(count["completed"], 1);

    // batch completes what is left
    let batch = serde_json::to_string(&ids).unwrap();
    let resp = call(&mut app, json_request("PUT", "/task/complete/batch", token, &batch)).await;
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["data"]["updated"], 1);

    let resp = call(&mut app, json_request("GET", "/task/completed", token, "")).await;
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["data"].as_array().unwrap().len(), 2);

    // completing an unknown task is a business failure, not a 404
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/task/complete/{}", uuid::Uuid::nil()), token, "{}"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Value = body_json(resp).await;
    assert_eq!(envelope["message"], "task not found");
}
