//! Router tests driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use quill_core::{Blog, kv::MemoryKv, persist::StorageKeys, session::MockIdentity};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt as _;

use crate::{SharedBlog, api_router};

fn blog() -> SharedBlog<MemoryKv, MockIdentity> {
  let blog = Blog::open(
    Arc::new(MemoryKv::new()),
    StorageKeys::default(),
    MockIdentity::default(),
  )
  .unwrap();
  Arc::new(Mutex::new(blog))
}

async fn call(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn logged_in() -> Router {
  let app = api_router(blog());
  let (status, _) = call(
    &app,
    "POST",
    "/session",
    Some(json!({ "email": "demo@example.com", "password": "pw" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  app
}

async fn create(app: &Router, title: &str, categories: &[&str]) -> i64 {
  let (status, body) = call(
    app,
    "POST",
    "/posts",
    Some(json!({
      "title": title,
      "excerpt": "An excerpt",
      "content": "<p>Body</p>",
      "categories": categories,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

// ── Session ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_login_and_logout() {
  let app = api_router(blog());
  let (status, body) = call(&app, "GET", "/session", None).await;
  assert_eq!(status, StatusCode::OK);
  assert!(body.is_null());

  let (status, body) =
    call(&app, "POST", "/session", Some(json!({ "email": "", "password": "pw" }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(body["error"].as_str().unwrap().contains("email"));

  let (status, body) =
    call(&app, "POST", "/session", Some(json!({ "email": "a@b.c", "password": "pw" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Demo User");

  let (status, _) = call(&app, "DELETE", "/session", None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (_, body) = call(&app, "GET", "/session", None).await;
  assert!(body.is_null());
}

// ── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_requires_login() {
  let app = api_router(blog());
  let (status, body) = call(
    &app,
    "POST",
    "/posts",
    Some(json!({ "title": "A", "excerpt": "B", "content": "C", "categories": ["Tech"] })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());

  let (_, body) = call(&app, "GET", "/posts", None).await;
  assert_eq!(body, json!([]));
}

#[tokio::test]
async fn created_post_is_listed_first_with_no_engagement() {
  let app = logged_in().await;
  create(&app, "Older", &["Tech"]).await;
  let id = create(&app, "Newer", &["Design"]).await;

  let (status, body) = call(&app, "GET", "/posts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);
  assert_eq!(body[0]["id"], id);
  assert_eq!(body[0]["likes"], 0);
  assert_eq!(body[0]["comments"], json!([]));
  assert_eq!(body[0]["author"]["name"], "Demo User");

  let (status, body) = call(&app, "GET", &format!("/posts/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["title"], "Newer");
}

#[tokio::test]
async fn list_filters_by_category_and_query() {
  let app = logged_in().await;
  create(&app, "Rust ownership", &["Development"]).await;
  create(&app, "Colour theory", &["Design"]).await;
  create(&app, "Rust in the browser", &["Web Dev"]).await;

  let (_, body) = call(&app, "GET", "/posts?category=Design", None).await;
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (_, body) = call(&app, "GET", "/posts?q=rust", None).await;
  assert_eq!(body.as_array().unwrap().len(), 2);

  let (_, body) = call(&app, "GET", "/posts?category=Development&q=rust", None).await;
  assert_eq!(body.as_array().unwrap().len(), 1);
  assert_eq!(body[0]["title"], "Rust ownership");

  let (_, body) = call(&app, "GET", "/posts?category=All&q=", None).await;
  assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn missing_post_is_404() {
  let app = api_router(blog());
  let (status, body) = call(&app, "GET", "/posts/99", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "post 99 not found");

  let (status, _) = call(&app, "POST", "/posts/99/view", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete() {
  let app = logged_in().await;
  let id = create(&app, "Draft", &["Tech"]).await;

  let (status, body) =
    call(&app, "PATCH", &format!("/posts/{id}"), Some(json!({ "title": "Final" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["title"], "Final");
  assert_eq!(body["excerpt"], "An excerpt");

  let (status, _) = call(&app, "PATCH", &format!("/posts/{id}"), Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) =
    call(&app, "PATCH", &format!("/posts/{id}"), Some(json!({ "title": "  " }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (status, _) = call(&app, "DELETE", &format!("/posts/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = call(&app, "DELETE", &format!("/posts/{id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = call(&app, "GET", &format!("/posts/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn counters() {
  let app = logged_in().await;
  let id = create(&app, "Counted", &["Tech"]).await;

  call(&app, "POST", &format!("/posts/{id}/view"), None).await;
  let (status, body) = call(&app, "POST", &format!("/posts/{id}/view"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "count": 2 }));

  let (_, body) = call(&app, "POST", &format!("/posts/{id}/share"), None).await;
  assert_eq!(body, json!({ "count": 1 }));
}

// ── Comments and likes ──────────────────────────────────────────────────────

#[tokio::test]
async fn comments_and_replies() {
  let app = logged_in().await;
  let id = create(&app, "Talk", &["Tech"]).await;
  let uri = format!("/posts/{id}/comments");

  let (status, _) = call(&app, "POST", &uri, Some(json!({ "content": "   " }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

  let (status, comment) = call(&app, "POST", &uri, Some(json!({ "content": "first" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  let comment_id = comment["id"].as_i64().unwrap();

  let (status, reply) = call(
    &app,
    "POST",
    &format!("{uri}/{comment_id}/replies"),
    Some(json!({ "content": "a reply" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(reply["content"], "a reply");

  let (_, thread) = call(&app, "GET", &uri, None).await;
  assert_eq!(thread.as_array().unwrap().len(), 1);
  assert_eq!(thread[0]["replies"][0]["content"], "a reply");

  let (status, _) = call(
    &app,
    "POST",
    &format!("{uri}/12345/replies"),
    Some(json!({ "content": "orphan" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn like_toggles() {
  let app = logged_in().await;
  let id = create(&app, "Likeable", &["Tech"]).await;
  let target = json!({ "kind": "post", "id": id });

  let (status, body) = call(&app, "POST", "/likes", Some(target.clone())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "likes": 1, "liked": true }));

  let (_, body) = call(&app, "POST", "/likes", Some(target.clone())).await;
  assert_eq!(body, json!({ "likes": 0, "liked": false }));

  let (status, _) =
    call(&app, "POST", "/likes", Some(json!({ "kind": "comment", "id": 1 }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  call(&app, "DELETE", "/session", None).await;
  let (status, _) = call(&app, "POST", "/likes", Some(target)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Views and preferences ───────────────────────────────────────────────────

#[tokio::test]
async fn trending_popular_and_categories() {
  let app = logged_in().await;
  let tech = create(&app, "Tech post", &["Tech"]).await;
  let design = create(&app, "Design post", &["Design"]).await;
  call(&app, "POST", "/likes", Some(json!({ "kind": "post", "id": tech }))).await;
  call(&app, "POST", &format!("/posts/{design}/view"), None).await;

  let (_, topics) = call(&app, "GET", "/trending", None).await;
  assert_eq!(topics[0]["name"], "Tech");
  assert_eq!(topics[0]["engagement"], 1);

  let (_, popular) = call(&app, "GET", "/popular?limit=1", None).await;
  assert_eq!(popular.as_array().unwrap().len(), 1);
  assert_eq!(popular[0]["id"], design);

  let (_, counts) = call(&app, "GET", "/categories", None).await;
  assert_eq!(counts.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn preferences_round_trip() {
  let app = api_router(blog());
  let (_, body) = call(&app, "GET", "/preferences", None).await;
  assert_eq!(body, json!({ "dark_mode": false, "selected_category": "All" }));

  let (status, body) = call(
    &app,
    "PUT",
    "/preferences",
    Some(json!({ "dark_mode": true, "selected_category": "Design" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "dark_mode": true, "selected_category": "Design" }));

  let (_, body) = call(&app, "PUT", "/preferences", Some(json!({ "dark_mode": false }))).await;
  assert_eq!(body, json!({ "dark_mode": false, "selected_category": "Design" }));
}

#[test]
fn core_errors_map_to_api_errors() {
  use quill_core::{Entity, Error};

  use crate::ApiError;

  assert!(matches!(ApiError::from(Error::Unauthenticated), ApiError::Unauthorized(_)));
  assert!(matches!(
    ApiError::from(Error::ValidationFailed { field: "title", reason: "must not be blank" }),
    ApiError::Unprocessable(m) if m == "invalid title: must not be blank"
  ));
  assert!(matches!(
    ApiError::from(Error::NotFound(Entity::Comment(4))),
    ApiError::NotFound(m) if m == "comment 4 not found"
  ));
}
