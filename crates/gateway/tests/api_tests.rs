use std::str::FromStr;

use anyhow::{anyhow, Context};
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, LOCATION},
        Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use parley_auth::Authenticator;
use parley_config::AppConfig;
use parley_gateway::{create_router, GatewayState};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

type TestResult<T = ()> = anyhow::Result<T>;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

struct TestContext {
    _temp_dir: TempDir,
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Vec<u8>,
}

impl TestResponse {
    fn json(&self) -> TestResult<Value> {
        serde_json::from_slice(&self.body).context("response body is not JSON")
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("gateway.sqlite");
        let db_url = format!("sqlite://{}", db_path.display());

        let mut options = SqliteConnectOptions::from_str(&db_url)?;
        options = options.create_if_missing(true);
        options = options.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        MIGRATOR.run(&pool).await?;

        let config = AppConfig::default();
        let authenticator = Authenticator::new(pool.clone(), config.auth.clone());
        let state = GatewayState::new(pool, authenticator, config.rooms.clone());

        Ok(Self {
            _temp_dir: temp_dir,
            router: create_router(state),
        })
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResult<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.into_body().collect().await?.to_bytes().to_vec();

        Ok(TestResponse {
            status,
            location,
            body,
        })
    }

    /// Register an account and return `(user_id, token)`.
    async fn sign_up(&self, login: &str) -> TestResult<(String, String)> {
        let response = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "login": login,
                    "password": "correct horse",
                    "name": format!("{login} name"),
                })),
            )
            .await?;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());

        let body = response.json()?;
        let user_id = body["user"]["id"]
            .as_str()
            .ok_or_else(|| anyhow!("missing user id"))?
            .to_string();
        let token = body["token"]
            .as_str()
            .ok_or_else(|| anyhow!("missing token"))?
            .to_string();
        Ok((user_id, token))
    }

    async fn create_room(&self, token: &str, name: &str, is_public: bool) -> TestResult<String> {
        let response = self
            .send(
                Method::POST,
                "/api/rooms",
                Some(token),
                Some(json!({ "name": name, "isPublic": is_public })),
            )
            .await?;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.text());

        let location = response
            .location
            .ok_or_else(|| anyhow!("missing Location header"))?;
        Ok(location.trim_start_matches("/rooms/").to_string())
    }
}

#[tokio::test]
async fn landing_page_renders_empty_state() -> TestResult {
    let ctx = TestContext::new().await?;

    let response = ctx.send(Method::GET, "/", None, None).await?;
    assert_eq!(response.status, StatusCode::OK);

    let html = response.text();
    assert!(html.contains("No Chat Rooms"));
    assert!(html.contains("Create a new chat room to get started"));
    assert!(html.contains(r#"href="rooms/new""#));
    assert!(html.contains("Create Room"));
    Ok(())
}

#[tokio::test]
async fn health_reports_database() -> TestResult {
    let ctx = TestContext::new().await?;

    let response = ctx.send(Method::GET, "/health", None, None).await?;
    assert_eq!(response.status, StatusCode::OK);

    let body = response.json()?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn session_lifecycle() -> TestResult {
    let ctx = TestContext::new().await?;
    let (user_id, _) = ctx.sign_up("alice").await?;

    let response = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "alice", "password": "correct horse" })),
        )
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    let token = response.json()?["token"]
        .as_str()
        .ok_or_else(|| anyhow!("missing token"))?
        .to_string();

    let response = ctx.send(Method::GET, "/api/auth/me", Some(&token), None).await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["id"], user_id.as_str());

    let response = ctx.send(Method::POST, "/api/auth/logout", Some(&token), None).await?;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = ctx.send(Method::GET, "/api/auth/me", Some(&token), None).await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_password() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.sign_up("bob").await?;

    let response = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "bob", "password": "nope nope" })),
        )
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()?["error"], "401");
    Ok(())
}

#[tokio::test]
async fn create_room_action_results() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, token) = ctx.sign_up("carol").await?;

    let response = ctx
        .send(Method::POST, "/api/rooms", None, Some(json!({ "name": "lobby" })))
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json()?,
        json!({ "error": true, "message": "User not authenticated" })
    );

    let response = ctx
        .send(Method::POST, "/api/rooms", Some(&token), Some(json!({ "name": "  " })))
        .await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()?,
        json!({ "error": true, "message": "Invalid room data" })
    );

    let room_id = ctx.create_room(&token, "lobby", true).await?;

    let response = ctx
        .send(Method::GET, &format!("/api/rooms/{room_id}"), Some(&token), None)
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    let room = response.json()?;
    assert_eq!(room["name"], "lobby");
    assert_eq!(room["is_public"], true);

    let response = ctx.send(Method::GET, "/api/rooms", None, None).await?;
    assert_eq!(response.status, StatusCode::OK);
    let rooms = response.json()?;
    assert_eq!(rooms[0]["id"], room_id.as_str());
    assert_eq!(rooms[0]["member_count"], 1);
    Ok(())
}

#[tokio::test]
async fn add_member_action_results() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, owner) = ctx.sign_up("owner").await?;
    let (guest_id, guest) = ctx.sign_up("guest").await?;
    let (third_id, outsider) = ctx.sign_up("outsider").await?;
    let room_id = ctx.create_room(&owner, "private", false).await?;
    let uri = format!("/api/rooms/{room_id}/members");

    let response = ctx
        .send(Method::POST, &uri, None, Some(json!({ "userId": guest_id })))
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()?["message"], "User not authenticated");

    let response = ctx
        .send(Method::POST, &uri, Some(&owner), Some(json!({ "userId": guest_id })))
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json()?,
        json!({ "error": false, "message": "User added to room successfully" })
    );

    let response = ctx
        .send(Method::POST, &uri, Some(&owner), Some(json!({ "userId": guest_id })))
        .await?;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.json()?["message"],
        "User is already a member of the room"
    );

    let response = ctx
        .send(Method::POST, &uri, Some(&outsider), Some(json!({ "userId": third_id })))
        .await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json()?;
    assert_eq!(body["error"], true);
    assert_eq!(
        body["message"],
        "Access denied: Only room members can invite new members"
    );

    let response = ctx.send(Method::GET, &uri, Some(&guest), None).await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?.as_array().map(Vec::len), Some(2));

    let response = ctx.send(Method::GET, &uri, Some(&outsider), None).await?;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn add_member_answers_malformed_bodies_with_tagged_results() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, owner) = ctx.sign_up("owner").await?;
    let room_id = ctx.create_room(&owner, "private", false).await?;
    let uri = format!("/api/rooms/{room_id}/members");

    let response = ctx
        .send(Method::POST, &uri, None, Some(json!({ "user": "nobody" })))
        .await?;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json()?,
        json!({ "error": true, "message": "User not authenticated" })
    );

    let response = ctx.send(Method::POST, &uri, Some(&owner), None).await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json()?;
    assert_eq!(body["error"], true);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Validation error")),
        "{body}"
    );
    Ok(())
}

#[tokio::test]
async fn new_room_form_posts_to_create_action() -> TestResult {
    let ctx = TestContext::new().await?;

    let response = ctx.send(Method::GET, "/rooms/new", None, None).await?;
    assert_eq!(response.status, StatusCode::OK);

    let html = response.text();
    assert!(html.contains("<form"));
    assert!(html.contains(r#"name="name""#));
    assert!(html.contains(r#"name="isPublic""#));
    assert!(html.contains("/api/rooms"));
    Ok(())
}

#[tokio::test]
async fn remove_member_and_leave() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, owner) = ctx.sign_up("owner").await?;
    let (member_id, member) = ctx.sign_up("member").await?;
    let room_id = ctx.create_room(&owner, "open", true).await?;

    let response = ctx
        .send(Method::POST, &format!("/api/rooms/{room_id}/join"), Some(&member), None)
        .await?;
    assert_eq!(response.json()?["joined"], true);

    let uri = format!("/api/rooms/{room_id}/members/{member_id}");
    let response = ctx.send(Method::DELETE, &uri, Some(&owner), None).await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?["removed"], true);

    let response = ctx.send(Method::DELETE, &uri, Some(&member), None).await?;
    assert_eq!(response.json()?["removed"], false);
    Ok(())
}

#[tokio::test]
async fn messages_post_list_and_count() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, owner) = ctx.sign_up("owner").await?;
    let (_, stranger) = ctx.sign_up("stranger").await?;
    let room_id = ctx.create_room(&owner, "notes", false).await?;
    let uri = format!("/api/rooms/{room_id}/messages");

    for text in ["first", "second", "third"] {
        let response = ctx
            .send(Method::POST, &uri, Some(&owner), Some(json!({ "text": text })))
            .await?;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    }

    let response = ctx
        .send(Method::GET, &format!("{uri}?page_size=2"), Some(&owner), None)
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.json()?;
    assert_eq!(page[0]["text"], "third");
    assert_eq!(page[1]["text"], "second");
    assert_eq!(page.as_array().map(Vec::len), Some(2));

    let response = ctx
        .send(Method::GET, &format!("{uri}/count"), Some(&owner), None)
        .await?;
    assert_eq!(response.json()?["count"], 3);

    let response = ctx.send(Method::GET, &uri, Some(&stranger), None).await?;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx
        .send(Method::POST, &uri, Some(&stranger), Some(json!({ "text": "hi" })))
        .await?;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = ctx
        .send(Method::POST, &uri, Some(&owner), Some(json!({ "text": "   " })))
        .await?;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn search_and_stats() -> TestResult {
    let ctx = TestContext::new().await?;
    let (_, owner) = ctx.sign_up("owner").await?;
    let room_id = ctx.create_room(&owner, "plans", true).await?;

    let response = ctx.send(Method::GET, "/api/me/stats", Some(&owner), None).await?;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()?, Value::Null);

    let uri = format!("/api/rooms/{room_id}/messages");
    for text in ["ship the launch", "launch launch launch", "lunch?"] {
        ctx.send(Method::POST, &uri, Some(&owner), Some(json!({ "text": text })))
            .await?;
    }

    let response = ctx
        .send(Method::GET, "/api/messages/search?q=Launch", Some(&owner), None)
        .await?;
    assert_eq!(response.status, StatusCode::OK);
    let hits = response.json()?;
    assert_eq!(hits.as_array().map(Vec::len), Some(2));
    assert_eq!(hits[0]["text"], "launch launch launch");
    assert_eq!(hits[0]["room_name"], "plans");

    let response = ctx.send(Method::GET, "/api/me/stats", Some(&owner), None).await?;
    let stats = response.json()?;
    assert_eq!(stats["total_messages"], 3);
    assert_eq!(stats["rooms_participated"], 1);
    assert_eq!(stats["most_active_room_id"], room_id.as_str());

    let response = ctx.send(Method::GET, "/api/me/rooms", Some(&owner), None).await?;
    let rooms = response.json()?;
    assert_eq!(rooms[0]["id"], room_id.as_str());
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer() -> TestResult {
    let ctx = TestContext::new().await?;

    for uri in ["/api/auth/me", "/api/me/rooms", "/api/me/stats", "/api/messages/search?q=x"] {
        let response = ctx.send(Method::GET, uri, None, None).await?;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_room_routes() -> TestResult {
    let ctx = TestContext::new().await?;

    let response = ctx.send(Method::GET, "/api-docs/openapi.json", None, None).await?;
    assert_eq!(response.status, StatusCode::OK);

    let doc = response.json()?;
    assert!(doc["paths"]["/api/rooms"].is_object());
    assert!(doc["paths"]["/api/rooms/{room_id}/members"].is_object());
    Ok(())
}
