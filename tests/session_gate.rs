//! Session gate and route surface, driven in-process

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_state, book_json, envelope};
use lectern::web;

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

/// Router whose gateway points nowhere; used where no handler runs
fn gated_router() -> axum::Router {
    web::create_router(app_state("http://127.0.0.1:9"))
}

#[tokio::test]
async fn protected_routes_redirect_to_login_without_a_credential() {
    for uri in ["/library", "/library/b-1", "/library/b-1/edit", "/library/new"] {
        let response = gated_router().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
        assert_eq!(location(&response), "/login", "{}", uri);
    }
}

#[tokio::test]
async fn root_routes_to_login_or_library_depending_on_credential() {
    let response = gated_router().oneshot(get("/", None)).await.unwrap();
    assert_eq!(location(&response), "/login");

    let response = gated_router()
        .oneshot(get("/", Some("token=abc")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/library");
}

#[tokio::test]
async fn public_destinations_pass_without_a_credential() {
    let response = gated_router().oneshot(get("/login", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = gated_router().oneshot(get("/register", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = gated_router().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn blank_credential_is_cleared_on_the_way_back_to_login() {
    let response = gated_router()
        .oneshot(get("/library", Some("token=")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing removal cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
}

#[tokio::test]
async fn login_success_sets_the_cookie_and_enters_the_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!({ "access_token": "issued-token" }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = web::create_router(app_state(&server.uri()));
    let response = app
        .oneshot(post_form("/login", None, "username=alice&password=secret"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/library");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("token=issued-token"));
    assert!(set_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn failed_login_stays_on_the_form_with_messages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let app = web::create_router(app_state(&server.uri()));
    let response = app
        .oneshot(post_form("/login", None, "username=alice&password=wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let view: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(view["errors"][0], "Invalid credentials");
}

#[tokio::test]
async fn listing_flows_through_to_the_catalog_api() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [book_json("b-1", 3, 5)],
            "meta": { "page": 1, "skip": 0, "limit": 10, "totalPages": 1, "totalItems": 1 }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let app = web::create_router(app_state(&server.uri()));
    let response = app
        .oneshot(get("/library", Some("token=test-access-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let view: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(view["books"][0]["title"], "Clean Code");
    assert_eq!(view["meta"]["totalItems"], 1);
}

#[tokio::test]
async fn malformed_quantity_settles_in_page_without_touching_the_api() {
    let server = MockServer::start().await;

    let app = web::create_router(app_state(&server.uri()));
    let response = app
        .oneshot(post_form(
            "/library/b-1/borrow",
            Some("token=test-access-token"),
            "qty=0",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let view: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(view["phase"], "settled");
    assert_eq!(view["outcome"], "rejected");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn rejected_credential_redirects_to_login_and_clears_the_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .mount(&server)
        .await;

    let app = web::create_router(app_state(&server.uri()));
    let response = app
        .oneshot(get("/library", Some("token=stale-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("missing removal cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let response = gated_router()
        .oneshot(post_form("/logout", Some("token=abc"), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("token="));
}
