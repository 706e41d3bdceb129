//! Catalog query service against a mock catalog API

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{book_json, borrow_record_json, envelope, services, token};
use lectern::error::AppError;
use lectern::models::BookQuery;

#[tokio::test]
async fn search_is_forwarded_and_pagination_metadata_round_trips() {
    let server = MockServer::start().await;

    // Catalog holds "Clean Code" and "Design Patterns"; the server-side
    // search for "clean" matches exactly one.
    Mock::given(method("GET"))
        .and(path("/v1/books"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "clean"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [book_json("b-1", 3, 5)],
            "meta": { "page": 1, "skip": 0, "limit": 10, "totalPages": 1, "totalItems": 1 }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let query = BookQuery {
        page: 1,
        limit: 10,
        search: "clean".to_string(),
    };
    let page = services(&server.uri())
        .catalog
        .list_books(&token(), &query)
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].title, "Clean Code");
    assert_eq!(page.meta.total_items, 1);
}

#[tokio::test]
async fn page_and_limit_are_clamped_to_at_least_one() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [],
            "meta": { "page": 1, "skip": 0, "limit": 1, "totalPages": 0, "totalItems": 0 }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let query = BookQuery {
        page: 0,
        limit: -3,
        search: String::new(),
    };
    let page = services(&server.uri())
        .catalog
        .list_books(&token(), &query)
        .await
        .unwrap();

    assert!(page.data.is_empty());
}

#[tokio::test]
async fn fetching_the_same_book_twice_returns_identical_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books/b-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(book_json("b-1", 2, 5))))
        .expect(2)
        .mount(&server)
        .await;

    let catalog = services(&server.uri()).catalog;
    let first = catalog.get_book(&token(), "b-1").await.unwrap();
    let second = catalog.get_book(&token(), "b-1").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_book_propagates_as_a_terminal_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Book not found" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = services(&server.uri())
        .catalog
        .get_book(&token(), "missing")
        .await;

    match result {
        Err(AppError::Remote { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Book not found");
        }
        other => panic!("expected not-found, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn open_loan_flag_reflects_unreturned_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/books/b-1/borrows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            borrow_record_json("l-1", Some("2024-03-10T09:00:00Z")),
            borrow_record_json("l-2", None)
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/books/b-2/borrows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            borrow_record_json("l-3", Some("2024-03-10T09:00:00Z"))
        ]))))
        .mount(&server)
        .await;

    let catalog = services(&server.uri()).catalog;
    assert!(catalog.user_has_open_loan(&token(), "b-1").await.unwrap());
    assert!(!catalog.user_has_open_loan(&token(), "b-2").await.unwrap());
}
