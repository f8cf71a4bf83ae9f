//! HTTP-level tests driving the full router over the in-memory store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use book_tracker_server::{api, repository::MemoryBookRepository, AppConfig, AppState};

fn app() -> Router {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryBookRepository::new()));
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

async fn create(app: &Router, name: &str, isbn: &str, release_date: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/books",
        Some(json!({
            "name": name,
            "author": "Test Author",
            "isbn": isbn,
            "releaseDate": release_date
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    let mut keys: Vec<&String> = body.as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["status", "version"]);
}

#[tokio::test]
async fn test_create_rejects_empty_body() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/api/books", Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["author", "isbn", "name", "releaseDate"]);
}

#[tokio::test]
async fn test_create_rejects_each_missing_field() {
    let app = app();
    let complete = json!({
        "name": "1984",
        "author": "George Orwell",
        "isbn": "9780451524935",
        "releaseDate": "1949-06-08"
    });

    for field in ["name", "author", "isbn", "releaseDate"] {
        let mut payload = complete.clone();
        payload.as_object_mut().unwrap().remove(field);

        let (status, body) = send(&app, Method::POST, "/api/books", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "missing {}", field);
        assert!(!body["errors"].as_array().unwrap().is_empty());
        assert_eq!(body["errors"][0]["field"], field);
    }
}

#[tokio::test]
async fn test_create_rejects_non_iso_release_date() {
    let app = app();
    for release_date in ["06/08/1949", "1949-13-01", "2023-02-30", "yesterday"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({
                "name": "1984",
                "author": "George Orwell",
                "isbn": "9780451524935",
                "releaseDate": release_date
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", release_date);
        assert_eq!(body["errors"][0]["field"], "releaseDate");
    }
}

#[tokio::test]
async fn test_create_rejects_missing_or_malformed_body() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/books", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");

    let (status, _) = send(&app, Method::POST, "/api/books", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/books", Some(json!({ "name": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_and_get_by_id() {
    let app = app();
    let created = create(&app, "Cien Años de Soledad", "9780307474728", "1967-06-05").await;

    assert_eq!(created["name"], "Cien Años de Soledad");
    assert_eq!(created["releaseDate"], "1967-06-05");
    assert_eq!(created["availability"], true);
    let id = created["id"].as_i64().expect("No book ID");

    let (status, fetched) = send(&app, Method::GET, &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    for key in ["id", "name", "author", "isbn", "releaseDate", "availability", "createdAt"] {
        assert_eq!(fetched[key], created[key], "{}", key);
    }
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id_and_availability() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "id": 500,
            "name": "El Hobbit",
            "author": "J.R.R. Tolkien",
            "isbn": "9780547928227",
            "releaseDate": "1937-09-21",
            "availability": false
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["availability"], true);
}

#[tokio::test]
async fn test_duplicate_isbn_conflicts() {
    let app = app();
    create(&app, "El Principito", "9780156012195", "1943-04-06").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "name": "Otro",
            "author": "Otro",
            "isbn": "9780156012195",
            "releaseDate": "2000-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_get_by_id_rejects_invalid_ids() {
    let app = app();
    create(&app, "El Hobbit", "9780547928227", "1937-09-21").await;

    for uri in [
        "/api/books/abc",
        "/api/books/0",
        "/api/books/-3",
        "/api/books/+1",
        "/api/books/1.0",
        "/api/books/99999999999",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["errors"][0]["field"], "id");
    }

    let (status, body) = send(&app, Method::GET, "/api/books/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_books_envelope_and_order() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert!(body.get("errors").is_none());

    create(&app, "Drácula", "9780141439846", "1897-05-26").await;
    create(&app, "El código Da Vinci", "9780307474278", "2003-03-18").await;
    create(&app, "Frankenstein", "9780486282114", "1818-01-01").await;

    let (status, body) = send(&app, Method::GET, "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("errors").is_none());
    let dates: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["releaseDate"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2003-03-18", "1897-05-26", "1818-01-01"]);
}

#[tokio::test]
async fn test_search_by_isbn() {
    let app = app();
    let created = create(&app, "El Hobbit", "9780547928227", "1937-09-21").await;

    let uri = "/api/books/search?isbn=9780547928227";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);

    let (status, _) = send(&app, Method::GET, "/api/books/search?isbn=0000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for uri in ["/api/books/search", "/api/books/search?isbn=", "/api/books/search?isbn=%20"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["errors"][0]["field"], "isbn");
    }
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let created = create(&app, "Matar a un ruiseñor", "9780446310789", "1960-07-11").await;
    let uri = format!("/api/books/{}", created["id"]);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "name": "Matar a un ruiseñor",
            "author": "Harper Lee",
            "isbn": "9780446310789",
            "releaseDate": "11-07-1960"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "name": "Matar a un ruiseñor (Edición Especial)",
            "author": "Harper Lee",
            "isbn": "9780446310789",
            "releaseDate": "1960-07-11"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Matar a un ruiseñor (Edición Especial)");
    assert_eq!(body["author"], "Harper Lee");
    assert_eq!(body["id"], created["id"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/books/9999",
        Some(json!({
            "name": "Invisible Man",
            "author": "Ralph Ellison",
            "isbn": "9780679732761",
            "releaseDate": "1952-04-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_availability_twice_restores_value() {
    let app = app();
    let created = create(&app, "El código Da Vinci", "9780307474278", "2003-03-18").await;
    let uri = format!("/api/books/{}", created["id"]);

    let (status1, first) = send(&app, Method::PATCH, &uri, None).await;
    let (status2, second) = send(&app, Method::PATCH, &uri, None).await;

    assert_eq!(status1, StatusCode::OK);
    assert_eq!(status2, StatusCode::OK);
    assert_eq!(first["availability"], false);
    assert_eq!(second["availability"], created["availability"]);

    let (status, _) = send(&app, Method::PATCH, "/api/books/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PATCH, "/api/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = app();
    let created = create(&app, "El Principito", "9780156012195", "1943-04-06").await;
    let uri = format!("/api/books/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("deleted"));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_padded_isbn_is_stored_trimmed_and_searchable() {
    let app = app();
    let created = create(&app, "Cien Años de Soledad", " 9780307474728 ", "1967-06-05").await;
    assert_eq!(created["isbn"], "9780307474728");

    for uri in [
        "/api/books/search?isbn=9780307474728",
        "/api/books/search?isbn=%209780307474728%20",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["id"], created["id"]);
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({
            "name": "   ",
            "author": "Test Author",
            "isbn": "9780000000001",
            "releaseDate": "2000-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "name");
}

#[tokio::test]
async fn test_update_to_taken_isbn_conflicts() {
    let app = app();
    let first = create(&app, "Drácula", "9780141439846", "1897-05-26").await;
    let second = create(&app, "Frankenstein", "9780486282114", "1818-01-01").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", second["id"]),
        Some(json!({
            "name": "Frankenstein",
            "author": "Mary Shelley",
            "isbn": first["isbn"],
            "releaseDate": "1818-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let uri = format!("/api/books/{}", second["id"]);
    let (_, unchanged) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(unchanged["isbn"], "9780486282114");
}
