use auth_svc::{build_router, STUB_TOKEN};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

async fn post_login(content_type: Option<&str>, body: Body) -> (StatusCode, Option<String>, Vec<u8>) {
    let mut request = Request::builder().method(Method::POST).uri("/login");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }

    let response = build_router()
        .oneshot(request.body(body).unwrap())
        .await
        .expect("login response");

    let (parts, body) = response.into_parts();
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = body.collect().await.unwrap().to_bytes().to_vec();
    (parts.status, content_type, bytes)
}

#[tokio::test]
async fn login_returns_stub_token_for_any_body() {
    let bodies = [
        (None, Body::empty()),
        (
            Some("application/json"),
            Body::from(r#"{"username":"admin","password":"wrong"}"#),
        ),
        (Some("application/json"), Body::from("{not json")),
        (Some("text/plain"), Body::from("hello")),
        (
            Some("application/octet-stream"),
            Body::from(vec![0u8, 159, 146, 150]),
        ),
    ];

    for (content_type, body) in bodies {
        let (status, response_type, bytes) = post_login(content_type, body).await;
        assert_eq!(status, StatusCode::OK, "content type {content_type:?}");
        assert_eq!(response_type.as_deref(), Some("application/json"));
        assert_eq!(bytes, br#"{"token":"secure_jwt_token"}"#);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "token": STUB_TOKEN }));
    }
}

#[tokio::test]
async fn login_ignores_oversized_bodies() {
    let body = Body::from(vec![b'x'; 4 * 1024 * 1024]);
    let (status, _, bytes) = post_login(Some("application/json"), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, br#"{"token":"secure_jwt_token"}"#);
}

#[tokio::test]
async fn login_only_accepts_post() {
    let response = build_router()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = build_router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/login")
                .header("x-request-id", "login-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "login-1");
}
