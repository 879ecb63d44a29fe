//! Integration tests for `ApiClient` against a mock backend.

mod common;

use common::{client_for, FakeSession};
use echo_http::{ApiRequest, HttpError, RequestOptions};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_attaches_bearer_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::with_token("tok-1"), 0);
    let body: Value = client.send(ApiRequest::get("/auth/me")).await.unwrap();
    assert_eq!(body["id"], "u1");
}

#[tokio::test]
async fn test_no_authorization_header_without_credential() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/time-capsules/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 0);
    let body: Vec<Value> = client
        .send(ApiRequest::get("/time-capsules/public"))
        .await
        .unwrap();
    assert!(body.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_invokes_hook_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo-wall/my-echoes"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})),
        )
        .expect(4)
        .mount(&server)
        .await;

    let session = FakeSession::with_token("expired");
    let client = client_for(&server, session.clone(), 3);
    let result: Result<Value, _> = client.send(ApiRequest::get("/echo-wall/my-echoes")).await;

    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.detail(), Some("Could not validate credentials"));
    assert_eq!(session.unauthorized_calls(), 1);
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_unauthorized_then_success_keeps_session() {
    let server = MockServer::start().await;
    let attempt = AtomicU32::new(0);
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(move |_: &wiremock::Request| {
            if attempt.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(401)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({"id": "u1"}))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let session = FakeSession::with_token("t1");
    let client = client_for(&server, session.clone(), 1);
    let body: Value = client.send(ApiRequest::get("/auth/me")).await.unwrap();

    assert_eq!(body["id"], "u1");
    assert_eq!(session.unauthorized_calls(), 0);
    assert_eq!(session.token().as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/time-capsules/c1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 0);
    let result: Result<Value, _> = client.send(ApiRequest::delete("/time-capsules/c1")).await;
    assert_eq!(result.unwrap_err().status(), Some(503));
}

#[tokio::test]
async fn test_server_error_retried_then_success() {
    let server = MockServer::start().await;
    let attempt = AtomicU32::new(0);
    Mock::given(method("GET"))
        .and(path("/echo-wall/emotions"))
        .respond_with(move |_: &wiremock::Request| {
            if attempt.fetch_add(1, Ordering::SeqCst) == 0 {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200).set_body_json(json!([{"value": "joy"}]))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 1);
    let body: Vec<Value> = client
        .send(ApiRequest::get("/echo-wall/emotions"))
        .await
        .unwrap();
    assert_eq!(body.len(), 1);
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/echo-wall/recent"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 2);
    let result: Result<Value, _> = client.send(ApiRequest::get("/echo-wall/recent")).await;
    assert_eq!(result.unwrap_err().status(), Some(503));
}

#[tokio::test]
async fn test_client_error_retried_per_policy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
        )
        .expect(4)
        .mount(&server)
        .await;

    let session = FakeSession::anonymous();
    let client = client_for(&server, session.clone(), 3);
    let request = ApiRequest::post("/auth/register")
        .json(&json!({"email": "a@x.com", "password": "pw"}))
        .unwrap();
    let err = client.send::<Value>(request).await.unwrap_err();

    assert_eq!(
        err,
        HttpError::Rejected {
            status: 400,
            detail: Some("Email already registered".to_string())
        }
    );
    assert_eq!(session.unauthorized_calls(), 0);
}

#[tokio::test]
async fn test_timeout_maps_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 0);
    let request = ApiRequest::get("/slow").options(RequestOptions::default().timeout_ms(50));
    let err = client.send::<Value>(request).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_form_body_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=a%40x.com"))
        .and(body_string_contains("password=pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/forgot-password"))
        .and(query_param("email", "a@x.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "sent"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::anonymous(), 0);
    let login: Value = client
        .send(ApiRequest::post("/auth/login").form([("username", "a@x.com"), ("password", "pw")]))
        .await
        .unwrap();
    assert_eq!(login["access_token"], "t");

    let reset: Value = client
        .send(ApiRequest::post("/auth/forgot-password").query("email", "a@x.com"))
        .await
        .unwrap();
    assert_eq!(reset["message"], "sent");
}

#[tokio::test]
async fn test_empty_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/time-capsules/c1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, FakeSession::with_token("t"), 0);
    let body: Option<Value> = client
        .send(ApiRequest::delete("/time-capsules/c1"))
        .await
        .unwrap();
    assert!(body.is_none());
}
