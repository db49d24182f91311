use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::ACCEPT, "application/json")
        .body(String::new())
        .unwrap()
}

// --- key check ---

#[tokio::test]
async fn missing_key_returns_401() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/user.json/635263"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn wrong_key_returns_401() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/user.json/635263?key=nope"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- identity ---

#[tokio::test]
async fn identity_by_twitter_id() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/identity.json/tw/500042487?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["id"], "635263");
    assert_eq!(json["network"], "ks");
}

#[tokio::test]
async fn identity_by_screen_name_is_case_insensitive() {
    let resp = app(KEY)
        .oneshot(request(
            "GET",
            "/v2/identity.json/twitter?screenName=StephenFry&key=test-key",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["id"], "87824");
}

#[tokio::test]
async fn identity_by_screen_name_requires_name() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/identity.json/twitter?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"], "screenName is required");
}

#[tokio::test]
async fn twitter_identity_for_klout_id() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/identity.json/klout/635263/tw?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["id"], "500042487");
    assert_eq!(json["network"], "tw");
}

#[tokio::test]
async fn unknown_identity_returns_404() {
    let resp = app(KEY)
        .oneshot(request("GET", "/v2/identity.json/gp/0?key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- user ---

#[tokio::test]
async fn user_endpoints() {
    let app = app(KEY);

    let resp = app
        .clone()
        .oneshot(request("GET", "/v2/user.json/635263?key=test-key"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await;
    assert_eq!(user["nick"], "jtimberlake");
    assert_eq!(user["score"]["score"], 84.25);

    let resp = app
        .clone()
        .oneshot(request("GET", "/v2/user.json/635263/score?key=test-key"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["bucket"], "80-89");

    let resp = app
        .clone()
        .oneshot(request("GET", "/v2/user.json/635263/topics?key=test-key"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await.as_array().unwrap().len(), 2);

    let resp = app
        .oneshot(request("GET", "/v2/user.json/635263/influence?key=test-key"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let influence = body_json(resp).await;
    assert_eq!(influence["myInfluencersCount"], 1);
    assert_eq!(influence["myInfluencers"][0]["entity"]["id"], "87824");
}

// --- status ---

#[tokio::test]
async fn status_route_answers_any_method() {
    for (method, code) in [("GET", 400u16), ("POST", 418), ("PUT", 503), ("DELETE", 200)] {
        let resp = app(KEY)
            .oneshot(request(method, &format!("/v2/status/{code}?key=test-key")))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), code, "{method} {code}");
        assert_eq!(body_json(resp).await["code"], code);
    }
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_request() {
    let resp = app(KEY)
        .oneshot(request("PUT", "/v2/echo?a=1&key=test-key"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["method"], "PUT");
    assert_eq!(json["headers"]["accept"], "application/json");
    assert_eq!(json["query"]["a"], "1");
}
