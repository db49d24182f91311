//! A stand-in for the Klout v2 API over a fixed fixture.
//!
//! Every route lives under `/v2` and requires `key=<api key>` in the query
//! string. `/v2/status/{code}` answers any method with the given status so
//! clients can exercise their error mapping; `/v2/echo` reflects the request.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One user in the fixture, reachable through all of its identities.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub klout_id: String,
    pub twitter_id: String,
    pub screen_name: String,
    pub google_id: String,
    pub instagram_id: String,
    pub nick: String,
    pub score: f64,
    pub bucket: String,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    profiles: Arc<Vec<Profile>>,
}

impl AppState {
    fn find(&self, pred: impl Fn(&Profile) -> bool) -> Result<&Profile, StatusCode> {
        self.profiles.iter().find(|p| pred(*p)).ok_or(StatusCode::NOT_FOUND)
    }
}

/// The fixture every `app` serves.
pub fn fixture() -> Vec<Profile> {
    vec![
        Profile {
            klout_id: "635263".to_string(),
            twitter_id: "500042487".to_string(),
            screen_name: "jtimberlake".to_string(),
            google_id: "112975106809988327760".to_string(),
            instagram_id: "1163171".to_string(),
            nick: "jtimberlake".to_string(),
            score: 84.25,
            bucket: "80-89".to_string(),
        },
        Profile {
            klout_id: "87824".to_string(),
            twitter_id: "16303106".to_string(),
            screen_name: "stephenfry".to_string(),
            google_id: "103400946341458271456".to_string(),
            instagram_id: "2210101".to_string(),
            nick: "stephenfry".to_string(),
            score: 91.5,
            bucket: "90-99".to_string(),
        },
    ]
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        profiles: Arc::new(fixture()),
    };
    let v2 = Router::new()
        .route("/identity.json/tw/{id}", get(identity_by_twitter_id))
        .route("/identity.json/twitter", get(identity_by_screen_name))
        .route("/identity.json/gp/{id}", get(identity_by_google_id))
        .route("/identity.json/ig/{id}", get(identity_by_instagram_id))
        .route("/identity.json/klout/{id}/tw", get(twitter_identity))
        .route("/user.json/{id}", get(user))
        .route("/user.json/{id}/score", get(score))
        .route("/user.json/{id}/topics", get(topics))
        .route("/user.json/{id}/influence", get(influence))
        .route("/status/{code}", any(status))
        .route("/echo", any(echo))
        .layer(middleware::from_fn_with_state(state.clone(), require_key))
        .with_state(state);
    Router::new().nest("/v2", v2)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_key(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    if params.get("key").map(String::as_str) != Some(&*state.api_key) {
        tracing::debug!(path = %request.uri().path(), "rejecting request without a valid key");
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

fn ks_identity(profile: &Profile) -> Json<Value> {
    Json(json!({"id": profile.klout_id, "network": "ks"}))
}

async fn identity_by_twitter_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.twitter_id == id).map(ks_identity)
}

async fn identity_by_screen_name(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Some(name) = params.get("screenName") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "screenName is required"})),
        )
            .into_response();
    };
    match state.find(|p| p.screen_name.eq_ignore_ascii_case(name)) {
        Ok(profile) => ks_identity(profile).into_response(),
        Err(status) => status.into_response(),
    }
}

async fn identity_by_google_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.google_id == id).map(ks_identity)
}

async fn identity_by_instagram_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.instagram_id == id).map(ks_identity)
}

async fn twitter_identity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let profile = state.find(|p| p.klout_id == id)?;
    Ok(Json(json!({"id": profile.twitter_id, "network": "tw"})))
}

fn user_json(profile: &Profile) -> Value {
    json!({
        "kloutId": profile.klout_id,
        "nick": profile.nick,
        "score": {"score": profile.score, "bucket": profile.bucket},
        "scoreDeltas": {"dayChange": 0.25, "weekChange": -0.5, "monthChange": 1.0},
    })
}

async fn user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.klout_id == id).map(|p| Json(user_json(p)))
}

async fn score(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let profile = state.find(|p| p.klout_id == id)?;
    Ok(Json(json!({
        "score": profile.score,
        "bucket": profile.bucket,
        "scoreDelta": {"dayChange": 0.25, "weekChange": -0.5, "monthChange": 1.0},
    })))
}

async fn topics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.klout_id == id)?;
    Ok(Json(json!([
        {
            "id": "6715",
            "displayName": "Music",
            "name": "Music",
            "slug": "music",
            "imageUrl": "http://kcdn3.klout.com/static/images/music.png",
            "displayType": "entity",
            "topicType": "sub",
        },
        {
            "id": "10000000000000016635",
            "displayName": "Television",
            "name": "Television",
            "slug": "television",
            "imageUrl": "http://kcdn3.klout.com/static/images/tv.png",
            "displayType": "entity",
            "topicType": "sub",
        },
    ])))
}

async fn influence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.find(|p| p.klout_id == id)?;
    let others: Vec<Value> = state
        .profiles
        .iter()
        .filter(|p| p.klout_id != id)
        .map(|p| json!({"entity": {"id": p.klout_id, "payload": user_json(p)}}))
        .collect();
    Ok(Json(json!({
        "myInfluencers": others,
        "myInfluencees": [],
        "myInfluencersCount": others.len(),
        "myInfluenceesCount": 0,
    })))
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    (status, Json(json!({"code": code, "message": format!("status {code}")}))).into_response()
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let headers: HashMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    Json(json!({"method": method.as_str(), "headers": headers, "query": params}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_ids_are_unique() {
        let profiles = fixture();
        for (i, a) in profiles.iter().enumerate() {
            for b in &profiles[i + 1..] {
                assert_ne!(a.klout_id, b.klout_id);
                assert_ne!(a.twitter_id, b.twitter_id);
                assert_ne!(a.screen_name, b.screen_name);
            }
        }
    }

    #[test]
    fn user_json_uses_camel_case() {
        let json = user_json(&fixture()[0]);
        assert_eq!(json["kloutId"], "635263");
        assert_eq!(json["score"]["bucket"], "80-89");
        assert!(json.get("scoreDeltas").is_some());
    }

    #[test]
    fn profile_roundtrips_through_json() {
        let profile = fixture().remove(1);
        let back: Profile = serde_json::from_value(serde_json::to_value(&profile).unwrap()).unwrap();
        assert_eq!(back.klout_id, profile.klout_id);
        assert_eq!(back.score, profile.score);
    }
}
