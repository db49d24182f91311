//! Typed helpers for the identity and user endpoints.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::KloutClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Identity, Influence, Score, Topic, User};

impl<T: Transport> KloutClient<T> {
    /// Klout identity for a numeric Twitter user id.
    pub fn identity_by_twitter_id(&self, twitter_id: &str) -> Result<Identity, ApiError> {
        self.get_as(&format!("identity.json/tw/{}", segment(twitter_id)), &[])
    }

    /// Klout identity for a Twitter screen name.
    pub fn identity_by_screen_name(&self, screen_name: &str) -> Result<Identity, ApiError> {
        self.get_as("identity.json/twitter", &[("screenName", screen_name)])
    }

    pub fn identity_by_google_id(&self, google_id: &str) -> Result<Identity, ApiError> {
        self.get_as(&format!("identity.json/gp/{}", segment(google_id)), &[])
    }

    pub fn identity_by_instagram_id(&self, instagram_id: &str) -> Result<Identity, ApiError> {
        self.get_as(&format!("identity.json/ig/{}", segment(instagram_id)), &[])
    }

    /// Twitter identity behind a Klout id.
    pub fn twitter_identity_for(&self, klout_id: &str) -> Result<Identity, ApiError> {
        self.get_as(&format!("identity.json/klout/{}/tw", segment(klout_id)), &[])
    }

    pub fn user(&self, klout_id: &str) -> Result<User, ApiError> {
        self.get_as(&format!("user.json/{}", segment(klout_id)), &[])
    }

    pub fn score(&self, klout_id: &str) -> Result<Score, ApiError> {
        self.get_as(&format!("user.json/{}/score", segment(klout_id)), &[])
    }

    /// Topics a user is influential about. Empty in disable mode.
    pub fn topics(&self, klout_id: &str) -> Result<Vec<Topic>, ApiError> {
        if self.config().is_disabled() {
            return Ok(Vec::new());
        }
        self.get_as(&format!("user.json/{}/topics", segment(klout_id)), &[])
    }

    pub fn influence(&self, klout_id: &str) -> Result<Influence, ApiError> {
        self.get_as(&format!("user.json/{}/influence", segment(klout_id)), &[])
    }

    fn get_as<R: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<R, ApiError> {
        decode(self.get(path, query)?)
    }
}

/// Ids are single path segments, so `/`, `?` and `#` are escaped too.
fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

fn decode<R: DeserializeOwned>(value: Value) -> Result<R, ApiError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::{HttpRequest, HttpResponse};

    /// Answers every request with one canned body and remembers the URLs.
    struct Canned {
        status: u16,
        body: String,
        urls: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(status: u16, body: Value) -> Self {
            Self {
                status,
                body: body.to_string(),
                urls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.urls.borrow_mut().push(request.url.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client(transport: Canned) -> KloutClient<Canned> {
        KloutClient::with_transport(ClientConfig::new("k"), transport)
    }

    #[test]
    fn identity_paths() {
        let c = client(Canned::new(200, json!({"id": "635263", "network": "ks"})));
        assert_eq!(c.identity_by_twitter_id("500042487").unwrap().id, "635263");
        c.identity_by_screen_name("jtimberlake").unwrap();
        c.identity_by_google_id("112975106809988327760").unwrap();
        c.identity_by_instagram_id("42").unwrap();
        c.twitter_identity_for("635263").unwrap();

        let urls = c.transport().urls.borrow();
        assert_eq!(
            *urls,
            vec![
                "http://api.klout.com/v2/identity.json/tw/500042487?key=k",
                "http://api.klout.com/v2/identity.json/twitter?screenName=jtimberlake&key=k",
                "http://api.klout.com/v2/identity.json/gp/112975106809988327760?key=k",
                "http://api.klout.com/v2/identity.json/ig/42?key=k",
                "http://api.klout.com/v2/identity.json/klout/635263/tw?key=k",
            ]
        );
    }

    #[test]
    fn score_decodes() {
        let c = client(Canned::new(
            200,
            json!({"score": 84.2, "bucket": "80-89", "scoreDelta": {"dayChange": 0.3}}),
        ));
        let score = c.score("635263").unwrap();
        assert_eq!(score.score, 84.2);
        assert_eq!(score.score_delta.unwrap().day_change, 0.3);
        assert_eq!(
            c.transport().urls.borrow()[0],
            "http://api.klout.com/v2/user.json/635263/score?key=k"
        );
    }

    #[test]
    fn topics_shape_mismatch_is_decode_error() {
        let c = client(Canned::new(200, json!({"not": "a list"})));
        assert!(matches!(c.topics("1").unwrap_err(), ApiError::Decode(_)));
    }

    #[test]
    fn http_errors_pass_through_typed_helpers() {
        let c = client(Canned::new(404, json!({})));
        assert!(matches!(c.user("1").unwrap_err(), ApiError::NotFound));
    }

    #[test]
    fn disabled_mode_decodes_into_extra() {
        let mut c = client(Canned::new(500, json!({})));
        c.disable();
        let user = c.user("1").unwrap();
        assert_eq!(user.extra.get("Disabled"), Some(&json!(true)));
        assert!(c.topics("1").unwrap().is_empty());
        assert!(c.transport().urls.borrow().is_empty());
    }

    #[test]
    fn ids_are_escaped_as_one_segment() {
        let c = client(Canned::new(200, json!({"kloutId": "1"})));
        c.user("1?x=").unwrap();
        c.user("a/b").unwrap();
        c.identity_by_twitter_id("a b#c").unwrap();

        let urls = c.transport().urls.borrow();
        assert_eq!(
            *urls,
            vec![
                "http://api.klout.com/v2/user.json/1%3Fx%3D?key=k",
                "http://api.klout.com/v2/user.json/a%2Fb?key=k",
                "http://api.klout.com/v2/identity.json/tw/a%20b%23c?key=k",
            ]
        );
    }
}
