//! Records returned by the Klout API.
//!
//! # Design
//! Field names follow the API's camelCase JSON. Every field defaults when the
//! server omits it, and object records keep unknown keys in `extra`, so a
//! response with fields this crate does not model still decodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Klout identity: the id of a user on one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub id: String,
    /// Network code, e.g. `ks` for Klout or `tw` for Twitter.
    pub network: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Klout user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub klout_id: String,
    pub nick: String,
    pub score: Option<UserScore>,
    pub score_deltas: Option<ScoreDeltas>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The score embedded in a `User` profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserScore {
    pub score: f64,
    pub bucket: String,
}

/// Score movement over the last day, week and month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoreDeltas {
    pub day_change: f64,
    pub week_change: f64,
    pub month_change: f64,
}

/// Response of the `user.json/{id}/score` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Score {
    pub score: f64,
    pub bucket: String,
    pub score_delta: Option<ScoreDeltas>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub display_name: String,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub display_type: String,
    pub topic_type: String,
}

/// Who a user influences and who influences them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Influence {
    #[serde(rename = "myInfluencers")]
    pub influencers: Vec<InfluenceEntry>,
    #[serde(rename = "myInfluencees")]
    pub influencees: Vec<InfluenceEntry>,
    #[serde(rename = "myInfluencersCount")]
    pub influencers_count: u64,
    #[serde(rename = "myInfluenceesCount")]
    pub influencees_count: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceEntry {
    pub entity: InfluenceEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceEntity {
    pub id: String,
    pub payload: User,
}
