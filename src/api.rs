//! Backend seam: player registration, level config and session results
//!
//! Wire types and URL building are plain Rust so they can be tested natively.
//! The actual HTTP calls go through the browser's `fetch` and only exist on
//! wasm32.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ENEMIES;
use crate::sim::{LevelConfig, SessionSummary};

/// Errors from talking to the backend or validating what it returned
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Player name was blank after trimming
    #[error("player name must not be empty")]
    EmptyName,

    /// Player id missing or not of the expected shape
    #[error("invalid player id: {0:?}")]
    InvalidPlayerId(String),

    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Body could not be encoded or decoded
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Body decoded but carries unusable values
    #[error("invalid level config: {0}")]
    InvalidConfig(String),
}

/// Opaque id handed out by the backend at registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Accept ids made of ASCII letters, digits, `-` and `_`
    ///
    /// The id ends up in a query string, so anything else is rejected rather
    /// than escaped.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(ApiError::InvalidPlayerId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim a typed name and reject blanks
pub fn validate_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::EmptyName);
    }
    Ok(name.to_string())
}

/// `POST /player` body
#[derive(Debug, Clone, Serialize)]
pub struct NewPlayer {
    pub name: String,
}

/// `POST /player` response (profile fields other than the id are ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredPlayer {
    pub id: String,
}

/// Extra numbers attached to a submitted session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub final_score: u64,
    pub lives_remaining: u32,
}

/// `POST /game-session` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSubmission {
    pub player_id: PlayerId,
    pub level: u32,
    pub score: u64,
    pub deaths: u32,
    /// Seconds
    pub completion_time: f64,
    pub difficulty_level: f32,
    pub performance_metrics: PerformanceMetrics,
}

impl From<&SessionSummary> for SessionSubmission {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            player_id: summary.player_id.clone(),
            level: summary.level,
            score: summary.score,
            deaths: summary.deaths,
            completion_time: summary.completion_time,
            difficulty_level: summary.difficulty_level,
            performance_metrics: PerformanceMetrics {
                final_score: summary.score,
                lives_remaining: summary.final_lives,
            },
        }
    }
}

/// Decode a registration response into a validated id
pub fn decode_player(body: &str) -> Result<PlayerId, ApiError> {
    let player: RegisteredPlayer = serde_json::from_str(body)?;
    PlayerId::parse(&player.id)
}

/// Decode a level config response, rejecting values the simulation can't use
pub fn decode_level_config(body: &str) -> Result<LevelConfig, ApiError> {
    let config: LevelConfig = serde_json::from_str(body)?;
    if config.enemy_count > MAX_ENEMIES {
        return Err(ApiError::InvalidConfig(format!("enemy_count {}", config.enemy_count)));
    }
    if !config.enemy_speed.is_finite() || config.enemy_speed < 0.0 {
        return Err(ApiError::InvalidConfig(format!("enemy_speed {}", config.enemy_speed)));
    }
    if !config.difficulty_level.is_finite() {
        return Err(ApiError::InvalidConfig(format!(
            "difficulty_level {}",
            config.difficulty_level
        )));
    }
    Ok(config)
}

/// Backend URL layout under `{base}/api`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api_root: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            api_root: format!("{}/api", base_url.trim_end_matches('/')),
        }
    }

    pub fn player(&self) -> String {
        format!("{}/player", self.api_root)
    }

    pub fn level_config(&self, level: u32, player_id: &PlayerId) -> String {
        format!(
            "{}/level/{}/config?player_id={}",
            self.api_root, level, player_id
        )
    }

    pub fn game_session(&self) -> String {
        format!("{}/game-session", self.api_root)
    }
}

/// Backend client; the request methods are browser-only
#[derive(Debug, Clone)]
pub struct ApiClient {
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::new(base_url),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ApiClient {
    /// Register a player by name and return the id to play under
    pub async fn register_player(&self, name: &str) -> Result<PlayerId, ApiError> {
        let name = validate_name(name)?;
        let body = serde_json::to_string(&NewPlayer { name })?;
        let text = http::send("POST", &self.endpoints.player(), Some(body)).await?;
        decode_player(&text)
    }

    /// Fetch the difficulty descriptor for `level`
    pub async fn fetch_level_config(
        &self,
        level: u32,
        player_id: &PlayerId,
    ) -> Result<LevelConfig, ApiError> {
        let url = self.endpoints.level_config(level, player_id);
        let text = http::send("GET", &url, None).await?;
        decode_level_config(&text)
    }

    /// Post a finished run; the response body is not needed
    pub async fn submit_session(&self, summary: &SessionSummary) -> Result<(), ApiError> {
        let body = serde_json::to_string(&SessionSubmission::from(summary))?;
        http::send("POST", &self.endpoints.game_session(), Some(body)).await?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod http {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::ApiError;

    fn js_error(value: JsValue) -> ApiError {
        ApiError::Network(format!("{:?}", value))
    }

    /// Send a JSON request and return the response body as text
    pub async fn send(method: &str, url: &str, body: Option<String>) -> Result<String, ApiError> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = body.as_deref() {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
        if body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
        }

        let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        if !response.ok() {
            return Err(ApiError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| ApiError::Network("response body is not text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_validation() {
        let id = PlayerId::parse(" 4c174090-18d8-4969-b19c-4e4bc8ad08ae ").unwrap();
        assert_eq!(id.as_str(), "4c174090-18d8-4969-b19c-4e4bc8ad08ae");

        assert!(matches!(PlayerId::parse(""), Err(ApiError::InvalidPlayerId(_))));
        assert!(matches!(PlayerId::parse("   "), Err(ApiError::InvalidPlayerId(_))));
        assert!(matches!(
            PlayerId::parse("a&b=c"),
            Err(ApiError::InvalidPlayerId(_))
        ));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Luigi ").unwrap(), "Luigi");
        assert!(matches!(validate_name(" \t"), Err(ApiError::EmptyName)));
    }

    #[test]
    fn test_endpoints() {
        let endpoints = Endpoints::new("https://game.example.com/");
        let id = PlayerId::parse("abc-123").unwrap();
        assert_eq!(endpoints.player(), "https://game.example.com/api/player");
        assert_eq!(
            endpoints.level_config(2, &id),
            "https://game.example.com/api/level/2/config?player_id=abc-123"
        );
        assert_eq!(
            endpoints.game_session(),
            "https://game.example.com/api/game-session"
        );
    }

    #[test]
    fn test_decode_player_ignores_profile_fields() {
        let body = r#"{"id":"p-1","name":"Mario","current_level":1,"score":0,
            "lives":3,"difficulty_level":1.0,"total_deaths":0}"#;
        assert_eq!(decode_player(body).unwrap().as_str(), "p-1");

        assert!(matches!(
            decode_player(r#"{"id":""}"#),
            Err(ApiError::InvalidPlayerId(_))
        ));
        assert!(matches!(decode_player("not json"), Err(ApiError::Json(_))));
    }

    #[test]
    fn test_decode_level_config() {
        let body = r#"{"enemy_count":4,"enemy_speed":1.3,"jump_gaps":2,
            "platform_spacing":111.0,"power_up_frequency":0.61,
            "level_length":1200,"difficulty_level":1.3}"#;
        let config = decode_level_config(body).unwrap();
        assert_eq!(config.enemy_count, 4);
        assert_eq!(config.enemy_speed, 1.3);
        assert_eq!(config.difficulty_level, 1.3);
    }

    #[test]
    fn test_decode_level_config_rejects_bad_values() {
        let negative_count = r#"{"enemy_count":-1,"enemy_speed":1.0,"difficulty_level":1.0}"#;
        assert!(matches!(
            decode_level_config(negative_count),
            Err(ApiError::Json(_))
        ));

        let negative_speed = r#"{"enemy_count":3,"enemy_speed":-2.0,"difficulty_level":1.0}"#;
        assert!(matches!(
            decode_level_config(negative_speed),
            Err(ApiError::InvalidConfig(_))
        ));

        let huge_count = r#"{"enemy_count":4294967295,"enemy_speed":1.0,"difficulty_level":1.0}"#;
        assert!(matches!(
            decode_level_config(huge_count),
            Err(ApiError::InvalidConfig(_))
        ));

        let at_cap = format!(
            r#"{{"enemy_count":{},"enemy_speed":1.0,"difficulty_level":1.0}}"#,
            MAX_ENEMIES
        );
        assert_eq!(decode_level_config(&at_cap).unwrap().enemy_count, MAX_ENEMIES);

        let missing = r#"{"enemy_count":3}"#;
        assert!(matches!(decode_level_config(missing), Err(ApiError::Json(_))));
    }

    #[test]
    fn test_submission_shape() {
        let summary = SessionSummary {
            player_id: PlayerId::parse("p-9").unwrap(),
            level: 3,
            score: 2300,
            deaths: 3,
            completion_time: 95.5,
            difficulty_level: 1.5,
            final_lives: 0,
        };
        let json = serde_json::to_value(SessionSubmission::from(&summary)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "player_id": "p-9",
                "level": 3,
                "score": 2300,
                "deaths": 3,
                "completion_time": 95.5,
                "difficulty_level": 1.5,
                "performance_metrics": {
                    "final_score": 2300,
                    "lives_remaining": 0
                }
            })
        );
    }
}
