use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{error, info, info_span, instrument};

use crate::error::{RaceResultsError, Result};
use crate::model::timing_result::{SegmentResults, TimingResult};
use crate::results::SegmentResultsSource;

const AUTH_URL: &str = "https://secure.zwift.com/auth/realms/zwift/tokens/access/codes";
const RELAY_URL: &str = "https://us-or-rly101.zwift.com";
const CLIENT_ID: &str = "Zwift_Mobile_Link";
// Event results are recorded against the finish line segment.
const FINISH_SEGMENT_ID: &str = "1";
// Renew this long before the identity server says the token expires.
const EXPIRY_MARGIN_SECS: i64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Zwift account session: logs in with a password grant and reads from the relay API.
///
/// Cheap to clone; clones share the HTTP agent and the cached access token so the
/// login happens once per Lambda container.
#[derive(Clone)]
pub struct ZwiftAccount {
    username: String,
    password: String,
    world_id: u32,
    agent: ureq::Agent,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl std::fmt::Debug for ZwiftAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZwiftAccount")
            .field("username", &self.username)
            .field("world_id", &self.world_id)
            .finish_non_exhaustive()
    }
}

impl ZwiftAccount {
    pub fn new(username: String, password: String, world_id: u32) -> Self {
        Self {
            username,
            password,
            world_id,
            agent: ureq::Agent::new_with_defaults(),
            token: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a valid bearer token, logging in when none is cached or it has expired.
    fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let response_result = {
            let _span = info_span!("zwift_login", user = %self.username).entered();
            self.agent.post(AUTH_URL).send_form([
                ("client_id", CLIENT_ID),
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
        };
        let body = match response_result {
            Ok(response) => response.into_body().read_to_string().map_err(|e| {
                error!(error = %e, "Failed to read Zwift login response");
                RaceResultsError::Zwift(format!("Failed to read login response: {}", e))
            })?,
            Err(e) => {
                error!(error = %e, "Zwift login failed");
                return Err(RaceResultsError::Zwift(format!("Login failed: {}", e)));
            }
        };
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| RaceResultsError::Zwift(format!("Unexpected login response: {}", e)))?;

        let token = AccessToken {
            value: parsed.access_token,
            expires_at: Utc::now() + Duration::seconds(parsed.expires_in - EXPIRY_MARGIN_SECS),
        };
        info!(expires_at = %token.expires_at, "Logged in to Zwift");
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Fetch the raw, unordered segment results of an event subgroup. Blocking.
    #[instrument(level = "info", skip(self))]
    pub fn fetch_segment_results(&self, event_subgroup_id: &str) -> Result<Vec<TimingResult>> {
        let token = self.access_token()?;
        let url = format!("{}/api/segment-results", RELAY_URL);
        let response_result = self
            .agent
            .get(&url)
            .query("world_id", self.world_id.to_string())
            .query("segment_id", FINISH_SEGMENT_ID)
            .query("event_subgroup_id", event_subgroup_id)
            .query("full", "true")
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
            .call();

        match response_result {
            Ok(response) => {
                let body = response.into_body().read_to_string().map_err(|e| {
                    error!(error = %e, "Failed to read segment results body");
                    RaceResultsError::Zwift(format!("Failed to read response body: {}", e))
                })?;
                let results = Self::parse_segment_results(&body)?;
                info!(count = results.len(), "Fetched segment results");
                Ok(results)
            }
            Err(e) => {
                error!(error = %e, url = %url, "Segment results request failed");
                Err(RaceResultsError::Zwift(format!("Request failed: {}", e)))
            }
        }
    }

    /// Decode a relay `segment-results` JSON body (no network).
    pub fn parse_segment_results(body: &str) -> Result<Vec<TimingResult>> {
        serde_json::from_str::<SegmentResults>(body)
            .map(|doc| doc.segment_results)
            .map_err(|e| RaceResultsError::Zwift(format!("Failed to deserialize segment results: {}", e)))
    }
}

#[async_trait]
impl SegmentResultsSource for ZwiftAccount {
    async fn segment_results(&self, event_subgroup_id: &str) -> Result<Vec<TimingResult>> {
        // spawn_blocking needs 'static inputs
        let account = self.clone();
        let event_subgroup_id = event_subgroup_id.to_string();
        tokio::task::spawn_blocking(move || account.fetch_segment_results(&event_subgroup_id)).await?
    }
}
