//! # SSO Authentication Manager
//!
//! This module handles the EVE SSO login (OAuth2 authorization code with
//! PKCE) and access token lifecycle for ESI calls.
//!
//! ## Authentication Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SSO Authentication Flow                          │
//! │                                                                         │
//! │  ┌────────────────┐     ┌─────────────────┐     ┌─────────────────┐    │
//! │  │   cargohold    │     │  login.eve      │     │ esi.evetech.net │    │
//! │  │   (SsoAuth)    │     │  online.com     │     │ /verify/        │    │
//! │  └───────┬────────┘     └────────┬────────┘     └────────┬────────┘    │
//! │          │                       │                       │             │
//! │          │  1. authorize URL     │                       │             │
//! │          │    (challenge, state) │                       │             │
//! │          │──────────────────────►│  user logs in,        │             │
//! │          │◄──────────────────────│  redirect w/ code     │             │
//! │          │                       │                       │             │
//! │          │  2. code + verifier   │                       │             │
//! │          │──────────────────────►│                       │             │
//! │          │◄──────────────────────│ access + refresh      │             │
//! │          │                       │                       │             │
//! │          │  3. Bearer token      │                       │             │
//! │          │──────────────────────────────────────────────►│             │
//! │          │◄──────────────────────────────────────────────│ character   │
//! │          │                       │                       │             │
//! │          │  [Later: token near expiry]                   │             │
//! │          │  4. refresh_token     │                       │             │
//! │          │──────────────────────►│                       │             │
//! │          │◄──────────────────────│ new access token      │             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Storage
//! Tokens live in memory behind an `RwLock` and are mirrored to a TOML
//! file in the platform config directory so a login survives process
//! restarts. Refresh happens 5 minutes before expiration.

use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::EsiConfig;
use crate::error::{EsiError, EsiResult};

/// Margin before token expiration to trigger refresh (5 minutes).
const REFRESH_MARGIN_SECS: i64 = 300;

/// Length of the random state parameter.
const STATE_LEN: usize = 8;

/// Number of random 32-bit words concatenated into the code verifier.
const VERIFIER_WORDS: usize = 56;

// =============================================================================
// PKCE Codes
// =============================================================================

/// One-shot PKCE material for a login attempt.
#[derive(Debug, Clone)]
pub struct PkceCodes {
    /// Plaintext code verifier, sent with the token exchange.
    pub verifier: String,

    /// S256 challenge derived from the verifier, sent with the
    /// authorization request.
    pub challenge: String,

    /// Random state echoed back by the SSO redirect.
    pub state: String,
}

impl PkceCodes {
    /// Generates fresh verifier, challenge, and state values.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();

        let verifier: String = (0..VERIFIER_WORDS)
            .map(|_| rng.gen::<u32>().to_string())
            .collect();

        let state: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(STATE_LEN)
            .map(char::from)
            .collect();

        let challenge = code_challenge(&verifier);

        PkceCodes {
            verifier,
            challenge,
            state,
        }
    }
}

/// Computes the S256 code challenge for a verifier.
fn code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

// =============================================================================
// Token Types
// =============================================================================

/// The character a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterInfo {
    /// ESI character id.
    pub character_id: i64,

    /// Character name.
    pub character_name: String,
}

/// Token information stored after authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// The bearer access token.
    pub access_token: String,

    /// Refresh token for getting new access tokens.
    pub refresh_token: Option<String>,

    /// When the access token expires.
    pub expires_at: DateTime<Utc>,

    /// Character the token was issued for, once verified.
    pub character: Option<CharacterInfo>,
}

impl TokenInfo {
    /// Check if the token is expired or about to expire.
    pub fn needs_refresh(&self) -> bool {
        Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    /// Check if the token is completely expired (no grace period).
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Get remaining valid time in seconds.
    pub fn remaining_secs(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// SSO token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

/// SSO token endpoint error body.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

/// Verify endpoint response.
///
/// The endpoint has answered in two shapes over the years; both are
/// accepted and normalized into [`CharacterInfo`].
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(rename = "CharacterID")]
    character_id: Option<i64>,
    #[serde(rename = "CharacterName")]
    character_name: Option<String>,
    sub: Option<String>,
    name: Option<String>,
}

impl VerifyResponse {
    /// Normalizes either response shape into character info.
    fn into_character(self) -> EsiResult<CharacterInfo> {
        let character_id = self
            .character_id
            .or_else(|| {
                // JWT-style subject: "CHARACTER:EVE:2119123456"
                self.sub
                    .as_deref()
                    .and_then(|sub| sub.split(':').nth(2))
                    .and_then(|id| id.parse().ok())
            })
            .ok_or_else(|| EsiError::AuthFailed("Verify response had no character id".into()))?;

        let character_name = self
            .character_name
            .or(self.name)
            .unwrap_or_default();

        Ok(CharacterInfo {
            character_id,
            character_name,
        })
    }
}

// =============================================================================
// SSO Auth Manager
// =============================================================================

/// SSO authentication manager.
///
/// Handles the PKCE login, automatic token refresh, and token
/// persistence across runs.
pub struct SsoAuth {
    /// Configuration.
    config: EsiConfig,
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Current token (if authenticated).
    token: Arc<RwLock<Option<TokenInfo>>>,
}

impl SsoAuth {
    /// Creates a new auth manager, loading any persisted token.
    pub fn new(config: EsiConfig) -> Self {
        let persisted = load_persisted_token();
        if persisted.is_some() {
            debug!("Loaded persisted SSO token");
        }

        SsoAuth {
            config,
            http: reqwest::Client::new(),
            token: Arc::new(RwLock::new(persisted)),
        }
    }

    /// Builds the SSO authorization URL for a login attempt.
    pub fn authorize_url(&self, codes: &PkceCodes) -> EsiResult<String> {
        let client_id = self.config.require_client_id()?;

        let url = reqwest::Url::parse_with_params(
            &self.config.auth_endpoint,
            &[
                ("response_type", "code"),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("client_id", client_id),
                ("scope", self.config.scopes.join(" ").as_str()),
                ("state", codes.state.as_str()),
                ("code_challenge", codes.challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| EsiError::AuthFailed(format!("Invalid authorize endpoint: {e}")))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code for tokens, verifies the character,
    /// and persists the result.
    pub async fn login_with_code(&self, code: &str, verifier: &str) -> EsiResult<CharacterInfo> {
        let mut token = self.exchange_code(code, verifier).await?;

        let character = self.verify(&token.access_token).await?;
        token.character = Some(character.clone());

        info!(
            character = %character.character_name,
            expires_in_secs = token.remaining_secs(),
            "Logged in"
        );

        persist_token(&token)?;
        *self.token.write().await = Some(token);

        Ok(character)
    }

    /// Get the current access token, refreshing it if needed.
    ///
    /// ## Flow
    /// 1. Cached token still fresh → return it
    /// 2. Token near or past expiry with a refresh token → refresh
    /// 3. Nothing usable → the user has to log in again
    pub async fn get_token(&self) -> EsiResult<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.needs_refresh() {
                    debug!(remaining_secs = token.remaining_secs(), "Using cached token");
                    return Ok(token.access_token.clone());
                }
            } else {
                return Err(EsiError::AuthRequired);
            }
        }

        let mut guard = self.token.write().await;

        // Double-check after acquiring the write lock.
        let current = guard.as_ref().ok_or(EsiError::AuthRequired)?;
        if !current.needs_refresh() {
            return Ok(current.access_token.clone());
        }

        let refresh_token = current
            .refresh_token
            .clone()
            .ok_or_else(|| EsiError::TokenExpired("No refresh token stored".into()))?;
        let character = current.character.clone();

        match self.refresh(&refresh_token).await {
            Ok(mut new_token) => {
                new_token.character = character;
                info!(
                    expires_in_secs = new_token.remaining_secs(),
                    "Token refreshed"
                );
                persist_token(&new_token)?;
                let access_token = new_token.access_token.clone();
                *guard = Some(new_token);
                Ok(access_token)
            }
            Err(e) => {
                warn!(?e, "Token refresh failed");
                Err(EsiError::TokenExpired(e.to_string()))
            }
        }
    }

    /// Returns the logged-in character, verifying the token if its
    /// character is not cached yet.
    pub async fn character(&self) -> EsiResult<CharacterInfo> {
        {
            let guard = self.token.read().await;
            if let Some(TokenInfo {
                character: Some(character),
                ..
            }) = guard.as_ref()
            {
                return Ok(character.clone());
            }
        }

        let access_token = self.get_token().await?;
        let character = self.verify(&access_token).await?;

        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_mut() {
            token.character = Some(character.clone());
            persist_token(token)?;
        }

        Ok(character)
    }

    /// Check if a token is held and not fully expired.
    pub async fn is_authenticated(&self) -> bool {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| !t.is_expired())
            .unwrap_or(false)
    }

    /// Logout: drop the in-memory token and delete the persisted copy.
    pub async fn logout(&self) -> EsiResult<()> {
        *self.token.write().await = None;
        clear_persisted_token()?;
        info!("Logged out, stored tokens cleared");
        Ok(())
    }

    /// Calls the verify endpoint with a bearer token.
    pub async fn verify(&self, access_token: &str) -> EsiResult<CharacterInfo> {
        let response = self
            .http
            .get(&self.config.verify_endpoint)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EsiError::AuthFailed(format!(
                "Verify returned {}",
                response.status()
            )));
        }

        response.json::<VerifyResponse>().await?.into_character()
    }

    /// Performs the authorization-code token exchange.
    async fn exchange_code(&self, code: &str, verifier: &str) -> EsiResult<TokenInfo> {
        let client_id = self.config.require_client_id()?.to_string();
        debug!("Exchanging authorization code for tokens");

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("code_verifier", verifier),
            ])
            .send()
            .await?;

        Self::read_token_response(response).await
    }

    /// Exchanges a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> EsiResult<TokenInfo> {
        let client_id = self.config.require_client_id()?.to_string();
        debug!("Refreshing access token");

        let response = self
            .http
            .post(&self.config.token_endpoint)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id.as_str()),
            ])
            .send()
            .await?;

        Self::read_token_response(response).await
    }

    /// Decodes a token endpoint response, mapping error bodies onto
    /// [`EsiError::AuthFailed`].
    async fn read_token_response(response: reqwest::Response) -> EsiResult<TokenInfo> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<TokenErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error_description.or(body.error))
                .unwrap_or_else(|| format!("Token endpoint returned {status}"));
            return Err(EsiError::AuthFailed(message));
        }

        let body: TokenResponse = response.json().await?;
        Ok(TokenInfo {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            expires_at: Utc::now() + Duration::seconds(body.expires_in),
            character: None,
        })
    }
}

// =============================================================================
// Redirect Parsing
// =============================================================================

/// Extracts the authorization code from a pasted redirect URL.
///
/// The CLI has no embedded browser: the user copies the URL the SSO
/// redirected to and pastes it back. A bare code is accepted as-is.
pub fn extract_auth_code(input: &str) -> EsiResult<String> {
    let input = input.trim();

    if let Ok(url) = reqwest::Url::parse(input) {
        return url
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .ok_or(EsiError::MissingAuthCode);
    }

    if input.is_empty() || input.contains(char::is_whitespace) {
        return Err(EsiError::MissingAuthCode);
    }

    Ok(input.to_string())
}

// =============================================================================
// Token Persistence
// =============================================================================

fn token_path() -> Option<PathBuf> {
    EsiConfig::data_dir().map(|dir| dir.join("tokens.toml"))
}

/// Loads the persisted token, if any. Corrupt or missing files read as
/// "not logged in" rather than an error.
fn load_persisted_token() -> Option<TokenInfo> {
    let path = token_path()?;
    let contents = std::fs::read_to_string(path).ok()?;
    toml::from_str(&contents).ok()
}

/// Writes the token to the platform config directory.
fn persist_token(token: &TokenInfo) -> EsiResult<()> {
    let path = token_path()
        .ok_or_else(|| EsiError::StoreSaveFailed("No config directory available".into()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| EsiError::StoreSaveFailed(e.to_string()))?;
    }

    let contents = toml::to_string_pretty(token)?;
    std::fs::write(&path, contents).map_err(|e| EsiError::StoreSaveFailed(e.to_string()))?;
    Ok(())
}

/// Removes the persisted token file.
fn clear_persisted_token() -> EsiResult<()> {
    if let Some(path) = token_path() {
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| EsiError::StoreSaveFailed(e.to_string()))?;
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_challenge_rfc7636_vector() {
        // Appendix B of RFC 7636
        let challenge = code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_pkce_codes_are_fresh_each_time() {
        let first = PkceCodes::generate();
        let second = PkceCodes::generate();

        assert_ne!(first.verifier, second.verifier);
        assert_ne!(first.state, second.state);
        assert_eq!(first.challenge, code_challenge(&first.verifier));
        assert_eq!(first.state.len(), STATE_LEN);
    }

    #[test]
    fn test_token_needs_refresh() {
        let token = TokenInfo {
            access_token: "test".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Utc::now() + Duration::seconds(60),
            character: None,
        };

        // One minute left against a five minute margin
        assert!(token.needs_refresh());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_no_refresh_needed() {
        let token = TokenInfo {
            access_token: "test".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: Utc::now() + Duration::seconds(3600),
            character: None,
        };

        assert!(!token.needs_refresh());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_authorize_url_contains_pkce_params() {
        let mut config = EsiConfig::default();
        config.client_id = "clientabc".to_string();
        let auth = SsoAuth::new(config);

        let codes = PkceCodes::generate();
        let url = auth.authorize_url(&codes).unwrap();

        assert!(url.starts_with("https://login.eveonline.com/v2/oauth/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=clientabc"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("state={}", codes.state)));
    }

    #[test]
    fn test_authorize_url_requires_client_id() {
        let auth = SsoAuth::new(EsiConfig::default());
        assert!(auth.authorize_url(&PkceCodes::generate()).is_err());
    }

    #[test]
    fn test_extract_auth_code_from_redirect_url() {
        let code =
            extract_auth_code("http://localhost:8635/callback?code=abc123&state=xyz").unwrap();
        assert_eq!(code, "abc123");
    }

    #[test]
    fn test_extract_auth_code_bare() {
        assert_eq!(extract_auth_code("  abc123  ").unwrap(), "abc123");
        assert!(extract_auth_code("").is_err());
        assert!(extract_auth_code("not a code").is_err());
    }

    #[test]
    fn test_extract_auth_code_missing_param() {
        let err = extract_auth_code("http://localhost:8635/callback?state=xyz").unwrap_err();
        assert!(matches!(err, EsiError::MissingAuthCode));
    }

    #[test]
    fn test_verify_response_legacy_shape() {
        let body = r#"{"CharacterID": 2119123456, "CharacterName": "Hauler Pilot"}"#;
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap();
        let character = parsed.into_character().unwrap();

        assert_eq!(character.character_id, 2119123456);
        assert_eq!(character.character_name, "Hauler Pilot");
    }

    #[test]
    fn test_verify_response_jwt_shape() {
        let body = r#"{"sub": "CHARACTER:EVE:2119123456", "name": "Hauler Pilot"}"#;
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap();
        let character = parsed.into_character().unwrap();

        assert_eq!(character.character_id, 2119123456);
        assert_eq!(character.character_name, "Hauler Pilot");
    }

    #[test]
    fn test_verify_response_without_id_fails() {
        let body = r#"{"name": "Hauler Pilot"}"#;
        let parsed: VerifyResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.into_character().is_err());
    }
}
