//! OAuth2 PKCE authentication for the drive API
//!
//! Implements the Authorization Code flow with PKCE (RFC 7636) for
//! authenticating a native application, plus token persistence.
//!
//! ## Components
//!
//! - [`DriveOAuthConfig`] - Configuration for the OAuth2 flow
//! - [`ITokenStorage`] / [`KeyringTokenStorage`] - Token persistence
//! - [`PKCEFlow`] - OAuth2 PKCE challenge/exchange logic
//! - [`LocalCallbackServer`] - Minimal HTTP server for the OAuth redirect
//! - [`DriveAuthenticator`] - Orchestrates the full authentication flow

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use oauth2::{
    basic::BasicClient, AuthUrl, AuthorizationCode, ClientId, CsrfToken, EndpointNotSet,
    EndpointSet, PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, Scope,
    TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lnxpush_core::domain::newtypes::ResolutionHandle;

/// Default OAuth2 authorization endpoint
const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Default OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default redirect URI for the local callback server
const REDIRECT_URI: &str = "http://127.0.0.1:8401/callback";

/// Bind address for the local callback server
const CALLBACK_BIND_ADDR: &str = "127.0.0.1:8401";

/// Keyring service name for storing tokens
const KEYRING_SERVICE: &str = "lnxpush";

/// Default OAuth2 scopes: per-file drive access only
const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/drive.file"];

/// Access tokens within this margin of expiry are refreshed proactively
const REFRESH_MARGIN_MINUTES: i64 = 5;

// ============================================================================
// Tokens
// ============================================================================

/// OAuth tokens for the drive API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tokens {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Token for refreshing the access token without user interaction
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    /// Returns true if the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the access token will expire within the given duration
    pub fn expires_within(&self, duration: Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

// ============================================================================
// DriveOAuthConfig
// ============================================================================

/// Configuration for the OAuth2 PKCE authentication flow
#[derive(Debug, Clone)]
pub struct DriveOAuthConfig {
    /// Application (client) ID from the provider's app registration
    pub app_id: String,
    /// Redirect URI for receiving the authorization code
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint
    pub auth_url: String,
    /// Token endpoint
    pub token_url: String,
}

impl DriveOAuthConfig {
    /// Creates a config with the given app_id and default settings
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            redirect_uri: REDIRECT_URI.to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: AUTH_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }

    /// Creates a config with custom endpoints (used by tests)
    pub fn with_endpoints(
        mut self,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self
    }
}

// ============================================================================
// Token storage
// ============================================================================

/// Port-like abstraction over token persistence
///
/// Kept adapter-local: tokens are a drive concern, not a domain concern.
pub trait ITokenStorage: Send + Sync {
    /// Stores tokens for the given account name
    fn store(&self, account_name: &str, tokens: &Tokens) -> Result<()>;

    /// Loads tokens for the given account name, `None` if absent
    fn load(&self, account_name: &str) -> Result<Option<Tokens>>;

    /// Removes tokens for the given account name
    fn clear(&self, account_name: &str) -> Result<()>;
}

/// Stores and retrieves OAuth tokens from the system keyring
///
/// Uses the `keyring` crate to store tokens in the OS credential store
/// (e.g. GNOME Keyring, KDE Wallet). Tokens are serialized as JSON with
/// the service name "lnxpush" and the account name as the username.
pub struct KeyringTokenStorage;

impl ITokenStorage for KeyringTokenStorage {
    fn store(&self, account_name: &str, tokens: &Tokens) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, account_name)
            .context("Failed to create keyring entry")?;

        let json = serde_json::to_string(tokens).context("Failed to serialize tokens")?;

        entry
            .set_password(&json)
            .context("Failed to store tokens in keyring")?;

        debug!(account = account_name, "Stored tokens in keyring");
        Ok(())
    }

    fn load(&self, account_name: &str) -> Result<Option<Tokens>> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, account_name)
            .context("Failed to create keyring entry")?;

        match entry.get_password() {
            Ok(json) => {
                let tokens: Tokens = serde_json::from_str(&json)
                    .context("Failed to deserialize tokens from keyring")?;
                debug!(account = account_name, "Loaded tokens from keyring");
                Ok(Some(tokens))
            }
            Err(keyring::Error::NoEntry) => {
                debug!(account = account_name, "No tokens found in keyring");
                Ok(None)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to read from keyring")),
        }
    }

    fn clear(&self, account_name: &str) -> Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, account_name)
            .context("Failed to create keyring entry")?;

        match entry.delete_credential() {
            Ok(()) => {
                info!(account = account_name, "Cleared tokens from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context("Failed to delete from keyring")),
        }
    }
}

/// In-memory token storage for tests and ephemeral setups
#[derive(Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<HashMap<String, Tokens>>,
}

impl ITokenStorage for MemoryTokenStorage {
    fn store(&self, account_name: &str, tokens: &Tokens) -> Result<()> {
        self.tokens
            .lock()
            .unwrap()
            .insert(account_name.to_string(), tokens.clone());
        Ok(())
    }

    fn load(&self, account_name: &str) -> Result<Option<Tokens>> {
        Ok(self.tokens.lock().unwrap().get(account_name).cloned())
    }

    fn clear(&self, account_name: &str) -> Result<()> {
        self.tokens.lock().unwrap().remove(account_name);
        Ok(())
    }
}

// ============================================================================
// PKCEFlow
// ============================================================================

/// OAuth2 PKCE flow implementation using the `oauth2` crate
///
/// Handles generating authorization URLs with PKCE challenges,
/// exchanging authorization codes for tokens, and refreshing tokens.
pub struct PKCEFlow {
    client: BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
    scopes: Vec<String>,
}

impl PKCEFlow {
    /// Creates a new PKCEFlow with the given configuration
    pub fn new(config: &DriveOAuthConfig) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(config.app_id.clone()))
            .set_auth_uri(
                AuthUrl::new(config.auth_url.clone()).context("Invalid authorization URL")?,
            )
            .set_token_uri(TokenUrl::new(config.token_url.clone()).context("Invalid token URL")?)
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_uri.clone()).context("Invalid redirect URI")?,
            );

        Ok(Self {
            client,
            scopes: config.scopes.clone(),
        })
    }

    /// Generates an authorization URL with a PKCE challenge
    ///
    /// # Returns
    /// A tuple of `(authorization_url, csrf_token, pkce_verifier)`.
    /// The `pkce_verifier` must be kept until the code exchange step.
    pub fn generate_auth_url(&self) -> (String, CsrfToken, PkceCodeVerifier) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);

        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }

        let (auth_url, csrf_token) = auth_request.set_pkce_challenge(pkce_challenge).url();

        debug!("Generated authorization URL");
        (auth_url.to_string(), csrf_token, pkce_verifier)
    }

    /// Exchanges an authorization code for OAuth tokens
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: PkceCodeVerifier,
    ) -> Result<Tokens> {
        info!("Exchanging authorization code for tokens");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(&http_client)
            .await
            .context("Failed to exchange authorization code")?;

        Ok(to_tokens(&token_result, None))
    }

    /// Refreshes an expired access token using a refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Tokens> {
        info!("Refreshing access token");

        let http_client = reqwest::Client::new();
        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&http_client)
            .await
            .context("Failed to refresh token")?;

        Ok(to_tokens(&token_result, Some(refresh_token)))
    }
}

/// Converts an oauth2 token response into [`Tokens`]
///
/// Providers often omit the refresh token from refresh responses; the
/// previous one is carried forward in that case.
fn to_tokens(
    response: &oauth2::basic::BasicTokenResponse,
    previous_refresh_token: Option<&str>,
) -> Tokens {
    let expires_at = response
        .expires_in()
        .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    Tokens {
        access_token: response.access_token().secret().to_string(),
        refresh_token: response
            .refresh_token()
            .map(|t| t.secret().to_string())
            .or_else(|| previous_refresh_token.map(|t| t.to_string())),
        expires_at,
    }
}

// ============================================================================
// LocalCallbackServer
// ============================================================================

/// Minimal HTTP server that listens on localhost for the OAuth2 redirect
/// callback.
///
/// Waits for the OAuth provider to redirect the user's browser back with an
/// authorization code, responds with a small HTML page, and shuts down.
pub struct LocalCallbackServer;

/// Parameters extracted from the OAuth2 callback
#[derive(Debug)]
pub struct CallbackParams {
    /// The authorization code
    pub code: String,
    /// The CSRF state parameter
    pub state: String,
}

impl LocalCallbackServer {
    /// Starts the local callback server and waits for the OAuth redirect
    pub async fn start() -> Result<CallbackParams> {
        use http_body_util::Full;
        use hyper::body::Bytes;
        use hyper::server::conn::http1;
        use hyper::service::service_fn;
        use hyper::{Request, Response, StatusCode};
        use hyper_util::rt::TokioIo;
        use tokio::net::TcpListener;
        use tokio::sync::oneshot;

        info!("Starting local OAuth callback server on {CALLBACK_BIND_ADDR}");

        let listener = TcpListener::bind(CALLBACK_BIND_ADDR)
            .await
            .with_context(|| format!("Failed to bind callback server to {CALLBACK_BIND_ADDR}"))?;

        let (tx, rx) = oneshot::channel::<CallbackParams>();
        let tx = Arc::new(tokio::sync::Mutex::new(Some(tx)));

        // Accept a single connection
        let (stream, _addr) = listener
            .accept()
            .await
            .context("Failed to accept connection on callback server")?;

        let io = TokioIo::new(stream);
        let tx_clone = tx.clone();

        let service = service_fn(move |req: Request<hyper::body::Incoming>| {
            let tx_inner = tx_clone.clone();
            async move {
                let uri = req.uri().to_string();
                debug!("Callback server received request: {}", uri);

                match parse_callback_params(&uri) {
                    Some(callback_params) => {
                        if let Some(sender) = tx_inner.lock().await.take() {
                            let _ = sender.send(callback_params);
                        }

                        Ok::<_, hyper::Error>(
                            Response::builder()
                                .status(StatusCode::OK)
                                .header("Content-Type", "text/html; charset=utf-8")
                                .body(Full::new(Bytes::from(success_html())))
                                .unwrap(),
                        )
                    }
                    None => Ok(Response::builder()
                        .status(StatusCode::BAD_REQUEST)
                        .header("Content-Type", "text/html; charset=utf-8")
                        .body(Full::new(Bytes::from(error_html(
                            "Missing authorization code in callback",
                        ))))
                        .unwrap()),
                }
            }
        });

        tokio::spawn(async move {
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!("Callback server connection error: {}", e);
            }
        });

        let params = rx
            .await
            .context("Callback server channel closed without receiving parameters")?;

        info!("Received OAuth callback with authorization code");
        Ok(params)
    }
}

/// Parses the authorization code and state from a callback URI
fn parse_callback_params(uri: &str) -> Option<CallbackParams> {
    let url = url::Url::parse(&format!("http://localhost{}", uri)).ok()?;
    let mut code = None;
    let mut state = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "state" => state = Some(value.to_string()),
            _ => {}
        }
    }

    Some(CallbackParams {
        code: code?,
        state: state.unwrap_or_default(),
    })
}

/// Returns the HTML for a successful authorization page
fn success_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>LNXPush - Authorization Successful</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Authorization Successful</h1>
    <p>LNXPush may now upload to your drive.</p>
    <p>You can close this window.</p>
    <script>setTimeout(function() { window.close(); }, 3000);</script>
</body>
</html>"#
        .to_string()
}

/// Returns the HTML for an authorization error page
fn error_html(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>LNXPush - Authorization Error</title></head>
<body style="font-family: sans-serif; text-align: center; padding-top: 50px;">
    <h1>Authorization Error</h1>
    <p>{}</p>
    <p>Please close this window and try again.</p>
</body>
</html>"#,
        message
    )
}

// ============================================================================
// DriveAuthenticator
// ============================================================================

/// High-level authentication adapter orchestrating the full OAuth2 PKCE flow
///
/// 1. Generates a PKCE authorization URL
/// 2. Opens the user's browser to the consent page
/// 3. Starts a local callback server to receive the redirect
/// 4. Exchanges the authorization code for tokens
/// 5. Persists the tokens for the account
pub struct DriveAuthenticator {
    config: DriveOAuthConfig,
    storage: Arc<dyn ITokenStorage>,
}

impl DriveAuthenticator {
    /// Creates a new DriveAuthenticator
    pub fn new(config: DriveOAuthConfig, storage: Arc<dyn ITokenStorage>) -> Self {
        Self { config, storage }
    }

    /// Returns a reference to the current configuration
    pub fn config(&self) -> &DriveOAuthConfig {
        &self.config
    }

    /// Produces a resolution handle for a failed connection
    ///
    /// The handle wraps a fresh authorization URL. It identifies *what* to
    /// resolve; the resolution flow generates its own PKCE state when it
    /// actually runs.
    pub fn authorization_handle(&self) -> Result<ResolutionHandle> {
        let flow = PKCEFlow::new(&self.config)?;
        let (auth_url, _csrf, _verifier) = flow.generate_auth_url();
        Ok(ResolutionHandle::new(auth_url))
    }

    /// Performs the full interactive OAuth2 PKCE login flow and stores the
    /// resulting tokens for `account_name`
    pub async fn login(&self, account_name: &str) -> Result<Tokens> {
        info!(account = account_name, "Starting OAuth2 PKCE login flow");

        let flow = PKCEFlow::new(&self.config)?;
        let (auth_url, _csrf_token, pkce_verifier) = flow.generate_auth_url();

        info!("Opening browser for authorization");
        webbrowser::open(&auth_url).context("Failed to open browser for authorization")?;

        let callback = LocalCallbackServer::start().await?;
        let tokens = flow.exchange_code(callback.code, pkce_verifier).await?;

        self.storage.store(account_name, &tokens)?;

        info!(account = account_name, "OAuth2 PKCE login completed");
        Ok(tokens)
    }

    /// Returns usable tokens for `account_name`, refreshing proactively
    ///
    /// - `Ok(Some(tokens))` - a valid (possibly refreshed) access token
    /// - `Ok(None)` - no stored tokens, or expired without a refresh token;
    ///   an interactive login is required
    /// - `Err` - the refresh was attempted and rejected
    pub async fn current_tokens(&self, account_name: &str) -> Result<Option<Tokens>> {
        let tokens = match self.storage.load(account_name)? {
            Some(tokens) => tokens,
            None => return Ok(None),
        };

        if !tokens.expires_within(Duration::minutes(REFRESH_MARGIN_MINUTES)) {
            return Ok(Some(tokens));
        }

        let refresh_token = match tokens.refresh_token.as_deref() {
            Some(token) => token,
            None => {
                debug!(account = account_name, "Token expired and no refresh token stored");
                return Ok(None);
            }
        };

        let flow = PKCEFlow::new(&self.config)?;
        let refreshed = flow.refresh_token(refresh_token).await?;
        self.storage.store(account_name, &refreshed)?;

        Ok(Some(refreshed))
    }
}
