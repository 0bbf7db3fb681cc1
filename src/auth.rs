// SPDX-License-Identifier: MPL-2.0
//! Federated sign-in sequencing.
//!
//! Two collaborators do the real work: an [`IdentityProvider`] runs the
//! interactive account chooser and hands back an identity token, and a
//! [`SessionBackend`] exchanges that token for an application session.
//! [`AuthFlow`] only orders the calls and tracks where the user stands:
//!
//! ```text
//! SignedOut --begin--> Authenticating --exchange ok--> SignedIn
//!     ^                      |                            |
//!     +------- failure ------+                            |
//!     +------------------- sign_out ----------------------+
//! ```
//!
//! Collaborator futures may complete on any runtime thread; the flow applies
//! their results only after the awaited call returns.

use crate::notice::Notice;
use std::fmt;
use std::future::Future;

/// Failure reported by the identity provider or the session backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The provider could not be reached.
    Network(String),
    /// The identity token was rejected by the backend.
    InvalidToken,
    /// The identity token was valid once but has expired.
    ExpiredToken,
    /// The user dismissed the account chooser.
    Cancelled,
    /// The client is misconfigured (e.g. missing client id).
    Configuration(String),
    /// Any other provider failure, with its own status code.
    Provider { code: i32, message: String },
    /// A sign-in is already running.
    AlreadyInProgress,
}

impl AuthError {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            AuthError::Network(_) => "error-auth-network",
            AuthError::InvalidToken => "error-auth-invalid-token",
            AuthError::ExpiredToken => "error-auth-expired-token",
            AuthError::Cancelled => "error-auth-cancelled",
            AuthError::Configuration(_) => "error-auth-configuration",
            AuthError::Provider { .. } => "error-auth-provider",
            AuthError::AlreadyInProgress => "error-auth-in-progress",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Network(msg) => write!(f, "network error: {msg}"),
            AuthError::InvalidToken => write!(f, "identity token rejected"),
            AuthError::ExpiredToken => write!(f, "identity token expired"),
            AuthError::Cancelled => write!(f, "sign-in cancelled"),
            AuthError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            AuthError::Provider { code, message } => write!(f, "status {code}: {message}"),
            AuthError::AlreadyInProgress => write!(f, "sign-in already in progress"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Opaque token issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken(String);

impl IdToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdToken(..)")
    }
}

/// The signed-in user as exposed by the session backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    /// Display name, if present and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Email, if present and non-empty.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|email| !email.is_empty())
    }
}

/// Interactive identity provider (account chooser).
pub trait IdentityProvider {
    /// Runs the interactive flow and yields an identity token.
    fn request_token(&self) -> impl Future<Output = Result<IdToken, AuthError>> + Send;

    /// Revokes the provider-side session.
    fn revoke(&self) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Backend owning the application session.
pub trait SessionBackend {
    /// Exchanges an identity token for a session.
    fn exchange(&self, token: &IdToken)
        -> impl Future<Output = Result<UserProfile, AuthError>> + Send;

    /// The user of the current session, if any.
    fn current_user(&self) -> Option<UserProfile>;

    /// Drops the local session.
    fn clear(&self);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    SignedOut,
    Authenticating,
    SignedIn(UserProfile),
}

/// Result of checking the session at screen entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Active(UserProfile),
    /// No session: go back to the sign-in entry screen.
    RedirectToEntry,
}

/// Result of signing out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutOutcome {
    Completed,
    /// The local session is gone but the provider could not be told.
    RevocationFailed(AuthError),
}

impl SignOutOutcome {
    /// Notice shown once the user is back on the entry screen.
    pub fn to_notice(&self) -> Notice {
        match self {
            SignOutOutcome::Completed => Notice::info("auth-signed-out"),
            SignOutOutcome::RevocationFailed(err) => {
                Notice::warning("auth-sign-out-failed").with_arg("detail", err.to_string())
            }
        }
    }
}

/// Orders calls between the provider, the backend and the caller.
#[derive(Debug)]
pub struct AuthFlow<P, B> {
    provider: P,
    backend: B,
    state: AuthState,
}

impl<P, B> AuthFlow<P, B>
where
    P: IdentityProvider,
    B: SessionBackend,
{
    pub fn new(provider: P, backend: B) -> Self {
        Self {
            provider,
            backend,
            state: AuthState::SignedOut,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            AuthState::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Launches the provider's interactive flow.
    ///
    /// Refuses to start while another sign-in is running. On failure the
    /// flow returns to `SignedOut`; on success it stays `Authenticating`
    /// until [`AuthFlow::complete_sign_in`] runs.
    pub async fn begin_sign_in(&mut self) -> Result<IdToken, AuthError> {
        if self.state == AuthState::Authenticating {
            return Err(AuthError::AlreadyInProgress);
        }
        self.state = AuthState::Authenticating;

        match self.provider.request_token().await {
            Ok(token) => Ok(token),
            Err(err) => {
                tracing::warn!(error = %err, "identity provider sign-in failed");
                self.state = AuthState::SignedOut;
                Err(err)
            }
        }
    }

    /// Exchanges the identity token for a session.
    pub async fn complete_sign_in(&mut self, token: IdToken) -> Result<UserProfile, AuthError> {
        self.state = AuthState::Authenticating;

        match self.backend.exchange(&token).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "user authenticated");
                self.state = AuthState::SignedIn(user.clone());
                Ok(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "credential exchange failed");
                self.state = AuthState::SignedOut;
                Err(err)
            }
        }
    }

    /// Full sign-in: provider flow followed by the credential exchange.
    pub async fn sign_in(&mut self) -> Result<UserProfile, AuthError> {
        let token = self.begin_sign_in().await?;
        self.complete_sign_in(token).await
    }

    /// Re-reads the session from the backend at screen entry.
    ///
    /// A session that disappeared behind the flow's back forces `SignedOut`.
    /// This also settles a sign-in abandoned half-way.
    pub fn check_session(&mut self) -> SessionCheck {
        match self.backend.current_user() {
            Some(user) => {
                self.state = AuthState::SignedIn(user.clone());
                SessionCheck::Active(user)
            }
            None => {
                if self.state != AuthState::SignedOut {
                    tracing::debug!("session gone, redirecting to sign-in");
                }
                self.state = AuthState::SignedOut;
                SessionCheck::RedirectToEntry
            }
        }
    }

    /// Clears the local session, then revokes the provider session.
    ///
    /// The local sign-out is never rolled back, even if revocation fails.
    pub async fn sign_out(&mut self) -> SignOutOutcome {
        self.backend.clear();
        self.state = AuthState::SignedOut;

        match self.provider.revoke().await {
            Ok(()) => SignOutOutcome::Completed,
            Err(err) => {
                tracing::warn!(error = %err, "provider sign-out failed");
                SignOutOutcome::RevocationFailed(err)
            }
        }
    }
}
