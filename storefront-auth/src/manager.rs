//! Session lifecycle
//!
//! `SessionManager` owns the current session. It reads the credential from
//! storage, decodes it, decides the role and tears everything down again on
//! logout. A credential that cannot be decoded is never an error here: the
//! caller simply ends up unauthenticated with the `Guest` role.
//!
//! ```text
//! Unauthenticated ──load/reload/sign_in (decode ok)──> Authenticated
//! Authenticated ──logout / credential changed / rejected──> Unauthenticated
//! ```

use chrono::{DateTime, Utc};
use storefront_rbac::{Role, RoleSource};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::claims::IdentityClaims;
use crate::config::SessionConfig;
use crate::decoder::{ClaimsDecoder, UnverifiedDecoder};
use crate::error::{AuthError, AuthResult};
use crate::identity::{IdentityProvider, UserProfile};
use crate::storage::CredentialStore;

/// An established session.
///
/// Only the manager creates and mutates sessions; everyone else gets a
/// shared borrow for the duration of one check.
#[derive(Clone)]
pub struct Session {
    session_id: Uuid,
    user_id: String,
    role: Role,
    raw_token: String,
    claims: IdentityClaims,
    profile: Option<UserProfile>,
    established_at: DateTime<Utc>,
}

impl Session {
    fn new(raw_token: String, claims: IdentityClaims) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            user_id: claims.user_id.clone(),
            role: claims.role().unwrap_or(Role::Guest),
            raw_token,
            claims,
            profile: None,
            established_at: Utc::now(),
        }
    }

    /// Local identifier for log correlation. Never sent anywhere.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Effective role: the profile role once a profile has been applied,
    /// otherwise the role embedded in the claims.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The credential as stored, for attaching to outgoing requests.
    pub fn raw_token(&self) -> &str {
        &self.raw_token
    }

    pub fn claims(&self) -> &IdentityClaims {
        &self.claims
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    fn apply_profile(&mut self, profile: UserProfile) {
        self.role = profile.session_role();
        self.profile = Some(profile);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("raw_token", &"[REDACTED]")
            .field("claims", &self.claims)
            .field("profile", &self.profile)
            .field("established_at", &self.established_at)
            .finish()
    }
}

/// Observable session state.
///
/// A session whose effective role is `Guest` (unknown or missing role) is
/// reported as `Unauthenticated`: it grants nothing a missing session
/// would not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No valid credential, or one without a usable role.
    Unauthenticated,
    /// A decoded credential with a usable role is in effect.
    Authenticated {
        /// Effective role
        role: Role,
        /// User the credential names
        user_id: String,
    },
}

/// Owner of the current session.
pub struct SessionManager {
    store: Box<dyn CredentialStore>,
    decoder: Box<dyn ClaimsDecoder>,
    config: SessionConfig,
    session: Option<Session>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Read the stored credential and try to establish a session from it.
    ///
    /// Never fails: a missing, unreadable or undecodable credential leaves
    /// the manager unauthenticated. An invalid `config` is logged and its
    /// rejected values replaced with defaults.
    pub fn load<S, D>(store: S, decoder: D, config: SessionConfig) -> Self
    where
        S: CredentialStore + 'static,
        D: ClaimsDecoder + 'static,
    {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Invalid session config; falling back to defaults for rejected values");
                config.normalized()
            }
        };

        let mut manager = Self {
            store: Box::new(store),
            decoder: Box::new(decoder),
            config,
            session: None,
        };

        if let Some(raw_token) = manager.read_stored() {
            manager.establish(raw_token);
        } else {
            debug!(key = %manager.config.storage_key, "No stored credential");
        }

        manager
    }

    /// [`load`](Self::load) with the payload-only decoder and default config.
    pub fn load_default<S>(store: S) -> Self
    where
        S: CredentialStore + 'static,
    {
        Self::load(store, UnverifiedDecoder::new(), SessionConfig::default())
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Role to evaluate with. `Guest` without a session.
    pub fn current_role(&self) -> Role {
        self.session.as_ref().map(Session::role).unwrap_or(Role::Guest)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(Session::user_id)
    }

    /// Whether a credential decoded into a session.
    ///
    /// This says nothing about access: a session with an unknown role is
    /// present but holds `Guest`. Use [`state`](Self::state) or
    /// [`current_role`](Self::current_role) for access decisions.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            Some(session) if session.role.is_authenticated() => SessionState::Authenticated {
                role: session.role,
                user_id: session.user_id.clone(),
            },
            _ => SessionState::Unauthenticated,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The underlying credential store.
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    /// Remove the stored credential and end the session.
    ///
    /// Idempotent. A storage failure is logged; the in-memory session is
    /// torn down regardless.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            warn!(error = %e, code = e.error_code(), "Failed to remove stored credential");
        }

        match self.session.take() {
            Some(session) => info!(
                session_id = %session.session_id,
                user_id = %session.user_id,
                "Session ended"
            ),
            None => debug!("Logout without an active session"),
        }
    }

    /// Re-read storage and follow any change of credential.
    ///
    /// A different credential ends the current session before the new one
    /// is decoded. The same credential keeps the session, unless expiry
    /// checking is on and it has expired in the meantime.
    pub fn reload(&mut self) -> Role {
        let stored = self.read_stored();
        let current = self.session.as_ref().map(|s| s.raw_token.as_str());

        if stored.as_deref() == current {
            if let Some(session) = &self.session {
                if self.is_expired(&session.claims) {
                    info!(session_id = %session.session_id, "Credential expired; ending session");
                    self.session = None;
                }
            }
            return self.current_role();
        }

        if let Some(session) = self.session.take() {
            info!(session_id = %session.session_id, "Stored credential changed; ending session");
        }

        if let Some(raw_token) = stored {
            self.establish(raw_token);
        }

        self.current_role()
    }

    /// Persist `raw_token` and establish a session from it.
    ///
    /// Returns the resulting role, `Guest` if the credential does not
    /// decode. Only a storage failure is an error.
    pub fn sign_in(&mut self, raw_token: &str) -> AuthResult<Role> {
        self.store.set(&self.config.storage_key, raw_token.trim())?;
        Ok(self.reload())
    }

    /// Ask the identity service who the session user is and adopt the
    /// role it reports.
    ///
    /// Without a session the provider is not called and `Guest` is
    /// returned. If the service refuses the credential the session is
    /// logged out and the error returned; other failures keep the session.
    pub async fn refresh_identity(&mut self, provider: &dyn IdentityProvider) -> AuthResult<Role> {
        let (user_id, raw_token) = match &self.session {
            Some(session) => (session.user_id.clone(), session.raw_token.clone()),
            None => {
                debug!("Identity refresh without an active session");
                return Ok(Role::Guest);
            }
        };

        let profile = match provider.fetch_profile(&user_id, &raw_token).await {
            Ok(profile) => profile,
            Err(e) if e.is_credential_rejection() => {
                warn!(error = %e, code = e.error_code(), "Identity service rejected the credential");
                self.logout();
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Identity refresh failed; keeping session");
                return Err(e);
            }
        };

        if profile.id != user_id {
            warn!(expected = %user_id, got = %profile.id, "Identity service returned another user");
            return Err(AuthError::IdentityUnavailable(format!(
                "profile for {} returned for {}",
                profile.id, user_id
            )));
        }

        let Some(session) = self.session.as_mut() else {
            return Ok(Role::Guest);
        };

        let previous = session.role;
        session.apply_profile(profile);
        if previous != session.role {
            info!(
                session_id = %session.session_id,
                from = %previous,
                to = %session.role,
                "Session role changed by identity refresh"
            );
        }

        Ok(session.role)
    }

    fn read_stored(&self) -> Option<String> {
        match self.store.get(&self.config.storage_key) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Failed to read stored credential");
                None
            }
        }
    }

    fn is_expired(&self, claims: &IdentityClaims) -> bool {
        self.config.check_expiry && claims.is_expired_at(Utc::now(), self.config.expiry_leeway_secs)
    }

    fn decode(&self, raw_token: &str) -> AuthResult<IdentityClaims> {
        let claims = self.decoder.decode(raw_token)?;
        if self.is_expired(&claims) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    fn establish(&mut self, raw_token: String) {
        match self.decode(&raw_token) {
            Ok(claims) => {
                let session = Session::new(raw_token, claims);
                info!(
                    session_id = %session.session_id,
                    user_id = %session.user_id,
                    role = %session.role,
                    "Session established"
                );
                self.session = Some(session);
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "Stored credential rejected");
                self.session = None;
            }
        }
    }
}

impl RoleSource for SessionManager {
    fn current_role(&self) -> Role {
        SessionManager::current_role(self)
    }
}
