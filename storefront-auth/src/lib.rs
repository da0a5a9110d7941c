//! # Storefront Authentication
//!
//! Session identity for the storefront admin client: where the credential
//! lives, how it is decoded, and which role the caller currently holds.
//!
//! ## Overview
//!
//! The storefront-auth crate handles:
//! - **Claims**: the identity payload carried by the credential
//! - **Decoding**: payload-only by default, signature-verified with `jwt`
//! - **Storage**: in-memory or JSON-file credential persistence
//! - **Sessions**: load, reload, sign-in, logout and role resolution
//! - **Identity**: optional profile lookup that can override the role
//!
//! ## Features
//!
//! - `jwt` (default): `JwtVerifier` using jsonwebtoken
//! - `http`: `HttpIdentityProvider` using reqwest
//! - `full`: All features enabled
//!
//! ## Usage
//!
//! ```rust
//! use storefront_auth::{MemoryStore, SessionManager};
//! use storefront_rbac::{AccessGate, PermissionCategory, Role, RoleRegistry};
//!
//! let manager = SessionManager::load_default(MemoryStore::new());
//! assert_eq!(manager.current_role(), Role::Guest);
//!
//! let registry = RoleRegistry::storefront();
//! let gate = AccessGate::new(&manager, &registry);
//! let page = gate.render("DASHBOARD:VIEW", PermissionCategory::Views, || "dashboard", || "sign in");
//! assert_eq!(page.into_inner(), "sign in");
//! ```
//!
//! ## Failure model
//!
//! Credential problems never escape `load`/`reload`: they are logged and
//! the session stays unauthenticated, which the RBAC layer turns into a
//! deny. Errors are returned only for storage writes, configuration and
//! identity lookups.

pub mod claims;
pub mod config;
pub mod decoder;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod identity;
#[cfg(feature = "jwt")]
pub mod jwt;
pub mod manager;
pub mod storage;

// Re-export main types
pub use claims::IdentityClaims;
pub use config::{ConfigError, IdentityEndpoint, SessionConfig};
pub use decoder::{ClaimsDecoder, UnverifiedDecoder};
pub use error::{AuthError, AuthResult};
pub use identity::{IdentityProvider, UserProfile};
pub use manager::{Session, SessionManager, SessionState};
pub use storage::{CredentialStore, FileStore, MemoryStore};

#[cfg(feature = "http")]
pub use http::HttpIdentityProvider;

#[cfg(feature = "jwt")]
pub use jwt::{JwtAlgorithm, JwtConfig, JwtVerifier};
