//! ACME challenge support
//!
//! Let's Encrypt and other issuers verify domain control by probing a
//! well-known URL. This module holds the secret record and its store, the
//! admin-identity collaborator, and the two endpoints built on the handler
//! machinery.

pub mod handlers;
pub mod identity;
pub mod store;

pub use handlers::{authenticate, require_admin, SaveSecret, ServeChallenge, CHALLENGE_URI_PREFIX};
pub use identity::{BearerTokenIdentity, Identity, IdentityProvider};
pub use store::{AcmeSecret, FileStore, MemoryStore, SecretStore, StoreError, CHALLENGE_ENTITY_ID};
