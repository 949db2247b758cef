//! Credential verification and token authentication primitives.
//!
//! - Salted password hashing (Argon2id) with constant-time verification
//! - Signed, time-limited access tokens (HS256 JWT)
//! - Authentication coordination
//!
//! Nothing in this crate performs I/O; user and credential lookups belong to
//! the services that use it.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = hasher.generate_salt();
//! let hash = hasher.hash("my_password", &salt).unwrap();
//! assert!(hasher.verify("my_password", &salt, &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.issue("42", "issuer", "app", 60_000).unwrap();
//! let claims = codec.verify(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::TokenSettings;
pub use authenticator::DEFAULT_VALIDITY_MILLIS;
pub use jwt::Claims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::SaltedHash;
