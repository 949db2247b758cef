pub mod errors;
pub mod hasher;

pub use errors::PasswordError;
pub use hasher::HashingParams;
pub use hasher::PasswordHasher;
pub use hasher::SaltedHash;
