pub mod credential;
pub mod memory;
pub mod user;

pub use credential::PostgresCredentialRepository;
pub use memory::InMemoryCredentialRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;
