//! Database repositories for data access layer
//!
//! Each entity has a trait (what the rest of the application depends on) and
//! two implementations: PostgreSQL for deployments and in-memory for tests and
//! database-less local runs.

pub mod memory;
pub mod profile;
pub mod user;

pub use memory::{InMemoryProfileRepository, InMemoryUserRepository};
pub use profile::{PostgresProfileRepository, ProfileRepository};
pub use user::{PostgresUserRepository, UserRepository};
