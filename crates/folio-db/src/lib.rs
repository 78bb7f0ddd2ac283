//! Folio persistence layer
//!
//! Repositories for user accounts and profile documents, backed by PostgreSQL
//! or kept in memory when no database is configured.

pub mod db;

pub use db::{
    InMemoryProfileRepository, InMemoryUserRepository, PostgresProfileRepository,
    PostgresUserRepository, ProfileRepository, UserRepository,
};
