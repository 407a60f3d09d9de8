//! Database repositories for the docstream data access layer.
//!
//! Repositories own all SQL. Lookups and listings exclude soft-deleted rows;
//! status updates enforce the transition table atomically inside the UPDATE
//! so concurrent writers serialize in Postgres.

pub mod documents;

pub use documents::DocumentRepository;
