//! Middleware for cross-cutting request concerns.
//!
//! - [`auth`]: bearer-token extractor guarding protected routes
//! - [`recovery`]: panic recovery feeding the error classification boundary
//!
//! The transaction middleware lives with the rest of the transaction
//! machinery in [`crate::db`]; the access log in [`crate::logging`].

pub mod auth;
pub mod recovery;
