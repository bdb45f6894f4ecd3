//! Applicant profile autofill client.
//!
//! Keeps one canonical applicant profile, lets the user edit it in explicit
//! edit sessions, persists it to the backend, and hands it together with a
//! recruitment form URL to the remote autofill service.
//!
//! - `profile` - profile record, schema keys, edit-gated store, sync client
//! - `submission` - one-at-a-time autofill submission state machine
//! - `session` - per-user dashboard session tying the pieces together
//! - `api_client` - the only module that speaks HTTP to the backend

pub mod api_client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod notify;
pub mod profile;
pub mod session;
pub mod submission;

#[cfg(test)]
mod test_support;

pub use errors::{ClientError, ProfileError, ValueError};
