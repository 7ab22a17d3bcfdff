//! Core types, trait definitions and the signup provisioning workflow for
//! jobmatch.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends, the agent-provisioning function and account creation are all
//! injected through the traits in [`store`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod profile;
pub mod provision;
pub mod referral;
pub mod role;
pub mod store;

pub use error::{Error, ReferralError, Result, SignupError};
pub use provision::Provisioner;

/// Trim and lower-case an email address so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }
