//! Core types and operations for the UrbanVoice complaint desk.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ComplaintStore`]; the lifecycle and
//! query operations are written against that trait.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod complaint;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod query;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
