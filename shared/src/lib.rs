//! Shared types and models for Review Desk business onboarding
//!
//! This crate contains types shared between the backend and the browser
//! (via WASM): the onboarding data model, server-side validation and the
//! state machine behind the onboarding form.

pub mod form;
pub mod models;
pub mod types;
pub mod validation;

pub use form::*;
pub use models::*;
pub use types::*;
pub use validation::*;
