//! Business logic services for Review Desk

pub mod auth;
pub mod business;
pub mod store;

pub use auth::{
    validate_or_refresh, AuthError, AuthProvider, AuthenticatedCaller, SessionCookies, SessionTokens,
};
pub use business::{BusinessService, CreateBusinessError};
pub use store::{BusinessStore, CallerContext, PgBusinessStore, StoreError};
