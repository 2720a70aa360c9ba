//! Domain models for Review Desk

mod business;

pub use business::*;
