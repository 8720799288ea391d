//! Core domain types and utilities for the gatehouse platform.
//!
//! This crate provides the foundational types shared by every gatehouse
//! crate: the error-handling `Result` alias and the closed set of identity
//! provider identifiers.

pub mod error;
pub mod provider;

pub use error::Result;
pub use provider::{ParseProviderNameError, ProviderName};
