//! Shared types and configuration for Khata.
//!
//! This crate provides common types used across all other crates:
//! - The credit/debit `Side` convention and the signed `Balance` type
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
