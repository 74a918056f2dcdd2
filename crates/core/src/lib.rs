//! Juniper Core - Shared types library.
//!
//! This crate provides common types used across all Juniper Market components:
//! - `api` - JSON API server (storefront + admin back-office)
//! - `client` - Session-aware API client SDK
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`wire`] - Request/response bodies shared by the server and the client SDK

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod wire;

pub use types::*;
