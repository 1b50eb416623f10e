//! Infrastructure adapters. Implement outbound ports, feed inbound ones.
//!
//! Member directory, mail provider, request files, terminal UI. Map errors to DomainError.

pub mod directory;
pub mod mail;
pub mod request;
pub mod ui;
