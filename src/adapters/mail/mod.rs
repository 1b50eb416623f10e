//! Mail provider adapters. Implement MailProvider.
//!
//! Microsoft Graph for real delivery, dry-run when credentials are absent.

pub mod dry_run;
pub mod graph;

pub use dry_run::DryRunMailer;
pub use graph::{GraphCredentials, GraphMailer};
