//! Implements InputPort. Inquire-based compose flow.
//!
//! Subject -> body file -> groups -> rank filter -> extra addresses -> confirm -> send.

use crate::adapters::ui::progress::with_spinner;
use crate::domain::{DispatchOutcome, DispatchRequest, DomainError, GroupId, parse_rank_threshold};
use crate::ports::InputPort;
use crate::usecases::DispatchService;
use async_trait::async_trait;
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::collections::BTreeSet;
use std::sync::Arc;

const NO_RANK_FILTER: &str = "No rank filter";
const RANK_OPTIONS: &[&str] = &[
    NO_RANK_FILTER,
    "150+",
    "175+",
    "200+",
    "225+",
    "250+",
    "275+",
    "300+",
];

fn prompt_error(e: InquireError) -> DomainError {
    DomainError::Request(format!("prompt failed: {}", e))
}

/// Split a comma/semicolon/whitespace separated list.
fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<DispatchService>,
}

impl TuiInputPort {
    pub fn new(service: Arc<DispatchService>) -> Self {
        Self { service }
    }

    /// Collect a request. `None` when the author backs out (Esc).
    async fn compose(&self) -> Result<Option<DispatchRequest>, DomainError> {
        let Some(subject) = Text::new("Subject:")
            .with_validator(inquire::required!("Subject is required"))
            .prompt_skippable()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };

        let Some(body_path) = Text::new("Path to HTML body:")
            .with_validator(inquire::required!("A body file is required"))
            .prompt_skippable()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };
        let body_fragment = tokio::fs::read_to_string(body_path.trim())
            .await
            .map_err(|e| DomainError::Request(format!("read {}: {}", body_path.trim(), e)))?;

        let labels: Vec<&str> = GroupId::ALL.iter().map(|g| g.label()).collect();
        let Some(selected) = MultiSelect::new("Recipient groups:", labels)
            .prompt_skippable()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };
        let audience_groups: BTreeSet<GroupId> = GroupId::ALL
            .into_iter()
            .filter(|g| selected.contains(&g.label()))
            .collect();

        let Some(rank) = Select::new("Filter by rank:", RANK_OPTIONS.to_vec())
            .with_help_message("Only members at or above this rank; never applies to extra addresses")
            .prompt_skippable()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };
        let rank_threshold = if rank == NO_RANK_FILTER {
            None
        } else {
            parse_rank_threshold(rank)?
        };

        let Some(extra) = Text::new("Additional addresses (optional):")
            .with_help_message("Comma-separated")
            .prompt_skippable()
            .map_err(prompt_error)?
        else {
            return Ok(None);
        };

        Ok(Some(DispatchRequest {
            subject,
            body_fragment,
            audience_groups,
            rank_threshold,
            explicit_addresses: split_addresses(&extra),
        }))
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<Option<DispatchOutcome>, DomainError> {
        let Some(request) = self.compose().await? else {
            return Ok(None);
        };

        let groups: Vec<&str> = request.audience_groups.iter().map(|g| g.as_str()).collect();
        let question = format!(
            "Send \"{}\" to groups [{}]{} plus {} extra address(es)?",
            request.subject,
            groups.join(", "),
            request
                .rank_threshold
                .map(|t| format!(" (rank {}+)", t))
                .unwrap_or_default(),
            request.explicit_addresses.len()
        );
        let confirmed = Confirm::new(&question)
            .with_default(false)
            .prompt()
            .map_err(prompt_error)?;
        if !confirmed {
            return Ok(None);
        }

        let outcome = with_spinner("Sending announcement", self.service.send(&request)).await?;
        Ok(Some(outcome))
    }
}
