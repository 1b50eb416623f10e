//! In-memory port fakes shared by use case tests.

use crate::domain::{DomainError, EmailAddress, MemberRecord, RenderedMessage, Role};
use crate::ports::{MailProvider, MemberDirectory};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn member(email: &str, role: Role, rank: Option<i64>) -> MemberRecord {
    MemberRecord {
        email: email.to_string(),
        role,
        certification_tier: None,
        rank,
    }
}

/// Directory that counts calls and can simulate an outage.
pub struct FakeDirectory {
    members: Vec<MemberRecord>,
    unreachable: bool,
    calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn with_members(members: Vec<MemberRecord>) -> Self {
        Self {
            members,
            unreachable: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            members: Vec::new(),
            unreachable: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MemberDirectory for FakeDirectory {
    async fn list_members(&self) -> Result<Vec<MemberRecord>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(DomainError::DirectoryUnavailable(
                "connection refused".into(),
            ));
        }
        Ok(self.members.clone())
    }
}

/// Provider that records every call and fails the listed batch indexes.
#[derive(Default)]
pub struct RecordingMailer {
    failing: HashSet<usize>,
    sent: Mutex<Vec<(String, Vec<String>)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(batches: &[usize]) -> Self {
        Self {
            failing: batches.iter().copied().collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// (sender, bcc) per call, in call order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.sent.lock().expect("mailer lock").clone()
    }
}

#[async_trait::async_trait]
impl MailProvider for RecordingMailer {
    async fn send_batch(
        &self,
        sender: &EmailAddress,
        bcc: &[EmailAddress],
        _message: &RenderedMessage,
    ) -> Result<(), DomainError> {
        let index = {
            let mut sent = self.sent.lock().expect("mailer lock");
            sent.push((
                sender.to_string(),
                bcc.iter().map(ToString::to_string).collect(),
            ));
            sent.len() - 1
        };
        if self.failing.contains(&index) {
            return Err(DomainError::Delivery(format!(
                "MailboxConcurrency: batch {index} throttled"
            )));
        }
        Ok(())
    }
}
