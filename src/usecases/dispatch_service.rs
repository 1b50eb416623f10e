//! Dispatch orchestration: validate -> resolve audience -> render -> send batches.
//!
//! Validation and directory failures abort the call. Batch failures do not;
//! they land in the returned `DispatchOutcome`.

use crate::domain::{DispatchOutcome, DispatchRequest, DomainError, RenderedMessage};
use crate::usecases::{AudienceResolver, BatchDispatcher, MessageRenderer};
use tracing::{info, warn};

/// Public entry point for sending an announcement.
pub struct DispatchService {
    resolver: AudienceResolver,
    renderer: MessageRenderer,
    dispatcher: BatchDispatcher,
}

impl DispatchService {
    pub fn new(
        resolver: AudienceResolver,
        renderer: MessageRenderer,
        dispatcher: BatchDispatcher,
    ) -> Self {
        Self {
            resolver,
            renderer,
            dispatcher,
        }
    }

    /// Send one announcement.
    ///
    /// # Errors
    /// - `Validation`: empty subject/body, no recipient source, or nobody matched
    /// - `DirectoryUnavailable`: groups were selected and the directory failed
    pub async fn send(&self, request: &DispatchRequest) -> Result<DispatchOutcome, DomainError> {
        validate(request)?;

        let audience = self
            .resolver
            .resolve(
                &request.audience_groups,
                request.rank_threshold,
                &request.explicit_addresses,
            )
            .await?;

        if audience.is_empty() {
            return Err(DomainError::Validation(
                "no recipients matched the given audience".into(),
            ));
        }

        let message = self.render(request);

        info!(
            subject = %message.subject,
            recipients = audience.len(),
            sender = %self.dispatcher.sender(),
            "dispatching announcement"
        );

        let batch_results = self.dispatcher.dispatch(&audience.addresses, &message).await;
        let mut outcome = DispatchOutcome::new(audience.len(), batch_results);
        if self.dispatcher.is_simulated() {
            warn!("dry-run provider in use; nothing was delivered");
            outcome = outcome.simulated();
        }

        if outcome.overall_succeeded {
            info!(recipients = outcome.recipient_count, batches = outcome.batch_results.len(), "dispatch complete");
        } else {
            warn!(
                recipients = outcome.recipient_count,
                failed = outcome.failed_batches(),
                batches = outcome.batch_results.len(),
                "dispatch finished with failed batches"
            );
        }

        Ok(outcome)
    }

    /// Render without sending (preview).
    pub fn render(&self, request: &DispatchRequest) -> RenderedMessage {
        self.renderer.render(&request.subject, &request.body_fragment)
    }
}

fn validate(request: &DispatchRequest) -> Result<(), DomainError> {
    if request.subject.trim().is_empty() {
        return Err(DomainError::Validation("subject is required".into()));
    }
    if request.body_fragment.trim().is_empty() {
        return Err(DomainError::Validation("email content is required".into()));
    }
    if !request.has_audience() {
        return Err(DomainError::Validation(
            "at least one recipient group or address is required".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, GroupId, Role};
    use crate::adapters::mail::DryRunMailer;
    use crate::usecases::test_support::{FakeDirectory, RecordingMailer, member};
    use std::sync::Arc;

    fn service(directory: Arc<FakeDirectory>, mailer: Arc<RecordingMailer>) -> DispatchService {
        DispatchService::new(
            AudienceResolver::new(directory),
            MessageRenderer::default(),
            BatchDispatcher::new(
                mailer,
                EmailAddress::normalized("announcements@cboa.ca").unwrap(),
            ),
        )
    }

    fn officials(n: usize) -> Vec<crate::domain::MemberRecord> {
        (0..n)
            .map(|i| member(&format!("ref{i}@x.com"), Role::Official, Some(200)))
            .collect()
    }

    #[tokio::test]
    async fn test_rejects_blank_subject_and_body_before_io() {
        let directory = Arc::new(FakeDirectory::with_members(officials(3)));
        let mailer = Arc::new(RecordingMailer::new());
        let svc = service(directory.clone(), mailer.clone());

        let blank_subject = DispatchRequest::new("   ", "<p>x</p>").with_group(GroupId::All);
        assert!(matches!(
            svc.send(&blank_subject).await,
            Err(DomainError::Validation(_))
        ));

        let blank_body = DispatchRequest::new("Hello", "\n").with_group(GroupId::All);
        assert!(matches!(
            svc.send(&blank_body).await,
            Err(DomainError::Validation(_))
        ));

        let nobody = DispatchRequest::new("Hello", "<p>x</p>");
        assert!(matches!(
            svc.send(&nobody).await,
            Err(DomainError::Validation(_))
        ));

        assert_eq!(directory.calls(), 0);
        assert!(mailer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_resolution_is_validation_error() {
        let directory = Arc::new(FakeDirectory::with_members(officials(3)));
        let mailer = Arc::new(RecordingMailer::new());
        let svc = service(directory, mailer.clone());

        let request = DispatchRequest::new("Hello", "<p>x</p>")
            .with_group(GroupId::Officials)
            .with_rank_threshold(900);
        let err = svc.send(&request).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation error: no recipients matched the given audience"
        );
        assert!(mailer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_only_malformed_explicit_addresses_is_validation_error() {
        let svc = service(
            Arc::new(FakeDirectory::unreachable()),
            Arc::new(RecordingMailer::new()),
        );
        let request = DispatchRequest::new("Hello", "<p>x</p>").with_address("nobody");
        assert!(matches!(
            svc.send(&request).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_explicit_only_survives_directory_outage() {
        let directory = Arc::new(FakeDirectory::unreachable());
        let mailer = Arc::new(RecordingMailer::new());
        let svc = service(directory.clone(), mailer.clone());

        let request = DispatchRequest::new("Booking confirmed", "<p>See you</p>")
            .with_address("Coach@School.ca");
        let outcome = svc.send(&request).await.unwrap();

        assert_eq!(outcome.recipient_count, 1);
        assert!(outcome.overall_succeeded);
        assert_eq!(directory.calls(), 0);
        assert_eq!(mailer.calls()[0].1, vec!["coach@school.ca".to_string()]);
    }

    #[tokio::test]
    async fn test_directory_outage_with_groups_is_fatal() {
        let mailer = Arc::new(RecordingMailer::new());
        let svc = service(Arc::new(FakeDirectory::unreachable()), mailer.clone());

        let request = DispatchRequest::new("Hello", "<p>x</p>")
            .with_group(GroupId::All)
            .with_address("a@x.com");
        assert!(matches!(
            svc.send(&request).await,
            Err(DomainError::DirectoryUnavailable(_))
        ));
        assert!(mailer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_reported_not_thrown() {
        let mailer = Arc::new(RecordingMailer::failing_on(&[1]));
        let svc = service(
            Arc::new(FakeDirectory::with_members(officials(1750))),
            mailer.clone(),
        );

        let request = DispatchRequest::new("Season opener", "<p>x</p>").with_group(GroupId::Officials);
        let outcome = svc.send(&request).await.unwrap();

        assert_eq!(outcome.recipient_count, 1750);
        assert_eq!(outcome.batch_results.len(), 4);
        assert!(!outcome.overall_succeeded);
        assert_eq!(outcome.failed_batches(), 1);
        assert_eq!(mailer.calls().len(), 4);
        assert_eq!(
            outcome.summary(),
            "Sent to 1750 recipients, but 1 of 4 batches failed"
        );
    }

    #[tokio::test]
    async fn test_full_success() {
        let mailer = Arc::new(RecordingMailer::new());
        let svc = service(
            Arc::new(FakeDirectory::with_members(officials(501))),
            mailer.clone(),
        );

        let request = DispatchRequest::new("Hello", "<p>x</p>").with_group(GroupId::All);
        let outcome = svc.send(&request).await.unwrap();

        assert!(outcome.overall_succeeded);
        assert_eq!(outcome.recipient_count, 501);
        let sizes: Vec<usize> = outcome.batch_results.iter().map(|b| b.size).collect();
        assert_eq!(sizes, vec![500, 1]);
        assert!(!outcome.dry_run);
    }

    #[tokio::test]
    async fn test_dry_run_provider_marks_outcome() {
        let svc = DispatchService::new(
            AudienceResolver::new(Arc::new(FakeDirectory::with_members(officials(2)))),
            MessageRenderer::default(),
            BatchDispatcher::new(
                Arc::new(DryRunMailer::new()),
                EmailAddress::normalized("announcements@cboa.ca").unwrap(),
            ),
        );

        let request = DispatchRequest::new("Hello", "<p>x</p>").with_group(GroupId::Officials);
        let outcome = svc.send(&request).await.unwrap();

        assert!(outcome.dry_run);
        assert!(outcome.summary().starts_with("[DRY RUN]"));
    }
}
