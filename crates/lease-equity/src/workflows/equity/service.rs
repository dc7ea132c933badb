use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{InquiryId, LeaseInputError, LeaseInquiry, VehicleLeaseInput};
use super::estimator::EquityEstimator;
use super::repository::{InquiryNotifier, InquiryRepository, RepositoryError};

/// Upper bound on how many inquiries a single listing returns.
pub const MAX_RECENT_INQUIRIES: usize = 100;

static INQUIRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_inquiry_id() -> InquiryId {
    let id = INQUIRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InquiryId(format!("inq-{id:06}"))
}

/// Service composing input validation, the estimator, persistence, and notifications.
pub struct LeaseEquityService<R, N> {
    estimator: EquityEstimator,
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> LeaseEquityService<R, N>
where
    R: InquiryRepository + 'static,
    N: InquiryNotifier + 'static,
{
    pub fn new(estimator: EquityEstimator, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            estimator,
            repository,
            notifier,
        }
    }

    pub fn estimator(&self) -> &EquityEstimator {
        &self.estimator
    }

    /// Validate, estimate, and record a submission.
    ///
    /// Notification failures are logged and never block the estimate.
    pub async fn submit(
        &self,
        input: VehicleLeaseInput,
        current_year: i32,
    ) -> Result<LeaseInquiry, InquiryServiceError> {
        input.validate(current_year)?;

        let assessment = self.estimator.estimate(&input).await;
        let inquiry = LeaseInquiry {
            id: next_inquiry_id(),
            submitted_at: Utc::now(),
            input,
            assessment,
        };

        let stored = self.repository.insert(inquiry)?;
        info!(
            inquiry_id = %stored.id.0,
            mode = stored.assessment.mode.label(),
            "lease inquiry recorded"
        );

        if let Err(error) = self.notifier.notify(stored.summary()) {
            warn!(inquiry_id = %stored.id.0, %error, "inquiry notification failed");
        }

        Ok(stored)
    }

    /// Fetch a stored inquiry.
    pub fn get(&self, id: &InquiryId) -> Result<LeaseInquiry, InquiryServiceError> {
        let inquiry = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(inquiry)
    }

    /// Most recent inquiries first, capped at [`MAX_RECENT_INQUIRIES`].
    pub fn recent(&self, limit: usize) -> Result<Vec<LeaseInquiry>, InquiryServiceError> {
        Ok(self.repository.recent(limit.min(MAX_RECENT_INQUIRIES))?)
    }
}

/// Error raised by the inquiry service.
#[derive(Debug, thiserror::Error)]
pub enum InquiryServiceError {
    #[error(transparent)]
    Input(#[from] LeaseInputError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
