use lease_equity::config::{PayoffConfig, ValuationConfig};
use lease_equity::error::AppError;
use lease_equity::workflows::equity::{
    EquityEstimator, GenerativeValuationClient, InquiryId, InquiryNotifier, InquiryRepository,
    InquirySummary, LeaseInquiry, NotifierError, RepositoryError,
};
use lease_equity::workflows::payoff::PayoffDirectory;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

const DEFAULT_INQUIRY_CAPACITY: usize = 10_000;

/// Process-local inquiry store for development and single-node deployments. Nothing survives a
/// restart; once `capacity` inquiries are held the oldest submission is evicted.
#[derive(Clone)]
pub(crate) struct InMemoryInquiryRepository {
    inquiries: Arc<Mutex<HashMap<InquiryId, LeaseInquiry>>>,
    capacity: usize,
}

impl Default for InMemoryInquiryRepository {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INQUIRY_CAPACITY)
    }
}

impl InMemoryInquiryRepository {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            inquiries: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    fn guard(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<InquiryId, LeaseInquiry>>, RepositoryError>
    {
        self.inquiries
            .lock()
            .map_err(|_| RepositoryError::Unavailable("inquiry store poisoned".to_string()))
    }
}

impl InquiryRepository for InMemoryInquiryRepository {
    fn insert(&self, inquiry: LeaseInquiry) -> Result<LeaseInquiry, RepositoryError> {
        let mut guard = self.guard()?;
        if guard.contains_key(&inquiry.id) {
            return Err(RepositoryError::Conflict);
        }
        if guard.len() >= self.capacity {
            let oldest = guard
                .values()
                .min_by_key(|stored| stored.submitted_at)
                .map(|stored| stored.id.clone());
            if let Some(oldest) = oldest {
                guard.remove(&oldest);
            }
        }
        guard.insert(inquiry.id.clone(), inquiry.clone());
        Ok(inquiry)
    }

    fn fetch(&self, id: &InquiryId) -> Result<Option<LeaseInquiry>, RepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeaseInquiry>, RepositoryError> {
        let mut inquiries: Vec<LeaseInquiry> = self.guard()?.values().cloned().collect();
        inquiries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        inquiries.truncate(limit);
        Ok(inquiries)
    }
}

/// Notifier that writes inquiry summaries to the log in place of an e-mail relay.
#[derive(Default, Clone, Copy)]
pub(crate) struct TracingNotifier;

impl InquiryNotifier for TracingNotifier {
    fn notify(&self, summary: InquirySummary) -> Result<(), NotifierError> {
        info!(
            inquiry_id = %summary.inquiry_id.0,
            vehicle = %summary.vehicle,
            zip_code = summary.zip_code.as_deref().unwrap_or("-"),
            equity = summary.estimated_equity,
            dealer_interest = summary.dealer_interest.label(),
            mode = summary.mode.label(),
            "new lease equity inquiry"
        );
        Ok(())
    }
}

/// Live estimator when an API key is configured, fallback-only otherwise.
pub(crate) fn build_estimator(
    config: &ValuationConfig,
    offline: bool,
) -> Result<EquityEstimator, AppError> {
    if offline {
        return Ok(EquityEstimator::offline());
    }

    if !config.is_configured() {
        warn!("VALUATION_API_KEY not set; serving fallback estimates only");
        return Ok(EquityEstimator::offline());
    }

    let client = GenerativeValuationClient::from_config(config)?;
    Ok(EquityEstimator::new(Arc::new(client)))
}

pub(crate) fn load_payoff_directory(config: &PayoffConfig) -> Result<PayoffDirectory, AppError> {
    match &config.directory_csv {
        Some(path) => {
            let directory = PayoffDirectory::from_path(path)?;
            info!(path = %path.display(), lenders = directory.len(), "payoff directory loaded");
            Ok(directory)
        }
        None => {
            warn!("PAYOFF_DIRECTORY_CSV not set; payoff lookups will be empty");
            Ok(PayoffDirectory::default())
        }
    }
}
