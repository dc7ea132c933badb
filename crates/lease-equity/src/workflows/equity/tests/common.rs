use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::equity::domain::{
    DealerInterest, InquiryId, InquirySummary, LeaseInquiry, VehicleLeaseInput,
};
use crate::workflows::equity::repository::{
    InquiryNotifier, InquiryRepository, NotifierError, RepositoryError,
};
use crate::workflows::equity::valuation::{ValuationError, ValuationReport, ValuationSource};
use crate::workflows::equity::{EquityEstimator, LeaseEquityService};

pub(super) const CURRENT_YEAR: i32 = 2025;

/// Mid-lease scenario: 36 month term, 18 months left, 7,000 miles over the prorated allowance.
pub(super) fn lease_input() -> VehicleLeaseInput {
    VehicleLeaseInput {
        make: "Honda".to_string(),
        model: "Accord".to_string(),
        year: 2022,
        trim: Some("EX".to_string()),
        state: Some("IA".to_string()),
        zip_code: Some("50309".to_string()),
        current_mileage: 25_000,
        annual_mileage_allowance: 12_000,
        months_remaining: 18,
        lease_term: 36,
    }
}

pub(super) fn lease_with(
    lease_term: u32,
    months_remaining: u32,
    annual_mileage_allowance: u32,
    current_mileage: u32,
) -> VehicleLeaseInput {
    VehicleLeaseInput {
        lease_term,
        months_remaining,
        annual_mileage_allowance,
        current_mileage,
        ..lease_input()
    }
}

/// Internally consistent report: equity equals market value minus payoff.
pub(super) fn consistent_report() -> ValuationReport {
    ValuationReport {
        estimated_retail_price: 33_500,
        estimated_residual_value: 19_095,
        estimated_market_value: 25_400,
        monthly_depreciation: 400,
        remaining_depreciation: 7_200,
        estimated_payoff_amount: 23_100,
        estimated_equity: 2_300,
        is_positive_equity: true,
        dealer_interest: DealerInterest::Medium,
        next_steps: vec![
            "Request a payoff quote".to_string(),
            "Shop the vehicle to two dealers".to_string(),
        ],
        analysis_reasoning: "Regional demand for midsize sedans remains strong.".to_string(),
    }
}

/// Valuation source answering every call with the same canned result.
pub(super) struct StaticSource {
    result: Result<ValuationReport, ValuationError>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub(super) fn answering(report: ValuationReport) -> Self {
        Self {
            result: Ok(report),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing(error: ValuationError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ValuationSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_valuation(
        &self,
        _input: &VehicleLeaseInput,
    ) -> Result<ValuationReport, ValuationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub(super) fn estimator_with(source: StaticSource) -> (EquityEstimator, Arc<StaticSource>) {
    let source = Arc::new(source);
    (EquityEstimator::new(source.clone()), source)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    inquiries: Mutex<HashMap<InquiryId, LeaseInquiry>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.inquiries.lock().expect("repository mutex").len()
    }
}

impl InquiryRepository for MemoryRepository {
    fn insert(&self, inquiry: LeaseInquiry) -> Result<LeaseInquiry, RepositoryError> {
        let mut guard = self.inquiries.lock().expect("repository mutex");
        if guard.contains_key(&inquiry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inquiry.id.clone(), inquiry.clone());
        Ok(inquiry)
    }

    fn fetch(&self, id: &InquiryId) -> Result<Option<LeaseInquiry>, RepositoryError> {
        Ok(self
            .inquiries
            .lock()
            .expect("repository mutex")
            .get(id)
            .cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<LeaseInquiry>, RepositoryError> {
        let guard = self.inquiries.lock().expect("repository mutex");
        let mut inquiries: Vec<LeaseInquiry> = guard.values().cloned().collect();
        inquiries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        inquiries.truncate(limit);
        Ok(inquiries)
    }
}

pub(super) struct UnavailableRepository;

impl InquiryRepository for UnavailableRepository {
    fn insert(&self, _inquiry: LeaseInquiry) -> Result<LeaseInquiry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InquiryId) -> Result<Option<LeaseInquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<LeaseInquiry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifier {
    events: Mutex<Vec<InquirySummary>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<InquirySummary> {
        self.events.lock().expect("notifier mutex").clone()
    }
}

impl InquiryNotifier for MemoryNotifier {
    fn notify(&self, summary: InquirySummary) -> Result<(), NotifierError> {
        self.events.lock().expect("notifier mutex").push(summary);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl InquiryNotifier for FailingNotifier {
    fn notify(&self, _summary: InquirySummary) -> Result<(), NotifierError> {
        Err(NotifierError::Transport("smtp relay refused".to_string()))
    }
}

pub(super) fn offline_service() -> (
    LeaseEquityService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LeaseEquityService::new(
        EquityEstimator::offline(),
        repository.clone(),
        notifier.clone(),
    );
    (service, repository, notifier)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
