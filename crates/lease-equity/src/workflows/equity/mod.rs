//! Lease equity estimation: live valuation lookups, validation of their figures, and the
//! closed-form fallback used whenever the valuation source cannot be trusted or reached.

pub mod domain;
pub mod estimator;
pub mod fallback;
pub mod repository;
pub mod router;
pub mod service;
pub mod valuation;

#[cfg(test)]
mod tests;

pub use domain::{
    DealerInterest, EquityAssessment, EquityEstimate, EstimateMode, InquiryId, InquirySummary,
    LeaseInputError, LeaseInquiry, VehicleLeaseInput,
};
pub use estimator::{EquityEstimator, EQUITY_TOLERANCE};
pub use fallback::{fallback_estimate, next_steps_for};
pub use repository::{InquiryNotifier, InquiryRepository, NotifierError, RepositoryError};
pub use router::{equity_router, EstimateResponse, InquiryResponse};
pub use service::{InquiryServiceError, LeaseEquityService, MAX_RECENT_INQUIRIES};
pub use valuation::{
    GenerativeValuationClient, UnconfiguredValuationSource, ValuationClientError,
    ValuationError, ValuationReport, ValuationSource,
};
