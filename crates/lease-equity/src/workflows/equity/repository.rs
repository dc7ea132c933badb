use super::domain::{InquiryId, InquirySummary, LeaseInquiry};

/// Storage abstraction for submitted inquiries and the estimates they received.
pub trait InquiryRepository: Send + Sync {
    fn insert(&self, inquiry: LeaseInquiry) -> Result<LeaseInquiry, RepositoryError>;
    fn fetch(&self, id: &InquiryId) -> Result<Option<LeaseInquiry>, RepositoryError>;
    fn recent(&self, limit: usize) -> Result<Vec<LeaseInquiry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("inquiry already exists")]
    Conflict,
    #[error("inquiry not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for e-mail or CRM adapters that summarize new inquiries.
pub trait InquiryNotifier: Send + Sync {
    fn notify(&self, summary: InquirySummary) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
