use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Oldest model year the estimator accepts.
pub const MIN_MODEL_YEAR: u16 = 1990;

/// Identifier wrapper for stored lease inquiries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InquiryId(pub String);

/// Vehicle and contract details submitted for a single equity estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLeaseInput {
    pub make: String,
    pub model: String,
    pub year: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub current_mileage: u32,
    pub annual_mileage_allowance: u32,
    pub months_remaining: u32,
    pub lease_term: u32,
}

impl VehicleLeaseInput {
    /// Boundary validation applied before the estimator runs.
    ///
    /// `current_year` comes from the caller's clock so the check stays deterministic in tests.
    pub fn validate(&self, current_year: i32) -> Result<(), LeaseInputError> {
        if self.make.trim().is_empty() {
            return Err(LeaseInputError::MissingField("make"));
        }
        if self.model.trim().is_empty() {
            return Err(LeaseInputError::MissingField("model"));
        }

        let latest = current_year + 1;
        if i32::from(self.year) < i32::from(MIN_MODEL_YEAR) || i32::from(self.year) > latest {
            return Err(LeaseInputError::YearOutOfRange {
                year: self.year,
                latest,
            });
        }

        if let Some(zip) = self.zip_code.as_deref() {
            if !is_valid_zip_code(zip.trim()) {
                return Err(LeaseInputError::InvalidZipCode(zip.to_string()));
            }
        }

        if self.annual_mileage_allowance == 0 {
            return Err(LeaseInputError::NonPositive("annualMileageAllowance"));
        }
        if self.lease_term == 0 {
            return Err(LeaseInputError::NonPositive("leaseTerm"));
        }
        if self.months_remaining == 0 {
            return Err(LeaseInputError::NonPositive("monthsRemaining"));
        }

        Ok(())
    }

    /// Months already driven; negative when the remaining count exceeds the term.
    pub fn months_elapsed(&self) -> i64 {
        i64::from(self.lease_term) - i64::from(self.months_remaining)
    }

    /// Human readable vehicle label, e.g. `2022 Honda Accord EX`.
    pub fn vehicle_label(&self) -> String {
        match self.trim.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(trim) => format!("{} {} {} {}", self.year, self.make, self.model, trim),
            None => format!("{} {} {}", self.year, self.make, self.model),
        }
    }
}

/// Matches `\d{5}(-\d{4})?`.
pub(crate) fn is_valid_zip_code(value: &str) -> bool {
    let bytes = value.as_bytes();
    let digits = |slice: &[u8]| slice.iter().all(u8::is_ascii_digit);
    match bytes.len() {
        5 => digits(bytes),
        10 => digits(&bytes[..5]) && bytes[5] == b'-' && digits(&bytes[6..]),
        _ => false,
    }
}

/// Rejections raised before a submission reaches the estimator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeaseInputError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("year {year} must be between 1990 and {latest}")]
    YearOutOfRange { year: u16, latest: i32 },
    #[error("zip code '{0}' must look like 12345 or 12345-6789")]
    InvalidZipCode(String),
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
}

/// Qualitative appetite a dealer is likely to have for buying out the lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerInterest {
    High,
    Medium,
    Low,
}

impl DealerInterest {
    pub const HIGH_EQUITY_THRESHOLD: f64 = 3000.0;
    pub const MEDIUM_EQUITY_THRESHOLD: f64 = 1000.0;

    /// Canonical tier table shared by the fallback model, the correction step, and the prompt.
    pub fn from_equity(equity: f64) -> Self {
        if equity > Self::HIGH_EQUITY_THRESHOLD {
            Self::High
        } else if equity > Self::MEDIUM_EQUITY_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lenient parse used on untrusted payloads; unknown labels clamp to `Low`.
    pub fn clamp_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Final figures returned to callers. All amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityEstimate {
    pub estimated_retail_price: i64,
    pub estimated_residual_value: i64,
    pub estimated_market_value: i64,
    pub estimated_payoff_amount: i64,
    pub estimated_equity: i64,
    pub is_positive_equity: bool,
    pub dealer_interest: DealerInterest,
    pub next_steps: Vec<String>,
}

impl EquityEstimate {
    /// Equity implied by the market value and payoff figures.
    pub fn implied_equity(&self) -> i64 {
        self.estimated_market_value
            .saturating_sub(self.estimated_payoff_amount)
    }
}

/// Which path produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMode {
    Live,
    Fallback,
}

impl EstimateMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live => "live market data",
            Self::Fallback => "estimated data",
        }
    }
}

/// Estimator output: the estimate plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityAssessment {
    pub estimate: EquityEstimate,
    pub mode: EstimateMode,
    pub analysis_reasoning: Option<String>,
}

impl EquityAssessment {
    pub fn used_fallback(&self) -> bool {
        self.mode == EstimateMode::Fallback
    }
}

/// Stored pairing of a submission with the estimate it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseInquiry {
    pub id: InquiryId,
    pub submitted_at: DateTime<Utc>,
    pub input: VehicleLeaseInput,
    pub assessment: EquityAssessment,
}

impl LeaseInquiry {
    pub fn summary(&self) -> InquirySummary {
        let estimate = &self.assessment.estimate;
        InquirySummary {
            inquiry_id: self.id.clone(),
            vehicle: self.input.vehicle_label(),
            zip_code: self.input.zip_code.clone(),
            estimated_equity: estimate.estimated_equity,
            dealer_interest: estimate.dealer_interest,
            mode: self.assessment.mode,
        }
    }
}

/// Condensed view handed to notification adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquirySummary {
    pub inquiry_id: InquiryId,
    pub vehicle: String,
    pub zip_code: Option<String>,
    pub estimated_equity: i64,
    pub dealer_interest: DealerInterest,
    pub mode: EstimateMode,
}
