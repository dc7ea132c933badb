//! Market valuation lookups backed by a generative-text completion service.
//!
//! The completion output is untrusted: it is parsed into an untyped JSON payload, checked for
//! required keys, and coerced field by field before the estimator sees it.

mod client;
mod parser;
mod prompt;

pub use client::{GenerativeValuationClient, ValuationClientError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{DealerInterest, VehicleLeaseInput};

/// Figures reported by a valuation source, already coerced to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub estimated_retail_price: i64,
    pub estimated_residual_value: i64,
    pub estimated_market_value: i64,
    pub monthly_depreciation: i64,
    pub remaining_depreciation: i64,
    pub estimated_payoff_amount: i64,
    pub estimated_equity: i64,
    pub is_positive_equity: bool,
    pub dealer_interest: DealerInterest,
    pub next_steps: Vec<String>,
    pub analysis_reasoning: String,
}

/// Failure modes of a valuation lookup. The estimator recovers from both.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValuationError {
    #[error("valuation data source unavailable: {0}")]
    Unavailable(String),
    #[error("valuation response missing required keys: {}", missing.join(", "))]
    IncompleteResponse { missing: Vec<String> },
}

/// Source of market valuations. Implementations perform at most one outbound call.
#[async_trait]
pub trait ValuationSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_valuation(
        &self,
        input: &VehicleLeaseInput,
    ) -> Result<ValuationReport, ValuationError>;
}

/// Stand-in used when no completion API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredValuationSource;

#[async_trait]
impl ValuationSource for UnconfiguredValuationSource {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn fetch_valuation(
        &self,
        _input: &VehicleLeaseInput,
    ) -> Result<ValuationReport, ValuationError> {
        Err(ValuationError::Unavailable(
            "no valuation API key configured".to_string(),
        ))
    }
}
