use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{
    DealerInterest, EquityAssessment, EquityEstimate, EstimateMode, VehicleLeaseInput,
};
use super::fallback::{fallback_estimate, next_steps_for};
use super::valuation::{UnconfiguredValuationSource, ValuationReport, ValuationSource};

/// Largest gap between supplied and implied equity accepted without correction.
pub const EQUITY_TOLERANCE: i64 = 100;

/// Produces an estimate for every input: live figures when the valuation source
/// answers, the closed-form fallback otherwise.
#[derive(Clone)]
pub struct EquityEstimator {
    source: Arc<dyn ValuationSource>,
}

impl EquityEstimator {
    pub fn new(source: Arc<dyn ValuationSource>) -> Self {
        Self { source }
    }

    /// Estimator that never reaches out and always reports fallback figures.
    pub fn offline() -> Self {
        Self::new(Arc::new(UnconfiguredValuationSource))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn estimate(&self, input: &VehicleLeaseInput) -> EquityAssessment {
        match self.source.fetch_valuation(input).await {
            Ok(report) => {
                let (estimate, analysis_reasoning) = reconcile_report(report);
                info!(
                    source = self.source.name(),
                    equity = estimate.estimated_equity,
                    dealer_interest = estimate.dealer_interest.label(),
                    "live equity estimate"
                );
                EquityAssessment {
                    estimate,
                    mode: EstimateMode::Live,
                    analysis_reasoning,
                }
            }
            Err(error) => {
                warn!(
                    source = self.source.name(),
                    %error,
                    "valuation unavailable; using fallback estimate"
                );
                EquityAssessment {
                    estimate: fallback_estimate(input),
                    mode: EstimateMode::Fallback,
                    analysis_reasoning: None,
                }
            }
        }
    }
}

/// Turns an untrusted report into an estimate. The equity implied by market value and
/// payoff wins whenever the reported figure drifts past the tolerance.
pub(crate) fn reconcile_report(report: ValuationReport) -> (EquityEstimate, Option<String>) {
    let implied_equity = report
        .estimated_market_value
        .saturating_sub(report.estimated_payoff_amount);
    let drift = report.estimated_equity.abs_diff(implied_equity);

    let (estimated_equity, dealer_interest) =
        if drift > EQUITY_TOLERANCE.unsigned_abs() {
            debug!(
                reported = report.estimated_equity,
                implied = implied_equity,
                "correcting inconsistent reported equity"
            );
            (implied_equity, DealerInterest::from_equity(implied_equity as f64))
        } else {
            (report.estimated_equity, report.dealer_interest)
        };

    let is_positive_equity = estimated_equity > 0;
    let next_steps = if report.next_steps.is_empty() {
        next_steps_for(is_positive_equity)
    } else {
        report.next_steps
    };

    let analysis_reasoning = Some(report.analysis_reasoning).filter(|text| !text.is_empty());

    let estimate = EquityEstimate {
        estimated_retail_price: report.estimated_retail_price,
        estimated_residual_value: report.estimated_residual_value,
        estimated_market_value: report.estimated_market_value,
        estimated_payoff_amount: report.estimated_payoff_amount,
        estimated_equity,
        is_positive_equity,
        dealer_interest,
        next_steps,
    };

    (estimate, analysis_reasoning)
}
