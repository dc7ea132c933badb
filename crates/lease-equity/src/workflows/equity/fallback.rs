//! Closed-form estimate used whenever live valuation data is unavailable.

use super::domain::{DealerInterest, EquityEstimate, VehicleLeaseInput};

/// Starting market value before mileage and age adjustments.
pub const BASELINE_MARKET_VALUE: f64 = 30_000.0;
/// Value lost per mile driven beyond the prorated allowance.
pub const EXCESS_MILEAGE_PENALTY: f64 = 0.15;
/// Share of value retained per elapsed year, compounded.
pub const ANNUAL_RETENTION_FACTOR: f64 = 0.85;
/// Contract residual as a share of the retail price.
pub const RESIDUAL_RATIO: f64 = 0.57;
/// Retail price markup over the undepreciated market value.
pub const RETAIL_MARKUP: f64 = 1.2;

const POSITIVE_EQUITY_STEPS: [&str; 4] = [
    "Request a payoff quote from your leasing company to confirm the buyout amount",
    "Collect purchase offers from at least two dealers in your area",
    "Compare the best offer against your payoff to lock in your equity",
    "Schedule a vehicle inspection before the offer expires",
];

const NEGATIVE_EQUITY_STEPS: [&str; 4] = [
    "Review your lease contract for early termination and disposition fees",
    "Track your mileage to avoid excess mileage charges at turn-in",
    "Check your estimate again in a few months as market values change",
    "Ask your leasing company about lease transfer or extension options",
];

/// Fixed guidance list for the sign of the equity figure.
pub fn next_steps_for(positive_equity: bool) -> Vec<String> {
    let steps = if positive_equity {
        &POSITIVE_EQUITY_STEPS
    } else {
        &NEGATIVE_EQUITY_STEPS
    };
    steps.iter().map(|step| step.to_string()).collect()
}

/// Rounds to the nearest whole unit; non-finite values collapse to zero.
pub(crate) fn whole_units(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Pure estimate derived from the lease terms alone. Never fails.
pub fn fallback_estimate(input: &VehicleLeaseInput) -> EquityEstimate {
    let lease_term = f64::from(input.lease_term.max(1));
    let months_remaining = f64::from(input.months_remaining);
    let years_elapsed = input.months_elapsed() as f64 / 12.0;

    let expected_mileage = f64::from(input.annual_mileage_allowance) * years_elapsed;
    let mileage_difference = f64::from(input.current_mileage) - expected_mileage;
    let mileage_penalty = (mileage_difference * EXCESS_MILEAGE_PENALTY).max(0.0);

    let retention = ANNUAL_RETENTION_FACTOR.powf(years_elapsed);
    let market_value = (BASELINE_MARKET_VALUE - mileage_penalty) * retention;
    let retail_price = market_value / retention * RETAIL_MARKUP;
    let residual_value = retail_price * RESIDUAL_RATIO;
    let payoff_amount =
        (retail_price - residual_value) / lease_term * months_remaining + residual_value;

    let estimated_market_value = whole_units(market_value);
    let estimated_payoff_amount = whole_units(payoff_amount);
    let estimated_equity = estimated_market_value - estimated_payoff_amount;
    let is_positive_equity = estimated_equity > 0;

    EquityEstimate {
        estimated_retail_price: whole_units(retail_price),
        estimated_residual_value: whole_units(residual_value),
        estimated_market_value,
        estimated_payoff_amount,
        estimated_equity,
        is_positive_equity,
        dealer_interest: DealerInterest::from_equity(estimated_equity as f64),
        next_steps: next_steps_for(is_positive_equity),
    }
}
