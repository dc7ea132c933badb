use crate::workflows::equity::domain::{DealerInterest, VehicleLeaseInput};

pub(crate) const SYSTEM_PROMPT: &str = "You are a vehicle pricing API. You answer every request with a single JSON object and no other text. You never wrap the JSON in markdown fences.";

/// Step-by-step arithmetic instructions so the completion already satisfies the
/// estimator's invariants; the caller still validates every figure.
pub(crate) fn valuation_prompt(input: &VehicleLeaseInput) -> String {
    let location = match (input.state.as_deref(), input.zip_code.as_deref()) {
        (Some(state), Some(zip)) => format!("{state} {zip}"),
        (Some(state), None) => state.to_string(),
        (None, Some(zip)) => zip.to_string(),
        (None, None) => "United States (national average)".to_string(),
    };

    let mut prompt = format!(
        "Estimate the lease equity for this vehicle.\n\n\
Vehicle: {vehicle}\n\
Location: {location}\n\
Current mileage: {mileage}\n\
Annual mileage allowance: {allowance}\n\
Lease term: {term} months\n\
Months remaining: {remaining}\n\
Months elapsed: {elapsed}\n\n",
        vehicle = input.vehicle_label(),
        mileage = input.current_mileage,
        allowance = input.annual_mileage_allowance,
        term = input.lease_term,
        remaining = input.months_remaining,
        elapsed = input.months_elapsed(),
    );

    prompt.push_str(&format!(
        "Follow these steps exactly, rounding every amount to whole dollars:\n\
1. estimatedRetailPrice: the MSRP of this vehicle when new.\n\
2. estimatedResidualValue: the typical contract residual for this term, adjusted for mileage driven beyond the prorated allowance.\n\
3. estimatedMarketValue: what a dealer would pay for the vehicle today in this location.\n\
4. monthlyDepreciation: (estimatedRetailPrice - estimatedResidualValue) / lease term.\n\
5. remainingDepreciation: monthlyDepreciation * months remaining.\n\
6. estimatedPayoffAmount: estimatedResidualValue + remainingDepreciation.\n\
7. estimatedEquity: estimatedMarketValue - estimatedPayoffAmount.\n\
8. isPositiveEquity: true when estimatedEquity is greater than 0.\n\
9. dealerInterest: \"High\" when estimatedEquity is above {high:.0}, \"Medium\" when it is above {medium:.0} and at most {high:.0}, otherwise \"Low\".\n\
10. nextSteps: four short recommendations for the owner.\n\
11. analysisReasoning: one paragraph explaining the figures.\n\n",
        high = DealerInterest::HIGH_EQUITY_THRESHOLD,
        medium = DealerInterest::MEDIUM_EQUITY_THRESHOLD,
    ));

    prompt.push_str(
        "Respond with a JSON object containing exactly these keys: estimatedRetailPrice, \
estimatedResidualValue, estimatedMarketValue, monthlyDepreciation, remainingDepreciation, \
estimatedPayoffAmount, estimatedEquity, isPositiveEquity, dealerInterest, nextSteps, \
analysisReasoning.",
    );

    prompt
}
