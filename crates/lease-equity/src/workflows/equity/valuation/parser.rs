use serde_json::{Map, Value};

use super::{ValuationError, ValuationReport};
use crate::workflows::equity::domain::DealerInterest;
use crate::workflows::equity::fallback::whole_units;

pub(crate) const REQUIRED_KEYS: [&str; 11] = [
    "estimatedRetailPrice",
    "estimatedResidualValue",
    "estimatedMarketValue",
    "monthlyDepreciation",
    "remainingDepreciation",
    "estimatedPayoffAmount",
    "estimatedEquity",
    "isPositiveEquity",
    "dealerInterest",
    "nextSteps",
    "analysisReasoning",
];

/// Outermost `{ ... }` span of free text.
pub(crate) fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then_some(&raw[start..=end])
}

/// Parses completion text into a report, coercing every field from the untyped payload.
pub(crate) fn parse_report(text: &str) -> Result<ValuationReport, ValuationError> {
    let json_text = extract_json_object(text).ok_or_else(|| {
        ValuationError::Unavailable("completion text contained no JSON object".to_string())
    })?;

    let value: Value = serde_json::from_str(json_text).map_err(|err| {
        ValuationError::Unavailable(format!("completion JSON could not be parsed: {err}"))
    })?;

    let Value::Object(fields) = value else {
        return Err(ValuationError::Unavailable(
            "completion JSON was not an object".to_string(),
        ));
    };

    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|key| !fields.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValuationError::IncompleteResponse { missing });
    }

    Ok(ValuationReport {
        estimated_retail_price: price(&fields, "estimatedRetailPrice"),
        estimated_residual_value: price(&fields, "estimatedResidualValue"),
        estimated_market_value: price(&fields, "estimatedMarketValue"),
        monthly_depreciation: signed(&fields, "monthlyDepreciation"),
        remaining_depreciation: signed(&fields, "remainingDepreciation"),
        estimated_payoff_amount: price(&fields, "estimatedPayoffAmount"),
        estimated_equity: signed(&fields, "estimatedEquity"),
        is_positive_equity: flag(&fields, "isPositiveEquity"),
        dealer_interest: fields
            .get("dealerInterest")
            .and_then(Value::as_str)
            .map(DealerInterest::clamp_label)
            .unwrap_or(DealerInterest::Low),
        next_steps: steps(&fields, "nextSteps"),
        analysis_reasoning: fields
            .get("analysisReasoning")
            .and_then(Value::as_str)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    })
}

fn number(fields: &Map<String, Value>, key: &str) -> f64 {
    let raw = match fields.get(key) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => text
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .unwrap_or(0.0),
        _ => 0.0,
    };

    if raw.is_finite() {
        raw
    } else {
        0.0
    }
}

fn price(fields: &Map<String, Value>, key: &str) -> i64 {
    whole_units(number(fields, key)).max(0)
}

fn signed(fields: &Map<String, Value>, key: &str) -> i64 {
    whole_units(number(fields, key))
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn steps(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
