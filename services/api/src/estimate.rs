use crate::infra::build_estimator;
use chrono::{Datelike, Local};
use clap::Args;
use lease_equity::config::AppConfig;
use lease_equity::error::AppError;
use lease_equity::workflows::equity::{EquityAssessment, VehicleLeaseInput};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    #[arg(long)]
    pub(crate) make: String,
    #[arg(long)]
    pub(crate) model: String,
    /// Model year
    #[arg(long)]
    pub(crate) year: u16,
    #[arg(long)]
    pub(crate) trim: Option<String>,
    /// Two-letter state code used for regional pricing
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) zip_code: Option<String>,
    /// Odometer reading today
    #[arg(long)]
    pub(crate) current_mileage: u32,
    /// Miles per year allowed by the lease contract
    #[arg(long)]
    pub(crate) annual_mileage_allowance: u32,
    /// Total lease term in months
    #[arg(long)]
    pub(crate) lease_term: u32,
    #[arg(long)]
    pub(crate) months_remaining: u32,
    /// Skip the live valuation service and use the fallback model
    #[arg(long)]
    pub(crate) offline: bool,
}

impl EstimateArgs {
    fn into_input(self) -> (VehicleLeaseInput, bool) {
        let input = VehicleLeaseInput {
            make: self.make,
            model: self.model,
            year: self.year,
            trim: self.trim,
            state: self.state,
            zip_code: self.zip_code,
            current_mileage: self.current_mileage,
            annual_mileage_allowance: self.annual_mileage_allowance,
            months_remaining: self.months_remaining,
            lease_term: self.lease_term,
        };
        (input, self.offline)
    }
}

pub(crate) async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let (input, offline) = args.into_input();
    input.validate(Local::now().year())?;

    let estimator = build_estimator(&config.valuation, offline)?;
    let assessment = estimator.estimate(&input).await;

    print!("{}", render_estimate(&input, &assessment));
    Ok(())
}

fn render_estimate(input: &VehicleLeaseInput, assessment: &EquityAssessment) -> String {
    let estimate = &assessment.estimate;
    let mut output = String::new();

    output.push_str("Lease equity estimate\n");
    output.push_str(&format!(
        "Vehicle: {} ({} of {} months remaining, {} miles)\n",
        input.vehicle_label(),
        input.months_remaining,
        input.lease_term,
        input.current_mileage
    ));
    output.push_str(&format!("Data source: {}\n\n", assessment.mode.label()));

    output.push_str(&format!(
        "Retail price:   ${}\n",
        estimate.estimated_retail_price
    ));
    output.push_str(&format!(
        "Residual value: ${}\n",
        estimate.estimated_residual_value
    ));
    output.push_str(&format!(
        "Market value:   ${}\n",
        estimate.estimated_market_value
    ));
    output.push_str(&format!(
        "Payoff amount:  ${}\n",
        estimate.estimated_payoff_amount
    ));
    output.push_str(&format!(
        "Equity:         ${} ({})\n",
        estimate.estimated_equity,
        if estimate.is_positive_equity {
            "positive"
        } else {
            "negative"
        }
    ));
    output.push_str(&format!(
        "Dealer interest: {}\n",
        estimate.dealer_interest.label()
    ));

    if let Some(reasoning) = &assessment.analysis_reasoning {
        output.push_str(&format!("\nAnalysis: {reasoning}\n"));
    }

    output.push_str("\nNext steps\n");
    for (position, step) in estimate.next_steps.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", position + 1, step));
    }

    output
}
