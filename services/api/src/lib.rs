mod cli;
mod estimate;
mod infra;
mod routes;
mod server;

use lease_equity::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
