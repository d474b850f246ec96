mod cli;
mod demo;
mod infra;
mod report;
mod routes;
mod server;

use school_outreach::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
