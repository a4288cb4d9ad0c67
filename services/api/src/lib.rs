mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod spa;

use workboard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
