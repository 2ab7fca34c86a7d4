mod cli;
mod demo;
mod infra;
mod routes;
mod screening;
mod server;

use campus_placement::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
