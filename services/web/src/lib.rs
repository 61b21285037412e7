mod cli;
mod infra;
mod routes;
mod server;

use campus_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
