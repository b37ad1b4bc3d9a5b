mod accounts;
mod config;
mod routines;
mod scraping;
mod sheets;
mod sinks;

use crate::routines::balance_routine::BalanceRoutine;
use crate::routines::routine::Routine;

const LOG_FILE: &str = "te_balance.log";

/// Diagnostics go to a log file that is truncated on every run.
fn init_logging() {
    let log_file = std::fs::File::create(LOG_FILE).expect("Failed to create log file");

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let routines_to_run: Vec<Box<dyn Routine>> = vec![Box::new(BalanceRoutine)];

    for routine in &routines_to_run {
        match routine.run().await {
            Ok(()) => log::info!("✅ {}: OK", routine.name()),
            Err(report) => log::error!("❌ {}: {:?}", routine.name(), report),
        }
    }
}
