use std::sync::Arc;

use anyhow::Context;

pub mod config;
use config::app_config::{load_config, setup_http_client, setup_login_client};
pub mod http_probe;
pub mod login;
pub mod report;
use report::Reporter;
pub mod runner;
use runner::Runner;

async fn run_batch() -> anyhow::Result<()> {
    let app_config = load_config().context("Failed to load configuration")?;

    let client = setup_http_client(app_config.timeout).context("Failed to create client")?;
    let login_client =
        setup_login_client(&app_config).context("Failed to create login client")?;

    let runner = Runner::new(
        client,
        Arc::new(login_client),
        app_config.login().name.clone(),
        app_config.targets().to_vec(),
    );
    let reporter = Reporter::new(&app_config.config.log_file);

    let results = runner.run().await;
    let log_content = reporter.report(&results).await?;

    println!(
        "Tests completed. Results appended to {}",
        reporter.log_path().display()
    );
    println!("{log_content}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Starting concurrent tests...");

    if let Err(e) = run_batch().await {
        log::error!("{:#}", e);
        eprintln!("Critical Error in main execution: {:#}", e);
        std::process::exit(1);
    }
}
