use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use zest_report::config::{
    self, DEFAULT_PUSH_DELAY_MS, ENV_SERVICE_API_KEY, ENV_SERVICE_URL, ENV_TEST_CYCLE_KEY,
};
use zest_report::{CurlApi, ExternalServiceSettings, update_execution_results};

/// Push a persisted test-results report to the external test-management service.
///
/// Runs only the external sink, re-reading the JSON report written by the
/// reporter, so updates can be retried without re-running the tests.
#[derive(Parser, Debug)]
#[command(
    name = "update_results",
    about = "Push step results from a persisted report to the test-management service",
    after_help = "ENVIRONMENT VARIABLES:\n\
        ZEST_SERVICE_URL       External API base URL\n\
        ZEST_SERVICE_API_KEY   Bearer token for the external API\n\
        ZEST_TEST_CYCLE_KEY    Test cycle to resolve executions in"
)]
struct Args {
    /// Path to the persisted JSON report
    #[arg(short, long, default_value = "test-results/test-results.json")]
    report: PathBuf,

    /// External API base URL
    #[arg(long, env = ENV_SERVICE_URL)]
    api_url: String,

    /// Bearer token for the external API
    #[arg(long, env = ENV_SERVICE_API_KEY, hide_env_values = true)]
    api_key: String,

    /// Test cycle to resolve open executions in
    #[arg(long, env = ENV_TEST_CYCLE_KEY)]
    test_cycle: String,

    /// Delay between successive pushes (milliseconds)
    #[arg(long, default_value_t = DEFAULT_PUSH_DELAY_MS)]
    push_delay_ms: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let settings = ExternalServiceSettings {
        enabled: true,
        api_url: args.api_url,
        api_key: args.api_key,
        test_cycle_key: args.test_cycle,
        update_results: true,
        push_delay_ms: args.push_delay_ms,
        connect_timeout_secs: config::DEFAULT_CONNECT_TIMEOUT,
    };

    let api = CurlApi::new(&settings);
    match update_execution_results(&api, &args.report, &settings) {
        Ok(summary) => {
            println!(
                "Update complete: {} pushed, {} skipped",
                summary.pushed, summary.skipped
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Update failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
