//! Basic SDK usage example.
//!
//! Reads the service URL and credentials from the environment
//! (`COMPLIANCE_RESULTS_URL`, `COMPLIANCE_RESULTS_AUTH_TYPE`,
//! `COMPLIANCE_RESULTS_APIKEY`, ...) and prints the latest reports with their
//! summaries.
//!
//! Run with: cargo run --example basic_usage

use compliance_results_sdk::{
    EnvConfigProvider, GetLatestReportsOptions, GetReportSummaryOptions, ResultsClient,
    ResultsResult, DEFAULT_SERVICE_NAME,
};

#[tokio::main]
async fn main() -> ResultsResult<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    let mut client = ResultsClient::from_external_config(DEFAULT_SERVICE_NAME, &EnvConfigProvider)?;
    client.enable_retries(0, std::time::Duration::ZERO);

    println!("Fetching latest reports...");
    let response = client
        .reports()
        .get_latest_reports(&GetLatestReportsOptions::new().with_sort("profile_name"))
        .await?;

    let Some(latest) = response.result() else {
        println!("No reports");
        return Ok(());
    };

    if let Some(controls) = &latest.controls_summary {
        println!(
            "Controls: {} compliant, {} not compliant",
            controls.compliant_count.unwrap_or_default(),
            controls.not_compliant_count.unwrap_or_default()
        );
    }

    for report in latest.reports.iter().flatten().take(5) {
        let Some(id) = &report.id else { continue };
        let summary = client
            .reports()
            .get_report_summary(&GetReportSummaryOptions::new(id))
            .await?;

        let score = summary
            .result()
            .and_then(|summary| summary.score.as_ref())
            .and_then(|score| score.percent)
            .unwrap_or_default();
        println!("  Report {id} ({:?}): {score}% passed", report.report_type);
    }

    Ok(())
}
