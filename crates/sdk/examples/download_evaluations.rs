//! Downloads the evaluations of a report as CSV.
//!
//! Run with: cargo run --example download_evaluations -- <report-id> <file>

use compliance_results_sdk::{
    EnvConfigProvider, GetReportEvaluationOptions, ResultsClient, ResultsError, ResultsResult,
    DEFAULT_SERVICE_NAME,
};
use tokio::io::AsyncWriteExt;

#[tokio::main]
async fn main() -> ResultsResult<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let report_id = args.next().unwrap_or_else(|| "report-id".to_string());
    let path = args.next().unwrap_or_else(|| "evaluations.csv".to_string());

    let client = ResultsClient::from_external_config(DEFAULT_SERVICE_NAME, &EnvConfigProvider)?;
    let response = client
        .reports()
        .get_report_evaluation(&GetReportEvaluationOptions::new(report_id).with_exclude_summary(true))
        .await?;

    let Some(mut body) = response.into_result() else {
        return Ok(());
    };

    let io_error = |e: std::io::Error| ResultsError::Config(format!("{path}: {e}"));
    let mut file = tokio::fs::File::create(&path).await.map_err(io_error)?;
    let mut written = 0;
    while let Some(chunk) = body.next_chunk().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len();
    }
    body.close();

    println!("Wrote {written} bytes to {path}");
    Ok(())
}
