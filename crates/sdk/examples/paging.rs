//! Walks every evaluation of a report, page by page and as a stream.
//!
//! Run with: cargo run --example paging -- <report-id>

use compliance_results_sdk::{
    EnvConfigProvider, EvaluationStatus, ListReportEvaluationsOptions, RequestContext,
    ResultsClient, ResultsResult, DEFAULT_SERVICE_NAME,
};
use futures_util::TryStreamExt;
use std::time::Duration;

#[tokio::main]
async fn main() -> ResultsResult<()> {
    tracing_subscriber::fmt::init();

    let report_id = std::env::args().nth(1).unwrap_or_else(|| "report-id".to_string());
    let client = ResultsClient::from_external_config(DEFAULT_SERVICE_NAME, &EnvConfigProvider)?;

    let options = ListReportEvaluationsOptions::new(&report_id)
        .with_status(EvaluationStatus::Failure)
        .with_limit(50);

    // Page by page, bounding each page to ten seconds
    let mut pager = client.evaluations().list_report_evaluations_pager(&options)?;
    let mut page = 0;
    while pager.has_next() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(10));
        let evaluations = pager.get_next_with_context(&ctx).await?;
        page += 1;
        println!("Page {page}: {} failed evaluations", evaluations.len());
    }

    // The same walk as a stream of items
    let evaluations: Vec<_> = client
        .evaluations()
        .list_report_evaluations_pager(&options)?
        .into_stream()
        .try_collect()
        .await?;

    for evaluation in evaluations.iter().take(10) {
        let target = evaluation
            .target
            .as_ref()
            .and_then(|target| target.resource_name.as_deref())
            .unwrap_or("<unknown>");
        println!("  {target}: {:?}", evaluation.reason);
    }

    Ok(())
}
