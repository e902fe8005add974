//! # Compliance Results SDK
//!
//! Rust client for the compliance results reporting service: scan reports,
//! their controls, evaluations, resources and violation drift.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use compliance_results_sdk::auth::IamAuthenticator;
//! use compliance_results_sdk::{GetLatestReportsOptions, ResultsClient, ResultsResult};
//!
//! #[tokio::main]
//! async fn main() -> ResultsResult<()> {
//!     let client = ResultsClient::builder()
//!         .service_url("https://us-south.compliance.cloud.ibm.com/instances/my-instance/v3")
//!         .authenticator(IamAuthenticator::new("my-api-key")?)
//!         .build()?;
//!
//!     let response = client
//!         .reports()
//!         .get_latest_reports(&GetLatestReportsOptions::new().with_sort("profile_name"))
//!         .await?;
//!
//!     if let Some(latest) = response.result() {
//!         for report in latest.reports.iter().flatten() {
//!             println!("{:?} {:?}", report.id, report.report_type);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Paging
//!
//! ```rust,no_run
//! use compliance_results_sdk::{ListReportEvaluationsOptions, ResultsClient};
//!
//! # async fn example(client: ResultsClient) -> compliance_results_sdk::ResultsResult<()> {
//! let options = ListReportEvaluationsOptions::new("report-id").with_limit(100);
//! let mut pager = client.evaluations().list_report_evaluations_pager(&options)?;
//!
//! while pager.has_next() {
//!     for evaluation in pager.get_next().await? {
//!         println!("{:?}", evaluation.status);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Deadlines and cancellation
//!
//! Every operation has a `_with_context` form taking a [`RequestContext`].
//! Its deadline bounds the whole call, retries included.

pub mod api;
pub mod auth;
pub mod client;
pub mod codec;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod pager;
pub mod request;
pub mod response;
pub mod transport;

// Re-export main client
pub use client::{ResultsClient, ResultsClientBuilder};
pub use config::external::{
    ConfigProvider, EnvConfigProvider, FileConfigProvider, MapConfigProvider,
};
pub use config::{ClientConfig, RetryConfig};
pub use context::RequestContext;
pub use error::{CancelReason, ResultsError, ResultsResult};
pub use response::DetailedResponse;

// Re-export operations and their options
pub use api::*;
pub use codec::ByteStream;
pub use pager::{
    PagedOptions, Pager, ReportEvaluationsPager, ReportResourcesPager, ReportsPager,
};

// Re-export endpoint helpers
pub use endpoint::{construct_service_url, url_for_region, DEFAULT_SERVICE_NAME, DEFAULT_SERVICE_URL};

// Re-export the domain model
pub use compliance_results_core as models;
pub use compliance_results_core::{
    ComplianceStatus, EvaluationStatus, Paginated, ScanType,
};
