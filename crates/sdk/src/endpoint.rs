//! Service endpoint resolution.

use crate::error::{ResultsError, ResultsResult};
use crate::request::PLACEHOLDER;
use std::collections::HashMap;

/// Default name used to look up external configuration.
pub const DEFAULT_SERVICE_NAME: &str = "compliance_results";

/// Default service URL.
pub const DEFAULT_SERVICE_URL: &str =
    "https://us-south.compliance.cloud.ibm.com/instances/instance_id/v3";

/// Service URL template with `{region}` and `{instance_id}` variables.
pub const PARAMETERIZED_SERVICE_URL: &str =
    "https://{region}.cloud.ibm.com/instances/{instance_id}/v3";

/// Default values of the variables in [`PARAMETERIZED_SERVICE_URL`].
pub const DEFAULT_URL_VARIABLES: &[(&str, &str)] = &[
    ("region", "us-south.compliance"),
    ("instance_id", "instance_id"),
];

/// Build a service URL from [`PARAMETERIZED_SERVICE_URL`], overriding the
/// default variable values with `provided`.
pub fn construct_service_url(provided: &HashMap<String, String>) -> ResultsResult<String> {
    construct_url(PARAMETERIZED_SERVICE_URL, DEFAULT_URL_VARIABLES, provided)
}

/// Substitute `{name}` variables in `template`.
///
/// Every key of `provided` must name a variable listed in `defaults`;
/// variables not provided take their default value.
pub fn construct_url(
    template: &str,
    defaults: &[(&str, &str)],
    provided: &HashMap<String, String>,
) -> ResultsResult<String> {
    let mut unknown: Vec<&str> = provided
        .keys()
        .map(String::as_str)
        .filter(|name| !defaults.iter().any(|(known, _)| known == name))
        .collect();
    unknown.sort_unstable();
    if let Some(name) = unknown.first() {
        return Err(ResultsError::Config(format!("unknown variable {name}")));
    }

    let url = PLACEHOLDER.replace_all(template, |captures: &regex::Captures<'_>| {
        let name = &captures["name"];
        provided
            .get(name)
            .map(String::as_str)
            .or_else(|| {
                defaults
                    .iter()
                    .find(|(known, _)| *known == name)
                    .map(|(_, value)| *value)
            })
            .unwrap_or_default()
            .to_string()
    });

    Ok(url.into_owned())
}

/// Regional URL for this service. Always fails: the service does not
/// publish regional endpoints, use [`construct_service_url`] instead.
pub fn url_for_region(region: &str) -> ResultsResult<String> {
    Err(ResultsError::Config(format!(
        "service does not support regional URLs (requested region {region})"
    )))
}
