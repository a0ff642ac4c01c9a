//! Utility functions for common operations

use crate::ingestion::error::IngestionError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GET `url` with query parameters and decode the JSON body
pub async fn http_get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
) -> Result<T, IngestionError> {
    debug!("GET {} {:?}", url, params);

    let response = client.get(url).query(params).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(IngestionError::HttpStatus {
            status: status.as_u16(),
        });
    }

    Ok(response.json::<T>().await?)
}

/// Format a street display name from its KLADR type abbreviation and name
pub fn format_street_name(type_short: &str, name: &str) -> String {
    format!("{} {}", type_short.trim(), name.trim())
        .trim()
        .to_string()
}

/// Trim a CSV field, mapping blank values to `None`
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
