//! Fetch functions - retrieve address records from remote directories

use crate::ingestion::error::IngestionError;
use crate::ingestion::types::{AddressRecord, KladrObject, KladrResponse};
use crate::ingestion::utils::{format_street_name, http_get_json};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

/// Streets requested per page
pub const STREET_PAGE_SIZE: usize = 100;

/// Buildings requested per street (single request, no pagination)
pub const BUILDING_LIMIT: usize = 500;

/// A single KLADR lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KladrQuery {
    City { name: String },
    Streets { city_id: String, offset: usize },
    Buildings { street_id: String },
}

impl KladrQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        match self {
            KladrQuery::City { name } => vec![
                ("contentType", "city".to_string()),
                ("query", name.clone()),
                ("limit", "1".to_string()),
            ],
            KladrQuery::Streets { city_id, offset } => vec![
                ("contentType", "street".to_string()),
                ("cityId", city_id.clone()),
                ("limit", STREET_PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
            ],
            KladrQuery::Buildings { street_id } => vec![
                ("contentType", "building".to_string()),
                ("streetId", street_id.clone()),
                ("limit", BUILDING_LIMIT.to_string()),
            ],
        }
    }
}

/// Address directory transport
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Run one lookup and return the `result` array
    async fn query(&self, query: &KladrQuery) -> Result<Vec<KladrObject>, IngestionError>;
}

/// HTTP client for the public KLADR API
pub struct KladrClient {
    client: Client,
    base_url: String,
}

impl KladrClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DirectoryApi for KladrClient {
    async fn query(&self, query: &KladrQuery) -> Result<Vec<KladrObject>, IngestionError> {
        let response: KladrResponse =
            http_get_json(&self.client, &self.base_url, &query.to_params()).await?;
        Ok(response.into_objects())
    }
}

/// Resolve `city_name` to its directory id.
async fn find_city(
    api: &dyn DirectoryApi,
    city_name: &str,
) -> Result<KladrObject, IngestionError> {
    let query = KladrQuery::City {
        name: city_name.to_string(),
    };

    api.query(&query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| IngestionError::CityNotFound(city_name.to_string()))
}

/// Load every house of every street of `city_name` from the directory.
///
/// Lookup failures yield an empty list. A failed street page stops
/// pagination and keeps what was already collected; a failed building
/// request only drops that street.
pub async fn fetch_from_kladr(api: &dyn DirectoryApi, city_name: &str) -> Vec<AddressRecord> {
    let mut addresses = Vec::new();

    info!("Looking up city '{}' in KLADR", city_name);

    let city = match find_city(api, city_name).await {
        Ok(city) => city,
        Err(e @ IngestionError::CityNotFound(_)) => {
            warn!("{}", e);
            return addresses;
        }
        Err(e) => {
            error!("City lookup failed: {}", e);
            return addresses;
        }
    };
    info!("✓ Found city: {}, id: {}", city.name, city.id);

    info!("Loading street list...");
    let mut offset = 0;
    let mut total_streets = 0;

    loop {
        let page_query = KladrQuery::Streets {
            city_id: city.id.clone(),
            offset,
        };

        let streets = match api.query(&page_query).await {
            Ok(streets) => streets,
            Err(e) => {
                error!("Failed to load streets at offset {}: {}", offset, e);
                break;
            }
        };

        if streets.is_empty() {
            break;
        }

        total_streets += streets.len();

        for street in &streets {
            let street_name = format_street_name(&street.type_short, &street.name);
            let building_query = KladrQuery::Buildings {
                street_id: street.id.clone(),
            };

            match api.query(&building_query).await {
                Ok(buildings) => {
                    addresses.extend(
                        buildings
                            .into_iter()
                            .filter(|b| !b.name.is_empty())
                            .map(|b| AddressRecord::new(street_name.clone(), b.name, None)),
                    );
                }
                Err(e) => {
                    debug!("Skipping buildings for '{}': {}", street_name, e);
                }
            }
        }

        info!(
            "  Streets loaded: {}, addresses so far: {}",
            total_streets,
            addresses.len()
        );

        offset += STREET_PAGE_SIZE;
    }

    info!(
        "✓ Loaded {} addresses from {} streets",
        addresses.len(),
        total_streets
    );

    addresses
}

/// 2GIS source. Not implemented: always returns an empty list.
pub fn fetch_from_2gis(api_key: &str, city_name: &str) -> Vec<AddressRecord> {
    let _ = api_key;

    info!("Loading addresses from 2GIS for city '{}'", city_name);
    warn!("2GIS API requires a key, see https://dev.2gis.ru/");
    error!("2GIS source is not implemented yet, use --source kladr");

    Vec::new()
}
