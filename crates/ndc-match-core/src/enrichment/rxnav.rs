//! RxNav NDC status lookups with a persistent cache.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EnrichedProduct, Enricher};
use crate::db::{Database, DbError};
use crate::parsing::is_ndc11;

/// Public RxNav NDC status endpoint.
pub const RXNAV_URL: &str = "https://rxnav.nlm.nih.gov/REST/ndcstatus.json";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// RxNav client errors. Never surfaced through [`Enricher::lookup`].
#[derive(Error, Debug)]
pub enum RxNavError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RxNav returned status {0}")]
    Status(u16),

    #[error("Cache error: {0}")]
    Cache(#[from] DbError),
}

pub type RxNavResult<T> = Result<T, RxNavError>;

/// RxNav client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RxNavConfig {
    /// Endpoint URL (overridable for mirrors and tests)
    pub base_url: String,
    pub timeout_secs: u64,
    /// SQLite cache file; `None` keeps the cache in memory for this run only
    pub cache_path: Option<PathBuf>,
}

impl Default for RxNavConfig {
    fn default() -> Self {
        Self {
            base_url: RXNAV_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_path: None,
        }
    }
}

/// Fetches dose form and strength for an NDC from RxNav.
pub struct RxNavClient {
    base_url: String,
    client: reqwest::blocking::Client,
    cache: Database,
}

impl RxNavClient {
    /// Create a client and open its cache.
    pub fn new(config: &RxNavConfig) -> RxNavResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let cache = match &config.cache_path {
            Some(path) => Database::open(path)?,
            None => Database::open_in_memory()?,
        };
        tracing::debug!(
            base_url = %config.base_url,
            cache = ?config.cache_path,
            cached = ?cache.lookup_count().ok(),
            "created RxNav client"
        );
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            cache,
        })
    }

    /// Query RxNav directly, bypassing the cache.
    pub fn fetch(&self, ndc11: &str) -> RxNavResult<Option<EnrichedProduct>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("ndc", ndc11)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RxNavError::Status(status.as_u16()));
        }

        let payload: NdcStatusResponse = response.json()?;
        Ok(extract_product(ndc11, payload))
    }

    fn cached(&self, ndc11: &str) -> Option<EnrichedProduct> {
        match self.cache.get_lookup(ndc11) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(ndc11, error = %e, "RxNav cache read failed");
                None
            }
        }
    }
}

impl Enricher for RxNavClient {
    fn lookup(&self, ndc11: &str) -> Option<EnrichedProduct> {
        if !is_ndc11(ndc11) {
            return None;
        }
        if let Some(hit) = self.cached(ndc11) {
            return Some(hit);
        }

        let product = match self.fetch(ndc11) {
            Ok(Some(product)) => product,
            Ok(None) => {
                tracing::debug!(ndc11, "RxNav has no concept for NDC");
                return None;
            }
            Err(e) => {
                tracing::warn!(ndc11, error = %e, "RxNav lookup failed");
                return None;
            }
        };

        if let Err(e) = self.cache.put_lookup(&product) {
            tracing::warn!(ndc11, error = %e, "RxNav cache write failed");
        }
        Some(product)
    }
}

/// Response body from `ndcstatus.json`
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NdcStatusResponse {
    #[serde(rename = "ndcStatus", default)]
    ndc_status: Option<NdcStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct NdcStatus {
    #[serde(rename = "ndcTime", default)]
    ndc_time: Vec<NdcTime>,
}

#[derive(Debug, Default, Deserialize)]
struct NdcTime {
    #[serde(rename = "conceptProperties", default)]
    concept_properties: Vec<ConceptProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct ConceptProperties {
    name: Option<String>,
    #[serde(rename = "doseForm")]
    dose_form: Option<String>,
    strength: Option<String>,
}

/// Take the first concept of the most recent NDC history entry.
fn extract_product(ndc11: &str, payload: NdcStatusResponse) -> Option<EnrichedProduct> {
    let concept = payload
        .ndc_status?
        .ndc_time
        .into_iter()
        .next()?
        .concept_properties
        .into_iter()
        .next()?;

    Some(EnrichedProduct {
        ndc11: ndc11.to_string(),
        name: concept.name,
        dosage_form: concept.dose_form,
        strength: concept.strength,
    })
}
