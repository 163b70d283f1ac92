use std::collections::BTreeSet;
use std::time::Duration;

use crate::data::{Country, COUNTRY_FIELDS};
use crate::error::{FetchError, PassportError, Result};

/// The full country list, in the order the API returned it. Read-only after load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Country>,
}

impl Catalog {
    pub fn from_records(records: Vec<Country>) -> Self {
        Self { records }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let records: Vec<Country> = serde_json::from_str(text).map_err(FetchError::from)?;
        Ok(Self { records })
    }

    /// Fetches the whole list once. No retry; a failure leaves the caller with nothing.
    pub async fn fetch(base_url: &str, timeout: Duration) -> Result<Self> {
        let url = catalog_url(base_url);
        tracing::info!("Fetching countries from {}", url);

        let request = async {
            let response = reqwest::get(&url).await?.error_for_status()?;
            response.text().await
        };

        let text = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!("Error fetching countries: {}", e);
                return Err(FetchError::Http(e).into());
            }
            Err(_) => {
                tracing::error!("Country request exceeded {:?}", timeout);
                return Err(FetchError::Timeout {
                    seconds: timeout.as_secs(),
                }
                .into());
            }
        };

        let catalog = Self::from_json(&text).inspect_err(|e| {
            tracing::error!("{}", e);
            tracing::debug!(
                "Response preview: {}",
                text.chars().take(200).collect::<String>()
            );
        })?;
        tracing::info!("Loaded {} countries", catalog.len());
        Ok(catalog)
    }

    pub fn records(&self) -> &[Country] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, name: &str) -> Result<&Country> {
        self.records
            .iter()
            .find(|c| c.common_name() == name)
            .ok_or_else(|| PassportError::not_found(name))
    }

    /// Distinct language names across the catalog, sorted for display.
    pub fn available_languages(&self) -> Vec<String> {
        let languages: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|c| c.language_names())
            .collect();
        languages.into_iter().map(str::to_string).collect()
    }

    pub fn available_regions(&self) -> Vec<String> {
        let regions: BTreeSet<&str> = self
            .records
            .iter()
            .map(|c| c.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        regions.into_iter().map(str::to_string).collect()
    }
}

/// Appends the field list unless the configured URL already carries a query.
pub fn catalog_url(base_url: &str) -> String {
    if base_url.contains('?') {
        return base_url.to_string();
    }
    let fields: Vec<_> = COUNTRY_FIELDS.iter().map(|f| urlencoding::encode(f)).collect();
    format!("{}?fields={}", base_url, fields.join(","))
}
