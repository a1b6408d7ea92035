//! Model catalog lookup

use crate::error::ProcessingError;
use formfill_domain::traits::ModelCatalog;
use formfill_domain::ModelInfo;
use tracing::info;

/// Fetch the provider's model list
///
/// An empty key fails with [`ProcessingError::Configuration`] without touching
/// the network.
pub async fn fetch_models<C>(catalog: &C, api_key: &str) -> Result<Vec<ModelInfo>, ProcessingError>
where
    C: ModelCatalog + Sync,
    C::Error: Into<ProcessingError>,
{
    if api_key.trim().is_empty() {
        return Err(ProcessingError::Configuration(
            "API key must not be empty".to_string(),
        ));
    }

    let models = catalog.list_models(api_key).await.map_err(Into::into)?;
    info!("Fetched {} models", models.len());
    Ok(models)
}

/// Models whose id or display name contains `query`, ignoring case
///
/// An empty query matches everything. Provider order is kept.
pub fn filter_models<'a>(models: &'a [ModelInfo], query: &str) -> Vec<&'a ModelInfo> {
    let query = query.trim().to_lowercase();
    models
        .iter()
        .filter(|m| {
            query.is_empty()
                || m.id.to_lowercase().contains(&query)
                || m.name.to_lowercase().contains(&query)
        })
        .collect()
}
