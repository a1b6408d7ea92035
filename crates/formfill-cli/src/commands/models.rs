//! Models command implementation.

use crate::cli::ModelsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use formfill_domain::ModelInfo;
use formfill_extractor::{fetch_models, filter_models};
use formfill_llm::OpenRouterProvider;

/// Execute the models command.
pub async fn execute_models(args: ModelsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;
    let api_key = args
        .api_key
        .or_else(|| profile.api_key_from_env())
        .unwrap_or_default();

    let catalog = OpenRouterProvider::with_base_url(&profile.base_url)
        .with_referer(&profile.referer)
        .with_app_title(&profile.app_title);

    let models = fetch_models(&catalog, &api_key).await?;
    let selected = select(&models, args.filter.as_deref(), args.limit);

    println!("{}", formatter.format_models(&selected)?);
    Ok(())
}

/// Apply the filter and limit flags, keeping provider order.
fn select<'a>(models: &'a [ModelInfo], filter: Option<&str>, limit: Option<usize>) -> Vec<&'a ModelInfo> {
    let mut selected = filter_models(models, filter.unwrap_or_default());
    if let Some(limit) = limit {
        selected.truncate(limit);
    }
    selected
}
