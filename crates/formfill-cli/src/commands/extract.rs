//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use formfill_domain::traits::CompletionProvider;
use formfill_domain::{ProviderConfig, Schema};
use formfill_extractor::{Extraction, ExtractionRequest, Extractor, ExtractorConfig, ProcessingError};
use formfill_llm::OpenRouterProvider;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    let schema = load_schema(&args.schema)?;
    let text = read_document(&args)?;
    let provider_config = provider_config(profile, args.api_key, args.model);

    let provider = OpenRouterProvider::with_base_url(&profile.base_url)
        .with_referer(&profile.referer)
        .with_app_title(&profile.app_title);

    let (extraction, filled) =
        run_extraction(provider, config.extractor.clone(), schema, text, provider_config).await?;

    println!("{}", formatter.format_extraction(&extraction, &filled)?);

    if !extraction.metadata.rejected.is_empty() {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "Dropped values that did not fit their field: {}",
                extraction.metadata.rejected.join(", ")
            ))
        );
    }

    if let Some(path) = args.output_schema {
        fs::write(&path, serde_json::to_string_pretty(&filled.to_json())?)?;
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote filled schema to {}", path.display()))
        );
    }

    Ok(())
}

/// Run one extraction and merge its values into the schema.
pub async fn run_extraction<P>(
    provider: P,
    extractor_config: ExtractorConfig,
    schema: Schema,
    text: String,
    provider_config: ProviderConfig,
) -> Result<(Extraction, Schema)>
where
    P: CompletionProvider + Send + Sync,
    P::Error: Into<ProcessingError>,
{
    let extractor = Extractor::new(provider, extractor_config);
    let mut filled = schema.clone();

    let extraction = extractor
        .extract(ExtractionRequest::new(text, schema, provider_config))
        .await?;

    let updated = filled.apply(&extraction.values);
    debug!("Applied {} values to the schema", updated);

    Ok((extraction, filled))
}

/// Read and validate a schema document.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let contents = fs::read_to_string(path)?;
    Ok(Schema::from_json(&contents)?)
}

/// Build the provider configuration from flags and the active profile.
///
/// Explicit flags win over the profile. Missing values are left empty and
/// reported by the extractor before any request is sent.
pub fn provider_config(profile: &Profile, api_key: Option<String>, model: Option<String>) -> ProviderConfig {
    let api_key = api_key
        .or_else(|| profile.api_key_from_env())
        .unwrap_or_default();
    let model = model.or_else(|| profile.model.clone()).unwrap_or_default();
    ProviderConfig::new(api_key, model)
}

fn read_document(args: &ExtractArgs) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = &args.text {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either --text or --stdin".to_string(),
        ))
    }
}
