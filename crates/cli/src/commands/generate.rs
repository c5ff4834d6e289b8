//! `parlance generate`: Run the pipeline once and print the curriculum.

use parlance_config::AppConfig;
use parlance_core::CurriculumRequest;
use parlance_curriculum::CurriculumPipeline;
use tracing::info;

pub async fn run(
    language: String,
    scenario: String,
    offline: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = if offline {
        None
    } else {
        parlance_providers::build_from_config(&config)
    };
    let pipeline = CurriculumPipeline::from_config(&config, provider);

    let request = CurriculumRequest::new(language, scenario);
    let outcome = pipeline.generate(&request).await?;
    info!(source = %outcome.source, "Curriculum ready");

    println!("{}", serde_json::to_string_pretty(&outcome.response)?);
    Ok(())
}
