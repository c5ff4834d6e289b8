//! `parlance doctor`: Diagnose configuration and credentials.

use parlance_config::AppConfig;
use parlance_core::{Language, Scenario};
use parlance_curriculum::FallbackGenerator;
use parlance_knowledge::KnowledgeStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Parlance Doctor: System Diagnostics");
    println!("======================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults (run `parlance init` to create one)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            Some(config)
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
            None
        }
    };

    if let Some(config) = &config {
        match parlance_providers::build_from_config(config) {
            Some(provider) => match provider.health_check().await {
                Ok(true) => {
                    println!(
                        "  ✅ Model provider ready ({} / {})",
                        provider.name(),
                        config.generation.model
                    );
                    println!(
                        "  ✅ Semantic retrieval via {}",
                        config.retrieval.embedding_model
                    );
                }
                Ok(false) | Err(_) => {
                    println!("  ❌ Model provider {} is not healthy", provider.name());
                    issues += 1;
                }
            },
            None => {
                println!(
                    "  ⚠️  No API key: set PARLANCE_API_KEY or GOOGLE_API_KEY (fallback templates and lexical retrieval will be used)"
                );
                issues += 1;
            }
        }
    }

    let store = KnowledgeStore::builtin();
    println!("  ✅ Knowledge base: {} documents", store.len());

    let fallback = FallbackGenerator::builtin();
    for language in Language::ALL {
        for scenario in Scenario::ALL {
            if store.for_pair(language, scenario).next().is_none() {
                println!("  ⚠️  No knowledge for {language} / {scenario}");
                issues += 1;
            }
            if !fallback.supports(language, scenario) {
                println!("  ❌ No fallback template for {language} / {scenario}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
