//! `parlance init`: Write a default config file.

use parlance_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🗣️  Parlance Setup");
    println!("===================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!("  Config already exists: {}", config_path.display());
        println!("  Re-run with --force to overwrite it.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote {}", config_path.display());

    println!("\nNext steps:");
    println!("  1. Set PARLANCE_API_KEY (or GOOGLE_API_KEY) in your shell or a .env file");
    println!("  2. Run `parlance doctor` to check the setup");
    println!("  3. Run `parlance serve` to start the API");

    Ok(())
}
