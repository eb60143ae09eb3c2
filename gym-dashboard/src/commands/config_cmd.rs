use std::path::Path;

use anyhow::Result;

use crate::config::Config;

pub fn show_config(path: Option<&Path>) -> Result<()> {
    let mut config = Config::load_from(path)?;
    if !config.auth.token.is_empty() {
        config.auth.token = "[REDACTED]".to_string();
    }
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration");
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    Ok(())
}

pub fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = Config::resolve_path(path)?;

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default().save_to(&config_file)?;

    println!("✓ Configuration initialized at: {}", config_file.display());
    println!();
    println!("Store a token with: gym-admin config set-token <TOKEN>");

    Ok(())
}

pub fn set_token(path: Option<&Path>, token: String) -> Result<()> {
    let config_file = Config::resolve_path(path)?;
    let mut config = Config::load_from(Some(&config_file))?;

    config.set_token(token.trim());
    config.save_to(&config_file)?;

    println!("✓ Token saved to {}", config_file.display());

    Ok(())
}
