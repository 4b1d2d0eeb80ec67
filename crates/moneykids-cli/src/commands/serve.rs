//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

/// Split a comma-separated environment variable into trimmed, non-empty values
fn env_list(name: &str) -> Vec<String> {
    std::env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting MoneyKids web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let api_keys = env_list("MONEYKIDS_API_KEYS");
    let allowed_origins = env_list("MONEYKIDS_CORS_ORIGINS");

    // Trusted networks skip authentication entirely
    let trusted_networks_str = std::env::var("MONEYKIDS_TRUSTED_NETWORKS").unwrap_or_default();
    let trusted_networks = moneykids_server::parse_trusted_networks(&trusted_networks_str);

    // Trusted proxies are allowed to set X-Forwarded-For
    let trusted_proxies_str = std::env::var("MONEYKIDS_TRUSTED_PROXIES").unwrap_or_default();
    let trusted_proxies = moneykids_server::parse_trusted_networks(&trusted_proxies_str);

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else {
        if api_keys.is_empty() && trusted_networks.is_empty() {
            println!("   🔒 Authentication: ENABLED but no credentials configured");
            println!("      Set MONEYKIDS_API_KEYS or MONEYKIDS_TRUSTED_NETWORKS");
        }
        if !api_keys.is_empty() {
            println!(
                "   🔑 API keys: {} configured (MONEYKIDS_API_KEYS)",
                api_keys.len()
            );
        }
        if !trusted_networks.is_empty() {
            println!(
                "   🏠 Trusted networks: {} (MONEYKIDS_TRUSTED_NETWORKS)",
                trusted_networks
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        if !trusted_proxies.is_empty() {
            println!(
                "   🔀 Trusted proxies: {} (MONEYKIDS_TRUSTED_PROXIES)",
                trusted_proxies
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = moneykids_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        trusted_networks,
        trusted_proxies,
    };

    let static_dir_str = static_dir
        .map(|p| {
            p.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", p.display()))
        })
        .transpose()?;
    moneykids_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
