//! Initialize the configuration directory: create ~/.gemline and a default
//! config file. Credentials can then be filled in via the file or environment.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Create the config directory and a default config file if they do not exist.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        let default_config = b"{}";
        std::fs::write(config_path, default_config)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_dir_and_default_config() {
        let dir = std::env::temp_dir().join(format!("gemline-init-test-{}", std::process::id()));
        let config_path = dir.join("config.json");
        let _ = std::fs::remove_dir_all(&dir);
        init_config_dir(&config_path).expect("init");
        assert!(config_path.exists());
        let s = std::fs::read_to_string(&config_path).expect("read config");
        assert_eq!(s, "{}");
        // Re-running must not overwrite an existing config.
        std::fs::write(&config_path, r#"{"gateway":{"port":9}}"#).expect("write");
        init_config_dir(&config_path).expect("re-init");
        let s = std::fs::read_to_string(&config_path).expect("read config");
        assert!(s.contains("9"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
