use crate::config::{DecoupleConfig, CONFIG_FILE_NAME};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: &str = "# decouple configuration\n#\n# Command-line flags override these values.\n\n";

/// Write a default `.decouple.toml` into `dir`
pub fn init_config_at(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    let body = toml::to_string_pretty(&DecoupleConfig::default())?;
    fs::write(&config_path, format!("{HEADER}{body}"))?;

    Ok(config_path)
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_at(&std::env::current_dir()?, force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = init_config_at(dir.path(), false).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# decouple configuration"));
        assert_eq!(
            parse_and_validate_config(&contents).unwrap(),
            DecoupleConfig::default()
        );
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[analysis]\n").unwrap();

        let err = init_config_at(dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            "[analysis]\n"
        );
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "garbage = [").unwrap();

        let path = init_config_at(dir.path(), true).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(parse_and_validate_config(&contents).is_ok());
    }
}
