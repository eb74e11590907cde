//! Startup configuration loading
//!
//! Layers, lowest precedence first:
//! 1. Built-in defaults and the legacy variables read by `AppConfig::from_env`
//!    (`JWT_ISSUER`, `DATABASE_URL`, ...)
//! 2. An optional TOML file given by `--config <path>` or `CONFIG_PATH`
//! 3. `KS__`-prefixed environment variables, `__` separating sections,
//!    e.g. `KS__JWT__ISSUER` or `KS__SERVER__PORT`

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment as EnvSource, File, FileFormat};
use ks_shared::AppConfig;

/// Load and validate the configuration for this process
pub fn load() -> anyhow::Result<AppConfig> {
    let path = config_path(std::env::args());
    load_from(path.as_deref())
}

/// Load and validate the configuration, reading `path` if given
pub fn load_from(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let defaults = Config::try_from(&AppConfig::from_env())
        .context("Failed to serialize default configuration")?;

    let mut builder = Config::builder().add_source(defaults);

    if let Some(path) = path {
        log::info!("Loading configuration file {}", path.display());
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }

    let config: AppConfig = builder
        .add_source(
            EnvSource::with_prefix("KS")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    config.validate().context("Configuration rejected")?;
    Ok(config)
}

/// `--config <path>` or `--config=<path>` on the command line, else `CONFIG_PATH`
fn config_path(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    std::env::var_os("CONFIG_PATH").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_path_from_args() {
        assert_eq!(
            config_path(args(&["ks_api", "--config", "/etc/keystone.toml"])),
            Some(PathBuf::from("/etc/keystone.toml"))
        );
        assert_eq!(
            config_path(args(&["ks_api", "--config=/etc/keystone.toml"])),
            Some(PathBuf::from("/etc/keystone.toml"))
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("ks-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[jwt]
issuer = "keystone-file"
access_token_expiry = 120
refresh_token_expiry = 7200
refresh_cookie_name = "_kr"

[database]
url = "mysql://app:secret@db:3306/keystone"
read_timeout = 3
"#,
        )
        .unwrap();

        let config = load_from(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.jwt.issuer, "keystone-file");
        assert_eq!(config.jwt.access_token_expiry, 120);
        assert_eq!(config.jwt.refresh_cookie_name, "_kr");
        assert_eq!(config.database.read_timeout, 3);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = std::env::temp_dir().join(format!("ks-config-bad-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[jwt]
issuer = "keystone"
access_token_expiry = 3600
refresh_token_expiry = 60
"#,
        )
        .unwrap();

        let result = load_from(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_lifetime_is_rejected() {
        let path = std::env::temp_dir().join(format!("ks-config-range-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[jwt]
issuer = "keystone"
access_token_expiry = 9223372036854775807
refresh_token_expiry = 9223372036854775807
"#,
        )
        .unwrap();

        let result = load_from(Some(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_from(Some(Path::new("/nonexistent/keystone.toml"))).is_err());
    }
}
