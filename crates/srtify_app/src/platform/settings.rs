use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::Deserialize;
use srtify_core::PollPolicy;
use srtify_engine::ServiceSettings;
use srtify_logging::{srtify_info, srtify_warn};

use super::cli::Cli;

const SETTINGS_FILENAME: &str = "srtify.ron";

/// On-disk settings. Every field is optional; CLI flags win over the file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    backend_url: Option<String>,
    poll_interval_ms: Option<u64>,
    max_poll_attempts: Option<u32>,
    request_timeout_secs: Option<u64>,
    upload_timeout_secs: Option<u64>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub service: ServiceSettings,
    pub policy: PollPolicy,
    pub output_dir: PathBuf,
    pub download: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
            policy: PollPolicy::default(),
            output_dir: PathBuf::from("."),
            download: true,
        }
    }
}

/// Builds settings from defaults, the settings file and CLI flags, in that order.
pub fn resolve(cli: &Cli) -> anyhow::Result<AppSettings> {
    let persisted = match &cli.config {
        Some(path) => load_explicit(path)?,
        None => load_default(Path::new(SETTINGS_FILENAME)),
    };

    let mut settings = AppSettings::default();
    apply(&mut settings, persisted);

    if let Some(url) = &cli.backend_url {
        settings.service.base_url = url.clone();
    }
    if let Some(ms) = cli.poll_interval_ms {
        settings.policy.interval = Duration::from_millis(ms);
    }
    if let Some(attempts) = cli.max_poll_attempts {
        settings.policy.max_attempts = attempts;
    }
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    if cli.no_download {
        settings.download = false;
    }

    validate(&settings)?;
    Ok(settings)
}

fn load_explicit(path: &Path) -> anyhow::Result<PersistedSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    let persisted = ron::from_str(&content)
        .with_context(|| format!("failed to parse settings file {}", path.display()))?;
    srtify_info!("Loaded settings from {:?}", path);
    Ok(persisted)
}

fn load_default(path: &Path) -> PersistedSettings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return PersistedSettings::default();
        }
        Err(err) => {
            srtify_warn!("Failed to read settings from {:?}: {}", path, err);
            return PersistedSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(persisted) => {
            srtify_info!("Loaded settings from {:?}", path);
            persisted
        }
        Err(err) => {
            srtify_warn!("Failed to parse settings from {:?}: {}", path, err);
            PersistedSettings::default()
        }
    }
}

fn apply(settings: &mut AppSettings, persisted: PersistedSettings) {
    if let Some(url) = persisted.backend_url {
        settings.service.base_url = url;
    }
    if let Some(ms) = persisted.poll_interval_ms {
        settings.policy.interval = Duration::from_millis(ms);
    }
    if let Some(attempts) = persisted.max_poll_attempts {
        settings.policy.max_attempts = attempts;
    }
    if let Some(secs) = persisted.request_timeout_secs {
        settings.service.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = persisted.upload_timeout_secs {
        settings.service.upload_timeout = Duration::from_secs(secs);
    }
    if let Some(dir) = persisted.output_dir {
        settings.output_dir = dir;
    }
}

fn validate(settings: &AppSettings) -> anyhow::Result<()> {
    if settings.policy.interval.is_zero() {
        bail!("poll interval must be greater than zero");
    }
    if settings.policy.max_attempts == 0 {
        bail!("max poll attempts must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["srtify", "lecture.mp4"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    fn write_config(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("custom.ron");
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_match_service_contract() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.ron");
        let settings = AppSettings::default();
        assert_eq!(load_default(&missing), PersistedSettings::default());

        assert_eq!(settings.service.base_url, "http://localhost:8001");
        assert_eq!(settings.policy.interval, Duration::from_millis(1500));
        assert_eq!(settings.policy.max_attempts, 120);
        assert!(settings.download);
    }

    #[test]
    fn file_values_apply_and_flags_override() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            &temp,
            r#"(
                backend_url: Some("http://files.example:9000"),
                poll_interval_ms: Some(500),
                max_poll_attempts: Some(10),
                upload_timeout_secs: Some(30),
            )"#,
        );

        let args = ["--config", path.as_str(), "--max-poll-attempts", "3"];
        let settings = resolve(&cli(&args)).unwrap();

        assert_eq!(settings.service.base_url, "http://files.example:9000");
        assert_eq!(settings.policy.interval, Duration::from_millis(500));
        assert_eq!(settings.policy.max_attempts, 3);
        assert_eq!(settings.service.upload_timeout, Duration::from_secs(30));
    }

    #[test]
    fn explicit_config_must_parse() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "this is not ron");

        assert!(resolve(&cli(&["--config", path.as_str()])).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.ron").to_string_lossy().into_owned();

        assert!(resolve(&cli(&["--config", missing.as_str()])).is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "()");
        assert!(resolve(&cli(&["--config", path.as_str(), "--poll-interval-ms", "0"])).is_err());
    }

    #[test]
    fn no_download_flag_disables_saving() {
        let temp = TempDir::new().unwrap();
        let path = write_config(&temp, "(output_dir: Some(\"subs\"))");
        let settings = resolve(&cli(&["--config", path.as_str(), "--no-download"])).unwrap();

        assert!(!settings.download);
        assert_eq!(settings.output_dir, PathBuf::from("subs"));
    }
}
