use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::constants::MAX_DELAY_TIME_MS;
use crate::common::ConfigError;
use crate::configs::*;

const CONFIG_CANDIDATES: [&str; 2] = ["config.toml", "config.default.toml"];

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub logging: Option<LoggingConfig>,
    pub delay: DelayConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Load `path`, or the first of `config.toml` / `config.default.toml`
    /// found in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => CONFIG_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists())
                .ok_or(ConfigError::NotFound)?,
        };

        crate::log_println!("Loading configuration from: {}", config_path.display());

        let config_str = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;

        let config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: config_path.clone(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks. Effect parameter ranges are checked per job so a
    /// bad value is reported the same way for every input.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay.max_delay_ms > MAX_DELAY_TIME_MS as u32 {
            return Err(ConfigError::Invalid(format!(
                "delay.max_delay_ms must be at most {} (got {})",
                MAX_DELAY_TIME_MS, self.delay.max_delay_ms
            )));
        }
        if self.delay.max_buffer_samples == 0 {
            return Err(ConfigError::Invalid(
                "delay.max_buffer_samples must be positive".into(),
            ));
        }
        if self.session.workers == 0 {
            return Err(ConfigError::Invalid(
                "session.workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.logging.is_none());
        assert_eq!(config.delay, DelayConfig::default());
        assert_eq!(config.delay.params.delay_time_ms, 500);
        assert_eq!(config.session.workers, 1);
        assert_eq!(config.session.on_error, ErrorPolicy::Continue);
        assert!(config.session.remove_partial_output);
        assert!(config.session.jobs.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_full_document() {
        let doc = r#"
            [logging]
            level = "debug"

            [logging.file]
            path = "logs/rustecho.log"

            [delay]
            delay_time_ms = 250
            feedback_pct = 40
            mix_pct = 60
            verbose = true
            max_delay_ms = 800

            [session]
            output_dir = "results"
            on_error = "abort"
            workers = 3

            [[session.jobs]]
            input = "assets/punch-double-stereo.wav"
            output = "punch-result-delay-stereo.wav"

            [[session.jobs]]
            input = "assets/punch-double-mono.wav"
            output = "punch-result-delay-mono.wav"
        "#;
        let config: Config = toml::from_str(doc).unwrap();

        let file = config.logging.as_ref().and_then(|l| l.file.as_ref()).unwrap();
        assert_eq!(file.max_lines, 10_000);

        let params = config.delay.params;
        assert_eq!(
            (params.delay_time_ms, params.feedback_pct, params.mix_pct),
            (250, 40, 60)
        );
        assert!(params.verbose);
        assert_eq!(config.delay.limits().max_delay_ms, 800);

        assert_eq!(config.session.on_error, ErrorPolicy::Abort);
        assert_eq!(config.session.workers, 3);
        assert_eq!(config.session.output_dir, Some(PathBuf::from("results")));
        assert_eq!(config.session.jobs.len(), 2);
        assert_eq!(
            config.session.jobs[1].output,
            PathBuf::from("punch-result-delay-mono.wav")
        );
    }

    #[test]
    fn partial_delay_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[delay]\nmix_pct = 10\n").unwrap();
        assert_eq!(config.delay.params.mix_pct, 10);
        assert_eq!(config.delay.params.feedback_pct, 50);
        assert_eq!(config.delay.max_delay_ms, 1000);
    }

    #[test]
    fn rejects_cap_above_range() {
        let config: Config = toml::from_str("[delay]\nmax_delay_ms = 1500\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_workers() {
        let config: Config = toml::from_str("[session]\nworkers = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("rustecho-no-such-config.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("rustecho-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[delay]\ndelay_time_ms = \"long\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
