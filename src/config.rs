//! Application configuration.
//!
//! Read from the TOML file named by `QUIZ_CONFIG` when set, then overridden
//! by `QUIZ_DIR`, `QUIZ_PASS_MARK` and `QUIZ_SAMPLE_SIZE`. Loading happens
//! before the log file is open, so problems are collected as
//! [`ConfigIssue`]s and logged once the subscriber is installed.

use crate::error::Result;
use crate::scoring::GradeBands;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub quiz_dir: PathBuf,
    pub log_file: PathBuf,
    pub pass_mark: u8,
    pub marginal_mark: u8,
    /// Draw this many questions from larger banks. Overrides a file's own
    /// `total_questions`.
    pub sample_size: Option<usize>,
    /// Shuffle question order at load time. Option order is never touched.
    pub shuffle_questions: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let bands = GradeBands::default();
        Self {
            quiz_dir: PathBuf::from("quizzes"),
            log_file: PathBuf::from("course-quiz.log"),
            pass_mark: bands.pass_mark,
            marginal_mark: bands.marginal_mark,
            sample_size: None,
            shuffle_questions: false,
        }
    }
}

/// Something wrong with the configuration that was worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// The config file could not be read or parsed; defaults were used.
    LoadFailed { path: String, error: String },
    /// A value was ignored or adjusted.
    Adjusted(String),
}

impl ConfigIssue {
    pub fn log(&self) {
        match self {
            ConfigIssue::LoadFailed { path, error } => {
                error!(%path, %error, "Failed to load config, using defaults");
            }
            ConfigIssue::Adjusted(message) => warn!("{}", message),
        }
    }
}

/// Configuration plus whatever went wrong while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
    pub issues: Vec<ConfigIssue>,
}

impl LoadedConfig {
    /// Replays the load into the log. Call after the logger is installed.
    pub fn log(&self) {
        if let Some(path) = &self.source {
            info!(path = %path.display(), "Loaded config (TOML)");
        }
        for issue in &self.issues {
            issue.log();
        }
    }
}

impl AppConfig {
    /// Parses a config file body. Values are not range-checked here; see
    /// [`AppConfig::sanitize`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str::<AppConfig>(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn bands(&self) -> GradeBands {
        GradeBands {
            pass_mark: self.pass_mark,
            marginal_mark: self.marginal_mark,
        }
    }

    /// Applies overrides from `lookup`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F, issues: &mut Vec<ConfigIssue>)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QUIZ_DIR") {
            self.quiz_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("QUIZ_PASS_MARK") {
            match raw.trim().parse::<u8>() {
                Ok(mark) => self.pass_mark = mark,
                Err(e) => issues.push(ConfigIssue::Adjusted(format!(
                    "Ignoring invalid QUIZ_PASS_MARK {:?}: {}",
                    raw, e
                ))),
            }
        }
        if let Some(raw) = lookup("QUIZ_SAMPLE_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) => self.sample_size = Some(size),
                Err(e) => issues.push(ConfigIssue::Adjusted(format!(
                    "Ignoring invalid QUIZ_SAMPLE_SIZE {:?}: {}",
                    raw, e
                ))),
            }
        }
    }

    /// Resets out-of-range values to something usable.
    pub fn sanitize(&mut self, issues: &mut Vec<ConfigIssue>) {
        if self.pass_mark > 100 {
            issues.push(ConfigIssue::Adjusted(format!(
                "pass_mark {} above 100, clamping",
                self.pass_mark
            )));
            self.pass_mark = 100;
        }
        if self.marginal_mark > self.pass_mark {
            issues.push(ConfigIssue::Adjusted(format!(
                "marginal_mark {} above pass_mark {}, lowering it",
                self.marginal_mark, self.pass_mark
            )));
            self.marginal_mark = self.pass_mark;
        }
        if self.sample_size == Some(0) {
            issues.push(ConfigIssue::Adjusted("sample_size of 0 ignored".to_string()));
            self.sample_size = None;
        }
    }
}

/// Builds the configuration from `lookup`, normally the process environment.
pub fn load_config_with<F>(lookup: F) -> LoadedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut issues = Vec::new();
    let mut source = None;

    let mut config = match lookup("QUIZ_CONFIG") {
        Some(path) => match AppConfig::from_file(Path::new(&path)) {
            Ok(cfg) => {
                source = Some(PathBuf::from(path));
                cfg
            }
            Err(e) => {
                issues.push(ConfigIssue::LoadFailed {
                    path,
                    error: e.to_string(),
                });
                AppConfig::default()
            }
        },
        None => AppConfig::default(),
    };

    config.apply_overrides(&lookup, &mut issues);
    config.sanitize(&mut issues);

    LoadedConfig {
        config,
        source,
        issues,
    }
}

/// Loads the configuration from `QUIZ_CONFIG` and the environment.
pub fn load_config() -> LoadedConfig {
    load_config_with(|key| std::env::var(key).ok())
}
