//! Startup file loader.
//!
//! A startup file pre-populates the symbol table before the first prompt.
//! It holds one assignment per line, in the same syntax accepted at the
//! prompt:
//!
//! ```text
//! ; constants
//! answer = 42
//! width  = 80
//! cols   = width
//! ```
//!
//! | Line | Action |
//! |------|--------|
//! | `name = value` | assign, exactly as typed at the prompt |
//! | starts with `;` or `#` | comment, ignored |
//! | blank | ignored |
//! | anything else | reported as a [`ConfigError`] |
//!
//! Errors never abort loading; every bad line is collected and the rest of
//! the file still applies.

use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};

use crate::symbol::SymbolTable;

/// Environment variable naming an explicit startup file.
pub const ENV_STARTUP_FILE: &str = "SMARTCALCRC";

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a startup file.
#[derive(Debug)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Variables loaded from a startup file.
#[derive(Debug, Default)]
pub struct Config {
    pub symbols: SymbolTable,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse startup-file text.
    ///
    /// Returns the config and a list of any errors on individual lines.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if !line.contains('=') {
                errors.push(ConfigError {
                    line: lineno,
                    message: format!("expected an assignment, found {line:?}"),
                });
                continue;
            }

            if let Err(e) = config.symbols.assign(line) {
                errors.push(ConfigError {
                    line: lineno,
                    message: e.to_string(),
                });
            }
        }

        (config, errors)
    }

    /// Read and parse a startup file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Candidate startup-file locations, highest priority first.
///
/// `env_override` is the value of [`ENV_STARTUP_FILE`], if set; it is taken
/// as a parameter so the order can be tested without touching the process
/// environment.
pub fn candidate_paths(env_override: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(p) = env_override.filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(p));
    }
    if let Some(dirs) = ProjectDirs::from("", "", "smartcalc") {
        paths.push(dirs.config_dir().join("calcrc"));
    }
    if let Some(base) = BaseDirs::new() {
        paths.push(base.home_dir().join(".smartcalcrc"));
    }
    paths
}

/// Search for a startup file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_startup_file() -> Option<PathBuf> {
    let env = std::env::var(ENV_STARTUP_FILE).ok();
    candidate_paths(env.as_deref())
        .into_iter()
        .find(|p| p.is_file())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
