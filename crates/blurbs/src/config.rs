//! TOML configuration: font markers, book phrases, overrides, policies and the
//! offset scan window.

use std::path::Path;

use blurbs_core::{default_phrases, BookPhrase, OffsetWindow, OverrideTable, PolicyTable, StyleSheet};
use serde::Deserialize;

use crate::prelude::*;

/// Embedded default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: StyleSheet,
    pub scan: OffsetWindow,
    pub books: Vec<BookPhrase>,
    pub overrides: OverrideTable,
    pub policies: PolicyTable,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            style: StyleSheet::default(),
            scan: OffsetWindow::default(),
            books: default_phrases(),
            overrides: OverrideTable::new(),
            policies: PolicyTable::default(),
        }
    }
}

impl Config {
    /// Parse a configuration document. Configured policies are layered over
    /// the built-in table.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text).wrap_err("invalid configuration")?;
        let mut policies = PolicyTable::default();
        policies.merge(config.policies);
        config.policies = policies;
        Ok(config)
    }

    /// Read `path`, or the embedded default when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                log::debug!("loading configuration from {}", path.display());
                let text = std::fs::read_to_string(path)
                    .wrap_err_with(|| f!("failed to read {}", path.display()))?;
                Self::parse(&text).wrap_err_with(|| f!("in {}", path.display()))
            }
            None => Self::parse(DEFAULT_CONFIG),
        }
    }
}
