//! Configuration system for openapi-fmt.
//!
//! Configuration is read from TOML, either from
//! `~/.config/openapi-fmt/config.toml` or from a file given on the command
//! line. It controls whether the built-in OpenAPI rules are used and adds
//! project specific rules on top of them.
//!
//! # Example
//!
//! ```
//! use yamlfmt::config::Config;
//!
//! let config: Config = toml::from_str(r#"
//! alphabetical = ["$.tags"]
//!
//! [simple]
//! "$.x-meta" = ["owner", "team"]
//! "#).unwrap();
//!
//! assert!(config.default_rules);
//! assert_eq!(config.rules().len(), yamlfmt::format::default_openapi_rules().len() + 2);
//! ```

use crate::format::{default_openapi_rules, simple_ordering, string_ordering, Rule};
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration for the openapi-fmt application.
///
/// # Fields
///
/// * `default_rules` - Apply the built-in OpenAPI catalog (default: true)
/// * `alphabetical` - Paths whose children are sorted alphabetically
/// * `simple` - Paths mapped to the keys that should come first, in order
/// * `create_backup` - Create .bak files before overwriting output (default: false)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Apply the built-in OpenAPI rules before the configured ones
    #[serde(default = "default_default_rules")]
    pub default_rules: bool,

    /// Extra lexicographic rules
    #[serde(default)]
    pub alphabetical: Vec<String>,

    /// Extra priority rules, applied in file order
    #[serde(default)]
    pub simple: IndexMap<String, Vec<String>>,

    /// Create .bak files before overwriting an output file
    #[serde(default)]
    pub create_backup: bool,
}

fn default_default_rules() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_rules: default_default_rules(),
            alphabetical: Vec::new(),
            simple: IndexMap::new(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/openapi-fmt/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("openapi-fmt");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be
    /// parsed; a broken file is reported as a warning.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring config {}: {:#}", config_path.display(), err);
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Builds the rule list: the OpenAPI catalog (if enabled), then the
    /// alphabetical rules, then the simple rules.
    pub fn rules(&self) -> Vec<Rule> {
        let mut rules = if self.default_rules {
            default_openapi_rules()
        } else {
            Vec::new()
        };

        rules.extend(
            self.alphabetical
                .iter()
                .map(|path| Rule::new(path.as_str(), vec![string_ordering()])),
        );
        rules.extend(self.simple.iter().map(|(path, keys)| {
            Rule::new(path.as_str(), vec![simple_ordering(keys.iter().cloned())])
        }));

        rules
    }
}

/// A priority rule given as `PATH=KEY1,KEY2,...` on the command line.
///
/// The path ends at the first `=`; everything after it is split on `,`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRule {
    pub path: String,
    pub keys: Vec<String>,
}

impl SimpleRule {
    pub fn into_rule(self) -> Rule {
        Rule::new(self.path, vec![simple_ordering(self.keys)])
    }
}

impl FromStr for SimpleRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, keys) = s.split_once('=').ok_or_else(|| {
            format!(
                "invalid rule format: {:?}, should be path=key1,key2,...,keyN",
                s
            )
        })?;

        Ok(Self {
            path: path.to_string(),
            keys: keys.split(',').map(str::to_string).collect(),
        })
    }
}
