//! CLI configuration types and utilities.
use didrotate_core::{DIDROTATE_CONFIG, ROTATION_PAIR_LEN};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

lazy_static! {
    /// Lazy static reference to cli configuration loaded from the file at `DIDROTATE_CONFIG`,
    /// or the defaults if the variable is unset.
    pub static ref CLI_CONFIG: CLIConfig = match std::env::var(DIDROTATE_CONFIG) {
        Ok(path) => parse_toml(
            &fs::read_to_string(&path).expect("Error reading DIDROTATE_CONFIG file")
        ),
        Err(_) => CLIConfig::default(),
    };
}

/// Parses and returns cli configuration.
fn parse_toml(toml_str: &str) -> CLIConfig {
    toml::from_str::<Config>(toml_str)
        .expect("Error parsing DIDROTATE_CONFIG file")
        .cli
}

/// Gets `didrotate-cli` configuration variables.
pub fn cli_config() -> &'static CLI_CONFIG {
    &CLI_CONFIG
}

/// Configuration variables for `didrotate-cli` crate.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct CLIConfig {
    /// Directory issued documents are written to.
    pub output_dir: PathBuf,
    /// File names of the issued credential pair.
    pub credential_file_names: [String; ROTATION_PAIR_LEN],
    pub presentation_file_name: String,
    /// Maximum number of presentations verified concurrently.
    pub verify_concurrency: usize,
    /// Proof format requested from the signing provider.
    pub proof_format: Option<String>,
}

impl Default for CLIConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            credential_file_names: ["vc1.json".to_string(), "vc2.json".to_string()],
            presentation_file_name: "vp.json".to_string(),
            verify_concurrency: 5,
            proof_format: None,
        }
    }
}

/// Wrapper struct for parsing the `cli` table.
#[derive(Serialize, Deserialize, PartialEq, Debug, Default)]
struct Config {
    /// CLI configuration data.
    #[serde(default)]
    cli: CLIConfig,
}
