use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// How compiled statements are printed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered SQL text
    #[default]
    Sql,
    /// The structured statement as JSON
    Json,
}

#[derive(Error, Debug)]
#[error("unknown output format `{0}` (expected `sql` or `json`)")]
pub struct UnknownFormat(String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sql" => Ok(OutputFormat::Sql),
            "json" => Ok(OutputFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Sql => write!(f, "sql"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Translator configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Path to the predicate table catalog (YAML)
    #[validate(length(min = 1, message = "Catalog path cannot be empty"))]
    pub catalog_path: String,

    #[serde(default)]
    pub format: OutputFormat,

    /// Append `;` to every printed statement
    #[serde(default)]
    pub terminate_statements: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            catalog_path: "catalog.yaml".to_string(),
            format: OutputFormat::Sql,
            terminate_statements: false,
        }
    }
}

impl TranslatorConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            catalog_path: env::var("TRIPLEGRAPH_CATALOG")
                .unwrap_or_else(|_| "catalog.yaml".to_string()),
            format: parse_env_var("TRIPLEGRAPH_FORMAT", "sql")?,
            terminate_statements: parse_env_var("TRIPLEGRAPH_TERMINATE", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI values on top (CLI overrides environment or file)
    pub fn merge(&mut self, cli: CliConfig) {
        if let Some(catalog_path) = cli.catalog_path {
            self.catalog_path = catalog_path;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        self.terminate_statements |= cli.terminate_statements;
    }

    /// Statement as it should be printed
    pub fn finish_statement(&self, statement: &str) -> String {
        if self.terminate_statements {
            format!("{};", statement)
        } else {
            statement.to_string()
        }
    }
}

/// CLI configuration (parsed from command line arguments); unset values keep
/// the underlying configuration
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub catalog_path: Option<String>,
    pub format: Option<OutputFormat>,
    pub terminate_statements: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
