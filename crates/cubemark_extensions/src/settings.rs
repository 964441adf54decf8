//! JSON extension settings.
//!
//! ```json
//! {
//!   "extensions": [
//!     "symbol",
//!     "cardlink",
//!     { "name": "strikethrough", "singleTilde": false },
//!     { "name": "centering", "open": "->", "close": "<-" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use cubemark_compiler::markdown_syntax::StrikethroughOptions;
use cubemark_compiler::{CompilerConfig, ConfigError, Extension};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Cardimage, Cardlink, Cardrow, Centering, Strikethrough, Symbol, Userlink};

/// Names of the built-in extensions.
pub const BUILTIN_EXTENSIONS: &[&str] = &[
    "symbol",
    "cardlink",
    "cardimage",
    "userlink",
    "centering",
    "cardrow",
    "strikethrough",
];

/// Selects built-in extensions by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSettings {
    /// Extensions to enable, applied in listed order.
    #[serde(default)]
    pub extensions: Vec<ExtensionDefinition>,
}

/// One entry of the `extensions` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ExtensionDefinition {
    /// Name shorthand: `"symbol"`
    Simple(String),
    /// Name plus extension options
    Detail(ExtensionDefinitionDetail),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtensionDefinitionDetail {
    pub name: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CenteringOptions {
    open: Option<String>,
    close: Option<String>,
}

impl ExtensionSettings {
    /// Loads settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::invalid_settings(format!("Failed to read settings: {}", e))
        })?;
        Self::from_json(&content)
    }

    /// Parses settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigError::invalid_settings(format!("Invalid JSON: {}", e)))
    }

    /// Builds a compiler configuration with every listed extension applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownExtension`] for a name that is not
    /// built in, and [`ConfigError::InvalidSettings`] for options the
    /// extension does not accept.
    pub fn build(&self) -> Result<CompilerConfig, ConfigError> {
        let mut config = CompilerConfig::new();
        for definition in &self.extensions {
            let extension = definition.resolve()?;
            debug!("Enabling extension '{}'", extension.name());
            config.use_extension(extension.as_ref());
        }
        Ok(config)
    }
}

impl ExtensionDefinition {
    pub fn name(&self) -> &str {
        match self {
            ExtensionDefinition::Simple(name) => name,
            ExtensionDefinition::Detail(detail) => &detail.name,
        }
    }

    fn options(&self) -> Option<&Map<String, Value>> {
        match self {
            ExtensionDefinition::Simple(_) => None,
            ExtensionDefinition::Detail(detail) => Some(&detail.options),
        }
    }

    /// Instantiates the named built-in extension.
    pub fn resolve(&self) -> Result<Box<dyn Extension>, ConfigError> {
        let name = self.name();
        let extension: Box<dyn Extension> = match name {
            "symbol" => self.plain(Symbol)?,
            "cardlink" => self.plain(Cardlink)?,
            "cardimage" => self.plain(Cardimage)?,
            "userlink" => self.plain(Userlink)?,
            "cardrow" => self.plain(Cardrow)?,
            "centering" => {
                let options: CenteringOptions = self.parse_options()?;
                let defaults = Centering::new();
                let centering = match (options.open, options.close) {
                    (None, None) => defaults,
                    (open, close) => Centering::with_markers(
                        open.unwrap_or_else(|| defaults.open().to_string()),
                        close.unwrap_or_else(|| defaults.close().to_string()),
                    ),
                };
                Box::new(centering)
            }
            "strikethrough" => {
                let options: StrikethroughOptions = self.parse_options()?;
                Box::new(Strikethrough::new(options))
            }
            _ => return Err(ConfigError::unknown_extension(name)),
        };
        Ok(extension)
    }

    fn plain<E>(&self, extension: E) -> Result<Box<dyn Extension>, ConfigError>
    where
        E: Extension + 'static,
    {
        if self.options().is_some_and(|options| !options.is_empty()) {
            return Err(ConfigError::invalid_settings(format!(
                "Extension '{}' takes no options",
                self.name()
            )));
        }
        Ok(Box::new(extension))
    }

    fn parse_options<T: for<'de> Deserialize<'de>>(&self) -> Result<T, ConfigError> {
        let options = self.options().cloned().unwrap_or_default();
        serde_json::from_value(Value::Object(options)).map_err(|e| {
            ConfigError::invalid_settings(format!(
                "Invalid options for extension '{}': {}",
                self.name(),
                e
            ))
        })
    }
}
