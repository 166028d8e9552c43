// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Configuration formats and read/write support

#[cfg(feature = "serde")]
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Configuration read/write/format errors
#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "yaml")]
    #[error("config deserialisation failed")]
    De(#[from] serde::de::value::Error),

    #[cfg(feature = "yaml")]
    #[error("config serialisation to YAML failed")]
    YamlSer(#[from] serde_yaml2::ser::Errors),

    #[cfg(feature = "json")]
    #[error("config (de)serialisation to JSON failed")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "ron")]
    #[error("config serialisation to RON failed")]
    Ron(#[from] ron::Error),

    #[cfg(feature = "ron")]
    #[error("config deserialisation from RON failed")]
    RonSpanned(#[from] ron::error::SpannedError),

    #[cfg(feature = "toml")]
    #[error("config deserialisation from TOML failed")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("config serialisation to TOML failed")]
    TomlSer(#[from] toml::ser::Error),

    #[error("config file I/O failed")]
    Io(#[from] std::io::Error),

    #[error("format not supported: {0}")]
    UnsupportedFormat(Format),
}

/// Config file formats, chosen by file extension
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Toml,
    /// `.yaml` or `.yml`
    Yaml,
    Ron,
    /// Unrecognised or missing extension
    Unknown,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Toml => "TOML",
            Format::Yaml => "YAML",
            Format::Ron => "RON",
            Format::Unknown => "(unknown format)",
        })
    }
}

impl Format {
    /// Guess format from the extension of `path` (the file is not opened)
    pub fn guess_from_path(path: &Path) -> Format {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return Format::Unknown;
        };
        match ext.to_ascii_lowercase().as_str() {
            "json" => Format::Json,
            "toml" => Format::Toml,
            "yaml" | "yml" => Format::Yaml,
            "ron" => Format::Ron,
            _ => Format::Unknown,
        }
    }

    /// Deserialise from a string
    #[cfg(feature = "serde")]
    pub fn read_str<T: DeserializeOwned>(self, text: &str) -> Result<T, Error> {
        match self {
            #[cfg(feature = "json")]
            Format::Json => Ok(serde_json::from_str(text)?),
            #[cfg(feature = "yaml")]
            Format::Yaml => Ok(serde_yaml2::from_str(text)?),
            #[cfg(feature = "ron")]
            Format::Ron => Ok(ron::from_str(text)?),
            #[cfg(feature = "toml")]
            Format::Toml => Ok(toml::from_str(text)?),
            _ => {
                let _ = text;
                Err(Error::UnsupportedFormat(self))
            }
        }
    }

    /// Serialise to a string
    #[cfg(feature = "serde")]
    pub fn write_string<T: Serialize>(self, value: &T) -> Result<String, Error> {
        match self {
            #[cfg(feature = "json")]
            Format::Json => Ok(serde_json::to_string_pretty(value)?),
            #[cfg(feature = "yaml")]
            Format::Yaml => Ok(serde_yaml2::to_string(value)?),
            #[cfg(feature = "ron")]
            Format::Ron => {
                let pretty = ron::ser::PrettyConfig::default();
                Ok(ron::ser::to_string_pretty(value, pretty)?)
            }
            #[cfg(feature = "toml")]
            Format::Toml => Ok(toml::to_string(value)?),
            _ => {
                let _ = value;
                Err(Error::UnsupportedFormat(self))
            }
        }
    }

    /// Read from a path
    #[cfg(feature = "serde")]
    pub fn read_path<T: DeserializeOwned>(self, path: &Path) -> Result<T, Error> {
        log::info!(target: "xpop_core::config", "read_path: path={}, format={:?}", path.display(), self);
        let contents = std::fs::read_to_string(path)?;
        self.read_str(&contents)
    }

    /// Write to a path
    ///
    /// The document is serialised in full before the file is touched.
    #[cfg(feature = "serde")]
    pub fn write_path<T: Serialize>(self, path: &Path, value: &T) -> Result<(), Error> {
        log::info!(target: "xpop_core::config", "write_path: path={}, format={:?}", path.display(), self);
        let text = self.write_string(value)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Guess format and load from a path
    #[cfg(feature = "serde")]
    #[inline]
    pub fn guess_and_read_path<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
        let format = Self::guess_from_path(path);
        format.read_path(path)
    }

    /// Guess format and write to a path
    #[cfg(feature = "serde")]
    #[inline]
    pub fn guess_and_write_path<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
        let format = Self::guess_from_path(path);
        format.write_path(path, value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn guess() {
        assert_eq!(Format::guess_from_path(Path::new("a/xpop.json")), Format::Json);
        assert_eq!(Format::guess_from_path(Path::new("xpop.YML")), Format::Yaml);
        assert_eq!(Format::guess_from_path(Path::new("xpop.ron")), Format::Ron);
        assert_eq!(Format::guess_from_path(Path::new("xpop.toml")), Format::Toml);
        assert_eq!(Format::guess_from_path(Path::new("xpop")), Format::Unknown);
        assert_eq!(Format::guess_from_path(Path::new("xpop.ini")), Format::Unknown);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_config() {
        use crate::config::{Config, Policy};
        use crate::draw::color::Color;

        let mut config = Config::default();
        config.popup_mut().policy = Policy::DragSelect;
        config.popup_mut().colors.highlight = Color::rgb(0x20, 0x40, 0x80);
        let text = Format::Json.write_string(&config).unwrap();
        assert!(text.contains("\"DragSelect\""));
        assert!(text.contains("#204080"));

        let read: Config = Format::Json.read_str(&text).unwrap();
        assert_eq!(read.popup, config.popup);
        assert!(!read.is_dirty());

        // missing fields take defaults
        let read: Config = Format::Json.read_str(r#"{"event":{"idle_wait_ms":5}}"#).unwrap();
        assert_eq!(read.event.idle_wait_ms, 5);
        assert_eq!(read.event.idle_poll_count, 10);
        assert_eq!(read.popup.bw, 1);
    }
}
