// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Configuration options

#[cfg(feature = "serde")]
use super::Format;
use super::{Config, Error};
#[cfg(feature = "serde")]
use crate::util::warn_about_error;
use std::env::var;
use std::path::PathBuf;

/// Config mode
///
/// See [`Options::from_env`] documentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConfigMode {
    /// Read-only mode
    #[default]
    Read,
    /// Read-write mode
    ///
    /// This mode reads config on start and writes changes on exit.
    ReadWrite,
    /// Use default config and write out
    ///
    /// This mode only writes initial (default) config and does not update.
    WriteDefault,
}

impl ConfigMode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "READ" => Some(ConfigMode::Read),
            "READWRITE" => Some(ConfigMode::ReadWrite),
            "WRITEDEFAULT" => Some(ConfigMode::WriteDefault),
            _ => None,
        }
    }
}

/// Configuration options
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Options {
    /// Config file path. Default: empty. See `XPOP_CONFIG` doc.
    pub config_path: PathBuf,
    /// Config mode. Default: Read.
    pub config_mode: ConfigMode,
}

impl Options {
    /// Construct a new instance, reading from environment variables
    ///
    /// The `XPOP_CONFIG` variable, if given, provides a path to the config
    /// file, which is read or written according to `XPOP_CONFIG_MODE`.
    /// If `XPOP_CONFIG` is not specified, default configuration is used
    /// without reading or writing. The file format is guessed from the
    /// extension (see [`super::Format::guess_from_path`]).
    ///
    /// The `XPOP_CONFIG_MODE` variable (case-insensitive) determines the
    /// read/write mode:
    ///
    /// -   `Read` (default): read-only
    /// -   `ReadWrite`: read on start-up, write on exit
    /// -   `WriteDefault`: generate default configuration and write it to
    ///     the config path, overwriting any existing config
    pub fn from_env() -> Self {
        let mut options = Options::default();

        if let Ok(v) = var("XPOP_CONFIG") {
            options.config_path = v.into();
        }

        if let Ok(v) = var("XPOP_CONFIG_MODE") {
            match ConfigMode::parse(&v) {
                Some(mode) => options.config_mode = mode,
                None => {
                    log::error!(target: "xpop_core::config", "from_env: bad var XPOP_CONFIG_MODE={v}");
                    log::error!(
                        target: "xpop_core::config",
                        "from_env: supported config modes: READ, READWRITE, WRITEDEFAULT"
                    );
                }
            }
        }

        options
    }

    /// Load (or with [`ConfigMode::WriteDefault`], save) config on start
    ///
    /// Requires feature "serde" to load/save config.
    pub fn read_config(&self) -> Result<Config, Error> {
        #[cfg(feature = "serde")]
        if !self.config_path.as_os_str().is_empty() {
            return match self.config_mode {
                ConfigMode::Read | ConfigMode::ReadWrite => {
                    Ok(Format::guess_and_read_path(&self.config_path)?)
                }
                ConfigMode::WriteDefault => {
                    let config = Config::default();
                    if let Err(error) = Format::guess_and_write_path(&self.config_path, &config) {
                        warn_about_error("failed to write default config", &error);
                    }
                    Ok(config)
                }
            };
        }

        Ok(Config::default())
    }

    /// Save config (on exit or after changes)
    ///
    /// Only writes in [`ConfigMode::ReadWrite`] and when `config` is dirty.
    /// Requires feature "serde" to save config.
    pub fn write_config(&self, _config: &Config) -> Result<(), Error> {
        #[cfg(feature = "serde")]
        if self.config_mode == ConfigMode::ReadWrite
            && !self.config_path.as_os_str().is_empty()
            && _config.is_dirty()
        {
            Format::guess_and_write_path(&self.config_path, _config)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_mode() {
        assert_eq!(ConfigMode::parse("readwrite"), Some(ConfigMode::ReadWrite));
        assert_eq!(ConfigMode::parse("WriteDefault"), Some(ConfigMode::WriteDefault));
        assert_eq!(ConfigMode::parse("READ"), Some(ConfigMode::Read));
        assert_eq!(ConfigMode::parse("write"), None);
    }

    #[test]
    fn no_path_gives_defaults() {
        let options = Options::default();
        let config = options.read_config().unwrap();
        assert_eq!(config, Config::default());
        options.write_config(&config).unwrap();
    }
}
