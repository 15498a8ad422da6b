use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Search configuration, read from a toml file:
///
/// ```toml
/// paths = ["~/code", "~/work"]
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Base paths whose immediate subdirectories are searched.
    #[serde(default)]
    pub paths: Vec<String>,
    /// File the config was loaded from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Environment variable overriding [`Config::paths`], separated like `$PATH`.
    pub const PATHS_ENV: &'static str = "FF_PATHS";

    /// Default config locations, in lookup order:
    /// - `$HOME/.ff/config.toml`
    /// - `/etc/ff/config.toml`
    pub fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::with_capacity(2);
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(".ff").join("config.toml"));
        }
        locations.push(PathBuf::from("/etc/ff/config.toml"));
        locations
    }

    /// Loads config from a toml string
    fn from_toml(toml: &str) -> Result<Self> {
        let span = tracing::debug_span!("config::from_toml");
        let _enter = span.enter();

        toml::from_str(toml).map_err(Into::into)
    }

    /// Loads config from path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let span = tracing::debug_span!("config::load_from_path", ?path);
        let _enter = span.enter();

        let toml = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&toml)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            ..config
        })
    }

    /// Loads the first existing file of `locations`.
    ///
    /// Without any config file, [`Config::PATHS_ENV`] alone is enough; if it is unset too this
    /// is an error.
    pub fn load_from_locations(locations: &[PathBuf], env: Option<OsString>) -> Result<Self> {
        let config = match locations.iter().find(|path| path.is_file()) {
            Some(path) => Self::load_from_path(path)?,
            None if env.is_some() => {
                tracing::debug!("no config file found, using ${}", Self::PATHS_ENV);
                Self::default()
            }
            None => {
                return Err(Error::ConfigNotFound {
                    searched: locations.to_vec(),
                })
            }
        };

        Ok(config.with_paths_override(env))
    }

    /// Loads `explicit` if given, otherwise the first of [`Config::default_locations`], then
    /// applies [`Config::PATHS_ENV`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let span = tracing::debug_span!("config::load", ?explicit);
        let _enter = span.enter();

        let env = std::env::var_os(Self::PATHS_ENV);
        match explicit {
            Some(path) => Ok(Self::load_from_path(path)?.with_paths_override(env)),
            None => Self::load_from_locations(&Self::default_locations(), env),
        }
    }

    /// Replace the paths with the entries of `paths`, if any.
    pub fn with_paths_override(mut self, paths: Option<OsString>) -> Self {
        if let Some(paths) = paths {
            self.paths = std::env::split_paths(&paths)
                .filter(|path| !path.as_os_str().is_empty())
                .map(|path| path.to_string_lossy().into_owned())
                .collect();
        }
        self
    }
}
