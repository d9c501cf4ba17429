//! Configuration loading and validation for snapops.
//!
//! Settings are layered from three sources, later sources overriding
//! earlier ones:
//!
//! 1. built-in defaults ([`Settings::default`]),
//! 2. an optional TOML file (`config.toml` in the platform config
//!    directory, or an explicit path),
//! 3. environment variables prefixed with `SNAPOPS_`.
//!
//! Every recognized option is a chunk size or a concurrency cap, and all of
//! them must be positive integers. A non-numeric value fails extraction; a
//! zero is rejected by [`Settings::validate`] rather than silently admitted
//! (a zero concurrency cap would hang the executor's admission wait forever).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix recognized by [`Settings::load`].
pub const ENV_PREFIX: &str = "SNAPOPS_";

/// Recognized options for the batch engine.
///
/// # Examples
///
/// ```
/// use snapops_config::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.validate().is_ok());
/// assert_eq!(settings.cap_for_chunk_size(1), settings.max_concurrent_single_api_req);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// In-flight cap when operating on one item per request.
    pub max_concurrent_single_api_req: usize,
    /// In-flight cap when operating on multi-item chunks.
    pub max_concurrent_batch_api_req: usize,
    /// Default chunk size for most bulk actions.
    pub operation_size: usize,
    /// Chunk size for the batch media-info endpoint.
    pub info_size: usize,
    /// Chunk size for locked-folder moves.
    pub locked_folder_op_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_concurrent_single_api_req: 6,
            max_concurrent_batch_api_req: 3,
            operation_size: 500,
            info_size: 50,
            locked_folder_op_size: 150,
        }
    }
}

impl Settings {
    /// Load settings from defaults, the platform config file and the
    /// environment, then validate them.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Load`] when a source cannot be merged or a value
    /// is not an integer, and [`ErrorKind::InvalidSetting`] when a value is
    /// zero.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = Self::default_config_path() {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(figment)
    }

    /// Load settings from defaults plus an explicit TOML file, then validate.
    ///
    /// The file does not have to exist; missing files simply contribute
    /// nothing, which matches [`figment::providers::Toml::file`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX));
        Self::from_figment(figment)
    }

    /// Extract and validate settings from an arbitrary [`Figment`].
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        settings.validate()?;
        tracing::debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    /// Reject any zero-valued size or cap.
    pub fn validate(&self) -> Result<()> {
        let fields: [(&'static str, usize); 5] = [
            ("max_concurrent_single_api_req", self.max_concurrent_single_api_req),
            ("max_concurrent_batch_api_req", self.max_concurrent_batch_api_req),
            ("operation_size", self.operation_size),
            ("info_size", self.info_size),
            ("locked_folder_op_size", self.locked_folder_op_size),
        ];
        for (field, value) in fields {
            if value == 0 {
                exn::bail!(ErrorKind::InvalidSetting { field, value });
            }
        }
        Ok(())
    }

    /// The concurrency budget for a given chunk size.
    ///
    /// Chunk size 1 is the distinguished single-item mode with its own,
    /// typically larger, cap; everything else shares the batch cap.
    pub fn cap_for_chunk_size(&self, chunk_size: usize) -> usize {
        if chunk_size == 1 { self.max_concurrent_single_api_req } else { self.max_concurrent_batch_api_req }
    }

    /// Location of the user-level configuration file, if the platform
    /// exposes a config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "snapops").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use std::ops::Deref;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[rstest]
    #[case("max_concurrent_single_api_req")]
    #[case("max_concurrent_batch_api_req")]
    #[case("operation_size")]
    #[case("info_size")]
    #[case("locked_folder_op_size")]
    fn zero_is_rejected(#[case] field: &'static str) {
        let mut settings = Settings::default();
        match field {
            "max_concurrent_single_api_req" => settings.max_concurrent_single_api_req = 0,
            "max_concurrent_batch_api_req" => settings.max_concurrent_batch_api_req = 0,
            "operation_size" => settings.operation_size = 0,
            "info_size" => settings.info_size = 0,
            _ => settings.locked_folder_op_size = 0,
        }
        let error = settings.validate().unwrap_err();
        assert!(matches!(error.deref(), ErrorKind::InvalidSetting { field: f, value: 0 } if *f == field));
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "operation_size = 25\nmax_concurrent_batch_api_req = 2").unwrap();
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(file.path()));
        let settings = Settings::from_figment(figment).unwrap();
        assert_eq!(settings.operation_size, 25);
        assert_eq!(settings.max_concurrent_batch_api_req, 2);
        // Untouched fields keep their defaults.
        assert_eq!(settings.info_size, Settings::default().info_size);
    }

    #[test]
    fn non_numeric_value_is_a_load_error() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "operation_size = \"lots\"").unwrap();
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(file.path()));
        let error = Settings::from_figment(figment).unwrap_err();
        assert!(matches!(error.deref(), ErrorKind::Load));
    }

    #[test]
    fn zero_from_file_is_rejected_not_admitted() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "max_concurrent_single_api_req = 0").unwrap();
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(file.path()));
        assert!(Settings::from_figment(figment).is_err());
    }

    #[rstest]
    #[case(1, 6)]
    #[case(2, 3)]
    #[case(500, 3)]
    fn cap_selection_by_chunk_size(#[case] chunk_size: usize, #[case] expected: usize) {
        let settings = Settings::default();
        assert_eq!(settings.cap_for_chunk_size(chunk_size), expected);
    }
}
