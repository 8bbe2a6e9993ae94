//! Settings for the sync layer.
//!
//! Everything here has a built-in default, so an empty document is valid.
//! Settings can be read from TOML or JSON text; reading the file is left to
//! the host.
//!
//! ```
//! use pkgview::settings::SyncSettings;
//!
//! let settings = SyncSettings::from_toml_str(r##"
//!     [theme]
//!     already_added_color = "#00FF00"
//!
//!     [captions]
//!     release_with_version = "{0}  {1}"
//! "##).unwrap();
//!
//! assert_eq!(settings.captions.release_with_version, "{0}  {1}");
//! assert_eq!(settings.theme().unwrap().already_added_color.to_hex(), "#00FF00FF");
//! ```

use serde::{Deserialize, Serialize};

use crate::caption::{Color, Theme};
use crate::error::{Result, SyncError};
use crate::sort::{PackagesSortMethod, ReleasesSortMethod};
use crate::view::ListType;

/// Colors for caption marks, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub already_added_color: String,
    pub version_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            already_added_color: Theme::DEFAULT_ALREADY_ADDED.to_hex(),
            version_color: Theme::DEFAULT_VERSION.to_hex(),
        }
    }
}

/// Templates used to assemble captions.
///
/// Placeholders are positional, see [`fmt_safe`](crate::caption::fmt_safe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionTemplates {
    /// `{0}` release caption, `{1}` marked version.
    pub release_with_version: String,
    /// `{0}` package name, `{1}` marked release name, `{2}` marked version
    /// suffix or empty.
    pub package_with_release: String,
}

impl Default for CaptionTemplates {
    fn default() -> Self {
        Self {
            release_with_version: "{0} {1}".to_string(),
            package_with_release: "{0} ({1}{2})".to_string(),
        }
    }
}

/// All sync-layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Sort picker captions for the release list, in [`ReleasesSortMethod`] order.
    pub release_sort_captions: Vec<String>,
    /// Sort picker captions for the package list, in [`PackagesSortMethod`] order.
    pub package_sort_captions: Vec<String>,
    pub theme: ThemeSettings,
    pub captions: CaptionTemplates,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            release_sort_captions: ReleasesSortMethod::ALL
                .iter()
                .map(|m| m.caption().to_string())
                .collect(),
            package_sort_captions: PackagesSortMethod::ALL
                .iter()
                .map(|m| m.caption().to_string())
                .collect(),
            theme: ThemeSettings::default(),
            captions: CaptionTemplates::default(),
        }
    }
}

impl SyncSettings {
    /// Parse and validate settings from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse and validate settings from JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that caption tables line up with their sort methods and that
    /// colors parse.
    pub fn validate(&self) -> Result<()> {
        check_caption_count(
            ListType::Release,
            ReleasesSortMethod::ALL.len(),
            &self.release_sort_captions,
        )?;
        check_caption_count(
            ListType::Package,
            PackagesSortMethod::ALL.len(),
            &self.package_sort_captions,
        )?;
        self.theme()?;
        Ok(())
    }

    /// The parsed theme colors.
    pub fn theme(&self) -> Result<Theme> {
        Ok(Theme {
            already_added_color: parse_color("already_added_color", &self.theme.already_added_color)?,
            version_color: parse_color("version_color", &self.theme.version_color)?,
        })
    }
}

fn check_caption_count(list: ListType, expected: usize, captions: &[String]) -> Result<()> {
    if captions.len() == expected {
        Ok(())
    } else {
        Err(SyncError::SortCaptionCount {
            list,
            expected,
            actual: captions.len(),
        })
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color> {
    Color::from_hex(value).ok_or_else(|| SyncError::invalid_color(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SyncSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.release_sort_captions[0], "Order By Name");
        assert_eq!(settings.package_sort_captions.len(), 3);
        assert_eq!(settings.theme().unwrap(), Theme::default());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(SyncSettings::from_toml_str("").unwrap(), SyncSettings::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = SyncSettings::default();
        settings.captions.package_with_release = "{0} [{1}{2}]".to_string();

        let text = settings.to_toml_string().unwrap();
        assert_eq!(SyncSettings::from_toml_str(&text).unwrap(), settings);
    }

    #[test]
    fn test_json_overrides() {
        let settings = SyncSettings::from_json_str(
            r#"{ "package_sort_captions": ["Name", "Installed", "Published"] }"#,
        )
        .unwrap();
        assert_eq!(settings.package_sort_captions[1], "Installed");
        assert_eq!(settings.release_sort_captions.len(), 4);
    }

    #[test]
    fn test_caption_count_mismatch_rejected() {
        let err = SyncSettings::from_toml_str(r#"release_sort_captions = ["Name", "Size"]"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::SortCaptionCount {
                list: ListType::Release,
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = SyncSettings::from_toml_str("[theme]\nversion_color = \"grey\"").unwrap_err();
        assert!(matches!(
            err,
            SyncError::InvalidColor {
                field: "version_color",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = SyncSettings::from_toml_str("theme = [").unwrap_err();
        assert!(matches!(err, SyncError::TomlParse(_)));
    }
}
