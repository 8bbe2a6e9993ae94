//! Release and package records.
//!
//! These are owned by the model and only ever read by the sync layer.
//! Timestamps are ticks as reported by the loader; the sync layer only
//! compares them.

use serde::{Deserialize, Serialize};

/// Asset store metadata attached to a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetStoreInfo {
    pub publisher_id: String,
    pub publisher_label: String,
    pub category_id: String,
    pub category_label: String,
    pub publish_date_ticks: i64,
}

/// A release that can be installed as a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseInfo {
    pub id: String,
    pub name: String,
    /// Human-readable version. `None` and `Some("")` both mean "no version".
    pub version: Option<String>,
    pub version_code: i32,
    pub local_path: Option<String>,
    pub file_modification_date_ticks: i64,
    pub compressed_size: i64,
    pub asset_store_info: AssetStoreInfo,
}

impl ReleaseInfo {
    /// Create a release with just an id and a display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The version string, if one is present and non-empty.
    pub fn display_version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.is_empty())
    }

    /// Whether `other` describes the same release at the same version.
    pub fn is_same_release(&self, other: &ReleaseInfo) -> bool {
        self.id == other.id && self.version_code == other.version_code
    }
}

/// How and when a package was installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallInfo {
    pub install_date_ticks: i64,
    /// The release the package was installed from. An empty name means the
    /// package did not come from a known release.
    pub release_info: ReleaseInfo,
}

/// An installed package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageInfo {
    pub name: String,
    pub path: String,
    pub install_info: InstallInfo,
}

impl PackageInfo {
    /// Create a package that did not come from a known release.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record the release this package was installed from.
    pub fn installed_from(mut self, release: ReleaseInfo, install_date_ticks: i64) -> Self {
        self.install_info = InstallInfo {
            install_date_ticks,
            release_info: release,
        };
        self
    }

    /// The originating release, if it has a name.
    pub fn source_release(&self) -> Option<&ReleaseInfo> {
        let release = &self.install_info.release_info;
        (!release.name.is_empty()).then_some(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_version_skips_empty() {
        assert_eq!(ReleaseInfo::new("a", "A").display_version(), None);
        assert_eq!(
            ReleaseInfo::new("a", "A").with_version("").display_version(),
            None
        );
        assert_eq!(
            ReleaseInfo::new("a", "A").with_version("1.2").display_version(),
            Some("1.2")
        );
    }

    #[test]
    fn test_source_release_requires_name() {
        let plain = PackageInfo::new("Bar");
        assert!(plain.source_release().is_none());

        let installed = PackageInfo::new("Bar").installed_from(ReleaseInfo::new("baz", "Baz"), 7);
        assert_eq!(installed.source_release().map(|r| r.name.as_str()), Some("Baz"));
        assert_eq!(installed.install_info.install_date_ticks, 7);
    }

    #[test]
    fn test_records_deserialize_with_defaults() {
        let json = r#"{ "name": "Bar", "install_info": { "release_info": { "id": "x", "name": "X" } } }"#;
        let package: PackageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(package.name, "Bar");
        assert_eq!(package.install_info.release_info.version, None);
        assert_eq!(package.install_info.install_date_ticks, 0);
    }
}
