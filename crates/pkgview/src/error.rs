//! Error types for the sync layer.

use crate::view::ListType;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while configuring or running the sync layer.
///
/// `UnknownSortMethod`, the core wiring errors and `SortCaptionCount` all
/// indicate a defect in the caller's wiring or configuration. Caption
/// template problems never surface here; they are tolerated and logged.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A list reported a sort method index outside its enumeration.
    #[error("Unknown sort method {value} for the {list} list")]
    UnknownSortMethod { list: ListType, value: usize },

    /// A sort caption table does not line up with its sort-method enumeration.
    #[error("The {list} list has {expected} sort methods but {actual} captions were given")]
    SortCaptionCount {
        list: ListType,
        expected: usize,
        actual: usize,
    },

    /// A theme color could not be parsed.
    #[error("Invalid color '{value}' for '{field}'")]
    InvalidColor { field: &'static str, value: String },

    /// Signal or coalescer wiring error.
    #[error(transparent)]
    Core(#[from] pkgview_core::Error),

    /// TOML settings could not be parsed.
    #[error("Failed to parse TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be serialized to TOML.
    #[error("Failed to serialize TOML settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON settings could not be parsed.
    #[error("Failed to parse JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Create an unknown sort method error.
    pub fn unknown_sort_method(list: ListType, value: usize) -> Self {
        Self::UnknownSortMethod { list, value }
    }

    /// Create an invalid color error.
    pub fn invalid_color(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidColor {
            field,
            value: value.into(),
        }
    }
}

impl From<pkgview_core::SignalError> for SyncError {
    fn from(err: pkgview_core::SignalError) -> Self {
        Self::Core(err.into())
    }
}

impl From<pkgview_core::CoalescerError> for SyncError {
    fn from(err: pkgview_core::CoalescerError) -> Self {
        Self::Core(err.into())
    }
}
