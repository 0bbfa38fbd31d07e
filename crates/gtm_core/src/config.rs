//! Store configuration.

use crate::model::document::WeeklyTargets;

/// Storage key used when the host does not pick one.
pub const DEFAULT_STORAGE_KEY: &str = "gtm-tracker-data";

/// Settings fixed when a tracker is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Key of the document in the key-value substrate and on the change bus.
    pub storage_key: String,
    /// Targets written into a freshly created or reset document.
    pub default_targets: WeeklyTargets,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_targets: WeeklyTargets::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_storage_key(key: impl Into<String>) -> Self {
        Self {
            storage_key: key.into(),
            ..Self::default()
        }
    }
}
