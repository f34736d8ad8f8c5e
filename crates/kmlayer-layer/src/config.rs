//! Layer configuration.

use serde::{Deserialize, Serialize};

/// Options fixed when a layer controller is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Ignore cached icons when rendering and download every icon again on
    /// each activation.
    pub force_icon_refresh: bool,
}

impl LayerConfig {
    /// Set [`LayerConfig::force_icon_refresh`].
    #[must_use]
    pub const fn with_force_icon_refresh(mut self, force: bool) -> Self {
        self.force_icon_refresh = force;
        self
    }
}
