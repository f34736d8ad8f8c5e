//! Effective visibility of features
//!
//! A feature's `visibility` property is an integer where `0` hides it and
//! any other value shows it. A missing property means visible. A hidden
//! container hides everything beneath it regardless of the children's own
//! properties.
//!
//! Malformed values never fail a render pass: they count as visible and are
//! reported once through the warning log.

use kmlayer_common::Properties;
use kmlayer_common::warning::warn_once;
use thiserror::Error;

use crate::{Container, GroundOverlay, Placemark};

/// Property controlling feature visibility.
pub const VISIBILITY_PROPERTY: &str = "visibility";

/// A `visibility` property that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed visibility value {value:?}, expected an integer")]
pub struct VisibilityError {
    /// The raw property value.
    pub value: String,
}

/// Strictly parse the `visibility` property. Absent means visible.
///
/// # Errors
///
/// Returns [`VisibilityError`] when the value is present but not an integer.
#[allow(clippy::implicit_hasher)]
pub fn parse_visibility(properties: &Properties) -> Result<bool, VisibilityError> {
    let Some(raw) = properties.get(VISIBILITY_PROPERTY) else {
        return Ok(true);
    };
    raw.trim()
        .parse::<i64>()
        .map(|value| value != 0)
        .map_err(|_| VisibilityError { value: raw.clone() })
}

/// Lenient visibility of a single feature: malformed values are visible and
/// logged.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn feature_visible(properties: &Properties) -> bool {
    parse_visibility(properties).unwrap_or_else(|err| {
        warn_once("visibility", &err.to_string());
        true
    })
}

/// Whether a placemark is shown, ignoring its ancestors.
#[must_use]
pub fn placemark_visible(placemark: &Placemark) -> bool {
    feature_visible(&placemark.properties)
}

/// Whether a container is shown given its parent's effective visibility.
#[must_use]
pub fn container_visible(container: &Container, parent_visible: bool) -> bool {
    parent_visible && feature_visible(&container.properties)
}

/// Whether a ground overlay is shown given its container's effective
/// visibility.
#[must_use]
pub fn overlay_visible(overlay: &GroundOverlay, parent_visible: bool) -> bool {
    parent_visible && feature_visible(&overlay.properties)
}
