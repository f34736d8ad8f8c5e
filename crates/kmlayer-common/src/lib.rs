//! Common utilities for the kmlayer renderer.
//!
//! This crate provides shared infrastructure used by all layer components:
//! - **Warning System** - deduplicated warnings routed through `log`
//! - **Images** - decoded bitmaps and icon resampling
//! - **Geography** - latitude/longitude points and bounding boxes
//! - **Fetch** - HTTP, `data:` URL, and local file reads for image assets

pub mod geo;
pub mod image;
pub mod net;
pub mod warning;

pub use geo::{LatLng, LatLngBounds};
pub use image::{LoadedImage, MAX_SCALED_EDGE};

use std::collections::HashMap;

/// Map of feature property names to values (`name`, `description`,
/// `visibility`, extended data fields, ...).
pub type Properties = HashMap<String, String>;
