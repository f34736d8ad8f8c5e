//! Primitive options - the parameter records handed to a map surface
//!
//! A resolved style plus a geometry produces one of these per drawable
//! primitive. The surface knows nothing about KML; it only receives options.

use kmlayer_common::{LatLng, LatLngBounds, LoadedImage};

use crate::ColorValue;

/// The icon a point marker displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IconDescriptor {
    /// The surface's default marker.
    #[default]
    Default,
    /// The default marker tinted to a hue in degrees `[0, 360)`.
    DefaultWithHue(f32),
    /// A decoded (and already scaled) bitmap.
    Bitmap(LoadedImage),
}

/// Parameters for a point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Marker position.
    pub position: LatLng,
    /// Clockwise rotation in degrees (KML `heading`).
    pub rotation: f32,
    /// Anchor point as fractions of the icon size (KML `hotSpot`).
    pub anchor: (f32, f32),
    /// Icon to draw.
    pub icon: IconDescriptor,
    /// Info window title.
    pub title: Option<String>,
    /// Info window snippet.
    pub snippet: Option<String>,
}

impl MarkerOptions {
    /// Marker at `position` with the default icon and a bottom-center anchor.
    #[must_use]
    pub const fn new(position: LatLng) -> Self {
        Self {
            position,
            rotation: 0.0,
            anchor: (0.5, 1.0),
            icon: IconDescriptor::Default,
            title: None,
            snippet: None,
        }
    }
}

/// Parameters for a polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineOptions {
    /// Vertices in order.
    pub points: Vec<LatLng>,
    /// Stroke color.
    pub color: ColorValue,
    /// Stroke width in screen pixels.
    pub width: f32,
}

/// Parameters for a polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOptions {
    /// Outer boundary ring.
    pub points: Vec<LatLng>,
    /// Inner boundary rings.
    pub holes: Vec<Vec<LatLng>>,
    /// Fill color (transparent when the style disables fill).
    pub fill_color: ColorValue,
    /// Outline color.
    pub stroke_color: ColorValue,
    /// Outline width in screen pixels (zero when the style disables outline).
    pub stroke_width: f32,
}

/// Parameters for a ground overlay image.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlayOptions {
    /// Geographic box the image is stretched over.
    pub bounds: LatLngBounds,
    /// Rotation of the image around the box center, degrees counter-clockwise.
    pub bearing: f32,
    /// Stacking order; higher draws above lower.
    pub z_index: f32,
    /// Transparency in `[0, 1]` (0 = opaque).
    pub transparency: f32,
}
