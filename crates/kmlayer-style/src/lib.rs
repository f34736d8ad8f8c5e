//! Style model, style resolution, colors, and balloon templates for kmlayer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Styles** - `<Style>` with icon, line, polygon, and balloon sub-styles,
//!   tracking which attributes a document set explicitly
//! - **Style Registry** - merging per-scope style tables and resolving style
//!   maps (aliases), last writer wins
//! - **Colors** - KML `aabbggrr` colors, marker hue, random color mode
//! - **Balloon Templates** - `$[field]` substitution from feature properties
//! - **Primitive Options** - marker/polyline/polygon/overlay parameter records
//!
//! # Not Yet Implemented
//!
//! - `<LabelStyle>` and `<ListStyle>`
//! - Highlight variants of style maps (only the alias table is resolved)

/// KML colors and random color mode.
pub mod color;
/// Parameter records handed to a map surface.
pub mod options;
/// Merged style tables and alias resolution.
pub mod registry;
/// The `<Style>` type and its builder.
pub mod style;
/// Balloon text `$[field]` substitution.
pub mod template;

pub use color::ColorValue;
pub use options::{
    GroundOverlayOptions, IconDescriptor, MarkerOptions, PolygonOptions, PolylineOptions,
};
pub use registry::{StyleAliasTable, StyleRegistry};
pub use style::{BalloonStyle, IconStyle, LineStyle, PolyStyle, Style, StyleAttr, StyleBuilder};
pub use template::{Substitution, contains_variables, substitute_template};
