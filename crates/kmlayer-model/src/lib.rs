//! KML document model for kmlayer.
//!
//! This crate holds the object graph a KML parser produces: placemarks with
//! geometry and style references, nested containers with their own style
//! tables, and ground overlays. It also decides feature visibility.
//!
//! # Design
//!
//! The tree is owned, plain data. Nodes are addressed by their position
//! (container path + index), which is how the layer keeps its rendered
//! state in a parallel tree.

/// Placemarks, containers, ground overlays, and the document root.
pub mod document;
/// Point, line, polygon, and composite geometry.
pub mod geometry;
/// `visibility` property rules.
pub mod visibility;

pub use document::{
    Container, DESCRIPTION_PROPERTY, GroundOverlay, KmlDocument, KmlDocumentBuilder,
    NAME_PROPERTY, Placemark,
};
pub use geometry::{Geometry, GeometryKind};
pub use visibility::{
    VISIBILITY_PROPERTY, VisibilityError, container_visible, feature_visible, overlay_visible,
    parse_visibility, placemark_visible,
};
