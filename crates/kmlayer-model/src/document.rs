//! The parsed KML document tree
//!
//! Everything here is plain data produced by a parser (or deserialized with
//! serde). Nodes have no identity of their own: a placemark or overlay is
//! identified by its position in the tree.

use kmlayer_common::{LatLngBounds, Properties};
use kmlayer_style::{GroundOverlayOptions, Style, StyleAliasTable};
use serde::{Deserialize, Serialize};

use crate::Geometry;

/// Property holding a feature's display name.
pub const NAME_PROPERTY: &str = "name";
/// Property holding a feature's description.
pub const DESCRIPTION_PROPERTY: &str = "description";

/// A `<Placemark>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placemark {
    /// Feature properties (`name`, `description`, `visibility`, extended data).
    pub properties: Properties,
    /// `<styleUrl>` key into the style registry.
    pub style_url: Option<String>,
    /// Style declared directly inside the placemark.
    pub inline_style: Option<Style>,
    /// Geometry, if any. Placemarks without geometry render nothing.
    pub geometry: Option<Geometry>,
}

impl Placemark {
    /// Empty placemark.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the style reference.
    #[must_use]
    pub fn with_style_url(mut self, key: &str) -> Self {
        self.style_url = Some(key.to_string());
        self
    }

    /// Set the inline style.
    #[must_use]
    pub fn with_inline_style(mut self, style: Style) -> Self {
        self.inline_style = Some(style);
        self
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        let _ = self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Property value by key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Whether the property exists.
    #[must_use]
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// `name` property.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.property(NAME_PROPERTY)
    }

    /// `description` property.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.property(DESCRIPTION_PROPERTY)
    }
}

/// A `<GroundOverlay>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundOverlay {
    /// Feature properties.
    pub properties: Properties,
    /// `<Icon><href>` of the draped image.
    pub image_url: Option<String>,
    /// `<LatLonBox>`.
    pub bounds: Option<LatLngBounds>,
    /// Transparency in `[0, 1]`, derived from the overlay color's alpha.
    pub transparency: f32,
    /// `<drawOrder>`.
    pub z_index: f32,
    /// `<LatLonBox><rotation>`, degrees counter-clockwise.
    pub bearing: f32,
}

impl Default for GroundOverlay {
    fn default() -> Self {
        Self {
            properties: Properties::new(),
            image_url: None,
            bounds: None,
            transparency: 0.0,
            z_index: 0.0,
            bearing: 0.0,
        }
    }
}

impl GroundOverlay {
    /// Overlay of `url` stretched over `bounds`.
    #[must_use]
    pub fn new(url: &str, bounds: LatLngBounds) -> Self {
        Self {
            image_url: Some(url.to_string()),
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        let _ = self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// An overlay can only be drawn with both an image and a bounding box.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.image_url.is_some() && self.bounds.is_some()
    }

    /// Surface parameters, `None` without a bounding box.
    #[must_use]
    pub fn overlay_options(&self) -> Option<GroundOverlayOptions> {
        self.bounds.map(|bounds| GroundOverlayOptions {
            bounds,
            bearing: self.bearing,
            z_index: self.z_index,
            transparency: self.transparency,
        })
    }
}

/// A `<Folder>` or `<Document>` nested inside the root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    /// Feature properties.
    pub properties: Properties,
    /// Styles declared in this container.
    pub styles: Vec<Style>,
    /// `<StyleMap>` aliases declared in this container.
    pub style_maps: StyleAliasTable,
    /// Child placemarks.
    pub placemarks: Vec<Placemark>,
    /// Child ground overlays.
    pub ground_overlays: Vec<GroundOverlay>,
    /// Child containers.
    pub containers: Vec<Container>,
}

impl Container {
    /// Empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        let _ = self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Add a local style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.styles.push(style);
        self
    }

    /// Add a local style alias.
    #[must_use]
    pub fn with_style_map(mut self, alias: &str, target: &str) -> Self {
        let _ = self
            .style_maps
            .insert(alias.to_string(), target.to_string());
        self
    }

    /// Add a placemark.
    #[must_use]
    pub fn with_placemark(mut self, placemark: Placemark) -> Self {
        self.placemarks.push(placemark);
        self
    }

    /// Add a ground overlay.
    #[must_use]
    pub fn with_ground_overlay(mut self, overlay: GroundOverlay) -> Self {
        self.ground_overlays.push(overlay);
        self
    }

    /// Add a child container.
    #[must_use]
    pub fn with_container(mut self, container: Self) -> Self {
        self.containers.push(container);
        self
    }

    /// Whether this container has child containers.
    #[must_use]
    pub fn has_containers(&self) -> bool {
        !self.containers.is_empty()
    }

    /// Placemarks in this container and all descendants.
    #[must_use]
    pub fn placemark_count(&self) -> usize {
        self.placemarks.len()
            + self
                .containers
                .iter()
                .map(Self::placemark_count)
                .sum::<usize>()
    }

    /// Ground overlays in this container and all descendants.
    #[must_use]
    pub fn ground_overlay_count(&self) -> usize {
        self.ground_overlays.len()
            + self
                .containers
                .iter()
                .map(Self::ground_overlay_count)
                .sum::<usize>()
    }
}

/// The root of a parsed KML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmlDocument {
    /// Root style table.
    pub styles: Vec<Style>,
    /// Root style aliases.
    pub style_maps: StyleAliasTable,
    /// Placemarks directly under the root.
    pub placemarks: Vec<Placemark>,
    /// Top-level containers.
    pub containers: Vec<Container>,
    /// Ground overlays directly under the root.
    pub ground_overlays: Vec<GroundOverlay>,
}

impl KmlDocument {
    /// Start building a document.
    #[must_use]
    pub fn builder() -> KmlDocumentBuilder {
        KmlDocumentBuilder::default()
    }

    /// Whether the root has placemarks of its own.
    #[must_use]
    pub fn has_placemarks(&self) -> bool {
        !self.placemarks.is_empty()
    }

    /// Whether the root has containers.
    #[must_use]
    pub fn has_containers(&self) -> bool {
        !self.containers.is_empty()
    }

    /// Placemarks anywhere in the document.
    #[must_use]
    pub fn placemark_count(&self) -> usize {
        self.placemarks.len()
            + self
                .containers
                .iter()
                .map(Container::placemark_count)
                .sum::<usize>()
    }

    /// Ground overlays anywhere in the document.
    #[must_use]
    pub fn ground_overlay_count(&self) -> usize {
        self.ground_overlays.len()
            + self
                .containers
                .iter()
                .map(Container::ground_overlay_count)
                .sum::<usize>()
    }
}

/// Builder for [`KmlDocument`].
#[derive(Debug, Clone, Default)]
pub struct KmlDocumentBuilder {
    document: KmlDocument,
}

impl KmlDocumentBuilder {
    /// Add a root style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.document.styles.push(style);
        self
    }

    /// Add a root style alias.
    #[must_use]
    pub fn style_map(mut self, alias: &str, target: &str) -> Self {
        let _ = self
            .document
            .style_maps
            .insert(alias.to_string(), target.to_string());
        self
    }

    /// Add a root placemark.
    #[must_use]
    pub fn placemark(mut self, placemark: Placemark) -> Self {
        self.document.placemarks.push(placemark);
        self
    }

    /// Add a top-level container.
    #[must_use]
    pub fn container(mut self, container: Container) -> Self {
        self.document.containers.push(container);
        self
    }

    /// Add a root ground overlay.
    #[must_use]
    pub fn ground_overlay(mut self, overlay: GroundOverlay) -> Self {
        self.document.ground_overlays.push(overlay);
        self
    }

    /// Finish the document.
    #[must_use]
    pub fn build(self) -> KmlDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmlayer_common::LatLng;

    #[test]
    fn test_counts_are_recursive() {
        let document = KmlDocument::builder()
            .placemark(Placemark::new())
            .container(
                Container::new()
                    .with_placemark(Placemark::new())
                    .with_container(
                        Container::new()
                            .with_placemark(Placemark::new())
                            .with_ground_overlay(GroundOverlay::default()),
                    ),
            )
            .build();
        assert_eq!(document.placemark_count(), 3);
        assert_eq!(document.ground_overlay_count(), 1);
        assert!(document.has_placemarks());
        assert!(document.containers[0].has_containers());
    }

    #[test]
    fn test_overlay_completeness() {
        let bounds = LatLngBounds::from_edges(1.0, 0.0, 1.0, 0.0);
        assert!(GroundOverlay::new("a.png", bounds).is_complete());

        let no_bounds = GroundOverlay {
            image_url: Some("a.png".to_string()),
            ..GroundOverlay::default()
        };
        assert!(!no_bounds.is_complete());
        assert!(no_bounds.overlay_options().is_none());

        let no_url = GroundOverlay {
            bounds: Some(bounds),
            ..GroundOverlay::default()
        };
        assert!(!no_url.is_complete());
    }

    #[test]
    fn test_overlay_options_copy_fields() {
        let overlay = GroundOverlay {
            z_index: 3.0,
            bearing: 45.0,
            transparency: 0.25,
            ..GroundOverlay::new("a.png", LatLngBounds::from_edges(2.0, 1.0, 2.0, 1.0))
        };
        let options = overlay.overlay_options().unwrap();
        assert!((options.z_index - 3.0).abs() < f32::EPSILON);
        assert!((options.bearing - 45.0).abs() < f32::EPSILON);
        assert_eq!(options.bounds.northeast, LatLng::new(2.0, 2.0));
    }

    #[test]
    fn test_placemark_properties() {
        let placemark = Placemark::new()
            .with_property("name", "Lake")
            .with_style_url("water");
        assert_eq!(placemark.name(), Some("Lake"));
        assert!(placemark.description().is_none());
        assert!(placemark.has_property("name"));
        assert_eq!(placemark.style_url.as_deref(), Some("water"));
    }
}
