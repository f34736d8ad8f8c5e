//! The map surface collaborator and handles to what was drawn on it
//!
//! The surface owns primitive lifetime. The layer only keeps the ids it was
//! given and must ask for every removal explicitly.

use kmlayer_common::LoadedImage;
use kmlayer_style::{
    GroundOverlayOptions, IconDescriptor, MarkerOptions, PolygonOptions, PolylineOptions,
};

/// Opaque id of a primitive, issued by the surface that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

/// A map widget the layer draws onto.
pub trait MapSurface {
    /// Create a point marker.
    fn add_point(&mut self, options: MarkerOptions) -> PrimitiveId;

    /// Create a polyline.
    fn add_line(&mut self, options: PolylineOptions) -> PrimitiveId;

    /// Create a polygon.
    fn add_polygon(&mut self, options: PolygonOptions) -> PrimitiveId;

    /// Drape `image` over the bounds in `options`.
    fn add_image_overlay(&mut self, image: &LoadedImage, options: GroundOverlayOptions)
    -> PrimitiveId;

    /// Remove a primitive created by this surface.
    fn remove_primitive(&mut self, id: PrimitiveId);

    /// Show or hide a primitive without removing it.
    fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool);

    /// Replace a point marker's icon in place.
    fn set_point_icon(&mut self, id: PrimitiveId, icon: IconDescriptor);
}

/// What a placemark's geometry became on the surface.
///
/// A `MultiGeometry` becomes a `Composite` of its leaves, flattened in
/// document order; a `Composite` never contains another `Composite`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedHandle {
    /// A point marker.
    Point(PrimitiveId),
    /// A polyline.
    Line(PrimitiveId),
    /// A polygon.
    Polygon(PrimitiveId),
    /// Leaves of a composite geometry.
    Composite(Vec<RenderedHandle>),
}

impl RenderedHandle {
    /// Every primitive id behind this handle, in document order.
    #[must_use]
    pub fn primitive_ids(&self) -> Vec<PrimitiveId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids, false);
        ids
    }

    /// Ids of the point markers behind this handle.
    #[must_use]
    pub fn point_ids(&self) -> Vec<PrimitiveId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids, true);
        ids
    }

    /// Number of primitives behind this handle.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Point(_) | Self::Line(_) | Self::Polygon(_) => 1,
            Self::Composite(leaves) => leaves.iter().map(Self::leaf_count).sum(),
        }
    }

    fn collect_ids(&self, out: &mut Vec<PrimitiveId>, points_only: bool) {
        match self {
            Self::Point(id) => out.push(*id),
            Self::Line(id) | Self::Polygon(id) => {
                if !points_only {
                    out.push(*id);
                }
            }
            Self::Composite(leaves) => {
                for leaf in leaves {
                    leaf.collect_ids(out, points_only);
                }
            }
        }
    }

    /// Show or hide every primitive behind this handle.
    pub fn set_visible_on<S: MapSurface + ?Sized>(&self, surface: &mut S, visible: bool) {
        for id in self.primitive_ids() {
            surface.set_primitive_visible(id, visible);
        }
    }

    /// Remove every primitive behind this handle. Returns how many were removed.
    pub fn remove_from<S: MapSurface + ?Sized>(&self, surface: &mut S) -> usize {
        let ids = self.primitive_ids();
        for id in &ids {
            surface.remove_primitive(*id);
        }
        ids.len()
    }
}
