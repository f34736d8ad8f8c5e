//! Placemark geometry
//!
//! Only the four geometry kinds a map surface can draw are modelled. Other
//! KML geometries (`Model`, `gx:Track`, ...) are dropped by the parser.

use kmlayer_common::LatLng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of a geometry kind, matching the KML element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum GeometryKind {
    /// `<Point>`
    Point,
    /// `<LineString>`
    LineString,
    /// `<Polygon>`
    Polygon,
    /// `<MultiGeometry>`
    MultiGeometry,
}

/// A placemark geometry. `MultiGeometry` nests arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A single position.
    Point(LatLng),
    /// An open path.
    LineString(Vec<LatLng>),
    /// A filled area with optional holes.
    Polygon {
        /// Outer boundary ring.
        outer: Vec<LatLng>,
        /// Inner boundary rings.
        #[serde(default)]
        inner: Vec<Vec<LatLng>>,
    },
    /// Ordered collection of geometries.
    MultiGeometry(Vec<Geometry>),
}

impl Geometry {
    /// The geometry kind.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon { .. } => GeometryKind::Polygon,
            Self::MultiGeometry(_) => GeometryKind::MultiGeometry,
        }
    }

    /// Polygon without holes.
    #[must_use]
    pub const fn polygon(outer: Vec<LatLng>) -> Self {
        Self::Polygon {
            outer,
            inner: Vec::new(),
        }
    }

    /// Number of drawable leaves (non-`MultiGeometry` geometries), counted
    /// recursively.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::MultiGeometry(children) => children.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    /// Kinds of the drawable leaves in document order.
    #[must_use]
    pub fn leaf_kinds(&self) -> Vec<GeometryKind> {
        let mut kinds = Vec::with_capacity(self.leaf_count());
        self.collect_leaf_kinds(&mut kinds);
        kinds
    }

    fn collect_leaf_kinds(&self, out: &mut Vec<GeometryKind>) {
        match self {
            Self::MultiGeometry(children) => {
                for child in children {
                    child.collect_leaf_kinds(out);
                }
            }
            leaf => out.push(leaf.kind()),
        }
    }
}
