//! Rendered state, kept as a tree parallel to the document
//!
//! Slot `i` of `placemarks` belongs to placemark `i` of the matching
//! document node, and likewise for overlays and child containers. A slot is
//! `None` until something was drawn for it.

use kmlayer_model::{Container, KmlDocument};

use crate::surface::{MapSurface, PrimitiveId, RenderedHandle};

/// Rendered state of the document root or of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedContainer {
    /// One slot per placemark; `None` for placemarks without geometry.
    pub placemarks: Vec<Option<RenderedHandle>>,
    /// One slot per ground overlay; `None` until its image is drawn.
    pub overlays: Vec<Option<PrimitiveId>>,
    /// One entry per child container.
    pub containers: Vec<RenderedContainer>,
}

impl RenderedContainer {
    /// Empty slots shaped like the document root.
    #[must_use]
    pub fn for_document(document: &KmlDocument) -> Self {
        Self::shaped(
            document.placemarks.len(),
            document.ground_overlays.len(),
            &document.containers,
        )
    }

    /// Empty slots shaped like `container`.
    #[must_use]
    pub fn for_container(container: &Container) -> Self {
        Self::shaped(
            container.placemarks.len(),
            container.ground_overlays.len(),
            &container.containers,
        )
    }

    fn shaped(placemarks: usize, overlays: usize, containers: &[Container]) -> Self {
        Self {
            placemarks: vec![None; placemarks],
            overlays: vec![None; overlays],
            containers: containers.iter().map(Self::for_container).collect(),
        }
    }

    /// Nested container state by index path from this node.
    #[must_use]
    pub fn descendant(&self, path: &[usize]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |node, &index| node.containers.get(index))
    }

    /// Primitives currently held by this node and its descendants.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        let placemarks: usize = self
            .placemarks
            .iter()
            .flatten()
            .map(RenderedHandle::leaf_count)
            .sum();
        let overlays = self.overlays.iter().flatten().count();
        let children: usize = self.containers.iter().map(Self::primitive_count).sum();
        placemarks + overlays + children
    }

    /// Placemark slots holding a handle, in this node and its descendants.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.placemarks.iter().flatten().count()
            + self
                .containers
                .iter()
                .map(Self::handle_count)
                .sum::<usize>()
    }

    /// Remove every primitive from `surface` and empty every slot. Returns
    /// the number of removals.
    pub fn remove_all<S: MapSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut removed = 0;
        for handle in self.placemarks.iter_mut().filter_map(Option::take) {
            removed += handle.remove_from(surface);
        }
        for id in self.overlays.iter_mut().filter_map(Option::take) {
            surface.remove_primitive(id);
            removed += 1;
        }
        for child in &mut self.containers {
            removed += child.remove_all(surface);
        }
        removed
    }
}
