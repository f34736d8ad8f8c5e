//! Ground overlay images
//!
//! Overlays follow the same cache-or-queue pattern as icons, but an overlay
//! is only drawn once its image exists: there is no placeholder primitive.
//! Overlays missing an image URL or a bounding box are skipped for good.

use kmlayer_common::LoadedImage;
use kmlayer_common::warning::warn_once;
use kmlayer_model::{
    Container, GroundOverlay, KmlDocument, NAME_PROPERTY, container_visible, overlay_visible,
};
use kmlayer_style::GroundOverlayOptions;

use crate::assets::{AssetSource, PendingDownloads};
use crate::events::AssetKind;
use crate::rendered::RenderedContainer;
use crate::surface::{MapSurface, PrimitiveId};

/// Tracks pending overlay images and draws overlays when they arrive.
#[derive(Debug, Clone)]
pub struct GroundOverlayCoordinator {
    pending: PendingDownloads,
}

impl Default for GroundOverlayCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl GroundOverlayCoordinator {
    /// Coordinator with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: PendingDownloads::new(AssetKind::Overlay),
        }
    }

    /// Walk every overlay in the document. Cached images are drawn now with
    /// their effective visibility; the rest are queued. Returns the number
    /// of overlays drawn.
    pub fn collect<S: MapSurface + ?Sized, A: AssetSource + ?Sized>(
        &mut self,
        surface: &mut S,
        assets: &A,
        document: &KmlDocument,
        rendered: &mut RenderedContainer,
    ) -> usize {
        let mut pass = OverlayPass {
            surface,
            assets,
            pending: Some(&mut self.pending),
            only_url: None,
        };
        pass.level(
            &document.ground_overlays,
            &document.containers,
            rendered,
            true,
        )
    }

    /// Trigger one download per pending overlay URL and clear the queue.
    pub fn flush_pending<A: AssetSource + ?Sized>(&mut self, assets: &mut A) -> usize {
        self.pending.flush(assets)
    }

    /// Pending overlay URLs.
    #[must_use]
    pub const fn pending(&self) -> &PendingDownloads {
        &self.pending
    }

    /// Drop all pending overlay URLs.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// An overlay image finished downloading: draw every overlay, root and
    /// nested, that uses `url`. Overlays already drawn are replaced. Returns
    /// the number of overlays drawn.
    pub fn on_overlay_ready<S: MapSurface + ?Sized, A: AssetSource + ?Sized>(
        &mut self,
        surface: &mut S,
        assets: &A,
        url: &str,
        document: &KmlDocument,
        rendered: &mut RenderedContainer,
    ) -> usize {
        let _ = self.pending.remove(url);
        let mut pass = OverlayPass {
            surface,
            assets,
            pending: None,
            only_url: Some(url),
        };
        pass.level(
            &document.ground_overlays,
            &document.containers,
            rendered,
            true,
        )
    }
}

/// One traversal of the overlay tree. While collecting, cache misses go to
/// `pending`; when reacting to a download, only `only_url` is drawn.
struct OverlayPass<'a, S: ?Sized, A: ?Sized> {
    surface: &'a mut S,
    assets: &'a A,
    pending: Option<&'a mut PendingDownloads>,
    only_url: Option<&'a str>,
}

impl<S: MapSurface + ?Sized, A: AssetSource + ?Sized> OverlayPass<'_, S, A> {
    fn level(
        &mut self,
        overlays: &[GroundOverlay],
        containers: &[Container],
        rendered: &mut RenderedContainer,
        visible: bool,
    ) -> usize {
        let mut drawn = 0;
        for (overlay, slot) in overlays.iter().zip(rendered.overlays.iter_mut()) {
            if self.overlay(overlay, slot, visible) {
                drawn += 1;
            }
        }
        for (container, child) in containers.iter().zip(rendered.containers.iter_mut()) {
            let child_visible = container_visible(container, visible);
            drawn += self.level(
                &container.ground_overlays,
                &container.containers,
                child,
                child_visible,
            );
        }
        drawn
    }

    fn overlay(
        &mut self,
        overlay: &GroundOverlay,
        slot: &mut Option<PrimitiveId>,
        parent_visible: bool,
    ) -> bool {
        let (Some(url), Some(options)) = (overlay.image_url.as_deref(), overlay.overlay_options())
        else {
            if self.pending.is_some() {
                let name = overlay
                    .properties
                    .get(NAME_PROPERTY)
                    .map_or("<unnamed>", String::as_str);
                warn_once(
                    "overlay",
                    &format!("ground overlay {name:?} has no image URL or bounding box, skipped"),
                );
            }
            return false;
        };
        if self.only_url.is_some_and(|only| only != url) {
            return false;
        }
        let Some(image) = self.assets.lookup(url) else {
            if let Some(pending) = self.pending.as_deref_mut() {
                let _ = pending.insert(url);
            }
            return false;
        };
        let visible = overlay_visible(overlay, parent_visible);
        draw(&mut *self.surface, &image, options, slot, visible);
        true
    }
}

fn draw<S: MapSurface + ?Sized>(
    surface: &mut S,
    image: &LoadedImage,
    options: GroundOverlayOptions,
    slot: &mut Option<PrimitiveId>,
    visible: bool,
) {
    if let Some(previous) = slot.take() {
        surface.remove_primitive(previous);
    }
    let id = surface.add_image_overlay(image, options);
    if !visible {
        surface.set_primitive_visible(id, false);
    }
    *slot = Some(id);
}
