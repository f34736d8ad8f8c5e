//! The layer controller
//!
//! Owns a stored document and everything derived from it while the layer is
//! shown: the merged root style registry, the rendered state tree, and the
//! pending download queues.
//!
//! # Lifecycle
//!
//! 1. `store_data` - take the document, render nothing
//! 2. `activate` - draw the whole document, queue and trigger downloads
//! 3. asset-ready callbacks patch what is already drawn
//! 4. `deactivate` - remove every primitive
//!
//! `retarget` runs 4 then 2 against a different surface.

use std::sync::mpsc::Receiver;

use kmlayer_common::warning::{LOG_TARGET, warn_once};
use kmlayer_model::{Container, KmlDocument, Placemark, container_visible, placemark_visible};
use kmlayer_style::StyleRegistry;

use crate::assets::{AssetDeferralCoordinator, AssetSource, PendingDownloads};
use crate::config::LayerConfig;
use crate::events::{AssetEvent, AssetNotifier, LayerEvent, LayerListener};
use crate::geometry::GeometryRenderer;
use crate::overlay::GroundOverlayCoordinator;
use crate::rendered::RenderedContainer;
use crate::surface::{MapSurface, RenderedHandle};

/// Renders one KML document onto one map surface at a time.
pub struct LayerController<S: MapSurface, A: AssetSource> {
    surface: S,
    assets: A,
    config: LayerConfig,
    document: KmlDocument,
    registry: StyleRegistry,
    rendered: RenderedContainer,
    icons: AssetDeferralCoordinator,
    overlays: GroundOverlayCoordinator,
    active: bool,
    icons_flushed: bool,
    overlays_flushed: bool,
    listeners: Vec<LayerListener>,
    notifier: AssetNotifier,
    asset_events: Receiver<AssetEvent>,
}

impl<S: MapSurface, A: AssetSource> LayerController<S, A> {
    /// Controller with the default configuration.
    #[must_use]
    pub fn new(surface: S, assets: A) -> Self {
        Self::with_config(surface, assets, LayerConfig::default())
    }

    /// Controller with an explicit configuration.
    #[must_use]
    pub fn with_config(surface: S, mut assets: A, config: LayerConfig) -> Self {
        let (notifier, asset_events) = AssetNotifier::channel();
        assets.connect(notifier.clone());
        Self {
            surface,
            assets,
            icons: AssetDeferralCoordinator::new(config.force_icon_refresh),
            overlays: GroundOverlayCoordinator::new(),
            config,
            document: KmlDocument::default(),
            registry: StyleRegistry::new(),
            rendered: RenderedContainer::default(),
            active: false,
            icons_flushed: false,
            overlays_flushed: false,
            listeners: Vec::new(),
            notifier,
            asset_events,
        }
    }

    /// Take a new document. Nothing is drawn until [`Self::activate`]. A
    /// layer that is currently shown is deactivated first.
    pub fn store_data(&mut self, document: KmlDocument) {
        if self.active {
            self.deactivate();
        }
        log::debug!(
            target: LOG_TARGET,
            "stored document with {} placemarks and {} ground overlays",
            document.placemark_count(),
            document.ground_overlay_count()
        );
        self.document = document;
        self.rendered = RenderedContainer::default();
        self.icons.clear();
        self.overlays.clear();
        self.icons_flushed = false;
        self.overlays_flushed = false;
    }

    /// Draw the stored document. Does nothing if the layer is already shown.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }

        self.registry =
            StyleRegistry::from_tables(&self.document.styles, &self.document.style_maps);
        self.rendered = RenderedContainer::for_document(&self.document);

        let _ = self.overlays.collect(
            &mut self.surface,
            &self.assets,
            &self.document,
            &mut self.rendered,
        );

        let mut renderer = GeometryRenderer::new(&mut self.surface, &self.assets, &mut self.icons);
        render_containers(
            &mut renderer,
            &self.document.containers,
            &mut self.rendered.containers,
            &self.registry,
            true,
        );
        render_placemarks(
            &mut renderer,
            &self.document.placemarks,
            &mut self.rendered.placemarks,
            &self.registry,
            true,
        );

        if !self.overlays_flushed {
            let _ = self.overlays.flush_pending(&mut self.assets);
            self.overlays_flushed = true;
        }

        self.active = true;

        if !self.icons_flushed || self.config.force_icon_refresh {
            let _ = self.icons.flush_pending(&mut self.assets);
            self.icons_flushed = true;
        }

        log::info!(
            target: LOG_TARGET,
            "layer activated with {} primitives",
            self.rendered.primitive_count()
        );
        self.emit(LayerEvent::Activated);
    }

    /// Remove every primitive and forget the merged styles. Does nothing if
    /// the layer is not shown.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        let removed = self.rendered.remove_all(&mut self.surface);
        self.rendered = RenderedContainer::default();
        self.registry.clear();
        self.active = false;
        log::info!(target: LOG_TARGET, "layer deactivated, removed {removed} primitives");
        self.emit(LayerEvent::Deactivated);
    }

    /// Move the layer to `surface`: remove everything from the current
    /// surface, swap, and draw on the new one. Returns the old surface.
    pub fn retarget(&mut self, surface: S) -> S {
        self.deactivate();
        let previous = std::mem::replace(&mut self.surface, surface);
        self.activate();
        previous
    }

    /// The icon at `url` is now cached. Ignored when the layer is not shown.
    /// Returns the number of markers patched.
    pub fn on_icon_ready(&mut self, url: &str) -> usize {
        if !self.active {
            log::debug!(target: LOG_TARGET, "ignoring icon {url} for inactive layer");
            return 0;
        }
        let Some(image) = self.assets.lookup(url) else {
            warn_once("icon", &format!("icon {url} reported ready but is not cached"));
            return 0;
        };
        self.icons.on_icon_ready(
            &mut self.surface,
            &image,
            url,
            &self.document,
            &self.registry,
            &self.rendered,
        )
    }

    /// The overlay image at `url` is now cached. Ignored when the layer is
    /// not shown. Returns the number of overlays drawn.
    pub fn on_overlay_ready(&mut self, url: &str) -> usize {
        if !self.active {
            log::debug!(target: LOG_TARGET, "ignoring overlay {url} for inactive layer");
            return 0;
        }
        self.overlays.on_overlay_ready(
            &mut self.surface,
            &self.assets,
            url,
            &self.document,
            &mut self.rendered,
        )
    }

    /// Notifier for posting asset-ready events from any thread.
    #[must_use]
    pub fn asset_notifier(&self) -> AssetNotifier {
        self.notifier.clone()
    }

    /// Apply every queued asset-ready event. Returns the number of events
    /// applied.
    pub fn process_asset_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.asset_events.try_recv() {
            let _ = match &event {
                AssetEvent::IconReady(url) => self.on_icon_ready(url),
                AssetEvent::OverlayReady(url) => self.on_overlay_ready(url),
            };
            applied += 1;
        }
        applied
    }

    /// Register a lifecycle listener.
    pub fn subscribe(&mut self, listener: impl FnMut(LayerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: LayerEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Whether the layer is shown.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// The surface currently drawn on.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The asset collaborator.
    #[must_use]
    pub const fn assets(&self) -> &A {
        &self.assets
    }

    /// Mutable access to the asset collaborator.
    pub const fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    /// The stored document.
    #[must_use]
    pub const fn document(&self) -> &KmlDocument {
        &self.document
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Rendered state of the document root, with nested container state
    /// under `containers`.
    #[must_use]
    pub const fn rendered(&self) -> &RenderedContainer {
        &self.rendered
    }

    /// The merged root style registry (empty while inactive).
    #[must_use]
    pub const fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Icon URLs waiting for a download trigger.
    #[must_use]
    pub const fn pending_icon_urls(&self) -> &PendingDownloads {
        self.icons.pending()
    }

    /// Overlay URLs waiting for a download trigger.
    #[must_use]
    pub const fn pending_overlay_urls(&self) -> &PendingDownloads {
        self.overlays.pending()
    }
}

fn render_placemarks<S: MapSurface + ?Sized, A: AssetSource + ?Sized>(
    renderer: &mut GeometryRenderer<'_, S, A>,
    placemarks: &[Placemark],
    slots: &mut [Option<RenderedHandle>],
    registry: &StyleRegistry,
    parent_visible: bool,
) {
    for (placemark, slot) in placemarks.iter().zip(slots.iter_mut()) {
        let Some(geometry) = &placemark.geometry else {
            *slot = None;
            continue;
        };
        let visible = parent_visible && placemark_visible(placemark);
        let shared = registry
            .lookup(placemark.style_url.as_deref())
            .unwrap_or_default();
        *slot = Some(renderer.render(
            placemark,
            geometry,
            &shared,
            placemark.inline_style.as_ref(),
            visible,
        ));
    }
}

/// Depth-first: a container's own placemarks, then its children, each with
/// the container's styles merged over its parent's.
fn render_containers<S: MapSurface + ?Sized, A: AssetSource + ?Sized>(
    renderer: &mut GeometryRenderer<'_, S, A>,
    containers: &[Container],
    states: &mut [RenderedContainer],
    registry: &StyleRegistry,
    parent_visible: bool,
) {
    for (container, state) in containers.iter().zip(states.iter_mut()) {
        let visible = container_visible(container, parent_visible);
        let scope = registry.scope(&container.styles, &container.style_maps);
        render_placemarks(
            renderer,
            &container.placemarks,
            &mut state.placemarks,
            &scope,
            visible,
        );
        render_containers(
            renderer,
            &container.containers,
            &mut state.containers,
            &scope,
            visible,
        );
    }
}
