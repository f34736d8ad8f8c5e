//! Deferred icon assets
//!
//! Icons are looked up in the asset collaborator's cache while rendering.
//! A miss leaves the marker on its default icon and queues the URL; the queue
//! is flushed into download triggers once per load. When a download lands,
//! every point whose resolved icon URL matches is patched in place.

use std::collections::BTreeSet;
use std::sync::Arc;

use kmlayer_common::LoadedImage;
use kmlayer_common::warning::LOG_TARGET;
use kmlayer_model::{Container, KmlDocument, Placemark};
use kmlayer_style::{IconDescriptor, Style, StyleAttr, StyleRegistry};

use crate::events::{AssetKind, AssetNotifier};
use crate::rendered::RenderedContainer;
use crate::surface::{MapSurface, RenderedHandle};

/// The image cache and download collaborator.
pub trait AssetSource {
    /// Cached, decoded image for `url`. Must not block.
    fn lookup(&self, url: &str) -> Option<LoadedImage>;

    /// Start downloading `url` and return immediately. Completion is
    /// reported later as an asset-ready callback.
    fn trigger_download(&mut self, url: &str, kind: AssetKind);

    /// Receive the notifier to post completions through. Called once when
    /// the source is handed to a layer controller.
    fn connect(&mut self, _notifier: AssetNotifier) {}
}

/// De-duplicated set of URLs waiting for a download trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownloads {
    kind: AssetKind,
    urls: BTreeSet<String>,
}

impl PendingDownloads {
    /// Empty queue for assets of `kind`.
    #[must_use]
    pub const fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            urls: BTreeSet::new(),
        }
    }

    /// Queue `url`. Returns false if it was already queued.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    /// Drop `url` from the queue. Returns true if it was queued.
    pub fn remove(&mut self, url: &str) -> bool {
        self.urls.remove(url)
    }

    /// Whether `url` is queued.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Queued URLs in sorted order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    /// Number of queued URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Trigger one download per queued URL and empty the queue. Returns the
    /// number of triggers.
    pub fn flush<A: AssetSource + ?Sized>(&mut self, assets: &mut A) -> usize {
        let urls = std::mem::take(&mut self.urls);
        for url in &urls {
            log::debug!(target: LOG_TARGET, "downloading {} {url}", self.kind);
            assets.trigger_download(url, self.kind);
        }
        urls.len()
    }

    /// Empty the queue without triggering anything.
    pub fn clear(&mut self) {
        self.urls.clear();
    }
}

/// The icon a point uses, after inline/shared resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconRef<'a> {
    /// Icon image URL.
    pub url: &'a str,
    /// Scale from the style that supplied the URL.
    pub scale: f64,
}

/// Resolve a point's icon: the inline style's icon URL when it sets one,
/// otherwise the shared style's. Empty URLs count as unset.
#[must_use]
pub fn resolve_icon<'a>(shared: &'a Style, inline: Option<&'a Style>) -> Option<IconRef<'a>> {
    let from_style = |style: &'a Style| {
        style
            .icon_url()
            .filter(|url| !url.is_empty())
            .map(|url| IconRef {
                url,
                scale: style.icon_scale(),
            })
    };
    inline
        .filter(|style| style.is_set(StyleAttr::IconUrl))
        .and_then(from_style)
        .or_else(|| from_style(shared))
}

/// Tracks pending icon downloads and patches markers when icons arrive.
#[derive(Debug, Clone)]
pub struct AssetDeferralCoordinator {
    pending: PendingDownloads,
    force_refresh: bool,
}

impl Default for AssetDeferralCoordinator {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AssetDeferralCoordinator {
    /// New coordinator. With `force_refresh`, cached icons are ignored and
    /// every requested icon is downloaded again.
    #[must_use]
    pub const fn new(force_refresh: bool) -> Self {
        Self {
            pending: PendingDownloads::new(AssetKind::Icon),
            force_refresh,
        }
    }

    /// Icon for `url` if it can be used right now; otherwise queue the URL
    /// and return `None`.
    pub fn request_icon<A: AssetSource + ?Sized>(
        &mut self,
        assets: &A,
        url: &str,
    ) -> Option<LoadedImage> {
        if !self.force_refresh
            && let Some(image) = assets.lookup(url)
        {
            return Some(image);
        }
        let _ = self.pending.insert(url);
        None
    }

    /// Trigger one download per pending icon URL and clear the queue.
    pub fn flush_pending<A: AssetSource + ?Sized>(&mut self, assets: &mut A) -> usize {
        self.pending.flush(assets)
    }

    /// Pending icon URLs.
    #[must_use]
    pub const fn pending(&self) -> &PendingDownloads {
        &self.pending
    }

    /// Drop all pending icon URLs.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// An icon finished downloading: set the scaled bitmap on every rendered
    /// point, root and nested, whose resolved icon URL is `url`. Returns the
    /// number of markers patched.
    pub fn on_icon_ready<S: MapSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        image: &LoadedImage,
        url: &str,
        document: &KmlDocument,
        registry: &StyleRegistry,
        rendered: &RenderedContainer,
    ) -> usize {
        let _ = self.pending.remove(url);
        let patch = IconPatch { image, url };
        patch.placemarks(surface, &document.placemarks, &rendered.placemarks, registry)
            + patch.containers(surface, &document.containers, &rendered.containers, registry)
    }
}

struct IconPatch<'a> {
    image: &'a LoadedImage,
    url: &'a str,
}

impl IconPatch<'_> {
    fn placemarks<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        placemarks: &[Placemark],
        handles: &[Option<RenderedHandle>],
        registry: &StyleRegistry,
    ) -> usize {
        let mut patched = 0;
        for (placemark, handle) in placemarks.iter().zip(handles) {
            let Some(handle) = handle else {
                continue;
            };
            let shared: Arc<Style> = registry
                .lookup(placemark.style_url.as_deref())
                .unwrap_or_default();
            let Some(icon) = resolve_icon(&shared, placemark.inline_style.as_ref()) else {
                continue;
            };
            if icon.url != self.url {
                continue;
            }
            let points = handle.point_ids();
            if points.is_empty() {
                continue;
            }
            let scaled = self.image.scaled(icon.scale);
            for id in points {
                surface.set_point_icon(id, IconDescriptor::Bitmap(scaled.clone()));
                patched += 1;
            }
        }
        patched
    }

    fn containers<S: MapSurface + ?Sized>(
        &self,
        surface: &mut S,
        containers: &[Container],
        rendered: &[RenderedContainer],
        registry: &StyleRegistry,
    ) -> usize {
        let mut patched = 0;
        for (container, state) in containers.iter().zip(rendered) {
            let scope = registry.scope(&container.styles, &container.style_maps);
            patched += self.placemarks(surface, &container.placemarks, &state.placemarks, &scope);
            patched += self.containers(surface, &container.containers, &state.containers, &scope);
        }
        patched
    }
}
