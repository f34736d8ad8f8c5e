//! KML layer rendering onto a generic map surface.
//!
//! # Scope
//!
//! This crate provides:
//! - **Layer Controller** - store a document, activate, deactivate, retarget
//! - **Geometry Rendering** - points, lines, polygons, and flattened
//!   multi-geometries with shared and inline style resolution
//! - **Deferred Assets** - icon and ground overlay downloads, de-duplicated,
//!   patched in place when they arrive
//! - **Event Queue** - asset-ready events marshalled from download threads
//! - **Threaded Loader** - a ready-made asset source backed by `reqwest`
//!   and the `image` crate
//!
//! # Not Yet Implemented
//!
//! - Network links and region-based loading
//! - Screen overlays and photo overlays
//! - Highlight styles (style maps resolve their normal target only)
//!
//! # Example
//!
//! ```ignore
//! let mut layer = LayerController::new(surface, ThreadedImageLoader::new());
//! layer.store_data(document);
//! layer.activate();
//! // later, on the UI thread:
//! layer.process_asset_events();
//! ```

/// Pending downloads and icon patching.
pub mod assets;
/// Layer configuration.
pub mod config;
/// The layer controller.
pub mod controller;
/// Asset-ready and lifecycle events.
pub mod events;
/// Geometry to surface primitives.
pub mod geometry;
/// Threaded image loader.
pub mod loader;
/// Ground overlay images.
pub mod overlay;
/// Rendered state tree.
pub mod rendered;
/// Map surface trait and primitive handles.
pub mod surface;

pub use assets::{AssetDeferralCoordinator, AssetSource, IconRef, PendingDownloads, resolve_icon};
pub use config::LayerConfig;
pub use controller::LayerController;
pub use events::{AssetEvent, AssetKind, AssetNotifier, LayerEvent, LayerListener};
pub use geometry::GeometryRenderer;
pub use loader::{LoadError, SharedImageCache, ThreadedImageLoader, load_image};
pub use overlay::GroundOverlayCoordinator;
pub use rendered::RenderedContainer;
pub use surface::{MapSurface, PrimitiveId, RenderedHandle};

pub use kmlayer_common as common;
pub use kmlayer_model as model;
pub use kmlayer_style as style;
