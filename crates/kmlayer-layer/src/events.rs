//! Asset-ready events and layer lifecycle events
//!
//! Downloads finish on whatever thread the asset collaborator uses. They
//! never touch layer state directly: they post an [`AssetEvent`] through an
//! [`AssetNotifier`], and the controller applies queued events on its own
//! thread in `process_asset_events`.

use std::sync::mpsc::{self, Receiver, Sender};

use strum_macros::{AsRefStr, Display};

/// What a downloaded asset is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AssetKind {
    /// A point marker icon.
    Icon,
    /// A ground overlay image.
    Overlay,
}

/// An asset became available in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    /// Icon at this URL is cached.
    IconReady(String),
    /// Ground overlay image at this URL is cached.
    OverlayReady(String),
}

impl AssetEvent {
    /// Ready event for an asset of `kind`.
    #[must_use]
    pub fn ready(kind: AssetKind, url: &str) -> Self {
        match kind {
            AssetKind::Icon => Self::IconReady(url.to_string()),
            AssetKind::Overlay => Self::OverlayReady(url.to_string()),
        }
    }

    /// The asset URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::IconReady(url) | Self::OverlayReady(url) => url,
        }
    }

    /// The asset kind.
    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        match self {
            Self::IconReady(_) => AssetKind::Icon,
            Self::OverlayReady(_) => AssetKind::Overlay,
        }
    }
}

/// Sending half of the asset event queue. Cheap to clone, safe to move to
/// download threads.
#[derive(Debug, Clone)]
pub struct AssetNotifier {
    sender: Sender<AssetEvent>,
}

impl AssetNotifier {
    /// A new queue: the notifier and the receiving end.
    #[must_use]
    pub fn channel() -> (Self, Receiver<AssetEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    /// Post an event. Returns false if the receiving layer is gone.
    #[must_use]
    pub fn notify(&self, event: AssetEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    /// Post [`AssetEvent::IconReady`].
    #[must_use]
    pub fn icon_ready(&self, url: &str) -> bool {
        self.notify(AssetEvent::IconReady(url.to_string()))
    }

    /// Post [`AssetEvent::OverlayReady`].
    #[must_use]
    pub fn overlay_ready(&self, url: &str) -> bool {
        self.notify(AssetEvent::OverlayReady(url.to_string()))
    }
}

/// Layer lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum LayerEvent {
    /// The layer finished an activation pass and is shown.
    Activated,
    /// The layer removed all its primitives.
    Deactivated,
}

/// Callback registered with `LayerController::subscribe`.
pub type LayerListener = Box<dyn FnMut(LayerEvent)>;
