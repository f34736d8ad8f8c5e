//! Threaded image loader: a ready-made [`AssetSource`]
//!
//! Each download runs on its own thread: fetch (HTTP, `data:` URL, or local
//! file), decode, store in a shared cache, then post an asset-ready event.
//! The layer applies the event on its own thread.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use image::ImageError;
use kmlayer_common::LoadedImage;
use kmlayer_common::net::{FetchError, fetch_image_bytes};
use kmlayer_common::warning::LOG_TARGET;
use thiserror::Error;

use crate::assets::AssetSource;
use crate::events::{AssetEvent, AssetKind, AssetNotifier};

/// Failure to load an image asset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The bytes are not a supported image.
    #[error("could not decode image from {url}: {source}")]
    Decode {
        /// Asset URL.
        url: String,
        /// Decoder error.
        source: ImageError,
    },
}

/// Fetch and decode the image at `url`.
///
/// # Errors
///
/// Returns [`LoadError::Fetch`] if the bytes cannot be read and
/// [`LoadError::Decode`] if they are not a supported image.
pub fn load_image(url: &str) -> Result<LoadedImage, LoadError> {
    let bytes = fetch_image_bytes(url)?;
    LoadedImage::decode(&bytes).map_err(|source| LoadError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Decoded images by URL, shared between download threads and the layer.
#[derive(Debug, Clone, Default)]
pub struct SharedImageCache {
    images: Arc<Mutex<HashMap<String, LoadedImage>>>,
}

impl SharedImageCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an image. Returns the image previously stored for `url`.
    #[must_use]
    pub fn insert(&self, url: &str, image: LoadedImage) -> Option<LoadedImage> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), image)
    }

    /// Copy of the image stored for `url`.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<LoadedImage> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Whether an image is stored for `url`.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`AssetSource`] that downloads on background threads into a
/// [`SharedImageCache`].
#[derive(Debug, Clone, Default)]
pub struct ThreadedImageLoader {
    cache: SharedImageCache,
    notifier: Option<AssetNotifier>,
}

impl ThreadedImageLoader {
    /// Loader with its own empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader filling `cache`.
    #[must_use]
    pub const fn with_cache(cache: SharedImageCache) -> Self {
        Self {
            cache,
            notifier: None,
        }
    }

    /// The cache this loader fills.
    #[must_use]
    pub const fn cache(&self) -> &SharedImageCache {
        &self.cache
    }
}

impl AssetSource for ThreadedImageLoader {
    fn lookup(&self, url: &str) -> Option<LoadedImage> {
        self.cache.get(url)
    }

    fn trigger_download(&mut self, url: &str, kind: AssetKind) {
        let cache = self.cache.clone();
        let notifier = self.notifier.clone();
        let url = url.to_string();

        let spawned = thread::Builder::new()
            .name(format!("kmlayer-{kind}"))
            .spawn(move || match load_image(&url) {
                Ok(image) => {
                    let _ = cache.insert(&url, image);
                    if let Some(notifier) = notifier
                        && !notifier.notify(AssetEvent::ready(kind, &url))
                    {
                        log::debug!(target: LOG_TARGET, "{kind} {url} loaded after its layer was dropped");
                    }
                }
                Err(err) => {
                    log::warn!(target: LOG_TARGET, "failed to load {kind} {url}: {err}");
                }
            });

        if let Err(err) = spawned {
            log::warn!(target: LOG_TARGET, "could not start download thread: {err}");
        }
    }

    fn connect(&mut self, notifier: AssetNotifier) {
        self.notifier = Some(notifier);
    }
}
