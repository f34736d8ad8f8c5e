//! Recording fakes for the map surface and asset collaborators.

#![allow(dead_code)]

use std::collections::HashMap;

use kmlayer_common::LoadedImage;
use kmlayer_layer::{AssetKind, AssetNotifier, AssetSource, MapSurface, PrimitiveId};
use kmlayer_style::{
    GroundOverlayOptions, IconDescriptor, MarkerOptions, PolygonOptions, PolylineOptions,
};

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddPoint(PrimitiveId, MarkerOptions),
    AddLine(PrimitiveId, PolylineOptions),
    AddPolygon(PrimitiveId, PolygonOptions),
    AddOverlay(PrimitiveId, GroundOverlayOptions),
    Remove(PrimitiveId),
    SetVisible(PrimitiveId, bool),
    SetIcon(PrimitiveId, IconDescriptor),
}

/// Surface that records every call and hands out sequential ids.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id: u64,
    pub calls: Vec<Call>,
}

impl RecordingSurface {
    /// Surface whose first primitive id is `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            next_id: first_id,
            calls: Vec::new(),
        }
    }

    fn issue(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of `add_*` calls.
    pub fn creations(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    Call::AddPoint(..) | Call::AddLine(..) | Call::AddPolygon(..) | Call::AddOverlay(..)
                )
            })
            .count()
    }

    /// Number of `remove_primitive` calls.
    pub fn removals(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Remove(_)))
            .count()
    }

    /// Ids passed to `remove_primitive`, in order.
    pub fn removed_ids(&self) -> Vec<PrimitiveId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Remove(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Number of `set_point_icon` calls.
    pub fn icon_updates(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::SetIcon(..)))
            .count()
    }

    /// Last visibility set on `id`, if any.
    pub fn visibility(&self, id: PrimitiveId) -> Option<bool> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::SetVisible(target, visible) if *target == id => Some(*visible),
            _ => None,
        })
    }

    /// Options a point was created with.
    pub fn point(&self, id: PrimitiveId) -> Option<&MarkerOptions> {
        self.calls.iter().find_map(|call| match call {
            Call::AddPoint(target, options) if *target == id => Some(options),
            _ => None,
        })
    }

    /// Options a line was created with.
    pub fn line(&self, id: PrimitiveId) -> Option<&PolylineOptions> {
        self.calls.iter().find_map(|call| match call {
            Call::AddLine(target, options) if *target == id => Some(options),
            _ => None,
        })
    }

    /// Options a polygon was created with.
    pub fn polygon(&self, id: PrimitiveId) -> Option<&PolygonOptions> {
        self.calls.iter().find_map(|call| match call {
            Call::AddPolygon(target, options) if *target == id => Some(options),
            _ => None,
        })
    }

    /// Current icon of a point: the last `set_point_icon`, else its creation icon.
    pub fn icon(&self, id: PrimitiveId) -> Option<&IconDescriptor> {
        self.calls
            .iter()
            .rev()
            .find_map(|call| match call {
                Call::SetIcon(target, icon) if *target == id => Some(icon),
                _ => None,
            })
            .or_else(|| self.point(id).map(|options| &options.icon))
    }

    /// Ids of every created overlay, in creation order.
    pub fn overlay_ids(&self) -> Vec<PrimitiveId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::AddOverlay(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn add_point(&mut self, options: MarkerOptions) -> PrimitiveId {
        let id = self.issue();
        self.calls.push(Call::AddPoint(id, options));
        id
    }

    fn add_line(&mut self, options: PolylineOptions) -> PrimitiveId {
        let id = self.issue();
        self.calls.push(Call::AddLine(id, options));
        id
    }

    fn add_polygon(&mut self, options: PolygonOptions) -> PrimitiveId {
        let id = self.issue();
        self.calls.push(Call::AddPolygon(id, options));
        id
    }

    fn add_image_overlay(
        &mut self,
        _image: &LoadedImage,
        options: GroundOverlayOptions,
    ) -> PrimitiveId {
        let id = self.issue();
        self.calls.push(Call::AddOverlay(id, options));
        id
    }

    fn remove_primitive(&mut self, id: PrimitiveId) {
        self.calls.push(Call::Remove(id));
    }

    fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool) {
        self.calls.push(Call::SetVisible(id, visible));
    }

    fn set_point_icon(&mut self, id: PrimitiveId, icon: IconDescriptor) {
        self.calls.push(Call::SetIcon(id, icon));
    }
}

/// Asset source with an in-memory cache that records download triggers.
#[derive(Debug, Default)]
pub struct FakeAssets {
    pub cache: HashMap<String, LoadedImage>,
    pub triggers: Vec<(String, AssetKind)>,
    pub notifier: Option<AssetNotifier>,
}

impl FakeAssets {
    /// Pre-populate the cache.
    pub fn with_image(mut self, url: &str, image: LoadedImage) -> Self {
        self.store(url, image);
        self
    }

    /// Put an image in the cache, as a finished download would.
    pub fn store(&mut self, url: &str, image: LoadedImage) {
        let _ = self.cache.insert(url.to_string(), image);
    }

    /// Number of triggers for `url`.
    pub fn triggers_for(&self, url: &str) -> usize {
        self.triggers.iter().filter(|(u, _)| u == url).count()
    }
}

impl AssetSource for FakeAssets {
    fn lookup(&self, url: &str) -> Option<LoadedImage> {
        self.cache.get(url).cloned()
    }

    fn trigger_download(&mut self, url: &str, kind: AssetKind) {
        self.triggers.push((url.to_string(), kind));
    }

    fn connect(&mut self, notifier: AssetNotifier) {
        self.notifier = Some(notifier);
    }
}

/// A small opaque image.
pub fn icon_image(size: u32) -> LoadedImage {
    LoadedImage::solid(size, size, [255, 0, 0, 255])
}
