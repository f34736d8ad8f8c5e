//! Geometry to surface primitives
//!
//! A placemark's geometry is drawn with its shared style (the registry
//! entry its style reference resolves to). An inline style then overrides
//! only the attributes it explicitly sets. The info window always comes
//! from the shared style. Visibility is applied to every primitive right
//! after it is created.

use kmlayer_common::LatLng;
use kmlayer_model::{Geometry, Placemark};
use kmlayer_style::{
    IconDescriptor, MarkerOptions, PolygonOptions, PolylineOptions, Style, StyleAttr,
    substitute_template,
};

use crate::assets::{AssetDeferralCoordinator, AssetSource, resolve_icon};
use crate::surface::{MapSurface, PrimitiveId, RenderedHandle};

/// Draws placemark geometry onto a surface.
pub struct GeometryRenderer<'a, S: MapSurface + ?Sized, A: AssetSource + ?Sized> {
    surface: &'a mut S,
    assets: &'a A,
    icons: &'a mut AssetDeferralCoordinator,
}

impl<'a, S: MapSurface + ?Sized, A: AssetSource + ?Sized> GeometryRenderer<'a, S, A> {
    /// Renderer drawing onto `surface`, resolving icons through `assets`.
    pub fn new(
        surface: &'a mut S,
        assets: &'a A,
        icons: &'a mut AssetDeferralCoordinator,
    ) -> Self {
        Self {
            surface,
            assets,
            icons,
        }
    }

    /// Draw `geometry` for `placemark` and return its handle.
    ///
    /// `MultiGeometry` children are drawn recursively and returned as one
    /// flat `Composite` in document order.
    pub fn render(
        &mut self,
        placemark: &Placemark,
        geometry: &Geometry,
        shared: &Style,
        inline: Option<&Style>,
        visible: bool,
    ) -> RenderedHandle {
        let handle = match geometry {
            Geometry::Point(position) => {
                RenderedHandle::Point(self.add_point(placemark, *position, shared, inline))
            }
            Geometry::LineString(points) => {
                RenderedHandle::Line(self.add_line(points, shared, inline))
            }
            Geometry::Polygon { outer, inner } => {
                RenderedHandle::Polygon(self.add_polygon(outer, inner, shared, inline))
            }
            Geometry::MultiGeometry(children) => {
                let mut leaves = Vec::with_capacity(geometry.leaf_count());
                for child in children {
                    match self.render(placemark, child, shared, inline, visible) {
                        RenderedHandle::Composite(nested) => leaves.extend(nested),
                        leaf => leaves.push(leaf),
                    }
                }
                return RenderedHandle::Composite(leaves);
            }
        };
        handle.set_visible_on(&mut *self.surface, visible);
        handle
    }

    fn add_point(
        &mut self,
        placemark: &Placemark,
        position: LatLng,
        shared: &Style,
        inline: Option<&Style>,
    ) -> PrimitiveId {
        let mut options = shared.marker_options(position);
        if let Some(inline) = inline {
            apply_inline_point_style(&mut options, inline);
        }
        if let Some(icon) = resolve_icon(shared, inline)
            && let Some(image) = self.icons.request_icon(self.assets, icon.url)
        {
            options.icon = IconDescriptor::Bitmap(image.scaled(icon.scale));
        }
        set_info_window(&mut options, shared, placemark);
        self.surface.add_point(options)
    }

    fn add_line(
        &mut self,
        points: &[LatLng],
        shared: &Style,
        inline: Option<&Style>,
    ) -> PrimitiveId {
        let mut options = shared.polyline_options(points.to_vec());
        match inline {
            Some(inline) => apply_inline_line_style(&mut options, inline),
            None if shared.is_line_random_color_mode() => {
                options.color = options.color.randomized();
            }
            None => {}
        }
        self.surface.add_line(options)
    }

    fn add_polygon(
        &mut self,
        outer: &[LatLng],
        inner: &[Vec<LatLng>],
        shared: &Style,
        inline: Option<&Style>,
    ) -> PrimitiveId {
        let mut options = shared.polygon_options(outer.to_vec(), inner.to_vec());
        match inline {
            Some(inline) => apply_inline_polygon_style(&mut options, inline),
            None if shared.is_poly_random_color_mode() => {
                options.fill_color = options.fill_color.randomized();
            }
            None => {}
        }
        self.surface.add_polygon(options)
    }
}

fn apply_inline_point_style(options: &mut MarkerOptions, inline: &Style) {
    if inline.is_set(StyleAttr::Heading) {
        options.rotation = inline.icon().heading;
    }
    if inline.is_set(StyleAttr::HotSpot) {
        options.anchor = inline.icon().hot_spot;
    }
    if inline.is_set(StyleAttr::MarkerColor) {
        options.icon = inline.marker_icon();
    }
}

fn apply_inline_line_style(options: &mut PolylineOptions, inline: &Style) {
    if inline.is_set(StyleAttr::OutlineColor) {
        options.color = inline.line().color;
    }
    if inline.is_set(StyleAttr::Width) {
        options.width = inline.line().width;
    }
    if inline.is_line_random_color_mode() {
        options.color = inline.line().color.randomized();
    }
}

fn apply_inline_polygon_style(options: &mut PolygonOptions, inline: &Style) {
    if inline.has_fill() && inline.is_set(StyleAttr::FillColor) {
        options.fill_color = inline.poly().color;
    }
    if inline.has_outline() {
        if inline.is_set(StyleAttr::OutlineColor) {
            options.stroke_color = inline.line().color;
        }
        if inline.is_set(StyleAttr::Width) {
            options.stroke_width = inline.line().width;
        }
    }
    if inline.is_poly_random_color_mode() {
        options.fill_color = inline.poly().color.randomized();
    }
}

/// Marker title and snippet, first match wins:
/// balloon text (templated), balloon style + name, name + description,
/// description alone.
fn set_info_window(options: &mut MarkerOptions, style: &Style, placemark: &Placemark) {
    if let Some(text) = style.balloon_text() {
        options.title = Some(substitute_template(text, &placemark.properties).text);
    } else if style.has_balloon_style()
        && let Some(name) = placemark.name()
    {
        options.title = Some(name.to_string());
    } else if let (Some(name), Some(description)) = (placemark.name(), placemark.description()) {
        options.title = Some(name.to_string());
        options.snippet = Some(description.to_string());
    } else if let Some(description) = placemark.description() {
        options.title = Some(description.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_for(style: &Style, placemark: &Placemark) -> MarkerOptions {
        let mut options = MarkerOptions::new(LatLng::new(0.0, 0.0));
        set_info_window(&mut options, style, placemark);
        options
    }

    #[test]
    fn test_info_window_balloon_text() {
        let style = Style::builder(None).balloon_text("$[name]!").build();
        let placemark = Placemark::new()
            .with_property("name", "Peak")
            .with_property("description", "tall");
        let options = marker_for(&style, &placemark);
        assert_eq!(options.title.as_deref(), Some("Peak!"));
        assert!(options.snippet.is_none());
    }

    #[test]
    fn test_info_window_balloon_style_uses_name() {
        let style = Style::builder(None).balloon_style().build();
        let placemark = Placemark::new()
            .with_property("name", "Peak")
            .with_property("description", "tall");
        let options = marker_for(&style, &placemark);
        assert_eq!(options.title.as_deref(), Some("Peak"));
        assert!(options.snippet.is_none());
    }

    #[test]
    fn test_info_window_name_and_description() {
        let placemark = Placemark::new()
            .with_property("name", "Peak")
            .with_property("description", "tall");
        let options = marker_for(&Style::default(), &placemark);
        assert_eq!(options.title.as_deref(), Some("Peak"));
        assert_eq!(options.snippet.as_deref(), Some("tall"));
    }

    #[test]
    fn test_info_window_description_only() {
        let placemark = Placemark::new().with_property("description", "tall");
        let options = marker_for(&Style::default(), &placemark);
        assert_eq!(options.title.as_deref(), Some("tall"));
    }

    #[test]
    fn test_info_window_name_only_sets_nothing() {
        let placemark = Placemark::new().with_property("name", "Peak");
        let options = marker_for(&Style::default(), &placemark);
        assert!(options.title.is_none());
        assert!(options.snippet.is_none());
    }

    #[test]
    fn test_inline_polygon_fill_needs_fill_enabled() {
        let shared = Style::builder(None)
            .fill_color(kmlayer_style::ColorValue::rgb(1, 1, 1))
            .build();
        let inline = Style::builder(None)
            .fill_color(kmlayer_style::ColorValue::rgb(9, 9, 9))
            .fill(false)
            .build();
        let mut options = shared.polygon_options(vec![], vec![]);
        apply_inline_polygon_style(&mut options, &inline);
        assert_eq!(options.fill_color, kmlayer_style::ColorValue::rgb(1, 1, 1));
    }

    #[test]
    fn test_inline_outline_needs_outline_enabled() {
        let shared = Style::builder(None).line_width(2.0).build();
        let inline = Style::builder(None).line_width(8.0).outline(false).build();
        let mut options = shared.polygon_options(vec![], vec![]);
        apply_inline_polygon_style(&mut options, &inline);
        assert!((options.stroke_width - 2.0).abs() < f32::EPSILON);
    }
}
