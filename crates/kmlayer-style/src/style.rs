//! KML `<Style>` representation
//!
//! A style bundles icon, line, polygon, and balloon sub-styles. It also
//! remembers which attributes were written explicitly in the document, since
//! an inline style only overrides the attributes it actually sets.

use std::collections::BTreeSet;

use kmlayer_common::LatLng;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ColorValue;
use crate::options::{IconDescriptor, MarkerOptions, PolygonOptions, PolylineOptions};

/// A style attribute that can be explicitly set by a document.
///
/// Names follow the KML element names they come from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum StyleAttr {
    /// `<IconStyle><heading>`
    Heading,
    /// `<IconStyle><hotSpot>`
    HotSpot,
    /// `<IconStyle><color>`
    MarkerColor,
    /// `<IconStyle><Icon><href>`
    IconUrl,
    /// `<IconStyle><scale>`
    IconScale,
    /// `<LineStyle><color>`
    OutlineColor,
    /// `<LineStyle><width>`
    Width,
    /// `<PolyStyle><color>`
    FillColor,
}

/// `<IconStyle>` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconStyle {
    /// Icon image URL.
    pub url: Option<String>,
    /// Icon scale, 1.0 = intrinsic size.
    pub scale: f64,
    /// Rotation in degrees.
    pub heading: f32,
    /// Anchor as fractions of the icon size.
    pub hot_spot: (f32, f32),
    /// Tint of the default marker.
    pub color: Option<ColorValue>,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            url: None,
            scale: 1.0,
            heading: 0.0,
            hot_spot: (0.5, 1.0),
            color: None,
        }
    }
}

/// `<LineStyle>` attributes. Also provides the outline of polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineStyle {
    /// Stroke color.
    pub color: ColorValue,
    /// Stroke width in pixels.
    pub width: f32,
    /// `<colorMode>random</colorMode>`
    pub random_color: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: ColorValue::BLACK,
            width: 1.0,
            random_color: false,
        }
    }
}

/// `<PolyStyle>` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyStyle {
    /// Fill color.
    pub color: ColorValue,
    /// Whether the polygon is filled.
    pub fill: bool,
    /// Whether the polygon is outlined.
    pub outline: bool,
    /// `<colorMode>random</colorMode>`
    pub random_color: bool,
}

impl Default for PolyStyle {
    fn default() -> Self {
        Self {
            color: ColorValue::WHITE,
            fill: true,
            outline: true,
            random_color: false,
        }
    }
}

/// `<BalloonStyle>` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonStyle {
    /// Balloon text template, may contain `$[field]` references.
    pub text: Option<String>,
}

/// A complete, immutable style.
///
/// Built with [`Style::builder`]; shared between registry entries via `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    id: Option<String>,
    icon: IconStyle,
    line: LineStyle,
    poly: PolyStyle,
    balloon: Option<BalloonStyle>,
    set_attrs: BTreeSet<StyleAttr>,
}

impl Style {
    /// Start building a style. `None` builds the document default style.
    #[must_use]
    pub fn builder(id: Option<&str>) -> StyleBuilder {
        StyleBuilder {
            style: Self {
                id: id.map(str::to_string),
                ..Self::default()
            },
        }
    }

    /// Style key, `None` for the default style.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether the document explicitly set `attr`.
    #[must_use]
    pub fn is_set(&self, attr: StyleAttr) -> bool {
        self.set_attrs.contains(&attr)
    }

    /// Icon sub-style.
    #[must_use]
    pub const fn icon(&self) -> &IconStyle {
        &self.icon
    }

    /// Line sub-style.
    #[must_use]
    pub const fn line(&self) -> &LineStyle {
        &self.line
    }

    /// Polygon sub-style.
    #[must_use]
    pub const fn poly(&self) -> &PolyStyle {
        &self.poly
    }

    /// Icon URL, if any.
    #[must_use]
    pub fn icon_url(&self) -> Option<&str> {
        self.icon.url.as_deref()
    }

    /// Icon scale.
    #[must_use]
    pub const fn icon_scale(&self) -> f64 {
        self.icon.scale
    }

    /// Whether polygons are filled.
    #[must_use]
    pub const fn has_fill(&self) -> bool {
        self.poly.fill
    }

    /// Whether polygons are outlined.
    #[must_use]
    pub const fn has_outline(&self) -> bool {
        self.poly.outline
    }

    /// Whether line color is in random mode.
    #[must_use]
    pub const fn is_line_random_color_mode(&self) -> bool {
        self.line.random_color
    }

    /// Whether polygon fill color is in random mode.
    #[must_use]
    pub const fn is_poly_random_color_mode(&self) -> bool {
        self.poly.random_color
    }

    /// Whether the style has a `<BalloonStyle>` at all.
    #[must_use]
    pub const fn has_balloon_style(&self) -> bool {
        self.balloon.is_some()
    }

    /// Balloon text template, if the balloon style defines one.
    #[must_use]
    pub fn balloon_text(&self) -> Option<&str> {
        self.balloon.as_ref().and_then(|b| b.text.as_deref())
    }

    /// Marker parameters for a point at `position`.
    ///
    /// The icon is the default marker, tinted when the icon style sets a
    /// color. Image icons are attached later by the layer once the bitmap is
    /// available.
    #[must_use]
    pub fn marker_options(&self, position: LatLng) -> MarkerOptions {
        let mut options = MarkerOptions::new(position);
        options.rotation = self.icon.heading;
        options.anchor = self.icon.hot_spot;
        options.icon = self.marker_icon();
        options
    }

    /// Default-marker icon implied by the icon color.
    #[must_use]
    pub fn marker_icon(&self) -> IconDescriptor {
        self.icon
            .color
            .map_or(IconDescriptor::Default, |color| {
                IconDescriptor::DefaultWithHue(color.hue())
            })
    }

    /// Polyline parameters for `points`.
    #[must_use]
    pub fn polyline_options(&self, points: Vec<LatLng>) -> PolylineOptions {
        PolylineOptions {
            points,
            color: self.line.color,
            width: self.line.width,
        }
    }

    /// Polygon parameters for an outer ring and its holes.
    ///
    /// A style without fill yields a transparent fill; a style without outline
    /// yields a zero-width stroke.
    #[must_use]
    pub fn polygon_options(&self, points: Vec<LatLng>, holes: Vec<Vec<LatLng>>) -> PolygonOptions {
        PolygonOptions {
            points,
            holes,
            fill_color: if self.poly.fill {
                self.poly.color
            } else {
                ColorValue::TRANSPARENT
            },
            stroke_color: self.line.color,
            stroke_width: if self.poly.outline {
                self.line.width
            } else {
                0.0
            },
        }
    }
}

/// Builder that records which attributes were explicitly set.
#[derive(Debug, Clone)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    fn mark(mut self, attr: StyleAttr) -> Self {
        let _ = self.style.set_attrs.insert(attr);
        self
    }

    /// `<Icon><href>`
    #[must_use]
    pub fn icon_url(mut self, url: &str) -> Self {
        self.style.icon.url = Some(url.to_string());
        self.mark(StyleAttr::IconUrl)
    }

    /// `<IconStyle><scale>`
    #[must_use]
    pub fn icon_scale(mut self, scale: f64) -> Self {
        self.style.icon.scale = scale;
        self.mark(StyleAttr::IconScale)
    }

    /// `<IconStyle><heading>`
    #[must_use]
    pub fn heading(mut self, degrees: f32) -> Self {
        self.style.icon.heading = degrees;
        self.mark(StyleAttr::Heading)
    }

    /// `<IconStyle><hotSpot>` as fractions of the icon size.
    #[must_use]
    pub fn hot_spot(mut self, u: f32, v: f32) -> Self {
        self.style.icon.hot_spot = (u, v);
        self.mark(StyleAttr::HotSpot)
    }

    /// `<IconStyle><color>`
    #[must_use]
    pub fn marker_color(mut self, color: ColorValue) -> Self {
        self.style.icon.color = Some(color);
        self.mark(StyleAttr::MarkerColor)
    }

    /// `<LineStyle><color>`
    #[must_use]
    pub fn line_color(mut self, color: ColorValue) -> Self {
        self.style.line.color = color;
        self.mark(StyleAttr::OutlineColor)
    }

    /// `<LineStyle><width>`
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.style.line.width = width;
        self.mark(StyleAttr::Width)
    }

    /// `<LineStyle><colorMode>`
    #[must_use]
    pub fn line_random_color(mut self, random: bool) -> Self {
        self.style.line.random_color = random;
        self
    }

    /// `<PolyStyle><color>`
    #[must_use]
    pub fn fill_color(mut self, color: ColorValue) -> Self {
        self.style.poly.color = color;
        self.mark(StyleAttr::FillColor)
    }

    /// `<PolyStyle><fill>`
    #[must_use]
    pub fn fill(mut self, fill: bool) -> Self {
        self.style.poly.fill = fill;
        self
    }

    /// `<PolyStyle><outline>`
    #[must_use]
    pub fn outline(mut self, outline: bool) -> Self {
        self.style.poly.outline = outline;
        self
    }

    /// `<PolyStyle><colorMode>`
    #[must_use]
    pub fn poly_random_color(mut self, random: bool) -> Self {
        self.style.poly.random_color = random;
        self
    }

    /// `<BalloonStyle>` without text.
    #[must_use]
    pub fn balloon_style(mut self) -> Self {
        if self.style.balloon.is_none() {
            self.style.balloon = Some(BalloonStyle::default());
        }
        self
    }

    /// `<BalloonStyle><text>`
    #[must_use]
    pub fn balloon_text(mut self, text: &str) -> Self {
        self.style.balloon = Some(BalloonStyle {
            text: Some(text.to_string()),
        });
        self
    }

    /// Freeze the style.
    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}
