//! Font styles and the per-document style registry.
//!
//! Every text run references an interned [`Style`] through a [`StyleId`].
//! The registry hands out one id per distinct attribute set, so ids can be
//! compared and hashed instead of the full attribute tuple.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Interned key of a [`Style`] inside a [`StyleRegistry`].
///
/// The default id is [`StyleId::NO_STYLE`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StyleId(pub u32);

impl StyleId {
    /// Placeholder for content without any usable style.
    pub const NO_STYLE: StyleId = StyleId(0);
    /// Style attached to raster images.
    pub const GRAPHIC_IMAGE: StyleId = StyleId(1);
    /// Style attached to vector figures.
    pub const GRAPHIC_FIGURE: StyleId = StyleId(2);
    /// Style of thin horizontal bars such as fraction lines.
    pub const MATH_BAR: StyleId = StyleId(3);

    const FIRST_FONT: u32 = 4;

    /// Whether this id is one of the predefined non-font styles.
    pub fn is_sentinel(self) -> bool {
        self.0 < Self::FIRST_FONT
    }

    /// Whether this id marks graphical content.
    pub fn is_graphic(self) -> bool {
        matches!(
            self,
            StyleId::GRAPHIC_IMAGE | StyleId::GRAPHIC_FIGURE | StyleId::MATH_BAR
        )
    }
}

/// Font attributes as reported by the page decoder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontSpec {
    /// Font family name (e.g., "Times")
    pub family: String,

    /// Sub-family or variant name (e.g., "Roman")
    #[serde(default)]
    pub sub_family: String,

    /// Horizontal font size in points
    pub size: f32,

    /// Vertical font size in points, defaults to `size`
    #[serde(default)]
    pub size_y: Option<f32>,

    #[serde(default)]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    /// Whether the font is a mathematical symbol font
    #[serde(default)]
    pub math: bool,
}

impl FontSpec {
    /// Create a plain font spec.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Default::default()
        }
    }

    /// Mark the font as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the font as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Set the sub-family name.
    pub fn with_sub_family(mut self, sub_family: impl Into<String>) -> Self {
        self.sub_family = sub_family.into();
        self
    }

    fn key(&self) -> StyleKey {
        StyleKey {
            font_family: self.family.clone(),
            sub_family: self.sub_family.clone(),
            size_x: round_size(self.size),
            size_y: round_size(self.size_y.unwrap_or(self.size)),
            bold: self.bold,
            italic: self.italic,
            math: self.math,
        }
    }
}

fn round_size(size: f32) -> i32 {
    if size.is_finite() {
        size.round() as i32
    } else {
        0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StyleKey {
    font_family: String,
    sub_family: String,
    size_x: i32,
    size_y: i32,
    bold: bool,
    italic: bool,
    math: bool,
}

/// An interned text style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    pub id: StyleId,
    pub font_family: String,
    pub sub_family: String,
    /// Horizontal size, rounded to whole points
    pub size_x: i32,
    /// Vertical size, rounded to whole points
    pub size_y: i32,
    pub bold: bool,
    pub italic: bool,
    pub math: bool,
}

impl Style {
    fn from_key(id: StyleId, key: StyleKey) -> Self {
        Self {
            id,
            font_family: key.font_family,
            sub_family: key.sub_family,
            size_x: key.size_x,
            size_y: key.size_y,
            bold: key.bold,
            italic: key.italic,
            math: key.math,
        }
    }

    fn sentinel(id: StyleId, name: &str) -> Self {
        Self {
            id,
            font_family: name.to_string(),
            sub_family: String::new(),
            size_x: 0,
            size_y: 0,
            bold: false,
            italic: false,
            math: false,
        }
    }

    /// Whether both styles use the same font, ignoring size.
    pub fn same_font(&self, other: &Style) -> bool {
        self.font_family == other.font_family
            && self.sub_family == other.sub_family
            && self.bold == other.bold
            && self.italic == other.italic
            && self.math == other.math
    }

    fn key(&self) -> StyleKey {
        StyleKey {
            font_family: self.font_family.clone(),
            sub_family: self.sub_family.clone(),
            size_x: self.size_x,
            size_y: self.size_y,
            bold: self.bold,
            italic: self.italic,
            math: self.math,
        }
    }
}

#[derive(Debug)]
struct RegistryInner {
    by_key: HashMap<StyleKey, StyleId>,
    styles: Vec<Arc<Style>>,
}

/// Per-document style interner.
///
/// Lookups take a read lock; a miss upgrades to the write lock and re-checks
/// before inserting, so concurrent callers interning the same attributes
/// always observe the same id.
#[derive(Debug)]
pub struct StyleRegistry {
    inner: RwLock<RegistryInner>,
}

impl StyleRegistry {
    /// Create a registry holding only the predefined sentinel styles.
    pub fn new() -> Self {
        let styles = [
            (StyleId::NO_STYLE, "no-style"),
            (StyleId::GRAPHIC_IMAGE, "graphic-image"),
            (StyleId::GRAPHIC_FIGURE, "graphic-figure"),
            (StyleId::MATH_BAR, "math-bar"),
        ]
        .into_iter()
        .map(|(id, name)| Arc::new(Style::sentinel(id, name)))
        .collect();

        Self {
            inner: RwLock::new(RegistryInner {
                by_key: HashMap::new(),
                styles,
            }),
        }
    }

    /// Return the id for `spec`, creating a new style on first sight.
    pub fn get_or_create(&self, spec: &FontSpec) -> StyleId {
        let key = spec.key();
        {
            let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(id) = inner.by_key.get(&key) {
                return *id;
            }
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = inner.by_key.get(&key) {
            return *id;
        }
        let id = StyleId(inner.styles.len() as u32);
        log::debug!(
            "Registered style {:?}: {} {}pt",
            id,
            key.font_family,
            key.size_x
        );
        inner.styles.push(Arc::new(Style::from_key(id, key.clone())));
        inner.by_key.insert(key, id);
        id
    }

    /// Look up a style by id.
    pub fn get(&self, id: StyleId) -> Option<Arc<Style>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.styles.get(id.0 as usize).cloned()
    }

    /// Number of registered styles, sentinels included.
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.styles.len()
    }

    /// Whether only sentinel styles are registered.
    pub fn is_empty(&self) -> bool {
        self.len() <= StyleId::FIRST_FONT as usize
    }

    /// Snapshot of all styles in id order.
    pub fn all(&self) -> Vec<Arc<Style>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.styles.clone()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StyleRegistry {
    fn clone(&self) -> Self {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Self {
            inner: RwLock::new(RegistryInner {
                by_key: inner.by_key.clone(),
                styles: inner.styles.clone(),
            }),
        }
    }
}

impl Serialize for StyleRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let styles: Vec<Style> = self.all().iter().map(|s| Style::clone(s)).collect();
        styles.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut styles = Vec::<Style>::deserialize(deserializer)?;
        styles.sort_by_key(|s| s.id);
        for (index, style) in styles.iter().enumerate() {
            if style.id.0 as usize != index {
                return Err(serde::de::Error::custom(format!(
                    "style ids must be dense, found {:?} at position {}",
                    style.id, index
                )));
            }
        }
        let by_key = styles
            .iter()
            .filter(|s| !s.id.is_sentinel())
            .map(|s| (s.key(), s.id))
            .collect();
        Ok(Self {
            inner: RwLock::new(RegistryInner {
                by_key,
                styles: styles.into_iter().map(Arc::new).collect(),
            }),
        })
    }
}
