//! Style value types shared by the interval model and the block model.
//!
//! The composition kernel works with two layers of style data:
//!
//! - [`StyleAttrs`] — a *partial* style: every field optional. This is what a
//!   formatting command records and what interval resolution folds.
//! - [`ResolvedStyle`] — a *complete* style: the effective appearance at one
//!   buffer position, obtained by folding attrs over [`DocumentStyle`]
//!   defaults.

use crate::paper::PaperSize;

/// Paragraph/document alignment.
///
/// In the flat interval model alignment is document-wide (a deliberate design
/// point: the alignment command mutates [`DocumentStyle`], it never creates a
/// style interval). In the block model it is a per-paragraph attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left-aligned (default).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
    /// Justified.
    Justify,
}

impl Alignment {
    /// The CSS utility class the host applies for this alignment.
    pub fn as_css_class(&self) -> &'static str {
        match self {
            Alignment::Left => "text-left",
            Alignment::Center => "text-center",
            Alignment::Right => "text-right",
            Alignment::Justify => "text-justify",
        }
    }

    /// Parse a CSS utility class back into an alignment.
    pub fn from_css_class(class: &str) -> Option<Self> {
        match class {
            "text-left" => Some(Alignment::Left),
            "text-center" => Some(Alignment::Center),
            "text-right" => Some(Alignment::Right),
            "text-justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Color preset applied to inserted links.
pub const LINK_COLOR: &str = "#0066cc";

/// A partial style: the payload of one style interval.
///
/// Fields are independent; `None` means "this interval says nothing about the
/// field". Folding two attrs merges field-by-field, so a later interval that
/// sets only `color` does not erase a bold flag set by an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleAttrs {
    /// Bold flag.
    pub bold: Option<bool>,
    /// Italic flag.
    pub italic: Option<bool>,
    /// Underline flag.
    pub underline: Option<bool>,
    /// Font family name.
    pub font: Option<String>,
    /// Font size (a CSS length such as `"16px"`).
    pub size: Option<String>,
    /// Text color (hex string).
    pub color: Option<String>,
    /// Alignment. Carried for completeness of the fold; the formatting
    /// command set never writes it (alignment is document-wide).
    pub alignment: Option<Alignment>,
    /// Link target. `Some` marks the range as a link.
    pub link_url: Option<String>,
}

impl StyleAttrs {
    /// An attrs value that says nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if this range is a link.
    pub fn is_link(&self) -> bool {
        self.link_url.is_some()
    }

    /// Overlay `other` onto `self`, field by field. Fields `other` leaves
    /// unset keep their current value.
    pub fn merge(&mut self, other: &StyleAttrs) {
        if let Some(b) = other.bold {
            self.bold = Some(b);
        }
        if let Some(i) = other.italic {
            self.italic = Some(i);
        }
        if let Some(u) = other.underline {
            self.underline = Some(u);
        }
        if let Some(f) = &other.font {
            self.font = Some(f.clone());
        }
        if let Some(s) = &other.size {
            self.size = Some(s.clone());
        }
        if let Some(c) = &other.color {
            self.color = Some(c.clone());
        }
        if let Some(a) = other.alignment {
            self.alignment = Some(a);
        }
        if let Some(l) = &other.link_url {
            self.link_url = Some(l.clone());
        }
    }
}

/// Whole-document default style.
///
/// One instance per compose session. Mutated only by the alignment command
/// and by initial configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStyle {
    /// Default font family.
    pub font: String,
    /// Default font size.
    pub size: String,
    /// Default text color.
    pub color: String,
    /// Document-wide alignment.
    pub alignment: Alignment,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font: String::from("Georgia"),
            size: String::from("16px"),
            color: String::from("#000000"),
            alignment: Alignment::Left,
        }
    }
}

/// The effective style at one buffer position: document defaults with every
/// covering interval folded on top, in insertion order.
///
/// This is also the "active text format" snapshot that drives toolbar toggle
/// states while a selection is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Effective bold flag.
    pub bold: bool,
    /// Effective italic flag.
    pub italic: bool,
    /// Effective underline flag.
    pub underline: bool,
    /// Effective font family.
    pub font: String,
    /// Effective font size.
    pub size: String,
    /// Effective text color.
    pub color: String,
    /// Effective alignment.
    pub alignment: Alignment,
    /// Link target when the position sits inside a link range.
    pub link_url: Option<String>,
}

impl ResolvedStyle {
    /// The style of a position no interval covers.
    pub fn from_document(doc: &DocumentStyle) -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            font: doc.font.clone(),
            size: doc.size.clone(),
            color: doc.color.clone(),
            alignment: doc.alignment,
            link_url: None,
        }
    }

    /// Fold one attrs value onto this style.
    pub fn apply(&mut self, attrs: &StyleAttrs) {
        if let Some(b) = attrs.bold {
            self.bold = b;
        }
        if let Some(i) = attrs.italic {
            self.italic = i;
        }
        if let Some(u) = attrs.underline {
            self.underline = u;
        }
        if let Some(f) = &attrs.font {
            self.font = f.clone();
        }
        if let Some(s) = &attrs.size {
            self.size = s.clone();
        }
        if let Some(c) = &attrs.color {
            self.color = c.clone();
        }
        if let Some(a) = attrs.alignment {
            self.alignment = a;
        }
        if let Some(l) = &attrs.link_url {
            self.link_url = Some(l.clone());
        }
    }

    /// Snapshot this resolved style as a fully-populated attrs value.
    ///
    /// Formatting commands use this to copy the active format into a new
    /// interval before overlaying the one changed field.
    pub fn to_attrs(&self) -> StyleAttrs {
        StyleAttrs {
            bold: Some(self.bold),
            italic: Some(self.italic),
            underline: Some(self.underline),
            font: Some(self.font.clone()),
            size: Some(self.size.clone()),
            color: Some(self.color.clone()),
            alignment: Some(self.alignment),
            link_url: self.link_url.clone(),
        }
    }
}

/// Presentation settings for one letter draft (paper and border chrome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterStyle {
    /// Paper texture/background identifier.
    pub paper_style: String,
    /// Border decoration identifier.
    pub border_style: String,
    /// Selected paper size, if the letter overrides the default.
    pub paper_size: Option<PaperSize>,
    /// Custom page width (a length string such as `"210mm"`), only meaningful
    /// with [`PaperSize::Custom`].
    pub custom_width: Option<String>,
    /// Custom page height, only meaningful with [`PaperSize::Custom`].
    pub custom_height: Option<String>,
}

impl Default for LetterStyle {
    fn default() -> Self {
        Self {
            paper_style: String::from("classic"),
            border_style: String::from("none"),
            paper_size: None,
            custom_width: None,
            custom_height: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_css_round_trip() {
        for align in [
            Alignment::Left,
            Alignment::Center,
            Alignment::Right,
            Alignment::Justify,
        ] {
            assert_eq!(Alignment::from_css_class(align.as_css_class()), Some(align));
        }
        assert_eq!(Alignment::from_css_class("text-top"), None);
    }

    #[test]
    fn test_attrs_merge_keeps_unset_fields() {
        let mut base = StyleAttrs {
            bold: Some(true),
            ..StyleAttrs::default()
        };
        let color_only = StyleAttrs {
            color: Some(String::from("#ff0000")),
            ..StyleAttrs::default()
        };

        base.merge(&color_only);
        assert_eq!(base.bold, Some(true));
        assert_eq!(base.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_resolved_apply_and_snapshot() {
        let doc = DocumentStyle::default();
        let mut resolved = ResolvedStyle::from_document(&doc);
        assert!(!resolved.bold);
        assert_eq!(resolved.font, doc.font);

        resolved.apply(&StyleAttrs {
            bold: Some(true),
            size: Some(String::from("20px")),
            ..StyleAttrs::default()
        });
        assert!(resolved.bold);
        assert_eq!(resolved.size, "20px");

        let attrs = resolved.to_attrs();
        assert_eq!(attrs.bold, Some(true));
        assert_eq!(attrs.size.as_deref(), Some("20px"));
        assert_eq!(attrs.link_url, None);
    }
}
