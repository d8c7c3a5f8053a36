//! Paper sizes and physical-length parsing.
//!
//! The pagination engine works in CSS pixels. Paper dimensions arrive from
//! the host as length strings in `mm` or `in` and are converted at the CSS
//! reference densities.

/// CSS pixels per millimeter (96 dpi / 25.4).
pub const PX_PER_MM: f64 = 3.779_527_559_1;
/// CSS pixels per inch.
pub const PX_PER_IN: f64 = 96.0;

/// Supported paper sizes for a letter draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    /// ISO A4, 210 × 297 mm.
    A4,
    /// ISO A5, 148 × 210 mm.
    A5,
    /// ISO A6, 105 × 148 mm.
    A6,
    /// ISO B4, 250 × 353 mm.
    B4,
    /// ISO B5, 176 × 250 mm.
    B5,
    /// ISO B6, 125 × 176 mm.
    B6,
    /// Host-supplied custom dimensions.
    Custom,
}

impl PaperSize {
    /// The identifier persisted in letter style data.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSize::A4 => "a4",
            PaperSize::A5 => "a5",
            PaperSize::A6 => "a6",
            PaperSize::B4 => "b4",
            PaperSize::B5 => "b5",
            PaperSize::B6 => "b6",
            PaperSize::Custom => "custom",
        }
    }

    /// Parse a persisted identifier.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "a4" => Some(PaperSize::A4),
            "a5" => Some(PaperSize::A5),
            "a6" => Some(PaperSize::A6),
            "b4" => Some(PaperSize::B4),
            "b5" => Some(PaperSize::B5),
            "b6" => Some(PaperSize::B6),
            "custom" => Some(PaperSize::Custom),
            _ => None,
        }
    }

    /// Standard dimensions for this size, `None` for [`PaperSize::Custom`]
    /// (the host supplies those).
    pub fn dimensions(&self) -> Option<PaperDimensions> {
        let (w, h) = match self {
            PaperSize::A4 => ("210mm", "297mm"),
            PaperSize::A5 => ("148mm", "210mm"),
            PaperSize::A6 => ("105mm", "148mm"),
            PaperSize::B4 => ("250mm", "353mm"),
            PaperSize::B5 => ("176mm", "250mm"),
            PaperSize::B6 => ("125mm", "176mm"),
            PaperSize::Custom => return None,
        };
        Some(PaperDimensions {
            width: w.to_string(),
            height: h.to_string(),
        })
    }
}

/// Page dimensions as length strings, the form the host's dimension provider
/// supplies them in (e.g. `"210mm"`, `"8.5in"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperDimensions {
    /// Page width.
    pub width: String,
    /// Page height.
    pub height: String,
}

impl PaperDimensions {
    /// Create dimensions from raw length strings.
    pub fn new(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }

    /// Width in CSS pixels.
    pub fn width_px(&self) -> Result<f64, DimensionError> {
        parse_length(&self.width)
    }

    /// Height in CSS pixels.
    pub fn height_px(&self) -> Result<f64, DimensionError> {
        parse_length(&self.height)
    }
}

/// Length-parsing errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    /// The string carries no recognized unit suffix (`mm` or `in`).
    UnknownUnit(String),
    /// The numeric part failed to parse.
    InvalidNumber(String),
}

impl std::fmt::Display for DimensionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionError::UnknownUnit(s) => {
                write!(f, "unknown length unit in {:?} (expected mm or in)", s)
            }
            DimensionError::InvalidNumber(s) => {
                write!(f, "invalid length value {:?}", s)
            }
        }
    }
}

impl std::error::Error for DimensionError {}

/// Parse a physical length string (`"297mm"`, `"11in"`) into CSS pixels.
pub fn parse_length(s: &str) -> Result<f64, DimensionError> {
    let trimmed = s.trim();

    let (number, factor) = if let Some(value) = trimmed.strip_suffix("mm") {
        (value, PX_PER_MM)
    } else if let Some(value) = trimmed.strip_suffix("in") {
        (value, PX_PER_IN)
    } else {
        return Err(DimensionError::UnknownUnit(s.to_string()));
    };

    number
        .trim()
        .parse::<f64>()
        .map(|v| v * factor)
        .map_err(|_| DimensionError::InvalidNumber(s.to_string()))
}

/// Usable content height of a page: total height minus the bottom margin the
/// footer occupies.
pub fn usable_height(page_height_px: f64, bottom_margin_px: f64) -> f64 {
    (page_height_px - bottom_margin_px).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mm_and_in() {
        let mm = parse_length("297mm").unwrap();
        assert!((mm - 297.0 * PX_PER_MM).abs() < 0.01);

        let inches = parse_length("11in").unwrap();
        assert!((inches - 1056.0).abs() < 0.01);

        // Whitespace around value and number is tolerated.
        assert!(parse_length(" 8.5 in ").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_length("297px"),
            Err(DimensionError::UnknownUnit(_))
        ));
        assert!(matches!(
            parse_length("abcmm"),
            Err(DimensionError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_paper_size_round_trip() {
        for size in [
            PaperSize::A4,
            PaperSize::A5,
            PaperSize::A6,
            PaperSize::B4,
            PaperSize::B5,
            PaperSize::B6,
            PaperSize::Custom,
        ] {
            assert_eq!(PaperSize::parse(size.as_str()), Some(size));
        }
        assert_eq!(PaperSize::parse("letter"), None);
    }

    #[test]
    fn test_standard_dimensions() {
        let a4 = PaperSize::A4.dimensions().unwrap();
        assert_eq!(a4.width, "210mm");
        assert!((a4.height_px().unwrap() - 297.0 * PX_PER_MM).abs() < 0.01);
        assert!(PaperSize::Custom.dimensions().is_none());
    }

    #[test]
    fn test_usable_height_clamps_at_zero() {
        assert_eq!(usable_height(1000.0, 64.0), 936.0);
        assert_eq!(usable_height(40.0, 64.0), 0.0);
    }
}
