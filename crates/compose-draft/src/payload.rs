//! Serde data-transfer types for the two persisted draft formats.
//!
//! Core types stay serde-free (mirroring how the kernel crate avoids wire
//! concerns); this module defines JSON-shaped mirrors and the conversions
//! between them. Optional style fields are omitted from the JSON when unset,
//! keeping stored rows compact.

use serde::{Deserialize, Serialize};

use compose_core::{
    Alignment, BlockDocument, DocumentStyle, LetterStyle, Page, PaperSize, Paragraph, RunMarks,
    StyleAttrs, StyleInterval, TextRun,
};

use crate::DraftError;

fn parse_alignment(class: &str) -> Result<Alignment, DraftError> {
    Alignment::from_css_class(class).ok_or_else(|| DraftError::UnknownAlignment(class.to_string()))
}

/// One style interval as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalData {
    /// Inclusive start char offset.
    pub start: usize,
    /// Exclusive end char offset.
    pub end: usize,
    /// Bold flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Italic flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Underline flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Alignment class (carried for fold completeness; commands never set it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
    /// Link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl From<&StyleInterval> for IntervalData {
    fn from(interval: &StyleInterval) -> Self {
        let attrs = &interval.attrs;
        Self {
            start: interval.start,
            end: interval.end,
            bold: attrs.bold,
            italic: attrs.italic,
            underline: attrs.underline,
            font: attrs.font.clone(),
            size: attrs.size.clone(),
            color: attrs.color.clone(),
            alignment: attrs.alignment.map(|a| a.as_css_class().to_string()),
            link_url: attrs.link_url.clone(),
        }
    }
}

impl IntervalData {
    /// Convert back into a kernel interval.
    pub fn into_interval(self) -> Result<StyleInterval, DraftError> {
        let alignment = match self.alignment {
            Some(class) => Some(parse_alignment(&class)?),
            None => None,
        };
        Ok(StyleInterval::new(
            self.start,
            self.end,
            StyleAttrs {
                bold: self.bold,
                italic: self.italic,
                underline: self.underline,
                font: self.font,
                size: self.size,
                color: self.color,
                alignment,
                link_url: self.link_url,
            },
        ))
    }
}

/// Document-wide style as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStyleData {
    /// Default font family.
    pub font: String,
    /// Default font size.
    pub size: String,
    /// Default text color.
    pub color: String,
    /// Document-wide alignment class.
    pub alignment: String,
}

impl From<&DocumentStyle> for DocumentStyleData {
    fn from(style: &DocumentStyle) -> Self {
        Self {
            font: style.font.clone(),
            size: style.size.clone(),
            color: style.color.clone(),
            alignment: style.alignment.as_css_class().to_string(),
        }
    }
}

impl DocumentStyleData {
    /// Convert back into the kernel's document style.
    pub fn into_style(self) -> Result<DocumentStyle, DraftError> {
        Ok(DocumentStyle {
            font: self.font,
            size: self.size,
            color: self.color,
            alignment: parse_alignment(&self.alignment)?,
        })
    }
}

/// Paper/border presentation as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterStyleData {
    /// Paper texture identifier.
    pub paper_style: String,
    /// Border decoration identifier.
    pub border_style: String,
    /// Paper size identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<String>,
    /// Custom page width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_width: Option<String>,
    /// Custom page height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_height: Option<String>,
}

impl From<&LetterStyle> for LetterStyleData {
    fn from(style: &LetterStyle) -> Self {
        Self {
            paper_style: style.paper_style.clone(),
            border_style: style.border_style.clone(),
            paper_size: style.paper_size.map(|s| s.as_str().to_string()),
            custom_width: style.custom_width.clone(),
            custom_height: style.custom_height.clone(),
        }
    }
}

impl LetterStyleData {
    /// Convert back into the kernel's letter style.
    pub fn into_style(self) -> Result<LetterStyle, DraftError> {
        let paper_size = match self.paper_size {
            Some(id) => {
                Some(PaperSize::parse(&id).ok_or(DraftError::UnknownPaperSize(id))?)
            }
            None => None,
        };
        Ok(LetterStyle {
            paper_style: self.paper_style,
            border_style: self.border_style,
            paper_size,
            custom_width: self.custom_width,
            custom_height: self.custom_height,
        })
    }
}

/// The flat draft's style payload: intervals + document style + letter
/// presentation. Stored alongside the raw content string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatStyleData {
    /// Document-wide style.
    pub document_style: DocumentStyleData,
    /// Appended style intervals, in append order.
    pub intervals: Vec<IntervalData>,
    /// Paper/border presentation.
    pub letter_style: LetterStyleData,
}

/// Serialize the flat model's style state.
pub fn flat_style_data_json(
    document_style: &DocumentStyle,
    intervals: &[StyleInterval],
    letter_style: &LetterStyle,
) -> Result<String, DraftError> {
    let data = FlatStyleData {
        document_style: document_style.into(),
        intervals: intervals.iter().map(IntervalData::from).collect(),
        letter_style: letter_style.into(),
    };
    Ok(serde_json::to_string(&data)?)
}

/// Parse a flat style payload back into kernel types.
///
/// Append order is preserved, so interval resolution behaves identically
/// after a round trip.
pub fn parse_flat_style_data(
    json: &str,
) -> Result<(DocumentStyle, Vec<StyleInterval>, LetterStyle), DraftError> {
    let data: FlatStyleData = serde_json::from_str(json)?;
    let document_style = data.document_style.into_style()?;
    let letter_style = data.letter_style.into_style()?;
    let intervals = data
        .intervals
        .into_iter()
        .map(IntervalData::into_interval)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((document_style, intervals, letter_style))
}

/// One text run as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunData {
    /// Run text.
    pub text: String,
    /// Bold.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Italic.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    /// Underline.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl From<&TextRun> for RunData {
    fn from(run: &TextRun) -> Self {
        Self {
            text: run.text.clone(),
            bold: run.marks.bold,
            italic: run.marks.italic,
            underline: run.marks.underline,
            color: run.marks.color.clone(),
            font: run.marks.font.clone(),
            size: run.marks.size.clone(),
        }
    }
}

impl RunData {
    fn into_run(self) -> TextRun {
        TextRun::new(
            self.text,
            RunMarks {
                bold: self.bold,
                italic: self.italic,
                underline: self.underline,
                color: self.color,
                font: self.font,
                size: self.size,
            },
        )
    }
}

/// One paragraph as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphData {
    /// Alignment class.
    pub align: String,
    /// The paragraph's runs.
    pub runs: Vec<RunData>,
}

impl From<&Paragraph> for ParagraphData {
    fn from(paragraph: &Paragraph) -> Self {
        Self {
            align: paragraph.align.as_css_class().to_string(),
            runs: paragraph.runs.iter().map(RunData::from).collect(),
        }
    }
}

impl ParagraphData {
    fn into_paragraph(self) -> Result<Paragraph, DraftError> {
        Ok(Paragraph {
            align: parse_alignment(&self.align)?,
            runs: self.runs.into_iter().map(RunData::into_run).collect(),
        })
    }
}

/// One page as stored. Footer numbers are persisted for display but derived
/// state wins on load: the kernel renumbers after deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    /// The page's paragraphs.
    pub paragraphs: Vec<ParagraphData>,
    /// 1-based page number at save time.
    pub page_number: usize,
    /// Total page count at save time.
    pub page_count: usize,
}

impl From<&Page> for PageData {
    fn from(page: &Page) -> Self {
        Self {
            paragraphs: page.paragraphs.iter().map(ParagraphData::from).collect(),
            page_number: page.page_number,
            page_count: page.page_count,
        }
    }
}

/// The block draft: the whole serialized tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDraft {
    /// The pages, in order.
    pub pages: Vec<PageData>,
}

/// Serialize a block document.
pub fn block_draft_json(doc: &BlockDocument) -> Result<String, DraftError> {
    let draft = BlockDraft {
        pages: doc.pages().iter().map(PageData::from).collect(),
    };
    Ok(serde_json::to_string(&draft)?)
}

/// Parse a block draft back into a kernel document.
///
/// Structural invariants are restored and page numbering recomputed, so
/// hand-edited or stale payloads cannot smuggle inconsistent derived state
/// in.
pub fn parse_block_draft(json: &str) -> Result<BlockDocument, DraftError> {
    let draft: BlockDraft = serde_json::from_str(json)?;
    let pages = draft
        .pages
        .into_iter()
        .map(|page| {
            let paragraphs = page
                .paragraphs
                .into_iter()
                .map(ParagraphData::into_paragraph)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page {
                paragraphs,
                page_number: page.page_number,
                page_count: page.page_count,
            })
        })
        .collect::<Result<Vec<_>, DraftError>>()?;
    Ok(BlockDocument::from_pages(pages))
}
