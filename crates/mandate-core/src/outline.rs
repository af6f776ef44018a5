//! Typed content blocks
//!
//! The outline is the single description of the mandate's content. The
//! layout engine places it on pages; the preview shows it on screen.

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::SchemeCatalog;
use crate::error::RenderError;
use crate::fees::FeeSchedule;
use crate::format::{mandate_filename, subject_line};
use crate::metrics::FontFace;
use crate::model::{ConsultantInfo, MandateDocumentInput};
use crate::sections;
use crate::table::TableBlock;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A single line of text. Lines are never wrapped.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    pub text: String,
    pub face: FontFace,
    pub align: Align,
    /// Indent level; each level shifts the line right by one indent step
    pub indent: u8,
}

impl TextLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            face: FontFace::Regular,
            align: Align::Left,
            indent: 0,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            face: FontFace::Bold,
            ..Self::plain(text)
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn indented(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(String),
    Line(TextLine),
    List(Vec<TextLine>),
    /// Two-column label/value table without a header
    KeyValue(Vec<(String, String)>),
    Table(TableBlock),
    /// Vertical gap measured in body lines
    Spacer(f32),
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    Salutation,
    CommercialOffer,
    Benefits,
    WorkScope,
    Eligibility,
    Fees,
    Terms,
    Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn line(self, line: TextLine) -> Self {
        self.push(Block::Line(line))
    }
}

/// Everything derived from one mandate input on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub title: String,
    pub subject_line: String,
    pub filename: String,
    pub date: NaiveDate,
    pub sections: Vec<Section>,
}

/// Build the outline for a mandate, sections in document order.
pub fn build_outline<C: SchemeCatalog + ?Sized>(
    input: &MandateDocumentInput,
    consultant: &ConsultantInfo,
    catalog: &C,
    fees: &FeeSchedule,
    date: NaiveDate,
) -> Result<Outline, RenderError> {
    let titles = input
        .schemes
        .iter()
        .map(|scheme| {
            catalog
                .resolve(scheme)
                .map(|entry| entry.title)
                .map_err(|e| sections::catalog_error(scheme, e))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let subject_line = subject_line(&titles);

    let sections = vec![
        sections::header(consultant, &subject_line, date),
        sections::salutation(input),
        sections::commercial_offer(input),
        sections::benefits(input, catalog)?,
        sections::work_scope(),
        sections::eligibility(),
        sections::fees(input, catalog, fees)?,
        sections::terms(),
        sections::signature(consultant),
    ];

    Ok(Outline {
        title: format!("Mandate - {}", input.client_name),
        subject_line,
        filename: mandate_filename(&input.client_name, date),
        date,
        sections,
    })
}
