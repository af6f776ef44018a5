//! On-screen preview of a mandate
//!
//! Built from the same [`Outline`] the layout engine consumes, so the preview
//! and the PDF never disagree about derived text. Edits are display-only
//! overrides: they live in the preview and are never fed back into
//! composition.

use serde::Serialize;
use thiserror::Error;

use crate::metrics::FontFace;
use crate::outline::{Align, Block, Outline, SectionKind, TextLine};

/// Separator between table cells in a preview line
const CELL_SEPARATOR: &str = " | ";

#[derive(Error, Debug, PartialEq)]
pub enum PreviewError {
    #[error("no preview line {line} in section {section}")]
    LineNotFound { section: usize, line: usize },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLine {
    pub text: String,
    pub emphasis: bool,
    pub indent: u8,
    pub align: Align,
    /// Generated text, kept once the line has been edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl PreviewLine {
    fn from_text_line(line: &TextLine) -> Self {
        Self {
            text: line.text.clone(),
            emphasis: line.face == FontFace::Bold,
            indent: line.indent,
            align: line.align,
            original: None,
        }
    }

    fn plain(text: String, emphasis: bool) -> Self {
        Self {
            text,
            emphasis,
            indent: 0,
            align: Align::Left,
            original: None,
        }
    }

    pub fn is_edited(&self) -> bool {
        self.original.is_some()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSection {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub lines: Vec<PreviewLine>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MandatePreview {
    pub subject_line: String,
    pub filename: String,
    pub sections: Vec<PreviewSection>,
}

impl MandatePreview {
    pub fn from_outline(outline: &Outline) -> Self {
        let sections = outline
            .sections
            .iter()
            .map(|section| {
                let mut heading = None;
                let mut lines = Vec::new();
                for block in &section.blocks {
                    match block {
                        Block::Heading(text) if heading.is_none() => heading = Some(text.clone()),
                        Block::Heading(text) => lines.push(PreviewLine::plain(text.clone(), true)),
                        Block::Line(line) => lines.push(PreviewLine::from_text_line(line)),
                        Block::List(items) => {
                            lines.extend(items.iter().map(PreviewLine::from_text_line))
                        }
                        Block::KeyValue(pairs) => lines.extend(pairs.iter().map(|(label, value)| {
                            PreviewLine::plain(format!("{}: {}", label, value), false)
                        })),
                        Block::Table(table) => {
                            if let Some(header) = &table.header {
                                lines.push(PreviewLine::plain(header.join(CELL_SEPARATOR), true));
                            }
                            lines.extend(table.rows.iter().map(|row| {
                                PreviewLine::plain(row.cells.join(CELL_SEPARATOR), row.emphasis)
                            }));
                        }
                        Block::Spacer(_) => {}
                    }
                }
                PreviewSection {
                    kind: section.kind,
                    heading,
                    lines,
                }
            })
            .collect();

        Self {
            subject_line: outline.subject_line.clone(),
            filename: outline.filename.clone(),
            sections,
        }
    }

    fn line_mut(&mut self, section: usize, line: usize) -> Result<&mut PreviewLine, PreviewError> {
        self.sections
            .get_mut(section)
            .and_then(|s| s.lines.get_mut(line))
            .ok_or(PreviewError::LineNotFound { section, line })
    }

    /// Override the text of one line.
    pub fn edit_line(
        &mut self,
        section: usize,
        line: usize,
        text: &str,
    ) -> Result<(), PreviewError> {
        let target = self.line_mut(section, line)?;
        if target.original.is_none() {
            target.original = Some(std::mem::take(&mut target.text));
        }
        target.text = text.to_string();
        Ok(())
    }

    /// Drop an override and restore the generated text.
    pub fn reset_line(&mut self, section: usize, line: usize) -> Result<(), PreviewError> {
        let target = self.line_mut(section, line)?;
        if let Some(original) = target.original.take() {
            target.text = original;
        }
        Ok(())
    }

    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }

    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(heading) = &section.heading {
                out.push_str(heading);
                out.push('\n');
            }
            for line in &section.lines {
                out.push_str(&"  ".repeat(line.indent as usize));
                out.push_str(&line.text);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }
}
