//! Editable preview held on the Rust side
//!
//! The preview page keeps one session per open form. Line edits live here
//! only; composing the PDF always starts again from the form input.

use chrono::NaiveDate;
use mandate_core::{ConsultantInfo, MandateDocumentInput, MandatePreview, PreviewError};
use wasm_bindgen::prelude::*;

use crate::{from_js, preview_internal, to_js, today};

fn preview_error(err: PreviewError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Preview of one mandate form, with on-screen line overrides.
#[wasm_bindgen]
pub struct PreviewSession {
    preview: MandatePreview,
}

impl PreviewSession {
    fn build(
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
    ) -> Result<Self, String> {
        let preview = preview_internal(input, consultant, date)?;
        Ok(Self { preview })
    }

    fn edited_count(&self) -> usize {
        self.preview
            .sections
            .iter()
            .flat_map(|section| &section.lines)
            .filter(|line| line.is_edited())
            .count()
    }
}

#[wasm_bindgen]
impl PreviewSession {
    #[wasm_bindgen(constructor)]
    pub fn new(input: JsValue, consultant: JsValue) -> Result<PreviewSession, JsValue> {
        let input: MandateDocumentInput = from_js(input)?;
        let consultant: ConsultantInfo = from_js(consultant)?;
        Self::build(&input, &consultant, today()).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(getter, js_name = subjectLine)]
    pub fn subject_line(&self) -> String {
        self.preview.subject_line.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.preview.filename.clone()
    }

    /// Sections with any overrides applied.
    pub fn sections(&self) -> Result<JsValue, JsValue> {
        to_js(&self.preview.sections)
    }

    #[wasm_bindgen(getter, js_name = lineCount)]
    pub fn line_count(&self) -> usize {
        self.preview.line_count()
    }

    /// Number of lines that currently differ from the generated text
    #[wasm_bindgen(getter, js_name = editedCount)]
    pub fn edited_lines(&self) -> usize {
        self.edited_count()
    }

    #[wasm_bindgen(js_name = editLine)]
    pub fn edit_line(&mut self, section: usize, line: usize, text: &str) -> Result<(), JsValue> {
        self.preview
            .edit_line(section, line, text)
            .map_err(preview_error)
    }

    #[wasm_bindgen(js_name = resetLine)]
    pub fn reset_line(&mut self, section: usize, line: usize) -> Result<(), JsValue> {
        self.preview.reset_line(section, line).map_err(preview_error)
    }

    /// Text for the clipboard, headings and indentation included.
    #[wasm_bindgen(js_name = plainText)]
    pub fn plain_text(&self) -> String {
        self.preview.plain_text()
    }
}
