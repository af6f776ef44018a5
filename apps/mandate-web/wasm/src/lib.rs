//! WASM bindings for mandate composition
//!
//! The mandate form, preview and CRM pages call into this module. All
//! derived text, layout and PDF generation happens in Rust; JavaScript only
//! collects form state and renders what comes back.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { buildPreview, MandateWorkspace } from './pkg/mandate_wasm.js';
//!
//! await init();
//!
//! const preview = buildPreview(form, consultant);
//! const workspace = new MandateWorkspace();
//! const result = workspace.generate(draftId, form, consultant);
//! draftId = result.draftId; // reuse on retry
//! ```

pub mod browser;
pub mod preview_session;
pub mod workspace;

use chrono::{Local, NaiveDate};
use mandate_core::{
    ConsultantInfo, MandateComposer, MandateDocumentInput, MandatePreview, StaticCatalog,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use browser::{BrowserDownloadSink, LocalStorageBackend};
pub use preview_session::PreviewSession;
pub use workspace::MandateWorkspace;

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid argument: {}", e)))
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn subject_line_internal(schemes: &[String]) -> Result<String, String> {
    mandate_core::format_subject_line(schemes, &StaticCatalog::builtin())
        .map_err(|e| e.to_string())
}

fn preview_internal(
    input: &MandateDocumentInput,
    consultant: &ConsultantInfo,
    date: NaiveDate,
) -> Result<MandatePreview, String> {
    let catalog = StaticCatalog::builtin();
    let outline = MandateComposer::new(&catalog)
        .outline(input, consultant, date)
        .map_err(|e| e.to_string())?;
    Ok(MandatePreview::from_outline(&outline))
}

fn compose_internal(
    input: &MandateDocumentInput,
    consultant: &ConsultantInfo,
    date: NaiveDate,
) -> Result<Vec<u8>, String> {
    let catalog = StaticCatalog::builtin();
    MandateComposer::new(&catalog)
        .compose_on(input, consultant, date)
        .map(|doc| doc.bytes)
        .map_err(|e| e.to_string())
}

/// Subject line for the selected scheme identifiers.
#[wasm_bindgen(js_name = formatSubjectLine)]
pub fn format_subject_line(schemes: Vec<String>) -> Result<String, JsValue> {
    subject_line_internal(&schemes).map_err(|e| JsValue::from_str(&e))
}

/// Download filename for a client, dated today.
#[wasm_bindgen(js_name = mandateFilename)]
pub fn mandate_filename(client_name: &str) -> String {
    mandate_core::mandate_filename(client_name, today())
}

/// Preview sections for the form as it stands.
#[wasm_bindgen(js_name = buildPreview)]
pub fn build_preview(input: JsValue, consultant: JsValue) -> Result<JsValue, JsValue> {
    let input: MandateDocumentInput = from_js(input)?;
    let consultant: ConsultantInfo = from_js(consultant)?;
    let preview = preview_internal(&input, &consultant, today())
        .map_err(|e| JsValue::from_str(&e))?;
    to_js(&preview)
}

/// Compose the mandate PDF without downloading it.
#[wasm_bindgen(js_name = composeMandate)]
pub fn compose_mandate(
    input: JsValue,
    consultant: JsValue,
) -> Result<js_sys::Uint8Array, JsValue> {
    let input: MandateDocumentInput = from_js(input)?;
    let consultant: ConsultantInfo = from_js(consultant)?;
    let bytes = compose_internal(&input, &consultant, today())
        .map_err(|e| JsValue::from_str(&e))?;

    let array = js_sys::Uint8Array::new_with_length(bytes.len() as u32);
    array.copy_from(&bytes);
    Ok(array)
}
