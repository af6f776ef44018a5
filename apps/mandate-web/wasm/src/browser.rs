//! Browser-backed sink and storage
//!
//! Both types only do real work inside a browser; off wasm32 every web-sys
//! call they make would abort, so native tests use the in-memory
//! counterparts from mandate-core instead.

use mandate_core::{DocumentSink, KeyValueStorage, MandateError, StoreError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Storage, Url};

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Saves documents by clicking a temporary download link.
#[derive(Debug, Default)]
pub struct BrowserDownloadSink;

impl BrowserDownloadSink {
    pub fn new() -> Self {
        Self
    }

    fn document() -> Result<web_sys::Document, MandateError> {
        web_sys::window()
            .ok_or_else(|| MandateError::Environment("No window".into()))?
            .document()
            .ok_or_else(|| MandateError::Environment("No document".into()))
    }

    fn download(filename: &str, bytes: &[u8]) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("No document")?;

        let array = js_sys::Uint8Array::new_with_length(bytes.len() as u32);
        array.copy_from(bytes);
        let parts = js_sys::Array::new();
        parts.push(&array);

        let options = BlobPropertyBag::new();
        options.set_type("application/pdf");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        Url::revoke_object_url(&url)
    }
}

impl DocumentSink for BrowserDownloadSink {
    fn ensure_available(&self) -> Result<(), MandateError> {
        Self::document().map(|_| ())
    }

    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MandateError> {
        Self::download(filename, bytes).map_err(|e| MandateError::Sink(js_message(&e)))
    }
}

/// `window.localStorage` as a [`KeyValueStorage`].
pub struct LocalStorageBackend {
    storage: Storage,
}

impl LocalStorageBackend {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Backend("No window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Backend(js_message(&e)))?
            .ok_or_else(|| StoreError::Backend("No localStorage".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Backend(js_message(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(js_message(&e)))
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_sink_available_in_browser() {
        assert!(BrowserDownloadSink::new().ensure_available().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_local_storage_round_trip() {
        let mut backend = LocalStorageBackend::open().unwrap();
        backend.set_item("mandate-wasm-test", "[]").unwrap();
        assert_eq!(
            backend.get_item("mandate-wasm-test").unwrap().as_deref(),
            Some("[]")
        );
    }
}
