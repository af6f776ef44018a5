//! Mandate document composition
//!
//! This crate turns a mandate form (client details, selected subsidy
//! schemes) into a paginated PDF using lopdf, and keeps the CRM records that
//! go with it.
//!
//! - `outline`: typed content blocks built once per document
//! - `layout`: places blocks on pages with keep-with-next and table header
//!   repetition
//! - `render`: serializes a layout to PDF bytes
//! - `preview`: editable on-screen view of the same outline
//! - `store`: mandate and lead records over a key-value backend

pub mod catalog;
pub mod composer;
pub mod error;
pub mod fees;
pub mod format;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod outline;
pub mod preview;
pub mod render;
pub mod sections;
pub mod sink;
pub mod store;
pub mod table;

pub use catalog::{CatalogError, SchemeCatalog, SchemeEntry, StaticCatalog};
pub use composer::{ComposedDocument, IssuedMandate, MandateComposer};
pub use error::{MandateError, RenderError};
pub use fees::{FeeSchedule, TotalPolicy};
pub use format::{format_subject_line, mandate_filename};
pub use layout::PageGeometry;
pub use model::{ConsultantInfo, FeeType, MandateDocumentInput};
pub use preview::{MandatePreview, PreviewError};
pub use sink::{DocumentSink, MemorySink};
pub use store::{
    KeyValueStorage, LeadFilter, LeadRecord, LeadStatus, MandateFilter, MandateRecord,
    MandateStatus, MemoryStorage, RecordStore, StoreError, Upsert,
};

/// Compose a mandate for today with the built-in scheme catalog.
pub fn compose_mandate(
    input: &MandateDocumentInput,
    consultant: &ConsultantInfo,
) -> Result<ComposedDocument, MandateError> {
    let catalog = StaticCatalog::builtin();
    MandateComposer::new(&catalog).compose(input, consultant)
}

/// Count pages in composed PDF bytes.
pub fn get_page_count(bytes: &[u8]) -> Result<usize, MandateError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| MandateError::Composition(format!("unreadable PDF: {}", e)))?;
    Ok(doc.get_pages().len())
}
