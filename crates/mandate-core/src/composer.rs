//! Mandate composer
//!
//! Entry point tying the outline, layout and renderer together. Every
//! failure below this point is folded into a single
//! [`MandateError::Composition`].

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::catalog::SchemeCatalog;
use crate::error::{MandateError, RenderError};
use crate::fees::FeeSchedule;
use crate::layout::{Layout, LayoutEngine, PageGeometry};
use crate::model::{ConsultantInfo, MandateDocumentInput};
use crate::outline::{build_outline, Outline};
use crate::render::{render_pdf, DocumentInfo};
use crate::sink::DocumentSink;
use crate::store::{KeyValueStorage, MandateRecord, MandateStatus, RecordStore, Upsert};

/// A finished mandate document.
#[derive(Debug, Clone)]
pub struct ComposedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Result of [`MandateComposer::issue`].
#[derive(Debug, Clone)]
pub struct IssuedMandate {
    pub filename: String,
    pub page_count: usize,
    pub size_bytes: usize,
    pub record: Upsert,
}

/// Composes mandate documents against an injected scheme catalog.
pub struct MandateComposer<'a, C: SchemeCatalog + ?Sized> {
    catalog: &'a C,
    fees: FeeSchedule,
    geometry: PageGeometry,
}

impl<'a, C: SchemeCatalog + ?Sized> MandateComposer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            fees: FeeSchedule::default(),
            geometry: PageGeometry::default(),
        }
    }

    pub fn with_fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Outline for `date`; shared with the preview.
    pub fn outline(
        &self,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
    ) -> Result<Outline, MandateError> {
        build_outline(input, consultant, self.catalog, &self.fees, date).map_err(compose_error)
    }

    /// Lay the mandate out without serializing it.
    pub fn layout(
        &self,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
    ) -> Result<Layout, MandateError> {
        let outline = self.outline(input, consultant, date)?;
        Ok(LayoutEngine::new(self.geometry).run(&outline))
    }

    /// Compose using today's local date.
    pub fn compose(
        &self,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
    ) -> Result<ComposedDocument, MandateError> {
        self.compose_on(input, consultant, Local::now().date_naive())
    }

    /// Compose as of `date`.
    pub fn compose_on(
        &self,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
    ) -> Result<ComposedDocument, MandateError> {
        let outline = self.outline(input, consultant, date)?;
        let layout = LayoutEngine::new(self.geometry).run(&outline);
        let info = DocumentInfo {
            title: outline.title.clone(),
            created_on: date,
        };
        let bytes = render_pdf(&layout, &info).map_err(compose_error)?;

        info!(
            filename = %outline.filename,
            pages = layout.page_count(),
            schemes = input.schemes.len(),
            size = bytes.len(),
            "composed mandate"
        );

        Ok(ComposedDocument {
            filename: outline.filename,
            bytes,
            page_count: layout.page_count(),
        })
    }

    /// Compose and deliver to `sink`. The sink is checked before any work.
    pub fn compose_into<S: DocumentSink + ?Sized>(
        &self,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
        sink: &mut S,
    ) -> Result<ComposedDocument, MandateError> {
        sink.ensure_available()?;
        let document = self.compose_on(input, consultant, date)?;
        sink.deliver(&document.filename, &document.bytes)?;
        Ok(document)
    }

    /// Compose, deliver, then record the mandate under `draft_id`.
    ///
    /// The record is only written after delivery succeeds, and is keyed by
    /// the draft id, so retrying a failed attempt never duplicates it.
    pub fn issue<S, K>(
        &self,
        draft_id: &str,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
        sink: &mut S,
        store: &mut RecordStore<K>,
    ) -> Result<IssuedMandate, MandateError>
    where
        S: DocumentSink + ?Sized,
        K: KeyValueStorage,
    {
        let document = self.compose_into(input, consultant, date, sink)?;
        let record = MandateRecord::from_input(draft_id, input, date, MandateStatus::Sent);
        let outcome = store.upsert(record)?;

        Ok(IssuedMandate {
            filename: document.filename,
            page_count: document.page_count,
            size_bytes: document.bytes.len(),
            record: outcome,
        })
    }
}

fn compose_error(err: RenderError) -> MandateError {
    tracing::warn!(error = %err, "mandate composition failed");
    MandateError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, SchemeEntry, StaticCatalog};
    use crate::sink::MemorySink;
    use crate::store::MemoryStorage;
    use crate::test_support::page_texts;
    use lopdf::Document;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn consultant() -> ConsultantInfo {
        ConsultantInfo {
            name: "Shah Subsidy Consultants".into(),
            address: "402 Shivalik Plaza, Ashram Road, Ahmedabad".into(),
            email: "mandates@shah.example".into(),
            phone: "+91 98250 00000".into(),
        }
    }

    fn input(schemes: &[&str]) -> MandateDocumentInput {
        MandateDocumentInput {
            client_name: "M/s Mangalam Seeds Ltd".into(),
            company: "Mangalam Seeds".into(),
            address: "Plot 12, GIDC Estate, Mehsana".into(),
            kva: "250 kVA".into(),
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
            type_of_case: Some("New unit".into()),
            ..Default::default()
        }
    }

    struct FailingCatalog;

    impl SchemeCatalog for FailingCatalog {
        fn lookup(&self, scheme: &str) -> Result<Option<SchemeEntry>, CatalogError> {
            Err(CatalogError(format!("no entry source for {}", scheme)))
        }
    }

    /// Catalog with `count` schemes of seven bullet lines each
    fn long_catalog(count: usize) -> (StaticCatalog, Vec<String>) {
        let bullets: Vec<String> = (1..=7).map(|i| format!("Benefit detail {}", i)).collect();
        let bullet_refs: Vec<&str> = bullets.iter().map(String::as_str).collect();
        let mut catalog = StaticCatalog::new();
        let mut ids = Vec::new();
        for i in 0..count {
            let id = format!("scheme-{}", i);
            let entry = SchemeEntry::new(&format!("Scheme {}", i), &bullet_refs);
            catalog = catalog.with_entry(&id, entry);
            ids.push(id);
        }
        (catalog, ids)
    }

    #[test]
    fn test_compose_produces_loadable_pdf() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let doc = composer
            .compose_on(&input(&["capital-subsidy"]), &consultant(), date())
            .unwrap();

        assert_eq!(doc.filename, "Mandate_M_s_Mangalam_Seeds_Ltd_18-10-2026.pdf");
        let loaded = Document::load_mem(&doc.bytes).unwrap();
        assert_eq!(loaded.get_pages().len(), doc.page_count);
    }

    #[test]
    fn test_compose_sections_in_order() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let doc = composer
            .compose_on(&input(&["capital-subsidy"]), &consultant(), date())
            .unwrap();
        let texts: Vec<String> = page_texts(&doc.bytes).into_iter().flatten().collect();

        let position = |needle: &str| {
            texts
                .iter()
                .position(|t| t == needle)
                .unwrap_or_else(|| panic!("missing '{}'", needle))
        };
        let order = [
            position("Shah Subsidy Consultants"),
            position("Date: 18-10-2026"),
            position("Subject: Mandate for Capital Investment Subsidy"),
            position("To,"),
            position("Commercial Offer"),
            position("Proposed Benefits"),
            position("Scope of Work"),
            position("Eligibility Criteria"),
            position("Professional Fees"),
            position("Terms and Conditions"),
            position("For Shah Subsidy Consultants  -  Authorised Signatory"),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{:?}", order);
    }

    #[test]
    fn test_compose_empty_optional_fields() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let layout = composer.layout(&input(&[]), &consultant(), date()).unwrap();
        let texts: Vec<&str> = layout.texts().collect();

        // Category, project cost, industries type, term loan, power connection
        assert_eq!(texts.iter().filter(|t| **t == "Not specified").count(), 5);
        assert!(!texts.iter().any(|t| t.contains("undefined")));
    }

    #[test]
    fn test_compose_long_content_breaks_pages() {
        let (catalog, ids) = long_catalog(9);
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let composer = MandateComposer::new(&catalog);
        let doc = composer.compose_on(&input(&refs), &consultant(), date()).unwrap();

        assert!(doc.page_count >= 2);
        let pages = page_texts(&doc.bytes);
        assert_eq!(pages.len(), doc.page_count);
        let all: Vec<String> = pages.into_iter().flatten().collect();
        for i in 0..9 {
            let heading = format!("{}. Scheme {}", i + 1, i);
            assert_eq!(all.iter().filter(|t| **t == heading).count(), 1, "{}", heading);
        }
    }

    #[test]
    fn test_compose_twice_is_byte_identical() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let schemes = ["capital-subsidy", "interest-subsidy", "stamp-duty"];
        let first = composer.compose_on(&input(&schemes), &consultant(), date()).unwrap();
        let second = composer.compose_on(&input(&schemes), &consultant(), date()).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.filename, second.filename);
    }

    #[test]
    fn test_compose_does_not_mutate_input() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let original = input(&["power-tariff"]);
        let copy = original.clone();
        composer.compose_on(&original, &consultant(), date()).unwrap();
        assert_eq!(original, copy);
    }

    #[test]
    fn test_catalog_failure_is_composition_error() {
        let composer = MandateComposer::new(&FailingCatalog);
        let err = composer
            .compose_on(&input(&["capital-subsidy"]), &consultant(), date())
            .unwrap_err();
        match err {
            MandateError::Composition(message) => {
                assert!(message.contains("capital-subsidy"), "{}", message)
            }
            other => panic!("expected composition error, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_sink_fails_before_composing() {
        // A failing catalog proves composition never ran
        let composer = MandateComposer::new(&FailingCatalog);
        let mut sink = MemorySink::unavailable();
        let err = composer
            .compose_into(&input(&["x"]), &consultant(), date(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, MandateError::Environment(_)));
        assert!(sink.delivered().is_empty());
    }

    #[test]
    fn test_compose_into_delivers_once() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let mut sink = MemorySink::new();
        let doc = composer
            .compose_into(&input(&["stamp-duty"]), &consultant(), date(), &mut sink)
            .unwrap();
        assert_eq!(sink.delivered().len(), 1);
        assert_eq!(sink.delivered()[0].0, doc.filename);
        assert_eq!(sink.delivered()[0].1, doc.bytes);
    }

    #[test]
    fn test_issue_retry_does_not_duplicate_record() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let mut store = RecordStore::new(MemoryStorage::default());
        let mut sink = MemorySink::new();
        let mandate = input(&["capital-subsidy"]);

        let first = composer
            .issue("draft-1", &mandate, &consultant(), date(), &mut sink, &mut store)
            .unwrap();
        let second = composer
            .issue("draft-1", &mandate, &consultant(), date(), &mut sink, &mut store)
            .unwrap();

        assert_eq!(first.record, Upsert::Inserted);
        assert_eq!(second.record, Upsert::Replaced);
        let records: Vec<MandateRecord> = store.all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, MandateStatus::Sent);
    }

    #[test]
    fn test_issue_failure_writes_no_record() {
        let catalog = StaticCatalog::builtin();
        let composer = MandateComposer::new(&catalog);
        let mut store = RecordStore::new(MemoryStorage::default());
        let mut sink = MemorySink::unavailable();

        let result = composer.issue(
            "draft-2",
            &input(&[]),
            &consultant(),
            date(),
            &mut sink,
            &mut store,
        );
        assert!(result.is_err());
        let records: Vec<MandateRecord> = store.all().unwrap();
        assert!(records.is_empty());
    }
}
