//! Mandate and lead records for the CRM pages
//!
//! `Workspace` holds the logic and is generic over storage and sink so it
//! can be tested natively. `MandateWorkspace` is the JavaScript-facing
//! wrapper over `localStorage` and the browser download.

use chrono::{Local, NaiveDate};
use mandate_core::{
    ConsultantInfo, DocumentSink, FeeSchedule, KeyValueStorage, LeadFilter, LeadRecord,
    LeadStatus, MandateComposer, MandateDocumentInput, MandateFilter, MandateRecord,
    MandateStatus, RecordStore, StaticCatalog, Upsert,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wasm_bindgen::prelude::*;

use crate::browser::{BrowserDownloadSink, LocalStorageBackend};
use crate::{from_js, to_js};

/// Outcome of one generate call, sent back to the page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    /// Pass this back on retry so the record is replaced, not duplicated
    pub draft_id: String,
    pub filename: String,
    pub page_count: usize,
    pub size_bytes: usize,
    pub record: Upsert,
}

/// Lead fields as edited on the leads page. Missing id means a new lead.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadForm {
    pub id: Option<String>,
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub kva: String,
    pub schemes: Vec<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn parse_mandate_status(status: &str) -> Result<MandateStatus, String> {
    serde_json::from_value(serde_json::Value::String(status.to_string()))
        .map_err(|_| format!("Unknown mandate status: {}", status))
}

pub(crate) fn parse_lead_status(status: &str) -> Result<LeadStatus, String> {
    serde_json::from_value(serde_json::Value::String(status.to_string()))
        .map_err(|_| format!("Unknown lead status: {}", status))
}

pub struct Workspace<S> {
    store: RecordStore<S>,
    catalog: StaticCatalog,
    fees: FeeSchedule,
}

impl<S: KeyValueStorage> Workspace<S> {
    pub fn new(storage: S) -> Self {
        Self {
            store: RecordStore::new(storage),
            catalog: StaticCatalog::builtin(),
            fees: FeeSchedule::default(),
        }
    }

    pub fn set_fees(&mut self, fees: FeeSchedule) {
        self.fees = fees;
    }

    pub fn generate<K: DocumentSink + ?Sized>(
        &mut self,
        draft_id: Option<String>,
        input: &MandateDocumentInput,
        consultant: &ConsultantInfo,
        date: NaiveDate,
        sink: &mut K,
    ) -> Result<GenerateResult, String> {
        let draft_id = draft_id.filter(|id| !id.trim().is_empty()).unwrap_or_else(new_id);
        let composer = MandateComposer::new(&self.catalog).with_fees(self.fees.clone());
        let issued = composer
            .issue(&draft_id, input, consultant, date, sink, &mut self.store)
            .map_err(|e| e.to_string())?;

        Ok(GenerateResult {
            draft_id,
            filename: issued.filename,
            page_count: issued.page_count,
            size_bytes: issued.size_bytes,
            record: issued.record,
        })
    }

    pub fn list_mandates(&self, filter: &MandateFilter) -> Result<Vec<MandateRecord>, String> {
        self.store
            .filter(|record: &MandateRecord| filter.matches(record))
            .map_err(|e| e.to_string())
    }

    pub fn delete_mandate(&mut self, id: &str) -> Result<bool, String> {
        self.store
            .remove::<MandateRecord>(id)
            .map_err(|e| e.to_string())
    }

    pub fn set_mandate_status(
        &mut self,
        id: &str,
        status: MandateStatus,
    ) -> Result<MandateRecord, String> {
        self.store
            .update(id, |record: &mut MandateRecord| record.status = status)
            .map_err(|e| e.to_string())
    }

    /// Insert or update a lead. New leads get a fresh id and today's date;
    /// existing leads keep their creation date.
    pub fn save_lead(&mut self, form: LeadForm, today: NaiveDate) -> Result<LeadRecord, String> {
        let id = form.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(new_id);
        let created_on = self
            .store
            .get::<LeadRecord>(&id)
            .map_err(|e| e.to_string())?
            .map_or(today, |existing| existing.created_on);

        let lead = LeadRecord {
            id,
            name: form.name,
            company: form.company,
            phone: form.phone,
            email: form.email,
            kva: form.kva,
            schemes: form.schemes,
            status: form.status,
            created_on,
            notes: form.notes,
        };
        self.store.upsert(lead.clone()).map_err(|e| e.to_string())?;
        Ok(lead)
    }

    pub fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<LeadRecord>, String> {
        self.store
            .filter(|lead: &LeadRecord| filter.matches(lead))
            .map_err(|e| e.to_string())
    }

    pub fn delete_lead(&mut self, id: &str) -> Result<bool, String> {
        self.store.remove::<LeadRecord>(id).map_err(|e| e.to_string())
    }

    pub fn set_lead_status(&mut self, id: &str, status: LeadStatus) -> Result<LeadRecord, String> {
        self.store
            .update(id, |lead: &mut LeadRecord| lead.status = status)
            .map_err(|e| e.to_string())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Optional filter argument: `undefined` and `null` mean no filter.
fn filter_from_js<T: Default + serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

/// Mandate and lead records backed by `localStorage`.
#[wasm_bindgen]
pub struct MandateWorkspace {
    inner: Workspace<LocalStorageBackend>,
}

#[wasm_bindgen]
impl MandateWorkspace {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<MandateWorkspace, JsValue> {
        let storage =
            LocalStorageBackend::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: Workspace::new(storage),
        })
    }

    /// Override the fee schedule used for the fee table.
    #[wasm_bindgen(js_name = setFeeSchedule)]
    pub fn set_fee_schedule(&mut self, fees: JsValue) -> Result<(), JsValue> {
        self.inner.set_fees(from_js(fees)?);
        Ok(())
    }

    /// Compose the mandate, download it, and record it as sent.
    ///
    /// Fails before composing if the page cannot download files.
    pub fn generate(
        &mut self,
        draft_id: Option<String>,
        input: JsValue,
        consultant: JsValue,
    ) -> Result<JsValue, JsValue> {
        let input: MandateDocumentInput = from_js(input)?;
        let consultant: ConsultantInfo = from_js(consultant)?;
        let mut sink = BrowserDownloadSink::new();

        let result = self
            .inner
            .generate(draft_id, &input, &consultant, today(), &mut sink)
            .map_err(|e| {
                web_sys::console::error_1(&format!("Mandate generation failed: {}", e).into());
                JsValue::from_str(&e)
            })?;
        web_sys::console::log_1(
            &format!("Generated {} ({} pages)", result.filename, result.page_count).into(),
        );
        to_js(&result)
    }

    #[wasm_bindgen(js_name = listMandates)]
    pub fn list_mandates(&self, filter: JsValue) -> Result<JsValue, JsValue> {
        let filter: MandateFilter = filter_from_js(filter)?;
        let records = self.inner.list_mandates(&filter).map_err(|e| JsValue::from_str(&e))?;
        to_js(&records)
    }

    #[wasm_bindgen(js_name = deleteMandate)]
    pub fn delete_mandate(&mut self, id: &str) -> Result<bool, JsValue> {
        self.inner.delete_mandate(id).map_err(|e| JsValue::from_str(&e))
    }

    /// `status` is one of `draft`, `sent`, `signed`.
    #[wasm_bindgen(js_name = setMandateStatus)]
    pub fn set_mandate_status(&mut self, id: &str, status: &str) -> Result<JsValue, JsValue> {
        let status = parse_mandate_status(status).map_err(|e| JsValue::from_str(&e))?;
        let record = self
            .inner
            .set_mandate_status(id, status)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&record)
    }

    #[wasm_bindgen(js_name = saveLead)]
    pub fn save_lead(&mut self, lead: JsValue) -> Result<JsValue, JsValue> {
        let form: LeadForm = from_js(lead)?;
        let lead = self.inner.save_lead(form, today()).map_err(|e| JsValue::from_str(&e))?;
        to_js(&lead)
    }

    #[wasm_bindgen(js_name = listLeads)]
    pub fn list_leads(&self, filter: JsValue) -> Result<JsValue, JsValue> {
        let filter: LeadFilter = filter_from_js(filter)?;
        let leads = self.inner.list_leads(&filter).map_err(|e| JsValue::from_str(&e))?;
        to_js(&leads)
    }

    #[wasm_bindgen(js_name = deleteLead)]
    pub fn delete_lead(&mut self, id: &str) -> Result<bool, JsValue> {
        self.inner.delete_lead(id).map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = setLeadStatus)]
    pub fn set_lead_status(&mut self, id: &str, status: &str) -> Result<JsValue, JsValue> {
        let status = parse_lead_status(status).map_err(|e| JsValue::from_str(&e))?;
        let lead = self
            .inner
            .set_lead_status(id, status)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&lead)
    }
}
