//! Record stores for mandates and leads
//!
//! Records are kept as one JSON array per storage key in a string key-value
//! backend. The browser backs this with `localStorage`; tests and native
//! hosts use [`MemoryStorage`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::MandateDocumentInput;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored data under '{key}' is unreadable: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("record not found: {0}")]
    NotFound(String),
}

/// String key-value storage, shaped like the Web Storage API.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// An entity persisted under a fixed storage key.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const STORAGE_KEY: &'static str;

    fn id(&self) -> &str;
}

/// Whether an upsert created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Upsert {
    Inserted,
    Replaced,
}

pub struct RecordStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All records of one kind in insertion order. A missing key is empty.
    pub fn all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        match self.storage.get_item(R::STORAGE_KEY)? {
            None => Ok(Vec::new()),
            Some(json) if json.trim().is_empty() => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                key: R::STORAGE_KEY.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self.all::<R>()?.into_iter().find(|r| r.id() == id))
    }

    /// Insert `record`, or replace the record with the same id in place.
    pub fn upsert<R: Record>(&mut self, record: R) -> Result<Upsert, StoreError> {
        let mut records = self.all::<R>()?;
        let outcome = match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record;
                Upsert::Replaced
            }
            None => {
                records.push(record);
                Upsert::Inserted
            }
        };
        self.save(&records)?;
        Ok(outcome)
    }

    /// Delete by id. Returns false when no record had that id.
    pub fn remove<R: Record>(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.all::<R>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    /// Apply `change` to the record with `id` and persist it.
    pub fn update<R: Record>(
        &mut self,
        id: &str,
        change: impl FnOnce(&mut R),
    ) -> Result<R, StoreError> {
        let mut records = self.all::<R>()?;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        change(record);
        let updated = record.clone();
        self.save(&records)?;
        Ok(updated)
    }

    pub fn filter<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>, StoreError> {
        Ok(self.all::<R>()?.into_iter().filter(|r| predicate(r)).collect())
    }

    fn save<R: Record>(&mut self, records: &[R]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(records).map_err(|e| StoreError::Backend(e.to_string()))?;
        self.storage.set_item(R::STORAGE_KEY, &json)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Normalized search needle; `None` when the search matches everything.
fn search_needle(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MandateStatus {
    #[default]
    Draft,
    Sent,
    Signed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MandateRecord {
    pub id: String,
    pub client_name: String,
    pub company: String,
    pub schemes: Vec<String>,
    pub status: MandateStatus,
    pub created_on: NaiveDate,
    pub input: MandateDocumentInput,
}

impl MandateRecord {
    pub fn from_input(
        id: &str,
        input: &MandateDocumentInput,
        created_on: NaiveDate,
        status: MandateStatus,
    ) -> Self {
        Self {
            id: id.to_string(),
            client_name: input.client_name.clone(),
            company: input.company.clone(),
            schemes: input.schemes.clone(),
            status,
            created_on,
            input: input.clone(),
        }
    }
}

impl Record for MandateRecord {
    const STORAGE_KEY: &'static str = "mandates";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Criteria for listing mandates. Empty criteria match every record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MandateFilter {
    /// Case-insensitive match on client name or company
    pub search: Option<String>,
    pub scheme: Option<String>,
    pub status: Option<MandateStatus>,
}

impl MandateFilter {
    pub fn matches(&self, record: &MandateRecord) -> bool {
        if let Some(needle) = search_needle(&self.search) {
            if !contains_ignore_case(&record.client_name, &needle)
                && !contains_ignore_case(&record.company, &needle)
            {
                return false;
            }
        }
        if let Some(scheme) = &self.scheme {
            if !record.schemes.iter().any(|s| s == scheme) {
                return false;
            }
        }
        self.status.map_or(true, |status| record.status == status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub kva: String,
    /// Schemes the lead asked about
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub status: LeadStatus,
    pub created_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for LeadRecord {
    const STORAGE_KEY: &'static str = "leads";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadFilter {
    /// Case-insensitive match on name, company, phone or email
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &LeadRecord) -> bool {
        if let Some(needle) = search_needle(&self.search) {
            let hit = [&lead.name, &lead.company, &lead.phone, &lead.email]
                .iter()
                .any(|field| contains_ignore_case(field, &needle));
            if !hit {
                return false;
            }
        }
        self.status.map_or(true, |status| lead.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn mandate(id: &str, client: &str, schemes: &[&str]) -> MandateRecord {
        let input = MandateDocumentInput {
            client_name: client.into(),
            company: format!("{} Industries", client),
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        MandateRecord::from_input(id, &input, date(), MandateStatus::Draft)
    }

    fn lead(id: &str, name: &str, status: LeadStatus) -> LeadRecord {
        LeadRecord {
            id: id.into(),
            name: name.into(),
            company: String::new(),
            phone: "+91 99000 11111".into(),
            email: format!("{}@example.com", name.to_lowercase()),
            kva: "100".into(),
            schemes: vec!["power-tariff".into()],
            status,
            created_on: date(),
            notes: None,
        }
    }

    #[test]
    fn test_missing_key_is_empty() {
        let store = RecordStore::new(MemoryStorage::default());
        let records: Vec<MandateRecord> = store.all().unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let mut store = RecordStore::new(MemoryStorage::default());
        assert_eq!(store.upsert(mandate("m1", "Asha", &[])).unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(mandate("m2", "Bina", &[])).unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(mandate("m1", "Asha Traders", &[])).unwrap(), Upsert::Replaced);

        let records: Vec<MandateRecord> = store.all().unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.client_name.as_str()).collect();
        assert_eq!(names, vec!["Asha Traders", "Bina"]);
    }

    #[test]
    fn test_remove() {
        let mut store = RecordStore::new(MemoryStorage::default());
        store.upsert(mandate("m1", "Asha", &[])).unwrap();
        assert!(store.remove::<MandateRecord>("m1").unwrap());
        assert!(!store.remove::<MandateRecord>("m1").unwrap());
        assert!(store.get::<MandateRecord>("m1").unwrap().is_none());
    }

    #[test]
    fn test_update_status() {
        let mut store = RecordStore::new(MemoryStorage::default());
        store.upsert(mandate("m1", "Asha", &[])).unwrap();
        let updated = store
            .update::<MandateRecord>("m1", |r| r.status = MandateStatus::Signed)
            .unwrap();
        assert_eq!(updated.status, MandateStatus::Signed);
        let stored: MandateRecord = store.get("m1").unwrap().unwrap();
        assert_eq!(stored.status, MandateStatus::Signed);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = RecordStore::new(MemoryStorage::default());
        let err = store
            .update::<MandateRecord>("nope", |r| r.status = MandateStatus::Sent)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_corrupt_storage_is_reported() {
        let mut storage = MemoryStorage::default();
        storage.set_item("mandates", "{not json").unwrap();
        let store = RecordStore::new(storage);
        let err = store.all::<MandateRecord>().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "mandates"));
    }

    #[test]
    fn test_kinds_use_separate_keys() {
        let mut store = RecordStore::new(MemoryStorage::default());
        store.upsert(mandate("x", "Asha", &[])).unwrap();
        store.upsert(lead("x", "Ravi", LeadStatus::New)).unwrap();
        assert_eq!(store.all::<MandateRecord>().unwrap().len(), 1);
        assert_eq!(store.all::<LeadRecord>().unwrap().len(), 1);
        assert!(store.storage().get_item("leads").unwrap().is_some());
    }

    #[test]
    fn test_mandate_filter() {
        let mut store = RecordStore::new(MemoryStorage::default());
        store.upsert(mandate("m1", "Asha", &["capital-subsidy"])).unwrap();
        store.upsert(mandate("m2", "Bina", &["stamp-duty"])).unwrap();
        store
            .update::<MandateRecord>("m2", |r| r.status = MandateStatus::Sent)
            .unwrap();

        let by_search = MandateFilter {
            search: Some("  ASHA ".into()),
            ..Default::default()
        };
        let found = store.filter(|r: &MandateRecord| by_search.matches(r)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "m1");

        let by_scheme = MandateFilter {
            scheme: Some("stamp-duty".into()),
            ..Default::default()
        };
        assert_eq!(store.filter(|r: &MandateRecord| by_scheme.matches(r)).unwrap().len(), 1);

        let by_status = MandateFilter {
            status: Some(MandateStatus::Draft),
            ..Default::default()
        };
        let drafts = store.filter(|r: &MandateRecord| by_status.matches(r)).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, "m1");

        let everything = MandateFilter::default();
        assert_eq!(store.filter(|r: &MandateRecord| everything.matches(r)).unwrap().len(), 2);
    }

    #[test]
    fn test_lead_filter() {
        let filter = LeadFilter {
            search: Some("ravi@".into()),
            status: Some(LeadStatus::Contacted),
        };
        assert!(filter.matches(&lead("l1", "Ravi", LeadStatus::Contacted)));
        assert!(!filter.matches(&lead("l1", "Ravi", LeadStatus::Lost)));
        assert!(!filter.matches(&lead("l2", "Meena", LeadStatus::Contacted)));
    }

    #[test]
    fn test_mandate_filter_deserializes_camel_case() {
        let filter: MandateFilter =
            serde_json::from_str(r#"{"search":"asha","status":"sent"}"#).unwrap();
        assert_eq!(filter.search.as_deref(), Some("asha"));
        assert_eq!(filter.status, Some(MandateStatus::Sent));
        assert!(filter.scheme.is_none());
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_value(mandate("m1", "Asha", &["power-tariff"])).unwrap();
        assert_eq!(json["clientName"], "Asha");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["createdOn"], "2026-10-18");
        assert_eq!(json["input"]["schemes"][0], "power-tariff");
    }
}
