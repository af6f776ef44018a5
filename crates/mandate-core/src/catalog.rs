//! Scheme catalog
//!
//! Maps scheme identifiers to a display title and the description bullets
//! shown under "Proposed Benefits". The composer receives a catalog by
//! reference, so hosts and tests can supply their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeEntry {
    pub title: String,
    #[serde(default)]
    pub description: Vec<String>,
}

impl SchemeEntry {
    pub fn new(title: &str, description: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            description: description.iter().map(|line| line.to_string()).collect(),
        }
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct CatalogError(pub String);

/// Read-only lookup from scheme identifier to catalog entry.
pub trait SchemeCatalog {
    /// `Ok(None)` is a miss, not an error.
    fn lookup(&self, scheme: &str) -> Result<Option<SchemeEntry>, CatalogError>;

    /// The entry for `scheme`, or a bare entry titled with the identifier.
    fn resolve(&self, scheme: &str) -> Result<SchemeEntry, CatalogError> {
        Ok(self.lookup(scheme)?.unwrap_or_else(|| SchemeEntry {
            title: scheme.to_string(),
            description: Vec::new(),
        }))
    }
}

/// Catalog backed by an in-memory map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    entries: BTreeMap<String, SchemeEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, scheme: &str, entry: SchemeEntry) -> Self {
        self.entries.insert(scheme.to_string(), entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The schemes offered on the mandate form.
    pub fn builtin() -> Self {
        Self::new()
            .with_entry(
                "capital-subsidy",
                SchemeEntry::new(
                    "Capital Investment Subsidy",
                    &[
                        "Subsidy on eligible investment in plant and machinery",
                        "Higher rate for units in notified backward talukas",
                        "Additional assistance for women and SC/ST entrepreneurs",
                        "Claim to be filed within one year of commercial production",
                    ],
                ),
            )
            .with_entry(
                "interest-subsidy",
                SchemeEntry::new(
                    "Interest Subsidy",
                    &[
                        "Interest subvention on term loan from scheduled banks",
                        "Available for a period of up to seven years",
                        "Disbursed half-yearly against bank interest certificates",
                    ],
                ),
            )
            .with_entry(
                "power-tariff",
                SchemeEntry::new(
                    "Power Tariff Subsidy",
                    &[
                        "Per-unit rebate on electricity consumed by the unit",
                        "Applicable to new HT and LT industrial connections",
                        "Payable for five years from date of power release",
                    ],
                ),
            )
            .with_entry(
                "electricity-duty",
                SchemeEntry::new(
                    "Electricity Duty Exemption",
                    &[
                        "Exemption from electricity duty on power consumed",
                        "Certificate issued by the Chief Electrical Inspector",
                        "Valid for five years from start of production",
                    ],
                ),
            )
            .with_entry(
                "sgst-reimbursement",
                SchemeEntry::new(
                    "SGST Reimbursement",
                    &[
                        "Reimbursement of net SGST paid on finished goods",
                        "Capped at a percentage of eligible fixed capital investment",
                        "Claims filed annually after GST return reconciliation",
                    ],
                ),
            )
            .with_entry(
                "stamp-duty",
                SchemeEntry::new(
                    "Stamp Duty Reimbursement",
                    &[
                        "Refund of stamp duty paid on land purchase or lease",
                        "Refund of registration fees on term loan mortgage",
                    ],
                ),
            )
            .with_entry(
                "quality-certification",
                SchemeEntry::new(
                    "Quality Certification Assistance",
                    &[
                        "Reimbursement of ISO, BIS and ZED certification cost",
                        "Covers consultancy, audit and testing equipment",
                    ],
                ),
            )
    }
}

impl SchemeCatalog for StaticCatalog {
    fn lookup(&self, scheme: &str) -> Result<Option<SchemeEntry>, CatalogError> {
        Ok(self.entries.get(scheme).cloned())
    }
}
