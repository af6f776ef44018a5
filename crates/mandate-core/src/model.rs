//! Input records for mandate composition
//!
//! These mirror the shape of the mandate form. Every field is opaque display
//! text; nothing here is validated or parsed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the fee for one scheme was captured on the form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    #[default]
    Fixed,
    Percentage,
}

/// Everything the composer needs to know about one mandate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MandateDocumentInput {
    pub client_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    /// Sanctioned load, free-form (e.g. "250 kVA")
    #[serde(default)]
    pub kva: String,
    /// Selected scheme identifiers in selection order
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub type_of_case: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub project_cost: Option<String>,
    #[serde(default)]
    pub industries_type: Option<String>,
    #[serde(default)]
    pub term_loan_amount: Option<String>,
    #[serde(default)]
    pub power_connection: Option<String>,
    #[serde(default)]
    pub fees: BTreeMap<String, f64>,
    #[serde(default)]
    pub percentages: BTreeMap<String, f64>,
    #[serde(default)]
    pub fee_types: BTreeMap<String, FeeType>,
}

/// The consultant issuing the mandate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConsultantInfo {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}
