//! Fee table policy
//!
//! Row amounts come from a fixed lookup with a fallback. The total row is
//! computed by an explicit [`TotalPolicy`]. Neither consults the per-scheme
//! `fees`, `percentages` or `fee_types` captured on the form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::format::format_amount;

/// Label printed in the fee-type column for every row.
pub const FIXED_FEE_LABEL: &str = "Fixed Fee";

/// How the total row of the fee table is computed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TotalPolicy {
    /// `scheme count × flat_average_rate`
    #[default]
    FlatAverage,
    /// Sum of the amounts shown in the rows.
    SumOfRows,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FeeSchedule {
    /// Amounts for schemes with a negotiated fee
    pub named: BTreeMap<String, u64>,
    /// Amount for every other scheme
    pub fallback: u64,
    pub flat_average_rate: u64,
    pub total_policy: TotalPolicy,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let named = [
            ("capital-subsidy", 50_000),
            ("interest-subsidy", 40_000),
            ("power-tariff", 35_000),
        ]
        .into_iter()
        .map(|(scheme, amount)| (scheme.to_string(), amount))
        .collect();

        Self {
            named,
            fallback: 25_000,
            flat_average_rate: 30_000,
            total_policy: TotalPolicy::FlatAverage,
        }
    }
}

/// One row of the fee table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeRow {
    pub title: String,
    pub label: &'static str,
    pub amount: u64,
}

impl FeeRow {
    pub fn display_amount(&self) -> String {
        format_amount(self.amount)
    }
}

impl FeeSchedule {
    /// Display amount for one scheme.
    pub fn amount_for(&self, scheme: &str) -> u64 {
        self.named.get(scheme).copied().unwrap_or(self.fallback)
    }

    /// Rows for `(scheme id, title)` pairs, in order.
    pub fn rows<'a>(&self, schemes: impl IntoIterator<Item = (&'a str, String)>) -> Vec<FeeRow> {
        schemes
            .into_iter()
            .map(|(scheme, title)| FeeRow {
                title,
                label: FIXED_FEE_LABEL,
                amount: self.amount_for(scheme),
            })
            .collect()
    }

    /// Total for the given rows under the configured policy. Saturates at
    /// `u64::MAX` rather than wrapping on oversized configured amounts.
    pub fn total(&self, rows: &[FeeRow]) -> u64 {
        match self.total_policy {
            TotalPolicy::FlatAverage => (rows.len() as u64).saturating_mul(self.flat_average_rate),
            TotalPolicy::SumOfRows => rows
                .iter()
                .fold(0u64, |total, row| total.saturating_add(row.amount)),
        }
    }
}
