//! Derived text shared by the composer and the preview
//!
//! Anything the user sees in both the on-screen preview and the PDF is
//! produced here, so the two cannot drift apart.

use chrono::NaiveDate;

use crate::catalog::{CatalogError, SchemeCatalog};

/// Shown in place of an empty optional field.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Subject phrase used when no scheme is selected.
pub const GENERIC_SUBJECT: &str = "consulting fees for government subsidy work";

pub const BULLET: &str = "\u{2022}";

/// The value of an optional field, or [`NOT_SPECIFIED`] when it is absent
/// or blank.
pub fn or_not_specified(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => NOT_SPECIFIED,
    }
}

/// Join titles as "A", "A and B", "A, B and C".
pub fn join_titles(titles: &[String]) -> String {
    match titles {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}

/// Subject phrase for a list of scheme titles.
pub fn subject_phrase(titles: &[String]) -> String {
    if titles.is_empty() {
        GENERIC_SUBJECT.to_string()
    } else {
        join_titles(titles)
    }
}

/// Catalog titles for the selected schemes, in selection order.
pub fn scheme_titles<C: SchemeCatalog + ?Sized>(
    schemes: &[String],
    catalog: &C,
) -> Result<Vec<String>, CatalogError> {
    schemes
        .iter()
        .map(|scheme| catalog.resolve(scheme).map(|entry| entry.title))
        .collect()
}

/// The full subject line printed under the header.
pub fn format_subject_line<C: SchemeCatalog + ?Sized>(
    schemes: &[String],
    catalog: &C,
) -> Result<String, CatalogError> {
    let titles = scheme_titles(schemes, catalog)?;
    Ok(subject_line(&titles))
}

/// Subject line for already resolved scheme titles.
pub fn subject_line(titles: &[String]) -> String {
    format!("Subject: Mandate for {}", subject_phrase(titles))
}

/// "1. Capital Investment Subsidy" for index 0.
pub fn numbered_title(index: usize, title: &str) -> String {
    format!("{}. {}", index + 1, title)
}

pub fn bullet_line(text: &str) -> String {
    format!("{} {}", BULLET, text)
}

/// DD-MM-YYYY
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Replace every character that is not an ASCII letter or digit with `_`.
pub fn sanitize_client_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `Mandate_{client}_{DD-MM-YYYY}.pdf`
pub fn mandate_filename(client_name: &str, date: NaiveDate) -> String {
    format!(
        "Mandate_{}_{}.pdf",
        sanitize_client_name(client_name),
        format_date(date)
    )
}

/// Rupee amount with Indian digit grouping, e.g. `Rs. 1,50,000`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return format!("Rs. {}", digits);
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("Rs. {},{}", groups.join(","), tail)
}
