//! Section generators
//!
//! One function per section of the mandate. Static contractual text lives
//! here as constants; every list item must fit on a single line.

use chrono::NaiveDate;

use crate::catalog::SchemeCatalog;
use crate::error::RenderError;
use crate::fees::FeeSchedule;
use crate::format::{bullet_line, format_amount, format_date, numbered_title, or_not_specified};
use crate::model::{ConsultantInfo, MandateDocumentInput};
use crate::outline::{Align, Block, Section, SectionKind, TextLine};
use crate::table::{Column, TableBlock, TableRow};

pub const WORK_SCOPE: &[&str] = &[
    "Study of the project and eligibility under the applicable subsidy schemes",
    "Preparation of application forms, project profile and supporting annexures",
    "Collection and verification of documents from the client and the bank",
    "Filing of online and physical applications with the sanctioning authority",
    "Follow-up with the District Industries Centre and the department concerned",
    "Attending site inspections and replying to queries raised by officials",
    "Coordination until sanction and disbursement of the subsidy amount",
];

pub const ELIGIBILITY: &[&str] = &[
    "The unit must hold a valid Udyam registration for the manufacturing activity",
    "Commercial production must start within the operative period of the scheme",
    "Term loan must be sanctioned by a scheduled bank or notified institution",
    "Plant and machinery must be new and installed at the registered premises",
    "The unit must not have availed the same benefit under any other scheme",
    "Statutory approvals, including pollution control consent, must be in force",
];

pub const TERMS: &[&str] = &[
    "Fees are exclusive of GST, which will be charged at the applicable rate.",
    "50% of the fee is payable on signing this mandate and 50% on sanction.",
    "Government fees, stamp duty and bank charges are borne by the client.",
    "The client will supply true and complete documents when requested.",
    "Sanction of subsidy is at the discretion of the authority concerned.",
    "Fees paid are not refundable once the application has been filed.",
    "This mandate is valid for twelve months from the date of issue.",
    "Disputes are subject to the jurisdiction of the courts at Ahmedabad.",
];

pub const NO_SCHEMES: &str = "No schemes selected.";

pub(crate) fn catalog_error(scheme: &str, err: impl ToString) -> RenderError {
    RenderError::Catalog {
        scheme: scheme.to_string(),
        reason: err.to_string(),
    }
}

/// Consultant block, right-aligned date and subject line.
pub fn header(consultant: &ConsultantInfo, subject_line: &str, date: NaiveDate) -> Section {
    let mut contact = Vec::new();
    if !consultant.email.trim().is_empty() {
        contact.push(format!("Email: {}", consultant.email.trim()));
    }
    if !consultant.phone.trim().is_empty() {
        contact.push(format!("Phone: {}", consultant.phone.trim()));
    }

    let mut section = Section::new(SectionKind::Header).line(TextLine::bold(&consultant.name));
    if !consultant.address.trim().is_empty() {
        section = section.line(TextLine::plain(consultant.address.trim()));
    }
    if !contact.is_empty() {
        section = section.line(TextLine::plain(contact.join("  |  ")));
    }

    section
        .line(TextLine::plain(format!("Date: {}", format_date(date))).aligned(Align::Right))
        .push(Block::Spacer(1.0))
        .line(TextLine::bold(subject_line))
        .push(Block::Spacer(1.0))
}

/// Addressee and opening paragraph.
pub fn salutation(input: &MandateDocumentInput) -> Section {
    let mut section = Section::new(SectionKind::Salutation)
        .line(TextLine::plain("To,"))
        .line(TextLine::bold(&input.client_name));
    for extra in [&input.company, &input.address] {
        let extra = extra.trim();
        if !extra.is_empty() && extra != input.client_name.trim() {
            section = section.line(TextLine::plain(extra));
        }
    }

    section
        .push(Block::Spacer(1.0))
        .line(TextLine::plain("Dear Sir/Madam,"))
        .line(TextLine::plain(
            "Thank you for the opportunity to assist you with government subsidy claims.",
        ))
        .line(TextLine::plain(
            "We are pleased to submit our mandate for the engagement described below.",
        ))
        .push(Block::Spacer(1.0))
}

/// Project particulars as a label/value table.
pub fn commercial_offer(input: &MandateDocumentInput) -> Section {
    let fields: [(&str, Option<&str>); 9] = [
        ("Client Name", Some(input.client_name.as_str())),
        ("Company", Some(input.company.as_str())),
        ("Connected Load (kVA)", Some(input.kva.as_str())),
        ("Type of Case", input.type_of_case.as_deref()),
        ("Category", input.category.as_deref()),
        ("Project Cost", input.project_cost.as_deref()),
        ("Industries Type", input.industries_type.as_deref()),
        ("Term Loan Amount", input.term_loan_amount.as_deref()),
        ("Power Connection", input.power_connection.as_deref()),
    ];
    let pairs = fields
        .into_iter()
        .map(|(label, value)| (label.to_string(), or_not_specified(value).to_string()))
        .collect();

    Section::new(SectionKind::CommercialOffer)
        .push(Block::Heading("Commercial Offer".into()))
        .push(Block::KeyValue(pairs))
}

/// Numbered scheme titles, each followed by its catalog bullets.
pub fn benefits<C: SchemeCatalog + ?Sized>(
    input: &MandateDocumentInput,
    catalog: &C,
) -> Result<Section, RenderError> {
    let mut section =
        Section::new(SectionKind::Benefits).push(Block::Heading("Proposed Benefits".into()));

    if input.schemes.is_empty() {
        return Ok(section.line(TextLine::plain(NO_SCHEMES)));
    }

    for (index, scheme) in input.schemes.iter().enumerate() {
        let entry = catalog
            .resolve(scheme)
            .map_err(|e| catalog_error(scheme, e))?;
        section = section.line(TextLine::bold(numbered_title(index, &entry.title)));
        if !entry.description.is_empty() {
            let bullets = entry
                .description
                .iter()
                .map(|line| TextLine::plain(bullet_line(line)).indented(1))
                .collect();
            section = section.push(Block::List(bullets));
        }
    }
    Ok(section.push(Block::Spacer(0.5)))
}

fn static_list(kind: SectionKind, heading: &str, items: &[&str]) -> Section {
    let lines = items
        .iter()
        .map(|item| TextLine::plain(bullet_line(item)).indented(1))
        .collect();
    Section::new(kind)
        .push(Block::Heading(heading.into()))
        .push(Block::List(lines))
        .push(Block::Spacer(0.5))
}

pub fn work_scope() -> Section {
    static_list(SectionKind::WorkScope, "Scope of Work", WORK_SCOPE)
}

pub fn eligibility() -> Section {
    static_list(SectionKind::Eligibility, "Eligibility Criteria", ELIGIBILITY)
}

/// Fee rows per selected scheme and the total row.
pub fn fees<C: SchemeCatalog + ?Sized>(
    input: &MandateDocumentInput,
    catalog: &C,
    schedule: &FeeSchedule,
) -> Result<Section, RenderError> {
    let mut titled = Vec::with_capacity(input.schemes.len());
    for scheme in &input.schemes {
        let entry = catalog
            .resolve(scheme)
            .map_err(|e| catalog_error(scheme, e))?;
        titled.push((scheme.as_str(), entry.title));
    }
    let rows = schedule.rows(titled);
    let total = schedule.total(&rows);

    let mut table = TableBlock::new(vec![
        Column::new(0.08, Align::Center),
        Column::new(0.52, Align::Left),
        Column::new(0.18, Align::Left),
        Column::new(0.22, Align::Right),
    ])
    .with_header(vec![
        "Sr.".into(),
        "Scheme".into(),
        "Fee Type".into(),
        "Amount".into(),
    ]);

    for (index, row) in rows.iter().enumerate() {
        table.push_row(TableRow::new(vec![
            (index + 1).to_string(),
            row.title.clone(),
            row.label.to_string(),
            row.display_amount(),
        ]));
    }
    table.push_row(TableRow::emphasized(vec![
        String::new(),
        "Total".into(),
        String::new(),
        format_amount(total),
    ]));

    Ok(Section::new(SectionKind::Fees)
        .push(Block::Heading("Professional Fees".into()))
        .push(Block::Table(table)))
}

pub fn terms() -> Section {
    let lines = TERMS
        .iter()
        .enumerate()
        .map(|(index, term)| TextLine::plain(numbered_title(index, term)).indented(1))
        .collect();
    Section::new(SectionKind::Terms)
        .push(Block::Heading("Terms and Conditions".into()))
        .push(Block::List(lines))
}

/// Centered signature line.
pub fn signature(consultant: &ConsultantInfo) -> Section {
    let signatory = if consultant.name.trim().is_empty() {
        "Authorised Signatory".to_string()
    } else {
        format!("For {}  -  Authorised Signatory", consultant.name.trim())
    };
    Section::new(SectionKind::Signature)
        .push(Block::Spacer(3.0))
        .line(TextLine::bold(signatory).aligned(Align::Center))
}
