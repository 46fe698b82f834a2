//! Reshapes the flat `fnlttSinglAcnt` list into a [`FinancialModel`].
//!
//! Each record is classified on its own: accepted into one of the four
//! statement sequences, ignored because its division is not one of
//! `BS`/`IS`/`CF`/`SC`, or skipped because a required field is missing.
//! Skips are logged and never fail the whole model.

use crate::error::{ExplainerError, Result};
use crate::schema::{
    DisclosureItem, FinancialModel, NormalizedEntry, RawStatementRecord, StatementDivision,
    YearLabels, ZERO_AMOUNT,
};
use log::{debug, warn};
use serde_json::Value;

const DATE_SEPARATOR: char = '.';
const THOUSANDS_SEPARATOR: char = ',';
const YEAR_SUFFIX: &str = "년";

pub fn normalize(items: &[DisclosureItem]) -> FinancialModel {
    let mut model = FinancialModel {
        years: derive_year_labels(items.first()),
        ..FinancialModel::default()
    };

    for (idx, item) in items.iter().enumerate() {
        let record = match item {
            DisclosureItem::Record(record) => record,
            DisclosureItem::Malformed(value) => {
                warn!("Skipping record #{}: malformed item {}", idx, value);
                continue;
            }
        };

        match normalize_record(record) {
            Ok(Some((division, entry))) => model.entries_mut(division).push(entry),
            Ok(None) => debug!(
                "Ignoring record #{} with division {:?}",
                idx,
                record.sj_div.as_deref().unwrap_or("")
            ),
            Err(e) => warn!("Skipping record #{}: {} ({:?})", idx, e, record),
        }
    }

    debug!(
        "Normalized {} of {} records (BS {}, IS {}, CF {}, SC {})",
        model.total_entries(),
        items.len(),
        model.balance_sheet.len(),
        model.income_statement.len(),
        model.cash_flow.len(),
        model.changes_in_equity.len()
    );

    model
}

/// `Ok(None)` means the record belongs to no statement we present.
pub fn normalize_record(
    record: &RawStatementRecord,
) -> Result<Option<(StatementDivision, NormalizedEntry)>> {
    let Some(division) = record
        .sj_div
        .as_deref()
        .and_then(StatementDivision::from_code)
    else {
        return Ok(None);
    };

    let account_nm = required(&record.account_nm, "account_nm")?;
    let thstrm_amount = required(&record.thstrm_amount, "thstrm_amount")?;
    let frmtrm_amount = required(&record.frmtrm_amount, "frmtrm_amount")?;

    let entry = NormalizedEntry {
        account_nm: account_nm.to_string(),
        thstrm_amount: strip_separators(thstrm_amount),
        frmtrm_amount: strip_separators(frmtrm_amount),
        bfefrmtrm_amount: record
            .bfefrmtrm_amount
            .as_deref()
            .map(strip_separators)
            .unwrap_or_else(|| ZERO_AMOUNT.to_string()),
    };

    Ok(Some((division, entry)))
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .ok_or_else(|| ExplainerError::RecordSkipped(format!("missing {}", name)))
}

pub fn strip_separators(amount: &str) -> String {
    amount.replace(THOUSANDS_SEPARATOR, "")
}

/// Labels come from the first item only. A malformed first item still
/// contributes whichever date fields are strings, even though its amounts
/// are skipped.
pub fn derive_year_labels(first: Option<&DisclosureItem>) -> YearLabels {
    match first {
        Some(DisclosureItem::Record(record)) => YearLabels {
            thstrm: year_label(record.thstrm_dt.as_deref()),
            frmtrm: year_label(record.frmtrm_dt.as_deref()),
            bfefrmtrm: year_label(record.bfefrmtrm_dt.as_deref()),
        },
        Some(DisclosureItem::Malformed(value)) => {
            let date = |field: &str| year_label(value.get(field).and_then(Value::as_str));
            YearLabels {
                thstrm: date("thstrm_dt"),
                frmtrm: date("frmtrm_dt"),
                bfefrmtrm: date("bfefrmtrm_dt"),
            }
        }
        None => YearLabels::default(),
    }
}

/// `2023.12.31` -> `2023년`; a missing or empty date yields an empty label.
pub fn year_label(date: Option<&str>) -> String {
    match date {
        Some(date) if !date.is_empty() => {
            let year = date.split(DATE_SEPARATOR).next().unwrap_or(date);
            format!("{}{}", year, YEAR_SUFFIX)
        }
        _ => String::new(),
    }
}
