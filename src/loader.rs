use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use std::path::Path;

use crate::error::ImportError;
use crate::fields::{cell_text, classify, is_blank, parse_number};
use crate::industry::Industry;
use crate::record::{FinancialRecord, Metric, MonthlyEntry};

/// Sheet name fragments that mark the monthly data sheet.
pub const MONTHLY_SHEET_MARKERS: [&str; 2] = ["Dati Mensili", "Monthly"];

/// File extensions accepted by [`import_path`].
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// How the rows of a sheet are read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetRole {
    /// One month per row: month, revenue, expenses, profit, notes.
    Monthly,
    /// Label/value pairs.
    Fields,
}

impl SheetRole {
    pub fn of(sheet_name: &str) -> Self {
        if MONTHLY_SHEET_MARKERS
            .iter()
            .any(|marker| sheet_name.contains(marker))
        {
            SheetRole::Monthly
        } else {
            SheetRole::Fields
        }
    }
}

/// Import a financial record from workbook bytes
///
/// Decodes the workbook (xlsx, xlsm, xlsb, xls or ods, detected from the
/// content), reads every sheet according to its [`SheetRole`], then derives
/// totals, the expense breakdown and the industry estimates.
///
/// Malformed rows are skipped. Only a workbook that cannot be decoded fails
/// the import, in which case no record is produced.
///
/// # Arguments
/// * `bytes` - The whole workbook file
/// * `industry` - Sector of the company, used only for derivations
///
/// # Returns
/// * `Result<FinancialRecord, ImportError>` - The imported record or an error
///
/// # Examples
/// ```no_run
/// use finsheet::industry::Industry;
/// use finsheet::loader::import_workbook;
///
/// let bytes = std::fs::read("dati.xlsx").unwrap();
/// match import_workbook(&bytes, Industry::Commerce) {
///     Ok(record) => println!("Imported {} months", record.monthly_data.len()),
///     Err(e) => eprintln!("Error importing workbook: {}", e),
/// }
/// ```
pub fn import_workbook(bytes: &[u8], industry: Industry) -> Result<FinancialRecord, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut record = FinancialRecord::create(industry);

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name)?;
        let role = SheetRole::of(sheet_name);
        log::debug!("Reading sheet '{}' as {:?}", sheet_name, role);

        let rows = data_rows(&range);
        match role {
            SheetRole::Monthly => read_monthly_rows(&rows, &mut record),
            SheetRole::Fields => read_field_rows(&rows, &mut record),
        }
    }

    derive_metrics(&mut record);

    log::info!(
        "Imported {} sheet(s), {} month(s), annual revenue {} ({})",
        sheet_names.len(),
        record.monthly_data.len(),
        record.financial_data.annual_revenue,
        record.industry
    );

    Ok(record)
}

/// Import workbook bytes and hand the record to `on_update`
///
/// The callback runs only when the import succeeds, so a failed import
/// leaves the caller's data untouched.
///
/// # Examples
/// ```no_run
/// use finsheet::industry::Industry;
/// use finsheet::loader::import_and_apply;
///
/// let bytes = std::fs::read("dati.xlsx").unwrap();
/// let mut current = None;
/// if let Err(e) = import_and_apply(&bytes, Industry::Ecommerce, |record| current = Some(record)) {
///     eprintln!("Import failed: {}", e);
/// }
/// ```
pub fn import_and_apply<F>(bytes: &[u8], industry: Industry, on_update: F) -> Result<(), ImportError>
where
    F: FnOnce(FinancialRecord),
{
    let record = import_workbook(bytes, industry)?;
    on_update(record);
    Ok(())
}

/// Import a financial record from a workbook on disk
///
/// Checks the file extension before reading the file, then behaves like
/// [`import_workbook`].
///
/// # Examples
/// ```no_run
/// use finsheet::loader::import_path;
///
/// match import_path("dati.xlsx", "consulting".into()) {
///     Ok(record) => println!("Revenue: {}", record.financial_data.annual_revenue),
///     Err(e) => eprintln!("Error loading file: {}", e),
/// }
/// ```
pub fn import_path(
    filepath: impl AsRef<Path>,
    industry: Industry,
) -> Result<FinancialRecord, ImportError> {
    let path = filepath.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => {
            let bytes = std::fs::read(path)?;
            import_workbook(&bytes, industry)
        }
        Some(ext) => Err(ImportError::UnsupportedFormat(ext.to_string())),
        None => Err(ImportError::UnsupportedFormat(String::new())),
    }
}

// Rows of the used range below its first row, the header. Cell 0 is the
// first used column; trailing blank cells are cut.
fn data_rows(range: &Range<Data>) -> Vec<Vec<Data>> {
    range
        .rows()
        .skip(1)
        .map(|row| {
            let mut cells = row.to_vec();
            while cells.last().is_some_and(is_blank) {
                cells.pop();
            }
            cells
        })
        .collect()
}

fn read_monthly_rows(rows: &[Vec<Data>], record: &mut FinancialRecord) {
    for row in rows {
        if row.len() < 4 {
            log::trace!("Skipping short monthly row ({} cells)", row.len());
            continue;
        }

        record.monthly_data.push(MonthlyEntry {
            month: cell_text(&row[0]),
            revenue: parse_number(&row[1]),
            expenses: parse_number(&row[2]),
            profit: parse_number(&row[3]),
            notes: row.get(4).map(cell_text).unwrap_or_default(),
        });
    }
}

fn read_field_rows(rows: &[Vec<Data>], record: &mut FinancialRecord) {
    for row in rows {
        if row.len() < 2 {
            continue;
        }

        let label = cell_text(&row[0]);
        let Some(metric) = classify(&label) else {
            log::trace!("No metric for label '{}'", label);
            continue;
        };
        if is_blank(&row[1]) {
            continue;
        }

        record.financial_data.set(metric, parse_number(&row[1]));
    }
}

fn derive_metrics(record: &mut FinancialRecord) {
    let total_revenue = record.total_revenue();
    if record.financial_data.is_unset(Metric::AnnualRevenue) && total_revenue > 0.0 {
        record.financial_data.annual_revenue = total_revenue;
    }

    let total_expenses = record.total_expenses();
    if total_expenses > 0.0 {
        record.financial_data.expense_breakdown =
            Some(record.industry.expense_breakdown(total_expenses));
    }

    record.industry.backfill(&mut record.financial_data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_markers_are_case_sensitive_substrings() {
        assert_eq!(SheetRole::of("Dati Mensili"), SheetRole::Monthly);
        assert_eq!(SheetRole::of("Monthly Data 2024"), SheetRole::Monthly);
        assert_eq!(SheetRole::of("2024 - Dati Mensili"), SheetRole::Monthly);
        assert_eq!(SheetRole::of("dati mensili"), SheetRole::Fields);
        assert_eq!(SheetRole::of("Conto Economico"), SheetRole::Fields);
    }

    #[test]
    fn derive_sums_revenue_only_when_unset() {
        let mut record = FinancialRecord::create(Industry::from_tag("services"));
        record.monthly_data.push(MonthlyEntry {
            month: "Gen".into(),
            revenue: 100.0,
            expenses: 60.0,
            profit: 40.0,
            notes: String::new(),
        });
        record.monthly_data.push(MonthlyEntry {
            month: "Feb".into(),
            revenue: 50.0,
            expenses: 40.0,
            profit: 10.0,
            notes: String::new(),
        });
        derive_metrics(&mut record);
        assert_eq!(record.financial_data.annual_revenue, 150.0);

        let breakdown = record.financial_data.expense_breakdown.unwrap();
        assert_eq!(breakdown[0].value, 70.0);
        assert_eq!(breakdown[1].value, 30.0);

        let mut explicit = FinancialRecord::create(Industry::Commerce);
        explicit.financial_data.annual_revenue = 9000.0;
        explicit.monthly_data.push(MonthlyEntry {
            month: "Gen".into(),
            revenue: 100.0,
            ..Default::default()
        });
        derive_metrics(&mut explicit);
        assert_eq!(explicit.financial_data.annual_revenue, 9000.0);
        assert_eq!(explicit.financial_data.number_of_sales, 60.0);
        assert!(explicit.financial_data.expense_breakdown.is_none());
    }

    #[test]
    fn negative_monthly_sum_is_not_copied_into_revenue() {
        let mut record = FinancialRecord::create(Industry::Commerce);
        record.monthly_data.push(MonthlyEntry {
            month: "Gen".into(),
            revenue: -100.0,
            expenses: 50.0,
            profit: -150.0,
            notes: String::new(),
        });
        derive_metrics(&mut record);

        assert_eq!(record.financial_data.annual_revenue, 0.0);
        assert_eq!(record.financial_data.number_of_sales, 0.0);
        assert!(record.financial_data.expense_breakdown.is_some());
    }

    #[test]
    fn import_path_rejects_unknown_extensions() {
        let err = import_path("report.pdf", Industry::Commerce).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "pdf"));

        let err = import_path("report", Industry::Commerce).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = import_workbook(b"not a workbook", Industry::Commerce).unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));
    }
}
