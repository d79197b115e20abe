/*!
# finsheet

Spreadsheet import for a small-business financial dashboard, built in Rust.

## Overview

The dashboard shows revenue charts, expense breakdowns and headline metrics.
Its data comes from a workbook the user uploads. This crate turns that
workbook into a normalized [`FinancialRecord`], and produces the template
workbook users fill in.

## Import pipeline

1. **Decode** - the workbook (xlsx, xlsm, xlsb, xls, ods) is opened from memory
2. **Sheet roles** - a sheet whose name contains `Dati Mensili` or `Monthly`
   holds one month per row; every other sheet holds label/value rows
3. **Field classification** - labels are matched against an ordered keyword
   table (Italian and English), first match wins
4. **Derived metrics** - annual revenue from the monthly sum when missing,
   expense breakdown from monthly expenses split by industry percentages
5. **Industry backfill** - sales, orders, customers or invoices estimated
   from revenue when the workbook leaves them out

Malformed rows are skipped silently; only a workbook that cannot be decoded
fails the import.

## Modules

- **record**: the imported record and its parts
- **fields**: keyword classifier and lenient number parsing
- **industry**: industry tags, expense tables and backfill rules
- **loader**: the import pipeline
- **downloader**: template workbook export
- **config**: service settings
- **app**: HTTP upload service (`web` feature)

## REST API Endpoints

- `POST /api/import?industry=<tag>` - Imports the uploaded `workbook` field
- `GET /api/data` - Returns the last imported record
- `GET /api/template?industry=<tag>` - Downloads the template workbook
- `GET /health` - Liveness check
*/

pub mod app;
pub mod config;
pub mod downloader;
pub mod error;
pub mod fields;
pub mod industry;
pub mod loader;
pub mod record;

/// Re-export the everyday types to make them easier to use
pub use error::{ImportError, TemplateError};
pub use industry::Industry;
pub use loader::{import_and_apply, import_path, import_workbook};
pub use record::{ExpenseCategory, FinancialData, FinancialRecord, Metric, MonthlyEntry};
