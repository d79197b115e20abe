use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::error::TemplateError;
use crate::industry::Industry;

/// Sheet names of the template, in workbook order.
pub const PROFIT_AND_LOSS_SHEET: &str = "Conto Economico";
pub const BALANCE_SHEET: &str = "Stato Patrimoniale";
pub const MONTHLY_SHEET: &str = "Dati Mensili";
pub const COMPANY_INFO_SHEET: &str = "Info Azienda";

// Label rows with an example amount; `None` leaves the value for the user.
const PROFIT_AND_LOSS_ROWS: &[(&str, Option<f64>)] = &[
    ("Ricavi delle vendite", Some(250_000.0)),
    ("Costo della merce venduta", Some(120_000.0)),
    ("Margine lordo", Some(130_000.0)),
    ("Spese operative", Some(80_000.0)),
    ("Utile netto", Some(50_000.0)),
    ("Numero vendite", None),
    ("Ordini ricevuti", None),
    ("Clienti attivi", None),
    ("Fatture emesse", None),
    ("Tasso di conversione (%)", None),
];

const BALANCE_SHEET_ROWS: &[(&str, Option<f64>)] = &[
    ("Cassa e banche", Some(45_000.0)),
    ("Crediti commerciali", Some(30_000.0)),
    ("Rimanenze", Some(25_000.0)),
    ("Debiti verso fornitori", Some(20_000.0)),
    ("Patrimonio netto", Some(80_000.0)),
];

// Month, revenue, expenses, notes. Profit is written as revenue - expenses.
const MONTHLY_ROWS: &[(&str, f64, f64, &str)] = &[
    ("Gennaio", 18_000.0, 15_000.0, ""),
    ("Febbraio", 19_000.0, 15_500.0, ""),
    ("Marzo", 21_000.0, 16_500.0, ""),
    ("Aprile", 20_000.0, 16_000.0, ""),
    ("Maggio", 22_000.0, 17_500.0, ""),
    ("Giugno", 23_000.0, 18_000.0, ""),
    ("Luglio", 24_000.0, 19_000.0, "Saldi estivi"),
    ("Agosto", 17_000.0, 14_500.0, "Chiusura per ferie"),
    ("Settembre", 21_000.0, 17_000.0, ""),
    ("Ottobre", 22_000.0, 17_500.0, ""),
    ("Novembre", 20_000.0, 16_000.0, ""),
    ("Dicembre", 23_000.0, 17_500.0, "Vendite natalizie"),
];

const COMPANY_INFO_FIELDS: &[&str] = &[
    "Ragione sociale",
    "Partita IVA",
    "Settore",
    "Sede",
    "Numero dipendenti",
    "Anno di fondazione",
];

/// Build the import template workbook
///
/// Produces an XLSX file with four sheets: profit and loss, balance sheet,
/// monthly data and company info. Each sheet has a bold header row followed
/// by fixed example rows. The template reads back through
/// [`crate::loader::import_workbook`] without any edits.
///
/// # Returns
/// * `Result<Vec<u8>, TemplateError>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use finsheet::downloader::template_workbook;
///
/// match template_workbook() {
///     Ok(xlsx_data) => println!("Template generated: {} bytes", xlsx_data.len()),
///     Err(e) => eprintln!("Failed to generate template: {}", e),
/// }
/// ```
pub fn template_workbook() -> Result<Vec<u8>, TemplateError> {
    let header = Format::new().set_bold();
    let amount = Format::new().set_num_format("#,##0");

    let mut workbook = Workbook::new();

    workbook.push_worksheet(label_value_sheet(
        PROFIT_AND_LOSS_SHEET,
        ["Voce", "Importo"],
        PROFIT_AND_LOSS_ROWS,
        &header,
        &amount,
    )?);
    workbook.push_worksheet(label_value_sheet(
        BALANCE_SHEET,
        ["Voce", "Importo"],
        BALANCE_SHEET_ROWS,
        &header,
        &amount,
    )?);
    workbook.push_worksheet(monthly_sheet(&header, &amount)?);
    workbook.push_worksheet(company_info_sheet(&header)?);

    let buffer = workbook.save_to_buffer()?;

    Ok(buffer)
}

/// Download name of the template for `industry`
///
/// Characters other than ASCII letters, digits, `-` and `_` in the tag are
/// replaced with `_`.
///
/// # Examples
/// ```
/// use finsheet::downloader::template_filename;
/// use finsheet::industry::Industry;
///
/// assert_eq!(template_filename(&Industry::Commerce), "template_finanziario_commerce.xlsx");
/// ```
pub fn template_filename(industry: &Industry) -> String {
    let tag: String = industry
        .tag()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("template_finanziario_{}.xlsx", tag)
}

fn label_value_sheet(
    name: &str,
    headers: [&str; 2],
    rows: &[(&str, Option<f64>)],
    header: &Format,
    amount: &Format,
) -> Result<Worksheet, TemplateError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(name)?;
    worksheet.set_column_width(0, 32.0)?;
    worksheet.set_column_width(1, 16.0)?;

    for (c, title) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *title, header)?;
    }

    for (r, (label, value)) in rows.iter().enumerate() {
        let row = (r + 1) as u32;
        worksheet.write_string(row, 0, *label)?;
        if let Some(value) = value {
            worksheet.write_number_with_format(row, 1, *value, amount)?;
        }
    }

    Ok(worksheet)
}

fn monthly_sheet(header: &Format, amount: &Format) -> Result<Worksheet, TemplateError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(MONTHLY_SHEET)?;
    worksheet.set_column_width(0, 14.0)?;
    worksheet.set_column_width(4, 28.0)?;

    for (c, title) in ["Mese", "Ricavi", "Spese", "Utile", "Note"].iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *title, header)?;
    }

    for (r, (month, revenue, expenses, notes)) in MONTHLY_ROWS.iter().enumerate() {
        let row = (r + 1) as u32;
        worksheet.write_string(row, 0, *month)?;
        worksheet.write_number_with_format(row, 1, *revenue, amount)?;
        worksheet.write_number_with_format(row, 2, *expenses, amount)?;
        worksheet.write_number_with_format(row, 3, revenue - expenses, amount)?;
        if !notes.is_empty() {
            worksheet.write_string(row, 4, *notes)?;
        }
    }

    Ok(worksheet)
}

fn company_info_sheet(header: &Format) -> Result<Worksheet, TemplateError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(COMPANY_INFO_SHEET)?;
    worksheet.set_column_width(0, 24.0)?;
    worksheet.set_column_width(1, 32.0)?;

    worksheet.write_string_with_format(0, 0, "Campo", header)?;
    worksheet.write_string_with_format(0, 1, "Valore", header)?;
    for (r, field) in COMPANY_INFO_FIELDS.iter().enumerate() {
        worksheet.write_string((r + 1) as u32, 0, *field)?;
    }

    Ok(worksheet)
}
