use calamine::Data;
use lazy_static::lazy_static;
use regex::Regex;

use crate::record::Metric;

/// A label pattern and the metric it fills.
pub struct FieldRule {
    pub pattern: Regex,
    pub metric: Metric,
}

fn rule(pattern: &str, metric: Metric) -> FieldRule {
    FieldRule {
        pattern: Regex::new(pattern).unwrap(),
        metric,
    }
}

lazy_static! {
    /// Label rules in priority order; the first match wins.
    ///
    /// "Crediti clienti" therefore lands on active customers, not on client
    /// credits.
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        rule(r"ricavi|revenue", Metric::AnnualRevenue),
        rule(r"vendite|sales", Metric::NumberOfSales),
        rule(r"ordini|orders", Metric::OrdersReceived),
        rule(r"clienti|customers", Metric::ActiveCustomers),
        rule(r"fatture|invoices", Metric::InvoicesIssued),
        rule(r"crediti|credits", Metric::ClientCredits),
        rule(r"(?s)costo.*merce|merce.*costo", Metric::MerchandiseCost),
        rule(r"margine|margin", Metric::GrossMargin),
        rule(r"conversione|conversion", Metric::ConversionRate),
    ];

    // Leading float literal, anything after it is ignored.
    static ref NUMBER_PREFIX: Regex =
        Regex::new(r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)").unwrap();
}

/// Maps a row label to the metric it fills, if any.
///
/// Matching is a case-insensitive substring search over [`FIELD_RULES`].
pub fn classify(label: &str) -> Option<Metric> {
    let label = label.to_lowercase();
    FIELD_RULES
        .iter()
        .find(|r| r.pattern.is_match(&label))
        .map(|r| r.metric)
}

/// Parses the leading number of a text value, 0 when there is none.
///
/// # Examples
/// ```
/// use finsheet::fields::parse_number_str;
///
/// assert_eq!(parse_number_str("1250.50"), 1250.5);
/// assert_eq!(parse_number_str("  42 EUR"), 42.0);
/// assert_eq!(parse_number_str("n/a"), 0.0);
/// assert_eq!(parse_number_str(""), 0.0);
/// ```
pub fn parse_number_str(text: &str) -> f64 {
    NUMBER_PREFIX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Reads a cell as a number. Anything without a numeric reading yields 0.
pub fn parse_number(cell: &Data) -> f64 {
    match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::DateTime(dt) => dt.as_f64(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => parse_number_str(s),
        Data::Bool(_) | Data::Error(_) | Data::Empty => 0.0,
    }
}

/// Reads a cell as display text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => e.to_string(),
    }
}

/// True for cells that carry no value at all.
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}
