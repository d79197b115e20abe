use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::{ExpenseCategory, FinancialData, Metric};

/// Business sector of the company being imported.
///
/// Supplied by the caller, never inferred from the workbook. Tags without a
/// dedicated variant are kept verbatim in [`Industry::Other`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    #[default]
    Commerce,
    Ecommerce,
    Consulting,
    Manufacturing,
    Restaurant,
    Other(String),
}

/// A fixed share of total expenses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpenseShare {
    pub name: &'static str,
    pub percentage: f64,
    pub color: &'static str,
}

const fn share(name: &'static str, percentage: f64, color: &'static str) -> ExpenseShare {
    ExpenseShare {
        name,
        percentage,
        color,
    }
}

const COMMERCE_SHARES: &[ExpenseShare] = &[
    share("Costo merce", 0.50, "#3b82f6"),
    share("Personale", 0.15, "#10b981"),
    share("Affitto", 0.20, "#f59e0b"),
    share("Marketing", 0.08, "#ef4444"),
    share("Altro", 0.07, "#8b5cf6"),
];

const ECOMMERCE_SHARES: &[ExpenseShare] = &[
    share("Costo merce", 0.45, "#3b82f6"),
    share("Spedizioni", 0.15, "#10b981"),
    share("Marketing", 0.20, "#ef4444"),
    share("Piattaforma", 0.10, "#f59e0b"),
    share("Altro", 0.10, "#8b5cf6"),
];

const CONSULTING_SHARES: &[ExpenseShare] = &[
    share("Personale", 0.60, "#10b981"),
    share("Formazione", 0.10, "#3b82f6"),
    share("Ufficio", 0.15, "#f59e0b"),
    share("Marketing", 0.10, "#ef4444"),
    share("Altro", 0.05, "#8b5cf6"),
];

const MANUFACTURING_SHARES: &[ExpenseShare] = &[
    share("Materie prime", 0.40, "#3b82f6"),
    share("Personale", 0.25, "#10b981"),
    share("Energia", 0.15, "#f59e0b"),
    share("Manutenzione", 0.10, "#ef4444"),
    share("Altro", 0.10, "#8b5cf6"),
];

const RESTAURANT_SHARES: &[ExpenseShare] = &[
    share("Materie prime", 0.35, "#3b82f6"),
    share("Personale", 0.30, "#10b981"),
    share("Affitto", 0.15, "#f59e0b"),
    share("Utenze", 0.10, "#ef4444"),
    share("Altro", 0.10, "#8b5cf6"),
];

const DEFAULT_SHARES: &[ExpenseShare] = &[
    share("Costi operativi", 0.70, "#3b82f6"),
    share("Altri costi", 0.30, "#8b5cf6"),
];

/// Average ticket used to estimate the number of sales of a shop.
const COMMERCE_AVERAGE_SALE: f64 = 150.0;
/// Average order value used to estimate online orders.
const ECOMMERCE_AVERAGE_ORDER: f64 = 85.0;
/// Share of online orders attributed to distinct customers.
const ECOMMERCE_CUSTOMERS_PER_ORDER: f64 = 0.7;

/// Half-up rounding, the way dashboard figures are rounded everywhere.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

impl Industry {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "commerce" => Industry::Commerce,
            "ecommerce" => Industry::Ecommerce,
            "consulting" => Industry::Consulting,
            "manufacturing" => Industry::Manufacturing,
            "restaurant" => Industry::Restaurant,
            other => Industry::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Industry::Commerce => "commerce",
            Industry::Ecommerce => "ecommerce",
            Industry::Consulting => "consulting",
            Industry::Manufacturing => "manufacturing",
            Industry::Restaurant => "restaurant",
            Industry::Other(tag) => tag,
        }
    }

    /// Expense split used for the breakdown chart.
    pub fn expense_shares(&self) -> &'static [ExpenseShare] {
        match self {
            Industry::Commerce => COMMERCE_SHARES,
            Industry::Ecommerce => ECOMMERCE_SHARES,
            Industry::Consulting => CONSULTING_SHARES,
            Industry::Manufacturing => MANUFACTURING_SHARES,
            Industry::Restaurant => RESTAURANT_SHARES,
            Industry::Other(_) => DEFAULT_SHARES,
        }
    }

    /// Splits `total_expenses` by the industry's shares.
    ///
    /// Each category is rounded on its own, so the values can miss the total
    /// by a unit or two.
    pub fn expense_breakdown(&self, total_expenses: f64) -> Vec<ExpenseCategory> {
        self.expense_shares()
            .iter()
            .map(|s| ExpenseCategory {
                name: s.name.to_string(),
                value: round_half_up(total_expenses * s.percentage),
                color: s.color.to_string(),
            })
            .collect()
    }

    /// Estimates metrics the workbook left unset from the annual revenue.
    ///
    /// Does nothing unless the revenue is positive, so no estimate ever
    /// comes out negative.
    pub fn backfill(&self, data: &mut FinancialData) {
        if data.annual_revenue <= 0.0 || data.annual_revenue.is_nan() {
            return;
        }
        let revenue = data.annual_revenue;

        match self {
            Industry::Commerce => {
                if data.is_unset(Metric::NumberOfSales) {
                    data.number_of_sales = round_half_up(revenue / COMMERCE_AVERAGE_SALE);
                }
            }
            Industry::Ecommerce => {
                if data.is_unset(Metric::OrdersReceived) {
                    data.orders_received = round_half_up(revenue / ECOMMERCE_AVERAGE_ORDER);
                }
                if data.is_unset(Metric::ActiveCustomers) && data.orders_received > 0.0 {
                    data.active_customers =
                        round_half_up(data.orders_received * ECOMMERCE_CUSTOMERS_PER_ORDER);
                }
            }
            Industry::Consulting => {
                if data.is_unset(Metric::InvoicesIssued) {
                    data.invoices_issued = revenue;
                }
            }
            Industry::Manufacturing | Industry::Restaurant | Industry::Other(_) => {}
        }
    }
}

impl From<String> for Industry {
    fn from(tag: String) -> Self {
        Industry::from_tag(&tag)
    }
}

impl From<&str> for Industry {
    fn from(tag: &str) -> Self {
        Industry::from_tag(tag)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.tag().to_string()
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_revenue(revenue: f64) -> FinancialData {
        FinancialData {
            annual_revenue: revenue,
            ..Default::default()
        }
    }

    #[test]
    fn tags_round_trip_and_unknown_tags_are_kept() {
        for tag in ["commerce", "ecommerce", "consulting", "manufacturing", "restaurant"] {
            assert_eq!(Industry::from_tag(tag).tag(), tag);
        }
        assert_eq!(
            Industry::from_tag("agriculture"),
            Industry::Other("agriculture".to_string())
        );
        assert_eq!(Industry::from_tag("Commerce").tag(), "Commerce");
    }

    #[test]
    fn every_table_sums_to_one() {
        for industry in [
            Industry::Commerce,
            Industry::Ecommerce,
            Industry::Consulting,
            Industry::Manufacturing,
            Industry::Restaurant,
            Industry::Other("x".into()),
        ] {
            let total: f64 = industry.expense_shares().iter().map(|s| s.percentage).sum();
            assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", industry, total);
        }
    }

    #[test]
    fn commerce_breakdown_uses_five_fixed_shares() {
        let breakdown = Industry::Commerce.expense_breakdown(100_000.0);
        let values: Vec<f64> = breakdown.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![50_000.0, 15_000.0, 20_000.0, 8_000.0, 7_000.0]);
    }

    #[test]
    fn unknown_industry_uses_seventy_thirty_split() {
        let breakdown = Industry::from_tag("services").expense_breakdown(1000.0);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].value, 700.0);
        assert_eq!(breakdown[1].value, 300.0);
    }

    #[test]
    fn independent_rounding_is_not_reconciled() {
        // 17.5 and 7.5 both round up.
        let breakdown = Industry::from_tag("services").expense_breakdown(25.0);
        let total: f64 = breakdown.iter().map(|c| c.value).sum();
        assert_eq!(breakdown[0].value, 18.0);
        assert_eq!(breakdown[1].value, 8.0);
        assert_eq!(total, 26.0);
    }

    #[test]
    fn commerce_estimates_sales() {
        let mut data = with_revenue(150_000.0);
        Industry::Commerce.backfill(&mut data);
        assert_eq!(data.number_of_sales, 1000.0);
    }

    #[test]
    fn commerce_keeps_explicit_sales() {
        let mut data = with_revenue(150_000.0);
        data.number_of_sales = 42.0;
        Industry::Commerce.backfill(&mut data);
        assert_eq!(data.number_of_sales, 42.0);
    }

    #[test]
    fn ecommerce_estimates_orders_then_customers() {
        let mut data = with_revenue(85_000.0);
        Industry::Ecommerce.backfill(&mut data);
        assert_eq!(data.orders_received, 1000.0);
        assert_eq!(data.active_customers, 700.0);
    }

    #[test]
    fn ecommerce_derives_customers_from_explicit_orders() {
        let mut data = with_revenue(85_000.0);
        data.orders_received = 10.0;
        Industry::Ecommerce.backfill(&mut data);
        assert_eq!(data.orders_received, 10.0);
        assert_eq!(data.active_customers, 7.0);
    }

    #[test]
    fn consulting_copies_revenue_into_invoices() {
        let mut data = with_revenue(12_345.0);
        Industry::Consulting.backfill(&mut data);
        assert_eq!(data.invoices_issued, 12_345.0);
    }

    #[test]
    fn nothing_is_backfilled_without_revenue() {
        let mut data = FinancialData::default();
        Industry::Ecommerce.backfill(&mut data);
        Industry::Commerce.backfill(&mut data);
        Industry::Consulting.backfill(&mut data);
        assert_eq!(data, FinancialData::default());
    }

    #[test]
    fn negative_revenue_is_never_backfilled() {
        for industry in [Industry::Commerce, Industry::Ecommerce, Industry::Consulting] {
            let mut data = with_revenue(-8500.0);
            industry.backfill(&mut data);
            assert_eq!(data, with_revenue(-8500.0), "{} backfilled", industry);
        }
    }

    #[test]
    fn ecommerce_skips_customers_for_negative_orders() {
        let mut data = with_revenue(85_000.0);
        data.orders_received = -10.0;
        Industry::Ecommerce.backfill(&mut data);
        assert_eq!(data.active_customers, 0.0);
    }

    #[test]
    fn ecommerce_keeps_explicit_customers() {
        let mut data = with_revenue(85_000.0);
        data.active_customers = 5.0;
        Industry::Ecommerce.backfill(&mut data);
        assert_eq!(data.orders_received, 1000.0);
        assert_eq!(data.active_customers, 5.0);
    }

    #[test]
    fn manufacturing_and_restaurant_tables() {
        let split = |industry: Industry| -> Vec<(String, f64)> {
            industry
                .expense_breakdown(10_000.0)
                .into_iter()
                .map(|c| (c.name, c.value))
                .collect()
        };
        let owned = |v: &[(&str, f64)]| -> Vec<(String, f64)> {
            v.iter().map(|(n, x)| (n.to_string(), *x)).collect()
        };

        assert_eq!(
            split(Industry::Manufacturing),
            owned(&[
                ("Materie prime", 4000.0),
                ("Personale", 2500.0),
                ("Energia", 1500.0),
                ("Manutenzione", 1000.0),
                ("Altro", 1000.0),
            ])
        );
        assert_eq!(
            split(Industry::Restaurant),
            owned(&[
                ("Materie prime", 3500.0),
                ("Personale", 3000.0),
                ("Affitto", 1500.0),
                ("Utenze", 1000.0),
                ("Altro", 1000.0),
            ])
        );
    }

    #[test]
    fn other_industries_have_no_backfill() {
        let mut data = with_revenue(50_000.0);
        Industry::Restaurant.backfill(&mut data);
        assert_eq!(data, with_revenue(50_000.0));
    }
}
