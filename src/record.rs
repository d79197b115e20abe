use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::industry::Industry;

/// The normalized result of one workbook import.
///
/// Built fresh for every import call and never merged with earlier state.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    /// Free-form company attributes, owned by the caller.
    pub company_info: BTreeMap<String, String>,
    pub financial_data: FinancialData,
    pub monthly_data: Vec<MonthlyEntry>,
    pub industry: Industry,
}

/// Headline metrics of a business. A metric equal to 0 counts as unset.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub annual_revenue: f64,
    pub number_of_sales: f64,
    pub orders_received: f64,
    pub active_customers: f64,
    pub invoices_issued: f64,
    pub client_credits: f64,
    pub merchandise_cost: f64,
    pub gross_margin: f64,
    pub conversion_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_breakdown: Option<Vec<ExpenseCategory>>,
}

/// One row of the monthly sheet.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct MonthlyEntry {
    pub month: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub notes: String,
}

/// A named slice of total expenses, with the chart color used to draw it.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ExpenseCategory {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// Keys of the scalar metrics in [`FinancialData`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    AnnualRevenue,
    NumberOfSales,
    OrdersReceived,
    ActiveCustomers,
    InvoicesIssued,
    ClientCredits,
    MerchandiseCost,
    GrossMargin,
    ConversionRate,
}

impl Metric {
    /// The camelCase key used in the serialized record.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::AnnualRevenue => "annualRevenue",
            Metric::NumberOfSales => "numberOfSales",
            Metric::OrdersReceived => "ordersReceived",
            Metric::ActiveCustomers => "activeCustomers",
            Metric::InvoicesIssued => "invoicesIssued",
            Metric::ClientCredits => "clientCredits",
            Metric::MerchandiseCost => "merchandiseCost",
            Metric::GrossMargin => "grossMargin",
            Metric::ConversionRate => "conversionRate",
        }
    }
}

impl FinancialData {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AnnualRevenue => self.annual_revenue,
            Metric::NumberOfSales => self.number_of_sales,
            Metric::OrdersReceived => self.orders_received,
            Metric::ActiveCustomers => self.active_customers,
            Metric::InvoicesIssued => self.invoices_issued,
            Metric::ClientCredits => self.client_credits,
            Metric::MerchandiseCost => self.merchandise_cost,
            Metric::GrossMargin => self.gross_margin,
            Metric::ConversionRate => self.conversion_rate,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        let slot = match metric {
            Metric::AnnualRevenue => &mut self.annual_revenue,
            Metric::NumberOfSales => &mut self.number_of_sales,
            Metric::OrdersReceived => &mut self.orders_received,
            Metric::ActiveCustomers => &mut self.active_customers,
            Metric::InvoicesIssued => &mut self.invoices_issued,
            Metric::ClientCredits => &mut self.client_credits,
            Metric::MerchandiseCost => &mut self.merchandise_cost,
            Metric::GrossMargin => &mut self.gross_margin,
            Metric::ConversionRate => &mut self.conversion_rate,
        };
        *slot = value;
    }

    /// Zero and NaN both mean the metric was never filled in.
    pub fn is_unset(&self, metric: Metric) -> bool {
        let value = self.get(metric);
        value == 0.0 || value.is_nan()
    }
}

impl FinancialRecord {
    pub fn create(industry: Industry) -> Self {
        FinancialRecord {
            company_info: BTreeMap::new(),
            financial_data: FinancialData::default(),
            monthly_data: Vec::new(),
            industry,
        }
    }

    pub fn total_revenue(&self) -> f64 {
        self.monthly_data.iter().map(|m| m.revenue).sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.monthly_data.iter().map(|m| m.expenses).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut record = FinancialRecord::create(Industry::Commerce);
        record.financial_data.annual_revenue = 1200.0;
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["financialData"]["annualRevenue"], 1200.0);
        assert_eq!(json["industry"], "commerce");
        assert!(json["companyInfo"].as_object().unwrap().is_empty());
        assert!(json["financialData"].get("expenseBreakdown").is_none());
    }

    #[test]
    fn set_and_get_cover_every_metric() {
        let metrics = [
            Metric::AnnualRevenue,
            Metric::NumberOfSales,
            Metric::OrdersReceived,
            Metric::ActiveCustomers,
            Metric::InvoicesIssued,
            Metric::ClientCredits,
            Metric::MerchandiseCost,
            Metric::GrossMargin,
            Metric::ConversionRate,
        ];
        let mut data = FinancialData::default();
        for (i, metric) in metrics.iter().enumerate() {
            assert!(data.is_unset(*metric));
            data.set(*metric, (i + 1) as f64);
        }

        let json = serde_json::to_value(&data).unwrap();
        for (i, metric) in metrics.iter().enumerate() {
            assert_eq!(data.get(*metric), (i + 1) as f64);
            assert_eq!(json[metric.key()], (i + 1) as f64);
        }
    }
}
