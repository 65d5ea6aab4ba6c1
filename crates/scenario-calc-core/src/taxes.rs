//! Revenue-based tax components plus the flat effective income tax rate
//! applied to pre-tax income. Bracketed/progressive tax schedules and
//! credits are modeled but, matching the reference implementation, never
//! factored into the monthly computation.

use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    GrossRevenue,
    NetRevenue,
    Ebit,
    Ebt,
    Payroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    Simples,
    LucroPresumido,
    LucroReal,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    pub threshold: Money,
    pub rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComponent {
    pub name: String,
    pub base: TaxBase,
    pub rate: Rate,
    #[serde(default)]
    pub deductible: bool,
}

/// Declared for schema parity with the reference model; never consulted by
/// `compute_revenue_taxes`, which only walks `TaxModel::taxes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveTax {
    pub name: String,
    pub base: TaxBase,
    pub brackets: Vec<TaxBracket>,
}

/// Declared for schema parity; never applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCredit {
    pub name: String,
    pub base: TaxBase,
    pub rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxModel {
    pub regime: TaxRegime,
    #[serde(default)]
    pub taxes: Vec<TaxComponent>,
    #[serde(default)]
    pub progressive: Vec<ProgressiveTax>,
    #[serde(default)]
    pub credits: Vec<TaxCredit>,
    #[serde(default)]
    pub effective_income_tax_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub name: String,
    pub amount: Money,
}

/// Revenue-base taxes (PIS/COFINS, ISS, and similar). Every component's
/// amount is reported in the breakdown, but only gross- and net-revenue
/// based components feed back into `net_revenue` — payroll-based
/// components (e.g. payroll tax riders declared here rather than as a
/// headcount cost) are informational only. A component whose `base` is
/// `Ebit` or `Ebt` has no value available at this point in the pipeline
/// and falls back to `total_net`, matching the reference model.
pub fn compute_revenue_taxes(
    revenue_total_gross: Money,
    revenue_total_net: Money,
    tax_model: &TaxModel,
    payroll_total: Money,
) -> (Money, Vec<TaxBreakdown>) {
    let mut tax_amount = Money::ZERO;
    let mut breakdown = Vec::with_capacity(tax_model.taxes.len());

    for tax in &tax_model.taxes {
        let base = match tax.base {
            TaxBase::GrossRevenue => revenue_total_gross,
            TaxBase::NetRevenue => revenue_total_net,
            TaxBase::Payroll => payroll_total,
            TaxBase::Ebit | TaxBase::Ebt => revenue_total_net,
        };
        let amount = base * tax.rate;
        breakdown.push(TaxBreakdown {
            name: tax.name.clone(),
            amount,
        });
        if matches!(tax.base, TaxBase::GrossRevenue | TaxBase::NetRevenue) {
            tax_amount += amount;
        }
    }

    (tax_amount, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn gross_and_net_revenue_taxes_reduce_net_revenue() {
        let model = TaxModel {
            regime: TaxRegime::LucroPresumido,
            taxes: vec![
                TaxComponent {
                    name: "PIS/COFINS".into(),
                    base: TaxBase::GrossRevenue,
                    rate: dec!(0.0365),
                    deductible: false,
                },
                TaxComponent {
                    name: "ISS".into(),
                    base: TaxBase::NetRevenue,
                    rate: dec!(0.03),
                    deductible: false,
                },
            ],
            progressive: vec![],
            credits: vec![],
            effective_income_tax_rate: dec!(0.24),
        };
        let (tax_amount, breakdown) = compute_revenue_taxes(dec!(100000), dec!(100000), &model, Decimal::ZERO);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(tax_amount, dec!(6650));
    }

    #[test]
    fn payroll_based_tax_is_reported_but_not_deducted_from_revenue() {
        let model = TaxModel {
            regime: TaxRegime::Custom,
            taxes: vec![TaxComponent {
                name: "Payroll levy".into(),
                base: TaxBase::Payroll,
                rate: dec!(0.05),
                deductible: false,
            }],
            progressive: vec![],
            credits: vec![],
            effective_income_tax_rate: Decimal::ZERO,
        };
        let (tax_amount, breakdown) = compute_revenue_taxes(dec!(100000), dec!(100000), &model, dec!(50000));
        assert_eq!(breakdown[0].amount, dec!(2500));
        assert_eq!(tax_amount, Decimal::ZERO);
    }

    #[test]
    fn ebit_base_falls_back_to_net_revenue() {
        let model = TaxModel {
            regime: TaxRegime::Custom,
            taxes: vec![TaxComponent {
                name: "Hypothetical EBIT tax".into(),
                base: TaxBase::Ebit,
                rate: dec!(0.1),
                deductible: false,
            }],
            progressive: vec![],
            credits: vec![],
            effective_income_tax_rate: Decimal::ZERO,
        };
        let (_, breakdown) = compute_revenue_taxes(dec!(100000), dec!(80000), &model, Decimal::ZERO);
        assert_eq!(breakdown[0].amount, dec!(8000));
    }
}
