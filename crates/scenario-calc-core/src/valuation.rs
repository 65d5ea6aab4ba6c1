//! Valuation layer: a monthly-discounted DCF, exit multiples on the final
//! year's metrics, the VC (required-ownership) method, and a literal
//! weighted scorecard.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::funding::FundingModel;
use crate::results::AnnualSummary;
use crate::types::{Money, Multiple, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalValueMethod {
    Perpetuity,
    Multiple,
}

impl Default for TerminalValueMethod {
    fn default() -> Self {
        TerminalValueMethod::Perpetuity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultipleMetric {
    Revenue,
    Ebitda,
    Arr,
}

impl Default for MultipleMetric {
    fn default() -> Self {
        MultipleMetric::Ebitda
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSettings {
    pub wacc: Rate,
    pub perpetual_growth_rate: Rate,
    #[serde(default)]
    pub terminal_method: TerminalValueMethod,
    #[serde(default)]
    pub terminal_multiple: Multiple,
    #[serde(default)]
    pub terminal_multiple_metric: MultipleMetric,
    #[serde(default)]
    pub exit_year_multiple: Multiple,
    #[serde(default = "default_exit_year")]
    pub target_exit_year: u32,
    #[serde(default = "default_vc_discount_rate")]
    pub discount_rate_vc: Rate,
    #[serde(default = "one")]
    pub probability_of_success: Rate,
    #[serde(default)]
    pub scorecard_weights: HashMap<String, Decimal>,
}

fn default_exit_year() -> u32 {
    5
}

fn default_vc_discount_rate() -> Rate {
    dec!(0.3)
}

fn one() -> Rate {
    Decimal::ONE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountedCashFlowResult {
    pub enterprise_value: Money,
    pub equity_value: Money,
    pub pv_of_cash_flows: Money,
    pub pv_of_terminal_value: Money,
    pub terminal_value: Money,
    pub discount_factors: Vec<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleValuationResult {
    pub metric: MultipleMetric,
    pub multiple: Multiple,
    pub value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VCValuationResult {
    pub exit_value: Money,
    pub ownership_required: Rate,
    pub post_money: Money,
    pub pre_money: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardValuationResult {
    pub total_score: Rate,
    pub valuation: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub dcf: DiscountedCashFlowResult,
    pub multiples: Vec<MultipleValuationResult>,
    pub vc_method: VCValuationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<ScorecardValuationResult>,
}

/// Discounts a stream of monthly FCFF at `wacc`, using `(1+wacc)^(i/12)`
/// for month `i` (1-indexed) — a monthly-compounding convention, not the
/// mid-year convention some DCF implementations default to.
pub fn monthly_discount_factor(wacc: Rate, month_number: u32) -> Rate {
    (Decimal::ONE + wacc).powd(Decimal::from(month_number) / dec!(12))
}

fn metric_value(metric: MultipleMetric, last: &AnnualSummary) -> Money {
    match metric {
        MultipleMetric::Ebitda => last.income_statement.ebitda,
        MultipleMetric::Revenue | MultipleMetric::Arr => last.income_statement.net_revenue,
    }
}

/// Gordon-growth perpetuity or terminal-multiple value on the last
/// projected year. Perpetuity requires `wacc > perpetual_growth_rate`,
/// enforced by [`ScenarioInput::validate`](crate::scenario::ScenarioInput::validate)
/// before a run reaches this point.
pub fn compute_terminal_value(settings: &ValuationSettings, annual_summaries: &[AnnualSummary]) -> Money {
    let Some(last) = annual_summaries.last() else {
        return Decimal::ZERO;
    };
    match settings.terminal_method {
        TerminalValueMethod::Perpetuity => {
            let fcff = last.cash_flow.fcff / Decimal::from(12);
            (fcff * (Decimal::ONE + settings.perpetual_growth_rate)) / (settings.wacc - settings.perpetual_growth_rate)
        }
        TerminalValueMethod::Multiple => metric_value(settings.terminal_multiple_metric, last) * settings.terminal_multiple,
    }
}

/// Applies the terminal multiple to the terminal metric, and
/// `exit_year_multiple` (falling back to `terminal_multiple`) to every
/// other tracked metric, on the final projected year.
pub fn compute_multiples(settings: &ValuationSettings, annual_summaries: &[AnnualSummary]) -> Vec<MultipleValuationResult> {
    let Some(last) = annual_summaries.last() else {
        return Vec::new();
    };
    [MultipleMetric::Ebitda, MultipleMetric::Revenue, MultipleMetric::Arr]
        .into_iter()
        .map(|metric| {
            let value = metric_value(metric, last);
            let multiple = if metric == settings.terminal_multiple_metric {
                settings.terminal_multiple
            } else if settings.exit_year_multiple.is_zero() {
                settings.terminal_multiple
            } else {
                settings.exit_year_multiple
            };
            MultipleValuationResult {
                metric,
                multiple,
                value: value * multiple,
            }
        })
        .collect()
}

/// The venture-capital method: discount a projected exit value back to
/// present, weight by probability of success, and derive the ownership an
/// investor would require given total equity raised. `ownership_required`
/// is clamped to `[0, 1]` — the reference model this was ported from
/// clamps only from above, which lets a negative exit value produce a
/// negative required ownership; this port clamps both ends instead.
pub fn compute_vc_method(settings: &ValuationSettings, funding: &FundingModel, annual_summaries: &[AnnualSummary]) -> VCValuationResult {
    let Some(last) = annual_summaries.last() else {
        return VCValuationResult {
            exit_value: Decimal::ZERO,
            ownership_required: Decimal::ZERO,
            post_money: Decimal::ZERO,
            pre_money: Decimal::ZERO,
        };
    };

    let exit_metric = last.income_statement.net_revenue;
    let exit_value = exit_metric * settings.exit_year_multiple;
    let discounted_exit = exit_value / (Decimal::ONE + settings.discount_rate_vc).powd(Decimal::from(settings.target_exit_year));

    let investment: Money = funding.equity_rounds.iter().map(|round| round.amount).sum();
    let required_ownership = if discounted_exit.is_zero() {
        Decimal::ZERO
    } else {
        investment / (discounted_exit * settings.probability_of_success)
    };

    let post_money = if required_ownership.is_zero() {
        exit_value
    } else {
        investment / required_ownership.max(dec!(0.000001))
    };
    let pre_money = post_money - investment;

    VCValuationResult {
        exit_value,
        ownership_required: required_ownership.clamp(Decimal::ZERO, Decimal::ONE),
        post_money,
        pre_money,
    }
}

/// Weight normalization that, by construction, always yields a total score
/// of (approximately) 1.0 regardless of the input weights — the scorecard
/// doesn't rank variables against benchmarks, it normalizes a weight
/// vector that already sums to itself. Preserved literally from the
/// reference model rather than "fixed" into a real scorecard method.
pub fn compute_scorecard(settings: &ValuationSettings, base_equity: Money) -> Option<ScorecardValuationResult> {
    if settings.scorecard_weights.is_empty() {
        return None;
    }
    let total_weight: Decimal = settings.scorecard_weights.values().sum();
    if total_weight.is_zero() {
        return None;
    }
    let score: Decimal = settings.scorecard_weights.values().map(|w| w / total_weight).sum();
    Some(ScorecardValuationResult {
        total_score: score,
        valuation: base_equity * score,
    })
}
