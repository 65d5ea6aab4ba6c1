//! Equity rounds and debt instruments: scheduled cash inflows plus the
//! amortization/interest schedule debt states carry month to month.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    Term,
    Revolver,
}

impl Default for DebtType {
    fn default() -> Self {
        DebtType::Term
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityRound {
    pub name: String,
    pub month_index: u32,
    pub amount: Money,
    pub post_money_valuation: Money,
    pub dilution_pct: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtInstrument {
    pub name: String,
    pub month_index: u32,
    pub amount: Money,
    pub interest_rate_annual: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub debt_type: DebtType,
    #[serde(default)]
    pub grace_period_months: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundingModel {
    #[serde(default)]
    pub equity_rounds: Vec<EquityRound>,
    #[serde(default)]
    pub debt: Vec<DebtInstrument>,
}

/// Running amortization state for one drawn debt instrument.
#[derive(Debug, Clone)]
pub struct DebtState {
    pub name: String,
    pub outstanding: Money,
    pub interest_rate: Rate,
    pub remaining_term: u32,
    pub grace_months: u32,
}

/// A residual-balance floor below which an amortizing instrument is
/// considered fully retired, matching the reference model's float epsilon.
const RETIREMENT_FLOOR: Decimal = dec!(0.000001);

/// Draws any debt instruments scheduled for `month_index`, charges a month
/// of interest on every outstanding instrument, amortizes principal on
/// instruments past their grace period, and drops instruments once repaid.
/// Returns `(interest_expense, principal_paid)`.
pub fn compute_debt(month_index: u32, funding_model: &FundingModel, debt_states: &mut Vec<DebtState>) -> (Money, Money) {
    for instrument in funding_model.debt.iter().filter(|d| d.month_index == month_index) {
        debt_states.push(DebtState {
            name: instrument.name.clone(),
            outstanding: instrument.amount,
            interest_rate: instrument.interest_rate_annual,
            remaining_term: instrument.term_months,
            grace_months: instrument.grace_period_months,
        });
    }

    let mut interest_expense = Decimal::ZERO;
    let mut principal_paid = Decimal::ZERO;

    debt_states.retain_mut(|state| {
        if state.outstanding <= Decimal::ZERO {
            return false;
        }
        let interest = state.outstanding * (state.interest_rate / Decimal::from(12));
        interest_expense += interest;

        if state.grace_months > 0 {
            state.grace_months -= 1;
            return true;
        }

        let principal_payment = if state.remaining_term > 0 {
            state.outstanding / Decimal::from(state.remaining_term)
        } else {
            state.outstanding
        }
        .min(state.outstanding);

        principal_paid += principal_payment;
        state.outstanding -= principal_payment;
        state.remaining_term = state.remaining_term.saturating_sub(1);

        state.outstanding > RETIREMENT_FLOOR
    });

    (interest_expense, principal_paid)
}

/// Cash actually received this month from equity rounds and debt draws.
pub fn funding_inflows(month_index: u32, funding_model: &FundingModel) -> (Money, Money) {
    let equity = funding_model
        .equity_rounds
        .iter()
        .filter(|round| round.month_index == month_index)
        .map(|round| round.amount)
        .sum();
    let debt = funding_model
        .debt
        .iter()
        .filter(|d| d.month_index == month_index)
        .map(|d| d.amount)
        .sum();
    (equity, debt)
}
