//! Safe-to-Spend budget ledger math.
//!
//! Input amounts are validated on construction: positive income and budget,
//! non-negative expenses, a 1e9 upper bound on every field, and two
//! cross-field guards against data-entry errors (expenses within 3x income,
//! budget within 2x income).

use crate::domain::error::FinchartError;
use serde::Serialize;
use std::fmt;

pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, Copy)]
pub struct LedgerInput {
    pub income: f64,
    pub actual_expenses: f64,
    pub planned_budget: f64,
}

impl LedgerInput {
    pub fn new(
        income: f64,
        actual_expenses: f64,
        planned_budget: f64,
    ) -> Result<Self, FinchartError> {
        let invalid = |reason: String| FinchartError::LedgerInvalid { reason };

        if !(income > 0.0 && income <= MAX_AMOUNT) {
            return Err(invalid(format!(
                "income must be in (0, {MAX_AMOUNT:.0}], got {income}"
            )));
        }
        if !(actual_expenses >= 0.0 && actual_expenses <= MAX_AMOUNT) {
            return Err(invalid(format!(
                "expenses must be in [0, {MAX_AMOUNT:.0}], got {actual_expenses}"
            )));
        }
        if !(planned_budget > 0.0 && planned_budget <= MAX_AMOUNT) {
            return Err(invalid(format!(
                "budget must be in (0, {MAX_AMOUNT:.0}], got {planned_budget}"
            )));
        }
        if actual_expenses > income * 3.0 {
            return Err(invalid(format!(
                "expenses ({actual_expenses:.0}) exceed 3x income ({income:.0})"
            )));
        }
        if planned_budget > income * 2.0 {
            return Err(invalid(format!(
                "budget ({planned_budget:.0}) exceeds 2x income ({income:.0})"
            )));
        }

        Ok(Self {
            income,
            actual_expenses,
            planned_budget,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Healthy,
    Warning,
    Critical,
    OverBudget,
}

impl BudgetStatus {
    pub fn message(&self) -> &'static str {
        match self {
            BudgetStatus::Healthy => "Budget on track.",
            BudgetStatus::Warning => "Spending is getting close to your budget limit.",
            BudgetStatus::Critical => "High spending risk. Adjust your expenses now.",
            BudgetStatus::OverBudget => "Over budget. Reduce discretionary spending immediately.",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BudgetStatus::Healthy => "healthy",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Critical => "critical",
            BudgetStatus::OverBudget => "over_budget",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerResult {
    pub safe_to_spend: f64,
    pub budget_utilization: f64,
    pub remaining_budget: f64,
    pub savings_potential: f64,
    pub status: BudgetStatus,
    pub status_message: String,
}

pub fn safe_to_spend(input: &LedgerInput) -> LedgerResult {
    let remaining_budget = input.planned_budget - input.actual_expenses;
    let safe_to_spend = remaining_budget.max(0.0);
    let savings_potential = input.income - input.planned_budget;

    let budget_utilization = if input.planned_budget > 0.0 {
        round2(input.actual_expenses / input.planned_budget * 100.0)
    } else {
        0.0
    };

    let status = if budget_utilization > 100.0 {
        BudgetStatus::OverBudget
    } else if budget_utilization >= 90.0 {
        BudgetStatus::Critical
    } else if budget_utilization >= 70.0 {
        BudgetStatus::Warning
    } else {
        BudgetStatus::Healthy
    };

    LedgerResult {
        safe_to_spend,
        budget_utilization,
        remaining_budget,
        savings_potential,
        status,
        status_message: status.message().to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
