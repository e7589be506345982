//! Savings goals and time-to-target projection.
//!
//! The projection is a flat contribution model: no returns, no compounding.
//! It answers how many months of pure saving reach the target.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: f64,
    pub monthly: f64,
}

/// Number of monthly contributions needed to reach a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Months(u64),
    /// Contribution is zero or negative, the target is never reached.
    Unreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearsMonths {
    pub years: u64,
    pub months: u64,
}

impl fmt::Display for YearsMonths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m", self.years, self.months)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match months_to_years_months(*self) {
            Some(ym) => ym.fmt(f),
            None => f.write_str("unreachable"),
        }
    }
}

/// `ceil(max(0, target) / monthly)`, or `Unreachable` when `monthly <= 0`.
pub fn months_to_target(target: f64, monthly: f64) -> Projection {
    if monthly <= 0.0 || monthly.is_nan() {
        return Projection::Unreachable;
    }
    let months = (target.max(0.0) / monthly).ceil();
    // Float-to-int `as` saturates, so absurd ratios pin at u64::MAX.
    Projection::Months(months as u64)
}

/// Splits a month count into whole years and remaining months.
/// Returns `None` for an unreachable projection.
pub fn months_to_years_months(projection: Projection) -> Option<YearsMonths> {
    match projection {
        Projection::Months(m) => Some(YearsMonths {
            years: m / 12,
            months: m % 12,
        }),
        Projection::Unreachable => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProjection {
    pub goal: Goal,
    pub months: Projection,
    pub duration: Option<YearsMonths>,
}

pub fn project_goals(goals: &[Goal]) -> Vec<GoalProjection> {
    goals
        .iter()
        .map(|goal| {
            let months = months_to_target(goal.target, goal.monthly);
            GoalProjection {
                goal: goal.clone(),
                months,
                duration: months_to_years_months(months),
            }
        })
        .collect()
}
