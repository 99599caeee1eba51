use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::analysis::{BreakEvenInput, DEFAULT_FIXED_COST};
use crate::types::{Money, Quantity};
use crate::{PriceSimError, PriceSimResult};

/// Calendar month key in `YYYY-MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> PriceSimResult<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(PriceSimError::InvalidPeriod {
                value: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The previous calendar month.
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl FromStr for YearMonth {
    type Err = PriceSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").map_err(|_| {
            PriceSimError::InvalidPeriod {
                value: s.to_string(),
            }
        })?;
        Ok(Self::from_date(date))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Period records
// ---------------------------------------------------------------------------

/// One sale supplied by the data-access collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub sale_date: NaiveDate,
    pub quantity: Quantity,
    pub unit_price_per_unit: Money,
    pub unit_cost_per_unit: Money,
}

/// Registered fixed cost for one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedCostRecord {
    pub period: YearMonth,
    pub amount: Money,
}

/// Revenue and variable-cost totals for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub revenue: Money,
    pub variable_cost: Money,
}

/// Sum quantity-weighted revenue and variable cost over a period's sales.
pub fn aggregate_sales(records: &[SalesRecord], period: YearMonth) -> PeriodAggregate {
    let mut revenue = Decimal::ZERO;
    let mut variable_cost = Decimal::ZERO;

    for record in records.iter().filter(|r| period.contains(r.sale_date)) {
        revenue += record.quantity * record.unit_price_per_unit;
        variable_cost += record.quantity * record.unit_cost_per_unit;
    }

    PeriodAggregate {
        revenue,
        variable_cost,
    }
}

/// The period's registered fixed cost, or the default when none exists.
pub fn resolve_fixed_cost(records: &[FixedCostRecord], period: YearMonth) -> Money {
    records
        .iter()
        .find(|r| r.period == period)
        .map(|r| r.amount)
        .unwrap_or(DEFAULT_FIXED_COST)
}

/// Build the break-even input for one period from collaborator records.
pub fn period_input(
    fixed_costs: &[FixedCostRecord],
    sales: &[SalesRecord],
    period: YearMonth,
) -> BreakEvenInput {
    let aggregate = aggregate_sales(sales, period);
    BreakEvenInput {
        fixed_cost: resolve_fixed_cost(fixed_costs, period),
        revenue: aggregate.revenue,
        variable_cost: aggregate.variable_cost,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
