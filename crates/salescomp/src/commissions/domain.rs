use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for salespeople.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for persisted sale records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub String);

/// Sales region a salesperson is assigned to. Each region carries a fixed
/// commission multiplier configured on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::South => "south",
            Region::East => "east",
            Region::West => "west",
        }
    }
}

/// Product line a sale belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleCategory {
    Software,
    Hardware,
    Consulting,
    Support,
}

impl SaleCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SaleCategory::Software => "software",
            SaleCategory::Hardware => "hardware",
            SaleCategory::Consulting => "consulting",
            SaleCategory::Support => "support",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

/// One entry of a salesperson's region assignment history, oldest first.
/// The final entry corresponds to the current region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAssignment {
    pub region: Region,
    pub effective_from: DateTime<Utc>,
}

/// Salesperson profile as served by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub region: Region,
    pub hire_date: DateTime<Utc>,
    pub status: UserStatus,
    pub region_start_date: DateTime<Utc>,
    pub region_history: Vec<RegionAssignment>,
}

impl User {
    /// The region held immediately before the current assignment: the last
    /// history entry effective strictly before `region_start_date`. Returns
    /// `None` when the history does not reach back past the current
    /// assignment.
    pub fn region_before_current(&self) -> Option<Region> {
        let mut prior = None;
        for assignment in &self.region_history {
            if assignment.effective_from >= self.region_start_date {
                break;
            }
            prior = Some(assignment.region);
        }
        prior
    }
}

/// Persisted sale record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub user_id: UserId,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category: SaleCategory,
    pub commission_rate: f64,
}

/// An unsaved sale as submitted by callers; the ingestion processor assigns
/// the id and defaults the commission rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub user_id: UserId,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category: SaleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,
}

/// Monthly sales target for one salesperson. At most one exists per
/// (user, month, year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub user_id: UserId,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
}

/// A validated (month, year) pair with calendar-month window arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRef {
    month: u32,
    year: i32,
}

impl MonthRef {
    /// Builds a reference when `month` is within 1..=12.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The preceding month; January wraps to December of the prior year.
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("month ordinal is validated at construction")
    }

    fn first_day_of_next(&self) -> NaiveDate {
        let (month, year) = if self.month == 12 {
            (1, self.year + 1)
        } else {
            (self.month + 1, self.year)
        };
        NaiveDate::from_ymd_opt(year, month, 1).expect("month ordinal is validated at construction")
    }

    /// First instant of the month: day 1 at 00:00:00.000 UTC.
    pub fn start(&self) -> DateTime<Utc> {
        self.first_day()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time of day")
            .and_utc()
    }

    /// Last instant of the month window: the final day at 23:59:59.999 UTC.
    pub fn end(&self) -> DateTime<Utc> {
        let last_day = self.first_day_of_next() - Duration::days(1);
        last_day
            .and_hms_milli_opt(23, 59, 59, 999)
            .expect("end of day is a valid time of day")
            .and_utc()
    }

    /// Number of calendar days in the month.
    pub fn days(&self) -> i64 {
        (self.first_day_of_next() - self.first_day()).num_days()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant <= self.end()
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One slice of a month that was split by a mid-month region transfer.
/// `days` is informational calendar-day arithmetic; `commission` already
/// includes the segment region's multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionSegment {
    pub region: Region,
    pub sales: f64,
    pub days: i64,
    pub commission: f64,
}

/// Engine output for one (user, month, year). Recomputed fresh on every
/// call; nothing caches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionResult {
    pub user_id: UserId,
    pub month: u32,
    pub year: i32,
    pub total_sales: f64,
    pub base_commission: f64,
    pub tier_bonus: f64,
    pub regional_multiplier: f64,
    pub streak_bonus: f64,
    pub performance_penalty: f64,
    pub total_commission: f64,
    pub target_hit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub region_transfers: Vec<RegionSegment>,
}

/// Year-long rollup of the twelve monthly results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionSummary {
    pub user_id: UserId,
    pub year: i32,
    pub monthly_commissions: Vec<CommissionResult>,
    pub yearly_total: f64,
    pub yearly_sales: f64,
    pub months_hit_target: usize,
    pub average_monthly_commission: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_out_of_range_months() {
        assert!(MonthRef::new(0, 2024).is_none());
        assert!(MonthRef::new(13, 2024).is_none());
        assert!(MonthRef::new(12, 2024).is_some());
    }

    #[test]
    fn january_wraps_to_prior_december() {
        let january = MonthRef::new(1, 2025).expect("valid month");
        let previous = january.prev();
        assert_eq!(previous.month(), 12);
        assert_eq!(previous.year(), 2024);
    }

    #[test]
    fn window_covers_full_calendar_month() {
        let february = MonthRef::new(2, 2024).expect("valid month");
        assert_eq!(
            february.start(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
        let expected_end = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap()
            .and_utc();
        assert_eq!(february.end(), expected_end);
        assert_eq!(february.days(), 29);
    }

    #[test]
    fn contains_is_inclusive_of_both_bounds() {
        let december = MonthRef::new(12, 2024).expect("valid month");
        assert!(december.contains(december.start()));
        assert!(december.contains(december.end()));
        assert!(!december.contains(december.prev().end()));
    }

    #[test]
    fn prior_region_comes_from_history_before_current_start() {
        let start = Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap();
        let user = User {
            id: UserId("user-000001".to_string()),
            name: "Alice Johnson".to_string(),
            email: "alice@company.com".to_string(),
            region: Region::North,
            hire_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            status: UserStatus::Active,
            region_start_date: start,
            region_history: vec![
                RegionAssignment {
                    region: Region::South,
                    effective_from: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
                },
                RegionAssignment {
                    region: Region::North,
                    effective_from: start,
                },
            ],
        };
        assert_eq!(user.region_before_current(), Some(Region::South));
    }

    #[test]
    fn prior_region_is_absent_without_earlier_history() {
        let start = Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap();
        let user = User {
            id: UserId("user-000002".to_string()),
            name: "Bob Chen".to_string(),
            email: "bob@company.com".to_string(),
            region: Region::South,
            hire_date: start,
            status: UserStatus::Active,
            region_start_date: start,
            region_history: vec![RegionAssignment {
                region: Region::South,
                effective_from: start,
            }],
        };
        assert_eq!(user.region_before_current(), None);
    }
}
