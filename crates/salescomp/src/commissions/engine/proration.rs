use super::config::CommissionConfig;
use crate::commissions::domain::{MonthRef, RegionSegment, SaleRecord, User};

/// Splits a month's sales at the instant the salesperson's current region
/// became effective. Returns no segments for the common case of a stable
/// month. A transfer whose prior region is missing from the history also
/// yields no segments: the prior region is not guessed.
pub(crate) fn region_transfers(
    user: &User,
    month: MonthRef,
    month_sales: &[SaleRecord],
    config: &CommissionConfig,
) -> Vec<RegionSegment> {
    let transfer = user.region_start_date;
    if transfer <= month.start() || transfer > month.end() {
        return Vec::new();
    }
    let Some(prior_region) = user.region_before_current() else {
        return Vec::new();
    };

    let mut before_sales = 0.0;
    let mut after_sales = 0.0;
    for sale in month_sales {
        if sale.date < transfer {
            before_sales += sale.amount;
        } else {
            after_sales += sale.amount;
        }
    }

    let days_before = (transfer.date_naive() - month.start().date_naive()).num_days();
    let days_after = month.days() - days_before;

    let multipliers = &config.regional_multipliers;
    vec![
        RegionSegment {
            region: prior_region,
            sales: before_sales,
            days: days_before,
            commission: before_sales * config.base_rate * multipliers.for_region(prior_region),
        },
        RegionSegment {
            region: user.region,
            sales: after_sales,
            days: days_after,
            commission: after_sales * config.base_rate * multipliers.for_region(user.region),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissions::domain::{
        Region, RegionAssignment, SaleCategory, SaleId, UserId, UserStatus,
    };
    use chrono::{DateTime, TimeZone, Utc};

    fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn transferred_user(region_start: DateTime<Utc>) -> User {
        User {
            id: UserId("user-000001".to_string()),
            name: "Alice Johnson".to_string(),
            email: "alice@company.com".to_string(),
            region: Region::North,
            hire_date: instant(2024, 1, 15),
            status: UserStatus::Active,
            region_start_date: region_start,
            region_history: vec![
                RegionAssignment {
                    region: Region::South,
                    effective_from: instant(2024, 1, 15),
                },
                RegionAssignment {
                    region: Region::North,
                    effective_from: region_start,
                },
            ],
        }
    }

    fn sale(amount: f64, date: DateTime<Utc>) -> SaleRecord {
        SaleRecord {
            id: SaleId("sale-000001".to_string()),
            user_id: UserId("user-000001".to_string()),
            amount,
            date,
            category: SaleCategory::Software,
            commission_rate: 5.0,
        }
    }

    #[test]
    fn stable_month_yields_no_segments() {
        let user = transferred_user(instant(2024, 11, 3));
        let month = MonthRef::new(12, 2024).expect("valid month");
        let sales = [sale(4_000.0, instant(2024, 12, 5))];
        assert!(region_transfers(&user, month, &sales, &CommissionConfig::default()).is_empty());
    }

    #[test]
    fn transfer_at_month_start_instant_is_not_a_split() {
        let month = MonthRef::new(12, 2024).expect("valid month");
        let user = transferred_user(month.start());
        let sales = [sale(4_000.0, instant(2024, 12, 5))];
        assert!(region_transfers(&user, month, &sales, &CommissionConfig::default()).is_empty());
    }

    #[test]
    fn mid_month_transfer_splits_sales_and_days() {
        let user = transferred_user(instant(2024, 12, 15));
        let month = MonthRef::new(12, 2024).expect("valid month");
        let sales = [
            sale(4_000.0, instant(2024, 12, 5)),
            sale(6_000.0, instant(2024, 12, 20)),
        ];
        let segments = region_transfers(&user, month, &sales, &CommissionConfig::default());

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].region, Region::South);
        assert_eq!(segments[0].sales, 4_000.0);
        assert_eq!(segments[0].days, 14);
        assert_eq!(segments[1].region, Region::North);
        assert_eq!(segments[1].sales, 6_000.0);
        assert_eq!(segments[1].days, 17);
        assert!((segments[0].commission - 4_000.0 * 0.05 * 0.95).abs() < 1e-9);
        assert!((segments[1].commission - 6_000.0 * 0.05 * 1.10).abs() < 1e-9);
    }

    #[test]
    fn sale_at_the_transfer_instant_belongs_to_the_new_region() {
        let transfer = instant(2024, 12, 15);
        let user = transferred_user(transfer);
        let month = MonthRef::new(12, 2024).expect("valid month");
        let sales = [sale(1_000.0, transfer)];
        let segments = region_transfers(&user, month, &sales, &CommissionConfig::default());
        assert_eq!(segments[0].sales, 0.0);
        assert_eq!(segments[1].sales, 1_000.0);
    }

    #[test]
    fn unknown_prior_region_leaves_the_month_unsplit() {
        let transfer = instant(2024, 12, 15);
        let mut user = transferred_user(transfer);
        user.region_history = vec![RegionAssignment {
            region: Region::North,
            effective_from: transfer,
        }];
        let month = MonthRef::new(12, 2024).expect("valid month");
        let sales = [sale(4_000.0, instant(2024, 12, 5))];
        assert!(region_transfers(&user, month, &sales, &CommissionConfig::default()).is_empty());
    }
}
