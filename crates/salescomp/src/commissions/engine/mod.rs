mod config;
mod penalty;
mod proration;
mod streak;
mod tiers;

pub use config::{CommissionConfig, RegionalMultipliers};

use std::sync::Arc;

use crate::commissions::domain::{CommissionResult, CommissionSummary, MonthRef, UserId};
use crate::commissions::stores::{SaleStore, StoreError, TargetStore, UserDirectory};

/// Error raised by commission calculation. `UserNotFound` aborts the whole
/// calculation; store failures pass through unclassified.
#[derive(Debug, thiserror::Error)]
pub enum CommissionError {
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sum of a user's sale amounts within one calendar month.
pub(crate) async fn month_sales_total<S: SaleStore>(
    sales: &S,
    user_id: &UserId,
    month: MonthRef,
) -> Result<f64, StoreError> {
    let records = sales
        .find_by_user_and_range(user_id, month.start(), month.end())
        .await?;
    Ok(records.iter().map(|sale| sale.amount).sum())
}

/// Orchestrates the store reads and rule evaluations behind a single
/// commission figure. Holds only immutable configuration; every call
/// recomputes from the stores.
pub struct CommissionEngine<U, S, T> {
    users: Arc<U>,
    sales: Arc<S>,
    targets: Arc<T>,
    config: CommissionConfig,
}

impl<U, S, T> CommissionEngine<U, S, T>
where
    U: UserDirectory,
    S: SaleStore,
    T: TargetStore,
{
    pub fn new(users: Arc<U>, sales: Arc<S>, targets: Arc<T>, config: CommissionConfig) -> Self {
        Self {
            users,
            sales,
            targets,
            config,
        }
    }

    pub fn config(&self) -> &CommissionConfig {
        &self.config
    }

    /// Compute the commission for one salesperson and month.
    pub async fn calculate_commission(
        &self,
        user_id: &UserId,
        month: MonthRef,
    ) -> Result<CommissionResult, CommissionError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CommissionError::UserNotFound)?;

        // The target and sale reads do not depend on each other.
        let (target, month_sales) = tokio::try_join!(
            self.targets.find_one(user_id, month),
            self.sales
                .find_by_user_and_range(user_id, month.start(), month.end()),
        )?;

        let total_sales: f64 = month_sales.iter().map(|sale| sale.amount).sum();
        let target_amount = target.map(|target| target.amount).unwrap_or(0.0);

        let base_commission = total_sales * self.config.base_rate;
        let tier_bonus = tiers::tier_bonus(total_sales, &self.config);
        let regional_multiplier = self.config.regional_multipliers.for_region(user.region);
        let streak_bonus = streak::streak_bonus(
            self.sales.as_ref(),
            self.targets.as_ref(),
            &self.config,
            user_id,
            month,
        )
        .await?;
        let performance_penalty = penalty::performance_penalty(
            self.sales.as_ref(),
            self.targets.as_ref(),
            &self.config,
            user_id,
            month,
        )
        .await?;
        let region_transfers = proration::region_transfers(&user, month, &month_sales, &self.config);

        // A split month replaces the location-scaled base with the segments'
        // own commissions; the bonuses and the penalty are untouched.
        let located_base = if region_transfers.is_empty() {
            base_commission * regional_multiplier
        } else {
            region_transfers.iter().map(|segment| segment.commission).sum()
        };
        let total_commission =
            (located_base + tier_bonus + streak_bonus - performance_penalty).max(0.0);

        Ok(CommissionResult {
            user_id: user.id,
            month: month.month(),
            year: month.year(),
            total_sales,
            base_commission,
            tier_bonus,
            regional_multiplier,
            streak_bonus,
            performance_penalty,
            total_commission,
            target_hit: total_sales >= target_amount,
            region_transfers,
        })
    }

    /// Twelve monthly calculations plus the yearly aggregates.
    pub async fn annual_summary(
        &self,
        user_id: &UserId,
        year: i32,
    ) -> Result<CommissionSummary, CommissionError> {
        let mut monthly_commissions = Vec::with_capacity(12);
        for month in (1..=12).filter_map(|ordinal| MonthRef::new(ordinal, year)) {
            monthly_commissions.push(self.calculate_commission(user_id, month).await?);
        }

        let yearly_total: f64 = monthly_commissions
            .iter()
            .map(|result| result.total_commission)
            .sum();
        let yearly_sales: f64 = monthly_commissions
            .iter()
            .map(|result| result.total_sales)
            .sum();
        let months_hit_target = monthly_commissions
            .iter()
            .filter(|result| result.target_hit)
            .count();
        let average_monthly_commission = if monthly_commissions.is_empty() {
            0.0
        } else {
            yearly_total / monthly_commissions.len() as f64
        };

        Ok(CommissionSummary {
            user_id: user_id.clone(),
            year,
            monthly_commissions,
            yearly_total,
            yearly_sales,
            months_hit_target,
            average_monthly_commission,
        })
    }
}
