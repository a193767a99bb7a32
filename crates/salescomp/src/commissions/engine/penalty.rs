use super::config::CommissionConfig;
use super::month_sales_total;
use crate::commissions::domain::{MonthRef, UserId};
use crate::commissions::stores::{SaleStore, StoreError, TargetStore};

/// Penalty for underperforming the immediately preceding month; no
/// longer-range look-back. A missing target or a target of zero yields no
/// penalty, so the ratio is never taken against zero.
pub(crate) async fn performance_penalty<S, T>(
    sales: &S,
    targets: &T,
    config: &CommissionConfig,
    user_id: &UserId,
    month: MonthRef,
) -> Result<f64, StoreError>
where
    S: SaleStore,
    T: TargetStore,
{
    let preceding = month.prev();
    let Some(target) = targets.find_one(user_id, preceding).await? else {
        return Ok(0.0);
    };
    if target.amount <= 0.0 {
        return Ok(0.0);
    }

    let total = month_sales_total(sales, user_id, preceding).await?;
    if total / target.amount < config.underperformance_ratio {
        Ok(config.performance_penalty)
    } else {
        Ok(0.0)
    }
}
