use super::config::CommissionConfig;
use super::month_sales_total;
use crate::commissions::domain::{MonthRef, UserId};
use crate::commissions::stores::{SaleStore, StoreError, TargetStore};

/// Counts consecutive target-hitting months walking backward from the given
/// month. An explicit bounded loop, never recursion: once the accumulated
/// hits reach the cap, further months cannot change the bonus, so the walk
/// stops there. A month with no target ends the streak without counting.
pub(crate) async fn streak_bonus<S, T>(
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
    let max_steps = config.max_streak_steps();
    let mut hits = 0u32;
    let mut cursor = month;

    while hits < max_steps {
        let Some(target) = targets.find_one(user_id, cursor).await? else {
            break;
        };
        let total = month_sales_total(sales, user_id, cursor).await?;
        if total < target.amount {
            break;
        }
        hits += 1;
        cursor = cursor.prev();
    }

    Ok((f64::from(hits) * config.streak_bonus_per_month).min(config.max_streak_bonus))
}
