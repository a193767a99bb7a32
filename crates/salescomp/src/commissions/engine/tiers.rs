use super::config::CommissionConfig;

/// Tier bonus unlocked by the whole month's sales total. Thresholds are
/// strict: a total landing exactly on a boundary pays the lower tier.
pub(crate) fn tier_bonus(total_sales: f64, config: &CommissionConfig) -> f64 {
    if total_sales > config.tier_two_threshold {
        total_sales * config.tier_two_rate
    } else if total_sales > config.tier_one_threshold {
        total_sales * config.tier_one_rate
    } else {
        0.0
    }
}
