use serde::{Deserialize, Serialize};

use crate::commissions::domain::Region;

/// Rate tables applied by the engine. Injected at construction and never
/// mutated afterwards, so alternate schedules can be exercised in tests
/// without shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionConfig {
    pub base_rate: f64,
    pub tier_one_threshold: f64,
    pub tier_one_rate: f64,
    pub tier_two_threshold: f64,
    pub tier_two_rate: f64,
    pub streak_bonus_per_month: f64,
    pub max_streak_bonus: f64,
    pub underperformance_ratio: f64,
    pub performance_penalty: f64,
    pub default_sale_commission_rate: f64,
    pub regional_multipliers: RegionalMultipliers,
}

impl CommissionConfig {
    /// How far the streak walk may step backward before the cap makes
    /// further hits worthless.
    pub(crate) fn max_streak_steps(&self) -> u32 {
        if self.streak_bonus_per_month <= 0.0 {
            return 0;
        }
        (self.max_streak_bonus / self.streak_bonus_per_month).floor() as u32
    }
}

impl Default for CommissionConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.05,
            tier_one_threshold: 10_000.0,
            tier_one_rate: 0.02,
            tier_two_threshold: 25_000.0,
            tier_two_rate: 0.04,
            streak_bonus_per_month: 0.01,
            max_streak_bonus: 0.05,
            underperformance_ratio: 0.5,
            performance_penalty: 0.02,
            default_sale_commission_rate: 5.0,
            regional_multipliers: RegionalMultipliers::default(),
        }
    }
}

/// Fixed per-region scaling factors for the base commission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionalMultipliers {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RegionalMultipliers {
    pub fn for_region(&self, region: Region) -> f64 {
        match region {
            Region::North => self.north,
            Region::South => self.south,
            Region::East => self.east,
            Region::West => self.west,
        }
    }
}

impl Default for RegionalMultipliers {
    fn default() -> Self {
        Self {
            north: 1.10,
            south: 0.95,
            east: 1.00,
            west: 1.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_allows_five_streak_steps() {
        assert_eq!(CommissionConfig::default().max_streak_steps(), 5);
    }

    #[test]
    fn zero_per_month_bonus_disables_the_walk() {
        let config = CommissionConfig {
            streak_bonus_per_month: 0.0,
            ..CommissionConfig::default()
        };
        assert_eq!(config.max_streak_steps(), 0);
    }

    #[test]
    fn multipliers_match_their_regions() {
        let multipliers = RegionalMultipliers::default();
        assert_eq!(multipliers.for_region(Region::North), 1.10);
        assert_eq!(multipliers.for_region(Region::South), 0.95);
        assert_eq!(multipliers.for_region(Region::East), 1.00);
        assert_eq!(multipliers.for_region(Region::West), 1.05);
    }
}
