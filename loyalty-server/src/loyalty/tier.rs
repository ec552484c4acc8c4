//! Tier Engine
//!
//! Pure functions resolving a member's tier from lifetime points.
//! Tiers are an ordered set keyed by ascending `min_points`; thresholds are
//! unique (enforced at tier creation).

use shared::models::{LoyaltyTier, NextTierInfo};

/// Select the tier with the greatest `min_points` not exceeding
/// `total_points`. Returns None only when the tier table is empty or no
/// tier has a low-enough threshold (a base tier at 0 avoids both).
pub fn resolve_tier(total_points: i64, tiers: &[LoyaltyTier]) -> Option<&LoyaltyTier> {
    tiers
        .iter()
        .filter(|t| t.min_points <= total_points)
        .max_by_key(|t| t.min_points)
}

/// Next-higher tier and the point gap, or None if already at the top
pub fn next_tier(total_points: i64, tiers: &[LoyaltyTier]) -> Option<NextTierInfo> {
    tiers
        .iter()
        .filter(|t| t.min_points > total_points)
        .min_by_key(|t| t.min_points)
        .map(|t| NextTierInfo {
            name: t.name.clone(),
            points_needed: t.min_points - total_points,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tier(id: i64, name: &str, min_points: i64, multiplier: f64) -> LoyaltyTier {
        LoyaltyTier {
            id,
            name: name.to_string(),
            min_points,
            discount: 0.0,
            point_multiplier: multiplier,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn standard_tiers() -> Vec<LoyaltyTier> {
        vec![
            make_tier(1, "Bronze", 0, 1.0),
            make_tier(2, "Silver", 1000, 1.2),
            make_tier(3, "Gold", 5000, 1.5),
        ]
    }

    #[test]
    fn test_resolve_zero_points_is_base_tier() {
        let tiers = standard_tiers();
        assert_eq!(resolve_tier(0, &tiers).unwrap().name, "Bronze");
    }

    #[test]
    fn test_resolve_exact_threshold() {
        let tiers = standard_tiers();
        assert_eq!(resolve_tier(1000, &tiers).unwrap().name, "Silver");
    }

    #[test]
    fn test_resolve_between_thresholds() {
        let tiers = standard_tiers();
        assert_eq!(resolve_tier(4999, &tiers).unwrap().name, "Silver");
    }

    #[test]
    fn test_resolve_above_top() {
        let tiers = standard_tiers();
        assert_eq!(resolve_tier(1_000_000, &tiers).unwrap().name, "Gold");
    }

    #[test]
    fn test_resolve_unsorted_input() {
        // Resolution must not depend on the caller's ordering
        let mut tiers = standard_tiers();
        tiers.reverse();
        assert_eq!(resolve_tier(1200, &tiers).unwrap().name, "Silver");
    }

    #[test]
    fn test_resolve_empty_tiers() {
        assert!(resolve_tier(100, &[]).is_none());
    }

    #[test]
    fn test_next_tier_from_base() {
        let tiers = standard_tiers();
        let next = next_tier(0, &tiers).unwrap();
        assert_eq!(next.name, "Silver");
        assert_eq!(next.points_needed, 1000);
    }

    #[test]
    fn test_next_tier_partial_progress() {
        let tiers = standard_tiers();
        let next = next_tier(4200, &tiers).unwrap();
        assert_eq!(next.name, "Gold");
        assert_eq!(next.points_needed, 800);
    }

    #[test]
    fn test_next_tier_at_top_is_none() {
        let tiers = standard_tiers();
        assert!(next_tier(5000, &tiers).is_none());
        assert!(next_tier(99999, &tiers).is_none());
    }
}
