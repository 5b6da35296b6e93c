// =============================================================================
// Zone Allocator
// =============================================================================
// Three-zone state machine over the Senior backing ratio:
//
//   ratio <  100%          -> Backstop  (Reserve, then Junior, refill Senior)
//   100% <= ratio <= 110%  -> Healthy   (nothing moves)
//   ratio >  110%          -> Spillover (excess goes 80% Junior / 20% Reserve)
//
// The zone is recomputed from the ratio on every call and never stored.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::TrancheError;
use crate::math::fixed_point::mul_div;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    Backstop,
    Healthy,
    Spillover,
}

impl Zone {
    /// Stable numeric code for events
    pub fn code(&self) -> u8 {
        match self {
            Zone::Backstop => 0,
            Zone::Healthy => 1,
            Zone::Spillover => 2,
        }
    }
}

pub fn needs_spillover(ratio: u128) -> bool {
    ratio > SENIOR_TARGET_BACKING
}

pub fn is_healthy(ratio: u128) -> bool {
    ratio >= SENIOR_TRIGGER_BACKING && ratio <= SENIOR_TARGET_BACKING
}

pub fn needs_backstop(ratio: u128) -> bool {
    ratio < SENIOR_TRIGGER_BACKING
}

/// Classify a backing ratio. Both boundaries (100% and 110%) are Healthy.
pub fn classify(ratio: u128) -> Zone {
    if needs_spillover(ratio) {
        Zone::Spillover
    } else if needs_backstop(ratio) {
        Zone::Backstop
    } else {
        Zone::Healthy
    }
}

/// Absolute USD levels for a given Senior supply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneThresholds {
    /// Senior value above this spills over (110%)
    pub spillover_above: u128,
    /// Senior value below this triggers the backstop (100%)
    pub backstop_below: u128,
    /// Senior value the backstop tries to restore (100.9%)
    pub restore_target: u128,
}

pub fn zone_thresholds(supply: u128) -> Result<ZoneThresholds> {
    Ok(ZoneThresholds {
        spillover_above: mul_div(supply, SENIOR_TARGET_BACKING)?,
        backstop_below: mul_div(supply, SENIOR_TRIGGER_BACKING)?,
        restore_target: mul_div(supply, SENIOR_RESTORE_BACKING)?,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tranche {
    Senior,
    Junior,
    Reserve,
}

/// A value movement between two tranches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrancheTransfer {
    pub from: Tranche,
    pub to: Tranche,
    pub amount: u128,
}

// =============================================================================
// Spillover
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpilloverTransfer {
    /// 110% of the new supply
    pub target: u128,
    /// Senior value above target (0 when nothing spills)
    pub excess: u128,
    pub to_junior: u128,
    pub to_reserve: u128,
    /// Senior value after the transfer
    pub senior_final: u128,
}

impl SpilloverTransfer {
    pub fn transfers(&self) -> Vec<TrancheTransfer> {
        [
            (Tranche::Junior, self.to_junior),
            (Tranche::Reserve, self.to_reserve),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(to, amount)| TrancheTransfer {
            from: Tranche::Senior,
            to,
            amount,
        })
        .collect()
    }
}

/// Move Senior value above 110% of `new_supply` out to Junior and Reserve
///
/// Junior gets 80% of the excess; Reserve gets the remainder so the two
/// legs always add up to the excess exactly. A value at or below target is a
/// no-op.
pub fn compute_spillover(senior_value: u128, new_supply: u128) -> Result<SpilloverTransfer> {
    let target = mul_div(new_supply, SENIOR_TARGET_BACKING)?;

    if senior_value <= target {
        return Ok(SpilloverTransfer {
            target,
            senior_final: senior_value,
            ..Default::default()
        });
    }

    let excess = senior_value - target;
    let to_junior = mul_div(excess, JUNIOR_SPILLOVER_SHARE)?;
    let to_reserve = excess
        .checked_sub(to_junior)
        .ok_or(error!(TrancheError::MathUnderflow))?;

    Ok(SpilloverTransfer {
        target,
        excess,
        to_junior,
        to_reserve,
        senior_final: target,
    })
}

// =============================================================================
// Backstop
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackstopTransfer {
    /// 100.9% of the new supply
    pub restore_target: u128,
    /// Shortfall against the restore target (0 when already above it)
    pub deficit: u128,
    pub from_reserve: u128,
    pub from_junior: u128,
    /// Senior value after the transfer
    pub senior_final: u128,
    /// Reserve and Junior together covered the whole deficit
    pub fully_restored: bool,
}

impl BackstopTransfer {
    /// Deficit left uncovered after both tranches were drained
    pub fn shortfall(&self) -> u128 {
        self.deficit
            .saturating_sub(self.from_reserve)
            .saturating_sub(self.from_junior)
    }

    pub fn transfers(&self) -> Vec<TrancheTransfer> {
        [
            (Tranche::Reserve, self.from_reserve),
            (Tranche::Junior, self.from_junior),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(from, amount)| TrancheTransfer {
            from,
            to: Tranche::Senior,
            amount,
        })
        .collect()
    }
}

/// Refill Senior up to 100.9% of `new_supply`
///
/// Strict priority: Reserve is drained first, then Junior, each capped only
/// by what it holds. A partial refill is reported through
/// `fully_restored = false`, never reverted.
pub fn compute_backstop(
    senior_value: u128,
    new_supply: u128,
    reserve_value: u128,
    junior_value: u128,
) -> Result<BackstopTransfer> {
    let restore_target = mul_div(new_supply, SENIOR_RESTORE_BACKING)?;

    if senior_value >= restore_target {
        return Ok(BackstopTransfer {
            restore_target,
            senior_final: senior_value,
            fully_restored: true,
            ..Default::default()
        });
    }

    let deficit = restore_target - senior_value;
    let from_reserve = reserve_value.min(deficit);
    let remaining = deficit - from_reserve;
    let from_junior = junior_value.min(remaining);
    let remaining = remaining - from_junior;

    let senior_final = senior_value
        .checked_add(from_reserve)
        .and_then(|v| v.checked_add(from_junior))
        .ok_or(error!(TrancheError::MathOverflow))?;

    Ok(BackstopTransfer {
        restore_target,
        deficit,
        from_reserve,
        from_junior,
        senior_final,
        fully_restored: remaining == 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = PRECISION;

    #[test]
    fn test_boundaries_are_healthy() {
        assert_eq!(classify(SENIOR_TRIGGER_BACKING), Zone::Healthy);
        assert_eq!(classify(SENIOR_TARGET_BACKING), Zone::Healthy);
        assert_eq!(classify(SENIOR_TRIGGER_BACKING - 1), Zone::Backstop);
        assert_eq!(classify(SENIOR_TARGET_BACKING + 1), Zone::Spillover);
    }

    #[test]
    fn test_predicates_partition_domain() {
        let samples = [
            1,
            ONE / 2,
            SENIOR_TRIGGER_BACKING - 1,
            SENIOR_TRIGGER_BACKING,
            SENIOR_RESTORE_BACKING,
            SENIOR_TARGET_BACKING,
            SENIOR_TARGET_BACKING + 1,
            10 * ONE,
        ];

        for r in samples {
            let hits = [needs_spillover(r), is_healthy(r), needs_backstop(r)]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(hits, 1, "ratio {} matched {} zones", r, hits);
        }
    }

    #[test]
    fn test_zone_thresholds() {
        let t = zone_thresholds(1_000_000 * ONE).unwrap();
        assert_eq!(t.spillover_above, 1_100_000 * ONE);
        assert_eq!(t.backstop_below, 1_000_000 * ONE);
        assert_eq!(t.restore_target, 1_009_000 * ONE);
    }

    #[test]
    fn test_spillover_scenario() {
        let s = compute_spillover(1_250_000 * ONE, 1_000_000 * ONE).unwrap();
        assert_eq!(s.target, 1_100_000 * ONE);
        assert_eq!(s.excess, 150_000 * ONE);
        assert_eq!(s.to_junior, 120_000 * ONE);
        assert_eq!(s.to_reserve, 30_000 * ONE);
        assert_eq!(s.senior_final, 1_100_000 * ONE);

        let transfers = s.transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(
            transfers[0],
            TrancheTransfer { from: Tranche::Senior, to: Tranche::Junior, amount: 120_000 * ONE }
        );
    }

    #[test]
    fn test_spillover_at_or_below_target_is_noop() {
        let s = compute_spillover(1_100_000 * ONE, 1_000_000 * ONE).unwrap();
        assert_eq!(s.excess, 0);
        assert_eq!(s.senior_final, 1_100_000 * ONE);
        assert!(s.transfers().is_empty());

        let s = compute_spillover(900_000 * ONE, 1_000_000 * ONE).unwrap();
        assert_eq!(s.senior_final, 900_000 * ONE);
    }

    #[test]
    fn test_spillover_odd_excess_conserves_value() {
        // 7 units of excess: 5 to Junior (floor of 5.6), 2 to Reserve
        let supply = 1_000 * ONE;
        let value = 1_100 * ONE + 7;
        let s = compute_spillover(value, supply).unwrap();
        assert_eq!(s.excess, 7);
        assert_eq!(s.to_junior, 5);
        assert_eq!(s.to_reserve, 2);
        assert_eq!(s.senior_final + s.to_junior + s.to_reserve, value);
    }

    #[test]
    fn test_partial_backstop_scenario() {
        let b = compute_backstop(900_000 * ONE, 1_000_000 * ONE, 50_000 * ONE, 30_000 * ONE).unwrap();
        assert_eq!(b.restore_target, 1_009_000 * ONE);
        assert_eq!(b.deficit, 109_000 * ONE);
        assert_eq!(b.from_reserve, 50_000 * ONE);
        assert_eq!(b.from_junior, 30_000 * ONE);
        assert!(!b.fully_restored);
        assert_eq!(b.senior_final, 980_000 * ONE);
        assert_eq!(b.shortfall(), 29_000 * ONE);
    }

    #[test]
    fn test_backstop_reserve_alone_covers() {
        let b = compute_backstop(990_000 * ONE, 1_000_000 * ONE, 50_000 * ONE, 30_000 * ONE).unwrap();
        assert_eq!(b.deficit, 19_000 * ONE);
        assert_eq!(b.from_reserve, 19_000 * ONE);
        assert_eq!(b.from_junior, 0);
        assert!(b.fully_restored);
        assert_eq!(b.senior_final, 1_009_000 * ONE);

        let transfers = b.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from, Tranche::Reserve);
        assert_eq!(transfers[0].to, Tranche::Senior);
    }

    #[test]
    fn test_backstop_junior_tops_up() {
        let b = compute_backstop(950_000 * ONE, 1_000_000 * ONE, 40_000 * ONE, 30_000 * ONE).unwrap();
        assert_eq!(b.from_reserve, 40_000 * ONE);
        assert_eq!(b.from_junior, 19_000 * ONE);
        assert!(b.fully_restored);
        assert_eq!(b.senior_final, 1_009_000 * ONE);
    }

    #[test]
    fn test_backstop_above_restore_target_is_noop() {
        let b = compute_backstop(1_009_000 * ONE, 1_000_000 * ONE, 0, 0).unwrap();
        assert!(b.fully_restored);
        assert_eq!(b.deficit, 0);
        assert_eq!(b.senior_final, 1_009_000 * ONE);
        assert!(b.transfers().is_empty());
    }

    #[test]
    fn test_backstop_with_empty_buffers() {
        let b = compute_backstop(900_000 * ONE, 1_000_000 * ONE, 0, 0).unwrap();
        assert!(!b.fully_restored);
        assert_eq!(b.senior_final, 900_000 * ONE);
        assert_eq!(b.shortfall(), b.deficit);
    }
}
