//! Investment Allocation
//!
//! Turns an agent's marginal utilities and a scaled gain into increments for
//! its three fields. Two rules:
//! - Proportional: every field gets a share proportional to its marginal
//! - Winner-take-all: the largest marginal gets everything
//!
//! The winner-take-all tie-break (p, then rho, then v) has no modelling
//! meaning; it is kept so runs stay comparable with earlier results.

use bargain_events::InvestmentSnapshot;
use serde::{Deserialize, Serialize};

use crate::components::agent::{Attribute, Marginals};
use crate::error::BargainError;
use crate::policy::AllocationPolicy;

/// Increments applied to one agent's fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub dp: f64,
    pub drho: f64,
    pub dv: f64,
}

impl Investment {
    /// Entire amount into a single field
    pub fn single(attribute: Attribute, amount: f64) -> Self {
        let mut investment = Self::default();
        match attribute {
            Attribute::Productivity => investment.dp = amount,
            Attribute::Resilience => investment.drho = amount,
            Attribute::Coercion => investment.dv = amount,
        }
        investment
    }

    pub fn total(&self) -> f64 {
        self.dp + self.drho + self.dv
    }
}

impl From<Investment> for InvestmentSnapshot {
    fn from(investment: Investment) -> Self {
        InvestmentSnapshot::new(investment.dp, investment.drho, investment.dv)
    }
}

/// Splits `amount` across fields according to `policy`.
///
/// `resilience_damping` scales the resilience marginal before proportional
/// shares are taken. Winner-take-all always compares undamped marginals.
pub fn allocate(
    marginals: &Marginals,
    amount: f64,
    policy: AllocationPolicy,
    resilience_damping: f64,
) -> Result<Investment, BargainError> {
    match policy {
        AllocationPolicy::ProportionalGradient => {
            proportional(&marginals.with_resilience_damping(resilience_damping), amount)
        }
        AllocationPolicy::WinnerTakeAll => Ok(Investment::single(marginals.largest(), amount)),
    }
}

fn proportional(marginals: &Marginals, amount: f64) -> Result<Investment, BargainError> {
    let sum = marginals.sum();
    // also catches NaN
    if !(sum > 0.0 && sum.is_finite()) {
        return Err(BargainError::DegenerateAllocation { sum });
    }

    Ok(Investment {
        dp: amount * marginals.dudp / sum,
        drho: amount * marginals.dudrho / sum,
        dv: amount * marginals.dudv / sum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marginals(dudp: f64, dudrho: f64, dudv: f64) -> Marginals {
        Marginals { dudp, dudrho, dudv }
    }

    #[test]
    fn test_proportional_shares() {
        let inv = allocate(
            &marginals(1.0, 2.0, 1.0),
            0.4,
            AllocationPolicy::ProportionalGradient,
            1.0,
        )
        .unwrap();

        assert!((inv.dp - 0.1).abs() < 1e-12);
        assert!((inv.drho - 0.2).abs() < 1e-12);
        assert!((inv.dv - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_proportional_conserves_amount() {
        let cases = [
            (marginals(0.52, 0.1, 4.0), 0.01, 1.0),
            (marginals(0.52, 0.1, 4.0), 0.01, 0.1),
            (marginals(3.0, 7.5, 0.002), -0.3, 1.0),
            (marginals(1e-3, 1e3, 1.0), 12.0, 0.1),
        ];
        for (m, amount, damping) in cases {
            let inv = allocate(&m, amount, AllocationPolicy::ProportionalGradient, damping).unwrap();
            assert!(
                (inv.total() - amount).abs() <= 1e-12 * amount.abs().max(1.0),
                "total {} != amount {}",
                inv.total(),
                amount
            );
        }
    }

    #[test]
    fn test_damping_shifts_share_away_from_resilience() {
        let m = marginals(1.0, 1.0, 1.0);
        let plain = allocate(&m, 1.0, AllocationPolicy::ProportionalGradient, 1.0).unwrap();
        let damped = allocate(&m, 1.0, AllocationPolicy::ProportionalGradient, 0.1).unwrap();

        assert!(damped.drho < plain.drho);
        assert!(damped.dp > plain.dp);
        // 0.1 / 2.1 of the amount
        assert!((damped.drho - 0.1 / 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_marginal_sum_is_degenerate() {
        let err = allocate(
            &marginals(0.0, 0.0, 0.0),
            1.0,
            AllocationPolicy::ProportionalGradient,
            1.0,
        )
        .unwrap_err();
        assert_eq!(err, BargainError::DegenerateAllocation { sum: 0.0 });

        let err = allocate(
            &marginals(1.0, -3.0, 1.0),
            1.0,
            AllocationPolicy::ProportionalGradient,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, BargainError::DegenerateAllocation { .. }));

        let err = allocate(
            &marginals(f64::NAN, 1.0, 1.0),
            1.0,
            AllocationPolicy::ProportionalGradient,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, BargainError::DegenerateAllocation { .. }));
    }

    #[test]
    fn test_winner_take_all_moves_one_field() {
        let inv = allocate(&marginals(0.52, 0.1, 4.0), 0.25, AllocationPolicy::WinnerTakeAll, 1.0)
            .unwrap();
        assert_eq!(inv, Investment { dp: 0.0, drho: 0.0, dv: 0.25 });
    }

    #[test]
    fn test_winner_take_all_prefers_productivity_on_tie() {
        let inv = allocate(&marginals(1.0, 1.0, 0.5), 0.25, AllocationPolicy::WinnerTakeAll, 1.0)
            .unwrap();
        assert_eq!(inv, Investment::single(Attribute::Productivity, 0.25));
    }

    #[test]
    fn test_winner_take_all_ignores_damping() {
        // damped rho would lose to p; undamped it wins
        let m = marginals(1.0, 2.0, 0.5);
        let inv = allocate(&m, 1.0, AllocationPolicy::WinnerTakeAll, 0.1).unwrap();
        assert_eq!(inv, Investment::single(Attribute::Resilience, 1.0));
    }

    #[test]
    fn test_winner_take_all_never_degenerate() {
        let inv = allocate(&marginals(0.0, 0.0, 0.0), 1.0, AllocationPolicy::WinnerTakeAll, 1.0)
            .unwrap();
        assert_eq!(inv, Investment::single(Attribute::Productivity, 1.0));
    }
}
