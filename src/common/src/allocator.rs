//! Bankroll allocator.
//!
//! Splits a bankroll across both sides of a matchup so the payout is the
//! same whichever side wins:
//!
//! ```text
//! stake_home = bankroll * d_away / (d_home + d_away)
//! stake_away = bankroll * d_home / (d_home + d_away)
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::models::{AllocatedMatchup, Matchup};

/// Allocate a bankroll across each matchup.
///
/// Fails before touching any matchup if `bankroll` is not positive. A
/// matchup whose payout cannot be represented for this bankroll is dropped.
pub fn allocate(
    matchups: Vec<Matchup>,
    bankroll: Decimal,
) -> Result<Vec<AllocatedMatchup>, ConfigError> {
    if bankroll <= Decimal::ZERO {
        return Err(ConfigError::InvalidBankroll(bankroll));
    }

    Ok(matchups
        .into_iter()
        .filter_map(|m| {
            let summary = m.summary();
            let allocated = split(m, bankroll);
            if allocated.is_none() {
                warn!("Dropping {}: payout for bankroll {} out of range", summary, bankroll);
            }
            allocated
        })
        .collect())
}

fn split(matchup: Matchup, bankroll: Decimal) -> Option<AllocatedMatchup> {
    let d_home = matchup.home.best_decimal;
    let d_away = matchup.away.best_decimal;
    // Both prices are >= 1.0, never zero
    let denom = d_home.checked_add(d_away)?;

    // Ratios are at most 1, so stakes never exceed the bankroll
    let stake_home = bankroll.checked_mul(d_away / denom)?;
    let stake_away = bankroll.checked_mul(d_home / denom)?;
    let equal_payout = stake_home.checked_mul(d_home)?;
    let profit_abs = equal_payout - bankroll;
    let profit_pct = profit_abs.checked_div(bankroll)?.checked_mul(dec!(100))?;

    debug!(
        "Split {} for {}: home {} / away {} -> payout {}",
        bankroll,
        matchup.summary(),
        stake_home.round_dp(2),
        stake_away.round_dp(2),
        equal_payout.round_dp(2)
    );

    Some(AllocatedMatchup {
        matchup,
        bankroll,
        stake_home,
        stake_away,
        equal_payout,
        profit_abs,
        profit_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BestPrice;
    use chrono::Utc;

    fn side(selection: &str, price: Decimal) -> BestPrice {
        BestPrice {
            event_id: "e1".to_string(),
            event_start: Utc::now(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            selection: selection.to_string(),
            best_book: "X".to_string(),
            best_decimal: price,
            best_american: crate::odds::decimal_to_american(price),
            implied_prob: Decimal::ONE / price,
            next_best_decimal: None,
            gap_percent: None,
            quote_count: 1,
        }
    }

    fn matchup(home: Decimal, away: Decimal) -> Matchup {
        let home = side("A", home);
        let away = side("B", away);
        Matchup {
            event_id: "e1".to_string(),
            event_start: home.event_start,
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            arb_margin_pct: crate::odds::arbitrage_margin_pct(home.best_decimal, away.best_decimal),
            home,
            away,
            max_gap_pct: None,
        }
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.0000001)
    }

    #[test]
    fn test_two_book_scenario_split() {
        let out = allocate(vec![matchup(dec!(2.10), dec!(2.20))], dec!(100)).unwrap();
        let a = &out[0];

        assert_eq!(a.stake_home.round_dp(2), dec!(51.16));
        assert_eq!(a.stake_away.round_dp(2), dec!(48.84));
        assert_eq!(a.equal_payout.round_dp(2), dec!(107.44));
        assert_eq!(a.profit_pct.round_dp(2), dec!(7.44));
        assert_eq!(a.bankroll, dec!(100));
    }

    #[test]
    fn test_payout_equal_and_bankroll_conserved() {
        let cases = [
            (dec!(2.10), dec!(2.20)),
            (dec!(1.30), dec!(4.50)),
            (dec!(1.91), dec!(1.91)),
            (dec!(1.01), dec!(15.0)),
        ];
        for (h, a) in cases {
            for bankroll in [dec!(1), dec!(100), dec!(2500.50)] {
                let out = allocate(vec![matchup(h, a)], bankroll).unwrap();
                let x = &out[0];

                assert!(close(x.stake_home * h, x.stake_away * a));
                assert!(close(x.stake_home + x.stake_away, bankroll));
                assert!(x.stake_home >= Decimal::ZERO && x.stake_away >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_profit_sign_matches_arb_margin() {
        let cases = [
            (dec!(2.10), dec!(2.20)),
            (dec!(1.91), dec!(1.91)),
            (dec!(2.00), dec!(2.00)),
            (dec!(1.50), dec!(3.20)),
            (dec!(1.50), dec!(2.80)),
        ];
        for (h, a) in cases {
            let m = matchup(h, a);
            let margin = m.arb_margin_pct;
            let x = &allocate(vec![m], dec!(100)).unwrap()[0];

            assert_eq!(x.profit_abs > Decimal::ZERO, margin > Decimal::ZERO);
        }
    }

    #[test]
    fn test_rejects_non_positive_bankroll() {
        assert!(matches!(
            allocate(vec![matchup(dec!(2.0), dec!(2.0))], Decimal::ZERO),
            Err(ConfigError::InvalidBankroll(_))
        ));
        assert!(matches!(
            allocate(Vec::new(), dec!(-5)),
            Err(ConfigError::InvalidBankroll(_))
        ));
    }

    #[test]
    fn test_extreme_prices_split_without_overflow() {
        let near_even = dec!(1.0000000000000000000000000001);
        let huge = dec!(10000000000000000000000000000);

        let out = allocate(
            vec![matchup(near_even, dec!(2)), matchup(huge, dec!(2))],
            dec!(100),
        )
        .unwrap();

        assert_eq!(out.len(), 2);
        assert!(out[0].profit_abs < Decimal::ZERO);
        assert!(out[1].profit_abs > Decimal::ZERO);
        for x in &out {
            assert!(close(x.stake_home + x.stake_away, dec!(100)));
        }
    }

    #[test]
    fn test_unrepresentable_payout_dropped() {
        let huge = dec!(10000000000000000000000000000);
        let bankroll = dec!(70000000000000000000000000000);

        let out = allocate(
            vec![matchup(huge, huge), matchup(dec!(2.10), dec!(2.20))],
            bankroll,
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].matchup.home.best_decimal, dec!(2.10));
    }

    #[test]
    fn test_empty_matchups() {
        assert!(allocate(Vec::new(), dec!(100)).unwrap().is_empty());
    }
}
