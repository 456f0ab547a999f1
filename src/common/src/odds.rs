//! Odds format conversions and the two-way arbitrage formulas.
//!
//! All prices are European decimal odds (payout multiple per unit staked).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Convert decimal odds to American odds.
///
/// Underdogs (`d >= 2`) are quoted as profit per 100 staked, favorites as the
/// negative stake needed to win 100. Rounds half to even. Returns `None` for
/// `d <= 1`, which has no American equivalent, and for prices so close to or
/// far from even money that the result does not fit.
pub fn decimal_to_american(decimal: Decimal) -> Option<i64> {
    if decimal <= Decimal::ONE {
        return None;
    }
    let profit = decimal - Decimal::ONE;
    let american = if decimal >= dec!(2) {
        profit.checked_mul(dec!(100))?
    } else {
        dec!(-100).checked_div(profit)?
    };
    american.round().to_i64()
}

/// Convert American odds to decimal odds. `0` is not a valid American price.
pub fn american_to_decimal(american: i64) -> Option<Decimal> {
    let a = Decimal::from(american);
    if american > 0 {
        Some(a / dec!(100) + Decimal::ONE)
    } else if american < 0 {
        Some(dec!(100) / a.abs() + Decimal::ONE)
    } else {
        None
    }
}

/// Break-even win probability implied by a decimal price.
pub fn implied_probability(decimal: Decimal) -> Decimal {
    Decimal::ONE / decimal
}

/// Percentage by which the combined implied probability of both sides falls
/// below 100%. Positive means a guaranteed-profit split exists.
pub fn arbitrage_margin_pct(home_decimal: Decimal, away_decimal: Decimal) -> Decimal {
    let inv_sum = implied_probability(home_decimal) + implied_probability(away_decimal);
    (Decimal::ONE - inv_sum) * dec!(100)
}

/// Premium of the best price over the runner-up, in percent.
/// `None` if the premium overflows.
pub fn gap_percent(best: Decimal, next_best: Decimal) -> Option<Decimal> {
    (best - next_best)
        .checked_div(next_best)?
        .checked_mul(dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_to_american_underdog() {
        assert_eq!(decimal_to_american(dec!(2.50)), Some(150));
        assert_eq!(decimal_to_american(dec!(2.0)), Some(100));
        assert_eq!(decimal_to_american(dec!(3.125)), Some(212));
    }

    #[test]
    fn test_decimal_to_american_favorite() {
        assert_eq!(decimal_to_american(dec!(1.50)), Some(-200));
        assert_eq!(decimal_to_american(dec!(1.909)), Some(-110));
        assert_eq!(decimal_to_american(dec!(1.25)), Some(-400));
    }

    #[test]
    fn test_decimal_to_american_even_money_floor() {
        assert_eq!(decimal_to_american(Decimal::ONE), None);
        assert_eq!(decimal_to_american(dec!(0.9)), None);
    }

    #[test]
    fn test_decimal_to_american_out_of_range() {
        assert_eq!(decimal_to_american(dec!(1.0000000000000000000000000001)), None);
        assert_eq!(decimal_to_american(dec!(10000000000000000000000000000)), None);
    }

    #[test]
    fn test_american_to_decimal() {
        assert_eq!(american_to_decimal(150), Some(dec!(2.5)));
        assert_eq!(american_to_decimal(-200), Some(dec!(1.5)));
        assert_eq!(american_to_decimal(0), None);
    }

    #[test]
    fn test_arbitrage_margin_sign() {
        // 1/2.10 + 1/2.20 = 0.9307
        let margin = arbitrage_margin_pct(dec!(2.10), dec!(2.20));
        assert!(margin > dec!(6.92) && margin < dec!(6.93));

        // 1/1.90 + 1/1.90 = 1.0526, bookmaker edge
        assert!(arbitrage_margin_pct(dec!(1.90), dec!(1.90)) < Decimal::ZERO);

        assert_eq!(arbitrage_margin_pct(dec!(2), dec!(2)), Decimal::ZERO);
    }

    #[test]
    fn test_gap_percent() {
        assert_eq!(gap_percent(dec!(2.20), dec!(2.00)), Some(dec!(10)));
        assert_eq!(gap_percent(dec!(2.00), dec!(2.00)), Some(Decimal::ZERO));
        assert_eq!(gap_percent(dec!(10000000000000000000000000000), dec!(2)), None);
    }
}
