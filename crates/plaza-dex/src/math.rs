//! Pure quote math over reserve snapshots.
//!
//! Everything here is fee-less constant-product arithmetic: the pools
//! this targets do not skim an input fee, so output follows the bare
//! `x * y = k` form per hop.

use plaza_types::PairInfo;
use rust_decimal::Decimal;

use crate::error::{DexError, DexResult};

/// Ten to an integer power, without leaving fixed-point
fn pow10(exp: i32) -> Decimal {
    let ten = Decimal::from(10);
    let mut result = Decimal::ONE;
    if exp >= 0 {
        for _ in 0..exp {
            result *= ten;
        }
    } else {
        for _ in 0..(-exp) {
            result /= ten;
        }
    }
    result
}

/// Orients each pair's reserves along the swap direction, returning
/// `(reserve_from, reserve_to)` per hop.
///
/// A stored pair list may run in either end-to-end direction; when the
/// first pair does not touch the start token the list is walked from the
/// other end. A pair that does not include the token being walked makes
/// the route invalid.
pub fn route_reserves(
    pairs: &[PairInfo],
    start_token: &str,
) -> DexResult<Vec<(Decimal, Decimal)>> {
    if pairs.is_empty() {
        return Ok(Vec::new());
    }

    let mut ordered: Vec<&PairInfo> = pairs.iter().collect();
    if !pairs[0].contains(start_token) {
        ordered.reverse();
    }

    let mut token = start_token.to_string();
    let mut reserves = Vec::with_capacity(ordered.len());
    for pair in ordered {
        let oriented = pair.reserves_from(&token).ok_or_else(|| {
            DexError::InvalidRoute(format!(
                "pair {} does not include {}",
                pair.address, token
            ))
        })?;
        reserves.push(oriented);
        if let Some(next) = pair.other_token(&token) {
            token = next.to_string();
        }
    }
    Ok(reserves)
}

/// Marginal price ratio along a route: the product of `to / from`
/// reserves per hop. This is the price an infinitesimal trade would get.
pub fn ratio_from_route(reserves: &[(Decimal, Decimal)]) -> DexResult<Decimal> {
    let mut ratio = Decimal::ONE;
    for (reserve_from, reserve_to) in reserves {
        if reserve_from.is_zero() {
            return Err(DexError::MathError("zero reserve on route".to_string()));
        }
        ratio *= reserve_to / reserve_from;
    }
    Ok(ratio)
}

/// Adjusts a raw reserve ratio for the two tokens' display decimals:
/// shifts by `decimals_a - decimals_b` powers of ten.
pub fn ratio_with_decimals(ratio: Decimal, decimals_a: u32, decimals_b: u32) -> Decimal {
    ratio * pow10(decimals_a as i32 - decimals_b as i32)
}

/// Output amount for `amount_in` pushed through the route, compounding
/// the constant-product curve hop by hop:
/// `out = reserve_to - k / (reserve_from + in)` with `k` the pool
/// invariant.
pub fn received_from_reserves(
    reserves: &[(Decimal, Decimal)],
    amount_in: Decimal,
) -> DexResult<Decimal> {
    let mut amount = amount_in;
    for (reserve_from, reserve_to) in reserves {
        let new_reserve_from = reserve_from + amount;
        if new_reserve_from.is_zero() {
            return Err(DexError::MathError("zero reserve on route".to_string()));
        }
        let k = reserve_from * reserve_to;
        amount = reserve_to - k / new_reserve_from;
    }
    Ok(amount)
}

/// Price impact of a trade over a route, in percent.
///
/// Compares the realized price (`received / amount_in`) against the
/// marginal ratio; an unfavorable move comes out negative, e.g. a trade
/// eating half a pool's depth lands near `-50`.
pub fn price_impact_for_route(
    pairs: &[PairInfo],
    start_token: &str,
    amount_in: Decimal,
) -> DexResult<Decimal> {
    if amount_in <= Decimal::ZERO {
        return Err(DexError::MathError(format!(
            "amount in must be positive, got {}",
            amount_in
        )));
    }

    let reserves = route_reserves(pairs, start_token)?;
    if reserves.is_empty() {
        return Err(DexError::InvalidRoute("empty route".to_string()));
    }

    let marginal = ratio_from_route(&reserves)?;
    if marginal.is_zero() {
        return Err(DexError::MathError("marginal ratio is zero".to_string()));
    }

    let received = received_from_reserves(&reserves, amount_in)?;
    let realized = received / amount_in;
    Ok((realized / marginal - Decimal::ONE) * Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pair(token0: &str, token1: &str, reserve0: Decimal, reserve1: Decimal) -> PairInfo {
        PairInfo {
            address: format!("ct_{}{}", token0, token1),
            token0: token0.to_string(),
            token1: token1.to_string(),
            reserve0,
            reserve1,
        }
    }

    #[test]
    fn reserves_are_oriented_from_the_start_token() {
        let pairs = vec![pair("a", "b", dec!(10), dec!(40)), pair("b", "c", dec!(40), dec!(8))];
        let reserves = route_reserves(&pairs, "a").unwrap();
        assert_eq!(reserves, vec![(dec!(10), dec!(40)), (dec!(40), dec!(8))]);
    }

    #[test]
    fn reversed_pair_list_is_walked_from_the_other_end() {
        let pairs = vec![pair("b", "c", dec!(40), dec!(8)), pair("a", "b", dec!(10), dec!(40))];
        let reserves = route_reserves(&pairs, "a").unwrap();
        assert_eq!(reserves, vec![(dec!(10), dec!(40)), (dec!(40), dec!(8))]);
    }

    #[test]
    fn gap_in_the_route_is_an_error() {
        let pairs = vec![pair("a", "b", dec!(1), dec!(1)), pair("x", "y", dec!(1), dec!(1))];
        let err = route_reserves(&pairs, "a").unwrap_err();
        assert!(matches!(err, DexError::InvalidRoute(_)));
    }

    #[test]
    fn ratio_multiplies_across_hops() {
        let reserves = vec![(dec!(10), dec!(40)), (dec!(40), dec!(8))];
        // 40/10 * 8/40 = 0.8
        assert_eq!(ratio_from_route(&reserves).unwrap(), dec!(0.8));
    }

    #[test]
    fn ratio_with_decimals_shifts_by_the_difference() {
        let pairs = vec![pair("a", "b", dec!(10), dec!(4000))];
        let reserves = route_reserves(&pairs, "a").unwrap();
        let raw = ratio_from_route(&reserves).unwrap();
        // Reserve ratio 400 shifted by 10^(1-3) lands at 4.
        assert_eq!(ratio_with_decimals(raw, 1, 3), dec!(4));
        // And the shift is symmetric.
        assert_eq!(ratio_with_decimals(raw, 3, 1), dec!(40000));
    }

    #[test]
    fn two_hop_received_compounds_the_curve() {
        let reserves = vec![(dec!(2), dec!(2)), (dec!(2), dec!(2))];
        let received = received_from_reserves(&reserves, dec!(2)).unwrap();
        // First hop halves into 1, second yields 2 - 4/3 = 2/3.
        assert_eq!(received, Decimal::from(2) / Decimal::from(3));
        assert_eq!(received.round_dp(16), dec!(0.6666666666666667));
    }

    #[test]
    fn price_impact_matches_reference_pool() {
        let pairs = vec![pair("from", "to", dec!(2000000), dec!(1000))];
        let impact = price_impact_for_route(&pairs, "from", dec!(10000)).unwrap();
        assert_eq!(impact.round_dp(16), dec!(-0.4975124378109453));
    }

    #[test]
    fn tiny_trades_have_near_zero_impact() {
        let pairs = vec![pair("from", "to", dec!(2000000), dec!(1000))];
        let impact = price_impact_for_route(&pairs, "from", dec!(1)).unwrap();
        assert!(impact < Decimal::ZERO);
        assert!(impact > dec!(-0.001));
    }

    #[test]
    fn impact_grows_with_trade_size() {
        let pairs = vec![pair("from", "to", dec!(1000), dec!(1000))];
        let small = price_impact_for_route(&pairs, "from", dec!(10)).unwrap();
        let large = price_impact_for_route(&pairs, "from", dec!(500)).unwrap();
        assert!(large < small);
        // Matching the input reserve takes half the output pool: exactly -50.
        let half = price_impact_for_route(&pairs, "from", dec!(1000)).unwrap();
        assert_eq!(half.round_dp(6), dec!(-50));
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let pairs = vec![pair("a", "b", dec!(10), dec!(10))];
        assert!(matches!(
            price_impact_for_route(&pairs, "a", Decimal::ZERO),
            Err(DexError::MathError(_))
        ));
        assert!(matches!(
            price_impact_for_route(&pairs, "a", dec!(-5)),
            Err(DexError::MathError(_))
        ));
    }

    #[test]
    fn zero_reserve_is_a_math_error() {
        let reserves = vec![(Decimal::ZERO, dec!(10))];
        assert!(matches!(
            ratio_from_route(&reserves),
            Err(DexError::MathError(_))
        ));
    }

    #[test]
    fn pow10_handles_both_signs() {
        assert_eq!(pow10(0), dec!(1));
        assert_eq!(pow10(3), dec!(1000));
        assert_eq!(pow10(-2), dec!(0.01));
    }
}
