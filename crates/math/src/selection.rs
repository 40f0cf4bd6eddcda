/// Choosing between lendgines of the same pair

use lendgine_types::{Fraction, Lendgine, Token};

/// A lendgine is long relative to `base` when its token0 is the base token
pub fn is_long_lendgine(lendgine: &Lendgine, base: &Token) -> bool {
    lendgine.token0.equals(base)
}

pub fn pick_long_lendgines<'a>(lendgines: &'a [Lendgine], base: &Token) -> Vec<&'a Lendgine> {
    lendgines.iter().filter(|l| is_long_lendgine(l, base)).collect()
}

pub fn pick_short_lendgines<'a>(lendgines: &'a [Lendgine], base: &Token) -> Vec<&'a Lendgine> {
    lendgines.iter().filter(|l| l.token1.equals(base)).collect()
}

/// Lendgine with the smallest bound strictly above `price`
pub fn next_highest_lendgine<'a, I>(price: &Fraction, lendgines: I) -> Option<&'a Lendgine>
where
    I: IntoIterator<Item = &'a Lendgine>,
{
    lendgines
        .into_iter()
        .filter(|l| &l.bound > price)
        .min_by(|a, b| a.bound.cmp(&b.bound))
}

/// Lendgine with the largest bound strictly below `price`
pub fn next_lowest_lendgine<'a, I>(price: &Fraction, lendgines: I) -> Option<&'a Lendgine>
where
    I: IntoIterator<Item = &'a Lendgine>,
{
    lendgines
        .into_iter()
        .filter(|l| &l.bound < price)
        .max_by(|a, b| a.bound.cmp(&b.bound))
}

/// Lendgine to preselect for a pair trading at `price` (token0 per token1 of
/// the long side): the nearest long bound above the price, then below it,
/// then the same for short lendgines at the inverted price.
pub fn default_lendgine<'a>(price: &Fraction, base: &Token, lendgines: &'a [Lendgine]) -> Option<&'a Lendgine> {
    let long = pick_long_lendgines(lendgines, base);
    let short = pick_short_lendgines(lendgines, base);
    let inverse = if price.is_zero() { None } else { Some(price.invert()) };

    next_highest_lendgine(price, long.iter().copied())
        .or_else(|| next_lowest_lendgine(price, long.iter().copied()))
        .or_else(|| {
            inverse
                .as_ref()
                .and_then(|p| next_highest_lendgine(p, short.iter().copied()))
        })
        .or_else(|| {
            inverse
                .as_ref()
                .and_then(|p| next_lowest_lendgine(p, short.iter().copied()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendgine_types::Address;

    fn token(byte: u8) -> Token {
        Token::new(1, Address::new([byte; 20]), 18, "T", "T")
    }

    fn lendgine(token0: u8, token1: u8, bound: Fraction, id: u8) -> Lendgine {
        Lendgine::new(token(token0), token(token1), 18, 18, bound, Address::new([id; 20])).unwrap()
    }

    fn ladder() -> Vec<Lendgine> {
        [
            Fraction::new(1, 4),
            Fraction::new(1, 2),
            Fraction::one(),
            Fraction::from_integer(2),
            Fraction::from_integer(4),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, bound)| lendgine(1, 2, bound, 10 + i as u8))
        .collect()
    }

    #[test]
    fn test_next_highest_then_lowest_round_trips() {
        let lendgines = ladder();
        let price = Fraction::one();

        let higher = next_highest_lendgine(&price, &lendgines).unwrap();
        assert_eq!(higher.bound, Fraction::from_integer(2));

        let back = next_lowest_lendgine(&higher.bound, &lendgines).unwrap();
        assert_eq!(back.bound, price);
    }

    #[test]
    fn test_bounds_compare_exactly() {
        let lendgines = ladder();
        assert_eq!(
            next_lowest_lendgine(&Fraction::new(2, 4), &lendgines).unwrap().bound,
            Fraction::new(1, 4)
        );
        assert!(next_highest_lendgine(&Fraction::from_integer(4), &lendgines).is_none());
        assert!(next_lowest_lendgine(&Fraction::new(1, 4), &lendgines).is_none());
    }

    #[test]
    fn test_long_short_partition() {
        let mut lendgines = ladder();
        lendgines.push(lendgine(2, 1, Fraction::from_integer(8), 30));
        let base = token(1);

        assert_eq!(pick_long_lendgines(&lendgines, &base).len(), 5);
        assert_eq!(pick_short_lendgines(&lendgines, &base).len(), 1);
        assert!(!is_long_lendgine(&lendgines[5], &base));
    }

    #[test]
    fn test_default_lendgine_prefers_long_above_price() {
        let mut lendgines = ladder();
        lendgines.push(lendgine(2, 1, Fraction::from_integer(8), 30));
        let base = token(1);

        let chosen = default_lendgine(&Fraction::new(3, 2), &base, &lendgines).unwrap();
        assert_eq!(chosen.bound, Fraction::from_integer(2));

        // above every long bound: fall back to the nearest one below
        let chosen = default_lendgine(&Fraction::from_integer(5), &base, &lendgines).unwrap();
        assert_eq!(chosen.bound, Fraction::from_integer(4));

        let shorts_only = vec![lendgine(2, 1, Fraction::from_integer(8), 30)];
        let chosen = default_lendgine(&Fraction::new(1, 2), &base, &shorts_only).unwrap();
        assert_eq!(chosen.bound, Fraction::from_integer(8));
    }
}
