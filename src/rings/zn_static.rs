use crate::ring::*;

///
/// Ring that implements arithmetic in `Z/nZ` for a small `n` known at
/// compile time.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZnBase<const N: u64>;

pub type Zn<const N: u64> = RingValue<ZnBase<N>>;

impl<const N: u64> RingValue<ZnBase<N>> {
    pub const RING: Zn<N> = RingValue::from(ZnBase);
}

///
/// Const-evaluable primality test by trial division; `Z/nZ` is a field if
/// and only if `n` is prime.
/// 
pub const fn is_prime(n: u64) -> bool {
    assert!(n >= 2);
    let mut d = 2;
    while d < n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    return true;
}

impl<const N: u64> RingBase for ZnBase<N> {

    type Element = u64;

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs += rhs;
        if *lhs >= N {
            *lhs -= N;
        }
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        if *lhs != 0 {
            *lhs = N - *lhs;
        }
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = ((*lhs as u128 * rhs as u128) % (N as u128)) as u64
    }

    fn from_z(&self, value: i32) -> Self::Element {
        let reduced = ((value as i64 % (N as i64)) + (N as i64)) as u64;
        if reduced >= N {
            reduced - N
        } else {
            reduced
        }
    }

    fn eq(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        *lhs == *rhs
    }

    fn is_commutative(&self) -> bool { true }
    fn is_noetherian(&self) -> bool { true }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", *value)
    }
}

impl<const N: u64> CanonicalHom<ZnBase<N>> for ZnBase<N> {

    fn has_canonical_hom(&self, _: &Self) -> bool {
        true
    }

    fn map_in(&self, _: &Self, el: Self::Element) -> Self::Element {
        el
    }
}

impl<const N: u64> CanonicalIso<ZnBase<N>> for ZnBase<N> {

    fn has_canonical_iso(&self, _: &Self) -> bool {
        true
    }

    fn map_out(&self, _: &Self, el: Self::Element) -> Self::Element {
        el
    }
}

impl<const N: u64> HashableElRing for ZnBase<N> {

    fn hash<H: std::hash::Hasher>(&self, el: &Self::Element, h: &mut H) {
        h.write_u64(*el)
    }
}
