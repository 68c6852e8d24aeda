use crate::algorithms::eea::gcd;
use crate::primitive_int::StaticRingBase;
use crate::ring::*;

///
/// The field of rational numbers, with numerator and denominator stored as
/// machine integers. Elements are kept reduced, with positive denominator;
/// operations that overflow `i64` will panic in debug builds.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationalFieldBase;

pub type RationalField = RingValue<RationalFieldBase>;

impl RingValue<RationalFieldBase> {
    pub const RING: RationalField = RingValue::from(RationalFieldBase);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalFieldEl {
    num: i64,
    den: i64
}

fn reduce(num: i64, den: i64) -> RationalFieldEl {
    assert!(den != 0, "denominator must be nonzero");
    let sign = if den < 0 { -1 } else { 1 };
    let d = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
    return RationalFieldEl { num: sign * num / d, den: sign * den / d };
}

impl RationalFieldBase {

    pub fn fraction(&self, num: i64, den: i64) -> RationalFieldEl {
        reduce(num, den)
    }

    pub fn num(&self, el: &RationalFieldEl) -> i64 {
        el.num
    }

    pub fn den(&self, el: &RationalFieldEl) -> i64 {
        el.den
    }

    ///
    /// Computes `lhs / rhs`; panics if `rhs` is zero.
    /// 
    pub fn div(&self, lhs: &RationalFieldEl, rhs: &RationalFieldEl) -> RationalFieldEl {
        assert!(!self.is_zero(rhs), "division by zero");
        reduce(lhs.num * rhs.den, lhs.den * rhs.num)
    }
}

impl RingBase for RationalFieldBase {

    type Element = RationalFieldEl;

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = reduce(lhs.num * rhs.den + rhs.num * lhs.den, lhs.den * rhs.den);
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        lhs.num = -lhs.num;
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = reduce(lhs.num * rhs.num, lhs.den * rhs.den);
    }

    fn from_z(&self, value: i32) -> Self::Element {
        RationalFieldEl { num: value as i64, den: 1 }
    }

    fn eq(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        lhs.num == rhs.num && lhs.den == rhs.den
    }

    fn is_commutative(&self) -> bool { true }
    fn is_noetherian(&self) -> bool { true }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        if value.den == 1 {
            write!(out, "{}", value.num)
        } else {
            write!(out, "{}/{}", value.num, value.den)
        }
    }
}

impl CanonicalHom<RationalFieldBase> for RationalFieldBase {

    fn has_canonical_hom(&self, _: &Self) -> bool {
        true
    }

    fn map_in(&self, _: &Self, el: Self::Element) -> Self::Element {
        el
    }
}

impl CanonicalIso<RationalFieldBase> for RationalFieldBase {

    fn has_canonical_iso(&self, _: &Self) -> bool {
        true
    }

    fn map_out(&self, _: &Self, el: Self::Element) -> Self::Element {
        el
    }
}

impl CanonicalHom<StaticRingBase<i64>> for RationalFieldBase {

    fn has_canonical_hom(&self, _: &StaticRingBase<i64>) -> bool {
        true
    }

    fn map_in(&self, _: &StaticRingBase<i64>, el: i64) -> Self::Element {
        RationalFieldEl { num: el, den: 1 }
    }
}

impl HashableElRing for RationalFieldBase {

    fn hash<H: std::hash::Hasher>(&self, el: &Self::Element, h: &mut H) {
        h.write_i64(el.num);
        h.write_i64(el.den);
    }
}
