use std::fmt::Display;
use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign, MulAssign, Neg};

use crate::ring::*;

///
/// Trait for the primitive signed integer types that can be used as
/// elements of a [`StaticRing`].
/// 
pub trait PrimitiveInt: AddAssign + SubAssign + MulAssign + Neg<Output = Self> + Eq + From<i8> + TryFrom<i32> + TryFrom<i128> + Into<i128> + Copy + Display + std::hash::Hash {

    fn bits() -> usize;
}

impl PrimitiveInt for i8 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i16 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i32 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i64 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i128 {
    fn bits() -> usize { Self::BITS as usize }
}

///
/// The ring of integers, with arithmetic performed in the primitive integer
/// type `T`. Operations that overflow `T` will panic in debug builds.
/// 
pub struct StaticRingBase<T> {
    element: PhantomData<T>
}

pub type StaticRing<T> = RingValue<StaticRingBase<T>>;

impl<T: PrimitiveInt> RingValue<StaticRingBase<T>> {
    pub const RING: StaticRing<T> = RingValue::from(StaticRingBase { element: PhantomData });
}

impl<T> PartialEq for StaticRingBase<T> {

    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T> Copy for StaticRingBase<T> {}

impl<T> Clone for StaticRingBase<T> {

    fn clone(&self) -> Self {
        *self
    }
}

impl<T: PrimitiveInt> RingBase for StaticRingBase<T> {

    type Element = T;

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs += rhs;
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        *lhs = -*lhs;
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs *= rhs;
    }

    fn from_z(&self, value: i32) -> Self::Element {
        T::try_from(value).map_err(|_| ()).unwrap()
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

impl<T: PrimitiveInt, S: PrimitiveInt> CanonicalHom<StaticRingBase<T>> for StaticRingBase<S> {

    fn has_canonical_hom(&self, _: &StaticRingBase<T>) -> bool {
        true
    }

    fn map_in(&self, _: &StaticRingBase<T>, el: T) -> S {
        S::try_from(el.into()).map_err(|_| ()).unwrap()
    }
}

impl<T: PrimitiveInt, S: PrimitiveInt> CanonicalIso<StaticRingBase<T>> for StaticRingBase<S> {

    fn has_canonical_iso(&self, _: &StaticRingBase<T>) -> bool {
        true
    }

    fn map_out(&self, _: &StaticRingBase<T>, el: S) -> T {
        T::try_from(el.into()).map_err(|_| ()).unwrap()
    }
}

impl<T: PrimitiveInt> HashableElRing for StaticRingBase<T> {

    fn hash<H: std::hash::Hasher>(&self, el: &Self::Element, h: &mut H) {
        h.write_i128((*el).into())
    }
}
