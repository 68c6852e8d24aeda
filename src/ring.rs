use std::rc::Rc;
use std::sync::Arc;

///
/// Basic trait for objects that have a ring structure.
/// 
/// Implementors provide the basic ring operations together with equality
/// testing and display. Where accepting arguments by reference saves a
/// clone, the default-implemented reference variants should be overwritten.
/// 
/// This trait is usually not used directly, but through a
/// [`crate::ring::RingWrapper`]: while `RingBase` defines the functionality,
/// [`crate::ring::RingWrapper`] abstracts over how the ring object is stored
/// (by value, behind a reference, in an `Arc`, ...). To use a ring by value,
/// wrap it in the no-op container [`crate::ring::RingValue`].
/// 
pub trait RingBase {

    type Element: Clone;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) { self.add_assign(lhs, rhs.clone()) }
    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element);
    fn sub_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) { self.sub_assign(lhs, rhs.clone()) }
    fn negate_inplace(&self, lhs: &mut Self::Element);
    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element);
    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) { self.mul_assign(lhs, rhs.clone()) }
    fn zero(&self) -> Self::Element { self.from_z(0) }
    fn one(&self) -> Self::Element { self.from_z(1) }
    fn neg_one(&self) -> Self::Element { self.from_z(-1) }
    fn from_z(&self, value: i32) -> Self::Element;
    fn eq(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool;
    fn is_zero(&self, value: &Self::Element) -> bool { self.eq(value, &self.zero()) }
    fn is_one(&self, value: &Self::Element) -> bool { self.eq(value, &self.one()) }
    fn is_neg_one(&self, value: &Self::Element) -> bool { self.eq(value, &self.neg_one()) }
    fn is_commutative(&self) -> bool;
    fn is_noetherian(&self) -> bool;
    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result;

    fn negate(&self, mut value: Self::Element) -> Self::Element {
        self.negate_inplace(&mut value);
        return value;
    }

    fn sub_assign(&self, lhs: &mut Self::Element, mut rhs: Self::Element) {
        self.negate_inplace(&mut rhs);
        self.add_assign(lhs, rhs);
    }

    fn add_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.add_assign_ref(&mut result, rhs);
        return result;
    }

    fn add(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.add_assign(&mut lhs, rhs);
        return lhs;
    }

    fn sub_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.sub_assign_ref(&mut result, rhs);
        return result;
    }

    fn sub(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.sub_assign(&mut lhs, rhs);
        return lhs;
    }

    fn mul_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut result = lhs.clone();
        self.mul_assign_ref(&mut result, rhs);
        return result;
    }

    fn mul(&self, mut lhs: Self::Element, rhs: Self::Element) -> Self::Element {
        self.mul_assign(&mut lhs, rhs);
        return lhs;
    }
}

macro_rules! delegate {
    (fn $name:ident (&self, $($pname:ident: $ptype:ty),*) -> $rtype:ty) => {
        fn $name (&self, $($pname: $ptype),*) -> $rtype {
            self.get_ring().$name($($pname),*)
        }
    };
    (fn $name:ident (&self) -> $rtype:ty) => {
        fn $name (&self) -> $rtype {
            self.get_ring().$name()
        }
    };
}

///
/// Basic trait for objects that store (in some sense) a ring. This can be a
/// ring-by-value, a reference to a ring, or a shared pointer to a ring.
/// 
/// As opposed to [`crate::ring::RingBase`], which is responsible for the ring
/// operations, this trait is solely responsible for the storage. All ring
/// functionality is forwarded to the stored [`crate::ring::RingBase`] object.
/// 
pub trait RingWrapper {

    type Type: RingBase + CanonicalIso<Self::Type>;

    fn get_ring<'a>(&'a self) -> &'a Self::Type;

    delegate!{ fn add_assign_ref(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> () }
    delegate!{ fn add_assign(&self, lhs: &mut El<Self>, rhs: El<Self>) -> () }
    delegate!{ fn sub_assign_ref(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> () }
    delegate!{ fn sub_assign(&self, lhs: &mut El<Self>, rhs: El<Self>) -> () }
    delegate!{ fn negate_inplace(&self, lhs: &mut El<Self>) -> () }
    delegate!{ fn negate(&self, value: El<Self>) -> El<Self> }
    delegate!{ fn mul_assign(&self, lhs: &mut El<Self>, rhs: El<Self>) -> () }
    delegate!{ fn mul_assign_ref(&self, lhs: &mut El<Self>, rhs: &El<Self>) -> () }
    delegate!{ fn zero(&self) -> El<Self> }
    delegate!{ fn one(&self) -> El<Self> }
    delegate!{ fn neg_one(&self) -> El<Self> }
    delegate!{ fn from_z(&self, value: i32) -> El<Self> }
    delegate!{ fn eq(&self, lhs: &El<Self>, rhs: &El<Self>) -> bool }
    delegate!{ fn is_zero(&self, value: &El<Self>) -> bool }
    delegate!{ fn is_one(&self, value: &El<Self>) -> bool }
    delegate!{ fn is_neg_one(&self, value: &El<Self>) -> bool }
    delegate!{ fn is_commutative(&self) -> bool }
    delegate!{ fn is_noetherian(&self) -> bool }
    delegate!{ fn add_ref(&self, lhs: &El<Self>, rhs: &El<Self>) -> El<Self> }
    delegate!{ fn add(&self, lhs: El<Self>, rhs: El<Self>) -> El<Self> }
    delegate!{ fn sub_ref(&self, lhs: &El<Self>, rhs: &El<Self>) -> El<Self> }
    delegate!{ fn sub(&self, lhs: El<Self>, rhs: El<Self>) -> El<Self> }
    delegate!{ fn mul_ref(&self, lhs: &El<Self>, rhs: &El<Self>) -> El<Self> }
    delegate!{ fn mul(&self, lhs: El<Self>, rhs: El<Self>) -> El<Self> }

    fn map_in<S>(&self, from: &S, el: El<S>) -> El<Self>
        where S: RingWrapper, Self::Type: CanonicalHom<S::Type>
    {
        self.get_ring().map_in(from.get_ring(), el)
    }

    fn map_out<S>(&self, to: &S, el: El<Self>) -> El<S>
        where S: RingWrapper, Self::Type: CanonicalIso<S::Type>
    {
        self.get_ring().map_out(to.get_ring(), el)
    }

    fn sum<I>(&self, els: I) -> El<Self>
        where I: Iterator<Item = El<Self>>
    {
        els.fold(self.zero(), |a, b| self.add(a, b))
    }

    fn prod<I>(&self, els: I) -> El<Self>
        where I: Iterator<Item = El<Self>>
    {
        els.fold(self.one(), |a, b| self.mul(a, b))
    }

    fn base_ring<'a>(&'a self) -> &'a <Self::Type as RingExtension>::BaseRing
        where Self::Type: RingExtension
    {
        self.get_ring().base_ring()
    }

    fn from(&self, x: El<<Self::Type as RingExtension>::BaseRing>) -> El<Self>
        where Self::Type: RingExtension
    {
        self.get_ring().from(x)
    }

    fn from_ref(&self, x: &El<<Self::Type as RingExtension>::BaseRing>) -> El<Self>
        where Self::Type: RingExtension
    {
        self.get_ring().from_ref(x)
    }

    ///
    /// Raises `x` to the given power, using square-and-multiply. Note that
    /// powers of a single element commute, so this is valid also in
    /// noncommutative rings.
    /// 
    fn pow(&self, x: &El<Self>, power: usize) -> El<Self> {
        let mut result = self.one();
        let mut square = x.clone();
        let mut remaining = power;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = self.mul_ref(&result, &square);
            }
            remaining >>= 1;
            if remaining > 0 {
                square = self.mul_ref(&square, &square);
            }
        }
        return result;
    }

    fn format<'a>(&'a self, value: &'a El<Self>) -> RingElementDisplayWrapper<'a, Self> {
        RingElementDisplayWrapper { ring: self, element: value }
    }

    fn println(&self, value: &El<Self>) {
        println!("{}", self.format(value));
    }
}

pub struct RingElementDisplayWrapper<'a, R: RingWrapper + ?Sized> {
    ring: &'a R,
    element: &'a El<R>
}

impl<'a, R: RingWrapper + ?Sized> std::fmt::Display for RingElementDisplayWrapper<'a, R> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ring.get_ring().dbg(self.element, f)
    }
}

///
/// Trait for rings that have a canonical homomorphism from `S` into them.
/// Used throughout the crate to implement compatible arithmetic between
/// elements of different-but-related rings.
/// 
pub trait CanonicalHom<S>: RingBase
    where S: RingBase
{
    fn has_canonical_hom(&self, from: &S) -> bool;
    fn map_in(&self, from: &S, el: S::Element) -> Self::Element;
}

///
/// Trait for rings that are canonically isomorphic to `S`. In particular,
/// every ring should be canonically isomorphic to itself.
/// 
pub trait CanonicalIso<S>: CanonicalHom<S>
    where S: RingBase
{
    fn has_canonical_iso(&self, from: &S) -> bool;
    fn map_out(&self, from: &S, el: Self::Element) -> S::Element;
}

///
/// Trait for rings that are an extension of a base ring, i.e. come with an
/// embedding of the base ring.
/// 
pub trait RingExtension: RingBase {

    type BaseRing: RingWrapper;

    fn base_ring<'a>(&'a self) -> &'a Self::BaseRing;
    fn from(&self, x: El<Self::BaseRing>) -> Self::Element;

    fn from_ref(&self, x: &El<Self::BaseRing>) -> Self::Element {
        self.from(x.clone())
    }
}

///
/// Trait for rings whose elements can be hashed, compatibly with equality
/// as decided by [`crate::ring::RingBase::eq`].
/// 
pub trait HashableElRing: RingBase {

    fn hash<H: std::hash::Hasher>(&self, el: &Self::Element, h: &mut H);
}

pub trait HashableElRingWrapper: RingWrapper<Type: HashableElRing> {

    fn hash<H: std::hash::Hasher>(&self, el: &El<Self>, h: &mut H) {
        self.get_ring().hash(el, h)
    }

    fn default_hash(&self, el: &El<Self>) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash(el, &mut hasher);
        return <std::collections::hash_map::DefaultHasher as std::hash::Hasher>::finish(&hasher);
    }
}

impl<R> HashableElRingWrapper for R
    where R: RingWrapper<Type: HashableElRing>
{}

///
/// The elements of the ring stored by `R`.
/// 
pub type El<R> = <<R as RingWrapper>::Type as RingBase>::Element;

///
/// The most fundamental [`crate::ring::RingWrapper`], a no-op container that
/// stores a [`crate::ring::RingBase`] object by value.
/// 
/// The proposed pattern is to define a ring type as
/// ```ignore
/// struct ABase { ... }
/// impl RingBase for ABase { ... }
/// ```
/// and provide a type alias
/// ```ignore
/// type A = RingValue<ABase>;
/// ```
/// 
#[derive(Copy, Clone)]
pub struct RingValue<R: RingBase> {
    ring: R
}

impl<R: RingBase> RingValue<R> {

    pub const fn from(value: R) -> Self {
        RingValue { ring: value }
    }
}

impl<R: RingBase + CanonicalIso<R>> RingWrapper for RingValue<R> {

    type Type = R;

    fn get_ring(&self) -> &R {
        &self.ring
    }
}

///
/// A [`crate::ring::RingWrapper`] around a reference to a
/// [`crate::ring::RingBase`] object. Mainly used when implementing
/// [`crate::ring::RingBase`]-level functions by means of techniques that
/// require a [`crate::ring::RingWrapper`] object.
/// 
pub struct RingRef<'a, R: RingBase> {
    ring: &'a R
}

impl<'a, R: RingBase> Clone for RingRef<'a, R> {

    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: RingBase> Copy for RingRef<'a, R> {}

impl<'a, R: RingBase> RingRef<'a, R> {

    pub const fn new(value: &'a R) -> Self {
        RingRef { ring: value }
    }
}

impl<'a, R: RingBase + CanonicalIso<R>> RingWrapper for RingRef<'a, R> {

    type Type = R;

    fn get_ring(&self) -> &R {
        self.ring
    }
}

impl<'a, R: RingWrapper> RingWrapper for &'a R {

    type Type = <R as RingWrapper>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<'a, R: RingWrapper> RingWrapper for &'a mut R {

    type Type = <R as RingWrapper>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingWrapper> RingWrapper for Box<R> {

    type Type = <R as RingWrapper>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingWrapper> RingWrapper for Rc<R> {

    type Type = <R as RingWrapper>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

impl<R: RingWrapper> RingWrapper for Arc<R> {

    type Type = <R as RingWrapper>::Type;

    fn get_ring(&self) -> &Self::Type {
        (**self).get_ring()
    }
}

///
/// Asserts that two elements of the given ring are equal, with a readable
/// message if they are not.
/// 
#[macro_export]
macro_rules! assert_el_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring_val, lhs_val, rhs_val) => {
                assert!(
                    $crate::ring::RingWrapper::eq(ring_val, lhs_val, rhs_val),
                    "Assertion failed: {} != {}",
                    $crate::ring::RingWrapper::format(ring_val, lhs_val),
                    $crate::ring::RingWrapper::format(ring_val, rhs_val)
                );
            }
        }
    };
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::primitive_int::StaticRing;

    #[test]
    fn test_pow() {
        let ring = StaticRing::<i64>::RING;
        assert_el_eq!(ring, 1, ring.pow(&3, 0));
        assert_el_eq!(ring, 3, ring.pow(&3, 1));
        assert_el_eq!(ring, 81, ring.pow(&3, 4));
        assert_el_eq!(ring, 243, ring.pow(&3, 5));
    }

    #[test]
    fn test_wrapped_stores_delegate() {
        let ring = StaticRing::<i64>::RING;
        let by_ref = &ring;
        let boxed = Box::new(ring);
        let shared = Arc::new(ring);
        assert_el_eq!(by_ref, 7, by_ref.add(3, 4));
        assert_el_eq!(boxed, 12, boxed.mul(3, 4));
        assert_el_eq!(shared, -3, shared.negate(3));
        assert_el_eq!(ring, 5, ring.map_in(&ring, 5));
    }
}
