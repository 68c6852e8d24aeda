use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use serde::{Deserialize, Serialize};
use thread_local::ThreadLocal;

use crate::algorithms::eea::gcd;
use crate::iters::weighted_integer_vectors;
use crate::lazy::LazyVec;
use crate::ring::*;

///
/// The exponents that a generator can be raised to in a monomial.
/// 
pub type MonomialExponent = u16;

///
/// A monomial of a [`FiniteGCAlgebra`], i.e. a power-product of its
/// generators, stored as the vector of generator exponents. Monomials for
/// the same algebra always contain one (possibly zero) exponent per
/// generator.
/// 
/// The degree of a monomial is the sum of its exponents, each weighted by
/// the degree of the corresponding generator; since the weights belong to
/// the algebra, that degree is computed by
/// [`FiniteGCAlgebraBase::degree_on_basis()`] and not here.
/// 
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Monomial {
    exponents: Box<[MonomialExponent]>
}

impl Monomial {

    pub fn new<E: Into<Box<[MonomialExponent]>>>(exponents: E) -> Self {
        Self { exponents: exponents.into() }
    }

    ///
    /// The monomial with all exponents zero, i.e. the unit of the algebra.
    /// 
    pub fn unit(len: usize) -> Self {
        Self { exponents: vec![0; len].into_boxed_slice() }
    }

    ///
    /// The monomial that is exactly the `slot`-th generator.
    /// 
    pub fn generator(len: usize, slot: usize) -> Self {
        let mut exponents = vec![0; len];
        exponents[slot] = 1;
        Self { exponents: exponents.into_boxed_slice() }
    }

    pub fn len(&self) -> usize {
        self.exponents.len()
    }

    ///
    /// The sum of the exponents, i.e. the unweighted total degree.
    /// 
    pub fn deg(&self) -> u32 {
        self.exponents.iter().map(|e| *e as u32).sum()
    }

    ///
    /// Computes the product of two monomials, i.e. the elementwise sum of
    /// their exponent vectors.
    /// 
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.len(), rhs.len());
        Self {
            exponents: self.exponents.iter().zip(rhs.exponents.iter()).map(|(a, b)| *a + *b).collect()
        }
    }
}

impl std::ops::Index<usize> for Monomial {

    type Output = MonomialExponent;

    fn index(&self, i: usize) -> &MonomialExponent {
        &self.exponents[i]
    }
}

///
/// Static description of the structure a [`FiniteGCAlgebra`] carries, for
/// consumers that dispatch generically on such capabilities.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgebraCapabilities {
    pub graded: bool,
    pub graded_commutative: bool,
    pub finite_dimensional: bool,
    pub has_basis: bool
}

///
/// An element of a [`FiniteGCAlgebra`], i.e. a finite linear combination of
/// monomials with coefficients in the base ring. Terms are stored sorted by
/// weighted degree (ties broken lexicographically by exponent vector), with
/// zero coefficients removed.
/// 
pub struct FiniteGCAlgebraEl<R: RingWrapper> {
    terms: Vec<(El<R>, Monomial)>
}

impl<R: RingWrapper> Clone for FiniteGCAlgebraEl<R> {

    fn clone(&self) -> Self {
        Self { terms: self.terms.clone() }
    }
}

///
/// A finitely generated graded-commutative algebra over `R`, truncated at a
/// maximal total degree: each generator has a fixed positive degree, degrees
/// add under multiplication, and every product whose total degree exceeds
/// `max_degree` is zero. Generators of odd degree anticommute (and square to
/// zero), generators of even degree are central.
/// 
/// Algebras without a maximal degree are a different structure and are not
/// provided by this crate.
/// 
/// # Example
/// ```
/// use graded_algebra::ring::*;
/// use graded_algebra::rings::rational::RationalField;
/// use graded_algebra::rings::graded::FiniteGCAlgebra;
/// 
/// let algebra = FiniteGCAlgebra::new(RationalField::RING, 10, &["p1", "p2"], &[4, 8]);
/// let gens = algebra.gens();
/// // degree 4 + 8 = 12 exceeds 10, so the product is truncated to zero
/// assert!(algebra.is_zero(&algebra.mul_ref(&gens[0], &gens[1])));
/// ```
/// 
pub struct FiniteGCAlgebraBase<R: RingWrapper> {
    base_ring: R,
    names: Box<[String]>,
    degrees: Box<[u32]>,
    max_degree: u32,
    gens: LazyVec<FiniteGCAlgebraEl<R>>,
    product_cache: ThreadLocal<RefCell<HashMap<(Monomial, Monomial), Monomial>>>
}

///
/// [`RingWrapper`] corresponding to [`FiniteGCAlgebraBase`].
/// 
pub type FiniteGCAlgebra<R> = RingValue<FiniteGCAlgebraBase<R>>;

impl<R> FiniteGCAlgebra<R>
    where R: RingWrapper, R::Type: PartialEq
{
    ///
    /// Creates the graded-commutative algebra over `base_ring` with the
    /// given generator names and degrees, truncated above `max_degree`.
    /// 
    /// Panics if no generator is given, if the numbers of names and degrees
    /// disagree, if some degree is zero, or if `max_degree` is smaller than
    /// the largest generator degree.
    /// 
    pub fn new(base_ring: R, max_degree: u32, names: &[&str], degrees: &[u32]) -> Self {
        RingValue::from(FiniteGCAlgebraBase::create(
            base_ring,
            max_degree,
            names.iter().map(|name| (*name).to_owned()).collect(),
            degrees.into()
        ))
    }

    ///
    /// As [`FiniteGCAlgebra::new()`], with generator names synthesized as
    /// `x0, x1, ...`.
    /// 
    pub fn new_with_degrees(base_ring: R, max_degree: u32, degrees: &[u32]) -> Self {
        RingValue::from(FiniteGCAlgebraBase::create(
            base_ring,
            max_degree,
            (0..degrees.len()).map(|i| format!("x{}", i)).collect(),
            degrees.into()
        ))
    }

    ///
    /// As [`FiniteGCAlgebra::new()`], with the generator names given as a
    /// single comma-separated string and every generator of degree 1.
    /// 
    pub fn new_with_names(base_ring: R, max_degree: u32, names: &str) -> Self {
        let names = names.split(',').map(|name| name.trim().to_owned()).collect::<Box<[String]>>();
        let degrees = vec![1; names.len()].into_boxed_slice();
        RingValue::from(FiniteGCAlgebraBase::create(base_ring, max_degree, names, degrees))
    }

    pub fn ngens(&self) -> usize {
        self.get_ring().ngens()
    }

    ///
    /// Returns the generators of the algebra, in declaration order.
    /// 
    pub fn gens(&self) -> Vec<El<Self>> {
        self.get_ring().gens()
    }

    ///
    /// Returns the `i`-th generator of the algebra; panics if `i` is out of
    /// range.
    /// 
    pub fn gen(&self, i: usize) -> El<Self> {
        self.get_ring().gen(i)
    }

    ///
    /// Returns the common degree of all terms of `el`, or `None` if `el` is
    /// zero or not homogeneous.
    /// 
    pub fn degree(&self, el: &El<Self>) -> Option<u32> {
        self.get_ring().degree(el)
    }

    ///
    /// Returns the element that is the given monomial with coefficient 1.
    /// 
    pub fn monomial(&self, m: Monomial) -> El<Self> {
        self.get_ring().monomial(m)
    }

    ///
    /// Creates an element from the given terms; the iterator may yield the
    /// same monomial multiple times, in which case the corresponding
    /// coefficients are summed up.
    /// 
    pub fn from_terms<I>(&self, terms: I) -> El<Self>
        where I: Iterator<Item = (El<R>, Monomial)>
    {
        self.get_ring().from_terms(terms)
    }

    ///
    /// Returns all monomials of the algebra, enumerated by ascending degree.
    /// 
    pub fn basis_indices(&self) -> Vec<Monomial> {
        self.get_ring().basis_indices()
    }

    ///
    /// The dimension of the algebra as a free module over its base ring.
    /// 
    pub fn dimension(&self) -> usize {
        self.get_ring().dimension()
    }

    pub fn capabilities(&self) -> AlgebraCapabilities {
        self.get_ring().capabilities()
    }
}

impl<R: RingWrapper> FiniteGCAlgebraBase<R> {

    fn create(base_ring: R, max_degree: u32, names: Box<[String]>, degrees: Box<[u32]>) -> Self {
        assert!(names.len() > 0, "at least one generator is required");
        assert_eq!(names.len(), degrees.len(), "generator names and degrees must correspond");
        assert!(degrees.iter().all(|d| *d > 0), "generator degrees must be positive");
        let largest = degrees.iter().copied().max().unwrap();
        assert!(max_degree >= largest, "max_degree must not be smaller than the largest generator degree {}", largest);
        Self {
            base_ring,
            names,
            degrees,
            max_degree,
            gens: LazyVec::new(),
            product_cache: ThreadLocal::new()
        }
    }

    pub fn ngens(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    pub fn max_degree(&self) -> u32 {
        self.max_degree
    }

    ///
    /// Returns the weighted degree of the given monomial, i.e. the sum of
    /// its exponents weighted by the generator degrees.
    /// 
    pub fn degree_on_basis(&self, m: &Monomial) -> u32 {
        assert_eq!(self.ngens(), m.len());
        let result = (0..m.len()).map(|i| self.degrees[i] as u64 * m[i] as u64).sum::<u64>();
        u32::try_from(result).unwrap()
    }

    ///
    /// Returns the monomial that indexes the unit of the algebra.
    /// 
    pub fn one_basis(&self) -> Monomial {
        Monomial::unit(self.ngens())
    }

    ///
    /// Computes the product of two monomials within the algebra: `None` if
    /// the degrees add up beyond `max_degree` (the product is then the zero
    /// element), and the elementwise exponent sum otherwise.
    /// 
    /// This hook works on the commutative monomial level; the sign rule of
    /// graded commutativity is applied by the element-level multiplication,
    /// see [`FiniteGCAlgebraBase::koszul_sign()`].
    /// 
    pub fn product_on_basis(&self, lhs: &Monomial, rhs: &Monomial) -> Option<Monomial> {
        if self.degree_on_basis(lhs) as u64 + self.degree_on_basis(rhs) as u64 > self.max_degree as u64 {
            return None;
        }
        let cache = self.product_cache.get_or(|| RefCell::new(HashMap::new()));
        let mut cache = cache.borrow_mut();
        let result = cache.entry((lhs.clone(), rhs.clone())).or_insert_with(|| lhs.mul(rhs));
        return Some(result.clone());
    }

    ///
    /// Returns the sign that reordering the product `lhs * rhs` into the
    /// declaration order of the generators introduces: `Some(true)` if the
    /// product is to be negated, `Some(false)` if not, and `None` if it is
    /// zero because an odd-degree generator occurs in both factors.
    /// 
    pub fn koszul_sign(&self, lhs: &Monomial, rhs: &Monomial) -> Option<bool> {
        let mut inversions: u64 = 0;
        for i in 0..self.ngens() {
            if self.degrees[i] % 2 == 0 || lhs[i] == 0 {
                continue;
            }
            if rhs[i] > 0 {
                // odd generators square to zero
                return None;
            }
            for j in 0..i {
                if self.degrees[j] % 2 == 1 {
                    inversions += lhs[i] as u64 * rhs[j] as u64;
                }
            }
        }
        return Some(inversions % 2 == 1);
    }

    fn compare_monomials(&self, lhs: &Monomial, rhs: &Monomial) -> Ordering {
        self.degree_on_basis(lhs).cmp(&self.degree_on_basis(rhs))
            .then_with(|| lhs.exponents.cmp(&rhs.exponents))
    }

    fn normalize_terms(&self, mut terms: Vec<(El<R>, Monomial)>) -> FiniteGCAlgebraEl<R> {
        terms.sort_unstable_by(|l, r| self.compare_monomials(&l.1, &r.1));
        let mut result: Vec<(El<R>, Monomial)> = Vec::with_capacity(terms.len());
        for (c, m) in terms {
            match result.last_mut() {
                Some(last) if last.1 == m => self.base_ring.add_assign(&mut last.0, c),
                _ => result.push((c, m))
            }
        }
        result.retain(|(c, _)| !self.base_ring.is_zero(c));
        return FiniteGCAlgebraEl { terms: result };
    }

    fn add_terms(&self, lhs: &[(El<R>, Monomial)], rhs: &[(El<R>, Monomial)]) -> Vec<(El<R>, Monomial)> {
        let mut result = Vec::with_capacity(lhs.len() + rhs.len());
        let mut i = 0;
        let mut j = 0;
        while i < lhs.len() && j < rhs.len() {
            match self.compare_monomials(&lhs[i].1, &rhs[j].1) {
                Ordering::Less => {
                    result.push((lhs[i].0.clone(), lhs[i].1.clone()));
                    i += 1;
                },
                Ordering::Greater => {
                    result.push((rhs[j].0.clone(), rhs[j].1.clone()));
                    j += 1;
                },
                Ordering::Equal => {
                    let c = self.base_ring.add_ref(&lhs[i].0, &rhs[j].0);
                    if !self.base_ring.is_zero(&c) {
                        result.push((c, lhs[i].1.clone()));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        for (c, m) in &lhs[i..] {
            result.push((c.clone(), m.clone()));
        }
        for (c, m) in &rhs[j..] {
            result.push((c.clone(), m.clone()));
        }
        return result;
    }

    pub fn monomial(&self, m: Monomial) -> FiniteGCAlgebraEl<R> {
        assert_eq!(self.ngens(), m.len());
        assert!(self.degree_on_basis(&m) <= self.max_degree, "monomial degree exceeds the maximal degree of the algebra");
        FiniteGCAlgebraEl { terms: vec![(self.base_ring.one(), m)] }
    }

    pub fn from_terms<I>(&self, terms: I) -> FiniteGCAlgebraEl<R>
        where I: Iterator<Item = (El<R>, Monomial)>
    {
        let terms = terms.inspect(|(_, m)| {
            assert!(self.degree_on_basis(m) <= self.max_degree, "monomial degree exceeds the maximal degree of the algebra");
        }).collect::<Vec<_>>();
        self.normalize_terms(terms)
    }

    pub fn gen(&self, i: usize) -> FiniteGCAlgebraEl<R> {
        assert!(i < self.ngens(), "generator index {} out of range for an algebra with {} generators", i, self.ngens());
        self.gens.get_or_init(i, || FiniteGCAlgebraEl {
            terms: vec![(self.base_ring.one(), Monomial::generator(self.ngens(), i))]
        }).clone()
    }

    pub fn gens(&self) -> Vec<FiniteGCAlgebraEl<R>> {
        (0..self.ngens()).map(|i| self.gen(i)).collect()
    }

    pub fn degree(&self, el: &FiniteGCAlgebraEl<R>) -> Option<u32> {
        let mut result = None;
        for (_, m) in &el.terms {
            let d = self.degree_on_basis(m);
            match result {
                None => result = Some(d),
                Some(seen) if seen != d => return None,
                Some(_) => {}
            }
        }
        return result;
    }

    ///
    /// Returns all monomials of the algebra. Since every monomial degree is
    /// a multiple of the gcd of the generator degrees, the enumeration
    /// proceeds in strides of that gcd.
    /// 
    pub fn basis_indices(&self) -> Vec<Monomial> {
        let step = self.degrees.iter().fold(0u64, |a, d| gcd(a, *d as u64)) as u32;
        let mut result = Vec::new();
        let mut degree = 0;
        while degree <= self.max_degree {
            result.extend(weighted_integer_vectors(degree, &self.degrees).into_iter().map(Monomial::new));
            degree += step;
        }
        return result;
    }

    pub fn dimension(&self) -> usize {
        self.basis_indices().len()
    }

    pub fn capabilities(&self) -> AlgebraCapabilities {
        AlgebraCapabilities {
            graded: true,
            graded_commutative: true,
            finite_dimensional: true,
            has_basis: true
        }
    }

    fn dbg_term<'a>(&self, coefficient: &El<R>, m: &Monomial, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        if m.deg() == 0 {
            return write!(out, "{}", self.base_ring.format(coefficient));
        }
        if self.base_ring.is_neg_one(coefficient) {
            write!(out, "-")?;
        } else if !self.base_ring.is_one(coefficient) {
            write!(out, "{}*", self.base_ring.format(coefficient))?;
        }
        let mut first = true;
        for i in 0..m.len() {
            if m[i] == 0 {
                continue;
            }
            if !first {
                write!(out, "*")?;
            }
            write!(out, "{}", self.names[i])?;
            if m[i] > 1 {
                write!(out, "^{}", m[i])?;
            }
            first = false;
        }
        return Ok(());
    }

    ///
    /// Renders the given monomial for typeset output, with `^{k}` exponent
    /// syntax; the unit monomial renders as `1`.
    /// 
    pub fn latex_term(&self, m: &Monomial) -> String {
        assert_eq!(self.ngens(), m.len());
        if m.deg() == 0 {
            return "1".to_owned();
        }
        let mut result = String::new();
        for i in 0..m.len() {
            if m[i] == 0 {
                continue;
            }
            if !result.is_empty() {
                result.push(' ');
            }
            result.push_str(&self.names[i]);
            if m[i] > 1 {
                result.push_str(&format!("^{{{}}}", m[i]));
            }
        }
        return result;
    }

    ///
    /// Renders the given element for typeset output, with the same term
    /// structure as the plain-text display.
    /// 
    pub fn latex(&self, el: &FiniteGCAlgebraEl<R>) -> String {
        if el.terms.is_empty() {
            return format!("{}", self.base_ring.format(&self.base_ring.zero()));
        }
        let mut result = String::new();
        for (c, m) in &el.terms {
            if !result.is_empty() {
                result.push_str(" + ");
            }
            if m.deg() == 0 {
                result.push_str(&format!("{}", self.base_ring.format(c)));
                continue;
            }
            if self.base_ring.is_neg_one(c) {
                result.push('-');
            } else if !self.base_ring.is_one(c) {
                result.push_str(&format!("{} ", self.base_ring.format(c)));
            }
            result.push_str(&self.latex_term(m));
        }
        return result;
    }

    ///
    /// Returns a typeset-style description of the algebra itself.
    /// 
    pub fn latex_description(&self) -> String {
        format!("\\langle {} \\rangle_{{\\le {}}}", self.names.join(", "), self.max_degree)
    }
}

impl<R: RingWrapper> std::fmt::Display for FiniteGCAlgebraBase<R> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graded commutative algebra with generators (")?;
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\"", name)?;
        }
        write!(f, ") in degrees (")?;
        for (i, degree) in self.degrees.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", degree)?;
        }
        write!(f, ") with maximal finite degree {}", self.max_degree)
    }
}

impl<R: RingWrapper> RingBase for FiniteGCAlgebraBase<R> {

    type Element = FiniteGCAlgebraEl<R>;

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        lhs.terms = self.add_terms(&lhs.terms, &rhs.terms);
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        self.add_assign_ref(lhs, &rhs);
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        for (c, _) in &mut lhs.terms {
            self.base_ring.negate_inplace(c);
        }
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = self.mul_ref(lhs, &rhs);
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        *lhs = self.mul_ref(lhs, rhs);
    }

    fn mul_ref(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        let mut terms = Vec::new();
        for (a, u) in &lhs.terms {
            for (b, v) in &rhs.terms {
                let w = match self.product_on_basis(u, v) {
                    Some(w) => w,
                    None => continue
                };
                let negate = match self.koszul_sign(u, v) {
                    Some(negate) => negate,
                    None => continue
                };
                let mut c = self.base_ring.mul_ref(a, b);
                if negate {
                    self.base_ring.negate_inplace(&mut c);
                }
                terms.push((c, w));
            }
        }
        self.normalize_terms(terms)
    }

    fn zero(&self) -> Self::Element {
        FiniteGCAlgebraEl { terms: Vec::new() }
    }

    fn from_z(&self, value: i32) -> Self::Element {
        self.from(self.base_ring.from_z(value))
    }

    fn eq(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        if lhs.terms.len() != rhs.terms.len() {
            return false;
        }
        for ((c1, m1), (c2, m2)) in lhs.terms.iter().zip(rhs.terms.iter()) {
            if m1 != m2 || !self.base_ring.eq(c1, c2) {
                return false;
            }
        }
        return true;
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        value.terms.is_empty()
    }

    fn is_one(&self, value: &Self::Element) -> bool {
        value.terms.len() == 1 && value.terms[0].1.deg() == 0 && self.base_ring.is_one(&value.terms[0].0)
    }

    fn is_neg_one(&self, value: &Self::Element) -> bool {
        value.terms.len() == 1 && value.terms[0].1.deg() == 0 && self.base_ring.is_neg_one(&value.terms[0].0)
    }

    fn is_commutative(&self) -> bool {
        // odd-degree generators anticommute
        self.degrees.iter().all(|d| *d % 2 == 0)
    }

    fn is_noetherian(&self) -> bool {
        self.base_ring.is_noetherian()
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        if value.terms.is_empty() {
            return write!(out, "{}", self.base_ring.format(&self.base_ring.zero()));
        }
        for (i, (c, m)) in value.terms.iter().enumerate() {
            if i > 0 {
                write!(out, " + ")?;
            }
            self.dbg_term(c, m, out)?;
        }
        return Ok(());
    }
}

impl<R: RingWrapper> RingExtension for FiniteGCAlgebraBase<R> {

    type BaseRing = R;

    fn base_ring<'a>(&'a self) -> &'a Self::BaseRing {
        &self.base_ring
    }

    fn from(&self, x: El<Self::BaseRing>) -> Self::Element {
        if self.base_ring.is_zero(&x) {
            self.zero()
        } else {
            FiniteGCAlgebraEl { terms: vec![(x, self.one_basis())] }
        }
    }
}

impl<R> PartialEq for FiniteGCAlgebraBase<R>
    where R: RingWrapper, R::Type: PartialEq
{
    fn eq(&self, other: &Self) -> bool {
        self.base_ring.get_ring() == other.base_ring.get_ring()
            && self.names == other.names
            && self.degrees == other.degrees
            && self.max_degree == other.max_degree
    }
}

impl<R> CanonicalHom<FiniteGCAlgebraBase<R>> for FiniteGCAlgebraBase<R>
    where R: RingWrapper, R::Type: PartialEq
{
    fn has_canonical_hom(&self, from: &Self) -> bool {
        self == from
    }

    fn map_in(&self, from: &Self, el: FiniteGCAlgebraEl<R>) -> FiniteGCAlgebraEl<R> {
        assert!(self.has_canonical_hom(from));
        el
    }
}

impl<R> CanonicalIso<FiniteGCAlgebraBase<R>> for FiniteGCAlgebraBase<R>
    where R: RingWrapper, R::Type: PartialEq
{
    fn has_canonical_iso(&self, from: &Self) -> bool {
        self == from
    }

    fn map_out(&self, from: &Self, el: FiniteGCAlgebraEl<R>) -> FiniteGCAlgebraEl<R> {
        assert!(self.has_canonical_iso(from));
        el
    }
}

impl<R> Clone for FiniteGCAlgebraBase<R>
    where R: RingWrapper + Clone
{
    fn clone(&self) -> Self {
        Self {
            base_ring: self.base_ring.clone(),
            names: self.names.clone(),
            degrees: self.degrees.clone(),
            max_degree: self.max_degree,
            gens: self.gens.clone(),
            product_cache: ThreadLocal::new()
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
struct InternKey {
    algebra_type: TypeId,
    names: Box<[String]>,
    degrees: Box<[u32]>,
    max_degree: u32
}

static INTERNED: OnceLock<Mutex<HashMap<InternKey, Vec<Arc<dyn Any + Send + Sync>>>>> = OnceLock::new();

impl<R> FiniteGCAlgebra<R>
    where R: RingWrapper + Send + Sync + 'static,
        R::Type: PartialEq,
        El<R>: Send + Sync + 'static
{
    ///
    /// As [`FiniteGCAlgebra::new()`], but consults a process-wide registry
    /// of canonical instances first: calling this twice with identical
    /// arguments returns handles to the very same algebra object
    /// (`Arc::ptr_eq`), so that object identity can be used for
    /// compatibility checks. Since `Arc<FiniteGCAlgebra<R>>` is itself a
    /// [`RingWrapper`], the result is a first-class ring handle.
    /// 
    pub fn interned(base_ring: R, max_degree: u32, names: &[&str], degrees: &[u32]) -> Arc<Self> {
        let candidate = Self::new(base_ring, max_degree, names, degrees);
        let key = InternKey {
            algebra_type: TypeId::of::<Self>(),
            names: candidate.get_ring().names.clone(),
            degrees: candidate.get_ring().degrees.clone(),
            max_degree
        };
        let mut table = INTERNED.get_or_init(|| Mutex::new(HashMap::new())).lock().unwrap();
        let entries = table.entry(key).or_insert_with(Vec::new);
        for entry in entries.iter() {
            if let Ok(existing) = entry.clone().downcast::<Self>() {
                if existing.get_ring() == candidate.get_ring() {
                    return existing;
                }
            }
        }
        let result = Arc::new(candidate);
        entries.push(result.clone() as Arc<dyn Any + Send + Sync>);
        return result;
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::primitive_int::StaticRing;
    use crate::rings::rational::RationalField;
    use crate::rings::zn_static::Zn;

    fn characteristic_classes() -> FiniteGCAlgebra<StaticRing<i64>> {
        FiniteGCAlgebra::new(StaticRing::<i64>::RING, 10, &["p1", "p2", "e"], &[4, 8, 2])
    }

    fn exterior_like() -> FiniteGCAlgebra<StaticRing<i64>> {
        FiniteGCAlgebra::new(StaticRing::<i64>::RING, 5, &["x", "y", "z"], &[1, 2, 3])
    }

    #[test]
    fn test_construction_normalization() {
        let algebra = FiniteGCAlgebra::new_with_degrees(StaticRing::<i64>::RING, 6, &[1, 2, 3]);
        assert_eq!(&["x0".to_owned(), "x1".to_owned(), "x2".to_owned()], algebra.get_ring().names());
        assert_eq!(&[1, 2, 3], algebra.get_ring().degrees());

        let algebra = FiniteGCAlgebra::new_with_names(StaticRing::<i64>::RING, 3, "x, y,z");
        assert_eq!(&["x".to_owned(), "y".to_owned(), "z".to_owned()], algebra.get_ring().names());
        assert_eq!(&[1, 1, 1], algebra.get_ring().degrees());
        assert_eq!(3, algebra.get_ring().max_degree());
    }

    #[test]
    #[should_panic]
    fn test_max_degree_too_small() {
        FiniteGCAlgebra::new(StaticRing::<i64>::RING, 3, &["x"], &[4]);
    }

    #[test]
    #[should_panic]
    fn test_no_generators() {
        FiniteGCAlgebra::new_with_degrees(StaticRing::<i64>::RING, 3, &[]);
    }

    #[test]
    #[should_panic]
    fn test_zero_degree() {
        FiniteGCAlgebra::new(StaticRing::<i64>::RING, 3, &["x", "y"], &[1, 0]);
    }

    #[test]
    #[should_panic]
    fn test_name_degree_mismatch() {
        FiniteGCAlgebra::new(StaticRing::<i64>::RING, 3, &["x"], &[1, 2]);
    }

    #[test]
    #[should_panic]
    fn test_gen_out_of_range() {
        exterior_like().gen(3);
    }

    #[test]
    fn test_product_on_basis() {
        let algebra = characteristic_classes();
        let base = algebra.get_ring();
        let p1_e = Monomial::new([1, 0, 1]);
        let unit = base.one_basis();
        assert_eq!(Some(p1_e.clone()), base.product_on_basis(&p1_e, &unit));
        assert_eq!(6, base.degree_on_basis(&p1_e));

        // 2 * deg(p1) + deg(p1) = 12 > 10
        let p1_sq = Monomial::new([2, 0, 0]);
        let p1 = Monomial::new([1, 0, 0]);
        assert_eq!(None, base.product_on_basis(&p1_sq, &p1));

        // the hook is commutative and memoization does not change results
        assert_eq!(base.product_on_basis(&p1, &p1_e), base.product_on_basis(&p1_e, &p1));
        assert_eq!(Some(Monomial::new([2, 0, 1])), base.product_on_basis(&p1, &p1_e));
    }

    #[test]
    fn test_degree_on_basis() {
        let algebra = characteristic_classes();
        let base = algebra.get_ring();
        assert_eq!(0, base.degree_on_basis(&base.one_basis()));
        assert_eq!(14, base.degree_on_basis(&Monomial::new([1, 1, 1])));
    }

    #[test]
    fn test_truncation() {
        let algebra = characteristic_classes();
        let gens = algebra.gens();

        assert!(algebra.is_zero(&algebra.pow(&gens[0], 3)));

        let p1_e = algebra.mul_ref(&gens[0], &gens[2]);
        assert!(!algebra.is_zero(&p1_e));
        assert_eq!(Some(6), algebra.degree(&p1_e));
        assert_eq!(Some(4), algebra.degree(&gens[0]));
    }

    #[test]
    fn test_sign_rule() {
        let algebra = exterior_like();
        let x = algebra.gen(0);
        let y = algebra.gen(1);
        let z = algebra.gen(2);

        // the basis hook knows no signs, so the x^2 index is still nonzero there
        let x_index = Monomial::generator(3, 0);
        assert_eq!(Some(Monomial::new([2, 0, 0])), algebra.get_ring().product_on_basis(&x_index, &x_index));

        // but odd-degree generators square to zero at the element layer
        assert!(algebra.is_zero(&algebra.mul_ref(&x, &x)));
        assert!(algebra.is_zero(&algebra.mul_ref(&z, &z)));

        // odd with odd anticommutes, even with anything commutes
        assert_el_eq!(algebra, algebra.mul_ref(&x, &z), algebra.negate(algebra.mul_ref(&z, &x)));
        assert_el_eq!(algebra, algebra.mul_ref(&x, &y), algebra.mul_ref(&y, &x));

        // deg(x*y*z) = 6 > 5
        assert!(algebra.is_zero(&algebra.prod([x, y, z].into_iter())));
    }

    #[test]
    fn test_sign_rule_char_two() {
        let algebra = FiniteGCAlgebra::new(Zn::<2>::RING, 5, &["x", "y", "z"], &[1, 2, 3]);
        let x = algebra.gen(0);
        let z = algebra.gen(2);
        assert_el_eq!(algebra, algebra.mul_ref(&x, &z), algebra.mul_ref(&z, &x));
        assert!(algebra.is_zero(&algebra.mul_ref(&x, &x)));
    }

    #[test]
    fn test_degree() {
        let algebra = exterior_like();
        let x = algebra.gen(0);
        let y = algebra.gen(1);

        assert_eq!(Some(0), algebra.degree(&algebra.one()));
        assert_eq!(None, algebra.degree(&algebra.zero()));
        assert_eq!(Some(3), algebra.degree(&algebra.mul_ref(&x, &y)));
        assert_eq!(None, algebra.degree(&algebra.add(x, y)));
    }

    #[test]
    fn test_gens() {
        let algebra = characteristic_classes();
        let gens = algebra.gens();
        assert_eq!(3, gens.len());
        for i in 0..3 {
            assert_el_eq!(algebra, algebra.monomial(Monomial::generator(3, i)), gens[i].clone());
            assert_eq!(Some(algebra.get_ring().degrees()[i]), algebra.degree(&gens[i]));
            assert_el_eq!(algebra, algebra.gen(i), gens[i].clone());
        }
    }

    #[test]
    fn test_from_terms_merges_duplicates() {
        let algebra = characteristic_classes();
        let m = Monomial::new([1, 0, 1]);
        let merged = algebra.from_terms([(2, m.clone()), (3, m.clone())].into_iter());
        assert_el_eq!(algebra, algebra.from_terms([(5, m.clone())].into_iter()), merged);
        assert!(algebra.is_zero(&algebra.from_terms([(2, m.clone()), (-2, m)].into_iter())));
    }

    #[test]
    fn test_display() {
        let algebra = characteristic_classes();
        let gens = algebra.gens();

        let p1_e = algebra.mul_ref(&gens[0], &gens[2]);
        assert_eq!("p1*e", format!("{}", algebra.format(&p1_e)));

        let combination = algebra.from_terms([
            (5, Monomial::new([0, 0, 1])),
            (4, Monomial::new([1, 0, 1]))
        ].into_iter());
        assert_eq!("5*e + 4*p1*e", format!("{}", algebra.format(&combination)));

        assert_eq!("1", format!("{}", algebra.format(&algebra.one())));
        assert_eq!("0", format!("{}", algebra.format(&algebra.zero())));
        assert_eq!("7", format!("{}", algebra.format(&algebra.from_z(7))));
        assert_eq!("e^2", format!("{}", algebra.format(&algebra.pow(&gens[2], 2))));

        let exterior = exterior_like();
        let neg_xz = exterior.mul_ref(&exterior.gen(2), &exterior.gen(0));
        assert_eq!("-x*z", format!("{}", exterior.format(&neg_xz)));
    }

    #[test]
    fn test_latex() {
        let algebra = characteristic_classes();
        let base = algebra.get_ring();

        assert_eq!("1", base.latex_term(&base.one_basis()));
        assert_eq!("p1 e^{2}", base.latex_term(&Monomial::new([1, 0, 2])));

        let combination = algebra.from_terms([
            (5, Monomial::new([0, 0, 1])),
            (4, Monomial::new([1, 0, 1]))
        ].into_iter());
        assert_eq!("5 e + 4 p1 e", base.latex(&combination));
        assert_eq!("1", base.latex(&algebra.one()));
        assert_eq!("0", base.latex(&algebra.zero()));
        assert_eq!("\\langle p1, p2, e \\rangle_{\\le 10}", base.latex_description());
    }

    #[test]
    fn test_algebra_description() {
        let algebra = characteristic_classes();
        assert_eq!(
            "Graded commutative algebra with generators (\"p1\", \"p2\", \"e\") in degrees (4, 8, 2) with maximal finite degree 10",
            format!("{}", algebra.get_ring())
        );
    }

    #[test]
    fn test_basis_indices_dimension() {
        let exterior = exterior_like();
        assert_eq!(16, exterior.dimension());

        let algebra = characteristic_classes();
        let basis = algebra.basis_indices();
        assert_eq!(14, basis.len());
        for window in basis.windows(2) {
            assert!(algebra.get_ring().degree_on_basis(&window[0]) <= algebra.get_ring().degree_on_basis(&window[1]));
        }
        assert!(basis.iter().all(|m| algebra.get_ring().degree_on_basis(m) <= 10));
    }

    #[test]
    fn test_is_commutative() {
        assert!(characteristic_classes().is_commutative());
        assert!(!exterior_like().is_commutative());
    }

    #[test]
    fn test_capabilities() {
        let capabilities = characteristic_classes().capabilities();
        assert!(capabilities.graded);
        assert!(capabilities.graded_commutative);
        assert!(capabilities.finite_dimensional);
        assert!(capabilities.has_basis);
    }

    #[test]
    fn test_interned_identity() {
        let first = FiniteGCAlgebra::interned(StaticRing::<i64>::RING, 10, &["p1", "p2", "e"], &[4, 8, 2]);
        let second = FiniteGCAlgebra::interned(StaticRing::<i64>::RING, 10, &["p1", "p2", "e"], &[4, 8, 2]);
        assert!(Arc::ptr_eq(&first, &second));

        let other = FiniteGCAlgebra::interned(StaticRing::<i64>::RING, 12, &["p1", "p2", "e"], &[4, 8, 2]);
        assert!(!Arc::ptr_eq(&first, &other));

        // an interned algebra is a first-class ring handle
        assert!(first.is_zero(&first.pow(&first.gen(0), 3)));
        assert_el_eq!(first, second.one(), first.one());
    }

    #[test]
    fn test_ring_axioms_even_degrees() {
        let algebra = FiniteGCAlgebra::new(StaticRing::<i64>::RING, 8, &["a", "b"], &[2, 4]);
        let a = algebra.gen(0);
        let b = algebra.gen(1);
        let elements = [
            algebra.zero(),
            algebra.one(),
            algebra.from_z(-2),
            a.clone(),
            b.clone(),
            algebra.mul_ref(&a, &b),
            algebra.add_ref(&a, &b),
            algebra.sub(algebra.pow(&a, 2), b)
        ];
        crate::ring::generic_tests::test_ring_axioms(&algebra, elements.into_iter());
    }

    #[test]
    fn test_ring_axioms_odd_degrees() {
        let algebra = FiniteGCAlgebra::new(RationalField::RING, 4, &["x", "y", "z"], &[1, 2, 3]);
        let x = algebra.gen(0);
        let y = algebra.gen(1);
        let z = algebra.gen(2);
        let elements = [
            algebra.zero(),
            algebra.one(),
            algebra.neg_one(),
            x.clone(),
            y.clone(),
            z.clone(),
            algebra.mul_ref(&x, &y),
            algebra.add_ref(&x, &y)
        ];
        crate::ring::generic_tests::test_ring_axioms(&algebra, elements.into_iter());
    }

    #[test]
    fn test_graded_commutativity_random() {
        let algebra = FiniteGCAlgebra::new(StaticRing::<i64>::RING, 6, &["x", "y", "z"], &[1, 2, 3]);
        let basis = algebra.basis_indices();
        let mut rng = oorandom::Rand64::new(1);
        for _ in 0..100 {
            let u = &basis[rng.rand_range(0..basis.len() as u64) as usize];
            let v = &basis[rng.rand_range(0..basis.len() as u64) as usize];
            let lhs = algebra.mul(algebra.monomial(u.clone()), algebra.monomial(v.clone()));
            let rhs = algebra.mul(algebra.monomial(v.clone()), algebra.monomial(u.clone()));
            let du = algebra.get_ring().degree_on_basis(u);
            let dv = algebra.get_ring().degree_on_basis(v);
            if du * dv % 2 == 1 {
                assert_el_eq!(algebra, lhs, algebra.negate(rhs));
            } else {
                assert_el_eq!(algebra, lhs, rhs);
            }
        }
    }

    #[test]
    fn test_random_elements_associative_distributive() {
        let algebra = FiniteGCAlgebra::new(StaticRing::<i64>::RING, 6, &["x", "y", "z"], &[1, 2, 3]);
        let basis = algebra.basis_indices();
        let mut rng = oorandom::Rand64::new(2);
        let random_element = |rng: &mut oorandom::Rand64| algebra.from_terms((0..3).map(|_| (
            rng.rand_range(0..7) as i64 - 3,
            basis[rng.rand_range(0..basis.len() as u64) as usize].clone()
        )));
        for _ in 0..50 {
            let a = random_element(&mut rng);
            let b = random_element(&mut rng);
            let c = random_element(&mut rng);
            assert_el_eq!(algebra,
                algebra.mul_ref(&a, &algebra.mul_ref(&b, &c)),
                algebra.mul_ref(&algebra.mul_ref(&a, &b), &c)
            );
            assert_el_eq!(algebra,
                algebra.mul_ref(&a, &algebra.add_ref(&b, &c)),
                algebra.add_ref(&algebra.mul_ref(&a, &b), &algebra.mul_ref(&a, &c))
            );
        }
    }

    #[test]
    fn test_monomial_serialization() {
        let m = Monomial::new([1u16, 0, 2]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(m, serde_json::from_str::<Monomial>(&json).unwrap());
        assert_eq!(m, serde_json::from_str::<Monomial>("[1,0,2]").unwrap());
    }
}
