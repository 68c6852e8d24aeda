//!
//! A library for computer algebra, centered around finitely generated
//! graded-commutative algebras that are truncated at a maximal total degree.
//! 
//! The main type is [`crate::rings::graded::FiniteGCAlgebra`], the algebra
//! `R<x1, ..., xn>` with generators of prescribed positive degrees, in which
//! every product whose total degree exceeds the configured maximum collapses
//! to zero. Generators of odd degree anticommute, generators of even degree
//! are central.
//! 
//! # Example
//! ```
//! use graded_algebra::ring::*;
//! use graded_algebra::primitive_int::StaticRing;
//! use graded_algebra::rings::graded::FiniteGCAlgebra;
//! 
//! let algebra = FiniteGCAlgebra::new(StaticRing::<i64>::RING, 10, &["p1", "p2", "e"], &[4, 8, 2]);
//! let gens = algebra.gens();
//! let (p1, e) = (&gens[0], &gens[2]);
//! // degree 4 + 2 = 6 <= 10
//! assert_eq!("p1*e", format!("{}", algebra.format(&algebra.mul_ref(p1, e))));
//! // degree 3 * 4 = 12 > 10, so the cube is truncated away
//! assert!(algebra.is_zero(&algebra.pow(p1, 3)));
//! ```
//! 

#[macro_use]
pub mod ring;
pub mod lazy;
pub mod iters;
pub mod algorithms;
pub mod primitive_int;
pub mod rings;
