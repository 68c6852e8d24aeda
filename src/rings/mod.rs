///
/// Contains [`zn_static::Zn`], arithmetic in `Z/nZ` for `n` known at
/// compile time.
/// 
pub mod zn_static;

///
/// Contains [`rational::RationalField`], the field of rational numbers with
/// machine-integer numerator and denominator.
/// 
pub mod rational;

///
/// Contains [`graded::FiniteGCAlgebra`], finitely generated
/// graded-commutative algebras truncated at a maximal total degree.
/// 
pub mod graded;
