///
/// Contains the euclidean algorithm, i.e. [`eea::gcd()`].
/// 
pub mod eea;
