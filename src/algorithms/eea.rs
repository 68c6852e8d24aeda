///
/// Computes the greatest common divisor of `a` and `b` by the euclidean
/// algorithm, with the convention `gcd(0, 0) == 0`.
/// 
#[stability::unstable(feature = "enable")]
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    return a;
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_gcd() {
        assert_eq!(2, gcd(4, 6));
        assert_eq!(6, gcd(6, 0));
        assert_eq!(6, gcd(0, 6));
        assert_eq!(0, gcd(0, 0));
        assert_eq!(1, gcd(17, 25));
        assert_eq!(2, gcd(4, 8 * 3 + 2));
    }
}
