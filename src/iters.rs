///
/// Computes all vectors of nonnegative integers whose weighted sum w.r.t.
/// the given weight tuple is exactly `total`, i.e. all `v` with
/// `sum_i v[i] * weights[i] == total`.
/// 
/// The result is in ascending lexicographic order and contains each vector
/// exactly once. All weights must be positive.
/// 
/// # Example
/// ```
/// # use graded_algebra::iters::weighted_integer_vectors;
/// assert_eq!(
///     vec![
///         vec![0, 2].into_boxed_slice(),
///         vec![2, 1].into_boxed_slice(),
///         vec![4, 0].into_boxed_slice()
///     ],
///     weighted_integer_vectors(4, &[1, 2])
/// );
/// ```
/// 
pub fn weighted_integer_vectors(total: u32, weights: &[u32]) -> Vec<Box<[u16]>> {
    assert!(weights.iter().all(|w| *w > 0), "all weights must be positive");
    let mut result = Vec::new();
    let mut current = vec![0u16; weights.len()];
    fill_remaining(total, weights, 0, &mut current, &mut result);
    return result;
}

fn fill_remaining(remaining: u32, weights: &[u32], i: usize, current: &mut Vec<u16>, out: &mut Vec<Box<[u16]>>) {
    if i == weights.len() {
        if remaining == 0 {
            out.push(current.clone().into_boxed_slice());
        }
        return;
    }
    for e in 0..=(remaining / weights[i]) {
        current[i] = u16::try_from(e).unwrap();
        fill_remaining(remaining - e * weights[i], weights, i + 1, current, out);
    }
    current[i] = 0;
}
