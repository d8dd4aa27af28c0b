use rand::Rng;

/// Returns a uniformly shuffled copy of `items` (Fisher-Yates).
/// The input slice is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut result = items.to_vec();
    for i in (1..result.len()).rev() {
        let j = rng.gen_range(0..=i);
        result.swap(i, j);
    }
    result
}
