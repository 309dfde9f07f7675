//! Display-order shuffle applied to each batch before rendering.

use rand::Rng;

/// In-place Fisher–Yates: walk from the last index down, swapping each slot
/// with a uniformly chosen index in `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
