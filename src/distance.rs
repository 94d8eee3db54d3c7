use crate::Primitive;

/// Euclidean distance between the two vectors **a** and **b**.
///
/// Both vectors have to have the same amount of dimensions; this is only checked in debug builds.
#[inline(always)]
pub fn euclidean_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter())
        .map(|(&av, &bv)| av - bv)      // <a> - <b>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum::<T>()                     // sum(<vec_components>^2)
        .sqrt()
}
