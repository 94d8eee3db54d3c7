use crate::{helpers::partition_ranges, memory::*, KMeans, KMeansState};
use rayon::ThreadPool;

/// Recompute the centroids of all dirty clusters as the mean of their current samples.
///
/// Clusters are split into **thread_cnt** contiguous ranges, each task exclusively owning the centroids of its
/// range while reading the complete (unchanging) assignments. Afterwards, all clusters are clean again.
pub(crate) fn update<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>, flags: &mut RoundFlags,
                                   pool: &ThreadPool, thread_cnt: usize) {
    *flags.has_changed.get_mut() = false;

    {
        let flags = &*flags;
        let (assignments, k, dims) = (&state.assignments, state.k, data.sample_dims);
        let mut remaining = state.centroids.as_mut_slice();
        pool.scope(|s| {
            for range in partition_ranges(k, thread_cnt) {
                let (chunk, rest) = std::mem::take(&mut remaining).split_at_mut(range.len() * dims);
                remaining = rest;
                s.spawn(move |_| recompute_range(data, assignments, range.start, chunk, flags));
            }
        });
    }

    flags.clear_dirty();
}

fn recompute_range<T: Primitive>(data: &KMeans<T>, assignments: &[usize], first_centroid: usize,
                                 centroids: &mut [T], flags: &RoundFlags) {
    let dims = data.sample_dims;
    for (offset, centroid) in centroids.chunks_exact_mut(dims).enumerate() {
        let centroid_id = first_centroid + offset;
        if !flags.is_dirty(centroid_id) { continue; }

        centroid.iter_mut().for_each(|c| *c = T::zero());
        let mut population = 0usize;
        data.samples.chunks_exact(dims)
            .zip(assignments.iter().cloned())
            .filter(|&(_, assignment)| assignment == centroid_id)
            .for_each(|(s, _)| {
                centroid.iter_mut().zip(s.iter()).for_each(|(cv, sv)| *cv += sv);
                population += 1;
            });
        // a single sample already is its own mean, an empty cluster stays at the origin
        if population > 1 {
            if let Some(scale) = T::from(population).map(|p| T::one() / p) {
                centroid.iter_mut().for_each(|cv| *cv = *cv * scale);
            }
        }
        flags.set_has_changed();
    }
}
