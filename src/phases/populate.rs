use crate::{distance::euclidean_distance, helpers::partition_ranges, memory::*, KMeans, KMeansState};
use crate::helpers::row;
use rayon::ThreadPool;

/// Move every sample to its closest centroid.
///
/// The samples are split into **thread_cnt** contiguous ranges, each handled by one task on **pool**. A task
/// exclusively owns the assignments of its range. Clusters that receive a sample are marked dirty, and
/// `too_far` is raised if any sample stays farther than **min_distance** away from its centroid.
pub(crate) fn update<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>, flags: &mut RoundFlags,
                                   min_distance: T, pool: &ThreadPool, thread_cnt: usize) {
    *flags.too_far.get_mut() = false;

    let flags = &*flags;
    let (centroids, k) = (&state.centroids, state.k);
    let mut remaining = state.assignments.as_mut_slice();
    pool.scope(|s| {
        for range in partition_ranges(data.sample_cnt, thread_cnt) {
            let (chunk, rest) = std::mem::take(&mut remaining).split_at_mut(range.len());
            remaining = rest;
            s.spawn(move |_| populate_range(data, centroids, k, range.start, chunk, flags, min_distance));
        }
    });
}

fn populate_range<T: Primitive>(data: &KMeans<T>, centroids: &[T], k: usize, first_sample: usize,
                                assignments: &mut [usize], flags: &RoundFlags, min_distance: T) {
    let dims = data.sample_dims;
    for (offset, assignment) in assignments.iter_mut().enumerate() {
        let sample = data.sample(first_sample + offset);
        let mut best_dist = euclidean_distance(row(centroids, dims, *assignment), sample);
        for centroid_id in 0..k {
            if centroid_id == *assignment { continue; }
            let dist = euclidean_distance(row(centroids, dims, centroid_id), sample);
            // strictly closer only: ties keep the current cluster
            if dist < best_dist {
                *assignment = centroid_id;
                best_dist = dist;
                flags.mark_dirty(centroid_id);
            }
        }
        if best_dist > min_distance {
            flags.set_too_far();
        }
    }
}
