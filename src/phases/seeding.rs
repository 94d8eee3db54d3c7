use crate::{rng::draw_index, KMeans, KMeansState, Primitive};
use rand::RngCore;

/// Seed the initial centroids and the initial cluster assignments.
///
/// Each of the **k** centroids is copied from a randomly drawn sample, which is assigned to it. A draw hitting
/// an already used sample moves on to the next unused one (wrapping around), so every centroid starts on a
/// distinct sample. All remaining samples get a random cluster.
pub(crate) fn calculate<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) {
    let (sample_cnt, k) = (data.sample_cnt, state.k);
    debug_assert!(k <= sample_cnt);

    let mut seeded: Vec<Option<usize>> = vec![None; sample_cnt];
    for centroid_id in 0..k {
        let mut sample_id = draw_index(rnd, sample_cnt);
        while seeded[sample_id].is_some() {
            sample_id = (sample_id + 1) % sample_cnt;
        }
        seeded[sample_id] = Some(centroid_id);
        state.set_centroid_from_iter(centroid_id, data.sample(sample_id).iter().cloned());
    }

    for (assignment, seeded) in state.assignments.iter_mut().zip(seeded) {
        *assignment = match seeded {
            Some(centroid_id) => centroid_id,
            None => draw_index(rnd, k)
        };
    }
}
