use crate::{memory::*, phases::{centroids, populate, seeding}, KMeans, KMeansConfig, KMeansError, KMeansState, Result, Termination};
use log::{debug, info, warn};

fn validate<T: Primitive>(data: &KMeans<T>, k: usize, min_distance: T) -> Result<()> {
    if k == 0 {
        return Err(KMeansError::InvalidConfig("k must be at least 1".into()));
    }
    if k > data.sample_cnt {
        return Err(KMeansError::InvalidConfig(format!(
            "k ({}) must not exceed the amount of samples ({})", k, data.sample_cnt)));
    }
    if min_distance.is_nan() || min_distance < T::zero() {
        return Err(KMeansError::InvalidConfig(format!("min_distance must be >= 0, got {}", min_distance)));
    }
    Ok(())
}

pub(crate) fn update_cluster_frequencies(assignments: &[usize], centroid_frequency: &mut [usize]) {
    centroid_frequency.iter_mut().for_each(|v| *v = 0);
    assignments.iter().cloned().for_each(|centroid_id| centroid_frequency[centroid_id] += 1);
}

pub(crate) fn calculate<'a, T: Primitive>(data: &KMeans<T>, k: usize, min_distance: T, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>> {
    validate(data, k, min_distance)?;
    config.validate()?;

    let thread_cnt = config.thread_cnt;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_cnt)
        .thread_name(|idx| format!("kmeans-worker-{}", idx))
        .build()?;

    let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
    let mut flags = RoundFlags::new(k);

    // Seed clusters and notify subscriber
    let mut rnd = (config.rnd)();
    seeding::calculate(data, &mut state, rnd.as_mut());
    debug!("Seeded {} centroids from {} samples ({} dims), using {} workers", k, data.sample_cnt, data.sample_dims, thread_cnt);
    (config.init_done)(&state);

    state.termination = loop {
        state.rounds += 1;
        populate::update(data, &mut state, &mut flags, min_distance, &pool, thread_cnt);
        let dirty_cnt = flags.dirty_cnt();
        centroids::update(data, &mut state, &mut flags, &pool, thread_cnt);
        debug!("Round {} - dirty clusters: {} | too far: {} | changed: {}",
            state.rounds, dirty_cnt, flags.too_far(), flags.has_changed());

        // Notify subscriber about finished round
        (config.round_done)(&state, state.rounds);
        if !flags.too_far() {
            break Termination::WithinDistance;
        }
        if !flags.has_changed() {
            break Termination::Unchanged;
        }
        if state.rounds >= config.max_rounds {
            warn!("No convergence after {} rounds, aborting", state.rounds);
            break Termination::RoundLimit;
        }
    };

    update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
    info!("k-means finished after {} rounds ({:?})", state.rounds, state.termination);
    Ok(state)
}




#[cfg(test)]
mod tests {
    use super::*;
    use crate::{helpers::testing::assert_same_grouping, MwcRng};
    use rand::prelude::*;
    use std::cell::Cell;

    fn random_samples(seed: u32, sample_cnt: usize, sample_dims: usize) -> Vec<f32> {
        let mut rnd = MwcRng::new(seed);
        (0..sample_cnt * sample_dims).map(|_| (rnd.next_u32() & 0xffff) as f32).collect()
    }

    #[test]
    fn two_separated_groups() {
        let kmean = KMeans::new(vec![0.0f32, 1.0, 10.0, 11.0], 4, 1).unwrap();
        let conf = KMeansConfig::build().seed(1).thread_cnt(2).build();
        let res = kmean.kmeans_para(2, 0.5, &conf).unwrap();

        assert_same_grouping(&[0, 0, 1, 1], &res.assignments);
        assert_eq!(res.assignments, vec![0, 0, 1, 1]);
        assert_eq!(res.centroids, vec![0.5, 10.5]);
        assert_eq!(res.centroid_frequency, vec![2, 2]);
        assert_eq!(res.rounds, 2);
        assert_eq!(res.termination, Termination::WithinDistance);
        assert!(res.converged());
        assert_eq!(res.partitions(), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn one_cluster_per_sample() {
        let samples = vec![0.0f64, 0.0, 5.0, 1.0, -3.0, 2.0, 7.0, 7.0, 1.0, -4.0, 2.5, 2.5];
        let kmean = KMeans::new(samples, 6, 2).unwrap();
        for seed in 0..20 {
            let conf = KMeansConfig::build().seed(seed).thread_cnt(3).build();
            let res = kmean.kmeans_para(6, 0.0, &conf).unwrap();

            let mut sorted = res.assignments.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..6).collect::<Vec<_>>());
            assert_eq!(res.rounds, 1);
            assert_eq!(res.termination, Termination::WithinDistance);
            for (sample_id, &centroid_id) in res.assignments.iter().enumerate() {
                assert_eq!(res.centroid(centroid_id), kmean.sample(sample_id));
            }
        }
    }

    #[test]
    fn stops_when_nothing_changes() {
        let kmean = KMeans::new(vec![0.0f64, 10.0], 2, 1).unwrap();
        let conf = KMeansConfig::build().seed(3).thread_cnt(2).build();
        let res = kmean.kmeans_para(1, 1.0, &conf).unwrap();

        assert_eq!(res.assignments, vec![0, 0]);
        assert_eq!(res.centroids, vec![5.0]);
        assert_eq!(res.rounds, 2);
        assert_eq!(res.termination, Termination::Unchanged);
        assert!(res.converged());
    }

    #[test]
    fn round_limit() {
        let kmean = KMeans::new(vec![0.0f32, 1.0, 10.0, 11.0], 4, 1).unwrap();
        let conf = KMeansConfig::build().seed(1).thread_cnt(2).max_rounds(1).build();
        let res = kmean.kmeans_para(2, 0.5, &conf).unwrap();

        assert_eq!(res.rounds, 1);
        assert_eq!(res.termination, Termination::RoundLimit);
        assert!(!res.converged());
        assert!(res.assignments.iter().all(|&a| a < 2));
    }

    #[test]
    fn rejects_invalid_parameters() {
        let kmean = KMeans::new(vec![0.0f64, 1.0, 2.0], 3, 1).unwrap();
        let conf = KMeansConfig::default();
        assert!(matches!(kmean.kmeans_para(0, 0.0, &conf), Err(KMeansError::InvalidConfig(_))));
        assert!(matches!(kmean.kmeans_para(4, 0.0, &conf), Err(KMeansError::InvalidConfig(_))));
        assert!(matches!(kmean.kmeans_para(2, -1.0, &conf), Err(KMeansError::InvalidConfig(_))));
        assert!(matches!(kmean.kmeans_para(2, f64::NAN, &conf), Err(KMeansError::InvalidConfig(_))));

        let conf = KMeansConfig::build().thread_cnt(0).build();
        assert!(matches!(kmean.kmeans_para(2, 0.0, &conf), Err(KMeansError::InvalidConfig(_))));
        let conf = KMeansConfig::build().max_rounds(0).build();
        assert!(matches!(kmean.kmeans_para(2, 0.0, &conf), Err(KMeansError::InvalidConfig(_))));
    }

    #[test]
    fn deterministic_and_thread_cnt_invariant() {
        let (sample_cnt, sample_dims, k) = (2000, 4, 16);
        let kmean = KMeans::new(random_samples(7, sample_cnt, sample_dims), sample_cnt, sample_dims).unwrap();

        let run = |thread_cnt: usize| {
            let conf = KMeansConfig::build().seed(42).thread_cnt(thread_cnt).max_rounds(500).build();
            kmean.kmeans_para(k, 1000.0, &conf).unwrap()
        };
        let reference = run(1);
        assert!(reference.rounds <= 500);
        assert!(reference.assignments.iter().all(|&a| a < k));
        assert_eq!(reference.centroid_frequency.iter().sum::<usize>(), sample_cnt);

        for thread_cnt in [1, 2, 3, 4, 8] {
            let res = run(thread_cnt);
            assert_eq!(res.assignments, reference.assignments);
            assert_eq!(res.centroids, reference.centroids);
            assert_eq!(res.rounds, reference.rounds);
            assert_eq!(res.termination, reference.termination);
        }
    }

    #[test]
    fn terminates_within_round_limit() {
        for seed in 0..10 {
            let (sample_cnt, sample_dims) = (300, 2);
            let kmean = KMeans::new(random_samples(seed, sample_cnt, sample_dims), sample_cnt, sample_dims).unwrap();
            let conf = KMeansConfig::build().seed(seed).thread_cnt(4).max_rounds(25).build();
            let res = kmean.kmeans_para(1 + seed as usize, 0.0, &conf).unwrap();

            assert!(res.rounds >= 1 && res.rounds <= 25);
            assert!(res.assignments.iter().all(|&a| a < res.k));
            assert_eq!(res.centroids.len(), res.k * sample_dims);
        }
    }

    #[test]
    fn callbacks_are_called() {
        let init_cnt = Cell::new(0usize);
        let last_round = Cell::new(0usize);
        let init_done = |_: &KMeansState<f32>| init_cnt.set(init_cnt.get() + 1);
        let round_done = |s: &KMeansState<f32>, round: usize| {
            assert_eq!(s.rounds, round);
            assert_eq!(s.termination, Termination::Running);
            last_round.set(round);
        };

        let kmean = KMeans::new(vec![0.0f32, 1.0, 10.0, 11.0], 4, 1).unwrap();
        let conf = KMeansConfig::build()
            .seed(1)
            .init_done(&init_done)
            .round_done(&round_done)
            .build();
        let res = kmean.kmeans_para(2, 0.5, &conf).unwrap();

        assert_eq!(init_cnt.get(), 1);
        assert_eq!(last_round.get(), res.rounds);
    }

    #[test]
    fn custom_random_generator() {
        let samples = random_samples(1, 100, 2);
        let kmean = KMeans::new(samples, 100, 2).unwrap();
        let conf_a = KMeansConfig::build().random_generator(StdRng::seed_from_u64(5)).build();
        let conf_b = KMeansConfig::build().random_generator(StdRng::seed_from_u64(5)).build();
        let res_a = kmean.kmeans_para(5, 0.0, &conf_a).unwrap();
        let res_b = kmean.kmeans_para(5, 0.0, &conf_b).unwrap();
        assert_eq!(res_a.assignments, res_b.assignments);

        let res_again = kmean.kmeans_para(5, 0.0, &conf_a).unwrap();
        assert_eq!(res_again.assignments, res_a.assignments);
    }

    #[test]
    fn reused_config_repeats_result() {
        let (sample_cnt, sample_dims, k) = (200, 2, 8);
        let kmean = KMeans::new(random_samples(3, sample_cnt, sample_dims), sample_cnt, sample_dims).unwrap();
        let seeds = std::cell::RefCell::new(Vec::new());
        let init_done = |s: &KMeansState<f32>| seeds.borrow_mut().push(s.centroids.clone());
        let conf = KMeansConfig::build().seed(42).thread_cnt(2).init_done(&init_done).build();

        let first = kmean.kmeans_para(k, 1000.0, &conf).unwrap();
        let second = kmean.kmeans_para(k, 1000.0, &conf).unwrap();

        let seeds = seeds.borrow();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0], seeds[1]);
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.centroids, second.centroids);
        assert_eq!(first.rounds, second.rounds);
        assert_eq!(first.termination, second.termination);

        let fresh = KMeansConfig::build().seed(42).thread_cnt(2).build();
        assert_eq!(kmean.kmeans_para(k, 1000.0, &fresh).unwrap().assignments, first.assignments);
    }

    #[test]
    fn frequencies() {
        let mut freq = vec![9usize; 3];
        update_cluster_frequencies(&[2, 0, 2, 2], &mut freq);
        assert_eq!(freq, vec![1, 0, 3]);
    }
}
