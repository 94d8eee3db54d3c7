//! The three phases of a calculation: seeding once, then rounds of populate + centroid recomputation.
//!
//! Populate and recomputation run on a dedicated worker pool. Each of them splits its output buffer into
//! one disjoint sub-slice per worker (see [`crate::helpers::partition_ranges`]), so the only state shared
//! for writing are the set-true-only flags in [`crate::memory::RoundFlags`].

pub(crate) mod seeding;
pub(crate) mod populate;
pub(crate) mod centroids;

#[cfg(test)]
pub(crate) fn test_pool(thread_cnt: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new().num_threads(thread_cnt).build().unwrap()
}
