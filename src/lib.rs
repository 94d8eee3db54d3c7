//! # kmeans-para - API documentation
//!
//! kmeans-para is a small rust library for parallel k-means clustering.
//!
//! ## Design target
//! The calculation is split into rounds, each consisting of two phases that run on a fixed-size pool of
//! worker threads:
//! - **Populate**: every sample moves to its closest centroid. Samples are split into one contiguous range per
//!   worker.
//! - **Centroid recomputation**: every cluster that gained samples during populate gets its centroid recomputed
//!   as the mean of its samples. Clusters are split into one contiguous range per worker.
//!
//! Each worker exclusively owns the slice of the output it writes, so there is no locking on the hot path.
//! The only state written by multiple workers are a couple of flags, which are only ever set to `true`.
//! Rounds are repeated until every sample lies within `min_distance` of its centroid, or a round did not
//! recompute any centroid, or the configured round limit is reached.
//!
//! Results are fully deterministic: for the same samples, parameters and seed, the result is identical
//! regardless of the amount of worker threads.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_para::*;
//! use rand::RngCore;
//!
//! fn main() -> Result<()> {
//!     let (sample_cnt, sample_dims, k, min_distance) = (2000, 8, 4, 100.0);
//!
//!     // Generate some random data
//!     let mut rnd = MwcRng::new(1337);
//!     let mut samples = vec![0.0f32;sample_cnt * sample_dims];
//!     samples.iter_mut().for_each(|v| *v = (rnd.next_u32() & 0xffff) as f32);
//!
//!     let conf = KMeansConfig::build()
//!         .seed(1337)
//!         .thread_cnt(4)
//!         .round_done(&|s, nr| println!("Round {} finished, {} clusters", nr, s.k))
//!         .build();
//!
//!     let kmean = KMeans::new(samples, sample_cnt, sample_dims)?;
//!     let result = kmean.kmeans_para(k, min_distance, &conf)?;
//!
//!     println!("Centroids: {:?}", result.centroids);
//!     println!("Cluster-Assignments: {:?}", result.assignments);
//!     println!("Stopped after {} rounds: {:?}", result.rounds, result.termination);
//!     Ok(())
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct. This struct is generic over the underlying primitive
//! type, that should be used for the calculations. To use KMeans, an instance of this struct is created, taking
//! over the sample data into its ownership.
//!
//! Calling [`KMeans::kmeans_para`] does not mutate it, so multiple runs can be done on the same samples.
//! Internally, a new instance of [`KMeansState`] is used to store the state (and finally the result) of a
//! calculation. Options such as the amount of worker threads, the round limit or the random number generator
//! used for seeding are passed in a [`KMeansConfig`].
//!
//! The crate reports progress through the [`log`] facade; install any logger to see it.

#[macro_use] mod helpers;
mod memory;
mod error;
mod rng;
mod distance;
mod api;
mod phases;
mod controller;

pub use api::{KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, Termination, DEFAULT_MAX_ROUNDS};
pub use distance::euclidean_distance;
pub use error::{KMeansError, Result};
pub use memory::Primitive;
pub use rng::MwcRng;
