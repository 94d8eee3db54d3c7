use crate::{helpers::row, memory::*, KMeansError, MwcRng, Result};
use rand::prelude::*;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type RoundDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize);
pub(crate) type RandomGeneratorFactoryFn = Box<dyn Fn() -> Box<dyn RngCore>>;

/// Default upper bound for the amount of assignment/recomputation rounds.
pub const DEFAULT_MAX_ROUNDS: usize = 1000;

/// This is a structure holding various configuration options for a k-means calculation, such as
/// the amount of worker threads, the random number generator used for seeding, or a couple of callbacks
/// that can be set to get status information from a running calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the seeding phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the seeding
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each round
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the round
    /// - **round**: Number of the finished round (starting at 1)
    pub(crate) round_done: RoundDoneCallbackFn<'a, T>,
    /// Creates the random number generator used for the seeding. Every calculation gets a fresh one,
    /// so repeated runs with the same configuration produce the same result.
    pub(crate) rnd: RandomGeneratorFactoryFn,
    /// Amount of workers used for each phase
    pub(crate) thread_cnt: usize,
    /// Maximum amount of rounds, before the calculation is aborted as not converged
    pub(crate) max_rounds: usize
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            round_done: &|_,_| {},
            rnd: Box::new(|| Box::new(MwcRng::default()) as Box<dyn RngCore>),
            thread_cnt: rayon::current_num_threads(),
            max_rounds: DEFAULT_MAX_ROUNDS
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.thread_cnt == 0 {
            return Err(KMeansError::InvalidConfig("thread_cnt must be at least 1".into()));
        }
        if self.max_rounds == 0 {
            return Err(KMeansError::InvalidConfig("max_rounds must be at least 1".into()));
        }
        Ok(())
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("thread_cnt", &self.thread_cnt)
            .field("max_rounds", &self.max_rounds)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid seeding, before the first round starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each round of a running calculation.
    pub fn round_done(mut self, round_done: RoundDoneCallbackFn<'a, T>) -> Self {
        self.config.round_done = round_done; self
    }
    /// Set the random number generator that should be used for seeding the centroids.
    /// Each calculation starts from a clone of **rnd** in the state it was passed in, so a seeded generator
    /// gives deterministically repeatable results, also when the configuration is reused.
    /// ## Default
    /// [`MwcRng::default()`]
    pub fn random_generator<R: RngCore + Clone + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(move || Box::new(rnd.clone()) as Box<dyn RngCore>); self
    }
    /// Shortcut for using a [`MwcRng`] seeded with **seed** as random number generator.
    pub fn seed(self, seed: u32) -> Self {
        self.random_generator(MwcRng::new(seed))
    }
    /// Set the amount of worker threads used for each phase of a round.
    /// The result does not depend on this value, only the runtime does.
    /// ## Default
    /// The amount of threads in rayon's global pool (usually the amount of logical cpus).
    pub fn thread_cnt(mut self, thread_cnt: usize) -> Self {
        self.config.thread_cnt = thread_cnt; self
    }
    /// Set the maximum amount of rounds. When it is reached before the calculation settled, the result
    /// is marked as [`Termination::RoundLimit`].
    /// ## Default
    /// [`DEFAULT_MAX_ROUNDS`]
    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = max_rounds; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// Reason why a calculation stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Calculation is still in progress (only observable from within callbacks)
    Running,
    /// Every sample is within `min_distance` of its centroid
    WithinDistance,
    /// The last round did not recompute any centroid
    Unchanged,
    /// The configured maximum amount of rounds was reached, while samples were still too far away
    /// from their centroids and centroids were still moving
    RoundLimit
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable, and therefore allowing
/// it to be used in parallel, without having to duplicate the input-data.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid (filled in when the calculation terminates)
/// - **assignments**: Vector mapping each sample to its cluster
/// - **rounds**: Amount of rounds that were executed
/// - **termination**: Why the calculation stopped
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub rounds: usize,
    pub termination: Termination,

    pub(crate) sample_dims: usize
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            centroids: vec![T::zero();sample_dims * k],
            centroid_frequency: vec![0usize;k],
            assignments: vec![0usize;sample_cnt],
            rounds: 0,
            termination: Termination::Running,
            sample_dims
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.iter_mut().skip(self.sample_dims * idx).take(self.sample_dims)
                .zip(src)
                .for_each(|(c,s)| *c = s);
    }

    /// Coordinates of the centroid of cluster **idx**.
    pub fn centroid(&self, idx: usize) -> &[T] {
        row(&self.centroids, self.sample_dims, idx)
    }

    /// `false` only if the calculation was cut off by the round limit.
    pub fn converged(&self) -> bool {
        matches!(self.termination, Termination::WithinDistance | Termination::Unchanged)
    }

    /// Indices of the samples in each cluster, in ascending order.
    pub fn partitions(&self) -> Vec<Vec<usize>> {
        let mut partitions = vec![Vec::new(); self.k];
        self.assignments.iter().cloned().enumerate()
            .for_each(|(sample_id, centroid_id)| partitions[centroid_id].push(sample_id));
        partitions
    }
}




/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on. The primitive type
/// of the passed samples array will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure.
pub struct KMeans<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    ///
    /// ## Errors
    /// [`KMeansError::InvalidConfig`] if **sample_cnt** or **sample_dims** is 0,
    /// [`KMeansError::InvalidData`] if **samples** does not contain exactly `sample_cnt * sample_dims` values,
    /// or contains a value that is NaN or infinite.
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 {
            return Err(KMeansError::InvalidConfig("sample_cnt must be at least 1".into()));
        }
        if sample_dims == 0 {
            return Err(KMeansError::InvalidConfig("sample_dims must be at least 1".into()));
        }
        if Some(samples.len()) != sample_cnt.checked_mul(sample_dims) {
            return Err(KMeansError::InvalidData(format!(
                "expected {} x {} values, got {}", sample_cnt, sample_dims, samples.len())));
        }
        if let Some(pos) = samples.iter().position(|v| !v.is_finite()) {
            return Err(KMeansError::InvalidData(format!(
                "sample {} contains the non-finite value {}", pos / sample_dims, samples[pos])));
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    #[inline(always)] pub(crate) fn sample(&self, idx: usize) -> &[T] {
        row(&self.samples, self.sample_dims, idx)
    }

    /// Parallel k-means clustering.
    ///
    /// Centroids are seeded from randomly drawn samples, then rounds of (parallel) assignment and
    /// (parallel) centroid recomputation run until either every sample lies within **min_distance**
    /// of its centroid, a round does not move any centroid, or the configured round limit is hit.
    /// Only clusters that gained samples during a round get their centroid recomputed.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for (`1 <= k <= sample_cnt`)
    /// - **min_distance**: Distance threshold; samples farther away from their centroid keep the calculation going
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Example
    /// ```rust
    /// use kmeans_para::*;
    ///
    /// let samples = vec![0.0f32, 1.0, 10.0, 11.0];
    /// let kmean = KMeans::new(samples, 4, 1).unwrap();
    /// let conf = KMeansConfig::build().seed(1).thread_cnt(2).build();
    /// let result = kmean.kmeans_para(2, 0.5, &conf).unwrap();
    ///
    /// assert_eq!(result.assignments[0], result.assignments[1]);
    /// assert_eq!(result.assignments[2], result.assignments[3]);
    /// assert_ne!(result.assignments[0], result.assignments[2]);
    /// ```
    pub fn kmeans_para<'a>(&self, k: usize, min_distance: T, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>> {
        crate::controller::calculate(self, k, min_distance, config)
    }
}
