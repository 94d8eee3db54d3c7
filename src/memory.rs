use num::{NumCast, Zero, Float};
use std::{
    fmt::{Debug, Display, LowerExp}, iter::Sum, ops::{Add, AddAssign, Sub, SubAssign},
    sync::atomic::{AtomicBool, Ordering}
};
use rand::distributions::uniform::SampleUniform;

pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast + SampleUniform
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}


/// Flags shared between all workers of a round.
///
/// Workers only ever store `true` into these flags while a phase is running, so concurrent
/// stores never conflict. Clearing happens exclusively on the controller, between phases.
#[derive(Debug)]
pub(crate) struct RoundFlags {
    /// One flag per cluster, marking clusters that gained a point since their last recomputation
    pub dirty: Vec<AtomicBool>,
    /// Some point is farther than `min_distance` away from its centroid
    pub too_far: AtomicBool,
    /// Some centroid got recomputed during the last recomputation phase
    pub has_changed: AtomicBool
}
impl RoundFlags {
    /// All clusters start out dirty, so the first recomputation touches every centroid.
    pub fn new(k: usize) -> Self {
        Self {
            dirty: (0..k).map(|_| AtomicBool::new(true)).collect(),
            too_far: AtomicBool::new(false),
            has_changed: AtomicBool::new(false)
        }
    }

    #[inline(always)] pub fn mark_dirty(&self, cluster: usize) {
        self.dirty[cluster].store(true, Ordering::Relaxed);
    }
    #[inline(always)] pub fn is_dirty(&self, cluster: usize) -> bool {
        self.dirty[cluster].load(Ordering::Relaxed)
    }
    pub fn dirty_cnt(&self) -> usize {
        self.dirty.iter().filter(|d| d.load(Ordering::Relaxed)).count()
    }
    pub fn clear_dirty(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d.get_mut() = false);
    }

    #[inline(always)] pub fn set_too_far(&self) { self.too_far.store(true, Ordering::Relaxed); }
    pub fn too_far(&self) -> bool { self.too_far.load(Ordering::Relaxed) }

    #[inline(always)] pub fn set_has_changed(&self) { self.has_changed.store(true, Ordering::Relaxed); }
    pub fn has_changed(&self) -> bool { self.has_changed.load(Ordering::Relaxed) }
}
