use rand_core::{impls, Error, RngCore, SeedableRng};

const FALLBACK_W: u32 = 521288629;
const FALLBACK_Z: u32 = 362436069;

/// Small multiply-with-carry generator (two 32 bit lanes), used for the centroid seeding.
///
/// It exists for reproducibility, not quality: the same seed always yields the same sequence, on every
/// platform. Do not use it for anything security related.
///
/// ## Example
/// ```rust
/// use kmeans_para::MwcRng;
/// use rand::RngCore;
///
/// let mut a = MwcRng::new(42);
/// let mut b = MwcRng::new(42);
/// assert_eq!(a.next_u32(), b.next_u32());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MwcRng {
    w: u32,
    z: u32
}
impl MwcRng {
    /// Create a generator from **seed**. Seeds mapping one of the lanes to 0 fall back to a fixed
    /// constant for that lane, because an all-zero lane would stay zero forever.
    pub fn new(seed: u32) -> Self {
        let w = seed.wrapping_mul(104623);
        let z = seed.wrapping_mul(48947);
        Self {
            w: if w != 0 { w } else { FALLBACK_W },
            z: if z != 0 { z } else { FALLBACK_Z }
        }
    }
}
impl Default for MwcRng {
    fn default() -> Self {
        Self { w: FALLBACK_W, z: FALLBACK_Z }
    }
}

impl RngCore for MwcRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.z = 36969u32.wrapping_mul(self.z & 65535).wrapping_add(self.z >> 16);
        self.w = 18000u32.wrapping_mul(self.w & 65535).wrapping_add(self.w >> 16);
        (self.z << 16).wrapping_add(self.w)
    }
    fn next_u64(&mut self) -> u64 { impls::next_u64_via_u32(self) }
    fn fill_bytes(&mut self, dest: &mut [u8]) { impls::fill_bytes_via_next(self, dest) }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MwcRng {
    type Seed = [u8; 4];
    fn from_seed(seed: Self::Seed) -> Self { Self::new(u32::from_le_bytes(seed)) }
    fn seed_from_u64(state: u64) -> Self { Self::new(state as u32) }
}

/// Draw an index in `0..n` using plain modulo reduction.
///
/// Slightly biased for large **n**, but keeps draws stable for a given seed, which is all the
/// seeding needs.
#[inline(always)]
pub(crate) fn draw_index(rnd: &mut dyn RngCore, n: usize) -> usize {
    debug_assert!(n > 0);
    (rnd.next_u32() as usize) % n
}
