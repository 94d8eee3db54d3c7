use std::ops::Range;

/// Range of item indices handled by worker **idx** out of **worker_cnt** workers, when
/// **item_cnt** items are split into contiguous, near-equal chunks.
///
/// Chunk boundaries are `idx * item_cnt / worker_cnt` (truncating), so the last range always ends
/// at **item_cnt**. Ranges may be empty when there are more workers than items.
#[inline(always)]
pub(crate) fn partition_range(item_cnt: usize, worker_cnt: usize, idx: usize) -> Range<usize> {
    debug_assert!(worker_cnt > 0 && idx < worker_cnt);
    (idx * item_cnt / worker_cnt)..((idx + 1) * item_cnt / worker_cnt)
}

/// All ranges of [`partition_range`], in ascending order.
pub(crate) fn partition_ranges(item_cnt: usize, worker_cnt: usize) -> impl Iterator<Item = Range<usize>> {
    (0..worker_cnt).map(move |idx| partition_range(item_cnt, worker_cnt, idx))
}

/// Row **idx** of the row-major buffer **buf**, where each row has **dims** values.
#[inline(always)]
pub(crate) fn row<T>(buf: &[T], dims: usize, idx: usize) -> &[T] {
    &buf[idx * dims..(idx + 1) * dims]
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}
