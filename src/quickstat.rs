/// Reorders `indices` so the element at position `k` is the one that would be
/// there if the slice were sorted by `key`. Everything before `k` has a key
/// `<=` that element and everything after has a key `>=` it.
///
/// Randomized Hoare partitioning: pivots come from `rng`, and both scans stop
/// on keys equal to the pivot so runs of duplicates split evenly.
pub fn quickstat_index<F>(indices: &mut [usize], k: usize, rng: &mut fastrand::Rng, key: F)
where
    F: Fn(usize) -> f64,
{
    assert!(k < indices.len(), "quickstat k={} out of range for {} elements", k, indices.len());
    let mut lo = 0;
    let mut hi = indices.len();
    while lo + 1 < hi {
        let pivot_pos = rng.usize(lo..hi);
        indices.swap(lo, pivot_pos);
        let pivot = key(indices[lo]);

        let mut i = lo + 1;
        let mut j = hi - 1;
        loop {
            while i <= j && key(indices[i]) < pivot {
                i += 1;
            }
            while i <= j && key(indices[j]) > pivot {
                j -= 1;
            }
            if i >= j {
                break;
            }
            indices.swap(i, j);
            i += 1;
            j -= 1;
        }
        indices.swap(lo, j);

        if j < k {
            lo = j + 1;
        } else if j > k {
            hi = j;
        } else {
            return;
        }
    }
}
