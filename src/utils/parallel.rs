#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Below this many items the work is run on the calling thread.
const PARALLEL_THRESHOLD: usize = 16;

/// Maps `f` over `collection`, in parallel when the `parallel` feature is
/// enabled and the collection is large enough. Output order matches input
/// order.
#[inline]
pub fn map<T, R, F>(collection: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        if collection.len() > PARALLEL_THRESHOLD {
            return collection.par_iter().map(f).collect();
        }
    }
    collection.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_order() {
        let input: Vec<usize> = (0..100).collect();
        let out = map(&input, |x| x * 2);
        assert_eq!(out, (0..100).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_map_small_input() {
        assert_eq!(map(&[1, 2, 3], |x| x + 1), vec![2, 3, 4]);
        assert!(map(&[] as &[i32], |x| *x).is_empty());
    }
}
