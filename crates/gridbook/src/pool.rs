//! Per-sheet fan-out

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Run `task` over every item in parallel, returning results in item order
///
/// `None` uses rayon's global pool. `Some(n)` builds a dedicated pool of `n`
/// threads; if that fails the items are processed serially on the caller's
/// thread.
///
/// The first `Err` stops new items from being started. Items already running
/// finish, and when several fail any one of their errors may be returned.
pub(crate) fn fan_out<T, R, E, F>(
    items: &[T],
    workers: Option<usize>,
    task: F,
) -> Result<Vec<R>, E>
where
    T: Sync,
    R: Send,
    E: Send,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
{
    let Some(workers) = workers else {
        return items.par_iter().map(&task).collect();
    };

    match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| items.par_iter().map(&task).collect()),
        Err(e) => {
            log::warn!(
                "failed to initialize thread pool (workers={}): {}; falling back to serial",
                workers,
                e
            );
            items.iter().map(task).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_results_keep_item_order() {
        let items: Vec<u32> = (0..64).collect();
        let doubled = fan_out(&items, None, |n| Ok::<_, ()>(n * 2)).unwrap();
        assert_eq!(doubled, items.iter().map(|n| n * 2).collect::<Vec<_>>());

        let doubled = fan_out(&items, Some(3), |n| Ok::<_, ()>(n * 2)).unwrap();
        assert_eq!(doubled[63], 126);
    }

    #[test]
    fn test_first_error_stops_remaining_items() {
        let items: Vec<u32> = (0..4096).collect();
        let started = AtomicUsize::new(0);

        let result = fan_out(&items, Some(1), |n| {
            started.fetch_add(1, Ordering::SeqCst);
            if *n == 0 {
                Err(format!("item {} failed", n))
            } else {
                Ok(*n)
            }
        });

        assert_eq!(result, Err("item 0 failed".to_string()));
        assert!(started.load(Ordering::SeqCst) < items.len());
    }

    #[test]
    fn test_any_error_is_reported() {
        let items: Vec<u32> = (0..64).collect();
        let result = fan_out(&items, None, |n| if n % 7 == 3 { Err(*n) } else { Ok(()) });
        let failed = result.unwrap_err();
        assert_eq!(failed % 7, 3);
    }
}
