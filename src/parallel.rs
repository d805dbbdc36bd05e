// src/parallel.rs
//! Ordered fan-out over scoped worker threads
//!
//! Every open/seal is independent and CPU-bound (one KDF each), so bulk
//! operations split the input into contiguous chunks, one per worker, and
//! stitch the results back together in input order.

use std::num::NonZeroUsize;
use std::thread;

/// `0` means "one per available core"
pub fn resolve_workers(configured: usize) -> usize {
    if configured > 0 {
        return configured;
    }
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

pub fn map_ordered<T, R, F>(items: &[T], workers: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let workers = workers.clamp(1, items.len().max(1));
    if workers == 1 {
        return items.iter().map(&f).collect();
    }

    let chunk = items.len().div_ceil(workers);
    thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = items
            .chunks(chunk)
            .map(|part| s.spawn(move || part.iter().map(f).collect::<Vec<R>>()))
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
