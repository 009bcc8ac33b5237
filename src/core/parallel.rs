//! Data-parallel loop execution plus the two small synchronisation
//! primitives the renderer needs: a CAS-loop atomic float for splat
//! accumulation and a counting barrier.
//!
//! Work distribution follows the chunk-claiming discipline: workers
//! repeatedly take a contiguous range of iterations from a shared
//! cursor under a mutex, release the lock, and run the range. The
//! calling thread participates as a worker, chunks execute in
//! ascending order within one worker, and nothing orders iterations
//! across workers.

// others
use atomic::{Atomic, Ordering};
// std
use std::sync::{Condvar, Mutex};
// crate
use crate::core::precision::Float;

#[cfg(not(feature = "float_as_double"))]
type FloatBits = u32;
#[cfg(feature = "float_as_double")]
type FloatBits = u64;

/// A float stored as its IEEE-754 bit pattern in an atomic integer.
/// Addition retries through compare-exchange until it lands.
#[derive(Debug)]
pub struct AtomicFloat {
    bits: Atomic<FloatBits>,
}

impl AtomicFloat {
    pub fn new(v: Float) -> Self {
        AtomicFloat {
            bits: Atomic::new(v.to_bits()),
        }
    }
    pub fn load(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::Relaxed))
    }
    pub fn store(&self, v: Float) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }
    pub fn add(&self, v: Float) {
        let mut old_bits: FloatBits = self.bits.load(Ordering::Relaxed);
        loop {
            let new_bits: FloatBits = (Float::from_bits(old_bits) + v).to_bits();
            match self.bits.compare_exchange_weak(
                old_bits,
                new_bits,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(x) => old_bits = x,
            }
        }
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        AtomicFloat::new(0.0 as Float)
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        AtomicFloat {
            bits: Atomic::new(self.bits.load(Ordering::Relaxed)),
        }
    }
}

/// A single-use counting barrier. Each arrival decrements the count;
/// the last arrival wakes everyone.
pub struct Barrier {
    count: Mutex<usize>,
    cv: Condvar,
}

impl Barrier {
    pub fn new(thread_count: usize) -> Self {
        assert!(thread_count > 0);
        Barrier {
            count: Mutex::new(thread_count),
            cv: Condvar::new(),
        }
    }
    pub fn wait(&self) {
        let mut count = self.count.lock().unwrap();
        assert!(*count > 0);
        *count -= 1;
        if *count == 0 {
            self.cv.notify_all();
        } else {
            while *count > 0 {
                count = self.cv.wait(count).unwrap();
            }
        }
    }
}

struct LoopState {
    next_index: u64,
    active_workers: usize,
}

/// Number of worker threads to use when the caller does not specify
/// one.
pub fn num_system_cores() -> usize {
    num_cpus::get()
}

/// Run `body(i)` for i in [0, count), distributing chunks of
/// `chunk_size` consecutive iterations over `n_threads` workers. The
/// calling thread is one of the workers.
pub fn parallel_for_1d<F>(body: F, count: u64, chunk_size: u64, n_threads: usize)
where
    F: Fn(u64) + Send + Sync,
{
    assert!(chunk_size >= 1);
    if count == 0 {
        return;
    }
    // no point spinning up workers for a handful of iterations
    if n_threads <= 1 || count <= chunk_size {
        for i in 0..count {
            body(i);
        }
        return;
    }
    let state: Mutex<LoopState> = Mutex::new(LoopState {
        next_index: 0,
        active_workers: 0,
    });
    let worker = |state: &Mutex<LoopState>| loop {
        let (start, end) = {
            let mut guard = state.lock().unwrap();
            if guard.next_index >= count {
                return;
            }
            let start: u64 = guard.next_index;
            let end: u64 = (start + chunk_size).min(count);
            guard.next_index = end;
            guard.active_workers += 1;
            (start, end)
        };
        for i in start..end {
            body(i);
        }
        let mut guard = state.lock().unwrap();
        guard.active_workers -= 1;
    };
    std::thread::scope(|scope| {
        for _ in 1..n_threads {
            scope.spawn(|| worker(&state));
        }
        worker(&state);
    });
    debug_assert_eq!(state.lock().unwrap().active_workers, 0);
}

/// Run `body(x, y)` over the [0, count_x) x [0, count_y) grid, one
/// grid cell per claimed chunk.
pub fn parallel_for_2d<F>(body: F, count_x: u32, count_y: u32, n_threads: usize)
where
    F: Fn(u32, u32) + Send + Sync,
{
    let count: u64 = count_x as u64 * count_y as u64;
    parallel_for_1d(
        |i| {
            body((i % count_x as u64) as u32, (i / count_x as u64) as u32);
        },
        count,
        1,
        n_threads,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    #[test]
    fn atomic_float_accumulates_concurrent_adds() {
        let sum: AtomicFloat = AtomicFloat::new(0.0);
        parallel_for_1d(|_| sum.add(1.0), 1000, 16, 4);
        assert_eq!(sum.load(), 1000.0);
    }

    #[test]
    fn atomic_float_store_load_round_trip() {
        let f: AtomicFloat = AtomicFloat::new(0.5);
        assert_eq!(f.load(), 0.5);
        f.store(-2.25);
        assert_eq!(f.load(), -2.25);
    }

    #[test]
    fn parallel_for_covers_every_index_once() {
        let counts: Vec<AtomicUsize> = (0..500).map(|_| AtomicUsize::new(0)).collect();
        parallel_for_1d(
            |i| {
                counts[i as usize].fetch_add(1, AtomicOrdering::SeqCst);
            },
            500,
            7,
            8,
        );
        assert!(counts
            .iter()
            .all(|c| c.load(AtomicOrdering::SeqCst) == 1));
    }

    #[test]
    fn parallel_for_2d_visits_whole_grid() {
        let seen: Vec<AtomicUsize> = (0..12 * 9).map(|_| AtomicUsize::new(0)).collect();
        parallel_for_2d(
            |x, y| {
                seen[(y * 12 + x) as usize].fetch_add(1, AtomicOrdering::SeqCst);
            },
            12,
            9,
            4,
        );
        assert!(seen.iter().all(|c| c.load(AtomicOrdering::SeqCst) == 1));
    }

    #[test]
    fn barrier_releases_all_participants() {
        let barrier: Barrier = Barrier::new(4);
        let released: AtomicUsize = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    barrier.wait();
                    released.fetch_add(1, AtomicOrdering::SeqCst);
                });
            }
        });
        assert_eq!(released.load(AtomicOrdering::SeqCst), 4);
    }
}
