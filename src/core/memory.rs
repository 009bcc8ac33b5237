//! The per-thread region allocator. Scattering functions built for a
//! single pixel sample live here and are thrown away wholesale when
//! the sample is finished; nothing allocated from a region is ever
//! dropped individually.

use std::alloc::{alloc, dealloc, Layout};
use std::cell::UnsafeCell;

const DEFAULT_BLOCK_SIZE: usize = 262_144;
const REGION_ALIGNMENT: usize = 64;

struct MemoryBlock {
    ptr: *mut u8,
    size: usize,
}

fn allocate_block(size: usize) -> MemoryBlock {
    let layout = Layout::from_size_align(size, REGION_ALIGNMENT).unwrap();
    let ptr: *mut u8 = unsafe { alloc(layout) };
    assert!(!ptr.is_null(), "region allocator: out of memory");
    MemoryBlock { ptr, size }
}

struct RegionState {
    current: Option<MemoryBlock>,
    current_pos: usize,
    used_blocks: Vec<MemoryBlock>,
    free_blocks: Vec<MemoryBlock>,
    total_allocated: usize,
}

/// Bump allocator over cache-line-aligned blocks of at least 256 KiB.
/// Allocation takes `&self` and hands out disjoint memory; `release`
/// takes `&mut self`, which statically guarantees no allocation is
/// still borrowed when the region is recycled.
pub struct RegionAllocator {
    block_size: usize,
    state: UnsafeCell<RegionState>,
}

impl Default for RegionAllocator {
    fn default() -> Self {
        RegionAllocator::new()
    }
}

impl RegionAllocator {
    pub fn new() -> Self {
        RegionAllocator::with_block_size(DEFAULT_BLOCK_SIZE)
    }
    pub fn with_block_size(block_size: usize) -> Self {
        assert!(block_size % 16 == 0);
        RegionAllocator {
            block_size,
            state: UnsafeCell::new(RegionState {
                current: None,
                current_pos: 0,
                used_blocks: Vec::new(),
                free_blocks: Vec::new(),
                total_allocated: 0,
            }),
        }
    }
    /// Reserve `n_bytes` (rounded up to a multiple of 16) and return
    /// the zero-initialized slice.
    pub fn alloc_bytes(&self, n_bytes: usize) -> &mut [u8] {
        let n_bytes: usize = (n_bytes + 15) & !15;
        let state: &mut RegionState = unsafe { &mut *self.state.get() };
        let exhausted: bool = match state.current {
            Some(ref block) => state.current_pos + n_bytes > block.size,
            None => true,
        };
        if exhausted {
            if let Some(block) = state.current.take() {
                state.used_blocks.push(block);
            }
            // reuse a free block when one is big enough
            let mut found: Option<usize> = None;
            for (i, block) in state.free_blocks.iter().enumerate() {
                if block.size >= n_bytes {
                    found = Some(i);
                    break;
                }
            }
            let block: MemoryBlock = match found {
                Some(i) => state.free_blocks.swap_remove(i),
                None => {
                    let size: usize = self.block_size.max(n_bytes);
                    state.total_allocated += size;
                    allocate_block(size)
                }
            };
            state.current = Some(block);
            state.current_pos = 0;
        }
        let block: &MemoryBlock = state.current.as_ref().unwrap();
        let slice: &mut [u8] =
            unsafe { std::slice::from_raw_parts_mut(block.ptr.add(state.current_pos), n_bytes) };
        state.current_pos += n_bytes;
        for b in slice.iter_mut() {
            *b = 0;
        }
        slice
    }
    /// Move `value` into region storage and return a reference to it.
    /// The value is never dropped; region types must not own heap
    /// state beyond the region itself.
    pub fn alloc<T>(&self, value: T) -> &mut T {
        let bytes: &mut [u8] = self.alloc_bytes(std::mem::size_of::<T>().max(1));
        debug_assert!(bytes.as_ptr() as usize % std::mem::align_of::<T>() == 0);
        let ptr: *mut T = bytes.as_mut_ptr() as *mut T;
        unsafe {
            std::ptr::write(ptr, value);
            &mut *ptr
        }
    }
    /// Recycle every block. Everything previously allocated from this
    /// region is gone; the borrow checker enforces that no reference
    /// survives this call.
    pub fn release(&mut self) {
        let state: &mut RegionState = unsafe { &mut *self.state.get() };
        state.current_pos = 0;
        state.free_blocks.append(&mut state.used_blocks);
    }
    pub fn total_allocated(&self) -> usize {
        let state: &RegionState = unsafe { &*self.state.get() };
        state.total_allocated
    }
}

impl Drop for RegionAllocator {
    fn drop(&mut self) {
        let state: &mut RegionState = unsafe { &mut *self.state.get() };
        let blocks = state
            .used_blocks
            .drain(..)
            .chain(state.free_blocks.drain(..))
            .chain(state.current.take());
        for block in blocks {
            let layout = Layout::from_size_align(block.size, REGION_ALIGNMENT).unwrap();
            unsafe { dealloc(block.ptr, layout) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_aligned_and_disjoint() {
        let region: RegionAllocator = RegionAllocator::new();
        let a: &mut [u8] = region.alloc_bytes(24);
        let b: &mut [u8] = region.alloc_bytes(8);
        assert_eq!(a.as_ptr() as usize % 16, 0);
        assert_eq!(b.as_ptr() as usize % 16, 0);
        assert_eq!(a.len(), 32);
        assert_eq!(b.len(), 16);
        a[0] = 0xAA;
        b[0] = 0xBB;
        assert_eq!(a[0], 0xAA);
    }

    #[test]
    fn alloc_returns_written_value() {
        let region: RegionAllocator = RegionAllocator::new();
        let x: &mut [f32; 4] = region.alloc([1.0_f32, 2.0, 3.0, 4.0]);
        assert_eq!(x[2], 3.0);
        x[2] = 9.0;
        assert_eq!(x[2], 9.0);
    }

    #[test]
    fn release_recycles_blocks_without_new_backing() {
        let mut region: RegionAllocator = RegionAllocator::with_block_size(1024);
        for _ in 0..8 {
            region.alloc_bytes(512);
            region.alloc_bytes(512);
        }
        let grown: usize = region.total_allocated();
        region.release();
        for _ in 0..8 {
            region.alloc_bytes(512);
            region.alloc_bytes(512);
        }
        assert_eq!(region.total_allocated(), grown);
    }

    #[test]
    fn oversized_requests_get_dedicated_blocks() {
        let region: RegionAllocator = RegionAllocator::with_block_size(256);
        let big: &mut [u8] = region.alloc_bytes(4096);
        assert!(big.len() >= 4096);
    }
}
