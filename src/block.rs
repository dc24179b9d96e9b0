//! The free-list heap allocator backing `ALLOC`/`FREE`.
//!
//! The chain is stored as an arena (`Vec<Block>`) addressed by [`BlockId`]
//! indices rather than as an intrusively owned linked list, per the
//! re-architecture guidance: an owning list needs a recursive destructor,
//! which can overflow the host stack on a long chain. An arena index is
//! `Copy`, non-owning, and trivial to drop.

use crate::error::ErrorKind;

/// A non-owning reference to a [`Block`] within a [`BlockList`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(usize);

/// One node of the free-list chain, covering `[start, end)` in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub allocated: bool,
    pub start: u32,
    pub end: u32,
    next: Option<BlockId>,
}

impl Block {
    fn len(&self) -> u32 {
        self.end - self.start
    }
}

/// The block chain describing a single contiguous heap of `capacity` cells.
///
/// Tombstoned blocks (removed by `merge`) stay in the arena as dead entries;
/// only live blocks are reachable by walking `next` from `head`. The arena
/// never shrinks, but it's bounded by the number of `split`/`merge` calls
/// made, which in turn is bounded by program length.
#[derive(Debug, Clone)]
pub struct BlockList {
    arena: Vec<Block>,
    head: Option<BlockId>,
}

impl BlockList {
    /// Build a chain with a single free block covering `[0, capacity)`.
    pub fn new(capacity: u32) -> Self {
        let mut arena = Vec::new();
        arena.push(Block {
            allocated: false,
            start: 0,
            end: capacity,
            next: None,
        });
        BlockList {
            arena,
            head: Some(BlockId(0)),
        }
    }

    fn get(&self, id: BlockId) -> &Block {
        &self.arena[id.0]
    }

    fn get_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.arena[id.0]
    }

    /// Carve a free-block prefix of exactly `size` cells out of `block`.
    ///
    /// Skips inserting a successor when `block` fits `size` exactly, so no
    /// zero-width free block is ever exposed to a later scan.
    fn split(&mut self, id: BlockId, size: u32) -> Result<(), ErrorKind> {
        let block = self.get(id);
        if block.allocated || block.len() < size {
            return Err(ErrorKind::BlockSplit);
        }
        if block.len() == size {
            return Ok(());
        }

        let new_start = block.start + size;
        let new_end = block.end;
        let old_next = block.next;

        let new_id = BlockId(self.arena.len());
        self.arena.push(Block {
            allocated: false,
            start: new_start,
            end: new_end,
            next: old_next,
        });

        let block = self.get_mut(id);
        block.end = new_start;
        block.next = Some(new_id);
        Ok(())
    }

    /// Coalesce `block` with its immediate free successor.
    fn merge(&mut self, id: BlockId) -> Result<(), ErrorKind> {
        let block = self.get(id);
        if block.allocated {
            return Err(ErrorKind::BlockMerge);
        }
        let Some(next_id) = block.next else {
            return Err(ErrorKind::BlockMerge);
        };
        let next = self.get(next_id);
        if next.allocated {
            return Err(ErrorKind::BlockMerge);
        }

        let next_end = next.end;
        let next_next = next.next;
        let block = self.get_mut(id);
        block.end = next_end;
        block.next = next_next;
        Ok(())
    }

    /// First-fit allocation: find the earliest free block of sufficient
    /// size, split it down to `size`, mark it allocated, and return its
    /// start address.
    pub fn alloc(&mut self, size: u32) -> Result<u32, ErrorKind> {
        if size == 0 {
            return Err(ErrorKind::BlockAlloc { requested: 0 });
        }
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let block = *self.get(id);
            if !block.allocated && block.len() >= size {
                self.split(id, size)?;
                self.get_mut(id).allocated = true;
                return Ok(self.get(id).start);
            }
            cursor = block.next;
        }
        Err(ErrorKind::BlockAlloc { requested: size })
    }

    /// Free the block starting at `address`, merging it with a free
    /// neighbor on either side.
    pub fn free(&mut self, address: u32) -> Result<(), ErrorKind> {
        let id = self.find_by_start(address)
            .ok_or(ErrorKind::BlockFree { address })?;

        self.get_mut(id).allocated = false;

        // Forward merge first: it may change `id`'s `end`, which the
        // predecessor scan below doesn't depend on.
        let _ = self.merge(id);

        if let Some(pred) = self.find_predecessor(id) {
            let _ = self.merge(pred);
        }

        Ok(())
    }

    fn find_by_start(&self, address: u32) -> Option<BlockId> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let block = self.get(id);
            if block.start == address {
                return Some(id);
            }
            cursor = block.next;
        }
        None
    }

    fn find_predecessor(&self, id: BlockId) -> Option<BlockId> {
        let mut cursor = self.head;
        while let Some(cur) = cursor {
            if self.get(cur).next == Some(id) {
                return Some(cur);
            }
            cursor = self.get(cur).next;
        }
        None
    }

    /// Walk the live chain in order, for invariant checks and diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            let block = self.get(id);
            cursor = block.next;
            Some(block)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(list: &BlockList) -> Vec<(u32, u32, bool)> {
        list.iter().map(|b| (b.start, b.end, b.allocated)).collect()
    }

    #[test]
    fn fresh_list_is_one_free_block() {
        let list = BlockList::new(16);
        assert_eq!(layout(&list), vec![(0, 16, false)]);
    }

    #[test]
    fn alloc_splits_and_marks_allocated() {
        let mut list = BlockList::new(16);
        let addr = list.alloc(4).unwrap();
        assert_eq!(addr, 0);
        assert_eq!(layout(&list), vec![(0, 4, true), (4, 16, false)]);
    }

    #[test]
    fn exact_fit_alloc_does_not_leave_zero_width_block() {
        let mut list = BlockList::new(4);
        let addr = list.alloc(4).unwrap();
        assert_eq!(addr, 0);
        assert_eq!(layout(&list), vec![(0, 4, true)]);
    }

    #[test]
    fn alloc_too_large_fails() {
        let mut list = BlockList::new(16);
        assert_eq!(list.alloc(17), Err(ErrorKind::BlockAlloc { requested: 17 }));
    }

    #[test]
    fn alloc_zero_fails_without_touching_the_chain() {
        let mut list = BlockList::new(16);
        assert_eq!(list.alloc(0), Err(ErrorKind::BlockAlloc { requested: 0 }));
        assert_eq!(layout(&list), vec![(0, 16, false)]);
    }

    #[test]
    fn free_merges_forward() {
        let mut list = BlockList::new(16);
        let a = list.alloc(4).unwrap();
        let _b = list.alloc(4).unwrap();
        list.free(a).unwrap();
        assert_eq!(layout(&list), vec![(0, 4, false), (4, 8, true), (8, 16, false)]);
    }

    #[test]
    fn free_merges_backward_and_forward() {
        let mut list = BlockList::new(16);
        let a0 = list.alloc(4).unwrap();
        let a1 = list.alloc(4).unwrap();
        list.free(a1).unwrap();
        list.free(a0).unwrap();
        assert_eq!(layout(&list), vec![(0, 16, false)]);
    }

    #[test]
    fn free_unknown_address_fails() {
        let mut list = BlockList::new(16);
        assert_eq!(list.free(3), Err(ErrorKind::BlockFree { address: 3 }));
    }

    #[test]
    fn alloc_free_roundtrip_restores_single_block() {
        let mut list = BlockList::new(16);
        let addr = list.alloc(10).unwrap();
        list.free(addr).unwrap();
        assert_eq!(layout(&list), vec![(0, 16, false)]);
    }
}
