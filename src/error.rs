//! Closed fault taxonomy for the core engine.
//!
//! Every fallible operation in [`crate::block`] and [`crate::machine`] returns
//! `Result<_, ErrorKind>`. An instruction routine that receives one of these
//! sets `flags.error`, stashes the kind in `Machine::last_error`, and stops;
//! see [`crate::vm`].

use thiserror::Error;

/// The closed set of faults the engine can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Pushing onto a full stack.
    #[error("stack overflow")]
    StackOverflow,
    /// Popping an empty stack.
    #[error("stack underflow")]
    StackUnderflow,
    /// A register index outside `[0, REG_COUNT)`.
    #[error("invalid register {index}")]
    InvalidRegister {
        /// The out-of-range index that was requested.
        index: u32,
    },
    /// `split` preconditions were not met (block not free, or too small).
    #[error("block split failed")]
    BlockSplit,
    /// `merge` preconditions were not met (not free, no free successor).
    #[error("block merge failed")]
    BlockMerge,
    /// No free block was large enough to satisfy the request.
    #[error("no free block large enough for {requested} cells")]
    BlockAlloc {
        /// The size in cells that could not be satisfied.
        requested: u32,
    },
    /// No block starts at the given address.
    #[error("no block starts at address {address}")]
    BlockFree {
        /// The address that did not match any block's start.
        address: u32,
    },
    /// Opcode byte didn't decode to a routine (unknown, or reserved-but-unimplemented).
    #[error("invalid opcode 0x{opcode:02x}")]
    InvalidOpcode {
        /// The raw opcode byte.
        opcode: u8,
    },
    /// Integer division or modulo by zero.
    #[error("division by zero")]
    DivByZero,
    /// `address + offset` fell outside `[0, MEM_CAP)`.
    #[error("memory access out of bounds: address {address} + offset {offset}")]
    MemoryOutOfBounds {
        /// The base address of the access.
        address: u32,
        /// The cell offset added to the base address.
        offset: u32,
    },
    /// Fetch would read past the end of the loaded bytecode.
    #[error("bytecode overrun at instruction pointer {pointer}")]
    BytecodeOverrun {
        /// The instruction pointer at the time of the overrun.
        pointer: u32,
    },
    /// A loaded bytecode buffer's length wasn't a multiple of `INSTR_BYTES`.
    #[error("bytecode length {len} is not a multiple of the instruction width")]
    InvalidBytecodeLength {
        /// The offending buffer length, in bytes.
        len: usize,
    },
}
