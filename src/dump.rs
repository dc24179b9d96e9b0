//! Read-only diagnostic rendering of machine state.
//!
//! Each function renders to a `String` rather than printing directly, so
//! the CLI and tests can both consume the output (the source always prints
//! straight to stdout; here that's the CLI's choice, not this module's).

use crate::machine::Machine;
use std::fmt::Write as _;

/// Render the stack and its current depth, one slot per line.
pub fn dump_stack(machine: &Machine) -> String {
    let mut out = String::from("stack:\n");
    for (i, value) in machine.stack().iter().enumerate() {
        let _ = writeln!(out, "  [{i}] {value}");
    }
    let _ = writeln!(out, "stack_pointer: {}", machine.stack_pointer());
    out
}

/// Render the register file, one register per line.
pub fn dump_registers(machine: &Machine) -> String {
    let mut out = String::from("registers:\n");
    for (i, value) in machine.registers().iter().enumerate() {
        let _ = writeln!(out, "  r{i}: {value}");
    }
    out
}

/// Render the heap's cells and its block chain.
pub fn dump_memory(machine: &Machine) -> String {
    let mut out = String::from("memory:\n");
    for (i, value) in machine.memory().iter().enumerate() {
        let _ = writeln!(out, "  [{i}] {value}");
    }
    let _ = writeln!(out, "blocks:");
    for block in machine.blocks() {
        let state = if block.allocated { "allocated" } else { "free" };
        let _ = writeln!(out, "  [{}, {}) {state}", block.start, block.end);
    }
    out
}
