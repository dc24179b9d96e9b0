//! The fetch/decode/execute loop.

use crate::bytecode::{self, INSTR_BYTES};
use crate::error::ErrorKind;
use crate::flags::Flags;
use crate::machine::Machine;
use crate::ops;

/// Which terminal state `launch` reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// `HALT` executed; `flags.halt` is set, `flags.error` is clear.
    Halted,
    /// An instruction faulted; `flags.error` is set, `flags.halt` is clear.
    /// Carries the same kind stored in `Machine::last_error`.
    Faulted(ErrorKind),
}

/// Run `machine` from its current instruction pointer until it halts or
/// faults.
///
/// Each iteration fetches one instruction, decodes and executes it, and
/// advances the pointer by [`INSTR_BYTES`] — unless the routine itself set
/// the pointer (a jump), which this loop does not override. The loop exits
/// on `halt` *or* `error`, unlike the source, which only checked `halt` and
/// would keep executing against a poisoned machine after a fault.
#[tracing::instrument(skip(machine))]
pub fn launch(machine: &mut Machine) -> ExecutionOutcome {
    loop {
        let pointer = machine.instruction_pointer();
        let instr = match bytecode::fetch(machine.bytecode(), pointer) {
            Ok(instr) => instr,
            Err(kind) => {
                machine.fault(kind);
                return ExecutionOutcome::Faulted(kind);
            }
        };
        machine.advance_instruction_pointer(INSTR_BYTES);

        ops::execute(machine, instr);

        let flags = machine.flags();
        if flags.contains(Flags::ERROR) {
            let kind = machine.last_error.expect("error flag set without a recorded kind");
            tracing::error!(%kind, "machine faulted");
            return ExecutionOutcome::Faulted(kind);
        }
        if flags.contains(Flags::HALT) {
            tracing::debug!("machine halted");
            return ExecutionOutcome::Halted;
        }
    }
}
