//! One semantic routine per opcode, dispatched from [`crate::vm::launch`].
//!
//! Every routine takes the decoded [`Instruction`] and a `&mut Machine`. On
//! any internal failure it calls `machine.fault(kind)` and returns; it never
//! panics on well-formed-but-faulty input.

use crate::bytecode::{Instruction, OpCode};
use crate::error::ErrorKind;
use crate::flags::Flags;
use crate::machine::Machine;

/// Decode an instruction's opcode and invoke its routine against `machine`.
///
/// Unknown opcodes, and opcodes that are assigned but have no routine (the
/// float variants), fault `InvalidOpcode`.
#[tracing::instrument(level = "trace", skip(machine))]
pub fn execute(machine: &mut Machine, instr: Instruction) {
    let Some(opcode) = OpCode::decode(instr.opcode) else {
        machine.fault(ErrorKind::InvalidOpcode { opcode: instr.opcode });
        return;
    };

    tracing::trace!(?opcode, arg1 = instr.arg1, arg2 = instr.arg2, "execute");

    let result = match opcode {
        OpCode::Noop => Ok(()),
        OpCode::Halt => {
            machine.set_flag(Flags::HALT);
            Ok(())
        }

        OpCode::Loadi => {
            let value = (u64::from(instr.arg1) << 32) | u64::from(instr.arg2);
            machine.push(value)
        }
        OpCode::Loadr => machine.load_reg(instr.arg1),
        OpCode::Loadm => loadm(machine, instr.arg1),
        OpCode::Drop => machine.pop_discard(),
        OpCode::Storer => machine.store_reg(instr.arg1),
        OpCode::Storem => storem(machine, instr.arg1),

        OpCode::Dup => dup(machine),
        OpCode::Swap => swap(machine),
        OpCode::Rot => rot(machine),

        OpCode::Add => binary(machine, |a, b| Ok(a.wrapping_add(b))),
        OpCode::Sub => binary(machine, |a, b| Ok(a.wrapping_sub(b))),
        OpCode::Mul => binary(machine, |a, b| Ok(a.wrapping_mul(b))),
        OpCode::Div => binary(machine, checked_div),
        OpCode::Modi => binary(machine, checked_rem),
        OpCode::Addf | OpCode::Subf | OpCode::Mulf | OpCode::Divf | OpCode::Modf => {
            Err(ErrorKind::InvalidOpcode { opcode: instr.opcode })
        }

        OpCode::Alloc => alloc(machine, instr.arg1),
        OpCode::Free => machine.free(instr.arg1),

        OpCode::Jmp => {
            machine.set_instruction_pointer(instr.arg1);
            Ok(())
        }
        OpCode::Jne => branch_if(machine, instr.arg1, |v| v != 0),
        OpCode::Je => branch_if(machine, instr.arg1, |v| v == 0),
    };

    if let Err(kind) = result {
        tracing::error!(?kind, "instruction fault");
        machine.fault(kind);
    }
}

/// `addr -> mem[addr + offset]`. `arg1` is the cell offset; `arg2` is
/// reserved.
fn loadm(machine: &mut Machine, offset: u32) -> Result<(), ErrorKind> {
    let address = machine.pop()? as u32;
    machine.read_mem(address, offset)
}

/// `addr, v -> ` (pop address, then value; both pops happen regardless of
/// which one is written last).
fn storem(machine: &mut Machine, offset: u32) -> Result<(), ErrorKind> {
    let address = machine.pop()? as u32;
    let value = machine.pop()?;
    machine.write_mem(address, offset, value)
}

fn dup(machine: &mut Machine) -> Result<(), ErrorKind> {
    let value = machine.pop()?;
    machine.push(value)?;
    machine.push(value)
}

fn swap(machine: &mut Machine) -> Result<(), ErrorKind> {
    let a = machine.pop()?;
    let b = machine.pop()?;
    machine.push(a)?;
    machine.push(b)
}

/// `a, b, c -> b, a, c`: swap the two elements above the third, leaving the
/// bottom one untouched.
fn rot(machine: &mut Machine) -> Result<(), ErrorKind> {
    let a = machine.pop()?;
    let b = machine.pop()?;
    let c = machine.pop()?;
    machine.push(b)?;
    machine.push(a)?;
    machine.push(c)
}

/// `a, b -> a op b`, where `a` is the top of stack (left operand) and `b`
/// is the second (right operand).
fn binary(
    machine: &mut Machine,
    op: impl FnOnce(u64, u64) -> Result<u64, ErrorKind>,
) -> Result<(), ErrorKind> {
    let a = machine.pop()?;
    let b = machine.pop()?;
    let result = op(a, b)?;
    machine.push(result)
}

fn checked_div(a: u64, b: u64) -> Result<u64, ErrorKind> {
    a.checked_div(b).ok_or(ErrorKind::DivByZero)
}

fn checked_rem(a: u64, b: u64) -> Result<u64, ErrorKind> {
    a.checked_rem(b).ok_or(ErrorKind::DivByZero)
}

fn alloc(machine: &mut Machine, size: u32) -> Result<(), ErrorKind> {
    let address = machine.alloc(size)?;
    machine.push(u64::from(address))
}

fn branch_if(machine: &mut Machine, target: u32, predicate: impl FnOnce(u64) -> bool) -> Result<(), ErrorKind> {
    let value = machine.pop()?;
    if predicate(value) {
        machine.set_instruction_pointer(target);
    }
    Ok(())
}
