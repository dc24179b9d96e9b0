//! Fixed-width instruction encoding.
//!
//! Each instruction is a 9-byte record: one opcode byte followed by two
//! big-endian `u32` operand words. There is no header, no magic, no version
//! field — a bytecode buffer is just a flat sequence of these records.

use crate::error::ErrorKind;

/// Byte width of a single instruction record.
pub const INSTR_BYTES: usize = 9;

/// The full set of assigned opcodes.
///
/// `ADDF`..`MODF` are assigned encodings with no implemented routine (see
/// [`crate::ops`]); they decode successfully but fault `InvalidOpcode` at
/// execute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Noop = 0x00,
    Halt = 0x01,

    Loadi = 0x10,
    Loadr = 0x11,
    Loadm = 0x12,
    Drop = 0x13,
    Storer = 0x14,
    Storem = 0x15,

    Dup = 0x20,
    Swap = 0x21,
    Rot = 0x22,

    Add = 0x30,
    Sub = 0x31,
    Mul = 0x32,
    Div = 0x33,
    Modi = 0x34,
    Addf = 0x35,
    Subf = 0x36,
    Mulf = 0x37,
    Divf = 0x38,
    Modf = 0x39,

    Alloc = 0x40,
    Free = 0x41,

    Jmp = 0x50,
    Jne = 0x51,
    Je = 0x52,
}

impl OpCode {
    /// Decode a raw opcode byte, if it names an assigned encoding.
    pub fn decode(byte: u8) -> Option<OpCode> {
        use OpCode::*;
        Some(match byte {
            0x00 => Noop,
            0x01 => Halt,
            0x10 => Loadi,
            0x11 => Loadr,
            0x12 => Loadm,
            0x13 => Drop,
            0x14 => Storer,
            0x15 => Storem,
            0x20 => Dup,
            0x21 => Swap,
            0x22 => Rot,
            0x30 => Add,
            0x31 => Sub,
            0x32 => Mul,
            0x33 => Div,
            0x34 => Modi,
            0x35 => Addf,
            0x36 => Subf,
            0x37 => Mulf,
            0x38 => Divf,
            0x39 => Modf,
            0x40 => Alloc,
            0x41 => Free,
            0x50 => Jmp,
            0x51 => Jne,
            0x52 => Je,
            _ => return None,
        })
    }
}

/// A decoded `(opcode, arg1, arg2)` triple, produced by [`fetch`] and
/// consumed by [`crate::ops::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub arg1: u32,
    pub arg2: u32,
}

/// Read one instruction record out of `bytecode` at byte offset `pointer`.
///
/// Operand words are big-endian. Fails with `BytecodeOverrun` rather than
/// reading out of bounds if the next `INSTR_BYTES` don't fit.
pub fn fetch(bytecode: &[u8], pointer: u32) -> Result<Instruction, ErrorKind> {
    let start = pointer as usize;
    let end = start + INSTR_BYTES;
    let Some(record) = bytecode.get(start..end) else {
        return Err(ErrorKind::BytecodeOverrun { pointer });
    };

    let opcode = record[0];
    let arg1 = u32::from_be_bytes(record[1..5].try_into().unwrap());
    let arg2 = u32::from_be_bytes(record[5..9].try_into().unwrap());

    Ok(Instruction { opcode, arg1, arg2 })
}

/// Validate that `bytes` is a well-formed bytecode buffer (a non-negative
/// multiple of [`INSTR_BYTES`]).
pub fn validate_length(bytes: &[u8]) -> Result<(), ErrorKind> {
    if bytes.len() % INSTR_BYTES != 0 {
        return Err(ErrorKind::InvalidBytecodeLength { len: bytes.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(opcode: u8, arg1: u32, arg2: u32) -> [u8; INSTR_BYTES] {
        let mut buf = [0u8; INSTR_BYTES];
        buf[0] = opcode;
        buf[1..5].copy_from_slice(&arg1.to_be_bytes());
        buf[5..9].copy_from_slice(&arg2.to_be_bytes());
        buf
    }

    #[test]
    fn fetch_decodes_big_endian_operands() {
        let buf = record(OpCode::Loadi as u8, 0x00000000, 0xCAFEBABE);
        let instr = fetch(&buf, 0).unwrap();
        assert_eq!(instr.opcode, OpCode::Loadi as u8);
        assert_eq!(instr.arg1, 0);
        assert_eq!(instr.arg2, 0xCAFEBABE);
    }

    #[test]
    fn fetch_reads_the_record_at_the_given_pointer() {
        let mut buf = record(OpCode::Noop as u8, 0, 0).to_vec();
        buf.extend_from_slice(&record(OpCode::Halt as u8, 0, 0));
        let second = fetch(&buf, INSTR_BYTES as u32).unwrap();
        assert_eq!(second.opcode, OpCode::Halt as u8);
    }

    #[test]
    fn fetch_past_end_overruns() {
        let buf = record(OpCode::Noop as u8, 0, 0);
        assert_eq!(
            fetch(&buf, INSTR_BYTES as u32),
            Err(ErrorKind::BytecodeOverrun { pointer: INSTR_BYTES as u32 })
        );
    }

    #[test]
    fn decode_recognizes_reserved_float_opcodes_but_they_have_no_routine() {
        assert_eq!(OpCode::decode(0x35), Some(OpCode::Addf));
    }

    #[test]
    fn decode_rejects_unassigned_byte() {
        assert_eq!(OpCode::decode(0xFF), None);
    }

    #[test]
    fn validate_length_rejects_non_multiple() {
        assert_eq!(
            validate_length(&[0u8; 10]),
            Err(ErrorKind::InvalidBytecodeLength { len: 10 })
        );
    }

    #[test]
    fn validate_length_accepts_multiple() {
        assert_eq!(validate_length(&[0u8; 18]), Ok(()));
    }
}
