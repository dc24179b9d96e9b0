//! File-based integration tests for `loader::load_file`, carried through to
//! a running machine rather than just checked in isolation.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use slimvm::bytecode::{OpCode, INSTR_BYTES};
use slimvm::error::ErrorKind;
use slimvm::loader::{self, LoadError};
use slimvm::machine::Machine;
use slimvm::vm::{self, ExecutionOutcome};

struct TempFile {
    path: std::path::PathBuf,
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn tempfile(contents: &[u8]) -> TempFile {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("slimvm-loader-test-{}-{n}.slx", std::process::id()));
    fs::write(&path, contents).unwrap();
    TempFile { path }
}

fn record(opcode: OpCode, arg1: u32, arg2: u32) -> [u8; INSTR_BYTES] {
    let mut buf = [0u8; INSTR_BYTES];
    buf[0] = opcode as u8;
    buf[1..5].copy_from_slice(&arg1.to_be_bytes());
    buf[5..9].copy_from_slice(&arg2.to_be_bytes());
    buf
}

#[test]
fn a_loaded_file_runs_to_halt() {
    let prog = [
        record(OpCode::Loadi, 0, 2),
        record(OpCode::Loadi, 0, 3),
        record(OpCode::Add, 0, 0),
        record(OpCode::Halt, 0, 0),
    ]
    .concat();
    let file = tempfile(&prog);

    let bytes = loader::load_file(&file.path).unwrap();
    let mut m = Machine::new();
    m.load(bytes).unwrap();
    assert_eq!(vm::launch(&mut m), ExecutionOutcome::Halted);
    assert_eq!(m.pop().unwrap(), 5);
}

#[test]
fn a_malformed_file_is_rejected_before_any_instruction_runs() {
    let file = tempfile(&[0u8; 11]);
    let err = loader::load_file(&file.path).unwrap_err();
    assert!(matches!(err, LoadError::Format(ErrorKind::InvalidBytecodeLength { len: 11 })));
}

#[test]
fn a_missing_file_reports_io_error() {
    let missing = std::env::temp_dir().join("slimvm-loader-test-does-not-exist.slx");
    let err = loader::load_file(&missing).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}
