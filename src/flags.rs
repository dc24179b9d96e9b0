//! The machine's flag word.
//!
//! Only [`Flags::ERROR`] and [`Flags::HALT`] are ever set by the core; the
//! rest are reserved bits a future ISA extension could use (the source
//! defines all eight but only ever touches two of them).

bitflags::bitflags! {
    /// Independent 1-bit indicators tracked alongside the machine's state.
    #[derive(Default)]
    pub struct Flags: u8 {
        /// Reserved: set when the last arithmetic result was zero.
        const ZERO      = 1 << 0;
        /// Reserved: set on unsigned arithmetic carry.
        const CARRY     = 1 << 1;
        /// Reserved: set on signed arithmetic overflow.
        const OVERFLOW  = 1 << 2;
        /// Reserved: set when the last arithmetic result was negative.
        const NEGATIVE  = 1 << 3;
        /// Reserved: inert. No instruction delivers an interrupt.
        const INTERRUPT = 1 << 4;
        /// Reserved: unused, no BCD arithmetic is implemented.
        const DECIMAL   = 1 << 5;
        /// Set when an instruction routine has faulted.
        const ERROR     = 1 << 6;
        /// Set by `HALT`.
        const HALT      = 1 << 7;
    }
}
