//! Hardware-in-the-loop test harness for the 6502 GA firmware.
//!
//! The harness drives an external cycle-stepped CPU/memory model one
//! instruction at a time, synthesizes button stimuli with realistic timing,
//! reconstructs the HD44780 character display by passively observing bus
//! writes, and infers firmware idle/convergence states purely from the
//! instruction stream and designated memory cells. The CPU core itself is a
//! consumed capability behind the [`Cpu`] trait; this crate never executes
//! instructions on its own.

/// Execution-primitive contract and harness configuration.
pub mod api;
pub use api::{Cpu, HarnessConfig};

/// Memory-mapped hardware layout of the target board.
pub mod map;
pub use map::{
    byte_at, read_u16_split, BTN_CANCEL, BTN_CONFIRM, BTN_MORSE, BTN_RUBOUT, BUTTON_MASK, DIST_HI,
    DIST_LO, GEN_HI, GEN_LO, LCD_E, LCD_RS, PHRASE_INDEX, PORT_A, PORT_B, RESET_VECTOR_HI,
    RESET_VECTOR_LO, ROM_BASE, ROM_SCAN_END, TARGET_BUF, TARGET_BUF_LEN, TARGET_POS,
    VIA_T1_COUNTER,
};

/// Bus snooper reconstructing the character display from observed writes.
pub mod lcd;
pub use lcd::{LcdCapture, LINE2_END, LINE2_START, LINE_WIDTH};

/// In-place firmware patching by byte-signature search.
pub mod patch;
pub use patch::{apply_signatures, AppliedPatch, PatchSignature, DELAY_SIGNATURES};

/// Button stimulus injection keyed to the upcoming port read.
pub mod input;
pub use input::inject_buttons;

/// Heuristic blocked-state detection over the instruction stream.
pub mod detect;
pub use detect::{BlockedIdiom, IdleDetector, JumpToSelf, TightPollLoop};

/// Periodic sampling of the GA's generation and distance counters.
pub mod monitor;
pub use monitor::{
    ConvergenceMonitor, GaCells, GaSample, MonitorEvent, DISTANCE_UNINITIALIZED,
};

/// Morse element and code-table primitives.
pub mod morse;
pub use morse::{code_for, elements, MorseElement, MorseError};

/// ROM image loading and reset-vector lookup.
pub mod rom;
pub use rom::{load_image, load_image_file, read_reset_vector, RomError};

/// Scenario driver composing the harness components into timed operations.
pub mod scenario;
pub use scenario::{
    BootReport, Check, CheckTally, Harness, NullProgress, ProgressSink, SolveOutcome,
    DEFAULT_TIMER_SEED,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
