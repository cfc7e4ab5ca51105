//! Heuristic blocked-state detection over the instruction stream.
//!
//! The firmware offers no explicit "I am idle" signal, so the harness infers
//! one structurally: it inspects the instruction about to execute and
//! matches it against known blocking idioms. This is a heuristic, not a
//! guarantee — callers bound the number of steps they are willing to scan
//! and treat failure-to-detect as a reported timeout, never an infinite
//! wait.

use crate::api::HarnessConfig;
use crate::map::byte_at;

/// 6502 `JMP absolute` opcode.
const OPCODE_JMP_ABS: u8 = 0x4C;
/// 6502 `BEQ relative` opcode.
const OPCODE_BEQ: u8 = 0xF0;

/// A recognizable firmware idiom that blocks waiting on external input.
///
/// Implement this to teach the detector additional idioms without touching
/// any caller; predicates see only the shared memory image and the program
/// counter of the instruction about to execute.
pub trait BlockedIdiom {
    /// Returns `true` when the instruction at `pc` matches this idiom.
    fn matches(&self, memory: &[u8], pc: u16) -> bool;
}

/// An unconditional jump whose operand encodes its own address.
///
/// The classic parked spin: the firmware has nothing left to do and sits on
/// a single instruction forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpToSelf;

impl BlockedIdiom for JumpToSelf {
    fn matches(&self, memory: &[u8], pc: u16) -> bool {
        let [pc_lo, pc_hi] = pc.to_le_bytes();
        byte_at(memory, pc) == OPCODE_JMP_ABS
            && byte_at(memory, pc.wrapping_add(1)) == pc_lo
            && byte_at(memory, pc.wrapping_add(2)) == pc_hi
    }
}

/// A conditional backward branch closing a short polling loop.
///
/// Distinct from a jump-to-self: the loop body holds a few instructions,
/// typically re-reading a port each iteration, and the `BEQ` at the bottom
/// branches back while the awaited condition still holds. Only backward
/// targets within `max_span` bytes count; forward branches never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TightPollLoop {
    /// Maximum backward distance, in bytes, from the branch to its target.
    pub max_span: u16,
}

impl BlockedIdiom for TightPollLoop {
    fn matches(&self, memory: &[u8], pc: u16) -> bool {
        if byte_at(memory, pc) != OPCODE_BEQ {
            return false;
        }
        let offset = byte_at(memory, pc.wrapping_add(1));
        if offset < 0x80 {
            return false;
        }
        // Branch target relative to the following instruction; the offset
        // is two's-complement negative here.
        let back = 256 - u16::from(offset);
        let target = pc.wrapping_add(2).wrapping_sub(back);
        let span = pc.wrapping_sub(target);
        span <= self.max_span
    }
}

/// Composition of blocked idioms evaluated against the current instruction.
pub struct IdleDetector {
    idioms: Vec<Box<dyn BlockedIdiom>>,
}

impl IdleDetector {
    /// Creates a detector with the standard idiom set, tuned by `config`.
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            idioms: vec![
                Box::new(JumpToSelf),
                Box::new(TightPollLoop {
                    max_span: config.poll_loop_span,
                }),
            ],
        }
    }

    /// Creates a detector with no idioms.
    #[must_use]
    pub const fn empty() -> Self {
        Self { idioms: Vec::new() }
    }

    /// Adds an idiom to the detector.
    #[must_use]
    pub fn with_idiom(mut self, idiom: Box<dyn BlockedIdiom>) -> Self {
        self.idioms.push(idiom);
        self
    }

    /// Returns `true` when the instruction at `pc` matches any idiom.
    #[must_use]
    pub fn is_blocked(&self, memory: &[u8], pc: u16) -> bool {
        self.idioms.iter().any(|idiom| idiom.matches(memory, pc))
    }
}

impl Default for IdleDetector {
    fn default() -> Self {
        Self::new(&HarnessConfig::default())
    }
}

impl std::fmt::Debug for IdleDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdleDetector")
            .field("idioms", &self.idioms.len())
            .finish()
    }
}
