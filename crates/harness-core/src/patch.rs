//! In-place firmware patching by byte-signature search.
//!
//! The target routines are intentionally slow on real hardware (software
//! delay loops for debouncing and display-controller timing). Replacing them
//! with immediate returns collapses simulated wall-clock time while leaving
//! every logical register effect the callers depend on intact.

use crate::map::{ROM_BASE, ROM_SCAN_END};

/// A known byte sequence and its in-place replacement.
///
/// The replacement must be no longer than the pattern: patches overwrite the
/// matched region without relocating anything around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSignature {
    /// Routine name, for reporting.
    pub name: &'static str,
    /// Bytes identifying the first instructions of the routine.
    pub pattern: &'static [u8],
    /// Bytes written over the start of the match.
    pub replacement: &'static [u8],
}

impl PatchSignature {
    /// Returns `true` when the replacement fits inside the matched region.
    #[must_use]
    pub const fn fits_in_place(&self) -> bool {
        self.replacement.len() <= self.pattern.len()
    }
}

/// A patch that was found and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedPatch {
    /// Name of the signature that matched.
    pub name: &'static str,
    /// Address of the first patched byte.
    pub addr: u16,
}

/// Signatures for the firmware's delay routines, patched to fast returns.
///
/// Each replacement preserves the routine's observable contract: `delay` and
/// `debounce` save no state before the patched prologue, so a bare `RTS`
/// suffices; `lcd_wait` has already pushed A, so the replacement pops it
/// back before returning.
pub const DELAY_SIGNATURES: [PatchSignature; 3] = [
    PatchSignature {
        // delay: TXA PHA TYA PHA LDX #$C8
        name: "delay",
        pattern: &[0x8A, 0x48, 0x98, 0x48, 0xA2, 0xC8],
        // RTS
        replacement: &[0x60],
    },
    PatchSignature {
        // lcd_wait: PHA LDA #$00 STA $6002
        name: "lcd_wait",
        pattern: &[0x48, 0xA9, 0x00, 0x8D, 0x02, 0x60],
        // PHA PLA RTS
        replacement: &[0x48, 0x68, 0x60],
    },
    PatchSignature {
        // debounce: TXA PHA TYA PHA LDX #$14
        name: "debounce",
        pattern: &[0x8A, 0x48, 0x98, 0x48, 0xA2, 0x14],
        // RTS
        replacement: &[0x60],
    },
];

/// Applies each signature to the ROM window, first match only.
///
/// Scans `ROM_BASE..ROM_SCAN_END` byte by byte for every signature and
/// overwrites the first exact match in place. A signature that never matches
/// is skipped silently: the binary may simply have been built differently,
/// and an unpatched run is slower but not incorrect. Applying the same table
/// twice leaves the image unchanged because a patched prologue no longer
/// matches its own pattern.
pub fn apply_signatures(memory: &mut [u8], signatures: &[PatchSignature]) -> Vec<AppliedPatch> {
    let mut applied = Vec::new();
    for signature in signatures {
        if signature.pattern.is_empty() || !signature.fits_in_place() {
            continue;
        }
        if let Some(addr) = find_match(memory, signature.pattern) {
            let start = usize::from(addr);
            memory[start..start + signature.replacement.len()]
                .copy_from_slice(signature.replacement);
            applied.push(AppliedPatch {
                name: signature.name,
                addr,
            });
        }
    }
    applied
}

fn find_match(memory: &[u8], pattern: &[u8]) -> Option<u16> {
    let end = usize::from(ROM_SCAN_END).min(memory.len().saturating_sub(pattern.len()));
    (usize::from(ROM_BASE)..end).find_map(|start| {
        if memory[start..start + pattern.len()] == *pattern {
            u16::try_from(start).ok()
        } else {
            None
        }
    })
}
