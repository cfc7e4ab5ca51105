//! ROM image loading and reset-vector lookup.
//!
//! Inability to load the ROM image is the only fatal condition in the
//! harness: it aborts a run before any stepping begins. Every other failure
//! mode in the crate is a sentinel or a silent skip.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::map::{byte_at, RESET_VECTOR_HI, RESET_VECTOR_LO, ROM_BASE};

/// Fatal errors loading a firmware image.
#[derive(Debug, Error)]
pub enum RomError {
    /// The image contains no bytes.
    #[error("rom image is empty")]
    Empty,
    /// The image does not fit in the ROM window.
    #[error("rom image of {len} bytes exceeds the {capacity}-byte window at {base:#06X}")]
    TooLarge {
        /// Image length in bytes.
        len: usize,
        /// Available window size in bytes.
        capacity: usize,
        /// Window base address.
        base: u16,
    },
    /// The image file could not be read.
    #[error("failed to read rom image {}", path.display())]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Loads a flat binary image verbatim at [`ROM_BASE`].
///
/// # Errors
///
/// Returns [`RomError::Empty`] for a zero-length image and
/// [`RomError::TooLarge`] when the image would run past the end of the
/// address space.
pub fn load_image(memory: &mut [u8], image: &[u8]) -> Result<(), RomError> {
    if image.is_empty() {
        return Err(RomError::Empty);
    }
    let base = usize::from(ROM_BASE);
    let capacity = memory.len().saturating_sub(base);
    if image.len() > capacity {
        return Err(RomError::TooLarge {
            len: image.len(),
            capacity,
            base: ROM_BASE,
        });
    }
    memory[base..base + image.len()].copy_from_slice(image);
    Ok(())
}

/// Reads a binary image from `path` and loads it at [`ROM_BASE`].
///
/// # Errors
///
/// Returns [`RomError::Io`] when the file cannot be read, plus the
/// [`load_image`] errors.
pub fn load_image_file(memory: &mut [u8], path: &Path) -> Result<(), RomError> {
    let image = std::fs::read(path).map_err(|source| RomError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_image(memory, &image)
}

/// Reads the initial program counter from the 6502 reset vector.
#[must_use]
pub fn read_reset_vector(memory: &[u8]) -> u16 {
    u16::from_le_bytes([
        byte_at(memory, RESET_VECTOR_LO),
        byte_at(memory, RESET_VECTOR_HI),
    ])
}
