//! # CVERE ISA
//!
//! Registry of the CVERE instruction set and the codec converting between
//! symbolic instructions and 16-bit machine words.
//!
//! ```
//! use isa::registry::InstructionRegistry;
//!
//! let registry = InstructionRegistry::with_default_isa();
//! let codec = registry.codec();
//!
//! let word = codec.encode("ADD", &[3, 1, 2]).unwrap();
//! assert_eq!(word, 0x1312);
//! assert_eq!(codec.decode(word).operands, vec![3, 1, 2]);
//! ```

#[allow(clippy::cast_possible_truncation)]
mod bitwise;

#[allow(clippy::cast_precision_loss)]
pub mod analysis;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_possible_wrap)]
pub mod codec;
pub mod diagram;
pub mod docs;
pub mod error;
pub mod format;
pub mod persistence;
pub mod registry;
pub mod spec;
