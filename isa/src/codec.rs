//! # Encoding and Decoding
//!
//! [`Codec`] turns `(mnemonic, operands)` into a 16-bit word and back, using
//! the registry to find the format of each instruction.
//!
//! ## Encoding
//!
//! ```text
//! ADD R3, R1, R2                     LOADI R5, 0x42
//!  │    │   │   │                     │     │   │
//!  ▼    ▼   ▼   ▼                     ▼     ▼   ▼
//! 0001 0011 0001 0010 = 0x1312       1100 0101 0100 0010 = 0xC542
//! ```
//!
//! Every operand is masked to its field width before it is packed, so
//! out-of-range values wrap instead of failing.
//!
//! ## Sentinels
//!
//! `0x0000` is always NOP and `0xFFFF` is always HALT. Decoding checks them
//! before looking at the opcode field, so they win over any instruction
//! registered at opcode `0x0` or `0xF`.

use std::fmt::Display;

use crate::bitwise::Bits;
use crate::error::IsaError;
use crate::format::{Field, InstructionFormat, OPCODE_BITS};
use crate::registry::InstructionRegistry;
use crate::spec::InstructionSpec;

pub const NOP_WORD: u16 = 0x0000;
pub const HALT_WORD: u16 = 0xFFFF;

pub const NOP: &str = "NOP";
pub const HALT: &str = "HALT";

/// Result of decoding a word. Unmapped opcodes decode to a synthetic
/// `UNKNOWN_0x<op>` mnemonic with no operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub mnemonic: String,
    pub operands: Vec<u32>,
    /// Set only when no instruction is registered at the opcode.
    unknown: bool,
}

impl DecodedInstruction {
    pub fn new(mnemonic: impl Into<String>, operands: Vec<u32>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            operands,
            unknown: false,
        }
    }

    fn unknown(opcode: u16) -> Self {
        Self {
            mnemonic: format!("UNKNOWN_0x{opcode:X}"),
            operands: Vec::new(),
            unknown: true,
        }
    }

    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.unknown
    }
}

impl Display for DecodedInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.mnemonic)?;
        for (idx, operand) in self.operands.iter().enumerate() {
            let separator = if idx == 0 { " " } else { ", " };
            write!(f, "{separator}{operand}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub struct Codec<'a> {
    registry: &'a InstructionRegistry,
}

impl<'a> Codec<'a> {
    #[must_use]
    pub const fn new(registry: &'a InstructionRegistry) -> Self {
        Self { registry }
    }

    /// Packs `operands` into a machine word following the format of `mnemonic`.
    ///
    /// # Errors
    /// - [`IsaError::UnknownMnemonic`] if `mnemonic` is not registered.
    /// - [`IsaError::MalformedOperands`] if fewer operands than the format needs are given.
    pub fn encode(&self, mnemonic: &str, operands: &[u32]) -> Result<u16, IsaError> {
        let spec = self
            .registry
            .lookup_by_mnemonic(mnemonic)
            .ok_or_else(|| IsaError::UnknownMnemonic(mnemonic.to_string()))?;

        match spec.format {
            InstructionFormat::Special => Ok(match spec.mnemonic.as_str() {
                NOP => NOP_WORD,
                HALT => HALT_WORD,
                _ => {
                    tracing::warn!("{mnemonic} is a special instruction with no encoding, using 0");
                    0
                }
            }),
            InstructionFormat::Extended => {
                tracing::warn!("{mnemonic} uses the extended format which has no layout, using 0");
                Ok(0)
            }
            InstructionFormat::RType
            | InstructionFormat::IType
            | InstructionFormat::MType
            | InstructionFormat::JType
            | InstructionFormat::BType => pack(spec, operands),
        }
    }

    /// Unpacks a machine word. Any 16-bit pattern decodes to something.
    #[must_use]
    pub fn decode(&self, word: u16) -> DecodedInstruction {
        match word {
            NOP_WORD => return DecodedInstruction::new(NOP, Vec::new()),
            HALT_WORD => return DecodedInstruction::new(HALT, Vec::new()),
            _ => {}
        }

        let opcode = word.get_bits(OPCODE_BITS);
        let Some(spec) = self.registry.spec_for_opcode(opcode) else {
            tracing::trace!("no instruction at opcode 0x{opcode:X} for word 0x{word:04X}");
            return DecodedInstruction::unknown(opcode);
        };

        let operands = spec
            .format
            .fields()
            .iter()
            .map(|field| u32::from(word.get_bits(field.bits())))
            .collect();

        DecodedInstruction::new(spec.mnemonic.clone(), operands)
    }

    /// One listing line: `AAAA: WWWW  MNEMONIC operands`.
    #[must_use]
    pub fn disassemble(&self, address: u16, word: u16) -> String {
        let decoded = self.decode(word);
        let text = self
            .registry
            .lookup_by_mnemonic(&decoded.mnemonic)
            .map_or_else(
                || decoded.mnemonic.clone(),
                |spec| assembly_text(spec, &decoded),
            );

        format!("{address:04X}: {word:04X}  {text}")
    }

    /// Disassembles consecutive words starting at `start_address`. Addresses
    /// wrap from `0xFFFF` back to `0x0000`.
    #[must_use]
    pub fn disassemble_all(&self, start_address: u16, words: &[u16]) -> Vec<String> {
        words
            .iter()
            .enumerate()
            .map(|(idx, word)| {
                let address = start_address.wrapping_add(idx as u16);
                self.disassemble(address, *word)
            })
            .collect()
    }
}

impl InstructionRegistry {
    #[must_use]
    pub const fn codec(&self) -> Codec<'_> {
        Codec::new(self)
    }
}

fn pack(spec: &InstructionSpec, operands: &[u32]) -> Result<u16, IsaError> {
    let required = spec.format.required_operands();
    if operands.len() < required {
        return Err(IsaError::MalformedOperands {
            mnemonic: spec.mnemonic.clone(),
            expected: required,
            got: operands.len(),
        });
    }

    if spec.opcode > 0xF {
        tracing::warn!(
            "opcode 0x{:X} of {} doesn't fit 4 bits and will be truncated",
            spec.opcode,
            spec.mnemonic
        );
    }

    let mut word = 0_u16;
    word.set_bits(OPCODE_BITS, u64::from(spec.opcode));
    for (idx, field) in spec.format.fields().iter().enumerate() {
        let value = operands.get(idx).copied().unwrap_or(0);
        word.set_bits(field.bits(), u64::from(value));
    }

    Ok(word)
}

/// Assembly-like rendering of the operands named by the spec.
fn assembly_text(spec: &InstructionSpec, decoded: &DecodedInstruction) -> String {
    let fields = spec.format.fields();
    let operands: Vec<String> = spec
        .operands
        .iter()
        .zip(decoded.operands.iter().zip(fields))
        .map(|(role, (value, field))| render_operand(spec.format, role, *value, field))
        .collect();

    if operands.is_empty() {
        decoded.mnemonic.clone()
    } else {
        format!("{} {}", decoded.mnemonic, operands.join(", "))
    }
}

fn render_operand(format: InstructionFormat, role: &str, value: u32, field: &Field) -> String {
    if role.starts_with('R') {
        return format!("R{value:X}");
    }

    match (format, field.width()) {
        // Branch offsets are signed.
        (InstructionFormat::BType, 8) => format!("{}", value as u8 as i8),
        (_, 12) => format!("0x{value:03X}"),
        (_, 8) => format!("0x{value:02X}"),
        _ => format!("0x{value:X}"),
    }
}
