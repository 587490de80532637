//! # Instruction Formats
//!
//! Every CVERE instruction is a single 16-bit word. The top nibble holds the
//! opcode, the format decides how the remaining 12 bits are split:
//!
//! ```text
//! ┌────────┬──────────────────────────────────────────────┐
//! │ Format │ 15-12    11-8      7-4       3-0              │
//! ├────────┼──────────────────────────────────────────────┤
//! │ R-Type │ Op       Rd        Rs        Rt               │
//! │ I-Type │ Op       Rd        Imm8 ─────────            │
//! │ M-Type │ Op       Rd        Rs        Offset           │
//! │ J-Type │ Op       Addr12 ───────────────────           │
//! │ B-Type │ Op       Rc        Offset8 ──────            │
//! └────────┴──────────────────────────────────────────────┘
//! ```
//!
//! `Special` instructions (NOP, HALT) are whole sentinel words and `Extended`
//! is reserved for two-word instructions; neither has operand fields.

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bits holding the primary opcode in every field-encoded word.
pub const OPCODE_BITS: RangeInclusive<u8> = 12..=15;

/// Number of slots in the 4-bit primary opcode space.
pub const OPCODE_SPACE: usize = 16;

#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum InstructionFormat {
    /// Register operations.
    #[serde(rename = "R-Type")]
    RType,

    /// Immediate operations.
    #[serde(rename = "I-Type")]
    IType,

    /// Memory operations.
    #[serde(rename = "M-Type")]
    MType,

    /// Jump operations.
    #[serde(rename = "J-Type")]
    JType,

    /// Branch operations.
    #[serde(rename = "B-Type")]
    BType,

    /// Two-word instructions, no layout yet.
    Extended,

    /// Sentinel words (NOP, HALT).
    Special,
}

/// A contiguous group of bits inside an instruction word.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Field {
    /// Short label used by the diagrams.
    pub name: &'static str,
    pub msb: u8,
    pub lsb: u8,
}

impl Field {
    const fn new(name: &'static str, msb: u8, lsb: u8) -> Self {
        Self { name, msb, lsb }
    }

    #[must_use]
    pub const fn width(&self) -> u8 {
        self.msb - self.lsb + 1
    }

    #[must_use]
    pub const fn bits(&self) -> RangeInclusive<u8> {
        self.lsb..=self.msb
    }

    /// Largest value the field can hold.
    #[must_use]
    pub const fn max_value(&self) -> u32 {
        (1 << self.width()) - 1
    }
}

pub const OPCODE_FIELD: Field = Field::new("Op", 15, 12);

const R_TYPE_FIELDS: [Field; 3] = [
    Field::new("Rd", 11, 8),
    Field::new("Rs", 7, 4),
    Field::new("Rt", 3, 0),
];

const I_TYPE_FIELDS: [Field; 2] = [Field::new("Rd", 11, 8), Field::new("Imm8", 7, 0)];

const M_TYPE_FIELDS: [Field; 3] = [
    Field::new("Rd", 11, 8),
    Field::new("Rs", 7, 4),
    Field::new("Off", 3, 0),
];

const J_TYPE_FIELDS: [Field; 1] = [Field::new("Addr12", 11, 0)];

const B_TYPE_FIELDS: [Field; 2] = [Field::new("Rc", 11, 8), Field::new("Offset8", 7, 0)];

impl InstructionFormat {
    pub const ALL: [Self; 7] = [
        Self::RType,
        Self::IType,
        Self::MType,
        Self::JType,
        Self::BType,
        Self::Extended,
        Self::Special,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::RType => "R-Type",
            Self::IType => "I-Type",
            Self::MType => "M-Type",
            Self::JType => "J-Type",
            Self::BType => "B-Type",
            Self::Extended => "Extended",
            Self::Special => "Special",
        }
    }

    /// Operand fields below the opcode, in encode order.
    #[must_use]
    pub const fn fields(self) -> &'static [Field] {
        match self {
            Self::RType => &R_TYPE_FIELDS,
            Self::IType => &I_TYPE_FIELDS,
            Self::MType => &M_TYPE_FIELDS,
            Self::JType => &J_TYPE_FIELDS,
            Self::BType => &B_TYPE_FIELDS,
            Self::Extended | Self::Special => &[],
        }
    }

    /// How many operands `encode` needs at least. R-Type tolerates a
    /// missing `Rt` (two-operand forms such as NOT).
    #[must_use]
    pub const fn required_operands(self) -> usize {
        match self {
            Self::RType => 2,
            _ => self.fields().len(),
        }
    }

    /// Whether the word carries the opcode in bits 15-12.
    #[must_use]
    pub const fn is_field_encoded(self) -> bool {
        !matches!(self, Self::Extended | Self::Special)
    }
}

impl Display for InstructionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InstructionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.label() == s)
            .ok_or_else(|| format!("unknown instruction format: {s}"))
    }
}
