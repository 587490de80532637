use serde::{Deserialize, Serialize};

use crate::format::InstructionFormat;

/// Description of a single instruction of the ISA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionSpec {
    pub mnemonic: String,
    pub opcode: u16,
    pub format: InstructionFormat,
    pub description: String,

    /// Operand roles in encode order, e.g. `["Rd", "Rs", "Rt"]`.
    pub operands: Vec<String>,
    pub example: String,

    /// Latency metadata, not used by the codec.
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

const fn default_cycles() -> u32 {
    1
}

impl InstructionSpec {
    pub fn new(
        mnemonic: impl Into<String>,
        opcode: u16,
        format: InstructionFormat,
        description: impl Into<String>,
        operands: &[&str],
        example: impl Into<String>,
        cycles: u32,
    ) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            opcode,
            format,
            description: description.into(),
            operands: operands.iter().map(ToString::to_string).collect(),
            example: example.into(),
            cycles,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = cycles;
        self
    }

    #[must_use]
    pub const fn with_opcode(mut self, opcode: u16) -> Self {
        self.opcode = opcode;
        self
    }
}

/// The canonical CVERE instruction set.
#[must_use]
pub fn default_isa() -> Vec<InstructionSpec> {
    use InstructionFormat::{BType, IType, JType, MType, RType, Special};

    const REGISTERS: &[&str] = &["Rd", "Rs", "Rt"];
    const IMMEDIATE: &[&str] = &["Rd", "Imm8"];
    const MEMORY: &[&str] = &["Rd", "Rs", "Offset"];
    const BRANCH: &[&str] = &["Rc", "Offset"];

    vec![
        InstructionSpec::new("NOP", 0x0, Special, "No operation", &[], "NOP", 1),
        InstructionSpec::new(
            "ADD",
            0x1,
            RType,
            "Add two registers",
            REGISTERS,
            "ADD R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "ADDI",
            0x2,
            IType,
            "Add immediate to register",
            IMMEDIATE,
            "ADDI R3, 0x42",
            1,
        ),
        InstructionSpec::new(
            "SUB",
            0x3,
            RType,
            "Subtract registers",
            REGISTERS,
            "SUB R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "AND",
            0x4,
            RType,
            "Bitwise AND",
            REGISTERS,
            "AND R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "OR",
            0x5,
            RType,
            "Bitwise OR",
            REGISTERS,
            "OR R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "XOR",
            0x6,
            RType,
            "Bitwise XOR",
            REGISTERS,
            "XOR R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "NOT",
            0x7,
            RType,
            "Bitwise NOT",
            &["Rd", "Rs"],
            "NOT R3, R1",
            1,
        ),
        InstructionSpec::new(
            "SHL",
            0x8,
            RType,
            "Shift left",
            REGISTERS,
            "SHL R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "SHR",
            0x9,
            RType,
            "Shift right",
            REGISTERS,
            "SHR R3, R1, R2",
            1,
        ),
        InstructionSpec::new(
            "LOAD",
            0xA,
            MType,
            "Load from memory",
            MEMORY,
            "LOAD R3, R1, 0x4",
            2,
        ),
        InstructionSpec::new(
            "STORE",
            0xB,
            MType,
            "Store to memory",
            MEMORY,
            "STORE R3, R1, 0x4",
            2,
        ),
        InstructionSpec::new(
            "LOADI",
            0xC,
            IType,
            "Load immediate",
            IMMEDIATE,
            "LOADI R3, 0x42",
            1,
        ),
        InstructionSpec::new(
            "JMP",
            0xD,
            JType,
            "Unconditional jump",
            &["Addr12"],
            "JMP 0x100",
            2,
        ),
        InstructionSpec::new(
            "BEQ",
            0xE,
            BType,
            "Branch if equal to zero",
            BRANCH,
            "BEQ R1, loop",
            1,
        ),
        InstructionSpec::new(
            "BNE",
            0xF,
            BType,
            "Branch if not equal to zero",
            BRANCH,
            "BNE R1, loop",
            1,
        ),
        // Out of the 4-bit opcode space, HALT is only ever the 0xFFFF sentinel.
        InstructionSpec::new("HALT", 0xFF, Special, "Halt execution", &[], "HALT", 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_cycles_defaults_to_one() {
        let json = r#"{
            "mnemonic": "INC",
            "opcode": 3,
            "format": "I-Type",
            "description": "Increment",
            "operands": ["Rd", "Imm8"],
            "example": "INC R1, 0x1"
        }"#;

        let spec: InstructionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.cycles, 1);
        assert_eq!(spec.format, InstructionFormat::IType);
        assert_eq!(spec.operands, vec!["Rd".to_string(), "Imm8".to_string()]);
    }

    #[test]
    fn default_isa_shape() {
        let isa = default_isa();
        assert_eq!(isa.len(), 17);
        assert_eq!(isa.first().map(|s| s.mnemonic.as_str()), Some("NOP"));
        assert_eq!(isa.last().map(|s| s.opcode), Some(0xFF));

        for spec in &isa {
            assert!(spec.cycles > 0, "{}", spec.mnemonic);
            assert_ne!(spec.format, InstructionFormat::Extended);
            if spec.format.is_field_encoded() {
                assert!(spec.operands.len() <= spec.format.fields().len());
                assert!(spec.operands.len() >= spec.format.required_operands());
            }
        }
    }
}
