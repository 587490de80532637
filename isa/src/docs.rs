use std::collections::BTreeMap;

use crate::registry::InstructionRegistry;
use crate::spec::InstructionSpec;

/// Markdown reference of the ISA: one table per format, formats sorted by
/// label and instructions by opcode.
#[must_use]
pub fn generate_documentation(registry: &InstructionRegistry) -> String {
    let mut by_format: BTreeMap<&str, Vec<&InstructionSpec>> = BTreeMap::new();
    for spec in registry.all_specs() {
        by_format.entry(spec.format.label()).or_default().push(spec);
    }

    let mut doc = vec!["# CVERE ISA Reference\n".to_string()];
    for (label, mut specs) in by_format {
        specs.sort_by_key(|spec| spec.opcode);

        doc.push(format!("\n## {label} Instructions\n"));
        doc.push("| Opcode | Mnemonic | Operands | Description | Example | Cycles |".to_string());
        doc.push("|--------|----------|----------|-------------|---------|--------|".to_string());
        for spec in specs {
            doc.push(format!(
                "| 0x{:X} | {} | {} | {} | `{}` | {} |",
                spec.opcode,
                spec.mnemonic,
                spec.operands.join(", "),
                spec.description,
                spec.example,
                spec.cycles
            ));
        }
    }

    doc.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sections_sorted_by_label() {
        let doc = generate_documentation(&InstructionRegistry::with_default_isa());
        let sections: Vec<&str> = doc.lines().filter(|line| line.starts_with("## ")).collect();

        assert_eq!(
            sections,
            vec![
                "## B-Type Instructions",
                "## I-Type Instructions",
                "## J-Type Instructions",
                "## M-Type Instructions",
                "## R-Type Instructions",
                "## Special Instructions",
            ]
        );
    }

    #[test]
    fn rows_sorted_by_opcode() {
        let doc = generate_documentation(&InstructionRegistry::with_default_isa());

        let special = doc.split("## Special Instructions").nth(1).unwrap();
        let rows: Vec<&str> = special.lines().filter(|l| l.starts_with("| 0x")).collect();
        assert_eq!(
            rows,
            vec![
                "| 0x0 | NOP |  | No operation | `NOP` | 1 |",
                "| 0xFF | HALT |  | Halt execution | `HALT` | 1 |",
            ]
        );

        let i_type = doc
            .split("## I-Type Instructions")
            .nth(1)
            .and_then(|rest| rest.split("## ").next())
            .unwrap();
        let rows: Vec<&str> = i_type.lines().filter(|l| l.starts_with("| 0x")).collect();
        assert_eq!(
            rows,
            vec![
                "| 0x2 | ADDI | Rd, Imm8 | Add immediate to register | `ADDI R3, 0x42` | 1 |",
                "| 0xC | LOADI | Rd, Imm8 | Load immediate | `LOADI R3, 0x42` | 1 |",
            ]
        );
    }

    #[test]
    fn empty_registry() {
        let doc = generate_documentation(&InstructionRegistry::new());
        assert_eq!(doc, "# CVERE ISA Reference\n");
    }
}
