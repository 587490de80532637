use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::format::OPCODE_SPACE;
use crate::registry::InstructionRegistry;

/// How much of the 4-bit opcode space the registry uses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingSpaceAnalysis {
    pub total_instructions: usize,
    pub used_opcodes: usize,
    pub available_opcodes: usize,
    pub utilization_percent: f64,

    /// Instruction count per format label.
    pub format_distribution: BTreeMap<String, usize>,
}

impl InstructionRegistry {
    /// Opcodes outside the 4-bit field (HALT's `0xFF`) don't take a slot.
    #[must_use]
    pub fn analyze_encoding_space(&self) -> EncodingSpaceAnalysis {
        let used_opcodes = self
            .opcodes()
            .filter(|opcode| usize::from(*opcode) < OPCODE_SPACE)
            .count();

        let mut format_distribution = BTreeMap::new();
        for spec in self.all_specs() {
            *format_distribution
                .entry(spec.format.label().to_string())
                .or_insert(0) += 1;
        }

        EncodingSpaceAnalysis {
            total_instructions: self.len(),
            used_opcodes,
            available_opcodes: OPCODE_SPACE - used_opcodes,
            utilization_percent: used_opcodes as f64 / OPCODE_SPACE as f64 * 100.0,
            format_distribution,
        }
    }
}

impl Display for EncodingSpaceAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total_instructions: {}", self.total_instructions)?;
        writeln!(f, "used_opcodes: {}", self.used_opcodes)?;
        writeln!(f, "available_opcodes: {}", self.available_opcodes)?;
        writeln!(f, "utilization_percent: {:.1}", self.utilization_percent)?;
        write!(f, "format_distribution:")?;
        for (label, count) in &self.format_distribution {
            write!(f, "\n  {label}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_isa_fills_the_opcode_space() {
        let analysis = InstructionRegistry::with_default_isa().analyze_encoding_space();

        assert_eq!(analysis.total_instructions, 17);
        assert_eq!(analysis.used_opcodes, 16);
        assert_eq!(analysis.available_opcodes, 0);
        assert!((analysis.utilization_percent - 100.0).abs() < f64::EPSILON);

        let distribution: Vec<(&str, usize)> = analysis
            .format_distribution
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        assert_eq!(
            distribution,
            vec![
                ("B-Type", 2),
                ("I-Type", 2),
                ("J-Type", 1),
                ("M-Type", 2),
                ("R-Type", 8),
                ("Special", 2),
            ]
        );
    }

    #[test]
    fn removing_frees_a_slot() {
        let mut registry = InstructionRegistry::with_default_isa();
        registry.remove("SHR");
        registry.remove("HALT");

        let analysis = registry.analyze_encoding_space();
        assert_eq!(analysis.total_instructions, 15);
        assert_eq!(analysis.used_opcodes, 15);
        assert_eq!(analysis.available_opcodes, 1);
        assert!((analysis.utilization_percent - 93.75).abs() < f64::EPSILON);
        assert_eq!(analysis.format_distribution["R-Type"], 7);
    }

    #[test]
    fn empty_registry() {
        let analysis = InstructionRegistry::new().analyze_encoding_space();
        assert_eq!(analysis.used_opcodes, 0);
        assert_eq!(analysis.available_opcodes, 16);
        assert!(analysis.format_distribution.is_empty());
    }

    #[test]
    fn display() {
        let text = InstructionRegistry::with_default_isa()
            .analyze_encoding_space()
            .to_string();

        assert!(text.starts_with("total_instructions: 17\nused_opcodes: 16\n"));
        assert!(text.contains("utilization_percent: 100.0"));
        assert!(text.ends_with("  Special: 2"));
    }
}
