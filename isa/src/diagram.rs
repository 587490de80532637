//! ASCII renderings of instruction layouts.
//!
//! [`visualize`] draws the layout of an instruction's format:
//!
//! ```text
//! ┌────────┬────────┬─────────────────┐
//! │   Op   │   Rd   │      Imm8       │
//! │ (4bit) │ (4bit) │     (8bit)      │
//! └────────┴────────┴─────────────────┘
//!   15-12     11-8          7-0
//! ```
//!
//! [`bit_layout`] shows a concrete word bit by bit under its field names.

use crate::bitwise::Bits;
use crate::codec::{HALT_WORD, NOP_WORD};
use crate::error::IsaError;
use crate::format::{Field, InstructionFormat, OPCODE_BITS, OPCODE_FIELD};
use crate::registry::InstructionRegistry;

/// Columns taken by one nibble inside a box cell.
const NIBBLE_WIDTH: usize = 8;

/// Header lines plus the bit-field box of the format of `mnemonic`.
///
/// # Errors
/// [`IsaError::UnknownMnemonic`] if `mnemonic` is not registered.
pub fn visualize(registry: &InstructionRegistry, mnemonic: &str) -> Result<String, IsaError> {
    let spec = registry
        .lookup_by_mnemonic(mnemonic)
        .ok_or_else(|| IsaError::UnknownMnemonic(mnemonic.to_string()))?;

    let mut lines = vec![
        format!("{} - {}", spec.mnemonic, spec.description),
        format!("Opcode: 0x{:X} | Format: {}", spec.opcode, spec.format),
        format!("Example: {}", spec.example),
        String::new(),
    ];
    lines.extend(format_box(spec.format));

    Ok(lines.join("\n"))
}

/// Box diagram of a format. Formats without fields have no diagram.
#[must_use]
pub fn format_box(format: InstructionFormat) -> Vec<String> {
    if !format.is_field_encoded() {
        return Vec::new();
    }

    let cells: Vec<(Field, usize)> = std::iter::once(&OPCODE_FIELD)
        .chain(format.fields())
        .map(|field| (*field, cell_width(field)))
        .collect();

    let ranges: Vec<String> = cells
        .iter()
        .map(|(field, width)| {
            let range = format!("{}-{}", field.msb, field.lsb);
            format!("{range:^width$}", width = *width)
        })
        .collect();

    vec![
        box_row(&cells, ["┌", "┬", "┐"], |_, width| "─".repeat(width)),
        box_row(&cells, ["│", "│", "│"], |field, width| {
            format!("{:^width$}", field.name)
        }),
        box_row(&cells, ["│", "│", "│"], |field, width| {
            format!("{:^width$}", format!("({}bit)", field.width()))
        }),
        box_row(&cells, ["└", "┴", "┘"], |_, width| "─".repeat(width)),
        format!(" {}", ranges.join(" ")).trim_end().to_string(),
    ]
}

fn box_row(
    cells: &[(Field, usize)],
    [left, separator, right]: [&str; 3],
    content: impl Fn(&Field, usize) -> String,
) -> String {
    let inner: Vec<String> = cells
        .iter()
        .map(|(field, width)| content(field, *width))
        .collect();
    format!("{left}{}{right}", inner.join(separator))
}

/// A field of `n` nibbles spans `n` cells plus the `n - 1` separators between them.
fn cell_width(field: &Field) -> usize {
    let nibbles = usize::from(field.width()).div_ceil(4);
    nibbles * NIBBLE_WIDTH + nibbles - 1
}

/// Bit by bit dump of `word`, with the field layout of the instruction it
/// decodes to:
///
/// ```text
/// INS: ADD R3, R1, R2
/// POS: |..........1 ..................0|
///      |5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|
/// RAW: |0_0_0_1_0_0_1_1_0_0_0_1_0_0_1_0|
/// FMT: |Op_____|Rd_____|Rs_____|Rt_____|
/// ```
#[must_use]
pub fn bit_layout(registry: &InstructionRegistry, word: u16) -> String {
    let listing = registry.codec().disassemble(0, word);
    // Drop the "AAAA: WWWW  " prefix of the listing line.
    let instruction = listing.get(12..).unwrap_or_default();

    let mut raw_bits: Vec<String> = Vec::with_capacity(16);
    for bit in (0..16).rev() {
        raw_bits.push(if word.get_bit(bit) { "1" } else { "0" }.to_string());
    }

    let mut lines = vec![
        format!("INS: {instruction}"),
        "POS: |..........1 ..................0|".to_string(),
        "     |5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|".to_string(),
        format!("RAW: |{}|", raw_bits.join("_")),
    ];

    let format = match word {
        NOP_WORD | HALT_WORD => None,
        _ => registry
            .spec_for_opcode(word.get_bits(OPCODE_BITS))
            .map(|spec| spec.format)
            .filter(|format| format.is_field_encoded()),
    };

    if let Some(format) = format {
        let fields: Vec<String> = std::iter::once(&OPCODE_FIELD)
            .chain(format.fields())
            .map(|field| {
                let width = usize::from(field.width()) * 2 - 1;
                format!("{:_<width$}", field.name)
            })
            .collect();
        lines.push(format!("FMT: |{}|", fields.join("|")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn r_type_box() {
        let lines = format_box(InstructionFormat::RType);
        assert_eq!(lines[0], "┌────────┬────────┬────────┬────────┐");
        assert_eq!(lines[1], "│   Op   │   Rd   │   Rs   │   Rt   │");
        assert_eq!(lines[2], "│ (4bit) │ (4bit) │ (4bit) │ (4bit) │");
        assert_eq!(lines[3], "└────────┴────────┴────────┴────────┘");
        assert_eq!(
            lines[4].split_whitespace().collect::<Vec<_>>(),
            vec!["15-12", "11-8", "7-4", "3-0"]
        );
    }

    #[test]
    fn wide_fields_span_cells() {
        let i_type = format_box(InstructionFormat::IType);
        assert_eq!(i_type[0], "┌────────┬────────┬─────────────────┐");
        assert_eq!(i_type[1], "│   Op   │   Rd   │      Imm8       │");
        assert_eq!(i_type[2], "│ (4bit) │ (4bit) │     (8bit)      │");

        let j_type = format_box(InstructionFormat::JType);
        assert_eq!(j_type[0], "┌────────┬──────────────────────────┐");
        assert_eq!(j_type[2], "│ (4bit) │         (12bit)          │");
        assert_eq!(
            j_type[4].split_whitespace().collect::<Vec<_>>(),
            vec!["15-12", "11-0"]
        );
    }

    #[test]
    fn every_box_has_the_same_width() {
        let widths: Vec<usize> = InstructionFormat::ALL
            .into_iter()
            .filter(|format| format.is_field_encoded())
            .map(|format| format_box(format)[0].chars().count())
            .collect();

        assert!(widths.iter().all(|width| *width == widths[0]), "{widths:?}");
    }

    #[test]
    fn no_box_without_fields() {
        assert!(format_box(InstructionFormat::Special).is_empty());
        assert!(format_box(InstructionFormat::Extended).is_empty());
    }

    #[test]
    fn visualize_header() {
        let registry = InstructionRegistry::with_default_isa();

        let text = visualize(&registry, "LOADI").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "LOADI - Load immediate");
        assert_eq!(lines[1], "Opcode: 0xC | Format: I-Type");
        assert_eq!(lines[2], "Example: LOADI R3, 0x42");
        assert_eq!(lines[3], "");
        assert_eq!(lines[5], "│   Op   │   Rd   │      Imm8       │");

        let halt = visualize(&registry, "HALT").unwrap();
        assert_eq!(halt.lines().count(), 3);

        assert_eq!(
            visualize(&registry, "MUL"),
            Err(IsaError::UnknownMnemonic("MUL".to_string()))
        );
    }

    #[test]
    fn bit_layout_of_add() {
        let registry = InstructionRegistry::with_default_isa();
        assert_eq!(
            bit_layout(&registry, 0x1312),
            "INS: ADD R3, R1, R2\n\
             POS: |..........1 ..................0|\n     \
             |5_4_3_2_1_0_9_8_7_6_5_4_3_2_1_0|\n\
             RAW: |0_0_0_1_0_0_1_1_0_0_0_1_0_0_1_0|\n\
             FMT: |Op_____|Rd_____|Rs_____|Rt_____|"
        );
    }

    #[test]
    fn bit_layout_fmt_lines() {
        let registry = InstructionRegistry::with_default_isa();

        let fmt = |word: u16| {
            bit_layout(&registry, word)
                .lines()
                .find(|line| line.starts_with("FMT"))
                .map(ToString::to_string)
        };

        assert_eq!(
            fmt(0xC542).as_deref(),
            Some("FMT: |Op_____|Rd_____|Imm8___________|")
        );
        assert_eq!(
            fmt(0xD100).as_deref(),
            Some("FMT: |Op_____|Addr12_________________|")
        );
        assert_eq!(fmt(0xFFFF), None);
        assert_eq!(fmt(0x0000), None);
    }
}
