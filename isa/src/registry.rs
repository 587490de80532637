//! # Instruction Registry
//!
//! Single source of truth for which instructions exist and how they are
//! identified. Specs are owned by a map keyed by mnemonic; a second map
//! indexes them by opcode. Both maps are only touched by [`InstructionRegistry::add`]
//! and [`InstructionRegistry::remove`], which keep the opcode index a bijection
//! over the live opcodes:
//!
//! ```text
//!   specs                       by_opcode
//!   ┌────────┬──────────────┐   ┌──────┬────────┐
//!   │ "ADD"  │ {op: 0x1..}  │◄──│ 0x1  │ "ADD"  │
//!   │ "JMP"  │ {op: 0xD..}  │◄──│ 0xD  │ "JMP"  │
//!   │ "HALT" │ {op: 0xFF..} │◄──│ 0xFF │ "HALT" │
//!   └────────┴──────────────┘   └──────┴────────┘
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::error::IsaError;
use crate::spec::{InstructionSpec, default_isa};

#[derive(Debug, Clone, Default)]
pub struct InstructionRegistry {
    specs: HashMap<String, InstructionSpec>,
    by_opcode: BTreeMap<u16, String>,
}

impl InstructionRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry loaded with the canonical CVERE instruction set.
    ///
    /// # Panics
    /// Never in practice: the default set is conflict-free, which the
    /// registry tests check.
    #[must_use]
    pub fn with_default_isa() -> Self {
        let mut registry = Self::new();
        for spec in default_isa() {
            registry
                .add(spec)
                .expect("default ISA must not contain opcode conflicts");
        }
        registry
    }

    /// Inserts `spec`, replacing any previous spec with the same mnemonic.
    ///
    /// # Errors
    /// [`IsaError::OpcodeConflict`] when the opcode already belongs to another
    /// mnemonic. The registry is left untouched in that case.
    pub fn add(&mut self, spec: InstructionSpec) -> Result<(), IsaError> {
        if let Some(existing) = self.by_opcode.get(&spec.opcode)
            && *existing != spec.mnemonic
        {
            return Err(IsaError::OpcodeConflict {
                opcode: spec.opcode,
                existing: existing.clone(),
                mnemonic: spec.mnemonic,
            });
        }

        if let Some(previous) = self.specs.get(&spec.mnemonic)
            && previous.opcode != spec.opcode
        {
            tracing::debug!(
                "{} moves from opcode 0x{:X} to 0x{:X}",
                spec.mnemonic,
                previous.opcode,
                spec.opcode
            );
            self.by_opcode.remove(&previous.opcode);
        }

        tracing::debug!(
            "registering {} at opcode 0x{:X}",
            spec.mnemonic,
            spec.opcode
        );
        self.by_opcode.insert(spec.opcode, spec.mnemonic.clone());
        self.specs.insert(spec.mnemonic.clone(), spec);

        Ok(())
    }

    /// Removes `mnemonic` and frees its opcode. Absent mnemonics are ignored.
    pub fn remove(&mut self, mnemonic: &str) -> Option<InstructionSpec> {
        let spec = self.specs.remove(mnemonic)?;

        if self
            .by_opcode
            .get(&spec.opcode)
            .is_some_and(|owner| owner == mnemonic)
        {
            self.by_opcode.remove(&spec.opcode);
        }

        tracing::debug!("removed {mnemonic} (opcode 0x{:X})", spec.opcode);
        Some(spec)
    }

    #[must_use]
    pub fn lookup_by_mnemonic(&self, mnemonic: &str) -> Option<&InstructionSpec> {
        self.specs.get(mnemonic)
    }

    #[must_use]
    pub fn lookup_by_opcode(&self, opcode: u16) -> Option<&str> {
        self.by_opcode.get(&opcode).map(String::as_str)
    }

    /// Spec owning `opcode`, if any.
    #[must_use]
    pub fn spec_for_opcode(&self, opcode: u16) -> Option<&InstructionSpec> {
        self.lookup_by_opcode(opcode)
            .and_then(|mnemonic| self.lookup_by_mnemonic(mnemonic))
    }

    /// Every registered spec, ordered by opcode and then by mnemonic.
    #[must_use]
    pub fn all_specs(&self) -> Vec<&InstructionSpec> {
        let mut specs: Vec<&InstructionSpec> = self.specs.values().collect();
        specs.sort_by(|a, b| (a.opcode, &a.mnemonic).cmp(&(b.opcode, &b.mnemonic)));
        specs
    }

    /// Registered opcodes in ascending order.
    pub fn opcodes(&self) -> impl Iterator<Item = u16> + '_ {
        self.by_opcode.keys().copied()
    }

    #[must_use]
    pub fn contains(&self, mnemonic: &str) -> bool {
        self.specs.contains_key(mnemonic)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn clear(&mut self) {
        self.specs.clear();
        self.by_opcode.clear();
    }
}
