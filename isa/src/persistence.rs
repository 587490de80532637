//! JSON import and export of the registry.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "instructions": [
//!     { "mnemonic": "ADD", "opcode": 1, "format": "R-Type", ... }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::registry::InstructionRegistry;
use crate::spec::InstructionSpec;

pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsaDocument {
    pub version: String,
    pub instructions: Vec<InstructionSpec>,
}

impl InstructionRegistry {
    #[must_use]
    pub fn to_document(&self) -> IsaDocument {
        IsaDocument {
            version: DOCUMENT_VERSION.to_string(),
            instructions: self.all_specs().into_iter().cloned().collect(),
        }
    }

    /// Builds a registry adding the document entries in order.
    ///
    /// # Errors
    /// The first [`crate::error::IsaError::OpcodeConflict`] among the entries.
    pub fn from_document(document: IsaDocument) -> Result<Self, PersistenceError> {
        if document.version != DOCUMENT_VERSION {
            tracing::warn!(
                "ISA document version {} differs from {DOCUMENT_VERSION}",
                document.version
            );
        }

        let mut registry = Self::new();
        for spec in document.instructions {
            registry.add(spec)?;
        }
        Ok(registry)
    }

    /// # Errors
    /// Serialization failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    /// # Errors
    /// Malformed JSON, unknown format labels or conflicting opcodes.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let document: IsaDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// # Errors
    /// I/O or serialization failures.
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        tracing::info!("exported {} instructions to {}", self.len(), path.display());
        Ok(())
    }

    /// Replaces the whole registry with the content of the document at `path`.
    /// On any failure the registry keeps its previous content.
    ///
    /// # Errors
    /// I/O failures, malformed documents or conflicting opcodes.
    pub fn import_json(&mut self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let imported = Self::from_json(&fs::read_to_string(path)?)?;
        tracing::info!(
            "imported {} instructions from {}",
            imported.len(),
            path.display()
        );
        *self = imported;
        Ok(())
    }
}
