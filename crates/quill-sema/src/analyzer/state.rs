// Per-analysis mutable state structs for the analyzer.

use rustc_hash::FxHashMap;

use quill_identity::Span;
use quill_syntax::NodeId;

use crate::errors::SemanticError;
use crate::type_value::TypeValue;

use super::TypeError;

/// Error collector. Analysis continues after a recorded error; the pass fails
/// at the end if anything was recorded.
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    errors: Vec<TypeError>,
}

impl Diagnostics {
    pub fn add(&mut self, node: NodeId, span: Span, error: SemanticError) {
        tracing::trace!(%node, %error, "semantic error");
        self.errors.push(TypeError::new(error, node, span));
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn into_errors(self) -> Vec<TypeError> {
        self.errors
    }
}

/// `var`s declared directly in the script body. Slots are generated in
/// declaration order; a redeclared name rebinds to a fresh slot.
#[derive(Debug, Default)]
pub(crate) struct PrivateGlobals {
    slots: Vec<TypeValue>,
    names: FxHashMap<String, usize>,
}

impl PrivateGlobals {
    pub fn declare(&mut self, name: &str, ty: TypeValue) -> usize {
        let slot = self.slots.len();
        self.slots.push(ty);
        self.names.insert(name.to_string(), slot);
        slot
    }

    pub fn lookup(&self, name: &str) -> Option<(usize, &TypeValue)> {
        let slot = *self.names.get(name)?;
        Some((slot, &self.slots[slot]))
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }
}
