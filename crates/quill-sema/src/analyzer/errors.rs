//! Error reporting helpers for the analyzer.

use quill_identity::Span;
use quill_syntax::NodeId;

use crate::errors::SemanticError;
use crate::type_value::TypeValue;

use super::Analyzer;

impl Analyzer {
    /// Helper to add a type error
    pub(super) fn add_error(&mut self, error: SemanticError, node: NodeId, span: Span) {
        self.diagnostics.add(node, span, error);
    }

    /// Report a mismatch unless `found` is assignable to `expected`. Returns
    /// whether the value was accepted. `Unresolved` on either side is
    /// accepted silently; its cause was already reported.
    pub(super) fn check_assignable(
        &mut self,
        expected: &TypeValue,
        found: &TypeValue,
        node: NodeId,
        span: Span,
    ) -> bool {
        if expected.is_unresolved() || found.is_unresolved() {
            return true;
        }
        if found.is_void() && !expected.is_void() {
            self.add_error(SemanticError::VoidValueUsed { span: span.into() }, node, span);
            return false;
        }
        if self.types().is_assignable(expected, found) {
            return true;
        }
        self.type_mismatch(expected, found, node, span);
        false
    }

    pub(super) fn type_mismatch(&mut self, expected: &TypeValue, found: &TypeValue, node: NodeId, span: Span) {
        self.add_error(
            SemanticError::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
                span: span.into(),
            },
            node,
            span,
        );
    }
}
