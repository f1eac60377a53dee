// analyzer/expr/is_expr.rs

use quill_syntax::{Expr, TypeExpr};

use crate::errors::SemanticError;
use crate::node_map::NodeInfo;
use crate::type_value::TypeValue;
use crate::well_known::bool_type;

use super::super::Analyzer;

impl Analyzer {
    /// `value is T`: T must be a nominal type. Always bool.
    pub(super) fn is_expr(&mut self, expr: &Expr, value: &Expr, ty: &TypeExpr) -> TypeValue {
        self.value_expr(value, None);
        let tested = self.resolve_type_expr(ty);
        match tested {
            TypeValue::Nominal(_) => {
                self.node_map.set_info(expr.id, NodeInfo::IsTest { ty: tested });
            }
            TypeValue::Unresolved => {}
            other => self.add_error(
                SemanticError::InvalidTypeTest {
                    ty: other.to_string(),
                    span: ty.span.into(),
                },
                ty.id,
                ty.span,
            ),
        }
        bool_type()
    }
}
