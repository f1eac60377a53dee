// analyzer/expr/binary.rs
//
// Built-in binary and unary operators on the primitive types.

use quill_syntax::{BinaryOp, Expr, UnaryOp};

use crate::errors::SemanticError;
use crate::type_value::TypeValue;
use crate::well_known::{bool_type, int_type, string_type};

use super::super::Analyzer;

impl Analyzer {
    pub(super) fn binary_expr(&mut self, expr: &Expr, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> TypeValue {
        let left = self.value_expr(lhs, None);
        let right = self.value_expr(rhs, None);
        let unresolved = left.is_unresolved() || right.is_unresolved();
        let int_ty = int_type();
        let bool_ty = bool_type();

        let (valid, result) = match op {
            BinaryOp::Add if left == string_type() && right == string_type() => (true, string_type()),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                (left == int_ty && right == int_ty, int_ty.clone())
            }
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => (left == int_ty && right == int_ty, bool_ty.clone()),
            BinaryOp::And | BinaryOp::Or => (left == bool_ty && right == bool_ty, bool_ty.clone()),
            BinaryOp::Eq | BinaryOp::Ne => {
                let types = self.types();
                let comparable = types.is_assignable(&left, &right) || types.is_assignable(&right, &left);
                (comparable, bool_ty.clone())
            }
        };

        if unresolved {
            // Only the result kind is known.
            return if result == bool_ty { bool_ty } else { TypeValue::Unresolved };
        }
        if !valid {
            self.add_error(
                SemanticError::InvalidOperand {
                    op: op.as_str().to_string(),
                    operand: format!("{} and {}", left, right),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
        }
        result
    }

    pub(super) fn unary_expr(&mut self, expr: &Expr, op: UnaryOp, operand: &Expr) -> TypeValue {
        if op.is_inc_dec() {
            return self.inc_dec_expr(expr, op, operand);
        }
        let ty = self.value_expr(operand, None);
        let expected = match op {
            UnaryOp::Not => bool_type(),
            _ => int_type(),
        };
        if !ty.is_unresolved() && ty != expected {
            self.add_error(
                SemanticError::InvalidOperand {
                    op: op.as_str().to_string(),
                    operand: ty.to_string(),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
        }
        expected
    }
}
