// analyzer/expr/mod.rs
//
// Expression analysis: every expression gets a type recorded in the node map,
// plus a kind-specific NodeInfo where the runtime needs one.

mod access;
mod assign;
mod binary;
mod call;
mod is_expr;

use quill_syntax::{Expr, ExprKind, TypeExpr};

use crate::errors::SemanticError;
use crate::node_map::NodeInfo;
use crate::type_value::{FuncValue, TypeValue};
use crate::well_known::{bool_type, int_type, string_type};

use super::{Analyzer, IdentifierInfo};

impl Analyzer {
    /// Analyze `expr` and record its type. `expected` is a hint (used to type
    /// lambda parameters), never a check.
    pub(super) fn expr(&mut self, expr: &Expr, expected: Option<&TypeValue>) -> TypeValue {
        let ty = match &expr.kind {
            ExprKind::Identifier { name, type_args } => {
                let args = self.resolve_type_args(type_args);
                let info = self.get_identifier_info(name, &args);
                self.identifier_value(expr, name, info)
            }
            ExprKind::IntLiteral(_) => int_type(),
            ExprKind::BoolLiteral(_) => bool_type(),
            ExprKind::StringLiteral(_) => string_type(),
            ExprKind::Binary { op, lhs, rhs } => self.binary_expr(expr, *op, lhs, rhs),
            ExprKind::Unary { op, operand } => self.unary_expr(expr, *op, operand),
            ExprKind::Assign { target, value } => self.assign_expr(expr, target, value),
            ExprKind::Call { callee, args } => self.call_expr(expr, callee, args),
            ExprKind::Lambda(lambda) => self.lambda_expr(expr, lambda, expected),
            ExprKind::Member {
                object,
                name,
                type_args,
            } => self.member_expr(expr, object, name, type_args),
            ExprKind::Indexer { object, index } => self.indexer_expr(expr, object, index),
            ExprKind::Is { value, ty } => self.is_expr(expr, value, ty),
        };
        self.node_map.set_type(expr.id, ty.clone());
        ty
    }

    /// Like [`Analyzer::expr`] but the expression must produce a value.
    pub(super) fn value_expr(&mut self, expr: &Expr, expected: Option<&TypeValue>) -> TypeValue {
        let ty = self.expr(expr, expected);
        if ty.is_void() {
            self.add_error(SemanticError::VoidValueUsed { span: expr.span.into() }, expr.id, expr.span);
            return TypeValue::Unresolved;
        }
        ty
    }

    pub(super) fn resolve_type_args(&mut self, type_args: &[TypeExpr]) -> Vec<TypeValue> {
        type_args.iter().map(|arg| self.resolve_type_expr(arg)).collect()
    }

    /// Turn a resolved identifier into a value, recording storage or function
    /// info on `expr`.
    pub(super) fn identifier_value(&mut self, expr: &Expr, name: &str, info: IdentifierInfo) -> TypeValue {
        match info {
            IdentifierInfo::Var { storage, ty, .. } => {
                self.node_map.set_info(expr.id, NodeInfo::Storage(storage));
                ty
            }
            IdentifierInfo::Func(func) => self.func_value(expr, func),
            IdentifierInfo::Type(_) => {
                self.add_error(
                    SemanticError::TypeNotValue {
                        name: name.to_string(),
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                TypeValue::Unresolved
            }
            IdentifierInfo::NotFound => {
                self.add_error(
                    SemanticError::UndefinedIdentifier {
                        name: name.to_string(),
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                TypeValue::Unresolved
            }
            IdentifierInfo::Ambiguous(count) => {
                self.add_error(
                    SemanticError::AmbiguousIdentifier {
                        name: name.to_string(),
                        count,
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                TypeValue::Unresolved
            }
        }
    }

    /// A function used as a value (not called): every type argument must be
    /// known.
    pub(super) fn func_value(&mut self, expr: &Expr, func: FuncValue) -> TypeValue {
        if let Some(param) = unbound_own_param(&func) {
            self.add_error(
                SemanticError::CannotInferTypeArgs {
                    func: func.to_string(),
                    param,
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
            return TypeValue::Unresolved;
        }
        let sig = self.types().func_type(&func);
        self.node_map.set_info(expr.id, NodeInfo::Func(func));
        TypeValue::from(sig)
    }
}

/// First of `func`'s own type parameters still bound to itself.
pub(super) fn unbound_own_param(func: &FuncValue) -> Option<String> {
    func.type_args.args().iter().find_map(|arg| match arg {
        TypeValue::TypeParam(param) if param.owner == func.id => Some(param.name.to_string()),
        _ => None,
    })
}
