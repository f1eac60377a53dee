// analyzer/expr/assign.rs
//
// Assignment and increment/decrement targets. A target is either a plain
// store (`Direct`) or an indexer accessed through getter/setter calls
// (`CallBased`).

use quill_syntax::{Expr, ExprKind, UnaryOp};

use crate::errors::SemanticError;
use crate::node_map::NodeInfo;
use crate::storage::AssignTarget;
use crate::type_value::{FuncValue, TypeValue};

use super::super::{Analyzer, IdentifierInfo};
use super::access::MemberTarget;
use super::call::ArgInfo;

impl Analyzer {
    pub(super) fn assign_expr(&mut self, expr: &Expr, target: &Expr, value: &Expr) -> TypeValue {
        let Some(target) = self.resolve_assign_target(target) else {
            self.value_expr(value, None);
            return TypeValue::Unresolved;
        };
        let expected = match &target {
            AssignTarget::Direct { ty, .. } => ty.clone(),
            AssignTarget::CallBased { setter, .. } => self
                .types()
                .func_type(setter)
                .params
                .last()
                .cloned()
                .unwrap_or(TypeValue::Unresolved),
        };
        let found = self.value_expr(value, Some(&expected));
        self.check_assignable(&expected, &found, value.id, value.span);

        // The stored value replaces whatever the narrowing proved.
        if let AssignTarget::Direct { storage, .. } = &target {
            self.func.overrides.remove(storage);
        }
        let ty = target.ty().clone();
        self.node_map.set_info(expr.id, NodeInfo::Assign(target));
        ty
    }

    /// Analyze `target` as the left side of an assignment. `None` when it is
    /// not assignable (reported) or did not resolve.
    pub(super) fn resolve_assign_target(&mut self, target: &Expr) -> Option<AssignTarget> {
        match &target.kind {
            ExprKind::Identifier { name, type_args } => {
                let args = self.resolve_type_args(type_args);
                match self.get_identifier_info(name, &args) {
                    IdentifierInfo::Var { storage, ty, declared } => {
                        self.node_map.set_info(target.id, NodeInfo::Storage(storage.clone()));
                        self.node_map.set_type(target.id, ty);
                        Some(AssignTarget::Direct { storage, ty: declared })
                    }
                    IdentifierInfo::Func(_) | IdentifierInfo::Type(_) => {
                        self.node_map.set_type(target.id, TypeValue::Unresolved);
                        self.not_assignable(target);
                        None
                    }
                    info => {
                        let ty = self.identifier_value(target, name, info);
                        self.node_map.set_type(target.id, ty);
                        None
                    }
                }
            }
            ExprKind::Member {
                object,
                name,
                type_args,
            } => {
                let resolved = self.resolve_member_expr(target, object, name, type_args);
                match resolved {
                    MemberTarget::Storage { storage, ty } if storage.is_writable() => {
                        self.node_map.set_info(target.id, NodeInfo::Storage(storage.clone()));
                        self.node_map.set_type(target.id, ty.clone());
                        Some(AssignTarget::Direct { storage, ty })
                    }
                    MemberTarget::Storage { .. } | MemberTarget::Func { .. } => {
                        self.node_map.set_type(target.id, TypeValue::Unresolved);
                        self.not_assignable(target);
                        None
                    }
                    MemberTarget::Unresolved => {
                        self.node_map.set_type(target.id, TypeValue::Unresolved);
                        None
                    }
                }
            }
            ExprKind::Indexer { object, index } => self.indexer_target(target, object, index),
            _ => {
                self.expr(target, None);
                self.not_assignable(target);
                None
            }
        }
    }

    /// `object[index]` as a target: needs both accessors, and the setter must
    /// take the getter's arguments plus the value.
    fn indexer_target(&mut self, target: &Expr, object: &Expr, index: &Expr) -> Option<AssignTarget> {
        let object_ty = self.value_expr(object, None);
        let index_ty = self.value_expr(index, None);
        self.node_map.set_type(target.id, TypeValue::Unresolved);
        let (getter, setter) = self.resolve_indexer(target, &object_ty)?;
        let (getter, setter) = match (getter, setter) {
            (Some(getter), Some(setter)) => (getter, setter),
            (Some(_), None) => {
                self.add_error(
                    SemanticError::ReadOnlyIndexer {
                        ty: object_ty.to_string(),
                        span: target.span.into(),
                    },
                    target.id,
                    target.span,
                );
                return None;
            }
            _ => {
                self.add_error(
                    SemanticError::WriteOnlyIndexer {
                        ty: object_ty.to_string(),
                        span: target.span.into(),
                    },
                    target.id,
                    target.span,
                );
                return None;
            }
        };

        let types = self.types();
        let get_sig = types.func_type(&getter);
        let set_sig = types.func_type(&setter);
        if !self.check_args(&get_sig.params, &[ArgInfo::of(index, index_ty)], target) {
            return None;
        }
        if set_sig.params.len() != get_sig.params.len() + 1 {
            self.add_error(
                SemanticError::OperatorSignatureMismatch {
                    ty: object_ty.to_string(),
                    op: "indexer set".to_string(),
                    detail: format!("expected {} parameters", get_sig.params.len() + 1),
                    span: target.span.into(),
                },
                target.id,
                target.span,
            );
            return None;
        }

        self.node_map.set_type(target.id, get_sig.ret.clone());
        Some(AssignTarget::CallBased {
            object: object.id,
            object_type: object_ty,
            getter,
            setter,
            args: vec![index.id],
            ty: get_sig.ret,
        })
    }

    fn not_assignable(&mut self, target: &Expr) {
        self.add_error(SemanticError::NotAssignable { span: target.span.into() }, target.id, target.span);
    }

    // ========================================================================
    // ++ / --
    // ========================================================================

    /// `x++`, `--obj.field`, `list[i]++`. The target type's reserved
    /// `operator++`/`operator--` member takes no arguments and returns the
    /// new value, which must be storable back into the target.
    pub(super) fn inc_dec_expr(&mut self, expr: &Expr, op: UnaryOp, operand: &Expr) -> TypeValue {
        let op_name = op
            .operator_name()
            .unwrap_or_else(|| panic!("INTERNAL ERROR: {} is not an increment/decrement", op.as_str()));
        let Some(target) = self.resolve_assign_target(operand) else {
            return TypeValue::Unresolved;
        };
        let ty = target.ty().clone();
        if ty.is_unresolved() {
            return TypeValue::Unresolved;
        }

        let found = ty
            .as_nominal()
            .and_then(|nominal| self.types().member_func_value(nominal, &op_name, &[]).ok());
        let Some(operator) = found else {
            self.add_error(
                SemanticError::OperatorNotFound {
                    ty: ty.to_string(),
                    op: op_name.to_string(),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
            return TypeValue::Unresolved;
        };

        let (params, ret) = self.operator_signature(&operator);
        if params != 0 {
            self.operator_mismatch(expr, &ty, &op_name.to_string(), "expected no parameters".to_string());
            return TypeValue::Unresolved;
        }
        match &target {
            AssignTarget::Direct { storage, .. } => {
                if ret != ty {
                    self.operator_mismatch(expr, &ty, &op_name.to_string(), format!("returns {ret}"));
                    return TypeValue::Unresolved;
                }
                self.func.overrides.remove(storage);
            }
            AssignTarget::CallBased { setter, getter, .. } => {
                let types = self.types();
                let stored = types.func_type(setter).params.last().cloned();
                let read = types.func_type(getter).ret;
                if stored.as_ref() != Some(&ret) || read != ty {
                    self.operator_mismatch(expr, &ty, &op_name.to_string(), format!("returns {ret}"));
                    return TypeValue::Unresolved;
                }
            }
        }

        tracing::trace!(operator = %operator, prefix = op.is_prefix(), "inc/dec");
        self.node_map.set_info(
            expr.id,
            NodeInfo::IncDec {
                target,
                operator,
                is_prefix: op.is_prefix(),
            },
        );
        ty
    }

    /// Parameter count and return type of an operator member.
    fn operator_signature(&self, operator: &FuncValue) -> (usize, TypeValue) {
        let types = self.types();
        let info = types.func_info(&operator.id);
        // Sequence operators need `func_type` for the `Seq<T>` wrap.
        if operator.is_non_generic() && !info.is_sequence {
            return (info.params.len(), info.ret.clone());
        }
        let sig = types.func_type(operator);
        (sig.params.len(), sig.ret)
    }

    fn operator_mismatch(&mut self, expr: &Expr, ty: &TypeValue, op: &str, detail: String) {
        self.add_error(
            SemanticError::OperatorSignatureMismatch {
                ty: ty.to_string(),
                op: op.to_string(),
                detail,
                span: expr.span.into(),
            },
            expr.id,
            expr.span,
        );
    }
}
