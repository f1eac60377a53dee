// analyzer/expr/access.rs
//
// Member access (`obj.name<args>`, `Type.name`) and indexer reads.

use quill_identity::Name;
use quill_syntax::{Expr, ExprKind, NodeId, TypeExpr};

use crate::errors::SemanticError;
use crate::metadata::TypeKind;
use crate::node_map::NodeInfo;
use crate::storage::StorageInfo;
use crate::type_value::{FuncValue, NominalType, TypeValue, VarValue};
use crate::type_value_service::MemberLookupError;

use super::super::{Analyzer, IdentifierInfo};

/// The receiver of a member access.
enum ObjectRef {
    /// `Type.member`: static access.
    Type(TypeValue),
    Value(TypeValue),
}

/// What a member access resolved to.
pub(crate) enum MemberTarget {
    Storage { storage: StorageInfo, ty: TypeValue },
    /// `object` is the receiver of an instance function.
    Func { func: FuncValue, object: Option<NodeId> },
    /// Already reported (or the receiver was unresolved).
    Unresolved,
}

enum Member {
    Var(VarValue),
    Func(FuncValue),
}

impl Analyzer {
    pub(super) fn member_expr(&mut self, expr: &Expr, object: &Expr, name: &str, type_args: &[TypeExpr]) -> TypeValue {
        match self.resolve_member_expr(expr, object, name, type_args) {
            MemberTarget::Storage { storage, ty } => {
                self.node_map.set_info(expr.id, NodeInfo::Storage(storage));
                ty
            }
            MemberTarget::Func { func, .. } => self.func_value(expr, func),
            MemberTarget::Unresolved => TypeValue::Unresolved,
        }
    }

    pub(crate) fn resolve_member_expr(
        &mut self,
        expr: &Expr,
        object: &Expr,
        name: &str,
        type_args: &[TypeExpr],
    ) -> MemberTarget {
        let receiver = self.resolve_object(object);
        let args = self.resolve_type_args(type_args);
        let member = Name::new(name);
        match receiver {
            ObjectRef::Type(ty) => self.static_member(expr, ty, member, &args),
            ObjectRef::Value(ty) => self.instance_member(expr, object, ty, member, &args),
        }
    }

    /// An identifier naming a type makes the access static; anything else is
    /// evaluated as a value.
    fn resolve_object(&mut self, object: &Expr) -> ObjectRef {
        let ExprKind::Identifier { name, type_args } = &object.kind else {
            return ObjectRef::Value(self.value_expr(object, None));
        };
        let args = self.resolve_type_args(type_args);
        match self.get_identifier_info(name, &args) {
            IdentifierInfo::Type(ty) => {
                self.node_map.set_info(object.id, NodeInfo::Type(ty.clone()));
                ObjectRef::Type(ty)
            }
            info => {
                let ty = self.identifier_value(object, name, info);
                self.node_map.set_type(object.id, ty.clone());
                ObjectRef::Value(ty)
            }
        }
    }

    fn static_member(&mut self, expr: &Expr, ty: TypeValue, member: Name, args: &[TypeValue]) -> MemberTarget {
        let Some(nominal) = self.member_receiver(expr, &ty, &member) else {
            return MemberTarget::Unresolved;
        };
        if args.is_empty()
            && let Some(info) = self.meta.type_info(&nominal.id)
            && info.kind == TypeKind::Enum
            && info.enum_cases.contains(&member)
        {
            return MemberTarget::Storage {
                storage: StorageInfo::EnumCase(member),
                ty,
            };
        }

        match self.lookup_member(&nominal, &member, args) {
            Ok(Member::Var(var)) => {
                if !self.is_static_var(&var) {
                    self.static_mismatch(expr, &member, false);
                    return MemberTarget::Unresolved;
                }
                let var_ty = self.types().var_type(&var);
                MemberTarget::Storage {
                    storage: StorageInfo::StaticMember { object: None, var },
                    ty: var_ty,
                }
            }
            Ok(Member::Func(func)) => {
                if !self.types().func_info(&func.id).is_static {
                    self.static_mismatch(expr, &member, false);
                    return MemberTarget::Unresolved;
                }
                MemberTarget::Func { func, object: None }
            }
            Err(err) => {
                self.member_lookup_failed(expr, &ty, &member, err);
                MemberTarget::Unresolved
            }
        }
    }

    fn instance_member(&mut self, expr: &Expr, object: &Expr, ty: TypeValue, member: Name, args: &[TypeValue]) -> MemberTarget {
        let Some(nominal) = self.member_receiver(expr, &ty, &member) else {
            return MemberTarget::Unresolved;
        };
        match self.lookup_member(&nominal, &member, args) {
            Ok(Member::Var(var)) => {
                if self.is_static_var(&var) {
                    self.static_mismatch(expr, &member, true);
                    return MemberTarget::Unresolved;
                }
                let var_ty = self.types().var_type(&var);
                MemberTarget::Storage {
                    storage: StorageInfo::InstanceMember {
                        object: object.id,
                        object_type: ty,
                        name: member,
                    },
                    ty: var_ty,
                }
            }
            Ok(Member::Func(func)) => {
                if self.types().func_info(&func.id).is_static {
                    self.static_mismatch(expr, &member, true);
                    return MemberTarget::Unresolved;
                }
                MemberTarget::Func {
                    func,
                    object: Some(object.id),
                }
            }
            Err(err) => {
                self.member_lookup_failed(expr, &ty, &member, err);
                MemberTarget::Unresolved
            }
        }
    }

    /// Members live on nominal types only.
    fn member_receiver(&mut self, expr: &Expr, ty: &TypeValue, member: &Name) -> Option<NominalType> {
        if ty.is_unresolved() {
            return None;
        }
        match ty.as_nominal() {
            Some(nominal) => Some(nominal.clone()),
            None => {
                self.member_lookup_failed(expr, ty, member, MemberLookupError::NotFound);
                None
            }
        }
    }

    /// Variables first, then functions.
    fn lookup_member(&self, object: &NominalType, member: &Name, args: &[TypeValue]) -> Result<Member, MemberLookupError> {
        let types = self.types();
        match types.member_var_value(object, member, &[]) {
            Ok(_) if !args.is_empty() => Err(MemberLookupError::TypeArgCount {
                expected: 0,
                found: args.len(),
            }),
            Ok(var) => Ok(Member::Var(var)),
            Err(_) => types.member_func_value(object, member, args).map(Member::Func),
        }
    }

    fn is_static_var(&self, var: &VarValue) -> bool {
        self.meta.var_info(&var.id).is_some_and(|info| info.is_static)
    }

    /// `through_value`: the access was written on a value but found a static
    /// member (or the reverse).
    fn static_mismatch(&mut self, expr: &Expr, member: &Name, through_value: bool) {
        let kind = if through_value { "a static" } else { "an instance" };
        self.add_error(
            SemanticError::StaticInstanceMismatch {
                member: member.to_string(),
                kind,
                span: expr.span.into(),
            },
            expr.id,
            expr.span,
        );
    }

    fn member_lookup_failed(&mut self, expr: &Expr, ty: &TypeValue, member: &Name, err: MemberLookupError) {
        let error = match err {
            MemberLookupError::NotFound => SemanticError::UnknownMember {
                ty: ty.to_string(),
                member: member.to_string(),
                span: expr.span.into(),
            },
            MemberLookupError::Ambiguous(count) => SemanticError::AmbiguousMember {
                ty: ty.to_string(),
                member: member.to_string(),
                count,
                span: expr.span.into(),
            },
            MemberLookupError::TypeArgCount { expected, found } => SemanticError::MemberTypeArgs {
                member: member.to_string(),
                expected,
                found,
                span: expr.span.into(),
            },
        };
        self.add_error(error, expr.id, expr.span);
    }

    // ========================================================================
    // Indexers
    // ========================================================================

    pub(super) fn indexer_expr(&mut self, expr: &Expr, object: &Expr, index: &Expr) -> TypeValue {
        let object_ty = self.value_expr(object, None);
        let index_ty = self.value_expr(index, None);
        let Some((getter, _)) = self.resolve_indexer(expr, &object_ty) else {
            return TypeValue::Unresolved;
        };
        let Some(getter) = getter else {
            self.add_error(
                SemanticError::WriteOnlyIndexer {
                    ty: object_ty.to_string(),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
            return TypeValue::Unresolved;
        };
        let sig = self.types().func_type(&getter);
        self.check_args(&sig.params, &[super::call::ArgInfo::of(index, index_ty)], expr);
        self.node_map.set_info(expr.id, NodeInfo::Indexer { getter });
        sig.ret
    }

    /// Getter and setter of `object_ty`'s indexer. `None` when there is
    /// neither (reported) or the object is unresolved.
    pub(super) fn resolve_indexer(
        &mut self,
        expr: &Expr,
        object_ty: &TypeValue,
    ) -> Option<(Option<FuncValue>, Option<FuncValue>)> {
        if object_ty.is_unresolved() {
            return None;
        }
        let accessors = object_ty.as_nominal().map(|nominal| {
            let types = self.types();
            (
                types.member_func_value(nominal, &Name::IndexerGet, &[]).ok(),
                types.member_func_value(nominal, &Name::IndexerSet, &[]).ok(),
            )
        });
        match accessors {
            Some((None, None)) | None => {
                self.add_error(
                    SemanticError::IndexerNotFound {
                        ty: object_ty.to_string(),
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                None
            }
            Some(accessors) => Some(accessors),
        }
    }
}
