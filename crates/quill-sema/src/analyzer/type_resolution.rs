use quill_identity::{ItemId, Name};
use quill_syntax::{TypeExpr, TypeExprKind};

use crate::errors::SemanticError;
use crate::node_map::NodeInfo;
use crate::type_value::{TypeArgs, TypeValue};

use super::Analyzer;

impl Analyzer {
    /// Resolve a type expression and record the result on its node.
    ///
    /// `var` is rejected here; local declarations handle it before calling.
    pub(super) fn resolve_type_expr(&mut self, expr: &TypeExpr) -> TypeValue {
        let ty = match &expr.kind {
            TypeExprKind::Named { name, type_args } => {
                let args: Vec<TypeValue> = type_args.iter().map(|arg| self.resolve_type_expr(arg)).collect();
                self.resolve_named_type(name, args, expr)
            }
            TypeExprKind::Member { parent, name, type_args } => {
                let parent_ty = self.resolve_type_expr(parent);
                let args: Vec<TypeValue> = type_args.iter().map(|arg| self.resolve_type_expr(arg)).collect();
                self.resolve_member_type(&parent_ty, name, args, expr)
            }
            TypeExprKind::Func { ret, params } => {
                let ret = self.resolve_type_expr(ret);
                let params: Vec<TypeValue> = params.iter().map(|param| self.resolve_type_expr(param)).collect();
                TypeValue::function(ret, params)
            }
            TypeExprKind::Void => TypeValue::Void,
            TypeExprKind::Var => {
                self.add_error(SemanticError::InvalidVarType { span: expr.span.into() }, expr.id, expr.span);
                TypeValue::Unresolved
            }
        };
        self.node_map.set_info(expr.id, NodeInfo::Type(ty.clone()));
        ty
    }

    /// Enclosing type parameters (innermost first), then nested types of the
    /// enclosing types, then module-level types.
    fn resolve_named_type(&mut self, name: &str, args: Vec<TypeValue>, expr: &TypeExpr) -> TypeValue {
        if args.is_empty()
            && let Some(scope) = self
                .decl_scope
                .iter()
                .rev()
                .find(|scope| scope.type_params.iter().any(|param| param.as_str() == Some(name)))
        {
            return TypeValue::type_param(scope.id.clone(), Name::new(name));
        }

        let type_name = Name::new(name);
        let nested = self
            .decl_scope
            .iter()
            .rev()
            .filter(|scope| scope.is_type)
            .map(|scope| (scope.id.clone(), scope.id.child(type_name.clone(), args.len())))
            .find(|(_, id)| self.type_exists(id));
        if let Some((outer, id)) = nested {
            // Nested in an enclosing type: that type's own parameters stay open.
            tracing::trace!(%id, "nested type");
            return TypeValue::nominal(id, TypeArgs::nested(self.self_type_args(&outer), args));
        }

        let candidates = self.global_type_ids(&type_name, args.len());
        match candidates.as_slice() {
            [id] => TypeValue::nominal(id.clone(), TypeArgs::root(args)),
            [] if name == "void" && args.is_empty() => TypeValue::Void,
            [] => {
                self.add_error(
                    SemanticError::UnknownType {
                        name: name.to_string(),
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                TypeValue::Unresolved
            }
            many => {
                let count = many.len();
                self.add_error(
                    SemanticError::AmbiguousType {
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

    /// `Parent<..>.Name<args>`
    fn resolve_member_type(&mut self, parent: &TypeValue, name: &str, args: Vec<TypeValue>, expr: &TypeExpr) -> TypeValue {
        if parent.is_unresolved() {
            return TypeValue::Unresolved;
        }
        let resolved = parent.as_nominal().and_then(|nominal| {
            let id = nominal.id.child(Name::new(name), args.len());
            self.type_exists(&id).then(|| (id, nominal.type_args.clone()))
        });
        match resolved {
            Some((id, outer)) => TypeValue::nominal(id, TypeArgs::nested(outer, args)),
            None => {
                self.add_error(
                    SemanticError::UnknownType {
                        name: format!("{}.{}", parent, name),
                        span: expr.span.into(),
                    },
                    expr.id,
                    expr.span,
                );
                TypeValue::Unresolved
            }
        }
    }

    /// Top-level types named `name` with `arity` parameters: the script's own
    /// (from the skeleton) plus every referenced module's.
    pub(super) fn global_type_ids(&self, name: &Name, arity: usize) -> Vec<ItemId> {
        let mut ids = Vec::new();
        let own = self.script_root().child(name.clone(), arity);
        if self.skeleton.types.contains_key(&own) {
            ids.push(own);
        }
        ids.extend(
            self.meta
                .global_types(name, arity)
                .into_iter()
                .filter(|info| info.id.module_name() != self.module_name)
                .map(|info| info.id.clone()),
        );
        ids
    }

    /// Arguments instantiating the declaration `id` with its own (and its
    /// enclosing types') parameters, as seen from inside it.
    pub(super) fn self_type_args(&self, id: &ItemId) -> TypeArgs {
        let mut args: Option<TypeArgs> = None;
        for scope in id.prefixes() {
            let level: Vec<TypeValue> = self
                .declared_type_params(&scope)
                .into_iter()
                .map(|param| TypeValue::type_param(scope.clone(), param))
                .collect();
            args = Some(match args {
                None => TypeArgs::root(level),
                Some(outer) => TypeArgs::nested(outer, level),
            });
        }
        args.unwrap_or_default()
    }
}
