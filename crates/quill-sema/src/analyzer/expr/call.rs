// analyzer/expr/call.rs
//
// Call expressions: named functions (global or member) with type argument
// inference, and calls through function-typed values.

use quill_identity::Span;
use quill_syntax::{Expr, ExprKind, NodeId};

use crate::applier::{TypeEnv, substitute};
use crate::errors::SemanticError;
use crate::infer::unify;
use crate::node_map::{CallInfo, NodeInfo};
use crate::type_value::{FuncValue, TypeValue};

use super::super::{Analyzer, IdentifierInfo};
use super::access::MemberTarget;
use super::unbound_own_param;

/// An analyzed argument.
pub(crate) struct ArgInfo {
    pub ty: TypeValue,
    pub node: NodeId,
    pub span: Span,
}

impl ArgInfo {
    pub fn of(expr: &Expr, ty: TypeValue) -> Self {
        Self {
            ty,
            node: expr.id,
            span: expr.span,
        }
    }
}

impl Analyzer {
    pub(super) fn call_expr(&mut self, expr: &Expr, callee: &Expr, args: &[Expr]) -> TypeValue {
        match &callee.kind {
            ExprKind::Identifier { name, type_args } => {
                let explicit = self.resolve_type_args(type_args);
                match self.lookup_identifier(name, &explicit, true) {
                    IdentifierInfo::Func(func) => self.call_func(expr, callee, func, None, args),
                    info => {
                        let ty = self.identifier_value(callee, name, info);
                        self.node_map.set_type(callee.id, ty.clone());
                        self.call_value(expr, ty, args)
                    }
                }
            }
            ExprKind::Member {
                object,
                name,
                type_args,
            } => match self.resolve_member_expr(callee, object, name, type_args) {
                MemberTarget::Func { func, object } => self.call_func(expr, callee, func, object, args),
                MemberTarget::Storage { storage, ty } => {
                    self.node_map.set_info(callee.id, NodeInfo::Storage(storage));
                    self.node_map.set_type(callee.id, ty.clone());
                    self.call_value(expr, ty, args)
                }
                MemberTarget::Unresolved => {
                    self.node_map.set_type(callee.id, TypeValue::Unresolved);
                    self.skip_args(args);
                    TypeValue::Unresolved
                }
            },
            _ => {
                let ty = self.value_expr(callee, None);
                self.call_value(expr, ty, args)
            }
        }
    }

    /// Call a named function. The function's own type parameters that were
    /// not given explicitly are inferred from the argument types.
    fn call_func(
        &mut self,
        expr: &Expr,
        callee: &Expr,
        func: FuncValue,
        object: Option<NodeId>,
        args: &[Expr],
    ) -> TypeValue {
        let sig = self.types().func_type(&func);
        let mut analyzed = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            // A parameter still mentioning the function's own parameters is no
            // use as a hint until inference is done.
            let hint = sig.params.get(i).filter(|param| !param.mentions_params_of(&func.id));
            let ty = self.value_expr(arg, hint);
            analyzed.push(ArgInfo::of(arg, ty));
        }

        let func = match self.infer_type_args(expr, func, &sig.params, &analyzed) {
            Some(func) => func,
            None => {
                self.node_map.set_type(callee.id, TypeValue::Unresolved);
                return TypeValue::Unresolved;
            }
        };
        let sig = self.types().func_type(&func);
        self.check_args(&sig.params, &analyzed, expr);

        tracing::trace!(func = %func, "call");
        self.node_map.set_type(callee.id, TypeValue::from(sig.clone()));
        self.node_map.set_info(callee.id, NodeInfo::Func(func.clone()));
        self.node_map.set_info(expr.id, NodeInfo::Call(CallInfo::Func { func, object }));
        sig.ret
    }

    /// Bind `func`'s own unbound parameters from the arguments. `None` when
    /// one stays unbound (reported unless an argument already failed).
    fn infer_type_args(
        &mut self,
        expr: &Expr,
        func: FuncValue,
        params: &[TypeValue],
        args: &[ArgInfo],
    ) -> Option<FuncValue> {
        if unbound_own_param(&func).is_none() {
            return Some(func);
        }
        let mut env = TypeEnv::default();
        for (param, arg) in params.iter().zip(args) {
            unify(param, &arg.ty, &func.id, &mut env);
        }
        let own: Vec<TypeValue> = func.type_args.args().iter().map(|arg| substitute(arg, &env)).collect();
        let inferred = FuncValue::new(func.id.clone(), func.type_args.with_args(own));
        tracing::trace!(func = %inferred, bound = env.len(), "inferred type arguments");

        let Some(param) = unbound_own_param(&inferred) else {
            return Some(inferred);
        };
        if !args.iter().any(|arg| arg.ty.is_unresolved()) {
            self.add_error(
                SemanticError::CannotInferTypeArgs {
                    func: func.to_string(),
                    param,
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
        }
        None
    }

    /// Call through a value of function type.
    fn call_value(&mut self, expr: &Expr, callee_ty: TypeValue, args: &[Expr]) -> TypeValue {
        if callee_ty.is_unresolved() {
            self.skip_args(args);
            return TypeValue::Unresolved;
        }
        let Some(sig) = callee_ty.as_function().cloned() else {
            self.add_error(
                SemanticError::NotCallable {
                    ty: callee_ty.to_string(),
                    span: expr.span.into(),
                },
                expr.id,
                expr.span,
            );
            self.skip_args(args);
            return TypeValue::Unresolved;
        };
        let analyzed: Vec<ArgInfo> = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                let ty = self.value_expr(arg, sig.params.get(i));
                ArgInfo::of(arg, ty)
            })
            .collect();
        self.check_args(&sig.params, &analyzed, expr);
        self.node_map.set_info(expr.id, NodeInfo::Call(CallInfo::Value));
        sig.ret
    }

    /// Arguments of a call whose callee failed still get analyzed for their
    /// own errors.
    fn skip_args(&mut self, args: &[Expr]) {
        for arg in args {
            self.value_expr(arg, None);
        }
    }

    /// Argument count, then each argument against its parameter.
    pub(super) fn check_args(&mut self, params: &[TypeValue], args: &[ArgInfo], call: &Expr) -> bool {
        if params.len() != args.len() {
            self.add_error(
                SemanticError::WrongArgumentCount {
                    expected: params.len(),
                    found: args.len(),
                    span: call.span.into(),
                },
                call.id,
                call.span,
            );
            return false;
        }
        let mut ok = true;
        for (param, arg) in params.iter().zip(args) {
            ok &= self.check_assignable(param, &arg.ty, arg.node, arg.span);
        }
        ok
    }
}
