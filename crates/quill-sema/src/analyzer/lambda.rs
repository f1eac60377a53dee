// analyzer/lambda.rs
//
// Lambda expressions and task statements: capture wiring, then analysis of
// the body in a fresh function context.

use quill_identity::Span;
use quill_syntax::{Block, Expr, LambdaBody, LambdaExpr, NodeId, Stmt};

use crate::capture::{CaptureBody, CaptureKind};
use crate::errors::SemanticError;
use crate::node_map::{LambdaInfo, NodeInfo};
use crate::storage::{CaptureInfo, StorageInfo};
use crate::type_value::TypeValue;

use super::{Analyzer, FuncContext, IdentifierInfo, ReturnType, Template, TemplateKind};

/// An outer local resolved for capture, before the body's slot is allocated.
struct PendingCapture {
    name: String,
    kind: CaptureKind,
    storage: StorageInfo,
    ty: TypeValue,
}

impl Analyzer {
    /// Parameter types come from the declaration, or else from an expected
    /// function type of the same arity.
    pub(super) fn lambda_expr(&mut self, expr: &Expr, lambda: &LambdaExpr, expected: Option<&TypeValue>) -> TypeValue {
        let hint = expected
            .and_then(TypeValue::as_function)
            .filter(|sig| sig.params.len() == lambda.params.len())
            .cloned();

        let mut param_types = Vec::with_capacity(lambda.params.len());
        for (i, param) in lambda.params.iter().enumerate() {
            let ty = match (&param.ty, &hint) {
                (Some(ty), _) => self.resolve_type_expr(ty),
                (None, Some(sig)) => sig.params[i].clone(),
                (None, None) => {
                    self.add_error(
                        SemanticError::CannotInferLambdaParam {
                            name: param.name.clone(),
                            span: param.span.into(),
                        },
                        param.id,
                        param.span,
                    );
                    TypeValue::Unresolved
                }
            };
            param_types.push(ty);
        }
        let declared_ret = lambda.ret.as_ref().map(|ret| self.resolve_type_expr(ret));

        let names: Vec<&str> = lambda.params.iter().map(|param| param.name.as_str()).collect();
        let body = match &lambda.body {
            LambdaBody::Expr(body) => CaptureBody::Expr(body),
            LambdaBody::Block(body) => CaptureBody::Block(body),
        };
        let Some(pending) = self.wire_captures(expr.id, expr.span, &names, body) else {
            return TypeValue::Unresolved;
        };

        let ret = match &declared_ret {
            Some(ty) => ReturnType::Fixed(ty.clone()),
            None => ReturnType::Inferred(None),
        };
        let mut scope = self.enter_func(FuncContext::new(ret, None, false));
        for (param, ty) in lambda.params.iter().zip(&param_types) {
            let slot = scope.func.add_local(&param.name, ty.clone());
            scope.node_map.set_info(param.id, NodeInfo::VarDecl(StorageInfo::Local(slot)));
        }
        let captures = scope.declare_captures(pending);

        let body_id = match &lambda.body {
            LambdaBody::Expr(body) => {
                let found = match &declared_ret {
                    Some(ret) if ret.is_void() => scope.expr(body, None),
                    Some(ret) => {
                        let found = scope.value_expr(body, Some(ret));
                        scope.check_assignable(ret, &found, body.id, body.span);
                        found
                    }
                    None => scope.expr(body, None),
                };
                if declared_ret.is_none() {
                    scope.func.ret = ReturnType::Inferred(Some(found));
                }
                body.id
            }
            LambdaBody::Block(body) => {
                scope.block(body);
                body.id
            }
        };
        let ctx = scope.finish();

        let ret = match (declared_ret, &ctx.ret) {
            (Some(ty), _) => ty,
            (None, ReturnType::Inferred(Some(ty))) => ty.clone(),
            (None, _) => TypeValue::Void,
        };
        let template = self.push_template(TemplateKind::Lambda(expr.id), &ctx, Some(body_id));
        tracing::debug!(lambda = %expr.id, captures = captures.len(), template, "lambda analyzed");
        self.node_map
            .set_info(expr.id, NodeInfo::Lambda(LambdaInfo { captures, template }));
        TypeValue::function(ret, param_types)
    }

    /// `task { ... }`: a parameterless void body run by the runtime on its
    /// own, reaching outer locals through captures.
    pub(super) fn task_stmt(&mut self, stmt: &Stmt, block: &Block) {
        let Some(pending) = self.wire_captures(stmt.id, stmt.span, &[], CaptureBody::Block(block)) else {
            return;
        };
        let mut scope = self.enter_func(FuncContext::new(ReturnType::Fixed(TypeValue::Void), None, false));
        let captures = scope.declare_captures(pending);
        scope.block(block);
        let ctx = scope.finish();

        let template = self.push_template(TemplateKind::Task(stmt.id), &ctx, Some(block.id));
        tracing::debug!(task = %stmt.id, captures = captures.len(), template, "task analyzed");
        self.node_map
            .set_info(stmt.id, NodeInfo::Task(LambdaInfo { captures, template }));
    }

    /// Resolve every name the body needs from outside, in the enclosing
    /// context. Only locals are wired; globals stay reachable directly, generic
    /// functions named without type arguments included. Any unresolvable name
    /// fails the whole body (`None`).
    fn wire_captures(
        &mut self,
        node: NodeId,
        span: Span,
        param_names: &[&str],
        body: CaptureBody<'_>,
    ) -> Option<Vec<PendingCapture>> {
        let needed = self.capturer.capture(param_names, body);
        let mut pending = Vec::with_capacity(needed.len());
        let mut failed = false;
        for need in needed {
            match self.lookup_identifier(&need.name, &[], true) {
                IdentifierInfo::Var {
                    storage: storage @ StorageInfo::Local(_),
                    declared,
                    ..
                } => pending.push(PendingCapture {
                    name: need.name,
                    kind: need.kind,
                    storage,
                    ty: declared,
                }),
                IdentifierInfo::Var { .. } | IdentifierInfo::Func(_) | IdentifierInfo::Type(_) => {}
                IdentifierInfo::NotFound | IdentifierInfo::Ambiguous(_) => {
                    self.add_error(
                        SemanticError::CaptureFailed {
                            name: need.name.clone(),
                            span: span.into(),
                        },
                        node,
                        span,
                    );
                    failed = true;
                }
            }
        }
        if failed {
            return None;
        }
        tracing::debug!(%node, captures = ?pending.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), "captures wired");
        Some(pending)
    }

    /// Re-declare each capture as a local of the active (new) context.
    fn declare_captures(&mut self, pending: Vec<PendingCapture>) -> Vec<CaptureInfo> {
        pending
            .into_iter()
            .map(|capture| {
                let local = self.func.add_local(&capture.name, capture.ty.clone());
                CaptureInfo {
                    name: capture.name,
                    kind: capture.kind,
                    storage: capture.storage,
                    ty: capture.ty,
                    local,
                }
            })
            .collect()
    }

    /// Record a finished body. Returns its template index.
    pub(super) fn push_template(&mut self, kind: TemplateKind, ctx: &FuncContext, body: Option<NodeId>) -> usize {
        self.templates.push(Template {
            kind,
            local_count: ctx.local_count(),
            seq_return_type: ctx.seq_elem.clone(),
            is_this_call: ctx.is_this_call,
            body,
        });
        self.templates.len() - 1
    }
}
