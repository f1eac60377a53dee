// analyzer/stmt.rs
//
// Statement analysis and block scoping.

use quill_syntax::{Block, Expr, ExprKind, IfStmt, Stmt, StmtKind, TypeExprKind, VarDecl};

use crate::errors::SemanticError;
use crate::node_map::NodeInfo;
use crate::storage::StorageInfo;
use crate::type_value::TypeValue;
use crate::well_known::bool_type;

use super::{Analyzer, ReturnType};

impl Analyzer {
    pub(super) fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => self.var_decl_stmt(stmt, decl),
            StmtKind::If(if_stmt) => self.if_stmt(if_stmt),
            StmtKind::While(while_stmt) => {
                self.condition(&while_stmt.cond);
                self.func.loop_depth += 1;
                self.embedded_stmt(&while_stmt.body);
                self.func.loop_depth -= 1;
            }
            StmtKind::Block(block) | StmtKind::Await(block) => self.block(block),
            StmtKind::Expr(expr) => {
                self.expr(expr, None);
            }
            StmtKind::Return(value) => self.return_stmt(stmt, value.as_ref()),
            StmtKind::Yield(value) => self.yield_stmt(stmt, value),
            StmtKind::Break => {
                if self.func.loop_depth == 0 {
                    self.add_error(SemanticError::InvalidBreak { span: stmt.span.into() }, stmt.id, stmt.span);
                }
            }
            StmtKind::Continue => {
                if self.func.loop_depth == 0 {
                    self.add_error(SemanticError::InvalidContinue { span: stmt.span.into() }, stmt.id, stmt.span);
                }
            }
            StmtKind::Task(block) => self.task_stmt(stmt, block),
        }
    }

    /// Statements of `block` in a fresh scope.
    pub(super) fn block(&mut self, block: &Block) {
        let mut scope = self.enter_block();
        for stmt in &block.stmts {
            scope.stmt(stmt);
        }
    }

    /// Body of an `if`/`while`. Declarations in a single-statement body do
    /// not leak into the enclosing scope.
    fn embedded_stmt(&mut self, stmt: &Stmt) {
        let mut scope = self.enter_block();
        scope.stmt(stmt);
    }

    fn condition(&mut self, cond: &Expr) {
        let ty = self.value_expr(cond, None);
        if !ty.is_unresolved() && ty != bool_type() {
            self.add_error(
                SemanticError::ConditionNotBool {
                    found: ty.to_string(),
                    span: cond.span.into(),
                },
                cond.id,
                cond.span,
            );
        }
    }

    /// `if (x is T)` narrows `x` to `T` in both branches; the override is
    /// gone once the statement ends.
    fn if_stmt(&mut self, if_stmt: &IfStmt) {
        self.condition(&if_stmt.cond);
        let narrowing = self.narrowing_of(&if_stmt.cond);

        let mut scope = self.enter_narrowing();
        if let Some((storage, ty)) = narrowing {
            tracing::trace!(?storage, %ty, "narrowed");
            scope.func.overrides.insert(storage, ty);
        }
        scope.embedded_stmt(&if_stmt.then_body);
        if let Some(else_body) = &if_stmt.else_body {
            scope.embedded_stmt(else_body);
        }
    }

    /// Storage and tested type of `x is T` with `x` a variable.
    fn narrowing_of(&self, cond: &Expr) -> Option<(StorageInfo, TypeValue)> {
        let ExprKind::Is { value, .. } = &cond.kind else {
            return None;
        };
        value.as_plain_identifier()?;
        let Some(NodeInfo::Storage(storage)) = self.node_map.info(value.id) else {
            return None;
        };
        let Some(NodeInfo::IsTest { ty }) = self.node_map.info(cond.id) else {
            return None;
        };
        Some((storage.clone(), ty.clone()))
    }

    fn var_decl_stmt(&mut self, stmt: &Stmt, decl: &VarDecl) {
        let ty = if matches!(decl.ty.kind, TypeExprKind::Var) {
            let ty = match &decl.init {
                Some(init) => self.value_expr(init, None),
                None => {
                    self.add_error(
                        SemanticError::CannotInferVarType {
                            name: decl.name.clone(),
                            span: stmt.span.into(),
                        },
                        stmt.id,
                        stmt.span,
                    );
                    TypeValue::Unresolved
                }
            };
            self.node_map.set_info(decl.ty.id, NodeInfo::Type(ty.clone()));
            ty
        } else {
            let declared = self.resolve_type_expr(&decl.ty);
            if let Some(init) = &decl.init {
                let found = self.value_expr(init, Some(&declared));
                self.check_assignable(&declared, &found, init.id, init.span);
            }
            declared
        };

        // Declared after the initializer: `int x = x;` reads the outer `x`.
        let storage = if self.global_scope {
            StorageInfo::PrivateGlobal(self.private_globals.declare(&decl.name, ty))
        } else {
            StorageInfo::Local(self.func.add_local(&decl.name, ty))
        };
        tracing::trace!(name = %decl.name, ?storage, "declared");
        self.node_map.set_info(stmt.id, NodeInfo::VarDecl(storage));
    }

    fn return_stmt(&mut self, stmt: &Stmt, value: Option<&Expr>) {
        if self.func.seq_elem.is_some() {
            if let Some(value) = value {
                self.value_expr(value, None);
                self.add_error(
                    SemanticError::ReturnValueInSequence { span: value.span.into() },
                    value.id,
                    value.span,
                );
            }
            return;
        }

        match self.func.ret.clone() {
            ReturnType::Fixed(expected) => match value {
                None if !expected.is_void() => {
                    self.add_error(
                        SemanticError::MissingReturnValue {
                            expected: expected.to_string(),
                            span: stmt.span.into(),
                        },
                        stmt.id,
                        stmt.span,
                    );
                }
                None => {}
                Some(value) if expected.is_void() => {
                    let found = self.expr(value, None);
                    if !found.is_void() && !found.is_unresolved() {
                        self.type_mismatch(&expected, &found, value.id, value.span);
                    }
                }
                Some(value) => {
                    let found = self.value_expr(value, Some(&expected));
                    self.check_assignable(&expected, &found, value.id, value.span);
                }
            },
            ReturnType::Inferred(inferred) => {
                let found = match value {
                    Some(value) => self.expr(value, inferred.as_ref()),
                    None => TypeValue::Void,
                };
                match inferred {
                    None => self.func.ret = ReturnType::Inferred(Some(found)),
                    Some(expected) => {
                        let node = value.map_or(stmt.id, |value| value.id);
                        let span = value.map_or(stmt.span, |value| value.span);
                        self.check_assignable(&expected, &found, node, span);
                    }
                }
            }
        }
    }

    fn yield_stmt(&mut self, stmt: &Stmt, value: &Expr) {
        let Some(elem) = self.func.seq_elem.clone() else {
            self.value_expr(value, None);
            self.add_error(SemanticError::YieldOutsideSequence { span: stmt.span.into() }, stmt.id, stmt.span);
            return;
        };
        let found = self.value_expr(value, Some(&elem));
        self.check_assignable(&elem, &found, value.id, value.span);
    }
}
