// src/builder.rs
//
// Node construction with sequential NodeId allocation.

use quill_identity::{Name, Span};

use crate::ast::*;

/// Builds syntax nodes, handing out a fresh `NodeId` for each one.
///
/// Every node gets the builder's current span; a parser moves it forward with
/// [`SyntaxBuilder::set_span`] before building each node.
#[derive(Debug, Default)]
pub struct SyntaxBuilder {
    next_id: u32,
    span: Span,
}

impl SyntaxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Number of ids handed out so far.
    pub fn node_count(&self) -> u32 {
        self.next_id
    }

    fn next(&mut self) -> (NodeId, Span) {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        (id, self.span)
    }

    // ========================================================================
    // Type expressions
    // ========================================================================

    pub fn named_type(&mut self, name: &str, type_args: Vec<TypeExpr>) -> TypeExpr {
        self.type_expr(TypeExprKind::Named {
            name: name.to_string(),
            type_args,
        })
    }

    pub fn member_type(&mut self, parent: TypeExpr, name: &str, type_args: Vec<TypeExpr>) -> TypeExpr {
        self.type_expr(TypeExprKind::Member {
            parent: Box::new(parent),
            name: name.to_string(),
            type_args,
        })
    }

    pub fn func_type(&mut self, ret: TypeExpr, params: Vec<TypeExpr>) -> TypeExpr {
        self.type_expr(TypeExprKind::Func {
            ret: Box::new(ret),
            params,
        })
    }

    pub fn void_type(&mut self) -> TypeExpr {
        self.type_expr(TypeExprKind::Void)
    }

    pub fn var_type(&mut self) -> TypeExpr {
        self.type_expr(TypeExprKind::Var)
    }

    fn type_expr(&mut self, kind: TypeExprKind) -> TypeExpr {
        let (id, span) = self.next();
        TypeExpr { id, span, kind }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn ident(&mut self, name: &str) -> Expr {
        self.generic_ident(name, Vec::new())
    }

    pub fn generic_ident(&mut self, name: &str, type_args: Vec<TypeExpr>) -> Expr {
        self.expr(ExprKind::Identifier {
            name: name.to_string(),
            type_args,
        })
    }

    pub fn int(&mut self, value: i64) -> Expr {
        self.expr(ExprKind::IntLiteral(value))
    }

    pub fn bool(&mut self, value: bool) -> Expr {
        self.expr(ExprKind::BoolLiteral(value))
    }

    pub fn string(&mut self, value: &str) -> Expr {
        self.expr(ExprKind::StringLiteral(value.to_string()))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn assign(&mut self, target: Expr, value: Expr) -> Expr {
        self.expr(ExprKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn call(&mut self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn member(&mut self, object: Expr, name: &str) -> Expr {
        self.generic_member(object, name, Vec::new())
    }

    pub fn generic_member(&mut self, object: Expr, name: &str, type_args: Vec<TypeExpr>) -> Expr {
        self.expr(ExprKind::Member {
            object: Box::new(object),
            name: name.to_string(),
            type_args,
        })
    }

    pub fn indexer(&mut self, object: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::Indexer {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    pub fn is(&mut self, value: Expr, ty: TypeExpr) -> Expr {
        self.expr(ExprKind::Is {
            value: Box::new(value),
            ty,
        })
    }

    pub fn lambda(&mut self, params: Vec<LambdaParam>, ret: Option<TypeExpr>, body: LambdaBody) -> Expr {
        self.expr(ExprKind::Lambda(LambdaExpr { params, ret, body }))
    }

    pub fn lambda_param(&mut self, name: &str, ty: Option<TypeExpr>) -> LambdaParam {
        let (id, span) = self.next();
        LambdaParam {
            id,
            span,
            name: name.to_string(),
            ty,
        }
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        let (id, span) = self.next();
        Expr { id, span, kind }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn var_decl(&mut self, ty: TypeExpr, name: &str, init: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::VarDecl(VarDecl {
            name: name.to_string(),
            ty,
            init,
        }))
    }

    pub fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub fn if_stmt(&mut self, cond: Expr, then_body: Stmt, else_body: Option<Stmt>) -> Stmt {
        self.stmt(StmtKind::If(IfStmt {
            cond,
            then_body: Box::new(then_body),
            else_body: else_body.map(Box::new),
        }))
    }

    pub fn while_stmt(&mut self, cond: Expr, body: Stmt) -> Stmt {
        self.stmt(StmtKind::While(WhileStmt {
            cond,
            body: Box::new(body),
        }))
    }

    pub fn block_stmt(&mut self, stmts: Vec<Stmt>) -> Stmt {
        let block = self.block(stmts);
        self.stmt(StmtKind::Block(block))
    }

    pub fn return_stmt(&mut self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub fn yield_stmt(&mut self, value: Expr) -> Stmt {
        self.stmt(StmtKind::Yield(value))
    }

    pub fn break_stmt(&mut self) -> Stmt {
        self.stmt(StmtKind::Break)
    }

    pub fn continue_stmt(&mut self) -> Stmt {
        self.stmt(StmtKind::Continue)
    }

    pub fn task_stmt(&mut self, stmts: Vec<Stmt>) -> Stmt {
        let block = self.block(stmts);
        self.stmt(StmtKind::Task(block))
    }

    pub fn await_stmt(&mut self, stmts: Vec<Stmt>) -> Stmt {
        let block = self.block(stmts);
        self.stmt(StmtKind::Await(block))
    }

    pub fn block(&mut self, stmts: Vec<Stmt>) -> Block {
        let (id, span) = self.next();
        Block { id, span, stmts }
    }

    fn stmt(&mut self, kind: StmtKind) -> Stmt {
        let (id, span) = self.next();
        Stmt { id, span, kind }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn param(&mut self, ty: TypeExpr, name: &str) -> Param {
        let (id, span) = self.next();
        Param {
            id,
            span,
            name: name.to_string(),
            ty,
        }
    }

    /// Non-sequence, non-static function.
    pub fn func(
        &mut self,
        name: Name,
        type_params: &[&str],
        params: Vec<Param>,
        ret: TypeExpr,
        body: Vec<Stmt>,
    ) -> FuncDecl {
        let body = self.block(body);
        let (id, span) = self.next();
        FuncDecl {
            id,
            span,
            name,
            type_params: type_params.iter().map(|s| s.to_string()).collect(),
            params,
            ret,
            is_sequence: false,
            is_static: false,
            body,
        }
    }

    pub fn type_decl(
        &mut self,
        kind: TypeDeclKind,
        name: &str,
        type_params: &[&str],
        base: Option<TypeExpr>,
        members: Vec<MemberDecl>,
    ) -> TypeDecl {
        let (id, span) = self.next();
        TypeDecl {
            id,
            span,
            kind,
            name: name.to_string(),
            type_params: type_params.iter().map(|s| s.to_string()).collect(),
            base,
            members,
        }
    }

    pub fn member_var(&mut self, ty: TypeExpr, name: &str, is_static: bool) -> MemberDecl {
        let (id, span) = self.next();
        MemberDecl::Var(MemberVarDecl {
            id,
            span,
            name: name.to_string(),
            ty,
            is_static,
        })
    }

    pub fn enum_case(&mut self, name: &str) -> MemberDecl {
        let (id, span) = self.next();
        MemberDecl::EnumCase(EnumCaseDecl {
            id,
            span,
            name: name.to_string(),
        })
    }
}
