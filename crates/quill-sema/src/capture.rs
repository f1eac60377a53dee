// capture.rs
//
// Which outer variables a lambda or task body needs.

use rustc_hash::{FxHashMap, FxHashSet};

use quill_syntax::{Block, Expr, ExprKind, LambdaBody, Stmt, StmtKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    /// Body only reads the variable.
    Copy,
    /// Body writes the variable; the enclosing frame must observe the write.
    Ref,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeedCapture {
    pub name: String,
    pub kind: CaptureKind,
}

#[derive(Debug, Clone, Copy)]
pub enum CaptureBody<'a> {
    Expr(&'a Expr),
    Block(&'a Block),
}

/// Reports the outer names a nested body uses. The analyzer decides which of
/// them are locals that actually need wiring.
pub trait Capturer {
    fn capture(&self, param_names: &[&str], body: CaptureBody<'_>) -> Vec<NeedCapture>;
}

/// Reports every plain identifier used but not declared inside the body, in
/// order of first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeVariableCapturer;

impl Capturer for FreeVariableCapturer {
    fn capture(&self, param_names: &[&str], body: CaptureBody<'_>) -> Vec<NeedCapture> {
        let mut walker = FreeVariables::default();
        walker.push(param_names.iter().map(|name| name.to_string()));
        match body {
            CaptureBody::Expr(expr) => walker.expr(expr),
            CaptureBody::Block(block) => walker.block(block),
        }
        walker.finish()
    }
}

#[derive(Default)]
struct FreeVariables {
    scopes: Vec<FxHashSet<String>>,
    order: Vec<String>,
    kinds: FxHashMap<String, CaptureKind>,
}

impl FreeVariables {
    fn push(&mut self, names: impl IntoIterator<Item = String>) {
        self.scopes.push(names.into_iter().collect());
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string());
        }
    }

    fn use_name(&mut self, name: &str, kind: CaptureKind) {
        if self.scopes.iter().any(|scope| scope.contains(name)) {
            return;
        }
        match self.kinds.get_mut(name) {
            Some(existing) => {
                if kind == CaptureKind::Ref {
                    *existing = CaptureKind::Ref;
                }
            }
            None => {
                self.kinds.insert(name.to_string(), kind);
                self.order.push(name.to_string());
            }
        }
    }

    fn finish(mut self) -> Vec<NeedCapture> {
        self.order
            .into_iter()
            .map(|name| {
                let kind = self.kinds.remove(&name).unwrap_or(CaptureKind::Copy);
                NeedCapture { name, kind }
            })
            .collect()
    }

    fn block(&mut self, block: &Block) {
        self.push([]);
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.pop();
    }

    /// Embedded statement of an `if`/`while`: declarations stay inside it.
    fn scoped_stmt(&mut self, stmt: &Stmt) {
        self.push([]);
        self.stmt(stmt);
        self.pop();
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl(decl) => {
                if let Some(init) = &decl.init {
                    self.expr(init);
                }
                self.declare(&decl.name);
            }
            StmtKind::If(if_stmt) => {
                self.expr(&if_stmt.cond);
                self.scoped_stmt(&if_stmt.then_body);
                if let Some(else_body) = &if_stmt.else_body {
                    self.scoped_stmt(else_body);
                }
            }
            StmtKind::While(while_stmt) => {
                self.expr(&while_stmt.cond);
                self.scoped_stmt(&while_stmt.body);
            }
            StmtKind::Block(block) | StmtKind::Task(block) | StmtKind::Await(block) => self.block(block),
            StmtKind::Expr(expr) | StmtKind::Yield(expr) | StmtKind::Return(Some(expr)) => self.expr(expr),
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Continue => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Identifier { name, type_args } => {
                if type_args.is_empty() {
                    self.use_name(name, CaptureKind::Copy);
                }
            }
            ExprKind::IntLiteral(_) | ExprKind::BoolLiteral(_) | ExprKind::StringLiteral(_) => {}
            ExprKind::Binary { lhs, rhs, .. } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            ExprKind::Unary { op, operand } => match operand.as_plain_identifier() {
                Some(name) if op.is_inc_dec() => self.use_name(name, CaptureKind::Ref),
                _ => self.expr(operand),
            },
            ExprKind::Assign { target, value } => {
                match target.as_plain_identifier() {
                    Some(name) => self.use_name(name, CaptureKind::Ref),
                    None => self.expr(target),
                }
                self.expr(value);
            }
            ExprKind::Call { callee, args } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }
            ExprKind::Lambda(lambda) => {
                self.push(lambda.params.iter().map(|p| p.name.clone()));
                match &lambda.body {
                    LambdaBody::Expr(body) => self.expr(body),
                    LambdaBody::Block(body) => self.block(body),
                }
                self.pop();
            }
            ExprKind::Member { object, .. } => self.expr(object),
            ExprKind::Indexer { object, index } => {
                self.expr(object);
                self.expr(index);
            }
            ExprKind::Is { value, .. } => self.expr(value),
        }
    }
}
