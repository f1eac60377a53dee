// src/ast.rs

use quill_identity::{Name, Span};

/// Unique identifier for syntax nodes (expressions, statements, declarations).
/// Analysis results are keyed by it in side tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a NodeId from a raw index. Only node builders should use this.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the underlying index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A whole script: declarations and top-level statements in source order.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub elements: Vec<ScriptElement>,
}

#[derive(Debug, Clone)]
pub enum ScriptElement {
    Type(TypeDecl),
    Func(FuncDecl),
    Stmt(Stmt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Enum,
}

/// `class X<T> : B<T> { ... }`
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub id: NodeId,
    pub span: Span,
    pub kind: TypeDeclKind,
    pub name: String,
    pub type_params: Vec<String>,
    pub base: Option<TypeExpr>,
    pub members: Vec<MemberDecl>,
}

#[derive(Debug, Clone)]
pub enum MemberDecl {
    Type(TypeDecl),
    Func(FuncDecl),
    Var(MemberVarDecl),
    EnumCase(EnumCaseDecl),
}

#[derive(Debug, Clone)]
pub struct MemberVarDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub ty: TypeExpr,
    pub is_static: bool,
}

#[derive(Debug, Clone)]
pub struct EnumCaseDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
}

/// Function declaration, global or member. The name is a `Name` so that
/// members can declare the reserved indexer and operator names.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Name,
    pub type_params: Vec<String>,
    pub params: Vec<Param>,
    pub ret: TypeExpr,
    /// Body produces values with `yield` instead of returning once.
    pub is_sequence: bool,
    pub is_static: bool,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub id: NodeId,
    pub span: Span,
    pub kind: TypeExprKind,
}

#[derive(Debug, Clone)]
pub enum TypeExprKind {
    /// `List<int>`, `T`
    Named {
        name: String,
        type_args: Vec<TypeExpr>,
    },
    /// `X<int>.Y<string>`
    Member {
        parent: Box<TypeExpr>,
        name: String,
        type_args: Vec<TypeExpr>,
    },
    /// `func<R, P0, P1>`
    Func {
        ret: Box<TypeExpr>,
        params: Vec<TypeExpr>,
    },
    Void,
    /// `var`: the type is taken from the initializer.
    Var,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    VarDecl(VarDecl),
    If(IfStmt),
    While(WhileStmt),
    Block(Block),
    Expr(Expr),
    Return(Option<Expr>),
    Yield(Expr),
    Break,
    Continue,
    /// Body runs as a separate task; outer locals reach it through captures.
    Task(Block),
    Await(Block),
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Identifier {
        name: String,
        type_args: Vec<TypeExpr>,
    },
    IntLiteral(i64),
    BoolLiteral(bool),
    StringLiteral(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Lambda(LambdaExpr),
    Member {
        object: Box<Expr>,
        name: String,
        type_args: Vec<TypeExpr>,
    },
    Indexer {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `value is T`
    Is {
        value: Box<Expr>,
        ty: TypeExpr,
    },
}

impl Expr {
    /// Identifier name when this is a plain (non-generic) identifier.
    pub fn as_plain_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier { name, type_args } if type_args.is_empty() => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub params: Vec<LambdaParam>,
    pub ret: Option<TypeExpr>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone)]
pub struct LambdaParam {
    pub id: NodeId,
    pub span: Span,
    pub name: String,
    pub ty: Option<TypeExpr>,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    PrefixInc,
    PrefixDec,
    PostfixInc,
    PostfixDec,
}

impl UnaryOp {
    pub fn is_inc_dec(self) -> bool {
        matches!(
            self,
            UnaryOp::PrefixInc | UnaryOp::PrefixDec | UnaryOp::PostfixInc | UnaryOp::PostfixDec
        )
    }

    pub fn is_prefix(self) -> bool {
        matches!(self, UnaryOp::PrefixInc | UnaryOp::PrefixDec)
    }

    /// Reserved member name of the operator implementing this increment/decrement.
    pub fn operator_name(self) -> Option<Name> {
        match self {
            UnaryOp::PrefixInc | UnaryOp::PostfixInc => Some(Name::OpInc),
            UnaryOp::PrefixDec | UnaryOp::PostfixDec => Some(Name::OpDec),
            UnaryOp::Neg | UnaryOp::Not => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::PrefixInc | UnaryOp::PostfixInc => "++",
            UnaryOp::PrefixDec | UnaryOp::PostfixDec => "--",
        }
    }
}
