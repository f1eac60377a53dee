// errors/mod.rs
//! Semantic analysis errors (E2xxx).

#![allow(unused_assignments)] // False positives from thiserror derive

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    // ========================================================================
    // Declarations
    // ========================================================================
    #[error("'{name}' is declared more than once")]
    #[diagnostic(code(E2001))]
    DuplicateDeclaration {
        name: String,
        #[label("duplicate declaration")]
        span: SourceSpan,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(code(E2002))]
    UnknownType {
        name: String,
        #[label("no type with this name and arity")]
        span: SourceSpan,
    },

    #[error("type '{name}' is ambiguous ({count} candidates)")]
    #[diagnostic(code(E2003), help("several referenced modules declare this type"))]
    AmbiguousType {
        name: String,
        count: usize,
        #[label("ambiguous type")]
        span: SourceSpan,
    },

    #[error("'{found}' cannot be used as a base type")]
    #[diagnostic(code(E2004))]
    InvalidBaseType {
        found: String,
        #[label("expected a class or struct")]
        span: SourceSpan,
    },

    #[error("type '{name}' inherits from itself")]
    #[diagnostic(code(E2005))]
    CyclicBaseType {
        name: String,
        #[label("base type cycle")]
        span: SourceSpan,
    },

    #[error("'var' is only allowed on local variable declarations")]
    #[diagnostic(code(E2006))]
    InvalidVarType {
        #[label("type must be written out here")]
        span: SourceSpan,
    },

    // ========================================================================
    // Identifiers and members
    // ========================================================================
    #[error("undefined identifier '{name}'")]
    #[diagnostic(code(E2010))]
    UndefinedIdentifier {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("identifier '{name}' is ambiguous ({count} candidates)")]
    #[diagnostic(code(E2011))]
    AmbiguousIdentifier {
        name: String,
        count: usize,
        #[label("matches more than one declaration")]
        span: SourceSpan,
    },

    #[error("type '{name}' used as a value")]
    #[diagnostic(code(E2012))]
    TypeNotValue {
        name: String,
        #[label("expected a value")]
        span: SourceSpan,
    },

    #[error("'{ty}' has no member '{member}'")]
    #[diagnostic(code(E2013))]
    UnknownMember {
        ty: String,
        member: String,
        #[label("unknown member")]
        span: SourceSpan,
    },

    #[error("member '{member}' of '{ty}' is ambiguous ({count} candidates)")]
    #[diagnostic(code(E2014))]
    AmbiguousMember {
        ty: String,
        member: String,
        count: usize,
        #[label("ambiguous member")]
        span: SourceSpan,
    },

    #[error("'{member}' takes {expected} type arguments, found {found}")]
    #[diagnostic(code(E2015))]
    MemberTypeArgs {
        member: String,
        expected: usize,
        found: usize,
        #[label("wrong number of type arguments")]
        span: SourceSpan,
    },

    #[error("'{member}' is {kind} member")]
    #[diagnostic(code(E2016))]
    StaticInstanceMismatch {
        member: String,
        /// "a static" or "an instance"
        kind: &'static str,
        #[label("wrong kind of access")]
        span: SourceSpan,
    },

    // ========================================================================
    // Types of expressions
    // ========================================================================
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(E2020))]
    TypeMismatch {
        expected: String,
        found: String,
        #[label("type mismatch")]
        span: SourceSpan,
    },

    #[error("condition must be bool, found {found}")]
    #[diagnostic(code(E2021))]
    ConditionNotBool {
        found: String,
        #[label("expected bool")]
        span: SourceSpan,
    },

    #[error("void value used")]
    #[diagnostic(code(E2022))]
    VoidValueUsed {
        #[label("this expression produces no value")]
        span: SourceSpan,
    },

    #[error("cannot infer the type of '{name}'")]
    #[diagnostic(code(E2023), help("add an initializer or write the type"))]
    CannotInferVarType {
        name: String,
        #[label("type unknown")]
        span: SourceSpan,
    },

    #[error("'{ty}' is not a class, struct or enum type")]
    #[diagnostic(code(E2024))]
    InvalidTypeTest {
        ty: String,
        #[label("cannot test against this type")]
        span: SourceSpan,
    },

    #[error("operator '{op}' cannot be applied to {operand}")]
    #[diagnostic(code(E2025))]
    InvalidOperand {
        op: String,
        operand: String,
        #[label("invalid operand")]
        span: SourceSpan,
    },

    // ========================================================================
    // Assignment targets, operators and indexers
    // ========================================================================
    #[error("expression is not assignable")]
    #[diagnostic(code(E2030))]
    NotAssignable {
        #[label("cannot assign to this")]
        span: SourceSpan,
    },

    #[error("'{ty}' has no {op}")]
    #[diagnostic(code(E2031))]
    OperatorNotFound {
        ty: String,
        op: String,
        #[label("operator not found")]
        span: SourceSpan,
    },

    #[error("{op} of '{ty}' has an incompatible signature")]
    #[diagnostic(code(E2032))]
    OperatorSignatureMismatch {
        ty: String,
        op: String,
        #[label("{detail}")]
        span: SourceSpan,
        detail: String,
    },

    #[error("'{ty}' has no indexer")]
    #[diagnostic(code(E2033))]
    IndexerNotFound {
        ty: String,
        #[label("cannot index")]
        span: SourceSpan,
    },

    #[error("indexer of '{ty}' is read-only")]
    #[diagnostic(code(E2034))]
    ReadOnlyIndexer {
        ty: String,
        #[label("no indexer setter")]
        span: SourceSpan,
    },

    #[error("indexer of '{ty}' is write-only")]
    #[diagnostic(code(E2035))]
    WriteOnlyIndexer {
        ty: String,
        #[label("no indexer getter")]
        span: SourceSpan,
    },

    // ========================================================================
    // Calls
    // ========================================================================
    #[error("'{ty}' is not callable")]
    #[diagnostic(code(E2040))]
    NotCallable {
        ty: String,
        #[label("not a function")]
        span: SourceSpan,
    },

    #[error("expected {expected} arguments, found {found}")]
    #[diagnostic(code(E2041))]
    WrongArgumentCount {
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("cannot infer type argument '{param}' of '{func}'")]
    #[diagnostic(code(E2042), help("pass the type arguments explicitly"))]
    CannotInferTypeArgs {
        func: String,
        param: String,
        #[label("type argument not inferred")]
        span: SourceSpan,
    },

    // ========================================================================
    // Lambdas and captures
    // ========================================================================
    #[error("cannot capture '{name}'")]
    #[diagnostic(code(E2050))]
    CaptureFailed {
        name: String,
        #[label("captured variable does not resolve")]
        span: SourceSpan,
    },

    #[error("cannot infer the type of lambda parameter '{name}'")]
    #[diagnostic(code(E2051), help("annotate the parameter or pass the lambda where a function type is expected"))]
    CannotInferLambdaParam {
        name: String,
        #[label("type unknown")]
        span: SourceSpan,
    },

    // ========================================================================
    // Control flow
    // ========================================================================
    #[error("missing return value, expected {expected}")]
    #[diagnostic(code(E2060))]
    MissingReturnValue {
        expected: String,
        #[label("return needs a value")]
        span: SourceSpan,
    },

    #[error("cannot return a value from a sequence function")]
    #[diagnostic(code(E2061), help("use 'yield' to produce values"))]
    ReturnValueInSequence {
        #[label("value not allowed")]
        span: SourceSpan,
    },

    #[error("'yield' outside of a sequence function")]
    #[diagnostic(code(E2062))]
    YieldOutsideSequence {
        #[label("not in a sequence function")]
        span: SourceSpan,
    },

    #[error("break outside of loop")]
    #[diagnostic(code(E2063))]
    InvalidBreak {
        #[label("not inside a loop")]
        span: SourceSpan,
    },

    #[error("continue outside of loop")]
    #[diagnostic(code(E2064))]
    InvalidContinue {
        #[label("not inside a loop")]
        span: SourceSpan,
    },
}
