use super::*;
use crate::errors::SemanticError;
use crate::metadata::MetadataSource;
use crate::node_map::{CallInfo, NodeInfo};
use crate::storage::{AssignTarget, StorageInfo};
use crate::type_value::TypeArgs;
use crate::well_known::{int_type, seq_type, string_type};
use quill_identity::Name;
use quill_syntax::{
    BinaryOp, FuncDecl, LambdaBody, MemberDecl, ScriptElement, Stmt, SyntaxBuilder, TypeDeclKind, UnaryOp,
};

fn analyze(elements: Vec<ScriptElement>) -> Result<AnalysisOutput, Vec<TypeError>> {
    AnalyzerBuilder::new("Main").build().analyze(&Script { elements })
}

fn check_ok(elements: Vec<ScriptElement>) -> AnalysisOutput {
    analyze(elements).unwrap_or_else(|errors| panic!("unexpected errors: {:?}", errors))
}

fn check_err(elements: Vec<ScriptElement>) -> Vec<SemanticError> {
    match analyze(elements) {
        Ok(_) => panic!("expected analysis to fail"),
        Err(errors) => errors.into_iter().map(|e| e.error).collect(),
    }
}

fn stmts(stmts: Vec<Stmt>) -> Vec<ScriptElement> {
    stmts.into_iter().map(ScriptElement::Stmt).collect()
}

fn func(b: &mut SyntaxBuilder, name: &str, params: &[(&str, &str)], ret: Option<&str>, body: Vec<Stmt>) -> FuncDecl {
    let params = params
        .iter()
        .map(|(ty, name)| {
            let ty = b.named_type(ty, vec![]);
            b.param(ty, name)
        })
        .collect();
    let ret = match ret {
        Some(ret) => b.named_type(ret, vec![]),
        None => b.void_type(),
    };
    b.func(Name::new(name), &[], params, ret, body)
}

fn main_id(path: &[(&str, usize)]) -> ItemId {
    path.iter()
        .fold(ItemId::module("Main"), |id, (name, arity)| id.child(Name::new(name), *arity))
}

// ============================================================================
// Variables and identifiers
// ============================================================================

#[test]
fn var_declaration_infers_initializer_type() {
    let mut b = SyntaxBuilder::new();
    let ty = b.var_type();
    let one = b.int(1);
    let decl = b.var_decl(ty, "x", Some(one));
    let decl_id = decl.id;

    let output = check_ok(stmts(vec![decl]));
    assert_eq!(
        output.node_map.info(decl_id),
        Some(&NodeInfo::VarDecl(StorageInfo::PrivateGlobal(0)))
    );
    assert_eq!(output.private_global_count, 1);
}

#[test]
fn var_without_initializer_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let ty = b.var_type();
    let decl = b.var_decl(ty, "x", None);
    let errors = check_err(stmts(vec![decl]));
    assert!(matches!(errors[0], SemanticError::CannotInferVarType { .. }));
}

#[test]
fn undefined_identifier_has_correct_error_type() {
    let mut b = SyntaxBuilder::new();
    let ty = b.var_type();
    let y = b.ident("y");
    let decl = b.var_decl(ty, "x", Some(y));
    let errors = check_err(stmts(vec![decl]));
    assert!(matches!(errors[0], SemanticError::UndefinedIdentifier { .. }));
}

#[test]
fn type_used_as_value_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let class = b.type_decl(TypeDeclKind::Class, "A", &[], None, vec![]);
    let ty = b.var_type();
    let a = b.ident("A");
    let decl = b.var_decl(ty, "x", Some(a));
    let errors = check_err(vec![ScriptElement::Type(class), ScriptElement::Stmt(decl)]);
    assert!(matches!(errors[0], SemanticError::TypeNotValue { .. }));
}

#[test]
fn redeclared_private_global_gets_a_new_slot() {
    let mut b = SyntaxBuilder::new();
    let int_ty = b.named_type("int", vec![]);
    let one = b.int(1);
    let first = b.var_decl(int_ty, "x", Some(one));
    let string_ty = b.named_type("string", vec![]);
    let text = b.string("a");
    let second = b.var_decl(string_ty, "x", Some(text));
    let string_ty = b.named_type("string", vec![]);
    let x = b.ident("x");
    let x_id = x.id;
    let third = b.var_decl(string_ty, "y", Some(x));

    let output = check_ok(stmts(vec![first, second, third]));
    assert_eq!(output.private_global_count, 3);
    assert_eq!(
        output.node_map.info(x_id),
        Some(&NodeInfo::Storage(StorageInfo::PrivateGlobal(1)))
    );
}

#[test]
fn mismatched_initializer_is_reported() {
    let mut b = SyntaxBuilder::new();
    let ty = b.named_type("int", vec![]);
    let text = b.string("a");
    let decl = b.var_decl(ty, "x", Some(text));
    let errors = check_err(stmts(vec![decl]));
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}

#[test]
fn void_call_cannot_initialize_a_variable() {
    let mut b = SyntaxBuilder::new();
    let print = b.ident("print");
    let text = b.string("a");
    let call = b.call(print, vec![text]);
    let ty = b.var_type();
    let decl = b.var_decl(ty, "x", Some(call));
    let errors = check_err(stmts(vec![decl]));
    assert!(matches!(errors[0], SemanticError::VoidValueUsed { .. }));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn condition_not_bool_has_correct_error_type() {
    let mut b = SyntaxBuilder::new();
    let one = b.int(1);
    let body = b.block_stmt(vec![]);
    let stmt = b.if_stmt(one, body, None);
    let errors = check_err(stmts(vec![stmt]));
    assert!(matches!(errors[0], SemanticError::ConditionNotBool { .. }));
}

#[test]
fn break_is_only_valid_inside_a_loop() {
    let mut b = SyntaxBuilder::new();
    let cond = b.bool(true);
    let inner = b.break_stmt();
    let body = b.block_stmt(vec![inner]);
    let looped = b.while_stmt(cond, body);
    check_ok(stmts(vec![looped]));

    let stray = b.break_stmt();
    let errors = check_err(stmts(vec![stray]));
    assert!(matches!(errors[0], SemanticError::InvalidBreak { .. }));
}

#[test]
fn return_without_value_in_int_function() {
    let mut b = SyntaxBuilder::new();
    let ret = b.return_stmt(None);
    let f = func(&mut b, "f", &[], Some("int"), vec![ret]);
    let errors = check_err(vec![ScriptElement::Func(f)]);
    assert!(matches!(errors[0], SemanticError::MissingReturnValue { .. }));
}

#[test]
fn sequence_function_yields_its_element_type() {
    let mut b = SyntaxBuilder::new();
    let one = b.int(1);
    let yielded = b.yield_stmt(one);
    let mut nums = func(&mut b, "nums", &[], Some("int"), vec![yielded]);
    nums.is_sequence = true;

    let callee = b.ident("nums");
    let call = b.call(callee, vec![]);
    let call_id = call.id;
    let ty = b.var_type();
    let decl = b.var_decl(ty, "s", Some(call));

    let output = check_ok(vec![ScriptElement::Func(nums), ScriptElement::Stmt(decl)]);
    assert_eq!(output.node_map.ty(call_id), Some(&seq_type(int_type())));
    let template = output
        .func_template(&main_id(&[("nums", 0)]))
        .expect("template for nums");
    assert_eq!(template.seq_return_type, Some(int_type()));
}

#[test]
fn sequence_function_cannot_return_a_value() {
    let mut b = SyntaxBuilder::new();
    let one = b.int(1);
    let ret = b.return_stmt(Some(one));
    let mut nums = func(&mut b, "nums", &[], Some("int"), vec![ret]);
    nums.is_sequence = true;
    let errors = check_err(vec![ScriptElement::Func(nums)]);
    assert!(matches!(errors[0], SemanticError::ReturnValueInSequence { .. }));
}

#[test]
fn yield_outside_sequence_function() {
    let mut b = SyntaxBuilder::new();
    let one = b.int(1);
    let yielded = b.yield_stmt(one);
    let f = func(&mut b, "f", &[], None, vec![yielded]);
    let errors = check_err(vec![ScriptElement::Func(f)]);
    assert!(matches!(errors[0], SemanticError::YieldOutsideSequence { .. }));
}

// ============================================================================
// Narrowing
// ============================================================================

fn animal_types(b: &mut SyntaxBuilder) -> Vec<ScriptElement> {
    let animal = b.type_decl(TypeDeclKind::Class, "Animal", &[], None, vec![]);
    let base = b.named_type("Animal", vec![]);
    let dog = b.type_decl(TypeDeclKind::Class, "Dog", &[], Some(base), vec![]);
    vec![ScriptElement::Type(animal), ScriptElement::Type(dog)]
}

fn dog_from(b: &mut SyntaxBuilder, name: &str, source: &str) -> Stmt {
    let ty = b.named_type("Dog", vec![]);
    let value = b.ident(source);
    b.var_decl(ty, name, Some(value))
}

fn is_dog(b: &mut SyntaxBuilder, name: &str) -> quill_syntax::Expr {
    let value = b.ident(name);
    let ty = b.named_type("Dog", vec![]);
    b.is(value, ty)
}

#[test]
fn narrowing_ends_with_the_if_statement() {
    let mut b = SyntaxBuilder::new();
    let mut elements = animal_types(&mut b);
    let cond = is_dog(&mut b, "a");
    let inside = dog_from(&mut b, "d", "a");
    let then_body = b.block_stmt(vec![inside]);
    let narrowed = b.if_stmt(cond, then_body, None);
    let after = dog_from(&mut b, "e", "a");
    elements.push(ScriptElement::Func(func(
        &mut b,
        "f",
        &[("Animal", "a")],
        None,
        vec![narrowed, after],
    )));

    let errors = check_err(elements);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}

#[test]
fn assignment_drops_narrowing() {
    let mut b = SyntaxBuilder::new();
    let mut elements = animal_types(&mut b);
    let cond = is_dog(&mut b, "a");
    let target = b.ident("a");
    let value = b.ident("other");
    let assign = b.assign(target, value);
    let reassigned = b.expr_stmt(assign);
    let inside = dog_from(&mut b, "d", "a");
    let then_body = b.block_stmt(vec![reassigned, inside]);
    let narrowed = b.if_stmt(cond, then_body, None);
    elements.push(ScriptElement::Func(func(
        &mut b,
        "f",
        &[("Animal", "a"), ("Animal", "other")],
        None,
        vec![narrowed],
    )));

    let errors = check_err(elements);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}

#[test]
fn assignment_in_nested_block_keeps_narrowing_dropped() {
    let mut b = SyntaxBuilder::new();
    let mut elements = animal_types(&mut b);
    let cond = is_dog(&mut b, "a");
    let target = b.ident("a");
    let value = b.ident("other");
    let assign = b.assign(target, value);
    let reassigned = b.expr_stmt(assign);
    let inner = b.block_stmt(vec![reassigned]);
    let after_inner = dog_from(&mut b, "d", "a");
    let then_body = b.block_stmt(vec![inner, after_inner]);
    let narrowed = b.if_stmt(cond, then_body, None);
    elements.push(ScriptElement::Func(func(
        &mut b,
        "f",
        &[("Animal", "a"), ("Animal", "other")],
        None,
        vec![narrowed],
    )));

    let errors = check_err(elements);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::TypeMismatch { .. }));
}

#[test]
fn is_test_requires_a_nominal_type() {
    let mut b = SyntaxBuilder::new();
    let one = b.int(1);
    let void = b.void_type();
    let test = b.is(one, void);
    let stmt = b.expr_stmt(test);
    let errors = check_err(stmts(vec![stmt]));
    assert!(matches!(errors[0], SemanticError::InvalidTypeTest { .. }));
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn enum_case_is_a_read_only_storage() {
    let mut b = SyntaxBuilder::new();
    let red = b.enum_case("Red");
    let green = b.enum_case("Green");
    let color = b.type_decl(TypeDeclKind::Enum, "Color", &[], None, vec![red, green]);
    let object = b.ident("Color");
    let access = b.member(object, "Red");
    let access_id = access.id;
    let ty = b.var_type();
    let decl = b.var_decl(ty, "c", Some(access));

    let output = check_ok(vec![ScriptElement::Type(color.clone()), ScriptElement::Stmt(decl)]);
    assert_eq!(
        output.node_map.info(access_id),
        Some(&NodeInfo::Storage(StorageInfo::EnumCase(Name::new("Red"))))
    );

    let object = b.ident("Color");
    let target = b.member(object, "Red");
    let object = b.ident("Color");
    let value = b.member(object, "Green");
    let assign = b.assign(target, value);
    let stmt = b.expr_stmt(assign);
    let errors = check_err(vec![ScriptElement::Type(color), ScriptElement::Stmt(stmt)]);
    assert!(matches!(errors[0], SemanticError::NotAssignable { .. }));
}

#[test]
fn instance_var_through_type_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let int_ty = b.named_type("int", vec![]);
    let x = b.member_var(int_ty, "x", false);
    let point = b.type_decl(TypeDeclKind::Class, "Point", &[], None, vec![x]);
    let object = b.ident("Point");
    let access = b.member(object, "x");
    let ret = b.return_stmt(Some(access));
    let f = func(&mut b, "f", &[], Some("int"), vec![ret]);

    let errors = check_err(vec![ScriptElement::Type(point), ScriptElement::Func(f)]);
    assert!(matches!(
        errors[0],
        SemanticError::StaticInstanceMismatch { kind: "an instance", .. }
    ));
}

#[test]
fn static_var_assignment_is_direct() {
    let mut b = SyntaxBuilder::new();
    let int_ty = b.named_type("int", vec![]);
    let limit = b.member_var(int_ty, "limit", true);
    let config = b.type_decl(TypeDeclKind::Class, "Config", &[], None, vec![limit]);
    let object = b.ident("Config");
    let target = b.member(object, "limit");
    let three = b.int(3);
    let assign = b.assign(target, three);
    let assign_id = assign.id;
    let stmt = b.expr_stmt(assign);
    let f = func(&mut b, "f", &[], None, vec![stmt]);

    let output = check_ok(vec![ScriptElement::Type(config), ScriptElement::Func(f)]);
    let limit_id = main_id(&[("Config", 0), ("limit", 0)]);
    let Some(NodeInfo::Assign(AssignTarget::Direct { storage, ty })) = output.node_map.info(assign_id) else {
        panic!("expected a direct assignment");
    };
    assert_eq!(ty, &int_type());
    assert!(matches!(
        storage,
        StorageInfo::StaticMember { object: None, var } if var.id == limit_id
    ));
}

#[test]
fn instance_method_call_records_receiver() {
    let mut b = SyntaxBuilder::new();
    let a = b.ident("a");
    let a2 = b.ident("a");
    let sum = b.binary(BinaryOp::Add, a, a2);
    let ret = b.return_stmt(Some(sum));
    let twice = func(&mut b, "Twice", &[("int", "a")], Some("int"), vec![ret]);
    let counter = b.type_decl(TypeDeclKind::Class, "Counter", &[], None, vec![MemberDecl::Func(twice)]);

    let receiver = b.ident("c");
    let receiver_id = receiver.id;
    let callee = b.member(receiver, "Twice");
    let two = b.int(2);
    let call = b.call(callee, vec![two]);
    let call_id = call.id;
    let ret = b.return_stmt(Some(call));
    let user = func(&mut b, "use", &[("Counter", "c")], Some("int"), vec![ret]);

    let output = check_ok(vec![ScriptElement::Type(counter), ScriptElement::Func(user)]);
    let Some(NodeInfo::Call(CallInfo::Func { func, object })) = output.node_map.info(call_id) else {
        panic!("expected a function call");
    };
    assert_eq!(func.id, main_id(&[("Counter", 0), ("Twice", 0)]));
    assert_eq!(*object, Some(receiver_id));
    let template = output.func_template(&func.id).expect("template for Twice");
    assert!(template.is_this_call);
    assert_eq!(template.local_count, 1);
}

#[test]
fn inherited_member_and_base_assignment() {
    let mut b = SyntaxBuilder::new();
    let int_ty = b.named_type("int", vec![]);
    let x = b.member_var(int_ty, "x", false);
    let base = b.type_decl(TypeDeclKind::Class, "Base", &[], None, vec![x]);
    let base_ref = b.named_type("Base", vec![]);
    let derived = b.type_decl(TypeDeclKind::Class, "Derived", &[], Some(base_ref), vec![]);

    let base_ty = b.named_type("Base", vec![]);
    let d = b.ident("d");
    let upcast = b.var_decl(base_ty, "b", Some(d));
    let d = b.ident("d");
    let access = b.member(d, "x");
    let access_id = access.id;
    let ret = b.return_stmt(Some(access));
    let f = func(&mut b, "f", &[("Derived", "d")], Some("int"), vec![upcast, ret]);

    let output = check_ok(vec![
        ScriptElement::Type(base),
        ScriptElement::Type(derived),
        ScriptElement::Func(f),
    ]);
    assert_eq!(output.node_map.ty(access_id), Some(&int_type()));
    assert!(matches!(
        output.node_map.info(access_id),
        Some(NodeInfo::Storage(StorageInfo::InstanceMember { .. }))
    ));
}

#[test]
fn nested_type_is_instantiated_with_enclosing_parameters() {
    let mut b = SyntaxBuilder::new();
    let inner = b.type_decl(TypeDeclKind::Class, "Inner", &[], None, vec![]);
    let make = func(&mut b, "make", &[], Some("Inner"), vec![]);
    let outer = b.type_decl(
        TypeDeclKind::Class,
        "Outer",
        &["T"],
        None,
        vec![MemberDecl::Type(inner), MemberDecl::Func(make)],
    );

    let output = check_ok(vec![ScriptElement::Type(outer)]);
    let outer_id = main_id(&[("Outer", 1)]);
    let info = output
        .script_metadata
        .func_info(&outer_id.child(Name::new("make"), 0))
        .expect("make is declared");
    let expected = TypeValue::nominal(
        outer_id.child(Name::new("Inner"), 0),
        TypeArgs::nested(TypeArgs::root([TypeValue::type_param(outer_id.clone(), Name::new("T"))]), []),
    );
    assert_eq!(info.ret, expected);
}

// ============================================================================
// Calls
// ============================================================================

fn identity_func(b: &mut SyntaxBuilder) -> FuncDecl {
    let t = b.named_type("T", vec![]);
    let param = b.param(t, "x");
    let ret = b.named_type("T", vec![]);
    let x = b.ident("x");
    let body = b.return_stmt(Some(x));
    b.func(Name::new("id"), &["T"], vec![param], ret, vec![body])
}

#[test]
fn generic_call_infers_type_arguments() {
    let mut b = SyntaxBuilder::new();
    let id = identity_func(&mut b);
    let callee = b.ident("id");
    let text = b.string("a");
    let call = b.call(callee, vec![text]);
    let call_id = call.id;
    let ty = b.var_type();
    let decl = b.var_decl(ty, "y", Some(call));

    let output = check_ok(vec![ScriptElement::Func(id), ScriptElement::Stmt(decl)]);
    assert_eq!(output.node_map.ty(call_id), Some(&string_type()));
    let Some(NodeInfo::Call(CallInfo::Func { func, object: None })) = output.node_map.info(call_id) else {
        panic!("expected a static call");
    };
    assert_eq!(func.type_args.args(), &[string_type()]);
}

#[test]
fn uninferable_type_argument_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let ret = b.named_type("T", vec![]);
    let make = b.func(Name::new("make"), &["T"], vec![], ret, vec![]);
    let callee = b.ident("make");
    let call = b.call(callee, vec![]);
    let stmt = b.expr_stmt(call);
    let errors = check_err(vec![ScriptElement::Func(make), ScriptElement::Stmt(stmt)]);
    assert!(matches!(errors[0], SemanticError::CannotInferTypeArgs { .. }));
}

#[test]
fn wrong_argument_count_has_correct_error_type() {
    let mut b = SyntaxBuilder::new();
    let print = b.ident("print");
    let first = b.string("a");
    let second = b.string("b");
    let call = b.call(print, vec![first, second]);
    let stmt = b.expr_stmt(call);
    let errors = check_err(stmts(vec![stmt]));
    assert!(matches!(
        errors[0],
        SemanticError::WrongArgumentCount { expected: 1, found: 2, .. }
    ));
}

#[test]
fn calling_an_int_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let ty = b.named_type("int", vec![]);
    let one = b.int(1);
    let decl = b.var_decl(ty, "x", Some(one));
    let callee = b.ident("x");
    let call = b.call(callee, vec![]);
    let stmt = b.expr_stmt(call);
    let errors = check_err(stmts(vec![decl, stmt]));
    assert!(matches!(errors[0], SemanticError::NotCallable { .. }));
}

// ============================================================================
// Increment/decrement and indexers
// ============================================================================

#[test]
fn increment_without_operator_is_an_error() {
    let mut b = SyntaxBuilder::new();
    let ty = b.named_type("string", vec![]);
    let text = b.string("a");
    let decl = b.var_decl(ty, "s", Some(text));
    let s = b.ident("s");
    let inc = b.unary(UnaryOp::PostfixInc, s);
    let stmt = b.expr_stmt(inc);
    let errors = check_err(stmts(vec![decl, stmt]));
    assert!(matches!(errors[0], SemanticError::OperatorNotFound { .. }));
}

#[test]
fn list_indexer_read_and_write() {
    let mut b = SyntaxBuilder::new();
    let int_arg = b.named_type("int", vec![]);
    let list_ty = b.named_type("List", vec![int_arg]);
    let param = b.param(list_ty, "xs");
    let xs = b.ident("xs");
    let zero = b.int(0);
    let target = b.indexer(xs, zero);
    let five = b.int(5);
    let assign = b.assign(target, five);
    let assign_id = assign.id;
    let store = b.expr_stmt(assign);
    let xs = b.ident("xs");
    let zero = b.int(0);
    let read = b.indexer(xs, zero);
    let read_id = read.id;
    let ret = b.return_stmt(Some(read));
    let ret_ty = b.named_type("int", vec![]);
    let first = b.func(Name::new("first"), &[], vec![param], ret_ty, vec![store, ret]);

    let output = check_ok(vec![ScriptElement::Func(first)]);
    assert!(matches!(
        output.node_map.info(assign_id),
        Some(NodeInfo::Assign(AssignTarget::CallBased { .. }))
    ));
    assert!(matches!(output.node_map.info(read_id), Some(NodeInfo::Indexer { .. })));
    assert_eq!(output.node_map.ty(read_id), Some(&int_type()));
}

// ============================================================================
// Lambdas
// ============================================================================

#[test]
fn lambda_parameters_come_from_expected_type() {
    let mut b = SyntaxBuilder::new();
    let ret = b.named_type("int", vec![]);
    let param_ty = b.named_type("int", vec![]);
    let declared = b.func_type(ret, vec![param_ty]);
    let x = b.lambda_param("x", None);
    let body_x = b.ident("x");
    let one = b.int(1);
    let sum = b.binary(BinaryOp::Add, body_x, one);
    let lambda = b.lambda(vec![x], None, LambdaBody::Expr(Box::new(sum)));
    let lambda_id = lambda.id;
    let decl = b.var_decl(declared, "f", Some(lambda));

    let output = check_ok(stmts(vec![decl]));
    assert_eq!(
        output.node_map.ty(lambda_id),
        Some(&TypeValue::function(int_type(), [int_type()]))
    );
    let Some(NodeInfo::Lambda(info)) = output.node_map.info(lambda_id) else {
        panic!("expected lambda info");
    };
    assert!(info.captures.is_empty());
    assert_eq!(output.templates[info.template].kind, TemplateKind::Lambda(lambda_id));
    assert_eq!(output.templates[info.template].local_count, 1);
}

#[test]
fn untyped_lambda_parameter_needs_a_hint() {
    let mut b = SyntaxBuilder::new();
    let x = b.lambda_param("x", None);
    let body = b.ident("x");
    let lambda = b.lambda(vec![x], None, LambdaBody::Expr(Box::new(body)));
    let ty = b.var_type();
    let decl = b.var_decl(ty, "f", Some(lambda));
    let errors = check_err(stmts(vec![decl]));
    assert!(matches!(errors[0], SemanticError::CannotInferLambdaParam { .. }));
}

#[test]
fn lambda_captures_enclosing_local_by_reference() {
    let mut b = SyntaxBuilder::new();
    let int_ty = b.named_type("int", vec![]);
    let zero = b.int(0);
    let counter = b.var_decl(int_ty, "n", Some(zero));
    let n = b.ident("n");
    let inc = b.unary(UnaryOp::PostfixInc, n);
    let inc_stmt = b.expr_stmt(inc);
    let body = b.block(vec![inc_stmt]);
    let lambda = b.lambda(vec![], None, LambdaBody::Block(body));
    let lambda_id = lambda.id;
    let ty = b.var_type();
    let holder = b.var_decl(ty, "bump", Some(lambda));
    let run = func(&mut b, "run", &[], None, vec![counter, holder]);

    let output = check_ok(vec![ScriptElement::Func(run)]);
    let Some(NodeInfo::Lambda(info)) = output.node_map.info(lambda_id) else {
        panic!("expected lambda info");
    };
    assert_eq!(info.captures.len(), 1);
    let capture = &info.captures[0];
    assert_eq!(capture.name, "n");
    assert_eq!(capture.kind, crate::capture::CaptureKind::Ref);
    assert_eq!(capture.storage, StorageInfo::Local(0));
    assert_eq!(capture.local, 0);
    assert_eq!(output.node_map.ty(lambda_id), Some(&TypeValue::function(TypeValue::Void, [])));
}

#[test]
fn lambda_calls_generic_function_without_capturing_it() {
    let mut b = SyntaxBuilder::new();
    let id = identity_func(&mut b);
    let callee = b.ident("id");
    let text = b.string("a");
    let call = b.call(callee, vec![text]);
    let call_id = call.id;
    let lambda = b.lambda(vec![], None, LambdaBody::Expr(Box::new(call)));
    let lambda_id = lambda.id;
    let ty = b.var_type();
    let decl = b.var_decl(ty, "f", Some(lambda));

    let output = check_ok(vec![ScriptElement::Func(id), ScriptElement::Stmt(decl)]);
    let Some(NodeInfo::Lambda(info)) = output.node_map.info(lambda_id) else {
        panic!("expected lambda info");
    };
    assert!(info.captures.is_empty());
    assert_eq!(output.node_map.ty(call_id), Some(&string_type()));
    assert_eq!(output.node_map.ty(lambda_id), Some(&TypeValue::function(string_type(), [])));
}

#[test]
fn unresolvable_capture_fails_the_lambda() {
    let mut b = SyntaxBuilder::new();
    let body = b.ident("missing");
    let lambda = b.lambda(vec![], None, LambdaBody::Expr(Box::new(body)));
    let ty = b.var_type();
    let decl = b.var_decl(ty, "f", Some(lambda));
    let errors = check_err(stmts(vec![decl]));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::CaptureFailed { .. }));
}

// ============================================================================
// Structural failures
// ============================================================================

#[test]
fn duplicate_type_aborts_analysis() {
    let mut b = SyntaxBuilder::new();
    let first = b.type_decl(TypeDeclKind::Class, "A", &[], None, vec![]);
    let second = b.type_decl(TypeDeclKind::Class, "A", &[], None, vec![]);
    let errors = check_err(vec![ScriptElement::Type(first), ScriptElement::Type(second)]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SemanticError::DuplicateDeclaration { .. }));
}

#[test]
fn cyclic_base_types_abort_analysis() {
    let mut b = SyntaxBuilder::new();
    let b_ref = b.named_type("B", vec![]);
    let a = b.type_decl(TypeDeclKind::Class, "A", &[], Some(b_ref), vec![]);
    let a_ref = b.named_type("A", vec![]);
    let cls_b = b.type_decl(TypeDeclKind::Class, "B", &[], Some(a_ref), vec![]);
    let errors = check_err(vec![ScriptElement::Type(a), ScriptElement::Type(cls_b)]);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, SemanticError::CyclicBaseType { .. })));
}

#[test]
fn enum_cannot_be_a_base_type() {
    let mut b = SyntaxBuilder::new();
    let case = b.enum_case("One");
    let e = b.type_decl(TypeDeclKind::Enum, "E", &[], None, vec![case]);
    let base = b.named_type("E", vec![]);
    let derived = b.type_decl(TypeDeclKind::Class, "D", &[], Some(base), vec![]);
    let errors = check_err(vec![ScriptElement::Type(e), ScriptElement::Type(derived)]);
    assert!(matches!(errors[0], SemanticError::InvalidBaseType { .. }));
}
