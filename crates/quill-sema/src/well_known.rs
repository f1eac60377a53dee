// well_known.rs
//
// Ids and metadata of the runtime module every script implicitly references.

use quill_identity::{ItemId, Name};

use crate::metadata::{FuncInfo, ModuleMetadata, ModuleMetadataBuilder, ParamInfo, TypeInfo, TypeKind, VarInfo};
use crate::type_value::{TypeArgs, TypeValue};

pub const RUNTIME_MODULE: &str = "System.Runtime";

fn runtime_type_id(name: &str, arity: usize) -> ItemId {
    ItemId::module(RUNTIME_MODULE).child(Name::new(name), arity)
}

pub fn int_id() -> ItemId {
    runtime_type_id("int", 0)
}

pub fn bool_id() -> ItemId {
    runtime_type_id("bool", 0)
}

pub fn string_id() -> ItemId {
    runtime_type_id("string", 0)
}

pub fn list_id() -> ItemId {
    runtime_type_id("List", 1)
}

/// Enumerable wrapper around sequence-function results.
pub fn seq_id() -> ItemId {
    runtime_type_id("Seq", 1)
}

pub fn int_type() -> TypeValue {
    TypeValue::nominal(int_id(), TypeArgs::root([]))
}

pub fn bool_type() -> TypeValue {
    TypeValue::nominal(bool_id(), TypeArgs::root([]))
}

pub fn string_type() -> TypeValue {
    TypeValue::nominal(string_id(), TypeArgs::root([]))
}

pub fn list_type(elem: TypeValue) -> TypeValue {
    TypeValue::nominal(list_id(), TypeArgs::root([elem]))
}

pub fn seq_type(elem: TypeValue) -> TypeValue {
    TypeValue::nominal(seq_id(), TypeArgs::root([elem]))
}

/// Build the runtime module: primitives, `List<T>`, `Seq<T>` and `print`.
pub fn runtime_module() -> ModuleMetadata {
    let mut builder = ModuleMetadataBuilder::new(RUNTIME_MODULE);

    let int = int_id();
    builder.add_type(TypeInfo::new(int.clone(), TypeKind::Primitive, Vec::new()));
    for op in [Name::OpInc, Name::OpDec] {
        builder.add_func(FuncInfo::new(int.child(op, 0), Vec::new(), Vec::new(), int_type()));
    }
    builder.add_type(TypeInfo::new(bool_id(), TypeKind::Primitive, Vec::new()));
    builder.add_type(TypeInfo::new(string_id(), TypeKind::Primitive, Vec::new()));

    let list = list_id();
    let elem = TypeValue::type_param(list.clone(), Name::new("T"));
    builder.add_type(TypeInfo::new(list.clone(), TypeKind::Class, vec![Name::new("T")]));
    builder.add_func(FuncInfo::new(
        list.child(Name::IndexerGet, 0),
        Vec::new(),
        vec![ParamInfo::new("index", int_type())],
        elem.clone(),
    ));
    builder.add_func(FuncInfo::new(
        list.child(Name::IndexerSet, 0),
        Vec::new(),
        vec![ParamInfo::new("index", int_type()), ParamInfo::new("value", elem.clone())],
        TypeValue::Void,
    ));
    builder.add_func(FuncInfo::new(
        list.child(Name::new("Add"), 0),
        Vec::new(),
        vec![ParamInfo::new("item", elem)],
        TypeValue::Void,
    ));
    builder.add_var(VarInfo::new(list.child(Name::new("Count"), 0), int_type()));

    builder.add_type(TypeInfo::new(seq_id(), TypeKind::Class, vec![Name::new("T")]));

    let root = builder.root();
    builder.add_func(
        FuncInfo::new(
            root.child(Name::new("print"), 0),
            Vec::new(),
            vec![ParamInfo::new("text", string_type())],
            TypeValue::Void,
        )
        .static_member(),
    );

    builder.build()
}
