// testing.rs
//
// Metadata fixtures shared by unit tests.

use std::rc::Rc;

use quill_identity::{ItemId, Name};

use crate::metadata::{FuncInfo, MetadataService, ModuleMetadataBuilder, ParamInfo, TypeInfo, TypeKind};
use crate::type_value::{TypeArgs, TypeValue};
use crate::well_known::runtime_module;

pub(crate) const FIXTURE_MODULE: &str = "Fixture";

pub(crate) fn id(path: &[(&str, usize)]) -> ItemId {
    path.iter()
        .fold(ItemId::module(FIXTURE_MODULE), |id, (name, arity)| id.child(Name::new(name), *arity))
}

pub(crate) fn param(owner: &ItemId, name: &str) -> TypeValue {
    TypeValue::type_param(owner.clone(), Name::new(name))
}

/// One of the non-generic marker types `A`..`G`.
pub(crate) fn concrete(name: &str) -> TypeValue {
    TypeValue::nominal(id(&[(name, 0)]), TypeArgs::root([]))
}

fn names(names: &[&str]) -> Vec<Name> {
    names.iter().map(|n| Name::new(n)).collect()
}

/// ```text
/// class A {} ... class G {}
/// class G<T> {}
/// class X<T, U, V> { class Y<T, U> { V F<T>(T a, U b); } }
/// class X<T, U>    { class Y<U> : G<T> { void F<V>(); } }
/// ```
pub(crate) fn nested_generics() -> MetadataService {
    let mut builder = ModuleMetadataBuilder::new(FIXTURE_MODULE);
    for name in ["A", "B", "C", "D", "E", "G"] {
        builder.add_type(TypeInfo::new(id(&[(name, 0)]), TypeKind::Class, Vec::new()));
    }
    builder.add_type(TypeInfo::new(id(&[("G", 1)]), TypeKind::Class, names(&["T"])));

    let x3 = id(&[("X", 3)]);
    let y2 = x3.child(Name::new("Y"), 2);
    let f1 = y2.child(Name::new("F"), 1);
    builder.add_type(TypeInfo::new(x3.clone(), TypeKind::Class, names(&["T", "U", "V"])));
    builder.add_type(TypeInfo::new(y2.clone(), TypeKind::Class, names(&["T", "U"])));
    builder.add_func(FuncInfo::new(
        f1.clone(),
        names(&["T"]),
        vec![ParamInfo::new("a", param(&f1, "T")), ParamInfo::new("b", param(&y2, "U"))],
        param(&x3, "V"),
    ));

    let x2 = id(&[("X", 2)]);
    let y1 = x2.child(Name::new("Y"), 1);
    builder.add_type(TypeInfo::new(x2.clone(), TypeKind::Class, names(&["T", "U"])));
    builder.add_type(
        TypeInfo::new(y1.clone(), TypeKind::Class, names(&["U"]))
            .with_base(TypeValue::nominal(id(&[("G", 1)]), TypeArgs::root([param(&x2, "T")]))),
    );
    builder.add_func(FuncInfo::new(y1.child(Name::new("F"), 1), names(&["V"]), Vec::new(), TypeValue::Void));

    MetadataService::new(vec![Rc::new(builder.build()), Rc::new(runtime_module())])
}
