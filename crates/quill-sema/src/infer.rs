//! Type parameter inference for generic function calls.

use quill_identity::ItemId;

use crate::applier::TypeEnv;
use crate::type_value::TypeValue;

/// Bind the type parameters owned by `owner` that occur in `pattern` by
/// walking `actual` alongside it. The first binding of a parameter wins; a
/// conflicting later occurrence is left for the assignability check to report.
pub fn unify(pattern: &TypeValue, actual: &TypeValue, owner: &ItemId, env: &mut TypeEnv) {
    match (pattern, actual) {
        (_, TypeValue::Unresolved) => {}
        (TypeValue::TypeParam(param), _) if param.owner == *owner => {
            env.entry((**param).clone()).or_insert_with(|| actual.clone());
        }
        (TypeValue::Nominal(expected), TypeValue::Nominal(found)) if expected.id == found.id => {
            for (expected_level, found_level) in
                expected.type_args.levels().into_iter().zip(found.type_args.levels())
            {
                for (p, a) in expected_level.iter().zip(found_level) {
                    unify(p, a, owner, env);
                }
            }
        }
        (TypeValue::Function(expected), TypeValue::Function(found))
            if expected.params.len() == found.params.len() =>
        {
            unify(&expected.ret, &found.ret, owner, env);
            for (p, a) in expected.params.iter().zip(found.params.iter()) {
                unify(p, a, owner, env);
            }
        }
        _ => {}
    }
}
