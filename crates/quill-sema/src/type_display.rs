//! Type display for error messages.
//!
//! Nominal values print with their declaration path and each level's
//! arguments, without the module name: `X<int, bool>.Y<string>`.

use std::fmt;

use crate::type_value::{FuncValue, FunctionType, NominalType, TypeArgs, TypeValue};

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeValue::Void => f.write_str("void"),
            TypeValue::Unresolved => f.write_str("<unresolved>"),
            TypeValue::Nominal(nominal) => write!(f, "{}", nominal),
            TypeValue::Function(func) => write!(f, "{}", func),
            TypeValue::TypeParam(param) => write!(f, "{}", param.name),
        }
    }
}

impl fmt::Display for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_path(f, self.id.segments().iter().map(|s| &s.name), &self.type_args)
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func<{}", self.ret)?;
        for param in &self.params {
            write!(f, ", {}", param)?;
        }
        f.write_str(">")
    }
}

impl fmt::Display for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_path(f, self.id.segments().iter().map(|s| &s.name), &self.type_args)
    }
}

fn write_path<'a>(
    f: &mut fmt::Formatter<'_>,
    names: impl Iterator<Item = &'a quill_identity::Name>,
    type_args: &TypeArgs,
) -> fmt::Result {
    for (i, (name, level)) in names.zip(type_args.levels()).enumerate() {
        if i > 0 {
            f.write_str(".")?;
        }
        write!(f, "{}", name)?;
        if !level.is_empty() {
            f.write_str("<")?;
            for (j, arg) in level.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
    }
    Ok(())
}
