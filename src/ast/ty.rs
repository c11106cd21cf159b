use crate::base::Name;
use std::fmt;

/// A resolved type (§3 data model, §4.C type inference table).
///
/// Array types carry an optional fixed size: `None` is a growable array
/// (`T[]`), `Some(n)` is a fixed-size array (`T[n]`) produced by an
/// array-repeat literal `[value; count]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Int32,
    Float32,
    Float64,
    UInt32,
    String,
    Bool,
    Void,
    /// No inference was possible; compatible with everything (§4.C).
    Unknown,
    /// An enum declared in the program, by name.
    Enum(Name),
    /// A data-type record declared in the program, by name.
    Data(Name),
    /// A handle type resolved from the schema (§4.A), by canonical name.
    Handle(Name),
    Array {
        elem: Box<Ty>,
        size: Option<usize>,
    },
    Tuple(Vec<Ty>),
}

impl Ty {
    pub fn array(elem: Ty) -> Self {
        Ty::Array {
            elem: Box::new(elem),
            size: None,
        }
    }

    pub fn fixed_array(elem: Ty, size: usize) -> Self {
        Ty::Array {
            elem: Box::new(elem),
            size: Some(size),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Ty::Int32 | Ty::Float32 | Ty::Float64 | Ty::UInt32
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Ty::Float32 | Ty::Float64)
    }

    pub fn named(&self) -> Option<&Name> {
        match self {
            Ty::Enum(n) | Ty::Data(n) | Ty::Handle(n) => Some(n),
            _ => None,
        }
    }

    /// Strip array decoration to expose the element type, recursively
    /// (used by the topological sorter, §4.E, to find component
    /// references inside `Foo[]` or `Foo[][]` typed state).
    pub fn strip_arrays(&self) -> &Ty {
        match self {
            Ty::Array { elem, .. } => elem.strip_arrays(),
            other => other,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int32 => write!(f, "int32"),
            Ty::Float32 => write!(f, "float32"),
            Ty::Float64 => write!(f, "float64"),
            Ty::UInt32 => write!(f, "uint32"),
            Ty::String => write!(f, "string"),
            Ty::Bool => write!(f, "bool"),
            Ty::Void => write!(f, "void"),
            Ty::Unknown => write!(f, "unknown"),
            Ty::Enum(n) | Ty::Data(n) | Ty::Handle(n) => write!(f, "{n}"),
            Ty::Array { elem, size: None } => write!(f, "{elem}[]"),
            Ty::Array {
                elem,
                size: Some(n),
            } => write!(f, "{elem}[{n}]"),
            Ty::Tuple(elems) => {
                write!(f, "(")?;
                for (i, t) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
        }
    }
}
