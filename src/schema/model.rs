//! Types produced by parsing the definition-file grammar (§6).

/// How a schema method maps onto the runtime (§6 method-level annotations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingKind {
    None,
    /// `@map("ns::func")`
    Map(String),
    /// `@inline("expr")`
    Inline(String),
    /// `@intrinsic("name")`
    Intrinsic(String),
}

impl MappingKind {
    /// The cache's mapping-kind byte (§6 "Cache file").
    pub fn discriminant(&self) -> u8 {
        match self {
            MappingKind::None => 0,
            MappingKind::Map(_) => 1,
            MappingKind::Inline(_) => 2,
            MappingKind::Intrinsic(_) => 3,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            MappingKind::None => None,
            MappingKind::Map(v) | MappingKind::Inline(v) | MappingKind::Intrinsic(v) => Some(v),
        }
    }

    pub fn from_parts(discriminant: u8, value: String) -> Self {
        match discriminant {
            1 => MappingKind::Map(value),
            2 => MappingKind::Inline(value),
            3 => MappingKind::Intrinsic(value),
            _ => MappingKind::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamEntry {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    pub return_ty: String,
    pub shared: bool,
    pub mapping: MappingKind,
    pub params: Vec<ParamEntry>,
}

impl MethodEntry {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The mapped identifier used in the reverse index, e.g. `"ns::func"`
    /// for a `@map`-annotated method (§4.A reverse indices).
    pub fn mapped_identifier(&self) -> Option<&str> {
        match &self.mapping {
            MappingKind::Map(id) => Some(id),
            _ => None,
        }
    }
}

/// One external type declared in a definition file: a handle type, a
/// builtin, or a value type with methods (§3 "Handle type", §6 grammar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaType {
    pub name: String,
    pub builtin: bool,
    pub nocopy: bool,
    pub extends: Option<String>,
    pub alias_of: Option<String>,
    pub methods: Vec<MethodEntry>,
}

impl SchemaType {
    pub fn new(name: String) -> Self {
        Self {
            name,
            builtin: false,
            nocopy: false,
            extends: None,
            alias_of: None,
            methods: Vec::new(),
        }
    }

    /// Merge another declaration of the same type into this one (§4.A
    /// "Merge"): method lists union by (name, arity), non-conflicting
    /// attributes accumulate.
    pub fn merge(&mut self, other: SchemaType) {
        self.builtin |= other.builtin;
        self.nocopy |= other.nocopy;
        if self.extends.is_none() {
            self.extends = other.extends;
        }
        if self.alias_of.is_none() {
            self.alias_of = other.alias_of;
        }
        for method in other.methods {
            let exists = self
                .methods
                .iter()
                .any(|m| m.name == method.name && m.arity() == method.arity());
            if !exists {
                self.methods.push(method);
            }
        }
    }
}
