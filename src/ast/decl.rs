use crate::ast::expr::Expr;
use crate::ast::stmt::Block;
use crate::ast::ty::Ty;
use crate::ast::view::ViewNode;
use crate::base::{FileId, Name, Span};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackSignature {
    pub param_types: Vec<Ty>,
    pub return_ty: Ty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Name,
    pub ty: Ty,
    pub mutable: bool,
    pub by_reference: bool,
    pub callback: Option<CallbackSignature>,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateVar {
    pub name: Name,
    pub ty: Ty,
    pub mutable: bool,
    pub by_reference: bool,
    pub public: bool,
    pub init: Expr,
    pub span: Span,
}

/// A method's declared return shape: a single type, or tuple of types
/// (§3, §4.C substage 5).
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnShape {
    Void,
    Single(Ty),
    Tuple(Vec<Ty>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Name,
    pub params: Vec<Parameter>,
    pub return_shape: ReturnShape,
    pub body: Block,
    pub span: Span,
    /// Populated by the dependency analyzer (§4.B capability 2, §4.D):
    /// the set of identifiers this method's body writes.
    pub modifications: FxHashSet<Name>,
}

impl Method {
    /// One of the three lifecycle hooks with special emission treatment
    /// (§4.F "Method wrapping").
    pub fn is_lifecycle_hook(&self) -> bool {
        matches!(&*self.name, "init" | "mount" | "tick")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Name,
    pub variants: Vec<Name>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    pub name: Name,
    pub ty: Ty,
    /// 0-based position, used to drive the JSON parse emitter's field
    /// metadata bitmap (§3 "Data type").
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTypeDecl {
    pub name: Name,
    pub fields: Vec<DataField>,
    pub span: Span,
}

/// One entry of a router block: a path pattern plus the target component
/// instantiation to mount for it (§3, §4.C substage 8).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub path: String,
    pub target: crate::ast::view::ComponentInstantiation,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouterBlock {
    pub routes: Vec<RouteEntry>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: Name,
    pub module: Name,
    pub file: FileId,
    pub public: bool,
    pub params: Vec<Parameter>,
    pub state: Vec<StateVar>,
    pub methods: Vec<Method>,
    pub enums: Vec<EnumDecl>,
    pub data_types: Vec<DataTypeDecl>,
    pub view: Vec<ViewNode>,
    pub router: Option<RouterBlock>,
    pub span: Span,
}

impl Component {
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| &*m.name == name)
    }

    pub fn find_param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| &*p.name == name)
    }

    pub fn find_state(&self, name: &str) -> Option<&StateVar> {
        self.state.iter().find(|s| &*s.name == name)
    }
}

/// A parsed program: every component plus any file-level enum/data-type
/// declarations that are not nested inside a component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub components: Vec<Component>,
    pub enums: Vec<EnumDecl>,
    pub data_types: Vec<DataTypeDecl>,
    /// Direct (non-transitive) imports per source file: file → set of
    /// directly-imported files (§3 "Module / import").
    pub imports: std::collections::HashMap<FileId, FxHashSet<FileId>>,
}
