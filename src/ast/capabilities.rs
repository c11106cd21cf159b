//! The three tree capabilities named in §4.B: free-identifier collection,
//! modification collection, and staticness. These are the primitives the
//! dependency analyzer (component D) and the view compiler (component F)
//! build on.

use crate::ast::expr::{Expr, ExprKind, StringSegment};
use crate::ast::stmt::{Block, Stmt};
use crate::base::Name;
use rustc_hash::FxHashSet;

/// A structured (object, member) dependency recorded for member access,
/// used by cross-component change-notification wiring (§4.D item 2).
pub type MemberDep = (Name, Name);

/// §4.B capability 1: free-identifier collection.
pub trait FreeIdentifiers {
    /// The set of identifiers this node reads.
    fn free_identifiers(&self) -> FxHashSet<Name>;

    /// Structured (object, member) pairs for every member access reached,
    /// in addition to the plain identifier set above.
    fn member_deps(&self) -> Vec<MemberDep>;
}

/// §4.B capability 2: modification collection.
pub trait Modifications {
    /// The set of identifiers this statement writes.
    fn modifications(&self) -> FxHashSet<Name>;
}

/// §4.B capability 3: staticness (expressions only).
pub trait Staticness {
    /// True iff this expression can be evaluated at emission time with no
    /// runtime dependency.
    fn is_static(&self) -> bool;
}

const MUTATING_METHODS: &[&str] = &["push", "push_back", "pop", "pop_back", "clear"];

impl FreeIdentifiers for Expr {
    fn free_identifiers(&self) -> FxHashSet<Name> {
        let mut out = FxHashSet::default();
        collect_free_idents(self, &mut out);
        out
    }

    fn member_deps(&self) -> Vec<MemberDep> {
        let mut out = Vec::new();
        collect_member_deps(self, &mut out);
        out
    }
}

fn collect_free_idents(expr: &Expr, out: &mut FxHashSet<Name>) {
    match &expr.kind {
        ExprKind::IntLit(_) | ExprKind::FloatLit(_) | ExprKind::BoolLit(_) => {}
        ExprKind::StringLit(segments) => {
            for seg in segments {
                if let StringSegment::Interp(inner) = seg {
                    collect_free_idents(inner, out);
                }
            }
        }
        ExprKind::Ident(name) => {
            out.insert(name.clone());
        }
        ExprKind::Member { object, .. } => {
            // The object is both a read and (separately) a structured
            // dependency — §4.B capability 1.
            collect_free_idents(object, out);
        }
        ExprKind::Index { object, index } => {
            collect_free_idents(object, out);
            collect_free_idents(index, out);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_free_idents(lhs, out);
            collect_free_idents(rhs, out);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
            collect_free_idents(operand, out);
        }
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_free_idents(cond, out);
            collect_free_idents(then_branch, out);
            collect_free_idents(else_branch, out);
        }
        ExprKind::Call { callee, args } => {
            // The receiver of a dotted name is recorded via the callee's
            // own free identifiers (its Member object), per §4.B.
            collect_free_idents(callee, out);
            for arg in args {
                collect_free_idents(&arg.expr, out);
            }
        }
        ExprKind::EnumAccess { .. } => {}
        ExprKind::ArrayLit(items) => {
            for item in items {
                collect_free_idents(item, out);
            }
        }
        ExprKind::ArrayRepeat { value, .. } => {
            collect_free_idents(value, out);
        }
        ExprKind::Reference(inner) | ExprKind::Move(inner) => {
            collect_free_idents(inner, out);
        }
        ExprKind::Match { scrutinee, arms } => {
            collect_free_idents(scrutinee, out);
            for arm in arms {
                collect_free_idents(&arm.body, out);
            }
        }
        ExprKind::Block(block) => {
            collect_block_free_idents(block, out);
        }
    }
}

fn collect_block_free_idents(block: &Block, out: &mut FxHashSet<Name>) {
    for stmt in &block.statements {
        collect_stmt_free_idents(stmt, out);
    }
}

fn collect_stmt_free_idents(stmt: &Stmt, out: &mut FxHashSet<Name>) {
    match stmt {
        Stmt::ExprStmt(e) => collect_free_idents(e, out),
        Stmt::VarDecl(d) => collect_free_idents(&d.init, out),
        Stmt::Assign(a) => {
            // The target is a write, not a read (§4.B rule 2 vs rule 1);
            // only the assigned value is a free identifier here.
            collect_free_idents(&a.value, out);
        }
        Stmt::CompoundIndexAssign(a) => {
            collect_free_idents(&a.target, out);
            collect_free_idents(&a.index, out);
            collect_free_idents(&a.value, out);
        }
        Stmt::MemberAssign(a) => {
            collect_free_idents(&a.target, out);
            collect_free_idents(&a.value, out);
        }
        Stmt::TupleDestructure(d) => collect_free_idents(&d.call, out),
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Single(e),
            ..
        } => collect_free_idents(e, out),
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Tuple(es),
            ..
        } => {
            for e in es {
                collect_free_idents(e, out);
            }
        }
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Void,
            ..
        } => {}
        Stmt::Block(b) => collect_block_free_idents(b, out),
        Stmt::IfElse(s) => {
            collect_free_idents(&s.cond, out);
            collect_block_free_idents(&s.then_block, out);
            if let Some(else_block) = &s.else_block {
                collect_block_free_idents(else_block, out);
            }
        }
        Stmt::RangeFor(s) => {
            collect_free_idents(&s.start, out);
            collect_free_idents(&s.end, out);
            collect_block_free_idents(&s.body, out);
        }
        Stmt::EachFor(s) => {
            collect_free_idents(&s.iterable, out);
            collect_block_free_idents(&s.body, out);
        }
    }
}

fn collect_member_deps(expr: &Expr, out: &mut Vec<MemberDep>) {
    if let ExprKind::Member { object, member } = &expr.kind
        && let Some(root) = object.root_identifier()
    {
        out.push((root.clone(), member.clone()));
    }
    match &expr.kind {
        ExprKind::Member { object, .. } => collect_member_deps(object, out),
        ExprKind::Index { object, index } => {
            collect_member_deps(object, out);
            collect_member_deps(index, out);
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_member_deps(lhs, out);
            collect_member_deps(rhs, out);
        }
        ExprKind::Unary { operand, .. } | ExprKind::Postfix { operand, .. } => {
            collect_member_deps(operand, out)
        }
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            collect_member_deps(cond, out);
            collect_member_deps(then_branch, out);
            collect_member_deps(else_branch, out);
        }
        ExprKind::Call { callee, args } => {
            collect_member_deps(callee, out);
            for arg in args {
                collect_member_deps(&arg.expr, out);
            }
        }
        ExprKind::Reference(inner) | ExprKind::Move(inner) => collect_member_deps(inner, out),
        ExprKind::StringLit(segments) => {
            for seg in segments {
                if let StringSegment::Interp(inner) = seg {
                    collect_member_deps(inner, out);
                }
            }
        }
        ExprKind::ArrayLit(items) => {
            for item in items {
                collect_member_deps(item, out);
            }
        }
        ExprKind::ArrayRepeat { value, .. } => collect_member_deps(value, out),
        ExprKind::Match { scrutinee, arms } => {
            collect_member_deps(scrutinee, out);
            for arm in arms {
                collect_member_deps(&arm.body, out);
            }
        }
        ExprKind::Block(block) => collect_block_member_deps(block, out),
        _ => {}
    }
}

fn collect_block_member_deps(block: &Block, out: &mut Vec<MemberDep>) {
    for stmt in &block.statements {
        collect_stmt_member_deps(stmt, out);
    }
}

fn collect_stmt_member_deps(stmt: &Stmt, out: &mut Vec<MemberDep>) {
    match stmt {
        Stmt::ExprStmt(e) => collect_member_deps(e, out),
        Stmt::VarDecl(d) => collect_member_deps(&d.init, out),
        Stmt::Assign(a) => collect_member_deps(&a.value, out),
        Stmt::CompoundIndexAssign(a) => {
            collect_member_deps(&a.target, out);
            collect_member_deps(&a.index, out);
            collect_member_deps(&a.value, out);
        }
        Stmt::MemberAssign(a) => {
            collect_member_deps(&a.target, out);
            collect_member_deps(&a.value, out);
        }
        Stmt::TupleDestructure(d) => collect_member_deps(&d.call, out),
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Single(e),
            ..
        } => collect_member_deps(e, out),
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Tuple(es),
            ..
        } => {
            for e in es {
                collect_member_deps(e, out);
            }
        }
        Stmt::Return {
            value: crate::ast::stmt::ReturnValue::Void,
            ..
        } => {}
        Stmt::Block(b) => collect_block_member_deps(b, out),
        Stmt::IfElse(s) => {
            collect_member_deps(&s.cond, out);
            collect_block_member_deps(&s.then_block, out);
            if let Some(else_block) = &s.else_block {
                collect_block_member_deps(else_block, out);
            }
        }
        Stmt::RangeFor(s) => {
            collect_member_deps(&s.start, out);
            collect_member_deps(&s.end, out);
            collect_block_member_deps(&s.body, out);
        }
        Stmt::EachFor(s) => {
            collect_member_deps(&s.iterable, out);
            collect_block_member_deps(&s.body, out);
        }
    }
}

impl Staticness for Expr {
    fn is_static(&self) -> bool {
        match &self.kind {
            ExprKind::IntLit(_) | ExprKind::FloatLit(_) | ExprKind::BoolLit(_) => true,
            ExprKind::StringLit(segments) => segments
                .iter()
                .all(|s| matches!(s, StringSegment::Literal(_))),
            ExprKind::EnumAccess { .. } => true,
            ExprKind::Ident(_) => false,
            ExprKind::ArrayLit(items) => items.iter().all(|i| i.is_static()),
            ExprKind::ArrayRepeat { value, .. } => value.is_static(),
            ExprKind::Unary { operand, .. } => operand.is_static(),
            ExprKind::Binary { lhs, rhs, .. } => lhs.is_static() && rhs.is_static(),
            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => cond.is_static() && then_branch.is_static() && else_branch.is_static(),
            // Member/index/call/postfix/reference/move/match/block all
            // carry a runtime dependency in this language's semantics.
            _ => false,
        }
    }
}

impl Modifications for Stmt {
    fn modifications(&self) -> FxHashSet<Name> {
        let mut out = FxHashSet::default();
        collect_modifications(self, &mut out);
        out
    }
}

fn collect_modifications(stmt: &Stmt, out: &mut FxHashSet<Name>) {
    match stmt {
        Stmt::Assign(a) => {
            out.insert(a.target.clone());
        }
        Stmt::CompoundIndexAssign(a) => {
            if let Some(root) = a.target.root_identifier() {
                out.insert(root.clone());
            }
        }
        Stmt::MemberAssign(a) => {
            if let Some(root) = a.target.root_identifier() {
                out.insert(root.clone());
            }
        }
        Stmt::TupleDestructure(_) | Stmt::VarDecl(_) => {
            // Declarations introduce bindings; they do not count as a
            // *modification* of a pre-existing variable (§4.B rule 2).
        }
        Stmt::ExprStmt(e) => collect_expr_modifications(e, out),
        Stmt::Return { value, .. } => match value {
            crate::ast::stmt::ReturnValue::Single(e) => collect_expr_modifications(e, out),
            crate::ast::stmt::ReturnValue::Tuple(es) => {
                for e in es {
                    collect_expr_modifications(e, out);
                }
            }
            crate::ast::stmt::ReturnValue::Void => {}
        },
        Stmt::Block(b) => {
            for s in &b.statements {
                collect_modifications(s, out);
            }
        }
        Stmt::IfElse(s) => {
            collect_expr_modifications(&s.cond, out);
            for st in &s.then_block.statements {
                collect_modifications(st, out);
            }
            if let Some(else_block) = &s.else_block {
                for st in &else_block.statements {
                    collect_modifications(st, out);
                }
            }
        }
        Stmt::RangeFor(s) => {
            for st in &s.body.statements {
                collect_modifications(st, out);
            }
        }
        Stmt::EachFor(s) => {
            for st in &s.body.statements {
                collect_modifications(st, out);
            }
        }
    }
}

/// Pre/postfix ±± on the operand, and mutating collection-method calls on
/// a simple receiver, both count as modifications even inside an
/// expression statement (§4.B rule 2).
fn collect_expr_modifications(expr: &Expr, out: &mut FxHashSet<Name>) {
    match &expr.kind {
        ExprKind::Postfix { operand, .. } => {
            if let Some(root) = operand.root_identifier() {
                out.insert(root.clone());
            }
        }
        ExprKind::Call { callee, .. } => {
            if let ExprKind::Member { object, member } = &callee.kind
                && MUTATING_METHODS.contains(&member.as_ref())
                && let Some(root) = object.root_identifier()
            {
                out.insert(root.clone());
            }
        }
        _ => {}
    }
}
