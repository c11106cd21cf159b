//! Type checker substages 1-5 (§4.C).

use std::collections::HashMap;

use rustc_hash::FxHashSet;

use crate::ast::decl::{Component, Method, Program, ReturnShape};
use crate::ast::expr::{CallArg, Expr, ExprKind, Pattern, StringSegment, UnaryOp};
use crate::ast::stmt::{Block, DestructureSlot, ReturnValue, Stmt};
use crate::ast::ty::Ty;
use crate::base::Name;
use crate::schema::SchemaStore;

use super::error::TypeError;
use super::scope::Scope;
use super::types::{common_type, infer_binary, is_compatible};
use super::GlobalContext;

/// Substage 1: a component may not share its name with any known schema
/// handle type.
pub fn check_name_collisions(program: &Program, schema: &SchemaStore) -> Result<(), TypeError> {
    for component in &program.components {
        if schema.lookup_type(&component.name).is_some() {
            return Err(TypeError::ComponentNameCollidesWithHandle {
                name: component.name.clone(),
                span: component.span,
            });
        }
    }
    Ok(())
}

/// Substage 2: global enum / data-type registration, plus a component
/// lookup by (module, name) for substages 4/6/7/8.
pub fn build_global_context(program: &Program) -> GlobalContext {
    let mut enums = FxHashSet::default();
    let mut data_types = HashMap::new();
    let mut components = HashMap::new();

    for e in &program.enums {
        enums.insert(e.name.clone());
    }
    for d in &program.data_types {
        let fields = d.fields.iter().map(|f| (f.name.clone(), f.ty.clone())).collect();
        data_types.insert(d.name.clone(), fields);
    }
    for c in &program.components {
        enums.extend(c.enums.iter().map(|e| e.name.clone()));
        for d in &c.data_types {
            let fields = d.fields.iter().map(|f| (f.name.clone(), f.ty.clone())).collect();
            data_types.insert(d.name.clone(), fields);
        }
        components.insert(
            (c.module.clone(), c.name.clone()),
            super::ComponentMeta {
                name: c.name.clone(),
                module: c.module.clone(),
                file: c.file,
                public: c.public,
                params: c.params.clone(),
            },
        );
    }

    GlobalContext {
        enums,
        data_types,
        components,
    }
}

/// Substage 3: every data-type field must be value-semantic (never a
/// no-copy type, including through arrays).
pub fn validate_data_types(program: &Program, schema: &SchemaStore) -> Result<(), TypeError> {
    let all_data_types = program.data_types.iter().chain(
        program
            .components
            .iter()
            .flat_map(|c| c.data_types.iter()),
    );
    for dt in all_data_types {
        for field in &dt.fields {
            if let Some(name) = field.ty.strip_arrays().named()
                && schema.is_nocopy(name)
            {
                return Err(TypeError::DataFieldIsNoCopy {
                    name: dt.name.clone(),
                    field: field.name.clone(),
                    ty: field.ty.clone(),
                    span: dt.span,
                });
            }
        }
    }
    Ok(())
}

/// Substage 4: per-component parameter & state validation.
pub fn validate_component_decls(
    component: &Component,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    for param in &component.params {
        // A reference parameter with no default is satisfied by the caller
        // at each instantiation; substages 7/8 reject the instantiation if
        // it leaves the reference uninitialized.
        if let Some(default) = &param.default {
            let mut scope = Scope::new();
            let found = infer_expr(default, &component.methods, &mut scope, ctx, schema)?;
            if !is_compatible(&param.ty, &found, schema) {
                return Err(TypeError::Mismatch {
                    expected: param.ty.clone(),
                    found,
                    span: param.span,
                });
            }
        }
    }

    for state in &component.state {
        if state.by_reference && state.public {
            return Err(TypeError::PublicReference {
                name: state.name.clone(),
                span: state.span,
            });
        }
        let mut scope = Scope::new();
        for param in &component.params {
            scope.declare(param.name.clone(), param.ty.clone(), param.mutable, param.by_reference);
        }
        let found = infer_expr(&state.init, &component.methods, &mut scope, ctx, schema)?;
        if !is_compatible(&state.ty, &found, schema) {
            return Err(TypeError::Mismatch {
                expected: state.ty.clone(),
                found,
                span: state.span,
            });
        }
        if state.by_reference {
            // Upward reference check: a state reference may not alias a
            // child component's member (it has no child to alias before
            // instantiation in this same pass, so this invariant is
            // enforced at the init expression's member-access shape).
            if let ExprKind::Member { object, member } = &state.init.kind
                && let Some(root) = object.root_identifier()
                && component.find_param(root).is_none()
                && component.find_state(root).is_none()
            {
                return Err(TypeError::UpwardReference {
                    name: state.name.clone(),
                    member: member.clone(),
                    span: state.span,
                });
            }
        }
    }
    Ok(())
}

/// Substage 5: per-method checking.
pub fn check_methods(
    component: &mut Component,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    let params = component.params.clone();
    let state = component.state.clone();
    // Snapshot the sibling method signatures up front: substage 5 needs to
    // resolve same-component calls (§4.C substage 5 call-site rule) while
    // holding a mutable borrow of `component.methods` below.
    let sibling_methods = component.methods.clone();
    for method in &mut component.methods {
        let mut scope = Scope::new();
        for param in &params {
            scope.declare(param.name.clone(), param.ty.clone(), param.mutable, param.by_reference);
        }
        for s in &state {
            scope.declare(s.name.clone(), s.ty.clone(), s.mutable, s.by_reference);
        }
        for p in &method.params {
            scope.declare(p.name.clone(), p.ty.clone(), p.mutable, p.by_reference);
        }
        check_method_body(method, &sibling_methods, &mut scope, ctx, schema)?;
        method.modifications = compute_modifications(&method.body);
    }
    Ok(())
}

fn compute_modifications(block: &Block) -> FxHashSet<Name> {
    use crate::ast::capabilities::Modifications;
    let mut out = FxHashSet::default();
    for stmt in &block.statements {
        out.extend(stmt.modifications());
    }
    out
}

fn check_method_body(
    method: &Method,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    check_block(&method.body, methods, scope, ctx, schema, &method.return_shape)
}

fn check_block(
    block: &Block,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
    return_shape: &ReturnShape,
) -> Result<(), TypeError> {
    for stmt in &block.statements {
        check_stmt(stmt, methods, scope, ctx, schema, return_shape)?;
    }
    Ok(())
}

fn check_stmt(
    stmt: &Stmt,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
    return_shape: &ReturnShape,
) -> Result<(), TypeError> {
    match stmt {
        Stmt::VarDecl(decl) => {
            let found = infer_expr(&decl.init, methods, scope, ctx, schema)?;
            if let Some(declared) = &decl.declared_ty
                && !is_compatible(declared, &found, schema)
            {
                return Err(TypeError::Mismatch {
                    expected: declared.clone(),
                    found,
                    span: decl.span,
                });
            }
            check_move_discipline_source(&decl.init, scope, schema)?;
            let ty = decl.declared_ty.clone().unwrap_or(found);
            scope.declare(decl.name.clone(), ty, decl.mutable, decl.by_reference);
            Ok(())
        }
        Stmt::Assign(assign) => {
            if !scope.contains(&assign.target) {
                return Err(TypeError::UnresolvedIdentifier {
                    name: assign.target.clone(),
                    span: assign.span,
                });
            }
            if scope.is_moved(&assign.target) {
                return Err(TypeError::UseOfMoved {
                    name: assign.target.clone(),
                    span: assign.span,
                });
            }
            if !scope.is_mutable(&assign.target) {
                return Err(TypeError::WriteToImmutable {
                    name: assign.target.clone(),
                    span: assign.span,
                });
            }
            let found = infer_expr(&assign.value, methods, scope, ctx, schema)?;
            if let Some(expected) = scope.type_of(&assign.target).cloned()
                && !is_compatible(&expected, &found, schema)
            {
                return Err(TypeError::Mismatch {
                    expected,
                    found,
                    span: assign.span,
                });
            }
            check_move_discipline_source(&assign.value, scope, schema)?;
            Ok(())
        }
        Stmt::CompoundIndexAssign(assign) => {
            infer_expr(&assign.target, methods, scope, ctx, schema)?;
            infer_expr(&assign.index, methods, scope, ctx, schema)?;
            infer_expr(&assign.value, methods, scope, ctx, schema)?;
            require_mutable_root(&assign.target, scope, assign.span)
        }
        Stmt::MemberAssign(assign) => {
            infer_expr(&assign.target, methods, scope, ctx, schema)?;
            infer_expr(&assign.value, methods, scope, ctx, schema)?;
            require_mutable_root(&assign.target, scope, assign.span)
        }
        Stmt::TupleDestructure(destructure) => {
            let call_ty = infer_expr(&destructure.call, methods, scope, ctx, schema)?;
            let Ty::Tuple(elems) = &call_ty else {
                return Err(TypeError::TupleArityMismatch {
                    expected: destructure.slots.len(),
                    found: 1,
                    span: destructure.span,
                });
            };
            if elems.len() != destructure.slots.len() {
                return Err(TypeError::TupleArityMismatch {
                    expected: destructure.slots.len(),
                    found: elems.len(),
                    span: destructure.span,
                });
            }
            for (index, (slot, elem_ty)) in destructure.slots.iter().zip(elems.iter()).enumerate() {
                match slot {
                    DestructureSlot::Wildcard => {}
                    DestructureSlot::Binding { name, declared_ty } => {
                        if let Some(declared) = declared_ty
                            && !is_compatible(declared, elem_ty, schema)
                        {
                            return Err(TypeError::TupleElementMismatch {
                                index,
                                expected: declared.clone(),
                                found: elem_ty.clone(),
                                span: destructure.span,
                            });
                        }
                        scope.declare(
                            name.clone(),
                            declared_ty.clone().unwrap_or_else(|| elem_ty.clone()),
                            destructure.mutable,
                            false,
                        );
                    }
                }
            }
            Ok(())
        }
        Stmt::ExprStmt(expr) => {
            infer_expr(expr, methods, scope, ctx, schema)?;
            check_expr_mutability(expr, scope)
        }
        Stmt::Return { value, span } => {
            match (value, return_shape) {
                (ReturnValue::Void, ReturnShape::Void) => Ok(()),
                (ReturnValue::Void, _) => Err(TypeError::InvalidBareReturn { span: *span }),
                (ReturnValue::Single(expr), ReturnShape::Single(expected)) => {
                    let found = infer_expr(expr, methods, scope, ctx, schema)?;
                    if is_compatible(expected, &found, schema) {
                        Ok(())
                    } else {
                        Err(TypeError::ReturnMismatch {
                            expected: expected.clone(),
                            found,
                            span: *span,
                        })
                    }
                }
                (ReturnValue::Tuple(exprs), ReturnShape::Tuple(expected_tys)) => {
                    if exprs.len() != expected_tys.len() {
                        return Err(TypeError::TupleArityMismatch {
                            expected: expected_tys.len(),
                            found: exprs.len(),
                            span: *span,
                        });
                    }
                    for (index, (expr, expected)) in exprs.iter().zip(expected_tys.iter()).enumerate() {
                        let found = infer_expr(expr, methods, scope, ctx, schema)?;
                        if !is_compatible(expected, &found, schema) {
                            return Err(TypeError::TupleElementMismatch {
                                index,
                                expected: expected.clone(),
                                found,
                                span: *span,
                            });
                        }
                    }
                    Ok(())
                }
                (ReturnValue::Single(expr), ReturnShape::Void) => {
                    let found = infer_expr(expr, methods, scope, ctx, schema)?;
                    Err(TypeError::ReturnMismatch {
                        expected: Ty::Void,
                        found,
                        span: *span,
                    })
                }
                _ => Err(TypeError::InvalidBareReturn { span: *span }),
            }
        }
        Stmt::Block(block) => check_block(block, methods, scope, ctx, schema, return_shape),
        Stmt::IfElse(if_else) => {
            let cond_ty = infer_expr(&if_else.cond, methods, scope, ctx, schema)?;
            if !matches!(cond_ty, Ty::Bool | Ty::Unknown) {
                return Err(TypeError::Mismatch {
                    expected: Ty::Bool,
                    found: cond_ty,
                    span: if_else.span,
                });
            }
            check_block(&if_else.then_block, methods, scope, ctx, schema, return_shape)?;
            if let Some(else_block) = &if_else.else_block {
                check_block(else_block, methods, scope, ctx, schema, return_shape)?;
            }
            Ok(())
        }
        Stmt::RangeFor(range_for) => {
            infer_expr(&range_for.start, methods, scope, ctx, schema)?;
            infer_expr(&range_for.end, methods, scope, ctx, schema)?;
            scope.declare(range_for.var.clone(), Ty::Int32, false, false);
            check_block(&range_for.body, methods, scope, ctx, schema, return_shape)
        }
        Stmt::EachFor(each_for) => {
            let iter_ty = infer_expr(&each_for.iterable, methods, scope, ctx, schema)?;
            let elem_ty = match iter_ty {
                Ty::Array { elem, .. } => *elem,
                _ => Ty::Unknown,
            };
            scope.declare(each_for.var.clone(), elem_ty, false, false);
            check_block(&each_for.body, methods, scope, ctx, schema, return_shape)
        }
    }
}

/// §4.B rule: pre/postfix on a local identifier, and mutating calls on a
/// component-typed binding, both demand a mutable target.
fn check_expr_mutability(expr: &Expr, scope: &Scope) -> Result<(), TypeError> {
    match &expr.kind {
        ExprKind::Postfix { operand, .. } => require_mutable_root(operand, scope, expr.span),
        ExprKind::Call { callee, .. } => {
            if let ExprKind::Member { object, .. } = &callee.kind {
                require_mutable_root(object, scope, expr.span)
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

fn require_mutable_root(expr: &Expr, scope: &Scope, span: crate::base::Span) -> Result<(), TypeError> {
    if let Some(root) = expr.root_identifier()
        && scope.contains(root)
        && !scope.is_mutable(root)
    {
        return Err(TypeError::MutatingCallOnImmutable {
            name: root.clone(),
            span,
        });
    }
    Ok(())
}

/// §4.C move discipline: using `:x` marks `x` moved; `&x` on a moved
/// binding is rejected.
fn check_move_discipline_source(expr: &Expr, scope: &mut Scope, schema: &SchemaStore) -> Result<(), TypeError> {
    match &expr.kind {
        ExprKind::Move(inner) => {
            if let Some(name) = inner.root_identifier() {
                if scope.is_reference(name) {
                    return Err(TypeError::ReferenceToMoved {
                        name: name.clone(),
                        span: expr.span,
                    });
                }
                scope.mark_moved(name.clone());
            }
            Ok(())
        }
        ExprKind::Reference(inner) => {
            if let Some(name) = inner.root_identifier()
                && scope.is_moved(name)
            {
                return Err(TypeError::ReferenceToMovedValue {
                    name: name.clone(),
                    span: expr.span,
                });
            }
            Ok(())
        }
        _ => {
            if let Some(name) = expr.root_identifier()
                && let Some(ty) = scope.type_of(name)
                && let Some(named) = ty.named()
                && schema.is_nocopy(named)
            {
                return Err(TypeError::CopyOfNoCopy {
                    ty: ty.clone(),
                    span: expr.span,
                });
            }
            Ok(())
        }
    }
}

/// Full expression type inference (§4.C inference table), also enforcing
/// "no reads of moved names" before computing a node's type.
pub fn infer_expr(
    expr: &Expr,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<Ty, TypeError> {
    let ty = match &expr.kind {
        ExprKind::IntLit(_) => Ty::Int32,
        ExprKind::FloatLit(_) => Ty::Float64,
        ExprKind::BoolLit(_) => Ty::Bool,
        ExprKind::StringLit(segments) => {
            for seg in segments {
                if let StringSegment::Interp(inner) = seg {
                    infer_expr(inner, methods, scope, ctx, schema)?;
                }
            }
            Ty::String
        }
        ExprKind::Ident(name) => {
            if scope.is_moved(name) {
                return Err(TypeError::UseOfMoved {
                    name: name.clone(),
                    span: expr.span,
                });
            }
            match scope.type_of(name) {
                Some(ty) => ty.clone(),
                None if ctx.enums.contains(name) => Ty::Enum(name.clone()),
                None if schema.lookup_type(name).is_some() => Ty::Handle(name.clone()),
                None => {
                    return Err(TypeError::UnresolvedIdentifier {
                        name: name.clone(),
                        span: expr.span,
                    })
                }
            }
        }
        ExprKind::Member { object, member } => {
            let object_ty = infer_expr(object, methods, scope, ctx, schema)?;
            match object_ty.named() {
                Some(name) if ctx.data_types.contains_key(name) => ctx
                    .data_types
                    .get(name)
                    .and_then(|fields| fields.iter().find(|(f, _)| f == member))
                    .map(|(_, t)| t.clone())
                    .unwrap_or(Ty::Unknown),
                Some(name) => schema
                    .lookup_method(name, member)
                    .map(|(_, m)| builtin_ty_from_name(&m.return_ty))
                    .unwrap_or(Ty::Unknown),
                None => Ty::Unknown,
            }
        }
        ExprKind::Index { object, index } => {
            infer_expr(index, methods, scope, ctx, schema)?;
            match infer_expr(object, methods, scope, ctx, schema)? {
                Ty::Array { elem, .. } => *elem,
                _ => Ty::Unknown,
            }
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs_ty = infer_expr(lhs, methods, scope, ctx, schema)?;
            let rhs_ty = infer_expr(rhs, methods, scope, ctx, schema)?;
            infer_binary(*op, &lhs_ty, &rhs_ty, schema).ok_or_else(|| TypeError::Mismatch {
                expected: lhs_ty.clone(),
                found: rhs_ty.clone(),
                span: expr.span,
            })?
        }
        ExprKind::Unary { op, operand } => {
            let operand_ty = infer_expr(operand, methods, scope, ctx, schema)?;
            match op {
                UnaryOp::Not => Ty::Bool,
                UnaryOp::Neg | UnaryOp::Pos => operand_ty,
            }
        }
        ExprKind::Postfix { operand, .. } => infer_expr(operand, methods, scope, ctx, schema)?,
        ExprKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            infer_expr(cond, methods, scope, ctx, schema)?;
            let then_ty = infer_expr(then_branch, methods, scope, ctx, schema)?;
            let else_ty = infer_expr(else_branch, methods, scope, ctx, schema)?;
            common_type(&then_ty, &else_ty, schema).ok_or_else(|| TypeError::Mismatch {
                expected: then_ty.clone(),
                found: else_ty.clone(),
                span: expr.span,
            })?
        }
        ExprKind::Call { callee, args } => {
            let param_specs = resolve_call_param_specs(callee, methods, scope, ctx, schema);
            for (index, arg) in args.iter().enumerate() {
                let expected = param_specs.as_ref().and_then(|specs| specs.get(index));
                check_call_arg(arg, expected, methods, scope, ctx, schema)?;
            }
            infer_call(callee, methods, scope, ctx, schema)?
        }
        ExprKind::EnumAccess { enum_name, .. } => match enum_name {
            Some(name) => Ty::Enum(name.clone()),
            None => Ty::Unknown,
        },
        ExprKind::ArrayLit(items) => {
            let mut elem_ty = Ty::Unknown;
            for item in items {
                let item_ty = infer_expr(item, methods, scope, ctx, schema)?;
                elem_ty = common_type(&elem_ty, &item_ty, schema).unwrap_or(elem_ty);
            }
            Ty::array(elem_ty)
        }
        ExprKind::ArrayRepeat { value, count } => {
            let elem_ty = infer_expr(value, methods, scope, ctx, schema)?;
            Ty::fixed_array(elem_ty, *count)
        }
        ExprKind::Reference(inner) => infer_expr(inner, methods, scope, ctx, schema)?,
        ExprKind::Move(inner) => infer_expr(inner, methods, scope, ctx, schema)?,
        ExprKind::Match { scrutinee, arms } => {
            infer_expr(scrutinee, methods, scope, ctx, schema)?;
            let mut result = Ty::Unknown;
            for arm in arms {
                check_pattern(&arm.pattern, ctx)?;
                let arm_ty = infer_expr(&arm.body, methods, scope, ctx, schema)?;
                result = common_type(&result, &arm_ty, schema).unwrap_or(result);
            }
            result
        }
        ExprKind::Block(block) => infer_block_value(block, methods, scope, ctx, schema)?,
    };
    Ok(ty)
}

fn check_pattern(pattern: &Pattern, ctx: &GlobalContext) -> Result<(), TypeError> {
    if let Pattern::EnumVariant {
        enum_name: Some(name),
        ..
    } = pattern
        && !ctx.enums.contains(name)
    {
        return Err(TypeError::UnresolvedType {
            name: name.clone(),
            span: crate::base::Span::synthetic(),
        });
    }
    Ok(())
}

fn infer_block_value(
    block: &Block,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<Ty, TypeError> {
    check_block(block, methods, scope, ctx, schema, &ReturnShape::Void)?;
    match block.statements.last() {
        Some(Stmt::ExprStmt(expr)) => infer_expr(expr, methods, scope, ctx, schema),
        _ => Ok(Ty::Void),
    }
}

/// Resolve a call's callee to its parameter list so the reference marker on
/// each argument can be checked against the matching parameter's
/// reference-ness (§4.C substage 5 call-site rule). Same-component calls
/// resolve against sibling method signatures; calls through a handle-typed
/// object resolve against the schema's method table. Schema method
/// parameters carry no reference marker in the definition-file grammar
/// (§6), so every resolved schema parameter is treated as non-reference.
fn resolve_call_param_specs(
    callee: &Expr,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Option<Vec<(Name, bool)>> {
    match &callee.kind {
        ExprKind::Ident(name) => methods.iter().find(|m| &m.name == name).map(|m| {
            m.params
                .iter()
                .map(|p| (p.name.clone(), p.by_reference))
                .collect()
        }),
        ExprKind::Member { object, member } => {
            let object_ty = infer_expr(object, methods, scope, ctx, schema).ok()?;
            let type_name = object_ty.named()?;
            let (_, method) = schema.lookup_method(type_name, member)?;
            Some(
                method
                    .params
                    .iter()
                    .map(|p| (Name::from(p.name.as_str()), false))
                    .collect(),
            )
        }
        _ => None,
    }
}

fn check_call_arg(
    arg: &CallArg,
    expected: Option<&(Name, bool)>,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<(), TypeError> {
    infer_expr(&arg.expr, methods, scope, ctx, schema)?;
    if arg.by_move {
        check_move_discipline_source(
            &Expr::new(ExprKind::Move(Box::new(arg.expr.clone())), arg.expr.span),
            scope,
            schema,
        )?;
    }
    if let Some((param_name, param_is_reference)) = expected {
        if *param_is_reference {
            if arg.by_move {
                return Err(TypeError::MoveIntoReference {
                    param: param_name.clone(),
                    span: arg.expr.span,
                });
            }
            if !arg.by_reference {
                return Err(TypeError::MissingReferenceMarker {
                    param: param_name.clone(),
                    span: arg.expr.span,
                });
            }
        } else if arg.by_reference {
            return Err(TypeError::UnexpectedReferenceMarker {
                param: param_name.clone(),
                span: arg.expr.span,
            });
        }
    }
    Ok(())
}

fn infer_call(
    callee: &Expr,
    methods: &[Method],
    scope: &mut Scope,
    ctx: &GlobalContext,
    schema: &SchemaStore,
) -> Result<Ty, TypeError> {
    match &callee.kind {
        ExprKind::Member { object, member } => {
            let object_ty = infer_expr(object, methods, scope, ctx, schema)?;
            if let Some(name) = object_ty.named()
                && let Some((_, method)) = schema.lookup_method(name, member)
            {
                return Ok(builtin_ty_from_name(&method.return_ty));
            }
            Ok(builtin_method_return(member, &object_ty))
        }
        ExprKind::Ident(name) => {
            for (type_name, _) in ctx.data_types.iter() {
                if type_name == name {
                    return Ok(Ty::Data(name.clone()));
                }
            }
            if let Some(method) = methods.iter().find(|m| &m.name == name) {
                return Ok(match &method.return_shape {
                    ReturnShape::Void => Ty::Void,
                    ReturnShape::Single(ty) => ty.clone(),
                    ReturnShape::Tuple(tys) => Ty::Tuple(tys.clone()),
                });
            }
            Ok(Ty::Unknown)
        }
        _ => {
            infer_expr(callee, methods, scope, ctx, schema)?;
            Ok(Ty::Unknown)
        }
    }
}

/// Built-in string/array methods not sourced from the schema (§4.C
/// inference table "or built-in string/array method table").
fn builtin_method_return(member: &Name, receiver: &Ty) -> Ty {
    match (&**member, receiver) {
        ("len", Ty::String) | ("len", Ty::Array { .. }) => Ty::UInt32,
        ("push", _) | ("push_back", _) | ("pop", _) | ("pop_back", _) | ("clear", _) => Ty::Void,
        _ => Ty::Unknown,
    }
}

fn builtin_ty_from_name(name: &str) -> Ty {
    match name {
        "int" | "int32" => Ty::Int32,
        "uint" | "uint32" => Ty::UInt32,
        "float" | "float32" => Ty::Float32,
        "double" | "float64" => Ty::Float64,
        "string" => Ty::String,
        "bool" => Ty::Bool,
        "void" => Ty::Void,
        other => Ty::Handle(other.into()),
    }
}

