//! Integration tests for the reactive view compiler: creation-phase
//! emission through the public `compile_component` entry point, plus the
//! runtime sync state machines it describes.

use viewc_core::ast::decl::Component;
use viewc_core::ast::expr::{Expr, ExprKind};
use viewc_core::ast::view::{ComponentInstantiation, HtmlElement, TextNode, ViewAttr, ViewForEach, ViewForRange, ViewIf, ViewNode};
use viewc_core::base::{FileId, Name, Span};
use viewc_core::viewc::compile_component;
use viewc_core::viewc::ids::{InstanceId, LoopRegionId};
use viewc_core::viewc::ifregion::{IfRegionState, SyncOutcome};
use viewc_core::viewc::loopkeyed::KeyedLoopState;
use viewc_core::viewc::looprange::{LoopBodyKind, RangeLoopRegion, RangeLoopState, RangeSyncOutcome};

fn ident(name: &str) -> Expr {
    Expr::new(ExprKind::Ident(name.into()), Span::synthetic())
}

fn literal(n: i64) -> Expr {
    Expr::new(ExprKind::IntLit(n), Span::synthetic())
}

fn base_component(view: Vec<ViewNode>) -> Component {
    Component {
        name: "Listing".into(),
        module: "main".into(),
        file: FileId::new(0),
        public: false,
        params: vec![],
        state: vec![],
        methods: vec![],
        enums: vec![],
        data_types: vec![],
        view,
        router: None,
        span: Span::synthetic(),
    }
}

#[test]
fn a_keyed_each_for_over_component_rows_emits_one_keyed_loop_region() {
    let component = base_component(vec![ViewNode::ForEach(ViewForEach {
        var: "row".into(),
        iterable: ident("rows"),
        key: Some(ident("row")),
        body: vec![ViewNode::Instantiate(ComponentInstantiation {
            module: None,
            name: "Row".into(),
            args: vec![],
            span: Span::synthetic(),
        })],
        span: Span::synthetic(),
        loop_region_id: None,
    })]);
    let emission = compile_component(&component);
    assert_eq!(emission.keyed_loops.len(), 1);
    assert_eq!(emission.keyed_loops[0].child_type, Name::from("Row"));
    assert!(emission.range_loops.is_empty());
}

#[test]
fn an_each_for_without_a_key_falls_back_to_the_loop_variable_as_key() {
    let component = base_component(vec![ViewNode::ForEach(ViewForEach {
        var: "item".into(),
        iterable: ident("items"),
        key: None,
        body: vec![ViewNode::Html(HtmlElement {
            tag: "li".into(),
            attrs: vec![],
            children: vec![],
            ref_binding: None,
            span: Span::synthetic(),
        })],
        span: Span::synthetic(),
        loop_region_id: None,
    })]);
    let emission = compile_component(&component);
    assert_eq!(emission.keyed_loops[0].key_expr.kind, ExprKind::Ident(Name::from("item")));
}

#[test]
fn html_attribute_reading_state_produces_an_attribute_binding() {
    let component = base_component(vec![ViewNode::Html(HtmlElement {
        tag: "div".into(),
        attrs: vec![ViewAttr {
            name: "class".into(),
            value: ident("theme"),
            span: Span::synthetic(),
        }],
        children: vec![ViewNode::Text(TextNode {
            value: literal(0),
            span: Span::synthetic(),
        })],
        ref_binding: None,
        span: Span::synthetic(),
    })]);
    let emission = compile_component(&component);
    assert_eq!(emission.bindings.len(), 1);
    assert_eq!(emission.bindings[0].free_identifiers, rustc_hash::FxHashSet::from_iter([Name::from("theme")]));
}

fn range_region(body_kind: LoopBodyKind) -> RangeLoopRegion {
    RangeLoopRegion::new(LoopRegionId(0), "i".into(), literal(0), literal(0), body_kind)
}

#[test]
fn range_loop_growth_requests_rebinding_of_previously_created_items() {
    let region = range_region(LoopBodyKind::Component("Row".into()));
    let mut state = RangeLoopState::new(2);
    let outcome = state.sync(&region, 5);
    assert_eq!(outcome, RangeSyncOutcome::Grew { from: 2, to: 5, rebind_previous: true });
}

#[test]
fn range_loop_shrink_reports_removed_tail_items() {
    let region = range_region(LoopBodyKind::Component("Row".into()));
    let mut state = RangeLoopState::new(5);
    let outcome = state.sync(&region, 2);
    assert_eq!(outcome, RangeSyncOutcome::Shrank { from: 5, to: 2, reran_item_update: true });
}

#[test]
fn keyed_loop_diff_destroys_dropped_rows_and_keeps_surviving_identity() {
    let mut state: KeyedLoopState<u32> = KeyedLoopState::new();
    let mut counter = 0u32;
    state.sync(&[1, 2, 3], |_| {
        let id = InstanceId(counter);
        counter += 1;
        id
    });

    let report = state.sync(&[1, 3], |_| {
        let id = InstanceId(counter);
        counter += 1;
        id
    });
    assert_eq!(report.destroyed, vec![2]);
    assert!(report.created.is_empty());
    assert_eq!(state.live_keys().copied().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn reactive_if_teardown_switches_the_active_branch_exactly_once() {
    let mut state = IfRegionState::initial(true);
    assert_eq!(state.sync(true), SyncOutcome::Unchanged);
    let outcome = state.sync(false);
    assert_eq!(outcome, SyncOutcome::Switched { torn_down: true, created: false });
    assert!(!state.active_branch);
}

#[test]
fn method_wrapping_orders_update_calls_before_if_and_loop_syncs() {
    use viewc_core::ast::decl::{Method, ReturnShape, StateVar};
    use viewc_core::ast::stmt::Block;
    use viewc_core::ast::ty::Ty;

    let mut component = base_component(vec![
        ViewNode::Text(TextNode { value: ident("count"), span: Span::synthetic() }),
        ViewNode::If(ViewIf {
            cond: ident("count"),
            then_branch: vec![],
            else_branch: vec![],
            span: Span::synthetic(),
            if_region_id: None,
        }),
        ViewNode::ForRange(ViewForRange {
            var: "i".into(),
            start: literal(0),
            end: ident("count"),
            body: vec![ViewNode::Html(HtmlElement {
                tag: "li".into(),
                attrs: vec![],
                children: vec![],
                ref_binding: None,
                span: Span::synthetic(),
            })],
            span: Span::synthetic(),
            loop_region_id: None,
        }),
    ]);
    component.state.push(StateVar {
        name: "count".into(),
        ty: Ty::Int32,
        mutable: true,
        by_reference: false,
        public: false,
        init: literal(0),
        span: Span::synthetic(),
    });
    component.methods.push(Method {
        name: "increment".into(),
        params: vec![],
        return_shape: ReturnShape::Void,
        body: Block { statements: vec![], span: Span::synthetic() },
        span: Span::synthetic(),
        modifications: rustc_hash::FxHashSet::from_iter([Name::from("count")]),
    });

    let emission = compile_component(&component);
    let (_, wrapping) = emission
        .method_wrappings
        .iter()
        .find(|(name, _)| name.as_ref() == "increment")
        .unwrap();
    assert_eq!(wrapping.update_calls, vec![Name::from("count")]);
    assert_eq!(wrapping.if_syncs.len(), 1);
    assert_eq!(wrapping.loop_syncs.len(), 1);
}
