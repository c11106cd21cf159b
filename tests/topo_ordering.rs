//! Integration coverage for component dependency ordering across a small
//! multi-component program, exercised through the public API.

use viewc_core::ast::decl::{Component, Program};
use viewc_core::ast::view::{ComponentInstantiation, ViewNode};
use viewc_core::base::{FileId, Name, Span};
use viewc_core::topo::topological_order;

fn component(name: &str, view: Vec<ViewNode>) -> Component {
    Component {
        name: name.into(),
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

fn instantiate(name: &str) -> ViewNode {
    ViewNode::Instantiate(ComponentInstantiation {
        module: None,
        name: name.into(),
        args: vec![],
        span: Span::synthetic(),
    })
}

#[test]
fn diamond_dependency_places_the_shared_leaf_before_both_branches() {
    // App depends on both Header and Footer, which both depend on Icon.
    let program = Program {
        components: vec![
            component("App", vec![instantiate("Header"), instantiate("Footer")]),
            component("Header", vec![instantiate("Icon")]),
            component("Footer", vec![instantiate("Icon")]),
            component("Icon", vec![]),
        ],
        ..Program::default()
    };

    let order = topological_order(&program).unwrap();
    let pos = |name: &str| order.iter().position(|(_, n)| n == &Name::from(name)).unwrap();

    assert!(pos("Icon") < pos("Header"));
    assert!(pos("Icon") < pos("Footer"));
    assert!(pos("Header") < pos("App"));
    assert!(pos("Footer") < pos("App"));
}

#[test]
fn a_three_component_cycle_is_reported_with_every_remaining_member() {
    let program = Program {
        components: vec![
            component("A", vec![instantiate("B")]),
            component("B", vec![instantiate("C")]),
            component("C", vec![instantiate("A")]),
        ],
        ..Program::default()
    };

    let err = topological_order(&program).unwrap_err();
    assert_eq!(err.remaining.len(), 3);
}

#[test]
fn a_component_depended_on_through_a_nested_view_branch_is_still_ordered_first() {
    use viewc_core::ast::view::ViewIf;
    use viewc_core::ast::expr::{Expr, ExprKind};

    let cond = Expr::new(ExprKind::BoolLit(true), Span::synthetic());
    let program = Program {
        components: vec![
            component(
                "App",
                vec![ViewNode::If(ViewIf {
                    cond,
                    then_branch: vec![instantiate("Modal")],
                    else_branch: vec![],
                    span: Span::synthetic(),
                    if_region_id: None,
                })],
            ),
            component("Modal", vec![]),
        ],
        ..Program::default()
    };

    let order = topological_order(&program).unwrap();
    let modal_pos = order.iter().position(|(_, n)| n == &Name::from("Modal")).unwrap();
    let app_pos = order.iter().position(|(_, n)| n == &Name::from("App")).unwrap();
    assert!(modal_pos < app_pos);
}
