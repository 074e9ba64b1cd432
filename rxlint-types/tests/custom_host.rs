//! The oracle over a host that is not the bundled `TypeGraph`
//!
//! Locations here are syntax-node ids, the way a linter embedding a real type
//! checker would address them.

use pretty_assertions::assert_eq;
use rxlint_types::{
    HeritageClause, Symbol, TypeGraphAccessor, TypeHandle, TypeNode, TypeServices, WellKnown,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(u32);

#[derive(Default)]
struct SyntaxHost {
    nodes: Vec<TypeNode>,
    types: HashMap<NodeId, TypeHandle>,
    returns: HashMap<NodeId, TypeHandle>,
    arrows: Vec<NodeId>,
}

impl SyntaxHost {
    fn add(&mut self, node: TypeNode) -> TypeHandle {
        self.nodes.push(node);
        TypeHandle::new(self.nodes.len() - 1)
    }
}

impl TypeGraphAccessor for SyntaxHost {
    type Location = NodeId;

    fn resolve_type(&self, location: &NodeId) -> Option<TypeHandle> {
        self.types.get(location).copied()
    }

    fn resolve_return_type(&self, location: &NodeId) -> Option<TypeHandle> {
        self.returns.get(location).copied()
    }

    fn is_function_like(&self, location: &NodeId) -> bool {
        self.arrows.contains(location)
    }

    fn node(&self, handle: TypeHandle) -> Option<&TypeNode> {
        self.nodes.get(handle.index())
    }
}

fn host() -> SyntaxHost {
    let mut host = SyntaxHost::default();
    let observable = host.add(TypeNode::object(Symbol::in_module(
        "Observable",
        "node_modules/rxjs/dist/types/internal/Observable",
    )));
    let subject = host.add(
        TypeNode::object(Symbol::in_module(
            "Subject",
            "node_modules/rxjs/dist/types/internal/Subject",
        ))
        .with_base_types(vec![observable])
        .with_heritage(vec![HeritageClause::new("SubscriptionLike", None)]),
    );
    let instance = host.add(TypeNode::reference(subject, Vec::new()));

    host.types.insert(NodeId(1), instance);
    host.types.insert(NodeId(2), observable);
    host.arrows.push(NodeId(3));
    host.returns.insert(NodeId(3), instance);
    host
}

#[test]
fn test_predicates_through_node_ids() {
    let host = host();
    let services = TypeServices::new(&host);

    assert!(services.check(&NodeId(1), WellKnown::Subject));
    assert!(services.check(&NodeId(1), WellKnown::Observable));
    assert!(services.check(&NodeId(1), WellKnown::ReferenceType));
    assert!(!services.check(&NodeId(2), WellKnown::Subject));
    assert!(services.check(&NodeId(3), WellKnown::Function));
    assert!(services.check(&NodeId(3), WellKnown::ReturnsObservable));
    assert!(!services.check(&NodeId(99), WellKnown::Observable));
}

#[test]
fn test_rxjs_qualifier_matches_installed_paths() {
    let host = host();
    let services = TypeServices::new(&host);

    assert!(services.could_be_rxjs_type(&NodeId(1), "Subject"));
    assert!(services.could_be_type(&NodeId(1), "SubscriptionLike"));
    assert!(!services.could_be_rxjs_type(&NodeId(1), "SubscriptionLike"));
}

#[test]
fn test_services_over_trait_objects() {
    let host = host();
    let dynamic: &dyn TypeGraphAccessor<Location = NodeId> = &host;
    let services = TypeServices::new(dynamic);

    assert_eq!(services.get_type(&NodeId(2)), Some(TypeHandle::new(0)));
    assert!(services.could_be_observable(&NodeId(1)));
}
