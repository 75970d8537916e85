//! Worklist iterators over the hierarchy.
//!
//! Each iterator borrows the graph immutably, so structural mutation while iterating is
//! rejected at compile time. Calling the constructor again restarts the walk.

use super::{Graph, HashSet};
use crate::entity::NodeKey;
use std::collections::VecDeque;

type Values<'a> = indexmap::map::Values<'a, String, crate::entity::NodeKey>;

fn shallow_values(graph: &Graph, g: NodeKey) -> Option<Values<'_>> {
    graph
        .subgraph(g)
        .map(|sub| sub.collection.node_values())
}

/// Pre-order walk: each node is yielded, then the contents of the node when it is a
/// subgraph, then its next sibling.
pub struct NodesBreadthFirst<'a> {
    graph: &'a Graph,
    stack: Vec<Values<'a>>,
}

impl<'a> NodesBreadthFirst<'a> {
    pub(super) fn new(graph: &'a Graph, g: NodeKey) -> Self {
        Self {
            graph,
            stack: shallow_values(graph, g).into_iter().collect(),
        }
    }
}

impl Iterator for NodesBreadthFirst<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(&n) => {
                    if let Some(children) = shallow_values(self.graph, n) {
                        self.stack.push(children);
                    }
                    return Some(n);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

pub struct AllSuccessorsWidthFirst<'a> {
    graph: &'a Graph,
    current: Option<Values<'a>>,
    pending: Vec<NodeKey>,
}

impl<'a> AllSuccessorsWidthFirst<'a> {
    pub(super) fn new(graph: &'a Graph, g: NodeKey) -> Self {
        Self {
            graph,
            current: None,
            pending: vec![g],
        }
    }
}

impl Iterator for AllSuccessorsWidthFirst<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        loop {
            if let Some(&n) = self.current.as_mut().and_then(Iterator::next) {
                return Some(n);
            }
            let g = self.pending.pop()?;
            let Some(values) = shallow_values(self.graph, g) else {
                continue;
            };
            let graph = self.graph;
            self.pending
                .extend(values.clone().rev().copied().filter(|&n| graph.is_subgraph(n)));
            self.current = Some(values);
        }
    }
}

pub struct AllSuccessorsDepthFirst<'a> {
    graph: &'a Graph,
    /// Open levels, each with the subgraph to yield once the level is exhausted.
    stack: Vec<(Values<'a>, Option<NodeKey>)>,
}

impl<'a> AllSuccessorsDepthFirst<'a> {
    pub(super) fn new(graph: &'a Graph, g: NodeKey) -> Self {
        Self {
            graph,
            stack: shallow_values(graph, g)
                .map(|values| (values, None))
                .into_iter()
                .collect(),
        }
    }
}

impl Iterator for AllSuccessorsDepthFirst<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        loop {
            let (level, _) = self.stack.last_mut()?;
            match level.next() {
                Some(&n) => match shallow_values(self.graph, n) {
                    Some(children) => self.stack.push((children, Some(n))),
                    None => return Some(n),
                },
                None => {
                    if let Some((_, Some(owner))) = self.stack.pop() {
                        return Some(owner);
                    }
                }
            }
        }
    }
}

pub struct ClusteredComponents<'a> {
    graph: &'a Graph,
    g: NodeKey,
    order: NodesBreadthFirst<'a>,
    processed: HashSet<NodeKey>,
}

impl<'a> ClusteredComponents<'a> {
    pub(super) fn new(graph: &'a Graph, g: NodeKey) -> Self {
        Self {
            graph,
            g,
            order: graph.nodes_breadth_first(g),
            processed: HashSet::default(),
        }
    }
}

impl Iterator for ClusteredComponents<'_> {
    type Item = Vec<NodeKey>;

    fn next(&mut self) -> Option<Vec<NodeKey>> {
        let graph = self.graph;
        let g = self.g;
        let start = self.order.by_ref().find(|v| !self.processed.contains(v))?;
        self.processed.insert(start);

        let mut queue = VecDeque::from([start]);
        let mut component = Vec::new();
        while let Some(u) = queue.pop_front() {
            let Some(node) = graph.node(u) else {
                continue;
            };
            if node.parent == Some(g) {
                component.push(u);
            }
            let targets = node
                .out_edges
                .iter()
                .filter_map(|&e| graph.edge(e).map(|edge| edge.target));
            let sources = node
                .in_edges
                .iter()
                .filter_map(|&e| graph.edge(e).map(|edge| edge.source));
            let children = graph.shallow_nodes(u);
            let parent = node.parent.filter(|&p| p != g);
            for w in targets.chain(sources).chain(children).chain(parent) {
                if graph.is_ancestor(g, w) && self.processed.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        Some(component)
    }
}
