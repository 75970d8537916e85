use topomap_graph::{ElementRef, Graph, Node, NodeKey, alg};

/// root
/// ├── a
/// ├── s1
/// │   ├── b
/// │   └── s2
/// │       └── c
/// └── d
fn nested() -> Graph {
    let mut g = Graph::new("root");
    let root = g.root();
    g.add_node(root, Node::new("a")).unwrap();
    let s1 = g.add_subgraph(root, "s1").unwrap();
    g.add_node(s1, Node::new("b")).unwrap();
    let s2 = g.add_subgraph(s1, "s2").unwrap();
    g.add_node(s2, Node::new("c")).unwrap();
    g.add_node(root, Node::new("d")).unwrap();
    g
}

fn ids(g: &Graph, keys: impl IntoIterator<Item = NodeKey>) -> Vec<String> {
    keys.into_iter()
        .filter_map(|k| g.node_id(k).map(str::to_string))
        .collect()
}

#[test]
fn nodes_breadth_first_visits_parents_before_contents() {
    let g = nested();
    let order = ids(&g, g.nodes_breadth_first(g.root()));
    assert_eq!(order, ["a", "s1", "b", "s2", "c", "d"]);
}

#[test]
fn traversals_restart_on_each_call() {
    let g = nested();
    let first: Vec<_> = g.nodes_breadth_first(g.root()).collect();
    let second: Vec<_> = g.nodes_breadth_first(g.root()).collect();
    assert_eq!(first, second);
}

#[test]
fn width_first_lists_a_level_before_descending() {
    let g = nested();
    let order = ids(&g, g.all_successors_width_first(g.root()));
    assert_eq!(order, ["a", "s1", "d", "b", "s2", "c"]);
}

#[test]
fn depth_first_yields_subgraph_after_its_contents() {
    let g = nested();
    let order = ids(&g, g.all_successors_depth_first(g.root()));
    assert_eq!(order, ["a", "b", "c", "s2", "s1", "d"]);
}

#[test]
fn subgraph_queries() {
    let g = nested();
    let root = g.root();
    assert_eq!(ids(&g, g.subgraphs_breadth_first(root)), ["s1", "s2"]);
    assert_eq!(ids(&g, g.graphs(root)), ["s1"]);
    assert!(g.has_subgraphs(root));
    assert!(g.no_empty_subgraphs(root));
    assert_eq!(g.shallow_node_count(root), 3);
    assert_eq!(g.node_count_deep(root), 6);

    let s1 = g.find_node(root, "s1").unwrap();
    let c = g.find_node_recursive(root, "c").unwrap();
    assert_eq!(g.find_node_recursive(s1, "c"), Some(c));
    assert!(g.find_node(s1, "c").is_none());
    assert_eq!(ids(&g, g.ancestors(c)), ["s2", "s1", "root"]);
    assert!(g.is_ancestor(s1, c));
    assert!(!g.is_ancestor(c, s1));
}

#[test]
fn empty_subgraph_is_reported() {
    let mut g = nested();
    let root = g.root();
    g.add_subgraph(root, "hollow").unwrap();
    assert!(!g.no_empty_subgraphs(root));
}

#[test]
fn deep_edges_report_internal_edges_once() {
    let mut g = nested();
    let root = g.root();
    let s1 = g.find_node(root, "s1").unwrap();
    let s2 = g.find_node(s1, "s2").unwrap();
    let ad = g.set_edge(root, "a-d", "a", "d", None).unwrap();
    let bc = g.set_edge(s1, "b-c", "b", "c", Some(s2)).unwrap();
    let cc = g.set_edge(s2, "c-c", "c", "c", None).unwrap();

    let mut deep: Vec<_> = g.deep_edges(root).collect();
    deep.sort();
    assert_eq!(deep, [ad, bc, cc]);
    assert_eq!(g.deep_edges_count(root), 3);
    assert_eq!(g.edge_count(root), 1);

    let in_s1: Vec<_> = g.deep_edges(s1).collect();
    assert_eq!(in_s1.len(), 2);
}

#[test]
fn all_elements_lists_nodes_with_their_edges() {
    let mut g = nested();
    let root = g.root();
    let e = g.set_edge(root, "a-d", "a", "d", None).unwrap();
    let elements: Vec<_> = g.all_elements(root).collect();
    let edges = elements
        .iter()
        .filter(|el| matches!(el, ElementRef::Edge(_)))
        .count();
    assert_eq!(edges, 1);
    assert!(elements.contains(&ElementRef::Edge(e)));
    assert_eq!(elements.len(), 7);
}

#[test]
fn clustered_components_group_direct_children() {
    let mut g = nested();
    let root = g.root();
    let s1 = g.find_node(root, "s1").unwrap();
    g.set_edge(root, "a-s1", "a", "s1", None).unwrap();

    let mut components: Vec<Vec<String>> = g
        .clustered_connected_components(root)
        .map(|c| {
            let mut v = ids(&g, c);
            v.sort();
            v
        })
        .collect();
    components.sort();
    assert_eq!(components, [vec!["a", "s1"], vec!["d"]]);

    let inner: Vec<_> = g.clustered_connected_components(s1).collect();
    assert_eq!(inner.len(), 2);
}

#[test]
fn shallow_components_and_pagerank() {
    let mut g = Graph::new("root");
    let root = g.root();
    for id in ["a", "b", "c", "x"] {
        g.add_node(root, Node::new(id)).unwrap();
    }
    g.set_edge(root, "a-b", "a", "b", None).unwrap();
    let bc = g.set_edge(root, "b-c", "b", "c", None).unwrap();
    g.set_edge(root, "c-a", "c", "a", None).unwrap();

    let comps = alg::shallow_connected_components(&g, root);
    assert_eq!(comps.len(), 2);
    assert_eq!(comps[0].len(), 3);

    let ranks = alg::pagerank(&g, root, 0.85);
    let a = g.find_node(root, "a").unwrap();
    let x = g.find_node(root, "x").unwrap();
    assert!(ranks[&a] > ranks[&x]);
    let total: f64 = ranks.values().sum();
    assert!(total > 0.0 && total <= 1.0 + 1e-9);

    let members: hashbrown::HashSet<NodeKey> = comps[0].iter().copied().collect();
    assert!(alg::edge_nodes_belong_to_set(&g, bc, &members));
}
