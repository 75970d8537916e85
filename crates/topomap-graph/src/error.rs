use crate::entity::NodeKey;

/// Structural invariant violations. Anything reported here means the requested mutation was
/// rejected and the graph is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node id `{id}` is already reachable from the root graph")]
    DuplicateNodeId { id: String },

    #[error("node {0:?} is not a subgraph")]
    NotASubgraph(NodeKey),

    #[error("unknown node handle {0:?}")]
    UnknownNode(NodeKey),

    #[error("cannot move node {node:?} under its own descendant {parent:?}")]
    CyclicParent { node: NodeKey, parent: NodeKey },
}

pub type Result<T> = std::result::Result<T, GraphError>;
