#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {edge_id}")]
    MissingEndpoint { edge_id: String },

    #[error("node {node_id} references unknown parent {parent}")]
    UnknownParent { node_id: String, parent: String },

    #[error("duplicate node id: {node_id}")]
    DuplicateNode { node_id: String },

    #[error("parent chain of node {node_id} forms a cycle")]
    CyclicParent { node_id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
