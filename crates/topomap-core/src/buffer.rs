use topomap_graph::Position;

/// Flat coordinate buffer shared by every vertex of a scene.
///
/// Vertex `id` lives at `data[id * 2]` (x) and `data[id * 2 + 1]` (y). Node creation and the
/// layout write-back are the only writers; geometry projection only reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBuffer {
    data: Vec<f64>,
}

impl PositionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.data.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Id the next [`PositionBuffer::push`] will return.
    pub fn next_id(&self) -> usize {
        self.len()
    }

    pub fn push(&mut self, pos: Position) -> usize {
        let id = self.len();
        self.data.extend_from_slice(&pos);
        id
    }

    pub fn get(&self, id: usize) -> Option<Position> {
        let x = *self.data.get(id * 2)?;
        let y = *self.data.get(id * 2 + 1)?;
        Some([x, y])
    }

    /// Returns `false` when `id` was never allocated.
    pub fn set(&mut self, id: usize, pos: Position) -> bool {
        match self.data.get_mut(id * 2..id * 2 + 2) {
            Some(slot) => {
                slot.copy_from_slice(&pos);
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }
}
