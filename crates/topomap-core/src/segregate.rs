//! Splitting a parent path into runs bounded by node references.

use topomap_graph::{CoordRef, Position};

/// One resolved path element together with its index in the path it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct GuidedCoord<'a> {
    pub item: &'a CoordRef,
    pub index: usize,
    pub coords: Position,
}

impl GuidedCoord<'_> {
    pub fn node_id(&self) -> Option<&str> {
        self.item.as_node_id()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segregated<'a> {
    pub runs: Vec<Vec<GuidedCoord<'a>>>,
}

impl Segregated<'_> {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn coords(&self) -> Vec<Vec<Position>> {
        self.runs
            .iter()
            .map(|run| run.iter().map(|c| c.coords).collect())
            .collect()
    }

    /// Path indices of every run.
    pub fn indices(&self) -> Vec<Vec<usize>> {
        self.runs
            .iter()
            .map(|run| run.iter().map(|c| c.index).collect())
            .collect()
    }
}

/// Walks `path` left to right and closes the current run at every node reference that follows
/// an already started run. The closing node also opens the next run, so a path with `k`
/// resolvable node references yields `k - 1` runs, each starting and ending on a node.
///
/// `coords` is aligned with `path`; elements without coordinates are skipped. Elements after
/// the last node reference never close a run and are dropped.
pub fn segregate_path<'a>(path: &'a [CoordRef], coords: &[Option<Position>]) -> Segregated<'a> {
    let mut runs = Vec::new();
    let mut current: Vec<GuidedCoord<'a>> = Vec::new();

    for (index, item) in path.iter().enumerate() {
        let Some(pos) = coords.get(index).copied().flatten() else {
            continue;
        };
        if matches!(item, CoordRef::Opaque(_)) {
            continue;
        }
        let guided = GuidedCoord {
            item,
            index,
            coords: pos,
        };
        if item.is_node() && !current.is_empty() {
            current.push(guided.clone());
            runs.push(std::mem::take(&mut current));
        }
        current.push(guided);
    }

    Segregated { runs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topomap_graph::Waypoint;

    fn coords_of(path: &[CoordRef]) -> Vec<Option<Position>> {
        path.iter()
            .enumerate()
            .map(|(i, r)| match r {
                CoordRef::Node(_) => Some([i as f64, 0.0]),
                CoordRef::Point(p) => Some(p.position()),
                CoordRef::Opaque(_) => None,
            })
            .collect()
    }

    #[test]
    fn k_nodes_give_k_minus_one_runs() {
        let path = vec![
            CoordRef::node("A"),
            CoordRef::point(1.0, 1.0),
            CoordRef::node("B"),
            CoordRef::point(2.0, 2.0),
            CoordRef::point(3.0, 3.0),
            CoordRef::node("C"),
        ];
        let seg = segregate_path(&path, &coords_of(&path));
        assert_eq!(seg.indices(), vec![vec![0, 1, 2], vec![2, 3, 4, 5]]);
        for run in &seg.runs {
            assert!(run[0].item.is_node());
            assert!(run[run.len() - 1].item.is_node());
        }
    }

    #[test]
    fn waypoint_between_two_nodes_stays_in_one_run() {
        let path = vec![
            CoordRef::node("A"),
            CoordRef::Point(Waypoint::new(5.0, 5.0).with_comment("note", Some("red"))),
            CoordRef::node("B"),
        ];
        let seg = segregate_path(&path, &coords_of(&path));
        assert_eq!(seg.runs.len(), 1);
        assert_eq!(seg.coords(), vec![vec![[0.0, 0.0], [5.0, 5.0], [2.0, 0.0]]]);
    }

    #[test]
    fn unresolved_elements_are_skipped() {
        let path = vec![
            CoordRef::node("A"),
            CoordRef::node("ghost"),
            CoordRef::node("B"),
        ];
        let mut coords = coords_of(&path);
        coords[1] = None;
        let seg = segregate_path(&path, &coords);
        assert_eq!(seg.indices(), vec![vec![0, 2]]);
    }

    #[test]
    fn single_node_yields_nothing() {
        let path = vec![CoordRef::node("A"), CoordRef::point(1.0, 1.0)];
        assert!(segregate_path(&path, &coords_of(&path)).is_empty());
        assert!(segregate_path(&[], &[]).is_empty());
    }
}
