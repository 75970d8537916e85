//! Break cycles by reversing a DFS feedback arc set.

use super::RoutedEdge;

pub fn run(node_count: usize, edges: &mut [RoutedEdge]) {
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (i, e) in edges.iter().enumerate() {
        out[e.v].push(i);
    }

    fn dfs(
        v: usize,
        out: &[Vec<usize>],
        edges: &[RoutedEdge],
        visited: &mut [bool],
        on_stack: &mut [bool],
        fas: &mut Vec<usize>,
    ) {
        if visited[v] {
            return;
        }
        visited[v] = true;
        on_stack[v] = true;
        for &i in &out[v] {
            let w = edges[i].w;
            if on_stack[w] {
                fas.push(i);
            } else {
                dfs(w, out, edges, visited, on_stack, fas);
            }
        }
        on_stack[v] = false;
    }

    let mut visited = vec![false; node_count];
    let mut on_stack = vec![false; node_count];
    let mut fas: Vec<usize> = Vec::new();
    for v in 0..node_count {
        dfs(v, &out, edges, &mut visited, &mut on_stack, &mut fas);
    }

    for i in fas {
        edges[i].reversed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(v: usize, w: usize) -> RoutedEdge {
        RoutedEdge {
            id: format!("{v}-{w}"),
            v,
            w,
            reversed: false,
            chain: Vec::new(),
        }
    }

    #[test]
    fn breaks_a_triangle_with_one_reversal() {
        let mut edges = vec![edge(0, 1), edge(1, 2), edge(2, 0)];
        run(3, &mut edges);
        let reversed: Vec<_> = edges.iter().filter(|e| e.reversed).map(|e| e.id.as_str()).collect();
        assert_eq!(reversed, ["2-0"]);
    }

    #[test]
    fn leaves_a_dag_untouched() {
        let mut edges = vec![edge(0, 1), edge(0, 2), edge(1, 2)];
        run(3, &mut edges);
        assert!(edges.iter().all(|e| !e.reversed));
    }
}
