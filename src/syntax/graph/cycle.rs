#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Finds a cycle in a functional selection, where `selection[v]` is the head used by `v`.
///
/// The cycle is returned in head-pointer order starting from the first node revisited by a
/// walk. Walks start from every node in index order and stop at a node without head, at a
/// head outside the selection, or at a node already proven acyclic.
pub fn find_cycle(selection: &[Option<usize>]) -> Vec<usize> {
    let n = selection.len();
    let mut marks = vec![Mark::Unvisited; n];
    let mut path: Vec<usize> = Vec::new();
    for start in 0..n {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        path.clear();
        let mut node = start;
        loop {
            match marks[node] {
                Mark::Done => break,
                Mark::OnPath => match path.iter().position(|&v| v == node) {
                    Some(pos) => return path[pos..].to_vec(),
                    None => break,
                },
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath;
                    path.push(node);
                    match selection[node] {
                        Some(head) if head < n => node = head,
                        _ => break,
                    }
                }
            }
        }
        for &v in &path {
            marks[v] = Mark::Done;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::find_cycle;

    #[test]
    fn finds_cycle_in_selection() {
        // 0 <- 3 <- 4 <- 2 <- 0, 1 hangs off 2
        let selection = vec![Some(3), Some(2), Some(0), Some(4), Some(2)];
        assert_eq!(find_cycle(&selection), vec![0, 3, 4, 2]);
    }

    #[test]
    fn returns_empty_on_tree() {
        let selection = vec![None, Some(2), Some(0), Some(4), Some(2)];
        assert!(find_cycle(&selection).is_empty());
    }

    #[test]
    fn skips_nodes_leading_into_known_acyclic_paths() {
        let selection = vec![None, Some(0), Some(1), Some(2), Some(5), Some(4)];
        assert_eq!(find_cycle(&selection), vec![4, 5]);
    }

    #[test]
    fn treats_out_of_range_heads_as_terminals() {
        let selection = vec![None, Some(9), Some(1)];
        assert!(find_cycle(&selection).is_empty());
        assert!(find_cycle(&[]).is_empty());
    }

    #[test]
    fn reports_self_loops() {
        assert_eq!(find_cycle(&[None, Some(1)]), vec![1]);
    }
}
