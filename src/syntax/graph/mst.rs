//! Maximum spanning arborescence by iterative Chu-Liu-Edmonds contraction.

use std::collections::HashMap;

use lang::Phrasal;
use syntax::graph::{find_cycle, outranks, DepGraph, ROOT};
use syntax::Tree;

/// Builds the fully connected graph of `sentence` and returns its maximum spanning tree.
///
/// Scoring errors abort the parse unmodified.
pub fn mst_parse<S, F, E>(sentence: &S, labels: &[&str], score_fn: F) -> Result<Tree, E>
where
    S: Phrasal,
    F: FnMut(&S, usize, usize, &str) -> Result<f64, E>,
{
    let graph = DepGraph::build(sentence, score_fn, labels)?;
    Ok(chu_liu_edmonds(&graph))
}

/// An edge of the current round. `arc` is the id of the graph arc it stands for.
#[derive(Debug, Clone)]
struct Edge {
    src: usize,
    dst: usize,
    weight: f64,
    arc: usize,
}

impl Edge {
    #[inline]
    fn key(&self) -> (f64, usize, usize) {
        (self.weight, self.src, self.arc)
    }
}

#[derive(Debug)]
struct Contraction {
    node: usize,
    /// `(member, arc, weight)` of the selected edge of every cycle member.
    cycle: Vec<(usize, usize, f64)>,
    /// Member of the cycle entered by each incoming arc.
    entries: HashMap<usize, usize>,
}

/// Returns the maximum spanning tree rooted at node 0.
///
/// Arcs into the root and NaN-weighted arcs are ignored. Nodes that cannot be reached
/// are attached to the root without label.
pub fn chu_liu_edmonds(graph: &DepGraph) -> Tree {
    let n = graph.num_nodes();
    let mut tree = Tree::new(n);
    if n <= 1 {
        return tree;
    }

    let mut edges: Vec<Edge> = graph
        .arcs()
        .iter()
        .enumerate()
        .filter(|&(_, a)| a.child != ROOT && a.head != a.child && !a.weight.is_nan())
        .map(|(id, a)| Edge {
            src: a.head,
            dst: a.child,
            weight: a.weight,
            arc: id,
        })
        .collect();
    let mut num_ids = n;
    let mut stack: Vec<Contraction> = Vec::new();

    let mut chosen = loop {
        let best = select(&edges, num_ids);
        let selection: Vec<Option<usize>> =
            best.iter().map(|e| e.map(|i| edges[i].src)).collect();
        let cycle = find_cycle(&selection);
        if cycle.is_empty() {
            break best
                .iter()
                .map(|e| e.map(|i| edges[i].arc))
                .collect::<Vec<Option<usize>>>();
        }
        let contraction = contract(&mut edges, &best, &cycle, num_ids);
        num_ids += 1;
        stack.push(contraction);
        debug_assert!(stack.len() < n);
    };

    while let Some(contraction) = stack.pop() {
        expand(&mut chosen, contraction);
    }

    for child in 1..n {
        match chosen[child].and_then(|id| graph.arc(id)) {
            Some(arc) => tree.attach(child, arc.head, arc.label.clone()),
            None => tree.attach(child, ROOT, None),
        }
    }
    tree
}

/// Index of the best incoming edge of every node id.
fn select(edges: &[Edge], num_ids: usize) -> Vec<Option<usize>> {
    let mut best: Vec<Option<usize>> = vec![None; num_ids];
    for (i, edge) in edges.iter().enumerate() {
        if edge.weight.is_nan() {
            continue;
        }
        let replace = match best[edge.dst] {
            Some(j) => outranks(edge.key(), edges[j].key()),
            None => true,
        };
        if replace {
            best[edge.dst] = Some(i);
        }
    }
    best
}

/// Collapses `cycle` into the new node `node` and rewrites `edges` in place.
fn contract(
    edges: &mut Vec<Edge>,
    best: &[Option<usize>],
    cycle: &[usize],
    node: usize,
) -> Contraction {
    let mut in_cycle = vec![false; node];
    let mut selected_weight = vec![0.0; node];
    let mut members = Vec::with_capacity(cycle.len());
    for &v in cycle {
        if let Some(i) = best[v] {
            in_cycle[v] = true;
            selected_weight[v] = edges[i].weight;
            members.push((v, edges[i].arc, edges[i].weight));
        }
    }
    let min_weight = members
        .iter()
        .map(|&(_, _, w)| w)
        .fold(::std::f64::INFINITY, f64::min);

    let mut entries = HashMap::new();
    let mut outgoing: HashMap<usize, usize> = HashMap::new();
    let mut next: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges.drain(..) {
        match (in_cycle[edge.src], in_cycle[edge.dst]) {
            (true, true) => {}
            (false, true) => {
                entries.insert(edge.arc, edge.dst);
                next.push(Edge {
                    src: edge.src,
                    dst: node,
                    weight: edge.weight - selected_weight[edge.dst] + min_weight,
                    arc: edge.arc,
                });
            }
            (true, false) => {
                let edge = Edge { src: node, ..edge };
                match outgoing.get(&edge.dst) {
                    Some(&i) => {
                        let kept = &mut next[i];
                        if edge.weight > kept.weight
                            || (edge.weight == kept.weight && edge.arc < kept.arc)
                        {
                            *kept = edge;
                        }
                    }
                    None => {
                        outgoing.insert(edge.dst, next.len());
                        next.push(edge);
                    }
                }
            }
            (false, false) => next.push(edge),
        }
    }
    *edges = next;

    Contraction {
        node: node,
        cycle: members,
        entries: entries,
    }
}

/// Replaces the arc chosen for a pseudo-node with the arcs of its members.
fn expand(chosen: &mut Vec<Option<usize>>, contraction: Contraction) {
    let entering = chosen[contraction.node].take();
    let entry = entering.and_then(|arc| contraction.entries.get(&arc).cloned());
    let broken = match entry {
        Some(member) => Some(member),
        None => contraction
            .cycle
            .iter()
            .fold(None, |acc: Option<(usize, f64)>, &(v, _, w)| match acc {
                Some((_, min)) if min <= w => acc,
                _ => Some((v, w)),
            })
            .map(|(v, _)| v),
    };
    for &(member, arc, _) in &contraction.cycle {
        chosen[member] = if Some(member) == broken {
            entry.and(entering)
        } else {
            Some(arc)
        };
    }
}
