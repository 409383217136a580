use std::error;
use std::fmt;

use lang::Phrasal;

pub use self::cycle::find_cycle;
pub use self::mst::{chu_liu_edmonds, mst_parse};

pub mod cycle;
pub mod mst;

pub const ROOT: usize = 0;

/// A scored candidate attachment `head -> child`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub head: usize,
    pub child: usize,
    pub label: Option<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    SelfLoop(usize),
    NodeOutOfRange { node: usize, num_nodes: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GraphError::SelfLoop(node) => write!(f, "self-loop on node {}", node),
            GraphError::NodeOutOfRange { node, num_nodes } => write!(
                f,
                "node {} is out of range for a graph of {} nodes",
                node,
                num_nodes
            ),
        }
    }
}

impl error::Error for GraphError {}

/// Candidate arcs over the nodes `0..num_nodes` of one sentence, node 0 being the root.
///
/// Arc ids are insertion positions and take part in tie-breaking.
#[derive(Debug, Clone)]
pub struct DepGraph {
    num_nodes: usize,
    arcs: Vec<Arc>,
    incoming: Vec<Vec<usize>>,
}

impl DepGraph {
    /// Creates a graph without arcs.
    pub fn new(num_nodes: usize) -> Self {
        DepGraph {
            num_nodes: num_nodes,
            arcs: vec![],
            incoming: vec![vec![]; num_nodes],
        }
    }

    /// Creates the fully connected graph of a sentence.
    ///
    /// Every pair `(head, child)` with `child != 0` and `head != child` becomes one arc
    /// carrying the best score over `labels` and the label that produced it; the first
    /// label wins ties and NaN scores are never chosen. The first error of `score_fn`
    /// aborts the construction.
    pub fn build<S, F, E>(sentence: &S, mut score_fn: F, labels: &[&str]) -> Result<Self, E>
    where
        S: Phrasal,
        F: FnMut(&S, usize, usize, &str) -> Result<f64, E>,
    {
        let n = sentence.len();
        let mut graph = DepGraph::new(n);
        graph.arcs.reserve(n.saturating_sub(1) * n.saturating_sub(1));
        for child in 1..n {
            for head in 0..n {
                if head == child {
                    continue;
                }
                let mut best: Option<(f64, &str)> = None;
                for &label in labels {
                    let weight = score_fn(sentence, head, child, label)?;
                    if weight.is_nan() {
                        continue;
                    }
                    if best.map_or(true, |(w, _)| weight > w) {
                        best = Some((weight, label));
                    }
                }
                if let Some((weight, label)) = best {
                    graph.push(Arc {
                        head: head,
                        child: child,
                        label: Some(label.to_string()),
                        weight: weight,
                    });
                }
            }
        }
        Ok(graph)
    }

    /// Inserts an arc and returns its id.
    ///
    /// Only self-loops and unknown nodes are rejected. Arcs into the root are kept so that
    /// hand-made graphs can be inspected with `find_cycle`, but the solver ignores them.
    pub fn add_edge(
        &mut self,
        head: usize,
        child: usize,
        weight: f64,
        label: Option<&str>,
    ) -> Result<usize, GraphError> {
        for &node in &[head, child] {
            if node >= self.num_nodes {
                return Err(GraphError::NodeOutOfRange {
                    node: node,
                    num_nodes: self.num_nodes,
                });
            }
        }
        if head == child {
            return Err(GraphError::SelfLoop(head));
        }
        Ok(self.push(Arc {
            head: head,
            child: child,
            label: label.map(|s| s.to_string()),
            weight: weight,
        }))
    }

    fn push(&mut self, arc: Arc) -> usize {
        let id = self.arcs.len();
        self.incoming[arc.child].push(id);
        self.arcs.push(arc);
        id
    }

    /// Arcs whose child is `node`, in insertion order.
    pub fn edges_into(&self, node: usize) -> Vec<&Arc> {
        match self.incoming.get(node) {
            Some(ids) => ids.iter().map(|&id| &self.arcs[id]).collect(),
            None => vec![],
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc(&self, id: usize) -> Option<&Arc> {
        self.arcs.get(id)
    }

    /// The head of every node's best incoming arc, `None` for nodes without one.
    pub fn selection(&self) -> Vec<Option<usize>> {
        self.incoming
            .iter()
            .map(|ids| {
                let mut best: Option<(f64, usize, usize)> = None;
                for &id in ids {
                    let arc = &self.arcs[id];
                    if arc.weight.is_nan() {
                        continue;
                    }
                    if best.map_or(true, |b| outranks((arc.weight, arc.head, id), b)) {
                        best = Some((arc.weight, arc.head, id));
                    }
                }
                best.map(|(_, head, _)| head)
            })
            .collect()
    }

    /// A cycle among the greedily selected arcs, empty if there is none.
    pub fn find_cycle(&self) -> Vec<usize> {
        find_cycle(&self.selection())
    }
}

/// Whether `candidate` beats `best`, both given as `(weight, head, arc id)`:
/// higher weight first, then the lower head, then the earlier arc.
#[inline]
pub(crate) fn outranks(candidate: (f64, usize, usize), best: (f64, usize, usize)) -> bool {
    if candidate.0 != best.0 {
        candidate.0 > best.0
    } else {
        (candidate.1, candidate.2) < (best.1, best.2)
    }
}
