mod cliques;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

pub type NodeId = usize;

#[derive(Debug)]
pub enum GraphError {
    Io(std::io::Error),
    Header(String),
    Edge(String),
    SelfLoop(String),
    DuplicateEdge(String, String),
    NodeCount { declared: usize, found: usize },
    EdgeCount { declared: usize, found: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphError::Io(e) => write!(f, "could not read graph definition: {}", e),
            GraphError::Header(line) => write!(f, "malformed definition header: '{}'", line),
            GraphError::Edge(line) => write!(f, "malformed edge line: '{}'", line),
            GraphError::SelfLoop(label) => write!(f, "self loop on node '{}'", label),
            GraphError::DuplicateEdge(a, b) => write!(f, "duplicate edge '{}, {}'", a, b),
            GraphError::NodeCount { declared, found } => write!(
                f,
                "the graph's number of nodes is not the same as on the data file: declared {}, found {}",
                declared, found
            ),
            GraphError::EdgeCount { declared, found } => write!(
                f,
                "the graph's number of edges is not the same as on the data file: declared {}, found {}",
                declared, found
            ),
        }
    }
}

impl std::error::Error for GraphError {}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        GraphError::Io(e)
    }
}

/// An already validated graph. Nodes are dense indices in label
/// first-appearance order, which keeps variable creation stable
/// across reruns of the same definition file.
#[derive(Clone, Debug)]
pub struct SepGraph {
    labels: Vec<String>,
    indices: HashMap<String, NodeId>,
    adjacency: Vec<HashSet<NodeId>>,
    edges: Vec<(NodeId, NodeId)>,
    directed: bool,
}

impl SepGraph {
    /// Builds a graph over an explicit node list. Edges are index pairs.
    pub fn new(
        labels: Vec<String>,
        directed: bool,
        edges: Vec<(NodeId, NodeId)>,
    ) -> Result<SepGraph, GraphError> {
        let mut graph = SepGraph {
            indices: labels
                .iter()
                .enumerate()
                .map(|(i, l)| (l.clone(), i))
                .collect(),
            adjacency: labels.iter().map(|_| HashSet::new()).collect(),
            labels,
            edges: Vec::with_capacity(edges.len()),
            directed,
        };

        for (u, v) in edges {
            graph.push_edge(u, v)?;
        }

        Ok(graph)
    }

    /// Parses the definition format: a "nodes, edges, directed" header
    /// followed by one "label, label" line per edge.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<SepGraph, GraphError> {
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| GraphError::Header(String::from("<empty file>")))??;
        let fields: Vec<&str> = header.split(',').map(|f| f.trim()).collect();
        if fields.len() != 3 {
            return Err(GraphError::Header(header));
        }
        let n_nodes = fields[0]
            .parse::<usize>()
            .map_err(|_| GraphError::Header(header.clone()))?;
        let n_edges = fields[1]
            .parse::<usize>()
            .map_err(|_| GraphError::Header(header.clone()))?;
        let directed = match fields[2] {
            "0" => false,
            "1" => true,
            _ => return Err(GraphError::Header(header)),
        };

        let mut graph = SepGraph {
            labels: Vec::new(),
            indices: HashMap::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
            directed,
        };

        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let endpoints: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
            if endpoints.len() != 2 || endpoints.iter().any(|l| l.is_empty()) {
                return Err(GraphError::Edge(line));
            }
            let u = graph.intern(endpoints[0]);
            let v = graph.intern(endpoints[1]);
            graph.push_edge(u, v)?;
        }

        if graph.labels.len() != n_nodes {
            return Err(GraphError::NodeCount {
                declared: n_nodes,
                found: graph.labels.len(),
            });
        }
        if graph.edges.len() != n_edges {
            return Err(GraphError::EdgeCount {
                declared: n_edges,
                found: graph.edges.len(),
            });
        }

        Ok(graph)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SepGraph, GraphError> {
        let file = File::open(path)?;
        SepGraph::from_reader(BufReader::new(file))
    }

    /// Inverse of `from_reader`.
    pub fn write_definition<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}, {}, {}",
            self.labels.len(),
            self.edges.len(),
            if self.directed { 1 } else { 0 }
        )?;
        for (u, v) in &self.edges {
            writeln!(writer, "{}, {}", self.labels[*u], self.labels[*v])?;
        }
        Ok(())
    }

    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(id) = self.indices.get(label) {
            return *id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_owned());
        self.indices.insert(label.to_owned(), id);
        self.adjacency.push(HashSet::new());
        id
    }

    fn push_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), GraphError> {
        if u >= self.labels.len() || v >= self.labels.len() {
            return Err(GraphError::Edge(format!("{}, {}", u, v)));
        }
        if u == v {
            return Err(GraphError::SelfLoop(self.labels[u].clone()));
        }
        let duplicate = if self.directed {
            self.edges.iter().any(|e| *e == (u, v))
        } else {
            self.adjacency[u].contains(&v)
        };
        if duplicate {
            return Err(GraphError::DuplicateEdge(
                self.labels[u].clone(),
                self.labels[v].clone(),
            ));
        }
        self.adjacency[u].insert(v);
        self.adjacency[v].insert(u);
        self.edges.push((u, v));
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> std::ops::Range<NodeId> {
        0..self.labels.len()
    }

    /// Edge list in definition order.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.labels[node]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<NodeId> {
        self.indices.get(label).copied()
    }

    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency[node].iter().copied()
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node].len()
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency[u].contains(&v)
    }

    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let all: Vec<NodeId> = self.nodes().collect();
        self.induced_components(&all)
    }

    /// Connected components of the subgraph induced by `keep`. Components are
    /// sorted internally and listed by smallest member, so the result is
    /// deterministic whatever order `keep` comes in.
    pub fn induced_components(&self, keep: &[NodeId]) -> Vec<Vec<NodeId>> {
        let kept: HashSet<NodeId> = keep.iter().copied().collect();
        let mut visited: HashSet<NodeId> = HashSet::with_capacity(kept.len());
        let mut components = Vec::new();

        for root in kept.iter().copied().sorted() {
            if visited.contains(&root) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![root];
            visited.insert(root);
            while let Some(node) = stack.pop() {
                component.push(node);
                for next in self.neighbors(node) {
                    if kept.contains(&next) && visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }

        components
    }

    /// All maximal cliques, each sorted, the list in lexicographic order.
    /// Every edge belongs to at least one of them and isolated nodes come
    /// out as singletons.
    pub fn maximal_cliques(&self) -> Vec<Vec<NodeId>> {
        cliques::maximal_cliques(&self.adjacency)
    }
}
