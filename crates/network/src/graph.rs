use std::collections::HashMap;

use crate::line::PowerLine;
use crate::node::{NetworkId, PowerNode};

/// Position of a node in [`NetworkGraph::nodes`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(pub usize);

/// Position of a line in [`NetworkGraph::lines`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRef(pub usize);

/// Why a line was not added to the graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DanglingLine {
    pub line_id: NetworkId,
    /// The first endpoint id that did not resolve.
    pub missing_end: NetworkId,
}

/// Loaded network: nodes, lines and an `id -> node` index.
///
/// Read-only once built; the only way to construct one is through
/// [`NetworkGraphBuilder`], which keeps connection counts consistent with
/// the line set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    nodes: Vec<PowerNode>,
    lines: Vec<PowerLine>,
    index: HashMap<NetworkId, NodeRef>,
}

impl NetworkGraph {
    /// Nodes in insertion order (document order across variants).
    pub fn nodes(&self) -> &[PowerNode] {
        &self.nodes
    }

    pub fn lines(&self) -> &[PowerLine] {
        &self.lines
    }

    pub fn node(&self, node: NodeRef) -> Option<&PowerNode> {
        self.nodes.get(node.0)
    }

    pub fn line(&self, line: LineRef) -> Option<&PowerLine> {
        self.lines.get(line.0)
    }

    /// Resolves an id through the index. With duplicate ids the last inserted node wins.
    pub fn node_ref(&self, id: NetworkId) -> Option<NodeRef> {
        self.index.get(&id).copied()
    }

    pub fn node_by_id(&self, id: NetworkId) -> Option<&PowerNode> {
        self.node_ref(id).and_then(|r| self.node(r))
    }

    /// Both endpoint nodes of a line, resolved through the index.
    pub fn endpoints(&self, line: &PowerLine) -> Option<(NodeRef, NodeRef)> {
        Some((self.node_ref(line.first_end)?, self.node_ref(line.second_end)?))
    }

    pub fn node_refs(&self) -> impl Iterator<Item = (NodeRef, &PowerNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeRef(i), n))
    }

    pub fn line_refs(&self) -> impl Iterator<Item = (LineRef, &PowerLine)> + '_ {
        self.lines.iter().enumerate().map(|(i, l)| (LineRef(i), l))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.lines.is_empty()
    }
}

/// Incremental construction of a [`NetworkGraph`].
///
/// Nodes must be pushed before the lines that reference them: a line is only
/// accepted when both endpoint ids already resolve.
#[derive(Debug, Default)]
pub struct NetworkGraphBuilder {
    graph: NetworkGraph,
}

impl NetworkGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` and indexes it. A duplicate id replaces the index entry
    /// but the earlier node stays in the node list.
    pub fn push_node(&mut self, mut node: PowerNode) -> NodeRef {
        node.connection_count = 0;
        let node_ref = NodeRef(self.graph.nodes.len());
        self.graph.index.insert(node.id, node_ref);
        self.graph.nodes.push(node);
        node_ref
    }

    /// Appends `line` if both endpoints resolve, bumping both endpoint counts.
    ///
    /// A rejected line leaves the graph untouched.
    pub fn push_line(&mut self, line: PowerLine) -> Result<LineRef, DanglingLine> {
        let dangling = |missing_end| DanglingLine {
            line_id: line.id,
            missing_end,
        };
        let first = self
            .graph
            .node_ref(line.first_end)
            .ok_or_else(|| dangling(line.first_end))?;
        let second = self
            .graph
            .node_ref(line.second_end)
            .ok_or_else(|| dangling(line.second_end))?;

        self.graph.nodes[first.0].connection_count += 1;
        self.graph.nodes[second.0].connection_count += 1;

        let line_ref = LineRef(self.graph.lines.len());
        self.graph.lines.push(line);
        Ok(line_ref)
    }

    pub fn contains_node(&self, id: NetworkId) -> bool {
        self.graph.index.contains_key(&id)
    }

    pub fn finish(self) -> NetworkGraph {
        self.graph
    }
}
