//! Presentation copy of the transform graph: pruning and Graphviz output.
//!
//! A [`GraphDiagram`] holds only topology (nodes and edge kinds) copied
//! out of a [`TransformGraph`](crate::TransformGraph). Pruning it never
//! touches the live graph.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

use crate::error::TransformError;
use crate::frame::FrameKind;
use crate::graph::StepKind;

/// Label of the node standing in for every pruned frame.
pub const PLACEHOLDER_LABEL: &str = "Other frames";

const PLACEHOLDER_ID: &str = "Other";
const GENERIC_FILL: &str = "lightcyan";
const SOLAR_FILL: &str = "white";
const PLACEHOLDER_EDGE_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagramNode {
    Frame(FrameKind),
    /// Everything removed by [`GraphDiagram::prune`].
    Placeholder,
}

impl DiagramNode {
    fn id(self) -> &'static str {
        match self {
            Self::Frame(kind) => kind.class_name(),
            Self::Placeholder => PLACEHOLDER_ID,
        }
    }
}

impl fmt::Display for DiagramNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Edge style: a registered transform kind, or a placeholder link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramEdge {
    Transform(StepKind),
    Placeholder,
}

impl DiagramEdge {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Transform(kind) => kind.color(),
            Self::Placeholder => PLACEHOLDER_EDGE_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphDiagram {
    nodes: BTreeSet<DiagramNode>,
    edges: BTreeMap<(DiagramNode, DiagramNode), DiagramEdge>,
}

impl GraphDiagram {
    pub fn from_edges(edges: impl IntoIterator<Item = (FrameKind, FrameKind, StepKind)>) -> Self {
        let mut diagram = Self::default();
        for (from, to, kind) in edges {
            let (a, b) = (DiagramNode::Frame(from), DiagramNode::Frame(to));
            diagram.nodes.extend([a, b]);
            diagram.edges.insert((a, b), DiagramEdge::Transform(kind));
        }
        diagram
    }

    pub fn nodes(&self) -> impl Iterator<Item = DiagramNode> + '_ {
        self.nodes.iter().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (DiagramNode, DiagramNode, DiagramEdge)> + '_ {
        self.edges.iter().map(|(&(a, b), &e)| (a, b, e))
    }

    pub fn contains(&self, kind: FrameKind) -> bool {
        self.nodes.contains(&DiagramNode::Frame(kind))
    }

    /// Keep only the named kinds and the edges between them, then add the
    /// placeholder node linked both ways to ICRS.
    ///
    /// Names are matched as in [`FrameKind::from_name`]; an unrecognised
    /// name is an error.
    pub fn prune(mut self, keep: &[&str]) -> Result<Self, TransformError> {
        let keep: BTreeSet<DiagramNode> = keep
            .iter()
            .map(|name| {
                FrameKind::from_name(name)
                    .map(DiagramNode::Frame)
                    .ok_or_else(|| TransformError::UnknownFrame((*name).to_string()))
            })
            .collect::<Result<_, _>>()?;

        self.nodes.retain(|n| keep.contains(n));
        self.edges.retain(|(a, b), _| keep.contains(a) && keep.contains(b));

        self.nodes.insert(DiagramNode::Placeholder);
        let icrs = DiagramNode::Frame(FrameKind::Icrs);
        if self.nodes.contains(&icrs) {
            self.edges.insert((DiagramNode::Placeholder, icrs), DiagramEdge::Placeholder);
            self.edges.insert((icrs, DiagramNode::Placeholder), DiagramEdge::Placeholder);
        }
        Ok(self)
    }

    /// Graphviz DOT description.
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_dot(&mut out);
        out
    }

    fn write_dot(&self, out: &mut String) -> fmt::Result {
        writeln!(out, "digraph TransformGraph {{")?;
        writeln!(out, "        node [style=filled fillcolor={GENERIC_FILL}]")?;
        writeln!(out, "        overlap=false")?;
        writeln!(out, "        rankdir=LR")?;

        let ranked: Vec<&str> = [
            DiagramNode::Frame(FrameKind::Icrs),
            DiagramNode::Frame(FrameKind::Hcrs),
            DiagramNode::Placeholder,
        ]
        .into_iter()
        .filter(|n| self.nodes.contains(n))
        .map(DiagramNode::id)
        .collect();
        if !ranked.is_empty() {
            writeln!(out, "        {{rank=same; {}}}", ranked.join("; "))?;
        }
        writeln!(out)?;

        for node in &self.nodes {
            match node {
                DiagramNode::Frame(kind) if kind.is_solar() => writeln!(
                    out,
                    "        {} [fillcolor={SOLAR_FILL} shape=oval label=\"{}\\n`{}`\"]",
                    kind.class_name(),
                    kind.class_name(),
                    kind.name()
                )?,
                DiagramNode::Frame(kind) => writeln!(
                    out,
                    "        {} [shape=oval label=\"{}\\n`{}`\"]",
                    kind.class_name(),
                    kind.class_name(),
                    kind.name()
                )?,
                DiagramNode::Placeholder => writeln!(
                    out,
                    "        {PLACEHOLDER_ID} [shape=box3d style=filled fillcolor={GENERIC_FILL} \
                     label=\"{PLACEHOLDER_LABEL}\"]"
                )?,
            }
        }
        writeln!(out)?;

        for (&(a, b), edge) in &self.edges {
            writeln!(out, "        {a} -> {b}[  color = \"{}\" ]", edge.color())?;
        }
        writeln!(out, "}}")
    }

    /// Colour key for nodes and edges, as `(label, colour)` pairs.
    pub fn legend(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("Solar frames", SOLAR_FILL),
            ("Generic frames", GENERIC_FILL),
            (StepKind::Function.name(), StepKind::Function.color()),
            (StepKind::FiniteDifference.name(), StepKind::FiniteDifference.color()),
            (StepKind::Affine.name(), StepKind::Affine.color()),
        ]
    }
}
