//! Model Reference Graph
//!
//! Directed graph of model-to-model references using petgraph. Edges come
//! from property types (direct or array items) and relation targets. Cycles
//! are legal; schema generation breaks them with its visited set, this module
//! only reports them.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use crate::registry::ModelRegistry;

/// Why one model references another
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Property typed as the target model (or an array of it)
    Property(String),
    /// Relation whose target is the model
    Relation(String),
}

impl EdgeKind {
    pub fn label(&self) -> &str {
        match self {
            EdgeKind::Property(name) | EdgeKind::Relation(name) => name,
        }
    }
}

/// References between registered models
pub struct ModelGraph {
    graph: DiGraph<String, EdgeKind>,
    node_indices: HashMap<String, NodeIndex>,
}

impl ModelGraph {
    /// Build the graph; references to unregistered models are skipped.
    pub fn build(registry: &ModelRegistry) -> Self {
        let mut graph = DiGraph::with_capacity(registry.len(), registry.len() * 2);
        let mut node_indices = HashMap::with_capacity(registry.len());

        for name in registry.names() {
            let idx = graph.add_node(name.to_string());
            node_indices.insert(name.to_string(), idx);
        }

        for model in registry.models() {
            let from = node_indices[&model.name];

            for (prop_name, prop) in &model.properties {
                if let Some(&to) = prop.referenced_model().and_then(|m| node_indices.get(m)) {
                    graph.add_edge(from, to, EdgeKind::Property(prop_name.clone()));
                }
            }

            for relation in model.relations.values() {
                if let Some(&to) = node_indices.get(relation.target.name()) {
                    graph.add_edge(from, to, EdgeKind::Relation(relation.name.clone()));
                }
            }
        }

        Self { graph, node_indices }
    }

    pub fn model_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Models directly referenced by `model`
    pub fn refs_out(&self, model: &str) -> Vec<&str> {
        self.neighbors(model, Direction::Outgoing)
    }

    /// Models directly referencing `model`
    pub fn refs_in(&self, model: &str) -> Vec<&str> {
        self.neighbors(model, Direction::Incoming)
    }

    fn neighbors(&self, model: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(model) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Groups of mutually referencing models, including self references.
    ///
    /// Members of each group and the groups themselves are sorted by name.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self
                        .graph
                        .edges_directed(scc[0], Direction::Outgoing)
                        .any(|e| e.target() == scc[0])
            })
            .map(|scc| {
                let mut members: Vec<String> = scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect();
                members.sort();
                members
            })
            .collect();
        groups.sort();
        groups
    }

    /// Export the graph to GraphViz DOT format
    pub fn to_dot(&self) -> String {
        let mut output = String::new();

        output.push_str("digraph ModelGraph {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box, style=\"rounded\", fontname=\"Helvetica\", fontsize=10];\n");
        output.push_str("  edge [fontname=\"Helvetica\", fontsize=8];\n");
        output.push('\n');

        let mut names: Vec<&String> = self.node_indices.keys().collect();
        names.sort();
        for name in names {
            output.push_str(&format!("  \"{}\";\n", name));
        }

        output.push('\n');

        for edge in self.graph.edge_references() {
            if let (Some(source), Some(target)) = (
                self.graph.node_weight(edge.source()),
                self.graph.node_weight(edge.target()),
            ) {
                let style = match edge.weight() {
                    EdgeKind::Property(_) => "solid",
                    EdgeKind::Relation(_) => "dashed",
                };
                output.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\", style={}];\n",
                    source,
                    target,
                    edge.weight().label(),
                    style
                ));
            }
        }

        output.push_str("}\n");
        output
    }
}
