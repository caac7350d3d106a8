//! Core domain types shared across the Playbook workspace.
//!
//! Everything in this crate is pure: payloads come in from the chat
//! backend in whatever shape it produced them, and leave as a canonical
//! [`Subgraph`] with positions and confidence tiers derived
//! deterministically. Rendering and I/O live in the other crates.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Categories
// =============================================================================

/// Semantic category of a term in the knowledge graph.
///
/// The set of recognized categories is closed; anything the backend sends
/// outside of it resolves to [`Category::Unknown`] rather than an error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Content,
    GameObject,
    CurrencySoft,
    CurrencyHard,
    Resource,
    Mechanic,
    Difficulty,
    Metric,
    UxFactor,
    Condition,
    System,
    /// Fallback for categories the style table does not recognize.
    #[default]
    Unknown,
}

impl From<String> for Category {
    fn from(raw: String) -> Self {
        Category::parse(&raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl Category {
    /// Every recognized category, in legend order. Excludes [`Category::Unknown`].
    pub const ALL: [Category; 11] = [
        Category::Content,
        Category::GameObject,
        Category::CurrencySoft,
        Category::CurrencyHard,
        Category::Resource,
        Category::Mechanic,
        Category::Difficulty,
        Category::Metric,
        Category::UxFactor,
        Category::Condition,
        Category::System,
    ];

    /// Total lookup from the wire name. Unrecognized input maps to `Unknown`.
    pub fn parse(raw: &str) -> Category {
        match raw {
            "Content" => Category::Content,
            "GameObject" => Category::GameObject,
            "Currency_Soft" => Category::CurrencySoft,
            "Currency_Hard" => Category::CurrencyHard,
            "Resource" => Category::Resource,
            "Mechanic" => Category::Mechanic,
            "Difficulty" => Category::Difficulty,
            "Metric" => Category::Metric,
            "UX_Factor" => Category::UxFactor,
            "Condition" => Category::Condition,
            "System" => Category::System,
            _ => Category::Unknown,
        }
    }

    /// Display label, identical to the wire name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Content => "Content",
            Category::GameObject => "GameObject",
            Category::CurrencySoft => "Currency_Soft",
            Category::CurrencyHard => "Currency_Hard",
            Category::Resource => "Resource",
            Category::Mechanic => "Mechanic",
            Category::Difficulty => "Difficulty",
            Category::Metric => "Metric",
            Category::UxFactor => "UX_Factor",
            Category::Condition => "Condition",
            Category::System => "System",
            Category::Unknown => "Unknown",
        }
    }

    /// Whether this category appears in the legend.
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Unknown)
    }
}

// =============================================================================
// Raw Payload Shapes
// =============================================================================

/// Node record as the backend sends it.
///
/// `category` and the legacy `group` field are both accepted; resolution
/// order is category, then group, then `Unknown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Edge record in the `{from, to}` naming convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEdge {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Edge record in the `{source, target}` naming convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Subgraph payload as received from the chat backend.
///
/// Older backends populate `links` instead of `edges`; when both are
/// present only `edges` is used, the two are never merged.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SubgraphPayload {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<RawEdge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<RawLink>>,
}

/// Errors produced while ingesting a subgraph payload.
#[derive(Debug, Error)]
pub enum SubgraphError {
    /// The payload was not valid JSON for any accepted shape.
    #[error("failed to parse subgraph payload: {0}")]
    Payload(#[from] serde_json::Error),
}

// =============================================================================
// Canonical Subgraph
// =============================================================================

/// A term (entity) in the canonical subgraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermNode {
    /// Identifier, unique within a subgraph by payload convention.
    pub id: String,
    /// Human readable name.
    pub label: String,
    /// Resolved semantic category.
    pub category: Category,
}

/// A directed relation between two terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Source term identifier.
    pub source: String,
    /// Target term identifier.
    pub target: String,
    /// Relation predicate ("rewards", "consumes", ...).
    pub label: String,
    /// Extraction confidence in `[0, 1]`. [`DEFAULT_CONFIDENCE`] when the
    /// payload omitted it; an explicit value, including `0.0`, is kept.
    pub confidence: f32,
}

impl RelationEdge {
    /// Confidence tier this edge renders in.
    pub fn tier(&self) -> ConfidenceTier {
        ConfidenceTier::of(self.confidence)
    }

    /// Label shown on the rendered edge, e.g. `"rewards (95%)"`.
    pub fn display_label(&self) -> String {
        edge_display_label(&self.label, self.confidence)
    }

    /// Whether either endpoint is the given node.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// The node/edge set attached to one answer, normalized to one shape.
///
/// A subgraph is an atomic unit: the viewer replaces the whole thing when
/// a new answer arrives, it never merges with the previous one.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subgraph {
    pub nodes: Vec<TermNode>,
    pub edges: Vec<RelationEdge>,
}

impl Subgraph {
    /// Normalize a raw payload into the canonical shape.
    ///
    /// An empty or absent node list yields the empty subgraph; that is the
    /// "no data yet" state, not an error. Edge endpoints are not validated
    /// here — dangling references are tolerated downstream.
    pub fn from_payload(payload: SubgraphPayload) -> Subgraph {
        if payload.nodes.is_empty() {
            return Subgraph::default();
        }

        let nodes = payload
            .nodes
            .into_iter()
            .map(|raw| {
                let category = raw
                    .category
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .or(raw.group.as_deref().filter(|g| !g.is_empty()))
                    .map(Category::parse)
                    .unwrap_or(Category::Unknown);
                TermNode {
                    id: raw.id,
                    label: raw.label,
                    category,
                }
            })
            .collect();

        // `edges` is the primary container; `links` is consulted only when
        // `edges` is absent.
        let edges = match (payload.edges, payload.links) {
            (Some(edges), _) => edges
                .into_iter()
                .map(|e| RelationEdge {
                    source: e.from,
                    target: e.to,
                    label: e.label,
                    confidence: e.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                })
                .collect(),
            (None, Some(links)) => links
                .into_iter()
                .map(|l| RelationEdge {
                    source: l.source,
                    target: l.target,
                    label: l.label,
                    confidence: l.confidence.unwrap_or(DEFAULT_CONFIDENCE),
                })
                .collect(),
            (None, None) => Vec::new(),
        };

        Subgraph { nodes, edges }
    }

    /// Parse and normalize a JSON payload in one step.
    pub fn from_json(json: &str) -> Result<Subgraph, SubgraphError> {
        let payload: SubgraphPayload = serde_json::from_str(json)?;
        Ok(Subgraph::from_payload(payload))
    }

    /// Whether there is anything to show.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of terms.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relations, dangling ones included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Convert to a petgraph `StableDiGraph` for structural queries.
    /// Returns the graph and a mapping from node id to `NodeIndex`.
    ///
    /// Edges whose endpoints are missing from the node set are skipped;
    /// duplicate ids keep their first occurrence.
    pub fn to_petgraph(
        &self,
    ) -> (
        StableDiGraph<TermNode, RelationEdge>,
        HashMap<String, NodeIndex>,
    ) {
        let mut graph = StableDiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();

        for node in &self.nodes {
            if id_to_index.contains_key(&node.id) {
                continue;
            }
            let idx = graph.add_node(node.clone());
            id_to_index.insert(node.id.clone(), idx);
        }

        for edge in &self.edges {
            if let (Some(&source), Some(&target)) = (
                id_to_index.get(&edge.source),
                id_to_index.get(&edge.target),
            ) {
                graph.add_edge(source, target, edge.clone());
            }
        }

        (graph, id_to_index)
    }
}

// =============================================================================
// Confidence Tiers
// =============================================================================

/// Confidence assumed for edges whose payload omitted the field.
pub const DEFAULT_CONFIDENCE: f32 = 1.0;

/// Edges strictly above this confidence render in the high tier.
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.9;

/// One of the two presentation buckets an edge's confidence falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    /// Confidence strictly greater than [`HIGH_CONFIDENCE_THRESHOLD`].
    High,
    /// Everything else, the threshold value included.
    Standard,
}

impl ConfidenceTier {
    /// Classify a confidence score. Total over all float input.
    pub fn of(confidence: f32) -> ConfidenceTier {
        if confidence > HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceTier::High
        } else {
            ConfidenceTier::Standard
        }
    }

    /// Legend label for the tier.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High confidence (>0.9)",
            ConfidenceTier::Standard => "Standard (≤0.9)",
        }
    }
}

/// Confidence as an integer percentage, e.g. `0.95` → `95`.
pub fn confidence_percent(confidence: f32) -> i32 {
    (confidence * 100.0).round() as i32
}

/// Rendered edge label: the relation predicate plus the confidence
/// percentage in parentheses.
pub fn edge_display_label(label: &str, confidence: f32) -> String {
    format!("{} ({}%)", label, confidence_percent(confidence))
}

// =============================================================================
// Radial Layout
// =============================================================================

/// A position in layout space. The renderer owns the mapping to screen
/// coordinates (where y grows downward).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f32,
    pub y: f32,
}

/// Where the center node of a subgraph is placed.
pub const LAYOUT_CENTER: LayoutPoint = LayoutPoint { x: 0.0, y: 0.0 };

/// Distance of every non-center node from the center. Fixed regardless of
/// node count; small subgraphs do not shrink the circle.
pub const RING_RADIUS: f32 = 250.0;

/// A term with its layout position resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub node: TermNode,
    pub pos: LayoutPoint,
    pub is_center: bool,
}

/// Strategy for choosing which node anchors the layout.
pub type CenterSelector = fn(&Subgraph) -> Option<usize>;

/// Default center selection: the first node of the payload. The backend
/// puts the term the question was about first, so this is a positional
/// convention, not a graph property.
pub fn select_center_first(subgraph: &Subgraph) -> Option<usize> {
    if subgraph.nodes.is_empty() {
        None
    } else {
        Some(0)
    }
}

/// Alternate center selection: the node with the highest undirected
/// degree. Ties keep the earliest node in payload order.
pub fn select_center_by_degree(subgraph: &Subgraph) -> Option<usize> {
    if subgraph.nodes.is_empty() {
        return None;
    }

    let (graph, id_to_index) = subgraph.to_petgraph();
    let mut best = 0;
    let mut best_degree = 0;
    for (i, node) in subgraph.nodes.iter().enumerate() {
        let degree = id_to_index
            .get(&node.id)
            .map(|&idx| graph.neighbors_undirected(idx).count())
            .unwrap_or(0);
        if degree > best_degree {
            best = i;
            best_degree = degree;
        }
    }
    Some(best)
}

/// Run the selector and the layout in one step.
pub fn layout_subgraph(subgraph: &Subgraph, select_center: CenterSelector) -> Vec<PlacedNode> {
    radial_layout(&subgraph.nodes, select_center(subgraph))
}

/// Deterministic one-pass radial placement.
///
/// The center node sits at [`LAYOUT_CENTER`]; the remaining nodes are
/// spread counter-clockwise over a circle of [`RING_RADIUS`], the k-th
/// non-center node (in input order) at angle `2π·k/(N−1)`. A `None` or
/// out-of-range center falls back to the first node. Pure function of the
/// input sequence: no randomness, no relaxation, no collision avoidance.
pub fn radial_layout(nodes: &[TermNode], center: Option<usize>) -> Vec<PlacedNode> {
    let n = nodes.len();
    if n == 0 {
        return Vec::new();
    }

    let center_idx = center.filter(|&c| c < n).unwrap_or(0);
    if n == 1 {
        return vec![PlacedNode {
            node: nodes[0].clone(),
            pos: LAYOUT_CENTER,
            is_center: true,
        }];
    }

    let ring_len = (n - 1) as f32;
    let mut placed = Vec::with_capacity(n);
    let mut ring_ordinal = 0usize;
    for (i, node) in nodes.iter().enumerate() {
        if i == center_idx {
            placed.push(PlacedNode {
                node: node.clone(),
                pos: LAYOUT_CENTER,
                is_center: true,
            });
        } else {
            let angle = std::f32::consts::TAU * ring_ordinal as f32 / ring_len;
            placed.push(PlacedNode {
                node: node.clone(),
                pos: LayoutPoint {
                    x: LAYOUT_CENTER.x + RING_RADIUS * angle.cos(),
                    y: LAYOUT_CENTER.y + RING_RADIUS * angle.sin(),
                },
                is_center: false,
            });
            ring_ordinal += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, category: Category) -> TermNode {
        TermNode {
            id: id.to_string(),
            label: id.to_string(),
            category,
        }
    }

    fn nodes_json() -> &'static str {
        r#"[
            {"id": "clover", "label": "Clover", "category": "Resource"},
            {"id": "stage", "label": "Event Stage", "category": "Content"},
            {"id": "league", "label": "Poko League", "group": "System"}
        ]"#
    }

    #[test]
    fn edges_and_links_shapes_normalize_identically() {
        let with_edges = format!(
            r#"{{"nodes": {}, "edges": [
                {{"from": "clover", "to": "stage", "label": "consumed_by", "confidence": 0.92}}
            ]}}"#,
            nodes_json()
        );
        let with_links = format!(
            r#"{{"nodes": {}, "links": [
                {{"source": "clover", "target": "stage", "label": "consumed_by", "confidence": 0.92}}
            ]}}"#,
            nodes_json()
        );

        let a = Subgraph::from_json(&with_edges).unwrap();
        let b = Subgraph::from_json(&with_links).unwrap();
        assert_eq!(a.edges, b.edges);
        assert_eq!(a.edges[0].source, "clover");
        assert_eq!(a.edges[0].target, "stage");
    }

    #[test]
    fn edges_container_wins_when_both_present() {
        let json = format!(
            r#"{{"nodes": {}, "edges": [
                {{"from": "clover", "to": "stage", "label": "primary"}}
            ], "links": [
                {{"source": "stage", "target": "league", "label": "ignored"}}
            ]}}"#,
            nodes_json()
        );

        let subgraph = Subgraph::from_json(&json).unwrap();
        assert_eq!(subgraph.edge_count(), 1);
        assert_eq!(subgraph.edges[0].label, "primary");
    }

    #[test]
    fn missing_or_empty_nodes_yield_empty_subgraph() {
        let empty = Subgraph::from_json("{}").unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.edge_count(), 0);

        // Edges without nodes are dropped with them.
        let orphaned = Subgraph::from_json(
            r#"{"nodes": [], "edges": [{"from": "a", "to": "b", "label": "x"}]}"#,
        )
        .unwrap();
        assert!(orphaned.is_empty());
        assert_eq!(orphaned.edge_count(), 0);
    }

    #[test]
    fn category_resolution_prefers_category_then_group() {
        let subgraph = Subgraph::from_json(
            r#"{"nodes": [
                {"id": "a", "label": "A", "category": "Resource", "group": "System"},
                {"id": "b", "label": "B", "group": "Mechanic"},
                {"id": "c", "label": "C", "category": "", "group": "Metric"},
                {"id": "d", "label": "D"},
                {"id": "e", "label": "E", "category": "Foo"}
            ]}"#,
        )
        .unwrap();

        let categories: Vec<Category> = subgraph.nodes.iter().map(|n| n.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Resource,
                Category::Mechanic,
                Category::Metric,
                Category::Unknown,
                Category::Unknown,
            ]
        );
    }

    #[test]
    fn category_wire_names_round_trip() {
        assert_eq!(Category::parse("Currency_Soft"), Category::CurrencySoft);
        assert_eq!(Category::parse("UX_Factor"), Category::UxFactor);
        assert_eq!(Category::CurrencySoft.label(), "Currency_Soft");

        let parsed: Category = serde_json::from_str(r#""Currency_Hard""#).unwrap();
        assert_eq!(parsed, Category::CurrencyHard);
        let unknown: Category = serde_json::from_str(r#""NotACategory""#).unwrap();
        assert_eq!(unknown, Category::Unknown);
    }

    #[test]
    fn absent_confidence_defaults_explicit_zero_kept() {
        let subgraph = Subgraph::from_json(
            r#"{"nodes": [
                {"id": "a", "label": "A", "category": "Resource"},
                {"id": "b", "label": "B", "category": "Content"}
            ], "edges": [
                {"from": "a", "to": "b", "label": "implicit"},
                {"from": "b", "to": "a", "label": "rejected", "confidence": 0.0}
            ]}"#,
        )
        .unwrap();

        assert_eq!(subgraph.edges[0].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(subgraph.edges[1].confidence, 0.0);
    }

    #[test]
    fn tier_boundary_is_strictly_greater_than() {
        assert_eq!(ConfidenceTier::of(0.9), ConfidenceTier::Standard);
        assert_eq!(ConfidenceTier::of(0.9001), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::of(1.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::of(0.0), ConfidenceTier::Standard);
    }

    #[test]
    fn display_label_renders_integer_percent() {
        assert_eq!(edge_display_label("rewards", 0.95), "rewards (95%)");
        assert_eq!(edge_display_label("rewards", 1.0), "rewards (100%)");
        assert_eq!(edge_display_label("rewards", 0.849), "rewards (85%)");
    }

    #[test]
    fn layout_handles_zero_and_one_nodes() {
        assert!(radial_layout(&[], None).is_empty());

        let placed = radial_layout(&[node("only", Category::Resource)], Some(0));
        assert_eq!(placed.len(), 1);
        assert!(placed[0].is_center);
        assert_eq!(placed[0].pos, LAYOUT_CENTER);
    }

    #[test]
    fn layout_places_first_node_at_center_with_even_spacing() {
        let nodes: Vec<TermNode> = (0..5)
            .map(|i| node(&format!("n{}", i), Category::Content))
            .collect();
        let placed = radial_layout(&nodes, Some(0));

        assert!(placed[0].is_center);
        assert_eq!(placed[0].pos, LAYOUT_CENTER);

        let step = std::f32::consts::TAU / 4.0;
        for (k, p) in placed[1..].iter().enumerate() {
            assert!(!p.is_center);
            let angle = step * k as f32;
            assert!((p.pos.x - RING_RADIUS * angle.cos()).abs() < 1e-3);
            assert!((p.pos.y - RING_RADIUS * angle.sin()).abs() < 1e-3);
            let dist = (p.pos.x * p.pos.x + p.pos.y * p.pos.y).sqrt();
            assert!((dist - RING_RADIUS).abs() < 1e-3);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes: Vec<TermNode> = (0..7)
            .map(|i| node(&format!("n{}", i), Category::Mechanic))
            .collect();
        assert_eq!(radial_layout(&nodes, Some(0)), radial_layout(&nodes, Some(0)));
    }

    #[test]
    fn layout_respects_non_first_center() {
        let nodes: Vec<TermNode> = (0..3)
            .map(|i| node(&format!("n{}", i), Category::System))
            .collect();
        let placed = radial_layout(&nodes, Some(2));

        assert!(placed[2].is_center);
        assert_eq!(placed[2].pos, LAYOUT_CENTER);
        // Ring ordinals follow input order across the remaining nodes.
        assert!((placed[0].pos.x - RING_RADIUS).abs() < 1e-3);
        assert!(!placed[1].is_center);
    }

    fn star_subgraph() -> Subgraph {
        let mut edges = Vec::new();
        for target in ["a", "c", "d"] {
            edges.push(RelationEdge {
                source: "b".to_string(),
                target: target.to_string(),
                label: "linked".to_string(),
                confidence: 1.0,
            });
        }
        Subgraph {
            nodes: ["a", "b", "c", "d"]
                .iter()
                .map(|id| node(id, Category::Content))
                .collect(),
            edges,
        }
    }

    #[test]
    fn center_selectors_differ_on_hub_not_first() {
        let subgraph = star_subgraph();
        assert_eq!(select_center_first(&subgraph), Some(0));
        assert_eq!(select_center_by_degree(&subgraph), Some(1));
        assert_eq!(select_center_first(&Subgraph::default()), None);
        assert_eq!(select_center_by_degree(&Subgraph::default()), None);
    }

    #[test]
    fn to_petgraph_skips_dangling_edges() {
        let mut subgraph = star_subgraph();
        subgraph.edges.push(RelationEdge {
            source: "b".to_string(),
            target: "ghost".to_string(),
            label: "dangling".to_string(),
            confidence: 0.5,
        });

        let (graph, id_to_index) = subgraph.to_petgraph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(!id_to_index.contains_key("ghost"));
    }
}
