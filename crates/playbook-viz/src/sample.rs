//! Sample subgraph for demonstration without a backend.

use playbook_core::{Category, RelationEdge, Subgraph, TermNode};

fn term(id: &str, label: &str, category: Category) -> TermNode {
    TermNode {
        id: id.to_string(),
        label: label.to_string(),
        category,
    }
}

fn relation(source: &str, target: &str, label: &str, confidence: f32) -> RelationEdge {
    RelationEdge {
        source: source.to_string(),
        target: target.to_string(),
        label: label.to_string(),
        confidence,
    }
}

/// A small Clover-economy subgraph. The first node is the center, per
/// the payload convention.
pub fn sample_subgraph() -> Subgraph {
    Subgraph {
        nodes: vec![
            term("clover", "Clover", Category::Resource),
            term("event_stage", "Event Stage", Category::Content),
            term("adventure_81", "Adventure Chapter 81", Category::Content),
            term("poko_league", "Poko Forest League", Category::System),
            term("cherry", "Cherry", Category::CurrencySoft),
            term("diamond", "Diamond", Category::CurrencyHard),
            term("gacha", "Gacha Draw", Category::Mechanic),
            term("clear_rate", "Stage Clear Rate", Category::Metric),
        ],
        edges: vec![
            relation("clover", "event_stage", "consumed_by", 0.95),
            relation("adventure_81", "clover", "rewards", 0.88),
            relation("poko_league", "cherry", "rewards", 0.92),
            relation("cherry", "gacha", "spent_in", 1.0),
            relation("gacha", "diamond", "also_accepts", 0.76),
            relation("event_stage", "clear_rate", "measured_by", 0.85),
            relation("clover", "poko_league", "entry_fee_of", 0.91),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_has_center_first_and_no_dangling_edges() {
        let subgraph = sample_subgraph();
        assert_eq!(subgraph.nodes[0].id, "clover");

        for edge in &subgraph.edges {
            assert!(subgraph.nodes.iter().any(|n| n.id == edge.source));
            assert!(subgraph.nodes.iter().any(|n| n.id == edge.target));
        }
    }
}
