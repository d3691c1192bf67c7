//! Rule graph projection and visualization using Plotters

use std::collections::HashMap;

use plotters::prelude::*;

use crate::data::TransactionMatrix;
use crate::mine::ItemId;
use crate::rules::Rule;

const NODE_RADIUS: i32 = 34;
const NODE_COLOR: RGBColor = RGBColor(144, 238, 144);
const EDGE_COLOR: RGBColor = RGBColor(128, 128, 128);

/// A directed edge in the rule graph: antecedent label -> consequent label,
/// weighted by the rule's lift. This edge list is the entire contract with
/// the rendering side.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEdge {
    pub antecedent: String,
    pub consequent: String,
    pub weight: f64,
}

/// Project the first `top_n` ranked rules into a directed edge list.
///
/// If fewer rules exist, all of them are used. Labels join item names with
/// `", "` in canonical itemset order, so identical input always produces
/// identical edges.
pub fn project_rules(
    ranked: &[Rule],
    top_n: usize,
    matrix: &TransactionMatrix,
) -> Vec<RuleEdge> {
    ranked
        .iter()
        .take(top_n)
        .map(|rule| RuleEdge {
            antecedent: itemset_label(&rule.antecedent, matrix),
            consequent: itemset_label(&rule.consequent, matrix),
            weight: rule.lift,
        })
        .collect()
}

/// Human-readable label for a canonical itemset
fn itemset_label(items: &[ItemId], matrix: &TransactionMatrix) -> String {
    items
        .iter()
        .map(|&item| matrix.label(item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the rule graph as a PNG image.
///
/// Nodes are laid out on a circle; every supplied edge is drawn as a directed
/// arrow labeled with its weight. Node labels come verbatim from the edge list.
///
/// # Arguments
/// * `edges` - Directed edge list from [`project_rules`]; must be non-empty
/// * `output_path` - Path to save the PNG image
pub fn render_rule_graph(edges: &[RuleEdge], output_path: &str) -> crate::Result<()> {
    if edges.is_empty() {
        anyhow::bail!("cannot render an empty rule graph");
    }

    // Unique node labels in first-appearance order
    let mut node_index: HashMap<&str, usize> = HashMap::new();
    let mut nodes: Vec<&str> = Vec::new();
    for edge in edges {
        for label in [edge.antecedent.as_str(), edge.consequent.as_str()] {
            node_index.entry(label).or_insert_with(|| {
                nodes.push(label);
                nodes.len() - 1
            });
        }
    }

    let (width, height) = (1000u32, 800u32);
    let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    root.draw(&Text::new(
        "Top Association Rules Network",
        (20, 20),
        ("sans-serif", 28),
    ))?;

    let positions = circle_layout(nodes.len(), width, height);

    // Edges first so nodes overdraw the line ends
    for edge in edges {
        let from = positions[node_index[edge.antecedent.as_str()]];
        let to = positions[node_index[edge.consequent.as_str()]];
        draw_arrow(&root, from, to)?;

        let midpoint = ((from.0 + to.0) / 2, (from.1 + to.1) / 2 - 10);
        root.draw(&Text::new(
            format!("{:.2}", edge.weight),
            midpoint,
            ("sans-serif", 16).into_font().color(&BLACK),
        ))?;
    }

    for (label, &(x, y)) in nodes.iter().zip(positions.iter()) {
        root.draw(&Circle::new((x, y), NODE_RADIUS, NODE_COLOR.filled()))?;
        root.draw(&Circle::new((x, y), NODE_RADIUS, BLACK.stroke_width(1)))?;

        // Rough centering: ~4px per character at this font size
        let offset = (label.len() as i32 * 4).min(NODE_RADIUS + 20);
        root.draw(&Text::new(
            label.to_string(),
            (x - offset, y + NODE_RADIUS + 6),
            ("sans-serif", 15).into_font().color(&BLACK),
        ))?;
    }

    root.present()?;
    println!("Rule graph saved to: {}", output_path);

    Ok(())
}

/// Evenly space `n` nodes on a circle inside the drawing area
fn circle_layout(n: usize, width: u32, height: u32) -> Vec<(i32, i32)> {
    let center = (width as f64 / 2.0, height as f64 / 2.0 + 20.0);
    let radius = (width.min(height) as f64 / 2.0) - 120.0;

    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n.max(1) as f64;
            (
                (center.0 + radius * angle.cos()) as i32,
                (center.1 + radius * angle.sin()) as i32,
            )
        })
        .collect()
}

/// Draw a directed edge as a line with an arrowhead just outside the target node
fn draw_arrow(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    from: (i32, i32),
    to: (i32, i32),
) -> crate::Result<()> {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let length = (dx * dx + dy * dy).sqrt().max(1.0);
    let (ux, uy) = (dx / length, dy / length);

    // Trim both ends to the node boundary
    let start = (
        from.0 + (ux * NODE_RADIUS as f64) as i32,
        from.1 + (uy * NODE_RADIUS as f64) as i32,
    );
    let tip = (
        to.0 - (ux * NODE_RADIUS as f64) as i32,
        to.1 - (uy * NODE_RADIUS as f64) as i32,
    );

    root.draw(&PathElement::new(
        vec![start, tip],
        EDGE_COLOR.stroke_width(2),
    ))?;

    let head_len = 12.0;
    let head_width = 6.0;
    let base = (tip.0 as f64 - ux * head_len, tip.1 as f64 - uy * head_len);
    let left = (
        (base.0 - uy * head_width) as i32,
        (base.1 + ux * head_width) as i32,
    );
    let right = (
        (base.0 + uy * head_width) as i32,
        (base.1 - ux * head_width) as i32,
    );

    root.draw(&Polygon::new(vec![tip, left, right], EDGE_COLOR.filled()))?;

    Ok(())
}

/// Print a ranked-rule summary table to the console
pub fn print_rule_summary(ranked: &[Rule], matrix: &TransactionMatrix, limit: usize) {
    println!("\n=== Association Rules (top {}) ===", limit.min(ranked.len()));
    println!("  antecedent => consequent | support | confidence | lift");
    println!("  ---------------------------------------------------------");

    for rule in ranked.iter().take(limit) {
        println!(
            "  {} => {} | {:.4} | {:.4} | {:.4}",
            itemset_label(&rule.antecedent, matrix),
            itemset_label(&rule.consequent, matrix),
            rule.support,
            rule.confidence,
            rule.lift,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransactionMatrix;
    use ndarray::Array2;
    use std::path::Path;
    use tempfile::tempdir;

    fn test_matrix() -> TransactionMatrix {
        let presence = Array2::from_elem((2, 3), true);
        TransactionMatrix::new(
            presence,
            vec!["bread".to_string(), "milk".to_string(), "eggs".to_string()],
        )
        .unwrap()
    }

    fn test_rule(antecedent: Vec<ItemId>, consequent: Vec<ItemId>, lift: f64) -> Rule {
        Rule {
            antecedent,
            consequent,
            support: 0.4,
            confidence: 0.8,
            lift,
            conviction: None,
        }
    }

    #[test]
    fn test_project_rules_labels_and_weights() {
        let matrix = test_matrix();
        let ranked = vec![
            test_rule(vec![0, 1], vec![2], 1.5),
            test_rule(vec![2], vec![0], 1.2),
        ];

        let edges = project_rules(&ranked, 5, &matrix);

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].antecedent, "bread, milk");
        assert_eq!(edges[0].consequent, "eggs");
        assert_eq!(edges[0].weight, 1.5);
        assert_eq!(edges[1].antecedent, "eggs");
    }

    #[test]
    fn test_project_rules_truncates_to_top_n() {
        let matrix = test_matrix();
        let ranked = vec![
            test_rule(vec![0], vec![1], 1.5),
            test_rule(vec![1], vec![2], 1.4),
            test_rule(vec![2], vec![0], 1.3),
        ];

        assert_eq!(project_rules(&ranked, 2, &matrix).len(), 2);
        // Fewer rules than requested: use all, no error
        assert_eq!(project_rules(&ranked, 5, &matrix).len(), 3);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let matrix = test_matrix();
        let ranked = vec![test_rule(vec![0, 2], vec![1], 1.1)];

        let first = project_rules(&ranked, 5, &matrix);
        let second = project_rules(&ranked, 5, &matrix);
        assert_eq!(first, second);
        assert_eq!(first[0].antecedent, "bread, eggs");
    }

    #[test]
    fn test_render_rule_graph() {
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("rules.png");
        let output_str = output_path.to_str().unwrap();

        let edges = vec![
            RuleEdge {
                antecedent: "bread".to_string(),
                consequent: "milk".to_string(),
                weight: 1.25,
            },
            RuleEdge {
                antecedent: "milk".to_string(),
                consequent: "eggs".to_string(),
                weight: 1.10,
            },
        ];

        let result = render_rule_graph(&edges, output_str);
        assert!(result.is_ok());
        assert!(Path::new(output_str).exists());
    }

    #[test]
    fn test_render_empty_edge_list_is_an_error() {
        let result = render_rule_graph(&[], "unused.png");
        assert!(result.is_err());
    }

    #[test]
    fn test_circle_layout_within_bounds() {
        let positions = circle_layout(7, 1000, 800);
        assert_eq!(positions.len(), 7);
        for (x, y) in positions {
            assert!((0..1000).contains(&x));
            assert!((0..800).contains(&y));
        }
    }
}
