//! Node placement for graph and tree frames.
//!
//! | Layout | Names accepted | Deterministic |
//! |--------|----------------|---------------|
//! | Force-directed | `spring`, `force`, `force_directed`, `kamada_kawai` | Only when seeded |
//! | Circular | `circular` | Yes |
//! | Hierarchical | `dot`, `tree`, `hierarchical`, `radial` | Yes |
//! | Shell | `shell` | Yes |
//!
//! Unknown names fall back to force-directed.

use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::canonical_graph::CanonicalGraph;
use crate::config::LayoutConfig;

/// Layout algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Spring embedding (Fruchterman-Reingold).
    #[default]
    ForceDirected,
    /// Nodes evenly spaced on a circle.
    Circular,
    /// Breadth-first levels, top to bottom.
    Hierarchical,
    /// Breadth-first levels on concentric circles.
    Shell,
}

impl LayoutKind {
    /// Parse a layout name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "spring" | "force" | "force_directed" | "kamada_kawai" => Some(Self::ForceDirected),
            "circular" => Some(Self::Circular),
            "dot" | "tree" | "hierarchical" | "radial" => Some(Self::Hierarchical),
            "shell" => Some(Self::Shell),
            _ => None,
        }
    }

    /// Parse a layout name, falling back to force-directed.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(layout = name, "unknown layout, falling back to force-directed");
            Self::ForceDirected
        })
    }

    /// Whether two computations on the same graph always agree.
    pub fn is_deterministic(&self, config: &LayoutConfig) -> bool {
        !matches!(self, Self::ForceDirected) || config.seed.is_some()
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceDirected => write!(f, "force_directed"),
            Self::Circular => write!(f, "circular"),
            Self::Hierarchical => write!(f, "hierarchical"),
            Self::Shell => write!(f, "shell"),
        }
    }
}

/// A 2D position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node positions indexed by canonical node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Algorithm that produced the positions.
    pub kind: LayoutKind,
    /// `positions[id]` is the position of node `id`.
    pub positions: Vec<Point>,
}

impl Layout {
    /// Compute a layout for a canonical graph.
    pub fn compute(kind: LayoutKind, graph: &CanonicalGraph, config: &LayoutConfig) -> Self {
        let positions = match graph.node_count() {
            0 => Vec::new(),
            1 => vec![Point::default()],
            _ => match kind {
                LayoutKind::ForceDirected => force_directed(graph, config),
                LayoutKind::Circular => circular(graph.node_count(), config.scale),
                LayoutKind::Hierarchical => hierarchical(graph, config.scale),
                LayoutKind::Shell => shell(graph, config.scale),
            },
        };
        tracing::trace!(%kind, nodes = positions.len(), "computed layout");
        Self { kind, positions }
    }

    /// Position of a node.
    pub fn position(&self, id: usize) -> Option<Point> {
        self.positions.get(id).copied()
    }
}

fn circular(n: usize, scale: f64) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            Point::new(angle.cos() * scale, angle.sin() * scale)
        })
        .collect()
}

/// Breadth-first level of each node over undirected adjacency. Every
/// component starts at level 0 from its lowest id.
fn levels(graph: &CanonicalGraph) -> Vec<usize> {
    let adjacency = graph.adjacency();
    let mut level = vec![usize::MAX; graph.node_count()];
    let mut queue = VecDeque::new();

    for start in 0..graph.node_count() {
        if level[start] != usize::MAX {
            continue;
        }
        level[start] = 0;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            for &v in &adjacency[u] {
                if level[v] == usize::MAX {
                    level[v] = level[u] + 1;
                    queue.push_back(v);
                }
            }
        }
    }
    level
}

/// Group node ids by level, ids ascending within a level.
fn by_level(graph: &CanonicalGraph) -> Vec<Vec<usize>> {
    let levels = levels(graph);
    let depth = levels.iter().copied().max().unwrap_or(0);
    let mut rows = vec![Vec::new(); depth + 1];
    for (id, &level) in levels.iter().enumerate() {
        rows[level].push(id);
    }
    rows
}

fn hierarchical(graph: &CanonicalGraph, scale: f64) -> Vec<Point> {
    let rows = by_level(graph);
    let depth = rows.len().saturating_sub(1).max(1) as f64;
    let mut positions = vec![Point::default(); graph.node_count()];

    for (level, row) in rows.iter().enumerate() {
        let y = scale * (1.0 - 2.0 * level as f64 / depth);
        for (i, &id) in row.iter().enumerate() {
            let x = scale * (2.0 * (i + 1) as f64 / (row.len() + 1) as f64 - 1.0);
            positions[id] = Point::new(x, y);
        }
    }
    positions
}

fn shell(graph: &CanonicalGraph, scale: f64) -> Vec<Point> {
    let rows = by_level(graph);
    let depth = rows.len().saturating_sub(1).max(1) as f64;
    let mut positions = vec![Point::default(); graph.node_count()];

    for (level, row) in rows.iter().enumerate() {
        // A lone first shell sits at the center.
        let radius = if level == 0 && row.len() == 1 {
            0.0
        } else {
            scale * (level.max(1)) as f64 / depth
        };
        for (i, &id) in row.iter().enumerate() {
            let angle = TAU * i as f64 / row.len() as f64;
            positions[id] = Point::new(angle.cos() * radius, angle.sin() * radius);
        }
    }
    positions
}

fn force_directed(graph: &CanonicalGraph, config: &LayoutConfig) -> Vec<Point> {
    let n = graph.node_count();
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pos: Vec<Point> = (0..n)
        .map(|_| Point::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();

    let k = (4.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut disp = vec![Point::default(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / dist;
                disp[i].x += dx / dist * force;
                disp[i].y += dy / dist * force;
                disp[j].x -= dx / dist * force;
                disp[j].y -= dy / dist * force;
            }
        }

        for &(u, v) in &graph.edges {
            if u >= n || v >= n || u == v {
                continue;
            }
            let dx = pos[u].x - pos[v].x;
            let dy = pos[u].y - pos[v].y;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / k;
            disp[u].x -= dx / dist * force;
            disp[u].y -= dy / dist * force;
            disp[v].x += dx / dist * force;
            disp[v].y += dy / dist * force;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.x * d.x + d.y * d.y).sqrt().max(0.01);
            let step = len.min(temperature);
            p.x += d.x / len * step;
            p.y += d.y / len * step;
        }
        temperature -= cooling;
    }

    rescale(&mut pos, config.scale);
    pos
}

/// Center positions on the origin and fit them into `[-scale, scale]`.
fn rescale(positions: &mut [Point], scale: f64) {
    if positions.is_empty() {
        return;
    }
    let n = positions.len() as f64;
    let cx = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = positions.iter().map(|p| p.y).sum::<f64>() / n;
    let extent = positions
        .iter()
        .map(|p| (p.x - cx).abs().max((p.y - cy).abs()))
        .fold(0.0_f64, f64::max);
    let factor = if extent > 0.0 { scale / extent } else { 0.0 };
    for p in positions.iter_mut() {
        p.x = (p.x - cx) * factor;
        p.y = (p.y - cy) * factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinaryNode;

    fn sample_tree() -> CanonicalGraph {
        let root = BinaryNode::new(1)
            .with_left(BinaryNode::new(2).with_right(BinaryNode::new(4)))
            .with_right(BinaryNode::new(3));
        CanonicalGraph::from_tree(&root)
    }

    #[test]
    fn test_layout_names() {
        assert_eq!(LayoutKind::from_name("dot"), Some(LayoutKind::Hierarchical));
        assert_eq!(LayoutKind::from_name("Circular"), Some(LayoutKind::Circular));
        assert_eq!(LayoutKind::from_name("kamada_kawai"), Some(LayoutKind::ForceDirected));
        assert_eq!(LayoutKind::from_name("sugiyama"), None);
        assert_eq!(LayoutKind::resolve("sugiyama"), LayoutKind::ForceDirected);
    }

    #[test]
    fn test_every_node_gets_a_position() {
        let g = sample_tree();
        for kind in [
            LayoutKind::ForceDirected,
            LayoutKind::Circular,
            LayoutKind::Hierarchical,
            LayoutKind::Shell,
        ] {
            let layout = Layout::compute(kind, &g, &LayoutConfig::default());
            assert_eq!(layout.positions.len(), 4, "{kind}");
            assert!(layout
                .positions
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite()));
        }
    }

    #[test]
    fn test_hierarchical_levels_descend() {
        let layout = Layout::compute(LayoutKind::Hierarchical, &sample_tree(), &LayoutConfig::default());
        let y = |id: usize| layout.position(id).unwrap().y;

        assert!(y(0) > y(1));
        assert_eq!(y(1), y(2));
        assert!(y(1) > y(3));
    }

    #[test]
    fn test_seeded_force_directed_is_reproducible() {
        let config = LayoutConfig::default().with_seed(42);
        let a = Layout::compute(LayoutKind::ForceDirected, &sample_tree(), &config);
        let b = Layout::compute(LayoutKind::ForceDirected, &sample_tree(), &config);

        assert_eq!(a, b);
        assert!(LayoutKind::ForceDirected.is_deterministic(&config));
        assert!(!LayoutKind::ForceDirected.is_deterministic(&LayoutConfig::default()));
    }

    #[test]
    fn test_trivial_graphs() {
        let empty = Layout::compute(LayoutKind::Circular, &CanonicalGraph::empty(), &LayoutConfig::default());
        assert!(empty.positions.is_empty());

        let single = Layout::compute(
            LayoutKind::ForceDirected,
            &CanonicalGraph::from_tree(&BinaryNode::new(1)),
            &LayoutConfig::default(),
        );
        assert_eq!(single.positions, vec![Point::default()]);
    }

    #[test]
    fn test_shell_root_at_center() {
        let layout = Layout::compute(LayoutKind::Shell, &sample_tree(), &LayoutConfig::default());
        assert_eq!(layout.position(0), Some(Point::default()));
    }
}
