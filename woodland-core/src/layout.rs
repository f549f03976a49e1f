//! Map layout projection.
//!
//! A campaign's map is stored as an abstract layout: one position per
//! clearing inside `[0, max_x] × [0, max_y]`. Projection scales the layout to
//! a canvas, optionally mirroring either axis so campaigns sharing a layout
//! still look different, and turns the directed clearing connections into an
//! undirected edge list.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Radius of every projected node, in pixels.
pub const NODE_RADIUS: f64 = 50.0;

/// Error type for layout projection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Location {from} connects to {to}, which does not exist")]
    DanglingReference { from: usize, to: usize },

    #[error("Unknown map layout: {0}")]
    UnknownLayout(String),
}

/// A position in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Upper bounds of a layout's coordinate space. The lower bounds are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(max_x: f64, max_y: f64) -> Self {
        Self { max_x, max_y }
    }
}

/// Pixel size of the render target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if ok(self.width) && ok(self.height) {
            Ok(())
        } else {
            Err(LayoutError::InvalidLayout(format!(
                "canvas must be positive, got {}x{}",
                self.width, self.height
            )))
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// A named layout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayout {
    #[serde(default)]
    pub name: String,
    pub node_positions: Vec<Position>,
    pub max_x: f64,
    pub max_y: f64,
}

impl MapLayout {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.max_x, self.max_y)
    }
}

/// Which axes to mirror during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mirror {
    pub x: bool,
    pub y: bool,
}

impl Mirror {
    pub const NONE: Mirror = Mirror { x: false, y: false };
    pub const BOTH: Mirror = Mirror { x: true, y: true };

    /// Flip a fair coin for each axis.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.gen_bool(0.5),
            y: rng.gen_bool(0.5),
        }
    }
}

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedNode {
    /// Index of the source position.
    pub id: usize,
    pub title: String,
    pub r: f64,
    pub x: f64,
    pub y: f64,
}

/// An undirected edge between two projected nodes.
///
/// `source` always has the lower id.
#[derive(Debug, Clone)]
pub struct ProjectedEdge {
    pub source: Arc<ProjectedNode>,
    pub target: Arc<ProjectedNode>,
}

impl ProjectedEdge {
    pub fn ids(&self) -> (usize, usize) {
        (self.source.id, self.target.id)
    }
}

/// Nodes and edges ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    pub nodes: Vec<Arc<ProjectedNode>>,
    pub edges: Vec<ProjectedEdge>,
}

/// The locations of a campaign, as far as projection cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clearing {
    pub name: String,
    /// Indices of the clearings this one connects to.
    #[serde(default)]
    pub connections: Vec<usize>,
}

/// A campaign's map: which layout it uses and its clearings, one per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMap {
    pub map_gen_layout: String,
    pub clearings: Vec<Clearing>,
}

/// Project a layout with randomly chosen mirroring.
pub fn project<L, C>(
    positions: &[Position],
    bounds: Bounds,
    labels: &[L],
    connections: &[C],
    canvas: Canvas,
) -> Result<LayoutGraph, LayoutError>
where
    L: AsRef<str>,
    C: AsRef<[usize]>,
{
    project_with_rng(
        positions,
        bounds,
        labels,
        connections,
        canvas,
        &mut rand::thread_rng(),
    )
}

/// Project with a specific RNG (useful for testing).
pub fn project_with_rng<L, C, R>(
    positions: &[Position],
    bounds: Bounds,
    labels: &[L],
    connections: &[C],
    canvas: Canvas,
    rng: &mut R,
) -> Result<LayoutGraph, LayoutError>
where
    L: AsRef<str>,
    C: AsRef<[usize]>,
    R: Rng + ?Sized,
{
    let mirror = Mirror::random(rng);
    project_mirrored(positions, bounds, labels, connections, canvas, mirror)
}

/// Project with explicit mirroring. Fully deterministic.
pub fn project_mirrored<L, C>(
    positions: &[Position],
    bounds: Bounds,
    labels: &[L],
    connections: &[C],
    canvas: Canvas,
    mirror: Mirror,
) -> Result<LayoutGraph, LayoutError>
where
    L: AsRef<str>,
    C: AsRef<[usize]>,
{
    validate(positions, bounds, labels.len(), connections.len())?;
    canvas.validate()?;

    let scale_x = canvas.width / bounds.max_x;
    let scale_y = canvas.height / bounds.max_y;

    let nodes: Vec<Arc<ProjectedNode>> = positions
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(id, (pos, label))| {
            let x = if mirror.x {
                bounds.max_x - pos.x
            } else {
                pos.x
            };
            let y = if mirror.y {
                bounds.max_y - pos.y
            } else {
                pos.y
            };
            Arc::new(ProjectedNode {
                id,
                title: label.as_ref().to_string(),
                r: NODE_RADIUS,
                x: x * scale_x,
                y: y * scale_y,
            })
        })
        .collect();

    let edges = undirected_edges(connections)?
        .into_iter()
        .map(|(a, b)| ProjectedEdge {
            source: Arc::clone(&nodes[a]),
            target: Arc::clone(&nodes[b]),
        })
        .collect::<Vec<_>>();

    debug!(
        flip_x = mirror.x,
        flip_y = mirror.y,
        nodes = nodes.len(),
        edges = edges.len(),
        "projected layout"
    );

    Ok(LayoutGraph { nodes, edges })
}

/// Collapse directed adjacency lists into unordered pairs.
///
/// Each pair appears once, lower index first, in the order it was first seen.
/// A location listing itself produces a single `(i, i)` pair.
pub fn undirected_edges<C: AsRef<[usize]>>(
    connections: &[C],
) -> Result<Vec<(usize, usize)>, LayoutError> {
    let count = connections.len();
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for (from, neighbours) in connections.iter().enumerate() {
        for &to in neighbours.as_ref() {
            if to >= count {
                return Err(LayoutError::DanglingReference { from, to });
            }
            let pair = (from.min(to), from.max(to));
            if seen.insert(pair) {
                edges.push(pair);
            }
        }
    }

    Ok(edges)
}

/// Project a campaign using the layout it names.
pub fn project_campaign(
    campaign: &CampaignMap,
    layouts: &HashMap<String, MapLayout>,
    canvas: Canvas,
) -> Result<LayoutGraph, LayoutError> {
    project_campaign_with_rng(campaign, layouts, canvas, &mut rand::thread_rng())
}

/// Project a campaign with a specific RNG.
pub fn project_campaign_with_rng<R: Rng + ?Sized>(
    campaign: &CampaignMap,
    layouts: &HashMap<String, MapLayout>,
    canvas: Canvas,
    rng: &mut R,
) -> Result<LayoutGraph, LayoutError> {
    let layout = layouts
        .get(&campaign.map_gen_layout)
        .ok_or_else(|| LayoutError::UnknownLayout(campaign.map_gen_layout.clone()))?;

    let labels: Vec<&str> = campaign
        .clearings
        .iter()
        .map(|clearing| clearing.name.as_str())
        .collect();
    let connections: Vec<&[usize]> = campaign
        .clearings
        .iter()
        .map(|clearing| clearing.connections.as_slice())
        .collect();

    project_with_rng(
        &layout.node_positions,
        layout.bounds(),
        &labels,
        &connections,
        canvas,
        rng,
    )
}

fn validate(
    positions: &[Position],
    bounds: Bounds,
    label_count: usize,
    connection_count: usize,
) -> Result<(), LayoutError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(bounds.max_x) || !positive(bounds.max_y) {
        return Err(LayoutError::InvalidLayout(format!(
            "bounds must be positive, got {}x{}",
            bounds.max_x, bounds.max_y
        )));
    }

    if label_count != positions.len() || connection_count != positions.len() {
        return Err(LayoutError::InvalidLayout(format!(
            "{} positions, {} labels, {} connection lists",
            positions.len(),
            label_count,
            connection_count
        )));
    }

    let inside = |v: f64, max: f64| (0.0..=max).contains(&v);
    if let Some((i, pos)) = positions
        .iter()
        .enumerate()
        .find(|(_, p)| !inside(p.x, bounds.max_x) || !inside(p.y, bounds.max_y))
    {
        return Err(LayoutError::InvalidLayout(format!(
            "position {i} ({}, {}) is outside the bounds",
            pos.x, pos.y
        )));
    }

    Ok(())
}
