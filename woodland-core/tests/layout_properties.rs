//! Properties of map layout projection over generated layouts.
//!
//! Layouts are built from a seeded RNG so every run checks the same inputs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use woodland_core::layout::{
    project_mirrored, project_with_rng, undirected_edges, Bounds, Canvas, Mirror, Position,
};

struct RandomLayout {
    positions: Vec<Position>,
    labels: Vec<String>,
    connections: Vec<Vec<usize>>,
    bounds: Bounds,
}

fn random_layout(rng: &mut StdRng) -> RandomLayout {
    let count: usize = rng.gen_range(1..=12);
    let bounds = Bounds::new(rng.gen_range(1.0..50.0), rng.gen_range(1.0..50.0));

    let positions: Vec<Position> = (0..count)
        .map(|_| {
            Position::new(
                rng.gen_range(0.0..=bounds.max_x),
                rng.gen_range(0.0..=bounds.max_y),
            )
        })
        .collect();
    let labels: Vec<String> = (0..count).map(|i| format!("Clearing {i}")).collect();
    let connections: Vec<Vec<usize>> = (0..count)
        .map(|_| {
            let degree: usize = rng.gen_range(0..4);
            (0..degree)
                .map(|_| rng.gen_range(0..count))
                .collect::<Vec<usize>>()
        })
        .collect();

    RandomLayout {
        positions,
        labels,
        connections,
        bounds,
    }
}

fn distinct_pairs(connections: &[Vec<usize>]) -> HashSet<(usize, usize)> {
    connections
        .iter()
        .enumerate()
        .flat_map(|(i, list)| list.iter().map(move |&j| (i.min(j), i.max(j))))
        .collect()
}

#[test]
fn test_one_node_per_position() {
    let mut rng = StdRng::seed_from_u64(100);
    for _ in 0..100 {
        let layout = random_layout(&mut rng);
        let canvas = Canvas::new(800.0, 600.0);
        let graph = project_with_rng(
            &layout.positions,
            layout.bounds,
            &layout.labels,
            &layout.connections,
            canvas,
            &mut rng,
        )
        .expect("valid layout should project");

        assert_eq!(graph.nodes.len(), layout.positions.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.id, i);
            assert_eq!(node.title, layout.labels[i]);
        }
    }
}

#[test]
fn test_edges_match_distinct_pairs() {
    let mut rng = StdRng::seed_from_u64(200);
    for _ in 0..100 {
        let layout = random_layout(&mut rng);
        let expected = distinct_pairs(&layout.connections);

        let edges = undirected_edges(&layout.connections).unwrap();
        assert_eq!(edges.len(), expected.len());
        let produced: HashSet<_> = edges.into_iter().collect();
        assert_eq!(produced, expected);

        let graph = project_mirrored(
            &layout.positions,
            layout.bounds,
            &layout.labels,
            &layout.connections,
            Canvas::new(100.0, 100.0),
            Mirror::NONE,
        )
        .unwrap();
        assert_eq!(graph.edges.len(), expected.len());
    }
}

#[test]
fn test_projection_stays_on_canvas() {
    let mut rng = StdRng::seed_from_u64(300);
    for _ in 0..100 {
        let layout = random_layout(&mut rng);
        let canvas = Canvas::new(rng.gen_range(10.0..2000.0), rng.gen_range(10.0..2000.0));
        let graph = project_with_rng(
            &layout.positions,
            layout.bounds,
            &layout.labels,
            &layout.connections,
            canvas,
            &mut rng,
        )
        .unwrap();

        // Allow for rounding in the scale factor
        let eps = 1e-9 * canvas.width.max(canvas.height);
        for node in &graph.nodes {
            assert!(node.x >= -eps && node.x <= canvas.width + eps);
            assert!(node.y >= -eps && node.y <= canvas.height + eps);
        }
    }
}

#[test]
fn test_mirroring_reflects_coordinates() {
    let mut rng = StdRng::seed_from_u64(400);
    for _ in 0..100 {
        let layout = random_layout(&mut rng);
        let canvas = Canvas::new(640.0, 480.0);
        let project = |mirror: Mirror| {
            project_mirrored(
                &layout.positions,
                layout.bounds,
                &layout.labels,
                &layout.connections,
                canvas,
                mirror,
            )
            .unwrap()
        };

        let plain = project(Mirror::NONE);
        let flipped = project(Mirror::BOTH);
        for (a, b) in plain.nodes.iter().zip(&flipped.nodes) {
            assert!((b.x - (canvas.width - a.x)).abs() < 1e-6);
            assert!((b.y - (canvas.height - a.y)).abs() < 1e-6);
        }
    }
}

#[test]
fn test_worked_example() {
    let positions = [
        Position::new(0.0, 0.0),
        Position::new(10.0, 0.0),
        Position::new(10.0, 10.0),
    ];
    let graph = project_mirrored(
        &positions,
        Bounds::new(10.0, 10.0),
        &["a", "b", "c"],
        &[vec![1], vec![2], vec![]],
        Canvas::new(100.0, 100.0),
        Mirror::NONE,
    )
    .unwrap();

    let coords: Vec<_> = graph.nodes.iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(coords, vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]);
}
