/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides a simple KD-tree for bounded nearest-neighbour queries when resampling samples.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use faer::Mat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ferreus_iso_utils::get_distance;

/// A sample location tagged with its row in the source matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedPoint {
    coords: [f64; 3],
    id: usize,
}

/// A node in the KDTree
#[derive(Debug)]
struct Node {
    point: IndexedPoint,
    left: Option<usize>,
    right: Option<usize>,
}

#[derive(Debug, PartialEq)]
struct Neighbour {
    distance: f64,
    id: usize,
}

impl Eq for Neighbour {}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbour {
    // Farthest neighbour on top of the heap; ties broken by id so results are
    // deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

/// KD-tree over three dimensional points, stored as a flat vector of nodes.
#[derive(Debug)]
pub struct KDTree {
    nodes: Vec<Node>,
}

impl KDTree {
    /// Constructs a new KDTree from an `(N × 3)` matrix of points.
    ///
    /// Neighbour ids returned by queries are row indices into `points`.
    pub fn new(points: &Mat<f64>) -> Self {
        let mut indexed: Vec<IndexedPoint> = (0..points.nrows())
            .map(|i| IndexedPoint {
                coords: [points[(i, 0)], points[(i, 1)], points[(i, 2)]],
                id: i,
            })
            .collect();

        let mut tree = KDTree {
            nodes: Vec::with_capacity(indexed.len()),
        };
        tree.build_tree(&mut indexed, 0);
        tree
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Recursively builds the KDTree and stores nodes in a flat vector.
    fn build_tree(&mut self, points: &mut [IndexedPoint], depth: usize) -> Option<usize> {
        if points.is_empty() {
            return None;
        }

        let axis = depth % 3;

        points.sort_by(|a, b| a.coords[axis].total_cmp(&b.coords[axis]));

        let mid = points.len() / 2;

        let node_index = self.nodes.len();
        self.nodes.push(Node {
            point: points[mid],
            left: None,
            right: None,
        });

        let (lower, upper) = points.split_at_mut(mid);
        self.nodes[node_index].left = self.build_tree(lower, depth + 1);
        self.nodes[node_index].right = self.build_tree(&mut upper[1..], depth + 1);

        Some(node_index)
    }

    /// Returns up to `k` nearest points whose distance to `target` is at most
    /// `max_distance`, as `(id, distance)` pairs sorted closest first.
    ///
    /// This is the same set as taking the `k` nearest points and discarding
    /// those farther than `max_distance`. `max_distance` may be infinite.
    pub fn k_nearest_within(
        &self,
        target: &[f64; 3],
        k: usize,
        max_distance: f64,
    ) -> Vec<(usize, f64)> {
        if k == 0 || self.nodes.is_empty() || !(max_distance >= 0.0) {
            return Vec::new();
        }

        let mut heap = BinaryHeap::with_capacity(k + 1);
        self.k_nearest_impl(0, target, k, max_distance, 0, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|n| (n.id, n.distance))
            .collect()
    }

    /// Current pruning radius: the farthest kept neighbour once `k` are held,
    /// otherwise the distance bound.
    #[inline(always)]
    fn search_radius(heap: &BinaryHeap<Neighbour>, k: usize, max_distance: f64) -> f64 {
        match heap.peek() {
            Some(farthest) if heap.len() == k => farthest.distance.min(max_distance),
            _ => max_distance,
        }
    }

    fn k_nearest_impl(
        &self,
        node_index: usize,
        target: &[f64; 3],
        k: usize,
        max_distance: f64,
        depth: usize,
        heap: &mut BinaryHeap<Neighbour>,
    ) {
        let node = &self.nodes[node_index];
        let distance = get_distance(target, &node.point.coords);

        if distance <= max_distance {
            heap.push(Neighbour {
                distance,
                id: node.point.id,
            });
            if heap.len() > k {
                heap.pop();
            }
        }

        let axis = depth % 3;
        let diff = target[axis] - node.point.coords[axis];

        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.k_nearest_impl(near, target, k, max_distance, depth + 1, heap);
        }

        if let Some(far) = far {
            // |diff| <= radius => the search sphere crosses the splitting plane
            if diff.abs() <= Self::search_radius(heap, k, max_distance) {
                self.k_nearest_impl(far, target, k, max_distance, depth + 1, heap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_points(n: usize, seed: u64) -> Mat<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        Mat::from_fn(n, 3, |_, _| rng.random_range(0.0..1.0))
    }

    fn brute_force(
        points: &Mat<f64>,
        target: &[f64; 3],
        k: usize,
        max_distance: f64,
    ) -> Vec<(usize, f64)> {
        let mut all: Vec<(usize, f64)> = (0..points.nrows())
            .map(|i| {
                let p = [points[(i, 0)], points[(i, 1)], points[(i, 2)]];
                (i, get_distance(target, &p))
            })
            .collect();
        all.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        all.truncate(k);
        all.retain(|&(_, d)| d <= max_distance);
        all
    }

    #[test]
    fn k_nearest_within_matches_bruteforce() {
        for (n, seed) in [(50usize, 1u64), (400, 2), (1000, 3)] {
            let points = random_points(n, seed);
            let tree = KDTree::new(&points);
            assert_eq!(tree.len(), n);

            let mut rng = StdRng::seed_from_u64(seed + 100);
            for _ in 0..50 {
                let target = [
                    rng.random_range(-0.2..1.2),
                    rng.random_range(-0.2..1.2),
                    rng.random_range(-0.2..1.2),
                ];
                let k = rng.random_range(1..12);
                let max_distance = rng.random_range(0.0..0.5);

                let kd = tree.k_nearest_within(&target, k, max_distance);
                let bf = brute_force(&points, &target, k, max_distance);
                assert_eq!(kd, bf);
            }
        }
    }

    #[test]
    fn infinite_bound_is_plain_k_nearest() {
        let points = random_points(200, 9);
        let tree = KDTree::new(&points);
        let target = [0.5, 0.5, 0.5];

        let kd = tree.k_nearest_within(&target, 8, f64::INFINITY);
        assert_eq!(kd.len(), 8);
        assert_eq!(kd, brute_force(&points, &target, 8, f64::INFINITY));
    }

    #[test]
    fn boundary_distance_is_kept() {
        let points = Mat::from_fn(2, 3, |i, j| if j == 0 { i as f64 } else { 0.0 });
        let tree = KDTree::new(&points);

        let hits = tree.k_nearest_within(&[0.0, 0.0, 0.0], 8, 1.0);
        assert_eq!(hits, vec![(0, 0.0), (1, 1.0)]);
    }

    #[test]
    fn degenerate_queries_return_empty() {
        let empty = KDTree::new(&Mat::<f64>::zeros(0, 3));
        assert_eq!(empty.len(), 0);
        assert!(empty.k_nearest_within(&[0.0; 3], 4, 1.0).is_empty());

        let tree = KDTree::new(&random_points(10, 4));
        assert!(tree.k_nearest_within(&[0.0; 3], 0, 1.0).is_empty());
        assert!(tree.k_nearest_within(&[0.0; 3], 3, f64::NAN).is_empty());
        assert!(tree.k_nearest_within(&[10.0; 3], 3, 1.0).is_empty());
    }

    #[test]
    fn duplicates_are_all_returned() {
        let points = Mat::from_fn(3, 3, |_, _| 0.25);
        let tree = KDTree::new(&points);
        let hits = tree.k_nearest_within(&[0.25; 3], 8, 0.0);
        let mut ids: Vec<usize> = hits.iter().map(|h| h.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }
}
