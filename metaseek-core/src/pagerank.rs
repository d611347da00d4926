use crate::graph::DomainGraph;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("adjacency matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("label count {labels} does not match matrix size {size}")]
    LabelMismatch { labels: usize, size: usize },
}

/// Power-iteration PageRank over a domain adjacency matrix.
///
/// Two deliberate deviations from the textbook formulation, kept for
/// behavioral fidelity with the system this replaces:
///
/// - `damping` is the *teleportation* weight: the probability of jumping
///   to a uniformly random node, not of following a link. The default
///   0.85 therefore teleports most of the time.
/// - Dangling nodes (no outbound edges) keep an all-zero transition
///   column; their rank mass outside the teleport share is lost rather
///   than redistributed.
#[derive(Debug, Clone)]
pub struct PageRank {
    damping: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

impl PageRank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Compute scores for an adjacency matrix (`matrix[i][j] = 1.0` iff
    /// edge i → j) with one label per node, returned in node order.
    ///
    /// An empty matrix yields an empty result. A non-square matrix or a
    /// label/size mismatch is a caller configuration error.
    pub fn scores(
        &self,
        matrix: &[Vec<f64>],
        labels: &[String],
    ) -> Result<Vec<(String, f64)>, RankError> {
        let n = matrix.len();
        for (row, columns) in matrix.iter().enumerate() {
            if columns.len() != n {
                return Err(RankError::NotSquare {
                    row,
                    found: columns.len(),
                    expected: n,
                });
            }
        }
        if labels.len() != n {
            return Err(RankError::LabelMismatch {
                labels: labels.len(),
                size: n,
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        // Transition matrix: column j spreads node j's rank uniformly over
        // j's out-neighbors. Built from the transpose of the adjacency so
        // a dangling node is a zero column.
        let mut transition = vec![vec![0.0; n]; n];
        for j in 0..n {
            let out_degree: f64 = matrix[j].iter().sum();
            if out_degree > 0.0 {
                for i in 0..n {
                    if matrix[j][i] > 0.0 {
                        transition[i][j] = matrix[j][i] / out_degree;
                    }
                }
            }
        }

        let teleport = self.damping / n as f64;
        let follow = 1.0 - self.damping;

        let mut rank = vec![1.0 / n as f64; n];
        let mut next = vec![0.0; n];
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;

            for (i, slot) in next.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (j, &r) in rank.iter().enumerate() {
                    sum += (follow * transition[i][j] + teleport) * r;
                }
                *slot = sum;
            }

            let delta = rank
                .iter()
                .zip(next.iter())
                .map(|(old, new)| (old - new).abs())
                .fold(0.0_f64, f64::max);

            std::mem::swap(&mut rank, &mut next);

            if delta < self.tolerance {
                break;
            }
        }

        debug!("PageRank converged after {} iteration(s)", iterations);

        Ok(labels.iter().cloned().zip(rank).collect())
    }

    /// Convenience: score a domain graph directly.
    pub fn rank_graph(&self, graph: &DomainGraph) -> Result<Vec<(String, f64)>, RankError> {
        self.scores(&graph.to_matrix(), &graph.node_order())
    }
}

/// The single highest-scoring entry; exact ties go to the earliest node in
/// the ordering.
pub fn top_domain(scores: &[(String, f64)]) -> Option<&(String, f64)> {
    let mut best: Option<&(String, f64)> = None;
    for candidate in scores {
        match best {
            Some(current) if candidate.1 <= current.1 => {}
            _ => best = Some(candidate),
        }
    }
    best
}
