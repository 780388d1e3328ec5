//! SMOTE for mixed continuous/categorical feature matrices

use crate::error::{CreditError, Result};
use crate::resample::{class_counts, class_indices, ResampleResult, Sampler};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Ordered float for BinaryHeap-based partial sort
#[derive(Debug, Clone, Copy)]
struct DistIdx(f64, usize);

impl PartialEq for DistIdx {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for DistIdx {}
impl PartialOrd for DistIdx {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for DistIdx {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// SMOTE-NC: minority oversampling for matrices where some columns hold
/// integer category codes rather than continuous values.
///
/// Continuous features of a synthetic row are interpolated between a minority
/// sample and one of its k nearest minority neighbors. Categorical features
/// are never interpolated; each takes the most frequent code among the
/// neighbors. Distance treats a categorical mismatch as a fixed penalty equal
/// to the median standard deviation of the continuous features, so category
/// disagreement weighs comparably to a one-sigma numeric gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoteNC {
    /// Column indices that hold category codes
    categorical_indices: Vec<usize>,
    /// Number of nearest neighbors
    k_neighbors: usize,
    /// Desired minority/majority ratio after resampling
    sampling_strategy: f64,
    /// Random seed
    seed: Option<u64>,
    /// Target samples per class
    target_counts: Option<HashMap<i64, usize>>,
    /// Categorical mismatch penalty, learned at fit time
    mismatch_penalty: Option<f64>,
}

impl SmoteNC {
    /// Create a new sampler. `categorical_indices` are the columns holding
    /// category codes; all other columns are treated as continuous.
    pub fn new(categorical_indices: Vec<usize>) -> Self {
        Self {
            categorical_indices,
            k_neighbors: 5,
            sampling_strategy: 1.0,
            seed: None,
            target_counts: None,
            mismatch_penalty: None,
        }
    }

    /// Set number of neighbors
    pub fn with_k_neighbors(mut self, k: usize) -> Self {
        self.k_neighbors = k.max(1);
        self
    }

    /// Set the desired minority/majority ratio
    pub fn with_sampling_strategy(mut self, ratio: f64) -> Self {
        self.sampling_strategy = ratio.clamp(0.1, 10.0);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn is_categorical(&self, col: usize) -> bool {
        self.categorical_indices.contains(&col)
    }

    /// Mixed-type distance: Euclidean over continuous columns, a fixed
    /// penalty per differing categorical column.
    fn distance(&self, a: &[f64], b: &[f64], penalty: f64) -> f64 {
        let mut acc = 0.0;
        for (col, (ai, bi)) in a.iter().zip(b.iter()).enumerate() {
            if self.is_categorical(col) {
                if ai != bi {
                    acc += penalty * penalty;
                }
            } else {
                acc += (ai - bi).powi(2);
            }
        }
        acc.sqrt()
    }

    /// Find k nearest neighbors using BinaryHeap (O(n log k))
    fn find_neighbors(&self, point: &[f64], data: &[Vec<f64>], k: usize, penalty: f64) -> Vec<usize> {
        let mut heap: BinaryHeap<DistIdx> = BinaryHeap::with_capacity(k + 1);

        for (i, d) in data.iter().enumerate() {
            let dist = self.distance(point, d, penalty);
            if dist <= 0.0 {
                continue; // Exclude self
            }
            if heap.len() < k {
                heap.push(DistIdx(dist, i));
            } else if let Some(&DistIdx(max_dist, _)) = heap.peek() {
                if dist < max_dist {
                    heap.pop();
                    heap.push(DistIdx(dist, i));
                }
            }
        }

        heap.into_iter().map(|DistIdx(_, i)| i).collect()
    }

    /// Synthetic row: interpolate continuous columns between `point` and one
    /// neighbor, set categorical columns to the most frequent code among all
    /// k neighbors (smallest code wins a tie).
    fn generate_sample(
        &self,
        point: &[f64],
        samples: &[Vec<f64>],
        neighbors: &[usize],
        rng: &mut StdRng,
    ) -> Vec<f64> {
        let neighbor = &samples[neighbors[rng.gen_range(0..neighbors.len())]];
        let gap: f64 = rng.gen();

        (0..point.len())
            .map(|col| {
                if self.is_categorical(col) {
                    let mut counts: HashMap<i64, usize> = HashMap::new();
                    for &n_idx in neighbors {
                        *counts.entry(samples[n_idx][col] as i64).or_insert(0) += 1;
                    }
                    counts
                        .into_iter()
                        .max_by(|(a_code, a_count), (b_code, b_count)| {
                            a_count.cmp(b_count).then(b_code.cmp(a_code))
                        })
                        .map(|(code, _)| code as f64)
                        .unwrap_or(point[col])
                } else {
                    point[col] + gap * (neighbor[col] - point[col])
                }
            })
            .collect()
    }

    /// Median population std of the continuous columns
    fn compute_penalty(&self, x: &Array2<f64>) -> f64 {
        let mut stds: Vec<f64> = (0..x.ncols())
            .filter(|col| !self.is_categorical(*col))
            .map(|col| {
                let column = x.column(col);
                let n = column.len() as f64;
                let mean = column.sum() / n;
                (column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
            })
            .collect();

        if stds.is_empty() {
            return 1.0;
        }
        stds.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = stds.len() / 2;
        let median = if stds.len() % 2 == 0 {
            (stds[mid - 1] + stds[mid]) / 2.0
        } else {
            stds[mid]
        };
        if median == 0.0 {
            1.0
        } else {
            median
        }
    }
}

impl Sampler for SmoteNC {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<i64>) -> Result<()> {
        if x.nrows() == 0 {
            return Err(CreditError::EmptyInput(
                "cannot fit sampler on an empty matrix".to_string(),
            ));
        }
        if x.nrows() != y.len() {
            return Err(CreditError::Shape {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        let counts = class_counts(y);
        if counts.len() < 2 {
            return Err(CreditError::Validation(
                "need at least 2 classes to resample".to_string(),
            ));
        }

        let max_count = counts.values().copied().max().unwrap_or(0);

        let mut targets = HashMap::new();
        for (&class, &count) in &counts {
            let target = (max_count as f64 * self.sampling_strategy) as usize;
            targets.insert(class, target.max(count));
        }

        self.target_counts = Some(targets);
        self.mismatch_penalty = Some(self.compute_penalty(x));
        Ok(())
    }

    fn resample(&self, x: &Array2<f64>, y: &Array1<i64>) -> Result<ResampleResult> {
        let targets = self
            .target_counts
            .as_ref()
            .ok_or(CreditError::NotFitted)?;
        let penalty = self.mismatch_penalty.ok_or(CreditError::NotFitted)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let indices = class_indices(y);
        let counts = class_counts(y);
        let n_features = x.ncols();

        let mut synthetic_x: Vec<Vec<f64>> = Vec::new();
        let mut synthetic_y: Vec<i64> = Vec::new();

        // Deterministic class order for a given seed
        let mut classes: Vec<i64> = targets.keys().copied().collect();
        classes.sort_unstable();

        for class in classes {
            let target_count = targets[&class];
            let current_count = counts.get(&class).copied().unwrap_or(0);
            let n_to_generate = target_count.saturating_sub(current_count);

            if n_to_generate == 0 {
                continue;
            }

            let class_idx = &indices[&class];
            if class_idx.len() < 2 {
                return Err(CreditError::Validation(format!(
                    "class {class} has fewer than 2 samples, cannot synthesize neighbors"
                )));
            }
            let class_samples: Vec<Vec<f64>> = class_idx
                .iter()
                .map(|&i| x.row(i).iter().copied().collect())
                .collect();

            let k = self.k_neighbors.min(class_samples.len() - 1).max(1);

            let mut generated = 0;
            while generated < n_to_generate {
                let idx = rng.gen_range(0..class_samples.len());
                let sample = &class_samples[idx];

                let neighbors = self.find_neighbors(sample, &class_samples, k, penalty);
                if neighbors.is_empty() {
                    // All duplicates of `sample`; reuse it verbatim
                    synthetic_x.push(sample.clone());
                } else {
                    synthetic_x.push(self.generate_sample(sample, &class_samples, &neighbors, &mut rng));
                }
                synthetic_y.push(class);
                generated += 1;
            }
        }

        let n_original = x.nrows();
        let n_synthetic = synthetic_x.len();
        let n_total = n_original + n_synthetic;
        let result_x = Array2::from_shape_fn((n_total, n_features), |(i, j)| {
            if i < n_original {
                x[[i, j]]
            } else {
                synthetic_x[i - n_original][j]
            }
        });

        let mut all_y: Vec<i64> = y.iter().copied().collect();
        all_y.extend_from_slice(&synthetic_y);

        Ok(ResampleResult {
            x: result_x,
            y: Array1::from_vec(all_y),
            n_synthetic,
        })
    }
}
