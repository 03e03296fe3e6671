//! Random forest regression.
//!
//! Bagged regression trees over the single scalar feature: each tree is
//! grown on a bootstrap resample, splits greedily minimize the squared
//! error of the two child means, and the forest forecast is the mean of the
//! tree forecasts. The bootstrap RNG is seeded so a given training set
//! always produces the same forest.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::strategy::{check_training_input, ForecastStrategy};
use crate::ForecastError;

const DEFAULT_TREE_COUNT: usize = 100;
const DEFAULT_SEED: u64 = 0x70726963;

/// Random forest hyperparameters.
#[derive(Debug, Clone)]
pub struct RandomForestConfig {
    /// Number of bootstrap trees (default: 100).
    pub tree_count: usize,
    /// Minimum samples required to attempt a split (default: 2).
    pub min_split: usize,
    /// Bootstrap RNG seed.
    pub seed: u64,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            tree_count: DEFAULT_TREE_COUNT,
            min_split: 2,
            seed: DEFAULT_SEED,
        }
    }
}

/// A node in a fitted regression tree.
#[derive(Debug, Clone)]
enum TreeNode {
    Leaf(f64),
    Split {
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn predict(&self, x: f64) -> f64 {
        match self {
            TreeNode::Leaf(value) => *value,
            TreeNode::Split {
                threshold,
                left,
                right,
            } => {
                if x <= *threshold {
                    left.predict(x)
                } else {
                    right.predict(x)
                }
            }
        }
    }
}

/// Ensemble of bootstrap-sampled regression trees.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: RandomForestConfig,
    trees: Vec<TreeNode>,
}

impl RandomForestRegressor {
    /// Create an unfitted forest with default hyperparameters.
    pub fn new() -> Self {
        Self::with_config(RandomForestConfig::default())
    }

    /// Create an unfitted forest with custom hyperparameters.
    pub fn with_config(config: RandomForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    fn mean(values: impl Iterator<Item = f64>) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values {
            sum += v;
            count += 1;
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Grow one tree over (feature, target) samples.
    fn grow_tree(&self, samples: &mut [(f64, f64)]) -> TreeNode {
        if samples.len() < self.config.min_split {
            return TreeNode::Leaf(Self::mean(samples.iter().map(|(_, y)| *y)));
        }

        samples.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let first_x = samples[0].0;
        if samples.iter().all(|(x, _)| *x == first_x) {
            return TreeNode::Leaf(Self::mean(samples.iter().map(|(_, y)| *y)));
        }

        // Best split over midpoints between adjacent distinct feature values
        let mut best: Option<(f64, usize, f64)> = None; // (sse, split index, threshold)
        for i in 1..samples.len() {
            if samples[i].0 == samples[i - 1].0 {
                continue;
            }
            let threshold = (samples[i].0 + samples[i - 1].0) / 2.0;
            let left_mean = Self::mean(samples[..i].iter().map(|(_, y)| *y));
            let right_mean = Self::mean(samples[i..].iter().map(|(_, y)| *y));
            let sse: f64 = samples[..i]
                .iter()
                .map(|(_, y)| (y - left_mean).powi(2))
                .chain(samples[i..].iter().map(|(_, y)| (y - right_mean).powi(2)))
                .sum();

            if best.map_or(true, |(best_sse, _, _)| sse < best_sse) {
                best = Some((sse, i, threshold));
            }
        }

        match best {
            Some((_, split_at, threshold)) => {
                let (left_samples, right_samples) = samples.split_at_mut(split_at);
                TreeNode::Split {
                    threshold,
                    left: Box::new(self.grow_tree(left_samples)),
                    right: Box::new(self.grow_tree(right_samples)),
                }
            }
            None => TreeNode::Leaf(Self::mean(samples.iter().map(|(_, y)| *y))),
        }
    }
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastStrategy for RandomForestRegressor {
    fn fit(&mut self, features: &[f64], targets: &[f64]) -> Result<()> {
        check_training_input(features, targets)?;

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut trees = Vec::with_capacity(self.config.tree_count);

        for _ in 0..self.config.tree_count {
            let mut sample: Vec<(f64, f64)> = (0..n)
                .map(|_| {
                    let i = rng.gen_range(0..n);
                    (features[i], targets[i])
                })
                .collect();
            trees.push(self.grow_tree(&mut sample));
        }

        self.trees = trees;
        Ok(())
    }

    fn predict(&self, feature: f64) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ForecastError::Prediction("model not fitted".to_string()));
        }

        let value = Self::mean(self.trees.iter().map(|t| t.predict(feature)));
        if !value.is_finite() {
            return Err(ForecastError::Prediction(
                "forecast is not finite".to_string(),
            ));
        }
        Ok(value)
    }

    fn name(&self) -> &'static str {
        "random_forest"
    }
}
