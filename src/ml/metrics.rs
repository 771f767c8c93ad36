//! Evaluation metrics for the binary diagnosis classifier.

use serde::{Deserialize, Serialize};

use crate::ml::logreg::Diagnosis;

/// Confusion matrix over [`Diagnosis`] classes, indexed by fit-time label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    /// Row-major `2x2` counts (`truth * 2 + predicted`).
    pub counts: [u32; 4],
}

impl ConfusionMatrix {
    pub const N_CLASSES: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, truth: Diagnosis, predicted: Diagnosis) {
        let idx = Self::index(truth, predicted);
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: Diagnosis, predicted: Diagnosis) -> u32 {
        self.counts[Self::index(truth, predicted)]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| v as u64).sum()
    }

    fn index(truth: Diagnosis, predicted: Diagnosis) -> usize {
        truth.label() as usize * Self::N_CLASSES + predicted.label() as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Precision/recall statistics for a single class.
pub struct ClassStats {
    pub class: Diagnosis,
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

impl ClassStats {
    pub fn f1(&self) -> f32 {
        if self.precision + self.recall == 0.0 {
            0.0
        } else {
            2.0 * self.precision * self.recall / (self.precision + self.recall)
        }
    }
}

/// Compute per-class precision and recall, benign first.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<ClassStats> {
    [Diagnosis::Benign, Diagnosis::Malignant]
        .into_iter()
        .map(|class| {
            let other = match class {
                Diagnosis::Benign => Diagnosis::Malignant,
                Diagnosis::Malignant => Diagnosis::Benign,
            };
            let tp = cm.get(class, class) as f32;
            let fn_ = cm.get(class, other) as f32;
            let fp = cm.get(other, class) as f32;
            let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
            let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
            ClassStats {
                class,
                precision,
                recall,
                support: cm.get(class, class).saturating_add(cm.get(class, other)),
            }
        })
        .collect()
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct = cm.get(Diagnosis::Benign, Diagnosis::Benign) as u64
        + cm.get(Diagnosis::Malignant, Diagnosis::Malignant) as u64;
    (correct as f32) / (total as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Diagnosis::{Benign, Malignant};

    fn sample_matrix() -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new();
        for _ in 0..8 {
            cm.add(Benign, Benign);
        }
        cm.add(Benign, Malignant);
        cm.add(Benign, Malignant);
        for _ in 0..6 {
            cm.add(Malignant, Malignant);
        }
        cm.add(Malignant, Benign);
        cm
    }

    #[test]
    fn accuracy_counts_diagonal() {
        let cm = sample_matrix();
        assert_eq!(cm.total(), 17);
        assert!((accuracy(&cm) - 14.0 / 17.0).abs() < 1e-6);
        assert_eq!(accuracy(&ConfusionMatrix::new()), 0.0);
    }

    #[test]
    fn per_class_stats() {
        let stats = precision_recall_by_class(&sample_matrix());
        assert_eq!(stats[0].class, Benign);
        assert_eq!(stats[0].support, 10);
        assert!((stats[0].precision - 8.0 / 9.0).abs() < 1e-6);
        assert!((stats[0].recall - 0.8).abs() < 1e-6);
        assert_eq!(stats[1].support, 7);
        assert!((stats[1].precision - 0.75).abs() < 1e-6);
        assert!((stats[1].recall - 6.0 / 7.0).abs() < 1e-6);
        let f1 = stats[1].f1();
        assert!(f1 > 0.79 && f1 < 0.81);
    }
}
