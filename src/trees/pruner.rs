use crate::trees::node::{majority_label, Tree};
use std::fmt::Debug;

/// Simplifies a fully grown tree in place. Implementations work bottom-up and
/// must be idempotent.
pub trait Pruner: Debug + Send + Sync {
    fn prune(&self, root: &mut Tree);
}

/// C4.5-style pruning: a node whose children are all leaves is collapsed when
/// the upper confidence bound of its error as a leaf does not exceed the
/// summed bounds of its children. The root itself is never collapsed.
#[derive(Clone, Debug)]
pub struct PessimisticPruner {
    confidence: f64,
    z: f64,
}

impl PessimisticPruner {
    pub fn new(confidence: f64) -> Self {
        Self {
            confidence,
            z: inverse_normal(1.0 - confidence),
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    fn prune_child(&self, node: &mut Tree) {
        if node.is_leaf() {
            return;
        }
        for edge in node.children_mut() {
            self.prune_child(&mut edge.child);
        }
        if !node.children().iter().all(|edge| edge.child.is_leaf()) {
            return;
        }

        let counts = node.subtree_counter_map();
        let leaf_error = self.leaf_error(&counts);
        let tree_error: f64 = node
            .children()
            .iter()
            .map(|edge| self.leaf_error(edge.child.counter_map()))
            .sum();

        if leaf_error <= tree_error {
            log::trace!(
                "collapsing node ({:.3} <= {:.3} estimated errors)",
                leaf_error,
                tree_error
            );
            node.remove_children();
            for (class_name, &count) in &counts {
                node.add_count(class_name, count);
            }
            if let Some(label) = majority_label(&counts) {
                node.set_leaf(label);
            }
        }
    }

    fn leaf_error(&self, counts: &std::collections::BTreeMap<String, usize>) -> f64 {
        let total: usize = counts.values().sum();
        let correct = counts.values().copied().max().unwrap_or(0);
        self.pessimistic_error(total as f64, (total - correct) as f64)
    }

    /// Upper confidence bound on the number of errors among `n` examples of
    /// which `errors` were misclassified on the training data.
    fn pessimistic_error(&self, n: f64, errors: f64) -> f64 {
        if n <= 0.0 {
            return 0.0;
        }
        let f = errors / n;
        let z2 = self.z * self.z;
        let spread = (f / n - f * f / n + z2 / (4.0 * n * n)).max(0.0).sqrt();
        let upper = (f + z2 / (2.0 * n) + self.z * spread) / (1.0 + z2 / n);
        upper * n
    }
}

impl Default for PessimisticPruner {
    fn default() -> Self {
        Self::new(0.25)
    }
}

impl Pruner for PessimisticPruner {
    fn prune(&self, root: &mut Tree) {
        for edge in root.children_mut() {
            self.prune_child(&mut edge.child);
        }
    }
}

/// Quantile function of the standard normal distribution (Acklam's rational
/// approximation, relative error below 1.2e-9).
pub fn inverse_normal(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    let tail = |q: f64| {
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    if p < P_LOW {
        tail((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        -tail((-2.0 * (1.0 - p).ln()).sqrt())
    }
}
