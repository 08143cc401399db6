//! Values with a standard deviation and linear error propagation.
//!
//! A [`Quantity`] is either an independent random variable (created with
//! [`Quantity::new`]) or a *derived* value produced by arithmetic on other
//! quantities. Derived values remember which inputs they were computed from
//! together with the partial derivative with respect to each input, so the
//! standard deviation of any expression is
//!
//! ```text
//! σ_f² = Σ_k (∂f/∂x_k)² σ_k²
//! ```
//!
//! summed over the *independent* variables `x_k` the expression ultimately
//! depends on. Because the same variable can reach `f` along several paths,
//! cancellation is exact: `x / x` has zero uncertainty and `x - x` is exactly
//! zero, while `x / y` for two independent variables with identical values is
//! not.
//!
//! When that tracked relationship is not physically real, [`Quantity::detach`]
//! returns a fresh independent variable carrying only the nominal value and
//! standard deviation.
//!
//! # Example
//!
//! ```
//! use sensim_core::Quantity;
//!
//! let x = Quantity::new(2.0, 0.1);
//! let ratio = &x / &x;
//! assert_eq!(ratio.nominal(), 1.0);
//! assert_eq!(ratio.uncertainty(), 0.0);
//!
//! let y = x.detach();
//! let ratio = &x / &y;
//! assert!(ratio.uncertainty() > 0.0);
//! ```

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Node ids are handed out in creation order. A derived node is always
/// created after every node it depends on, so sorting by descending id is a
/// valid reverse topological order of the dependency graph.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> u64 {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
struct Node {
    id: u64,
    kind: NodeKind,
}

#[derive(Debug)]
enum NodeKind {
    /// Independent random variable.
    Variable { std_dev: f64 },
    /// Linearised function of earlier nodes, stored as (input, ∂self/∂input).
    Derived { parents: Vec<(Arc<Node>, f64)> },
}

// Long expression chains would otherwise drop recursively, one stack frame
// per node.
impl Drop for Node {
    fn drop(&mut self) {
        let NodeKind::Derived { parents } = &mut self.kind else {
            return;
        };
        let mut stack: Vec<Arc<Node>> = parents.drain(..).map(|(node, _)| node).collect();
        while let Some(node) = stack.pop() {
            if let Some(mut node) = Arc::into_inner(node) {
                if let NodeKind::Derived { parents } = &mut node.kind {
                    stack.extend(parents.drain(..).map(|(parent, _)| parent));
                }
            }
        }
    }
}

/// A nominal value with a standard deviation.
///
/// Cloning is cheap and preserves identity: a clone is the *same* random
/// variable, so `&q - &q.clone()` is exactly zero.
#[derive(Clone)]
pub struct Quantity {
    nominal: f64,
    /// `None` for exact values, which carry no randomness.
    node: Option<Arc<Node>>,
}

impl Quantity {
    /// Create a new independent random variable.
    ///
    /// The sign of `std_dev` is ignored.
    pub fn new(nominal: f64, std_dev: f64) -> Self {
        let std_dev = std_dev.abs();
        if std_dev == 0.0 {
            return Self::exact(nominal);
        }
        Self {
            nominal,
            node: Some(Arc::new(Node {
                id: next_node_id(),
                kind: NodeKind::Variable { std_dev },
            })),
        }
    }

    /// Create an exact value (zero uncertainty).
    pub fn exact(nominal: f64) -> Self {
        Self {
            nominal,
            node: None,
        }
    }

    /// A zero with zero uncertainty.
    pub fn zero() -> Self {
        Self::exact(0.0)
    }

    /// Pair nominal values with standard deviations element-wise, creating
    /// one independent variable per element.
    pub fn from_parts(nominals: &[f64], std_devs: &[f64]) -> Result<Vec<Self>> {
        if nominals.len() != std_devs.len() {
            return Err(Error::ShapeMismatch {
                context: "nominal/uncertainty pairing".to_string(),
                expected: format!("{} uncertainties", nominals.len()),
                actual: format!("{} uncertainties", std_devs.len()),
            });
        }
        Ok(nominals
            .iter()
            .zip(std_devs)
            .map(|(&n, &s)| Self::new(n, s))
            .collect())
    }

    /// Nominal (mean) value.
    #[inline]
    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Standard deviation, propagated through every tracked dependency.
    pub fn uncertainty(&self) -> f64 {
        match self.node.as_deref() {
            None => 0.0,
            Some(Node {
                kind: NodeKind::Variable { std_dev },
                ..
            }) => *std_dev,
            Some(_) => self
                .variable_sensitivities()
                .values()
                .map(|(partial, std_dev)| (partial * std_dev).powi(2))
                .sum::<f64>()
                .sqrt(),
        }
    }

    /// Uncertainty divided by the magnitude of the nominal value.
    pub fn relative_uncertainty(&self) -> f64 {
        if self.nominal == 0.0 {
            f64::INFINITY
        } else {
            self.uncertainty() / self.nominal.abs()
        }
    }

    /// True when the value carries no uncertainty at all.
    pub fn is_exact(&self) -> bool {
        self.node.is_none()
    }

    /// True when the value is an independent variable rather than the result
    /// of arithmetic on other quantities.
    pub fn is_independent(&self) -> bool {
        matches!(
            self.node.as_deref(),
            None | Some(Node {
                kind: NodeKind::Variable { .. },
                ..
            })
        )
    }

    /// A fresh independent variable with the same nominal value and standard
    /// deviation, and no tracked relationship to anything.
    pub fn detach(&self) -> Self {
        Self::new(self.nominal, self.uncertainty())
    }

    /// Snapshot of the nominal value and standard deviation.
    pub fn measurement(&self) -> Measurement {
        Measurement {
            value: self.nominal,
            std_dev: self.uncertainty(),
        }
    }

    /// Covariance of two quantities through their shared independent variables.
    pub fn covariance(&self, other: &Quantity) -> f64 {
        let lhs = self.variable_sensitivities();
        if lhs.is_empty() {
            return 0.0;
        }
        let rhs = other.variable_sensitivities();
        lhs.iter()
            .filter_map(|(id, (partial_a, std_dev))| {
                rhs.get(id)
                    .map(|(partial_b, _)| partial_a * partial_b * std_dev * std_dev)
            })
            .sum()
    }

    /// Pearson correlation coefficient, zero when either side is exact.
    pub fn correlation(&self, other: &Quantity) -> f64 {
        let denom = self.uncertainty() * other.uncertainty();
        if denom == 0.0 {
            0.0
        } else {
            self.covariance(other) / denom
        }
    }

    /// Square root.
    pub fn sqrt(&self) -> Self {
        let value = self.nominal.sqrt();
        Self::derived(value, [(self, 0.5 / value)])
    }

    /// Integer power.
    pub fn powi(&self, n: i32) -> Self {
        let value = self.nominal.powi(n);
        Self::derived(value, [(self, f64::from(n) * self.nominal.powi(n - 1))])
    }

    /// Sum of many quantities as a single derived value.
    pub fn sum_of<'a>(values: impl IntoIterator<Item = &'a Quantity>) -> Self {
        let values: Vec<&Quantity> = values.into_iter().collect();
        let total = values.iter().map(|q| q.nominal).sum();
        Self::derived(total, values.into_iter().map(|q| (q, 1.0)))
    }

    /// Dot product `Σ a_i b_i` with correlated propagation.
    pub fn dot(a: &[Quantity], b: &[Quantity]) -> Result<Self> {
        if a.len() != b.len() {
            return Err(Error::ShapeMismatch {
                context: "dot product".to_string(),
                expected: format!("{} components", a.len()),
                actual: format!("{} components", b.len()),
            });
        }
        let value = a.iter().zip(b).map(|(x, y)| x.nominal * y.nominal).sum();
        let terms = a
            .iter()
            .zip(b)
            .flat_map(|(x, y)| [(x, y.nominal), (y, x.nominal)]);
        Ok(Self::derived(value, terms))
    }

    /// Euclidean norm `√(Σ v_i²)` with correlated propagation.
    pub fn norm(values: &[Quantity]) -> Self {
        let value = values
            .iter()
            .map(|q| q.nominal * q.nominal)
            .sum::<f64>()
            .sqrt();
        Self::derived(value, values.iter().map(|q| (q, q.nominal / value)))
    }

    /// Nominal values of a slice of quantities.
    pub fn nominal_values(values: &[Quantity]) -> Vec<f64> {
        values.iter().map(Quantity::nominal).collect()
    }

    /// Standard deviations of a slice of quantities.
    pub fn std_devs(values: &[Quantity]) -> Vec<f64> {
        values.iter().map(Quantity::uncertainty).collect()
    }

    fn derived<'a>(nominal: f64, terms: impl IntoIterator<Item = (&'a Quantity, f64)>) -> Self {
        let parents: Vec<(Arc<Node>, f64)> = terms
            .into_iter()
            .filter(|(_, partial)| *partial != 0.0)
            .filter_map(|(q, partial)| q.node.as_ref().map(|node| (Arc::clone(node), partial)))
            .collect();

        if parents.is_empty() {
            return Self::exact(nominal);
        }

        Self {
            nominal,
            node: Some(Arc::new(Node {
                id: next_node_id(),
                kind: NodeKind::Derived { parents },
            })),
        }
    }

    /// Reverse-mode sweep: ∂self/∂x and σ_x for every independent variable x
    /// this value depends on.
    fn variable_sensitivities(&self) -> HashMap<u64, (f64, f64)> {
        let mut out = HashMap::new();
        let Some(root) = self.node.as_deref() else {
            return out;
        };

        let mut reachable: Vec<&Node> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();
        let mut stack: Vec<&Node> = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id) {
                continue;
            }
            reachable.push(node);
            if let NodeKind::Derived { parents } = &node.kind {
                stack.extend(parents.iter().map(|(parent, _)| parent.as_ref()));
            }
        }
        reachable.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        let mut adjoints: HashMap<u64, f64> = HashMap::with_capacity(reachable.len());
        adjoints.insert(root.id, 1.0);
        for node in reachable {
            let adjoint = adjoints.get(&node.id).copied().unwrap_or(0.0);
            if adjoint == 0.0 {
                continue;
            }
            match &node.kind {
                NodeKind::Variable { std_dev } => {
                    out.insert(node.id, (adjoint, *std_dev));
                }
                NodeKind::Derived { parents } => {
                    for (parent, partial) in parents {
                        *adjoints.entry(parent.id).or_insert(0.0) += adjoint * partial;
                    }
                }
            }
        }
        out
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::exact(value)
    }
}

impl From<Measurement> for Quantity {
    fn from(m: Measurement) -> Self {
        Self::new(m.value, m.std_dev)
    }
}

/// Compares nominal values and standard deviations, not identity.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nominal == other.nominal && self.uncertainty() == other.uncertainty()
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quantity")
            .field("nominal", &self.nominal)
            .field("uncertainty", &self.uncertainty())
            .finish()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.p$}+/-{:.p$}", self.nominal, self.uncertainty()),
            None => write!(f, "{}+/-{}", self.nominal, self.uncertainty()),
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.measurement().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Measurement::deserialize(deserializer).map(Quantity::from)
    }
}

impl<'a> Sum<&'a Quantity> for Quantity {
    fn sum<I: Iterator<Item = &'a Quantity>>(iter: I) -> Self {
        Quantity::sum_of(iter)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        let values: Vec<Quantity> = iter.collect();
        Quantity::sum_of(&values)
    }
}

// Arithmetic on references is the primitive; owned forms forward to it.

impl Add<&Quantity> for &Quantity {
    type Output = Quantity;

    fn add(self, rhs: &Quantity) -> Quantity {
        Quantity::derived(self.nominal + rhs.nominal, [(self, 1.0), (rhs, 1.0)])
    }
}

impl Sub<&Quantity> for &Quantity {
    type Output = Quantity;

    fn sub(self, rhs: &Quantity) -> Quantity {
        Quantity::derived(self.nominal - rhs.nominal, [(self, 1.0), (rhs, -1.0)])
    }
}

impl Mul<&Quantity> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::derived(
            self.nominal * rhs.nominal,
            [(self, rhs.nominal), (rhs, self.nominal)],
        )
    }
}

impl Div<&Quantity> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        let value = self.nominal / rhs.nominal;
        Quantity::derived(
            value,
            [(self, 1.0 / rhs.nominal), (rhs, -value / rhs.nominal)],
        )
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::derived(-self.nominal, [(self, -1.0)])
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        -&self
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<Quantity> for Quantity {
            type Output = Quantity;

            fn $method(self, rhs: Quantity) -> Quantity {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&Quantity> for Quantity {
            type Output = Quantity;

            fn $method(self, rhs: &Quantity) -> Quantity {
                (&self).$method(rhs)
            }
        }

        impl $trait<Quantity> for &Quantity {
            type Output = Quantity;

            fn $method(self, rhs: Quantity) -> Quantity {
                self.$method(&rhs)
            }
        }

        impl $trait<f64> for &Quantity {
            type Output = Quantity;

            fn $method(self, rhs: f64) -> Quantity {
                self.$method(&Quantity::exact(rhs))
            }
        }

        impl $trait<f64> for Quantity {
            type Output = Quantity;

            fn $method(self, rhs: f64) -> Quantity {
                (&self).$method(&Quantity::exact(rhs))
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);
forward_owned_binop!(Div, div);

/// Plain nominal value and standard deviation, without tracked correlations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Nominal value.
    pub value: f64,
    /// Standard deviation.
    pub std_dev: f64,
}

impl Measurement {
    /// Create a new measurement.
    pub fn new(value: f64, std_dev: f64) -> Self {
        Self { value, std_dev }
    }
}
