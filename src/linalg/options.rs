use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which triangle of a square matrix holds the factor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Triangle {
    /// Forward substitution, columns in increasing order.
    #[default]
    Lower,
    /// Back substitution, columns in decreasing order.
    Upper,
}

impl FromStr for Triangle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower" | "l" => Ok(Triangle::Lower),
            "upper" | "u" => Ok(Triangle::Upper),
            _ => Err(format!("Invalid triangle: {}", s)),
        }
    }
}

/// How a zero or missing diagonal entry is handled by [`TriangularFactor`].
///
/// [`TriangularFactor`]: crate::linalg::triangular::TriangularFactor
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularCheck {
    /// Divide anyway and let infinities and NaNs flow into the solution.
    #[default]
    Propagate,
    /// Reject the factor with `LinearSolverError::SingularFactor`.
    Error,
}

impl FromStr for SingularCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" | "ieee" | "nan" => Ok(SingularCheck::Propagate),
            "error" | "check" => Ok(SingularCheck::Error),
            _ => Err(format!("Invalid singular check: {}", s)),
        }
    }
}

/// Configuration of a [`TriangularFactor`](crate::linalg::triangular::TriangularFactor).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangularOptions {
    pub triangle: Triangle,
    pub singular_check: SingularCheck,
}

impl TriangularOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_triangle(mut self, triangle: Triangle) -> Self {
        self.triangle = triangle;
        self
    }

    pub fn with_singular_check(mut self, singular_check: SingularCheck) -> Self {
        self.singular_check = singular_check;
        self
    }
}
