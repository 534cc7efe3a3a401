use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table has no breakpoints")]
    Empty,
    #[error("Breakpoints must be strictly increasing")]
    NotIncreasing,
    #[error("Expected {expected} values, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("Table contains non-finite values")]
    NonFinite,
}

/// Piecewise-linear lookup over one variable, clamped at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table1D {
    pub breakpoints: Vec<f64>,
    pub values: Vec<f64>,
}

impl Table1D {
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> Result<Self, TableError> {
        let table = Self {
            breakpoints,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    /// A table that returns `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            breakpoints: vec![0.0],
            values: vec![value],
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        validate_axis(&self.breakpoints)?;
        if self.values.len() != self.breakpoints.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.breakpoints.len(),
                found: self.values.len(),
            });
        }
        if !self.values.iter().all(|v| v.is_finite()) {
            return Err(TableError::NonFinite);
        }
        Ok(())
    }

    pub fn lookup(&self, x: f64) -> f64 {
        let (i, t) = locate(&self.breakpoints, x);
        if t == 0.0 {
            return self.values[i];
        }
        self.values[i] + (self.values[i + 1] - self.values[i]) * t
    }
}

/// Bilinear lookup over two variables, clamped at the edges.
///
/// `values` is row-major: one row per `rows` breakpoint, one column per
/// `columns` breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table2D {
    pub rows: Vec<f64>,
    pub columns: Vec<f64>,
    pub values: Vec<Vec<f64>>,
}

impl Table2D {
    pub fn new(rows: Vec<f64>, columns: Vec<f64>, values: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let table = Self {
            rows,
            columns,
            values,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn constant(value: f64) -> Self {
        Self {
            rows: vec![0.0],
            columns: vec![0.0],
            values: vec![vec![value]],
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        validate_axis(&self.rows)?;
        validate_axis(&self.columns)?;
        if self.values.len() != self.rows.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.rows.len(),
                found: self.values.len(),
            });
        }
        for row in &self.values {
            if row.len() != self.columns.len() {
                return Err(TableError::ShapeMismatch {
                    expected: self.columns.len(),
                    found: row.len(),
                });
            }
            if !row.iter().all(|v| v.is_finite()) {
                return Err(TableError::NonFinite);
            }
        }
        Ok(())
    }

    pub fn lookup(&self, row: f64, column: f64) -> f64 {
        let (i, ti) = locate(&self.rows, row);
        let (j, tj) = locate(&self.columns, column);
        let sample = |i: usize| {
            let r = &self.values[i];
            if tj == 0.0 {
                r[j]
            } else {
                r[j] + (r[j + 1] - r[j]) * tj
            }
        };
        let low = sample(i);
        if ti == 0.0 {
            return low;
        }
        low + (sample(i + 1) - low) * ti
    }
}

fn validate_axis(axis: &[f64]) -> Result<(), TableError> {
    if axis.is_empty() {
        return Err(TableError::Empty);
    }
    if !axis.iter().all(|v| v.is_finite()) {
        return Err(TableError::NonFinite);
    }
    if axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(TableError::NotIncreasing);
    }
    Ok(())
}

/// Returns the lower breakpoint index and the fractional position towards the
/// next one. Out-of-range inputs clamp to the end points with a zero fraction.
fn locate(axis: &[f64], x: f64) -> (usize, f64) {
    let last = axis.len() - 1;
    if last == 0 || x <= axis[0] {
        return (0, 0.0);
    }
    if x >= axis[last] {
        return (last, 0.0);
    }
    let upper = axis.partition_point(|&b| b <= x);
    let i = upper - 1;
    let t = (x - axis[i]) / (axis[i + 1] - axis[i]);
    (i, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_interpolates_and_clamps() {
        let table = Table1D::new(vec![0.0, 1.0, 3.0], vec![0.0, 10.0, 30.0]).unwrap();
        assert_relative_eq!(table.lookup(0.5), 5.0);
        assert_relative_eq!(table.lookup(2.0), 20.0);
        assert_relative_eq!(table.lookup(-4.0), 0.0);
        assert_relative_eq!(table.lookup(9.0), 30.0);
        assert_relative_eq!(table.lookup(1.0), 10.0);
    }

    #[test]
    fn test_bilinear_lookup() {
        let table = Table2D::new(
            vec![0.0, 10.0],
            vec![0.0, 1.0],
            vec![vec![0.0, 100.0], vec![50.0, 150.0]],
        )
        .unwrap();
        assert_relative_eq!(table.lookup(5.0, 0.5), 75.0);
        assert_relative_eq!(table.lookup(0.0, 1.0), 100.0);
        assert_relative_eq!(table.lookup(20.0, 2.0), 150.0);
    }

    #[test]
    fn test_validation_rejects_bad_tables() {
        assert_eq!(
            Table1D::new(vec![0.0, 0.0], vec![1.0, 2.0]),
            Err(TableError::NotIncreasing)
        );
        assert_eq!(
            Table1D::new(vec![0.0, 1.0], vec![1.0]),
            Err(TableError::ShapeMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(Table2D::new(vec![], vec![0.0], vec![]), Err(TableError::Empty));
    }

    #[test]
    fn test_constant_tables() {
        assert_relative_eq!(Table1D::constant(0.7).lookup(123.0), 0.7);
        assert_relative_eq!(Table2D::constant(4.0).lookup(-1.0, 8.0), 4.0);
    }
}
