//! Piecewise-linear lookup tables.
//!
//! A table maps an input attribute (for example `TEMPERATURE`) to an output
//! attribute (for example `YOUNG_MODULUS`) through an ordered list of samples.
//! Rows are kept in insertion order; the table never reorders them. Lookups
//! assume ascending x, which `add_row` callers are responsible for and
//! `insert_row` maintains.

use std::fmt;

use crate::error::{PropertiesError, PropertiesResult};
use crate::types::{BoundaryPolicy, TableRow};

/// Ordered `(x, y)` samples with linear interpolation between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecewiseLinearTable {
    rows: Vec<TableRow>,
}

impl PiecewiseLinearTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows, preserving their order.
    pub fn from_rows(rows: impl IntoIterator<Item = TableRow>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Append a sample at the end of the table.
    pub fn add_row(&mut self, x: f64, y: f64) {
        self.rows.push(TableRow::new(x, y));
    }

    /// Insert a sample keeping ascending x order.
    ///
    /// Rows with an equal x keep their relative order; the new row goes
    /// after them.
    pub fn insert_row(&mut self, x: f64, y: f64) {
        let pos = self.rows.partition_point(|r| r.x <= x);
        self.rows.insert(pos, TableRow::new(x, y));
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Whether x values are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.rows.windows(2).all(|w| w[0].x <= w[1].x)
    }

    /// Evaluate the table at `x` clamping to the edge rows outside the range.
    pub fn get_value(&self, x: f64) -> PropertiesResult<f64> {
        self.get_value_with(x, BoundaryPolicy::Clamp)
    }

    /// Evaluate the table at `x` with an explicit boundary policy.
    ///
    /// `x` at or beyond an edge row is resolved by `policy`; infinite `x` is
    /// just another out-of-range query.
    ///
    /// # Errors
    /// `InvalidParameter` if `x` is NaN, `EmptyTable` if the table has no rows.
    pub fn get_value_with(&self, x: f64, policy: BoundaryPolicy) -> PropertiesResult<f64> {
        check_query(x)?;
        let n = self.rows.len();
        match n {
            0 => return Err(PropertiesError::EmptyTable),
            1 => return Ok(self.rows[0].y),
            _ => {}
        }

        let first = self.rows[0];
        let last = self.rows[n - 1];

        if x <= first.x {
            return Ok(match policy {
                BoundaryPolicy::Clamp => first.y,
                BoundaryPolicy::Extrapolate => interpolate(x, first, self.rows[1]),
            });
        }
        if x >= last.x {
            return Ok(match policy {
                BoundaryPolicy::Clamp => last.y,
                BoundaryPolicy::Extrapolate => interpolate(x, self.rows[n - 2], last),
            });
        }

        for w in self.rows.windows(2) {
            if x <= w[1].x {
                return Ok(interpolate(x, w[0], w[1]));
            }
        }
        Ok(last.y)
    }

    /// Slope dy/dx of the segment containing `x`.
    ///
    /// Outside the sampled range the slope is 0 under `Clamp` and the edge
    /// segment's slope under `Extrapolate`. A single-row table has slope 0.
    /// A NaN `x` is rejected with `InvalidParameter`.
    pub fn get_derivative(&self, x: f64, policy: BoundaryPolicy) -> PropertiesResult<f64> {
        check_query(x)?;
        let n = self.rows.len();
        match n {
            0 => return Err(PropertiesError::EmptyTable),
            1 => return Ok(0.0),
            _ => {}
        }

        let first = self.rows[0];
        let last = self.rows[n - 1];

        if x < first.x {
            return Ok(match policy {
                BoundaryPolicy::Clamp => 0.0,
                BoundaryPolicy::Extrapolate => slope(first, self.rows[1]),
            });
        }
        if x > last.x {
            return Ok(match policy {
                BoundaryPolicy::Clamp => 0.0,
                BoundaryPolicy::Extrapolate => slope(self.rows[n - 2], last),
            });
        }

        for w in self.rows.windows(2) {
            if x <= w[1].x {
                return Ok(slope(w[0], w[1]));
            }
        }
        Ok(0.0)
    }

    /// y of the row whose x is closest to `x`. Ties go to the earlier row.
    pub fn get_nearest_value(&self, x: f64) -> PropertiesResult<f64> {
        let mut best: Option<(f64, f64)> = None;
        for row in &self.rows {
            let dist = (row.x - x).abs();
            match best {
                Some((d, _)) if d <= dist => {}
                _ => best = Some((dist, row.y)),
            }
        }
        best.map(|(_, y)| y).ok_or(PropertiesError::EmptyTable)
    }
}

fn check_query(x: f64) -> PropertiesResult<()> {
    if x.is_nan() {
        return Err(PropertiesError::invalid_param("x", "not a number"));
    }
    Ok(())
}

fn interpolate(x: f64, a: TableRow, b: TableRow) -> f64 {
    let dx = b.x - a.x;
    if dx == 0.0 {
        return a.y;
    }
    a.y + (x - a.x) * (b.y - a.y) / dx
}

fn slope(a: TableRow, b: TableRow) -> f64 {
    let dx = b.x - a.x;
    if dx == 0.0 {
        0.0
    } else {
        (b.y - a.y) / dx
    }
}

impl fmt::Display for PiecewiseLinearTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "\t{}\t\t{}", row.x, row.y)?;
        }
        Ok(())
    }
}

impl FromIterator<(f64, f64)> for PiecewiseLinearTable {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().map(TableRow::from))
    }
}
