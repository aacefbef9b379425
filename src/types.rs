//! Plain-data structures shared with the FFI layer.
//!
//! All structs use `#[repr(C)]` so a host language can lay them out
//! sequentially and pass them by pointer.

/// Behaviour of table lookups outside the sampled x range.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Return the y value of the nearest edge row.
    #[default]
    Clamp = 0,
    /// Extend the first/last segment linearly.
    Extrapolate = 1,
}

impl BoundaryPolicy {
    /// Convert from i32 for FFI.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(BoundaryPolicy::Clamp),
            1 => Some(BoundaryPolicy::Extrapolate),
            _ => None,
        }
    }
}

/// A single `(x, y)` sample of a lookup table.
///
/// # FFI Safety
/// This struct uses `repr(C)` layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableRow {
    /// Input value
    pub x: f64,
    /// Output value
    pub y: f64,
}

impl TableRow {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for TableRow {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Lookup configuration carried by each `Properties` container.
///
/// # FFI Safety
/// `boundary_policy` is an i32 so the struct stays plain data:
/// 0 = Clamp, 1 = Extrapolate. Unknown values fall back to Clamp.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    pub boundary_policy: i32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::Clamp as i32,
        }
    }
}

impl LookupConfig {
    pub fn with_policy(policy: BoundaryPolicy) -> Self {
        Self {
            boundary_policy: policy as i32,
        }
    }

    /// Decoded boundary policy.
    pub fn policy(&self) -> BoundaryPolicy {
        BoundaryPolicy::from_i32(self.boundary_policy).unwrap_or_default()
    }
}
