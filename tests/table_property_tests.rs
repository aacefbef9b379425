//! Property-based tests for piecewise-linear table evaluation.
//!
//! Tests that:
//! - evaluation at a sample x returns that sample's y
//! - interpolated values stay within the bracketing samples
//! - Clamp returns edge values outside the range
//! - Extrapolate continues the edge segment

use proptest::prelude::*;

use matprop_core::{BoundaryPolicy, PiecewiseLinearTable};

/// Ascending, well separated x values with arbitrary y.
fn arb_table() -> impl Strategy<Value = PiecewiseLinearTable> {
    proptest::collection::vec((0.5f64..10.0, -1000.0f64..1000.0), 2..12).prop_map(|steps| {
        let mut x = 0.0;
        let mut table = PiecewiseLinearTable::new();
        for (dx, y) in steps {
            x += dx;
            table.add_row(x, y);
        }
        table
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_hits_sample_points(table in arb_table()) {
        for row in table.rows() {
            let value = table.get_value(row.x).unwrap();
            prop_assert!((value - row.y).abs() < 1e-9, "at x={} got {} expected {}", row.x, value, row.y);
        }
    }

    #[test]
    fn prop_interpolation_is_bounded(table in arb_table(), t in 0.0f64..1.0) {
        let rows = table.rows();
        for w in rows.windows(2) {
            let x = w[0].x + t * (w[1].x - w[0].x);
            let value = table.get_value(x).unwrap();
            let lo = w[0].y.min(w[1].y) - 1e-9;
            let hi = w[0].y.max(w[1].y) + 1e-9;
            prop_assert!(value >= lo && value <= hi);
        }
    }

    #[test]
    fn prop_clamp_outside_range(table in arb_table(), offset in 0.1f64..100.0) {
        let rows = table.rows();
        let first = rows[0];
        let last = rows[rows.len() - 1];

        prop_assert_eq!(table.get_value(first.x - offset).unwrap(), first.y);
        prop_assert_eq!(table.get_value(last.x + offset).unwrap(), last.y);
        prop_assert_eq!(table.get_derivative(last.x + offset, BoundaryPolicy::Clamp).unwrap(), 0.0);
    }

    #[test]
    fn prop_extrapolate_follows_edge_slope(table in arb_table(), offset in 0.1f64..100.0) {
        let rows = table.rows();
        let n = rows.len();
        let (a, b) = (rows[n - 2], rows[n - 1]);
        let slope = (b.y - a.y) / (b.x - a.x);

        let value = table
            .get_value_with(b.x + offset, BoundaryPolicy::Extrapolate)
            .unwrap();
        let expected = b.y + slope * offset;
        prop_assert!((value - expected).abs() < 1e-6 * (1.0 + expected.abs()));
    }

    #[test]
    fn prop_insert_row_keeps_sorted(xs in proptest::collection::vec(-100.0f64..100.0, 0..30)) {
        let mut table = PiecewiseLinearTable::new();
        for x in &xs {
            table.insert_row(*x, 0.0);
        }
        prop_assert!(table.is_sorted());
        prop_assert_eq!(table.len(), xs.len());
    }
}
