use tracing::trace;

use crate::cost_matrix::CostMatrixAssembly;
use crate::error::LinkError;
use crate::sparse_matrix::SparseCostMatrix;

/*------------------------------------------------------------------------------
Jaqaman augmentation
------------------------------------------------------------------------------*/

fn diagonal(values: &[f64]) -> Result<SparseCostMatrix, LinkError> {
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() || v < 0.0 {
            return Err(LinkError::NonFiniteAlternativeCost(format!(
                "value {} at index {}",
                v, i
            )));
        }
    }
    let entries = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i, i, v))
        .collect::<Vec<_>>();
    SparseCostMatrix::from_entries(values.len(), values.len(), entries)
}

/// Stitches the square solvable matrix out of the real top-left block and
/// the two alternative-cost vectors:
///
/// ```text
/// | top-left     diag(alt_source) |
/// | diag(alt_target)  bottom-right |
/// ```
///
/// The bottom-right block is uniformly filled with the minimum of all
/// alternative costs. That exact sentinel keeps the solver from ever
/// preferring a double unassignment over a genuine assignment of no
/// larger cost, so the augmented matrix stays feasible by construction.
pub fn augment(
    assembly: &CostMatrixAssembly,
) -> Result<SparseCostMatrix, LinkError> {
    let top_left = &assembly.top_left;
    if assembly.alt_source.len() != top_left.n_rows() {
        return Err(LinkError::ShapeMismatch(format!(
            "{} alternative source costs for {} rows",
            assembly.alt_source.len(),
            top_left.n_rows()
        )));
    }
    if assembly.alt_target.len() != top_left.n_cols() {
        return Err(LinkError::ShapeMismatch(format!(
            "{} alternative target costs for {} columns",
            assembly.alt_target.len(),
            top_left.n_cols()
        )));
    }

    let top_right = diagonal(&assembly.alt_source)?;
    let bottom_left = diagonal(&assembly.alt_target)?;

    let min_alt = assembly
        .alt_source
        .iter()
        .chain(assembly.alt_target.iter())
        .fold(f64::INFINITY, |acc, &v| acc.min(v));
    let bottom_right = top_left.transpose().fill_with(min_alt);

    let top = top_left.hcat(&top_right)?;
    let bottom = bottom_left.hcat(&bottom_right)?;
    let full = top.vcat(&bottom)?;
    trace!(
        size = full.n_rows(),
        n_entries = full.n_entries(),
        min_alt,
        "augmented cost matrix"
    );
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nearly_eq::assert_nearly_eq;

    fn assembly() -> CostMatrixAssembly {
        CostMatrixAssembly {
            top_left: SparseCostMatrix::from_entries(
                2,
                3,
                vec![(0, 0, 4.0), (1, 2, 9.0)],
            )
            .unwrap(),
            alt_source: vec![10.0, 12.0],
            alt_target: vec![11.0, 8.0, 13.0],
        }
    }

    #[test]
    fn test_quadrant_layout() {
        let full = augment(&assembly()).unwrap();
        assert_eq!(full.n_rows(), 5);
        assert_eq!(full.n_cols(), 5);

        // Top-left keeps the real costs.
        assert_nearly_eq!(full.get(0, 0, f64::MAX), 4.0);
        assert_nearly_eq!(full.get(1, 2, f64::MAX), 9.0);
        // Top-right holds one alternative cost per row on its diagonal.
        assert_nearly_eq!(full.get(0, 3, f64::MAX), 10.0);
        assert_nearly_eq!(full.get(1, 4, f64::MAX), 12.0);
        assert_nearly_eq!(full.get(0, 4, -1.0), -1.0);
        // Bottom-left, symmetrically per column.
        assert_nearly_eq!(full.get(2, 0, f64::MAX), 11.0);
        assert_nearly_eq!(full.get(3, 1, f64::MAX), 8.0);
        assert_nearly_eq!(full.get(4, 2, f64::MAX), 13.0);
        // Bottom-right is uniformly the minimum alternative cost.
        for row in 2..5 {
            for col in 3..5 {
                assert_nearly_eq!(full.get(row, col, f64::MAX), 8.0);
            }
        }
    }

    #[test]
    fn test_vector_length_mismatch() {
        let mut bad = assembly();
        bad.alt_source.push(1.0);
        assert!(matches!(augment(&bad), Err(LinkError::ShapeMismatch(_))));
    }

    #[test]
    fn test_non_finite_alternative_cost() {
        let mut bad = assembly();
        bad.alt_target[1] = f64::INFINITY;
        assert!(matches!(
            augment(&bad),
            Err(LinkError::NonFiniteAlternativeCost(_))
        ));
    }

    #[test]
    fn test_all_forbidden_top_left_still_augments() {
        let assembly = CostMatrixAssembly {
            top_left: SparseCostMatrix::empty(2, 2),
            alt_source: vec![5.0, 5.0],
            alt_target: vec![5.0, 5.0],
        };
        let full = augment(&assembly).unwrap();
        assert_eq!(full.n_rows(), 4);
        assert_nearly_eq!(full.get(0, 2, f64::MAX), 5.0);
        assert_nearly_eq!(full.get(0, 0, -1.0), -1.0);
    }
}
