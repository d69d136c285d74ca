use tracing::trace;

use crate::error::LinkError;
use crate::lapjv::lapjv;
use crate::sparse_matrix::SparseCostMatrix;

/*------------------------------------------------------------------------------
AssignmentSolver
------------------------------------------------------------------------------*/

/// A complete minimum-cost assignment of a square matrix: `row_to_col[i]`
/// is the column matched to row `i`, `total_cost` the sum of the matched
/// stored costs.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub row_to_col: Vec<usize>,
    pub total_cost: f64,
}

/// Solves a square sparse cost matrix to optimality.
///
/// Absent entries are expanded to a blocking value strictly larger than
/// any total a blocked-free assignment can reach, so the optimum never
/// selects one when a feasible assignment exists. A well-formed Jaqaman
/// augmented matrix is always feasible; an optimum that still lands on a
/// blocked entry therefore indicates a malformed input and is reported as
/// [`LinkError::Unsolvable`].
pub fn solve_sparse(matrix: &SparseCostMatrix) -> Result<Assignment, LinkError> {
    let n = matrix.n_rows();
    if n != matrix.n_cols() {
        return Err(LinkError::ShapeMismatch(format!(
            "solver needs a square matrix, got {} x {}",
            matrix.n_rows(),
            matrix.n_cols()
        )));
    }
    if n == 0 {
        return Err(LinkError::EmptyInput("0 x 0 cost matrix".to_string()));
    }

    let max_cost = matrix
        .entries()
        .map(|(_, _, cost)| cost)
        .fold(0.0f64, f64::max);
    let mut blocking = (n as f64) * max_cost + 1.0;
    if !blocking.is_finite() {
        blocking = f64::MAX / (n as f64 + 1.0);
    }

    let mut dense = vec![blocking; n * n];
    for (row, col, cost) in matrix.entries() {
        dense[row * n + col] = cost;
    }

    let mut x = vec![-1isize; n];
    let mut y = vec![-1isize; n];
    lapjv(n, &dense, &mut x, &mut y)?;

    let mut row_to_col = Vec::with_capacity(n);
    let mut total_cost = 0.0;
    for (i, &j) in x.iter().enumerate() {
        if j < 0 || j as usize >= n {
            return Err(LinkError::Unsolvable(format!(
                "row {} left unmatched",
                i
            )));
        }
        let realized = matrix.get(i, j as usize, f64::INFINITY);
        if !realized.is_finite() {
            return Err(LinkError::Unsolvable(format!(
                "optimum pairs row {} with forbidden column {}",
                i, j
            )));
        }
        row_to_col.push(j as usize);
        total_cost += realized;
    }

    trace!(n, total_cost, "solved sparse assignment");
    Ok(Assignment {
        row_to_col,
        total_cost,
    })
}
