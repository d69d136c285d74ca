use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::CostFunction;
use crate::error::LinkError;
use crate::sparse_matrix::SparseCostMatrix;

/*------------------------------------------------------------------------------
Alternative-cost policy
------------------------------------------------------------------------------*/

/// Cost charged for leaving an element unassigned. Every element always
/// keeps this option, so the resolved value must be finite and
/// non-negative, never "forbidden".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AlternativeCost {
    /// The same configured cost for every source and target.
    Constant(f64),
    /// `factor` times the largest finite pairwise cost in the top-left
    /// block (the Jaqaman et al. 2008 recipe, factor typically 1.05).
    FactorOfMax { factor: f64 },
}

impl AlternativeCost {
    fn resolve(&self, top_left: &SparseCostMatrix) -> Result<f64, LinkError> {
        let value = match *self {
            AlternativeCost::Constant(c) => c,
            AlternativeCost::FactorOfMax { factor } => {
                let max = top_left
                    .entries()
                    .map(|(_, _, cost)| cost)
                    .fold(f64::NEG_INFINITY, f64::max);
                if !max.is_finite() {
                    return Err(LinkError::NonFiniteAlternativeCost(
                        "FactorOfMax needs at least one finite pairwise cost"
                            .to_string(),
                    ));
                }
                factor * max
            }
        };
        if !value.is_finite() || value < 0.0 {
            return Err(LinkError::NonFiniteAlternativeCost(format!(
                "resolved to {}",
                value
            )));
        }
        Ok(value)
    }
}

/*------------------------------------------------------------------------------
Cost matrix assembly
------------------------------------------------------------------------------*/

/// The top-left block of real pairing costs plus the per-source and
/// per-target costs of staying unlinked.
#[derive(Debug, Clone)]
pub struct CostMatrixAssembly {
    pub top_left: SparseCostMatrix,
    pub alt_source: Vec<f64>,
    pub alt_target: Vec<f64>,
}

/// Evaluates the cost function on every (source, target) pair and stores
/// only the finite results. A source whose pairings are all gated out gets
/// an entirely absent row, which is valid: it will simply stay unlinked.
pub fn assemble<S, T, C>(
    sources: &[S],
    targets: &[T],
    cost_fn: &C,
    alternative: &AlternativeCost,
) -> Result<CostMatrixAssembly, LinkError>
where
    C: CostFunction<S, T> + ?Sized,
{
    if sources.is_empty() {
        return Err(LinkError::EmptyInput("source list".to_string()));
    }
    if targets.is_empty() {
        return Err(LinkError::EmptyInput("target list".to_string()));
    }

    let mut entries = Vec::new();
    for (i, source) in sources.iter().enumerate() {
        for (j, target) in targets.iter().enumerate() {
            if let Some(cost) = cost_fn.cost(source, target) {
                // A non-finite cost leaking through a cost function is a
                // gated pairing, never a comparable cost.
                if cost.is_finite() {
                    entries.push((i, j, cost));
                }
            }
        }
    }

    let top_left =
        SparseCostMatrix::from_entries(sources.len(), targets.len(), entries)?;
    let alt = alternative.resolve(&top_left)?;
    debug!(
        n_sources = sources.len(),
        n_targets = targets.len(),
        n_costs = top_left.n_entries(),
        alternative_cost = alt,
        "assembled top-left cost matrix"
    );

    Ok(CostMatrixAssembly {
        top_left,
        alt_source: vec![alt; sources.len()],
        alt_target: vec![alt; targets.len()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{DistanceCostConfig, FnCost, SquareDistanceCost};
    use crate::point::Point;
    use nearly_eq::assert_nearly_eq;

    fn points() -> (Vec<Point>, Vec<Point>) {
        let sources = vec![
            Point::new_2d(1, 0.0, 0.0, 0),
            Point::new_2d(2, 10.0, 10.0, 0),
        ];
        let targets = vec![
            Point::new_2d(3, 1.0, 1.0, 1),
            Point::new_2d(4, 9.0, 9.0, 1),
        ];
        (sources, targets)
    }

    #[test]
    fn test_gated_pairs_are_absent() {
        let (sources, targets) = points();
        let cost_fn = SquareDistanceCost::new(DistanceCostConfig {
            max_distance: 5.0,
        });
        let assembly = assemble(
            &sources,
            &targets,
            &cost_fn,
            &AlternativeCost::Constant(100.0),
        )
        .unwrap();
        assert_eq!(assembly.top_left.n_entries(), 2);
        assert_nearly_eq!(assembly.top_left.get(0, 0, f64::MAX), 2.0);
        assert_nearly_eq!(assembly.top_left.get(1, 1, f64::MAX), 2.0);
        assert_nearly_eq!(assembly.top_left.get(0, 1, -1.0), -1.0);
    }

    #[test]
    fn test_all_forbidden_row_is_valid() {
        let (sources, targets) = points();
        let forbid = FnCost(|_: &Point, _: &Point| -> Option<f64> { None });
        let assembly = assemble(
            &sources,
            &targets,
            &forbid,
            &AlternativeCost::Constant(1.0),
        )
        .unwrap();
        assert_eq!(assembly.top_left.n_entries(), 0);
        assert_eq!(assembly.alt_source, vec![1.0, 1.0]);
    }

    #[test]
    fn test_factor_of_max() {
        let (sources, targets) = points();
        let cost_fn = SquareDistanceCost::new(DistanceCostConfig {
            max_distance: 5.0,
        });
        let assembly = assemble(
            &sources,
            &targets,
            &cost_fn,
            &AlternativeCost::FactorOfMax { factor: 1.05 },
        )
        .unwrap();
        assert_nearly_eq!(assembly.alt_source[0], 2.0 * 1.05);
    }

    #[test]
    fn test_factor_of_max_with_empty_block_fails() {
        let (sources, targets) = points();
        let forbid = FnCost(|_: &Point, _: &Point| -> Option<f64> { None });
        let res = assemble(
            &sources,
            &targets,
            &forbid,
            &AlternativeCost::FactorOfMax { factor: 1.05 },
        );
        assert!(matches!(
            res,
            Err(LinkError::NonFiniteAlternativeCost(_))
        ));
    }

    #[test]
    fn test_invalid_constant_fails() {
        let (sources, targets) = points();
        let forbid = FnCost(|_: &Point, _: &Point| -> Option<f64> { None });
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let res = assemble(
                &sources,
                &targets,
                &forbid,
                &AlternativeCost::Constant(bad),
            );
            assert!(res.is_err());
        }
    }

    #[test]
    fn test_empty_lists_fail() {
        let (sources, _) = points();
        let forbid = FnCost(|_: &Point, _: &Point| -> Option<f64> { None });
        let none: Vec<Point> = vec![];
        assert!(matches!(
            assemble(&none, &sources, &forbid, &AlternativeCost::Constant(1.0)),
            Err(LinkError::EmptyInput(_))
        ));
        assert!(matches!(
            assemble(&sources, &none, &forbid, &AlternativeCost::Constant(1.0)),
            Err(LinkError::EmptyInput(_))
        ));
    }
}
