pub mod branching;
pub mod distance;

pub use branching::{BranchCandidate, BranchingCost, BranchingCostConfig};
pub use distance::{DistanceCostConfig, SquareDistanceCost};

/*------------------------------------------------------------------------------
CostFunction trait
------------------------------------------------------------------------------*/

/// Cost of pairing one source with one target. `None` means the pairing is
/// gated out entirely, as opposed to merely expensive.
///
/// Implementations are pure: they read their inputs and their own
/// configuration only. Gates are evaluated before the numeric formula, and
/// a formula producing NaN or an infinity is reported as forbidden, never
/// as a comparable cost.
pub trait CostFunction<S, T> {
    fn cost(&self, source: &S, target: &T) -> Option<f64>;
}

/// Adapter turning a closure into a cost function, for one-off policies
/// in tests and small callers.
pub struct FnCost<F>(pub F);

impl<S, T, F> CostFunction<S, T> for FnCost<F>
where
    F: Fn(&S, &T) -> Option<f64>,
{
    fn cost(&self, source: &S, target: &T) -> Option<f64> {
        (self.0)(source, target)
    }
}
