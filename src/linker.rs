use std::collections::HashMap;
use std::fmt::Display;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::augment::augment;
use crate::cost::CostFunction;
use crate::cost_matrix::{assemble, AlternativeCost};
use crate::error::LinkError;
use crate::logger::{NullLogger, ProgressLogger};
use crate::solver::solve_sparse;

/*------------------------------------------------------------------------------
JaqamanLinker
------------------------------------------------------------------------------*/

/// Links two object lists with the LAP framework of Jaqaman et al.,
/// Nature Methods, 2008: assemble the sparse pairwise cost block, augment
/// it with per-element unlink alternatives, solve the square matrix and
/// keep only the genuine source-to-target pairs.
///
/// One linker handles one pairing problem and holds no state across
/// problems; independent linkers may run concurrently.
pub struct JaqamanLinker<S, T, C>
where
    C: CostFunction<S, T>,
{
    sources: Vec<S>,
    targets: Vec<T>,
    cost_fn: C,
    alternative: AlternativeCost,
    logger: Box<dyn ProgressLogger>,

    assignments: Option<HashMap<usize, usize>>,
    costs: Option<HashMap<usize, f64>>,
    processing_time: Option<Duration>,
    error_message: Option<String>,
}

impl<S, T, C> JaqamanLinker<S, T, C>
where
    C: CostFunction<S, T>,
{
    pub fn new(
        sources: Vec<S>,
        targets: Vec<T>,
        cost_fn: C,
        alternative: AlternativeCost,
    ) -> Self {
        Self::with_logger(
            sources,
            targets,
            cost_fn,
            alternative,
            Box::new(NullLogger),
        )
    }

    pub fn with_logger(
        sources: Vec<S>,
        targets: Vec<T>,
        cost_fn: C,
        alternative: AlternativeCost,
        logger: Box<dyn ProgressLogger>,
    ) -> Self {
        Self {
            sources,
            targets,
            cost_fn,
            alternative,
            logger,
            assignments: None,
            costs: None,
            processing_time: None,
            error_message: None,
        }
    }

    /// Runs assembly, augmentation and the solve. On failure the linker
    /// stays in a terminal failed state: the message is retrievable with
    /// [`JaqamanLinker::error_message`] and no partial result is exposed.
    pub fn process(&mut self) -> Result<(), LinkError> {
        let start = Instant::now();
        match self.run() {
            Ok((assignments, costs)) => {
                debug!(n_links = assignments.len(), "linking done");
                self.assignments = Some(assignments);
                self.costs = Some(costs);
                self.processing_time = Some(start.elapsed());
                self.error_message = None;
                Ok(())
            }
            Err(err) => {
                self.assignments = None;
                self.costs = None;
                self.processing_time = None;
                self.error_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn run(
        &self,
    ) -> Result<(HashMap<usize, usize>, HashMap<usize, f64>), LinkError> {
        self.logger.status("Creating the main cost matrix...");
        let assembly = assemble(
            &self.sources,
            &self.targets,
            &self.cost_fn,
            &self.alternative,
        )?;
        self.logger.progress(0.5);

        self.logger.status("Completing the cost matrix...");
        let full = augment(&assembly)?;
        self.logger.progress(0.6);

        self.logger.status("Solving the cost matrix...");
        let solution = solve_sparse(&full)?;

        // Rows beyond the source count and columns beyond the target
        // count are the synthetic unlink alternatives; only pairs inside
        // the top-left block are genuine links.
        let n_sources = self.sources.len();
        let n_targets = self.targets.len();
        let mut assignments = HashMap::new();
        let mut costs = HashMap::new();
        for (i, &j) in solution.row_to_col.iter().enumerate().take(n_sources) {
            if j < n_targets {
                assignments.insert(i, j);
                costs.insert(i, full.get(i, j, f64::INFINITY));
            }
        }

        self.logger.progress(1.0);
        self.logger.status("");
        Ok((assignments, costs))
    }

    /// Source index to target index, for the genuine links only.
    pub fn result(&self) -> Result<&HashMap<usize, usize>, LinkError> {
        self.assignments.as_ref().ok_or(LinkError::NotProcessed)
    }

    /// Source index to realized link cost.
    pub fn assignment_costs(&self) -> Result<&HashMap<usize, f64>, LinkError> {
        self.costs.as_ref().ok_or(LinkError::NotProcessed)
    }

    pub fn processing_time(&self) -> Option<Duration> {
        self.processing_time
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    pub fn targets(&self) -> &[T] {
        &self.targets
    }
}

impl<S, T, C> JaqamanLinker<S, T, C>
where
    S: Display,
    T: Display,
    C: CostFunction<S, T>,
{
    /// Human-readable listing of the links and of the elements left
    /// unassigned on either side.
    pub fn result_to_string(&self) -> String {
        let (assignments, costs) = match (&self.assignments, &self.costs) {
            (Some(a), Some(c)) => (a, c),
            _ => {
                return "Not solved yet. Process the algorithm prior to \
                        calling this method."
                    .to_string()
            }
        };

        let mut out = format!("Found {} assignments:\n", assignments.len());
        let mut linked_sources = vec![false; self.sources.len()];
        let mut linked_targets = vec![false; self.targets.len()];

        let mut pairs = assignments.iter().collect::<Vec<_>>();
        pairs.sort();
        for (&i, &j) in pairs {
            linked_sources[i] = true;
            linked_targets[j] = true;
            out.push_str(&format!(
                "{} -> {}, cost = {:.1}\n",
                self.sources[i], self.targets[j], costs[&i]
            ));
        }

        let unassigned_sources = linked_sources
            .iter()
            .enumerate()
            .filter(|(_, &linked)| !linked)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if !unassigned_sources.is_empty() {
            out.push_str(&format!(
                "Found {} unassigned sources:\n",
                unassigned_sources.len()
            ));
            for i in unassigned_sources {
                out.push_str(&format!("{} -> none\n", self.sources[i]));
            }
        }

        let unassigned_targets = linked_targets
            .iter()
            .enumerate()
            .filter(|(_, &linked)| !linked)
            .map(|(j, _)| j)
            .collect::<Vec<_>>();
        if !unassigned_targets.is_empty() {
            out.push_str(&format!(
                "Found {} unassigned targets:\n",
                unassigned_targets.len()
            ));
            for j in unassigned_targets {
                out.push_str(&format!("none -> {}\n", self.targets[j]));
            }
        }

        out
    }
}
