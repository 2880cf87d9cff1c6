//! Aggregate pass/fail report and tabular rendering of summaries.

use std::fmt;

use serde::Serialize;

use super::analyzer::RotationSummary;

/// Feasibility counts over a set of rotation summaries.
///
/// Computed post-hoc from `&[RotationSummary]` so the counts always agree
/// with the rows they were derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasibilityReport {
    /// Number of summaries.
    pub rotation_count: usize,
    /// Rotations whose minimum SoC dropped below zero.
    pub below_zero: usize,
    /// Rotations that stayed at or above zero.
    pub at_or_above_zero: usize,
    /// Lowest minimum SoC seen, if any rotation was summarized.
    pub lowest_soc: Option<f64>,
}

impl FeasibilityReport {
    /// Counts `soc_below_zero` over all summaries.
    ///
    /// An empty slice yields zero counts.
    pub fn summarize(summaries: &[RotationSummary]) -> Self {
        let below_zero = summaries.iter().filter(|s| s.soc_below_zero).count();
        // a NaN minimum propagates
        let lowest_soc = summaries
            .iter()
            .map(|s| s.minimum_soc)
            .reduce(|a, b| if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) });

        Self {
            rotation_count: summaries.len(),
            below_zero,
            at_or_above_zero: summaries.len() - below_zero,
            lowest_soc,
        }
    }

    /// Count for one category of `soc_below_zero`.
    pub fn count(&self, soc_below_zero: bool) -> usize {
        if soc_below_zero {
            self.below_zero
        } else {
            self.at_or_above_zero
        }
    }

    /// Fraction of rotations below zero, `None` when there are no rotations.
    pub fn share_below_zero(&self) -> Option<f64> {
        if self.rotation_count == 0 {
            None
        } else {
            Some(self.below_zero as f64 / self.rotation_count as f64)
        }
    }

    /// `true` if no rotation runs out of charge.
    pub fn all_feasible(&self) -> bool {
        self.below_zero == 0
    }
}

/// Free-function form of [`FeasibilityReport::summarize`].
pub fn summarize(summaries: &[RotationSummary]) -> FeasibilityReport {
    FeasibilityReport::summarize(summaries)
}

impl fmt::Display for FeasibilityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Feasibility Report ---")?;
        writeln!(f, "Rotations:             {}", self.rotation_count)?;
        writeln!(f, "SoC below zero:        {}", self.below_zero)?;
        writeln!(f, "SoC at or above zero:  {}", self.at_or_above_zero)?;
        match self.share_below_zero() {
            Some(share) => writeln!(f, "Infeasible share:      {:.1}%", share * 100.0)?,
            None => writeln!(f, "Infeasible share:      n/a")?,
        }
        match self.lowest_soc {
            Some(soc) => write!(f, "Lowest SoC:            {soc:.4}"),
            None => write!(f, "Lowest SoC:            n/a"),
        }
    }
}

/// Aligned text table of summaries, one row per rotation.
pub struct SummaryTable<'a>(pub &'a [RotationSummary]);

impl fmt::Display for SummaryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depot_width = self
            .0
            .iter()
            .map(|s| s.originating_depot_name.chars().count())
            .max()
            .unwrap_or(0)
            .max("depot".len());
        let name_width = self
            .0
            .iter()
            .map(|s| s.rotation_name.chars().count())
            .max()
            .unwrap_or(0)
            .max("rotation".len());

        writeln!(
            f,
            "{:>8}  {:<name_width$}  {:<depot_width$}  {:>10}  {:>8}  below_zero",
            "id", "rotation", "depot", "km", "min_soc"
        )?;
        for s in self.0 {
            writeln!(
                f,
                "{:>8}  {:<name_width$}  {:<depot_width$}  {:>10.1}  {:>8.3}  {}",
                s.rotation_id,
                s.rotation_name,
                s.originating_depot_name,
                s.total_distance / 1000.0,
                s.minimum_soc,
                s.soc_below_zero
            )?;
        }
        Ok(())
    }
}
