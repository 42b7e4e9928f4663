use std::fmt;
use std::time::Duration;

use common::types::{Account, FraudCycle};
use fraud_ring_core::{GraphStats, Subnetwork, group_subnetworks};

use super::searcher::FinderReport;

const RULE: &str = "-----------------------------------------";
const BANNER: &str = "=========================================";

/// Console report for one detection run.
///
/// Lists graph statistics, then for each finder its run time, cycle count
/// and the first `max_cycles_shown` cycles in lexicographic order. The
/// Tarjan result is additionally broken down into subnetworks, and a closing
/// summary compares the two finders.
pub struct Report<'a> {
    pub stats: GraphStats,
    pub accounts: &'a [Account],
    pub brute_force: &'a FinderReport,
    pub tarjan: &'a FinderReport,
    pub max_cycles_shown: usize,
}

fn sorted_cycles<'c, I>(cycles: I) -> Vec<&'c FraudCycle>
where
    I: IntoIterator<Item = &'c FraudCycle>,
{
    let mut sorted: Vec<&FraudCycle> = cycles.into_iter().collect();
    sorted.sort_by(|a, b| a.nodes().cmp(b.nodes()));
    sorted
}

/// Brute-force run time over Tarjan run time, or `0.0` when the Tarjan run
/// was too fast to measure.
pub fn speedup(brute_force: Duration, tarjan: Duration) -> f64 {
    if tarjan.is_zero() {
        return 0.0;
    }
    brute_force.as_secs_f64() / tarjan.as_secs_f64()
}

impl Report<'_> {
    fn write_finder_header(
        &self,
        f: &mut fmt::Formatter,
        title: &str,
        run: &FinderReport,
    ) -> fmt::Result {
        let stats = &run.detection.stats;

        writeln!(f)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, " {}", title)?;
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "Time: {:.3} ms",
            stats.execution_time.as_secs_f64() * 1_000.0
        )?;
        write!(f, "Cycles Found: {}", stats.cycles_found)?;
        if stats.budget_exhausted {
            write!(f, " (search stopped early; count is a lower bound)")?;
        }
        writeln!(f)
    }

    fn write_brute_force(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_finder_header(f, "Brute Force Cycle Detection", self.brute_force)?;

        let cycles = sorted_cycles(&self.brute_force.detection.cycles);
        let limit = cycles.len().min(self.max_cycles_shown);

        writeln!(f)?;
        writeln!(f, "Showing first {} cycles:", limit)?;
        writeln!(f)?;
        for cycle in &cycles[..limit] {
            writeln!(f, "{}", cycle)?;
        }
        if cycles.len() > limit {
            writeln!(f, "... ({} more not shown)", cycles.len() - limit)?;
        }
        Ok(())
    }

    fn write_tarjan(&self, f: &mut fmt::Formatter, subnetworks: &[Subnetwork<'_>]) -> fmt::Result {
        self.write_finder_header(f, "Tarjan SCC Cycle Detection", self.tarjan)?;

        writeln!(f)?;
        writeln!(f, "Identified Fraud Subnetworks: {}", subnetworks.len())?;
        writeln!(f, "{}", RULE)?;

        for (i, subnetwork) in subnetworks.iter().enumerate() {
            let label = self
                .accounts
                .get(subnetwork.root)
                .map_or("unknown", Account::label);

            writeln!(f)?;
            writeln!(f, "Subnetwork #{}", i + 1)?;
            writeln!(f, "Root Node: {} ({})", subnetwork.root, label)?;
            writeln!(f, "Cycles in SCC:")?;
            for cycle in sorted_cycles(subnetwork.cycles.iter().copied()) {
                writeln!(f, "  {}", cycle)?;
            }
        }
        Ok(())
    }

    fn write_summary(&self, f: &mut fmt::Formatter, num_subnetworks: usize) -> fmt::Result {
        let brute_force = &self.brute_force.detection.stats;
        let tarjan = &self.tarjan.detection.stats;

        writeln!(f)?;
        writeln!(f, "{}", BANNER)?;
        writeln!(f, " Summary")?;
        writeln!(f, "{}", BANNER)?;
        writeln!(f, "Brute Force Cycles: {}", brute_force.cycles_found)?;
        writeln!(f, "Tarjan Cycles:      {}", tarjan.cycles_found)?;
        writeln!(f, "Subnetworks:        {}", num_subnetworks)?;
        writeln!(
            f,
            "Speedup (BF/TJ): {:.2}x",
            speedup(brute_force.execution_time, tarjan.execution_time)
        )
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "=== Graph Statistics ===")?;
        writeln!(f, "Total Users: {}", self.stats.num_accounts)?;
        writeln!(f, "Total Transactions: {}", self.stats.num_transactions)?;
        writeln!(f, "Total Edges: {}", self.stats.num_edges)?;
        writeln!(f, "Edge Density: {:.4}", self.stats.edge_density)?;

        let subnetworks = group_subnetworks(&self.tarjan.detection.cycles);

        self.write_brute_force(f)?;
        self.write_tarjan(f, &subnetworks)?;
        self.write_summary(f, subnetworks.len())
    }
}
