pub mod bruteforce;
pub mod csr;
pub mod cycle_result;
pub mod graph;
pub mod limits;
pub mod subnetwork;
pub mod tarjan;
pub mod traits;

pub use bruteforce::BruteForceFinder;
pub use csr::SuccessorIndex;
pub use cycle_result::CycleResult;
pub use graph::{GraphStats, TransactionGraph};
pub use limits::SearchLimits;
pub use subnetwork::{Subnetwork, group_subnetworks};
pub use tarjan::{TarjanFinder, strongly_connected_components};
pub use traits::{CycleFinder, Detection};
