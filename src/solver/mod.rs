pub mod edgeless;
pub mod enumerate;
pub mod explicit;
pub mod merge;

pub use edgeless::{EdgelessSolver, EdgelessStats};
pub use enumerate::{enumerate_canonical, valid_codes, Enumeration, SharedVisited, ValidCodes};
pub use explicit::{ExplicitSolver, SolveStats, StateInfo};
pub use merge::{merge_tables, MergeStats};
