pub mod matchup;
pub mod search;

pub use matchup::resolve_remote;
pub use search::{find_candidates, find_candidates_with, CancelFlag, SearchOptions, SearchReport};
