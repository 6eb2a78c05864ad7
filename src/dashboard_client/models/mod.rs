mod rank;
mod status;

pub use rank::{rank_entries, RankEntry};
pub use status::{Period, SeriesTotals, StatusDelta, TotalsDelta, UserAgentCount};
