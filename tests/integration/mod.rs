//! The directory core driven end to end through its public facade.

pub mod end_to_end;
