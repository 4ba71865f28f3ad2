pub mod handlers;
pub mod heuristics;
pub mod report;
pub mod scorer;
