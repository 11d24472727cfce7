//! Debugger session plumbing
//!
//! Everything between the numeric core and a display layer:
//!
//! - [`session`]: explicit state plus a reducer; the display layer renders
//!   snapshots and dispatches [`Action`]s
//! - [`analysis`]: request/response contract for analyzers and a local
//!   analyzer that explains mismatches
//! - [`fixtures`]: tables and sources a fresh session starts from

pub mod analysis;
pub mod fixtures;
pub mod session;

pub use analysis::{spawn_analysis, AnalysisRequest, Analyzer, Block, Suggestion, TableAnalyzer};
pub use session::{
    Action, AnalysisState, MatchStatus, Notice, Preview, Session, Severity, SourceBuffer,
};
