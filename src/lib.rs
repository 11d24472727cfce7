//! # zetascope
//!
//! Tools for debugging NTT twiddle-factor ("zeta") tables of Kyber-style
//! lattice schemes:
//!
//! - **Montgomery reduction**: 16-bit reducer with the exact wraparound of
//!   the fixed-width reference code
//! - **Twiddle generation**: bit-reversed root-of-unity tables, checked
//!   against a brute-force reference
//! - **Comparison**: index-by-index diff of two tables
//! - **Session**: reducer-style state for an interactive debugger front end
//!
//! ## Modules
//!
//! - [`ntt`]: parameters, reduction, twiddle tables
//! - [`compare`]: table diffing and chart series
//! - [`debugger`]: session state, analysis contract, fixtures
//! - [`task`]: cancellable single-shot background jobs
//! - [`config`]: session configuration
//! - [`error`]: error type
//!
//! ```
//! use zetascope::ntt::{generate_zetas, ML_KEM};
//! use zetascope::compare::compare_tables;
//!
//! let table = generate_zetas(&ML_KEM).unwrap();
//! let mont = table.montgomery_form();
//! assert_eq!(&mont[..4], &[2285, 2571, 2970, 1812]);
//!
//! let diff = compare_tables(&mont, &mont).unwrap();
//! assert!(diff.is_match());
//! ```

pub mod compare;
pub mod config;
pub mod debugger;
pub mod error;
pub mod ntt;
pub mod task;

// Re-export commonly used types
pub use compare::{compare_tables, ChartSeries, Comparison, Mismatch};
pub use config::DebuggerConfig;
pub use debugger::{Action, Session};
pub use error::{Result, ZetaError};
pub use ntt::{
    bit_reverse, generate_zetas, montgomery_reduce, ModulusParams, TwiddleTable, KYBER_256, ML_KEM,
};
pub use task::{CancelToken, TaskHandle};
