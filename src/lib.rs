//! Bridge between stellar parameter arrays and the `bolometric-corrections`
//! Fortran toolkit.
//!
//! The toolkit is an opaque, pre-compiled executable that computes
//! bolometric corrections for named photometric filters. It talks through
//! files at fixed paths under its installation root: a column-addressed
//! selection file choosing the active filters, a whitespace-delimited input
//! file of star parameters, and a fixed-schema results file. This crate owns
//! those formats and the invocation contract; it does not implement any of
//! the astrophysics.
//!
//! ```no_run
//! use astro_bolometric::{BoloBridge, BoloConfig};
//!
//! # fn main() -> astro_bolometric::BoloResult<()> {
//! let config = BoloConfig::from_env()?; // or BoloConfig::new("/opt/bolometric")
//! let bridge = BoloBridge::new(config)?;
//!
//! let results = bridge.compute(
//!     "jhk",
//!     &["S1"],
//!     &[4.4],
//!     &[-0.2],
//!     &[5700.0],
//!     &[0.1],
//! )?;
//! for record in &results.records {
//!     println!("{}: {:?}", record.id, record.bc);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Every operation is synchronous and blocks the calling thread. The toolkit
//! files are shared mutable state; nothing here locks them, so concurrent
//! callers on the same root are undefined.

pub mod bridge;
pub mod codec;
pub mod config;
pub mod errors;
pub mod input;
pub mod output;
pub mod process;
pub mod registry;
pub mod selection;

pub use bridge::{BoloBridge, BoloBridgeBuilder};
pub use config::{BoloConfig, ToolkitFlavor, ENV_ROOT};
pub use errors::{BoloError, BoloResult};
pub use input::StarRecord;
pub use output::{BcResults, OutputRecord, OutputSchema, BC_SLOTS};
pub use process::{InvokeOptions, ProcessOutput, WorkingDirGuard};
pub use registry::{FilterSet, Registry};
pub use selection::{SelectionFile, DEFAULT_IALF};
