//! quota-guard checkers
//!
//! The quota lookup client, the checker routine contract, usage aggregation,
//! the built-in checker routines and the dispatcher that drives them.

pub mod aggregate;
pub mod checker;
pub mod checkers;
pub mod dispatcher;
pub mod enumerate;
pub mod error;
pub mod lookup;
pub mod registry;

pub use aggregate::{global_scalar, PerResourceMax};
pub use checker::{
    CheckContext, CheckReport, CheckRequest, CheckSettings, CheckerInfo, QuotaChecker, UsageShape,
};
pub use dispatcher::{CheckOutcome, CheckStatus, Dispatcher, RegionSet, RunCounters, RunSummary};
pub use enumerate::{count, fan_out};
pub use error::{CheckError, CheckResult};
pub use lookup::QuotaLookup;
pub use registry::CheckerRegistry;
