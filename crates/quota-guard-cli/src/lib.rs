//! quota-guard command line support
//!
//! Loading the quota list, wiring provider, sink and dispatcher together, and
//! the response returned to scheduled invocations.

pub mod invocation;
pub mod quota_list;
pub mod runner;

pub use invocation::InvocationResponse;
pub use quota_list::load_quota_list;
pub use runner::{build_provider, execute};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "quota_guard=info";

/// Initialize tracing for the binary. `LOG_FORMAT=json` selects JSON output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}
