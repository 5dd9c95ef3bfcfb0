//! quota-guard provider
//!
//! Everything the checker routines need from the cloud: quota limits, paginated
//! resource listings and metric samples, behind the [`CloudProvider`] trait.
//!
//! # Backends
//!
//! - [`AwsProvider`] (feature `aws`): live calls through the AWS SDK
//! - [`FixtureProvider`]: canned JSON responses, used for dry runs and tests

#[cfg(feature = "aws")]
pub mod aws;
pub mod error;
pub mod fixture;
pub mod pagination;
pub mod provider;
pub mod types;

#[cfg(feature = "aws")]
pub use aws::AwsProvider;
pub use error::{ProviderError, ProviderResult};
pub use fixture::{FixtureData, FixtureProvider};
pub use pagination::paginate;
pub use provider::CloudProvider;
pub use types::{
    ClassicLoadBalancer, ClientVpnConnection, LoadBalancer, MetricDatapoint, NatGateway, Page,
    PeeringRole, Role, SearchDomain, Volume,
};
