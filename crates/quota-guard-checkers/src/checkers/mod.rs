//! Built-in checker routines, one per supported quota code

pub mod ebs;
pub mod ec2;
pub mod elb;
pub mod es;
pub mod iam;
pub mod s3;
pub mod vpc;

use std::sync::Arc;

use crate::checker::QuotaChecker;

pub use ebs::Gp2Storage;
pub use ec2::{ClientVpnConnections, TransitGatewayRouteTables};
pub use elb::LoadBalancerInstances;
pub use es::SearchDomainInstances;
pub use iam::{RolePolicies, ServerCertificates};
pub use s3::Buckets;
pub use vpc::{
    EgressOnlyGateways, GatewayEndpoints, NatGatewayAddresses, NetworkAddressUsage,
    NetworkInterfaces, PeeringConnections, SubnetsPerVpc,
};

/// Every checker shipped with quota-guard.
pub fn builtin() -> Vec<Arc<dyn QuotaChecker>> {
    vec![
        Arc::new(SearchDomainInstances),
        Arc::new(NetworkAddressUsage),
        Arc::new(NatGatewayAddresses),
        Arc::new(ClientVpnConnections),
        Arc::new(PeeringConnections),
        Arc::new(SubnetsPerVpc),
        Arc::new(NetworkInterfaces),
        Arc::new(Gp2Storage),
        Arc::new(LoadBalancerInstances),
        Arc::new(TransitGatewayRouteTables),
        Arc::new(GatewayEndpoints),
        Arc::new(EgressOnlyGateways),
        Arc::new(Buckets),
        Arc::new(RolePolicies),
        Arc::new(ServerCertificates),
    ]
}
