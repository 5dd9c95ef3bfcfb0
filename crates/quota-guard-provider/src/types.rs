//! Resource shapes returned by provider listings
//!
//! Only the attributes a checker routine reads are kept. Families whose members
//! are merely counted come back as plain identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a token-driven listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDomain {
    pub id: String,
    pub instance_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatGateway {
    pub id: String,
    pub address_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientVpnConnection {
    pub id: String,
    /// Status code as reported, e.g. `active`
    pub status: String,
}

impl ClientVpnConnection {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Side of a peering connection a VPC is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeeringRole {
    Accepter,
    Requester,
}

impl PeeringRole {
    /// EC2 filter name selecting connections by this side's VPC.
    pub fn filter_name(&self) -> &'static str {
        match self {
            PeeringRole::Accepter => "accepter-vpc-info.vpc-id",
            PeeringRole::Requester => "requester-vpc-info.vpc-id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: String,
    pub size_gib: u64,
    pub volume_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicLoadBalancer {
    pub name: String,
    pub instance_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub arn: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatapoint {
    pub timestamp: DateTime<Utc>,
    pub maximum: f64,
}

impl MetricDatapoint {
    /// Most recent sample of a series, if any.
    pub fn latest(datapoints: &[MetricDatapoint]) -> Option<&MetricDatapoint> {
        datapoints.iter().max_by_key(|point| point.timestamp)
    }
}
