//! Dispatcher driving the quota list across regions
//!
//! Every (descriptor, region) pair is one isolated invocation: errors and panics
//! raised by a checker are recorded in the [`RunSummary`] and the run moves on.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use quota_guard_core::{CheckerId, QuotaDescriptor};
use quota_guard_sinks::Notification;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::checker::{CheckContext, CheckRequest};
use crate::error::CheckError;
use crate::registry::CheckerRegistry;

/// Regions a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    pub regions: Vec<String>,
    /// Region non-regional quotas are checked in
    pub current: String,
}

impl RegionSet {
    pub fn new(regions: Vec<String>, current: impl Into<String>) -> Self {
        Self {
            regions,
            current: current.into(),
        }
    }

    /// Regions a descriptor is checked in, based on where its quota applies.
    pub fn for_descriptor(&self, descriptor: &QuotaDescriptor) -> Vec<String> {
        if descriptor.applied_at_level.is_regional() {
            self.regions.clone()
        } else {
            vec![self.current.clone()]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckStatus {
    Reported {
        usage_value: Decimal,
        limit_value: Decimal,
        threshold_crossed: bool,
        persisted: bool,
        notification: Notification,
    },
    NotImplemented,
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub checker_id: CheckerId,
    pub service_code: String,
    pub quota_code: String,
    pub region: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub reported: usize,
    pub crossed: usize,
    pub not_implemented: usize,
    pub failed: usize,
}

/// Everything a run did, one outcome per invocation in dispatch order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<CheckOutcome>,
    pub counters: RunCounters,
}

impl RunSummary {
    fn record(&mut self, outcome: CheckOutcome) {
        match &outcome.status {
            CheckStatus::Reported {
                threshold_crossed, ..
            } => {
                self.counters.reported += 1;
                if *threshold_crossed {
                    self.counters.crossed += 1;
                }
            }
            CheckStatus::NotImplemented => self.counters.not_implemented += 1,
            CheckStatus::Failed { .. } => self.counters.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

pub struct Dispatcher {
    registry: CheckerRegistry,
    context: CheckContext,
}

impl Dispatcher {
    pub fn new(registry: CheckerRegistry, context: CheckContext) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Run every descriptor, in order, in each region it applies to.
    pub async fn run(&self, descriptors: &[QuotaDescriptor], regions: &RegionSet) -> RunSummary {
        let mut summary = RunSummary::default();

        for descriptor in descriptors {
            let checker_id = descriptor.checker_id();
            let targets = regions.for_descriptor(descriptor);
            let checker = self.registry.get(&checker_id).await;

            for region in targets {
                let status = match &checker {
                    None => {
                        tracing::warn!(
                            checker_id = %checker_id,
                            quota_code = %descriptor.quota_code,
                            service_code = %descriptor.service_code,
                            region = %region,
                            "No checker registered for quota, skipping"
                        );
                        CheckStatus::NotImplemented
                    }
                    Some(checker) => {
                        let request = CheckRequest::new(descriptor, region.clone());
                        let run = AssertUnwindSafe(checker.run(&self.context, &request))
                            .catch_unwind()
                            .await;

                        match run.unwrap_or_else(|payload| {
                            Err(CheckError::Panicked(panic_message(payload)))
                        }) {
                            Ok(report) => CheckStatus::Reported {
                                usage_value: report.result.usage_value,
                                limit_value: report.result.limit_value,
                                threshold_crossed: report.result.threshold_crossed,
                                persisted: report.delivery.persisted,
                                notification: report.delivery.notification,
                            },
                            Err(e) => {
                                tracing::error!(
                                    checker_id = %checker_id,
                                    quota_code = %descriptor.quota_code,
                                    region = %region,
                                    error = %e,
                                    "Quota check failed"
                                );
                                CheckStatus::Failed {
                                    error: e.to_string(),
                                }
                            }
                        }
                    }
                };

                summary.record(CheckOutcome {
                    checker_id: checker_id.clone(),
                    service_code: descriptor.service_code.clone(),
                    quota_code: descriptor.quota_code.clone(),
                    region,
                    status,
                });
            }
        }

        tracing::info!(
            reported = summary.counters.reported,
            crossed = summary.counters.crossed,
            not_implemented = summary.counters.not_implemented,
            failed = summary.counters.failed,
            "Quota run complete"
        );

        summary
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
