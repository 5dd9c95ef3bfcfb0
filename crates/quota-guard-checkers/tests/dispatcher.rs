mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{dec, Harness, REGION};
use quota_guard_checkers::{
    CheckContext, CheckRequest, CheckResult, CheckStatus, CheckerRegistry, Dispatcher,
    QuotaChecker, RegionSet, UsageShape,
};
use quota_guard_core::{parse_descriptors, QuotaCheckResult, ThresholdRule};
use rust_decimal::Decimal;
use serde_json::json;

const REGIONS: [&str; 3] = ["us-east-1", "eu-west-1", "ap-south-1"];

fn regions() -> RegionSet {
    RegionSet::new(REGIONS.iter().map(|r| r.to_string()).collect(), REGION)
}

fn fixture() -> serde_json::Value {
    json!({
        "quotas": [
            {"service_code": "vpc", "quota_code": "L-DF5E4CA3", "value": 5000},
            {"service_code": "iam", "quota_code": "L-BF35879D", "value": 20},
            {"service_code": "s3", "quota_code": "L-DC2B2D3D", "value": 100}
        ],
        "network_interfaces": ["eni-1", "eni-2"],
        "server_certificates": ["cert-1"],
        "buckets": ["bucket-1"]
    })
}

async fn dispatcher(harness: &Harness) -> Dispatcher {
    Dispatcher::new(CheckerRegistry::builtin().await, harness.ctx.clone())
}

#[tokio::test]
async fn regional_quota_runs_once_per_region() {
    let harness = Harness::new(fixture());
    let descriptors = parse_descriptors(
        br#"[{"ServiceCode": "vpc", "QuotaCode": "L-DF5E4CA3", "Threshold": 80, "QuotaAppliedAtLevel": "Regional"}]"#,
    )
    .unwrap();

    let summary = dispatcher(&harness).await.run(&descriptors, &regions()).await;

    let visited: Vec<&str> = summary
        .outcomes
        .iter()
        .map(|outcome| outcome.region.as_str())
        .collect();
    assert_eq!(visited, REGIONS);
    assert_eq!(summary.counters.reported, 3);
    assert_eq!(
        harness.calls_to("describe_network_interfaces"),
        REGIONS
            .iter()
            .map(|region| format!("describe_network_interfaces@{region}"))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn global_quota_runs_in_current_region_only() {
    let harness = Harness::new(fixture());
    let descriptors = parse_descriptors(
        br#"[
            {"ServiceCode": "iam", "QuotaCode": "L-BF35879D", "Threshold": 80, "QuotaAppliedAtLevel": "Global"},
            {"ServiceCode": "s3", "QuotaCode": "L-DC2B2D3D", "Threshold": 80, "QuotaAppliedAtLevel": "Account"}
        ]"#,
    )
    .unwrap();
    let regions = RegionSet::new(
        REGIONS.iter().map(|r| r.to_string()).collect(),
        "eu-west-1",
    );

    let summary = dispatcher(&harness).await.run(&descriptors, &regions).await;

    assert_eq!(summary.outcomes.len(), 2);
    assert!(summary
        .outcomes
        .iter()
        .all(|outcome| outcome.region == "eu-west-1"));
    assert_eq!(
        harness.calls_to("list_server_certificates"),
        vec!["list_server_certificates@eu-west-1"]
    );
    assert_eq!(harness.calls_to("list_buckets"), vec!["list_buckets@eu-west-1"]);
}

#[tokio::test]
async fn unregistered_quota_is_not_implemented() {
    let harness = Harness::new(fixture());
    let descriptors = parse_descriptors(
        br#"[
            {"ServiceCode": "ec2", "QuotaCode": "L-1216C47A", "Threshold": 80, "QuotaAppliedAtLevel": "Regional"},
            {"ServiceCode": "iam", "QuotaCode": "L-BF35879D", "Threshold": 80, "QuotaAppliedAtLevel": "Global"}
        ]"#,
    )
    .unwrap();

    let summary = dispatcher(&harness).await.run(&descriptors, &regions()).await;

    assert_eq!(summary.counters.not_implemented, 3);
    assert_eq!(summary.counters.reported, 1);
    assert_eq!(summary.counters.failed, 0);
    assert_eq!(summary.outcomes[0].checker_id.as_str(), "L_1216C47A");
    assert_eq!(summary.outcomes[0].status, CheckStatus::NotImplemented);
}

#[tokio::test]
async fn failing_region_does_not_stop_the_run() {
    let data: quota_guard_provider::FixtureData = serde_json::from_value(fixture()).unwrap();
    let provider = quota_guard_provider::FixtureProvider::new(data)
        .with_failure("describe_network_interfaces");
    let harness = Harness::from_provider(provider);
    let descriptors = parse_descriptors(
        br#"[
            {"ServiceCode": "vpc", "QuotaCode": "L-DF5E4CA3", "Threshold": 80, "QuotaAppliedAtLevel": "Regional"},
            {"ServiceCode": "s3", "QuotaCode": "L-DC2B2D3D", "Threshold": 80, "QuotaAppliedAtLevel": "Global"}
        ]"#,
    )
    .unwrap();

    let summary = dispatcher(&harness).await.run(&descriptors, &regions()).await;

    assert_eq!(summary.counters.failed, 3);
    assert_eq!(summary.counters.reported, 1);
    assert!(matches!(
        summary.outcomes[3].status,
        CheckStatus::Reported { persisted: true, .. }
    ));
    assert_eq!(harness.store.len().await, 1);
}

#[derive(Debug)]
struct PanickingChecker;

#[async_trait]
impl QuotaChecker for PanickingChecker {
    fn quota_code(&self) -> &'static str {
        "L-DF5E4CA3"
    }

    fn service_code(&self) -> &'static str {
        "vpc"
    }

    fn description(&self) -> &'static str {
        "Always panics"
    }

    fn threshold_rule(&self) -> ThresholdRule {
        ThresholdRule::PERCENT_ABOVE
    }

    fn shape(&self) -> UsageShape {
        UsageShape::GlobalScalar
    }

    async fn measure(
        &self,
        _ctx: &CheckContext,
        request: &CheckRequest,
        _limit: Decimal,
    ) -> CheckResult<QuotaCheckResult> {
        panic!("measurement exploded in {}", request.region)
    }
}

#[tokio::test]
async fn panicking_checker_is_recorded_as_failure() {
    let harness = Harness::new(fixture());
    let registry = CheckerRegistry::builtin().await;
    registry.register(Arc::new(PanickingChecker)).await;
    let dispatcher = Dispatcher::new(registry, harness.ctx.clone());

    let descriptors = parse_descriptors(
        br#"[
            {"ServiceCode": "vpc", "QuotaCode": "L-DF5E4CA3", "Threshold": 80, "QuotaAppliedAtLevel": "Global"},
            {"ServiceCode": "iam", "QuotaCode": "L-BF35879D", "Threshold": 80, "QuotaAppliedAtLevel": "Global"}
        ]"#,
    )
    .unwrap();

    let summary = dispatcher.run(&descriptors, &regions()).await;

    match &summary.outcomes[0].status {
        CheckStatus::Failed { error } => assert!(error.contains("measurement exploded in us-east-1")),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(matches!(
        summary.outcomes[1].status,
        CheckStatus::Reported { .. }
    ));
}

#[tokio::test]
async fn summary_serializes_for_output() {
    let harness = Harness::new(fixture());
    let descriptors = parse_descriptors(
        br#"[{"ServiceCode": "s3", "QuotaCode": "L-DC2B2D3D", "Threshold": 5, "QuotaAppliedAtLevel": "Global"}]"#,
    )
    .unwrap();

    let summary = dispatcher(&harness).await.run(&descriptors, &regions()).await;
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["counters"]["reported"], 1);
    assert_eq!(json["counters"]["crossed"], 0);
    assert_eq!(json["outcomes"][0]["outcome"], "reported");
    assert_eq!(json["outcomes"][0]["notification"]["status"], "not_required");
    assert_eq!(summary.outcomes[0].status, CheckStatus::Reported {
        usage_value: dec("1"),
        limit_value: dec("100"),
        threshold_crossed: false,
        persisted: true,
        notification: quota_guard_sinks::Notification::NotRequired,
    });
}
