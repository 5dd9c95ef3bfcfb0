use std::path::PathBuf;

use quota_guard_checkers::CheckStatus;
use quota_guard_cli::execute;
use quota_guard_core::Config;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn config(csv_path: &std::path::Path) -> Config {
    let quota_list = fixture("quota_list.json");
    let csv_path = csv_path.to_path_buf();
    Config::from_lookup(move |name| match name {
        "AWS_REGION" => Some("us-east-1".to_string()),
        "REGION_LIST" => Some("us-east-1, eu-west-1".to_string()),
        "QUOTA_LIST_PATH" => Some(quota_list.display().to_string()),
        "USAGE_SINK" => Some("csv".to_string()),
        "QUOTA_CSV_PATH" => Some(csv_path.display().to_string()),
        "MAX_NESTED_CALLS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn fixture_run_writes_one_row_per_quota_and_region() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("usage.csv");
    let config = config(&csv_path);
    config.validate().unwrap();

    let summary = execute(&config, Some(&fixture("provider.json")))
        .await
        .unwrap();

    // 12 regional checkers in 2 regions, 3 global ones once, 1 unknown quota in 2 regions
    assert_eq!(summary.counters.reported, 27);
    assert_eq!(summary.counters.not_implemented, 2);
    assert_eq!(summary.counters.failed, 0);

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "QuotaCode,ServiceCode,Region,LimitValue,UsageValue,ResourceList,Timestamp"
    );
    assert_eq!(lines.count(), 27);
}

#[tokio::test]
async fn fixture_run_flags_crossed_quotas() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir.path().join("usage.csv"));

    let summary = execute(&config, Some(&fixture("provider.json")))
        .await
        .unwrap();

    let crossed: Vec<(&str, &str)> = summary
        .outcomes
        .iter()
        .filter(|outcome| {
            matches!(
                outcome.status,
                CheckStatus::Reported {
                    threshold_crossed: true,
                    ..
                }
            )
        })
        .map(|outcome| (outcome.quota_code.as_str(), outcome.region.as_str()))
        .collect();

    // search domain 18/20, NAT gateway 7/8, egress-only gateways 5/5
    assert_eq!(
        crossed,
        vec![
            ("L-6408ABDE", "us-east-1"),
            ("L-6408ABDE", "eu-west-1"),
            ("L-DFA99DE7", "us-east-1"),
            ("L-DFA99DE7", "eu-west-1"),
            ("L-45FE3B85", "us-east-1"),
            ("L-45FE3B85", "eu-west-1"),
        ]
    );
}

#[tokio::test]
async fn missing_quota_list_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir.path().join("usage.csv"));
    config.quota_list = Some(quota_guard_core::QuotaListSource::File(
        dir.path().join("absent.json"),
    ));

    let result = execute(&config, Some(&fixture("provider.json"))).await;
    assert!(result.is_err());
    assert!(!dir.path().join("usage.csv").exists());
}
