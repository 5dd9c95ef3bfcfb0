use std::io::Write;

use futures::TryStreamExt;
use quota_guard_provider::{paginate, CloudProvider, FixtureProvider, PeeringRole};

const FIXTURE: &str = r#"{
    "page_size": 1,
    "vpcs": ["vpc-a", "vpc-b"],
    "vpc_peering_connections": [
        {"id": "pcx-1", "accepter_vpc_id": "vpc-a", "requester_vpc_id": "vpc-b"},
        {"id": "pcx-2", "accepter_vpc_id": "vpc-c", "requester_vpc_id": "vpc-a"}
    ],
    "roles": [
        {"name": "deployer", "arn": "arn:aws:iam::123456789012:role/deployer"}
    ],
    "attached_role_policies": {
        "deployer": ["arn:aws:iam::aws:policy/ReadOnlyAccess", "arn:aws:iam::aws:policy/AmazonS3FullAccess"]
    }
}"#;

#[tokio::test]
async fn loads_fixture_from_file_and_paginates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();

    let provider = FixtureProvider::from_file(file.path()).await.unwrap();
    assert_eq!(provider.name(), "fixture");

    let vpcs: Vec<String> = paginate(|token| provider.vpcs("us-west-2", token))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(vpcs, vec!["vpc-a", "vpc-b"]);

    let policies: Vec<String> =
        paginate(|token| provider.attached_role_policies("us-west-2", "deployer", token))
            .try_collect()
            .await
            .unwrap();
    assert_eq!(policies.len(), 2);
}

#[tokio::test]
async fn peering_connections_match_either_side() {
    let provider = FixtureProvider::from_json(FIXTURE.as_bytes()).unwrap();

    let accepted: Vec<String> = paginate(|token| {
        provider.vpc_peering_connections("us-east-1", "vpc-a", PeeringRole::Accepter, token)
    })
    .try_collect()
    .await
    .unwrap();
    let requested: Vec<String> = paginate(|token| {
        provider.vpc_peering_connections("us-east-1", "vpc-a", PeeringRole::Requester, token)
    })
    .try_collect()
    .await
    .unwrap();

    assert_eq!(accepted, vec!["pcx-1"]);
    assert_eq!(requested, vec!["pcx-2"]);
}

#[tokio::test]
async fn missing_fixture_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FixtureProvider::from_file(dir.path().join("absent.json")).await;
    assert!(matches!(
        result,
        Err(quota_guard_provider::ProviderError::Io(_))
    ));
}
