use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::checker_id::CheckerId;
use crate::error::{DescriptorError, DescriptorResult};

/// Level a quota applies at.
///
/// Anything other than `Regional` is checked once, in the current region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedAtLevel {
    Regional,
    Global,
    #[serde(other)]
    Unrecognized,
}

impl AppliedAtLevel {
    pub fn is_regional(&self) -> bool {
        matches!(self, AppliedAtLevel::Regional)
    }
}

/// One entry of the quota list: which quota to check and at what threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuotaDescriptor {
    pub service_code: String,
    pub quota_code: String,
    /// Raw configured threshold; its unit is decided by the checker routine.
    pub threshold: Decimal,
    #[serde(rename = "QuotaAppliedAtLevel")]
    pub applied_at_level: AppliedAtLevel,
}

impl QuotaDescriptor {
    pub fn checker_id(&self) -> CheckerId {
        CheckerId::from_quota_code(&self.quota_code)
    }
}

/// Parse and validate the ordered quota list.
pub fn parse_descriptors(bytes: &[u8]) -> DescriptorResult<Vec<QuotaDescriptor>> {
    let descriptors: Vec<QuotaDescriptor> = serde_json::from_slice(bytes)?;

    for (index, descriptor) in descriptors.iter().enumerate() {
        if descriptor.service_code.trim().is_empty() {
            return Err(DescriptorError::EmptyField {
                index,
                field: "ServiceCode",
            });
        }
        if descriptor.quota_code.trim().is_empty() {
            return Err(DescriptorError::EmptyField {
                index,
                field: "QuotaCode",
            });
        }
        if descriptor.threshold < Decimal::ZERO {
            return Err(DescriptorError::NegativeThreshold {
                index,
                quota_code: descriptor.quota_code.clone(),
                threshold: descriptor.threshold,
            });
        }
    }

    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTA_LIST: &str = r#"[
        {"ServiceCode": "vpc", "QuotaCode": "L-DFA99DE7", "Threshold": 0.8, "QuotaAppliedAtLevel": "Regional"},
        {"ServiceCode": "iam", "QuotaCode": "L-0DA4ABF3", "Threshold": 80, "QuotaAppliedAtLevel": "Global"},
        {"ServiceCode": "s3", "QuotaCode": "L-DC2B2D3D", "Threshold": 75, "QuotaAppliedAtLevel": "Account"}
    ]"#;

    #[test]
    fn parses_quota_list_in_order() {
        let descriptors = parse_descriptors(QUOTA_LIST.as_bytes()).unwrap();
        assert_eq!(descriptors.len(), 3);
        assert_eq!(descriptors[0].quota_code, "L-DFA99DE7");
        assert_eq!(descriptors[0].threshold, "0.8".parse::<Decimal>().unwrap());
        assert_eq!(descriptors[1].threshold, Decimal::from(80));
        assert_eq!(descriptors[0].applied_at_level, AppliedAtLevel::Regional);
        assert_eq!(descriptors[1].applied_at_level, AppliedAtLevel::Global);
    }

    #[test]
    fn unknown_level_is_not_regional() {
        let descriptors = parse_descriptors(QUOTA_LIST.as_bytes()).unwrap();
        assert_eq!(descriptors[2].applied_at_level, AppliedAtLevel::Unrecognized);
        assert!(!descriptors[2].applied_at_level.is_regional());
    }

    #[test]
    fn checker_id_is_normalized_quota_code() {
        let descriptors = parse_descriptors(QUOTA_LIST.as_bytes()).unwrap();
        assert_eq!(descriptors[0].checker_id().as_str(), "L_DFA99DE7");
    }

    #[test]
    fn malformed_list_is_rejected() {
        let err = parse_descriptors(br#"{"ServiceCode": "vpc"}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Json(_)));

        let err = parse_descriptors(br#"[{"ServiceCode": "vpc", "QuotaCode": "L-1"}]"#)
            .unwrap_err();
        assert!(matches!(err, DescriptorError::Json(_)));
    }

    #[test]
    fn empty_quota_code_is_rejected() {
        let err = parse_descriptors(
            br#"[{"ServiceCode": "vpc", "QuotaCode": " ", "Threshold": 1, "QuotaAppliedAtLevel": "Regional"}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DescriptorError::EmptyField {
                index: 0,
                field: "QuotaCode"
            }
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = parse_descriptors(
            br#"[{"ServiceCode": "vpc", "QuotaCode": "L-1", "Threshold": -1, "QuotaAppliedAtLevel": "Regional"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, DescriptorError::NegativeThreshold { .. }));
    }
}
