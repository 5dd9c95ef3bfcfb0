//! Checker registry, keyed by normalized quota code

use std::collections::HashMap;
use std::sync::Arc;

use quota_guard_core::CheckerId;
use tokio::sync::RwLock;

use crate::checker::{CheckerInfo, QuotaChecker};
use crate::checkers;

/// Registry for managing and resolving checker routines.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Clone, Default)]
pub struct CheckerRegistry {
    checkers: Arc<RwLock<HashMap<CheckerId, Arc<dyn QuotaChecker>>>>,
}

impl CheckerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in checker
    pub async fn builtin() -> Self {
        let registry = Self::new();
        for checker in checkers::builtin() {
            registry.register(checker).await;
        }
        registry
    }

    /// Register a checker under the identifier derived from its quota code.
    ///
    /// Returns the checker previously registered under that identifier.
    pub async fn register(&self, checker: Arc<dyn QuotaChecker>) -> Option<Arc<dyn QuotaChecker>> {
        let id = checker.id();
        self.checkers.write().await.insert(id, checker)
    }

    pub async fn get(&self, id: &CheckerId) -> Option<Arc<dyn QuotaChecker>> {
        self.checkers.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &CheckerId) -> bool {
        self.checkers.read().await.contains_key(id)
    }

    /// Registered checkers, ordered by identifier
    pub async fn list(&self) -> Vec<CheckerInfo> {
        let mut infos: Vec<CheckerInfo> = self
            .checkers
            .read()
            .await
            .values()
            .map(|checker| checker.info())
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    pub async fn len(&self) -> usize {
        self.checkers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.checkers.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{CheckContext, CheckRequest, UsageShape};
    use crate::error::CheckResult;
    use async_trait::async_trait;
    use quota_guard_core::{QuotaCheckResult, ThresholdRule};
    use rust_decimal::Decimal;

    #[derive(Debug)]
    struct MockChecker {
        quota_code: &'static str,
    }

    #[async_trait]
    impl QuotaChecker for MockChecker {
        fn quota_code(&self) -> &'static str {
            self.quota_code
        }

        fn service_code(&self) -> &'static str {
            "test"
        }

        fn description(&self) -> &'static str {
            "Mock checker"
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
            limit: Decimal,
        ) -> CheckResult<QuotaCheckResult> {
            Ok(crate::aggregate::global_scalar(
                request,
                self.threshold_rule(),
                limit,
                Decimal::ZERO,
            ))
        }
    }

    #[tokio::test]
    async fn test_new_registry_is_empty() {
        let registry = CheckerRegistry::new();
        assert!(registry.is_empty().await);
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_and_resolve_by_quota_code() {
        let registry = CheckerRegistry::new();
        registry
            .register(Arc::new(MockChecker {
                quota_code: "L-ABCD1234",
            }))
            .await;

        let id = CheckerId::from_quota_code("L-ABCD1234");
        assert_eq!(id.as_str(), "L_ABCD1234");
        assert!(registry.contains(&id).await);
        assert_eq!(registry.get(&id).await.unwrap().quota_code(), "L-ABCD1234");
        assert!(registry
            .get(&CheckerId::from_quota_code("L-00000000"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_register_replaces_existing() {
        let registry = CheckerRegistry::new();
        let first = registry
            .register(Arc::new(MockChecker { quota_code: "L-1" }))
            .await;
        let second = registry
            .register(Arc::new(MockChecker { quota_code: "L-1" }))
            .await;
        assert!(first.is_none());
        assert!(second.is_some());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_builtin_registry_covers_all_quota_codes() {
        let registry = CheckerRegistry::builtin().await;
        assert_eq!(registry.len().await, 15);

        for code in [
            "L-6408ABDE", "L-BB24F6E5", "L-DFA99DE7", "L-C4B238BF", "L-7E9ECCDB",
            "L-407747CB", "L-DF5E4CA3", "L-D18FCD1D", "L-CE3125E5", "L-43872EB7",
            "L-1B52E74A", "L-45FE3B85", "L-DC2B2D3D", "L-0DA4ABF3", "L-BF35879D",
        ] {
            assert!(
                registry.contains(&CheckerId::from_quota_code(code)).await,
                "missing checker for {code}"
            );
        }

        let listed = registry.list().await;
        assert!(listed.windows(2).all(|pair| pair[0].id <= pair[1].id));
    }

    #[tokio::test]
    async fn test_clone_registry_shares_entries() {
        let registry = CheckerRegistry::new();
        let cloned = registry.clone();
        registry
            .register(Arc::new(MockChecker { quota_code: "L-2" }))
            .await;
        assert!(cloned.contains(&CheckerId::from_quota_code("L-2")).await);
    }
}
