//! Unit tests for feature gate resolution

#[cfg(test)]
mod tests {
    use crate::reconciler::feature_gates::*;
    use crate::test_utils::*;
    use cluster_store::MockStore;

    #[tokio::test]
    async fn test_explicit_true_enables_gate() {
        let store = MockStore::new();
        store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[(IMAGE_BASED_DEPLOYMENT, "true")]);

        let gates = test_feature_gates(&store);
        assert!(gates.is_enabled(IMAGE_BASED_DEPLOYMENT).await);
    }

    #[tokio::test]
    async fn test_only_literal_true_enables_gate() {
        let store = MockStore::new();
        store.add_config_map(
            FEATURE_GATES_CONFIG_MAP,
            &[
                (TIME_TRAVEL, "True"),
                (IMAGE_BASED_DEPLOYMENT, "1"),
                (ADDITIONAL_RUNTIME_CLASSES, "false"),
            ],
        );

        let gates = test_feature_gates(&store);
        // The comparison is case-sensitive against the literal "true"
        assert!(!gates.is_enabled(TIME_TRAVEL).await);
        assert!(!gates.is_enabled(IMAGE_BASED_DEPLOYMENT).await);
        assert!(!gates.is_enabled(ADDITIONAL_RUNTIME_CLASSES).await);
    }

    #[tokio::test]
    async fn test_absent_key_falls_back_to_default() {
        let store = MockStore::new();
        store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[(TIME_TRAVEL, "true")]);

        let gates = test_feature_gates(&store);
        assert!(!gates.is_enabled(IMAGE_BASED_DEPLOYMENT).await);
    }

    #[tokio::test]
    async fn test_gate_unknown_to_both_sources_is_disabled() {
        let store = MockStore::new();
        store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[(TIME_TRAVEL, "true")]);

        let gates = test_feature_gates(&store);
        assert!(!gates.is_enabled("warpDrive").await);
    }

    #[tokio::test]
    async fn test_explicit_key_wins_even_for_unknown_gate() {
        let store = MockStore::new();
        store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[("warpDrive", "true")]);

        let gates = test_feature_gates(&store);
        assert!(gates.is_enabled("warpDrive").await);
    }

    #[tokio::test]
    async fn test_missing_config_map_falls_back_to_defaults() {
        let store = MockStore::new();

        let gates = test_feature_gates(&store);
        assert!(!gates.is_enabled(TIME_TRAVEL).await);
        assert!(!gates.is_enabled(IMAGE_BASED_DEPLOYMENT).await);
        assert!(!gates.is_enabled(ADDITIONAL_RUNTIME_CLASSES).await);
    }

    #[tokio::test]
    async fn test_read_outage_falls_back_to_defaults() {
        let store = MockStore::new();
        store.add_config_map(FEATURE_GATES_CONFIG_MAP, &[(TIME_TRAVEL, "true")]);
        store.set_config_map_outage(true);

        // Resolution must not fail the caller; the explicit "true" is
        // unreachable during the outage and the default applies
        let gates = test_feature_gates(&store);
        assert!(!gates.is_enabled(TIME_TRAVEL).await);
    }

    #[tokio::test]
    async fn test_gate_params_returns_full_data() {
        let store = MockStore::new();
        store.add_config_map(
            IMAGE_DEPLOY_CONFIG_MAP,
            &[
                ("osImageURL", "quay.io/runtime/os:latest"),
                ("kernelArguments", "a=b c=d"),
            ],
        );

        let gates = test_feature_gates(&store);
        let params = gates.gate_params(IMAGE_BASED_DEPLOYMENT).await;
        assert_eq!(
            params.get("osImageURL").map(String::as_str),
            Some("quay.io/runtime/os:latest")
        );
        assert_eq!(
            params.get("kernelArguments").map(String::as_str),
            Some("a=b c=d")
        );
    }

    #[tokio::test]
    async fn test_gate_params_missing_config_map_is_empty() {
        let store = MockStore::new();

        let gates = test_feature_gates(&store);
        assert!(gates.gate_params(IMAGE_BASED_DEPLOYMENT).await.is_empty());
    }

    #[tokio::test]
    async fn test_gate_params_for_parameterless_gate_is_empty() {
        let store = MockStore::new();
        store.add_config_map(IMAGE_DEPLOY_CONFIG_MAP, &[("osImageURL", "quay.io/x")]);

        let gates = test_feature_gates(&store);
        assert!(gates.gate_params(TIME_TRAVEL).await.is_empty());
    }

    #[test]
    fn test_config_map_name_table() {
        assert_eq!(
            gate_config_map_name(IMAGE_BASED_DEPLOYMENT),
            Some(IMAGE_DEPLOY_CONFIG_MAP)
        );
        assert_eq!(gate_config_map_name(TIME_TRAVEL), None);
        assert_eq!(gate_config_map_name(ADDITIONAL_RUNTIME_CLASSES), None);

        assert!(is_feature_gate_config_map(FEATURE_GATES_CONFIG_MAP));
        assert!(is_feature_gate_config_map(IMAGE_DEPLOY_CONFIG_MAP));
        assert!(!is_feature_gate_config_map("some-other-config"));
    }
}
