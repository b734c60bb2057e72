//! Unit tests for NodeConfig synthesis

#[cfg(test)]
mod tests {
    use crate::error::ControllerError;
    use crate::reconciler::feature_gates::IMAGE_BASED_DEPLOYMENT;
    use crate::test_utils::*;
    use cluster_store::MockStore;
    use crds::{EXTENSION_NODE_CONFIG_NAME, IMAGE_NODE_CONFIG_NAME, OWNER_LABEL, POOL_ROLE_LABEL};

    #[tokio::test]
    async fn test_extension_variant_when_image_gate_disabled() {
        let store = MockStore::new();
        let reconciler = test_reconciler(&store);

        let desired = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();

        assert_eq!(
            desired.metadata.name.as_deref(),
            Some(EXTENSION_NODE_CONFIG_NAME)
        );
        assert_eq!(desired.spec.extensions, vec!["sandboxed-runtime".to_string()]);
        // Variant exclusivity: no image fields on the extension variant
        assert!(desired.spec.os_image_url.is_none());
        assert!(desired.spec.kernel_arguments.is_empty());
    }

    #[tokio::test]
    async fn test_both_variants_carry_identity_labels_and_base_document() {
        let store = MockStore::new();
        let reconciler = test_reconciler(&store);

        let extension = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();

        enable_image_gate(&store, &[("osImageURL", "quay.io/x")]);
        let image = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();

        for desired in [extension, image] {
            let labels = desired.metadata.labels.as_ref().unwrap();
            assert_eq!(labels.get(OWNER_LABEL).map(String::as_str), Some("example"));
            assert_eq!(labels.get(POOL_ROLE_LABEL).map(String::as_str), Some("worker"));
            assert_eq!(desired.spec.config["version"], "1.0.0");
        }
    }

    #[tokio::test]
    async fn test_image_variant_parameter_round_trip() {
        let store = MockStore::new();
        enable_image_gate(
            &store,
            &[("osImageURL", "quay.io/x"), ("kernelArguments", "a=b c=d")],
        );
        let reconciler = test_reconciler(&store);

        let desired = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();

        assert_eq!(
            desired.metadata.name.as_deref(),
            Some(IMAGE_NODE_CONFIG_NAME)
        );
        assert_eq!(desired.spec.os_image_url.as_deref(), Some("quay.io/x"));
        assert_eq!(
            desired.spec.kernel_arguments,
            vec!["a=b".to_string(), "c=d".to_string()]
        );
        // Variant exclusivity: no extension on the image variant
        assert!(desired.spec.extensions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_os_image_url_aborts_synthesis() {
        let store = MockStore::new();
        enable_image_gate(&store, &[("kernelArguments", "a=b")]);
        let reconciler = test_reconciler(&store);

        let err = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap_err();

        match err {
            ControllerError::MissingParameter { gate, parameter } => {
                assert_eq!(gate, IMAGE_BASED_DEPLOYMENT);
                assert_eq!(parameter, "osImageURL");
            }
            other => panic!("expected MissingParameter, got: {}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_parameter_config_map_aborts_synthesis() {
        let store = MockStore::new();
        store.add_config_map(
            crate::reconciler::feature_gates::FEATURE_GATES_CONFIG_MAP,
            &[(IMAGE_BASED_DEPLOYMENT, "true")],
        );
        let reconciler = test_reconciler(&store);

        let err = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::MissingParameter { .. }));
    }

    #[tokio::test]
    async fn test_empty_kernel_arguments_yield_empty_list() {
        let store = MockStore::new();
        enable_image_gate(
            &store,
            &[("osImageURL", "quay.io/x"), ("kernelArguments", "")],
        );
        let reconciler = test_reconciler(&store);

        let desired = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();
        assert!(desired.spec.kernel_arguments.is_empty());
    }

    #[tokio::test]
    async fn test_absent_kernel_arguments_yield_empty_list() {
        let store = MockStore::new();
        enable_image_gate(&store, &[("osImageURL", "quay.io/x")]);
        let reconciler = test_reconciler(&store);

        let desired = reconciler
            .desired_node_config("example", "worker")
            .await
            .unwrap();
        assert!(desired.spec.kernel_arguments.is_empty());
    }
}
