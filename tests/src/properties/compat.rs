//! # Compatibility Switches
//!
//! Side-by-side checks of the legacy and default behaviour for each switch in
//! `RegistryConfig`, plus the notifications both modes emit for absent
//! records.

#[cfg(test)]
mod tests {
    use crate::fixtures::{A, ADMIN, B};
    use seller_registry::domain::engine::RegistryEngine;
    use seller_registry::domain::entities::{RegistryConfig, Transition};
    use seller_registry::domain::invariants::{check_all_invariants, InvariantViolation};
    use seller_registry::domain::services::{domain_hash, seller_key};
    use seller_registry::errors::RegistryError;
    use shared_types::{Identity, RegistryNotification};

    fn legacy() -> RegistryEngine {
        RegistryEngine::new(ADMIN, RegistryConfig::legacy())
    }

    fn strict() -> RegistryEngine {
        RegistryEngine::new(ADMIN, RegistryConfig::default())
    }

    #[test]
    fn test_domain_change_leaves_stale_entry_in_legacy_mode() {
        let mut engine = legacy();
        engine
            .register_publisher(ADMIN, A, "old.example".into(), String::new())
            .unwrap();
        engine
            .register_publisher(ADMIN, A, "new.example".into(), String::new())
            .unwrap();

        assert_eq!(engine.state().resolve_domain("old.example"), A);
        assert_eq!(engine.state().resolve_domain("new.example"), A);
        assert!(check_all_invariants(engine.state())
            .violations()
            .iter()
            .any(|v| matches!(v, InvariantViolation::OrphanIndexEntry { .. })));
    }

    #[test]
    fn test_domain_change_repairs_index_by_default() {
        let mut engine = strict();
        engine
            .register_publisher(ADMIN, A, "old.example".into(), String::new())
            .unwrap();
        engine
            .register_publisher(ADMIN, A, "new.example".into(), String::new())
            .unwrap();

        assert!(!engine.state().is_registered_publisher_domain("old.example"));
        assert_eq!(engine.state().resolve_domain("new.example"), A);
        assert!(check_all_invariants(engine.state()).is_valid());
    }

    #[test]
    fn test_domain_takeover() {
        let mut engine = legacy();
        engine
            .register_publisher(ADMIN, A, "shared.example".into(), String::new())
            .unwrap();
        engine
            .register_publisher(ADMIN, B, "shared.example".into(), String::new())
            .unwrap();
        assert_eq!(engine.state().resolve_domain("shared.example"), B);

        // Deregistering B unindexes the domain A still declares.
        engine.deregister_publisher(ADMIN, B).unwrap();
        assert!(engine.state().is_registered_publisher(&A));
        assert!(!engine.state().is_registered_publisher_domain("shared.example"));

        let mut engine = strict();
        engine
            .register_publisher(ADMIN, A, "shared.example".into(), String::new())
            .unwrap();
        let err = engine
            .register_publisher(ADMIN, B, "shared.example".into(), String::new())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DomainClaimed {
                domain: "shared.example".into(),
                owner: A,
            }
        );
    }

    #[test]
    fn test_deregistering_absent_identity() {
        // Legacy: the absent record's domain is "", whose index entry goes.
        let mut engine = legacy();
        engine
            .register_publisher(ADMIN, A, String::new(), String::new())
            .unwrap();
        assert_eq!(engine.state().domain_index().get(&domain_hash("")), Some(&A));

        let outcome = engine.deregister_publisher(ADMIN, B).unwrap();
        assert_eq!(
            outcome,
            Transition::Applied(RegistryNotification::PublisherDeregistered { identity: B })
        );
        assert!(engine.state().domain_index().get(&domain_hash("")).is_none());
        assert!(engine.state().is_registered_publisher(&A));

        // Default: same notification, index untouched.
        let mut engine = strict();
        engine
            .register_publisher(ADMIN, A, "example.com".into(), String::new())
            .unwrap();
        let before = engine.state().domain_index().clone();
        let outcome = engine.deregister_publisher(ADMIN, B).unwrap();
        assert!(outcome.is_applied());
        assert_eq!(engine.state().domain_index(), &before);
    }

    #[test]
    fn test_removing_absent_seller_still_notifies() {
        for mut engine in [legacy(), strict()] {
            engine
                .register_publisher(ADMIN, A, "example.com".into(), String::new())
                .unwrap();
            let outcome = engine.remove_seller(A, "ssp.com", "404").unwrap();
            assert_eq!(
                outcome,
                Transition::Applied(RegistryNotification::SellerRemoved {
                    publisher: A,
                    seller_key: seller_key("ssp.com", "404"),
                })
            );
        }
    }

    #[test]
    fn test_input_validation() {
        let mut engine = strict();
        assert!(matches!(
            engine.register_publisher(ADMIN, Identity::SENTINEL, "x.example".into(), String::new()),
            Err(RegistryError::InvalidPublisher { .. })
        ));
        assert!(matches!(
            engine.register_publisher(ADMIN, A, String::new(), String::new()),
            Err(RegistryError::InvalidPublisher { .. })
        ));

        // Legacy accepts the sentinel, which then never reads as registered.
        let mut engine = legacy();
        engine
            .register_publisher(ADMIN, Identity::SENTINEL, "x.example".into(), String::new())
            .unwrap();
        assert!(!engine.state().is_registered_publisher(&Identity::SENTINEL));
        assert!(!engine.state().is_registered_publisher_domain("x.example"));
    }
}
