//! # Seller Table Properties
//!
//! - Repeated `add_seller` for one `(domain, id)` keeps a single record
//!   holding the latest values
//! - Seller mutations from unregistered identities change nothing and emit
//!   nothing
//! - A publisher's calls only ever touch its own table

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, A, ADMIN, B, SEEDS};
    use rand::Rng;
    use seller_registry::adapters::{InMemoryCommitter, RecordingSink};
    use seller_registry::domain::engine::{RegistryCommand, RegistryEngine};
    use seller_registry::domain::entities::{RegistryConfig, SellerRecord, Transition};
    use seller_registry::domain::services::seller_key;
    use seller_registry::errors::{RegistryError, ServiceError};
    use seller_registry::ports::inbound::RegistryApi;
    use seller_registry::service::{RegistryService, ServiceConfig};
    use shared_types::Relationship;
    use std::collections::HashSet;

    fn engine_with(config: RegistryConfig, publishers: &[(shared_types::Identity, &str)]) -> RegistryEngine {
        let mut engine = RegistryEngine::new(ADMIN, config);
        for (id, domain) in publishers {
            engine
                .register_publisher(ADMIN, *id, (*domain).into(), String::new())
                .unwrap();
        }
        engine
    }

    #[test]
    fn test_seller_overwrite_keeps_one_record() {
        for seed in SEEDS {
            let mut rng = fixtures::rng(seed);
            let mut engine = engine_with(RegistryConfig::default(), &[(A, "example.com")]);
            let sd = fixtures::domain(&mut rng);
            let sid = fixtures::seller_id(&mut rng);

            let mut last = None;
            for _ in 0..rng.gen_range(2..6) {
                let relationship = fixtures::relationship(&mut rng);
                let tag = fixtures::tag_id(&mut rng);
                engine
                    .add_seller(A, sd.clone(), sid.clone(), relationship, tag.clone())
                    .unwrap();
                last = Some((relationship, tag));
            }

            let (relationship, tag_id) = last.unwrap();
            assert_eq!(engine.state().sellers_of(&A).count(), 1);
            assert_eq!(
                engine.state().get_seller_for_publisher(&A, &sd, &sid),
                SellerRecord {
                    domain: sd.clone(),
                    seller_id: sid.clone(),
                    relationship,
                    tag_id,
                }
            );
        }
    }

    #[test]
    fn test_unregistered_seller_mutation_is_inert_in_legacy_mode() {
        for seed in SEEDS {
            let mut engine = fixtures::random_engine(seed, RegistryConfig::legacy(), 200);
            let mut rng = fixtures::rng(seed + 2);
            let stranger = loop {
                let id = fixtures::identity(&mut rng);
                if !engine.state().is_registered_publisher(&id) {
                    break id;
                }
            };
            let before = fixtures::encode(engine.state());

            let added = engine.apply(
                stranger,
                RegistryCommand::AddSeller {
                    seller_domain: "ssp.com".into(),
                    seller_id: "1".into(),
                    relationship: Relationship::Direct,
                    tag_id: String::new(),
                },
            );
            let removed = engine.apply(
                stranger,
                RegistryCommand::RemoveSeller {
                    seller_domain: "ssp.com".into(),
                    seller_id: "1".into(),
                },
            );

            assert_eq!(added, Ok(Transition::Ignored));
            assert_eq!(removed, Ok(Transition::Ignored));
            assert_eq!(fixtures::encode(engine.state()), before, "seed {seed}");
        }
    }

    #[test]
    fn test_unregistered_seller_mutation_is_rejected_by_default() {
        for seed in SEEDS {
            let mut engine = fixtures::random_engine(seed, RegistryConfig::default(), 200);
            let mut rng = fixtures::rng(seed + 3);
            let stranger = loop {
                let id = fixtures::identity(&mut rng);
                if !engine.state().is_registered_publisher(&id) {
                    break id;
                }
            };
            let before = fixtures::encode(engine.state());

            let err = engine
                .add_seller(
                    stranger,
                    "ssp.com".into(),
                    "1".into(),
                    Relationship::Reseller,
                    String::new(),
                )
                .unwrap_err();
            assert_eq!(err, RegistryError::PublisherNotRegistered { caller: stranger });

            let err = engine.remove_seller(stranger, "ssp.com", "1").unwrap_err();
            assert_eq!(err, RegistryError::PublisherNotRegistered { caller: stranger });
            assert_eq!(fixtures::encode(engine.state()), before);
        }
    }

    #[tokio::test]
    async fn test_unregistered_seller_mutation_emits_no_notification() {
        for config in [ServiceConfig::default(), ServiceConfig::legacy()] {
            let service =
                RegistryService::new(ADMIN, InMemoryCommitter::new(), RecordingSink::new(), config);

            let _ = service
                .add_seller(A, "ssp.com".into(), "1".into(), Relationship::Direct, String::new())
                .await;
            let _ = service
                .remove_seller(A, "ssp.com".into(), "1".into())
                .await;

            assert!(service.sink().notifications().is_empty());
            assert_eq!(service.committer().commit_count(), 0);
            assert_eq!(service.snapshot().version(), 0);
        }
    }

    #[tokio::test]
    async fn test_strict_rejection_is_reported() {
        let service = RegistryService::new(
            ADMIN,
            InMemoryCommitter::new(),
            RecordingSink::new(),
            ServiceConfig::default(),
        );
        let err = service
            .add_seller(A, "ssp.com".into(), "1".into(), Relationship::Direct, String::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ServiceError::Registry(RegistryError::PublisherNotRegistered { caller: A })
        );
        assert_eq!(service.sink().events().len(), 1);
    }

    #[test]
    fn test_publishers_only_touch_their_own_table() {
        for seed in SEEDS {
            let mut rng = fixtures::rng(seed);
            let mut engine = engine_with(
                RegistryConfig::default(),
                &[(A, "a.example"), (B, "b.example")],
            );
            for _ in 0..20 {
                engine
                    .add_seller(
                        B,
                        fixtures::domain(&mut rng),
                        fixtures::seller_id(&mut rng),
                        fixtures::relationship(&mut rng),
                        fixtures::tag_id(&mut rng),
                    )
                    .unwrap();
            }
            let b_table: Vec<_> = engine
                .state()
                .sellers_of(&B)
                .map(|(k, r)| (*k, r.clone()))
                .collect();

            for _ in 0..50 {
                let sd = fixtures::domain(&mut rng);
                let sid = fixtures::seller_id(&mut rng);
                if rng.gen_bool(0.6) {
                    engine
                        .add_seller(A, sd, sid, Relationship::Direct, String::new())
                        .unwrap();
                } else {
                    engine.remove_seller(A, &sd, &sid).unwrap();
                }
            }

            let after: Vec<_> = engine
                .state()
                .sellers_of(&B)
                .map(|(k, r)| (*k, r.clone()))
                .collect();
            assert_eq!(after, b_table, "seed {seed}");
        }
    }

    #[test]
    fn test_sellers_survive_deregistration() {
        let mut engine = engine_with(RegistryConfig::default(), &[(A, "example.com")]);
        engine
            .add_seller(A, "ssp.com".into(), "9".into(), Relationship::Direct, "t".into())
            .unwrap();
        engine.deregister_publisher(ADMIN, A).unwrap();

        assert!(!engine.state().is_registered_publisher(&A));
        assert!(!engine
            .state()
            .get_seller_for_publisher(&A, "ssp.com", "9")
            .is_absent());
        // The domain no longer resolves, so the domain lookup reads as absent.
        assert!(engine
            .state()
            .get_seller_for_publisher_domain("example.com", "ssp.com", "9")
            .is_absent());
    }

    #[test]
    fn test_seller_keys_are_distinct() {
        let mut rng = fixtures::rng(99);
        let mut pairs = HashSet::new();
        let mut keys = HashSet::new();
        for _ in 0..2_000 {
            let pair = (fixtures::domain(&mut rng), fixtures::seller_id(&mut rng));
            if pairs.insert(pair.clone()) {
                assert!(keys.insert(seller_key(&pair.0, &pair.1)));
            }
        }

        // Shifting the boundary between the fields changes the key.
        assert_ne!(seller_key("ab", "c"), seller_key("a", "bc"));
        assert_ne!(seller_key("", "abc"), seller_key("abc", ""));
    }
}
