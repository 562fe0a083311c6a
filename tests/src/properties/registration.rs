//! # Registration Properties
//!
//! - Register then deregister leaves neither the identity nor the domain
//!   registered
//! - Domain lookups agree with identity lookups for every registered publisher
//! - The structural invariants survive arbitrary histories

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, ADMIN, SEEDS};
    use seller_registry::domain::entities::RegistryConfig;
    use seller_registry::domain::invariants::check_all_invariants;
    use seller_registry::domain::services::domain_hash;

    fn configs() -> [RegistryConfig; 2] {
        [RegistryConfig::default(), RegistryConfig::legacy()]
    }

    #[test]
    fn test_round_trip_registration() {
        for config in configs() {
            for seed in SEEDS {
                let mut engine = fixtures::random_engine(seed, config.clone(), 200);
                let mut rng = fixtures::rng(seed ^ 0xFF);
                let id = loop {
                    let candidate = fixtures::identity(&mut rng);
                    if !engine.state().is_registered_publisher(&candidate) {
                        break candidate;
                    }
                };
                let domain = format!("fresh-{seed}.test");

                engine
                    .register_publisher(ADMIN, id, domain.clone(), "Fresh".into())
                    .unwrap();
                assert!(engine.state().is_registered_publisher(&id));
                assert!(engine.state().is_registered_publisher_domain(&domain));

                engine.deregister_publisher(ADMIN, id).unwrap();
                assert!(!engine.state().is_registered_publisher(&id), "seed {seed}");
                assert!(
                    !engine.state().is_registered_publisher_domain(&domain),
                    "seed {seed}"
                );
            }
        }
    }

    #[test]
    fn test_domain_lookup_matches_identity_lookup() {
        for seed in SEEDS {
            let engine = fixtures::random_engine(seed, RegistryConfig::default(), 400);
            let state = engine.state();
            let mut rng = fixtures::rng(seed);

            for publisher in state.publishers().values() {
                assert_eq!(state.resolve_domain(&publisher.domain), publisher.identity);

                let mut lookups: Vec<(String, String)> = state
                    .sellers_of(&publisher.identity)
                    .map(|(_, record)| (record.domain.clone(), record.seller_id.clone()))
                    .collect();
                lookups.push((fixtures::domain(&mut rng), fixtures::seller_id(&mut rng)));

                for (sd, sid) in lookups {
                    assert_eq!(
                        state.get_seller_for_publisher_domain(&publisher.domain, &sd, &sid),
                        state.get_seller_for_publisher(&publisher.identity, &sd, &sid),
                        "seed {seed}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_invariants_hold_under_default_config() {
        for seed in SEEDS {
            let engine = fixtures::random_engine(seed, RegistryConfig::default(), 500);
            let result = check_all_invariants(engine.state());
            assert!(result.is_valid(), "seed {seed}: {:?}", result.violations());
        }
    }

    #[test]
    fn test_every_index_entry_points_at_a_registered_owner() {
        for seed in SEEDS {
            let engine = fixtures::random_engine(seed, RegistryConfig::default(), 500);
            let state = engine.state();
            for (hash, owner) in state.domain_index() {
                let publisher = state.publisher(owner).expect("indexed owner is registered");
                assert_eq!(domain_hash(&publisher.domain), *hash);
            }
        }
    }

    #[test]
    fn test_replicas_converge() {
        for seed in SEEDS {
            let first = fixtures::random_engine(seed, RegistryConfig::default(), 300);
            let second = fixtures::random_engine(seed, RegistryConfig::default(), 300);
            assert_eq!(
                fixtures::encode(first.state()),
                fixtures::encode(second.state())
            );
        }
    }
}
