//! # Single Writer, Many Readers
//!
//! Readers work against whatever snapshot was committed when they looked;
//! they never see a half-applied transition and versions never go backwards.

#[cfg(test)]
mod tests {
    use crate::fixtures::{self, A, ADMIN};
    use seller_registry::adapters::{InMemoryCommitter, RecordingSink};
    use seller_registry::domain::invariants::check_all_invariants;
    use seller_registry::ports::inbound::RegistryApi;
    use seller_registry::service::{RegistryService, ServiceConfig};
    use shared_types::Relationship;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    type TestService = RegistryService<InMemoryCommitter, RecordingSink>;

    fn service() -> Arc<TestService> {
        Arc::new(RegistryService::new(
            ADMIN,
            InMemoryCommitter::new(),
            RecordingSink::new(),
            ServiceConfig::default(),
        ))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_consistent_snapshots() {
        let service = service();
        service
            .register_publisher(ADMIN, A, "example.com".into(), String::new())
            .await
            .unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let mut readers = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            let done = Arc::clone(&done);
            readers.push(tokio::spawn(async move {
                let mut last_version = 0;
                let mut reads = 0u64;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    let snapshot = service.snapshot();
                    assert!(snapshot.version() >= last_version);
                    last_version = snapshot.version();

                    // Every seller added so far bumped the version by one.
                    let sellers = snapshot.sellers_of(&A).count() as u64;
                    assert_eq!(snapshot.version(), sellers + 1);
                    assert!(check_all_invariants(&snapshot).is_valid());
                    reads += 1;
                    if finished {
                        break;
                    }
                    tokio::task::yield_now().await;
                }
                reads
            }));
        }

        for i in 0..200u32 {
            service
                .add_seller(
                    A,
                    "ssp.com".into(),
                    i.to_string(),
                    Relationship::Direct,
                    String::new(),
                )
                .await
                .unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in futures::future::join_all(readers).await {
            assert!(reader.unwrap() > 0);
        }
        assert_eq!(service.snapshot().version(), 201);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_lose_nothing() {
        let service = service();
        let publishers = fixtures::identities(&mut fixtures::rng(5), 8);
        for (i, id) in publishers.iter().enumerate() {
            service
                .register_publisher(ADMIN, *id, format!("p{i}.example"), String::new())
                .await
                .unwrap();
        }

        let handles: Vec<_> = publishers
            .iter()
            .map(|id| {
                let service = Arc::clone(&service);
                let id = *id;
                tokio::spawn(async move {
                    for n in 0..25u32 {
                        service
                            .add_seller(
                                id,
                                "ssp.com".into(),
                                n.to_string(),
                                Relationship::Reseller,
                                String::new(),
                            )
                            .await
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in futures::future::join_all(handles).await {
            handle.unwrap();
        }

        let snapshot = service.snapshot();
        assert_eq!(fixtures::seller_count(&snapshot), 8 * 25);
        assert_eq!(snapshot.version(), 8 + 8 * 25);
        assert_eq!(service.sink().notifications().len(), 8 + 8 * 25);
        assert_eq!(
            service.committer().head().unwrap().bytes,
            fixtures::encode(&snapshot)
        );
    }
}
