//! # Reference Scenario
//!
//! Administrator registers `A` for `example.com`; `A` authorizes and then
//! revokes `ssp.com`/`123`. Checked through the service, the request handler
//! and a bus subscriber.

#[cfg(test)]
mod tests {
    use crate::fixtures::{A, ADMIN};
    use seller_registry::adapters::{BusNotificationSink, InMemoryCommitter, RegistryEventHandler};
    use seller_registry::domain::entities::SellerRecord;
    use seller_registry::domain::services::seller_key;
    use seller_registry::events::{PublisherRef, SellerLookupRequest};
    use seller_registry::ports::inbound::RegistryApi;
    use seller_registry::service::{RegistryService, ServiceConfig};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, RegistryEvent};
    use shared_types::{Relationship, RegistryNotification};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    type BusService = RegistryService<InMemoryCommitter, BusNotificationSink<InMemoryEventBus>>;

    fn wire(config: ServiceConfig) -> (Arc<InMemoryEventBus>, Arc<BusService>) {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = Arc::new(RegistryService::new(
            ADMIN,
            InMemoryCommitter::new(),
            BusNotificationSink::new(Arc::clone(&bus)),
            config,
        ));
        (bus, service)
    }

    async fn next_notification(
        sub: &mut shared_bus::Subscription,
    ) -> Option<RegistryNotification> {
        let event = timeout(Duration::from_secs(1), sub.recv()).await.ok()?.ok()?;
        event.notification().copied()
    }

    #[tokio::test]
    async fn test_reference_scenario() {
        for config in [ServiceConfig::default(), ServiceConfig::legacy()] {
            let (bus, service) = wire(config);
            let mut sub = bus.subscribe(EventFilter::all());

            service
                .register_publisher(ADMIN, A, "example.com".into(), "Example".into())
                .await
                .unwrap();
            assert!(service.is_registered_publisher_domain("example.com"));

            service
                .add_seller(
                    A,
                    "ssp.com".into(),
                    "123".into(),
                    Relationship::Direct,
                    "tag1".into(),
                )
                .await
                .unwrap();
            assert_eq!(
                service.get_seller_for_publisher(&A, "ssp.com", "123"),
                SellerRecord {
                    domain: "ssp.com".into(),
                    seller_id: "123".into(),
                    relationship: Relationship::Direct,
                    tag_id: "tag1".into(),
                }
            );

            service
                .remove_seller(A, "ssp.com".into(), "123".into())
                .await
                .unwrap();
            assert_eq!(
                service.get_seller_for_publisher(&A, "ssp.com", "123"),
                SellerRecord::default()
            );

            let key = seller_key("ssp.com", "123");
            assert_eq!(
                next_notification(&mut sub).await,
                Some(RegistryNotification::PublisherRegistered { identity: A })
            );
            assert_eq!(
                next_notification(&mut sub).await,
                Some(RegistryNotification::SellerAdded {
                    publisher: A,
                    seller_key: key
                })
            );
            assert_eq!(
                next_notification(&mut sub).await,
                Some(RegistryNotification::SellerRemoved {
                    publisher: A,
                    seller_key: key
                })
            );
        }
    }

    #[tokio::test]
    async fn test_lookup_through_handler_uses_ordinal() {
        let (_bus, service) = wire(ServiceConfig::default());
        service
            .register_publisher(ADMIN, A, "example.com".into(), String::new())
            .await
            .unwrap();
        service
            .add_seller(
                A,
                "ssp.com".into(),
                "123".into(),
                Relationship::Reseller,
                "tag1".into(),
            )
            .await
            .unwrap();

        let handler = RegistryEventHandler::new(Arc::clone(&service));
        let by_domain = handler.handle_lookup(&SellerLookupRequest {
            publisher: PublisherRef::Domain("example.com".into()),
            seller_domain: "ssp.com".into(),
            seller_id: "123".into(),
        });
        let by_identity = handler.handle_lookup(&SellerLookupRequest {
            publisher: PublisherRef::Identity(A),
            seller_domain: "ssp.com".into(),
            seller_id: "123".into(),
        });

        assert_eq!(by_domain, by_identity);
        assert_eq!(by_domain.record.relationship, 1);

        let json = serde_json::to_value(&by_domain).unwrap();
        assert_eq!(json["record"]["relationship"], 1);
    }

    #[tokio::test]
    async fn test_topic_filtering() {
        let (bus, service) = wire(ServiceConfig::default());
        let mut sellers_only = bus.subscribe(EventFilter::topics(vec![EventTopic::Sellers]));
        let mut rejections = bus.subscribe(EventFilter::topics(vec![EventTopic::Rejections]));

        service
            .register_publisher(ADMIN, A, "example.com".into(), String::new())
            .await
            .unwrap();
        service
            .register_publisher(A, A, "example.com".into(), String::new())
            .await
            .unwrap_err();
        service
            .add_seller(A, "ssp.com".into(), "1".into(), Relationship::Direct, String::new())
            .await
            .unwrap();

        assert!(matches!(
            sellers_only.try_recv().unwrap(),
            Some(RegistryEvent::Committed {
                notification: RegistryNotification::SellerAdded { .. },
                ..
            })
        ));
        assert_eq!(sellers_only.try_recv().unwrap(), None);
        assert!(matches!(
            rejections.try_recv().unwrap(),
            Some(RegistryEvent::Rejected { caller, .. }) if caller == A
        ));
    }
}
