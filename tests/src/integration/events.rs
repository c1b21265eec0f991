//! # Event Scenarios
//!
//! The offset-addressed event log and live subscriptions, as seen by a
//! consumer of the registry.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dpid_registry::prelude::*;
    use dpid_registry::topics;
    use tokio::time::timeout;

    use crate::integration::{record, Harness, ADMIN, ALICE, ENTRY_FEE, NAMESPACE_FEE};

    #[tokio::test]
    async fn test_initialization_events() {
        let h = Harness::new().await;
        let log = h.service.events_since(0);

        assert!(matches!(
            log[0].event,
            RegistryEvent::Initialized { administrator, .. } if administrator == ADMIN
        ));
        let reserved: Vec<String> = log
            .iter()
            .filter_map(|r| match &r.event {
                RegistryEvent::NamespaceRegistered { prefix, registrant, .. } => {
                    assert_eq!(*registrant, ADMIN);
                    Some(prefix.to_string())
                }
                _ => None,
            })
            .collect();
        assert_eq!(reserved, vec!["", "desci", "dpid"]);
    }

    #[tokio::test]
    async fn test_migration_event_order() {
        let h = Harness::new().await;
        let start = h.service.event_count() as u64;
        h.service
            .import_legacy_batch(
                ADMIN,
                vec![record(ALICE, "A", 0, 1), record(ALICE, "A", 0, 2)],
                "",
            )
            .await
            .unwrap();

        let kinds: Vec<&'static str> = h
            .service
            .events_since(start)
            .iter()
            .map(|r| match r.event {
                RegistryEvent::LegacyImported { .. } => "imported",
                RegistryEvent::PointerUpdated { .. } => "pointer",
                RegistryEvent::VersionMigrated { .. } => "migrated",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["imported", "pointer", "migrated", "pointer", "migrated"]
        );
    }

    #[tokio::test]
    async fn test_offsets_are_contiguous() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();
        h.service
            .put_entry(ALICE, "lab", "p".into(), ENTRY_FEE)
            .await
            .unwrap();
        let _ = h.service.put_entry(ALICE, "lab", "p".into(), 0).await;
        h.service.mint_alias(ALICE, "m".into()).await.unwrap();

        let log = h.service.events_since(0);
        for (i, recorded) in log.iter().enumerate() {
            assert_eq!(recorded.offset, i as u64);
        }
        assert_eq!(h.service.stats().commands_rejected, 1);
    }

    #[tokio::test]
    async fn test_subscription_filters_topics() {
        let h = Harness::new().await;
        let mut entries = h
            .service
            .subscribe(EventFilter::topics(vec![topics::ENTRIES]));

        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();
        h.service.mint_alias(ALICE, "m".into()).await.unwrap();
        let seq = h
            .service
            .put_entry(ALICE, "lab", "p".into(), ENTRY_FEE)
            .await
            .unwrap();

        let recorded = timeout(Duration::from_secs(1), entries.recv())
            .await
            .expect("event within timeout")
            .expect("bus open");
        match recorded.event {
            RegistryEvent::EntryRegistered { prefix, sequence_id } => {
                assert_eq!(prefix.as_str(), "lab");
                assert_eq!(sequence_id, seq);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_events_serialize_with_type_tag() {
        let h = Harness::new().await;
        h.service.mint_alias(ALICE, "bafy".into()).await.unwrap();

        let last = h.service.events_since(0).pop().unwrap();
        let json = serde_json::to_value(&last).unwrap();
        assert_eq!(json["event"]["type"], "AliasMinted");
        assert_eq!(json["event"]["content_pointer"], "bafy");
    }
}
