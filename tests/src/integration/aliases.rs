//! # Alias Scenarios
//!
//! dPID minting, resolution and the legacy upgrade lifecycle.

#[cfg(test)]
mod tests {
    use dpid_registry::prelude::*;

    use crate::integration::{pointer, record, Harness, ADMIN, ALICE, BOB, FIRST_DPID};

    #[tokio::test]
    async fn test_mint_is_monotonic() {
        let h = Harness::new().await;

        let first = h.service.mint_alias(ALICE, "a".into()).await.unwrap();
        let second = h.service.mint_alias(BOB, "b".into()).await.unwrap();
        assert_eq!(first, Dpid(FIRST_DPID));
        assert_eq!(second, Dpid(FIRST_DPID + 1));
        assert_eq!(h.service.dpid_state(first).await, DpidState::Live);
    }

    #[tokio::test]
    async fn test_mint_from_configured_start() {
        let h = Harness::with_config(RegistryConfig {
            first_dpid: 500_000,
            ..RegistryConfig::default()
        })
        .await;
        assert_eq!(
            h.service.mint_alias(ALICE, "a".into()).await.unwrap(),
            Dpid(500_000)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_dpid() {
        let h = Harness::new().await;
        let err = h.service.resolve_alias(Dpid(7)).await.unwrap_err();
        assert_eq!(err, RegistryError::UnknownDpid(Dpid(7)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_one_time_upgrade() {
        let h = Harness::new().await;
        h.service
            .import_legacy_batch(ADMIN, vec![record(ALICE, "A", 0, 1)], "")
            .await
            .unwrap();
        assert_eq!(h.service.dpid_state(Dpid(0)).await, DpidState::Legacy);

        // Administrator is not the owner
        let err = h
            .service
            .upgrade_alias(ADMIN, Dpid(0), "x".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        let err = h
            .service
            .upgrade_alias(BOB, Dpid(0), "x".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        h.service
            .upgrade_alias(ALICE, Dpid(0), "x".into())
            .await
            .unwrap();
        assert_eq!(
            h.service.resolve_alias(Dpid(0)).await.unwrap(),
            ContentPointer::new("x")
        );

        for caller in [ALICE, BOB, ADMIN] {
            let err = h
                .service
                .upgrade_alias(caller, Dpid(0), "y".into())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::State);
        }
        assert_eq!(
            h.service.resolve_alias(Dpid(0)).await.unwrap(),
            ContentPointer::new("x")
        );
    }

    #[tokio::test]
    async fn test_upgrade_unallocated_and_minted() {
        let h = Harness::new().await;

        let err = h
            .service
            .upgrade_alias(ALICE, Dpid(3), "x".into())
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::UpgradeUnknownDpid(Dpid(3)));
        assert_eq!(err.kind(), ErrorKind::State);

        let minted = h.service.mint_alias(ALICE, "a".into()).await.unwrap();
        let err = h
            .service
            .upgrade_alias(ALICE, minted, "b".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[tokio::test]
    async fn test_legacy_history_survives_upgrade() {
        let h = Harness::new().await;
        h.service
            .import_legacy_batch(
                ADMIN,
                vec![record(ALICE, "A", 4, 1), record(ALICE, "A", 4, 2)],
                "",
            )
            .await
            .unwrap();

        // Legacy resolves to its latest imported version
        assert_eq!(h.service.resolve_alias(Dpid(4)).await.unwrap(), pointer("A", 2));

        let before = h.service.lookup_legacy(Dpid(4)).await.unwrap();
        h.service
            .upgrade_alias(ALICE, Dpid(4), "live".into())
            .await
            .unwrap();
        let after = h.service.lookup_legacy(Dpid(4)).await.unwrap();

        assert_eq!(before, after);
        assert_eq!(after.owner, ALICE);
        assert_eq!(after.versions.len(), 2);
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let h = Harness::new().await;
        let dpid = h.service.mint_alias(ALICE, "a".into()).await.unwrap();
        h.service
            .import_legacy_batch(ADMIN, vec![record(BOB, "B", 1, 9)], "")
            .await
            .unwrap();
        let events = h.service.event_count();

        for _ in 0..3 {
            assert_eq!(
                h.service.resolve_alias(dpid).await.unwrap(),
                ContentPointer::new("a")
            );
            assert_eq!(
                h.service.lookup_legacy(Dpid(1)).await.unwrap().versions[0].timestamp,
                9
            );
            assert!(h.service.get_entry("", 0).await.is_err());
        }
        assert_eq!(h.service.event_count(), events);
    }
}
