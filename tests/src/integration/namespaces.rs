//! # Namespace Scenarios
//!
//! Prefix registration, sequential allocation, token gating and fee
//! collection exercised together through the service.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use dpid_registry::prelude::*;
    use dpid_registry::TreasuryError;

    use crate::integration::{Harness, ADMIN, ALICE, BOB, ENTRY_FEE, NAMESPACE_FEE, T1, T2};

    fn gates(tokens: &[GateToken]) -> BTreeSet<GateToken> {
        tokens.iter().copied().collect()
    }

    // =============================================================================
    // REGISTRATION
    // =============================================================================

    #[tokio::test]
    async fn test_reserved_prefixes_always_rejected() {
        let h = Harness::new().await;

        for prefix in ["", "desci", "dpid"] {
            for caller in [ALICE, ADMIN] {
                let err = h
                    .service
                    .register_namespace(caller, prefix, None, u64::MAX)
                    .await
                    .unwrap_err();
                assert_eq!(err.kind(), ErrorKind::Validation, "prefix {prefix:?}");
            }
        }
    }

    #[tokio::test]
    async fn test_charset_rejections() {
        let h = Harness::new().await;

        for prefix in ["a$b", "a)b", "a b", "a\nb", "a\tb", "a\r\nb"] {
            let err = h
                .service
                .register_namespace(ALICE, prefix, None, NAMESPACE_FEE)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "prefix {prefix:?}");
        }
        assert_eq!(h.service.collected_fees().await, 0);
    }

    #[tokio::test]
    async fn test_registration_and_duplicate() {
        let h = Harness::new().await;

        let ns = h
            .service
            .register_namespace(ALICE, "lab", Some(gates(&[T1])), NAMESPACE_FEE)
            .await
            .unwrap();
        assert_eq!(ns.registrant, ALICE);
        assert_eq!(ns.gate_tokens, gates(&[T1]));

        let err = h
            .service
            .register_namespace(BOB, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.service.namespace("lab").await.unwrap().registrant, ALICE);
    }

    #[tokio::test]
    async fn test_underpaid_registration_changes_nothing() {
        let h = Harness::new().await;

        let err = h
            .service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE - 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Payment);
        assert!(h.service.namespace("lab").await.is_err());
        assert_eq!(h.service.collected_fees().await, 0);
    }

    // =============================================================================
    // ALLOCATION
    // =============================================================================

    #[tokio::test]
    async fn test_sequential_allocation() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();

        for n in 1..=10u64 {
            let ptr = ContentPointer::new(format!("entry-{n}"));
            let id = h
                .service
                .put_entry(BOB, "lab", ptr.clone(), ENTRY_FEE)
                .await
                .unwrap();
            assert_eq!(id, n - 1);
            assert_eq!(h.service.get_entry("lab", n - 1).await.unwrap(), ptr);
        }
        assert_eq!(h.service.entry_count("lab").await, 10);
    }

    #[tokio::test]
    async fn test_entry_errors() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();

        let err = h
            .service
            .put_entry(BOB, "ghost", "x".into(), ENTRY_FEE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = h
            .service
            .put_entry(BOB, "lab", "x".into(), ENTRY_FEE - 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Payment);

        let err = h.service.get_entry("lab", 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_concurrent_puts_are_contiguous() {
        let h = std::sync::Arc::new(Harness::new().await);
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let h = h.clone();
            handles.push(tokio::spawn(async move {
                h.service
                    .put_entry(BOB, "lab", ContentPointer::new(format!("p{i}")), ENTRY_FEE)
                    .await
                    .unwrap()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (0..32).collect::<Vec<u64>>());
    }

    // =============================================================================
    // GATING
    // =============================================================================

    #[tokio::test]
    async fn test_gate_enforcement_lifecycle() {
        let h = Harness::new().await;
        h.ledger.grant(T1, ALICE, 1);
        h.service
            .register_namespace(ALICE, "lab", Some(gates(&[T1])), NAMESPACE_FEE)
            .await
            .unwrap();

        // Holder of T1 writes, non-holder is refused
        assert_eq!(
            h.service
                .put_entry(ALICE, "lab", "a".into(), ENTRY_FEE)
                .await
                .unwrap(),
            0
        );
        let err = h
            .service
            .put_entry(BOB, "lab", "b".into(), ENTRY_FEE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        // Open gate: anyone writes
        h.service
            .update_namespace_gate(ALICE, "lab", BTreeSet::new())
            .await
            .unwrap();
        assert_eq!(
            h.service
                .put_entry(BOB, "lab", "b".into(), ENTRY_FEE)
                .await
                .unwrap(),
            1
        );

        // Replaced wholesale: T1 alone no longer suffices
        h.service
            .update_namespace_gate(ALICE, "lab", gates(&[T2]))
            .await
            .unwrap();
        let err = h
            .service
            .put_entry(ALICE, "lab", "c".into(), ENTRY_FEE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(h.service.entry_count("lab").await, 2);
    }

    #[tokio::test]
    async fn test_gate_follows_token_balance() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", Some(gates(&[T1, T2])), NAMESPACE_FEE)
            .await
            .unwrap();

        h.ledger.grant(T2, BOB, 1);
        assert!(h
            .service
            .put_entry(BOB, "lab", "a".into(), ENTRY_FEE)
            .await
            .is_ok());

        h.ledger.revoke(T2, BOB);
        let err = h
            .service
            .put_entry(BOB, "lab", "b".into(), ENTRY_FEE)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_only_registrant_updates_gate() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", Some(gates(&[T1])), NAMESPACE_FEE)
            .await
            .unwrap();

        for caller in [BOB, ADMIN] {
            let err = h
                .service
                .update_namespace_gate(caller, "lab", BTreeSet::new())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authorization);
        }
        assert_eq!(
            h.service.namespace("lab").await.unwrap().gate_tokens,
            gates(&[T1])
        );
    }

    // =============================================================================
    // FEES
    // =============================================================================

    #[tokio::test]
    async fn test_withdraw_collects_both_fee_sources() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE + 5)
            .await
            .unwrap();
        h.service
            .put_entry(BOB, "lab", "a".into(), ENTRY_FEE)
            .await
            .unwrap();

        let err = h.service.withdraw_fees(ALICE).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let paid = h.service.withdraw_fees(ADMIN).await.unwrap();
        assert_eq!(paid, NAMESPACE_FEE + 5 + ENTRY_FEE);
        assert_eq!(h.treasury.balance_of(&ADMIN), paid);
        assert_eq!(h.service.collected_fees().await, 0);
    }

    #[tokio::test]
    async fn test_failed_payout_keeps_fees() {
        let h = Harness::new().await;
        h.service
            .register_namespace(ALICE, "lab", None, NAMESPACE_FEE)
            .await
            .unwrap();

        h.treasury.set_frozen(true);
        let err = h.service.withdraw_fees(ADMIN).await.unwrap_err();
        assert_eq!(err, RegistryError::PayoutFailed(TreasuryError::Frozen));
        assert_eq!(err.kind(), ErrorKind::Payment);
        assert_eq!(h.service.collected_fees().await, NAMESPACE_FEE);

        h.treasury.set_frozen(false);
        assert_eq!(h.service.withdraw_fees(ADMIN).await.unwrap(), NAMESPACE_FEE);
    }
}
