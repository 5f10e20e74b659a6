use std::sync::Arc;

use anchor_ledger::{
    read_records, Address, AnchorError, CallContext, ConfigError, JournalError, LedgerConfig,
    LedgerError, LedgerHandle, ManualClock, EVENT_SIGNATURE,
};
use chrono::DateTime;
use tempfile::tempdir;

fn ctx() -> CallContext {
    CallContext::new(
        "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
            .parse::<Address>()
            .unwrap(),
    )
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::with_step(
        DateTime::from_timestamp(1_767_225_600, 0).unwrap(),
        12,
    ))
}

#[tokio::test]
async fn test_receipt_carries_one_log_with_four_topics() {
    let handle = LedgerHandle::in_memory().with_clock(clock());

    let receipt = handle
        .anchor_evidence("QmEventTest123456", &ctx())
        .await
        .unwrap();

    assert_eq!(receipt.evidence_id, 0);
    assert_eq!(receipt.logs.len(), 1);
    assert_eq!(receipt.logs[0].topics.len(), 4);
    assert_eq!(receipt.timestamp.timestamp(), 1_767_225_600);
    let event = receipt.event().unwrap();
    assert_eq!(event.ipfs_cid, "QmEventTest123456");
    assert_eq!(event.submitter, ctx().submitter);
    assert!(EVENT_SIGNATURE.starts_with("EvidenceAnchored("));
}

#[tokio::test]
async fn test_timestamp_comes_from_clock() {
    let handle = LedgerHandle::in_memory().with_clock(clock());
    for cid in ["QmMulti1", "QmMulti2", "QmMulti3"] {
        handle.anchor_evidence(cid, &ctx()).await.unwrap();
    }
    let records = handle.snapshot().await;
    let times: Vec<_> = records.iter().map(|r| r.unix_timestamp()).collect();
    assert_eq!(times, [1_767_225_600, 1_767_225_612, 1_767_225_624]);
}

#[tokio::test]
async fn test_rejections_emit_nothing() {
    let handle = LedgerHandle::in_memory();
    let mut events = handle.subscribe();

    handle.anchor_evidence("QmA", &ctx()).await.unwrap();
    let err = handle.anchor_evidence("QmA", &ctx()).await.unwrap_err();
    assert!(matches!(
        err.as_ledger(),
        Some(LedgerError::DuplicateIdentifier { existing_id: 0, .. })
    ));
    let err = handle.anchor_evidence("", &ctx()).await.unwrap_err();
    assert!(matches!(err, AnchorError::Ledger(LedgerError::EmptyIdentifier)));
    handle.anchor_evidence("QmB", &ctx()).await.unwrap();

    assert_eq!(events.recv().await.unwrap().ipfs_cid, "QmA");
    let second = events.recv().await.unwrap();
    assert_eq!((second.id, second.ipfs_cid.as_str()), (1, "QmB"));
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_lookup_forms() {
    let handle = LedgerHandle::in_memory();
    assert_eq!(handle.get_evidence_id_by_cid("Unknown").await, 0);
    assert_eq!(handle.find_evidence_id("Unknown").await, None);

    handle.anchor_evidence("QmFirst", &ctx()).await.unwrap();
    handle.anchor_evidence("QmSecond", &ctx()).await.unwrap();
    assert_eq!(handle.get_evidence_id_by_cid("QmSecond").await, 1);
    assert_eq!(handle.get_evidence_id_by_cid("Unknown").await, 0);
    assert_eq!(handle.find_evidence_id("QmFirst").await, Some(0));
    assert!(handle.get_evidence(2).await.unwrap_err().is_not_found());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_anchors_stay_dense() {
    let handle = LedgerHandle::in_memory();
    let mut tasks = Vec::new();
    for i in 0..32 {
        let handle = handle.clone();
        // Every CID is submitted twice; exactly one of each pair wins.
        let cid = format!("QmConcurrent{}", i % 16);
        tasks.push(tokio::spawn(async move {
            handle.anchor_evidence(&cid, &ctx()).await
        }));
    }

    let mut accepted = Vec::new();
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(receipt) => accepted.push(receipt.evidence_id),
            Err(e) => {
                assert!(e.as_ledger().unwrap().is_duplicate());
                duplicates += 1;
            }
        }
    }
    accepted.sort_unstable();
    assert_eq!(accepted, (0..16).collect::<Vec<u64>>());
    assert_eq!(duplicates, 16);
    assert_eq!(handle.get_evidence_count().await, 16);
}

#[tokio::test]
async fn test_journal_replay_restores_state() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::default()
        .with_journal_path(dir.path().join("evidence.ndjson"))
        .with_fsync(false);

    let handle = LedgerHandle::deploy(&config).unwrap().with_clock(clock());
    for cid in ["QmTest1", "QmTest2", "QmTest3"] {
        handle.anchor_evidence(cid, &ctx()).await.unwrap();
    }
    let before = handle.snapshot().await;
    drop(handle);

    let reopened = LedgerHandle::open(&config).unwrap();
    assert_eq!(reopened.get_evidence_count().await, 3);
    assert_eq!(reopened.snapshot().await, before);
    assert_eq!(reopened.get_evidence_id_by_cid("QmTest3").await, 2);

    let err = reopened.anchor_evidence("QmTest2", &ctx()).await.unwrap_err();
    assert!(err.as_ledger().unwrap().is_duplicate());
    let receipt = reopened.anchor_evidence("QmTest4", &ctx()).await.unwrap();
    assert_eq!(receipt.evidence_id, 3);
}

#[tokio::test]
async fn test_rejected_writes_do_not_touch_journal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("evidence.ndjson");
    let config = LedgerConfig::in_memory().with_journal_path(&path);

    let handle = LedgerHandle::open(&config).unwrap();
    handle.anchor_evidence("QmA", &ctx()).await.unwrap();
    let size = std::fs::metadata(&path).unwrap().len();

    handle.anchor_evidence("QmA", &ctx()).await.unwrap_err();
    handle.anchor_evidence("", &ctx()).await.unwrap_err();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), size);
    assert_eq!(read_records(&path).unwrap().len(), 1);
}

#[tokio::test]
async fn test_deploy_refuses_existing_history() {
    let dir = tempdir().unwrap();
    let config = LedgerConfig::in_memory().with_journal_path(dir.path().join("e.ndjson"));

    let handle = LedgerHandle::deploy(&config).unwrap();
    handle.anchor_evidence("QmA", &ctx()).await.unwrap();

    let err = LedgerHandle::deploy(&config).unwrap_err();
    assert!(matches!(
        err,
        AnchorError::Journal(JournalError::AlreadyDeployed { count: 1, .. })
    ));
}

#[test]
fn test_corrupt_journal_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("evidence.ndjson");
    let line = |id: u64, cid: &str| {
        format!(
            r#"{{"id":{id},"ipfsCid":"{cid}","submitter":"0x70997970c51812dc3a010c7d01b50e0d17dc79c8","timestamp":"2026-01-01T00:00:00Z"}}"#
        )
    };
    std::fs::write(&path, format!("{}\n{}\n", line(0, "QmA"), line(1, "QmA"))).unwrap();

    let config = LedgerConfig::in_memory().with_journal_path(&path);
    let err = LedgerHandle::open(&config).unwrap_err();
    assert!(matches!(err, AnchorError::Journal(JournalError::Corrupt { .. })));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_zero_event_capacity_is_rejected() {
    let config = LedgerConfig::in_memory().with_event_capacity(0);
    let err = LedgerHandle::open(&config).unwrap_err();
    assert!(matches!(
        err,
        AnchorError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "event_capacity"
    ));
    assert_eq!(err.exit_code(), 2);
    assert!(LedgerHandle::deploy(&config).is_err());
}
