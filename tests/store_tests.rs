//! History store contract tests against the real SQLite adapter.

mod support;

use cardwatch::domain::{FilterCriteria, PriceEntry, ProductId};
use cardwatch::port::HistoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use support::entries::entry;
use support::temp_db::TempDb;

#[tokio::test]
async fn latest_matches_entry_with_maximum_timestamp_among_matches() {
    let db = TempDb::create();
    let store = db.store();

    // Appended in observation order; EN/NM entries at seq 0, 2, 7.
    let seqs_langs = [
        (0, "EN"),
        (1, "DE"),
        (2, "EN"),
        (3, "FR"),
        (7, "EN"),
        (8, "DE"),
    ];
    for (seq, lang) in seqs_langs {
        store
            .append(&entry(
                "prod-1",
                seq,
                dec!(10.00) + Decimal::from(seq),
                3,
                lang,
                "NM",
                None,
            ))
            .await
            .unwrap();
    }

    let filter = FilterCriteria::new(Some("EN".into()), Some("NM".into()), 1);
    let latest = store
        .latest(&ProductId::from("prod-1"), &filter)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(latest.price(), dec!(17.00));
    assert_eq!(
        latest.observed_at(),
        entry("prod-1", 7, dec!(17.00), 3, "EN", "NM", None).observed_at()
    );
}

#[tokio::test]
async fn history_returns_all_entries_in_append_order() {
    let db = TempDb::create();
    let store = db.store();

    let n = 10;
    for seq in 0..n {
        store
            .append(&entry(
                "prod-1",
                seq,
                dec!(1.00) + Decimal::from(seq),
                1,
                "EN",
                "NM",
                Some(&format!("L{seq}")),
            ))
            .await
            .unwrap();
    }

    let history = store.history(&ProductId::from("prod-1")).await.unwrap();
    assert_eq!(history.len(), n as usize);
    for (i, entry) in history.iter().enumerate() {
        assert_eq!(entry.price(), dec!(1.00) + Decimal::from(i as i64));
    }
}

#[tokio::test]
async fn per_product_logs_are_isolated() {
    let db = TempDb::create();
    let store = db.store();

    store.append(&entry("prod-a", 0, dec!(1), 1, "EN", "NM", None)).await.unwrap();
    store.append(&entry("prod-b", 1, dec!(2), 1, "EN", "NM", None)).await.unwrap();
    store.append(&entry("prod-a", 2, dec!(3), 1, "EN", "NM", None)).await.unwrap();

    assert_eq!(store.history(&ProductId::from("prod-a")).await.unwrap().len(), 2);
    assert_eq!(store.history(&ProductId::from("prod-b")).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_appends_to_one_product_all_land() {
    let db = TempDb::create();

    let mut handles = Vec::new();
    for seq in 0..8i64 {
        let store = db.store();
        handles.push(tokio::spawn(async move {
            store
                .append(&entry("prod-1", seq, dec!(5.00), 2, "EN", "NM", None))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let history = db.store().history(&ProductId::from("prod-1")).await.unwrap();
    assert_eq!(history.len(), 8);
}

#[tokio::test]
async fn history_is_restartable() {
    let db = TempDb::create();
    let store = db.store();
    store.append(&entry("prod-1", 0, dec!(1), 1, "EN", "NM", None)).await.unwrap();

    let first: Vec<PriceEntry> = store.history(&ProductId::from("prod-1")).await.unwrap();
    let second: Vec<PriceEntry> = store.history(&ProductId::from("prod-1")).await.unwrap();
    assert_eq!(first, second);
}
