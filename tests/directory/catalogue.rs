use foodstore_sync::{CatalogueEntry, CoordinatorError, InMemoryTransport, Operation, StoreDirectory};

use crate::support::loaded;

fn entry(directory: &StoreDirectory<InMemoryTransport>, food: &str) -> CatalogueEntry {
    directory
        .snapshot()
        .unwrap()
        .store_by_id("p1")
        .unwrap()
        .catalogue_entry(food)
        .unwrap()
        .clone()
}

#[tokio::test]
async fn toggle_stores_backend_result() {
    let directory = loaded("s1").await;

    let updated = directory
        .toggle_availability(&entry(&directory, "f2"))
        .await
        .unwrap();

    assert!(updated.is_available);
    let stored = entry(&directory, "f2");
    assert!(stored.is_available);
}

#[tokio::test]
async fn toggle_keeps_food_item_when_backend_omits_it() {
    let directory = loaded("s1").await;

    directory
        .toggle_availability(&entry(&directory, "f1"))
        .await
        .unwrap();

    let stored = entry(&directory, "f1");
    assert!(!stored.is_available);
    assert_eq!(stored.food_local.unwrap().name, "Pan integral");
}

#[tokio::test]
async fn backend_rule_overrides_requested_state() {
    let directory = loaded("s1").await;
    directory.transport().force_availability("p1", "f2", false);

    let updated = directory
        .toggle_availability(&entry(&directory, "f2"))
        .await
        .unwrap();

    assert!(!updated.is_available);
    assert!(!entry(&directory, "f2").is_available);
}

#[tokio::test]
async fn overlapping_toggle_is_rejected_until_first_resolves() {
    let directory = loaded("s1").await;
    let gate = directory.transport().pause_catalogue_patches();
    let first_entry = entry(&directory, "f1");
    let second_entry = entry(&directory, "f2");

    let (first, second) = tokio::join!(directory.toggle_availability(&first_entry), async {
        while !directory.is_toggling("p1").unwrap() {
            tokio::task::yield_now().await;
        }
        let second = directory.toggle_availability(&second_entry).await;
        gate.release();
        second
    });

    assert!(!first.unwrap().is_available);
    assert_eq!(
        second.unwrap_err(),
        CoordinatorError::Busy {
            store_id: "p1".into()
        }
    );
    assert_eq!(
        directory
            .transport()
            .call_count(Operation::PatchCatalogueEntry),
        1
    );

    assert!(!directory.is_toggling("p1").unwrap());
    let accepted = directory
        .toggle_availability(&entry(&directory, "f2"))
        .await
        .unwrap();
    assert!(accepted.is_available);
}

#[tokio::test]
async fn failed_toggle_unlocks_and_leaves_entry() {
    let directory = loaded("s1").await;
    directory
        .transport()
        .fail_next(Operation::PatchCatalogueEntry, "Error al actualizar el stock");

    let err = directory
        .toggle_availability(&entry(&directory, "f1"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Error al actualizar el stock");
    assert!(entry(&directory, "f1").is_available);
    assert!(!directory.is_toggling("p1").unwrap());
    directory
        .toggle_availability(&entry(&directory, "f1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn other_stores_are_not_blocked() {
    let directory = loaded("s1").await;
    let gate = directory.transport().pause_catalogue_patches();
    let pending = entry(&directory, "f1");

    let (first, added) = tokio::join!(directory.toggle_availability(&pending), async {
        while !directory.is_toggling("p1").unwrap() {
            tokio::task::yield_now().await;
        }
        let added = directory.add_catalogue_entry("p2", "f1").await;
        gate.release();
        added
    });

    first.unwrap();
    assert!(added.unwrap().is_available);
}

#[tokio::test]
async fn add_remove_and_refresh_catalogue() {
    let directory = loaded("s1").await;
    directory.select(&crate::support::huerta()).unwrap();

    directory.add_catalogue_entry("p1", "f3").await.unwrap();
    assert_eq!(
        directory.selection().unwrap().unwrap().store.catalogue.len(),
        3
    );

    let err = directory.add_catalogue_entry("p1", "f3").await.unwrap_err();
    assert!(matches!(
        err,
        CoordinatorError::Mutation {
            status: Some(409),
            ..
        }
    ));

    directory.remove_catalogue_entry("p1", "f2").await.unwrap();
    let entries = directory.refresh_catalogue("p1").await.unwrap();
    let foods: Vec<&str> = entries.iter().map(|e| e.food_local_id.as_str()).collect();
    assert_eq!(foods, vec!["f1", "f3"]);
    assert_eq!(
        directory.selection().unwrap().unwrap().store.catalogue.len(),
        2
    );
}
