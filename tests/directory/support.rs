//! Shared fixtures: a small directory of stores and comments.

use foodstore_sync::{
    CatalogueEntry, Comment, Credential, FoodItem, InMemoryTransport, Session, Store,
    StoreDirectory, StoreQuery,
};

/// Install a test subscriber once so `RUST_LOG=foodstore_sync=debug` shows
/// coordinator logs.
pub fn init_test_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn huerta() -> Store {
    let mut store = Store::new("p1", "s1").with_owner_name("La Huerta");
    let mut entry = CatalogueEntry::new("p1", "f1", true);
    entry.food_local = Some(FoodItem {
        id: "f1".into(),
        name: "Pan integral".into(),
        ..FoodItem::default()
    });
    store.catalogue.push(entry);
    store.catalogue.push(CatalogueEntry::new("p1", "f2", false));
    store
}

pub fn panaderia() -> Store {
    Store::new("p2", "s2").with_owner_name("Panadería Sur")
}

pub fn comments() -> Vec<Comment> {
    vec![
        Comment::new("c1", "u2", "s2").with_content("Buen pan").recommended(true),
        Comment::new("c2", "u3", "s2").with_content("Caro"),
    ]
}

pub fn transport() -> InMemoryTransport {
    InMemoryTransport::new()
        .with_stores(vec![huerta(), panaderia()])
        .with_comments(comments())
}

pub fn viewer(id: &str) -> Session {
    Session::signed_in(id, Credential::new("token"))
}

pub async fn loaded(viewer_id: &str) -> StoreDirectory<InMemoryTransport> {
    init_test_logging();
    let directory = StoreDirectory::new(transport(), viewer(viewer_id));
    directory.load(&StoreQuery::default()).await.unwrap();
    directory
}
