//! Property tests for the cart service.
//!
//! Random command sequences are run against a live [`CartStore`] and
//! checked against the pure model and against what reached storage.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;

use cartkit::core::{codec, CartCommand, CartState, CatalogItem, ProductId};
use cartkit::store::{MemoryStore, SqliteStore, Store};
use cartkit::{CartConfig, CartStore, MutationOutcome, Notice, DEFAULT_STORAGE_KEY};

fn product_id() -> impl Strategy<Value = ProductId> {
    (0..5u8).prop_map(|n| ProductId::new(format!("sku-{}", n)))
}

fn command() -> impl Strategy<Value = CartCommand> {
    let add = (product_id(), 0u32..5_000).prop_map(|(id, cents)| {
        let title = format!("Item {}", id);
        let image = format!("https://cdn.example.com/{}.png", id);
        CartCommand::Add(CatalogItem::new(id, title, image, f64::from(cents) / 100.0))
    });
    prop_oneof![
        add,
        product_id().prop_map(CartCommand::Increment),
        product_id().prop_map(CartCommand::Decrement),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn store_tracks_model_and_storage(commands in prop::collection::vec(command(), 0..40)) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let notices = Arc::new(AtomicUsize::new(0));
            let counter = notices.clone();
            let notifier = Arc::new(move |_: &Notice| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            let cart = CartStore::open(store.clone(), notifier, CartConfig::default())
                .await
                .unwrap();

            let mut model = CartState::new();
            let mut rejected = 0;
            for command in commands {
                let outcome = cart.execute(command.clone());
                match command.apply(&model) {
                    Ok(next) => {
                        model = next;
                        prop_assert!(outcome.is_applied());
                    }
                    Err(_) => {
                        rejected += 1;
                        prop_assert_eq!(outcome, MutationOutcome::NotFound);
                    }
                }
                prop_assert_eq!(&cart.products(), &model);
            }

            prop_assert_eq!(notices.load(Ordering::SeqCst), rejected);

            cart.flush().await.unwrap();
            if cart.revision() > 0 {
                let raw = store.get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
                prop_assert_eq!(codec::decode(&raw).unwrap(), model);
            } else {
                prop_assert!(store.get(DEFAULT_STORAGE_KEY).await.unwrap().is_none());
            }
            Ok(())
        })?;
    }

    #[test]
    fn sqlite_reopen_restores_cart(commands in prop::collection::vec(command(), 1..25)) {
        let rt = runtime();
        rt.block_on(async {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("cart.db");

            let before = {
                let store = Arc::new(SqliteStore::open(&path).unwrap());
                let cart = CartStore::open(store, Arc::new(|_: &Notice| {}), CartConfig::default())
                    .await
                    .unwrap();
                for command in commands {
                    cart.execute(command);
                }
                cart.close().await.unwrap();
                cart.products()
            };

            let store = Arc::new(SqliteStore::open(&path).unwrap());
            let cart = CartStore::open(store, Arc::new(|_: &Notice| {}), CartConfig::default())
                .await
                .unwrap();
            prop_assert_eq!(cart.products(), before);
            Ok(())
        })?;
    }
}
