//! Full storefront lifecycle against the live mock server.
//!
//! Starts the mock server on a random port, then drives the real controllers
//! (auth flow + inventory) over HTTP with the ureq transport: registration,
//! login persistence, the fetch-after-mutation policy, stock depletion, and
//! logout teardown.

use std::sync::Arc;

use sweetshop_client::{
    Api, AuthFlow, AuthState, CreateSweet, Inventory, RegisterUser, SessionStore, UpdateSweet,
    UreqTransport,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn storefront_lifecycle() {
    let base_url = start_server();
    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let session = Arc::new(SessionStore::open(&session_path));
    let api = Arc::new(Api::new(
        &base_url,
        Box::new(UreqTransport::new()),
        session.clone(),
    ));
    let mut auth = AuthFlow::new(api.clone(), session.clone());
    assert_eq!(auth.state(), AuthState::LoggedOut);

    // Login before any account exists fails and stays retry-safe.
    auth.submit_login("alice", "pw123");
    assert_eq!(auth.state(), AuthState::LoggedOut);
    assert_eq!(auth.error(), Some("Incorrect username or password"));

    // Registration issues a token and logs straight in.
    auth.submit_register(&RegisterUser {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "pw123".to_string(),
    });
    assert_eq!(auth.state(), AuthState::LoggedIn);
    let persisted = session.get().unwrap();
    assert!(!persisted.token.is_empty());
    assert_eq!(persisted.username, "alice");

    // The session survives a reload within the same profile.
    let reopened = SessionStore::open(&session_path);
    assert_eq!(reopened.get().unwrap().token, persisted.token);

    let mut inventory = Inventory::new(api.clone());
    inventory.refresh();
    assert!(inventory.sweets().is_empty());
    assert!(inventory.banner().is_none());

    // Create: success notice, then the re-fetched list shows Barfi exactly once.
    inventory.create(&CreateSweet {
        name: "Barfi".to_string(),
        category: "Sweet".to_string(),
        price: 5.0,
        quantity: 20,
        description: None,
    });
    assert_eq!(inventory.notice(), Some("Success!"));
    let barfis: Vec<_> = inventory
        .sweets()
        .iter()
        .filter(|s| s.name == "Barfi")
        .collect();
    assert_eq!(barfis.len(), 1);
    let barfi_id = barfis[0].id;

    inventory.create(&CreateSweet {
        name: "Ladoo".to_string(),
        category: "Sweet".to_string(),
        price: 10.0,
        quantity: 1,
        description: Some("One left".to_string()),
    });
    assert_eq!(inventory.sweets().len(), 2);
    let ladoo_id = inventory
        .sweets()
        .iter()
        .find(|s| s.name == "Ladoo")
        .unwrap()
        .id;

    // Search filters by name substring; a blank term shows everything again.
    inventory.search("lad");
    assert_eq!(inventory.sweets().len(), 1);
    assert_eq!(inventory.sweets()[0].id, ladoo_id);
    inventory.search("  ");
    assert_eq!(inventory.sweets().len(), 2);

    // Update flows through the server and comes back via the re-fetch.
    inventory.update(
        barfi_id,
        &UpdateSweet {
            price: Some(6.5),
            ..UpdateSweet::default()
        },
    );
    assert_eq!(inventory.notice(), Some("Success!"));
    let barfi = inventory
        .sweets()
        .iter()
        .find(|s| s.id == barfi_id)
        .unwrap();
    assert_eq!(barfi.price, 6.5);

    // Purchase the last Ladoo: the re-fetched snapshot shows it out of stock.
    inventory.purchase(ladoo_id);
    assert_eq!(inventory.notice(), Some("Purchase successful!"));
    let ladoo = inventory
        .sweets()
        .iter()
        .find(|s| s.id == ladoo_id)
        .unwrap();
    assert!(ladoo.is_out_of_stock());

    // Purchasing an out-of-stock sweet surfaces the conflict and never
    // touches the local snapshot.
    inventory.purchase(ladoo_id);
    assert_eq!(
        inventory.notice(),
        Some("Insufficient stock. Only 0 items available")
    );
    assert_eq!(inventory.sweets().len(), 2);

    // Delete without confirmation issues no request; confirmed delete does.
    inventory.delete(ladoo_id, false);
    assert_eq!(inventory.sweets().len(), 2);
    inventory.delete(ladoo_id, true);
    assert_eq!(inventory.notice(), Some("Deleted successfully!"));
    assert_eq!(inventory.sweets().len(), 1);
    assert_eq!(inventory.sweets()[0].id, barfi_id);

    // Logout tears the session down completely.
    auth.logout();
    assert_eq!(auth.state(), AuthState::LoggedOut);
    assert!(session.get().is_none());
    assert!(SessionStore::open(&session_path).get().is_none());

    // Without a token, mutations are rejected and the list stays untouched.
    inventory.create(&CreateSweet {
        name: "Jalebi".to_string(),
        category: "Sweet".to_string(),
        price: 3.0,
        quantity: 10,
        description: None,
    });
    assert_eq!(inventory.notice(), Some("Not authenticated"));
    assert_eq!(inventory.sweets().len(), 1);

    // Listing is public, so the view itself still works.
    inventory.refresh();
    assert_eq!(inventory.sweets().len(), 1);
    assert!(inventory.banner().is_none());
}

#[test]
fn fetch_failure_degrades_to_empty_list_with_banner() {
    // No server listening on this port.
    let session = Arc::new(SessionStore::in_memory());
    let api = Arc::new(Api::new(
        "http://127.0.0.1:9",
        Box::new(UreqTransport::new()),
        session,
    ));
    let mut inventory = Inventory::new(api);

    inventory.refresh();
    assert!(inventory.sweets().is_empty());
    assert!(inventory.banner().is_some());
}
