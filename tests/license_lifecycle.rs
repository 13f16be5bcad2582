//! End-to-end walk through the reseller license lifecycle: purchase,
//! device binding, and refund on early deletion.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

use keygate_backend::errors::auth::AuthError;
use keygate_backend::stores::{LicenseStore, ResellerStore};
use keygate_backend::types::internal::Principal;

const PEPPER: &str = "integration-test-pepper";

async fn setup() -> (LicenseStore, ResellerStore) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    (
        LicenseStore::new(db.clone(), PEPPER.to_string()),
        ResellerStore::new(db, PEPPER.to_string()),
    )
}

#[tokio::test]
async fn reseller_purchase_binding_and_refund() {
    let (licenses, resellers) = setup().await;

    let account = resellers
        .create_reseller("reseller1", "pass", Some(50))
        .await
        .expect("reseller creation failed");
    let principal = Principal::Reseller {
        id: account.id,
        username: account.username.clone(),
    };

    // Buying a 30-day license costs 30 credits
    let license = licenses
        .create_license("enduser", "secret", Some(30), None, &principal)
        .await
        .expect("license creation failed");
    assert_eq!(
        resellers.find_reseller(account.id).await.unwrap().credits,
        20
    );

    // First device binds, second is locked out
    licenses
        .activate("enduser", "secret", Some("H1"))
        .await
        .expect("first activation failed");
    assert!(matches!(
        licenses.activate("enduser", "secret", Some("H2")).await,
        Err(AuthError::HwidMismatch(_))
    ));
    assert!(licenses
        .activate("enduser", "secret", Some("H1"))
        .await
        .is_ok());

    // Deleting right away refunds the full unused duration
    licenses
        .delete_license(license.id, &principal)
        .await
        .expect("delete failed");
    assert_eq!(
        resellers.find_reseller(account.id).await.unwrap().credits,
        50
    );
    assert!(licenses
        .list_by_reseller(account.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn pause_all_blocks_every_owned_license() {
    let (licenses, resellers) = setup().await;

    let account = resellers
        .create_reseller("reseller1", "pass", Some(50))
        .await
        .unwrap();
    let principal = Principal::Reseller {
        id: account.id,
        username: account.username.clone(),
    };

    for name in ["lic-a", "lic-b"] {
        licenses
            .create_license(name, "pw", Some(5), None, &principal)
            .await
            .unwrap();
    }

    let count = licenses.pause_all(account.id, true).await.unwrap();
    assert_eq!(count, 2);

    for name in ["lic-a", "lic-b"] {
        assert!(matches!(
            licenses.activate(name, "pw", Some("H1")).await,
            Err(AuthError::LicensePaused(_))
        ));
    }

    licenses.pause_all(account.id, false).await.unwrap();
    assert!(licenses.activate("lic-a", "pw", Some("H1")).await.is_ok());
}

#[tokio::test]
async fn cascade_delete_shares_a_fate_with_licenses() {
    let (licenses, resellers) = setup().await;

    let account = resellers
        .create_reseller("reseller1", "pass", Some(50))
        .await
        .unwrap();
    let principal = Principal::Reseller {
        id: account.id,
        username: account.username.clone(),
    };
    licenses
        .create_license("enduser", "pw", Some(5), None, &principal)
        .await
        .unwrap();

    resellers.delete_cascade(account.id).await.unwrap();

    assert!(resellers.find_reseller(account.id).await.is_err());
    assert!(matches!(
        licenses.activate("enduser", "pw", Some("H1")).await,
        Err(AuthError::InvalidCredentials(_))
    ));
}

// Arc is how the API layer shares the stores; make sure the store
// handles stay usable through it.
#[tokio::test]
async fn stores_are_shareable() {
    let (licenses, _resellers) = setup().await;
    let shared = Arc::new(licenses);

    let admin = Principal::Admin {
        email: "admin@example.com".to_string(),
    };
    shared
        .create_license("enduser", "pw", None, None, &admin)
        .await
        .unwrap();

    let handle = shared.clone();
    let task = tokio::spawn(async move {
        handle.activate("enduser", "pw", Some("H1")).await
    });

    assert!(task.await.unwrap().is_ok());
}
