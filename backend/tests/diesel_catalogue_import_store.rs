//! End-to-end catalogue import into embedded PostgreSQL.

use std::sync::Arc;

use car_catalogue::domain::catalogue::{ReferenceKind, ReferenceName};
use car_catalogue::domain::catalogue_import::CatalogueImportService;
use car_catalogue::domain::ports::{
    CarRepository, CatalogueImportStore, EngineRepository, PerformanceRepository,
    ReferenceRepository,
};
use car_catalogue::outbound::catalogue_csv::CsvCatalogueSource;
use car_catalogue::outbound::persistence::{
    DieselCarRepository, DieselCatalogueImportStore, DieselEngineRepository,
    DieselPerformanceRepository, DieselReferenceRepository,
};
use car_catalogue::test_support::{CatalogueCsvFixture, catalogue_line};

mod support;

use support::provision_database;

fn tesla_rows() -> Vec<String> {
    vec![
        catalogue_line([
            "Tesla", "Model S", "Dual Motor", "100 kWh", "670 hp", "322 km/h", "2.1 sec",
            "$89,990", "Electric", "5", "1,050 Nm",
        ]),
        catalogue_line([
            "Tesla", "Model 3", "Single Motor", "60 kWh", "283 hp", "225 km/h", "5.8 sec",
            "$38,990", "Electric", "5", "420 Nm",
        ]),
    ]
}

#[tokio::test]
async fn imports_rows_and_shares_references() {
    let Some(db) = provision_database().await else {
        return;
    };
    let fixture = CatalogueCsvFixture::from_lines(tesla_rows()).expect("fixture written");
    let service = CatalogueImportService::new(
        Arc::new(CsvCatalogueSource),
        Arc::new(DieselCatalogueImportStore::new(db.pool.clone())),
        fixture.path(),
    );

    let report = service
        .import_from(fixture.path())
        .await
        .expect("import succeeds");

    assert_eq!(report.rows_read, 2);
    assert_eq!(report.rows_imported, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.created.companies, 1);
    assert_eq!(report.created.fuel_types, 1);

    let references = DieselReferenceRepository::new(db.pool.clone());
    let companies = references
        .list(ReferenceKind::Company)
        .await
        .expect("list companies");
    assert_eq!(companies.len(), 1);
    assert_eq!(
        references
            .list(ReferenceKind::FuelType)
            .await
            .expect("list fuel types")
            .len(),
        1
    );
    assert_eq!(
        DieselEngineRepository::new(db.pool.clone())
            .list()
            .await
            .expect("list engines")
            .len(),
        2
    );
    let cars = DieselCarRepository::new(db.pool.clone())
        .list()
        .await
        .expect("list cars");
    assert_eq!(cars.len(), 2);
    assert!(cars.iter().all(|car| car.company_id == companies[0].id));
    let performance = DieselPerformanceRepository::new(db.pool.clone())
        .list()
        .await
        .expect("list performance");
    assert_eq!(performance.len(), 2);
    assert!(performance.iter().any(|row| row.top_speed == Some(322)));
}

#[tokio::test]
async fn failing_row_leaves_no_partial_writes() {
    let Some(db) = provision_database().await else {
        return;
    };
    let mut rows = tesla_rows();
    // Zero seats fails after the company and engine were written.
    rows.insert(
        1,
        catalogue_line([
            "Ghost Motors", "Phantom", "V12", "6,750 cc", "563 hp", "250 km/h", "5.3 sec",
            "$460,000", "Petrol", "0", "900 Nm",
        ]),
    );
    let fixture = CatalogueCsvFixture::from_lines(rows).expect("fixture written");
    let service = CatalogueImportService::new(
        Arc::new(CsvCatalogueSource),
        Arc::new(DieselCatalogueImportStore::new(db.pool.clone())),
        fixture.path(),
    );

    let report = service
        .import_from(fixture.path())
        .await
        .expect("import succeeds");

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_imported, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 3);

    let references = DieselReferenceRepository::new(db.pool.clone());
    let companies = references
        .list(ReferenceKind::Company)
        .await
        .expect("list companies");
    assert_eq!(
        companies.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["Tesla"]
    );
    assert!(
        references
            .search(ReferenceKind::FuelType, "petrol")
            .await
            .expect("search fuel types")
            .is_empty()
    );
    assert_eq!(
        DieselEngineRepository::new(db.pool.clone())
            .list()
            .await
            .expect("list engines")
            .len(),
        2
    );
}

#[tokio::test]
async fn dropped_transaction_discards_its_writes() {
    let Some(db) = provision_database().await else {
        return;
    };
    let store = DieselCatalogueImportStore::new(db.pool.clone());
    let name = ReferenceName::new(ReferenceKind::Company, "Orphan Motors").expect("valid name");

    let mut tx = store.begin().await.expect("transaction opens");
    tx.insert_reference(ReferenceKind::Company, &name)
        .await
        .expect("company inserted");
    drop(tx);

    let mut tx = store.begin().await.expect("second transaction opens");
    let found = tx
        .find_reference(ReferenceKind::Company, &name)
        .await
        .expect("lookup runs");
    tx.rollback().await.expect("rollback");
    assert_eq!(found, None);
    assert!(
        DieselReferenceRepository::new(db.pool.clone())
            .list(ReferenceKind::Company)
            .await
            .expect("list companies")
            .is_empty()
    );
}
