//! Import pipeline behaviour against the in-memory store.

use std::path::Path;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::catalogue::ReferenceKind;
use crate::domain::ports::{
    CatalogueImportCommand, CatalogueImportStore, CatalogueSourceError, ImportStoreError,
    MockCatalogueSource,
};
use crate::test_support::InMemoryCatalogue;

fn row(line: u64, company: &str, car: &str, fuel: &str) -> CatalogueRow {
    CatalogueRow::from_pairs(
        line,
        [
            (columns::COMPANY, company),
            (columns::CAR_NAME, car),
            (columns::ENGINE, "Electric"),
            (columns::CAPACITY, "100 kWh"),
            (columns::HORSEPOWER, "1020 hp"),
            (columns::TOP_SPEED, "322 km/h"),
            (columns::ACCELERATION, "2.1 sec"),
            (columns::PRICE, "$89,990"),
            (columns::FUEL_TYPE, fuel),
            (columns::SEATS, "5"),
            (columns::TORQUE, "1390 Nm"),
        ],
    )
}

#[fixture]
fn store() -> InMemoryCatalogue {
    InMemoryCatalogue::new()
}

#[rstest]
#[tokio::test]
async fn two_tesla_rows_share_company_and_fuel_type(store: InMemoryCatalogue) {
    let rows = [
        row(2, "Tesla", "Model S", "Electric"),
        row(3, "Tesla", "Model 3", "Electric"),
    ];

    let report = run_import(&store, &rows).await.expect("import runs");

    assert_eq!(
        report.created,
        EntityCounts {
            companies: 1,
            fuel_types: 1,
            engines: 2,
            cars: 2,
            performances: 2,
        }
    );
    assert!(report.is_clean());
    let companies = store.companies();
    assert_eq!(companies.len(), 1);
    let cars = store.cars();
    assert_eq!(cars.len(), 2);
    assert!(cars.iter().all(|car| car.company_id == companies[0].id));
    assert_eq!(store.performances().len(), 2);
}

#[rstest]
#[tokio::test]
async fn parsed_fields_land_on_the_right_rows(store: InMemoryCatalogue) {
    run_import(&store, &[row(2, "Tesla", "Model S", "Electric")])
        .await
        .expect("import runs");

    let engine = store.engines().pop().expect("engine");
    assert_eq!(engine.engine_type, "Electric");
    assert_eq!(engine.cc, Some(100));
    assert_eq!(engine.horsepower, Some(1020));
    assert_eq!(engine.torque, Some(1390));

    let car = store.cars().pop().expect("car");
    assert_eq!(car.name, "Model S");
    assert_eq!(car.price, Some(89_990));
    assert_eq!(car.seats, Some(5));
    assert_eq!(car.engine_id, Some(engine.id));
    assert_eq!(car.fuel_type_name.as_deref(), Some("Electric"));

    let performance = store.performances().pop().expect("performance");
    assert_eq!(performance.car_id, car.id);
    assert_eq!(performance.top_speed, Some(322));
    assert_eq!(performance.acceleration_0_100, Some(2.1));
}

#[rstest]
#[tokio::test]
async fn company_names_are_matched_after_trimming(store: InMemoryCatalogue) {
    let rows = [
        row(2, "Toyota", "Corolla", ""),
        row(3, " Toyota ", "Camry", ""),
        row(4, "toyota", "Yaris", ""),
    ];

    let report = run_import(&store, &rows).await.expect("import runs");

    assert_eq!(report.created.companies, 2);
    let names: Vec<_> = store.companies().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Toyota", "toyota"]);
}

#[rstest]
#[tokio::test]
async fn blank_fuel_type_leaves_car_without_one(store: InMemoryCatalogue) {
    let report = run_import(&store, &[row(2, "Mazda", "MX-5", "  ")])
        .await
        .expect("import runs");

    assert_eq!(report.created.fuel_types, 0);
    assert!(store.fuel_types().is_empty());
    let car = store.cars().pop().expect("car");
    assert_eq!(car.fuel_type_id, None);
}

#[rstest]
#[tokio::test]
async fn malformed_row_is_isolated(store: InMemoryCatalogue) {
    let rows = [
        row(2, "Ford", "Focus", "Petrol"),
        row(3, "", "Orphan", "Diesel"),
        row(4, "Ford", "Fiesta", "Petrol"),
    ];

    let report = run_import(&store, &rows).await.expect("import runs");

    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_imported, 2);
    assert_eq!(
        report.failures,
        [RowFailure {
            row: 3,
            message: "missing required column 'Company Names'".to_owned(),
        }]
    );
    assert_eq!(store.cars().len(), 2);
    assert_eq!(store.engines().len(), 2);
    assert_eq!(store.performances().len(), 2);
    assert!(
        store.fuel_types().iter().all(|fuel| fuel.name != "Diesel"),
        "failed row must not leave a fuel type behind"
    );
}

#[rstest]
#[tokio::test]
async fn store_rejection_rolls_back_the_rows_earlier_writes() {
    let store = InMemoryCatalogue::new().rejecting_car("Cursed");
    let rows = [
        row(2, "Fiat", "Panda", "Petrol"),
        row(3, "Lancia", "Cursed", "Diesel"),
    ];

    let report = run_import(&store, &rows).await.expect("import runs");

    assert_eq!(report.rows_imported, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 3);
    assert!(report.failures[0].message.contains("Cursed"));
    assert_eq!(store.engines().len(), 1, "engine of the failed row is undone");
    let companies: Vec<_> = store.companies().into_iter().map(|c| c.name).collect();
    assert_eq!(companies, ["Fiat"]);
    assert_eq!(report.created.companies, 1);
}

#[rstest]
#[case(columns::CAR_NAME, "missing required column 'Cars Names'")]
#[case(columns::ENGINE, "missing required column 'Engines'")]
#[tokio::test]
async fn required_columns_fail_the_row(
    store: InMemoryCatalogue,
    #[case] column: &str,
    #[case] expected: &str,
) {
    let mut cells: Vec<(&str, &str)> = vec![
        (columns::COMPANY, "Kia"),
        (columns::CAR_NAME, "Ceed"),
        (columns::ENGINE, "I4"),
    ];
    cells.retain(|(name, _)| *name != column);

    let report = run_import(&store, &[CatalogueRow::from_pairs(2, cells)])
        .await
        .expect("import runs");

    assert_eq!(report.failures[0].message, expected);
    assert!(store.companies().is_empty());
}

#[rstest]
#[case(columns::SEATS, "0")]
#[case(columns::PRICE, "$99,999,999,999")]
#[case(columns::HORSEPOWER, "99999999999999999999999 hp")]
#[tokio::test]
async fn out_of_range_numbers_fail_the_row(
    store: InMemoryCatalogue,
    #[case] column: &str,
    #[case] value: &str,
) {
    let mut cells: Vec<(&str, &str)> = vec![
        (columns::COMPANY, "Kia"),
        (columns::CAR_NAME, "Ceed"),
        (columns::ENGINE, "I4"),
    ];
    cells.push((column, value));

    let report = run_import(&store, &[CatalogueRow::from_pairs(2, cells)])
        .await
        .expect("import runs");

    assert_eq!(report.rows_imported, 0);
    assert!(
        report.failures[0].message.contains(column),
        "{}",
        report.failures[0].message
    );
    assert!(store.cars().is_empty());
}

#[rstest]
#[tokio::test]
async fn unparsable_cells_are_stored_as_absent(store: InMemoryCatalogue) {
    let cells = [
        (columns::COMPANY, "Kia"),
        (columns::CAR_NAME, "Ceed"),
        (columns::ENGINE, "I4"),
        (columns::TOP_SPEED, "N/A"),
        (columns::ACCELERATION, "unknown"),
        (columns::PRICE, "TBD"),
    ];

    let report = run_import(&store, &[CatalogueRow::from_pairs(2, cells)])
        .await
        .expect("import runs");

    assert!(report.is_clean());
    let performance = store.performances().pop().expect("performance");
    assert_eq!(performance.top_speed, None);
    assert_eq!(performance.acceleration_0_100, None);
    assert_eq!(store.cars()[0].price, None);
}

#[rstest]
#[tokio::test]
async fn second_run_reuses_committed_references(store: InMemoryCatalogue) {
    run_import(&store, &[row(2, "Audi", "A4", "Petrol")])
        .await
        .expect("first run");
    let report = run_import(&store, &[row(2, "Audi", "A6", "Petrol")])
        .await
        .expect("second run");

    assert_eq!(report.created.companies, 0);
    assert_eq!(report.created.fuel_types, 0);
    assert_eq!(store.companies().len(), 1);
    assert_eq!(store.cars().len(), 2);
}

#[rstest]
#[tokio::test]
async fn unavailable_store_aborts_the_run() {
    let store = InMemoryCatalogue::new().unavailable();

    let err = run_import(&store, &[row(2, "Audi", "A4", "Petrol")])
        .await
        .expect_err("begin fails");

    assert!(matches!(err, ImportStoreError::Connection { .. }));
    assert!(store.cars().is_empty());
}

#[rstest]
#[tokio::test]
async fn resolver_reports_creation_once(store: InMemoryCatalogue) {
    let mut tx = store.begin().await.expect("transaction");

    let first = get_or_create(tx.as_mut(), ReferenceKind::Company, Some("BMW "))
        .await
        .expect("resolves")
        .expect("present");
    let second = get_or_create(tx.as_mut(), ReferenceKind::Company, Some("BMW"))
        .await
        .expect("resolves")
        .expect("present");
    let absent = get_or_create(tx.as_mut(), ReferenceKind::FuelType, None)
        .await
        .expect("resolves");

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.reference, second.reference);
    assert_eq!(absent, None);
    assert!(store.companies().is_empty(), "nothing visible before commit");

    tx.commit().await.expect("commit");
    assert_eq!(store.companies().len(), 1);
}

#[rstest]
#[tokio::test]
async fn missing_file_fails_without_touching_the_store(store: InMemoryCatalogue) {
    let mut source = MockCatalogueSource::new();
    source
        .expect_read_rows()
        .withf(|path| path == Path::new("missing.csv"))
        .times(1)
        .return_once(|_| Err(CatalogueSourceError::not_found("missing.csv")));
    let service =
        CatalogueImportService::new(Arc::new(source), Arc::new(store.clone()), "missing.csv");

    let err = service
        .import_catalogue()
        .await
        .expect_err("missing file fails");

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert!(store.companies().is_empty());
    assert!(store.cars().is_empty());
}

#[rstest]
#[tokio::test]
async fn service_imports_rows_from_its_source(store: InMemoryCatalogue) {
    let mut source = MockCatalogueSource::new();
    source
        .expect_read_rows()
        .times(1)
        .return_once(|_| Ok(vec![row(2, "Tesla", "Model Y", "Electric")]));
    let service = CatalogueImportService::new(Arc::new(source), Arc::new(store.clone()), "cars.csv");

    let report = service.import_catalogue().await.expect("import succeeds");

    assert_eq!(report.rows_imported, 1);
    assert_eq!(service.path(), Path::new("cars.csv"));
    assert_eq!(store.cars().len(), 1);
}

#[rstest]
fn store_outage_maps_to_service_unavailable() {
    let err = crate::domain::Error::from(ImportError::Store(ImportStoreError::connection(
        "refused",
    )));
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
