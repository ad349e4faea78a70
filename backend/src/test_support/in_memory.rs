//! In-memory catalogue and user store implementing every driven port.
//!
//! Mirrors the relational rules of the PostgreSQL schema: unique names,
//! foreign keys, `RESTRICT` on companies, `SET NULL` on engines and fuel
//! types, and `CASCADE` from cars to performance. Import transactions work on
//! a copy of the state and savepoints are stacked snapshots of that copy.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::catalogue::{
    Car, CarDraft, CarId, CarPatch, Engine, EngineDraft, EngineId, EnginePatch, NamedReference,
    Performance, PerformanceDraft, PerformanceId, PerformancePatch, PerformanceSearch,
    ReferenceId, ReferenceKind, ReferenceName, SeatCount,
};
use crate::domain::ports::{
    CarRepository, CatalogueImportStore, CatalogueRepositoryError, EngineRepository,
    ImportStoreError, ImportTransaction, NewUserRecord, PerformanceRepository,
    ReferenceRepository, StoredUser, UserPersistenceError, UserRepository,
};
use crate::domain::{User, UserId};

#[derive(Debug, Clone, PartialEq)]
struct CarRecord {
    name: String,
    company_id: ReferenceId,
    engine_id: Option<EngineId>,
    fuel_type_id: Option<ReferenceId>,
    price: Option<u32>,
    seats: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct State {
    next_id: i32,
    companies: BTreeMap<ReferenceId, String>,
    fuel_types: BTreeMap<ReferenceId, String>,
    engines: BTreeMap<EngineId, Engine>,
    cars: BTreeMap<CarId, CarRecord>,
    performances: BTreeMap<PerformanceId, Performance>,
    users: BTreeMap<i32, StoredUser>,
}

/// Which store-level rule rejected a write.
#[derive(Debug)]
enum Violation {
    Duplicate(String),
    MissingReference(String),
    StillReferenced(String),
}

impl From<Violation> for CatalogueRepositoryError {
    fn from(violation: Violation) -> Self {
        match violation {
            Violation::Duplicate(message) => Self::duplicate(message),
            Violation::MissingReference(message) => Self::missing_reference(message),
            Violation::StillReferenced(message) => Self::still_referenced(message),
        }
    }
}

impl From<Violation> for ImportStoreError {
    fn from(violation: Violation) -> Self {
        match violation {
            Violation::Duplicate(message)
            | Violation::MissingReference(message)
            | Violation::StillReferenced(message) => Self::constraint(message),
        }
    }
}

fn matches(haystack: &str, query: &str) -> bool {
    haystack.to_lowercase().contains(&query.to_lowercase())
}

impl State {
    fn allocate(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn references(&self, kind: ReferenceKind) -> &BTreeMap<ReferenceId, String> {
        match kind {
            ReferenceKind::Company => &self.companies,
            ReferenceKind::FuelType => &self.fuel_types,
        }
    }

    fn references_mut(&mut self, kind: ReferenceKind) -> &mut BTreeMap<ReferenceId, String> {
        match kind {
            ReferenceKind::Company => &mut self.companies,
            ReferenceKind::FuelType => &mut self.fuel_types,
        }
    }

    fn reference(&self, kind: ReferenceKind, id: ReferenceId) -> Option<NamedReference> {
        self.references(kind).get(&id).map(|name| NamedReference {
            id,
            name: name.clone(),
        })
    }

    fn reference_named(&self, kind: ReferenceKind, name: &str) -> Option<NamedReference> {
        self.references(kind)
            .iter()
            .find(|(_, existing)| existing.as_str() == name)
            .map(|(id, existing)| NamedReference {
                id: *id,
                name: existing.clone(),
            })
    }

    fn insert_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, Violation> {
        if self.reference_named(kind, name.as_str()).is_some() {
            return Err(Violation::Duplicate(format!("{kind} '{name}' already exists")));
        }
        let id = ReferenceId::new(self.allocate());
        self.references_mut(kind).insert(id, name.as_str().to_owned());
        Ok(NamedReference {
            id,
            name: name.as_str().to_owned(),
        })
    }

    fn rename_reference(
        &mut self,
        kind: ReferenceKind,
        id: ReferenceId,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, Violation> {
        if !self.references(kind).contains_key(&id) {
            return Ok(None);
        }
        if self
            .reference_named(kind, name.as_str())
            .is_some_and(|other| other.id != id)
        {
            return Err(Violation::Duplicate(format!("{kind} '{name}' already exists")));
        }
        self.references_mut(kind).insert(id, name.as_str().to_owned());
        Ok(self.reference(kind, id))
    }

    fn delete_reference(&mut self, kind: ReferenceKind, id: ReferenceId) -> Result<bool, Violation> {
        if !self.references(kind).contains_key(&id) {
            return Ok(false);
        }
        match kind {
            ReferenceKind::Company => {
                if self.cars.values().any(|car| car.company_id == id) {
                    return Err(Violation::StillReferenced(format!(
                        "company {id} is still referenced by cars"
                    )));
                }
            }
            ReferenceKind::FuelType => {
                for car in self.cars.values_mut() {
                    if car.fuel_type_id == Some(id) {
                        car.fuel_type_id = None;
                    }
                }
            }
        }
        self.references_mut(kind).remove(&id);
        Ok(true)
    }

    fn insert_engine(&mut self, draft: &EngineDraft) -> Engine {
        let engine = Engine {
            id: EngineId::new(self.allocate()),
            engine_type: draft.engine_type.as_str().to_owned(),
            cc: draft.cc.map(|value| value.get()),
            horsepower: draft.horsepower.map(|value| value.get()),
            torque: draft.torque.map(|value| value.get()),
        };
        self.engines.insert(engine.id, engine.clone());
        engine
    }

    fn delete_engine(&mut self, id: EngineId) -> bool {
        if self.engines.remove(&id).is_none() {
            return false;
        }
        for car in self.cars.values_mut() {
            if car.engine_id == Some(id) {
                car.engine_id = None;
            }
        }
        true
    }

    fn check_car_references(&self, record: &CarRecord) -> Result<(), Violation> {
        if !self.companies.contains_key(&record.company_id) {
            return Err(Violation::MissingReference(format!(
                "company {} does not exist",
                record.company_id
            )));
        }
        if let Some(engine_id) = record
            .engine_id
            .filter(|engine_id| !self.engines.contains_key(engine_id))
        {
            return Err(Violation::MissingReference(format!(
                "engine {engine_id} does not exist"
            )));
        }
        if let Some(fuel_type_id) = record
            .fuel_type_id
            .filter(|fuel_type_id| !self.fuel_types.contains_key(fuel_type_id))
        {
            return Err(Violation::MissingReference(format!(
                "fuel type {fuel_type_id} does not exist"
            )));
        }
        Ok(())
    }

    fn car(&self, id: CarId) -> Option<Car> {
        let record = self.cars.get(&id)?;
        Some(Car {
            id,
            name: record.name.clone(),
            company_id: record.company_id,
            company_name: self.companies.get(&record.company_id).cloned().unwrap_or_default(),
            engine_id: record.engine_id,
            fuel_type_id: record.fuel_type_id,
            fuel_type_name: record
                .fuel_type_id
                .and_then(|fuel_type_id| self.fuel_types.get(&fuel_type_id).cloned()),
            price: record.price,
            seats: record.seats,
        })
    }

    fn insert_car(&mut self, draft: &CarDraft) -> Result<CarId, Violation> {
        let record = CarRecord {
            name: draft.name.as_str().to_owned(),
            company_id: draft.company_id,
            engine_id: draft.engine_id,
            fuel_type_id: draft.fuel_type_id,
            price: draft.price.map(|value| value.get()),
            seats: draft.seats.map(SeatCount::get),
        };
        self.check_car_references(&record)?;
        let id = CarId::new(self.allocate());
        self.cars.insert(id, record);
        Ok(id)
    }

    fn update_car(&mut self, id: CarId, patch: &CarPatch) -> Result<Option<Car>, Violation> {
        let Some(current) = self.car(id) else {
            return Ok(None);
        };
        let updated = patch.apply(&current);
        let record = CarRecord {
            name: updated.name,
            company_id: updated.company_id,
            engine_id: updated.engine_id,
            fuel_type_id: updated.fuel_type_id,
            price: updated.price,
            seats: updated.seats,
        };
        self.check_car_references(&record)?;
        self.cars.insert(id, record);
        Ok(self.car(id))
    }

    fn delete_car(&mut self, id: CarId) -> bool {
        if self.cars.remove(&id).is_none() {
            return false;
        }
        self.performances
            .retain(|_, performance| performance.car_id != id);
        true
    }

    fn insert_performance(&mut self, draft: &PerformanceDraft) -> Result<Performance, Violation> {
        if !self.cars.contains_key(&draft.car_id) {
            return Err(Violation::MissingReference(format!(
                "car {} does not exist",
                draft.car_id
            )));
        }
        if self
            .performances
            .values()
            .any(|existing| existing.car_id == draft.car_id)
        {
            return Err(Violation::Duplicate(format!(
                "car {} already has a performance record",
                draft.car_id
            )));
        }
        let performance = Performance {
            id: PerformanceId::new(self.allocate()),
            car_id: draft.car_id,
            top_speed: draft.top_speed.map(|value| value.get()),
            acceleration_0_100: draft.acceleration_0_100.map(|value| value.seconds()),
        };
        self.performances.insert(performance.id, performance.clone());
        Ok(performance)
    }
}

/// Shared in-memory store. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogue {
    state: Arc<Mutex<State>>,
    rejected_car: Option<String>,
    unavailable: bool,
}

impl InMemoryCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make import transactions reject inserting a car with this name, as a
    /// database constraint would.
    #[must_use]
    pub fn rejecting_car(mut self, name: impl Into<String>) -> Self {
        self.rejected_car = Some(name.into());
        self
    }

    /// Make every import transaction fail to open.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn companies(&self) -> Vec<NamedReference> {
        self.references(ReferenceKind::Company)
    }

    pub fn fuel_types(&self) -> Vec<NamedReference> {
        self.references(ReferenceKind::FuelType)
    }

    fn references(&self, kind: ReferenceKind) -> Vec<NamedReference> {
        let state = self.lock();
        state
            .references(kind)
            .keys()
            .filter_map(|id| state.reference(kind, *id))
            .collect()
    }

    pub fn engines(&self) -> Vec<Engine> {
        self.lock().engines.values().cloned().collect()
    }

    pub fn cars(&self) -> Vec<Car> {
        let state = self.lock();
        state.cars.keys().filter_map(|id| state.car(*id)).collect()
    }

    pub fn performances(&self) -> Vec<Performance> {
        self.lock().performances.values().cloned().collect()
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryCatalogue {
    async fn list(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError> {
        Ok(self.references(kind))
    }

    async fn find(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError> {
        Ok(self.lock().reference(kind, id))
    }

    async fn create(
        &self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, CatalogueRepositoryError> {
        Ok(self.lock().insert_reference(kind, name)?)
    }

    async fn rename(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, CatalogueRepositoryError> {
        Ok(self.lock().rename_reference(kind, id, name)?)
    }

    async fn delete(
        &self,
        kind: ReferenceKind,
        id: ReferenceId,
    ) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().delete_reference(kind, id)?)
    }

    async fn search(
        &self,
        kind: ReferenceKind,
        query: &str,
    ) -> Result<Vec<NamedReference>, CatalogueRepositoryError> {
        Ok(self
            .references(kind)
            .into_iter()
            .filter(|reference| matches(&reference.name, query))
            .collect())
    }
}

#[async_trait]
impl EngineRepository for InMemoryCatalogue {
    async fn list(&self) -> Result<Vec<Engine>, CatalogueRepositoryError> {
        Ok(self.engines())
    }

    async fn find(&self, id: EngineId) -> Result<Option<Engine>, CatalogueRepositoryError> {
        Ok(self.lock().engines.get(&id).cloned())
    }

    async fn create(&self, draft: &EngineDraft) -> Result<Engine, CatalogueRepositoryError> {
        Ok(self.lock().insert_engine(draft))
    }

    async fn update(
        &self,
        id: EngineId,
        patch: &EnginePatch,
    ) -> Result<Option<Engine>, CatalogueRepositoryError> {
        let mut state = self.lock();
        let Some(current) = state.engines.get(&id) else {
            return Ok(None);
        };
        let updated = patch.apply(current);
        state.engines.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: EngineId) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().delete_engine(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<Engine>, CatalogueRepositoryError> {
        Ok(self
            .engines()
            .into_iter()
            .filter(|engine| matches(&engine.engine_type, query))
            .collect())
    }
}

#[async_trait]
impl CarRepository for InMemoryCatalogue {
    async fn list(&self) -> Result<Vec<Car>, CatalogueRepositoryError> {
        Ok(self.cars())
    }

    async fn find(&self, id: CarId) -> Result<Option<Car>, CatalogueRepositoryError> {
        Ok(self.lock().car(id))
    }

    async fn create(&self, draft: &CarDraft) -> Result<Car, CatalogueRepositoryError> {
        let mut state = self.lock();
        let id = state.insert_car(draft)?;
        state
            .car(id)
            .ok_or_else(|| CatalogueRepositoryError::query(format!("car {id} vanished")))
    }

    async fn update(
        &self,
        id: CarId,
        patch: &CarPatch,
    ) -> Result<Option<Car>, CatalogueRepositoryError> {
        Ok(self.lock().update_car(id, patch)?)
    }

    async fn delete(&self, id: CarId) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().delete_car(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<Car>, CatalogueRepositoryError> {
        Ok(self
            .cars()
            .into_iter()
            .filter(|car| matches(&car.name, query))
            .collect())
    }
}

#[async_trait]
impl PerformanceRepository for InMemoryCatalogue {
    async fn list(&self) -> Result<Vec<Performance>, CatalogueRepositoryError> {
        Ok(self.performances())
    }

    async fn find(
        &self,
        id: PerformanceId,
    ) -> Result<Option<Performance>, CatalogueRepositoryError> {
        Ok(self.lock().performances.get(&id).cloned())
    }

    async fn create(
        &self,
        draft: &PerformanceDraft,
    ) -> Result<Performance, CatalogueRepositoryError> {
        Ok(self.lock().insert_performance(draft)?)
    }

    async fn update(
        &self,
        id: PerformanceId,
        patch: &PerformancePatch,
    ) -> Result<Option<Performance>, CatalogueRepositoryError> {
        let mut state = self.lock();
        let Some(current) = state.performances.get(&id) else {
            return Ok(None);
        };
        let updated = patch.apply(current);
        state.performances.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: PerformanceId) -> Result<bool, CatalogueRepositoryError> {
        Ok(self.lock().performances.remove(&id).is_some())
    }

    async fn search(
        &self,
        filter: PerformanceSearch,
    ) -> Result<Vec<Performance>, CatalogueRepositoryError> {
        Ok(self
            .performances()
            .into_iter()
            .filter(|performance| filter.matches(performance.top_speed))
            .collect())
    }
}

/// Import transaction over a private copy of the store state.
#[derive(Debug)]
struct InMemoryTransaction {
    shared: Arc<Mutex<State>>,
    working: State,
    savepoints: Vec<State>,
    rejected_car: Option<String>,
}

#[async_trait]
impl ImportTransaction for InMemoryTransaction {
    async fn savepoint(&mut self) -> Result<(), ImportStoreError> {
        self.savepoints.push(self.working.clone());
        Ok(())
    }

    async fn release_savepoint(&mut self) -> Result<(), ImportStoreError> {
        self.savepoints
            .pop()
            .map(|_| ())
            .ok_or_else(|| ImportStoreError::query("no savepoint to release"))
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), ImportStoreError> {
        let snapshot = self
            .savepoints
            .pop()
            .ok_or_else(|| ImportStoreError::query("no savepoint to roll back to"))?;
        self.working = snapshot;
        Ok(())
    }

    async fn find_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<Option<NamedReference>, ImportStoreError> {
        Ok(self.working.reference_named(kind, name.as_str()))
    }

    async fn insert_reference(
        &mut self,
        kind: ReferenceKind,
        name: &ReferenceName,
    ) -> Result<NamedReference, ImportStoreError> {
        Ok(self.working.insert_reference(kind, name)?)
    }

    async fn insert_engine(&mut self, draft: &EngineDraft) -> Result<EngineId, ImportStoreError> {
        Ok(self.working.insert_engine(draft).id)
    }

    async fn insert_car(&mut self, draft: &CarDraft) -> Result<CarId, ImportStoreError> {
        if self.rejected_car.as_deref() == Some(draft.name.as_str()) {
            return Err(ImportStoreError::constraint(format!(
                "car '{}' rejected",
                draft.name.as_str()
            )));
        }
        Ok(self.working.insert_car(draft)?)
    }

    async fn insert_performance(
        &mut self,
        draft: &PerformanceDraft,
    ) -> Result<PerformanceId, ImportStoreError> {
        Ok(self.working.insert_performance(draft)?.id)
    }

    async fn commit(self: Box<Self>) -> Result<(), ImportStoreError> {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        *shared = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), ImportStoreError> {
        Ok(())
    }
}

#[async_trait]
impl CatalogueImportStore for InMemoryCatalogue {
    async fn begin(&self) -> Result<Box<dyn ImportTransaction>, ImportStoreError> {
        if self.unavailable {
            return Err(ImportStoreError::connection("in-memory store offline"));
        }
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            working: self.lock().clone(),
            savepoints: Vec::new(),
            rejected_car: self.rejected_car.clone(),
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalogue {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut state = self.lock();
        for existing in state.users.values() {
            if existing.user.username() == &record.username {
                return Err(UserPersistenceError::duplicate("username"));
            }
            if existing.user.email() == &record.email {
                return Err(UserPersistenceError::duplicate("email"));
            }
        }
        let id = state.allocate();
        let user = User::new(
            UserId::new(id),
            record.username.clone(),
            record.email.clone(),
            Utc::now(),
        );
        state.users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password: record.password.clone(),
            },
        );
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|stored| stored.user.username().as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .get(&id.get())
            .map(|stored| stored.user.clone()))
    }
}
