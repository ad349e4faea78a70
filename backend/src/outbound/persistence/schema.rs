//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `migrations/`; `diesel print-schema` against a migrated
//! database regenerates the table blocks.

diesel::table! {
    /// Car manufacturers.
    companies (id) {
        id -> Int4,
        /// Unique, at most 100 characters.
        name -> Varchar,
    }
}

diesel::table! {
    /// Fuel or energy sources.
    fuel_types (id) {
        id -> Int4,
        /// Unique, at most 50 characters.
        name -> Varchar,
    }
}

diesel::table! {
    engines (id) {
        id -> Int4,
        engine_type -> Varchar,
        cc -> Nullable<Int4>,
        horsepower -> Nullable<Int4>,
        torque -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Cars. Deleting a company that still has cars is rejected; deleting an
    /// engine or fuel type clears the reference.
    cars (id) {
        id -> Int4,
        name -> Varchar,
        company_id -> Int4,
        engine_id -> Nullable<Int4>,
        fuel_type_id -> Nullable<Int4>,
        price -> Nullable<Int4>,
        seats -> Nullable<Int4>,
    }
}

diesel::table! {
    /// One row per car at most; removed together with its car.
    performance (id) {
        id -> Int4,
        car_id -> Int4,
        top_speed -> Nullable<Int4>,
        acceleration_0_100 -> Nullable<Float8>,
    }
}

diesel::table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        email -> Varchar,
        /// `sha256$<salt>$<digest>`.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(cars -> companies (company_id));
diesel::joinable!(cars -> engines (engine_id));
diesel::joinable!(cars -> fuel_types (fuel_type_id));
diesel::joinable!(performance -> cars (car_id));

diesel::allow_tables_to_appear_in_same_query!(
    companies,
    fuel_types,
    engines,
    cars,
    performance,
    users,
);
