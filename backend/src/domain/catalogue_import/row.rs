//! Raw catalogue rows as read from the CSV file.

use std::collections::HashMap;

/// Header names of the catalogue spreadsheet.
pub mod columns {
    /// Company name; required.
    pub const COMPANY: &str = "Company Names";
    /// Car model name; required.
    pub const CAR_NAME: &str = "Cars Names";
    /// Engine type; required.
    pub const ENGINE: &str = "Engines";
    /// Displacement or battery capacity.
    pub const CAPACITY: &str = "CC/Battery Capacity";
    /// Power output.
    pub const HORSEPOWER: &str = "HorsePower";
    /// Top speed in km/h.
    pub const TOP_SPEED: &str = "Total Speed";
    /// 0-100 km/h time in seconds.
    pub const ACCELERATION: &str = "Performance(0 - 100 )KM/H";
    /// Price, usually with a currency symbol.
    pub const PRICE: &str = "Cars Prices";
    /// Fuel type; optional.
    pub const FUEL_TYPE: &str = "Fuel Types";
    /// Seat count.
    pub const SEATS: &str = "Seats";
    /// Torque in Nm.
    pub const TORQUE: &str = "Torque";
}

/// One data row keyed by column header.
///
/// `line` is the 1-based line of the file the row started on; the header
/// occupies line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueRow {
    line: u64,
    cells: HashMap<String, String>,
}

impl CatalogueRow {
    /// Row that started on file line `line`.
    pub fn new(line: u64, cells: HashMap<String, String>) -> Self {
        Self { line, cells }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<'a>(line: u64, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let cells = pairs
            .into_iter()
            .map(|(column, value)| (column.to_owned(), value.to_owned()))
            .collect();
        Self::new(line, cells)
    }

    /// 1-based file line the row started on.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Trimmed cell value; missing, empty and whitespace-only cells are `None`.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}
