//! Per-row outcomes and the aggregated import report.

/// Number of rows created per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    /// Companies inserted; reused companies are not counted.
    pub companies: usize,
    /// Fuel types inserted; reused fuel types are not counted.
    pub fuel_types: usize,
    /// Engines inserted, one per imported row.
    pub engines: usize,
    /// Cars inserted, one per imported row.
    pub cars: usize,
    /// Performance records inserted, one per imported row.
    pub performances: usize,
}

impl EntityCounts {
    fn add(&mut self, other: Self) {
        self.companies += other.companies;
        self.fuel_types += other.fuel_types;
        self.engines += other.engines;
        self.cars += other.cars;
        self.performances += other.performances;
    }
}

/// A row that was rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based file line of the row.
    pub row: u64,
    /// Why the row was abandoned.
    pub message: String,
}

/// Result of importing a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// The row's writes were kept; carries what it inserted.
    Imported(EntityCounts),
    /// The row was rolled back to its savepoint.
    Failed(RowFailure),
}

/// Summary of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Data rows seen, excluding the header.
    pub rows_read: usize,
    /// Rows whose writes were committed.
    pub rows_imported: usize,
    /// Inserted rows per entity kind.
    pub created: EntityCounts,
    /// Rolled-back rows in file order.
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    /// Fold one row outcome into the report.
    pub fn record(&mut self, outcome: RowOutcome) {
        self.rows_read += 1;
        match outcome {
            RowOutcome::Imported(created) => {
                self.rows_imported += 1;
                self.created.add(created);
            }
            RowOutcome::Failed(failure) => self.failures.push(failure),
        }
    }

    /// Whether every row made it in.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl FromIterator<RowOutcome> for ImportReport {
    fn from_iter<I: IntoIterator<Item = RowOutcome>>(iter: I) -> Self {
        let mut report = Self::default();
        for outcome in iter {
            report.record(outcome);
        }
        report
    }
}
