//! Append-only accumulator of audit records.

use crate::audit::AuditRecord;
use crate::classify::Outcome;

/// Records collected over a run.
///
/// Per-device batches are built independently and merged with
/// [`AuditLog::extend`]; records are never modified once pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLog {
    records: Vec<AuditRecord>,
}

impl AuditLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record.
    pub fn push(&mut self, record: AuditRecord) {
        self.records.push(record);
    }

    /// Append a batch of records.
    pub fn extend(&mut self, records: impl IntoIterator<Item = AuditRecord>) {
        self.records.extend(records);
    }

    /// Order by device, then file path. Parallel runs collect records in
    /// completion order, so this is what makes reports reproducible.
    pub fn sort(&mut self) {
        self.records.sort_by(|a, b| {
            a.device
                .cmp(&b.device)
                .then_with(|| a.outcome.is_directory_level().cmp(&b.outcome.is_directory_level()))
                .then_with(|| a.file.cmp(&b.file))
        });
    }

    /// Records in their current order.
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was collected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose relocation or cleanup failed.
    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }

    /// Count of records per outcome, skipping outcomes that never occurred.
    pub fn summary(&self) -> Vec<(Outcome, usize)> {
        Outcome::ALL
            .iter()
            .map(|&outcome| {
                let count = self.records.iter().filter(|r| r.outcome == outcome).count();
                (outcome, count)
            })
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

impl FromIterator<AuditRecord> for AuditLog {
    fn from_iter<I: IntoIterator<Item = AuditRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AuditLog {
    type Item = AuditRecord;
    type IntoIter = std::vec::IntoIter<AuditRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
