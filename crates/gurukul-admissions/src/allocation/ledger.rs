use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Class, ClassId};

/// Run-scoped remaining-seat counter shared by every school in a run.
///
/// Seats only ever go down, and every change goes through [`CapacityLedger::decrement`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityLedger {
    initial: BTreeMap<ClassId, u32>,
    remaining: BTreeMap<ClassId, u32>,
}

impl CapacityLedger {
    /// Seeds the ledger from class capacities. The first row for a class id wins.
    pub fn from_classes<'a, I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a Class>,
    {
        let mut initial = BTreeMap::new();
        for class in classes {
            initial.entry(class.id).or_insert(class.capacity);
        }

        Self {
            remaining: initial.clone(),
            initial,
        }
    }

    /// Remaining seats; unknown classes have none.
    pub fn remaining(&self, class_id: ClassId) -> u32 {
        self.remaining.get(&class_id).copied().unwrap_or(0)
    }

    pub fn capacity(&self, class_id: ClassId) -> u32 {
        self.initial.get(&class_id).copied().unwrap_or(0)
    }

    pub fn filled(&self, class_id: ClassId) -> u32 {
        self.capacity(class_id) - self.remaining(class_id)
    }

    pub fn has_seat(&self, class_id: ClassId) -> bool {
        self.remaining(class_id) > 0
    }

    /// Takes one seat, returning the seats left afterwards.
    pub fn decrement(&mut self, class_id: ClassId) -> Result<u32, CapacityError> {
        match self.remaining.get_mut(&class_id) {
            Some(seats) if *seats > 0 => {
                *seats -= 1;
                Ok(*seats)
            }
            Some(_) => Err(CapacityError::Exhausted { class_id }),
            None => Err(CapacityError::UnknownClass { class_id }),
        }
    }

    /// Read-only view ordered by class id.
    pub fn snapshot(&self) -> Vec<CapacityEntry> {
        self.initial
            .iter()
            .map(|(class_id, capacity)| {
                let remaining = self.remaining(*class_id);
                CapacityEntry {
                    class_id: *class_id,
                    capacity: *capacity,
                    remaining,
                    filled: capacity - remaining,
                }
            })
            .collect()
    }

    pub fn remaining_seats(&self) -> &BTreeMap<ClassId, u32> {
        &self.remaining
    }
}

/// Per-class line of the capacity snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityEntry {
    pub class_id: ClassId,
    pub capacity: u32,
    pub remaining: u32,
    pub filled: u32,
}

/// Raised when a seat is taken from a class that has none left.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("class {class_id} has no remaining seats")]
    Exhausted { class_id: ClassId },
    #[error("class {class_id} is not tracked by the capacity ledger")]
    UnknownClass { class_id: ClassId },
}
