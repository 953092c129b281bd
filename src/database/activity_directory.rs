use parking_lot::{Mutex, MutexGuard};

use crate::models::{ActivityListing, Activity};

/// One named activity behind its own lock.
pub struct ActivitySlot {
    name: String,
    record: Mutex<Activity>,
}

impl ActivitySlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Holds the activity exclusively until the guard drops. Never hold the
    /// guard across an `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Activity> {
        self.record.lock()
    }
}

/// In-memory activity directory. The set of activities is fixed at
/// construction; only rosters change afterwards.
pub struct ActivityDirectory {
    slots: Vec<ActivitySlot>,
}

impl ActivityDirectory {
    pub fn new(catalog: ActivityListing) -> Self {
        let mut slots: Vec<ActivitySlot> = Vec::with_capacity(catalog.entries.len());
        for (name, activity) in catalog.entries {
            // Later duplicates lose; names stay unique.
            if slots.iter().any(|s| s.name == name) {
                continue;
            }
            slots.push(ActivitySlot {
                name,
                record: Mutex::new(activity),
            });
        }
        Self { slots }
    }

    pub fn find(&self, name: &str) -> Option<&ActivitySlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Copies every activity, locking one at a time.
    pub fn snapshot(&self) -> ActivityListing {
        ActivityListing {
            entries: self
                .slots
                .iter()
                .map(|s| (s.name.clone(), s.lock().clone()))
                .collect(),
        }
    }
}
