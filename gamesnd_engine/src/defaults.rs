//! Priority and limit defaults for the retail gameplay sound slots.

use std::num::NonZeroU32;

use gamesnd_formats::Priority;

use crate::catalog::Catalog;
use crate::handle::Gameplay;

const MUST: Priority = Priority::MustPlay;
const HIGH: Priority = Priority::High;
const MED_HIGH: Priority = Priority::MediumHigh;
const MED: Priority = Priority::Medium;
const MED_LOW: Priority = Priority::MediumLow;

/// Number of gameplay slots in the retail sounds.tbl.
pub const RETAIL_SOUND_COUNT: usize = 192;

/// Used for every slot past the retail range.
pub const FALLBACK_PRIORITY: Priority = Priority::MediumHigh;
pub const FALLBACK_LIMIT: u32 = 1;

/// `(priority, concurrent limit)` by catalog position.
pub const RETAIL_DEFAULTS: [(Priority, u32); RETAIL_SOUND_COUNT] = [
    (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), // 0
    (MUST, 3), (MUST, 2), (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), // 6
    (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), (HIGH, 4), // 12
    (HIGH, 4), (HIGH, 4), (HIGH, 4), (MED, 3), (MED, 3), (MUST, 3), // 18
    (MED, 2), (HIGH, 4), (MUST, 1), (MUST, 1), (MUST, 1), (MUST, 1), // 24
    (MUST, 1), (HIGH, 5), (MUST, 2), (HIGH, 1), (HIGH, 1), (HIGH, 1), // 30
    (MUST, 3), (MUST, 3), (MUST, 1), (HIGH, 2), (MUST, 2), (MUST, 1), // 36
    (MUST, 2), (MUST, 1), (HIGH, 5), (HIGH, 2), (HIGH, 2), (MUST, 1), // 42
    (MUST, 1), (MUST, 3), (MUST, 1), (MED, 5), (MED, 5), (MED, 5), // 48
    (MUST, 1), (MUST, 3), (MUST, 3), (HIGH, 2), (MED_HIGH, 3), (MUST, 2), // 54
    (HIGH, 3), (MUST, 2), (MUST, 5), (MUST, 5), (MUST, 2), (MUST, 2), // 60
    (MUST, 2), (MED, 5), (HIGH, 5), (HIGH, 2), (HIGH, 2), (HIGH, 5), // 66
    (MUST, 1), (MUST, 1), (MUST, 4), (HIGH, 4), (MED_LOW, 8), (MED_LOW, 8), // 72
    (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), // 78
    (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), // 84
    (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), // 90
    (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (HIGH, 3), // 96
    (MED_LOW, 8), (MED_LOW, 8), (MED, 3), (MED, 5), (MED, 5), (MED_LOW, 8), // 102
    (MED_LOW, 8), (HIGH, 2), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), (MED_LOW, 8), // 108
    (MED_LOW, 8), (MUST, 1), (MED, 8), (MED_LOW, 8), (MED_LOW, 8), (MED, 5), // 114
    (HIGH, 5), (HIGH, 4), (HIGH, 4), (HIGH, 4), (HIGH, 4), (HIGH, 4), // 120
    (MED, 4), (MED, 4), (MED, 4), (MED, 4), (MED, 4), (MED, 4), // 126
    (MED, 4), (MED, 4), (MED, 4), (MED_HIGH, 3), (MED, 4), (MED, 4), // 132
    (MED, 4), (MED, 3), (MED, 3), (MED, 3), (MED, 3), (MED, 3), // 138
    (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), // 144
    (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), // 150
    (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), // 156
    (HIGH, 1), (HIGH, 1), (HIGH, 1), (HIGH, 1), (HIGH, 1), (HIGH, 1), // 162
    (HIGH, 1), (HIGH, 1), (HIGH, 1), (HIGH, 1), (HIGH, 1), (MUST, 1), // 168
    (MUST, 1), (MED, 3), (MED, 3), (HIGH, 3), (HIGH, 3), (HIGH, 3), // 174
    (HIGH, 4), (HIGH, 4), (MED_HIGH, 3), (MED_HIGH, 3), (MED_HIGH, 3), (MED_HIGH, 2), // 180
    (HIGH, 1), (MED_HIGH, 3), (MED_HIGH, 3), (MED_HIGH, 3), (MED_HIGH, 2), (MED_HIGH, 2), // 186
];

/// Fills in priority and limit wherever the tables left them unset.
/// Returns how many definitions changed.
pub fn apply_retail_defaults(catalog: &mut Catalog<Gameplay>) -> usize {
    let mut changed = 0;
    for (index, definition) in catalog.definitions_mut().enumerate() {
        let (priority, limit) = RETAIL_DEFAULTS
            .get(index)
            .copied()
            .unwrap_or((FALLBACK_PRIORITY, FALLBACK_LIMIT));

        let enhanced = &mut definition.enhanced;
        let before = *enhanced;
        if enhanced.priority.is_none() {
            enhanced.priority = Some(priority);
        }
        if enhanced.limit.is_none() {
            enhanced.limit = Some(NonZeroU32::new(limit).unwrap_or(NonZeroU32::MIN));
        }
        if *enhanced != before {
            changed += 1;
        }
    }
    changed
}
