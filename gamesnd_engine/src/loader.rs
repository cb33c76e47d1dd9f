use gamesnd_formats::Diagnostics;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::definition::{LoadState, SoundDefinition, SoundEntry};
use crate::device::{AudioDevice, LoadRequest, LoadedSound};
use crate::handle::SoundKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playability {
    Playable(LoadedSound),
    Unplayable,
}

/// Loads `entry` on first use. A refused file is remembered and not retried.
pub fn ensure_loaded<D: AudioDevice + ?Sized>(
    entry: &mut SoundEntry,
    positional: bool,
    device: &mut D,
    diagnostics: &mut Diagnostics,
) -> Playability {
    if entry.is_silent() {
        return Playability::Unplayable;
    }
    match entry.state {
        LoadState::Loaded(sound) => Playability::Playable(sound),
        LoadState::Failed => Playability::Unplayable,
        LoadState::Unloaded => {
            let request = LoadRequest {
                filename: &entry.filename,
                positional,
            };
            match device.load(&request) {
                Ok(sound) => {
                    entry.state = LoadState::Loaded(sound);
                    Playability::Playable(sound)
                }
                Err(err) => {
                    diagnostics.warn(None, format!("failed to load '{}': {err:#}", entry.filename));
                    entry.state = LoadState::Failed;
                    Playability::Unplayable
                }
            }
        }
    }
}

/// Loads every entry of one definition.
pub fn load_definition<D: AudioDevice + ?Sized>(
    definition: &mut SoundDefinition,
    device: &mut D,
    diagnostics: &mut Diagnostics,
) -> LoadSummary {
    let positional = definition.is_positional();
    let mut summary = LoadSummary::default();
    for entry in definition.entries_mut() {
        if entry.is_silent() || entry.state != LoadState::Unloaded {
            summary.skipped += 1;
            continue;
        }
        summary.attempted += 1;
        log::debug!("loading {}", entry.filename);
        match ensure_loaded(entry, positional, device, diagnostics) {
            Playability::Playable(_) => summary.loaded += 1,
            Playability::Unplayable => summary.failed += 1,
        }
    }
    summary
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub attempted: usize,
    pub loaded: usize,
    pub failed: usize,
    /// Silent, already loaded, or previously failed entries.
    pub skipped: usize,
}

impl LoadSummary {
    pub fn merge(&mut self, other: LoadSummary) {
        self.attempted += other.attempted;
        self.loaded += other.loaded;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }
}

/// Bulk pass over the definitions `keep` selects.
pub fn load_matching<K, D>(
    catalog: &mut Catalog<K>,
    device: &mut D,
    diagnostics: &mut Diagnostics,
    pass: &str,
    keep: impl Fn(&SoundDefinition) -> bool,
) -> LoadSummary
where
    K: SoundKind,
    D: AudioDevice + ?Sized,
{
    let mut summary = LoadSummary::default();
    for definition in catalog.definitions_mut().filter(|definition| keep(definition)) {
        summary.merge(load_definition(definition, device, diagnostics));
    }
    log::debug!(
        "{pass}: {} attempted, {} loaded, {} failed, {} skipped",
        summary.attempted,
        summary.loaded,
        summary.failed,
        summary.skipped
    );
    summary
}

/// Returns every entry to `Unloaded`, releasing what the device holds.
/// Returns the number of device unloads.
pub fn unload_all<K, D>(catalog: &mut Catalog<K>, device: &mut D) -> usize
where
    K: SoundKind,
    D: AudioDevice + ?Sized,
{
    let mut released = 0;
    for definition in catalog.definitions_mut() {
        for entry in definition.entries_mut() {
            if let LoadState::Loaded(sound) = entry.state {
                device.unload(sound.id);
                released += 1;
            }
            entry.state = LoadState::Unloaded;
        }
    }
    released
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceEvent, RecordingDevice};
    use crate::handle::{GameSoundId, Gameplay};
    use gamesnd_formats::CycleType;

    #[test]
    fn silent_entries_never_reach_the_device() {
        let mut device = RecordingDevice::new();
        let mut diagnostics = Diagnostics::new();
        for name in ["", "none.wav", "NONE"] {
            let mut entry = SoundEntry::new(name);
            assert_eq!(
                ensure_loaded(&mut entry, false, &mut device, &mut diagnostics),
                Playability::Unplayable
            );
        }
        assert!(device.events().is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn loads_once_and_caches() {
        let mut device = RecordingDevice::new();
        let mut diagnostics = Diagnostics::new();
        let mut entry = SoundEntry::new("boom.wav");

        let first = ensure_loaded(&mut entry, true, &mut device, &mut diagnostics);
        let second = ensure_loaded(&mut entry, true, &mut device, &mut diagnostics);
        assert!(matches!(first, Playability::Playable(_)));
        assert_eq!(first, second);
        assert_eq!(device.load_calls(), ["boom.wav"]);
    }

    #[test]
    fn failure_is_terminal_until_unload() {
        let mut device = RecordingDevice::new().with_failure("bad.wav");
        let mut diagnostics = Diagnostics::new();
        let mut catalog: Catalog<Gameplay> = Catalog::new();
        catalog.append(SoundDefinition::new("Bad", "bad.wav"), &mut diagnostics);

        let handle = GameSoundId::from_index(0);
        let summary = load_matching(&mut catalog, &mut device, &mut diagnostics, "test", |_| true);
        assert_eq!(summary.failed, 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(!catalog.get(handle).unwrap().is_valid());

        let summary = load_matching(&mut catalog, &mut device, &mut diagnostics, "test", |_| true);
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(device.load_calls().len(), 1);

        assert_eq!(unload_all(&mut catalog, &mut device), 0);
        assert!(catalog.get(handle).unwrap().is_valid());
    }

    #[test]
    fn bulk_pass_respects_filter_and_unload_is_idempotent() {
        let mut device = RecordingDevice::new();
        let mut diagnostics = Diagnostics::new();
        let mut catalog: Catalog<Gameplay> = Catalog::new();
        let mut common = SoundDefinition::new("Common", "common.wav");
        common.preload = true;
        catalog.append(common, &mut diagnostics);
        catalog.append(
            SoundDefinition::soundset("Set", ["a.wav", "none.wav"], CycleType::Sequential),
            &mut diagnostics,
        );

        let summary = load_matching(&mut catalog, &mut device, &mut diagnostics, "preload", |d| d.preload);
        assert_eq!(summary.loaded, 1);
        assert_eq!(device.load_calls(), ["common.wav"]);

        let summary = load_matching(&mut catalog, &mut device, &mut diagnostics, "gameplay", |d| !d.preload);
        assert_eq!(summary.loaded, 1);
        assert_eq!(summary.skipped, 1);

        assert_eq!(unload_all(&mut catalog, &mut device), 2);
        assert_eq!(unload_all(&mut catalog, &mut device), 0);
        let unloads = device
            .events()
            .iter()
            .filter(|event| matches!(event, DeviceEvent::Unload { .. }))
            .count();
        assert_eq!(unloads, 2);
    }
}
