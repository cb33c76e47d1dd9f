use std::num::NonZeroU32;

use gamesnd_formats::{Attenuation, CycleType, Diagnostics, FilePatch, Priority, SoundPatch, UniformRange};
use serde::Serialize;

use crate::device::LoadedSound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loaded(LoadedSound),
    /// The device refused the file; not retried until the next unload.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundEntry {
    pub filename: String,
    pub state: LoadState,
}

impl SoundEntry {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            state: LoadState::Unloaded,
        }
    }

    pub fn silent() -> Self {
        Self::new(String::new())
    }

    pub fn is_silent(&self) -> bool {
        is_silent_filename(&self.filename)
    }

    pub fn loaded(&self) -> Option<LoadedSound> {
        match self.state {
            LoadState::Loaded(sound) => Some(sound),
            _ => None,
        }
    }
}

/// Empty names and the `none.wav` family never reach the device.
pub fn is_silent_filename(filename: &str) -> bool {
    filename.is_empty()
        || filename
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("none"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhancedSoundData {
    pub priority: Option<Priority>,
    pub limit: Option<NonZeroU32>,
}

/// A named sound: one or more alternate files plus how to play them.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundDefinition {
    name: String,
    entries: Vec<SoundEntry>,
    disabled: bool,
    last_entry: Option<usize>,
    pub cycle: CycleType,
    pub volume: UniformRange,
    pub pitch: UniformRange,
    /// Present for positional (3D) sounds.
    pub attenuation: Option<Attenuation>,
    pub preload: bool,
    pub enhanced: EnhancedSoundData,
}

impl SoundDefinition {
    /// A definition with no entries yet; a patch fills it in.
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            disabled: false,
            last_entry: None,
            cycle: CycleType::Sequential,
            volume: UniformRange::fixed(1.0),
            pitch: UniformRange::fixed(1.0),
            attenuation: None,
            preload: false,
            enhanced: EnhancedSoundData::default(),
        }
    }

    pub fn new(name: impl Into<String>, filename: impl Into<String>) -> Self {
        let mut definition = Self::blank(name);
        definition.entries.push(SoundEntry::new(filename));
        definition
    }

    pub fn soundset<I, S>(name: impl Into<String>, filenames: I, cycle: CycleType) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut definition = Self::blank(name);
        definition
            .entries
            .extend(filenames.into_iter().map(SoundEntry::new));
        definition.cycle = cycle;
        definition
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SoundEntry] {
        &mut self.entries
    }

    pub fn last_entry(&self) -> Option<usize> {
        self.last_entry
    }

    pub(crate) fn set_last_entry(&mut self, index: usize) {
        self.last_entry = Some(index);
    }

    /// Explicitly turned off with `none`/`empty`.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn load_failed(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.state == LoadState::Failed)
    }

    /// Playable in principle: enabled, holding entries, none failed.
    pub fn is_valid(&self) -> bool {
        !self.disabled && !self.entries.is_empty() && !self.load_failed()
    }

    pub fn is_positional(&self) -> bool {
        self.attenuation.is_some()
    }

    /// Applies the fields a table entry mentions; everything else is kept.
    pub fn apply_patch(&mut self, patch: SoundPatch, line: Option<usize>, diagnostics: &mut Diagnostics) {
        match patch.files {
            FilePatch::Replace(filename) => {
                self.entries = vec![SoundEntry::new(filename)];
                self.disabled = false;
                self.last_entry = None;
            }
            FilePatch::ReplaceSole(filename) => {
                self.check_sole_entry(line, diagnostics);
                match self.entries.last_mut() {
                    Some(entry) => *entry = SoundEntry::new(filename),
                    None => self.entries.push(SoundEntry::new(filename)),
                }
                self.disabled = false;
            }
            FilePatch::KeepSole => {
                self.check_sole_entry(line, diagnostics);
                self.disabled = false;
            }
            FilePatch::Append(filenames) => {
                self.entries
                    .extend(filenames.into_iter().map(SoundEntry::new));
                self.last_entry = None;
            }
            FilePatch::Disable => {
                self.entries = vec![SoundEntry::silent()];
                self.disabled = true;
                self.last_entry = None;
            }
        }
        if self.entries.is_empty() {
            self.entries.push(SoundEntry::silent());
        }

        if let Some(cycle) = patch.cycle {
            self.cycle = cycle;
        }
        if let Some(preload) = patch.preload {
            self.preload = preload;
        }
        if let Some(volume) = patch.volume {
            self.volume = volume;
        }
        if let Some(pitch) = patch.pitch {
            self.pitch = pitch;
        }
        if let Some(attenuation) = patch.attenuation {
            self.attenuation = attenuation;
        }
        if let Some(priority) = patch.priority {
            self.enhanced.priority = Some(priority);
        }
        if let Some(limit) = patch.limit {
            self.enhanced.limit = Some(limit);
        }
    }

    fn check_sole_entry(&self, line: Option<usize>, diagnostics: &mut Diagnostics) {
        if self.entries.len() != 1 {
            diagnostics.error(
                line,
                format!(
                    "sound '{}' has {} entries; the +Filename: syntax can only modify single-entry sounds, use +Entry: to add entries",
                    self.name,
                    self.entries.len()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamesnd_formats::{EntryFormatKind, Severity};

    #[test]
    fn silent_filenames() {
        assert!(is_silent_filename(""));
        assert!(is_silent_filename("none.wav"));
        assert!(is_silent_filename("NONE"));
        assert!(!is_silent_filename("non.wav"));
        assert!(!is_silent_filename("boom.wav"));
    }

    #[test]
    fn disable_patch_leaves_one_silent_entry() {
        let mut definition = SoundDefinition::soundset("Laser", ["a.wav", "b.wav"], CycleType::Random);
        let mut diagnostics = Diagnostics::new();
        definition.apply_patch(
            SoundPatch::new(EntryFormatKind::Extended, FilePatch::Disable),
            None,
            &mut diagnostics,
        );
        assert!(definition.is_disabled());
        assert!(!definition.is_valid());
        assert_eq!(definition.entries(), [SoundEntry::silent()]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn nocreate_patch_keeps_untouched_fields() {
        let mut definition = SoundDefinition::new("Click", "click.wav");
        definition.preload = true;
        definition.enhanced.priority = Some(Priority::High);

        let mut patch = SoundPatch::new(EntryFormatKind::Extended, FilePatch::KeepSole);
        patch.volume = Some(UniformRange::fixed(0.25));
        let mut diagnostics = Diagnostics::new();
        definition.apply_patch(patch, Some(9), &mut diagnostics);

        assert_eq!(definition.entries()[0].filename, "click.wav");
        assert!(definition.preload);
        assert_eq!(definition.volume, UniformRange::fixed(0.25));
        assert_eq!(definition.enhanced.priority, Some(Priority::High));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn replacing_the_sole_file_of_a_soundset_is_reported() {
        let mut definition = SoundDefinition::soundset("Laser", ["a.wav", "b.wav"], CycleType::Sequential);
        let mut diagnostics = Diagnostics::new();
        definition.apply_patch(
            SoundPatch::new(EntryFormatKind::Extended, FilePatch::ReplaceSole("c.wav".into())),
            Some(3),
            &mut diagnostics,
        );
        assert_eq!(diagnostics.count(Severity::Error), 1);
        assert_eq!(definition.entries()[1].filename, "c.wav");
        assert_eq!(definition.entries().len(), 2);
    }

    #[test]
    fn appending_resets_cycling() {
        let mut definition = SoundDefinition::soundset("Laser", ["a.wav", "b.wav"], CycleType::Sequential);
        definition.set_last_entry(1);
        definition.apply_patch(
            SoundPatch::new(EntryFormatKind::Soundset, FilePatch::Append(vec!["c.wav".into()])),
            None,
            &mut Diagnostics::new(),
        );
        assert_eq!(definition.entries().len(), 3);
        assert_eq!(definition.last_entry(), None);
    }

    #[test]
    fn failed_entry_invalidates_definition() {
        let mut definition = SoundDefinition::new("Boom", "boom.wav");
        assert!(definition.is_valid());
        definition.entries_mut()[0].state = LoadState::Failed;
        assert!(definition.load_failed());
        assert!(!definition.is_valid());
    }
}
