//! The process-wide sound registry.
//!
//! A registry owns both catalogs, the flyby pairs, the audio device and the
//! diagnostics gathered while loading. It moves through
//! `Empty -> Loading -> Defaulted -> Populated -> Closed` and never back.

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use gamesnd_formats::entry::MIN_PITCH;
use gamesnd_formats::{
    parse_sound_table, Diagnostic, Diagnostics, FlybyRecord, SoundRecord, SoundSection, TableSink,
    TextTokens, TokenSource, UniformRange,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::config::RegistryConfig;
use crate::defaults::apply_retail_defaults;
use crate::definition::SoundDefinition;
use crate::device::{AudioDevice, InstanceId, PlayParams};
use crate::handle::{GameSoundId, Gameplay, Interface, InterfaceSoundId, SoundKind};
use crate::loader::{ensure_loaded, load_definition, load_matching, unload_all, LoadSummary, Playability};
use crate::report::{summarize, FlybySummary, RegistryReport, SoundSummary};
use crate::resolver;
use crate::selector::choose_entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryPhase {
    Empty,
    Loading,
    Defaulted,
    Populated,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("cannot {action} while the sound registry is {phase:?}")]
    Illegal {
        action: &'static str,
        phase: RegistryPhase,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlybyKind {
    Fighter,
    Bomber,
}

#[derive(Debug, Clone)]
pub struct FlybySounds {
    pub species: String,
    pub fighter: SoundDefinition,
    pub bomber: SoundDefinition,
}

impl FlybySounds {
    pub fn get(&self, kind: FlybyKind) -> &SoundDefinition {
        match kind {
            FlybyKind::Fighter => &self.fighter,
            FlybyKind::Bomber => &self.bomber,
        }
    }

    fn get_mut(&mut self, kind: FlybyKind) -> &mut SoundDefinition {
        match kind {
            FlybyKind::Fighter => &mut self.fighter,
            FlybyKind::Bomber => &mut self.bomber,
        }
    }
}

pub struct SoundRegistry<D> {
    config: RegistryConfig,
    phase: RegistryPhase,
    gameplay: Catalog<Gameplay>,
    interface: Catalog<Interface>,
    /// Last instance started per interface sound, indexed like `interface`.
    interface_playing: Vec<Option<InstanceId>>,
    flyby: Vec<FlybySounds>,
    highlight: InterfaceSoundId,
    error_beep: InterfaceSoundId,
    diagnostics: Diagnostics,
    device: D,
    rng: StdRng,
}

impl<D: AudioDevice> SoundRegistry<D> {
    pub fn new(device: D, config: RegistryConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            phase: RegistryPhase::Empty,
            gameplay: Catalog::new(),
            interface: Catalog::new(),
            interface_playing: Vec::new(),
            flyby: Vec::new(),
            highlight: InterfaceSoundId::none(),
            error_beep: InterfaceSoundId::none(),
            diagnostics: Diagnostics::new(),
            device,
            rng,
        }
    }

    pub fn phase(&self) -> RegistryPhase {
        self.phase
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn gameplay(&self) -> &Catalog<Gameplay> {
        &self.gameplay
    }

    pub fn interface(&self) -> &Catalog<Interface> {
        &self.interface
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }

    fn expect_phase(&self, action: &'static str, allowed: &[RegistryPhase]) -> Result<(), PhaseError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(PhaseError::Illegal {
                action,
                phase: self.phase,
            })
        }
    }

    /// Moves a defaulted registry into use.
    fn ensure_open(&mut self, action: &'static str) -> Result<(), PhaseError> {
        self.expect_phase(action, &[RegistryPhase::Defaulted, RegistryPhase::Populated])?;
        self.phase = RegistryPhase::Populated;
        Ok(())
    }

    /// Reads one table. Returns the number of records taken from it.
    pub fn load_table(&mut self, tokens: &mut dyn TokenSource) -> Result<usize, PhaseError> {
        self.expect_phase("load a sound table", &[RegistryPhase::Empty, RegistryPhase::Loading])?;
        self.phase = RegistryPhase::Loading;

        let mut sink = RegistrySink {
            gameplay: &mut self.gameplay,
            interface: &mut self.interface,
            flyby: &mut self.flyby,
            diagnostics: &mut self.diagnostics,
        };
        Ok(parse_sound_table(tokens, &mut sink))
    }

    pub fn load_table_str(&mut self, text: &str) -> Result<usize, PhaseError> {
        self.load_table(&mut TextTokens::new(text))
    }

    pub fn load_table_file(&mut self, path: &Path) -> Result<usize> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading sound table {}", path.display()))?;
        let records = self
            .load_table_str(&text)
            .with_context(|| format!("loading sound table {}", path.display()))?;
        log::info!("{}: {records} sound records", path.display());
        Ok(records)
    }

    /// Loads `primary` and then, when `modular` is set, every table beside it
    /// whose name ends with the configured suffix, in file name order.
    pub fn load_tables(&mut self, primary: &Path, modular: bool) -> Result<Vec<PathBuf>> {
        self.load_table_file(primary)?;
        let mut loaded = vec![primary.to_path_buf()];
        if !modular {
            return Ok(loaded);
        }

        let dir = match primary.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let suffix = self.config.modular_suffix.to_ascii_lowercase();
        let mut modular_tables: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|res| res.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| Some(entry.file_name()) != primary.file_name())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| name.to_ascii_lowercase().ends_with(&suffix))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();
        modular_tables.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for path in modular_tables {
            self.load_table_file(&path)?;
            loaded.push(path);
        }
        Ok(loaded)
    }

    /// Ends loading: fills in retail priority/limit defaults and resolves
    /// the configured highlight and error sounds. Runs once.
    pub fn finish_loading(&mut self) -> Result<usize, PhaseError> {
        self.expect_phase("finish loading", &[RegistryPhase::Empty, RegistryPhase::Loading])?;
        let changed = apply_retail_defaults(&mut self.gameplay);
        self.interface_playing = vec![None; self.interface.len()];

        if let Some(name) = self.config.highlight_sound.as_deref() {
            self.highlight = resolver::resolve(&self.interface, name, &mut self.diagnostics);
        }
        if let Some(name) = self.config.error_sound.as_deref() {
            self.error_beep = resolver::resolve(&self.interface, name, &mut self.diagnostics);
        }

        self.phase = RegistryPhase::Defaulted;
        log::debug!(
            "sound registry defaulted: {} game, {} interface, {} flyby ({changed} defaulted)",
            self.gameplay.len(),
            self.interface.len(),
            self.flyby.len()
        );
        Ok(changed)
    }

    pub fn open(&mut self) -> Result<(), PhaseError> {
        self.ensure_open("open")
    }

    pub fn resolve_gameplay(&mut self, name: &str) -> GameSoundId {
        resolver::resolve(&self.gameplay, name, &mut self.diagnostics)
    }

    pub fn resolve_interface(&mut self, name: &str) -> InterfaceSoundId {
        resolver::resolve(&self.interface, name, &mut self.diagnostics)
    }

    pub fn gameplay_by_legacy_index(&self, index: i32) -> GameSoundId {
        resolver::resolve_by_legacy_index(&self.gameplay, index)
    }

    pub fn interface_by_legacy_index(&self, index: i32) -> InterfaceSoundId {
        resolver::resolve_by_legacy_index(&self.interface, index)
    }

    pub fn flyby_sounds(&self) -> &[FlybySounds] {
        &self.flyby
    }

    pub fn flyby(&self, species: &str) -> Option<&FlybySounds> {
        self.flyby
            .iter()
            .find(|sounds| sounds.species.eq_ignore_ascii_case(species))
    }

    pub fn preload_all(&mut self) -> Result<LoadSummary, PhaseError> {
        self.ensure_open("preload sounds")?;
        if !self.config.sound_enabled {
            return Ok(LoadSummary::default());
        }
        Ok(load_matching(
            &mut self.gameplay,
            &mut self.device,
            &mut self.diagnostics,
            "preloading common game sounds",
            |definition| definition.preload,
        ))
    }

    /// Loads the gameplay sounds that were not preloaded.
    pub fn load_gameplay_set(&mut self) -> Result<LoadSummary, PhaseError> {
        self.ensure_open("load gameplay sounds")?;
        if !self.config.sound_enabled {
            return Ok(LoadSummary::default());
        }
        Ok(load_matching(
            &mut self.gameplay,
            &mut self.device,
            &mut self.diagnostics,
            "loading gameplay sounds",
            |definition| !definition.preload,
        ))
    }

    pub fn unload_gameplay_set(&mut self) -> Result<usize, PhaseError> {
        self.expect_phase("unload gameplay sounds", &[RegistryPhase::Defaulted, RegistryPhase::Populated])?;
        Ok(unload_all(&mut self.gameplay, &mut self.device))
    }

    pub fn load_interface_set(&mut self) -> Result<LoadSummary, PhaseError> {
        self.ensure_open("load interface sounds")?;
        if !self.config.sound_enabled {
            return Ok(LoadSummary::default());
        }
        Ok(load_matching(
            &mut self.interface,
            &mut self.device,
            &mut self.diagnostics,
            "loading interface sounds",
            |_| true,
        ))
    }

    pub fn unload_interface_set(&mut self) -> Result<usize, PhaseError> {
        self.expect_phase("unload interface sounds", &[RegistryPhase::Defaulted, RegistryPhase::Populated])?;
        Ok(unload_all(&mut self.interface, &mut self.device))
    }

    /// Loads any unloaded entries of `handle` and reports whether it can play.
    pub fn try_load(&mut self, handle: GameSoundId) -> bool {
        let sound_enabled = self.config.sound_enabled;
        let Some(definition) = self.gameplay.get_mut(handle) else {
            return false;
        };
        if sound_enabled {
            load_definition(definition, &mut self.device, &mut self.diagnostics);
        }
        definition.is_valid()
    }

    /// Longest entry, stretched by the fastest pitch the sound may play at.
    pub fn max_duration(&mut self, handle: GameSoundId) -> Option<Duration> {
        let sound_enabled = self.config.sound_enabled;
        let definition = self.gameplay.get_mut(handle)?;
        if sound_enabled {
            load_definition(definition, &mut self.device, &mut self.diagnostics);
        }
        let longest = definition
            .entries()
            .iter()
            .filter_map(|entry| entry.loaded())
            .map(|sound| self.device.duration(sound.id))
            .max()
            .unwrap_or(Duration::ZERO);
        Some(longest.div_f32(definition.pitch.max().max(MIN_PITCH)))
    }

    fn can_play(&mut self, action: &'static str) -> bool {
        if !self.config.sound_enabled {
            return false;
        }
        match self.ensure_open(action) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{err}");
                false
            }
        }
    }

    pub fn play_gameplay(&mut self, handle: GameSoundId) -> Option<InstanceId> {
        if !self.can_play("play a game sound") {
            return None;
        }
        let definition = self.gameplay.get_mut(handle)?;
        play_definition(definition, &mut self.device, &mut self.rng, &mut self.diagnostics)
    }

    /// Plays an interface sound, stopping its previous instance first.
    pub fn play_interface(&mut self, handle: InterfaceSoundId) -> Option<InstanceId> {
        if !self.can_play("play an interface sound") {
            return None;
        }
        let index = handle.index()?;
        let definition = self.interface.get_mut(handle)?;
        if self.interface_playing.len() <= index {
            self.interface_playing.resize(index + 1, None);
        }

        if let Some(previous) = self.interface_playing[index].take() {
            self.device.stop(previous);
        }
        let instance = play_definition(definition, &mut self.device, &mut self.rng, &mut self.diagnostics);
        self.interface_playing[index] = instance;
        instance
    }

    pub fn play_highlight(&mut self) -> Option<InstanceId> {
        self.play_interface(self.highlight)
    }

    pub fn play_error_beep(&mut self) -> Option<InstanceId> {
        self.play_interface(self.error_beep)
    }

    pub fn play_flyby(&mut self, species: &str, kind: FlybyKind) -> Option<InstanceId> {
        if !self.can_play("play a flyby sound") {
            return None;
        }
        let sounds = self
            .flyby
            .iter_mut()
            .find(|sounds| sounds.species.eq_ignore_ascii_case(species))?;
        play_definition(sounds.get_mut(kind), &mut self.device, &mut self.rng, &mut self.diagnostics)
    }

    /// Releases everything the device holds and empties the registry.
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.phase == RegistryPhase::Closed {
            return;
        }
        for instance in self.interface_playing.drain(..).flatten() {
            self.device.stop(instance);
        }
        unload_all(&mut self.gameplay, &mut self.device);
        unload_all(&mut self.interface, &mut self.device);
        self.gameplay.clear();
        self.interface.clear();
        self.flyby.clear();
        self.highlight = InterfaceSoundId::none();
        self.error_beep = InterfaceSoundId::none();
        self.phase = RegistryPhase::Closed;
    }

    pub fn report(&self) -> RegistryReport {
        RegistryReport {
            phase: self.phase,
            gameplay: summarize(&self.gameplay),
            interface: summarize(&self.interface),
            flyby: self
                .flyby
                .iter()
                .map(|sounds| FlybySummary {
                    species: sounds.species.clone(),
                    fighter: SoundSummary::from_definition(0, &sounds.fighter),
                    bomber: SoundSummary::from_definition(1, &sounds.bomber),
                })
                .collect(),
            diagnostics: self.diagnostics.iter().cloned().collect(),
        }
    }
}

fn play_definition<D, R>(
    definition: &mut SoundDefinition,
    device: &mut D,
    rng: &mut R,
    diagnostics: &mut Diagnostics,
) -> Option<InstanceId>
where
    D: AudioDevice + ?Sized,
    R: Rng + ?Sized,
{
    if !definition.is_valid() {
        return None;
    }
    let index = choose_entry(definition, rng);
    let positional = definition.is_positional();
    let sound = match ensure_loaded(&mut definition.entries_mut()[index], positional, device, diagnostics) {
        Playability::Playable(sound) => sound,
        Playability::Unplayable => return None,
    };

    let params = PlayParams {
        volume: sample(definition.volume, rng),
        pitch: sample(definition.pitch, rng),
        priority: definition.enhanced.priority,
        limit: definition.enhanced.limit.map(NonZeroU32::get),
        attenuation: definition.attenuation,
    };
    match device.play(sound, &params) {
        Ok(instance) => Some(instance),
        Err(err) => {
            log::warn!("could not play '{}': {err:#}", definition.name());
            None
        }
    }
}

fn sample<R: Rng + ?Sized>(range: UniformRange, rng: &mut R) -> f32 {
    if range.is_fixed() {
        range.min()
    } else {
        rng.gen_range(range.min()..=range.max())
    }
}

/// Routes parsed records into the registry's catalogs.
struct RegistrySink<'a> {
    gameplay: &'a mut Catalog<Gameplay>,
    interface: &'a mut Catalog<Interface>,
    flyby: &'a mut Vec<FlybySounds>,
    diagnostics: &'a mut Diagnostics,
}

impl TableSink for RegistrySink<'_> {
    fn contains(&self, section: SoundSection, name: &str) -> bool {
        match section {
            SoundSection::Game => self.gameplay.lookup_name(name).is_valid(),
            SoundSection::Interface => self.interface.lookup_name(name).is_valid(),
        }
    }

    fn accept(&mut self, section: SoundSection, record: SoundRecord) {
        match section {
            SoundSection::Game => merge_record(self.gameplay, record, self.diagnostics),
            SoundSection::Interface => merge_record(self.interface, record, self.diagnostics),
        }
    }

    fn accept_flyby(&mut self, record: FlybyRecord) {
        let sounds = FlybySounds {
            fighter: build_definition(record.fighter, self.diagnostics),
            bomber: build_definition(record.bomber, self.diagnostics),
            species: record.species,
        };
        match self
            .flyby
            .iter_mut()
            .find(|existing| existing.species.eq_ignore_ascii_case(&sounds.species))
        {
            Some(existing) => *existing = sounds,
            None => self.flyby.push(sounds),
        }
    }

    fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut *self.diagnostics
    }
}

/// `+nocreate` records patch the first definition with their name in
/// place; everything else becomes a new definition.
fn merge_record<K: SoundKind>(catalog: &mut Catalog<K>, record: SoundRecord, diagnostics: &mut Diagnostics) {
    if record.no_create {
        let handle = catalog.lookup_name(&record.name);
        if let Some(definition) = catalog.get_mut(handle) {
            definition.apply_patch(record.patch, Some(record.line), diagnostics);
            return;
        }
    }
    let definition = build_definition(record, diagnostics);
    catalog.append(definition, diagnostics);
}

fn build_definition(record: SoundRecord, diagnostics: &mut Diagnostics) -> SoundDefinition {
    let mut definition = SoundDefinition::blank(record.name);
    definition.apply_patch(record.patch, Some(record.line), diagnostics);
    definition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::LoadState;
    use crate::device::{DeviceEvent, RecordingDevice};
    use gamesnd_formats::{Priority, Severity};

    const TABLE: &str = "\
#Game Sounds Start
$Name: 0  snd_missile.wav, 1, 0.60, 0
$Name: 1  none, 0, 0.0, 0
$Name: Laser
+Entry: laser1.wav
+Entry: laser2.wav
+Cycle type: Sequential
+Preload: NO
+Volume: 0.5
+Priority: Low
#Game Sounds End

#Interface Sounds Start
$Name: 0  user_c.wav, 0, 0.70, 0
$Name: 1  user_o.wav, 0, 0.70, 0
#Interface Sounds End

#Flyby Sounds Start
$Terran: 0 trn_fly_by.wav, 0, 0.50, 1, 50, 250
$Terran: 1 trn_fly_by_b.wav, 0, 0.50, 1, 50, 250
#Flyby Sounds End
";

    fn config() -> RegistryConfig {
        RegistryConfig {
            rng_seed: Some(3),
            highlight_sound: Some("1".to_string()),
            error_sound: Some("0".to_string()),
            ..RegistryConfig::default()
        }
    }

    fn registry() -> SoundRegistry<RecordingDevice> {
        let mut registry = SoundRegistry::new(RecordingDevice::new(), config());
        registry.load_table_str(TABLE).unwrap();
        registry.finish_loading().unwrap();
        registry
    }

    #[test]
    fn lifecycle_is_forward_only() {
        let mut registry = SoundRegistry::new(RecordingDevice::new(), RegistryConfig::default());
        assert_eq!(registry.phase(), RegistryPhase::Empty);
        assert!(registry.open().is_err());

        registry.load_table_str(TABLE).unwrap();
        assert_eq!(registry.phase(), RegistryPhase::Loading);
        registry.finish_loading().unwrap();
        assert_eq!(registry.phase(), RegistryPhase::Defaulted);

        assert_eq!(
            registry.finish_loading(),
            Err(PhaseError::Illegal {
                action: "finish loading",
                phase: RegistryPhase::Defaulted,
            })
        );
        assert!(registry.load_table_str(TABLE).is_err());

        registry.open().unwrap();
        assert_eq!(registry.phase(), RegistryPhase::Populated);

        registry.close();
        registry.close();
        assert_eq!(registry.phase(), RegistryPhase::Closed);
        assert!(registry.open().is_err());
        assert!(registry.preload_all().is_err());
        assert_eq!(registry.gameplay().len(), 0);
    }

    #[test]
    fn defaults_fill_only_unset_fields() {
        let registry = registry();
        let missile = registry.gameplay().get(GameSoundId::from_index(0)).unwrap();
        assert_eq!(missile.enhanced.priority, Some(Priority::MustPlay));
        let laser = registry.gameplay().get(GameSoundId::from_index(2)).unwrap();
        assert_eq!(laser.enhanced.priority, Some(Priority::Low));
        assert_eq!(laser.enhanced.limit.map(NonZeroU32::get), Some(1));
    }

    #[test]
    fn sequential_play_cycles_entries() {
        let mut registry = registry();
        let laser = registry.resolve_gameplay("Laser");
        for _ in 0..3 {
            assert!(registry.play_gameplay(laser).is_some());
        }
        let played: Vec<_> = registry
            .device()
            .events()
            .iter()
            .filter_map(|event| match event {
                DeviceEvent::Play { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(played, ["laser1.wav", "laser2.wav", "laser1.wav"]);
        assert_eq!(registry.phase(), RegistryPhase::Populated);
    }

    #[test]
    fn disabled_and_missing_sounds_do_not_play() {
        let mut registry = registry();
        assert_eq!(registry.play_gameplay(GameSoundId::from_index(1)), None);
        assert_eq!(registry.play_gameplay(GameSoundId::from_index(50)), None);
        assert_eq!(registry.play_gameplay(GameSoundId::none()), None);
        assert!(registry.device().load_calls().is_empty());
    }

    #[test]
    fn interface_replay_stops_previous_instance() {
        let mut registry = registry();
        let click = registry.resolve_interface("0");
        let first = registry.play_interface(click).unwrap();
        let second = registry.play_interface(click).unwrap();
        assert_ne!(first, second);
        assert!(registry
            .device()
            .events()
            .contains(&DeviceEvent::Stop { instance: first.0 }));

        assert!(registry.play_highlight().is_some());
        assert!(registry.play_error_beep().is_some());
    }

    #[test]
    fn failed_load_invalidates_until_unload() {
        let device = RecordingDevice::new().with_failure("snd_missile.wav");
        let mut registry = SoundRegistry::new(device, config());
        registry.load_table_str(TABLE).unwrap();
        registry.finish_loading().unwrap();

        let summary = registry.preload_all().unwrap();
        assert_eq!(summary.failed, 1);
        let missile = GameSoundId::from_index(0);
        assert!(!registry.try_load(missile));
        assert_eq!(registry.play_gameplay(missile), None);
        assert_eq!(registry.device().load_calls(), ["snd_missile.wav"]);

        registry.unload_gameplay_set().unwrap();
        assert!(registry.gameplay().get(missile).unwrap().is_valid());
    }

    #[test]
    fn unloaded_entries_reload_on_demand() {
        let mut registry = registry();
        let missile = GameSoundId::from_index(0);
        assert_eq!(registry.preload_all().unwrap().loaded, 1);
        assert_eq!(registry.device().loaded_count(), 1);

        assert_eq!(registry.unload_gameplay_set().unwrap(), 1);
        assert_eq!(registry.device().loaded_count(), 0);
        let entry = &registry.gameplay().get(missile).unwrap().entries()[0];
        assert_eq!(entry.state, LoadState::Unloaded);

        assert!(registry.try_load(missile));
        assert!(registry.play_gameplay(missile).is_some());
        assert_eq!(
            registry.device().load_calls(),
            ["snd_missile.wav", "snd_missile.wav"]
        );
        assert_eq!(registry.device().loaded_count(), 1);
    }

    #[test]
    fn definition_without_entries_never_plays() {
        let mut blank = SoundDefinition::blank("Empty");
        let mut device = RecordingDevice::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut diagnostics = Diagnostics::new();
        assert!(!blank.is_valid());
        assert_eq!(play_definition(&mut blank, &mut device, &mut rng, &mut diagnostics), None);
        assert!(device.events().is_empty());
    }

    #[test]
    fn sound_disabled_makes_loads_and_plays_no_ops() {
        let config = RegistryConfig {
            sound_enabled: false,
            ..config()
        };
        let mut registry = SoundRegistry::new(RecordingDevice::new(), config);
        registry.load_table_str(TABLE).unwrap();
        registry.finish_loading().unwrap();

        assert_eq!(registry.preload_all().unwrap(), LoadSummary::default());
        assert_eq!(registry.load_interface_set().unwrap(), LoadSummary::default());
        assert_eq!(registry.play_gameplay(GameSoundId::from_index(0)), None);
        assert!(registry.device().events().is_empty());
    }

    #[test]
    fn max_duration_divides_by_fastest_pitch() {
        let device = RecordingDevice::new()
            .with_duration("laser1.wav", Duration::from_millis(250))
            .with_duration("laser2.wav", Duration::from_millis(500));
        let mut registry = SoundRegistry::new(device, config());
        registry.load_table_str(TABLE).unwrap();
        registry.finish_loading().unwrap();

        let laser = registry.resolve_gameplay("Laser");
        assert_eq!(registry.max_duration(laser), Some(Duration::from_millis(500)));
        assert_eq!(registry.max_duration(GameSoundId::none()), None);
    }

    #[test]
    fn modular_nocreate_patches_in_place() {
        let mut registry = SoundRegistry::new(RecordingDevice::new(), config());
        registry.load_table_str(TABLE).unwrap();
        registry
            .load_table_str(
                "#Game Sounds Start\n$Name: +nocreate laser\n+Entry: laser3.wav\n+Priority: High\n$Name: Extra\n+Filename: extra.wav\n+Preload: NO\n+Volume: 1.0\n#Game Sounds End\n",
            )
            .unwrap();
        registry.finish_loading().unwrap();

        let laser = registry.gameplay().get(GameSoundId::from_index(2)).unwrap();
        assert_eq!(laser.entries().len(), 3);
        assert_eq!(laser.enhanced.priority, Some(Priority::High));
        assert_eq!(registry.gameplay().len(), 4);
        assert!(registry.diagnostics().is_empty());
    }

    #[test]
    fn resolution_misses_are_collected() {
        let mut registry = registry();
        assert!(!registry.resolve_gameplay("Nope").is_valid());
        assert!(!registry.resolve_interface("-1").is_valid());
        assert_eq!(registry.diagnostics().count(Severity::Warning), 1);
        assert_eq!(registry.gameplay_by_legacy_index(0), GameSoundId::from_index(0));
        assert_eq!(registry.interface_by_legacy_index(1), InterfaceSoundId::from_index(1));
        assert_eq!(registry.take_diagnostics().len(), 1);
    }

    #[test]
    fn flyby_pairs_are_playable_by_species() {
        let mut registry = registry();
        let terran = registry.flyby("TERRAN").unwrap();
        assert!(terran.get(FlybyKind::Bomber).is_positional());
        assert!(registry.play_flyby("terran", FlybyKind::Fighter).is_some());
        assert_eq!(registry.play_flyby("vasudan", FlybyKind::Fighter), None);
    }
}
