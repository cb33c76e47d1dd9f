use gamesnd_formats::{CycleType, Diagnostic, Priority};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::definition::{LoadState, SoundDefinition};
use crate::handle::SoundKind;
use crate::registry::RegistryPhase;

#[derive(Debug, Clone, Serialize)]
pub struct RegistryReport {
    pub phase: RegistryPhase,
    pub gameplay: Vec<SoundSummary>,
    pub interface: Vec<SoundSummary>,
    pub flyby: Vec<FlybySummary>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoundSummary {
    pub index: usize,
    pub name: String,
    pub entries: Vec<String>,
    pub cycle: CycleType,
    pub volume: [f32; 2],
    pub pitch: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<[i32; 2]>,
    pub preload: bool,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    pub loaded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlybySummary {
    pub species: String,
    pub fighter: SoundSummary,
    pub bomber: SoundSummary,
}

impl SoundSummary {
    pub fn from_definition(index: usize, definition: &SoundDefinition) -> Self {
        let count = |wanted: fn(&LoadState) -> bool| {
            definition
                .entries()
                .iter()
                .filter(|entry| wanted(&entry.state))
                .count()
        };
        Self {
            index,
            name: definition.name().to_string(),
            entries: definition
                .entries()
                .iter()
                .map(|entry| entry.filename.clone())
                .collect(),
            cycle: definition.cycle,
            volume: [definition.volume.min(), definition.volume.max()],
            pitch: [definition.pitch.min(), definition.pitch.max()],
            attenuation: definition
                .attenuation
                .map(|attenuation| [attenuation.min, attenuation.max]),
            preload: definition.preload,
            disabled: definition.is_disabled(),
            priority: definition.enhanced.priority,
            limit: definition.enhanced.limit.map(|limit| limit.get()),
            loaded: count(|state| matches!(state, LoadState::Loaded(_))),
            failed: count(|state| matches!(state, LoadState::Failed)),
        }
    }
}

pub fn summarize<K: SoundKind>(catalog: &Catalog<K>) -> Vec<SoundSummary> {
    catalog
        .iter()
        .enumerate()
        .map(|(index, (_, definition))| SoundSummary::from_definition(index, definition))
        .collect()
}
