use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use gamesnd_formats::{Attenuation, Priority};
use serde::Serialize;

/// Device-side identifier of a loaded sound file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SoundLoadId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadedSound {
    pub id: SoundLoadId,
    /// Changes every time the device (re)loads a file.
    pub signature: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InstanceId(pub u32);

#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    pub filename: &'a str,
    pub positional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayParams {
    pub volume: f32,
    pub pitch: f32,
    pub priority: Option<Priority>,
    pub limit: Option<u32>,
    pub attenuation: Option<Attenuation>,
}

/// The mixer the registry loads into and plays through.
pub trait AudioDevice {
    fn load(&mut self, request: &LoadRequest<'_>) -> Result<LoadedSound>;

    fn unload(&mut self, sound: SoundLoadId);

    fn play(&mut self, sound: LoadedSound, params: &PlayParams) -> Result<InstanceId>;

    fn stop(&mut self, instance: InstanceId);

    fn duration(&self, sound: SoundLoadId) -> Duration;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceEvent {
    Load {
        filename: String,
        positional: bool,
    },
    LoadFailed {
        filename: String,
    },
    Unload {
        sound: u32,
    },
    Play {
        instance: u32,
        filename: String,
        volume: f32,
        pitch: f32,
    },
    Stop {
        instance: u32,
    },
}

/// Device that plays nothing and records every call.
#[derive(Debug, Clone)]
pub struct RecordingDevice {
    events: Vec<DeviceEvent>,
    loaded: HashMap<u32, String>,
    failing: HashSet<String>,
    durations: HashMap<String, Duration>,
    default_duration: Duration,
    next_sound: u32,
    next_instance: u32,
}

impl Default for RecordingDevice {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            loaded: HashMap::new(),
            failing: HashSet::new(),
            durations: HashMap::new(),
            default_duration: Duration::from_secs(1),
            next_sound: 0,
            next_instance: 0,
        }
    }
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every load of `filename` fail.
    pub fn with_failure(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_ascii_lowercase());
        self
    }

    pub fn with_duration(mut self, filename: &str, duration: Duration) -> Self {
        self.durations
            .insert(filename.to_ascii_lowercase(), duration);
        self
    }

    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }

    /// Filenames passed to `load`, including failed attempts.
    pub fn load_calls(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DeviceEvent::Load { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

impl AudioDevice for RecordingDevice {
    fn load(&mut self, request: &LoadRequest<'_>) -> Result<LoadedSound> {
        self.events.push(DeviceEvent::Load {
            filename: request.filename.to_string(),
            positional: request.positional,
        });
        if self
            .failing
            .contains(&request.filename.to_ascii_lowercase())
        {
            self.events.push(DeviceEvent::LoadFailed {
                filename: request.filename.to_string(),
            });
            bail!("could not load '{}'", request.filename);
        }

        let id = self.next_sound;
        self.next_sound += 1;
        self.loaded.insert(id, request.filename.to_string());
        Ok(LoadedSound {
            id: SoundLoadId(id),
            signature: id,
        })
    }

    fn unload(&mut self, sound: SoundLoadId) {
        self.loaded.remove(&sound.0);
        self.events.push(DeviceEvent::Unload { sound: sound.0 });
    }

    fn play(&mut self, sound: LoadedSound, params: &PlayParams) -> Result<InstanceId> {
        let filename = self
            .loaded
            .get(&sound.id.0)
            .cloned()
            .ok_or_else(|| anyhow!("sound {} is not loaded", sound.id.0))?;
        let instance = self.next_instance;
        self.next_instance += 1;
        self.events.push(DeviceEvent::Play {
            instance,
            filename,
            volume: params.volume,
            pitch: params.pitch,
        });
        Ok(InstanceId(instance))
    }

    fn stop(&mut self, instance: InstanceId) {
        self.events.push(DeviceEvent::Stop {
            instance: instance.0,
        });
    }

    fn duration(&self, sound: SoundLoadId) -> Duration {
        self.loaded
            .get(&sound.0)
            .and_then(|filename| self.durations.get(&filename.to_ascii_lowercase()))
            .copied()
            .unwrap_or(self.default_duration)
    }
}
