pub mod catalog;
pub mod config;
pub mod defaults;
pub mod definition;
pub mod device;
pub mod handle;
pub mod loader;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod selector;

pub use catalog::Catalog;
pub use config::{load_config, RegistryConfig};
pub use definition::{LoadState, SoundDefinition, SoundEntry};
pub use device::{AudioDevice, DeviceEvent, InstanceId, LoadedSound, PlayParams, RecordingDevice};
pub use handle::{GameSoundId, Gameplay, Interface, InterfaceSoundId, SoundHandle, SoundKind};
pub use loader::LoadSummary;
pub use registry::{FlybyKind, FlybySounds, PhaseError, RegistryPhase, SoundRegistry};
pub use report::RegistryReport;
