pub mod diagnostics;
pub mod entry;
pub mod model;
pub mod table;
pub mod tokens;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use entry::{
    EntryContext, EntryFormat, EntryFormatKind, ExtendedEntry, FilePatch, RetailLine, SoundPatch,
    SoundsetEntry, parse_entry, select_format,
};
pub use model::{Attenuation, CycleType, Priority, UniformRange};
pub use table::{FlybyRecord, SoundRecord, SoundSection, SoundTable, TableSink, parse_sound_table};
pub use tokens::{TableError, TextTokens, TokenSource};
