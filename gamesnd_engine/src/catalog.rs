use std::fmt;

use gamesnd_formats::Diagnostics;

use crate::definition::SoundDefinition;
use crate::handle::{SoundHandle, SoundKind};

/// Append-only list of definitions; handles are positions in the list.
pub struct Catalog<K> {
    definitions: Vec<SoundDefinition>,
    _kind: std::marker::PhantomData<fn() -> K>,
}

impl<K> Default for Catalog<K> {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<K> Clone for Catalog<K> {
    fn clone(&self) -> Self {
        Self {
            definitions: self.definitions.clone(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<K: SoundKind> fmt::Debug for Catalog<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("kind", &K::LABEL)
            .field("len", &self.definitions.len())
            .finish()
    }
}

impl<K: SoundKind> Catalog<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition. A repeated name is reported but still appended;
    /// name lookups keep returning the earlier one.
    pub fn append(&mut self, definition: SoundDefinition, diagnostics: &mut Diagnostics) -> SoundHandle<K> {
        if self.lookup_name(definition.name()).is_valid() {
            diagnostics.warn(
                None,
                format!(
                    "duplicate {} sound name \"{}\" found",
                    K::LABEL,
                    definition.name()
                ),
            );
        }
        let index = self.definitions.len() as u32;
        self.definitions.push(definition);
        SoundHandle::from_index(index)
    }

    pub fn get(&self, handle: SoundHandle<K>) -> Option<&SoundDefinition> {
        self.definitions.get(handle.index()?)
    }

    pub fn get_mut(&mut self, handle: SoundHandle<K>) -> Option<&mut SoundDefinition> {
        self.definitions.get_mut(handle.index()?)
    }

    /// Exact, case-insensitive, first match. `""` and `"-1"` never match.
    pub fn lookup_name(&self, name: &str) -> SoundHandle<K> {
        if name.is_empty() || name == "-1" {
            return SoundHandle::none();
        }
        self.position(|definition| definition.name().eq_ignore_ascii_case(name))
    }

    /// Name lookup, then a match on the file stem of single-entry sounds.
    pub fn find_by_name(&self, name: &str) -> SoundHandle<K> {
        let handle = self.lookup_name(name);
        if handle.is_valid() || name.is_empty() || name == "-1" {
            return handle;
        }

        let wanted = strip_extension(name);
        self.position(|definition| match definition.entries() {
            [entry] => strip_extension(&entry.filename).eq_ignore_ascii_case(wanted),
            _ => false,
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SoundHandle<K>, &SoundDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (SoundHandle::from_index(index as u32), definition))
    }

    pub fn definitions_mut(&mut self) -> impl Iterator<Item = &mut SoundDefinition> {
        self.definitions.iter_mut()
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
    }

    fn position(&self, predicate: impl Fn(&SoundDefinition) -> bool) -> SoundHandle<K> {
        self.definitions
            .iter()
            .position(predicate)
            .map(|index| SoundHandle::from_index(index as u32))
            .unwrap_or_default()
    }
}

fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    }
}
