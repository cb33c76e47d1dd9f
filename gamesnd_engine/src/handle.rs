use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for the two sound catalogs.
pub trait SoundKind {
    const LABEL: &'static str;
}

#[derive(Debug)]
pub enum Gameplay {}

#[derive(Debug)]
pub enum Interface {}

impl SoundKind for Gameplay {
    const LABEL: &'static str = "game";
}

impl SoundKind for Interface {
    const LABEL: &'static str = "interface";
}

/// Index into a catalog of kind `K`, or the explicit "no sound" handle.
pub struct SoundHandle<K> {
    index: Option<u32>,
    _kind: PhantomData<fn() -> K>,
}

pub type GameSoundId = SoundHandle<Gameplay>;
pub type InterfaceSoundId = SoundHandle<Interface>;

impl<K> SoundHandle<K> {
    pub const fn none() -> Self {
        Self {
            index: None,
            _kind: PhantomData,
        }
    }

    pub const fn from_index(index: u32) -> Self {
        Self {
            index: Some(index),
            _kind: PhantomData,
        }
    }

    pub fn index(self) -> Option<usize> {
        self.index.map(|index| index as usize)
    }

    /// True unless this is the "no sound" handle. Says nothing about bounds.
    pub fn is_valid(self) -> bool {
        self.index.is_some()
    }
}

impl<K> Clone for SoundHandle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for SoundHandle<K> {}

impl<K> PartialEq for SoundHandle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<K> Eq for SoundHandle<K> {}

impl<K> Hash for SoundHandle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<K> Default for SoundHandle<K> {
    fn default() -> Self {
        Self::none()
    }
}

impl<K: SoundKind> fmt::Debug for SoundHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}#{index}", K::LABEL),
            None => write!(f, "{}#none", K::LABEL),
        }
    }
}
