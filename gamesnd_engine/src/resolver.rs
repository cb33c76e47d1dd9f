use gamesnd_formats::{Diagnostics, TokenSource};

use crate::catalog::Catalog;
use crate::handle::{SoundHandle, SoundKind};

/// Resolves a user-facing sound name.
///
/// `""` and `"-1"` are deliberate "no sound" references and resolve to the
/// none handle silently. Any other miss is reported once.
pub fn resolve<K: SoundKind>(catalog: &Catalog<K>, name: &str, diagnostics: &mut Diagnostics) -> SoundHandle<K> {
    let handle = catalog.find_by_name(name);
    if !handle.is_valid() && !name.is_empty() && name != "-1" {
        diagnostics.warn(None, format!("could not find {} sound with name '{name}'", K::LABEL));
    }
    handle
}

/// Resolves the numeric names old tables used. Exact match only.
pub fn resolve_by_legacy_index<K: SoundKind>(catalog: &Catalog<K>, index: i32) -> SoundHandle<K> {
    catalog.lookup_name(&index.to_string())
}

/// Reads `tag` followed by a sound name. `None` when the tag is absent.
pub fn parse_sound_ref<K: SoundKind>(
    tokens: &mut dyn TokenSource,
    tag: &str,
    catalog: &Catalog<K>,
    diagnostics: &mut Diagnostics,
) -> Option<SoundHandle<K>> {
    if !tokens.optional_token(tag) {
        return None;
    }
    let line = tokens.line_number();
    let name = tokens.read_line();
    let mut local = Diagnostics::new();
    let handle = resolve(catalog, &name, &mut local);
    for mut diagnostic in local.take() {
        diagnostic.line = Some(line);
        diagnostics.push(diagnostic);
    }
    Some(handle)
}

/// Reads `tag` followed by whitespace separated names up to the end of the line.
///
/// Legacy lists open with an entry count; a mismatch is reported. Entries
/// already present in `destination` are overwritten in place so a
/// re-parsed list does not grow.
pub fn parse_sound_list<K: SoundKind>(
    tokens: &mut dyn TokenSource,
    tag: &str,
    object_name: &str,
    legacy_count: bool,
    catalog: &Catalog<K>,
    destination: &mut Vec<SoundHandle<K>>,
    diagnostics: &mut Diagnostics,
) -> bool {
    if !tokens.optional_token(tag) {
        return false;
    }
    let line = tokens.line_number();
    let expected = if legacy_count {
        tokens.read_int_optional()
    } else {
        None
    };

    let mut parsed = 0;
    while !tokens.at_line_end() {
        let name = tokens.read_word();
        let handle = catalog.find_by_name(&name);
        if !handle.is_valid() {
            diagnostics.warn(
                Some(line),
                format!("could not find {} sound with name '{name}'", K::LABEL),
            );
        }
        match destination.get_mut(parsed) {
            Some(slot) => *slot = handle,
            None => destination.push(handle),
        }
        parsed += 1;
    }

    if let Some(expected) = expected {
        if destination.len() != expected.max(0) as usize {
            log::info!(
                "{tag} in '{object_name}' has {} entries, which does not match the declared size of {expected}",
                destination.len()
            );
        }
    }
    true
}
