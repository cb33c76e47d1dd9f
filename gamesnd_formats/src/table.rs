use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::entry::{EntryContext, SoundPatch, parse_entry};
use crate::tokens::{TableError, TextTokens, TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundSection {
    Game,
    Interface,
}

/// One `$Name:` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundRecord {
    pub name: String,
    /// Set when the entry modifies an existing sound of the same name.
    pub no_create: bool,
    pub line: usize,
    pub patch: SoundPatch,
}

/// The fighter/bomber pair declared for one species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlybyRecord {
    pub species: String,
    pub fighter: SoundRecord,
    pub bomber: SoundRecord,
}

/// Receives records as the table is read.
pub trait TableSink {
    /// Whether a sound named `name` already exists in `section`.
    fn contains(&self, section: SoundSection, name: &str) -> bool;

    fn accept(&mut self, section: SoundSection, record: SoundRecord);

    fn accept_flyby(&mut self, record: FlybyRecord);

    fn diagnostics(&mut self) -> &mut Diagnostics;
}

/// Walks the sections of one sound table, handing every entry to `sink`.
///
/// Problems never abort the walk: a broken entry is reported and skipped,
/// and a missing section end tag closes the section at end of input.
/// Returns the number of records delivered.
pub fn parse_sound_table(tokens: &mut dyn TokenSource, sink: &mut dyn TableSink) -> usize {
    let mut delivered = 0;

    if tokens.optional_token("#Game Sounds Start") {
        delivered += parse_sound_section(tokens, sink, SoundSection::Game, "#Game Sounds End");
    }
    if tokens.optional_token("#Interface Sounds Start") {
        delivered += parse_sound_section(
            tokens,
            sink,
            SoundSection::Interface,
            "#Interface Sounds End",
        );
    }
    if tokens.optional_token("#Flyby Sounds Start") {
        delivered += parse_flyby_section(tokens, sink);
    }
    if tokens.optional_token("#Sound Environments Start") {
        let start = tokens.line_number();
        skip_section(tokens, sink, "#Sound Environments End");
        log::debug!("skipped sound environments (lines {start}-{})", tokens.line_number());
    }

    if !tokens.is_eof() {
        let line = tokens.line_number();
        let found = tokens.peek_text();
        sink.diagnostics()
            .warn(Some(line), format!("ignoring unexpected content '{found}'"));
    }
    delivered
}

fn parse_sound_section(
    tokens: &mut dyn TokenSource,
    sink: &mut dyn TableSink,
    section: SoundSection,
    end: &str,
) -> usize {
    let mut delivered = 0;
    while !at_section_end(tokens, sink, end) {
        let start = tokens.line_number();
        match parse_sound_line(tokens, sink, Some(section), "$Name:") {
            Ok(record) => {
                sink.accept(section, record);
                delivered += 1;
            }
            Err(err) => {
                sink.diagnostics().error(err.line(), err.to_string());
                recover(tokens, start);
            }
        }
    }
    delivered
}

fn parse_flyby_section(tokens: &mut dyn TokenSource, sink: &mut dyn TableSink) -> usize {
    let mut delivered = 0;
    while !at_section_end(tokens, sink, "#Flyby Sounds End") {
        let start = tokens.line_number();
        let tag = tokens.read_until(':');
        let Some(species) = tag.strip_prefix('$').map(str::to_string) else {
            sink.diagnostics()
                .error(Some(start), format!("unexpected token tag {tag}"));
            tokens.advance_to_line_end();
            continue;
        };

        let pair = parse_sound_line(tokens, sink, None, ":").and_then(|fighter| {
            let bomber = parse_sound_line(tokens, sink, None, &format!("{tag}:"))?;
            Ok((fighter, bomber))
        });
        match pair {
            Ok((fighter, bomber)) => {
                sink.accept_flyby(FlybyRecord {
                    species,
                    fighter,
                    bomber,
                });
                delivered += 1;
            }
            Err(err) => {
                sink.diagnostics().error(
                    err.line(),
                    format!("flyby sounds for species '{species}': {err}"),
                );
                recover(tokens, start);
            }
        }
    }
    delivered
}

/// Reads `tag`, the optional `+nocreate` marker, the sound name and its entry.
///
/// `lookup` names the section searched for `+nocreate` targets; without one
/// the marker is not recognised.
fn parse_sound_line(
    tokens: &mut dyn TokenSource,
    sink: &mut dyn TableSink,
    lookup: Option<SoundSection>,
    tag: &str,
) -> Result<SoundRecord, TableError> {
    tokens.required_token(tag)?;
    let line = tokens.line_number();

    let mut no_create = lookup.is_some() && tokens.optional_token("+nocreate");
    let name = tokens.read_word();
    if let Some(section) = lookup.filter(|_| no_create) {
        if !sink.contains(section, &name) {
            sink.diagnostics().warn(
                Some(line),
                format!("no existing sound entry with name \"{name}\" found"),
            );
            no_create = false;
        }
    }

    let ctx = EntryContext {
        name: &name,
        no_create,
    };
    let patch = parse_entry(tokens, &ctx, sink.diagnostics())?;
    Ok(SoundRecord {
        name,
        no_create,
        line,
        patch,
    })
}

/// Consumes `end` if it is next. Reports a missing end tag when input runs
/// out or another section begins.
fn at_section_end(tokens: &mut dyn TokenSource, sink: &mut dyn TableSink, end: &str) -> bool {
    if tokens.optional_token(end) {
        return true;
    }
    if tokens.is_eof() || tokens.check_token("#") {
        let line = tokens.line_number();
        sink.diagnostics()
            .error(Some(line), format!("missing '{end}'"));
        return true;
    }
    false
}

fn skip_section(tokens: &mut dyn TokenSource, sink: &mut dyn TableSink, end: &str) {
    while !at_section_end(tokens, sink, end) {
        tokens.advance_to_line_end();
    }
}

/// Moves to the next line that starts with `$` or `#`, always leaving the
/// line the failed entry started on.
fn recover(tokens: &mut dyn TokenSource, start_line: usize) {
    if tokens.line_number() == start_line {
        tokens.advance_to_line_end();
    }
    while !tokens.is_eof() && !tokens.check_token("$") && !tokens.check_token("#") {
        tokens.advance_to_line_end();
    }
}

/// A parsed table kept as plain records, for tools that only inspect tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SoundTable {
    pub game: Vec<SoundRecord>,
    pub interface: Vec<SoundRecord>,
    pub flyby: Vec<FlybyRecord>,
    pub diagnostics: Diagnostics,
}

impl SoundTable {
    pub fn parse_str(text: &str) -> Self {
        let mut table = SoundTable::default();
        let mut tokens = TextTokens::new(text);
        parse_sound_table(&mut tokens, &mut table);
        table
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading sound table {}", path.display()))?;
        Ok(Self::parse_str(&text))
    }

    pub fn records(&self, section: SoundSection) -> &[SoundRecord] {
        match section {
            SoundSection::Game => &self.game,
            SoundSection::Interface => &self.interface,
        }
    }
}

impl TableSink for SoundTable {
    fn contains(&self, section: SoundSection, name: &str) -> bool {
        self.records(section)
            .iter()
            .any(|record| record.name.eq_ignore_ascii_case(name))
    }

    fn accept(&mut self, section: SoundSection, record: SoundRecord) {
        if !record.no_create && self.contains(section, &record.name) {
            self.diagnostics.warn(
                Some(record.line),
                format!("duplicate sound name \"{}\" found", record.name),
            );
        }
        match section {
            SoundSection::Game => self.game.push(record),
            SoundSection::Interface => self.interface.push(record),
        }
    }

    fn accept_flyby(&mut self, record: FlybyRecord) {
        self.flyby.push(record);
    }

    fn diagnostics(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }
}
