//! The three sound entry layouts.
//!
//! A `$Name:` line is followed by one of:
//!
//! * a retail line: `file.wav, preload, volume, is3d[, min, max]`
//! * an extended entry opened by `+Filename:`
//! * a soundset opened by one or more `+Entry:` lines
//!
//! Each layout parses into a [`SoundPatch`]: the set of fields the entry
//! mentions. The engine applies a patch either to a fresh definition or, for
//! `+nocreate` entries, to an existing one.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::diagnostics::Diagnostics;
use crate::model::{Attenuation, CycleType, Priority, UniformRange};
use crate::tokens::{TableError, TokenSource};

/// Minimum pitch a soundset may request.
pub const MIN_PITCH: f32 = 0.0001;

/// Retail files that carry attenuation values without setting the 3D flag.
const RETAIL_IMPLICIT_3D: [&str; 2] = ["l_hit.wav", "m_hit.wav"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "files", rename_all = "snake_case")]
pub enum FilePatch {
    /// The definition becomes a single entry playing this file.
    Replace(String),
    /// The existing single entry switches to this file.
    ReplaceSole(String),
    /// `<same>`: the existing single entry keeps its file.
    KeepSole,
    /// Soundset entries, appended in table order.
    Append(Vec<String>),
    /// `none` / `empty`: the definition becomes a disabled single silent entry.
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFormatKind {
    Retail,
    Extended,
    Soundset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundPatch {
    pub format: EntryFormatKind,
    pub files: FilePatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<CycleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preload: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<UniformRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<UniformRange>,
    /// `Some(None)` clears attenuation (the sound is not 3D).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attenuation: Option<Option<Attenuation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<NonZeroU32>,
}

impl SoundPatch {
    pub fn new(format: EntryFormatKind, files: FilePatch) -> Self {
        Self {
            format,
            files,
            cycle: None,
            preload: None,
            volume: None,
            pitch: None,
            attenuation: None,
            priority: None,
            limit: None,
        }
    }

    pub fn is_disable(&self) -> bool {
        self.files == FilePatch::Disable
    }
}

/// What the entry parser knows about the `$Name:` line it continues.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    pub name: &'a str,
    /// True when the entry modifies an existing definition.
    pub no_create: bool,
}

pub trait EntryFormat: Sync {
    fn kind(&self) -> EntryFormatKind;

    fn parse(
        &self,
        tokens: &mut dyn TokenSource,
        ctx: &EntryContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SoundPatch, TableError>;
}

pub struct RetailLine;
pub struct ExtendedEntry;
pub struct SoundsetEntry;

/// Picks the layout for the entry that follows, consuming its opening tag.
pub fn select_format(tokens: &mut dyn TokenSource) -> &'static dyn EntryFormat {
    if tokens.optional_token("+Filename:") {
        &ExtendedEntry
    } else if tokens.optional_token("+Entry:") {
        &SoundsetEntry
    } else {
        &RetailLine
    }
}

/// Parses the entry body that follows a `$Name:` line.
pub fn parse_entry(
    tokens: &mut dyn TokenSource,
    ctx: &EntryContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<SoundPatch, TableError> {
    select_format(tokens).parse(tokens, ctx, diagnostics)
}

pub fn is_disabled_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("empty")
}

impl EntryFormat for RetailLine {
    fn kind(&self) -> EntryFormatKind {
        EntryFormatKind::Retail
    }

    fn parse(
        &self,
        tokens: &mut dyn TokenSource,
        ctx: &EntryContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SoundPatch, TableError> {
        let filename = tokens.read_until(',');
        if is_disabled_name(&filename) {
            tokens.advance_to_line_end();
            let mut patch = SoundPatch::new(self.kind(), FilePatch::Disable);
            patch.pitch = Some(UniformRange::fixed(1.0));
            return Ok(patch);
        }
        tokens.skip_char(',');

        let preload = tokens.read_int()? > 0;
        let volume = tokens.read_float()?;
        let is_3d = tokens.read_int()?;

        let attenuation = if is_3d != 0 {
            let min = tokens.read_int()?;
            let max = tokens.read_int()?;
            Some(Attenuation { min, max })
        } else if RETAIL_IMPLICIT_3D
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&filename))
        {
            match (tokens.read_int_optional(), tokens.read_int_optional()) {
                (Some(min), Some(max)) => {
                    log::debug!(
                        "converting retail sound {}, '{}' to a 3D sound",
                        ctx.name,
                        filename
                    );
                    Some(Attenuation { min, max })
                }
                _ => None,
            }
        } else {
            None
        };

        if let Some(extra) = tokens.read_int_optional() {
            diagnostics.warn(
                Some(tokens.line_number()),
                format!(
                    "unexpected extra value {extra} found for sound '{}' (filename '{filename}')",
                    ctx.name
                ),
            );
        }
        tokens.advance_to_line_end();

        let mut patch = SoundPatch::new(self.kind(), FilePatch::Replace(filename));
        patch.preload = Some(preload);
        patch.volume = Some(UniformRange::fixed(volume));
        patch.pitch = Some(UniformRange::fixed(1.0));
        patch.attenuation = Some(attenuation);
        Ok(patch)
    }
}

impl EntryFormat for ExtendedEntry {
    fn kind(&self) -> EntryFormatKind {
        EntryFormatKind::Extended
    }

    fn parse(
        &self,
        tokens: &mut dyn TokenSource,
        ctx: &EntryContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SoundPatch, TableError> {
        let line = tokens.line_number();
        let filename = tokens.read_line();

        if is_disabled_name(&filename) {
            skip_entry_fields(tokens);
            let mut patch = SoundPatch::new(self.kind(), FilePatch::Disable);
            patch.pitch = Some(UniformRange::fixed(1.0));
            return Ok(patch);
        }

        let files = if filename.eq_ignore_ascii_case("<same>") {
            if !ctx.no_create {
                return Err(TableError::Invalid {
                    message: "'<same>' is only allowed if +nocreate was specified".to_string(),
                    line,
                });
            }
            FilePatch::KeepSole
        } else if ctx.no_create {
            FilePatch::ReplaceSole(filename)
        } else {
            FilePatch::Replace(filename)
        };

        let mut patch = SoundPatch::new(self.kind(), files);
        patch.pitch = Some(UniformRange::fixed(1.0));

        if required_unless_no_create(tokens, "+Preload:", ctx.no_create)? {
            patch.preload = Some(tokens.read_bool()?);
        }
        if required_unless_no_create(tokens, "+Volume:", ctx.no_create)? {
            patch.volume = Some(UniformRange::fixed(tokens.read_float()?));
        }
        patch.attenuation = Some(parse_3d(tokens)?);
        parse_enhanced(tokens, &mut patch, diagnostics)?;
        Ok(patch)
    }
}

impl EntryFormat for SoundsetEntry {
    fn kind(&self) -> EntryFormatKind {
        EntryFormatKind::Soundset
    }

    fn parse(
        &self,
        tokens: &mut dyn TokenSource,
        ctx: &EntryContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<SoundPatch, TableError> {
        let mut files = Vec::new();
        loop {
            files.push(tokens.read_line());
            if !tokens.optional_token("+Entry:") {
                break;
            }
        }

        let mut patch = SoundPatch::new(self.kind(), FilePatch::Append(files));

        if required_unless_no_create(tokens, "+Cycle type:", ctx.no_create)? {
            patch.cycle = Some(parse_cycle_type(tokens, diagnostics));
        }
        if required_unless_no_create(tokens, "+Preload:", ctx.no_create)? {
            patch.preload = Some(tokens.read_bool()?);
        }
        if required_unless_no_create(tokens, "+Volume:", ctx.no_create)? {
            patch.volume = Some(parse_range(tokens, 0.0, 1.0, diagnostics)?);
        }
        patch.attenuation = Some(parse_3d(tokens)?);
        parse_enhanced(tokens, &mut patch, diagnostics)?;

        if tokens.optional_token("+Pitch:") {
            patch.pitch = Some(parse_range(tokens, MIN_PITCH, f32::MAX, diagnostics)?);
        } else if !ctx.no_create {
            patch.pitch = Some(UniformRange::fixed(1.0));
        }
        Ok(patch)
    }
}

/// Required when creating; optional when modifying. Returns whether the tag was present.
fn required_unless_no_create(
    tokens: &mut dyn TokenSource,
    tag: &str,
    no_create: bool,
) -> Result<bool, TableError> {
    if no_create {
        return Ok(tokens.optional_token(tag));
    }
    tokens.required_token(tag)?;
    Ok(true)
}

fn parse_3d(tokens: &mut dyn TokenSource) -> Result<Option<Attenuation>, TableError> {
    if !tokens.optional_token("+3D Sound:") {
        return Ok(None);
    }
    tokens.required_token("+Attenuation start:")?;
    let min = tokens.read_int()?;
    tokens.required_token("+Attenuation end:")?;
    let max = tokens.read_int()?;
    Ok(Some(Attenuation { min, max }))
}

fn parse_enhanced(
    tokens: &mut dyn TokenSource,
    patch: &mut SoundPatch,
    diagnostics: &mut Diagnostics,
) -> Result<(), TableError> {
    if tokens.optional_token("+Priority:") {
        let line = tokens.line_number();
        let name = tokens.read_line();
        match Priority::from_table_name(&name) {
            Some(priority) => patch.priority = Some(priority),
            None => diagnostics.error(Some(line), format!("unknown enhanced sound priority: {name}")),
        }
    }

    if tokens.optional_token("+Limit:") {
        let line = tokens.line_number();
        let limit = tokens.read_int()?;
        match u32::try_from(limit).ok().and_then(NonZeroU32::new) {
            Some(limit) => patch.limit = Some(limit),
            None => diagnostics.error(Some(line), format!("invalid enhanced sound limit: {limit}")),
        }
    }
    Ok(())
}

fn parse_cycle_type(tokens: &mut dyn TokenSource, diagnostics: &mut Diagnostics) -> CycleType {
    if tokens.optional_token("Sequential") {
        CycleType::Sequential
    } else if tokens.optional_token("Random") {
        CycleType::Random
    } else {
        diagnostics.error(
            Some(tokens.line_number()),
            format!(
                "failed to parse sound cycle type, expected 'sequential' or 'random', got [{}]",
                tokens.peek_text()
            ),
        );
        tokens.advance_to_line_end();
        CycleType::Sequential
    }
}

/// One value, or two values forming a range, clamped to `[lower, upper]`.
fn parse_range(
    tokens: &mut dyn TokenSource,
    lower: f32,
    upper: f32,
    diagnostics: &mut Diagnostics,
) -> Result<UniformRange, TableError> {
    let line = tokens.line_number();
    let first = tokens.read_float()?;
    let second = tokens.read_float_optional();

    let mut clamp = |value: f32| {
        if value < lower || value > upper {
            let clamped = value.clamp(lower, upper);
            diagnostics.warn(
                Some(line),
                format!("value {value} is outside [{lower}, {upper}], using {clamped}"),
            );
            clamped
        } else {
            value
        }
    };
    let first = clamp(first);
    let second = second.map(&mut clamp).unwrap_or(first);

    if second < first {
        diagnostics.warn(
            Some(line),
            format!("range maximum {second} is below its minimum {first}, swapping"),
        );
    }
    Ok(UniformRange::new(first, second))
}

/// Skips the `+` fields of an entry that was disabled by its filename.
fn skip_entry_fields(tokens: &mut dyn TokenSource) {
    tokens.advance_to_line_end();
    while tokens.check_token("+") && !tokens.check_token("+nocreate") {
        tokens.advance_to_line_end();
    }
}
