use std::env;

use anyhow::{Context, Result};
use gamesnd_formats::{FilePatch, SoundRecord, SoundTable};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: tbl_dump <sounds.tbl> [--json]")?;
    let json = env::args().skip(2).any(|arg| arg == "--json");
    let table = SoundTable::from_file(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!(
        "{} game, {} interface, {} flyby entries in {}",
        table.game.len(),
        table.interface.len(),
        table.flyby.len(),
        path
    );
    for record in &table.game {
        print_record("game", record);
    }
    for record in &table.interface {
        print_record("iface", record);
    }
    for flyby in &table.flyby {
        print_record(&format!("{}/f", flyby.species), &flyby.fighter);
        print_record(&format!("{}/b", flyby.species), &flyby.bomber);
    }
    for diagnostic in table.diagnostics.iter() {
        println!("{diagnostic}");
    }
    Ok(())
}

fn print_record(section: &str, record: &SoundRecord) {
    let files = match &record.patch.files {
        FilePatch::Replace(file) | FilePatch::ReplaceSole(file) => file.clone(),
        FilePatch::KeepSole => String::from("<same>"),
        FilePatch::Append(files) => files.join(" "),
        FilePatch::Disable => String::from("(disabled)"),
    };
    let priority = record
        .patch
        .priority
        .map(|priority| priority.table_name())
        .unwrap_or("-");
    println!(
        "{section:<10} {line:>5} {name:<32} {nocreate:<9} {priority:<12} {files}",
        line = record.line,
        name = record.name,
        nocreate = if record.no_create { "nocreate" } else { "" },
    );
}
