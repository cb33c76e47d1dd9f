use std::fs;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

const TABLE: &str = "\
#Game Sounds Start
$Name: 0  snd_missile.wav, 1, 0.60, 0
$Name: Laser
+Entry: laser1.wav
+Entry: laser2.wav
+Cycle type: Sequential
+Preload: NO
+Volume: 0.5
#Game Sounds End

#Interface Sounds Start
$Name: Click  user_c.wav, 0, 0.70, 0
#Interface Sounds End
";

#[test]
fn run_writes_report_and_events() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("sounds.tbl");
    fs::write(&table, TABLE).unwrap();
    fs::write(
        dir.path().join("extra-snd.tbm"),
        "#Game Sounds Start\n$Name: +nocreate Laser\n+Entry: laser3.wav\n+Limit: 4\n#Game Sounds End\n",
    )
    .unwrap();
    let report_path = dir.path().join("report.json");
    let events_path = dir.path().join("events.json");

    let output = Command::new(env!("CARGO_BIN_EXE_gamesnd_engine"))
        .arg("--table")
        .arg(&table)
        .arg("--seed")
        .arg("11")
        .arg("--preload")
        .arg("--resolve")
        .arg("Missing")
        .arg("--play")
        .arg("Laser")
        .arg("--play-count")
        .arg("3")
        .arg("--report-json")
        .arg(&report_path)
        .arg("--events-json")
        .arg(&events_path)
        .output()
        .expect("failed to run gamesnd_engine");

    assert!(
        output.status.success(),
        "gamesnd_engine failed: stdout={} stderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sounds: 2 game, 1 interface, 0 flyby species"));
    assert!(stdout.contains("extra-snd.tbm"));
    assert!(stdout.contains("diagnostics: 1 warnings, 0 errors"));
    assert!(stdout.contains("could not find game sound with name 'Missing'"));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["phase"], "populated");
    let laser = &report["gameplay"][1];
    assert_eq!(laser["name"], "Laser");
    assert_eq!(laser["entries"].as_array().unwrap().len(), 3);
    assert_eq!(laser["limit"], 4);
    assert_eq!(laser["priority"], "must_play");
    assert_eq!(report["gameplay"][0]["loaded"], 1);

    let events: Value = serde_json::from_str(&fs::read_to_string(&events_path).unwrap()).unwrap();
    let plays: Vec<_> = events
        .as_array()
        .unwrap()
        .iter()
        .filter(|event| event["kind"] == "play")
        .map(|event| event["filename"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(plays, ["laser1.wav", "laser2.wav", "laser3.wav"]);
}

#[test]
fn zero_play_count_is_rejected() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("sounds.tbl");
    fs::write(&table, TABLE).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_gamesnd_engine"))
        .arg("--table")
        .arg(&table)
        .arg("--play")
        .arg("Laser")
        .arg("--play-count")
        .arg("0")
        .output()
        .expect("failed to run gamesnd_engine");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--play-count must be at least 1"));
}

#[test]
fn missing_table_names_the_path() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("absent.tbl");

    let output = Command::new(env!("CARGO_BIN_EXE_gamesnd_engine"))
        .arg("--table")
        .arg(&table)
        .output()
        .expect("failed to run gamesnd_engine");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.tbl"));
}
