use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const REQUIRED_CRITERIA: [&str; 13] = [
    "zoning_plan",
    "cadastral_restrictions",
    "utilities",
    "underground_infrastructure",
    "natura_2000",
    "air_quality",
    "soil_quality",
    "external_safety",
    "bearing_capacity",
    "construction",
    "road_access",
    "public_transport",
    "cycling",
];

fn sitescore(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sitescore").expect("binary should compile");
    cmd.env("HOME", dir.path())
        .env_remove("RUST_LOG")
        .arg("--dir")
        .arg(dir.path());
    cmd
}

fn add_site(dir: &TempDir, name: &str, extra: &[&str]) {
    sitescore(dir)
        .args(["add", name, "--date", "2024-03-01"])
        .args(extra)
        .assert()
        .success()
        .stdout(predicate::str::contains("added site"));
}

/// Answers every required criterion with the option at `position`.
fn answer_all(dir: &TempDir, name: &str, position: usize) -> assert_cmd::assert::Assert {
    let mut cmd = sitescore(dir);
    cmd.args(["answer", name]);
    for criterion in REQUIRED_CRITERIA {
        cmd.arg("--set").arg(format!("{criterion}={position}"));
    }
    cmd.assert()
}

#[test]
fn add_persists_sites_to_the_registry_file() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Harbour Lot", &["--area", "900", "--class", "IV"]);

    let stored = fs::read_to_string(dir.path().join("sites.json")).expect("registry written");
    assert!(stored.contains("\"Harbour Lot\""));
    assert!(stored.contains("\"version\": 1"));

    sitescore(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 Harbour Lot  2024-03-01  total: pending"));
}

#[test]
fn duplicate_names_are_rejected() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &[]);
    sitescore(&dir)
        .args(["add", "Meadow", "--date", "2024-03-02"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("site already exists: Meadow"));
}

#[test]
fn invalid_date_is_rejected() {
    let dir = TempDir::new().expect("temp dir should be created");
    sitescore(&dir)
        .args(["add", "Meadow", "--date", "03/01/2024"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn partial_answers_leave_the_total_pending() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &[]);
    sitescore(&dir)
        .args(["answer", "Meadow", "--set", "zoning_plan=conforming"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("total: pending"));
}

#[test]
fn complete_answers_score_the_site() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &[]);
    answer_all(&dir, "Meadow", 1)
        .success()
        .stdout(predicate::str::contains("total: 20/20"));

    sitescore(&dir)
        .args(["show", "Meadow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total score: 20/20"))
        .stdout(predicate::str::contains("Fully conforms to the zoning plan"));
}

#[test]
fn failing_gating_criterion_disqualifies() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Swamp", &[]);
    sitescore(&dir)
        .args(["answer", "Swamp", "--set", "zoning_plan=non_conforming"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("total: 4/20"))
        .stdout(predicate::str::contains("disqualified"));
}

#[test]
fn unknown_answer_option_is_rejected() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &[]);
    sitescore(&dir)
        .args(["answer", "Meadow", "--set", "zoning_plan=maybe"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unknown option 'maybe'"));
}

#[test]
fn search_combines_filters() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(
        &dir,
        "Utrecht Centraal",
        &["--lat", "52.0894", "--lon", "5.1101", "--area", "2500"],
    );
    add_site(&dir, "Harbour Lot", &["--lat", "51.9225", "--lon", "4.4792", "--area", "900"]);

    sitescore(&dir)
        .args(["search", "--near", "52.09,5.11", "--radius-km", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Utrecht Centraal"))
        .stdout(predicate::str::contains("Harbour Lot").not());

    sitescore(&dir)
        .args(["search", "--text", "harbour", "--min-area", "2000", "--mode", "or"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Utrecht Centraal"))
        .stdout(predicate::str::contains("Harbour Lot"));

    sitescore(&dir)
        .args(["search", "--text", "harbour", "--min-area", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no sites"));
}

#[test]
fn address_geocodes_through_the_configured_gazetteer() {
    let dir = TempDir::new().expect("temp dir should be created");
    fs::write(
        dir.path().join("sitescore.toml"),
        "[geocoder.addresses]\n\"Stationsplein 1, Utrecht\" = [52.0894, 5.1101]\n",
    )
    .expect("config should be written");
    add_site(&dir, "Station", &["--address", "stationsplein 1, utrecht"]);
    add_site(&dir, "Elsewhere", &["--address", "Unknown 5, Nowhere"]);

    sitescore(&dir)
        .args(["search", "--near-address", "Stationsplein 1, Utrecht", "--radius-km", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Station"))
        .stdout(predicate::str::contains("Elsewhere").not());
}

#[test]
fn compare_ranks_best_first() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Middling", &[]);
    add_site(&dir, "Best", &[]);
    answer_all(&dir, "Middling", 2).success();
    answer_all(&dir, "Best", 1).success();

    sitescore(&dir)
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains("| 1 | Best | 20/20 |"))
        .stdout(predicate::str::contains("| 2 | Middling | 12/20 |"));
}

#[test]
fn export_writes_semicolon_csv() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &["--notes", "flat; dry"]);
    let output = dir.path().join("out").join("sites.csv");

    sitescore(&dir)
        .args(["export", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported 1 sites"));

    let exported = fs::read_to_string(&output).expect("export written");
    assert!(exported.starts_with("name;date;address;latitude;longitude"));
    assert!(exported.contains("Meadow;2024-03-01;;;;;;\"flat; dry\""));
}

#[test]
fn remove_deletes_the_site() {
    let dir = TempDir::new().expect("temp dir should be created");
    add_site(&dir, "Meadow", &[]);
    sitescore(&dir)
        .args(["remove", "Meadow"])
        .assert()
        .success();
    sitescore(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no sites"));
}
