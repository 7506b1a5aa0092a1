#![forbid(unsafe_code)]
use chrono::Weekday;
use roulement::{
    io, EnumerationStatus, Employee, JsonStorage, Roster, ScheduleOptions, Scheduler, ShiftKind,
    Storage, Week,
};
use std::fs;
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn csv_import_reads_all_columns() {
    let dir = tempdir().unwrap();
    let csv = write(
        dir.path(),
        "employees.csv",
        "name,priority,is_new,day_off_requested,days_off,preferences\n\
         Noa,5,false,false,,Sun:evening;Mon:evening\n\
         Chepo,4,no,yes,Mon;Tue;Fri;Sat,Sun:morning;Wed:evening|closing\n\
         Misha,2,true,,,Thu:thursday_backup|closing\n",
    );

    let employees = io::import_employees_csv(&csv).unwrap();
    assert_eq!(employees.len(), 3);

    let noa = &employees[0];
    assert_eq!(noa.priority, 5);
    assert!(!noa.is_new);
    assert!(noa.prefers(Weekday::Mon, ShiftKind::Evening));

    let chepo = &employees[1];
    assert!(chepo.day_off_requested);
    assert_eq!(
        chepo.days_off,
        vec![Weekday::Mon, Weekday::Tue, Weekday::Fri, Weekday::Sat]
    );
    assert!(chepo.prefers(Weekday::Wed, ShiftKind::Closing));

    let misha = &employees[2];
    assert!(misha.is_new);
    assert!(!misha.day_off_requested);
    assert!(misha.prefers(Weekday::Thu, ShiftKind::ThursdayBackup));
}

#[test]
fn csv_import_with_minimal_header() {
    let dir = tempdir().unwrap();
    let csv = write(dir.path(), "min.csv", "name,priority\nDan,3\n");
    let employees = io::import_employees_csv(&csv).unwrap();
    assert_eq!(employees, vec![Employee::new("Dan", 3)]);
}

#[test]
fn csv_import_rejects_bad_values() {
    let dir = tempdir().unwrap();
    let bad_priority = write(dir.path(), "a.csv", "name,priority\nDan,high\n");
    assert!(io::import_employees_csv(&bad_priority).is_err());

    let bad_bool = write(dir.path(), "b.csv", "name,priority,is_new\nDan,3,maybe\n");
    let err = io::import_employees_csv(&bad_bool).unwrap_err();
    assert!(format!("{err:#}").contains("is_new"));

    let bad_shift = write(
        dir.path(),
        "c.csv",
        "name,priority,is_new,day_off_requested,days_off,preferences\nDan,3,,,,Sun:brunch\n",
    );
    assert!(io::import_employees_csv(&bad_shift).is_err());
}

#[test]
fn merge_refuses_duplicates() {
    let mut roster = Roster::new(vec![Employee::new("Noa", 5)]);
    io::merge_employees(&mut roster, vec![Employee::new("Dan", 3)]).unwrap();
    assert_eq!(roster.len(), 2);
    assert!(io::merge_employees(&mut roster, vec![Employee::new("Noa", 1)]).is_err());
}

#[test]
fn json_storage_round_trip() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("roster.json")).unwrap();
    let roster = Roster::new(vec![
        Employee::new("Noa", 5).prefer(Weekday::Sun, &[ShiftKind::Evening]),
        Employee::new("Misha", 2)
            .new_hire()
            .with_days_off(&[Weekday::Sat], true),
    ]);
    storage.save(&roster).unwrap();
    assert_eq!(storage.load().unwrap(), roster);

    let raw = fs::read_to_string(storage.path()).unwrap();
    assert!(raw.contains("\"evening\""));
}

#[test]
fn json_storage_rejects_invalid_roster() {
    let dir = tempdir().unwrap();
    let path = write(
        dir.path(),
        "roster.json",
        r#"{"employees":[{"name":"Noa","priority":1},{"name":"Noa","priority":2}]}"#,
    );
    let storage = JsonStorage::open(path).unwrap();
    assert!(storage.load().is_err());
}

#[test]
fn exports_solutions() {
    let week = Week::canonical();
    let roster = Roster::new(vec![
        Employee::new("Noa", 5).prefer(Weekday::Sun, &[ShiftKind::Evening]),
        Employee::new("Chepo", 4),
        Employee::new("Beny", 3),
        Employee::new("Misha", 2).new_hire(),
        Employee::new("Dan", 3).new_hire(),
    ]);
    let opts = ScheduleOptions {
        max_solutions: 2,
        ..ScheduleOptions::default()
    };
    let set = Scheduler::new(&week, &roster, opts).unwrap().solve();
    assert_eq!(set.status, EnumerationStatus::CapReached);

    let dir = tempdir().unwrap();
    let json = dir.path().join("solutions.json");
    io::export_solutions_json(&json, &set).unwrap();
    assert_eq!(io::load_solutions_json(&json).unwrap(), set);

    let csv = dir.path().join("assignments.csv");
    io::export_assignments_csv(&csv, &set).unwrap();
    let content = fs::read_to_string(&csv).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("solution,day,shift,start,end,employee,preferred")
    );
    assert_eq!(content.lines().count(), 1 + 2 * 24);
    assert!(content.contains("0,Sun,evening,16:00,22:00,Noa,true"));

    let text = io::render_solution(&set.solutions[0]);
    assert!(text.starts_with("Sun\n"));
    assert!(text.contains("  evening 16:00-22:00 -> Noa (requested)"));
    assert!(text.contains("objective: 5"));
}
