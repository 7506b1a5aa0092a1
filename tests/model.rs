#![forbid(unsafe_code)]
use chrono::Weekday;
use roulement::model::{canonical_kinds, parse_weekday, Day, ModelError};
use roulement::{Employee, Roster, ShiftKind, Week};

#[test]
fn canonical_week_layout() {
    let week = Week::canonical();
    let sizes: Vec<usize> = week.days().iter().map(|d| d.kinds().len()).collect();
    assert_eq!(sizes, vec![3, 3, 3, 3, 4, 4, 4]);
    assert_eq!(week.slot_count(), 24);
    assert_eq!(week.days()[0].weekday(), Weekday::Sun);
    assert_eq!(week.days()[6].weekday(), Weekday::Sat);
    assert!(week.days()[4].offers(ShiftKind::ThursdayBackup));
    assert!(!week.days()[3].offers(ShiftKind::ThursdayBackup));
}

#[test]
fn opening_kind_switches_on_weekend() {
    let week = Week::canonical();
    assert_eq!(week.days()[1].opening_kind(), ShiftKind::Morning);
    assert_eq!(week.days()[4].opening_kind(), ShiftKind::Morning);
    assert_eq!(week.days()[5].opening_kind(), ShiftKind::WeekendMorning);
    assert_eq!(week.days()[6].opening_kind(), ShiftKind::WeekendMorning);
}

#[test]
fn week_rendering() {
    let rendered = Week::canonical().to_string();
    insta::assert_snapshot!(rendered.trim_end(), @r"
    Sun: morning 11:45-16:00, evening 16:00-22:00, closing 19:30-02:00
    Mon: morning 11:45-16:00, evening 15:00-22:00, closing 19:30-02:00
    Tue: morning 11:45-16:00, evening 16:00-22:00, closing 19:30-02:00
    Wed: morning 11:45-16:00, evening 16:00-22:00, closing 19:30-02:00
    Thu: morning 11:45-16:00, evening 15:00-22:00, thursday_backup 19:30-02:00, closing 21:30-04:00
    Fri: weekend_morning 09:15-18:00, weekend_morning_backup 12:00-18:00, evening 18:00-22:00, closing 21:30-02:00
    Sat: weekend_morning 09:15-18:00, weekend_morning_backup 12:00-18:00, evening 18:00-22:00, closing 19:30-02:00
    ");
}

#[test]
fn windows_crossing_midnight() {
    let thursday = Day::new(Weekday::Thu);
    let closing = thursday.window(ShiftKind::Closing).unwrap();
    assert!(closing.crosses_midnight());
    assert_eq!(closing.duration_minutes(), 6 * 60 + 30);

    let morning = thursday.window(ShiftKind::Morning).unwrap();
    assert!(!morning.crosses_midnight());
    assert_eq!(morning.duration_minutes(), 4 * 60 + 15);

    assert!(thursday.window(ShiftKind::WeekendMorning).is_none());
}

#[test]
fn day_with_wrong_kinds_is_rejected() {
    let err = Day::with_kinds(Weekday::Sun, &[ShiftKind::Morning, ShiftKind::ThursdayBackup])
        .unwrap_err();
    assert!(matches!(err, ModelError::MalformedWeek(_)));

    let dup = Day::with_kinds(
        Weekday::Sun,
        &[ShiftKind::Morning, ShiftKind::Morning, ShiftKind::Evening, ShiftKind::Closing],
    );
    assert!(dup.is_err());

    let reordered = Day::with_kinds(
        Weekday::Fri,
        &[
            ShiftKind::Closing,
            ShiftKind::Evening,
            ShiftKind::WeekendMorningBackup,
            ShiftKind::WeekendMorning,
        ],
    )
    .unwrap();
    assert_eq!(reordered.kinds(), canonical_kinds(Weekday::Fri));
}

#[test]
fn week_from_days_checks_order_and_length() {
    let days: Vec<Day> = roulement::WEEKDAYS.into_iter().map(Day::new).collect();
    assert_eq!(Week::from_days(days.clone()).unwrap(), Week::canonical());

    let short = days[..6].to_vec();
    assert!(matches!(Week::from_days(short), Err(ModelError::MalformedWeek(_))));

    let mut swapped = days;
    swapped.swap(0, 1);
    assert!(matches!(Week::from_days(swapped), Err(ModelError::MalformedWeek(_))));
}

#[test]
fn shift_kind_parsing() {
    assert_eq!("morning".parse::<ShiftKind>().unwrap(), ShiftKind::Morning);
    assert_eq!(
        "Weekend Morning Backup".parse::<ShiftKind>().unwrap(),
        ShiftKind::WeekendMorningBackup
    );
    assert_eq!("thursday-backup".parse::<ShiftKind>().unwrap(), ShiftKind::ThursdayBackup);
    assert!(matches!(
        "brunch".parse::<ShiftKind>(),
        Err(ModelError::UnknownShiftKind(_))
    ));
    assert_eq!(parse_weekday("Friday").unwrap(), Weekday::Fri);
    assert!(parse_weekday("Funday").is_err());
}

#[test]
fn roster_validation() {
    let ok = Roster::new(vec![Employee::new("Noa", 5), Employee::new("Dan", 3)]);
    assert!(ok.validate().is_ok());

    let dup = Roster::new(vec![Employee::new("Noa", 5), Employee::new("Noa", 2)]);
    assert!(matches!(dup.validate(), Err(ModelError::MalformedRoster(_))));

    let zero = Roster::new(vec![Employee::new("Noa", 0)]);
    assert!(zero.validate().is_err());

    let unnamed = Roster::new(vec![Employee::new("  ", 1)]);
    assert!(unnamed.validate().is_err());

    let mut twice = Employee::new("Misha", 2);
    twice.preferences.push(roulement::DayPreference {
        day: Weekday::Mon,
        shifts: vec![ShiftKind::Evening],
    });
    twice.preferences.push(roulement::DayPreference {
        day: Weekday::Mon,
        shifts: vec![ShiftKind::Closing],
    });
    assert!(Roster::new(vec![twice]).validate().is_err());
}

#[test]
fn preferences_and_days_off() {
    let e = Employee::new("Beny", 3)
        .prefer(Weekday::Thu, &[ShiftKind::ThursdayBackup])
        .prefer(Weekday::Thu, &[ShiftKind::Closing])
        .with_days_off(&[Weekday::Fri], true);
    assert_eq!(e.preferences.len(), 1);
    assert!(e.prefers(Weekday::Thu, ShiftKind::Closing));
    assert!(!e.prefers(Weekday::Wed, ShiftKind::Closing));
    assert!(e.asks_day_off(Weekday::Fri));
    assert!(e.day_off_requested);
}
