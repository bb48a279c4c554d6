use std::ffi::{OsStr, OsString};
use std::io::Write;

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use weekgrid_core::commands::Session;
use weekgrid_core::config::Config;
use weekgrid_core::render::Renderer;
use weekgrid_model::grid::CascadeDisplay;
use weekgrid_model::{DayIndex, Task};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn scripted_week_with_file_config() {
    let mut file = NamedTempFile::new().expect("temp config");
    writeln!(
        file,
        "today = \"2026-10-14\"\n[grid]\nrows = 3\ncascade = \"full\"\n[tasks]\nmax_title_len = 8"
    )
    .expect("write config");

    let mut cfg = Config::load(Some(file.path())).expect("load config");
    cfg.sanitize();
    let today = cfg.today.expect("pinned today");

    let mut session = Session::new(&cfg, today, today, Renderer::plain(false), Vec::new());
    let script = "\
        add mon too late\n\
        add wed Stretch every morning\n\
        add wed/1 Run\n\
        add wed/2 Swim\n\
        done wed/1\n\
        next\n\
        prev\n\
        rm wed\n";
    session.run_lines(script.as_bytes()).expect("run script");

    let state = session.state();
    let monday = DayIndex::from(date(2026, 10, 12));
    let wednesday = DayIndex::from(date(2026, 10, 14));

    assert!(state.task(monday).is_none(), "past day must stay empty");
    assert!(state.task(wednesday).is_none(), "deleted");
    assert_eq!(
        state.task(wednesday.offset(7)),
        Some(&Task {
            title: "Run".to_string(),
            completed: true,
        })
    );
    assert_eq!(state.task(wednesday.offset(14)), Some(&Task::new("Swim".to_string())));
    assert_eq!(state.task(wednesday.offset(21)), Some(&Task::placeholder()));
    assert_eq!(state.week_start(), date(2026, 10, 12));

    let text = String::from_utf8(session.into_output()).expect("utf8");
    // Title capped at 8 chars on the way in.
    assert!(text.contains("[ ] Stretch"));
    assert!(!text.contains("Stretch every"));
    assert!(text.contains("[ ] Swim"));
    assert!(text.contains("[x] Run"));
}

#[test]
fn two_rows_mode_from_overrides() {
    let mut cfg = Config::default();
    cfg.apply_overrides(vec![("grid.cascade".to_string(), "two-rows".to_string())])
        .expect("override");
    assert_eq!(cfg.grid.cascade, CascadeDisplay::TwoRows);

    let today = date(2026, 10, 14);
    let mut session = Session::new(&cfg, today, today, Renderer::plain(false), Vec::new());
    session
        .run_lines("add fri Laundry\nadd fri/1 Ironing\nadd fri/2 Folding\n".as_bytes())
        .expect("run script");

    let text = String::from_utf8(session.into_output()).expect("utf8");
    let last_grid = text
        .rsplit("October 2026")
        .next()
        .expect("at least one grid");
    assert!(last_grid.contains("[ ] Laundry"));
    assert!(last_grid.contains("[ ] Ironing"));
    assert!(!last_grid.contains("Folding"));
    assert!(last_grid.contains("+1 more"));
}

fn run_args(args: &[&OsStr]) -> anyhow::Result<()> {
    let mut raw = vec![OsString::from("weekgrid")];
    raw.extend(args.iter().map(|arg| arg.to_os_string()));
    weekgrid_core::run(raw)
}

#[test]
fn run_reads_config_week_and_script() {
    let mut config = NamedTempFile::new().expect("temp config");
    writeln!(config, "color = false\n[grid]\nrows = 2").expect("write config");
    let mut script = NamedTempFile::new().expect("temp script");
    writeln!(script, "add fri Plan trip\nnext\nshow\ndump\nquit").expect("write script");

    run_args(&[
        OsStr::new("-q"),
        OsStr::new("--config"),
        config.path().as_os_str(),
        OsStr::new("--today"),
        OsStr::new("2026-10-14"),
        OsStr::new("--week"),
        OsStr::new("2026-10-21"),
        OsStr::new("--script"),
        script.path().as_os_str(),
    ])
    .expect("run with script");
}

#[test]
fn run_reports_missing_script_and_bad_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.txt");
    let err = run_args(&[
        OsStr::new("-q"),
        OsStr::new("--config"),
        OsStr::new("/dev/null"),
        OsStr::new("--script"),
        missing.as_os_str(),
    ])
    .expect_err("missing script");
    assert!(format!("{err:#}").contains("failed to open script"));

    let err = run_args(&[
        OsStr::new("-q"),
        OsStr::new("--config"),
        OsStr::new("/dev/null"),
        OsStr::new("--rc"),
        OsStr::new("grid.rows=many"),
    ])
    .expect_err("bad override");
    assert!(format!("{err:#}").contains("--rc overrides"));
}
