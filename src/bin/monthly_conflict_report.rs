// Small dev utility: print the conflict + cap usage report for one month.
//
// Usage:
//   cargo run --bin monthly_conflict_report -- [db_path] [year] [month]
//
// Defaults to the standard database path and the current local month.

use chrono::{Datelike, Local};
use std::sync::{Arc, Mutex};

use extra_duty_roster::api::ReportApi;
use extra_duty_roster::config::ConfigManager;
use extra_duty_roster::db::{get_default_db_path, open_sqlite_connection};
use extra_duty_roster::domain::conflict::ConflictKind;
use extra_duty_roster::i18n::{t, t_with_args};
use extra_duty_roster::repository::{
    OfficerRepository, OrdinaryRosterRepository, ScheduleRepository,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    let today = Local::now().date_naive();
    let year = args
        .next()
        .and_then(|s| s.parse::<i32>().ok())
        .unwrap_or_else(|| today.year());
    let month = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or_else(|| today.month());

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

    let schedule_repo = Arc::new(ScheduleRepository::from_connection(conn.clone())?);
    let roster_repo = Arc::new(OrdinaryRosterRepository::from_connection(conn.clone())?);
    let officer_repo = Arc::new(OfficerRepository::from_connection(conn.clone())?);
    let config_manager = Arc::new(ConfigManager::from_connection(conn)?);

    let report_api = ReportApi::new(schedule_repo, roster_repo, officer_repo, config_manager);

    let conflict_report = report_api.detect_conflicts(year, month)?;
    let cap_report = report_api.cap_usage(year, month)?;

    println!(
        "{}",
        t_with_args(
            "report.month_header",
            &[("year", &year.to_string()), ("month", &month.to_string())],
        )
    );
    println!("db={}", db_path);
    println!();

    if conflict_report.total == 0 {
        println!("{}", t("report.no_conflicts"));
    } else {
        println!(
            "{}",
            t_with_args(
                "report.conflict_count",
                &[("count", &conflict_report.total.to_string())],
            )
        );
        for conflict in &conflict_report.conflicts {
            match conflict.kind {
                ConflictKind::OrdinaryDutyOverlap => {
                    let operation = conflict
                        .operation
                        .map(|op| op.to_db_str())
                        .unwrap_or("-");
                    let team = conflict.team.map(|t| t.to_db_str()).unwrap_or("-");
                    println!(
                        "  day {:02}  [{:<8}] {:<24} {} (duty team {})",
                        conflict.day,
                        operation,
                        conflict.officer,
                        conflict.kind.to_db_str(),
                        team
                    );
                }
                ConflictKind::DuplicatedAcrossOperations => {
                    println!(
                        "  day {:02}  [{:<8}] {:<24} {}",
                        conflict.day,
                        "PMF+TRAN",
                        conflict.officer,
                        conflict.kind.to_db_str()
                    );
                }
            }
        }
    }

    println!();
    println!(
        "{}",
        t_with_args("report.cap_header", &[("cap", &cap_report.cap.to_string())])
    );
    for entry in &cap_report.entries {
        let marker = if entry.over_cap { " OVER" } else { "" };
        println!(
            "  {:<24} {:>2}/{:<2}  remaining {:>2}{}",
            entry.officer, entry.used, cap_report.cap, entry.remaining, marker
        );
    }

    Ok(())
}
