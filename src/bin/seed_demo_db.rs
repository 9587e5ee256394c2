// Dev utility: reset the database and seed a demo month.
//
// Usage:
//   cargo run --bin seed_demo_db -- [db_path]
//
// Seeds the officer master (3 rotation teams + administrative staff), the
// ordinary-duty rotation for the current month, and a partially filled
// PMF/TRANSITO schedule written through the assignment gates. The data
// intentionally contains a few rotation overlaps and one cross-operation
// duplicate so the conflict report has something to show.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Local};
use rusqlite::Connection;

use extra_duty_roster::api::RosterApi;
use extra_duty_roster::config::{config_keys, ConfigManager};
use extra_duty_roster::db::{get_default_db_path, open_sqlite_connection};
use extra_duty_roster::domain::officer::Officer;
use extra_duty_roster::domain::roster::OrdinaryRoster;
use extra_duty_roster::domain::schedule::MonthKey;
use extra_duty_roster::domain::types::{Operation, Team};
use extra_duty_roster::repository::{
    ActionLogRepository, OfficerRepository, OrdinaryRosterRepository, ScheduleRepository,
};

const OPERATOR: &str = "seed_demo_db";

const TEAM_A_MEMBERS: [&str; 4] = ["SGT MUNIZ", "SD SILVA", "SD COSTA", "SD BARROS"];
const TEAM_B_MEMBERS: [&str; 4] = ["SGT OLIMAR", "SD PEREIRA", "SD RAMOS", "SD NUNES"];
const TEAM_C_MEMBERS: [&str; 4] = ["SGT DUARTE", "SD FONTES", "SD MORAES", "SD VIEIRA"];
const ADMIN_MEMBERS: [&str; 2] = ["TEN SOUZA", "SD CARDOSO"];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

    let schedule_repo = Arc::new(ScheduleRepository::from_connection(conn.clone())?);
    let officer_repo = Arc::new(OfficerRepository::from_connection(conn.clone())?);
    let roster_repo = Arc::new(OrdinaryRosterRepository::from_connection(conn.clone())?);
    let action_log_repo = Arc::new(ActionLogRepository::from_connection(conn.clone())?);
    let config_manager = Arc::new(ConfigManager::from_connection(conn.clone())?);

    let today = Local::now().date_naive();
    let month = MonthKey::new(today.year(), today.month());

    // Make the cap key visible in config_kv (same value as the built-in default).
    config_manager.set_config(config_keys::MONTHLY_ASSIGNMENT_CAP, "12")?;

    seed_officers(&officer_repo)?;
    seed_ordinary_roster(&roster_repo, month)?;

    let roster_api = RosterApi::new(
        schedule_repo,
        officer_repo,
        action_log_repo,
        config_manager,
        None,
    );
    seed_schedules(&roster_api, month)?;

    print_quick_counts(conn)?;

    eprintln!("Seeded demo month {} into {}", month, db_path);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn seed_officers(officer_repo: &OfficerRepository) -> Result<(), Box<dyn Error>> {
    let mut order = 1;
    for (team, members) in [
        (Some(Team::TeamA), TEAM_A_MEMBERS.as_slice()),
        (Some(Team::TeamB), TEAM_B_MEMBERS.as_slice()),
        (Some(Team::TeamC), TEAM_C_MEMBERS.as_slice()),
        (None, ADMIN_MEMBERS.as_slice()),
    ] {
        for name in members {
            officer_repo.upsert(&Officer::new(*name, team, order))?;
            order += 1;
        }
    }
    Ok(())
}

fn seed_ordinary_roster(
    roster_repo: &OrdinaryRosterRepository,
    month: MonthKey,
) -> Result<(), Box<dyn Error>> {
    let cycle = [Team::TeamA, Team::TeamB, Team::TeamC];

    let mut roster = OrdinaryRoster::new(month);
    for day in 1..=month.days() {
        roster.set_duty(day, cycle[((day - 1) % 3) as usize]);
    }
    roster.set_members(Team::TeamA, TEAM_A_MEMBERS.iter().map(|s| s.to_string()).collect());
    roster.set_members(Team::TeamB, TEAM_B_MEMBERS.iter().map(|s| s.to_string()).collect());
    roster.set_members(Team::TeamC, TEAM_C_MEMBERS.iter().map(|s| s.to_string()).collect());

    roster_repo.upsert_roster(&roster)?;
    Ok(())
}

fn seed_schedules(roster_api: &RosterApi, month: MonthKey) -> Result<(), Box<dyn Error>> {
    let pool: Vec<&str> = TEAM_A_MEMBERS
        .iter()
        .chain(TEAM_B_MEMBERS.iter())
        .chain(TEAM_C_MEMBERS.iter())
        .copied()
        .collect();

    // PMF: first 10 days fully staffed (3 slots/day).
    for day in 1..=10u32.min(month.days()) {
        for slot in 0..Operation::Pmf.slot_count() {
            let officer = pool[((day as usize - 1) * 3 + slot) % pool.len()];
            roster_api.try_assign(
                Operation::Pmf,
                month.year,
                month.month,
                day,
                slot,
                Some(officer.to_string()),
                OPERATOR,
            )?;
        }
    }

    // TRANSITO: first 8 days fully staffed (2 slots/day), offset into the pool.
    for day in 1..=8u32.min(month.days()) {
        for slot in 0..Operation::Transito.slot_count() {
            let officer = pool[((day as usize - 1) * 2 + slot + 6) % pool.len()];
            roster_api.try_assign(
                Operation::Transito,
                month.year,
                month.month,
                day,
                slot,
                Some(officer.to_string()),
                OPERATOR,
            )?;
        }
    }

    // One deliberate cross-operation duplicate on day 5 (reported, not gated).
    roster_api.try_assign(
        Operation::Pmf,
        month.year,
        month.month,
        5,
        0,
        Some("SD PEREIRA".to_string()),
        OPERATOR,
    )?;
    roster_api.try_assign(
        Operation::Transito,
        month.year,
        month.month,
        5,
        0,
        Some("SD PEREIRA".to_string()),
        OPERATOR,
    )?;

    Ok(())
}

fn print_quick_counts(conn: Arc<Mutex<Connection>>) -> Result<(), Box<dyn Error>> {
    let conn = conn.lock().unwrap();
    let tables = [
        "officer",
        "ordinary_roster",
        "extra_schedule",
        "action_log",
        "config_kv",
    ];

    eprintln!("Row counts:");
    for t in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", t);
        let c: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        eprintln!("  {:<18} {}", t, c);
    }
    Ok(())
}
