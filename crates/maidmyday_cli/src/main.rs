//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `maidmyday_core` linkage.
//! - Print a seed-data dashboard from an in-memory database.

use maidmyday_core::db::open_db_in_memory;
use maidmyday_core::model::now_epoch_ms;
use maidmyday_core::{AppStores, SqliteKvRepository, StoreConfig};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("maidmyday_core ping={}", maidmyday_core::ping());
    println!("maidmyday_core version={}", maidmyday_core::core_version());

    match print_dashboard() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dashboard failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_dashboard() -> Result<(), Box<dyn Error>> {
    let conn = open_db_in_memory()?;
    let repo = SqliteKvRepository::try_new(&conn)?;
    let mut stores = AppStores::open(repo, StoreConfig::default());
    stores.auth.login("john@example.com", maidmyday_core::seed::MOCK_PASSWORD)?;

    let summary = stores.dashboard(now_epoch_ms());
    println!(
        "dashboard user={} pending_tasks={} unread_notifications={} unread_messages={}",
        summary.greeting_name.as_deref().unwrap_or("-"),
        summary.pending_task_count,
        summary.unread_notification_count,
        summary.unread_message_count
    );
    for task in &summary.upcoming_tasks {
        println!(
            "  task id={} priority={} assignee={} title={}",
            task.id,
            task.priority.as_str(),
            task.assigned_to,
            task.title
        );
    }
    if let Some(schedule) = &summary.current_schedule {
        println!(
            "  schedule id={} progress={}% title={}",
            schedule.id,
            schedule.progress_percent(),
            schedule.title
        );
    }
    Ok(())
}
