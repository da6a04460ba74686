use chrono::{Local, NaiveDate};
use clap::Args;
use equilibrio_core::ClockTime;

use super::open_session;

#[derive(Args)]
pub struct CheckArgs {
    /// Evaluate as if it were this time of day (HH:MM)
    #[arg(long)]
    pub at: Option<ClockTime>,
    /// Evaluate as if it were this date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let local = Local::now().naive_local();
    let date = args.date.unwrap_or(local.date());
    let now = match args.at {
        Some(at) => date
            .and_hms_opt(at.hour() as u32, at.minute() as u32, 0)
            .ok_or("invalid time of day")?,
        None => date.and_time(local.time()),
    };

    let reminders = session.tick(now);
    println!("{}", serde_json::to_string_pretty(&reminders)?);
    Ok(())
}
