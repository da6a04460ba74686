use chrono::{Local, NaiveDate};
use clap::Subcommand;

use super::open_session;

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Print reminders already delivered on a day (default today)
    Show {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Forget all delivered reminders so they can fire again
    Clear,
}

pub fn run(action: LedgerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    match action {
        LedgerAction::Show { date } => {
            let day = date.unwrap_or_else(|| Local::now().date_naive());
            let fired: Vec<_> = session.ledger().fired_on(day).collect();
            println!("{}", serde_json::to_string_pretty(&fired)?);
        }
        LedgerAction::Clear => {
            session.clear_ledger()?;
            println!("ledger cleared");
        }
    }
    Ok(())
}
