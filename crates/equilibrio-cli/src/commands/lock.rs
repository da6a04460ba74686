use clap::Subcommand;
use equilibrio_core::LockResolution;

use super::open_session;

#[derive(Subcommand)]
pub enum LockAction {
    /// Print the lock state as JSON
    Status,
    /// Running late: shift the schedule forward and unlock
    Late,
    /// Skip the block and unlock
    Skip,
}

pub fn run(action: LockAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    match action {
        LockAction::Status => {}
        LockAction::Late => session.resolve_lock(LockResolution::RunningLate),
        LockAction::Skip => session.resolve_lock(LockResolution::Skip),
    }
    println!("{}", serde_json::to_string_pretty(session.lock())?);
    Ok(())
}
