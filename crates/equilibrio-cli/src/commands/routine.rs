use chrono::Local;
use clap::Subcommand;
use equilibrio_core::{BlockKind, ClockTime, Database, RoutineStore, TimeBlock};
use serde_json::json;

use super::open_session;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List available routines (current one marked with *)
    List,
    /// Show a routine as JSON (default: current)
    Show { id: Option<String> },
    /// Make a routine the current one
    Use { id: String },
    /// Shift every block of the current routine by N minutes
    Shift {
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
    },
    /// Planned minutes per kind and progress through the current routine
    Summary,
    /// Create an empty routine
    Create {
        id: String,
        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Add a block to a routine (default: current)
    AddBlock {
        #[arg(long)]
        routine: Option<String>,
        /// Start time (HH:MM)
        #[arg(long)]
        time: ClockTime,
        #[arg(long)]
        activity: String,
        /// work, sacred, personal or break
        #[arg(long, default_value = "work")]
        kind: BlockKind,
        /// Do not play the alarm at block start
        #[arg(long)]
        no_alarm: bool,
        /// Lock the screen at block start (sacred blocks only)
        #[arg(long)]
        lock: bool,
        #[arg(long)]
        location: Option<String>,
        /// Display colour (e.g. "#ff8800")
        #[arg(long)]
        color: Option<String>,
        /// Checklist item; repeat for several
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// Check or uncheck a block's subtask (default: current routine)
    ToggleSubtask {
        block_id: String,
        subtask_id: String,
        #[arg(long)]
        routine: Option<String>,
    },
    /// Remove a block from a routine (default: current)
    RemoveBlock {
        block_id: String,
        #[arg(long)]
        routine: Option<String>,
    },
}

fn open_store() -> Result<(Database, RoutineStore), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = RoutineStore::load(&db);
    Ok((db, store))
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RoutineAction::List => {
            let (_, store) = open_store()?;
            for routine in store.routines() {
                let marker = if routine.id == store.current_id() { "*" } else { " " };
                println!(
                    "{marker} {:<20} {} ({} blocks)",
                    routine.id,
                    routine.name,
                    routine.blocks.len()
                );
            }
        }
        RoutineAction::Show { id } => {
            let (_, store) = open_store()?;
            let id = id.unwrap_or_else(|| store.current_id().to_string());
            let routine = store
                .get(&id)
                .ok_or_else(|| format!("unknown routine: {id}"))?;
            println!("{}", serde_json::to_string_pretty(routine)?);
        }
        RoutineAction::Use { id } => {
            let (db, mut store) = open_store()?;
            store.select(&id)?;
            store.save(&db)?;
            println!("current routine: {id}");
        }
        RoutineAction::Shift { minutes } => {
            // Through the session so a full store surfaces as a warning toast.
            let mut session = open_session()?;
            if !session.shift_schedule(minutes) {
                return Err("no current routine to shift".into());
            }
            if let Some(routine) = session.store().current() {
                println!("{}", serde_json::to_string_pretty(routine)?);
            }
        }
        RoutineAction::Summary => {
            let (_, store) = open_store()?;
            let routine = store
                .current()
                .ok_or_else(|| format!("unknown routine: {}", store.current_id()))?;
            let now = ClockTime::of(Local::now().naive_local());
            let report = json!({
                "routine": routine.id,
                "summary": routine.summary(),
                "progress": routine.progress(now),
                "current_block": routine.current_block(now),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        RoutineAction::Create {
            id,
            name,
            description,
        } => {
            let (db, mut store) = open_store()?;
            let name = name.unwrap_or_else(|| id.clone());
            store.create(&id, &name, &description)?;
            store.save(&db)?;
            println!("created routine: {id}");
        }
        RoutineAction::AddBlock {
            routine,
            time,
            activity,
            kind,
            no_alarm,
            lock,
            location,
            color,
            subtasks,
        } => {
            if lock && kind != BlockKind::Sacred {
                return Err("--lock is only allowed on sacred blocks".into());
            }
            let (db, mut store) = open_store()?;
            let routine_id = routine.unwrap_or_else(|| store.current_id().to_string());
            let mut block = TimeBlock::new(time, activity, kind);
            if lock {
                block = block.with_lock();
            }
            if no_alarm {
                block = block.without_alarm();
            }
            block.location = location;
            block.custom_color = color;
            for text in subtasks {
                block.add_subtask(text);
            }
            let block_id = block.id.clone();
            store.add_block(&routine_id, block)?;
            store.save(&db)?;
            println!("{block_id}");
        }
        RoutineAction::ToggleSubtask {
            block_id,
            subtask_id,
            routine,
        } => {
            let (db, mut store) = open_store()?;
            let routine_id = routine.unwrap_or_else(|| store.current_id().to_string());
            let done = store.toggle_subtask(&routine_id, &block_id, &subtask_id)?;
            store.save(&db)?;
            println!("{subtask_id}: {}", if done { "done" } else { "open" });
        }
        RoutineAction::RemoveBlock { block_id, routine } => {
            let (db, mut store) = open_store()?;
            let routine_id = routine.unwrap_or_else(|| store.current_id().to_string());
            let removed = store.remove_block(&routine_id, &block_id)?;
            store.save(&db)?;
            println!("removed {} ({} {})", removed.id, removed.time, removed.activity);
        }
    }
    Ok(())
}
