pub mod check;
pub mod ledger;
pub mod lock;
pub mod routine;
pub mod settings;
pub mod watch;

use equilibrio_core::{Database, ReminderSession, Settings};

use crate::console::ConsoleSink;

/// Open the local store and settings and restore a session around them.
///
/// The session follows the settings file, so `settings set` reaches a
/// running `watch`.
pub fn open_session() -> Result<ReminderSession<ConsoleSink>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let settings = Settings::load_or_default();
    let session = ReminderSession::new(db, settings, ConsoleSink);
    Ok(session.with_settings_file(Settings::path()?))
}
