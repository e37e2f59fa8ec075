use crate::entry::{Level, LogEntry};

/// Whether an entry at `entry` level passes a logger configured at `configured`.
///
/// `Level::None` as an entry level is invalid and is rejected by the caller
/// before filtering.
pub fn should_emit(configured: Level, entry: Level) -> bool {
    match configured {
        Level::None => false,
        Level::Error => entry == Level::Error,
        Level::Info => entry != Level::Debug,
        Level::Debug => true,
    }
}

/// Instance-level values used for fields an entry leaves empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub service_name: String,
    pub event_action: String,
    pub service_action: String,
}

impl Defaults {
    pub fn fill(&self, entry: &mut LogEntry) {
        fill_empty(&mut entry.service_name, &self.service_name);
        fill_empty(&mut entry.event_action, &self.event_action);
        fill_empty(&mut entry.service_action, &self.service_action);
    }
}

fn fill_empty(field: &mut String, default: &str) {
    if field.is_empty() {
        *field = default.to_string();
    }
}
