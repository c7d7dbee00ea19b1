//! Building a model leaves warning output to the caller.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tome::{
    Documenter,
    declaration::{Declaration, SourceFragment, StaticSession},
    model::EntityKind,
};

/// Keeps the level and message of every record logged in this process.
struct Recorder(Mutex<Vec<(Level, String)>>);

impl Log for Recorder {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut records) = self.0.lock() {
            records.push((record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder(Mutex::new(Vec::new()));

#[test]
fn test_build_warnings_are_returned_not_logged_as_warnings() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let session = StaticSession::new(vec![SourceFragment::new("a.kt", "p").with_declaration(
        Declaration::new("C", EntityKind::Class).with_doc("See [Missing]."),
    )]);
    let output = Documenter::default().build(&session);
    assert_eq!(output.diagnostics().len(), 1);

    let records = RECORDER.0.lock().unwrap();
    assert!(
        records.iter().all(|(level, _)| *level > Level::Warn),
        "{records:?}"
    );
    assert!(
        records
            .iter()
            .any(|(level, message)| *level == Level::Debug && message.contains("[Missing]"))
    );
}
