use std::io::Cursor;
use std::sync::{Arc, Mutex};

use r2_cache_upload::cli::{run_with_io, Cli};
use r2_cache_upload_core::error::RunError;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let msg = format!("{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_and_abort_events() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let dir = tempfile::tempdir().unwrap();
    let cli = Cli {
        dir: dir.path().to_path_buf(),
        ..Cli::default()
    };
    let mut input = Cursor::new(Vec::new());
    let mut out = Vec::new();

    let err = run_with_io(cli, &mut input, &mut out)
        .await
        .expect_err("empty input must abort");
    assert!(err.downcast_ref::<RunError>().is_some());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Error: Missing required credentials. Exiting..."));

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
    assert!(
        event_msgs.iter().any(|msg| msg.contains("Configuration incomplete")),
        "Expected the pipeline to log the configuration failure, got: {:?}",
        event_msgs
    );
}
