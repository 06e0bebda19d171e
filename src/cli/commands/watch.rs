//! Watch command - keep the model alive and print what changes.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;

use crate::bookmarks::{BookmarksModel, ModelEvent, SharedModel, run_polling};
use crate::config::AppConfig;

use super::open_settings;

fn describe(model: &BookmarksModel, event: &ModelEvent) -> String {
    let path_of = |row: usize| {
        model
            .get(row)
            .map(|entry| entry.path.clone())
            .unwrap_or_default()
    };

    match event {
        ModelEvent::Reset => format!("reset, {} rows", model.row_count()),
        ModelEvent::RowsInserted { first, last } => {
            format!("inserted rows {first}..={last} ({})", path_of(*first))
        }
        ModelEvent::RowsRemoved { first, last } => format!("removed rows {first}..={last}"),
        ModelEvent::RowMoved { from, to } => format!("moved row {from} to {to}"),
        ModelEvent::DataChanged { row, roles } => {
            let names: Vec<_> = roles.iter().map(|role| role.name()).collect();
            format!("row {row} changed {} ({})", names.join(","), path_of(*row))
        }
        ModelEvent::TemporaryAdded { row } => format!("temporary row {row} ({})", path_of(*row)),
    }
}

pub async fn run_watch(config: &AppConfig) -> anyhow::Result<()> {
    let settings = open_settings(config);
    let model: SharedModel = Arc::new(Mutex::new(BookmarksModel::from_config(config, &settings)?));
    let mut events = model.lock().subscribe();

    println!(
        "Watching {} rows, polling every {:?}. Press Ctrl-C to stop.",
        model.lock().row_count(),
        config.poll_interval()
    );

    let poll_model = model.clone();
    let poll_settings = settings.clone();
    let poller = tokio::spawn(run_polling(model.clone(), move |_report| {
        // Settings can be edited by other processes; pick up the group order.
        BookmarksModel::edit(&poll_model, |model| model.apply_settings(&poll_settings));
    }));

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => println!("{}", describe(&model.lock(), &event)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[watch] skipped {skipped} model events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping.");
                break;
            }
        }
    }

    poller.abort();
    Ok(())
}
