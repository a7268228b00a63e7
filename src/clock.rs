//! Wall-clock ticker driving the `time` event.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use tauri::async_runtime::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::ipc::{EventSink, Outbound};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);
pub const TIMESTAMP_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Emit the local time on `sink` every `period` until the runtime shuts down.
/// Late ticks are skipped rather than replayed.
pub fn spawn_ticker<S: EventSink>(sink: S, period: Duration) -> JoinHandle<()> {
    tauri::async_runtime::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(target: "todo_desk", event = "clock_started", period_ms = period.as_millis() as u64);
        loop {
            interval.tick().await;
            if let Err(err) = sink.deliver(&Outbound::Time(now_timestamp())) {
                err.log_with_event("time_emit_failed");
            }
        }
    })
}
