use tracing::{debug, error, info, info_span, warn, Span};

/// Diagnostic events raised by the decoder and its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    Started,
    /// A sync pair was found; `discarded` bytes were dropped while searching.
    SyncAcquired { discarded: u64 },
    /// The byte after a frame was not a sync marker.
    SyncLost,
    ReadFailed { reason: String },
    SetupFailed { reason: String },
    Stopped,
}

/// Receives decoder diagnostics. Passed to the decoder at construction so
/// each sensor reports under its own name.
pub trait Telemetry: Send + Sync {
    fn record(&self, event: DecoderEvent);
}

/// Forwards events to `tracing`, inside a `razor{sensor=...}` span.
pub struct TracingTelemetry {
    span: Span,
}

impl TracingTelemetry {
    pub fn new(sensor_name: &str) -> Self {
        TracingTelemetry {
            span: info_span!("razor", sensor = %sensor_name),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Telemetry for TracingTelemetry {
    fn record(&self, event: DecoderEvent) {
        let _entered = self.span.enter();
        match event {
            DecoderEvent::Started => info!("Started decoder thread"),
            DecoderEvent::SyncAcquired { discarded } => {
                debug!(discarded, "Sync acquired")
            }
            DecoderEvent::SyncLost => debug!("Sync lost, searching for 0xAA 0xBB"),
            DecoderEvent::ReadFailed { reason } => error!("Read failed: {}", reason),
            DecoderEvent::SetupFailed { reason } => warn!("Setup failed: {}", reason),
            DecoderEvent::Stopped => info!("Shutting down"),
        }
    }
}

pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn record(&self, _event: DecoderEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_telemetry_without_subscriber() {
        let telemetry = TracingTelemetry::new("RAZOR");
        telemetry.record(DecoderEvent::Started);
        telemetry.record(DecoderEvent::SyncAcquired { discarded: 4 });
        telemetry.record(DecoderEvent::Stopped);
    }
}
