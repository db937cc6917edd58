use hwev_wire::DEFAULT_BUFFER_CAPACITY;

/// Idle cursors a pool keeps around by default.
pub const DEFAULT_MAX_IDLE_CURSORS: usize = 64;

/// Configuration for an [`EventDecoder`](crate::EventDecoder).
///
/// ```text
/// ┌──────────────────┬──────────┬──────────────────────────────────────┐
/// │ Field            │ Default  │ Purpose                              │
/// ├──────────────────┼──────────┼──────────────────────────────────────┤
/// │ timestamp_faults │ Deferred │ When a bad `time` aborts the decode  │
/// │ payload_faults   │ Ignore   │ Whether a bad payload fails the      │
/// │                  │          │ envelope or just drops the payload   │
/// │ max_idle_cursors │ 64       │ Idle cursors retained by the pool    │
/// │ buffer_capacity  │ 1024     │ Read-buffer bytes per new cursor     │
/// └──────────────────┴──────────┴──────────────────────────────────────┘
/// ```
///
/// The defaults reproduce the long-standing lenient behaviour.
/// [`strict`](Self::strict) switches both fault policies to fail fast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    pub timestamp_faults: TimestampFaults,
    pub payload_faults: PayloadFaults,
    /// Cursors beyond this count are dropped on release instead of
    /// being kept for reuse.
    pub max_idle_cursors: usize,
    /// Size of the read buffer given to each newly created cursor.
    pub buffer_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            timestamp_faults: TimestampFaults::default(),
            payload_faults: PayloadFaults::default(),
            max_idle_cursors: DEFAULT_MAX_IDLE_CURSORS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl DecoderConfig {
    /// Fail on the first bad timestamp and on any payload fault.
    pub fn strict() -> Self {
        Self {
            timestamp_faults: TimestampFaults::Immediate,
            payload_faults: PayloadFaults::Propagate,
            ..Self::default()
        }
    }
}

/// When a `time` value that fails to parse is reported.
///
/// ```text
/// ┌───────────┬────────────────────────────────────────────────────────┐
/// │ Mode      │ Behaviour                                              │
/// ├───────────┼────────────────────────────────────────────────────────┤
/// │ Deferred  │ Recorded, raised at the next checkpoint: after the     │
/// │           │ next key is read, or when the object closes. It still  │
/// │           │ wins over any fault that key read produces.            │
/// │ Immediate │ Raised as soon as the parse fails.                     │
/// └───────────┴────────────────────────────────────────────────────────┘
/// ```
///
/// Either way the decode fails with the timestamp fault; `Deferred`
/// only costs the time spent reading one more key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimestampFaults {
    #[default]
    Deferred,
    Immediate,
}

/// What an envelope decode does when its nested payload cannot be
/// decoded (bad quoting or bad base64).
///
/// Tokenizer faults inside the payload object always fail the
/// envelope; only encoding faults are subject to this policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayloadFaults {
    /// Drop the payload and decode the envelope without one.
    #[default]
    Ignore,
    /// Fail the envelope decode with the payload fault.
    Propagate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient() {
        let config = DecoderConfig::default();
        assert_eq!(config.timestamp_faults, TimestampFaults::Deferred);
        assert_eq!(config.payload_faults, PayloadFaults::Ignore);
        assert_eq!(config.max_idle_cursors, DEFAULT_MAX_IDLE_CURSORS);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
    }

    #[test]
    fn strict_keeps_pool_settings() {
        let config = DecoderConfig::strict();
        assert_eq!(config.timestamp_faults, TimestampFaults::Immediate);
        assert_eq!(config.payload_faults, PayloadFaults::Propagate);
        assert_eq!(config.max_idle_cursors, DEFAULT_MAX_IDLE_CURSORS);
    }
}
