use time::OffsetDateTime;

use crate::payload::Payload;

/// A decoded hardware event: the identity/type/time header plus an
/// optional versioned payload.
///
/// Wire shape:
///
/// ```text
/// ┌───────────┬──────────────┬────────────────────────────────────────┐
/// │ Key       │ JSON type    │ Field                                  │
/// ├───────────┼──────────────┼────────────────────────────────────────┤
/// │ "id"      │ string       │ id                                     │
/// │ "type"    │ string       │ kind                                   │
/// │ "time"    │ RFC 3339 str │ time                                   │
/// │ "data"    │ object       │ data  (see [`Payload`])                │
/// │ "version" │ string       │ not stored, read and discarded         │
/// │ other     │ any          │ ignored                                │
/// └───────────┴──────────────┴────────────────────────────────────────┘
/// ```
///
/// The decoder does not check `id` for emptiness; routing correctness
/// is up to whoever consumes the event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
    pub id: String,
    pub kind: String,
    /// `None` when the envelope had no `time` key.
    pub time: Option<OffsetDateTime>,
    /// `None` when the envelope had no `data` key.
    pub data: Option<Payload>,
}

impl Envelope {
    /// Attach a payload, replacing any previous one.
    pub fn set_data(&mut self, data: Payload) {
        self.data = Some(data);
    }

    /// Whether a payload is attached.
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}
