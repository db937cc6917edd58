/// Default size of the read buffer a fresh cursor allocates.
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Deepest array/object nesting the cursor will skip through.
pub const MAX_DEPTH: usize = 10_000;

/// The reusable half of a [`JsonCursor`](crate::JsonCursor).
///
/// Everything that costs an allocation lives here: the read buffer, the
/// string scratch area, the raw-span capture area and the nesting stack
/// used while skipping. A cursor borrows nothing from its source between
/// calls, so this state can be detached with
/// [`JsonCursor::into_state`](crate::JsonCursor::into_state), parked in a
/// pool, and attached to a different source later.
///
/// ```text
///   buf:     [ consumed .. head | unread .. tail | free .. len ]
///   scratch: last decoded string (key or value)
///   capture: raw bytes of the last captured value
///   nesting: open '{' / '[' while skipping
/// ```
///
/// [`reset`](Self::reset) drops all per-call state (positions, scratch,
/// capture, the poison marker) but keeps every allocation.
#[derive(Debug)]
pub struct CursorState {
    pub(crate) buf: Vec<u8>,
    pub(crate) head: usize,
    pub(crate) tail: usize,
    pub(crate) consumed: usize,
    pub(crate) scratch: Vec<u8>,
    pub(crate) capture: Vec<u8>,
    pub(crate) capture_from: Option<usize>,
    pub(crate) nesting: Vec<u8>,
    pub(crate) poisoned_at: Option<usize>,
}

impl CursorState {
    /// Create a state with the default read-buffer size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_CAPACITY)
    }

    /// Create a state whose read buffer holds `capacity` bytes.
    ///
    /// A zero capacity is bumped to one byte so the cursor can always
    /// make progress.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity.max(1)],
            head: 0,
            tail: 0,
            consumed: 0,
            scratch: Vec::new(),
            capture: Vec::new(),
            capture_from: None,
            nesting: Vec::new(),
            poisoned_at: None,
        }
    }

    /// A placeholder with no buffers at all; reads against it hit EOF.
    pub(crate) fn detached() -> Self {
        Self {
            buf: Vec::new(),
            head: 0,
            tail: 0,
            consumed: 0,
            scratch: Vec::new(),
            capture: Vec::new(),
            capture_from: None,
            nesting: Vec::new(),
            poisoned_at: None,
        }
    }

    /// Forget everything about the previous source.
    pub fn reset(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.consumed = 0;
        self.scratch.clear();
        self.capture.clear();
        self.capture_from = None;
        self.nesting.clear();
        self.poisoned_at = None;
    }

    /// Whether a read on this state has failed since the last reset.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned_at.is_some()
    }

    /// Size of the read buffer in bytes.
    pub fn buffer_capacity(&self) -> usize {
        self.buf.len()
    }

    /// Whether any per-call state is still attached.
    ///
    /// Used by the pool tests to prove a returned state is clean.
    pub fn is_clear(&self) -> bool {
        self.head == 0
            && self.tail == 0
            && self.consumed == 0
            && self.scratch.is_empty()
            && self.capture.is_empty()
            && self.capture_from.is_none()
            && self.nesting.is_empty()
            && self.poisoned_at.is_none()
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}
