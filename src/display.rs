//! The output side of a panel: a fixed size buffer holding every digit and
//! LED byte, and the writer loop that ships it to the device whenever it
//! changes.
use std::ops::Range;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, warn};

use crate::error::{TransportError, ValidationError};
use crate::segment::OFF;
use crate::PanelId;

struct BufferState {
    bytes: Vec<u8>,
    dirty: bool,
    closed: bool,
    last_error: Option<TransportError>,
}

/// Display and LED state of one panel.
///
/// Every mutation happens under one lock and marks the buffer dirty; the
/// writer is woken on the condition variable, never by polling.
pub struct DisplayBuffer {
    panel: PanelId,
    /// Bytes `0..display_len` are segment digits, the rest are LED bits.
    display_len: usize,
    state: Mutex<BufferState>,
    changed: Condvar,
}

impl DisplayBuffer {
    /// The buffer starts dirty so the initial contents reach the device.
    pub fn new(panel: PanelId, initial: Vec<u8>, display_len: usize) -> Self {
        let display_len = display_len.min(initial.len());
        DisplayBuffer {
            panel,
            display_len,
            state: Mutex::new(BufferState {
                bytes: initial,
                dirty: true,
                closed: false,
                last_error: None,
            }),
            changed: Condvar::new(),
        }
    }

    fn len(&self) -> usize {
        self.lock().bytes.len()
    }

    pub fn set_region(&self, range: Range<usize>, bytes: &[u8]) -> Result<(), ValidationError> {
        if bytes.len() != range.len() {
            return Err(ValidationError::InvalidRegion {
                start: range.start,
                end: range.start + bytes.len(),
                len: self.len(),
            });
        }
        self.update_region(range, |region| region.copy_from_slice(bytes))
    }

    /// Runs `f` over `range` under the lock and marks the buffer dirty.
    pub fn update_region(
        &self,
        range: Range<usize>,
        f: impl FnOnce(&mut [u8]),
    ) -> Result<(), ValidationError> {
        let mut state = self.lock();
        let len = state.bytes.len();
        if range.start > range.end || range.end > len {
            return Err(ValidationError::InvalidRegion {
                start: range.start,
                end: range.end,
                len,
            });
        }
        f(&mut state.bytes[range]);
        self.mark_dirty(state);
        Ok(())
    }

    /// Runs `f` over the whole buffer under the lock and marks it dirty.
    pub fn update(&self, f: impl FnOnce(&mut [u8])) {
        let mut state = self.lock();
        f(&mut state.bytes);
        self.mark_dirty(state);
    }

    /// Writes the off code to every digit. LED bytes are not touched.
    pub fn turn_off(&self) {
        let mut state = self.lock();
        let end = self.display_len;
        state.bytes[..end].fill(OFF);
        self.mark_dirty(state);
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().bytes.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// The last output report failure, cleared by the next successful one.
    pub fn last_write_error(&self) -> Option<TransportError> {
        self.lock().last_error.clone()
    }

    /// Makes the writer loop return.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        drop(state);
        self.changed.notify_all();
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_dirty(&self, mut state: MutexGuard<'_, BufferState>) {
        let was_dirty = state.dirty;
        state.dirty = true;
        drop(state);
        if !was_dirty {
            self.changed.notify_all();
        }
    }

    /// Blocks until the buffer is dirty and returns a copy of it, clearing
    /// the flag in the same critical section. Mutations made while the copy
    /// is being sent set the flag again. Returns `None` once closed.
    fn wait_dirty(&self) -> Option<Vec<u8>> {
        let state = self.lock();
        let mut state = self
            .changed
            .wait_while(state, |s| !s.dirty && !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        if state.closed {
            return None;
        }
        state.dirty = false;
        Some(state.bytes.clone())
    }

    /// Sleeps for `interval` unless closed first. Returns false when closed.
    fn pause(&self, interval: Duration) -> bool {
        let state = self.lock();
        let (state, _) = self
            .changed
            .wait_timeout_while(state, interval, |s| !s.closed)
            .unwrap_or_else(PoisonError::into_inner);
        !state.closed
    }

    fn record(&self, result: Result<(), TransportError>) {
        self.lock().last_error = result.err();
    }
}

/// Sends the buffer through `send` every time it becomes dirty, at most
/// once per `interval`, until the buffer is closed.
///
/// A failed send is logged and remembered; the writer keeps going and the
/// next mutation triggers another attempt.
pub fn run_writer(
    buffer: &DisplayBuffer,
    interval: Duration,
    mut send: impl FnMut(&[u8]) -> Result<(), TransportError>,
) {
    debug!("{} panel writer started", buffer.panel);
    while let Some(frame) = buffer.wait_dirty() {
        let result = send(&frame);
        match &result {
            Ok(()) => debug!("{} panel output report {:02x?}", buffer.panel, frame),
            Err(err) => warn!("unable to write {} panel output report: {}", buffer.panel, err),
        }
        buffer.record(result);
        if !interval.is_zero() && !buffer.pause(interval) {
            break;
        }
    }
    debug!("{} panel writer stopped", buffer.panel);
}
