//! The input side of a panel: decoding input reports into a bit per switch
//! and turning changed bits into events.
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_channel::{Receiver, RecvError, Sender, TryRecvError};
use log::{debug, error, warn};

use crate::error::TransportError;
use crate::{PanelEvent, PanelId, SwitchEvent, SwitchId};

/// Size of an input report. Every panel packs its switches into 3 bytes.
pub const REPORT_LEN: usize = 3;

/// The state of every switch of a panel, bit `i` for switch `i`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwitchMask(pub u32);

impl SwitchMask {
    /// Assembles a mask from a little endian report.
    pub fn from_report(report: &[u8]) -> Self {
        SwitchMask(
            report
                .iter()
                .take(4)
                .enumerate()
                .fold(0, |mask, (i, &b)| mask | (b as u32) << (8 * i)),
        )
    }

    pub fn is_set(self, id: SwitchId) -> bool {
        self.state(id) == 1
    }

    /// The state of `id` as 0 or 1.
    pub fn state(self, id: SwitchId) -> u32 {
        if id.0 >= 32 {
            return 0;
        }
        (self.0 >> id.0) & 1
    }

    /// Every bit that differs in `new`, lowest first, with its new state.
    pub fn changes(self, new: SwitchMask) -> impl Iterator<Item = (SwitchId, bool)> {
        let changed = self.0 ^ new.0;
        (0..32u8)
            .filter(move |&bit| (changed >> bit) & 1 == 1)
            .map(move |bit| (SwitchId(bit), new.is_set(SwitchId(bit))))
    }
}

/// What the reader publishes for the rest of the panel.
#[derive(Default)]
pub struct InputState {
    mask: AtomicU32,
    failure: Mutex<Option<TransportError>>,
}

impl InputState {
    /// The mask of the last report read.
    pub fn mask(&self) -> SwitchMask {
        SwitchMask(self.mask.load(Ordering::Acquire))
    }

    /// Why the reader stopped, if it failed.
    pub fn failure(&self) -> Option<TransportError> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_failure(&self, err: TransportError) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
    }
}

/// Reads reports through `read` until it fails, emitting one event per
/// changed bit.
///
/// Both edges are diffed; a release is only dropped when `suppress_release`
/// says so for that switch. Delivery never blocks: when the channel is full
/// the oldest event is discarded. A cancelled read ends the loop quietly,
/// any other failure is recorded in `input` and sent as a final
/// [`PanelEvent::Disconnected`].
pub fn run_reader(
    panel: PanelId,
    input: &InputState,
    events: &Sender<PanelEvent>,
    suppress_release: impl Fn(SwitchId) -> bool,
    mut read: impl FnMut(&mut [u8]) -> Result<usize, TransportError>,
) {
    debug!("{} panel reader started", panel);
    let mut last = SwitchMask::default();
    let mut report = [0u8; REPORT_LEN];
    loop {
        let n = match read(&mut report) {
            Ok(n) => n,
            Err(TransportError::Cancelled) => break,
            Err(err) => {
                error!("{} panel input failed: {}", panel, err);
                input.set_failure(err.clone());
                deliver(events, PanelEvent::Disconnected { panel, error: err });
                break;
            }
        };
        if n < REPORT_LEN {
            warn!("{} panel sent a {} byte input report, ignoring", panel, n);
            continue;
        }

        let mask = SwitchMask::from_report(&report);
        input.mask.store(mask.0, Ordering::Release);
        for (switch, on) in last.changes(mask) {
            if !on && suppress_release(switch) {
                continue;
            }
            deliver(events, PanelEvent::Switch(SwitchEvent { panel, switch, on }));
        }
        last = mask;
    }
    debug!("{} panel reader stopped", panel);
}

fn deliver(events: &Sender<PanelEvent>, event: PanelEvent) {
    match events.force_send(event) {
        Ok(Some(dropped)) => debug!("event queue full, dropped {:?}", dropped),
        Ok(None) => {}
        Err(_) => debug!("event queue closed"),
    }
}

/// Switch events of one panel.
///
/// Clones share one queue: every event is received by exactly one of them.
/// The stream ends (`None`) after the panel is closed or after a
/// [`PanelEvent::Disconnected`] has been received.
#[derive(Clone, Debug)]
pub struct SwitchStream {
    panel: PanelId,
    rx: Receiver<PanelEvent>,
}

impl SwitchStream {
    pub(crate) fn new(panel: PanelId, rx: Receiver<PanelEvent>) -> Self {
        SwitchStream { panel, rx }
    }

    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub async fn recv(&self) -> Option<PanelEvent> {
        self.rx.recv().await.ok()
    }

    pub fn recv_blocking(&self) -> Option<PanelEvent> {
        match self.rx.recv_blocking() {
            Ok(event) => Some(event),
            Err(RecvError) => None,
        }
    }

    /// Returns immediately; `None` if nothing is queued.
    pub fn try_recv(&self) -> Option<PanelEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    /// Whether the stream has ended and nothing is left to receive.
    pub fn is_finished(&self) -> bool {
        self.rx.is_closed() && self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
