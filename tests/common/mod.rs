//! A scripted stand-in for the USB transport that records what the panels
//! acquire and release and captures every output report.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use fpanels::config::PanelConfig;
use fpanels::transport::{Transport, UsbDevice};
use fpanels::{PanelEvent, SwitchStream, TransportError};

pub const WAIT: Duration = Duration::from_secs(5);
pub const ENDPOINT: u8 = 0x81;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Open,
    Claim,
    Resolve,
    Release(u8),
    CloseDevice,
    CloseTransport,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlWrite {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub payload: Vec<u8>,
}

enum ReadStep {
    Report(Vec<u8>),
    Fail(TransportError),
}

#[derive(Default)]
struct Inputs {
    steps: VecDeque<ReadStep>,
    cancelled: bool,
}

#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    inputs: Mutex<Inputs>,
    input_ready: Condvar,
    writes: Mutex<Vec<ControlWrite>>,
    written: Condvar,
    failing_writes: AtomicUsize,
    cancelled: AtomicBool,
}

impl Recorder {
    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_report(&self, report: &[u8]) {
        self.inputs
            .lock()
            .unwrap()
            .steps
            .push_back(ReadStep::Report(report.to_vec()));
        self.input_ready.notify_all();
    }

    pub fn fail_read(&self, err: TransportError) {
        self.inputs.lock().unwrap().steps.push_back(ReadStep::Fail(err));
        self.input_ready.notify_all();
    }

    pub fn fail_next_writes(&self, n: usize) {
        self.failing_writes.store(n, Ordering::SeqCst);
    }

    pub fn writes(&self) -> Vec<ControlWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Waits for an output report whose payload satisfies `pred`.
    pub fn wait_for_write(&self, pred: impl Fn(&[u8]) -> bool) -> Option<Vec<u8>> {
        let deadline = Instant::now() + WAIT;
        let mut writes = self.writes.lock().unwrap();
        loop {
            if let Some(w) = writes.iter().rev().find(|w| pred(&w.payload)) {
                return Some(w.payload.clone());
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            writes = self.written.wait_timeout(writes, deadline - now).unwrap().0;
        }
    }
}

#[derive(Clone, Default)]
pub struct Script {
    pub fail_open: Option<TransportError>,
    pub fail_claim: Option<TransportError>,
    pub fail_resolve: Option<TransportError>,
}

pub struct FakeTransport {
    recorder: Arc<Recorder>,
    script: Script,
}

impl FakeTransport {
    pub fn new() -> (Self, Arc<Recorder>) {
        Self::scripted(Script::default())
    }

    pub fn scripted(script: Script) -> (Self, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (
            FakeTransport {
                recorder: recorder.clone(),
                script,
            },
            recorder,
        )
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        self.recorder.log(Call::CloseTransport);
    }
}

impl Transport for FakeTransport {
    type Device = FakeDevice;

    fn open(&mut self, _vendor_id: u16, _product_id: u16) -> Result<FakeDevice, TransportError> {
        self.recorder.log(Call::Open);
        if let Some(err) = self.script.fail_open.clone() {
            return Err(err);
        }
        Ok(FakeDevice {
            recorder: self.recorder.clone(),
            script: self.script.clone(),
        })
    }
}

pub struct FakeDevice {
    recorder: Arc<Recorder>,
    script: Script,
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.recorder.log(Call::CloseDevice);
    }
}

impl UsbDevice for FakeDevice {
    fn claim_default_interface(&mut self) -> Result<u8, TransportError> {
        self.recorder.log(Call::Claim);
        match self.script.fail_claim.clone() {
            Some(err) => Err(err),
            None => Ok(0),
        }
    }

    fn release_interface(&mut self, interface: u8) -> Result<(), TransportError> {
        self.recorder.log(Call::Release(interface));
        Ok(())
    }

    fn resolve_in_endpoint(&self, _interface: u8, _number: u8) -> Result<u8, TransportError> {
        self.recorder.log(Call::Resolve);
        match self.script.fail_resolve.clone() {
            Some(err) => Err(err),
            None => Ok(ENDPOINT),
        }
    }

    fn read_interrupt(&self, endpoint: u8, buf: &mut [u8]) -> Result<usize, TransportError> {
        assert_eq!(endpoint, ENDPOINT);
        let mut inputs = self.recorder.inputs.lock().unwrap();
        loop {
            if inputs.cancelled {
                return Err(TransportError::Cancelled);
            }
            match inputs.steps.pop_front() {
                Some(ReadStep::Report(report)) => {
                    let n = report.len().min(buf.len());
                    buf[..n].copy_from_slice(&report[..n]);
                    return Ok(n);
                }
                Some(ReadStep::Fail(err)) => return Err(err),
                None => inputs = self.recorder.input_ready.wait(inputs).unwrap(),
            }
        }
    }

    fn write_control(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        payload: &[u8],
    ) -> Result<usize, TransportError> {
        let failing = &self.recorder.failing_writes;
        if failing
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(TransportError::Usb(rusb::Error::Pipe));
        }
        self.recorder.writes.lock().unwrap().push(ControlWrite {
            request_type,
            request,
            value,
            index,
            payload: payload.to_vec(),
        });
        self.recorder.written.notify_all();
        Ok(payload.len())
    }

    fn cancel(&self) {
        self.recorder.cancelled.store(true, Ordering::SeqCst);
        self.recorder.inputs.lock().unwrap().cancelled = true;
        self.recorder.input_ready.notify_all();
    }
}

pub fn config() -> PanelConfig {
    PanelConfig {
        refresh_interval_ms: 0,
        ..PanelConfig::default()
    }
}

/// Waits for the next event of `stream`.
pub fn next_event(stream: &SwitchStream) -> Option<PanelEvent> {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if let Some(event) = stream.try_recv() {
            return Some(event);
        }
        if stream.is_finished() {
            return None;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    None
}

/// Collects events until none arrives for a short while.
pub fn drain(stream: &SwitchStream) -> Vec<PanelEvent> {
    let mut events = Vec::new();
    let mut idle = Instant::now();
    while idle.elapsed() < Duration::from_millis(200) {
        match stream.try_recv() {
            Some(event) => {
                events.push(event);
                idle = Instant::now();
            }
            None => std::thread::sleep(Duration::from_millis(1)),
        }
    }
    events
}

/// Polls `cond` until it holds or [`WAIT`] has passed.
pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}
