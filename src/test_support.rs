// Fakes compartidos por los tests de viewmodels y servicios

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use crate::error::{ApiError, PositionError, TrackingError};
use crate::models::{
    CrossingSummary, EdgeSpan, PingAck, PingRequest, PositionReading, ProbedElement, SamplingOptions,
};
use crate::services::api_client::CrossingApi;
use crate::services::geolocation::{ErrorCallback, PositionSampler, ReadingCallback, WatchHandle};
use crate::utils::Clock;
use crate::viewmodels::contrast_viewmodel::{ContrastSurface, PassScheduler};

pub fn reading(latitude: f64, longitude: f64, accuracy_meters: f64, captured_at: DateTime<Utc>) -> PositionReading {
    PositionReading { latitude, longitude, accuracy_meters, captured_at }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

// ----------------------------------------------------------------------------
// API
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCrossingApi {
    pub pings: RefCell<Vec<PingRequest>>,
    pub fail_pings: Cell<bool>,
    pub ack: RefCell<PingAck>,
    /// Respuestas programadas para `fetch_unread_count`, en orden
    pub unread_answers: RefCell<VecDeque<Result<u32, ApiError>>>,
    pub unread_calls: Cell<usize>,
    pub crossings: RefCell<Vec<CrossingSummary>>,
    pub fail_crossings: Cell<bool>,
    pub crossings_calls: Cell<usize>,
}

impl FakeCrossingApi {
    pub fn answer_unread(&self, answer: Result<u32, ApiError>) {
        self.unread_answers.borrow_mut().push_back(answer);
    }

    pub fn ping_count(&self) -> usize {
        self.pings.borrow().len()
    }
}

#[async_trait(?Send)]
impl CrossingApi for FakeCrossingApi {
    async fn send_ping(&self, request: &PingRequest) -> Result<PingAck, ApiError> {
        self.pings.borrow_mut().push(request.clone());
        if self.fail_pings.get() {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        let mut ack = self.ack.borrow().clone();
        ack.ping_saved = true;
        Ok(ack)
    }

    async fn fetch_crossings(&self) -> Result<Vec<CrossingSummary>, ApiError> {
        self.crossings_calls.set(self.crossings_calls.get() + 1);
        if self.fail_crossings.get() {
            return Err(ApiError::Http { status: 502, message: "Bad Gateway".to_string() });
        }
        Ok(self.crossings.borrow().clone())
    }

    async fn fetch_unread_count(&self) -> Result<u32, ApiError> {
        self.unread_calls.set(self.unread_calls.get() + 1);
        self.unread_answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("sin respuesta programada".to_string())))
    }
}

// ----------------------------------------------------------------------------
// GPS
// ----------------------------------------------------------------------------

pub struct FakeSampler {
    pub available: Cell<bool>,
    pub reject_watch: RefCell<Option<TrackingError>>,
    pub once_answer: RefCell<Option<Result<PositionReading, PositionError>>>,
    pub once_calls: RefCell<Vec<SamplingOptions>>,
    pub watch_options: RefCell<Vec<SamplingOptions>>,
    pub on_reading: RefCell<Option<ReadingCallback>>,
    pub on_error: RefCell<Option<ErrorCallback>>,
    pub live: RefCell<Vec<WatchHandle>>,
    pub cancelled: RefCell<Vec<WatchHandle>>,
    next_id: Cell<i32>,
}

impl Default for FakeSampler {
    fn default() -> Self {
        Self {
            available: Cell::new(true),
            reject_watch: RefCell::new(None),
            once_answer: RefCell::new(None),
            once_calls: RefCell::new(Vec::new()),
            watch_options: RefCell::new(Vec::new()),
            on_reading: RefCell::new(None),
            on_error: RefCell::new(None),
            live: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }
}

impl FakeSampler {
    /// Simular un fix del GPS sobre el watch registrado
    pub fn emit(&self, reading: PositionReading) {
        let callback = self.on_reading.borrow().clone();
        if let Some(callback) = callback {
            callback(reading);
        }
    }

    /// Simular un error del GPS sobre el watch registrado
    pub fn fail(&self, error: PositionError) {
        let callback = self.on_error.borrow().clone();
        if let Some(callback) = callback {
            callback(error);
        }
    }

    pub fn watches_started(&self) -> usize {
        self.watch_options.borrow().len()
    }
}

#[async_trait(?Send)]
impl PositionSampler for FakeSampler {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn sample_once(&self, options: &SamplingOptions) -> Result<PositionReading, PositionError> {
        self.once_calls.borrow_mut().push(*options);
        self.once_answer
            .borrow_mut()
            .take()
            .unwrap_or(Err(PositionError::Timeout))
    }

    async fn start_continuous(
        &self,
        options: &SamplingOptions,
        on_reading: ReadingCallback,
        on_error: ErrorCallback,
    ) -> Result<WatchHandle, TrackingError> {
        self.watch_options.borrow_mut().push(*options);
        if let Some(error) = self.reject_watch.borrow_mut().take() {
            return Err(error);
        }
        let handle = WatchHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        *self.on_reading.borrow_mut() = Some(on_reading);
        *self.on_error.borrow_mut() = Some(on_error);
        self.live.borrow_mut().push(handle);
        Ok(handle)
    }

    async fn cancel(&self, handle: WatchHandle) {
        self.live.borrow_mut().retain(|live| *live != handle);
        self.cancelled.borrow_mut().push(handle);
    }
}

// ----------------------------------------------------------------------------
// Reloj
// ----------------------------------------------------------------------------

pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + Duration::seconds(secs));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

// ----------------------------------------------------------------------------
// Contraste
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSurface {
    pub edge: Cell<Option<EdgeSpan>>,
    /// Elemento devuelto para cada punto, por orden de muestreo
    pub elements: RefCell<Vec<Option<ProbedElement>>>,
    pub probes: RefCell<Vec<(f64, f64)>>,
    /// Estado "oculto" del overlay en el momento de cada probe
    pub hidden_during_probe: RefCell<Vec<bool>>,
    pub hidden: Cell<bool>,
    pub applied: RefCell<Vec<bool>>,
}

impl FakeSurface {
    pub fn with_elements(edge: EdgeSpan, elements: Vec<Option<ProbedElement>>) -> Self {
        let surface = Self::default();
        surface.edge.set(Some(edge));
        *surface.elements.borrow_mut() = elements;
        surface
    }
}

impl ContrastSurface for FakeSurface {
    fn overlay_top_edge(&self) -> Option<EdgeSpan> {
        self.edge.get()
    }

    fn set_overlay_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    fn probe(&self, x: f64, y: f64) -> Option<ProbedElement> {
        let index = self.probes.borrow().len();
        self.probes.borrow_mut().push((x, y));
        self.hidden_during_probe.borrow_mut().push(self.hidden.get());
        let elements = self.elements.borrow();
        if elements.is_empty() {
            return None;
        }
        elements[index % elements.len()].clone()
    }

    fn apply_icons(&self, light_icons: bool) {
        self.applied.borrow_mut().push(light_icons);
    }
}

/// Scheduler manual: los callbacks se ejecutan cuando el test lo decide
#[derive(Default)]
pub struct ManualScheduler {
    /// Simula un requestAnimationFrame que falla
    pub refuse_frames: Cell<bool>,
    pub frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    pub delayed: RefCell<Vec<(u32, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    pub fn run_frames(&self) {
        let frames: Vec<Box<dyn FnOnce()>> = self.frames.borrow_mut().drain(..).collect();
        for frame in frames {
            frame();
        }
    }

    pub fn run_delayed(&self) {
        let delayed: Vec<(u32, Box<dyn FnOnce()>)> = self.delayed.borrow_mut().drain(..).collect();
        for (_, callback) in delayed {
            callback();
        }
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delayed.borrow().iter().map(|(delay, _)| *delay).collect()
    }
}

impl PassScheduler for ManualScheduler {
    fn next_frame(&self, callback: Box<dyn FnOnce()>) -> bool {
        if self.refuse_frames.get() {
            return false;
        }
        self.frames.borrow_mut().push(callback);
        true
    }

    fn after(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        self.delayed.borrow_mut().push((delay_ms, callback));
    }
}
