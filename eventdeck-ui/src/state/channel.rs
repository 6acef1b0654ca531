//! Realtime Channel
//!
//! Receive-only WebSocket connection to the server's `/ws` stream. Inbound
//! frames are handed to [`pass_to_store`], which forwards them into the
//! store under [`RECEIVE_EVENTS`](super::store::RECEIVE_EVENTS).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::store::{Action, Dispatch};

/// Lifecycle notifications emitted by the channel
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Open,
    Message { data: String },
    Close { code: u16, reason: String },
    Error(String),
}

/// Errors raised while forwarding a frame
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Forward a channel event into the store
///
/// Only `Message` events are forwarded: their `data` is parsed as JSON and
/// dispatched once as `ReceiveEvents`. Malformed JSON is returned as an
/// error and nothing is dispatched.
pub fn pass_to_store<D>(store: &D, event: &ChannelEvent) -> Result<(), ChannelError>
where
    D: Dispatch + ?Sized,
{
    match event {
        ChannelEvent::Message { data } => {
            let payload: serde_json::Value = serde_json::from_str(data)?;
            store.dispatch(Action::ReceiveEvents(payload));
            Ok(())
        }
        ChannelEvent::Open | ChannelEvent::Close { .. } | ChannelEvent::Error(_) => Ok(()),
    }
}

/// Forward a channel event, turning parse failures into a user-visible error
///
/// Frames that fail to parse are logged and dropped; the store receives a
/// `ReportError` instead.
pub fn deliver<D>(store: &D, event: &ChannelEvent)
where
    D: Dispatch + ?Sized,
{
    if let Err(e) = pass_to_store(store, event) {
        tracing::warn!(error = %e, "Dropping inbound frame");
        store.dispatch(Action::ReportError(format!("Received an unreadable update: {}", e)));
    }
}

/// Connection options
///
/// Frames are always parsed as JSON.
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Reconnect after the connection drops
    pub reconnection: bool,
    pub max_reconnect_attempts: u32,
    pub reconnect_base_delay_ms: u32,
    pub reconnect_max_delay_ms: u32,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            reconnection: true,
            max_reconnect_attempts: 10,
            reconnect_base_delay_ms: 1000,
            reconnect_max_delay_ms: 30_000,
        }
    }
}

impl ChannelOptions {
    /// Delay before reconnect attempt `attempt` (0-based), or `None` to give up
    pub fn reconnect_delay(&self, attempt: u32) -> Option<u32> {
        if !self.reconnection || attempt >= self.max_reconnect_attempts {
            return None;
        }
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        Some(
            self.reconnect_base_delay_ms
                .saturating_mul(factor)
                .min(self.reconnect_max_delay_ms),
        )
    }
}

/// WebSocket client feeding a store
pub struct RealtimeChannel<D> {
    inner: Rc<ChannelInner<D>>,
}

struct ChannelInner<D> {
    url: String,
    options: ChannelOptions,
    store: D,
    socket: RefCell<Option<WebSocket>>,
    attempts: Cell<u32>,
    closed: Cell<bool>,
}

impl<D: Dispatch + 'static> RealtimeChannel<D> {
    pub fn new(url: impl Into<String>, options: ChannelOptions, store: D) -> Self {
        Self {
            inner: Rc::new(ChannelInner {
                url: url.into(),
                options,
                store,
                socket: RefCell::new(None),
                attempts: Cell::new(0),
                closed: Cell::new(false),
            }),
        }
    }

    /// Open the connection; reconnects follow the options
    pub fn connect(&self) {
        self.inner.closed.set(false);
        ChannelInner::open(&self.inner);
    }

    /// Close the connection and stop reconnecting
    pub fn close(&self) {
        self.inner.closed.set(true);
        if let Some(ws) = self.inner.socket.borrow_mut().take() {
            let _ = ws.close();
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner
            .socket
            .borrow()
            .as_ref()
            .map(|ws| ws.ready_state() == WebSocket::OPEN)
            .unwrap_or(false)
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

impl<D: Dispatch + 'static> ChannelInner<D> {
    fn open(this: &Rc<Self>) {
        match WebSocket::new(&this.url) {
            Ok(ws) => {
                Self::install_handlers(this, &ws);
                *this.socket.borrow_mut() = Some(ws);
            }
            Err(e) => {
                tracing::error!(url = %this.url, "WebSocket connection failed: {:?}", e);
                Self::schedule_reconnect(this);
            }
        }
    }

    fn install_handlers(this: &Rc<Self>, ws: &WebSocket) {
        let inner = Rc::clone(this);
        let on_open = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
            tracing::info!(url = %inner.url, "WebSocket connected");
            inner.attempts.set(0);
            inner.store.dispatch(Action::ConnectionChanged(true));
            inner.forward(ChannelEvent::Open);
        });
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let inner = Rc::clone(this);
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(data) => inner.forward(ChannelEvent::Message { data }),
                None => tracing::debug!("Ignoring non-text WebSocket frame"),
            }
        });
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let inner = Rc::clone(this);
        let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            tracing::info!(code = event.code(), reason = %event.reason(), "WebSocket closed");
            inner.store.dispatch(Action::ConnectionChanged(false));
            inner.forward(ChannelEvent::Close {
                code: event.code(),
                reason: event.reason(),
            });
            if !inner.closed.get() {
                Self::schedule_reconnect(&inner);
            }
        });
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        let inner = Rc::clone(this);
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
            let message = format!("{:?}", e);
            tracing::error!("WebSocket error: {}", message);
            inner.forward(ChannelEvent::Error(message));
        });
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    fn forward(&self, event: ChannelEvent) {
        deliver(&self.store, &event);
    }

    fn schedule_reconnect(this: &Rc<Self>) {
        let attempt = this.attempts.get();
        let Some(delay) = this.options.reconnect_delay(attempt) else {
            if this.options.reconnection {
                tracing::error!(attempts = attempt, "Max reconnect attempts reached");
                this.store
                    .dispatch(Action::ReportError("Lost connection to the server".to_string()));
            }
            return;
        };

        this.attempts.set(attempt + 1);
        let inner = Rc::clone(this);
        gloo_timers::callback::Timeout::new(delay, move || {
            if inner.closed.get() {
                return;
            }
            tracing::info!(attempt = inner.attempts.get(), "Attempting reconnect");
            Self::open(&inner);
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::RECEIVE_EVENTS;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        actions: RefCell<Vec<Action>>,
    }

    impl Dispatch for Recorder {
        fn dispatch(&self, action: Action) {
            self.actions.borrow_mut().push(action);
        }
    }

    fn message(data: &str) -> ChannelEvent {
        ChannelEvent::Message {
            data: data.to_string(),
        }
    }

    #[test]
    fn test_message_dispatches_once_with_parsed_value() {
        let recorder = Recorder::default();
        let data = r#"{"events": [], "stats": {"total": 2}, "retention": 200}"#;

        pass_to_store(&recorder, &message(data)).unwrap();

        let actions = recorder.actions.borrow();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name(), RECEIVE_EVENTS);
        assert_eq!(
            actions[0],
            Action::ReceiveEvents(json!({"events": [], "stats": {"total": 2}, "retention": 200}))
        );
    }

    #[test]
    fn test_any_json_value_is_forwarded_unchanged() {
        let recorder = Recorder::default();

        for data in ["42", "\"text\"", "[1, 2]", "null"] {
            pass_to_store(&recorder, &message(data)).unwrap();
        }

        let actions = recorder.actions.borrow();
        assert_eq!(
            *actions,
            vec![
                Action::ReceiveEvents(json!(42)),
                Action::ReceiveEvents(json!("text")),
                Action::ReceiveEvents(json!([1, 2])),
                Action::ReceiveEvents(json!(null)),
            ]
        );
    }

    #[test]
    fn test_lifecycle_events_do_not_dispatch() {
        let recorder = Recorder::default();
        let events = [
            ChannelEvent::Open,
            ChannelEvent::Close {
                code: 1006,
                reason: String::new(),
            },
            ChannelEvent::Error("connection refused".to_string()),
        ];

        for event in &events {
            pass_to_store(&recorder, event).unwrap();
        }

        assert!(recorder.actions.borrow().is_empty());
    }

    #[test]
    fn test_malformed_json_is_returned_without_dispatch() {
        let recorder = Recorder::default();

        let result = pass_to_store(&recorder, &message("{\"events\": ["));

        assert!(matches!(result, Err(ChannelError::MalformedPayload(_))));
        assert!(recorder.actions.borrow().is_empty());
    }

    #[test]
    fn test_frames_forwarded_in_order() {
        let recorder = Recorder::default();

        for i in 0..5 {
            pass_to_store(&recorder, &message(&format!("{{\"retention\": {}}}", i))).unwrap();
        }

        let retentions: Vec<_> = recorder
            .actions
            .borrow()
            .iter()
            .map(|a| match a {
                Action::ReceiveEvents(v) => v["retention"].as_i64().unwrap(),
                other => panic!("unexpected action {:?}", other),
            })
            .collect();
        assert_eq!(retentions, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_deliver_reports_unreadable_frames() {
        let recorder = Recorder::default();

        deliver(&recorder, &message("{\"events\": ["));
        deliver(&recorder, &message(r#"{"retention": 3}"#));

        let actions = recorder.actions.borrow();
        assert_eq!(actions.len(), 2);
        assert!(matches!(&actions[0], Action::ReportError(msg) if msg.contains("unreadable")));
        assert_eq!(actions[1], Action::ReceiveEvents(json!({"retention": 3})));
    }

    #[test]
    fn test_default_options() {
        let options = ChannelOptions::default();
        assert!(options.reconnection);
        assert_eq!(options.max_reconnect_attempts, 10);
    }

    #[test]
    fn test_reconnect_backoff_is_capped() {
        let options = ChannelOptions::default();

        let delays: Vec<_> = (0..7).map(|n| options.reconnect_delay(n)).collect();
        assert_eq!(
            delays,
            vec![
                Some(1000),
                Some(2000),
                Some(4000),
                Some(8000),
                Some(16_000),
                Some(30_000),
                Some(30_000)
            ]
        );
        assert_eq!(options.reconnect_delay(10), None);
    }

    #[test]
    fn test_reconnect_disabled() {
        let options = ChannelOptions {
            reconnection: false,
            ..Default::default()
        };
        assert_eq!(options.reconnect_delay(0), None);
    }

    #[test]
    fn test_large_attempt_does_not_overflow() {
        let options = ChannelOptions {
            max_reconnect_attempts: u32::MAX,
            ..Default::default()
        };
        assert_eq!(options.reconnect_delay(40), Some(30_000));
    }
}
