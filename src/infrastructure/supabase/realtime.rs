//! Push channel over the Supabase realtime socket.
//!
//! The socket is split: a writer task owns the sink and drains an
//! unbounded queue (join, heartbeats, leave); a reader task owns the stream
//! and turns each `postgres_changes` frame into a `ChangeEvent`. Closing
//! the subscription gates the callback first, so nothing is delivered
//! after `close` returns. No reconnect is attempted.

use std::cell::Cell;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedSender};
use futures::future::{AbortHandle, Abortable};
use futures::{SinkExt, StreamExt};
use gloo_net::websocket::{Message, futures::WebSocket};
use gloo_timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;

use super::dto::{PhoenixMessage, events};
use crate::config::FeedConfig;
use crate::domain::{
    errors::{AppError, FeedResult},
    logging::{LogComponent, get_logger},
    market_data::{ChangeEvent, ChangeFeed, Subscription},
};

#[derive(Debug, Clone)]
pub struct SupabaseRealtime {
    config: FeedConfig,
}

impl SupabaseRealtime {
    pub fn new(config: &FeedConfig) -> Self {
        Self { config: config.clone() }
    }

    pub fn socket_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!(
            "{ws_base}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            urlencoding::encode(&self.config.api_key)
        )
    }

    pub fn topic(&self) -> String {
        format!("realtime:{}", self.config.table)
    }
}

impl ChangeFeed for SupabaseRealtime {
    type Subscription = RealtimeSubscription;

    fn subscribe(&self, mut on_change: Box<dyn FnMut(ChangeEvent)>) -> FeedResult<RealtimeSubscription> {
        let url = self.socket_url();
        let topic = self.topic();
        let socket = WebSocket::open(&url).map_err(|e| AppError::NetworkError(format!("Failed to open WebSocket: {e}")))?;
        get_logger().info(LogComponent::Infrastructure("Realtime"), &format!("🔌 Subscribing to {topic}"));

        let (mut sink, mut stream) = socket.split();
        let (outbox, mut queue) = mpsc::unbounded::<PhoenixMessage>();
        let refs = Rc::new(Cell::new(0u64));
        let closed = Rc::new(Cell::new(false));

        spawn_local(async move {
            while let Some(frame) = queue.next().await {
                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        get_logger().error(LogComponent::Infrastructure("Realtime"), &format!("❌ Encode failed: {e}"));
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text)).await {
                    get_logger().warn(LogComponent::Infrastructure("Realtime"), &format!("⚠️ Send failed: {e}"));
                    break;
                }
            }
            // queue closed by `close`: flush done, shut the socket
            let _ = sink.close().await;
        });

        let (reader_abort, registration) = AbortHandle::new_pair();
        let reader_gate = Rc::clone(&closed);
        let reader_topic = topic.clone();
        let reader = async move {
            while let Some(frame) = stream.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text,
                    Ok(Message::Bytes(_)) => continue,
                    Err(e) => {
                        get_logger().warn(LogComponent::Infrastructure("Realtime"), &format!("🔌 Socket ended: {e}"));
                        break;
                    }
                };
                let message: PhoenixMessage = match serde_json::from_str(&text) {
                    Ok(message) => message,
                    Err(e) => {
                        get_logger().debug(LogComponent::Infrastructure("Realtime"), &format!("Ignoring frame: {e}"));
                        continue;
                    }
                };
                if let Some(reason) = message.rejection() {
                    get_logger().error(LogComponent::Infrastructure("Realtime"), &format!("❌ Join rejected: {reason}"));
                } else if message.topic == reader_topic && message.event == events::ERROR {
                    get_logger().error(LogComponent::Infrastructure("Realtime"), "❌ Channel error");
                } else if message.is_change_for(&reader_topic) && !reader_gate.get() {
                    on_change(ChangeEvent { payload: Some(message.payload) });
                }
            }
        };
        spawn_local(async move {
            let _ = Abortable::new(reader, registration).await;
        });

        let reference = next_ref(&refs);
        let join = PhoenixMessage::join(&topic, &self.config.schema, &self.config.table, &self.config.api_key, reference);
        outbox
            .unbounded_send(join)
            .map_err(|_| AppError::NetworkError("realtime writer stopped before join".into()))?;

        let heartbeat_outbox = outbox.clone();
        let heartbeat_refs = Rc::clone(&refs);
        let heartbeat = Interval::new(self.config.heartbeat_interval_ms, move || {
            let _ = heartbeat_outbox.unbounded_send(PhoenixMessage::heartbeat(next_ref(&heartbeat_refs)));
        });

        Ok(RealtimeSubscription { topic, outbox, refs, closed, reader_abort, heartbeat: Some(heartbeat) })
    }
}

fn next_ref(refs: &Cell<u64>) -> u64 {
    let next = refs.get() + 1;
    refs.set(next);
    next
}

/// Open realtime channel; dropping it closes the channel too.
pub struct RealtimeSubscription {
    topic: String,
    outbox: UnboundedSender<PhoenixMessage>,
    refs: Rc<Cell<u64>>,
    closed: Rc<Cell<bool>>,
    reader_abort: AbortHandle,
    heartbeat: Option<Interval>,
}

impl Subscription for RealtimeSubscription {
    fn close(&mut self) {
        if self.closed.replace(true) {
            return;
        }
        self.reader_abort.abort();
        if let Some(heartbeat) = self.heartbeat.take() {
            heartbeat.cancel();
        }
        let _ = self.outbox.unbounded_send(PhoenixMessage::leave(&self.topic, next_ref(&self.refs)));
        self.outbox.close_channel();
        get_logger().info(LogComponent::Infrastructure("Realtime"), &format!("🔌 Left {}", self.topic));
    }

    fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.close();
    }
}
