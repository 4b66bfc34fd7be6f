//! Page-wide broadcast transport.
//!
//! Messages are untyped JSON so unrelated listeners can share a channel and
//! filter by content.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

pub trait BroadcastChannel {
    /// Publish to every subscriber; returns how many were listening
    fn publish(&self, message: Value) -> usize;

    fn subscribe(&self) -> Box<dyn BroadcastReceiver>;
}

pub trait BroadcastReceiver {
    /// Next pending message, without blocking
    fn try_recv(&mut self) -> Option<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    /// Messages retained per subscriber before the oldest are dropped
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    64
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// In-process channel over `tokio::sync::broadcast`
#[derive(Debug, Clone)]
pub struct TokioBroadcast {
    sender: broadcast::Sender<Value>,
}

impl TokioBroadcast {
    pub fn new(config: ChannelConfig) -> Self {
        let (sender, _) = broadcast::channel(config.capacity.max(1));
        Self { sender }
    }
}

impl Default for TokioBroadcast {
    fn default() -> Self {
        Self::new(ChannelConfig::default())
    }
}

impl BroadcastChannel for TokioBroadcast {
    fn publish(&self, message: Value) -> usize {
        // Err only means nobody is subscribed
        self.sender.send(message).unwrap_or(0)
    }

    fn subscribe(&self) -> Box<dyn BroadcastReceiver> {
        Box::new(TokioReceiver {
            receiver: self.sender.subscribe(),
        })
    }
}

struct TokioReceiver {
    receiver: broadcast::Receiver<Value>,
}

impl BroadcastReceiver for TokioReceiver {
    fn try_recv(&mut self) -> Option<Value> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Broadcast subscriber lagged, messages lost");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
