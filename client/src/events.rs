// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient, user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What subscribers of a store get told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The task collection, loading flag or last error changed.
    TasksChanged,
    /// The project collection, loading flag or last error changed.
    ProjectsChanged,
    Notice(Notice),
}

/// Broadcast channel shared by the stores of one client.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: StoreEvent) {
        // Nobody listening is fine.
        let _ = self.sender.send(event);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(StoreEvent::Notice(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(StoreEvent::Notice(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }));
    }
}
