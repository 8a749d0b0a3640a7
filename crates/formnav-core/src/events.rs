//! Publish/subscribe primitive for form notifications.
//!
//! Subscribers run synchronously, in registration order, on the thread that
//! triggered the change. Consumers that want to handle events elsewhere can
//! subscribe through a channel with [`EventBus::channel`].

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use formnav_model::{Behavior, Direction, Kind};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const TOPIC_INITIALIZED: &str = "form:initialized";
pub const TOPIC_NAVIGATION_CHANGED: &str = "navigation:changed";
pub const TOPIC_INCLUSION_CHANGED: &str = "inclusion:changed";
pub const TOPIC_INPUT_UPDATED: &str = "input:updated";

/// Payload of a `navigation:changed` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationChange {
    /// Level that resolved the move. Coarser than the behavior's level when
    /// a boundary fallback fired; the finer levels were at their boundary.
    pub level: Kind,
    /// Finest navigable level whose current node differs from before the
    /// move. After a fallback this is finer than `level`, since the cascade
    /// refocuses everything below it.
    pub finest_changed: Kind,
    pub behavior: Behavior,
    pub direction: Option<Direction>,
    /// Node that became current at `level`.
    pub target_id: String,
    pub target_index: usize,
    /// A Set or Card changed, so collaborators bound to the coarse context
    /// (buttons, progress bars) should rebind.
    pub context_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FormEvent {
    Initialized { form_id: String },
    NavigationChanged(NavigationChange),
    InclusionChanged { kind: Kind, id: String, included: bool },
    InputUpdated { id: String, completed: bool, valid: bool },
}

impl FormEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => TOPIC_INITIALIZED,
            Self::NavigationChanged(_) => TOPIC_NAVIGATION_CHANGED,
            Self::InclusionChanged { .. } => TOPIC_INCLUSION_CHANGED,
            Self::InputUpdated { .. } => TOPIC_INPUT_UPDATED,
        }
    }
}

/// Receives form events.
pub trait Subscriber: Send + Sync {
    fn on_event(&self, event: &FormEvent);
}

impl<F> Subscriber for F
where
    F: Fn(&FormEvent) + Send + Sync,
{
    fn on_event(&self, event: &FormEvent) {
        self(event);
    }
}

/// Forwards events into a channel.
pub struct ChannelSubscriber {
    sender: Sender<FormEvent>,
}

impl ChannelSubscriber {
    pub fn new(sender: Sender<FormEvent>) -> Self {
        Self { sender }
    }
}

impl Subscriber for ChannelSubscriber {
    fn on_event(&self, event: &FormEvent) {
        // A dropped receiver just means nobody listens any more.
        let _ = self.sender.send(event.clone());
    }
}

/// Ordered collection of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Subscribes an unbounded channel and returns its receiving end.
    pub fn channel(&mut self) -> Receiver<FormEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribe(Arc::new(ChannelSubscriber::new(sender)));
        receiver
    }

    pub fn publish(&self, event: &FormEvent) {
        trace!(topic = event.topic(), subscribers = self.subscribers.len(), "publish");
        for subscriber in &self.subscribers {
            subscriber.on_event(event);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn subscribers_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            bus.subscribe(Arc::new(move |_: &FormEvent| {
                seen.lock().unwrap().push(tag);
            }));
        }
        bus.publish(&FormEvent::Initialized {
            form_id: "f".to_string(),
        });
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn channel_receives_events() {
        let mut bus = EventBus::new();
        let receiver = bus.channel();
        bus.publish(&FormEvent::InclusionChanged {
            kind: Kind::Field,
            id: "a".to_string(),
            included: false,
        });
        let event = receiver.try_recv().unwrap();
        assert_eq!(event.topic(), TOPIC_INCLUSION_CHANGED);
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let mut bus = EventBus::new();
        drop(bus.channel());
        bus.publish(&FormEvent::Initialized {
            form_id: "f".to_string(),
        });
        assert_eq!(bus.len(), 1);
    }
}
