//! Event vocabulary and the registry-to-host listener bus.
//!
//! The runtime recognizes a fixed set of event kinds: pointer and keyboard
//! input, a synthetic `Draw` fired after each successful frame, and
//! lifecycle/state notifications. Externally-sourced kinds are broadcast to
//! every registered element — there is no hit-testing or propagation
//! stopping at this layer; each element decides locally whether an event is
//! relevant to it.

use std::collections::HashMap;
use std::fmt;

use kurbo::Point;

/// The fixed event vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer moved.
    MouseMove,
    /// Pointer button pressed.
    MouseDown,
    /// Pointer button released.
    MouseUp,
    /// Click (press + release).
    MouseClick,
    /// Double click.
    MouseDoubleClick,
    /// Pointer entered the stage.
    MouseOver,
    /// Pointer left the stage.
    MouseOut,
    /// Character produced by a key.
    KeyPress,
    /// Key pressed down.
    KeyDown,
    /// Key released.
    KeyUp,
    /// A frame finished rendering.
    Draw,
    /// Playback state changed.
    StateChange,
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Playback stopped.
    Stop,
    /// Playback reached the end.
    Complete,
    /// Playback looped back to the start.
    Repeat,
    /// An animation definition was imported.
    Import,
    /// An animation finished loading.
    Load,
    /// A remote resource (font, asset) became available.
    ResourceLoad,
    /// A playback-level error was reported.
    Error,
}

impl EventKind {
    /// Map a platform input event name ("mousedown", "keyup", ...) to its
    /// kind. Unknown names yield `None`.
    pub fn from_external(name: &str) -> Option<EventKind> {
        Some(match name {
            "mouseup" => EventKind::MouseUp,
            "mousedown" => EventKind::MouseDown,
            "mousemove" => EventKind::MouseMove,
            "mouseover" => EventKind::MouseOver,
            "mouseout" => EventKind::MouseOut,
            "click" => EventKind::MouseClick,
            "dblclick" => EventKind::MouseDoubleClick,
            "keyup" => EventKind::KeyUp,
            "keydown" => EventKind::KeyDown,
            "keypress" => EventKind::KeyPress,
            _ => return None,
        })
    }

    /// Whether this is a pointer kind.
    pub fn is_pointer(self) -> bool {
        matches!(
            self,
            EventKind::MouseMove
                | EventKind::MouseDown
                | EventKind::MouseUp
                | EventKind::MouseClick
                | EventKind::MouseDoubleClick
                | EventKind::MouseOver
                | EventKind::MouseOut
        )
    }

    /// Whether this is a keyboard kind.
    pub fn is_keyboard(self) -> bool {
        matches!(
            self,
            EventKind::KeyPress | EventKind::KeyDown | EventKind::KeyUp
        )
    }

    /// Whether this kind originates outside the registry (pointer or
    /// keyboard) and is therefore broadcast to every registered element.
    pub fn is_external(self) -> bool {
        self.is_pointer() || self.is_keyboard()
    }
}

/// Payload carried by an [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// No payload.
    None,
    /// Pointer position in stage coordinates, plus the button if any.
    Pointer {
        /// Position in stage coordinates.
        pos: Point,
        /// Button index, if the kind involves one.
        button: Option<u8>,
    },
    /// Key code as reported by the host input layer.
    Key {
        /// Host key code.
        code: u32,
    },
    /// A point in time, in seconds (draw events carry the frame time).
    Time {
        /// Seconds.
        time: f64,
    },
    /// Free-form message (resource URLs, error text).
    Message {
        /// The message.
        text: String,
    },
}

/// One event instance: a kind plus its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// Kind-specific payload.
    pub data: EventData,
}

impl Event {
    /// Payload-less event of the given kind.
    pub fn of(kind: EventKind) -> Event {
        Event {
            kind,
            data: EventData::None,
        }
    }

    /// Pointer event at `pos`.
    pub fn pointer(kind: EventKind, pos: Point, button: Option<u8>) -> Event {
        debug_assert!(kind.is_pointer());
        Event {
            kind,
            data: EventData::Pointer { pos, button },
        }
    }

    /// Keyboard event for `code`.
    pub fn key(kind: EventKind, code: u32) -> Event {
        debug_assert!(kind.is_keyboard());
        Event {
            kind,
            data: EventData::Key { code },
        }
    }

    /// Post-render draw event carrying the frame time.
    pub fn draw(time: f64) -> Event {
        Event {
            kind: EventKind::Draw,
            data: EventData::Time { time },
        }
    }

    /// Message-carrying event (resource load, error).
    pub fn message(kind: EventKind, text: impl Into<String>) -> Event {
        Event {
            kind,
            data: EventData::Message { text: text.into() },
        }
    }
}

/// Handle of one subscription, for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&Event)>;

/// Registry-to-host publish/subscribe bus.
///
/// Handlers are keyed by kind; firing an event invokes every handler
/// subscribed to that kind, in subscription order. Dispatch is synchronous
/// and single-threaded.
#[derive(Default)]
pub struct Listeners {
    next: u64,
    handlers: HashMap<EventKind, Vec<(ListenerId, Handler)>>,
}

impl Listeners {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `kind`; the returned id unsubscribes it.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&Event) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove one subscription. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for handlers in self.handlers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(hid, _)| *hid != id);
            if handlers.len() != before {
                return true;
            }
        }
        false
    }

    /// Invoke every handler subscribed to `event.kind`.
    pub fn fire(&mut self, event: &Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind) {
            for (_, handler) in handlers.iter_mut() {
                handler(event);
            }
        }
    }

    /// Whether any handler is subscribed to `kind`.
    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.handlers.get(&kind).is_some_and(|h| !h.is_empty())
    }

    /// Drop every subscription.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.handlers.values().map(Vec::len).sum();
        f.debug_struct("Listeners")
            .field("kinds", &self.handlers.len())
            .field("handlers", &total)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/bus.rs"]
mod tests;
