//! Overlay window lifecycle: visibility, focus and the toggle shortcut.
//!
//! The overlay itself draws nothing. It owns the visible/hidden state and
//! tells subscribers when that state changes, so any presentation layer
//! (a native window, a terminal UI, tests) can follow along.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::mpsc;

use crate::error::{LauncherError, Result};

/// A lifecycle notification delivered to overlay subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Shown,
    /// Sent right after `Shown`: the query input should take keyboard focus.
    Focus,
    Hidden,
}

type Registry = Mutex<HashMap<u64, mpsc::UnboundedSender<OverlayEvent>>>;

/// Fan-out of [`OverlayEvent`]s to registered subscribers.
///
/// Only the bus (and its clones) own the subscriber senders, so dropping
/// the last clone closes every subscription.
#[derive(Clone, Default)]
pub struct OverlayBus {
    subscribers: Arc<Registry>,
    next_id: Arc<std::sync::atomic::AtomicU64>,
}

impl OverlayBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.insert(id, tx);
        }
        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn emit(&self, event: OverlayEvent) {
        let Ok(subscribers) = self.subscribers.lock() else {
            tracing::warn!(?event, "overlay subscriber registry poisoned; event dropped");
            return;
        };
        for tx in subscribers.values() {
            let _ = tx.send(event);
        }
    }
}

/// A registered overlay listener. Dropping it unregisters.
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<OverlayEvent>,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Wait for the next event. Returns `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<OverlayEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<OverlayEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        if let Ok(mut subscribers) = registry.lock() {
            subscribers.remove(&self.id);
        }
    }
}

/// A key press as reported by the windowing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    /// Key name, e.g. `"k"`, `"Escape"`, `"Space"`.
    pub key: String,
    pub meta: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyPress {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.key.eq_ignore_ascii_case("escape") || self.key.eq_ignore_ascii_case("esc")
    }
}

/// A parsed key binding such as `cmd+shift+k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    key: String,
    meta: bool,
    shift: bool,
    ctrl: bool,
    alt: bool,
}

impl Shortcut {
    /// Parse a `+`-separated binding. The last segment is the key; the
    /// others are modifiers (`cmd`/`meta`/`super`, `shift`, `ctrl`, `alt`/`option`).
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::Config`] for an empty key, an unknown
    /// modifier, or a repeated modifier.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts: Vec<&str> = raw.split('+').map(str::trim).collect();
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(LauncherError::Config(format!(
                "shortcut `{raw}` is missing a key"
            )));
        }

        let mut shortcut = Self {
            key: key.to_ascii_lowercase(),
            meta: false,
            shift: false,
            ctrl: false,
            alt: false,
        };
        for part in parts {
            let flag = match part.to_ascii_lowercase().as_str() {
                "cmd" | "command" | "meta" | "super" => &mut shortcut.meta,
                "shift" => &mut shortcut.shift,
                "ctrl" | "control" => &mut shortcut.ctrl,
                "alt" | "option" | "opt" => &mut shortcut.alt,
                other => {
                    return Err(LauncherError::Config(format!(
                        "shortcut `{raw}` has unknown modifier `{other}`"
                    )));
                }
            };
            if *flag {
                return Err(LauncherError::Config(format!(
                    "shortcut `{raw}` repeats modifier `{part}`"
                )));
            }
            *flag = true;
        }
        Ok(shortcut)
    }

    /// Whether `press` triggers this binding. Modifiers must match exactly.
    #[must_use]
    pub fn matches(&self, press: &KeyPress) -> bool {
        press.key.eq_ignore_ascii_case(&self.key)
            && press.meta == self.meta
            && press.shift == self.shift
            && press.ctrl == self.ctrl
            && press.alt == self.alt
    }
}

impl FromStr for Shortcut {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = [
            (self.meta, "cmd"),
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
        ];
        for (set, name) in modifiers {
            if set {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

/// Visibility state of the launcher overlay.
pub struct Overlay {
    visible: bool,
    shortcut: Shortcut,
    bus: OverlayBus,
}

impl Overlay {
    #[must_use]
    pub fn new(shortcut: Shortcut) -> Self {
        Self {
            visible: false,
            shortcut,
            bus: OverlayBus::new(),
        }
    }

    /// Build from the configured shortcut string.
    ///
    /// # Errors
    ///
    /// Returns an error if the shortcut does not parse.
    pub fn from_config(config: &crate::config::OverlayConfig) -> Result<Self> {
        Ok(Self::new(Shortcut::parse(&config.shortcut)?))
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn shortcut(&self) -> &Shortcut {
        &self.shortcut
    }

    /// The bus overlay events are published on.
    #[must_use]
    pub fn bus(&self) -> &OverlayBus {
        &self.bus
    }

    /// Shorthand for `self.bus().subscribe()`.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Show if hidden, hide if shown.
    pub fn toggle(&mut self) {
        if self.visible {
            self.close();
        } else {
            self.open();
        }
    }

    /// Show the overlay and move focus into it. No-op if already visible.
    pub fn open(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        tracing::debug!("overlay shown");
        self.bus.emit(OverlayEvent::Shown);
        self.bus.emit(OverlayEvent::Focus);
    }

    /// Hide the overlay. No-op if already hidden.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        tracing::debug!("overlay hidden");
        self.bus.emit(OverlayEvent::Hidden);
    }

    /// Feed a key press. Returns `true` if the overlay consumed it.
    ///
    /// The toggle shortcut works in both states; `Escape` only while visible.
    pub fn handle_key(&mut self, press: &KeyPress) -> bool {
        if self.shortcut.matches(press) {
            self.toggle();
            return true;
        }
        if self.visible && press.is_escape() {
            self.close();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, meta: bool, shift: bool) -> KeyPress {
        KeyPress {
            key: key.into(),
            meta,
            shift,
            ..KeyPress::default()
        }
    }

    fn drain(sub: &mut Subscription) -> Vec<OverlayEvent> {
        std::iter::from_fn(|| sub.try_recv()).collect()
    }

    #[test]
    fn parses_default_binding() {
        let shortcut = Shortcut::parse("cmd+shift+k").expect("parse");
        assert!(shortcut.matches(&press("k", true, true)));
        assert!(shortcut.matches(&press("K", true, true)));
        assert!(!shortcut.matches(&press("k", true, false)));
        assert!(!shortcut.matches(&press("j", true, true)));
        assert_eq!(shortcut.to_string(), "cmd+shift+k");
    }

    #[test]
    fn modifier_aliases_and_spacing() {
        let shortcut: Shortcut = "Control + Option + Space".parse().expect("parse");
        let key = KeyPress {
            key: "space".into(),
            ctrl: true,
            alt: true,
            ..KeyPress::default()
        };
        assert!(shortcut.matches(&key));
        assert_eq!(shortcut.to_string(), "ctrl+alt+space");
    }

    #[test]
    fn rejects_malformed_bindings() {
        assert!(Shortcut::parse("").is_err());
        assert!(Shortcut::parse("cmd+").is_err());
        assert!(Shortcut::parse("hyper+k").is_err());
        assert!(Shortcut::parse("cmd+cmd+k").is_err());
    }

    #[test]
    fn toggle_emits_shown_then_focus() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+shift+k").expect("parse"));
        let mut sub = overlay.subscribe();

        overlay.toggle();
        assert!(overlay.is_visible());
        assert_eq!(drain(&mut sub), vec![OverlayEvent::Shown, OverlayEvent::Focus]);

        overlay.toggle();
        assert!(!overlay.is_visible());
        assert_eq!(drain(&mut sub), vec![OverlayEvent::Hidden]);
    }

    #[test]
    fn open_and_close_are_idempotent() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+k").expect("parse"));
        let mut sub = overlay.subscribe();

        overlay.close();
        assert!(drain(&mut sub).is_empty());
        overlay.open();
        overlay.open();
        assert_eq!(drain(&mut sub), vec![OverlayEvent::Shown, OverlayEvent::Focus]);
    }

    #[test]
    fn escape_closes_only_when_visible() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+shift+k").expect("parse"));
        assert!(!overlay.handle_key(&KeyPress::new("Escape")));

        assert!(overlay.handle_key(&press("k", true, true)));
        assert!(overlay.is_visible());
        assert!(overlay.handle_key(&KeyPress::new("Escape")));
        assert!(!overlay.is_visible());
        assert!(!overlay.handle_key(&KeyPress::new("a")));
    }

    #[test]
    fn dropped_subscription_unregisters() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+shift+k").expect("parse"));
        let first = overlay.subscribe();
        let mut second = overlay.subscribe();
        assert_eq!(overlay.bus().subscriber_count(), 2);

        drop(first);
        assert_eq!(overlay.bus().subscriber_count(), 1);

        overlay.open();
        assert_eq!(drain(&mut second), vec![OverlayEvent::Shown, OverlayEvent::Focus]);
    }

    #[tokio::test]
    async fn subscription_receives_asynchronously() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+shift+k").expect("parse"));
        let mut sub = overlay.subscribe();
        let waiter = tokio::spawn(async move { sub.recv().await });
        overlay.open();
        assert_eq!(waiter.await.expect("join"), Some(OverlayEvent::Shown));
    }

    #[tokio::test]
    async fn recv_ends_once_overlay_is_dropped() {
        let mut overlay = Overlay::new(Shortcut::parse("cmd+shift+k").expect("parse"));
        let mut sub = overlay.subscribe();
        overlay.open();
        drop(overlay);

        let received = tokio::time::timeout(std::time::Duration::from_secs(2), async {
            let mut events = Vec::new();
            while let Some(event) = sub.recv().await {
                events.push(event);
            }
            events
        })
        .await
        .expect("subscription closes with the bus");
        assert_eq!(received, vec![OverlayEvent::Shown, OverlayEvent::Focus]);
        drop(sub);
    }

    #[test]
    fn bus_clone_keeps_subscriptions_open() {
        let bus = OverlayBus::new();
        let mut sub = bus.subscribe();
        let clone = bus.clone();
        drop(bus);

        clone.emit(OverlayEvent::Hidden);
        assert_eq!(sub.try_recv(), Some(OverlayEvent::Hidden));
        assert_eq!(clone.subscriber_count(), 1);
        drop(sub);
        assert_eq!(clone.subscriber_count(), 0);
    }
}
