//! Deadline-driven transient UI state.
//!
//! Nothing here owns a clock. Callers pass `now` in and call `tick` from
//! their event loop, which keeps every timeline testable.

use std::time::{Duration, Instant};

use crate::upload::Tone;

/// How long a banner stays fully visible.
pub const BANNER_VISIBLE: Duration = Duration::from_millis(2500);
/// Fade-out after the visible phase.
pub const BANNER_FADE: Duration = Duration::from_millis(500);
/// How long a "copied" indicator stays on.
pub const COPIED_FLAG: Duration = Duration::from_secs(2);
/// Extra time the upload form stays disabled after a response.
pub const LOADING_TAIL: Duration = Duration::from_secs(1);

/// A value that disappears once its deadline passes.
#[derive(Debug, Clone)]
pub struct Expiring<T> {
    ttl: Duration,
    slot: Option<(T, Instant)>,
}

impl<T> Expiring<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    /// Store `value`, replacing any previous one and restarting the deadline.
    pub fn set(&mut self, value: T, now: Instant) {
        self.slot = Some((value, now + self.ttl));
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Drop the value if expired. Returns true when something was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.slot {
            Some((_, deadline)) if now >= deadline => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref().map(|(v, _)| v)
    }

    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(_, d)| *d)
    }
}

impl<T: PartialEq> Expiring<T> {
    pub fn is(&self, value: &T) -> bool {
        self.get() == Some(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub tone: Tone,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Hidden,
    Visible,
    Fading,
}

/// Feedback banner: `Hidden → Visible → Fading → Hidden`.
///
/// Showing a message while another is up restarts the timeline.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    current: Option<(Message, Instant)>,
}

impl Banner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: Message, now: Instant) {
        self.current = Some((message, now));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn phase(&self, now: Instant) -> BannerPhase {
        match &self.current {
            None => BannerPhase::Hidden,
            Some((_, shown_at)) => {
                let age = now.saturating_duration_since(*shown_at);
                if age < BANNER_VISIBLE {
                    BannerPhase::Visible
                } else if age < BANNER_VISIBLE + BANNER_FADE {
                    BannerPhase::Fading
                } else {
                    BannerPhase::Hidden
                }
            }
        }
    }

    /// Forget the message once the fade has finished.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.phase(now) == BannerPhase::Hidden {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// The message, kept through the fade.
    pub fn message(&self) -> Option<&Message> {
        self.current.as_ref().map(|(m, _)| m)
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.phase(now) == BannerPhase::Visible
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn banner_timeline() {
        let t0 = Instant::now();
        let mut banner = Banner::new();
        assert_eq!(banner.phase(t0), BannerPhase::Hidden);

        banner.show(Message::success("ok"), t0);
        assert_eq!(banner.phase(t0), BannerPhase::Visible);
        assert_eq!(banner.phase(t0 + ms(2499)), BannerPhase::Visible);
        assert_eq!(banner.phase(t0 + ms(2500)), BannerPhase::Fading);
        assert!(!banner.tick(t0 + ms(2999)));
        assert_eq!(banner.message().unwrap().text, "ok");
        assert!(banner.tick(t0 + ms(3000)));
        assert!(banner.message().is_none());
        assert_eq!(banner.phase(t0 + ms(3000)), BannerPhase::Hidden);
    }

    #[test]
    fn banner_restart_on_new_message() {
        let t0 = Instant::now();
        let mut banner = Banner::new();
        banner.show(Message::success("first"), t0);
        banner.show(Message::error("second"), t0 + ms(2000));

        assert!(banner.is_visible(t0 + ms(4000)));
        assert!(!banner.tick(t0 + ms(4000)));
        assert_eq!(banner.message().unwrap().tone, Tone::Error);
        assert!(banner.tick(t0 + ms(5000)));
    }

    #[test]
    fn expiring_reverts_after_ttl() {
        let t0 = Instant::now();
        let mut copied = Expiring::new(COPIED_FLAG);
        copied.set("id-1".to_string(), t0);
        assert!(copied.is(&"id-1".to_string()));
        assert!(!copied.tick(t0 + ms(1999)));
        assert!(copied.is_set());
        assert!(copied.tick(t0 + ms(2000)));
        assert!(copied.get().is_none());
    }

    #[test]
    fn expiring_set_restarts_deadline() {
        let t0 = Instant::now();
        let mut flag = Expiring::new(ms(100));
        flag.set(1, t0);
        flag.set(2, t0 + ms(80));
        assert_eq!(flag.deadline(), Some(t0 + ms(180)));
        assert!(!flag.tick(t0 + ms(150)));
        assert_eq!(flag.get(), Some(&2));
    }

    #[test]
    fn expiring_clear() {
        let mut flag = Expiring::new(LOADING_TAIL);
        flag.set((), Instant::now());
        flag.clear();
        assert!(!flag.is_set());
    }
}
