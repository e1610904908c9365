//! One-shot reveal animations for sections entering the viewport.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fraction of an element that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f32 = 0.12;
/// Shrinks the bottom of the viewport so elements reveal slightly late.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -8% 0px";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealStyle {
    /// Everything is visible from the start.
    None,
    #[default]
    Simple,
    /// Each element waits for all earlier ones.
    Sequential,
    /// Delays cycle in short waves.
    Staggered,
}

impl RevealStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealStyle::None => "none",
            RevealStyle::Simple => "simple",
            RevealStyle::Sequential => "sequential",
            RevealStyle::Staggered => "staggered",
        }
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        let ms = match self {
            RevealStyle::None | RevealStyle::Simple => 0,
            RevealStyle::Sequential => 120 * index as u64,
            RevealStyle::Staggered => 80 * (index % 6) as u64,
        };
        Duration::from_millis(ms)
    }

    /// Inline style carrying the delay, empty when there is none.
    pub fn delay_style(&self, index: usize) -> String {
        let delay = self.delay_for(index);
        if delay.is_zero() {
            String::new()
        } else {
            format!(" style=\"--reveal-delay:{}ms\"", delay.as_millis())
        }
    }
}

/// Tracks which elements have been revealed.
///
/// Elements are observed until they first intersect the viewport, then marked
/// `in-view` and dropped from observation. Without an observation facility
/// (or with [`RevealStyle::None`]) everything is visible immediately.
#[derive(Debug, Default)]
pub struct Revealer {
    observing: HashSet<String>,
    visible: BTreeSet<String>,
    observer_available: bool,
}

impl Revealer {
    pub fn new<I, S>(style: RevealStyle, observer_available: bool, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let observe = observer_available && style != RevealStyle::None;
        let mut revealer = Self {
            observer_available: observe,
            ..Self::default()
        };
        for id in elements {
            if observe {
                revealer.observing.insert(id.into());
            } else {
                revealer.visible.insert(id.into());
            }
        }
        revealer
    }

    /// Report an intersection. Returns true when this reveals the element.
    pub fn intersect(&mut self, id: &str) -> bool {
        if self.observing.remove(id) {
            self.visible.insert(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observing.contains(id)
    }

    pub fn observer_available(&self) -> bool {
        self.observer_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_is_one_shot() {
        let mut r = Revealer::new(RevealStyle::Simple, true, ["home", "projects"]);
        assert!(!r.is_visible("home"));
        assert!(r.intersect("home"));
        assert!(r.is_visible("home"));
        assert!(!r.is_observing("home"));
        assert!(!r.intersect("home"));
    }

    #[test]
    fn test_without_observer_everything_is_visible() {
        let r = Revealer::new(RevealStyle::Staggered, false, ["a", "b"]);
        assert!(r.is_visible("a") && r.is_visible("b"));
        assert!(!r.observer_available());
    }

    #[test]
    fn test_delays() {
        assert_eq!(RevealStyle::Simple.delay_for(4), Duration::ZERO);
        assert_eq!(RevealStyle::Sequential.delay_for(3), Duration::from_millis(360));
        assert_eq!(RevealStyle::Staggered.delay_for(7), Duration::from_millis(80));
        assert_eq!(RevealStyle::Simple.delay_style(2), "");
        assert_eq!(
            RevealStyle::Staggered.delay_style(2),
            " style=\"--reveal-delay:160ms\""
        );
    }
}
