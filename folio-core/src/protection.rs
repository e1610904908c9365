//! Opt-in suppression of the context menu and view-source shortcuts.
//!
//! This is cosmetic. Anyone can still read the page source, so nothing here
//! may be relied on to keep content private.

/// A key press with its modifier state, as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub shift: bool,
}

/// Whether the client script swallows this key press.
///
/// Covers Ctrl+U, Ctrl+Shift+I, Ctrl+Shift+J and F12.
pub fn is_blocked_shortcut(chord: KeyChord<'_>) -> bool {
    let key = chord.key.to_ascii_lowercase();
    (chord.ctrl && !chord.shift && key == "u")
        || (chord.ctrl && chord.shift && (key == "i" || key == "j"))
        || chord.key == "F12"
}

/// Browser side of [`is_blocked_shortcut`], plus context-menu suppression.
pub const PROTECTION_SCRIPT: &str = r#"
  document.addEventListener('contextmenu', function (e) { e.preventDefault(); });
  document.addEventListener('keydown', function (e) {
    var key = (e.key || '').toLowerCase();
    if ((e.ctrlKey && !e.shiftKey && key === 'u') ||
        (e.ctrlKey && e.shiftKey && (key === 'i' || key === 'j')) ||
        e.key === 'F12') {
      e.preventDefault();
    }
  });
"#;
