//! The browser script shipped with every rendered page.
//!
//! It replays the same interactions [`crate::session::PageSession`] models:
//! collapsible panels, the debounced project search, the nav toggle, print
//! and reveal-on-scroll. Constants are filled in from the Rust side so both
//! agree.

use crate::collapsible::OPEN_PADDING_PX;
use crate::debounce::SEARCH_DEBOUNCE;
use crate::protection::PROTECTION_SCRIPT;
use crate::reveal::{REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use crate::sections::projects::NO_RESULTS;
use crate::session::PRINT_ONLY_CLASS;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    pub protection: bool,
}

const RUNTIME: &str = r#"
(function () {
  function openPanel(el) {
    el.classList.add('is-open');
    el.style.maxHeight = (el.scrollHeight + __PADDING__) + 'px';
    el.style.opacity = '1';
    el.addEventListener('transitionend', function once() {
      el.removeEventListener('transitionend', once);
      if (el.classList.contains('is-open')) el.style.maxHeight = 'none';
    });
  }

  function closePanel(el) {
    el.style.maxHeight = el.getBoundingClientRect().height + 'px';
    void el.offsetHeight;
    el.style.maxHeight = '0';
    el.style.opacity = '0';
    el.classList.remove('is-open');
  }

  document.addEventListener('click', function (e) {
    var btn = e.target.closest && e.target.closest('.toggle-btn');
    if (!btn) return;
    var panel = document.getElementById(btn.dataset.targetId);
    if (!panel) return;
    var expanded = btn.getAttribute('aria-expanded') === 'true';
    btn.setAttribute('aria-expanded', expanded ? 'false' : 'true');
    if (expanded) closePanel(panel); else openPanel(panel);
  });

  var nav = document.getElementById('site-nav');
  var navToggle = document.getElementById('nav-toggle');
  if (nav && navToggle) {
    navToggle.addEventListener('click', function () {
      var open = navToggle.getAttribute('aria-expanded') === 'true';
      navToggle.setAttribute('aria-expanded', open ? 'false' : 'true');
      nav.classList.toggle('open', !open);
    });
    nav.querySelectorAll('a').forEach(function (a) {
      a.addEventListener('click', function () {
        navToggle.setAttribute('aria-expanded', 'false');
        nav.classList.remove('open');
        var href = a.getAttribute('href') || '';
        if (href.charAt(0) !== '#') return;
        var target = document.getElementById(href.slice(1));
        if (target) setTimeout(function () { target.focus({ preventScroll: false }); }, 50);
      });
    });
  }

  var printBtn = document.getElementById('print-btn');
  var printOnly = document.getElementById('print-only');
  if (printBtn) {
    printBtn.addEventListener('click', function () {
      if (printOnly && printOnly.checked) document.documentElement.classList.add('__PRINT_ONLY__');
      window.print();
      document.documentElement.classList.remove('__PRINT_ONLY__');
    });
  }

  var sections = document.querySelectorAll('.content-section:not(.in-view)');
  if ('IntersectionObserver' in window) {
    var io = new IntersectionObserver(function (entries) {
      entries.forEach(function (entry) {
        if (!entry.isIntersecting) return;
        entry.target.classList.add('in-view');
        io.unobserve(entry.target);
      });
    }, { root: null, rootMargin: '__ROOT_MARGIN__', threshold: __THRESHOLD__ });
    sections.forEach(function (s) { io.observe(s); });
  } else {
    sections.forEach(function (s) { s.classList.add('in-view'); });
  }

  var ENTITIES = { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#x27;' };
  function esc(s) {
    return String(s).replace(/[&<>"']/g, function (c) { return ENTITIES[c]; });
  }

  function fold(s) {
    return Array.from(String(s || '')).map(function (c) { return c.toLowerCase(); }).join('');
  }

  function mark(text, q) {
    text = String(text || '');
    var needle = Array.from(fold(String(q || '').trim()));
    if (!needle.length) return esc(text);
    var folded = [];
    var offset = 0;
    Array.from(text).forEach(function (c) {
      var end = offset + c.length;
      Array.from(c.toLowerCase()).forEach(function (lc) { folded.push([lc, offset, end]); });
      offset = end;
    });
    var out = '', last = 0, at = 0;
    while (at + needle.length <= folded.length) {
      var hit = true;
      for (var k = 0; k < needle.length; k++) {
        if (folded[at + k][0] !== needle[k]) { hit = false; break; }
      }
      if (!hit) { at++; continue; }
      var start = folded[at][1], stop = folded[at + needle.length - 1][2];
      out += esc(text.slice(last, start)) + '<mark class="match">' + esc(text.slice(start, stop)) + '</mark>';
      last = stop;
      at += needle.length;
      while (at < folded.length && folded[at][1] < stop) at++;
    }
    return out + esc(text.slice(last));
  }

  function rehighlight(card, q) {
    card.querySelectorAll('[data-field]').forEach(function (el) {
      var field = el.dataset.field;
      if (field !== 'tags') { el.innerHTML = mark(card.dataset[field], q); return; }
      var tags = [];
      try { tags = JSON.parse(card.dataset.tags || '[]'); } catch (err) { tags = []; }
      el.innerHTML = tags.map(function (t) { return '<span class="tag">' + mark(t, q) + '</span>'; }).join('');
    });
  }

  var search = document.getElementById('project-search');
  var grid = document.getElementById('projects-grid');
  if (search && grid) {
    var endpoint = grid.dataset.searchEndpoint;
    var timer;
    var latest = 0;
    var inflight = null;
    var filter = function (raw) {
      raw = String(raw || '').trim();
      if (endpoint) {
        // Only the latest request may touch the grid
        var ticket = ++latest;
        if (inflight) inflight.abort();
        inflight = 'AbortController' in window ? new AbortController() : null;
        fetch(endpoint + '?q=' + encodeURIComponent(raw), inflight ? { signal: inflight.signal } : {})
          .then(function (r) { if (!r.ok) throw new Error('HTTP ' + r.status); return r.text(); })
          .then(function (html) { if (ticket === latest) grid.innerHTML = html; })
          .catch(function (err) { if (err.name !== 'AbortError') console.error(err); });
        return;
      }
      var needle = fold(raw);
      var shown = 0;
      grid.querySelectorAll('.project-item').forEach(function (card) {
        var hit = !needle || (card.dataset.haystack || '').indexOf(needle) !== -1;
        card.hidden = !hit;
        if (!hit) return;
        shown++;
        rehighlight(card, raw);
      });
      var empty = grid.querySelector('.no-results');
      if (!shown && !empty) grid.insertAdjacentHTML('beforeend', '__NO_RESULTS__');
      if (shown && empty) empty.remove();
    };
    search.addEventListener('input', function (e) {
      clearTimeout(timer);
      timer = setTimeout(function () { filter(e.target.value); }, __DEBOUNCE_MS__);
    });
  }
__PROTECTION__})();
"#;

/// The client script for a page, without the surrounding `<script>` tag.
pub fn client_script(opts: ClientOptions) -> String {
    RUNTIME
        .replace("__PADDING__", &OPEN_PADDING_PX.to_string())
        .replace("__PRINT_ONLY__", PRINT_ONLY_CLASS)
        .replace("__ROOT_MARGIN__", REVEAL_ROOT_MARGIN)
        .replace("__THRESHOLD__", &REVEAL_THRESHOLD.to_string())
        .replace("__NO_RESULTS__", &NO_RESULTS.replace('\'', "\\'"))
        .replace("__DEBOUNCE_MS__", &SEARCH_DEBOUNCE.as_millis().to_string())
        .replace(
            "__PROTECTION__",
            if opts.protection { PROTECTION_SCRIPT } else { "" },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_filled_in() {
        let js = client_script(ClientOptions::default());
        assert!(!js.contains("__"), "unfilled placeholder in client script");
        assert!(js.contains("}, 160);"));
        assert!(js.contains("threshold: 0.12"));
        assert!(js.contains("scrollHeight + 12"));
        assert!(!js.contains("contextmenu"));
    }

    #[test]
    fn test_static_filter_rehighlights_visible_cards() {
        let js = client_script(ClientOptions::default());
        assert!(js.contains("'<mark class=\"match\">' + esc(text.slice(start, stop)) + '</mark>'"));
        assert!(js.contains("rehighlight(card, raw);"));
        assert!(js.contains("querySelectorAll('[data-field]')"));
        assert!(js.contains("'&#x27;'"));
    }

    #[test]
    fn test_endpoint_search_drops_stale_responses() {
        let js = client_script(ClientOptions::default());
        assert!(js.contains("inflight.abort()"));
        assert!(js.contains("if (ticket === latest) grid.innerHTML = html;"));
    }

    #[test]
    fn test_protection_is_opt_in() {
        let js = client_script(ClientOptions { protection: true });
        assert!(js.contains("contextmenu"));
    }
}
