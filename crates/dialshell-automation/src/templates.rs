// SPDX-FileCopyrightText: 2026 Dialshell Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page-side JavaScript templates.
//!
//! Every script the bridge injects lives here as a function-expression
//! source, invoked through [`crate::script::ScriptCall`] with JSON-bound
//! arguments. Selectors are hardcoded guesses against one specific external
//! web application and WILL need recalibration when its markup changes; the
//! `DUMP_DOM` snapshot exists for exactly that.
//!
//! Templates never throw on missing elements: absent nodes degrade to empty
//! strings, empty arrays, or `false`.

/// Collects the raw text of every notification badge. Returns an array of
/// strings; the Rust decoder does the numeric filtering and summing.
pub const UNREAD_BADGES: &str = r#"function () {
  const sels = ['.navItemBadge', 'gv-nav-item .count', '.nav-item .badge', '[aria-label*="unread" i] .count'];
  const seen = [];
  const out = [];
  for (const sel of sels) {
    for (const el of document.querySelectorAll(sel)) {
      if (seen.indexOf(el) >= 0) { continue; }
      seen.push(el);
      out.push((el.textContent || '').trim());
    }
  }
  return out;
}"#;

/// Scrapes the conversation list. First-match strategy across candidate
/// selectors; DOM document order (the page renders newest-first).
pub const LIST_MESSAGES: &str = r#"function (limit) {
  const candidates = ['gv-thread-item', '.thread-item', '[data-thread-id]', '[role="listitem"]'];
  let items = [];
  for (const sel of candidates) {
    const found = document.querySelectorAll(sel);
    if (found.length > 0) { items = Array.from(found); break; }
  }
  const pick = (el, sels) => {
    for (const s of sels) {
      const n = el.querySelector(s);
      if (n && n.textContent && n.textContent.trim()) { return n.textContent.trim(); }
    }
    return '';
  };
  return items.slice(0, limit).map((el) => ({
    name: pick(el, ['.name', '[class*="participant"]', '[class*="name"]']) || 'Unknown',
    phone: pick(el, ['[class*="phone"]', '[class*="number"]']),
    preview: pick(el, ['.snippet', '[class*="snippet"]', '[class*="preview"]']),
    timestamp: pick(el, ['time', '[class*="time"]', '[class*="date"]']),
    unread: ('' + el.className).indexOf('unread') >= 0
  }));
}"#;

/// Scrapes the contact list.
pub const LIST_CONTACTS: &str = r#"function (limit) {
  const candidates = ['gv-contact-item', '.contact-item', '[data-contact-id]', '[role="listitem"]'];
  let items = [];
  for (const sel of candidates) {
    const found = document.querySelectorAll(sel);
    if (found.length > 0) { items = Array.from(found); break; }
  }
  const pick = (el, sels) => {
    for (const s of sels) {
      const n = el.querySelector(s);
      if (n && n.textContent && n.textContent.trim()) { return n.textContent.trim(); }
    }
    return '';
  };
  return items.slice(0, limit).map((el) => ({
    name: pick(el, ['.name', '[class*="name"]']) || 'Unknown',
    phone: pick(el, ['[class*="phone"]', '[class*="number"]']),
    email: pick(el, ['[class*="email"]'])
  }));
}"#;

/// Scrapes the call history list, classifying direction from class names
/// and icon labels.
pub const LIST_CALLS: &str = r#"function (limit) {
  const candidates = ['gv-call-item', '.call-item', '[data-call-id]', '[role="listitem"]'];
  let items = [];
  for (const sel of candidates) {
    const found = document.querySelectorAll(sel);
    if (found.length > 0) { items = Array.from(found); break; }
  }
  const pick = (el, sels) => {
    for (const s of sels) {
      const n = el.querySelector(s);
      if (n && n.textContent && n.textContent.trim()) { return n.textContent.trim(); }
    }
    return '';
  };
  const direction = (el) => {
    const hay = (('' + el.className) + ' ' + (el.getAttribute('aria-label') || '')).toLowerCase();
    if (hay.indexOf('missed') >= 0) { return 'missed'; }
    if (hay.indexOf('outgoing') >= 0 || hay.indexOf('outbound') >= 0) { return 'outgoing'; }
    if (hay.indexOf('incoming') >= 0 || hay.indexOf('inbound') >= 0) { return 'incoming'; }
    return '';
  };
  return items.slice(0, limit).map((el) => ({
    name: pick(el, ['.name', '[class*="name"]']) || 'Unknown',
    phone: pick(el, ['[class*="phone"]', '[class*="number"]']),
    direction: direction(el),
    timestamp: pick(el, ['time', '[class*="time"]', '[class*="date"]']),
    duration: pick(el, ['[class*="duration"]'])
  }));
}"#;

/// Scrapes the voicemail list, including any rendered transcript text.
pub const LIST_VOICEMAILS: &str = r#"function (limit) {
  const candidates = ['gv-voicemail-item', '.voicemail-item', '[data-voicemail-id]', '[role="listitem"]'];
  let items = [];
  for (const sel of candidates) {
    const found = document.querySelectorAll(sel);
    if (found.length > 0) { items = Array.from(found); break; }
  }
  const pick = (el, sels) => {
    for (const s of sels) {
      const n = el.querySelector(s);
      if (n && n.textContent && n.textContent.trim()) { return n.textContent.trim(); }
    }
    return '';
  };
  return items.slice(0, limit).map((el) => ({
    name: pick(el, ['.name', '[class*="name"]']) || 'Unknown',
    phone: pick(el, ['[class*="phone"]', '[class*="number"]']),
    timestamp: pick(el, ['time', '[class*="time"]', '[class*="date"]']),
    duration: pick(el, ['[class*="duration"]']),
    transcript: pick(el, ['[class*="transcript"]', '.transcription'])
  }));
}"#;

/// Pure DOM presence check: signed-in chrome present, sign-in link absent.
pub const IS_LOGGED_IN: &str = r#"function () {
  const avatar = document.querySelector('[aria-label*="account" i], [aria-label*="profile" i]');
  const signIn = document.querySelector('a[href*="ServiceLogin"], [aria-label*="sign in" i]');
  return !!avatar && !signIn;
}"#;

/// Scrapes identity from the account chrome. The aria-label convention is
/// "Account: Name (email)".
pub const CURRENT_USER: &str = r#"function () {
  const el = document.querySelector('[aria-label*="account" i]');
  if (!el) { return { logged_in: false, name: '', email: '' }; }
  const label = el.getAttribute('aria-label') || '';
  const m = label.match(/:\s*([^(]+)\(([^)]+)\)/);
  return {
    logged_in: true,
    name: m ? m[1].trim() : '',
    email: m ? m[2].trim() : ''
  };
}"#;

/// Fills the page search box (native setter so the SPA sees the input
/// event) and scrapes whatever result items are currently rendered.
pub const SEARCH: &str = r#"function (query, limit) {
  const setVal = (el, v) => {
    const desc = Object.getOwnPropertyDescriptor(HTMLInputElement.prototype, 'value');
    if (desc && desc.set) { desc.set.call(el, v); } else { el.value = v; }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
  };
  const box = document.querySelector('input[type="search"], input[aria-label*="search" i], input[placeholder*="search" i]');
  if (!box) { return []; }
  setVal(box, query);
  const pick = (el, sels) => {
    for (const s of sels) {
      const n = el.querySelector(s);
      if (n && n.textContent && n.textContent.trim()) { return n.textContent.trim(); }
    }
    return '';
  };
  const items = document.querySelectorAll('[class*="search-result"], [role="option"], [role="listitem"]');
  return Array.from(items).slice(0, limit).map((el) => ({
    name: pick(el, ['.name', '[class*="name"]']) || 'Unknown',
    phone: pick(el, ['[class*="phone"]', '[class*="number"]']),
    snippet: pick(el, ['.snippet', '[class*="snippet"]'])
  }));
}"#;

/// Diagnostic snapshot of the page structure. Never throws; every section
/// degrades to an empty array.
pub const DUMP_DOM: &str = r#"function (maxElements) {
  const attr = (el, a) => el.getAttribute(a) || '';
  const txt = (el, n) => ((el.textContent || '').trim()).substring(0, n);
  const grab = (sel, n) => Array.from(document.querySelectorAll(sel))
    .slice(0, n)
    .map((el) => txt(el, 40) || attr(el, 'aria-label'))
    .filter((t) => t.length > 0);
  const elements = Array.from(document.querySelectorAll('button, a[href], input, [role="button"], [role="tab"], [role="listitem"]'))
    .slice(0, maxElements)
    .map((el) => ({
      tag: el.tagName.toLowerCase(),
      id: attr(el, 'id'),
      classes: '' + (el.className.baseVal !== undefined ? el.className.baseVal : el.className),
      aria_label: attr(el, 'aria-label'),
      text: txt(el, 60)
    }));
  return {
    url: window.location.href,
    title: document.title,
    has_app_root: !!document.querySelector('gv-app, #app, [data-app-root]'),
    nav_items: grab('nav a, [role="navigation"] a, gv-nav-item', 20),
    buttons: grab('button, [role="button"]', 30),
    inputs: Array.from(document.querySelectorAll('input, textarea'))
      .slice(0, 20)
      .map((el) => attr(el, 'aria-label') || attr(el, 'placeholder') || attr(el, 'name'))
      .filter((t) => t.length > 0),
    elements: elements
  };
}"#;

/// Readiness probe for the call flow: calls view loaded, a call/dial
/// control rendered, document past the loading state.
pub const DIALER_READY: &str = r#"function () {
  if (document.readyState !== 'interactive' && document.readyState !== 'complete') { return false; }
  if (window.location.pathname.indexOf('calls') < 0) { return false; }
  for (const el of document.querySelectorAll('button, [role="button"]')) {
    const label = ((el.getAttribute('aria-label') || '') + ' ' + (el.textContent || '')).toLowerCase();
    if (label.indexOf('call') >= 0 || label.indexOf('dial') >= 0) { return true; }
  }
  return false;
}"#;

/// Readiness probe for the SMS flow: a recipient input is rendered.
pub const COMPOSE_READY: &str = r#"function () {
  return !!document.querySelector('input[aria-label*="recipient" i], input[placeholder*="name or number" i], input[type="tel"]');
}"#;

/// Blank-page heuristic used by the self-healing reload: a wedged renderer
/// leaves the body with no children.
pub const BLANK_PAGE: &str = r#"function () {
  return !document.body || document.body.childElementCount === 0;
}"#;

/// Scans visible, enabled controls for a keyword match on text/aria-label
/// and clicks the first hit, then falls back to CSS selectors. Returns a
/// tagged string: `clicked:<how>:<detail>` or `not-found:<sample>` with a
/// sample of visible control text for diagnosis.
pub const CLICK_CONTROL: &str = r#"function (keywords, fallbacks) {
  const visible = (el) => {
    const r = el.getBoundingClientRect();
    const st = window.getComputedStyle(el);
    return r.width > 0 && r.height > 0 && st.visibility !== 'hidden' && st.display !== 'none';
  };
  const enabled = (el) => !el.disabled && el.getAttribute('aria-disabled') !== 'true';
  const controls = Array.from(document.querySelectorAll('button, [role="button"], a[href]'))
    .filter((el) => visible(el) && enabled(el));
  for (const el of controls) {
    const label = (el.getAttribute('aria-label') || '').trim().toLowerCase();
    const text = (el.textContent || '').trim().toLowerCase();
    for (const kw of keywords) {
      const k = kw.toLowerCase();
      if (label === k || text === k || label.indexOf(k) >= 0 || text.indexOf(k) >= 0) {
        el.click();
        return 'clicked:' + (label.indexOf(k) >= 0 ? 'aria' : 'text') + ':' + kw;
      }
    }
  }
  for (const sel of fallbacks) {
    const el = document.querySelector(sel);
    if (el && visible(el)) {
      el.click();
      return 'clicked:selector:' + sel;
    }
  }
  const sample = controls
    .slice(0, 8)
    .map((el) => (el.getAttribute('aria-label') || el.textContent || '').trim())
    .filter((t) => t.length > 0)
    .join('|');
  return 'not-found:' + sample.substring(0, 160);
}"#;

/// Fills the SMS recipient and body fields through the native value setter
/// so the SPA's change detection fires. Returns a tagged string describing
/// how far it got.
pub const FILL_SMS: &str = r#"function (number, text) {
  const setVal = (el, v) => {
    const proto = el.tagName === 'TEXTAREA' ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
    const desc = Object.getOwnPropertyDescriptor(proto, 'value');
    if (desc && desc.set) { desc.set.call(el, v); } else { el.value = v; }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
  };
  const to = document.querySelector('input[aria-label*="recipient" i], input[placeholder*="name or number" i], input[type="tel"]');
  if (!to) { return 'not-found:recipient'; }
  setVal(to, number);
  to.dispatchEvent(new KeyboardEvent('keydown', { key: 'Enter', bubbles: true }));
  const body = document.querySelector('textarea, [contenteditable="true"], input[aria-label*="message" i]');
  if (!body) { return 'filled:recipient-only'; }
  if (body.isContentEditable) {
    body.textContent = text;
    body.dispatchEvent(new Event('input', { bubbles: true }));
  } else {
    setVal(body, text);
  }
  return 'filled:recipient-and-body';
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_are_function_expressions() {
        let all = [
            UNREAD_BADGES,
            LIST_MESSAGES,
            LIST_CONTACTS,
            LIST_CALLS,
            LIST_VOICEMAILS,
            IS_LOGGED_IN,
            CURRENT_USER,
            SEARCH,
            DUMP_DOM,
            DIALER_READY,
            COMPOSE_READY,
            BLANK_PAGE,
            CLICK_CONTROL,
            FILL_SMS,
        ];
        for tpl in all {
            assert!(tpl.starts_with("function"), "template must be a function expression");
            assert!(tpl.ends_with('}'), "template must close its function body");
        }
    }

    #[test]
    fn click_control_reports_both_tagged_forms() {
        assert!(CLICK_CONTROL.contains("'clicked:'"));
        assert!(CLICK_CONTROL.contains("'not-found:'"));
    }
}
