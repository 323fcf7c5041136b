//! JavaScript generation for locator-based DOM operations
//!
//! Every script resolves its locator afresh and evaluates to `null` when
//! nothing matches, which the CDP driver maps to an element-not-found error.

use crate::locator::Locator;

const VISIBLE_FN: &str = "const visible = (e) => { \
    if (!e || !e.isConnected) return false; \
    const s = window.getComputedStyle(e); \
    if (s.visibility === 'hidden' || s.display === 'none') return false; \
    const r = e.getBoundingClientRect(); \
    return r.width > 0 && r.height > 0; };";

const HIGHLIGHT_STYLE: &str = "3px solid #ff2d55";

/// Script builder for one locator
#[derive(Debug, Clone)]
pub struct ScriptBuilder<'a> {
    locator: &'a Locator,
}

impl<'a> ScriptBuilder<'a> {
    pub fn new(locator: &'a Locator) -> Self {
        Self { locator }
    }

    /// JSON-encode a string into a JS string literal
    pub fn js_str(s: &str) -> String {
        serde_json::Value::String(s.to_string()).to_string()
    }

    /// Expression evaluating to the element, or null
    pub fn element_query(&self) -> String {
        let selector = Self::js_str(self.locator.selector());
        match self.locator.index() {
            Some(i) => format!("(document.querySelectorAll({})[{}] || null)", selector, i),
            None => format!("document.querySelector({})", selector),
        }
    }

    /// Expression evaluating to an array of all matches
    pub fn elements_query(&self) -> String {
        let selector = Self::js_str(self.locator.selector());
        match self.locator.index() {
            Some(i) => format!(
                "Array.from(document.querySelectorAll({})).slice({}, {})",
                selector,
                i,
                i + 1
            ),
            None => format!("Array.from(document.querySelectorAll({}))", selector),
        }
    }

    /// Run `body` with the element bound to `el`; null when absent
    pub fn on_element(&self, body: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) return null; {} }})()",
            self.element_query(),
            body
        )
    }

    pub fn count(&self) -> String {
        format!("{}.length", self.elements_query())
    }

    pub fn is_visible(&self) -> String {
        format!("(() => {{ {} return visible({}); }})()", VISIBLE_FN, self.element_query())
    }

    pub fn is_enabled(&self) -> String {
        self.on_element("return !el.disabled && el.getAttribute('aria-disabled') !== 'true';")
    }

    pub fn is_checked(&self) -> String {
        self.on_element("return !!el.checked;")
    }

    pub fn inner_text(&self) -> String {
        self.on_element("return (el.innerText ?? el.textContent ?? '').trim();")
    }

    pub fn all_inner_texts(&self) -> String {
        format!(
            "{}.map((el) => (el.innerText ?? el.textContent ?? '').trim())",
            self.elements_query()
        )
    }

    pub fn input_value(&self) -> String {
        self.on_element("return el.value ?? '';")
    }

    /// Scroll into view and return the centre point `{x, y}`
    pub fn scroll_and_center(&self) -> String {
        self.on_element(
            "el.scrollIntoView({block: 'center', inline: 'center'}); \
             const r = el.getBoundingClientRect(); \
             return {x: r.left + r.width / 2, y: r.top + r.height / 2};",
        )
    }

    pub fn scroll_into_view(&self) -> String {
        self.on_element("el.scrollIntoView({block: 'center', inline: 'center'}); return true;")
    }

    /// Set the value through the native setter so framework bindings see the change
    pub fn fill(&self, value: &str) -> String {
        self.on_element(&format!(
            "el.focus(); \
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype; \
             const setter = Object.getOwnPropertyDescriptor(proto, 'value').set; \
             setter.call(el, {}); \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             return true;",
            Self::js_str(value)
        ))
    }

    /// Focus and put the caret at the end
    pub fn focus_end(&self) -> String {
        self.on_element(
            "el.focus(); \
             if (typeof el.setSelectionRange === 'function' && typeof el.value === 'string') { \
               try { el.setSelectionRange(el.value.length, el.value.length); } catch (_) {} \
             } \
             return true;",
        )
    }

    /// Select by option value; evaluates to false when the option is missing
    pub fn select_option(&self, value: &str) -> String {
        self.on_element(&format!(
            "const v = {}; \
             if (!Array.from(el.options || []).some((o) => o.value === v)) return false; \
             el.value = v; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             return true;",
            Self::js_str(value)
        ))
    }

    pub fn set_checked(&self, checked: bool) -> String {
        self.on_element(&format!(
            "if (!!el.checked !== {}) el.click(); return !!el.checked;",
            checked
        ))
    }

    pub fn set_highlight(&self, on: bool) -> String {
        if on {
            self.on_element(&format!(
                "el.dataset.paylinkOutline = el.style.outline; el.style.outline = '{}'; return true;",
                HIGHLIGHT_STYLE
            ))
        } else {
            self.on_element(
                "el.style.outline = el.dataset.paylinkOutline || ''; delete el.dataset.paylinkOutline; return true;",
            )
        }
    }
}
