/// One-shot page-load initialization.
///
/// Applies the declarative behaviors the dashboard templates opt into with
/// class markers and `data-*` attributes:
///
/// - `.animate-number`: count up to `data-value` (or the current text)
/// - `.card`: staggered fade-in by document position
/// - `.dynamic-width`: inline width from `data-width`
/// - `.dynamic-badge`: tinted background and border from `data-color`
use crate::config::schema::UiConfig;
use crate::format::parse_int_prefix;

use super::Page;

pub const ANIMATE_NUMBER_CLASS: &str = "animate-number";
pub const CARD_CLASS: &str = "card";
pub const FADE_IN_CLASS: &str = "fade-in";
pub const DYNAMIC_WIDTH_CLASS: &str = "dynamic-width";
pub const DYNAMIC_BADGE_CLASS: &str = "dynamic-badge";

/// Hex alpha suffix giving badge backgrounds 20% opacity.
const BADGE_ALPHA_SUFFIX: &str = "20";

/// What [`initialize_page`] touched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InitSummary {
    pub animated: usize,
    pub cards: usize,
    pub widths: usize,
    pub badges: usize,
}

/// Run the page-load initializers once. Animations start at `now_ms`.
pub fn initialize_page(page: &mut Page, ui: &UiConfig, now_ms: f64) -> InitSummary {
    let mut summary = InitSummary::default();
    let duration_ms = ui.animation_duration_ms as f64;

    for node in page.query_class(ANIMATE_NUMBER_CLASS) {
        let target = page.get(node).and_then(|el| {
            let source = el.dataset("value").unwrap_or(el.text.as_str());
            parse_int_prefix(source)
        });
        if let Some(target) = target {
            page.animate_number(node, target, duration_ms, now_ms);
            summary.animated += 1;
        }
    }

    for (index, node) in page.query_class(CARD_CLASS).into_iter().enumerate() {
        if let Some(card) = page.get_mut(node) {
            let delay_ms = index as u64 * ui.card_stagger_ms;
            card.set_style("animation-delay", css_seconds(delay_ms));
            card.add_class(FADE_IN_CLASS);
            summary.cards += 1;
        }
    }

    for node in page.query_class(DYNAMIC_WIDTH_CLASS) {
        if let Some(el) = page.get_mut(node)
            && let Some(width) = el.dataset("width").map(str::to_string)
        {
            el.set_style("width", width);
            summary.widths += 1;
        }
    }

    for node in page.query_class(DYNAMIC_BADGE_CLASS) {
        if let Some(el) = page.get_mut(node)
            && let Some(color) = el.dataset("color").map(str::to_string)
        {
            el.set_style("background-color", format!("{color}{BADGE_ALPHA_SUFFIX}"));
            el.set_style("border", format!("2px solid {color}"));
            summary.badges += 1;
        }
    }

    summary
}

/// Render a millisecond delay as a CSS seconds value (`0s`, `0.1s`, `1.25s`).
fn css_seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return format!("{whole}s");
    }
    let frac = format!("{frac:03}");
    format!("{whole}.{}s", frac.trim_end_matches('0'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
