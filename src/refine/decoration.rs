//! Underline and strikethrough detection.
//!
//! Some producers draw text decorations as separate hairline rectangles
//! instead of using a font attribute. A hairline lying inside a text's
//! horizontal span is folded into the text as a flag and removed from the
//! page.

use super::RefineOptions;
use crate::geometry::Bounds;
use crate::model::Element;

/// Which decoration a hairline represents for a given text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Underline,
    Linethrough,
}

/// Classify `rule` against `text`, if it decorates it at all.
///
/// The rule must lie within the text horizontally. A rule whose top falls
/// between the text's vertical center and just below its bottom edge is an
/// underline; one close to the vertical center is a strikethrough.
pub fn classify(text: &Bounds, rule: &Bounds, options: &RefineOptions) -> Option<Decoration> {
    if !text.is_finite() || !rule.is_finite() || !rule.within_horizontally(text) {
        return None;
    }

    let center = text.center_y();
    let bottom = text.bottom();

    if rule.top >= center && rule.top <= bottom + options.underline_margin {
        Some(Decoration::Underline)
    } else if (rule.top - center).abs() <= options.linethrough_margin {
        Some(Decoration::Linethrough)
    } else {
        None
    }
}

/// Attach decorations to texts and remove the consumed hairlines.
///
/// Texts are visited in order; each takes the first unconsumed hairline
/// that decorates it. A consumed hairline is unavailable to every other
/// text. A text already carrying a decoration takes no further hairline.
/// Hairlines that decorate nothing stay on the page unchanged.
pub fn attach_decorations(mut items: Vec<Element>, options: &RefineOptions) -> Vec<Element> {
    let hairlines: Vec<(usize, Bounds)> = items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| item.as_rect().map(|r| (idx, r.bounds())))
        .filter(|(_, b)| b.height < options.hairline_height)
        .collect();

    if hairlines.is_empty() {
        return items;
    }

    let mut consumed = vec![false; items.len()];
    let mut attached = 0usize;

    for item in items.iter_mut() {
        let Some(text) = item.as_text_mut() else {
            continue;
        };
        if text.is_decorated() {
            continue;
        }
        let text_bounds = text.bounds();

        let found = hairlines.iter().find_map(|(idx, rule)| {
            if consumed[*idx] {
                return None;
            }
            classify(&text_bounds, rule, options).map(|decoration| (*idx, decoration))
        });

        if let Some((idx, decoration)) = found {
            match decoration {
                Decoration::Underline => text.underline = true,
                Decoration::Linethrough => text.linethrough = true,
            }
            consumed[idx] = true;
            attached += 1;
        }
    }

    log::debug!("attach_decorations: folded {} hairline(s) into text", attached);

    if attached == 0 {
        return items;
    }

    items
        .into_iter()
        .zip(consumed)
        .filter_map(|(item, used)| if used { None } else { Some(item) })
        .collect()
}
