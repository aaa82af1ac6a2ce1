//! Keyframe sampling: resolve the property values an effect produces at a
//! given (already eased) progress.
//!
//! Offsets follow the platform rules: an explicit numeric `offset` property is
//! honoured, the first and last frames default to 0 and 1, and frames without
//! an offset are spaced evenly between their known neighbours. Each property is
//! sampled over only the frames that mention it.
//!
//! Values interpolate numerically when both ends share the same shape once
//! their numbers are blanked out (`translateX(-100%)` vs `translateX(0%)`);
//! otherwise they switch discretely at the halfway point.

use indexmap::IndexMap;

use crate::descriptor::{Keyframe, KeyframeValue};

const OFFSET_KEY: &str = "offset";
const EASING_KEY: &str = "easing";
const COMPOSITE_KEY: &str = "composite";

#[inline]
fn is_timing_key(name: &str) -> bool {
    name == OFFSET_KEY || name == EASING_KEY || name == COMPOSITE_KEY
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Computed offset of every frame in `frames`.
pub fn compute_offsets(frames: &[Keyframe]) -> Vec<f64> {
    let len = frames.len();
    let mut offsets: Vec<Option<f64>> = frames
        .iter()
        .map(|f| f.get(OFFSET_KEY).and_then(|v| v.trim().parse::<f64>().ok()))
        .collect();

    match len {
        0 => return Vec::new(),
        1 => {
            return vec![offsets[0].unwrap_or(1.0)];
        }
        _ => {}
    }
    if offsets[0].is_none() {
        offsets[0] = Some(0.0);
    }
    if offsets[len - 1].is_none() {
        offsets[len - 1] = Some(1.0);
    }

    // Fill gaps between known offsets evenly.
    let mut prev_known = 0usize;
    for idx in 1..len {
        if let Some(end) = offsets[idx] {
            let gap = idx - prev_known;
            if gap > 1 {
                let start = offsets[prev_known].unwrap_or(0.0);
                for step in 1..gap {
                    let t = step as f64 / gap as f64;
                    offsets[prev_known + step] = Some(lerp_f64(start, end, t));
                }
            }
            prev_known = idx;
        }
    }

    offsets.into_iter().map(|o| o.unwrap_or(0.0)).collect()
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Number(f64),
}

/// Split a CSS value into literal text and numbers.
fn tokenize(value: &str) -> Vec<Token<'_>> {
    let bytes = value.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        let prev_is_word = i > 0 && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b')');
        let starts_number = c.is_ascii_digit()
            || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
            || ((c == b'-' || c == b'+')
                && !prev_is_word
                && bytes
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_digit() || *n == b'.'));
        // Digits glued to a word (e.g. `translate3d`) stay literal text.
        let glued = i > 0 && bytes[i - 1].is_ascii_alphanumeric() && c.is_ascii_digit();

        if starts_number && !glued {
            let mut end = i + 1;
            let mut seen_dot = c == b'.';
            while end < bytes.len() {
                let d = bytes[end];
                if d.is_ascii_digit() {
                    end += 1;
                } else if d == b'.' && !seen_dot {
                    seen_dot = true;
                    end += 1;
                } else {
                    break;
                }
            }
            match value[i..end].parse::<f64>() {
                Ok(n) => {
                    if text_start < i {
                        tokens.push(Token::Text(&value[text_start..i]));
                    }
                    tokens.push(Token::Number(n));
                    text_start = end;
                    i = end;
                    continue;
                }
                Err(_) => {
                    i = end;
                    continue;
                }
            }
        }
        i += 1;
    }
    if text_start < bytes.len() {
        tokens.push(Token::Text(&value[text_start..]));
    }
    tokens
}

fn format_number(n: f64) -> String {
    let rounded = (n * 10_000.0).round() / 10_000.0;
    // Avoid "-0" after rounding.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Interpolate two CSS values at `t`.
pub fn interpolate_value(from: &str, to: &str, t: f64) -> String {
    let a = tokenize(from);
    let b = tokenize(to);
    let same_shape = a.len() == b.len()
        && a.iter().zip(&b).all(|pair| match pair {
            (Token::Text(x), Token::Text(y)) => x == y,
            (Token::Number(_), Token::Number(_)) => true,
            _ => false,
        })
        && a.iter().any(|tok| matches!(tok, Token::Number(_)));

    if !same_shape {
        return if t < 0.5 { from.to_string() } else { to.to_string() };
    }

    let mut out = String::with_capacity(from.len().max(to.len()));
    for pair in a.iter().zip(&b) {
        match pair {
            (Token::Text(x), _) => out.push_str(x),
            (Token::Number(x), Token::Number(y)) => out.push_str(&format_number(lerp_f64(*x, *y, t))),
            _ => {}
        }
    }
    out
}

/// Property values produced by `frames` at eased `progress`.
pub fn sample_keyframes(frames: &[Keyframe], progress: f64) -> Keyframe {
    let offsets = compute_offsets(frames);

    // Per property: (offset, value) in frame order.
    let mut tracks: IndexMap<&str, Vec<(f64, &str)>> = IndexMap::new();
    for (frame, offset) in frames.iter().zip(&offsets) {
        for (name, value) in frame.iter() {
            if is_timing_key(name) {
                continue;
            }
            tracks.entry(name).or_default().push((*offset, value));
        }
    }

    let mut out = Keyframe::new();
    for (name, points) in tracks {
        let value = sample_track(&points, progress);
        out.0.insert(name.to_string(), KeyframeValue::new(value));
    }
    out
}

fn sample_track(points: &[(f64, &str)], progress: f64) -> String {
    let Some(&(first_offset, first)) = points.first() else {
        return String::new();
    };
    if points.len() == 1 || progress <= first_offset {
        return first.to_string();
    }
    let Some(&(last_offset, last)) = points.last() else {
        return first.to_string();
    };
    if progress >= last_offset {
        return last.to_string();
    }

    for window in points.windows(2) {
        let (o0, v0) = window[0];
        let (o1, v1) = window[1];
        if progress >= o0 && progress <= o1 {
            let span = o1 - o0;
            if span <= 0.0 {
                return v1.to_string();
            }
            return interpolate_value(v0, v1, (progress - o0) / span);
        }
    }
    last.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(pairs: &[(&str, &str)]) -> Keyframe {
        pairs
            .iter()
            .fold(Keyframe::new(), |f, (k, v)| f.with(*k, *v))
    }

    #[test]
    fn tokenizes_signed_numbers_and_units() {
        assert_eq!(
            tokenize("translateX(-100%)"),
            vec![Token::Text("translateX("), Token::Number(-100.0), Token::Text("%)")]
        );
        assert_eq!(tokenize("ease-in"), vec![Token::Text("ease-in")]);
        assert_eq!(
            tokenize("translate3d(1px, 2px, 0)"),
            vec![
                Token::Text("translate3d("),
                Token::Number(1.0),
                Token::Text("px, "),
                Token::Number(2.0),
                Token::Text("px, "),
                Token::Number(0.0),
                Token::Text(")"),
            ]
        );
    }

    #[test]
    fn interpolates_matching_shapes() {
        assert_eq!(interpolate_value("translateX(-100%)", "translateX(0%)", 0.5), "translateX(-50%)");
        assert_eq!(interpolate_value("1", "0", 0.25), "0.75");
        assert_eq!(interpolate_value("rotate(0deg)", "rotate(360deg)", 1.0), "rotate(360deg)");
    }

    #[test]
    fn mismatched_shapes_switch_at_half() {
        assert_eq!(interpolate_value("rotate(0)", "rotate(360deg)", 0.49), "rotate(0)");
        assert_eq!(interpolate_value("rotate(0)", "rotate(360deg)", 0.5), "rotate(360deg)");
        assert_eq!(interpolate_value("block", "none", 0.7), "none");
    }

    #[test]
    fn offsets_fill_gaps_evenly() {
        let frames = vec![
            frame(&[("opacity", "0")]),
            frame(&[("opacity", "1")]),
            frame(&[("opacity", "0.5"), ("offset", "0.8")]),
            frame(&[("opacity", "0")]),
        ];
        let offsets = compute_offsets(&frames);
        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[1] - 0.4).abs() < 1e-9);
        assert!((offsets[2] - 0.8).abs() < 1e-9);
        assert_eq!(offsets[3], 1.0);
    }

    #[test]
    fn samples_each_property_over_its_own_frames() {
        let frames = vec![
            frame(&[("opacity", "1"), ("transform", "scale(1)")]),
            frame(&[("opacity", "0")]),
            frame(&[("transform", "scale(2)")]),
        ];
        let at_quarter = sample_keyframes(&frames, 0.25);
        assert_eq!(at_quarter.get("opacity"), Some("0.5"));
        assert_eq!(at_quarter.get("transform"), Some("scale(1.25)"));
        assert_eq!(at_quarter.get("offset"), None);

        let at_end = sample_keyframes(&frames, 1.0);
        assert_eq!(at_end.get("opacity"), Some("0"));
        assert_eq!(at_end.get("transform"), Some("scale(2)"));
    }
}
