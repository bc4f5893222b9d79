//! Small numeric helpers for chart series
//!
//! Supplemental utilities for library consumers that shape data before it is
//! charted. The seal in [`crate::integrity`] does not depend on them.

/// Scale every point by the series maximum
///
/// Returns all zeros when the maximum is not positive.
pub fn normalize_data_points(data: &[f64]) -> Vec<f64> {
    let max_value = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    data.iter()
        .map(|value| if max_value > 0.0 { value / max_value } else { 0.0 })
        .collect()
}

/// Three-point moving average; edge points stand in for their missing neighbour
pub fn trend_line(data: &[f64]) -> Vec<f64> {
    (0..data.len())
        .map(|i| {
            let current = data[i];
            let previous = i.checked_sub(1).map_or(current, |p| data[p]);
            let next = data.get(i + 1).copied().unwrap_or(current);
            (current + previous + next) / 3.0
        })
        .collect()
}

/// `count` evenly spaced hues as CSS `hsl()` colors
pub fn color_palette(count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }

    let hue_step = 360.0 / count as f64;
    (0..count)
        .map(|i| format!("hsl({}, 70%, 50%)", i as f64 * hue_step))
        .collect()
}
