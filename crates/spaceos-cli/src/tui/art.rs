//! ASCII art pieces drawn inside the dashboard columns.

/// Area chart with one column per data point, growing upward.
///
/// Row `y` (0 = top) marks a point with `*` when the value reaches that row's
/// threshold `min + (height - y - 1) * range / height`, where
/// `range = max(1, max - min)` over the series.
pub fn ascii_graph(data: &[i32], height: usize) -> Vec<String> {
    let (Some(&min), Some(&max)) = (data.iter().min(), data.iter().max()) else {
        return vec![String::new(); height];
    };
    let range = (max - min).max(1) as f64;

    (0..height)
        .map(|y| {
            let threshold = min as f64 + (height - y - 1) as f64 * range / height as f64;
            data.iter()
                .map(|&v| if v as f64 >= threshold { '*' } else { ' ' })
                .collect()
        })
        .collect()
}

/// Horizontal gauge for a percentage: `width` cells, filled with `#`
/// proportionally to `value` (clamped to 0–100).
pub fn ascii_bar(value: i32, width: usize) -> String {
    let filled = value.clamp(0, 100) as usize * width / 100;
    let mut bar = "#".repeat(filled);
    bar.push_str(&" ".repeat(width - filled));
    bar
}

/// Decorative globe: `size` rows by `2 * size` columns. A cell is textured
/// with `.` when it lies within `size / 2` of the center `(size, size / 2)`
/// and `(x + y) % 3 == 0`.
pub fn ascii_globe(size: usize) -> Vec<String> {
    let radius = size as f64 / 2.0;
    let (cx, cy) = (size as f64, radius);

    (0..size)
        .map(|y| {
            (0..size * 2)
                .map(|x| {
                    let distance = (x as f64 - cx).hypot(y as f64 - cy);
                    if distance <= radius && (x + y) % 3 == 0 {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}
