//! Pure calculation functions for icon geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale `source` to fit inside a `target`×`target` square, preserving aspect.
///
/// Each side is rounded to the nearest pixel and kept within `1..=target`.
/// Smaller sources are scaled up: the longer edge always meets the box.
///
/// # Examples
/// ```
/// # use iconsmith::imaging::fit_within;
/// // 800x600 into 32 → 32x24
/// assert_eq!(fit_within((800, 600), 32), (32, 24));
///
/// // Square source fills the box exactly
/// assert_eq!(fit_within((100, 100), 512), (512, 512));
/// ```
pub fn fit_within(source: (u32, u32), target: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return (target, target);
    }

    let scale = f64::min(
        target as f64 / src_w as f64,
        target as f64 / src_h as f64,
    );
    let w = (src_w as f64 * scale).round() as u32;
    let h = (src_h as f64 * scale).round() as u32;
    (w.clamp(1, target), h.clamp(1, target))
}

/// Top-left offset that centres `inner` inside `outer` (floored).
pub fn center_offset(inner: (u32, u32), outer: u32) -> (u32, u32) {
    (
        outer.saturating_sub(inner.0) / 2,
        outer.saturating_sub(inner.1) / 2,
    )
}

/// Symmetric padding that places an `icon`-sized square in a `canvas`.
///
/// `round((canvas - icon) / 2)`, so the safe-zone ratio stays correct when
/// either dimension changes. Callers validate that the margin is even.
pub fn maskable_padding(canvas: u32, icon: u32) -> u32 {
    (canvas.saturating_sub(icon) as f64 / 2.0).round() as u32
}
