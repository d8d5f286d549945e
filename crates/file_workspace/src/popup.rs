//! Viewport-aware placement for the hover preview popup.
//!
//! Placement is computed once when the popup opens and is not recomputed on scroll.

use workspace_host::{AnchorRect, ViewportSize};

use crate::{config::PopupConfig, model::PopupPlacement};

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Places the popup for `anchor` with the default [`PopupConfig`].
pub fn place(anchor: AnchorRect, viewport: ViewportSize) -> PopupPlacement {
    place_with(&PopupConfig::default(), anchor, viewport)
}

/// Places the popup above `anchor`, flipping below when the space above is too small, and keeps
/// the result inside the viewport minus the margin on every side.
///
/// Width follows the anchor's width clamped to `[min_width, max_width]`. Both dimensions shrink
/// when the viewport is too small to hold them.
pub fn place_with(
    config: &PopupConfig,
    anchor: AnchorRect,
    viewport: ViewportSize,
) -> PopupPlacement {
    let viewport_w = finite_or_zero(viewport.width).max(0.0);
    let viewport_h = finite_or_zero(viewport.height).max(0.0);
    let margin = finite_or_zero(config.margin).max(0.0);
    let margin_x = margin.min(viewport_w / 2.0);
    let margin_y = margin.min(viewport_h / 2.0);
    let room_w = viewport_w - 2.0 * margin_x;
    let room_h = viewport_h - 2.0 * margin_y;

    let min_width = finite_or_zero(config.min_width.min(config.max_width)).max(0.0);
    let max_width = finite_or_zero(config.max_width.max(config.min_width)).max(min_width);
    let anchor = AnchorRect {
        left: finite_or_zero(anchor.left),
        top: finite_or_zero(anchor.top),
        width: finite_or_zero(anchor.width).max(0.0),
        height: finite_or_zero(anchor.height).max(0.0),
    };

    let width = anchor.width.clamp(min_width, max_width).min(room_w);
    let height = finite_or_zero(config.height).max(0.0).min(room_h);

    let centered_x = anchor.center_x() - width / 2.0;
    let x = centered_x.clamp(margin_x, (margin_x + room_w - width).max(margin_x));

    let above = anchor.top - margin - height;
    let preferred_y = if above >= margin_y {
        above
    } else {
        anchor.bottom() + margin
    };
    let y = preferred_y.clamp(margin_y, (margin_y + room_h - height).max(margin_y));

    PopupPlacement {
        x,
        y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn rect(left: f64, top: f64, width: f64, height: f64) -> AnchorRect {
        AnchorRect {
            left,
            top,
            width,
            height,
        }
    }

    fn viewport(width: f64, height: f64) -> ViewportSize {
        ViewportSize { width, height }
    }

    #[test]
    fn bottom_right_anchor_goes_above_and_left_within_margin() {
        let placement = place(rect(800.0, 760.0, 200.0, 40.0), viewport(1000.0, 800.0));

        assert_eq!(placement.width, 300.0);
        assert_eq!(placement.height, 320.0);
        assert_eq!(placement.x, 1000.0 - 20.0 - 300.0);
        assert_eq!(placement.y, 760.0 - 20.0 - 320.0);
    }

    #[test]
    fn anchor_near_top_flips_below() {
        let placement = place(rect(100.0, 40.0, 350.0, 30.0), viewport(1000.0, 800.0));

        assert_eq!(placement.width, 350.0);
        assert_eq!(placement.y, 40.0 + 30.0 + 20.0);
        assert_eq!(placement.x, 100.0);
    }

    #[test]
    fn popup_centers_on_the_row_and_ignores_non_finite_geometry() {
        let centered = place(rect(400.0, 500.0, 320.0, 30.0), viewport(1000.0, 800.0));
        assert_eq!(centered.x, 400.0);
        assert_eq!(centered.y, 160.0);

        let broken = place(
            rect(f64::NAN, 500.0, 320.0, f64::INFINITY),
            viewport(1000.0, 800.0),
        );
        assert_eq!(broken.x, 20.0);
        assert_eq!(broken.y, 160.0);
        assert_eq!(broken.width, 320.0);
    }

    #[test]
    fn width_is_clamped_to_bounds() {
        let wide = place(rect(0.0, 500.0, 900.0, 30.0), viewport(1000.0, 800.0));
        assert_eq!(wide.width, 400.0);
        assert_eq!(wide.x, 450.0 - 200.0);

        let narrow = place(rect(0.0, 500.0, 10.0, 30.0), viewport(1000.0, 800.0));
        assert_eq!(narrow.width, 300.0);
        assert_eq!(narrow.x, 20.0);
    }

    #[test]
    fn tiny_viewport_shrinks_popup_instead_of_overflowing() {
        let placement = place(rect(10.0, 10.0, 50.0, 20.0), viewport(200.0, 150.0));
        assert_eq!(placement.width, 160.0);
        assert_eq!(placement.height, 110.0);
        assert_eq!(placement.x, 20.0);
        assert_eq!(placement.y, 20.0);
    }

    #[test]
    fn placement_always_stays_inside_the_viewport() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let vp = viewport(rng.gen_range(0.0..2_000.0), rng.gen_range(0.0..1_500.0));
            let anchor = rect(
                rng.gen_range(-200.0..2_200.0),
                rng.gen_range(-200.0..1_700.0),
                rng.gen_range(0.0..800.0),
                rng.gen_range(0.0..120.0),
            );
            let p = place(anchor, vp);
            assert!(p.x >= 0.0 && p.y >= 0.0, "{anchor:?} {vp:?} -> {p:?}");
            assert!(p.x + p.width <= vp.width + 1e-9, "{anchor:?} {vp:?} -> {p:?}");
            assert!(p.y + p.height <= vp.height + 1e-9, "{anchor:?} {vp:?} -> {p:?}");
        }
    }
}
