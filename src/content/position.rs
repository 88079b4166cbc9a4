use crate::models::{MenuPosition, Viewport};

/// Keep one axis of the menu inside the viewport.
///
/// A menu that cannot fit (including padding on both sides) is pinned to the
/// leading padded edge instead of being clamped off-screen.
fn clamp_axis(anchor: f64, size: f64, scroll: f64, viewport: f64, padding: f64) -> f64 {
    let min = scroll + padding;
    if size + padding * 2.0 > viewport {
        return min;
    }
    let max = scroll + viewport - size - padding;
    anchor.max(min).min(max)
}

/// Final page position of a menu anchored at `(anchor_x, anchor_y)`.
pub(crate) fn clamp_menu_position(
    anchor_x: f64,
    anchor_y: f64,
    menu_width: f64,
    menu_height: f64,
    viewport: Viewport,
    padding: f64,
) -> MenuPosition {
    MenuPosition {
        left: clamp_axis(anchor_x, menu_width, viewport.scroll_x, viewport.width, padding),
        top: clamp_axis(anchor_y, menu_height, viewport.scroll_y, viewport.height, padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        scroll_x: 0.0,
        scroll_y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_anchor_inside_viewport_is_kept() {
        let p = clamp_menu_position(100.0, 200.0, 180.0, 240.0, VP, 12.0);
        assert_eq!(p, MenuPosition { left: 100.0, top: 200.0 });
    }

    #[test]
    fn test_clamped_at_far_edges() {
        let p = clamp_menu_position(790.0, 590.0, 180.0, 240.0, VP, 12.0);
        assert_eq!(p, MenuPosition { left: 800.0 - 180.0 - 12.0, top: 600.0 - 240.0 - 12.0 });
    }

    #[test]
    fn test_clamped_at_near_edges() {
        let p = clamp_menu_position(2.0, 0.0, 180.0, 240.0, VP, 12.0);
        assert_eq!(p, MenuPosition { left: 12.0, top: 12.0 });
    }

    #[test]
    fn test_scroll_offset_shifts_bounds() {
        let vp = Viewport {
            scroll_x: 50.0,
            scroll_y: 1000.0,
            ..VP
        };
        let p = clamp_menu_position(10.0, 1590.0, 180.0, 240.0, vp, 12.0);
        assert_eq!(p, MenuPosition { left: 62.0, top: 1000.0 + 600.0 - 240.0 - 12.0 });
    }

    #[test]
    fn test_oversized_menu_is_pinned_not_negative() {
        let p = clamp_menu_position(400.0, 300.0, 900.0, 700.0, VP, 12.0);
        assert_eq!(p, MenuPosition { left: 12.0, top: 12.0 });

        // Fits without padding but not with it: still pinned.
        let p = clamp_menu_position(400.0, 300.0, 790.0, 100.0, VP, 12.0);
        assert_eq!(p.left, 12.0);
        assert_eq!(p.top, 300.0);
    }

    #[test]
    fn test_axes_are_independent() {
        let p = clamp_menu_position(700.0, 300.0, 900.0, 100.0, VP, 12.0);
        assert_eq!(p, MenuPosition { left: 12.0, top: 300.0 });
    }
}
