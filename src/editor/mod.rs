use crate::models::{DragSession, DropPosition, DropTarget};

/// Where the item at `source` ends up when dropped on `target`.
///
/// Indices refer to the list before the move. Returns `None` when the move would
/// leave the list unchanged (including dropping a row onto itself), so callers can
/// skip the storage write.
pub(crate) fn move_destination(
    len: usize,
    source: usize,
    target: usize,
    position: DropPosition,
) -> Option<usize> {
    if source >= len || source == target {
        return None;
    }

    // Removing `source` first shifts everything after it one slot to the left.
    let mut dest = if source < target { target - 1 } else { target };
    if position == DropPosition::After {
        dest += 1;
    }
    let dest = dest.min(len - 1);

    if dest == source {
        None
    } else {
        Some(dest)
    }
}

/// Move the item at `source` before/after the item at `target`.
///
/// Always returns a permutation of `items`; a no-op move returns an equal copy.
pub(crate) fn reorder(
    items: &[String],
    source: usize,
    target: usize,
    position: DropPosition,
) -> Vec<String> {
    let mut next = items.to_vec();
    if let Some(dest) = move_destination(items.len(), source, target, position) {
        let moved = next.remove(source);
        next.insert(dest, moved);
    }
    next
}

/// Before/after decision by comparing the pointer with the row's vertical midpoint.
pub(crate) fn drop_position_for(pointer_y: f64, row_top: f64, row_height: f64) -> DropPosition {
    if pointer_y < row_top + row_height / 2.0 {
        DropPosition::Before
    } else {
        DropPosition::After
    }
}

/// Drop target used when the pointer is over the list but not over any row.
pub(crate) fn append_target(len: usize) -> Option<DropTarget> {
    len.checked_sub(1).map(|index| DropTarget {
        index,
        position: DropPosition::After,
    })
}

/// Hover target for a `dragover` on the list background.
///
/// Only the area below the last row appends. Anywhere above it (padding or the
/// seams between rows) keeps whatever row target the session already has.
pub(crate) fn background_target(
    session: &DragSession,
    len: usize,
    pointer_y: f64,
    last_row_bottom: Option<f64>,
) -> Option<DropTarget> {
    match last_row_bottom {
        Some(bottom) if pointer_y < bottom => session.hover,
        _ => append_target(len),
    }
}

/// Hover target for a row. The dragged row never becomes a target of itself.
pub(crate) fn hover_target(
    session: &DragSession,
    row_index: usize,
    position: DropPosition,
) -> Option<DropTarget> {
    if row_index == session.source {
        None
    } else {
        Some(DropTarget {
            index: row_index,
            position,
        })
    }
}

/// Result of dropping with the current session state; `None` leaves the list alone.
pub(crate) fn complete_drop(items: &[String], session: &DragSession) -> Option<Vec<String>> {
    let target = session.hover?;
    move_destination(items.len(), session.source, target.index, target.position)?;
    Some(reorder(items, session.source, target.index, target.position))
}

pub(crate) fn add_item(items: &[String], raw: &str) -> Option<Vec<String>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let mut next = items.to_vec();
    next.push(value.to_string());
    Some(next)
}

/// Replace the item at `index`; blank replacements and out-of-range indices are rejected.
pub(crate) fn edit_item(items: &[String], index: usize, raw: &str) -> Option<Vec<String>> {
    let value = raw.trim();
    if value.is_empty() || index >= items.len() {
        return None;
    }
    if items[index] == value {
        return None;
    }
    let mut next = items.to_vec();
    next[index] = value.to_string();
    Some(next)
}

pub(crate) fn delete_item(items: &[String], index: usize) -> Option<Vec<String>> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next.remove(index);
    Some(next)
}

/// Keyboard alternative to dragging: swap with the previous row.
pub(crate) fn move_up(items: &[String], index: usize) -> Option<Vec<String>> {
    if index == 0 {
        return None;
    }
    move_destination(items.len(), index, index - 1, DropPosition::Before)?;
    Some(reorder(items, index, index - 1, DropPosition::Before))
}

/// Keyboard alternative to dragging: swap with the next row.
pub(crate) fn move_down(items: &[String], index: usize) -> Option<Vec<String>> {
    move_destination(items.len(), index, index + 1, DropPosition::After)?;
    Some(reorder(items, index, index + 1, DropPosition::After))
}

#[cfg(test)]
mod tests {
    use super::*;
    use DropPosition::{After, Before};

    fn s(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| x.to_string()).collect()
    }

    fn sorted(mut xs: Vec<String>) -> Vec<String> {
        xs.sort();
        xs
    }

    #[test]
    fn test_move_first_to_end() {
        assert_eq!(reorder(&s(&["a", "b", "c"]), 0, 2, After), s(&["b", "c", "a"]));
    }

    #[test]
    fn test_move_last_to_front() {
        assert_eq!(reorder(&s(&["a", "b", "c"]), 2, 0, Before), s(&["c", "a", "b"]));
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let items = s(&["a", "b", "c"]);
        for i in 0..items.len() {
            assert_eq!(move_destination(3, i, i, Before), None);
            assert_eq!(move_destination(3, i, i, After), None);
            assert_eq!(reorder(&items, i, i, Before), items);
        }
    }

    #[test]
    fn test_drop_before_own_successor_is_noop() {
        assert_eq!(move_destination(3, 0, 1, Before), None);
        assert_eq!(move_destination(3, 1, 0, After), None);
    }

    #[test]
    fn test_adjacent_moves() {
        let items = s(&["a", "b", "c", "d"]);
        assert_eq!(reorder(&items, 1, 2, After), s(&["a", "c", "b", "d"]));
        assert_eq!(reorder(&items, 2, 1, Before), s(&["a", "c", "b", "d"]));
        assert_eq!(reorder(&items, 3, 0, After), s(&["a", "d", "b", "c"]));
        assert_eq!(reorder(&items, 0, 3, Before), s(&["b", "c", "a", "d"]));
    }

    #[test]
    fn test_reorder_is_always_a_permutation() {
        let items = s(&["a", "b", "b", "c", "d"]);
        for source in 0..items.len() {
            for target in 0..items.len() {
                for pos in [Before, After] {
                    let out = reorder(&items, source, target, pos);
                    assert_eq!(out.len(), items.len());
                    assert_eq!(sorted(out), sorted(items.clone()));
                }
            }
        }
    }

    #[test]
    fn test_destination_none_means_unchanged() {
        let items = s(&["a", "b", "c", "d"]);
        for source in 0..items.len() {
            for target in 0..items.len() {
                for pos in [Before, After] {
                    let out = reorder(&items, source, target, pos);
                    let changed = out != items;
                    assert_eq!(move_destination(items.len(), source, target, pos).is_some(), changed);
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_source_is_ignored() {
        let items = s(&["a", "b"]);
        assert_eq!(move_destination(2, 5, 0, Before), None);
        assert_eq!(reorder(&items, 5, 0, Before), items);
    }

    #[test]
    fn test_target_past_end_is_clamped() {
        assert_eq!(reorder(&s(&["a", "b", "c"]), 0, 7, After), s(&["b", "c", "a"]));
    }

    #[test]
    fn test_drop_position_uses_midpoint() {
        assert_eq!(drop_position_for(10.0, 0.0, 40.0), Before);
        assert_eq!(drop_position_for(19.9, 0.0, 40.0), Before);
        assert_eq!(drop_position_for(20.0, 0.0, 40.0), After);
        assert_eq!(drop_position_for(39.0, 0.0, 40.0), After);
    }

    #[test]
    fn test_background_drop_appends() {
        let items = s(&["a", "b", "c"]);
        let mut session = DragSession::start(0);
        session.hover = append_target(items.len());
        assert_eq!(complete_drop(&items, &session), Some(s(&["b", "c", "a"])));

        // Already last: appending is a no-op.
        let mut session = DragSession::start(2);
        session.hover = append_target(items.len());
        assert_eq!(complete_drop(&items, &session), None);

        assert_eq!(append_target(0), None);
    }

    #[test]
    fn test_hover_over_dragged_row_has_no_target() {
        let session = DragSession::start(1);
        assert_eq!(hover_target(&session, 1, Before), None);
        assert_eq!(
            hover_target(&session, 2, After),
            Some(DropTarget { index: 2, position: After })
        );
    }

    #[test]
    fn test_drop_without_hover_writes_nothing() {
        let items = s(&["a", "b"]);
        assert_eq!(complete_drop(&items, &DragSession::start(0)), None);
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let items = s(&["a"]);
        assert_eq!(add_item(&items, "  b  "), Some(s(&["a", "b"])));
        assert_eq!(add_item(&items, "   "), None);
        assert_eq!(add_item(&items, ""), None);
        // Duplicates are allowed.
        assert_eq!(add_item(&items, "a"), Some(s(&["a", "a"])));
    }

    #[test]
    fn test_edit_rejects_blank_replacement() {
        let items = s(&["a", "b"]);
        assert_eq!(edit_item(&items, 0, " \t "), None);
        assert_eq!(edit_item(&items, 0, ""), None);
        assert_eq!(edit_item(&items, 1, " c "), Some(s(&["a", "c"])));
        assert_eq!(edit_item(&items, 9, "c"), None);
        assert_eq!(edit_item(&items, 0, "a"), None);
    }

    #[test]
    fn test_delete_only_item_leaves_empty_list() {
        assert_eq!(delete_item(&s(&["a"]), 0), Some(vec![]));
        assert_eq!(delete_item(&s(&["a", "b"]), 0), Some(s(&["b"])));
        assert_eq!(delete_item(&s(&["a"]), 1), None);
    }

    #[test]
    fn test_move_up_and_down() {
        let items = s(&["a", "b", "c"]);
        assert_eq!(move_up(&items, 1), Some(s(&["b", "a", "c"])));
        assert_eq!(move_up(&items, 0), None);
        assert_eq!(move_down(&items, 1), Some(s(&["a", "c", "b"])));
        assert_eq!(move_down(&items, 2), None);
    }

    #[test]
    fn test_background_between_rows_keeps_row_target() {
        let hover = Some(DropTarget { index: 1, position: Before });
        let session = DragSession { source: 3, hover };
        assert_eq!(background_target(&session, 4, 57.0, Some(120.0)), hover);
    }

    #[test]
    fn test_background_below_last_row_appends() {
        let session = DragSession {
            source: 0,
            hover: Some(DropTarget { index: 1, position: Before }),
        };
        assert_eq!(
            background_target(&session, 4, 130.0, Some(120.0)),
            Some(DropTarget { index: 3, position: After })
        );
        assert_eq!(background_target(&session, 0, 10.0, None), None);
    }
}
