use strum::{AsRefStr, Display};

/// Where a dragged row lands relative to the row under the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum DropPosition {
    Before,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DropTarget {
    pub index: usize,
    pub position: DropPosition,
}

/// Ephemeral state of one pointer drag in the preset list.
///
/// `source` is fixed for the whole gesture; `hover` follows the pointer and is
/// `None` while the pointer is over the dragged row itself or outside the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DragSession {
    pub source: usize,
    pub hover: Option<DropTarget>,
}

impl DragSession {
    pub fn start(source: usize) -> Self {
        Self {
            source,
            hover: None,
        }
    }
}

/// Why the floating menu was closed. Only used for debug logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum DismissReason {
    Selection,
    OutsideClick,
    OutsideContextMenu,
    Scroll,
    Blur,
    Resize,
    Escape,
}

/// Visible part of the page, in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MenuPosition {
    pub left: f64,
    pub top: f64,
}
