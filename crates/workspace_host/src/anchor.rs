//! On-screen geometry lookups for file rows.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Bounding box of a rendered row, in viewport pixels.
pub struct AnchorRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl AnchorRect {
    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Visible viewport dimensions in pixels.
pub struct ViewportSize {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Resolves row rectangles by stable file id.
pub trait AnchorLocator {
    /// Rectangle of the row rendering `file_id`, when it is on screen.
    fn rect_for(&self, file_id: &str) -> Option<AnchorRect>;

    /// Current viewport size.
    fn viewport_size(&self) -> ViewportSize;
}

#[derive(Debug, Clone, Copy, Default)]
/// Locator for headless hosts: no row is ever on screen.
pub struct NoopAnchorLocator;

impl AnchorLocator for NoopAnchorLocator {
    fn rect_for(&self, _file_id: &str) -> Option<AnchorRect> {
        None
    }

    fn viewport_size(&self) -> ViewportSize {
        ViewportSize::default()
    }
}

#[derive(Debug, Default)]
struct MemoryAnchorState {
    rects: HashMap<String, AnchorRect>,
    viewport: ViewportSize,
}

#[derive(Debug, Clone, Default)]
/// Locator backed by an explicit id → rectangle table.
pub struct MemoryAnchorLocator {
    inner: Rc<RefCell<MemoryAnchorState>>,
}

impl MemoryAnchorLocator {
    /// Builds a locator for a viewport of the given size.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        let locator = Self::default();
        locator.inner.borrow_mut().viewport = ViewportSize { width, height };
        locator
    }

    /// Records where the row for `file_id` is rendered.
    pub fn set_rect(&self, file_id: impl Into<String>, rect: AnchorRect) {
        self.inner.borrow_mut().rects.insert(file_id.into(), rect);
    }
}

impl AnchorLocator for MemoryAnchorLocator {
    fn rect_for(&self, file_id: &str) -> Option<AnchorRect> {
        self.inner.borrow().rects.get(file_id).copied()
    }

    fn viewport_size(&self) -> ViewportSize {
        self.inner.borrow().viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_locator_resolves_known_rows_only() {
        let locator = MemoryAnchorLocator::with_viewport(1000.0, 800.0);
        let rect = AnchorRect {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 32.0,
        };
        locator.set_rect("f-1", rect);

        assert_eq!(locator.rect_for("f-1"), Some(rect));
        assert_eq!(locator.rect_for("f-2"), None);
        assert_eq!(locator.viewport_size().width, 1000.0);
        assert_eq!(rect.center_x(), 110.0);
        assert_eq!(rect.bottom(), 52.0);
    }
}
