use crate::coords::Rect;
use crate::resources::TextureId;

use super::DrawCmd;

/// A single draw item: command + destination + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// Render target color attachment. `None` = the window surface.
    pub target: Option<TextureId>,
    /// Scissor rect in target pixels. `None` = no clipping (draw everywhere).
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream.
///
/// Items are kept in submission order; there is no z sorting. Painting order is
/// the order scripts called the primitives.
///
/// # Targets
///
/// [`push_target`](Self::push_target) / [`pop_target`](Self::pop_target)
/// redirect subsequent commands into a render texture. Targets nest; the top of
/// the stack wins.
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) scope commands
/// to a scissor rect, intersected with any parent clip.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,

    /// Stack of active render targets.
    target_stack: Vec<TextureId>,

    /// Stack of active scissor rects. The top is already intersected with all parents.
    clip_stack: Vec<Rect>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and both stacks. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.target_stack.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command into the current target and clip.
    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(DrawItem {
            cmd,
            target: self.target_stack.last().copied(),
            clip_rect: self.clip_stack.last().copied(),
        });
    }

    /// Redirects subsequent commands into `target`.
    #[inline]
    pub fn push_target(&mut self, target: TextureId) {
        self.target_stack.push(target);
    }

    /// Restores the previous target. Returns `None` when no target was active.
    #[inline]
    pub fn pop_target(&mut self) -> Option<TextureId> {
        self.target_stack.pop()
    }

    /// Number of nested targets currently active.
    #[inline]
    pub fn target_depth(&self) -> usize {
        self.target_stack.len()
    }

    #[inline]
    pub fn current_target(&self) -> Option<TextureId> {
        self.target_stack.last().copied()
    }

    /// Begins a scissor region, intersected with the parent clip.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let rect = rect.normalized();
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap produces a zero-area rect so the renderer skips the draw.
            Some(&parent) => parent.intersect(rect).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0)),
        };
        self.clip_stack.push(effective);
    }

    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Moves the recorded items out, leaving the target and clip stacks intact.
    pub fn take(&mut self) -> DrawList {
        DrawList {
            items: std::mem::take(&mut self.items),
            target_stack: Vec::new(),
            clip_stack: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    fn tid(n: u32) -> TextureId {
        TextureId::from_raw(n)
    }

    fn dot(list: &mut DrawList) {
        list.push_pixel(Vec2::new(1.0, 1.0), Color::WHITE);
    }

    // ── targets ───────────────────────────────────────────────────────────

    #[test]
    fn items_record_active_target() {
        let mut list = DrawList::new();
        dot(&mut list);
        list.push_target(tid(3));
        dot(&mut list);
        list.push_target(tid(4));
        dot(&mut list);
        assert_eq!(list.pop_target(), Some(tid(4)));
        dot(&mut list);
        assert_eq!(list.pop_target(), Some(tid(3)));
        dot(&mut list);

        let targets: Vec<_> = list.items().iter().map(|i| i.target).collect();
        assert_eq!(targets, vec![None, Some(tid(3)), Some(tid(4)), Some(tid(3)), None]);
    }

    #[test]
    fn pop_on_empty_target_stack_is_none() {
        let mut list = DrawList::new();
        assert_eq!(list.pop_target(), None);
        assert_eq!(list.target_depth(), 0);
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn nested_clips_intersect() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        list.push_clip(Rect::new(50.0, 50.0, 100.0, 100.0));
        dot(&mut list);
        list.pop_clip();
        dot(&mut list);
        list.pop_clip();
        dot(&mut list);

        let clips: Vec<_> = list.items().iter().map(|i| i.clip_rect).collect();
        assert_eq!(clips[0], Some(Rect::new(50.0, 50.0, 50.0, 50.0)));
        assert_eq!(clips[1], Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(clips[2], None);
    }

    // ── take ──────────────────────────────────────────────────────────────

    #[test]
    fn take_keeps_target_stack() {
        let mut list = DrawList::new();
        list.push_target(tid(7));
        dot(&mut list);

        let taken = list.take();
        assert_eq!(taken.len(), 1);
        assert!(list.is_empty());
        assert_eq!(list.current_target(), Some(tid(7)));
    }
}
