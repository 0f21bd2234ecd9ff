use std::cell::RefCell;
use std::rc::Rc;

use super::TextureId;

/// Deferred texture releases.
///
/// Finalizers run inside arbitrary script allocations, so they only ever append
/// here. The borrow is short and never nested: `push` does not call out, and
/// `drain` runs from the host between frames.
#[derive(Debug, Clone, Default)]
pub struct ReleaseQueue {
    inner: Rc<RefCell<Vec<TextureId>>>,
}

impl ReleaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `id` for release. Null ids are ignored.
    pub fn push(&self, id: TextureId) {
        if id.is_null() {
            return;
        }
        self.inner.borrow_mut().push(id);
    }

    /// Removes and returns every pending id, in release order.
    pub fn drain(&self) -> Vec<TextureId> {
        std::mem::take(&mut *self.inner.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
