//! The seam between script bindings and the native runtime.
//!
//! Bindings only ever talk to `dyn Host`. The windowed runtime and headless
//! tests share the same implementation, [`HostState`]; the runtime additionally
//! drains `take_submitted()` into the renderer each frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use crate::resources::{ReleaseQueue, RenderTexture, ResourceStore, Texture};
use crate::scene::DrawList;

/// Services scripts can reach.
///
/// Implementations must not call back into the script runtime.
pub trait Host {
    /// Decodes an image and registers it. Failures yield [`Texture::none`].
    fn load_texture(&mut self, path: &Path) -> Texture;

    /// Allocates an offscreen target of the given size.
    fn load_render_texture(&mut self, width: u32, height: u32) -> RenderTexture;

    /// Queue script-side image handles push onto when collected.
    fn release_queue(&self) -> ReleaseQueue;

    /// Hands a finished draw list over for rendering.
    fn submit(&mut self, list: DrawList);

    /// Duration of the last completed frame, in seconds.
    fn frame_time(&self) -> f32;

    fn is_file_dropped(&self) -> bool;

    /// Removes and returns every dropped path, oldest first.
    fn take_dropped_files(&mut self) -> Vec<String>;
}

/// Shared, single-threaded handle to a host.
pub type SharedHost = Rc<RefCell<dyn Host>>;

/// Standard [`Host`] implementation.
#[derive(Debug, Default)]
pub struct HostState {
    resources: ResourceStore,
    submitted: Vec<DrawList>,
    frame_time: f32,
    dropped: VecDeque<String>,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh state for sharing with bindings.
    pub fn shared() -> Rc<RefCell<HostState>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn set_frame_time(&mut self, dt: f32) {
        self.frame_time = dt;
    }

    pub fn push_dropped_file(&mut self, path: impl Into<String>) {
        self.dropped.push_back(path.into());
    }

    /// Lists submitted since the last call, in submission order.
    pub fn take_submitted(&mut self) -> Vec<DrawList> {
        std::mem::take(&mut self.submitted)
    }

    pub fn submitted(&self) -> &[DrawList] {
        &self.submitted
    }

    pub fn resources(&self) -> &ResourceStore {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceStore {
        &mut self.resources
    }
}

impl Host for HostState {
    fn load_texture(&mut self, path: &Path) -> Texture {
        self.resources.load_texture(path)
    }

    fn load_render_texture(&mut self, width: u32, height: u32) -> RenderTexture {
        self.resources.create_render_texture(width, height)
    }

    fn release_queue(&self) -> ReleaseQueue {
        self.resources.release_queue()
    }

    fn submit(&mut self, list: DrawList) {
        if list.is_empty() {
            return;
        }
        self.submitted.push(list);
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn is_file_dropped(&self) -> bool {
        !self.dropped.is_empty()
    }

    fn take_dropped_files(&mut self) -> Vec<String> {
        self.dropped.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn dropped_files_drain_in_order() {
        let mut host = HostState::new();
        assert!(!host.is_file_dropped());
        host.push_dropped_file("/a.png");
        host.push_dropped_file("/b.png");
        assert!(host.is_file_dropped());
        assert_eq!(host.take_dropped_files(), vec!["/a.png", "/b.png"]);
        assert!(!host.is_file_dropped());
    }

    #[test]
    fn empty_lists_are_not_kept() {
        let mut host = HostState::new();
        host.submit(DrawList::new());
        assert!(host.submitted().is_empty());

        let mut list = DrawList::new();
        list.push_pixel(Vec2::zero(), Color::WHITE);
        host.submit(list);
        assert_eq!(host.take_submitted().len(), 1);
        assert!(host.submitted().is_empty());
    }

    #[test]
    fn usable_as_dyn_host() {
        let state = HostState::shared();
        let host: SharedHost = state.clone();
        host.borrow_mut().load_render_texture(8, 8);
        assert_eq!(state.borrow().resources().live_render_textures(), 1);
    }
}
