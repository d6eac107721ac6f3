mod headless;

use crate::errors::*;
use crate::math::Vector2;

use super::events::Event;

pub trait Visitor {
    fn dimensions(&self) -> Vector2<u32>;
    fn resize(&mut self, dimensions: Vector2<u32>);
    /// Collects pending events without blocking.
    fn poll_events(&mut self, events: &mut Vec<Event>);
    fn swap_buffers(&self) -> Result<()>;
}

pub fn new_headless(dimensions: Vector2<u32>) -> Box<dyn Visitor> {
    Box::new(self::headless::HeadlessVisitor::new(dimensions))
}

#[cfg(not(target_arch = "wasm32"))]
mod glutin;
#[cfg(not(target_arch = "wasm32"))]
pub use self::glutin::new;
