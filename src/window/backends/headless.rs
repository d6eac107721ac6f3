use crate::errors::*;
use crate::math::Vector2;

use super::super::events::Event;
use super::Visitor;

pub struct HeadlessVisitor {
    dimensions: Vector2<u32>,
}

impl HeadlessVisitor {
    pub fn new(dimensions: Vector2<u32>) -> Self {
        HeadlessVisitor { dimensions }
    }
}

impl Visitor for HeadlessVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    #[inline]
    fn resize(&mut self, dimensions: Vector2<u32>) {
        self.dimensions = dimensions;
    }

    #[inline]
    fn poll_events(&mut self, _: &mut Vec<Event>) {}

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        Ok(())
    }
}
