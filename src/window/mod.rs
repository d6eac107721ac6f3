//! Represents an OpenGL context and the window or environment around it.
//!
//! A `Window` created with `Window::new` owns an OS window and makes its OpenGL 3.3
//! core context current on the calling thread, with the function pointers loaded.
//! `Window::headless` stands in for it when no display is available.

pub mod events;

pub mod prelude {
    pub use super::events::{Event, Key};
    pub use super::Window;
    pub use crate::settings::WindowParams;
}

mod backends;

use crate::errors::*;
use crate::math::Vector2;
use crate::settings::WindowParams;

use self::backends::Visitor;
use self::events::Event;

pub struct Window {
    visitor: Box<dyn Visitor>,
    posted: Vec<Event>,
    should_close: bool,
}

impl Window {
    /// Creates a window and makes its context current.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(params: &WindowParams) -> Result<Self> {
        let visitor = backends::new(params)?;
        Ok(Window {
            visitor,
            posted: Vec::new(),
            should_close: false,
        })
    }

    /// Creates a window without any OS resources behind it.
    pub fn headless(params: &WindowParams) -> Self {
        let dimensions = Vector2::new(params.size[0], params.size[1]);
        Window {
            visitor: backends::new_headless(dimensions),
            posted: Vec::new(),
            should_close: false,
        }
    }

    /// Queues `event`, it will be reported by the next `poll_events`.
    pub fn post(&mut self, event: Event) {
        self.posted.push(event);
    }

    /// Appends the events that happened since the last call. Never blocks.
    pub fn poll_events(&mut self, events: &mut Vec<Event>) {
        let start = events.len();
        events.append(&mut self.posted);
        self.visitor.poll_events(events);

        for v in &events[start..] {
            match *v {
                Event::Closed => self.should_close = true,
                Event::Resized(width, height) => {
                    debug!("[Window] resized to {}x{}.", width, height);
                }
                _ => {}
            }
        }
    }

    #[inline]
    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Flags the window for closing. The frame loop decides when to stop.
    #[inline]
    pub fn close(&mut self) {
        self.should_close = true;
    }

    /// Returns the size in pixels of the client area of the window.
    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.visitor.dimensions()
    }

    #[inline]
    pub fn resize(&mut self, dimensions: Vector2<u32>) {
        self.visitor.resize(dimensions);
    }

    /// Presents the back buffer.
    #[inline]
    pub fn swap_buffers(&self) -> Result<()> {
        self.visitor.swap_buffers()
    }
}

#[cfg(test)]
mod test {
    use super::events::Key;
    use super::*;

    #[test]
    fn headless() {
        let mut window = Window::headless(&WindowParams::default());
        assert_eq!(window.dimensions(), Vector2::new(800, 600));

        window.resize(Vector2::new(320, 240));
        assert_eq!(window.dimensions(), Vector2::new(320, 240));

        let mut events = Vec::new();
        window.post(Event::KeyPressed(Key::Escape));
        window.poll_events(&mut events);
        assert_eq!(events, vec![Event::KeyPressed(Key::Escape)]);
        assert!(!window.should_close());

        events.clear();
        window.post(Event::Closed);
        window.poll_events(&mut events);
        assert_eq!(events, vec![Event::Closed]);
        assert!(window.should_close());
    }
}
