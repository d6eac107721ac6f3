/// The events a window reports to the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The user asked to close the window.
    Closed,
    /// The size of window has changed, in physical pixels.
    Resized(u32, u32),
    /// A key went down.
    KeyPressed(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}
