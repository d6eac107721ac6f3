//! The host bootstrap shared by every exercise.
//!
//! `Application::new` is the single initialization step: it opens the window,
//! makes its context current, creates the `VideoSystem` on top of it and maps the
//! viewport onto the whole window. `Application::advance` is the per-frame poll.
//!
//! ```rust,ignore
//! let mut app = Application::new(Settings::default())?;
//! app.run(|app| {
//!     shader.activate()?;
//!     quad.draw(MeshIndex::All)?;
//!     Ok(())
//! })
//! ```

use std::time::{Duration, Instant};

use crate::errors::*;
use crate::math::Vector2;
use crate::settings::Settings;
use crate::video::VideoSystem;
use crate::window::events::{Event, Key};
use crate::window::Window;

pub struct Application {
    video: VideoSystem,
    window: Window,
    settings: Settings,
    events: Vec<Event>,
    timestamp: Instant,
}

impl Application {
    /// Opens the window described by `settings`, or falls back to `headless` if
    /// `settings.headless` is set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(settings: Settings) -> Result<Self> {
        if settings.headless {
            return Self::headless(settings);
        }

        let window = Window::new(&settings.window)?;
        let video = VideoSystem::new()?;
        Self::setup(settings, window, video)
    }

    /// Runs against the software backend, without any OS window.
    pub fn headless(settings: Settings) -> Result<Self> {
        let window = Window::headless(&settings.window);
        let video = VideoSystem::headless();
        Self::setup(settings, window, video)
    }

    fn setup(settings: Settings, window: Window, video: VideoSystem) -> Result<Self> {
        let dimensions = window.dimensions();
        video.update_viewport(Vector2::new(0, 0), dimensions)?;

        info!(
            "[Application] starts {:?} ({}x{}{}).",
            settings.window.title,
            dimensions.x,
            dimensions.y,
            if settings.headless { ", headless" } else { "" }
        );

        Ok(Application {
            video,
            window,
            settings,
            events: Vec::new(),
            timestamp: Instant::now(),
        })
    }

    #[inline]
    pub fn video(&self) -> &VideoSystem {
        &self.video
    }

    #[inline]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[inline]
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Time since initialization.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// The events gathered by the last `advance`.
    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Pumps window events and reacts to them. Escape and a close request end the
    /// loop, a resize remaps the viewport. Returns false once the loop should end.
    pub fn advance(&mut self) -> Result<bool> {
        self.events.clear();
        self.window.poll_events(&mut self.events);

        for v in &self.events {
            match *v {
                Event::KeyPressed(Key::Escape) => self.window.close(),
                Event::Resized(width, height) => {
                    self.video
                        .update_viewport(Vector2::new(0, 0), Vector2::new(width, height))?;
                }
                _ => {}
            }
        }

        Ok(!self.window.should_close())
    }

    /// Clears the frame with the configured clear color.
    pub fn begin_frame(&self) -> Result<()> {
        self.video.clear(self.settings.video.clear_color)
    }

    /// Presents the frame.
    pub fn end_frame(&mut self) -> Result<()> {
        if self.settings.headless {
            self.video.flush()
        } else {
            self.window.swap_buffers()
        }
    }

    /// Runs `frame` once per frame until the window should close.
    pub fn run<F>(&mut self, mut frame: F) -> Result<()>
    where
        F: FnMut(&mut Application) -> Result<()>,
    {
        let mut frames = 0u64;
        while self.advance()? {
            self.begin_frame()?;
            frame(self)?;
            self.end_frame()?;
            frames += 1;
        }

        info!(
            "[Application] stops after {} frames in {:.2}s.",
            frames,
            self.elapsed().as_secs_f32()
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn headless() -> Application {
        let settings = Settings {
            headless: true,
            ..Default::default()
        };

        Application::new(settings).unwrap()
    }

    #[test]
    fn escape_ends_the_loop() {
        let mut app = headless();
        assert!(app.advance().unwrap());

        app.window_mut().post(Event::KeyPressed(Key::Other));
        assert!(app.advance().unwrap());

        app.window_mut().post(Event::KeyPressed(Key::Escape));
        assert!(!app.advance().unwrap());
    }

    #[test]
    fn run_until_closed() {
        let mut app = headless();
        let mut frames = 0;

        app.run(|app| {
            frames += 1;
            if frames == 3 {
                app.window_mut().post(Event::Closed);
            }

            Ok(())
        })
        .unwrap();

        assert_eq!(frames, 3);
        assert!(app.window().should_close());
    }

    #[test]
    fn resize() {
        let mut app = headless();
        app.window_mut().post(Event::Resized(1024, 768));
        assert!(app.advance().unwrap());
        assert_eq!(app.events(), &[Event::Resized(1024, 768)]);
    }
}
