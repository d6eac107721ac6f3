use std::ffi::CString;
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use ::glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use ::glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use ::glutin::display::{GetGlDisplay, GlDisplay};
use ::glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use gl;
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::errors::*;
use crate::math::Vector2;
use crate::settings::WindowParams;

use super::super::super::events::{Event, Key};
use super::super::Visitor;

pub struct GlutinVisitor {
    // The surface and the context must go before the window they render into.
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    events_loop: EventLoop<()>,
}

impl GlutinVisitor {
    pub fn from(params: &WindowParams) -> Result<Self> {
        let events_loop = EventLoop::new().map_err(|err| Error::Window(err.to_string()))?;

        let attributes = Window::default_attributes()
            .with_title(params.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(params.size[0]),
                f64::from(params.size[1]),
            ));

        let mut template = ConfigTemplateBuilder::new();
        if params.multisample > 0 {
            template = template.with_multisampling(params.multisample.min(255) as u8);
        }

        let built = panic::catch_unwind(AssertUnwindSafe(|| {
            DisplayBuilder::new()
                .with_window_attributes(Some(attributes))
                .build(&events_loop, template, pick_config)
        }));

        let (window, config) = match built {
            Ok(v) => v.map_err(|err| Error::Window(err.to_string()))?,
            Err(payload) => {
                if payload.is::<NoConfig>() {
                    return Err(Error::Window("no GL config matches the window params.".into()));
                }

                panic::resume_unwind(payload)
            }
        };

        let window = window.ok_or_else(|| Error::Window("failed to create window.".into()))?;
        let raw_handle = window.window_handle().ok().map(|v| v.as_raw());

        let display = config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(raw_handle);

        let context = unsafe { display.create_context(&config, &context_attributes) }
            .map_err(|err| Error::Window(err.to_string()))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .map_err(|err| Error::Window(err.to_string()))?;

        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .map_err(|err| Error::Window(err.to_string()))?;

        let context = context
            .make_current(&surface)
            .map_err(|err| Error::Window(err.to_string()))?;

        let interval = if params.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };

        if let Err(err) = surface.set_swap_interval(&context, interval) {
            warn!("[GlutinVisitor] failed to set swap interval: {}", err);
        }

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ::std::ptr::null(),
        });

        info!(
            "[GlutinVisitor] creates window {:?} ({}x{}, {} samples).",
            params.title,
            params.size[0],
            params.size[1],
            config.num_samples()
        );

        Ok(GlutinVisitor {
            surface,
            context,
            window,
            events_loop,
        })
    }
}

/// Unwinds out of `pick_config` when the display offers no config at all.
struct NoConfig;

/// Prefers the config with the most samples. The picker can not fail, so an empty
/// list unwinds with `NoConfig` and is turned into an error by the caller.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    match configs.reduce(|a, b| if b.num_samples() > a.num_samples() { b } else { a }) {
        Some(config) => config,
        None => panic::resume_unwind(Box::new(NoConfig)),
    }
}

/// Translates the events of one pump into `Event`s.
struct Pump<'a> {
    window: &'a Window,
    surface: &'a Surface<WindowSurface>,
    context: &'a PossiblyCurrentContext,
    events: &'a mut Vec<Event>,
}

impl<'a> ApplicationHandler for Pump<'a> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if id != self.window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.events.push(Event::Closed),
            WindowEvent::Resized(size) => {
                self.window.resize_surface(self.surface, self.context);
                self.events.push(Event::Resized(size.width, size.height));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let key = match logical_key {
                    WinitKey::Named(NamedKey::Escape) => Key::Escape,
                    _ => Key::Other,
                };

                self.events.push(Event::KeyPressed(key));
            }
            _ => {}
        }
    }
}

impl Visitor for GlutinVisitor {
    #[inline]
    fn dimensions(&self) -> Vector2<u32> {
        let size = self.window.inner_size();
        Vector2::new(size.width, size.height)
    }

    fn resize(&mut self, dimensions: Vector2<u32>) {
        let size = PhysicalSize::new(dimensions.x, dimensions.y);
        let _ = self.window.request_inner_size(size);
        self.window.resize_surface(&self.surface, &self.context);
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        let mut pump = Pump {
            window: &self.window,
            surface: &self.surface,
            context: &self.context,
            events: &mut *events,
        };

        if let PumpStatus::Exit(_) = self
            .events_loop
            .pump_app_events(Some(Duration::ZERO), &mut pump)
        {
            events.push(Event::Closed);
        }
    }

    #[inline]
    fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .map_err(|err| Error::Window(err.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_config_list() {
        let picked = panic::catch_unwind(|| pick_config(Box::new(::std::iter::empty())));
        match picked {
            Err(payload) => assert!(payload.is::<NoConfig>()),
            Ok(_) => panic!("an empty config list has nothing to pick"),
        }
    }
}
