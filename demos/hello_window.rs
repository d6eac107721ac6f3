//! Opens a window and clears it every frame until Escape is pressed or the window
//! is closed.

use shaderlab::prelude::*;

fn main() {
    env_logger::init();

    let mut app = match Application::new(Settings::default()) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("Failed to create window: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = app.run(|_| Ok(())) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
