extern crate shaderlab;

use shaderlab::prelude::*;

#[test]
fn defaults() {
    let settings = Settings::from_json("{}").unwrap();
    assert_eq!(settings, Settings::default());

    assert_eq!(settings.window.title, "Hello World!");
    assert_eq!(settings.window.size, [800, 600]);
    assert_eq!(settings.window.multisample, 0);
    assert!(settings.window.vsync);
    assert_eq!(settings.video.clear_color, [0.2, 0.3, 0.5, 1.0]);
    assert!(!settings.headless);
}

#[test]
fn partial() {
    let settings = Settings::from_json(
        r#"{ "window": { "title": "Transform", "size": [1024, 768] }, "headless": true }"#,
    )
    .unwrap();

    assert_eq!(settings.window.title, "Transform");
    assert_eq!(settings.window.size, [1024, 768]);
    assert!(settings.window.vsync);
    assert!(settings.headless);
}

#[test]
fn load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "video": { "clear_color": [0.0, 0.0, 0.0, 1.0] } }"#).unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.video.clear_color, [0.0, 0.0, 0.0, 1.0]);

    match Settings::load(dir.path().join("missing.json")) {
        Err(Error::Asset(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    std::fs::write(&path, "{ \"window\": 3 }").unwrap();
    match Settings::load(&path) {
        Err(Error::Settings(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn headless_application() {
    let settings = Settings::from_json(r#"{ "headless": true, "window": { "size": [320, 240] } }"#)
        .unwrap();

    let mut app = Application::new(settings).unwrap();
    assert_eq!(app.window().dimensions(), Vector2::new(320, 240));

    app.window_mut().post(Event::KeyPressed(Key::Escape));
    app.run(|_| panic!("no frame runs after Escape")).unwrap();
}
