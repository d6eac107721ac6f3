extern crate shaderlab;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use shaderlab::prelude::*;
use shaderlab::video::assets::texture_loader;

fn encode(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// A 2x2 image whose top row is red and bottom row is blue.
fn rgba() -> DynamicImage {
    let mut image = RgbaImage::new(2, 2);
    for x in 0..2 {
        image.put_pixel(x, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(x, 1, Rgba([0, 0, 255, 128]));
    }

    DynamicImage::ImageRgba8(image)
}

#[test]
fn channels() {
    let (params, data) = texture_loader::decode(&encode(rgba()), false).unwrap();
    assert_eq!(params.format, TextureFormat::RGBA8);
    assert_eq!(params.dimensions, Vector2::new(2, 2));
    assert_eq!(data.bytes.len(), 16);

    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 1, Rgb([1, 2, 3])));
    let (params, data) = texture_loader::decode(&encode(image), false).unwrap();
    assert_eq!(params.format, TextureFormat::RGB8);
    assert_eq!(data.bytes, vec![1, 2, 3, 1, 2, 3, 1, 2, 3]);

    // Grayscale expands to four channels.
    let image = DynamicImage::ImageLuma8(image::GrayImage::new(1, 1));
    let (params, data) = texture_loader::decode(&encode(image), false).unwrap();
    assert_eq!(params.format, TextureFormat::RGBA8);
    assert_eq!(data.bytes, vec![0, 0, 0, 255]);
}

#[test]
fn flip_vertically() {
    let bytes = encode(rgba());

    let (_, data) = texture_loader::decode(&bytes, false).unwrap();
    assert_eq!(&data.bytes[0..4], &[255, 0, 0, 255]);

    let (_, data) = texture_loader::decode(&bytes, true).unwrap();
    assert_eq!(&data.bytes[0..4], &[0, 0, 255, 128]);
    assert_eq!(&data.bytes[8..12], &[255, 0, 0, 255]);
}

#[test]
fn from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("awesomeface.png");
    std::fs::write(&path, encode(rgba())).unwrap();

    let video = VideoSystem::headless();
    let texture =
        Texture::from_file(&video, &path, TextureWrap::Clamp, TextureFilter::Nearest).unwrap();

    assert_eq!(texture.params().wrap, TextureWrap::Clamp);
    assert_eq!(texture.params().filter, TextureFilter::Nearest);
    assert_eq!(texture.params().dimensions, Vector2::new(2, 2));

    texture.bind(0).unwrap();
    texture.bind(1).unwrap();
    assert!(texture.bind(16).is_err());
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let video = VideoSystem::headless();

    let path = dir.path().join("container.jpg");
    match Texture::from_file(&video, &path, TextureWrap::Repeat, TextureFilter::Linear) {
        Err(Error::Asset(msg)) => assert!(msg.contains("container.jpg")),
        other => panic!("unexpected {:?}", other),
    }

    std::fs::write(&path, b"not a jpeg").unwrap();
    assert!(Texture::from_file(&video, &path, TextureWrap::Repeat, TextureFilter::Linear).is_err());
}

#[test]
fn sampler_units() {
    let vs = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 2) in vec2 aTexCoord;
out vec2 TexCoord;
void main() {
    gl_Position = vec4(aPos, 1.0);
    TexCoord = aTexCoord;
}";

    let fs = "#version 330 core
out vec4 FragColor;
in vec2 TexCoord;
uniform sampler2D texture1;
uniform sampler2D texture2;
void main() {
    FragColor = mix(texture(texture1, TexCoord), texture(texture2, TexCoord), 0.2);
}";

    let video = VideoSystem::headless();
    let shader = ShaderProgram::new(&video, vs, fs).unwrap();
    shader.activate().unwrap();

    assert!(shader.set_int("texture1", 0).unwrap());
    assert!(shader.set_int("texture2", 1).unwrap());
    assert_eq!(
        shader.uniform("texture2", UniformVariableType::I32).unwrap(),
        Some(UniformVariable::I32(1))
    );

    let params = TextureParams {
        format: TextureFormat::RGB8,
        dimensions: Vector2::new(1, 1),
        ..Default::default()
    };

    let texture = Texture::new(&video, params, TextureData { bytes: vec![0; 3] }).unwrap();
    texture.bind(0).unwrap();

    let data = TextureData { bytes: vec![0; 4] };
    assert!(Texture::new(&video, params, data).is_err());

    // A failed creation leaves the existing units usable.
    texture.bind(0).unwrap();
    let second = Texture::new(&video, params, TextureData { bytes: vec![0; 3] }).unwrap();
    second.bind(1).unwrap();
    texture.bind(0).unwrap();
}
