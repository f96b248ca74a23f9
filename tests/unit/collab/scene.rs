use std::sync::Mutex;

use super::*;

/// Paints a flat scene over everything, including where the product was.
struct FloodGenerator {
    seen: Mutex<Option<BackgroundRequest>>,
}

impl BackgroundGenerator for FloodGenerator {
    fn generate(&self, request: &BackgroundRequest) -> MainshotResult<RgbaImage> {
        *self.seen.lock().unwrap() = Some(request.clone());
        Ok(RgbaImage::from_pixel(
            request.width,
            request.height,
            image::Rgba([0, 200, 0, 255]),
        ))
    }
}

struct Broken;

impl BackgroundGenerator for Broken {
    fn generate(&self, _: &BackgroundRequest) -> MainshotResult<RgbaImage> {
        Err(MainshotError::collaborator("service down"))
    }
}

fn template() -> Template {
    Template::from_json_str(
        r#"{"name": "t", "canvas": {"width": 200, "height": 200},
            "elements": [{"type": "product_image", "max_width_pct": 50, "max_height_pct": 50}]}"#,
    )
    .unwrap()
}

fn request() -> BackgroundRequest {
    BackgroundRequest {
        prompt: "scene".into(),
        negative_prompt: String::new(),
        width: 1,
        height: 1,
        size: "1024*1024".into(),
        reference: None,
    }
}

#[test]
fn product_pixels_survive_the_generator() {
    let generator = FloodGenerator {
        seen: Mutex::new(None),
    };
    let product = RgbaImage::from_pixel(40, 40, image::Rgba([255, 0, 0, 255]));
    let out = SceneCompositor::new(&generator)
        .compose(&template(), &product, request())
        .unwrap();

    assert_eq!(out.dimensions(), (200, 200));
    let center = out.get_pixel(100, 100).0;
    assert!(center[0] > 250 && center[1] < 5, "product re-pasted, got {center:?}");
    assert_eq!(out.get_pixel(5, 5).0, [0, 200, 0, 255]);
}

#[test]
fn generator_sees_the_placed_product_at_canvas_size() {
    let generator = FloodGenerator {
        seen: Mutex::new(None),
    };
    let product = RgbaImage::from_pixel(40, 40, image::Rgba([255, 0, 0, 255]));
    SceneCompositor::new(&generator)
        .compose(&template(), &product, request())
        .unwrap();

    let seen = generator.seen.lock().unwrap().take().unwrap();
    assert_eq!((seen.width, seen.height), (200, 200));
    assert_eq!(seen.prompt, "scene");
    let reference = seen.reference.unwrap();
    assert_eq!(reference.get_pixel(5, 5).0[3], 0);
    assert_eq!(reference.get_pixel(100, 100).0[3], 255);
}

#[test]
fn generator_failures_propagate() {
    let product = RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255]));
    let err = SceneCompositor::new(&Broken)
        .compose(&template(), &product, request())
        .unwrap_err();
    assert!(err.is_collaborator());
}

#[test]
fn placement_uses_default_bounds_without_a_product_element() {
    let tpl = Template::from_json_str(r#"{"canvas": {"width": 100, "height": 100}}"#).unwrap();
    let product = RgbaImage::new(10, 10);
    let p = product_placement(&tpl, &product).unwrap();
    assert_eq!((p.width, p.height), (55, 55));
}
