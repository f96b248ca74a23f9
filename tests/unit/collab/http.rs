use std::cell::Cell;

use base64::Engine as _;
use serde_json::json;

use super::*;

fn envelope(v: serde_json::Value) -> TaskEnvelope {
    serde_json::from_value(v).unwrap()
}

#[test]
fn submit_response_yields_task_id() {
    let env = envelope(json!({"output": {"task_id": "t-1", "task_status": "PENDING"}}));
    assert_eq!(submitted_task_id(&env).unwrap(), "t-1");

    let err = submitted_task_id(&envelope(json!({"code": "InvalidApiKey", "message": "bad key"})))
        .unwrap_err();
    assert!(err.is_collaborator());
    assert!(err.to_string().contains("InvalidApiKey: bad key"));
}

#[test]
fn running_tasks_are_pending() {
    for status in ["PENDING", "RUNNING"] {
        let env = envelope(json!({"output": {"task_status": status}}));
        assert_eq!(interpret_task(&env).unwrap(), TaskState::Pending);
    }
}

#[test]
fn succeeded_tasks_carry_urls() {
    let env = envelope(json!({
        "output": {
            "task_status": "SUCCEEDED",
            "results": [{"url": "https://a/1.png"}, {"code": "DataInspectionFailed"}, {"url": "https://a/2.png"}]
        }
    }));
    assert_eq!(
        interpret_task(&env).unwrap(),
        TaskState::Succeeded(vec!["https://a/1.png".into(), "https://a/2.png".into()])
    );

    let empty = envelope(json!({"output": {"task_status": "SUCCEEDED", "results": []}}));
    assert!(interpret_task(&empty).is_err());
}

#[test]
fn terminal_failures_surface_the_message() {
    let env = envelope(json!({
        "output": {"task_status": "FAILED", "code": "InternalError", "message": "boom"}
    }));
    let err = interpret_task(&env).unwrap_err();
    assert!(err.is_collaborator());
    assert!(err.to_string().contains("FAILED"));
    assert!(err.to_string().contains("boom"));

    for bad in [json!({}), json!({"output": {}}), json!({"output": {"task_status": "WEIRD"}})] {
        assert!(interpret_task(&envelope(bad)).unwrap_err().is_collaborator());
    }
}

#[test]
fn polling_stops_at_the_first_value() {
    let calls = Cell::new(0);
    let out = poll_until(Duration::ZERO, Duration::from_secs(5), || {
        calls.set(calls.get() + 1);
        Ok((calls.get() == 3).then_some("done"))
    })
    .unwrap();
    assert_eq!(out, "done");
    assert_eq!(calls.get(), 3);
}

#[test]
fn polling_times_out_by_deadline() {
    let err = poll_until::<()>(Duration::from_millis(1), Duration::from_millis(20), || Ok(None))
        .unwrap_err();
    assert!(err.is_collaborator());
    assert!(err.to_string().contains("timed out"));
}

#[test]
fn polling_propagates_errors_immediately() {
    let calls = Cell::new(0);
    let err = poll_until::<()>(Duration::ZERO, Duration::from_secs(5), || {
        calls.set(calls.get() + 1);
        Err(MainshotError::collaborator("task FAILED"))
    })
    .unwrap_err();
    assert!(err.is_collaborator());
    assert_eq!(calls.get(), 1);
}

#[test]
fn reference_is_sent_as_png_data_url() {
    let img = RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
    let url = png_data_url(&img).unwrap();
    let b64 = url.strip_prefix("data:image/png;base64,").unwrap();
    let bytes = base64::engine::general_purpose::STANDARD.decode(b64).unwrap();
    let back = decode_image(&bytes).unwrap();
    assert_eq!(back, img);
}

#[test]
fn missing_api_key_is_a_collaborator_error() {
    let generator = HttpBackgroundGenerator::new(GenerationOpts::default()).unwrap();
    let request = BackgroundRequest {
        prompt: "p".into(),
        negative_prompt: String::new(),
        width: 8,
        height: 8,
        size: "1024*1024".into(),
        reference: None,
    };
    let err = generator.generate(&request).unwrap_err();
    assert!(err.is_collaborator());
    assert!(err.to_string().contains(API_KEY_ENV));
}

#[test]
fn opts_builders_and_debug_redaction() {
    let opts = GenerationOpts::default()
        .with_api_key("sk-secret")
        .with_base_url("http://localhost:1/api/")
        .with_poll_interval(Duration::from_millis(5))
        .with_timeout(Duration::from_secs(1));
    assert_eq!(opts.base_url, "http://localhost:1/api");
    assert_eq!(opts.poll_interval, Duration::from_millis(5));
    assert!(!format!("{opts:?}").contains("sk-secret"));
}
