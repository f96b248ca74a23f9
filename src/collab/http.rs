//! DashScope-style asynchronous image synthesis over blocking HTTP.
//!
//! A job is submitted with `X-DashScope-Async: enable`, which answers with a task id. The task is
//! then polled at a fixed interval until it reaches a terminal status or the wall-clock deadline
//! passes. The first result URL is downloaded and resized to the requested canvas.

use std::io::Cursor;
use std::time::{Duration, Instant};

use base64::Engine as _;
use image::RgbaImage;
use image::imageops::FilterType;
use serde::Deserialize;

use crate::assets::decode::decode_image;
use crate::collab::{BackgroundGenerator, BackgroundRequest};
use crate::foundation::error::{MainshotError, MainshotResult};

/// API key variable.
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";
/// Poll interval override, milliseconds.
pub const POLL_INTERVAL_ENV: &str = "MAINSHOT_BG_POLL_INTERVAL_MS";
/// Timeout ceiling override, seconds.
pub const TIMEOUT_ENV: &str = "MAINSHOT_BG_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
const SYNTHESIS_PATH: &str = "/services/aigc/text2image/image-synthesis";
const DEFAULT_MODEL: &str = "wanx-v1";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for [`HttpBackgroundGenerator`].
#[derive(Clone)]
pub struct GenerationOpts {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) poll_interval: Duration,
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for GenerationOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOpts")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GenerationOpts {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GenerationOpts {
    /// Defaults with the API key, poll interval and timeout read from the environment.
    ///
    /// Unparseable overrides are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        opts.api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());
        if let Some(ms) = env_u64(POLL_INTERVAL_ENV) {
            opts.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64(TIMEOUT_ENV) {
            opts.timeout = Duration::from_secs(secs);
        }
        opts
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// API root; the synthesis and task paths are appended to it.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable override");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskEnvelope {
    #[serde(default)]
    pub(crate) output: Option<TaskOutput>,
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskOutput {
    #[serde(default)]
    pub(crate) task_id: Option<String>,
    #[serde(default)]
    pub(crate) task_status: Option<String>,
    #[serde(default)]
    pub(crate) results: Vec<TaskResult>,
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskResult {
    #[serde(default)]
    pub(crate) url: Option<String>,
}

/// Where a polled task stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TaskState {
    Pending,
    Succeeded(Vec<String>),
}

/// Task id from a submit response.
pub(crate) fn submitted_task_id(env: &TaskEnvelope) -> MainshotResult<String> {
    env.output
        .as_ref()
        .and_then(|o| o.task_id.clone())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            MainshotError::collaborator(format!(
                "submit returned no task id ({})",
                describe(env)
            ))
        })
}

/// Interpret one poll response. Terminal failures are errors.
pub(crate) fn interpret_task(env: &TaskEnvelope) -> MainshotResult<TaskState> {
    let Some(output) = &env.output else {
        return Err(MainshotError::collaborator(format!(
            "task response without output ({})",
            describe(env)
        )));
    };
    match output.task_status.as_deref() {
        Some("PENDING" | "RUNNING") => Ok(TaskState::Pending),
        Some("SUCCEEDED") => {
            let urls: Vec<String> = output
                .results
                .iter()
                .filter_map(|r| r.url.clone())
                .filter(|u| !u.is_empty())
                .collect();
            if urls.is_empty() {
                return Err(MainshotError::collaborator("task succeeded without result urls"));
            }
            Ok(TaskState::Succeeded(urls))
        }
        Some(status @ ("FAILED" | "CANCELED" | "UNKNOWN")) => Err(MainshotError::collaborator(
            format!("task {status}: {}", describe(env)),
        )),
        Some(other) => Err(MainshotError::collaborator(format!(
            "unexpected task status '{other}'"
        ))),
        None => Err(MainshotError::collaborator("task response without status")),
    }
}

fn describe(env: &TaskEnvelope) -> String {
    let out = env.output.as_ref();
    let code = out
        .and_then(|o| o.code.as_deref())
        .or(env.code.as_deref());
    let message = out
        .and_then(|o| o.message.as_deref())
        .or(env.message.as_deref());
    match (code, message) {
        (Some(c), Some(m)) => format!("{c}: {m}"),
        (None, Some(m)) => m.to_owned(),
        (Some(c), None) => c.to_owned(),
        (None, None) => "no message".to_owned(),
    }
}

/// Call `poll` every `interval` until it yields a value or `timeout` elapses.
pub(crate) fn poll_until<T>(
    interval: Duration,
    timeout: Duration,
    mut poll: impl FnMut() -> MainshotResult<Option<T>>,
) -> MainshotResult<T> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(v) = poll()? {
            return Ok(v);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(MainshotError::collaborator(format!(
                "background generation timed out after {}s",
                timeout.as_secs_f64()
            )));
        }
        std::thread::sleep(interval.min(deadline - now));
    }
}

/// `data:` URL carrying the image as PNG.
pub(crate) fn png_data_url(image: &RgbaImage) -> MainshotResult<String> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| MainshotError::collaborator(format!("encode reference image: {e}")))?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
    ))
}

/// Blocking HTTP client for asynchronous background synthesis.
pub struct HttpBackgroundGenerator {
    client: reqwest::blocking::Client,
    opts: GenerationOpts,
}

impl HttpBackgroundGenerator {
    pub fn new(opts: GenerationOpts) -> MainshotResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MainshotError::collaborator(format!("build http client: {e}")))?;
        Ok(Self { client, opts })
    }

    /// Client configured from [`GenerationOpts::from_env`].
    pub fn from_env() -> MainshotResult<Self> {
        Self::new(GenerationOpts::from_env())
    }

    fn api_key(&self) -> MainshotResult<&str> {
        self.opts.api_key.as_deref().ok_or_else(|| {
            MainshotError::collaborator(format!("{API_KEY_ENV} is not set"))
        })
    }

    fn submit(&self, request: &BackgroundRequest) -> MainshotResult<String> {
        let mut input = serde_json::json!({
            "prompt": request.prompt,
            "negative_prompt": request.negative_prompt,
        });
        if let Some(reference) = &request.reference {
            input["ref_img"] = serde_json::Value::String(png_data_url(reference)?);
        }
        let body = serde_json::json!({
            "model": self.opts.model,
            "input": input,
            "parameters": { "size": request.size, "n": 1 },
        });

        let env: TaskEnvelope = self
            .client
            .post(format!("{}{SYNTHESIS_PATH}", self.opts.base_url))
            .bearer_auth(self.api_key()?)
            .header("X-DashScope-Async", "enable")
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(|e| MainshotError::collaborator(format!("submit background task: {e}")))?;
        submitted_task_id(&env)
    }

    fn poll(&self, task_id: &str) -> MainshotResult<Vec<String>> {
        let url = format!("{}/tasks/{task_id}", self.opts.base_url);
        let key = self.api_key()?;
        poll_until(self.opts.poll_interval, self.opts.timeout, || {
            let env: TaskEnvelope = self
                .client
                .get(&url)
                .bearer_auth(key)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.json())
                .map_err(|e| MainshotError::collaborator(format!("poll task {task_id}: {e}")))?;
            match interpret_task(&env)? {
                TaskState::Pending => {
                    tracing::trace!(task_id, "background task pending");
                    Ok(None)
                }
                TaskState::Succeeded(urls) => Ok(Some(urls)),
            }
        })
    }

    fn fetch(&self, url: &str, width: u32, height: u32) -> MainshotResult<RgbaImage> {
        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| MainshotError::collaborator(format!("download background: {e}")))?;
        let image = decode_image(&bytes)
            .map_err(|e| MainshotError::collaborator(format!("decode background: {e}")))?;
        if image.dimensions() == (width, height) {
            return Ok(image);
        }
        Ok(image::imageops::resize(
            &image,
            width,
            height,
            FilterType::Lanczos3,
        ))
    }
}

impl BackgroundGenerator for HttpBackgroundGenerator {
    #[tracing::instrument(skip_all, fields(size = %request.size, w = request.width, h = request.height))]
    fn generate(&self, request: &BackgroundRequest) -> MainshotResult<RgbaImage> {
        let task_id = self.submit(request)?;
        tracing::debug!(%task_id, "background task submitted");
        let urls = self.poll(&task_id)?;
        let first = urls
            .first()
            .ok_or_else(|| MainshotError::collaborator("task succeeded without result urls"))?;
        self.fetch(first, request.width, request.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/http.rs"]
mod tests;
