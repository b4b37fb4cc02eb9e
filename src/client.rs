//! Runway image-to-video job client: submission and status polling.

use crate::encode::encode_data_uri;
use crate::error::{Result, RunwayError};
use crate::types::{AspectRatio, GenerationRequest, JobHandle, JobStatus};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com";

/// Fixed API version header value required by the service.
const API_VERSION: &str = "2024-11-06";

/// Delay between consecutive status checks. Fixed interval, no backoff.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Builder for [`RunwayClient`].
#[derive(Debug, Clone)]
pub struct RunwayClientBuilder {
    api_key: Option<String>,
    base_url: String,
    poll_interval: Duration,
}

impl Default for RunwayClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RunwayClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `RUNWAY_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the interval between status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Builds the client, resolving credentials.
    pub fn build(self) -> Result<RunwayClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("RUNWAY_API_KEY").ok())
            .ok_or_else(|| {
                RunwayError::Submission("RUNWAY_API_KEY not set and no API key provided".into())
            })?;

        Ok(RunwayClient {
            http: reqwest::Client::new(),
            api_key,
            base_url: self.base_url,
            poll_interval: self.poll_interval,
        })
    }
}

/// Client for the Runway image-to-video API.
///
/// One [`JobHandle`] exists per submitted request; `poll` drives that same
/// task id until a terminal state or the deadline.
pub struct RunwayClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
}

impl RunwayClient {
    /// Creates a new [`RunwayClientBuilder`].
    pub fn builder() -> RunwayClientBuilder {
        RunwayClientBuilder::new()
    }

    /// Submits a generation request and returns a handle to the remote task.
    ///
    /// Both frames are encoded as data URIs before the request is built. Any
    /// non-2xx response is fatal and carries the response body; so is a 2xx
    /// response without a task id.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle> {
        let payload = GenerationPayload::from_request(request)?;

        let response = self
            .http
            .post(format!("{}/v1/image_to_video", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", API_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RunwayError::Submission(format!("{status}: {body}")));
        }

        let submit_response: SubmitResponse = response.json().await?;
        let task_id = task_id_from(submit_response)?;
        tracing::debug!(task_id = %task_id, "submitted video generation request");

        Ok(JobHandle::new(task_id))
    }

    /// Polls the task until a terminal state or until `max_wait` elapses.
    ///
    /// Transport and HTTP errors during polling are logged and retried after
    /// the poll interval; only a remote `FAILED`/`CANCELED` state or the
    /// deadline aborts the loop.
    pub async fn poll(&self, handle: &JobHandle, max_wait: Duration) -> Result<JobStatus> {
        poll_loop(
            || self.fetch_status(&handle.task_id),
            self.poll_interval,
            max_wait,
        )
        .await
    }

    /// Submits the request and polls it to completion.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        max_wait: Duration,
    ) -> Result<(JobHandle, String)> {
        let handle = self.submit(request).await?;
        match self.poll(&handle, max_wait).await? {
            JobStatus::Succeeded { result_url } => Ok((handle, result_url)),
            // poll only resolves Ok on success; anything else is an Err above
            other => Err(RunwayError::Task {
                status: format!("{other:?}"),
                detail: "non-success status returned from poll".into(),
            }),
        }
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        let response = self
            .http
            .get(format!("{}/v1/tasks/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", API_VERSION)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

/// Extracts the task id from a submission response.
fn task_id_from(response: SubmitResponse) -> Result<String> {
    response
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| RunwayError::Submission("no task id in response".into()))
}

/// Drives status checks until a terminal state or deadline.
///
/// Generic over the fetch so the loop is testable with scripted responses.
async fn poll_loop<F, Fut>(
    mut fetch: F,
    interval: Duration,
    max_wait: Duration,
) -> Result<JobStatus>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<TaskStatusResponse>>,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;

    while start.elapsed() < max_wait {
        attempts += 1;
        tracing::debug!(
            attempts,
            elapsed_secs = start.elapsed().as_secs(),
            "checking task status"
        );

        match fetch().await {
            Ok(response) => match classify(&response) {
                PollStep::Done(result_url) => {
                    tracing::debug!(url = %result_url, "task succeeded");
                    return Ok(JobStatus::Succeeded { result_url });
                }
                PollStep::Fail { status, detail } => {
                    return Err(RunwayError::Task { status, detail });
                }
                PollStep::Wait => {
                    tracing::debug!(status = %response.status, "task still pending");
                }
            },
            Err(e) => {
                tracing::warn!(attempts, "transient error while polling: {e}");
            }
        }

        tokio::time::sleep(interval).await;
    }

    Err(RunwayError::Timeout {
        waited: start.elapsed(),
        attempts,
    })
}

/// What one observed status means for the poll loop.
enum PollStep {
    /// Terminal success with the result URL.
    Done(String),
    /// Terminal failure or cancellation.
    Fail { status: String, detail: String },
    /// Keep polling.
    Wait,
}

fn classify(response: &TaskStatusResponse) -> PollStep {
    match response.status.as_str() {
        // SUCCEEDED without output is not terminal yet; the output list can
        // lag the status transition by one poll.
        "SUCCEEDED" => match response.output.first() {
            Some(url) if !url.is_empty() => PollStep::Done(url.clone()),
            _ => PollStep::Wait,
        },
        "FAILED" | "CANCELED" => PollStep::Fail {
            status: response.status.clone(),
            detail: response
                .failure
                .clone()
                .or_else(|| response.failure_code.clone())
                .unwrap_or_else(|| "no detail provided".into()),
        },
        _ => PollStep::Wait,
    }
}

// Wire types

#[derive(Debug, Serialize)]
struct PromptImage {
    uri: String,
    position: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationPayload {
    prompt_image: Vec<PromptImage>,
    prompt_text: String,
    model: String,
    duration: u32,
    ratio: AspectRatio,
    seed: u32,
    watermark: bool,
}

impl GenerationPayload {
    fn from_request(request: &GenerationRequest) -> Result<Self> {
        Ok(Self {
            prompt_image: vec![
                PromptImage {
                    uri: encode_data_uri(&request.first_frame)?,
                    position: "first",
                },
                PromptImage {
                    uri: encode_data_uri(&request.last_frame)?,
                    position: "last",
                },
            ],
            prompt_text: request.prompt_text.clone(),
            model: request.model.clone(),
            duration: request.duration,
            ratio: request.ratio,
            seed: request.seed,
            watermark: request.watermark,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskStatusResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Vec<String>,
    #[serde(default)]
    failure: Option<String>,
    #[serde(default, rename = "failureCode")]
    failure_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn status(s: &str) -> TaskStatusResponse {
        TaskStatusResponse {
            status: s.into(),
            output: vec![],
            failure: None,
            failure_code: None,
        }
    }

    fn succeeded(urls: &[&str]) -> TaskStatusResponse {
        TaskStatusResponse {
            status: "SUCCEEDED".into(),
            output: urls.iter().map(|u| u.to_string()).collect(),
            failure: None,
            failure_code: None,
        }
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let client = RunwayClientBuilder::new()
            .api_key("test-key")
            .poll_interval(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert_eq!(client.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_missing_key() {
        std::env::remove_var("RUNWAY_API_KEY");
        let result = RunwayClientBuilder::new().build();
        assert!(matches!(result, Err(RunwayError::Submission(_))));
    }

    #[test]
    fn test_builder_rejects_empty_key() {
        std::env::remove_var("RUNWAY_API_KEY");
        let result = RunwayClientBuilder::new().api_key("").build();
        assert!(matches!(result, Err(RunwayError::Submission(_))));
    }

    #[test]
    fn test_task_id_from_response() {
        let ok = SubmitResponse {
            id: Some("task-123".into()),
        };
        assert_eq!(task_id_from(ok).unwrap(), "task-123");

        let missing = SubmitResponse { id: None };
        assert!(matches!(
            task_id_from(missing),
            Err(RunwayError::Submission(_))
        ));

        let empty = SubmitResponse {
            id: Some(String::new()),
        };
        assert!(matches!(
            task_id_from(empty),
            Err(RunwayError::Submission(_))
        ));
    }

    #[test]
    fn test_classify_succeeded_with_output() {
        let step = classify(&succeeded(&["https://x/video.mp4", "https://x/alt.mp4"]));
        match step {
            PollStep::Done(url) => assert_eq!(url, "https://x/video.mp4"),
            _ => panic!("expected Done"),
        }
    }

    #[test]
    fn test_classify_succeeded_empty_output_keeps_waiting() {
        assert!(matches!(classify(&succeeded(&[])), PollStep::Wait));
        assert!(matches!(classify(&succeeded(&[""])), PollStep::Wait));
    }

    #[test]
    fn test_classify_terminal_failure() {
        let mut resp = status("FAILED");
        resp.failure = Some("internal error".into());
        match classify(&resp) {
            PollStep::Fail { status, detail } => {
                assert_eq!(status, "FAILED");
                assert_eq!(detail, "internal error");
            }
            _ => panic!("expected Fail"),
        }

        let mut resp = status("CANCELED");
        resp.failure_code = Some("SAFETY.INPUT.TEXT".into());
        match classify(&resp) {
            PollStep::Fail { status, detail } => {
                assert_eq!(status, "CANCELED");
                assert_eq!(detail, "SAFETY.INPUT.TEXT");
            }
            _ => panic!("expected Fail"),
        }
    }

    #[test]
    fn test_classify_non_terminal_statuses_wait() {
        for s in ["RUNNING", "PENDING", "THROTTLED", "SOMETHING_NEW", ""] {
            assert!(matches!(classify(&status(s)), PollStep::Wait));
        }
    }

    #[test]
    fn test_payload_serialization() {
        let frame = DynamicImage::new_rgb8(8, 8);
        let request = GenerationRequest::new(frame.clone(), frame, "A cinematic scene")
            .with_duration(7)
            .with_seed(42)
            .with_watermark(true);
        let payload = GenerationPayload::from_request(&request).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["promptText"], "A cinematic scene");
        assert_eq!(json["model"], "gen3a_turbo");
        assert_eq!(json["duration"], 7);
        assert_eq!(json["ratio"], "1280:768");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["watermark"], true);

        let images = json["promptImage"].as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["position"], "first");
        assert_eq!(images[1]["position"], "last");
        for img in images {
            let uri = img["uri"].as_str().unwrap();
            assert!(uri.starts_with("data:image/jpeg;base64,"));
        }
    }

    #[test]
    fn test_task_response_deserialization() {
        let json = r#"{
            "id": "task-123",
            "status": "SUCCEEDED",
            "output": ["https://x/video.mp4"],
            "createdAt": "2024-11-06T12:00:00Z"
        }"#;
        let resp: TaskStatusResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "SUCCEEDED");
        assert_eq!(resp.output, vec!["https://x/video.mp4"]);
    }

    #[test]
    fn test_task_response_missing_fields_default() {
        let resp: TaskStatusResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.status, "");
        assert!(resp.output.is_empty());
        assert!(resp.failure.is_none());
    }

    #[tokio::test]
    async fn test_poll_loop_success_after_exactly_three_checks() {
        let calls = AtomicU32::new(0);
        let mut queue = VecDeque::from(vec![
            status("RUNNING"),
            status("RUNNING"),
            succeeded(&["https://x/video.mp4"]),
        ]);

        let result = poll_loop(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                let resp = queue.pop_front().expect("no more scripted responses");
                async move { Ok(resp) }
            },
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            JobStatus::Succeeded {
                result_url: "https://x/video.mp4".into()
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_poll_loop_failed_aborts_on_first_observation() {
        let calls = AtomicU32::new(0);

        let result = poll_loop(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(status("FAILED")) }
            },
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await;

        assert!(matches!(result, Err(RunwayError::Task { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_poll_loop_times_out() {
        let result = poll_loop(
            || async { Ok(status("RUNNING")) },
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .await;

        match result {
            Err(RunwayError::Timeout { attempts, .. }) => assert!(attempts >= 1),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_poll_loop_retries_transient_errors() {
        let mut queue: VecDeque<Result<TaskStatusResponse>> = VecDeque::from(vec![
            Err(RunwayError::Json(
                serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            )),
            Ok(succeeded(&["https://x/video.mp4"])),
        ]);

        let result = poll_loop(
            || {
                let next = queue.pop_front().expect("no more scripted responses");
                async move { next }
            },
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            JobStatus::Succeeded {
                result_url: "https://x/video.mp4".into()
            }
        );
    }
}
