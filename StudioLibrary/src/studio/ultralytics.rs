use std::path::Path;
use serde::Serialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{timeout_at, Instant};
use async_trait::async_trait;
use crate::utils::logging::*;
use crate::utils::config::Config;
use crate::studio::detector::Detector;
use crate::studio::utils::frame::Frame;
use crate::studio::utils::bounding_box::BoundingBox;
use crate::studio::utils::detection_result::DetectionResult;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as AsyncCommand};

#[derive(Serialize)]
struct DetectionRequest<'a> {
    image: &'a Path,
}

struct DetectorWorker {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    broken: bool,
}

impl DetectorWorker {
    async fn request(&mut self, line: String, wait: Duration) -> Result<DetectionResult, String> {
        self.stdin.write_all(line.as_bytes()).await
            .map_err(|err| err.to_string())?;
        self.stdin.flush().await
            .map_err(|err| err.to_string())?;
        self.read_result(wait).await
    }

    //Lines that are not a reply are stray library output, the deadline covers all of them.
    async fn read_result(&mut self, wait: Duration) -> Result<DetectionResult, String> {
        let deadline = Instant::now() + wait;
        loop {
            let line = timeout_at(deadline, self.lines.next_line()).await
                .map_err(|_| format!("No reply within {} seconds", wait.as_secs()))?
                .map_err(|err| err.to_string())?
                .ok_or_else(|| "Worker closed its output".to_string())?;
            match serde_json::from_str::<DetectionResult>(&line) {
                Ok(result) => return Ok(result),
                Err(_) => logging_debug!(VideoEntry::WorkerOutput(line)),
            }
        }
    }
}

/// Ultralytics YOLO model hosted in a long-lived `Script/detect.py` child process.
///
/// Requests are serialized through the worker lock. Once a request times out or the pipe
/// breaks the worker is considered lost and every later call fails immediately.
pub struct UltralyticsDetector {
    worker: Mutex<DetectorWorker>,
    detection_timeout: Duration,
}

impl UltralyticsDetector {
    pub async fn load(config: &Config) -> Result<Self, VideoEntry> {
        let mut child = AsyncCommand::new(&config.python_interpreter)
            .arg(&config.detector_script)
            .arg(&config.model_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| VideoEntry::ModelLoadError(SystemEntry::ChildProcessError(err.to_string()).into()))?;
        let stdin = child.stdin.take()
            .ok_or_else(|| VideoEntry::ModelLoadError(SystemEntry::ChildProcessError("stdin not captured".to_string()).into()))?;
        let stdout = child.stdout.take()
            .ok_or_else(|| VideoEntry::ModelLoadError(SystemEntry::ChildProcessError("stdout not captured".to_string()).into()))?;
        let mut worker = DetectorWorker {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            broken: false,
        };
        let handshake = worker.read_result(Duration::from_secs(config.model_load_timeout)).await
            .map_err(VideoEntry::ModelLoadError)?;
        handshake.into().map_err(VideoEntry::ModelLoadError)?;
        Ok(Self {
            worker: Mutex::new(worker),
            detection_timeout: Duration::from_secs(config.detection_timeout),
        })
    }
}

#[async_trait]
impl Detector for UltralyticsDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>, VideoEntry> {
        let file_name = frame.file_name();
        let mut worker = self.worker.lock().await;
        if worker.broken {
            return Err(VideoEntry::DetectionFailure(file_name, "Detector worker is unavailable".to_string()));
        }
        let mut request = serde_json::to_string(&DetectionRequest { image: &frame.path })
            .map_err(|err| VideoEntry::DetectionFailure(file_name.clone(), err.to_string()))?;
        request.push('\n');
        match worker.request(request, self.detection_timeout).await {
            Ok(result) => result.into()
                .map_err(|err| VideoEntry::DetectionFailure(file_name, err)),
            Err(err) => {
                worker.broken = true;
                Err(VideoEntry::DetectionFailure(file_name, err))
            }
        }
    }

    async fn shutdown(&self) {
        let mut worker = self.worker.lock().await;
        worker.broken = true;
        if let Err(err) = worker.child.kill().await {
            logging_warning!(SystemEntry::ChildProcessError(err.to_string()));
        }
    }
}
