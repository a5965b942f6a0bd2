//! Wake-word front end.
//!
//! Pumps raw audio frames from a capture sink into an acoustic detection
//! engine and reports detections through a registered callback. The engine
//! itself (model loading, scoring) lives behind [`WakeWordEngine`]; this
//! module only owns the pump task and its lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{AgentError, AgentResult};

/// Audio format fed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeWordConfig {
    pub sample_rate: u32,
    pub channels: u8,
    pub bits_per_sample: u8,
}

impl Default for WakeWordConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            bits_per_sample: 16,
        }
    }
}

/// A wake-word detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub model_index: i32,
    pub word_index: i32,
}

/// The acoustic detection engine seam.
pub trait WakeWordEngine: Send {
    /// Feed one frame of 16-bit samples; returns a detection when the wake
    /// word fires within it.
    fn process(&mut self, samples: &[i16]) -> Option<Detection>;
}

/// Source of raw-audio frames (the capture sink seam).
#[async_trait]
pub trait FrameSource: Send {
    /// Next audio frame, or `None` when the source is exhausted.
    async fn next_frame(&mut self) -> Option<Vec<i16>>;
}

/// Callback invoked on each detection.
pub type DetectionCallback = Arc<dyn Fn(Detection) + Send + Sync>;

/// Owns the frame pump between a [`FrameSource`] and a [`WakeWordEngine`].
pub struct WakeWordHandler {
    config: WakeWordConfig,
    callback: DetectionCallback,
    engine: Option<Box<dyn WakeWordEngine>>,
    worker: Option<(CancellationToken, JoinHandle<Box<dyn WakeWordEngine>>)>,
}

impl WakeWordHandler {
    pub fn new(config: WakeWordConfig, engine: Box<dyn WakeWordEngine>) -> Self {
        Self {
            config,
            callback: Arc::new(|detection: Detection| {
                info!(
                    model_index = detection.model_index,
                    word_index = detection.word_index,
                    "wake word detected"
                );
            }),
            engine: Some(engine),
            worker: None,
        }
    }

    pub fn config(&self) -> WakeWordConfig {
        self.config
    }

    /// Replace the detection callback. The default logs the detection.
    pub fn set_callback(&mut self, callback: impl Fn(Detection) + Send + Sync + 'static) {
        self.callback = Arc::new(callback);
    }

    /// Start pumping frames from `source` into the engine.
    ///
    /// A second start while running is a warning and a no-op, matching the
    /// stop/start lifecycle of the capture pipeline around it.
    pub fn start(&mut self, mut source: Box<dyn FrameSource>) -> AgentResult<()> {
        if self.worker.is_some() {
            warn!("wake word handler already running");
            return Ok(());
        }
        let mut engine = self
            .engine
            .take()
            .ok_or_else(|| AgentError::Config("wake word engine unavailable".to_string()))?;
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let callback = self.callback.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    frame = source.next_frame() => match frame {
                        Some(samples) => {
                            if let Some(detection) = engine.process(&samples) {
                                callback(detection);
                            }
                        }
                        None => break,
                    },
                }
            }
            engine
        });
        self.worker = Some((cancel, handle));
        info!("wake word handler started");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop the pump and reclaim the engine. Idempotent.
    pub async fn stop(&mut self) {
        if let Some((cancel, handle)) = self.worker.take() {
            cancel.cancel();
            if let Ok(engine) = handle.await {
                self.engine = Some(engine);
            }
            info!("wake word handler stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;

    /// Fires on any frame containing the sample value 999.
    struct MarkerEngine;

    impl WakeWordEngine for MarkerEngine {
        fn process(&mut self, samples: &[i16]) -> Option<Detection> {
            samples.contains(&999).then_some(Detection {
                model_index: 0,
                word_index: 1,
            })
        }
    }

    struct ScriptedSource {
        frames: VecDeque<Vec<i16>>,
    }

    #[async_trait]
    impl FrameSource for ScriptedSource {
        async fn next_frame(&mut self) -> Option<Vec<i16>> {
            self.frames.pop_front()
        }
    }

    fn scripted(frames: Vec<Vec<i16>>) -> Box<ScriptedSource> {
        Box::new(ScriptedSource {
            frames: frames.into_iter().collect(),
        })
    }

    #[tokio::test]
    async fn test_detection_invokes_callback_once_per_hit() {
        let detections = Arc::new(Mutex::new(Vec::new()));
        let detections_in = detections.clone();
        let mut handler = WakeWordHandler::new(WakeWordConfig::default(), Box::new(MarkerEngine));
        handler.set_callback(move |detection| detections_in.lock().push(detection));

        handler
            .start(scripted(vec![vec![0, 1, 2], vec![5, 999, 6], vec![7, 8]]))
            .unwrap();
        handler.stop().await;

        assert_eq!(
            *detections.lock(),
            vec![Detection {
                model_index: 0,
                word_index: 1
            }]
        );
        assert!(!handler.is_running());
    }

    #[tokio::test]
    async fn test_double_start_is_noop_and_restart_works() {
        let mut handler = WakeWordHandler::new(WakeWordConfig::default(), Box::new(MarkerEngine));
        handler.start(scripted(vec![])).unwrap();
        // second start while running: warn + no-op
        handler.start(scripted(vec![])).unwrap();
        assert!(handler.is_running());
        handler.stop().await;
        handler.stop().await;
        // engine was reclaimed, a fresh start succeeds
        handler.start(scripted(vec![])).unwrap();
        handler.stop().await;
    }
}
