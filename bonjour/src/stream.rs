//! Lazy producer of classified frames.
//!
//! A worker thread pulls frames from a [`FrameSource`], classifies them one by one and
//! publishes the matches on a bounded channel. The consumer side is a plain iterator.

use crate::classifier::{self, BonjourClassification};
use crate::frame::DecodedFrame;
use crate::source::{FrameSource, SourceError};
use crossbeam::channel::{Receiver, SendTimeoutError, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CAPACITY: usize = 1024;
pub const DEFAULT_THREAD_NAME: &str = "mdns-classifier";

/// How long a full channel is waited on before cancellation is checked again.
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub type StreamItem = Result<BonjourClassification, SourceError>;

/// Shared stop flag of a stream.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Debug)]
pub struct StreamOptions {
    pub capacity: usize,
    pub thread_name: String,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

/// Counters updated by the worker while the stream runs.
#[derive(Debug, Default)]
pub struct StreamStats {
    read: AtomicU64,
    matched: AtomicU64,
    skipped: AtomicU64,
}

impl StreamStats {
    pub fn frames_read(&self) -> u64 {
        self.read.load(Ordering::Relaxed)
    }

    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }
}

/// Starts classifying `source` on a dedicated thread.
pub fn produce<S>(source: S, options: StreamOptions) -> Result<ClassifiedStream, StreamError>
where
    S: FrameSource + Send + 'static,
{
    let (sender, receiver) = crossbeam::channel::bounded::<StreamItem>(options.capacity);
    let token = CancelToken::new();
    let stats = Arc::new(StreamStats::default());

    let worker = Worker {
        sender,
        token: token.clone(),
        stats: Arc::clone(&stats),
    };
    let handle = std::thread::Builder::new()
        .name(options.thread_name)
        .spawn(move || worker.run(source))
        .map_err(StreamError::Spawn)?;

    Ok(ClassifiedStream {
        receiver,
        token,
        stats,
        handle: Some(handle),
        finished: false,
    })
}

struct Worker {
    sender: Sender<StreamItem>,
    token: CancelToken,
    stats: Arc<StreamStats>,
}

impl Worker {
    fn run<S: FrameSource>(self, mut source: S) {
        log::debug!("Classifier worker started.");

        loop {
            if self.token.is_cancelled() {
                log::debug!("Classifier worker cancelled.");
                break;
            }

            let raw = match source.next_frame() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    log::debug!("Frame source exhausted.");
                    break;
                },
                Err(SourceError::Timeout) => continue,
                Err(err) => {
                    log::error!("Frame source failed: {err}");
                    self.publish(Err(err));
                    break;
                },
            };
            self.stats.read.fetch_add(1, Ordering::Relaxed);

            let frame = Arc::new(DecodedFrame::new(raw));
            match classifier::classify(&frame) {
                Some(classification) => {
                    self.stats.matched.fetch_add(1, Ordering::Relaxed);
                    if !self.publish(Ok(classification)) {
                        break;
                    }
                },
                None => {
                    self.stats.skipped.fetch_add(1, Ordering::Relaxed);
                },
            }
        }

        log::debug!(
            "Classifier worker finished. Read: {}, matched: {}, skipped: {}.",
            self.stats.frames_read(),
            self.stats.matched(),
            self.stats.skipped()
        );
    }

    /// Waits for room in the channel. `false` once the stream is cancelled or abandoned.
    fn publish(&self, mut item: StreamItem) -> bool {
        loop {
            match self.sender.send_timeout(item, SEND_POLL_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(returned)) => {
                    if self.token.is_cancelled() {
                        return false;
                    }
                    item = returned;
                },
                Err(SendTimeoutError::Disconnected(_)) => {
                    log::debug!("Stream consumer is gone.");
                    self.token.cancel();
                    return false;
                },
            }
        }
    }
}

/// Consumer side of [`produce`]. Ends after the first error and is not restartable.
pub struct ClassifiedStream {
    receiver: Receiver<StreamItem>,
    token: CancelToken,
    stats: Arc<StreamStats>,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl ClassifiedStream {
    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn stats(&self) -> Arc<StreamStats> {
        Arc::clone(&self.stats)
    }

    /// Stops the worker and waits for it to exit.
    pub fn cancel(mut self) {
        self.token.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.join() {
                log::error!("Failed to join classifier worker: {:?}", err);
            }
        }
    }
}

impl Iterator for ClassifiedStream {
    type Item = StreamItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.receiver.recv() {
            Ok(Ok(classification)) => Some(Ok(classification)),
            Ok(Err(err)) => {
                self.finished = true;
                Some(Err(err))
            },
            Err(_) => {
                self.finished = true;
                None
            },
        }
    }
}

impl Drop for ClassifiedStream {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Classifies `source` on the calling thread.
pub fn classify_frames<S: FrameSource>(source: S) -> ClassifyFrames<S> {
    ClassifyFrames {
        source,
        finished: false,
    }
}

pub struct ClassifyFrames<S> {
    source: S,
    finished: bool,
}

impl<S: FrameSource> Iterator for ClassifyFrames<S> {
    type Item = StreamItem;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.source.next_frame() {
                Ok(Some(raw)) => {
                    let frame = Arc::new(DecodedFrame::new(raw));
                    if let Some(classification) = classifier::classify(&frame) {
                        return Some(Ok(classification));
                    }
                },
                Ok(None) => self.finished = true,
                Err(SourceError::Timeout) => continue,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                },
            }
        }

        None
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Failed to spawn classifier worker.")]
    Spawn(std::io::Error),
}

impl StreamError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            StreamError::Spawn(err) => Some(err.to_string()),
        }
    }
}
