//! Terrain generation off the render thread.
//!
//! Requests go to a single worker thread; finished fields come back over a
//! channel tagged with the ticket of the request that produced them. The
//! caller polls [`BackgroundGenerator::latest`] once per frame and swaps in a
//! complete field, never a partially written one.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::noise::{GradientNoise, NoiseSource};
use crate::pipeline::{generate_terrain_with, PipelineError};
use crate::terrain::{TerrainField, TerrainSettings};

struct GenerationRequest {
    ticket: u64,
    settings: TerrainSettings,
}

/// A finished generation run.
#[derive(Debug)]
pub struct GenerationResult {
    /// Ticket returned by the `submit` call that produced this result.
    pub ticket: u64,
    pub field: Result<TerrainField, PipelineError>,
    /// Generation time in microseconds.
    pub generation_time_us: u64,
}

/// Runs `generate_terrain` on a background thread.
pub struct BackgroundGenerator {
    request_sender: Option<Sender<GenerationRequest>>,
    result_receiver: Receiver<GenerationResult>,
    worker: Option<JoinHandle<()>>,
    next_ticket: u64,
    newest_seen: Option<u64>,
}

impl BackgroundGenerator {
    /// Spawns the worker using the default gradient noise.
    pub fn new() -> std::io::Result<Self> {
        Self::with_noise(Arc::new(GradientNoise::default()))
    }

    /// Spawns the worker with an injected noise source.
    pub fn with_noise(noise: Arc<dyn NoiseSource>) -> std::io::Result<Self> {
        let (request_sender, request_receiver) = unbounded::<GenerationRequest>();
        let (result_sender, result_receiver) = unbounded::<GenerationResult>();

        let worker = std::thread::Builder::new()
            .name("terrain-gen-worker".into())
            .spawn(move || {
                while let Ok(mut request) = request_receiver.recv() {
                    // Later requests supersede queued ones.
                    while let Ok(newer) = request_receiver.try_recv() {
                        tracing::debug!(skipped = request.ticket, "superseded generation request");
                        request = newer;
                    }

                    let start = Instant::now();
                    let field = generate_terrain_with(noise.as_ref(), &request.settings);
                    let elapsed = start.elapsed().as_micros() as u64;

                    if let Err(e) = &field {
                        tracing::warn!(ticket = request.ticket, error = %e, "background generation failed");
                    }

                    let result = GenerationResult {
                        ticket: request.ticket,
                        field,
                        generation_time_us: elapsed,
                    };
                    if result_sender.send(result).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            request_sender: Some(request_sender),
            result_receiver,
            worker: Some(worker),
            next_ticket: 0,
            newest_seen: None,
        })
    }

    /// Queues a generation run and returns its ticket. Tickets increase
    /// monotonically.
    pub fn submit(&mut self, settings: TerrainSettings) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        if let Some(sender) = &self.request_sender {
            if sender.send(GenerationRequest { ticket, settings }).is_err() {
                tracing::warn!(ticket, "terrain worker has stopped; request dropped");
            }
        }
        ticket
    }

    /// Drains finished results and returns the newest one not yet returned.
    /// Older results are discarded.
    pub fn latest(&mut self) -> Option<GenerationResult> {
        let mut newest: Option<GenerationResult> = None;
        while let Ok(result) = self.result_receiver.try_recv() {
            if newest.as_ref().map_or(true, |n| result.ticket > n.ticket) {
                newest = Some(result);
            }
        }

        let result = newest?;
        if self.newest_seen.is_some_and(|seen| result.ticket <= seen) {
            return None;
        }
        self.newest_seen = Some(result.ticket);
        Some(result)
    }

    /// Blocks until the result for `ticket` (or a newer one) arrives.
    pub fn wait_for(&mut self, ticket: u64) -> Option<GenerationResult> {
        loop {
            let result = self.result_receiver.recv().ok()?;
            if result.ticket >= ticket {
                self.newest_seen = Some(result.ticket);
                return Some(result);
            }
        }
    }
}

impl Drop for BackgroundGenerator {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.request_sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
