/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines progress reporting messages, sinks, and helper functions for iso-surface runs.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Progress reporting primitives for gridding and surfacing runs.

use std::sync::{Arc, mpsc};
use std::thread;
use std::fmt::Debug;

/// Progress events emitted while gridding data and extracting iso-surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMsg {
    /// Event indicating progress for a single level.
    ///
    /// `progress` is the fraction of the work on this level completed, in `[0, 1]`.
    SurfacingProgress { isovalue: f64, stage: String, progress: f64 },

    /// Emitted once after every level has been processed, listing the levels
    /// that were out of range or failed to extract.
    LevelsSkipped { levels: Vec<f64> },

    /// Arbitrary informational message.
    Message { message: String },
}

/// Sink that consumes progress messages.
pub trait ProgressSink: Send + Sync + Debug {
    fn emit(&self, msg: ProgressMsg);
}

/// Progress sink that forwards messages over a channel.
///
/// Stage updates are dropped while the buffer is full. Skipped-level warnings
/// and plain messages wait for room so they always reach the handler.
#[derive(Debug)]
pub struct ClosureSink {
    tx: mpsc::SyncSender<ProgressMsg>,
}

impl ProgressSink for ClosureSink {
    #[inline]
    fn emit(&self, msg: ProgressMsg) {
        match msg {
            ProgressMsg::SurfacingProgress { .. } => {
                let _ = self.tx.try_send(msg);
            }
            _ => {
                let _ = self.tx.send(msg);
            }
        }
    }
}

/// Spawns a listener thread that runs a handler closure for each progress message.
///
/// The listener exits once every clone of the returned sink has been dropped.
pub fn closure_sink<F>(
    buffer: usize,
    mut handler: F,
) -> (Arc<dyn ProgressSink>, thread::JoinHandle<()>)
where
    F: FnMut(ProgressMsg) + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel::<ProgressMsg>(buffer.max(1));
    let sink: Arc<dyn ProgressSink> = Arc::new(ClosureSink { tx });

    let handle = thread::spawn(move || {
        while let Ok(msg) = rx.recv() {
            handler(msg);
        }
    });

    (sink, handle)
}

/// Emits `msg` if a sink is attached.
#[inline]
pub(crate) fn report(sink: &Option<Arc<dyn ProgressSink>>, msg: ProgressMsg) {
    if let Some(sink) = sink {
        sink.emit(msg);
    }
}
