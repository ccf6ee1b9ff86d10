//! Background render worker.
//!
//! Interaction state stays on the caller's thread; each render request
//! carries its own copy of the viewport and parameters. Only the newest
//! request per view is honoured: queued older ones are skipped, an in-flight
//! one is cancelled between tiles, a request superseded before its pass
//! starts is skipped, and any response that still arrives with an outdated
//! id is dropped by [`RenderWorker::poll`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use tracing::{debug, trace};

use fractview_core::{FractalParams, Viewport};
use fractview_render::{render_with, RenderCancel, RenderResult, ScalarField, ScalarMode};

use crate::error::AppError;

/// Which panel a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Primary,
    Julia,
}

impl View {
    const ALL: [View; 2] = [View::Primary, View::Julia];

    fn index(self) -> usize {
        match self {
            View::Primary => 0,
            View::Julia => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderRequest {
    pub id: u64,
    pub view: View,
    pub viewport: Viewport,
    pub params: FractalParams,
    pub mode: ScalarMode,
}

#[derive(Debug)]
pub struct RenderResponse {
    pub id: u64,
    pub view: View,
    pub viewport: Viewport,
    pub result: RenderResult,
}

/// A frame accepted as current for its view.
#[derive(Debug, Clone)]
pub struct Frame {
    pub view: View,
    pub viewport: Viewport,
    pub field: ScalarField,
}

/// Id of the request each view currently wants; 0 when none.
type Wanted = Arc<[AtomicU64; 2]>;

pub struct RenderWorker {
    tx_request: Option<mpsc::Sender<RenderRequest>>,
    rx_response: mpsc::Receiver<RenderResponse>,
    cancels: [Arc<RenderCancel>; 2],
    wanted: Wanted,
    next_id: u64,
    /// Latest id issued per view; `None` when nothing is wanted.
    pending: [Option<u64>; 2],
    handle: Option<thread::JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn() -> Result<Self, AppError> {
        let (tx_request, rx_request) = mpsc::channel();
        let (tx_response, rx_response) = mpsc::channel();
        let cancels = [Arc::new(RenderCancel::new()), Arc::new(RenderCancel::new())];
        let wanted: Wanted = Arc::new([AtomicU64::new(0), AtomicU64::new(0)]);
        let worker_cancels = cancels.clone();
        let worker_wanted = Arc::clone(&wanted);
        let handle = thread::Builder::new()
            .name("render-worker".into())
            .spawn(move || worker_loop(rx_request, tx_response, worker_cancels, worker_wanted))
            .map_err(AppError::Worker)?;
        Ok(Self {
            tx_request: Some(tx_request),
            rx_response,
            cancels,
            wanted,
            next_id: 0,
            pending: [None, None],
            handle: Some(handle),
        })
    }

    /// Queue a render for `view`, superseding any earlier one. Returns its id.
    pub fn submit(
        &mut self,
        view: View,
        viewport: Viewport,
        params: FractalParams,
        mode: ScalarMode,
    ) -> Result<u64, AppError> {
        self.next_id += 1;
        let id = self.next_id;
        self.wanted[view.index()].store(id, Ordering::SeqCst);
        self.cancels[view.index()].cancel();
        self.pending[view.index()] = Some(id);
        debug!(id, ?view, scale = viewport.scale, "Requesting render");

        let req = RenderRequest {
            id,
            view,
            viewport,
            params,
            mode,
        };
        self.tx_request
            .as_ref()
            .ok_or(AppError::WorkerGone)?
            .send(req)
            .map_err(|_| AppError::WorkerGone)?;
        Ok(id)
    }

    /// Stop wanting frames for `view`; anything in flight is discarded.
    pub fn abandon(&mut self, view: View) {
        if self.pending[view.index()].take().is_some() {
            self.wanted[view.index()].store(0, Ordering::SeqCst);
            self.cancels[view.index()].cancel();
            debug!(?view, "Abandoned render");
        }
    }

    pub fn is_pending(&self, view: View) -> bool {
        self.pending[view.index()].is_some()
    }

    /// Collect finished frames without blocking. Stale ones are dropped.
    pub fn poll(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(resp) = self.rx_response.try_recv() {
            if let Some(frame) = self.accept(resp) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Block until the current request for `view` completes.
    ///
    /// Returns `Ok(None)` when nothing is pending for that view. Frames for
    /// the other view that arrive meanwhile are handed to `other`.
    pub fn wait_for(
        &mut self,
        view: View,
        mut other: impl FnMut(Frame),
    ) -> Result<Option<Frame>, AppError> {
        while self.is_pending(view) {
            let resp = self.rx_response.recv().map_err(|_| AppError::WorkerGone)?;
            if let Some(frame) = self.accept(resp) {
                if frame.view == view {
                    return Ok(Some(frame));
                }
                other(frame);
            }
        }
        Ok(None)
    }

    fn accept(&mut self, resp: RenderResponse) -> Option<Frame> {
        let slot = &mut self.pending[resp.view.index()];
        if *slot != Some(resp.id) || resp.result.cancelled {
            trace!(id = resp.id, view = ?resp.view, "Dropping stale frame");
            return None;
        }
        *slot = None;
        Some(Frame {
            view: resp.view,
            viewport: resp.viewport,
            field: resp.result.field,
        })
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        for cancel in &self.cancels {
            cancel.cancel();
        }
        // Closing the channel ends the worker loop.
        self.tx_request.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Newest queued request per view, starting from `initial`.
fn drain_latest(
    initial: RenderRequest,
    rx: &mpsc::Receiver<RenderRequest>,
) -> [Option<RenderRequest>; 2] {
    let mut latest = [None, None];
    latest[initial.view.index()] = Some(initial);
    while let Ok(newer) = rx.try_recv() {
        latest[newer.view.index()] = Some(newer);
    }
    latest
}

fn worker_loop(
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
    cancels: [Arc<RenderCancel>; 2],
    wanted: Wanted,
) {
    while let Ok(initial) = rx.recv() {
        let latest = drain_latest(initial, &rx);
        for view in View::ALL {
            let Some(req) = latest[view.index()] else {
                continue;
            };
            if wanted[view.index()].load(Ordering::SeqCst) != req.id {
                trace!(id = req.id, ?view, "Skipping superseded request");
                continue;
            }
            let cancel = &cancels[view.index()];
            let result = match render_with(&req.viewport, &req.params, req.mode, cancel) {
                Ok(result) => result,
                Err(e) => {
                    debug!(id = req.id, "Render rejected: {e}");
                    continue;
                }
            };
            if result.cancelled {
                continue;
            }
            let resp = RenderResponse {
                id: req.id,
                view: req.view,
                viewport: req.viewport,
                result,
            };
            if tx.send(resp).is_err() {
                return;
            }
        }
    }
}
