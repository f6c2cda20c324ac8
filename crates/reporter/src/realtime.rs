//! Incremental analysis driver.
//!
//! Reclassifies a single node as the user navigates, without rerunning the
//! whole tree. At most one attempt is logically in flight: a newer
//! navigation event makes any unapplied result stale, and stale results
//! are simply dropped.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use chess_core::evaluation::{top_engine_line, EngineLine};
use state_tree::{NodeId, StateTree};

use crate::accuracy::{game_accuracy, move_accuracy, Accuracies};
use crate::classify::{classify, AnalysisOptions};
use crate::error::{ClassifyError, LineFetchError, PermissionError, RealtimeError};
use crate::opening::OpeningBook;

/// Where the driver currently is for the active node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Inactive,
    AwaitingLines,
    AwaitingSession,
}

/// Snapshot pushed to observers whenever the driver does something
/// observable.
#[derive(Debug, Clone)]
pub struct RealtimeUpdate {
    pub node: Option<NodeId>,
    pub status: AnalysisStatus,
    pub accuracies: Option<Accuracies>,
    pub error: Option<RealtimeError>,
}

impl Default for RealtimeUpdate {
    fn default() -> Self {
        Self {
            node: None,
            status: AnalysisStatus::Inactive,
            accuracies: None,
            error: None,
        }
    }
}

/// Supplies engine lines for a position on demand.
pub trait LineProvider: Send {
    fn lines(
        &self,
        fen: &str,
    ) -> impl std::future::Future<Output = Result<Vec<EngineLine>, LineFetchError>> + Send;
}

/// A fixed fen → lines table; the usual provider in tests and offline
/// runs.
#[derive(Debug, Clone, Default)]
pub struct MappedLines(pub HashMap<String, Vec<EngineLine>>);

impl LineProvider for MappedLines {
    async fn lines(&self, fen: &str) -> Result<Vec<EngineLine>, LineFetchError> {
        self.0
            .get(fen)
            .cloned()
            .ok_or_else(|| LineFetchError(format!("no lines for position {fen}")))
    }
}

/// Grants or refuses the short-lived usage permit a deployment may require
/// before classification runs.
pub trait SessionGate: Send {
    fn acquire(
        &self,
    ) -> impl std::future::Future<Output = Result<(), PermissionError>> + Send;
}

/// Anonymous/local operation: every request is permitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousSession;

impl SessionGate for AnonymousSession {
    async fn acquire(&self) -> Result<(), PermissionError> {
        Ok(())
    }
}

pub struct RealtimeAnalyser<L, S> {
    tree: Arc<Mutex<StateTree>>,
    book: Arc<OpeningBook>,
    options: AnalysisOptions,
    lines: L,
    session: S,
    /// Whether a refused permit is an error (true) or a silent
    /// deactivation (false, anonymous operation is acceptable).
    session_required: bool,
    events: mpsc::Receiver<NodeId>,
    updates: watch::Sender<RealtimeUpdate>,
}

impl<L: LineProvider, S: SessionGate> RealtimeAnalyser<L, S> {
    /// Returns the driver plus the navigation-event sender and the
    /// observer side of the update channel.
    pub fn new(
        tree: Arc<Mutex<StateTree>>,
        book: Arc<OpeningBook>,
        options: AnalysisOptions,
        lines: L,
        session: S,
        session_required: bool,
    ) -> (Self, mpsc::Sender<NodeId>, watch::Receiver<RealtimeUpdate>) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (update_tx, update_rx) = watch::channel(RealtimeUpdate::default());

        (
            Self {
                tree,
                book,
                options,
                lines,
                session,
                session_required,
                events: event_rx,
                updates: update_tx,
            },
            event_tx,
            update_rx,
        )
    }

    /// Consumes navigation events until the sender is dropped. Bursts of
    /// events collapse to the newest one.
    pub async fn run(mut self) {
        let mut preempted: Option<NodeId> = None;

        loop {
            let mut node = match preempted.take() {
                Some(node) => node,
                None => match self.events.recv().await {
                    Some(node) => node,
                    None => break,
                },
            };

            while let Ok(newer) = self.events.try_recv() {
                node = newer;
            }

            preempted = self.consider(node).await;
        }

        debug!("realtime analyser shut down");
    }

    /// One classification attempt. Returns a node id when a newer
    /// navigation event preempted this attempt mid-flight.
    async fn consider(&mut self, node: NodeId) -> Option<NodeId> {
        // Guards that need no awaiting: root, and a parent with no lines.
        {
            let tree = self.tree.lock().await;
            let Some(current) = tree.get(node) else {
                return None;
            };
            let Some(parent) = current.parent else {
                return None;
            };

            if tree.node(parent).state.engine_lines.is_empty() {
                if current.state.classification.is_some() {
                    // Nothing to re-verify; leave the node as it is.
                    self.publish(node, AnalysisStatus::Inactive, None, None);
                } else {
                    self.publish(
                        node,
                        AnalysisStatus::Inactive,
                        None,
                        Some(RealtimeError::InsufficientLines),
                    );
                }
                return None;
            }
        }

        self.publish(node, AnalysisStatus::AwaitingSession, None, None);
        if let Err(refused) = self.session.acquire().await {
            if self.session_required {
                warn!(%refused, "session permit refused");
                self.publish(
                    node,
                    AnalysisStatus::Inactive,
                    None,
                    Some(refused.into()),
                );
            } else {
                // Anonymous operation is acceptable here; deactivate quietly.
                debug!(%refused, "session permit refused; deactivating");
                self.publish(node, AnalysisStatus::Inactive, None, None);
            }
            return None;
        }

        if let Some(newer) = self.newer_event(node) {
            return Some(newer);
        }

        // Fetch lines for the reached position if it has none yet.
        let missing_fen = {
            let tree = self.tree.lock().await;
            let state = &tree.node(node).state;
            state.engine_lines.is_empty().then(|| state.fen.clone())
        };

        if let Some(fen) = missing_fen {
            self.publish(node, AnalysisStatus::AwaitingLines, None, None);

            match self.lines.lines(&fen).await {
                Ok(lines) => {
                    if let Some(newer) = self.newer_event(node) {
                        // Stale result: the user has moved on.
                        return Some(newer);
                    }
                    let mut tree = self.tree.lock().await;
                    tree.node_mut(node).state.engine_lines = lines;
                }
                Err(err) => {
                    self.publish(
                        node,
                        AnalysisStatus::Inactive,
                        None,
                        Some(err.into()),
                    );
                    return None;
                }
            }
        }

        if let Some(newer) = self.newer_event(node) {
            return Some(newer);
        }

        // Classify and apply in a single critical section so observers
        // never see a half-updated node.
        let mut tree = self.tree.lock().await;

        match classify(&tree, node, &self.book, &self.options) {
            Ok(classification) => {
                let accuracy = {
                    let current = tree.node(node);
                    let parent = tree.node(current.parent.expect("guarded above"));
                    match (
                        top_engine_line(&parent.state.engine_lines),
                        top_engine_line(&current.state.engine_lines),
                        current.state.move_colour,
                    ) {
                        (Some(previous), Some(reached), Some(colour)) => Some(
                            move_accuracy(previous.evaluation, reached.evaluation, colour),
                        ),
                        _ => None,
                    }
                };

                let opening = self
                    .book
                    .name_for(&tree.node(node).state.fen)
                    .map(str::to_string);

                let state = &mut tree.node_mut(node).state;
                if !state
                    .classification
                    .is_some_and(chess_core::Classification::is_inalterable)
                {
                    state.classification = Some(classification);
                }
                if accuracy.is_some() {
                    state.accuracy = accuracy;
                }
                if opening.is_some() {
                    state.opening = opening;
                }

                let accuracies = game_accuracy(&tree);
                drop(tree);

                info!(node = node.0, ?classification, "realtime classification applied");
                self.publish(node, AnalysisStatus::Inactive, Some(accuracies), None);
            }
            Err(ClassifyError::InsufficientData) => {
                drop(tree);
                self.publish(
                    node,
                    AnalysisStatus::Inactive,
                    None,
                    Some(RealtimeError::InsufficientLines),
                );
            }
            Err(ClassifyError::MissingParent) => {
                drop(tree);
            }
        }

        None
    }

    /// A queued navigation event to a different node makes the current
    /// attempt stale.
    fn newer_event(&mut self, node: NodeId) -> Option<NodeId> {
        match self.events.try_recv() {
            Ok(newer) if newer != node => Some(newer),
            _ => None,
        }
    }

    fn publish(
        &self,
        node: NodeId,
        status: AnalysisStatus,
        accuracies: Option<Accuracies>,
        error: Option<RealtimeError>,
    ) {
        let _ = self.updates.send(RealtimeUpdate {
            node: Some(node),
            status,
            accuracies,
            error,
        });
    }
}
