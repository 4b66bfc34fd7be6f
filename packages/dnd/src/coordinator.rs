//! # Drop Coordinator
//!
//! One coordinator per editor instance. `release` runs on the origin when the
//! pointer goes up; `pump` runs on every instance's next turn and applies
//! whatever the channel delivered since.
//!
//! The origin removes the dragged block by the order it had at release, not by
//! id. If the origin's document changes between `release` and `pump`, that
//! order may name a different block, and that block is deleted.

use std::fmt;
use std::sync::Arc;

use blockwise_editor::{BlockId, CommandError, DeleteOptions, Editor, InsertOptions};
use tracing::{debug, info, instrument, warn};

use crate::channel::{BroadcastChannel, BroadcastReceiver};
use crate::errors::DropError;
use crate::message::{DropMessage, Pointer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released over nothing with a block identity
    NoTarget,

    /// Target is in the origin's own document; reorder with `move_block`
    Local { target: BlockId },

    /// Published to `receivers` listeners (the origin's own included); the
    /// block at `order` is deleted on the origin's next `pump`
    Broadcast { receivers: usize, order: usize },
}

/// What one `pump` applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub inserted: Vec<BlockId>,
    pub deleted: Vec<BlockId>,
    /// Foreign messages and drops onto blocks this instance does not own
    pub ignored: usize,
    /// Malformed drops and drops the editor refused
    pub rejected: usize,
}

#[derive(Debug, Clone)]
struct PendingDelete {
    block_id: BlockId,
    order: usize,
}

pub struct DropCoordinator {
    channel: Arc<dyn BroadcastChannel>,
    receiver: Box<dyn BroadcastReceiver>,
    pending_deletes: Vec<PendingDelete>,
}

impl DropCoordinator {
    /// Subscribe to `channel`; only messages published after this are seen
    pub fn new(channel: Arc<dyn BroadcastChannel>) -> Self {
        let receiver = channel.subscribe();
        Self {
            channel,
            receiver,
            pending_deletes: Vec::new(),
        }
    }

    pub fn pending_deletes(&self) -> usize {
        self.pending_deletes.len()
    }

    /// Handle a pointer release of `dragged` over `target`
    #[instrument(skip(self, editor, target, pointer), fields(editor_id = %editor.id(), target_id = ?target))]
    pub fn release(
        &mut self,
        editor: &Editor,
        dragged: &str,
        target: Option<&str>,
        pointer: Pointer,
    ) -> Result<DropOutcome, DropError> {
        if editor.config().read_only {
            return Err(CommandError::ReadOnly.into());
        }
        let block = editor
            .block(dragged)
            .ok_or_else(|| CommandError::BlockNotFound(dragged.to_string()))?;

        let Some(target) = target else {
            debug!("Released without a drop target");
            return Ok(DropOutcome::NoTarget);
        };
        if editor.contains(target) {
            debug!(target_id = target, "Released over a local block");
            return Ok(DropOutcome::Local {
                target: target.to_string(),
            });
        }

        let order = block.meta.order;
        let message = DropMessage::new(target, block.clone(), pointer).to_value()?;
        let receivers = self.channel.publish(message);

        info!(target_id = target, order, receivers, "Broadcast block drop");
        self.pending_deletes.push(PendingDelete {
            block_id: dragged.to_string(),
            order,
        });

        Ok(DropOutcome::Broadcast { receivers, order })
    }

    /// Apply delivered drops, then this instance's own pending deletes
    #[instrument(skip_all, fields(editor_id = %editor.id()))]
    pub fn pump(&mut self, editor: &mut Editor) -> Result<PumpReport, DropError> {
        let mut report = PumpReport::default();

        while let Some(value) = self.receiver.try_recv() {
            let message = match DropMessage::from_value(&value) {
                Ok(Some(message)) => message,
                Ok(None) => {
                    report.ignored += 1;
                    continue;
                }
                Err(err) => {
                    warn!(error = %err, "Malformed drop message");
                    report.rejected += 1;
                    continue;
                }
            };

            let Some(target_order) = editor.order_of(&message.id) else {
                report.ignored += 1;
                continue;
            };

            let at = target_order + 1;
            match editor.insert_block(message.block, InsertOptions::at(at)) {
                Ok(id) => {
                    info!(block_id = %id, target_id = %message.id, at, "Accepted dropped block");
                    report.inserted.push(id);
                }
                Err(err) => {
                    warn!(error = %err, target_id = %message.id, "Rejected dropped block");
                    report.rejected += 1;
                }
            }
        }

        for pending in std::mem::take(&mut self.pending_deletes) {
            let deleted = editor.delete_block(DeleteOptions::paths([pending.order]))?;
            match deleted.first() {
                Some(id) if *id == pending.block_id => {
                    debug!(block_id = %id, order = pending.order, "Removed dropped block from origin")
                }
                Some(id) => warn!(
                    expected = %pending.block_id,
                    deleted = %id,
                    order = pending.order,
                    "Origin order went stale before delete"
                ),
                None => warn!(
                    expected = %pending.block_id,
                    order = pending.order,
                    "Origin order no longer resolves"
                ),
            }
            report.deleted.extend(deleted);
        }

        Ok(report)
    }
}

impl fmt::Debug for DropCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropCoordinator")
            .field("pending_deletes", &self.pending_deletes)
            .finish_non_exhaustive()
    }
}
