//! # Blockwise Drag and Drop
//!
//! Moves blocks between independent editor instances on one page.
//!
//! ## Protocol
//!
//! ```text
//!  editor A (origin)                channel                editor B (owner)
//!  ─────────────────                ───────                ────────────────
//!  release(a1, target=b1)
//!    b1 not in A → publish ──── onBlockDropped{b1, a1} ───→ pump()
//!    remember (a1, order 0)                                   b1 @ k → insert a1 @ k+1
//!  pump()
//!    delete path 0
//! ```
//!
//! Delivery is fire-and-forget: nothing acknowledges a drop, and the origin
//! deletes whether or not any instance owned the target.
//!
//! ```rust,ignore
//! let channel = Arc::new(TokioBroadcast::new(ChannelConfig::default()));
//! let mut a = DropCoordinator::new(channel.clone());
//! let mut b = DropCoordinator::new(channel);
//!
//! a.release(&editor_a, "a1", Some("b1"), Pointer::new(10.0, 20.0))?;
//! b.pump(&mut editor_b)?;
//! a.pump(&mut editor_a)?;
//! ```

mod channel;
mod coordinator;
mod errors;
mod message;

pub use channel::{BroadcastChannel, BroadcastReceiver, ChannelConfig, TokioBroadcast};
pub use coordinator::{DropCoordinator, DropOutcome, PumpReport};
pub use errors::DropError;
pub use message::{DropMessage, Pointer, BLOCK_DROPPED};
