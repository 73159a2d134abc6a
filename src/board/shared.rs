//! Thread-safe board handle.
//!
//! Commands take the write lock, queries take the read lock, so every read
//! sees either the state before a command or the state after it.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::board::state::Board;
use crate::error::BoardError;
use crate::store::models::Machine;

#[derive(Debug, Clone)]
pub struct SharedBoard {
    inner: Arc<RwLock<Board>>,
}

impl SharedBoard {
    pub fn new(board: Board) -> Self {
        Self {
            inner: Arc::new(RwLock::new(board)),
        }
    }

    /// Run a query under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        let board = self.inner.read();
        f(&board)
    }

    /// Run a command under the write lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut Board) -> R) -> R {
        let mut board = self.inner.write();
        f(&mut board)
    }

    /// Owned copy of the filtered records.
    pub fn filtered_snapshot(&self) -> Vec<Machine> {
        self.read(|board| board.filtered_records().into_iter().cloned().collect())
    }

    /// Grouped view of the current state as JSON.
    pub fn grouped_json(&self) -> Result<String, BoardError> {
        self.read(|board| Ok(serde_json::to_string(&board.grouped_view())?))
    }
}
