//! Position persistence
//!
//! Tracked positions are kept as a pretty-printed JSON array on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::Position;
use crate::error::{EdgeError, Result};

/// Load/save seam for tracked positions
#[async_trait]
pub trait PositionStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Position>>;
    async fn save(&self, positions: &[Position]) -> Result<()>;
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct JsonPositionStore {
    path: PathBuf,
}

impl JsonPositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PositionStore for JsonPositionStore {
    async fn load(&self) -> Result<Vec<Position>> {
        if !self.path.exists() {
            debug!("No positions file at {:?}, starting fresh", self.path);
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let positions: Vec<Position> = serde_json::from_str(&content)?;
        // The file is hand-editable; refuse records the CLI would reject
        for (i, p) in positions.iter().enumerate() {
            p.validate().map_err(|e| {
                EdgeError::Validation(format!("{:?} entry #{}: {}", self.path, i + 1, e))
            })?;
        }
        info!("Loaded {} positions", positions.len());
        Ok(positions)
    }

    async fn save(&self, positions: &[Position]) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(positions)?;
        tokio::fs::write(&self.path, content).await?;
        debug!("Saved {} positions to {:?}", positions.len(), self.path);
        Ok(())
    }
}

/// In-memory list of positions with the edit operations the CLI exposes.
/// Every mutation is written through to the store.
pub struct PositionBook<S: PositionStore> {
    store: S,
    positions: Vec<Position>,
}

impl<S: PositionStore> PositionBook<S> {
    pub async fn open(store: S) -> Result<Self> {
        let positions = store.load().await?;
        Ok(Self { store, positions })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub async fn add(&mut self, position: Position) -> Result<()> {
        position.validate()?;
        self.positions.push(position);
        self.store.save(&self.positions).await
    }

    /// Change price, contracts and/or pick of the position at `index`
    pub async fn edit(
        &mut self,
        index: usize,
        price_cents: Option<u8>,
        contracts: Option<u32>,
        pick: Option<String>,
    ) -> Result<()> {
        let current = self
            .positions
            .get(index)
            .ok_or(EdgeError::PositionNotFound(index))?;

        let mut updated = current.clone();
        if let Some(price) = price_cents {
            updated.price_cents = price;
        }
        if let Some(contracts) = contracts {
            updated.contracts = contracts;
        }
        if let Some(pick) = pick {
            updated.pick = pick;
        }
        updated.validate()?;

        self.positions[index] = updated;
        self.store.save(&self.positions).await
    }

    pub async fn remove(&mut self, index: usize) -> Result<Position> {
        if index >= self.positions.len() {
            return Err(EdgeError::PositionNotFound(index));
        }
        let removed = self.positions.remove(index);
        self.store.save(&self.positions).await?;
        Ok(removed)
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.positions.clear();
        self.store.save(&self.positions).await
    }
}
