//! Out topic backed by an append-only JSON lines file.

use crate::error::PublishError;
use crate::publish::{LineageEvent, PublishChannel};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonLinesChannel {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesChannel {
    pub fn open(path: &Path) -> Result<Self, PublishError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PublishChannel for JsonLinesChannel {
    async fn publish(&self, event: LineageEvent) -> Result<(), PublishError> {
        let line = serde_json::to_string(&event)?;
        {
            let mut writer = self.writer.lock();
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        debug!(
            guid = %event.entity().guid,
            out_topic = %self.path.display(),
            bytes = line.len(),
            "Event written to out topic"
        );
        Ok(())
    }
}
