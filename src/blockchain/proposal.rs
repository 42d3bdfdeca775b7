//! `LedgerWriter` that hands prepared transactions to an external signer.
//!
//! Each transaction is written as one JSON line:
//! `{"id":"proposal-1","to":"0x..","value":"0x0","data":"0x.."}`.

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::blockchain::ledger::{LedgerWriter, SubmissionHandle};
use crate::blockchain::types::{BlockchainError, BlockchainResult};

#[derive(Serialize)]
struct Proposal<'a> {
    id: &'a str,
    to: Address,
    value: U256,
    data: &'a Bytes,
}

/// Writes proposals to a sink, numbering them sequentially.
pub struct ProposalWriter {
    sink: Mutex<Box<dyn Write + Send>>,
    counter: AtomicU64,
}

impl ProposalWriter {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
            counter: AtomicU64::new(0),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Number of proposals written so far.
    pub fn count(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ProposalWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalWriter").field("count", &self.count()).finish()
    }
}

#[async_trait]
impl LedgerWriter for ProposalWriter {
    async fn submit_transaction(&self, to: Address, value: U256, data: Bytes) -> BlockchainResult<SubmissionHandle> {
        let id = format!("proposal-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let line = serde_json::to_string(&Proposal {
            id: &id,
            to,
            value,
            data: &data,
        })
        .map_err(|e| BlockchainError::Submission(e.to_string()))?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| BlockchainError::Submission("proposal sink poisoned".to_string()))?;
        writeln!(sink, "{line}").map_err(|e| BlockchainError::Submission(e.to_string()))?;
        sink.flush().map_err(|e| BlockchainError::Submission(e.to_string()))?;

        tracing::info!(id = %id, to = %to, "Transaction proposed");
        Ok(SubmissionHandle(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_writes_numbered_json_lines() {
        let buf = SharedBuf::default();
        let writer = ProposalWriter::new(Box::new(buf.clone()));
        let to = address!("00000000000000000000000000000000000000aa");

        let first = writer
            .submit_transaction(to, U256::ZERO, Bytes::from_static(&[0xde, 0xad]))
            .await
            .unwrap();
        let second = writer.submit_transaction(to, U256::from(5), Bytes::new()).await.unwrap();
        assert_eq!(first.0, "proposal-1");
        assert_eq!(second.0, "proposal-2");
        assert_eq!(writer.count(), 2);

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<serde_json::Value> = out.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["data"], "0xdead");
        assert_eq!(lines[0]["to"].as_str().unwrap().parse::<Address>().unwrap(), to);
        assert_eq!(lines[1]["value"], "0x5");
    }
}
