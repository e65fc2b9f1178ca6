use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use batchsub::errors::{BatchsubError, Result};
use batchsub::transport::SubmissionTransport;

/// One call made to the fake transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub script: String,
}

/// What the fake answers to the next call.
#[derive(Debug, Clone)]
pub enum FakeReply {
    Output(String),
    Fail(String),
}

/// A fake transport that:
/// - records every call (program, args, script)
/// - answers with queued replies, or `"<n>.fakeserver\n"` with an
///   incrementing `n` starting at 1000 once the queue is empty.
#[derive(Clone)]
pub struct FakeTransport {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    replies: Arc<Mutex<VecDeque<FakeReply>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            next_id: Arc::new(Mutex::new(1000)),
        }
    }

    /// Queue a raw output text for the next unanswered call.
    pub fn reply(self, output: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(FakeReply::Output(output.to_string()));
        self
    }

    /// Queue a transport failure for the next unanswered call.
    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(FakeReply::Fail(message.to_string()));
        self
    }

    /// Shared handle to the recorded calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl SubmissionTransport for FakeTransport {
    fn execute<'a>(
        &'a mut self,
        program: &'a str,
        extra_args: &'a [String],
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let calls = Arc::clone(&self.calls);
        let replies = Arc::clone(&self.replies);
        let next_id = Arc::clone(&self.next_id);

        Box::pin(async move {
            calls.lock().unwrap().push(RecordedCall {
                program: program.to_string(),
                args: extra_args.to_vec(),
                script: script.to_string(),
            });

            let reply = replies.lock().unwrap().pop_front();
            match reply {
                Some(FakeReply::Output(text)) => Ok(text),
                Some(FakeReply::Fail(message)) => Err(BatchsubError::TransportError {
                    program: program.to_string(),
                    message,
                }),
                None => {
                    let mut id = next_id.lock().unwrap();
                    let text = format!("{}.fakeserver\n", *id);
                    *id += 1;
                    Ok(text)
                }
            }
        })
    }
}
