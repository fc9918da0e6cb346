use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use w3c_validator::{Invocation, ProcessOutput, ProcessRunner};

/// Mock process runner for exercising the validator without a JVM
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    responses: Arc<Mutex<VecDeque<MockProcessResponse>>>,
    invocation_log: Arc<Mutex<Vec<Invocation>>>,
}

#[derive(Clone, Debug)]
pub enum MockProcessResponse {
    Exited(ProcessOutput),
    SpawnFailed(std::io::ErrorKind),
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_response(&self, response: MockProcessResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_success(&self, stdout: &str) {
        self.add_response(MockProcessResponse::Exited(ProcessOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }));
    }

    pub fn add_failure(&self, code: i32, stderr: &str) {
        self.add_response(MockProcessResponse::Exited(ProcessOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }));
    }

    pub fn add_spawn_failure(&self) {
        self.add_response(MockProcessResponse::SpawnFailed(
            std::io::ErrorKind::NotFound,
        ));
    }

    pub fn get_invocation_log(&self) -> Vec<Invocation> {
        self.invocation_log.lock().unwrap().clone()
    }
}

impl ProcessRunner for MockProcessRunner {
    async fn run(&self, invocation: &Invocation) -> std::io::Result<ProcessOutput> {
        self.invocation_log.lock().unwrap().push(invocation.clone());

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("MockProcessRunner has no queued response");

        match response {
            MockProcessResponse::Exited(output) => Ok(output),
            MockProcessResponse::SpawnFailed(kind) => {
                Err(std::io::Error::new(kind, "mock spawn failure"))
            }
        }
    }
}
