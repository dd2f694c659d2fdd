//! Scripted `TextGenerator` for workflow tests. Replays canned answers in order
//! and records every prompt it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerationError, TextGenerator};

#[derive(Default)]
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn answering(answer: impl Into<String>) -> Self {
        let generator = Self::default();
        generator.push(Ok(answer.into()));
        generator
    }

    pub fn failing(error: GenerationError) -> Self {
        let generator = Self::default();
        generator.push(Err(error));
        generator
    }

    pub fn push(&self, answer: Result<String, GenerationError>) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyContent))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
