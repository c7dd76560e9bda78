// SPDX-FileCopyrightText: 2026 LineOA Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI playground. Each turn is a single-turn call; nothing is persisted.

use std::sync::Arc;

use tracing::debug;

use lineoa_core::{LineOaError, Message, ResponderAdapter};

pub const DEFAULT_PLAYGROUND_PERSONA: &str = "คุณคือผู้ช่วยดูแลร้านค้า LINE OA ตอบคำถามอย่างสุภาพ เป็นกันเอง และให้ข้อมูลที่ถูกต้อง";

pub const PLAYGROUND_GREETING: &str = "สวัสดีครับ ผมคือ AI ผู้ช่วย มีอะไรให้รับใช้ครับ?";

pub struct ChatPlayground {
    responder: Arc<dyn ResponderAdapter>,
    persona: String,
    transcript: Vec<Message>,
}

impl ChatPlayground {
    /// Starts with the default persona and a greeting.
    pub fn new(responder: Arc<dyn ResponderAdapter>) -> Self {
        Self {
            responder,
            persona: DEFAULT_PLAYGROUND_PERSONA.to_string(),
            transcript: vec![Message::bot(PLAYGROUND_GREETING)],
        }
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Takes effect from the next turn; the transcript is kept.
    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.persona = persona.into();
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Sends one turn and returns the reply. Previous turns are not sent
    /// to the responder.
    pub async fn send(&mut self, text: &str) -> Result<Message, LineOaError> {
        if text.trim().is_empty() {
            return Err(LineOaError::Validation(
                "message must not be empty".to_string(),
            ));
        }
        debug!(persona_len = self.persona.len(), "playground turn");
        self.transcript.push(Message::user(text));
        let reply = Message::bot(self.responder.generate(text, &self.persona).await);
        self.transcript.push(reply.clone());
        Ok(reply)
    }
}
