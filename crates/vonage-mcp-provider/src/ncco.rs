//! Call control objects.
//!
//! An NCCO is the ordered list of actions Vonage runs when a call connects.
//! Only the `talk` action is needed to read a message to the callee.

use serde::{Deserialize, Serialize};

/// Speak text into the call using text-to-speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talk {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<u32>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    #[serde(rename = "bargeIn", skip_serializing_if = "Option::is_none")]
    pub barge_in: Option<bool>,
}

impl Talk {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
            style: None,
            loop_count: None,
            barge_in: None,
        }
    }
}

/// A single NCCO action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NccoAction {
    Talk(Talk),
}

impl From<Talk> for NccoAction {
    fn from(talk: Talk) -> Self {
        Self::Talk(talk)
    }
}

/// An ordered action list, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ncco(pub Vec<NccoAction>);

impl Ncco {
    pub fn actions(&self) -> &[NccoAction] {
        &self.0
    }
}

/// Incremental NCCO construction.
#[derive(Debug, Default)]
pub struct NccoBuilder {
    actions: Vec<NccoAction>,
}

impl NccoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(mut self, action: impl Into<NccoAction>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn build(self) -> Ncco {
        Ncco(self.actions)
    }
}
