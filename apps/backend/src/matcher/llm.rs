//! Language-model oracle over an Anthropic-style messages endpoint.
//!
//! The model's answer is treated as untrusted text: fences are stripped,
//! the JSON is parsed leniently, and the result still has to pass the
//! validator before anything is stored.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::trait_def::{CandidateMatcher, MatchError, MatchRequest};
use crate::config::engine::LlmConfig;
use crate::domain::{ParticipantId, Proposal, ProposedGroup};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;

pub struct LlmMatcher {
    client: Client,
    config: LlmConfig,
    timeout: Duration,
}

impl LlmMatcher {
    pub const NAME: &'static str = "llm";

    pub fn new(config: LlmConfig, timeout: Duration) -> Result<Self, MatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatchError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            config,
            timeout,
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct PromptParticipant<'a> {
    id: ParticipantId,
    name: &'a str,
    company: &'a str,
    role: &'a str,
    offers: &'a [String],
    seeks: &'a [String],
    industries: &'a [String],
    previously_grouped_with: Vec<ParticipantId>,
}

#[derive(Deserialize)]
struct RawAssignment {
    groups: Vec<RawGroup>,
}

#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    group_number: Option<i16>,
    #[serde(default)]
    group_name: String,
    #[serde(default)]
    participant_ids: Vec<RawId>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Models quote ids about as often as they don't.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(ParticipantId),
    Text(String),
}

impl RawId {
    fn resolve(self) -> Result<ParticipantId, MatchError> {
        match self {
            RawId::Int(id) => Ok(id),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| MatchError::Malformed(format!("participant id '{s}' is not numeric"))),
        }
    }
}

/// Render the instruction prompt for one round.
pub fn build_prompt(request: &MatchRequest) -> Result<String, MatchError> {
    let participants: Vec<PromptParticipant<'_>> = request
        .participants
        .iter()
        .map(|p| PromptParticipant {
            id: p.id,
            name: &p.name,
            company: &p.company,
            role: &p.role,
            offers: &p.offers,
            seeks: &p.seeks,
            industries: &p.industries,
            previously_grouped_with: request.history.partners_of(p.id),
        })
        .collect();
    let roster = serde_json::to_string_pretty(&participants)
        .map_err(|e| MatchError::Malformed(format!("prompt encoding: {e}")))?;

    let g = request.group_size;
    let n = participants.len();
    Ok(format!(
        r#"You are an expert networking event coordinator. Create groups for one networking round.

Participants ({n} total):
{roster}

Rules:
1. Each group should have {g} people.
2. Maximize complementary matches: put people whose "seeks" match someone else's "offers" together.
3. Prioritize diversity: avoid putting people from the same company in one group.
4. Avoid repeat groupings: people listed in "previously_grouped_with" should not be grouped together again if possible.
5. Give each group a fun, memorable name (e.g. "Blue Lions", "Red Dragons", "Green Foxes").

Output format (JSON only):
{{
  "groups": [
    {{
      "group_number": 1,
      "group_name": "Blue Lions",
      "participant_ids": [1, 2, 3, 4],
      "reasoning": "Why these people fit together."
    }}
  ]
}}

Important:
- Return ONLY valid JSON, with no text outside the JSON structure.
- Assign every participant to exactly one group.
- If participants don't divide evenly, a group may have {min} or {max} people."#,
        min = g.saturating_sub(1),
        max = g + 1,
    ))
}

/// Drop Markdown code fences a model may wrap around its JSON.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the model's text answer into a proposal (not yet validated).
pub fn parse_assignment(text: &str) -> Result<Proposal, MatchError> {
    let raw: RawAssignment = serde_json::from_str(&strip_code_fences(text))
        .map_err(|e| MatchError::Malformed(e.to_string()))?;

    let mut groups = Vec::with_capacity(raw.groups.len());
    for (group, position) in raw.groups.into_iter().zip(1i16..) {
        let participant_ids = group
            .participant_ids
            .into_iter()
            .map(RawId::resolve)
            .collect::<Result<Vec<_>, _>>()?;
        groups.push(ProposedGroup {
            group_no: group.group_number.unwrap_or(position),
            name: group.group_name.trim().to_string(),
            participant_ids,
            rationale: group.reasoning.filter(|r| !r.trim().is_empty()),
        });
    }
    Ok(Proposal { groups })
}

#[async_trait]
impl CandidateMatcher for LlmMatcher {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    #[instrument(skip_all, fields(participants = request.participants.len(), model = %self.config.model))]
    async fn propose(&self, request: &MatchRequest) -> Result<Proposal, MatchError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: build_prompt(request)?,
            }],
        };

        let response = self
            .client
            .post(&self.config.url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MatchError::Unavailable(format!("oracle answered HTTP {status}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| MatchError::Malformed(format!("response body: {e}")))?;

        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or_else(|| MatchError::Malformed("no text block in response".into()))?;
        debug!(chars = text.len(), "Oracle answered");

        parse_assignment(&text)
    }
}

impl LlmMatcher {
    fn transport_error(&self, e: reqwest::Error) -> MatchError {
        if e.is_timeout() {
            MatchError::Timeout(self.timeout)
        } else {
            MatchError::Unavailable(e.to_string())
        }
    }
}
