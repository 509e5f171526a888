//! Consensus oracle adapter.
//!
//! Builds the reviewer-panel request for the external reasoning oracle and
//! validates whatever structured judgment comes back. The "three independent
//! reviewers" behavior is a single-oracle prompting convention: one opaque
//! call returns a pre-merged judgment, there is no per-reviewer fan-out.
//!
//! The adapter never retries (retry/backoff belongs to the transport layer)
//! and never panics on deviant response shapes: every failure mode collapses
//! into a typed [`OracleFailure`] for the scoring engine to absorb.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use veri_common::config::OracleConfig;

use crate::lexicon::issue_templates;
use crate::types::{AnalysisRequest, DomainContext, Issue, OracleJudgment, RiskType};

/// Typed failure of the consensus oracle.
///
/// All transport and content problems collapse here; the caller decides how
/// to degrade (it never surfaces these to the end user as hard failures).
#[derive(Debug, Error)]
pub enum OracleFailure {
    /// Connection refused, DNS failure, non-2xx response
    #[error("oracle unreachable: {0}")]
    Unreachable(String),

    /// The request exceeded the configured hard timeout
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),

    /// The oracle answered, but not with a judgment we can use
    #[error("oracle returned malformed judgment: {0}")]
    Malformed(String),
}

// ============================================================================
// Provider Seam
// ============================================================================

/// Oracle provider trait.
///
/// Implementations handle authentication, request formatting, and response
/// transport for a specific oracle backend. The adapter owns prompt
/// construction and judgment validation on top of this seam.
#[async_trait]
pub trait OracleProvider: Send + Sync {
    /// Provider name (e.g., "http", "simulated").
    fn name(&self) -> &str;

    /// Send one completion request and return the raw response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, OracleFailure>;
}

// ============================================================================
// HTTP Provider
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    system: &'a str,
    message: &'a str,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: String,
}

/// Oracle provider backed by an HTTP chat endpoint.
///
/// The reqwest client carries a hard timeout from configuration; a request
/// that exceeds it degrades to [`OracleFailure::Timeout`] instead of hanging
/// the caller.
pub struct HttpOracle {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f64,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpOracle {
    /// Create a provider from oracle configuration.
    ///
    /// Endpoint and API key presence is checked at startup by config
    /// validation; this constructor trusts a validated config.
    pub fn new(config: &OracleConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: config
                .endpoint
                .clone()
                .ok_or_else(|| anyhow::anyhow!("oracle endpoint not configured"))?,
            api_key: config
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("oracle api key not configured"))?,
            model: config.model.clone(),
            temperature: config.temperature,
            timeout,
            client,
        })
    }
}

#[async_trait]
impl OracleProvider for HttpOracle {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, OracleFailure> {
        let request = ChatRequest {
            model: &self.model,
            system,
            message: user,
            temperature: self.temperature,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Sending consensus request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleFailure::Timeout(self.timeout)
                } else {
                    OracleFailure::Unreachable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleFailure::Unreachable(format!(
                "HTTP {status} - {body}"
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleFailure::Malformed(format!("response body: {e}")))?;

        Ok(chat.content)
    }
}

// ============================================================================
// Simulated Provider
// ============================================================================

/// Deterministic local provider used when no oracle credentials are
/// configured (`oracle.provider = "simulated"`).
///
/// Synthesizes a plausible judgment from a SHA-256 seed of the submitted
/// text, so the same input always produces the same judgment. The judgment
/// is emitted as JSON and goes through the exact same validation path as a
/// real oracle response.
pub struct SimulatedOracle;

#[async_trait]
impl OracleProvider for SimulatedOracle {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<String, OracleFailure> {
        let text = extract_answer_block(user)
            .ok_or_else(|| OracleFailure::Malformed("prompt carries no answer block".into()))?;
        let context = recover_context(user);
        Ok(simulate_judgment(&text, context).to_string())
    }
}

/// Pull the answer text back out of the user prompt (delimited by `"""`).
fn extract_answer_block(user: &str) -> Option<String> {
    let start = user.find("\"\"\"")? + 3;
    let end = user[start..].find("\"\"\"")? + start;
    Some(user[start..end].trim().to_string())
}

/// Recover the domain context from the prompt's context line.
fn recover_context(user: &str) -> DomainContext {
    for context in [
        DomainContext::Legal,
        DomainContext::Finance,
        DomainContext::Compliance,
    ] {
        if user.contains(context.description()) {
            return context;
        }
    }
    DomainContext::Legal
}

/// First eight bytes of the text's SHA-256 digest as a seed.
fn text_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    u64::from_be_bytes(digest[..8].try_into().expect("digest is 32 bytes"))
}

/// Build a deterministic judgment from text characteristics.
fn simulate_judgment(text: &str, context: DomainContext) -> serde_json::Value {
    let seed = text_seed(text);

    let has_digits = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let word_count = text.split_whitespace().count();

    // Base score varies with the text, adjustments mirror how specific,
    // number-heavy claims need more verification.
    let mut score = 45 + (seed % 41) as i64;
    if has_digits && has_percent {
        score -= 12;
    }
    if text.chars().count() > 500 {
        score -= 6;
    }
    if word_count < 20 {
        score += 8;
    }
    let score = score.clamp(20, 95);

    let num_issues = if score >= 71 {
        1
    } else if score >= 41 {
        2
    } else {
        3
    };

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut snippets: Vec<String> = Vec::new();
    if words.len() > 10 {
        snippets.push(words[..6].join(" "));
    }
    if words.len() > 20 {
        snippets.push(words[10..16].join(" "));
    }
    if snippets.is_empty() {
        let head: String = text.chars().take(50).collect();
        snippets.push(head);
    }

    let templates = issue_templates(context);
    let issues: Vec<serde_json::Value> = (0..num_issues)
        .map(|i| {
            let template = &templates[i % templates.len()];
            let snippet: String = snippets[i % snippets.len()].chars().take(100).collect();
            serde_json::json!({
                "snippet": snippet,
                "riskType": template.risk_type.to_string(),
                "explanation": template.explanation,
                "humanCheckHint": template.human_check_hint,
            })
        })
        .collect();

    let noun = context.noun();
    let compliance_report = if score >= 71 {
        format!(
            "Multi-reviewer consensus indicates this {noun} content demonstrates generally \
             acceptable trust levels with a score of {score}/100. The response appears \
             well-structured and avoids major red flags. Standard verification protocols \
             should still be followed before relying on this content for critical decisions. \
             Minor areas flagged for review do not represent significant compliance risks but \
             warrant acknowledgment in audit documentation."
        )
    } else if score >= 41 {
        format!(
            "Consensus review reveals moderate trust concerns in this {noun} content with a \
             score of {score}/100. Several claims require independent verification before the \
             content can be used in official capacity. The review identified areas where the \
             generator may have made assumptions or generalizations that need expert \
             validation. Escalation to qualified professionals is recommended before \
             proceeding."
        )
    } else {
        format!(
            "ALERT: this {noun} content received a low trust score of {score}/100 from \
             consensus review. Significant concerns were identified, including potential \
             fabrications, unverifiable claims, and compliance risks. This content should NOT \
             be used without thorough review by qualified professionals. Immediate escalation \
             to the legal/compliance team is recommended."
        )
    };

    let audit_note = format!(
        "Consensus review completed (simulated provider). Context: {}. Trust score {score}/100; \
         {num_issues} issue(s) flagged for human review.",
        context.to_string().to_uppercase()
    );

    serde_json::json!({
        "score": score,
        "issues": issues,
        "complianceReport": compliance_report,
        "auditNote": audit_note,
    })
}

// ============================================================================
// Prompt Contract
// ============================================================================

/// System prompt establishing the reviewer-panel convention and the JSON
/// output schema. The oracle boundary is versioned by this prompt contract,
/// not by wire format.
const SYSTEM_PROMPT: &str = r#"You are an AI trust and compliance reviewer for enterprise use in high-stakes domains (legal, financial, regulatory compliance).

INTERNAL PROCESS (reviewer consensus):
Internally simulate 3 independent expert reviewers examining the given AI-generated answer:
- Reviewer A focuses on factual accuracy and logical consistency
- Reviewer B focuses on nuance, caveats, and potential misinterpretations
- Reviewer C focuses on domain-specific compliance risks and red flags

For each important claim, consider whether the reviewers agree on its accuracy, whether it is specific and verifiable in principle, and whether it poses risk in the stated domain context.

GUIDELINES:
- Do NOT invent specific laws, article numbers, or regulations unless widely known
- Reason about RISK CATEGORIES and WHERE HUMAN REVIEW IS REQUIRED
- Be conservative: when in doubt, flag for human review

SCORING:
- 71-100 (High trust): reviewers largely agree, claims well-reasoned, low compliance risk
- 41-70 (Medium trust): some disagreement or uncertainty, human review recommended
- 0-40 (Low trust): significant issues, potential fabrications, high compliance risk

OUTPUT FORMAT:
Output ONLY a valid JSON object with NO additional text or markdown:

{
  "score": <number 0-100>,
  "issues": [
    {
      "snippet": "<short quote of the risky part of the input>",
      "riskType": "<hallucination|misstatement|unverifiable|compliance_gap>",
      "explanation": "<plain-English explanation of why this is flagged>",
      "humanCheckHint": "<what a human reviewer should verify>"
    }
  ],
  "complianceReport": "<4-8 sentence summary suitable for a lawyer/compliance officer>",
  "auditNote": "<2-4 sentences suitable for an audit log>"
}

If the input is generally trustworthy, still provide at least one minor observation in the issues array."#;

/// Extra schema instruction appended for voice-mode requests.
const VOICE_INSTRUCTION: &str = "\nAlso include a \"voiceSummary\" field: 2-3 spoken-style \
sentences summarizing the verdict for text-to-speech playback.";

/// Build the user prompt for one analysis request.
fn build_user_prompt(request: &AnalysisRequest) -> String {
    let mut prompt = format!(
        "CONTEXT TYPE: {}\n\nAI-GENERATED ANSWER TO ANALYZE:\n\"\"\"\n{}\n\"\"\"\n\n\
         Analyze this AI-generated answer for trust, accuracy, and compliance risks. \
         Apply the reviewer consensus process and output your analysis as a JSON object \
         following the specified format. Output ONLY valid JSON with no additional text.",
        request.context.description(),
        request.text.trim()
    );
    if request.voice_mode {
        prompt.push_str(VOICE_INSTRUCTION);
    }
    prompt
}

// ============================================================================
// Consensus Adapter
// ============================================================================

/// Adapter in front of an [`OracleProvider`]: prompt construction on the way
/// out, judgment validation on the way back.
pub struct ConsensusAdapter {
    provider: Arc<dyn OracleProvider>,
}

impl ConsensusAdapter {
    /// Create an adapter over the given provider.
    pub fn new(provider: Arc<dyn OracleProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request a consensus judgment for one analysis request.
    ///
    /// The returned judgment carries a clamped score and validated issues;
    /// any label the oracle emitted has already been discarded.
    pub async fn request_consensus(
        &self,
        request: &AnalysisRequest,
    ) -> Result<OracleJudgment, OracleFailure> {
        let user_prompt = build_user_prompt(request);
        let raw = self.provider.complete(SYSTEM_PROMPT, &user_prompt).await?;
        let judgment = parse_judgment(&raw)?;

        debug!(
            provider = %self.provider.name(),
            score = judgment.score,
            issues = judgment.issues.len(),
            "Consensus judgment validated"
        );

        Ok(judgment)
    }
}

// ============================================================================
// Judgment Validation
// ============================================================================

/// Extract a JSON object from raw oracle output.
///
/// Tries, in order: the whole string, a fenced ```json block, the first
/// balanced `{...}` span.
fn extract_json(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }

    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Some(content[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = content.find('{') {
        let mut depth = 0;
        for (i, c) in content[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(content[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// Parse and validate a judgment from raw oracle output.
///
/// Defensive by design: the score is clamped to [0, 100], malformed issues
/// are dropped individually rather than failing the result, narratives
/// default to empty strings. A missing or unparsable score is the one thing
/// that fails the whole judgment.
fn parse_judgment(raw: &str) -> Result<OracleJudgment, OracleFailure> {
    let json_str = extract_json(raw)
        .ok_or_else(|| OracleFailure::Malformed("no JSON object in response".into()))?;
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| OracleFailure::Malformed(format!("invalid JSON: {e}")))?;

    let score = parsed
        .get("score")
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_f64().map(|f| f.round() as i64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        })
        .ok_or_else(|| OracleFailure::Malformed("score missing or not a number".into()))?;
    let score = score.clamp(0, 100) as u8;

    let issues: Vec<Issue> = parsed
        .get("issues")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(parse_issue).collect())
        .unwrap_or_default();

    let compliance_report = string_field(&parsed, &["complianceReport", "compliance_report"]);
    let audit_note = string_field(
        &parsed,
        &["auditNote", "audit_note", "ndaAuditNote", "ndaauditNote"],
    );
    let voice_summary = parsed
        .get("voiceSummary")
        .or_else(|| parsed.get("voice_summary"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(OracleJudgment {
        score,
        issues,
        compliance_report,
        audit_note,
        voice_summary,
    })
}

/// Read the first present string field among aliases, defaulting to "".
fn string_field(parsed: &serde_json::Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| parsed.get(k).and_then(|v| v.as_str()))
        .unwrap_or("")
        .to_string()
}

/// Parse a single issue. Empty snippet or unknown risk type drops the issue.
fn parse_issue(value: &serde_json::Value) -> Option<Issue> {
    let snippet = value.get("snippet")?.as_str()?.trim();
    if snippet.is_empty() {
        return None;
    }

    let risk_type = value
        .get("riskType")
        .or_else(|| value.get("risk_type"))?
        .as_str()
        .and_then(parse_risk_type)?;

    let explanation = value
        .get("explanation")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let human_check_hint = value
        .get("humanCheckHint")
        .or_else(|| value.get("human_check_hint"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    Some(Issue {
        snippet: snippet.to_string(),
        risk_type,
        explanation,
        human_check_hint,
    })
}

/// Parse a risk type from a wire string, accepting common spellings.
fn parse_risk_type(s: &str) -> Option<RiskType> {
    match s.trim().to_lowercase().as_str() {
        "hallucination" => Some(RiskType::Hallucination),
        "misstatement" | "misstated" => Some(RiskType::Misstatement),
        "unverifiable" | "uncertain" | "unsubstantiated" => Some(RiskType::Unverifiable),
        "compliance_gap" | "compliance-gap" | "compliancegap" | "compliance gap"
        | "compliance-risk" | "compliance_risk" => Some(RiskType::ComplianceGap),
        _ => None,
    }
}
