//! Risk lexicon: static indicator-phrase tables per domain context.
//!
//! Two phrase families drive the local heuristic: "overclaim" phrases
//! (absolute or guarantee language) and "hedge" phrases (modal or
//! uncertainty language). A shared base table is extended with a small set
//! of domain phrases per context. Matching is case-insensitive substring
//! containment; the tables are static so classification allocates nothing
//! beyond one lowercased copy of the input.

use crate::types::{DomainContext, RiskType};

/// Overclaim phrases common to every domain.
pub const BASE_OVERCLAIM: &[&str] = &[
    "guarantee",
    "absolutely",
    "certainly",
    "definitely",
    "100%",
    "no risk",
    "zero risk",
    "risk-free",
    "without exception",
    "without doubt",
    "always",
    "never fails",
    "proven fact",
    "undisputed",
    "assured",
];

/// Hedge phrases common to every domain.
pub const BASE_HEDGE: &[&str] = &[
    "might",
    "could",
    "possibly",
    "perhaps",
    "likely",
    "appears",
    "seems",
    "suggests",
    "approximately",
    "estimated",
    "roughly",
    "unclear",
    "uncertain",
    "in some cases",
    "typically",
    "generally",
    "may be",
    "should be",
];

const LEGAL_OVERCLAIM: &[&str] = &["settled law", "binding in all", "cannot be challenged"];
const LEGAL_HEDGE: &[&str] = &["arguably", "subject to interpretation", "depending on jurisdiction"];

const FINANCE_OVERCLAIM: &[&str] = &["guaranteed return", "will outperform", "cannot lose"];
const FINANCE_HEDGE: &[&str] = &["projected", "forecast", "subject to market conditions"];

const COMPLIANCE_OVERCLAIM: &[&str] = &["fully compliant", "exempt from all", "no disclosure required"];
const COMPLIANCE_HEDGE: &[&str] = &["pending guidance", "interpretation varies", "regulator may"];

/// Indicator-phrase tables for one domain context.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Absolute/guarantee language
    pub overclaim: Vec<&'static str>,
    /// Modal/uncertainty language
    pub hedge: Vec<&'static str>,
}

impl Lexicon {
    /// Base lexicon shared by all contexts.
    pub fn base() -> Self {
        Self {
            overclaim: BASE_OVERCLAIM.to_vec(),
            hedge: BASE_HEDGE.to_vec(),
        }
    }

    /// Lexicon for a specific domain context: base tables plus the
    /// context's own phrases.
    pub fn for_context(context: DomainContext) -> Self {
        let (extra_overclaim, extra_hedge) = match context {
            DomainContext::Legal => (LEGAL_OVERCLAIM, LEGAL_HEDGE),
            DomainContext::Finance => (FINANCE_OVERCLAIM, FINANCE_HEDGE),
            DomainContext::Compliance => (COMPLIANCE_OVERCLAIM, COMPLIANCE_HEDGE),
        };

        let mut lexicon = Self::base();
        lexicon.overclaim.extend_from_slice(extra_overclaim);
        lexicon.hedge.extend_from_slice(extra_hedge);
        lexicon
    }
}

// ============================================================================
// Issue Templates (simulated provider)
// ============================================================================

/// Canned issue shape used by the simulated oracle provider.
#[derive(Debug, Clone, Copy)]
pub struct IssueTemplate {
    pub risk_type: RiskType,
    pub explanation: &'static str,
    pub human_check_hint: &'static str,
}

const LEGAL_TEMPLATES: &[IssueTemplate] = &[
    IssueTemplate {
        risk_type: RiskType::Hallucination,
        explanation: "This statement references legal principles that require verification \
                      against current case law and jurisdiction-specific regulations.",
        human_check_hint: "Verify the legal citation with a qualified attorney and check if it \
                           applies to the relevant jurisdiction.",
    },
    IssueTemplate {
        risk_type: RiskType::ComplianceGap,
        explanation: "The language used may create unintended legal obligations or liabilities \
                      if taken as formal legal advice.",
        human_check_hint: "Have legal counsel review before using in any binding documents or \
                           client communications.",
    },
    IssueTemplate {
        risk_type: RiskType::Unverifiable,
        explanation: "The claim lacks specific citations or references that would allow \
                      independent verification.",
        human_check_hint: "Request source documentation or legal precedent supporting this \
                           assertion.",
    },
];

const FINANCE_TEMPLATES: &[IssueTemplate] = &[
    IssueTemplate {
        risk_type: RiskType::Misstatement,
        explanation: "Financial figures or projections mentioned require verification against \
                      audited financial statements.",
        human_check_hint: "Cross-reference with official financial reports and have a CPA \
                           verify the calculations.",
    },
    IssueTemplate {
        risk_type: RiskType::ComplianceGap,
        explanation: "This statement could be interpreted as financial advice, which may \
                      trigger regulatory requirements.",
        human_check_hint: "Ensure appropriate disclaimers are included and review with the \
                           compliance team.",
    },
    IssueTemplate {
        risk_type: RiskType::Unverifiable,
        explanation: "Market predictions or financial forecasts inherently carry uncertainty \
                      and should not be relied upon without additional analysis.",
        human_check_hint: "Conduct independent market research and consult with financial \
                           advisors.",
    },
];

const COMPLIANCE_TEMPLATES: &[IssueTemplate] = &[
    IssueTemplate {
        risk_type: RiskType::Hallucination,
        explanation: "References to specific regulations or compliance requirements need \
                      verification against current regulatory frameworks.",
        human_check_hint: "Check the current version of referenced regulations and confirm \
                           applicability.",
    },
    IssueTemplate {
        risk_type: RiskType::ComplianceGap,
        explanation: "The statement may not fully address all relevant compliance requirements \
                      for your industry or jurisdiction.",
        human_check_hint: "Conduct a comprehensive compliance review with your regulatory \
                           affairs team.",
    },
    IssueTemplate {
        risk_type: RiskType::Unverifiable,
        explanation: "Regulatory interpretations can vary; this guidance may not reflect the \
                      position of all relevant regulatory bodies.",
        human_check_hint: "Consult with regulatory counsel to confirm interpretation aligns \
                           with agency guidance.",
    },
];

/// Issue templates for a domain context.
pub fn issue_templates(context: DomainContext) -> &'static [IssueTemplate] {
    match context {
        DomainContext::Legal => LEGAL_TEMPLATES,
        DomainContext::Finance => FINANCE_TEMPLATES,
        DomainContext::Compliance => COMPLIANCE_TEMPLATES,
    }
}
