//! Plain-text report rendering for export.
//!
//! The renderer is a pure function over a completed result: two renders of
//! the same result are byte-identical, so copy-to-clipboard and file export
//! stay in parity.

use crate::types::AnalysisResult;

const RULE: &str = "============================================================";
const SECTION_RULE: &str = "------------------------------------------------------------";

/// Render a completed analysis as a fixed-structure plain-text report.
pub fn render(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push_str("\nTRUST ANALYSIS REPORT\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Completed: {}\n", result.timestamp.to_rfc3339()));
    out.push_str(&format!("Trust score: {}/100\n", result.score));
    out.push_str(&format!("Trust label: {}\n", result.label));
    out.push('\n');

    out.push_str(SECTION_RULE);
    out.push_str("\nCOMPLIANCE REPORT\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&result.compliance_report);
    out.push_str("\n\n");

    out.push_str(SECTION_RULE);
    out.push_str("\nAUDIT NOTE\n");
    out.push_str(SECTION_RULE);
    out.push('\n');
    out.push_str(&result.audit_note);
    out.push_str("\n\n");

    out.push_str(SECTION_RULE);
    out.push_str(&format!(
        "\nFLAGGED ISSUES ({})\n",
        result.issues.len()
    ));
    out.push_str(SECTION_RULE);
    out.push('\n');

    for (i, issue) in result.issues.iter().enumerate() {
        out.push_str(&format!("[{}] Snippet: \"{}\"\n", i + 1, issue.snippet));
        out.push_str(&format!("    Risk type: {}\n", issue.risk_type));
        out.push_str(&format!("    Explanation: {}\n", issue.explanation));
        out.push_str(&format!("    Human check: {}\n", issue.human_check_hint));
        out.push('\n');
    }

    out.push_str(RULE);
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, RiskType, TrustLabel};
    use chrono::{TimeZone, Utc};

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            score: 42,
            label: TrustLabel::Medium,
            issues: vec![
                Issue {
                    snippet: "guaranteed settlement".into(),
                    risk_type: RiskType::Hallucination,
                    explanation: "No such guarantee exists in the cited statute.".into(),
                    human_check_hint: "Verify the statute with counsel.".into(),
                },
                Issue {
                    snippet: "15% annual return".into(),
                    risk_type: RiskType::Unverifiable,
                    explanation: "Projection lacks supporting data.".into(),
                    human_check_hint: "Request the underlying model.".into(),
                },
            ],
            compliance_report: "Moderate concerns identified.".into(),
            audit_note: "Review logged.".into(),
            voice_summary: None,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 10, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn render_is_byte_stable() {
        let result = sample_result();
        assert_eq!(render(&result), render(&result));
    }

    #[test]
    fn render_contains_all_sections() {
        let text = render(&sample_result());
        assert!(text.contains("TRUST ANALYSIS REPORT"));
        assert!(text.contains("Trust score: 42/100"));
        assert!(text.contains("Trust label: Medium"));
        assert!(text.contains("COMPLIANCE REPORT"));
        assert!(text.contains("Moderate concerns identified."));
        assert!(text.contains("AUDIT NOTE"));
        assert!(text.contains("Review logged."));
        assert!(text.contains("FLAGGED ISSUES (2)"));
        assert!(text.contains("[1] Snippet: \"guaranteed settlement\""));
        assert!(text.contains("[2] Snippet: \"15% annual return\""));
        assert!(text.contains("Risk type: hallucination"));
        assert!(text.contains("Risk type: unverifiable"));
    }

    #[test]
    fn render_handles_no_issues() {
        let mut result = sample_result();
        result.issues.clear();
        let text = render(&result);
        assert!(text.contains("FLAGGED ISSUES (0)"));
    }
}
