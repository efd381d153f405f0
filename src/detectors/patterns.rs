//! Built-in pattern tables for the detectors.
//!
//! Matching rules are configuration data: each table here is the built-in
//! default and can be replaced wholesale from `.sentinel.yaml`. Detectors
//! hold a table and apply it; they never hard-code keywords.

use crate::model::{ComplianceFramework, Severity};
use serde::{Deserialize, Serialize};

/// Keyword list tied to one framework, for diff scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkKeywords {
    pub framework: ComplianceFramework,
    pub keywords: Vec<String>,
}

/// Pattern tables for the code-review diff detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffPatterns {
    /// Per-framework keyword lists matched against the diff body.
    pub framework_keywords: Vec<FrameworkKeywords>,
    /// Keywords escalated to CRITICAL regardless of framework.
    pub critical_keywords: Vec<String>,
    /// Keywords escalated to HIGH regardless of framework.
    pub high_keywords: Vec<String>,
    /// Path fragments whose modification is itself a HIGH finding.
    pub high_risk_paths: Vec<String>,
}

impl DiffPatterns {
    /// Severity of a keyword hit: escalation tables first, MEDIUM otherwise.
    pub fn severity_for(&self, keyword: &str) -> Severity {
        if self.critical_keywords.iter().any(|k| k == keyword) {
            Severity::Critical
        } else if self.high_keywords.iter().any(|k| k == keyword) {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

impl Default for DiffPatterns {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            framework_keywords: vec![
                FrameworkKeywords {
                    framework: ComplianceFramework::Gdpr,
                    keywords: owned(&[
                        "personal_data",
                        "user_email",
                        "ip_address",
                        "cookie",
                        "consent",
                        "data_retention",
                        "right_to_delete",
                        "gdpr",
                        "data_processing",
                        "privacy_policy",
                    ]),
                },
                FrameworkKeywords {
                    framework: ComplianceFramework::Hipaa,
                    keywords: owned(&[
                        "patient",
                        "medical_record",
                        "health_data",
                        "phi",
                        "hipaa",
                        "diagnosis",
                        "treatment",
                        "prescription",
                        "ssn",
                        "social_security",
                    ]),
                },
                FrameworkKeywords {
                    framework: ComplianceFramework::Soc2,
                    keywords: owned(&[
                        "access_control",
                        "audit_log",
                        "encryption",
                        "password",
                        "api_key",
                        "secret",
                        "credential",
                        "authentication",
                        "authorization",
                        "mfa",
                    ]),
                },
                FrameworkKeywords {
                    framework: ComplianceFramework::PciDss,
                    keywords: owned(&[
                        "credit_card",
                        "card_number",
                        "cvv",
                        "payment",
                        "cardholder",
                        "pci",
                        "stripe_key",
                        "payment_token",
                    ]),
                },
            ],
            critical_keywords: owned(&[
                "ssn",
                "social_security",
                "credit_card",
                "card_number",
                "api_key",
                "secret",
            ]),
            high_keywords: owned(&[
                "password",
                "credential",
                "patient",
                "phi",
                "personal_data",
            ]),
            high_risk_paths: owned(&[
                "auth/",
                "security/",
                "encryption/",
                "privacy/",
                ".env",
                "config/secrets",
                "middleware/auth",
            ]),
        }
    }
}

/// One policy-relevant conversation pattern for the chat detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPattern {
    pub name: String,
    pub keywords: Vec<String>,
    pub frameworks: Vec<ComplianceFramework>,
    pub severity: Severity,
}

/// Pattern tables for the chat-message detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatPatterns {
    pub patterns: Vec<ChatPattern>,
}

impl Default for ChatPatterns {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            patterns: vec![
                ChatPattern {
                    name: "data_sharing".to_string(),
                    keywords: owned(&[
                        "share data with",
                        "send to third party",
                        "export user data",
                        "data transfer",
                    ]),
                    frameworks: vec![ComplianceFramework::Gdpr, ComplianceFramework::Soc2],
                    severity: Severity::High,
                },
                ChatPattern {
                    name: "access_bypass".to_string(),
                    keywords: owned(&[
                        "skip auth",
                        "bypass security",
                        "shared password",
                        "use my credentials",
                    ]),
                    frameworks: vec![ComplianceFramework::Soc2],
                    severity: Severity::Critical,
                },
                ChatPattern {
                    name: "patient_info".to_string(),
                    keywords: owned(&[
                        "patient name",
                        "diagnosis",
                        "medical record",
                        "health info",
                    ]),
                    frameworks: vec![ComplianceFramework::Hipaa],
                    severity: Severity::Critical,
                },
                ChatPattern {
                    name: "payment_data".to_string(),
                    keywords: owned(&[
                        "credit card",
                        "card number",
                        "payment details",
                        "billing info",
                    ]),
                    frameworks: vec![ComplianceFramework::PciDss],
                    severity: Severity::Critical,
                },
                ChatPattern {
                    name: "retention_policy".to_string(),
                    keywords: owned(&[
                        "delete old data",
                        "keep forever",
                        "retention period",
                        "data cleanup",
                    ]),
                    frameworks: vec![ComplianceFramework::Gdpr],
                    severity: Severity::Medium,
                },
                ChatPattern {
                    name: "consent_discussion".to_string(),
                    keywords: owned(&[
                        "user consent",
                        "opt-in",
                        "opt-out",
                        "privacy notice",
                        "cookie banner",
                    ]),
                    frameworks: vec![ComplianceFramework::Gdpr],
                    severity: Severity::Medium,
                },
            ],
        }
    }
}

/// One outdated-language pattern for the document detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutdatedPattern {
    pub name: String,
    pub pattern: String,
    pub replacement: String,
    pub reason: String,
    pub frameworks: Vec<ComplianceFramework>,
    pub severity: Severity,
}

/// Staleness window for one document type, matched against the title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalenessWindow {
    pub doc_type: String,
    pub max_age_days: i64,
}

/// Pattern tables for the document detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentPatterns {
    pub outdated: Vec<OutdatedPattern>,
    pub staleness: Vec<StalenessWindow>,
}

impl Default for DocumentPatterns {
    fn default() -> Self {
        Self {
            outdated: vec![
                OutdatedPattern {
                    name: "safe_harbor".to_string(),
                    pattern: "safe harbor".to_string(),
                    replacement: "EU-US Data Privacy Framework".to_string(),
                    reason: "Safe Harbor was invalidated by Schrems I (2015). Use Data Privacy Framework.".to_string(),
                    frameworks: vec![ComplianceFramework::Gdpr],
                    severity: Severity::High,
                },
                OutdatedPattern {
                    name: "privacy_shield".to_string(),
                    pattern: "privacy shield".to_string(),
                    replacement: "EU-US Data Privacy Framework".to_string(),
                    reason: "Privacy Shield was invalidated by Schrems II (2020). Use Data Privacy Framework.".to_string(),
                    frameworks: vec![ComplianceFramework::Gdpr],
                    severity: Severity::High,
                },
                OutdatedPattern {
                    name: "implied_consent".to_string(),
                    pattern: "implied consent".to_string(),
                    replacement: "explicit consent".to_string(),
                    reason: "GDPR requires explicit, informed consent. Implied consent is insufficient.".to_string(),
                    frameworks: vec![ComplianceFramework::Gdpr],
                    severity: Severity::Medium,
                },
                OutdatedPattern {
                    name: "reasonable_security".to_string(),
                    pattern: "reasonable security measures".to_string(),
                    replacement: "specific security controls (encryption, access controls, audit logging)".to_string(),
                    reason: "Vague security language doesn't meet SOC2/HIPAA specificity requirements.".to_string(),
                    frameworks: vec![ComplianceFramework::Soc2, ComplianceFramework::Hipaa],
                    severity: Severity::Medium,
                },
                OutdatedPattern {
                    name: "hipaa_old_breach".to_string(),
                    pattern: "notify within 60 days".to_string(),
                    replacement: "notify without unreasonable delay, no later than 60 days".to_string(),
                    reason: "HIPAA breach notification must emphasize 'without unreasonable delay'.".to_string(),
                    frameworks: vec![ComplianceFramework::Hipaa],
                    severity: Severity::Low,
                },
            ],
            staleness: vec![
                StalenessWindow {
                    doc_type: "privacy_policy".to_string(),
                    max_age_days: 365,
                },
                StalenessWindow {
                    doc_type: "security_policy".to_string(),
                    max_age_days: 180,
                },
                StalenessWindow {
                    doc_type: "compliance_report".to_string(),
                    max_age_days: 90,
                },
                StalenessWindow {
                    doc_type: "incident_response_plan".to_string(),
                    max_age_days: 365,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_severity_escalation() {
        let patterns = DiffPatterns::default();
        assert_eq!(patterns.severity_for("api_key"), Severity::Critical);
        assert_eq!(patterns.severity_for("password"), Severity::High);
        assert_eq!(patterns.severity_for("cookie"), Severity::Medium);
    }

    #[test]
    fn test_default_diff_tables_cover_four_frameworks() {
        let patterns = DiffPatterns::default();
        assert_eq!(patterns.framework_keywords.len(), 4);
        assert!(patterns
            .framework_keywords
            .iter()
            .all(|fk| !fk.keywords.is_empty()));
    }

    #[test]
    fn test_default_chat_patterns() {
        let patterns = ChatPatterns::default();
        assert_eq!(patterns.patterns.len(), 6);
        let bypass = patterns
            .patterns
            .iter()
            .find(|p| p.name == "access_bypass")
            .unwrap();
        assert_eq!(bypass.severity, Severity::Critical);
        assert_eq!(bypass.frameworks, vec![ComplianceFramework::Soc2]);
    }

    #[test]
    fn test_default_document_tables() {
        let patterns = DocumentPatterns::default();
        assert_eq!(patterns.outdated.len(), 5);
        assert_eq!(patterns.staleness.len(), 4);
        let policy = patterns
            .staleness
            .iter()
            .find(|w| w.doc_type == "privacy_policy")
            .unwrap();
        assert_eq!(policy.max_age_days, 365);
    }

    #[test]
    fn test_tables_roundtrip_yaml() {
        let patterns = ChatPatterns::default();
        let yaml = serde_yaml::to_string(&patterns).unwrap();
        let back: ChatPatterns = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.patterns.len(), patterns.patterns.len());
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "outdated: []\n";
        let patterns: DocumentPatterns = serde_yaml::from_str(yaml).unwrap();
        assert!(patterns.outdated.is_empty());
        // staleness untouched by the override
        assert_eq!(patterns.staleness.len(), 4);
    }
}
