//! Rule-based answers used when no completion call succeeds, and the
//! incident summary sent along as context.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use dashboard_core::{Incident, IncidentStatus, Severity};

const OFFLINE_HEADER: &str = "Offline assistant mode (no usable AI API call succeeded).\n\
Below is a rule-based analysis based on your incident data.";

const PRIORITISATION: &str = "Prioritisation advice:\n\
- Resolve high and critical incidents that are still open first.\n\
- Next, clear medium incidents that have been open for a long time.\n\
- Group low severity incidents and handle them in batches.";

const PHISHING: &str = "Phishing guidance:\n\
- Check whether phishing emails make up a large share of incidents.\n\
- If so, recommend short staff training and stricter email filtering rules.\n\
- Track how the phishing count changes after those actions.";

const BACKLOG: &str = "Backlog / bottleneck analysis:\n\
- A high count of open incidents suggests insufficient capacity.\n\
- Many incidents stuck in progress can indicate process bottlenecks.\n\
- Compare incident counts per assignee to detect imbalances.";

const GENERAL: &str = "General guidance:\n\
- Filter incidents by category, severity and assignee to see which dominate, \
then adjust playbooks accordingly.";

const OFFLINE_FOOTER: &str = "With an API key configured, the same question and context \
are sent to the configured model instead.";

/// Builds a keyword-driven answer to `message`.
///
/// Matching is case-insensitive: "priorit" or "first" adds prioritisation
/// advice, "phishing" adds phishing guidance, "backlog" or "bottleneck" adds
/// capacity analysis. A message matching none of them gets general
/// guidance. `context`, when present, is echoed under an incident summary
/// heading.
pub fn offline_response(message: &str, context: Option<&str>) -> String {
    let mut parts = vec![OFFLINE_HEADER.to_string()];

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        parts.push(format!("\nIncident summary:\n{}", context.trim_end()));
    }

    let msg = message.to_lowercase();
    let mut matched = false;
    let mut section = |hit: bool, text: &str| {
        if hit {
            parts.push(format!("\n{text}"));
            matched = true;
        }
    };
    section(msg.contains("priorit") || msg.contains("first"), PRIORITISATION);
    section(msg.contains("phishing"), PHISHING);
    section(msg.contains("backlog") || msg.contains("bottleneck"), BACKLOG);

    if !matched {
        parts.push(format!("\n{GENERAL}"));
    }
    parts.push(format!("\n{OFFLINE_FOOTER}"));
    parts.join("\n")
}

/// Summarises incidents by severity and status.
///
/// Every severity and status is listed, including those with no incidents.
pub fn incident_context(incidents: &[Incident]) -> String {
    let mut by_severity: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_status: BTreeMap<IncidentStatus, usize> =
        IncidentStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for incident in incidents {
        *by_severity.entry(incident.severity).or_default() += 1;
        *by_status.entry(incident.status).or_default() += 1;
    }

    let mut out = format!("Total incidents: {}\n", incidents.len());
    out.push_str("By severity: ");
    push_counts(&mut out, &by_severity);
    out.push_str("\nBy status: ");
    push_counts(&mut out, &by_status);
    out
}

fn push_counts<K: std::fmt::Display>(out: &mut String, counts: &BTreeMap<K, usize>) {
    for (i, (key, count)) in counts.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // writing to a String cannot fail
        let _ = write!(out, "{key}={count}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_guidance_without_keywords() {
        let answer = offline_response("hello there", None);
        assert!(answer.starts_with("Offline assistant mode"));
        assert!(answer.contains("General guidance"));
        assert!(!answer.contains("Incident summary"));
    }

    #[test]
    fn test_keyword_sections() {
        let answer = offline_response("What should we PRIORITISE given the phishing backlog?", None);
        assert!(answer.contains("Prioritisation advice"));
        assert!(answer.contains("Phishing guidance"));
        assert!(answer.contains("Backlog / bottleneck analysis"));
        assert!(!answer.contains("General guidance"));

        let answer = offline_response("which one first", None);
        assert!(answer.contains("Prioritisation advice"));
        assert!(!answer.contains("Phishing guidance"));
    }

    #[test]
    fn test_context_is_included() {
        let answer = offline_response("bottleneck?", Some("Total incidents: 4\n"));
        assert!(answer.contains("Incident summary:\nTotal incidents: 4"));
        assert!(answer.contains("Backlog / bottleneck analysis"));

        let blank = offline_response("bottleneck?", Some("   "));
        assert!(!blank.contains("Incident summary"));
    }

    #[test]
    fn test_incident_context_counts() {
        let incidents = vec![
            Incident::new("INC-1", "a", "Phishing", Severity::High, "2024-01-01"),
            Incident::new("INC-2", "b", "Malware", Severity::High, "2024-01-02")
                .with_status(IncidentStatus::Closed),
            Incident::new("INC-3", "c", "Recon", Severity::Low, "2024-01-03")
                .with_status(IncidentStatus::InProgress),
        ];
        let context = incident_context(&incidents);
        assert_eq!(
            context,
            "Total incidents: 3\n\
             By severity: low=1, medium=0, high=2, critical=0\n\
             By status: open=1, in-progress=1, closed=1"
        );
    }

    #[test]
    fn test_incident_context_empty() {
        let context = incident_context(&[]);
        assert!(context.starts_with("Total incidents: 0\n"));
        assert!(context.contains("critical=0"));
    }
}
