use std::collections::BTreeMap;

use chrono::Utc;

use crate::domain::{Outcome, SourceReport};

/// Newest items shown per changed source.
const MAX_DIGEST_ITEMS: usize = 3;

/// One aggregated notification payload for a run.
#[derive(Debug, Clone)]
pub struct Digest {
    pub subject: String,
    pub body: String,
}

/// Builds the run digest from the collected reports. Returns `None` when no
/// source changed; no notification is sent for an all-quiet run. Error
/// outcomes never appear in the body beyond a trailing summary line.
pub fn build(reports: &[SourceReport]) -> Option<Digest> {
    let changed: Vec<&SourceReport> = reports
        .iter()
        .filter(|r| r.outcome == Outcome::Changed)
        .collect();
    if changed.is_empty() {
        return None;
    }

    let errored = reports
        .iter()
        .filter(|r| r.outcome == Outcome::Error)
        .count();

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M UTC");
    let subject = if changed.len() == 1 {
        format!("driftwatch: {} has new content ({})", changed[0].org, timestamp)
    } else {
        format!(
            "driftwatch: {} sources have new content ({})",
            changed.len(),
            timestamp
        )
    };

    // Group by org, sorted, so related sources read together.
    let mut by_org: BTreeMap<&str, Vec<&SourceReport>> = BTreeMap::new();
    for report in &changed {
        by_org.entry(report.org.as_str()).or_default().push(report);
    }

    let mut lines = Vec::new();
    lines.push(format!("Sources with changes: {}", changed.len()));
    lines.push(String::new());

    for (org, reports) in &by_org {
        lines.push(format!("## {}", org));
        for report in reports {
            lines.push(format!("{} ({})", report.name, report.url));
            for (i, item) in report.items.iter().take(MAX_DIGEST_ITEMS).enumerate() {
                match &item.link {
                    Some(link) => lines.push(format!("  {}. {} <{}>", i + 1, item.title, link)),
                    None => lines.push(format!("  {}. {}", i + 1, item.title)),
                }
            }
            lines.push(String::new());
        }
    }

    if errored > 0 {
        lines.push(format!("{} source(s) failed this run; see logs.", errored));
    }

    Some(Digest {
        subject,
        body: lines.join("\n"),
    })
}
