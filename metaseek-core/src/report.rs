use colored::Colorize;
use serde::{Deserialize, Serialize};

const DIVIDER: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScore {
    pub url: String,
    pub score: f64,
}

/// One run's ranking output: domain authority and page relevance, stamped
/// with a run id and generation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankReport {
    pub run_id: String,
    pub generated_at: String,
    pub query: String,
    pub pages_crawled: usize,
    pub authority: Vec<DomainScore>,
    pub relevance: Vec<PageScore>,
}

impl RankReport {
    /// Assemble a report. Authority scores arrive in node order and are
    /// re-sorted by descending score here (stable, so graph order breaks
    /// ties); relevance arrives already ranked.
    pub fn build(
        query: &str,
        pages_crawled: usize,
        authority: Vec<(String, f64)>,
        relevance: Vec<(String, f64)>,
    ) -> Self {
        let mut authority: Vec<DomainScore> = authority
            .into_iter()
            .map(|(domain, score)| DomainScore { domain, score })
            .collect();
        authority.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            query: query.to_string(),
            pages_crawled,
            authority,
            relevance: relevance
                .into_iter()
                .map(|(url, score)| PageScore { url, score })
                .collect(),
        }
    }

    pub fn render_text(&self, top: usize) -> String {
        let mut report = String::new();

        report.push_str(&format!("{}\n", DIVIDER));
        report.push_str("                         METASEEK RANKING REPORT\n");
        report.push_str(&format!("{}\n\n", DIVIDER));

        report.push_str(&format!("Run ID:        {}\n", self.run_id));
        report.push_str(&format!("Generated:     {}\n", self.generated_at));
        report.push_str(&format!("Query:         {}\n", self.query));
        report.push_str(&format!("Pages crawled: {}\n\n", self.pages_crawled));

        report.push_str(&format!("{}\n", "DOMAIN AUTHORITY".bright_blue().bold()));
        if self.authority.is_empty() {
            report.push_str("  (no cross-domain links discovered)\n");
        }
        for (position, entry) in self.authority.iter().take(top).enumerate() {
            report.push_str(&format!(
                "  {:>3}. {:<40} {}\n",
                position + 1,
                entry.domain.bright_white(),
                format!("{:.6}", entry.score).cyan()
            ));
        }
        report.push('\n');

        report.push_str(&format!("{}\n", "PAGE RELEVANCE".bright_blue().bold()));
        if self.relevance.is_empty() {
            report.push_str("  (no indexed pages)\n");
        }
        for (position, entry) in self.relevance.iter().take(top).enumerate() {
            report.push_str(&format!(
                "  {:>3}. {:<60} {}\n",
                position + 1,
                entry.url.bright_white(),
                format!("{:.6}", entry.score).cyan()
            ));
        }

        report.push_str(&format!("\n{}\n", DIVIDER));
        report
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> RankReport {
        RankReport::build(
            "rust crawler",
            3,
            vec![
                ("low.org".to_string(), 0.1),
                ("high.com".to_string(), 0.7),
                ("mid.net".to_string(), 0.2),
            ],
            vec![
                ("http://high.com/a".to_string(), 0.9),
                ("http://mid.net/b".to_string(), 0.0),
            ],
        )
    }

    #[test]
    fn test_authority_sorted_descending() {
        let report = sample_report();
        let domains: Vec<&str> = report.authority.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(domains, vec!["high.com", "mid.net", "low.org"]);
    }

    #[test]
    fn test_json_round_trip() {
        let report = sample_report();
        let json = report.to_json().unwrap();
        let restored: RankReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.run_id, report.run_id);
        assert_eq!(restored.authority.len(), 3);
        assert_eq!(restored.relevance.len(), 2);
    }

    #[test]
    fn test_render_text_sections() {
        let report = sample_report();
        let text = report.render_text(10);
        assert!(text.contains("DOMAIN AUTHORITY"));
        assert!(text.contains("PAGE RELEVANCE"));
        assert!(text.contains("rust crawler"));
    }

    #[test]
    fn test_render_text_respects_top() {
        let report = sample_report();
        let text = report.render_text(1);
        assert!(text.contains("high.com"));
        assert!(!text.contains("low.org"));
    }
}
