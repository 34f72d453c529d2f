use colored::Colorize;

use urag_engine::{EngineStats, QueryResult, Tier};

pub fn format_answer(question: &str, r: &QueryResult) -> String {
    let mut output = String::new();

    output.push_str(&"━".repeat(60));
    output.push('\n');
    output.push_str(&question.bold().to_string());
    output.push('\n');

    let tier = r.tier.to_string();
    let tier = match r.tier {
        Tier::Faq => tier.green(),
        Tier::Document => tier.blue(),
        Tier::Fallback => tier.yellow(),
    };
    output.push_str(&format!("{tier}  confidence {:.2}", r.confidence));
    output.push('\n');

    if let Some(q) = &r.matched_question {
        output.push_str(&format!("matched: {q}").cyan().to_string());
        output.push('\n');
    }
    if !r.document_ids.is_empty() {
        output.push_str(&format!("chunks: {}", r.document_ids.join(", ")).cyan().to_string());
        output.push('\n');
    }
    for url in &r.sources {
        output.push_str(&url.bright_black().to_string());
        output.push('\n');
    }

    output.push('\n');
    output.push_str(r.content.trim_end());
    output.push('\n');
    output
}

pub fn format_stats(stats: &EngineStats) -> String {
    let mut output = String::new();

    output.push_str(&"Index Statistics".bold().to_string());
    output.push('\n');
    output.push_str(&format!("FAQ items: {}", stats.faq_count));
    output.push('\n');
    output.push_str(&format!("Document chunks: {}", stats.document_count));
    output.push('\n');
    output.push_str(&format!("FAQ variations: {}", stats.total_variations));
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_answer_lists_sources_and_chunks() {
        let r = QueryResult {
            tier: Tier::Document,
            content: "Fees are due in July.".into(),
            confidence: 0.8,
            sources: vec!["https://college.example/fees".into()],
            faq_id: None,
            document_ids: vec!["doc_7".into(), "doc_9".into()],
            matched_question: None,
        };
        let out = format_answer("When are fees due?", &r);
        assert!(out.contains("document"));
        assert!(out.contains("confidence 0.80"));
        assert!(out.contains("doc_7, doc_9"));
        assert!(out.contains("https://college.example/fees"));
        assert!(out.ends_with("Fees are due in July.\n"));
    }

    #[test]
    fn stats_block_has_all_counts() {
        let out = format_stats(&EngineStats {
            faq_count: 120,
            document_count: 45,
            total_variations: 80,
        });
        assert!(out.contains("FAQ items: 120"));
        assert!(out.contains("Document chunks: 45"));
        assert!(out.contains("FAQ variations: 80"));
    }
}
