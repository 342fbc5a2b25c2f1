//! Snapshot tests for terminal rendering

#[cfg(test)]
mod snapshot_tests {
    use crate::ui::banner_line;
    use crate::{render_answer, render_error, render_health};
    use bookrag_core::{Citation, ComponentStatus, Error, HealthReport, QueryResult};
    use insta::assert_snapshot;

    fn plain() {
        colored::control::set_override(false);
    }

    fn citation(id: &str, title: Option<&str>, url: Option<&str>, score: f32) -> Citation {
        Citation {
            document_id: id.to_string(),
            title: title.map(str::to_string),
            url: url.map(str::to_string),
            snippet: String::new(),
            relevance_score: score,
        }
    }

    #[test]
    fn test_render_answer_with_sources() {
        plain();
        let result = QueryResult {
            answer: "A node is a process that performs computation [Document 1].".to_string(),
            citations: vec![
                citation("doc-1", Some("Nodes"), Some("/docs/ros2/nodes"), 0.91),
                citation("doc-2", None, None, 0.78),
            ],
            confidence: 0.84,
            processing_time_ms: 1320,
            model: "gemini-2.0-flash".to_string(),
        };

        assert_snapshot!(render_answer(&result), @r###"
        A node is a process that performs computation [Document 1].

        Sources:
          [1] Nodes (0.91) /docs/ros2/nodes
          [2] doc-2 (0.78)

        confidence 84% • 1320 ms • gemini-2.0-flash
        "###);
    }

    #[test]
    fn test_render_answer_without_sources() {
        plain();
        let result = QueryResult {
            answer: "The book does not cover that.".to_string(),
            citations: Vec::new(),
            confidence: 0.0,
            processing_time_ms: 410,
            model: "gemini-2.0-flash".to_string(),
        };

        assert_snapshot!(render_answer(&result), @r###"
        The book does not cover that.

        No sources met the similarity threshold.

        confidence 0% • 410 ms • gemini-2.0-flash
        "###);
    }

    #[test]
    fn test_render_health() {
        plain();
        let mut report = HealthReport::default();
        report.insert("vector_database", ComponentStatus::unhealthy("Retrieval error: connection refused"));
        report.insert("llm_endpoint", ComponentStatus::healthy("embedding model `text-embedding-004` returned 768 dimensions"));

        assert_snapshot!(render_health(&report), @r###"
        ✔ llm_endpoint: embedding model `text-embedding-004` returned 768 dimensions
        ✘ vector_database: Retrieval error: connection refused
        one or more components unhealthy
        "###);
    }

    #[test]
    fn test_render_error() {
        plain();
        let err = Error::Validation("query must not be empty".to_string());
        assert_eq!(render_error(&err), "✘ validation failed: query must not be empty");
    }

    #[test]
    fn test_banner_line_fits_box() {
        let row = banner_line("model: gemini-2.0-flash", 20);
        assert_eq!(row, "│  model: gemini-2.  │");
        assert_eq!(row.chars().count(), 22);

        let long = banner_line(&"é".repeat(40), 20);
        assert_eq!(long.chars().count(), 22);
        assert_eq!(long.matches('é').count(), 16);

        let short = banner_line("ok", 10);
        assert_eq!(short, "│  ok      │");
    }
}
