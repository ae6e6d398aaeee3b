//! Rendering of indexing and query results.

use serde::Serialize;

use notes_retrieval::{IndexReport, QueryResponse};

/// Everything a run produced, for `--json`.
#[derive(Debug, Default, Serialize)]
pub struct RunOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<IndexReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<QueryResponse>,
}

pub fn render_index(report: &IndexReport) -> String {
    format!("Indexed {} notes", report.notes_indexed)
}

pub fn render_response(response: &QueryResponse) -> String {
    let mut out = String::new();
    out.push_str("\nAnswer:\n=======\n");
    out.push_str(&response.answer);
    out.push_str("\n\nSources:\n========\n");
    for source in &response.sources {
        out.push_str(&format!(
            "\n- {}\n  Path: {}\n  Relevance Score: {:.4}\n",
            source.title, source.path, source.relevance_score
        ));
    }
    out
}
