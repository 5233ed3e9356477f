use crate::form::TopicQuery;

/// Builds the completion prompt for a validated query.
///
/// Pure and deterministic: the same query always yields the same string,
/// byte for byte. Keywords are quoted and comma-joined; with no keywords the
/// list collapses to an empty string.
pub fn build_prompt(query: &TopicQuery) -> String {
    let keywords = query
        .keywords
        .iter()
        .map(|keyword| format!("\"{}\"", keyword))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "Generate {} project topics for final year {} student in the department of {} \
         and faculty of {} that incorporate the keywords {} along with a description \
         of the topic",
        query.topics_count, query.institution, query.department, query.faculty, keywords
    )
}
