use crate::form::TopicQuery;

/// One generated project-topic suggestion, split into a title and an
/// (optionally empty) description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub title: String,
    pub description: String,
}

/// Splits completion text into topic entries: one entry per non-empty line,
/// split on the first colon. A line without a colon becomes a title with an
/// empty description; the text around the colon is kept verbatim.
pub fn parse_topics(text: &str) -> Vec<TopicEntry> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(':') {
            Some((title, description)) => TopicEntry {
                title: title.to_string(),
                description: description.to_string(),
            },
            None => TopicEntry {
                title: line.to_string(),
                description: String::new(),
            },
        })
        .collect()
}

/// Header line for the results view, echoing the query the topics were
/// generated for.
pub fn summary_line(query: &TopicQuery) -> String {
    format!(
        "{} topics generated for final year {} student in faculty of {} and department of {}.",
        query.topics_count, query.institution, query.faculty, query.department
    )
}
