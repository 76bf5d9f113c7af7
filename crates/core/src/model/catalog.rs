use crate::model::ids::TopicId;
use crate::model::question::Question;

/// Read-only, ordered collection of all available questions.
///
/// The order questions were loaded in is the catalog order; topic derivation
/// and filtering both preserve it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

impl Catalog {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Distinct topic ids in first-seen order.
    #[must_use]
    pub fn topics(&self) -> Vec<TopicId> {
        let mut topics = Vec::new();
        for question in &self.questions {
            if !topics.contains(&question.topic()) {
                topics.push(question.topic());
            }
        }
        topics
    }

    /// The subset of questions for one topic, in catalog order.
    #[must_use]
    pub fn questions_for(&self, topic: TopicId) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.topic() == topic)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::QuestionDraft;

    fn question(topic: u32, number: u32) -> Question {
        QuestionDraft {
            id: format!("{topic}-{number}"),
            topic: TopicId::new(topic),
            text: format!("Question {topic}-{number}"),
            options: ["one".into(), "two".into(), "three".into(), "four".into()],
            answer: "a".into(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn topics_are_distinct_in_first_seen_order() {
        let catalog = Catalog::new(vec![
            question(7, 1),
            question(3, 1),
            question(7, 2),
            question(10, 1),
            question(3, 2),
        ]);

        let topics: Vec<_> = catalog.topics().iter().map(TopicId::value).collect();
        assert_eq!(topics, [7, 3, 10]);
    }

    #[test]
    fn questions_for_keeps_catalog_order() {
        let catalog = Catalog::new(vec![
            question(7, 2),
            question(3, 1),
            question(7, 1),
        ]);

        let subset = catalog.questions_for(TopicId::new(7));
        let ids: Vec<_> = subset.iter().map(|q| q.id().to_string()).collect();
        assert_eq!(ids, ["7-2", "7-1"]);
    }

    #[test]
    fn empty_catalog_has_no_topics() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.topics().is_empty());
        assert!(catalog.questions_for(TopicId::new(1)).is_empty());
    }
}
