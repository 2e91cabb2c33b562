//! Q&A listing and question detail extractors.

use gamescrape_core::records::{Answer, Question, QuestionDetail, QuestionTopic};
use gamescrape_core::{Error, Result};
use scraper::{ElementRef, Html};

use crate::document::{first_digits, first_text, href, selector, text_of};

/// Questions grouped by topic, from either the answered or the unresolved listing.
///
/// Topic tables without a header are skipped.
pub fn extract_questions(page: &Html) -> Vec<QuestionTopic> {
    let mut topics = Vec::new();

    for table in page.select(selector!("table.qna_table")) {
        let Some(topic) = first_text(table, selector!("th.question")) else {
            tracing::debug!("skipping question table without topic header");
            continue;
        };

        let links = table.select(selector!("a[href]"));
        let counts = table.select(selector!("td.count"));

        let questions = links
            .zip(counts)
            .filter_map(|(link, count)| {
                Some(Question {
                    text: text_of(link).trim().to_string(),
                    link: href(link)?.to_string(),
                    answer_count: first_digits(&text_of(count)),
                })
            })
            .collect();

        topics.push(QuestionTopic { topic, questions });
    }

    topics
}

/// Full question text and its answers with their votes.
///
/// Question and answers share one markup shape; only answers carry vote
/// counters. The sidebar is excluded by reading the main column only.
///
/// # Errors
///
/// `MalformedField` if a vote counter is not a number.
pub fn extract_question_detail(page: &Html) -> Result<QuestionDetail> {
    let mut detail = QuestionDetail::default();

    let Some(main) = page.select(selector!("div.main_content div.span8")).next() else {
        return Ok(detail);
    };

    for entry in main.select(selector!("div.friend_info")) {
        let Some(text) = first_text(entry, selector!("span.name")) else {
            continue;
        };

        let upvotes = entry.select(selector!("span.up")).next();
        let downvotes = entry.select(selector!("span.down")).next();

        match (upvotes, downvotes) {
            (Some(up), Some(down)) => detail.answers.push(Answer {
                text,
                upvotes: parse_votes(up, "Upvotes")?,
                downvotes: parse_votes(down, "Downvotes")?,
            }),
            _ => detail.full_question = Some(text),
        }
    }

    Ok(detail)
}

fn parse_votes(counter: ElementRef<'_>, field: &str) -> Result<u32> {
    let text = text_of(counter);
    text.trim()
        .parse()
        .map_err(|_| Error::malformed(field, format!("expected a vote count, got {:?}", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use crate::testing::{ANSWERED_PAGE, DETAIL_PAGE};

    #[test]
    fn test_questions_grouped_by_topic() {
        let page = parse(ANSWERED_PAGE);
        let topics = extract_questions(&page);

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].topic, "Enemy/Boss Help");
        assert_eq!(topics[0].questions, vec![
            Question { text: "How do I beat the Black Knight?".into(), link: "/pc/1-game/answers/11".into(), answer_count: Some(3) },
            Question { text: "Where is the spam?".into(), link: "/pc/1-game/answers/12".into(), answer_count: Some(0) },
        ]);
        assert_eq!(topics[1].topic, "Technical Help");
        assert_eq!(topics[1].questions.len(), 1);
        assert_eq!(topics[1].questions[0].answer_count, None);
    }

    #[test]
    fn test_questions_skip_tables_without_topic() {
        let page = parse(
            r#"<table class="qna_table"><tr><td><a href="/q/1">Orphan?</a></td><td class="count">1</td></tr></table>"#,
        );
        assert!(extract_questions(&page).is_empty());
    }

    #[test]
    fn test_question_detail() {
        let page = parse(DETAIL_PAGE);
        let detail = extract_question_detail(&page).unwrap();

        assert_eq!(detail.full_question.as_deref(), Some("How do I beat the Black Knight without losing a limb?"));
        assert_eq!(detail.answers, vec![
            Answer { text: "Keep hitting him.".into(), upvotes: 5, downvotes: 1 },
            Answer { text: "Call it a draw.".into(), upvotes: 2, downvotes: 0 },
        ]);
    }

    #[test]
    fn test_question_detail_ignores_sidebar() {
        let page = parse(DETAIL_PAGE);
        let detail = extract_question_detail(&page).unwrap();
        assert!(detail.answers.iter().all(|a| a.text != "Sidebar entry"));
    }

    #[test]
    fn test_question_detail_without_main_column() {
        let page = parse("<div class=\"friend_info\"><span class=\"name\">Stray</span></div>");
        let detail = extract_question_detail(&page).unwrap();
        assert_eq!(detail, QuestionDetail::default());
    }

    #[test]
    fn test_question_detail_malformed_votes() {
        let page = parse(
            r#"<div class="main_content"><div class="span8">
                <div class="friend_info"><span class="name">Answer</span><span class="up">many</span><span class="down">0</span></div>
            </div></div>"#,
        );
        let result = extract_question_detail(&page);
        assert!(matches!(result, Err(Error::MalformedField { field, .. }) if field == "Upvotes"));
    }
}
