use std::fmt::Write;

use crate::models::{ChatMessage, RetrievalMatch};

pub const SYSTEM_PROMPT: &str = "\
You are a helpful and knowledgeable assistant designed to help students make informed \
decisions about choosing professors. You will receive a list of professors that match the \
student's query, including their names, subjects, ratings, and reviews.

Your goal is to:
1. Summarize and refine the recommendations provided.
2. Highlight the strengths of each professor based on the information given.
3. Offer concise advice to help the student choose between the provided options.

Ensure your tone is friendly, supportive, and informative.";

/// Render matches as a numbered list, one line per match, in retrieval order.
pub fn build_context_block(matches: &[RetrievalMatch]) -> String {
    let mut ctx = format!(
        "Here are the top {} professors based on your query:\n",
        matches.len()
    );

    for (i, m) in matches.iter().enumerate() {
        write!(
            ctx,
            "{}. Professor: {}, Subject: {}, Stars: {}\n\n",
            i + 1,
            m.professor(),
            m.subject(),
            m.stars()
        )
        .unwrap();
    }

    ctx
}

/// Assemble `[system] + prior + [latest] + [context]`.
///
/// The retrieval context goes last, as an assistant turn, so the model reads
/// it as something it has already said about the user's question.
pub fn compose(
    system_prompt: &str,
    prior: &[ChatMessage],
    latest: &ChatMessage,
    matches: &[RetrievalMatch],
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(prior.len() + 3);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(prior.iter().cloned());
    messages.push(latest.clone());
    messages.push(ChatMessage::assistant(build_context_block(matches)));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    fn make_match(name: &str, subject: &str, stars: serde_json::Value) -> RetrievalMatch {
        RetrievalMatch {
            id: format!("id-{name}"),
            score: Some(0.5),
            metadata: json!({"professor": name, "subject": subject, "stars": stars})
                .as_object()
                .cloned()
                .unwrap(),
        }
    }

    fn numbered_lines(block: &str) -> Vec<&str> {
        block
            .lines()
            .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .collect()
    }

    #[test]
    fn test_context_block_three_matches() {
        let matches = vec![
            make_match("Dr. Ada", "Math", json!(5)),
            make_match("Dr. Grace", "CS", json!(4)),
            make_match("Dr. Alan", "Logic", json!("3.5")),
        ];
        let ctx = build_context_block(&matches);
        assert_eq!(
            numbered_lines(&ctx),
            vec![
                "1. Professor: Dr. Ada, Subject: Math, Stars: 5",
                "2. Professor: Dr. Grace, Subject: CS, Stars: 4",
                "3. Professor: Dr. Alan, Subject: Logic, Stars: 3.5",
            ]
        );
        assert!(ctx.starts_with("Here are the top 3 professors"));
    }

    #[test]
    fn test_context_block_no_matches() {
        let ctx = build_context_block(&[]);
        assert!(numbered_lines(&ctx).is_empty());
        assert!(ctx.starts_with("Here are the top 0 professors"));
    }

    #[test]
    fn test_compose_order() {
        let prior = vec![ChatMessage::user("q1"), ChatMessage::assistant("a1")];
        let latest = ChatMessage::user("q2");
        let matches = vec![make_match("Dr. Ada", "Math", json!(5))];

        let msgs = compose("sys", &prior, &latest, &matches);
        assert_eq!(msgs.len(), 5);
        assert_eq!(msgs[0], ChatMessage::system("sys"));
        assert_eq!(msgs[1].content, "q1");
        assert_eq!(msgs[2].content, "a1");
        assert_eq!(msgs[3], latest);
        assert_eq!(msgs[4].role, Role::Assistant);
        assert!(msgs[4].content.contains("1. Professor: Dr. Ada"));
    }

    #[test]
    fn test_compose_no_prior() {
        let msgs = compose(SYSTEM_PROMPT, &[], &ChatMessage::user("hello"), &[]);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0].role, Role::System);
        assert_eq!(msgs[1].role, Role::User);
        assert_eq!(msgs[2].role, Role::Assistant);
    }
}
