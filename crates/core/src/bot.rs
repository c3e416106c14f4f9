//! Canned, rule-based chat responder.
//!
//! The bot is a pure function of the message text and the user's display
//! name. Rules are checked in order and the first whose keywords appear as
//! whole words in the message wins.

use crate::catalog;
use crate::progress::PROJECT_REWARD_POINTS;
use crate::rewards::POINTS_PER_LEVEL;

/// A keyword rule: matches when any keyword is a word of the message.
struct Rule {
    keywords: &'static [&'static str],
    reply: fn(&str) -> String,
}

impl Rule {
    fn matches(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.keywords.contains(w))
    }
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["project", "projects"],
        reply: project_reply,
    },
    Rule {
        keywords: &["task", "tasks", "checklist"],
        reply: task_reply,
    },
    Rule {
        keywords: &["point", "points", "score", "level", "badge", "badges"],
        reply: points_reply,
    },
    Rule {
        keywords: &["hi", "hello", "hey", "greetings"],
        reply: greeting_reply,
    },
    Rule {
        keywords: &["help"],
        reply: help_reply,
    },
];

const CLARIFICATION: &str = "Sorry, I didn't catch that. Could you say it again?";

/// Trim and lower-case raw message text.
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

/// Produce the bot's reply to `message` for the user `name`.
pub fn respond(message: &str, name: &str) -> String {
    let text = normalize(message);
    if text.is_empty() {
        return CLARIFICATION.to_string();
    }

    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    RULES
        .iter()
        .find(|rule| rule.matches(&words))
        .map(|rule| (rule.reply)(name))
        .unwrap_or_else(|| fallback_reply(name))
}

fn project_reply(name: &str) -> String {
    format!(
        "There are {} projects, {name}. Finish the one that is unlocked to open the next.",
        catalog::project_count()
    )
}

fn task_reply(_name: &str) -> String {
    "Each project has a task checklist. Tick tasks off as you go and your progress is saved."
        .to_string()
}

fn points_reply(_name: &str) -> String {
    format!(
        "You earn {PROJECT_REWARD_POINTS} points for every project you complete, \
         and every {POINTS_PER_LEVEL} points takes you up a level."
    )
}

fn greeting_reply(name: &str) -> String {
    format!("Hello {name}! How can I help with your projects today?")
}

fn help_reply(_name: &str) -> String {
    "You can ask me about projects, tasks, or points.".to_string()
}

fn fallback_reply(name: &str) -> String {
    format!("Thanks for your message, {name}. Ask me about projects, tasks, or points.")
}
