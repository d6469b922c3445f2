use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

use super::session_log::{Role, Turn};

pub const GREETING_REPLY: &str = "Hello! I'm your simple agent. I can help you with basic questions. Try asking me about the time, date, or math!";
pub const NAME_REPLY: &str = "I'm Simple Agent, your friendly AI assistant!";
pub const HELP_REPLY: &str = "I can help you with:
• Telling you the current time or date
• Basic math calculations
• Answering simple questions
• Having a friendly conversation

What would you like to know?";
pub const FAREWELL_REPLY: &str = "Goodbye! It was nice talking to you. Have a great day!";
pub const NO_HISTORY_REPLY: &str = "No conversation history yet.";
pub const DIVIDE_BY_ZERO_REPLY: &str = "I can't divide by zero!";
pub const MATH_NOT_UNDERSTOOD_REPLY: &str =
    "I couldn't understand that math problem. Try something like '5 plus 3' or '10 divided by 2'";
pub const MATH_FAILED_REPLY: &str =
    "Sorry, I had trouble with that calculation. Try a simpler expression like '2 + 2'";

static BINARY_OP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*([+\-*/])\s*([0-9]+)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Time,
    Date,
    Name,
    Help,
    Farewell,
    History,
    Math,
    Unknown,
}

// Checked in this order against whole words; the first hit wins.
const KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Greeting, &["hello", "hi"]),
    (Intent::Time, &["time"]),
    (Intent::Date, &["date"]),
    (Intent::Name, &["name"]),
    (Intent::Help, &["help"]),
    (Intent::Farewell, &["bye", "goodbye"]),
    (Intent::History, &["history"]),
];

// Matched anywhere in the message, so "5plus3" still counts.
const MATH_WORDS: &[&str] = &["plus", "minus", "times", "multiplied", "divided", "divide"];
const OPERATOR_SYMBOLS: &[char] = &['+', '-', '*', '/'];

pub fn detect_intent(msg: &str) -> Intent {
    let msg_lower = msg.to_lowercase();
    let words: Vec<&str> = msg_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (intent, keywords) in KEYWORDS {
        if keywords.iter().any(|k| words.contains(k)) {
            return *intent;
        }
    }

    // Math comes last, so substring tests cannot shadow an earlier intent.
    if msg_lower.contains(OPERATOR_SYMBOLS) || MATH_WORDS.iter().any(|w| msg_lower.contains(w)) {
        Intent::Math
    } else {
        Intent::Unknown
    }
}

/// Answer one message. `history` is the recent log of the caller's session
/// (without the message being answered) and `now` is the local wall clock.
pub fn generate_reply(history: &[Turn], user_msg: &str, now: NaiveDateTime) -> String {
    use Intent::*;

    match detect_intent(user_msg) {
        Greeting => GREETING_REPLY.to_string(),
        Time => format!("The current time is {}", now.format("%I:%M %p")),
        Date => format!("Today's date is {}", now.format("%B %d, %Y")),
        Name => NAME_REPLY.to_string(),
        Help => HELP_REPLY.to_string(),
        Farewell => FAREWELL_REPLY.to_string(),
        History => render_history(history),
        Math => handle_math(&user_msg.to_lowercase()),
        Unknown => format!(
            "I heard you say: '{}'. I'm a simple agent still learning. Try asking me about the time, date, or say 'help' to see what I can do!",
            user_msg
        ),
    }
}

pub fn render_history(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return NO_HISTORY_REPLY.to_string();
    }
    let mut out = String::from("Recent conversation:\n");
    for turn in turns {
        let speaker = match turn.role {
            Role::User => "You",
            Role::Agent => "Me",
        };
        out.push_str(&format!("{}: {}\n", speaker, turn.text));
    }
    out
}

#[derive(Debug)]
enum MathError {
    BadNumber,
    NotFinite,
}

/// Single binary operation on two integers, with word operators allowed.
pub fn handle_math(message: &str) -> String {
    match evaluate(message) {
        Ok(Some(reply)) => reply,
        Ok(None) => MATH_NOT_UNDERSTOOD_REPLY.to_string(),
        Err(e) => {
            tracing::debug!(error = ?e, "math evaluation failed");
            MATH_FAILED_REPLY.to_string()
        }
    }
}

fn evaluate(message: &str) -> Result<Option<String>, MathError> {
    let message = message
        .replace("plus", "+")
        .replace("minus", "-")
        .replace("times", "*")
        .replace("multiplied by", "*")
        .replace("divided by", "/")
        .replace("divide", "/");

    let Some(caps) = BINARY_OP.captures(&message) else {
        return Ok(None);
    };

    let lhs: f64 = caps[1].parse().map_err(|_| MathError::BadNumber)?;
    let rhs: f64 = caps[3].parse().map_err(|_| MathError::BadNumber)?;

    let result = match &caps[2] {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        _ => {
            if rhs == 0.0 {
                return Ok(Some(DIVIDE_BY_ZERO_REPLY.to_string()));
            }
            lhs / rhs
        }
    };

    if !result.is_finite() {
        return Err(MathError::NotFinite);
    }

    // f64's Display already drops the fraction of integral values.
    Ok(Some(format!("The answer is: {}", result)))
}
