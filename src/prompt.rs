use console::Term;

use crate::error::{CheckerError, Result};

/// Answers collected when no usable configuration is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAnswers {
    pub host: String,
    pub token: String,
    pub store: bool,
}

const HOST_QUESTION: &str = "Enter the Gitlab host (including protocol)";
const TOKEN_QUESTION: &str = "Provide your private token";
const STORE_QUESTION: &str = "Store repo configuration? (y/n)";

/// Asks for whichever of host and token is still unknown, then whether to store them.
pub fn ask(term: &Term, host: Option<&str>, token: Option<&str>) -> Result<PromptAnswers> {
    ask_with(
        |description, secret| {
            let answer = ask_line(term, description, secret)?;
            if description == STORE_QUESTION && parse_yes_no(&answer).is_none() {
                term.write_line("Please answer y or n.")?;
            }
            Ok(answer)
        },
        host,
        token,
    )
}

fn ask_with<F>(mut read: F, host: Option<&str>, token: Option<&str>) -> Result<PromptAnswers>
where
    F: FnMut(&str, bool) -> Result<String>,
{
    let host = match host {
        Some(host) => host.to_string(),
        None => read(HOST_QUESTION, false)?,
    };
    let token = match token {
        Some(token) => token.to_string(),
        None => read(TOKEN_QUESTION, true)?,
    };
    let store = loop {
        if let Some(store) = parse_yes_no(&read(STORE_QUESTION, false)?) {
            break store;
        }
    };

    Ok(PromptAnswers { host, token, store })
}

fn ask_line(term: &Term, description: &str, secret: bool) -> Result<String> {
    loop {
        term.write_str(&format!("{description}: "))?;
        let answer = if secret {
            term.read_secure_line()?
        } else {
            term.read_line()?
        };
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
        if !term.is_term() {
            return Err(CheckerError::Prompt(format!(
                "no answer for '{description}' on non-interactive input"
            )));
        }
    }
}

/// Only exactly `y` or `n` are accepted.
fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim() {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        answers: &[&str],
        host: Option<&str>,
        token: Option<&str>,
    ) -> (PromptAnswers, Vec<String>) {
        let mut asked = Vec::new();
        let mut answers = answers.iter().map(|answer| answer.to_string());
        let result = ask_with(
            |description, _secret| {
                asked.push(description.to_string());
                answers
                    .next()
                    .ok_or_else(|| CheckerError::Prompt("out of answers".to_string()))
            },
            host,
            token,
        )
        .unwrap();
        (result, asked)
    }

    #[test]
    fn known_host_is_not_asked_again() {
        let (answers, asked) = run(&["glpat-abc", "n"], Some("https://gitlab.example.com"), None);

        assert_eq!(answers.host, "https://gitlab.example.com");
        assert_eq!(answers.token, "glpat-abc");
        assert!(!answers.store);
        assert_eq!(asked, [TOKEN_QUESTION, STORE_QUESTION]);
    }

    #[test]
    fn everything_is_asked_when_nothing_is_known() {
        let (answers, asked) = run(
            &["https://gitlab.example.com", "glpat-abc", "maybe", "y"],
            None,
            None,
        );

        assert_eq!(answers.host, "https://gitlab.example.com");
        assert!(answers.store);
        assert_eq!(
            asked,
            [HOST_QUESTION, TOKEN_QUESTION, STORE_QUESTION, STORE_QUESTION]
        );
    }

    #[test]
    fn yes_no_is_strict() {
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("n\n"), Some(false));
        assert_eq!(parse_yes_no("yes"), None);
        assert_eq!(parse_yes_no("Y"), None);
        assert_eq!(parse_yes_no(""), None);
    }
}
