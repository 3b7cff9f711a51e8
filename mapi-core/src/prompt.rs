use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Asks the user to confirm a destructive action. Only the exact answer
/// `yes` confirms.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == "yes"
}

pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{question}");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(e) => {
                tracing::warn!("Cannot read confirmation: {}", e);
                false
            }
        }
    }
}

/// Replays canned answers and remembers the questions asked.
#[derive(Default)]
pub struct Scripted {
    answers: RefCell<VecDeque<String>>,
    pub questions: RefCell<Vec<String>>,
}

impl Scripted {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            questions: RefCell::new(Vec::new()),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .is_some_and(|answer| is_yes(&answer))
    }
}
