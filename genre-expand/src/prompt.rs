use std::io::{self, BufRead, Write};

use log::warn;

use crate::settings::Settings;

/// A blocking question/answer channel to the operator.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Asks on stdout and reads one line from stdin.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}\n: ")?;
        stdout.flush()?;

        let mut reply = String::new();
        io::stdin().lock().read_line(&mut reply)?;
        Ok(reply.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Loose yes test: any `y` anywhere in the reply counts.
pub fn is_affirmative(reply: &str) -> bool {
    reply.to_lowercase().contains('y')
}

/// Operator decisions, short-circuited by the force flags.
pub struct Confirmer<P> {
    prompt: P,
    force: bool,
    skip_save_prompt: bool,
}

impl<P: Prompt> Confirmer<P> {
    pub fn new(prompt: P, settings: &Settings) -> Self {
        Self {
            prompt,
            force: settings.force,
            skip_save_prompt: settings.skips_save_prompt(),
        }
    }

    #[cfg(test)]
    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    fn ask(&mut self, question: &str) -> String {
        self.prompt.ask(question).unwrap_or_else(|e| {
            warn!("Could not read reply: {e}");
            String::new()
        })
    }

    /// Pick the topic title(s) to examine among search candidates.
    ///
    /// A lone candidate is taken as is. Under `force` every candidate is kept
    /// in order; otherwise the operator's reply must be a substring of one of
    /// the lowercased titles.
    pub fn choose_titles(&mut self, candidates: &[String]) -> Vec<String> {
        match candidates {
            [] => Vec::new(),
            [only] => vec![only.clone()],
            _ if self.force => candidates.to_vec(),
            _ => {
                let reply = self.ask(&format!(
                    "Is the topic {} or none?",
                    candidates.join(", ")
                ));
                candidates
                    .iter()
                    .find(|title| title.to_lowercase().contains(&reply))
                    .cloned()
                    .into_iter()
                    .collect()
            }
        }
    }

    pub fn confirm_genres(&mut self, artist: &str, genres: &[String]) -> bool {
        if self.skip_save_prompt {
            return true;
        }
        let reply = self.ask(&format!("Label {artist} as {}?", genres.join(";")));
        is_affirmative(&reply)
    }

    pub fn confirm_overwrite(&mut self, artist: &str, old_genre: &str, new_genre: &str) -> bool {
        if self.skip_save_prompt {
            return true;
        }
        let reply = self.ask(&format!(
            "Really change {artist}'s genre from {old_genre} to {new_genre}?"
        ));
        is_affirmative(&reply)
    }
}
