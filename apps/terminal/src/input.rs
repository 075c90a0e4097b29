use shared::{
    domain::{RoundSize, TokenId},
    error::GameError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(RoundSize),
    Invalid(GameError),
    Click(TokenId),
    NewRound,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug)]
pub struct InputSource {
    awaiting_size: bool,
}

impl Default for InputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource {
    pub fn new() -> Self {
        Self {
            awaiting_size: true,
        }
    }

    pub fn awaiting_size(&self) -> bool {
        self.awaiting_size
    }

    pub fn interpret(&mut self, line: &str) -> Command {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => return Command::Quit,
            "help" | "?" => return Command::Help,
            "new" | "go" => {
                self.awaiting_size = true;
                return Command::NewRound;
            }
            "reset" => {
                self.awaiting_size = true;
                return Command::Reset;
            }
            _ => {}
        }

        if self.awaiting_size {
            return match RoundSize::parse(trimmed) {
                Ok(size) => {
                    self.awaiting_size = false;
                    Command::Start(size)
                }
                Err(err) => Command::Invalid(err),
            };
        }

        match trimmed.parse::<u32>() {
            Ok(id) => Command::Click(TokenId(id)),
            Err(_) => Command::Unknown(trimmed.to_string()),
        }
    }
}
