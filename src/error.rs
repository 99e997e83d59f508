use thiserror::Error;

/// Failure to read card text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("card text `{0}` has an odd number of characters")]
    OddLength(String),
    #[error("malformed card token `{0}`")]
    MalformedToken(String),
    #[error("duplicate card `{0}`")]
    DuplicateCard(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("deck exhausted: {requested} cards requested but only {remaining} remain")]
    ExhaustedDeck { requested: usize, remaining: usize },
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("simulation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
