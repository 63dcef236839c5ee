/// One answer from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Line(String),
    /// Ctrl-C or an abandoned prompt; the session cancels with no side
    /// effects.
    Interrupted,
}

/// Line-based challenge/response channel, used only while resolving the
/// output name.
pub trait NamePrompt {
    /// # Errors
    ///
    /// Returns an [`Err`] only when the channel itself breaks; interruption
    /// is a [`Reply`], not an error.
    fn challenge(&mut self, message: &str) -> anyhow::Result<Reply>;
}

/// Console implementation on top of `inquire`.
#[derive(Default)]
pub struct ConsolePrompt;

impl NamePrompt for ConsolePrompt {
    fn challenge(&mut self, message: &str) -> anyhow::Result<Reply> {
        match inquire::Text::new(message).prompt() {
            Ok(line) => Ok(Reply::Line(line.trim().to_owned())),
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => Ok(Reply::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}
