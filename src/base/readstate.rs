/// The current state of a cookie store read.
///
/// Transitions run `Opened -> SchemaDetected -> Streaming -> Closed`.
/// Any step may end in `Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadState {
    /// The store file is open and was recognized as SQLite.
    #[default]
    Opened,

    /// A column set matched the store's table.
    SchemaDetected,

    /// Rows are being pulled from the store.
    Streaming,

    /// All rows were read.
    Closed,

    /// The read ended with an error.
    Failed,
}

impl ReadState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, ReadState::Closed | ReadState::Failed)
    }
}
