/// Outcome of one CLI mode: either it handled the invocation or the next mode gets a turn.
#[derive(Debug, PartialEq, Eq)]
pub enum CliModeResult {
    Finish,
    NothingToDo,
}
