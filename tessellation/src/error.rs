/// Errors surfaced at the one boundary the core does not fully control: the
/// optional parallel job runner. Everything else in this crate is total over
/// valid floats (§7) and coerces invalid input rather than failing.
#[derive(thiserror::Error, Debug)]
pub enum TessellationError {
    #[error("a scanline worker thread panicked: {0}")]
    WorkerPanicked(String),
}
