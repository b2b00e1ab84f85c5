/// Load state of the table's visual model.
///
/// The model arrives asynchronously from the host. The table collider does not
/// wait for it; the balls do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

impl AssetState {
    /// Whether the completion signal (success or failure) has arrived.
    pub fn is_settled(&self) -> bool {
        !matches!(self, AssetState::Pending)
    }

    /// Record a completion signal. Returns false if one already arrived.
    pub fn settle(&mut self, outcome: Result<(), String>) -> bool {
        if self.is_settled() {
            return false;
        }
        *self = match outcome {
            Ok(()) => AssetState::Ready,
            Err(reason) => AssetState::Failed(reason),
        };
        true
    }
}
