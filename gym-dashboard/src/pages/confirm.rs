use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStep {
    /// First request on this row; nothing happens yet
    Armed,
    /// Second request on the same row; proceed
    Confirmed,
}

/// Two-step delete confirmation, armed on at most one row at a time
#[derive(Debug, Clone, Default)]
pub struct RowConfirm {
    armed: Option<Uuid>,
}

impl RowConfirm {
    pub fn request(&mut self, id: Uuid) -> ConfirmStep {
        if self.armed == Some(id) {
            self.armed = None;
            ConfirmStep::Confirmed
        } else {
            self.armed = Some(id);
            ConfirmStep::Armed
        }
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<Uuid> {
        self.armed
    }
}
