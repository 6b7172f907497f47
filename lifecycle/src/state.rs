/// What a UI sees of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            success: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl<T> RequestState<T> {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.success {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == Phase::Idle
    }

    /// True while loading with no data yet from an earlier success.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && self.data.is_none()
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = false;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
        self.success = true;
    }

    /// Data from an earlier success is kept.
    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
        self.success = false;
    }
}
