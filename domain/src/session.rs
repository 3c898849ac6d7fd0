use crate::models::StrategyBrief;

/// Briefs produced during one interactive run. Nothing here is persisted.
#[derive(Debug, Default)]
pub struct Session {
    briefs: Vec<StrategyBrief>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_brief(&mut self, brief: StrategyBrief) {
        self.briefs.push(brief);
    }

    pub fn briefs(&self) -> &[StrategyBrief] {
        &self.briefs
    }

    pub fn len(&self) -> usize {
        self.briefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.briefs.is_empty()
    }
}
