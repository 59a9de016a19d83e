use super::PipelineError;

/// Result of importing one batch entry
#[derive(Debug)]
pub struct ItemOutcome {
    /// Position in the `items` array
    pub index: usize,
    /// New document id, or why the item was not added
    pub result: Result<String, PipelineError>,
}

impl ItemOutcome {
    pub fn is_imported(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item outcomes of a batch, in request order
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<ItemOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub fn imported(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_imported()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.imported()
    }

    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_deref().ok())
    }
}
