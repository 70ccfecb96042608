//! Entry form state: the draft plus its field-level validation signals.
//!
//! Widgets are external; this type only carries what they render.

use crate::category::Category;

/// Placeholder shown by the category dropdown when nothing is selected.
pub const CATEGORY_PLACEHOLDER: &str = "Type of Income";

/// Hint shown under the amount field while it is empty.
pub const EMPTY_AMOUNT_HINT: &str = "Enter the value";

/// Values collected by the form, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub amount: String,
    pub category: Option<Category>,
}

impl EntryDraft {
    pub fn new(amount: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            amount: amount.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    draft: EntryDraft,
    category_error: bool,
    amount_hint: Option<&'static str>,
    placeholder: &'static str,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            draft: EntryDraft::default(),
            category_error: false,
            amount_hint: None,
            placeholder: CATEGORY_PLACEHOLDER,
        }
    }
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled with `draft`, as if the user had typed and selected it.
    pub fn with_draft(draft: EntryDraft) -> Self {
        let mut form = Self::new();
        form.set_amount(draft.amount);
        if let Some(category) = draft.category {
            form.select_category(category);
        }
        form
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.draft.amount = value.into();
        self.amount_hint = if self.draft.amount.is_empty() {
            Some(EMPTY_AMOUNT_HINT)
        } else {
            None
        };
    }

    pub fn select_category(&mut self, category: Category) {
        self.draft.category = Some(category);
        self.category_error = false;
        self.placeholder = category.label();
    }

    pub fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    /// Set after a submission without a category; cleared by a selection.
    pub fn category_error(&self) -> bool {
        self.category_error
    }

    pub fn amount_hint(&self) -> Option<&'static str> {
        self.amount_hint
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub(crate) fn flag_missing_category(&mut self) {
        self.category_error = true;
    }

    /// Back to empty fields with no validation state.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
