//! Typed-form buffers backing the add/edit and rent modals.

use crate::payload::CustomerPayload;
use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Ordered text fields with a single focused field receiving input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBuffer {
    fields: Vec<FormField>,
    focus: usize,
}

impl FormBuffer {
    pub fn new(fields: &[(&'static str, &'static str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|&(key, label)| FormField {
                    key,
                    label,
                    value: String::new(),
                })
                .collect(),
            focus: 0,
        }
    }

    pub fn customer() -> Self {
        Self::new(&[
            ("first_name", "First Name"),
            ("last_name", "Last Name"),
            ("email", "Email"),
        ])
    }

    pub fn rental() -> Self {
        Self::new(&[("customer_id", "Customer ID")])
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = if self.focus == 0 {
                self.fields.len() - 1
            } else {
                self.focus - 1
            };
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
        }
    }

    /// Copy matching fields out of a record; fields it lacks stay empty.
    pub fn prefill(&mut self, record: &Record) {
        for field in &mut self.fields {
            field.value = if record.has(field.key) {
                record.text(field.key)
            } else {
                String::new()
            };
        }
        self.focus = 0;
    }

    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.fields.iter().all(|f| f.value.is_empty())
    }

    pub fn to_customer_payload(&self) -> CustomerPayload {
        CustomerPayload {
            first_name: self.value("first_name").trim().to_string(),
            last_name: self.value("last_name").trim().to_string(),
            email: self.value("email").trim().to_string(),
        }
    }
}

impl Default for FormBuffer {
    fn default() -> Self {
        Self::customer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = FormBuffer::customer();
        form.insert_char('A');
        form.focus_next();
        form.insert_char('B');
        form.insert_char('X');
        form.backspace();
        assert_eq!(form.value("first_name"), "A");
        assert_eq!(form.value("last_name"), "B");
        assert_eq!(form.value("email"), "");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = FormBuffer::customer();
        form.focus_prev();
        assert_eq!(form.focus(), 2);
        form.focus_next();
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn prefill_and_clear() {
        let mut form = FormBuffer::customer();
        form.prefill(&Record::new(json!({
            "customer_id": 1,
            "first_name": "MARY",
            "last_name": "SMITH"
        })));
        assert_eq!(form.value("first_name"), "MARY");
        assert_eq!(form.value("email"), "");
        assert!(!form.is_empty());

        form.clear();
        assert!(form.is_empty());
    }

    #[test]
    fn payload_trims_values() {
        let mut form = FormBuffer::customer();
        form.set("first_name", " MARY ");
        form.set("last_name", "SMITH");
        form.set("email", "mary.smith@sakilacustomer.org ");
        assert_eq!(
            form.to_customer_payload(),
            CustomerPayload {
                first_name: "MARY".to_string(),
                last_name: "SMITH".to_string(),
                email: "mary.smith@sakilacustomer.org".to_string(),
            }
        );
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn backspace_undoes_typing(text in "[A-Za-z@. ]{0,24}") {
            let mut form = FormBuffer::customer();
            for c in text.chars() {
                form.insert_char(c);
            }
            prop_assert_eq!(form.value("first_name"), text.as_str());
            for _ in 0..text.chars().count() {
                form.backspace();
            }
            prop_assert!(form.is_empty());
        }

        #[test]
        fn focus_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mut form = FormBuffer::customer();
            for forward in steps {
                if forward {
                    form.focus_next();
                } else {
                    form.focus_prev();
                }
                prop_assert!(form.focus() < form.fields().len());
            }
        }
    }
}
