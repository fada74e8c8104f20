//! The expense draft edited by the form, and the typed record it becomes
//! once it passes review.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed set of expense categories offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Restaurant,
    Transport,
    Utilities,
    Entertainment,
}

impl Category {
    /// All categories, in the order the form lists them.
    pub const ALL: [Category; 5] = [
        Category::Groceries,
        Category::Restaurant,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "Groceries",
            Category::Restaurant => "Restaurant",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
        }
    }

    /// Label glyph shown next to the option.
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Groceries => "🛒",
            Category::Restaurant => "🍽️",
            Category::Transport => "🚗",
            Category::Utilities => "🏠",
            Category::Entertainment => "🎭",
        }
    }

    /// The category after `self` in [`Category::ALL`], wrapping around.
    pub fn next(&self) -> Category {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// The category before `self` in [`Category::ALL`], wrapping around.
    pub fn prev(&self) -> Category {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Exact, case-sensitive match on the option value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// One of the six editable fields of an [`ExpenseDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftField {
    Text,
    Amount,
    Category,
    Date,
    Name,
    Notes,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::Text,
        DraftField::Amount,
        DraftField::Category,
        DraftField::Date,
        DraftField::Name,
        DraftField::Notes,
    ];

    /// Fields that must be non-empty before the draft can be submitted.
    pub const REQUIRED: [DraftField; 4] = [
        DraftField::Amount,
        DraftField::Date,
        DraftField::Category,
        DraftField::Name,
    ];

    /// Form name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            DraftField::Text => "text",
            DraftField::Amount => "amount",
            DraftField::Category => "category",
            DraftField::Date => "date",
            DraftField::Name => "name",
            DraftField::Notes => "notes",
        }
    }

    /// Human label used by front-ends.
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Text => "Extracted Text",
            DraftField::Amount => "Amount",
            DraftField::Category => "Category",
            DraftField::Date => "Date",
            DraftField::Name => "Merchant Name",
            DraftField::Notes => "Notes",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| format!("unknown field '{s}'"))
    }
}

/// Editable expense record. Every field is kept as the raw string the user
/// sees; parsing happens only at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub text: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub name: String,
    pub notes: String,
}

impl ExpenseDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Text => &self.text,
            DraftField::Amount => &self.amount,
            DraftField::Category => &self.category,
            DraftField::Date => &self.date,
            DraftField::Name => &self.name,
            DraftField::Notes => &self.notes,
        }
    }

    pub fn get_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Text => &mut self.text,
            DraftField::Amount => &mut self.amount,
            DraftField::Category => &mut self.category,
            DraftField::Date => &mut self.date,
            DraftField::Name => &mut self.name,
            DraftField::Notes => &mut self.notes,
        }
    }

    /// Replace a single field, leaving the other five untouched.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Required fields that are currently blank.
    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .iter()
            .copied()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }
}

/// A draft that passed review, with every field parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedExpense {
    pub text: String,
    pub amount: Decimal,
    pub category: Category,
    pub date: NaiveDate,
    pub name: String,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_exact() {
        assert_eq!("Groceries".parse::<Category>().unwrap(), Category::Groceries);
        assert!("groceries".parse::<Category>().is_err());
        assert!("Other".parse::<Category>().is_err());
    }

    #[test]
    fn category_cycles_through_all() {
        let mut c = Category::Groceries;
        for _ in 0..Category::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Category::Groceries);
        assert_eq!(Category::Groceries.prev(), Category::Entertainment);
    }

    #[test]
    fn set_touches_only_named_field() {
        let mut draft = ExpenseDraft {
            text: "T".into(),
            amount: "1".into(),
            category: "Transport".into(),
            date: "2024-01-01".into(),
            name: "Cab".into(),
            notes: "n".into(),
        };
        let before = draft.clone();
        draft.set(DraftField::Name, "Taxi Co");

        assert_eq!(draft.name, "Taxi Co");
        for field in DraftField::ALL.iter().filter(|f| **f != DraftField::Name) {
            assert_eq!(draft.get(*field), before.get(*field));
        }
    }

    #[test]
    fn missing_required_ignores_text_and_notes() {
        let draft = ExpenseDraft::default();
        assert_eq!(
            draft.missing_required(),
            vec![DraftField::Amount, DraftField::Date, DraftField::Category, DraftField::Name]
        );
    }

    #[test]
    fn field_names_round_trip() {
        assert_eq!("name".parse::<DraftField>().unwrap(), DraftField::Name);
        assert!("merchant".parse::<DraftField>().is_err());
    }
}
