//! Search categories: the field a text query is matched against.

use serde::{Deserialize, Serialize};
use std::fmt;

pub trait SearchCategory:
    Copy + Eq + Default + fmt::Debug + Send + Sync + 'static
{
    /// Every category, in selector order.
    fn all() -> &'static [Self];

    /// Value sent as the `category` query parameter.
    fn as_query(&self) -> &'static str;

    /// Label shown in the category selector.
    fn label(&self) -> &'static str;

    fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmCategory {
    #[default]
    Title,
    Actor,
    Genre,
}

impl SearchCategory for FilmCategory {
    fn all() -> &'static [Self] {
        &[FilmCategory::Title, FilmCategory::Actor, FilmCategory::Genre]
    }

    fn as_query(&self) -> &'static str {
        match self {
            FilmCategory::Title => "title",
            FilmCategory::Actor => "actor",
            FilmCategory::Genre => "genre",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FilmCategory::Title => "Film Title",
            FilmCategory::Actor => "Actor Name",
            FilmCategory::Genre => "Film Genre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerCategory {
    CustomerId,
    #[default]
    FirstName,
    LastName,
}

impl SearchCategory for CustomerCategory {
    fn all() -> &'static [Self] {
        &[
            CustomerCategory::CustomerId,
            CustomerCategory::FirstName,
            CustomerCategory::LastName,
        ]
    }

    fn as_query(&self) -> &'static str {
        match self {
            CustomerCategory::CustomerId => "customer_id",
            CustomerCategory::FirstName => "first_name",
            CustomerCategory::LastName => "last_name",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CustomerCategory::CustomerId => "Customer ID",
            CustomerCategory::FirstName => "First Name",
            CustomerCategory::LastName => "Last Name",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn film_category_defaults_to_title() {
        assert_eq!(FilmCategory::default(), FilmCategory::Title);
        assert_eq!(FilmCategory::default().as_query(), "title");
    }

    #[test]
    fn next_cycles_through_all() {
        let mut category = CustomerCategory::default();
        for _ in 0..CustomerCategory::all().len() {
            category = category.next();
        }
        assert_eq!(category, CustomerCategory::default());
        assert_eq!(FilmCategory::Genre.next(), FilmCategory::Title);
    }

    #[test]
    fn serde_matches_query_values() {
        for category in FilmCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_query()));
        }
        for category in CustomerCategory::all() {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_query()));
        }
    }
}
