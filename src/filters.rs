//! Exact-match field filtering for list endpoints.
//!
//! Each resource declares which fields may be filtered. A query parameter
//! named after one of them keeps only the items whose field equals the value
//! exactly (case-sensitive). Absent or empty parameters do not filter.

use crate::resource::Resource;
use crate::validation::FieldErrors;

pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Compared as the raw string.
    Text,
    /// A primary-key reference; the parameter must parse as an integer.
    Reference,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Text,
        }
    }

    pub const fn reference(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Reference,
        }
    }
}

/// Apply every filter field of `R` found in `params`.
pub fn filter_items<R: Resource>(
    items: Vec<R>,
    params: &[(String, String)],
) -> Result<Vec<R>, FieldErrors> {
    let mut predicates: Vec<(&'static str, String)> = Vec::new();
    let mut errors = FieldErrors::new();

    for field in R::FILTER_FIELDS {
        let Some(raw) = params
            .iter()
            .find(|(key, _)| key == field.name)
            .map(|(_, value)| value.as_str())
        else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        match field.kind {
            FilterKind::Text => predicates.push((field.name, raw.to_string())),
            FilterKind::Reference => match raw.trim().parse::<i32>() {
                Ok(pk) => predicates.push((field.name, pk.to_string())),
                Err(_) => errors.add(field.name, INVALID_CHOICE),
            },
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    if predicates.is_empty() {
        return Ok(items);
    }

    Ok(items
        .into_iter()
        .filter(|item| {
            predicates
                .iter()
                .all(|(name, wanted)| item.field_value(name).as_deref() == Some(wanted.as_str()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, Employee};

    fn employee(id: i32, designation: &str) -> Employee {
        Employee {
            id,
            emp_id: format!("E{id}"),
            emp_name: format!("Employee {id}"),
            designation: designation.to_string(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn designation_filter_is_exact_and_case_sensitive() {
        let staff = vec![
            employee(1, "Manager"),
            employee(2, "Engineer"),
            employee(3, "Manager"),
            employee(4, "manager"),
            employee(5, "Senior Manager"),
        ];

        let managers = filter_items(staff, &params(&[("designation", "Manager")])).unwrap();
        let ids: Vec<i32> = managers.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn absent_or_empty_parameter_returns_everything() {
        let staff = vec![employee(1, "Manager"), employee(2, "Engineer")];
        assert_eq!(filter_items(staff.clone(), &[]).unwrap().len(), 2);
        assert_eq!(
            filter_items(staff.clone(), &params(&[("designation", "")]))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            filter_items(staff, &params(&[("emp_name", "Employee 1")]))
                .unwrap()
                .len(),
            2,
            "undeclared fields are not filterable"
        );
    }

    #[test]
    fn reference_filter_parses_primary_key() {
        let comments = vec![
            Comment { id: 1, blog: 1, comment: "a".into() },
            Comment { id: 2, blog: 2, comment: "b".into() },
            Comment { id: 3, blog: 1, comment: "c".into() },
        ];

        let on_first = filter_items(comments.clone(), &params(&[("blog", "1")])).unwrap();
        assert_eq!(on_first.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);

        let errors = filter_items(comments, &params(&[("blog", "first")])).unwrap_err();
        assert_eq!(errors.get("blog").unwrap(), [INVALID_CHOICE]);
    }
}
