//! Read-only query construction.
//!
//! Queries are kept structured ([`SelectQuery`], [`Condition`], [`Literal`])
//! until they are rendered, so gateways can either send the rendered text or
//! evaluate the conditions themselves.

use crate::config::EscapeMode;
use chrono::NaiveDate;
use std::fmt;

/// A literal value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Escaped text, rendered between single quotes.
    Quoted(String),
    /// Unquoted token built from a typed value, such as a date.
    Raw(String),
}

impl Literal {
    /// Escape `value` and wrap it as a quoted literal.
    pub fn quoted(value: &str, escaping: EscapeMode) -> Self {
        Literal::Quoted(escaping.sanitize(value))
    }

    /// Date literal in `YYYY-MM-DD` form.
    pub fn date(date: NaiveDate) -> Self {
        Literal::Raw(date.format("%Y-%m-%d").to_string())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Quoted(escaped) => write!(f, "'{}'", escaped),
            Literal::Raw(token) => write!(f, "{}", token),
        }
    }
}

/// Comparison operators supported in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    GreaterThan,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Equals => write!(f, "="),
            Comparison::GreaterThan => write!(f, ">"),
        }
    }
}

/// A single WHERE clause term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field op literal`
    Compare {
        field: String,
        op: Comparison,
        value: Literal,
    },
    /// Parenthesized disjunction of the inner conditions.
    AnyOf(Vec<Condition>),
}

impl Condition {
    /// `field = value`
    pub fn equals(field: impl Into<String>, value: Literal) -> Self {
        Condition::Compare {
            field: field.into(),
            op: Comparison::Equals,
            value,
        }
    }

    /// `field > value`
    pub fn greater_than(field: impl Into<String>, value: Literal) -> Self {
        Condition::Compare {
            field: field.into(),
            op: Comparison::GreaterThan,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare { field, op, value } => write!(f, "{} {} {}", field, op, value),
            Condition::AnyOf(conditions) => {
                let parts: Vec<String> = conditions.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" OR "))
            }
        }
    }
}

/// Build `(field1 = 'v' OR field2 = 'v' ...)` for one escaped value.
///
/// Used for every email based lookup, so that a single address is matched
/// against all of a contact's email fields at once.
pub fn build_or_equals(fields: &[&str], value: &str, escaping: EscapeMode) -> Condition {
    let literal = Literal::quoted(value, escaping);
    Condition::AnyOf(
        fields
            .iter()
            .map(|field| Condition::equals(*field, literal.clone()))
            .collect(),
    )
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASC"),
            SortDirection::Descending => write!(f, "DESC"),
        }
    }
}

/// ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// A read-only query against one object type.
///
/// All conditions are joined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub object_type: String,
    pub fields: Vec<String>,
    pub conditions: Vec<Condition>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Create a query selecting nothing from `object_type`.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            fields: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Set the selected fields.
    pub fn with_fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an ORDER BY term.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Limit the number of returned records.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query text.
    pub fn to_soql(&self) -> String {
        let fields = if self.fields.is_empty() {
            "Id".to_string()
        } else {
            self.fields.join(",")
        };

        let mut soql = format!("SELECT {} FROM {}", fields, self.object_type);

        if !self.conditions.is_empty() {
            let conditions: Vec<String> = self.conditions.iter().map(ToString::to_string).collect();
            soql.push_str(" WHERE ");
            soql.push_str(&conditions.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.field, o.direction))
                .collect();
            soql.push_str(" ORDER BY ");
            soql.push_str(&terms.join(","));
        }

        if let Some(limit) = self.limit {
            soql.push_str(&format!(" LIMIT {}", limit));
        }

        soql
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_soql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMAIL_FIELDS: [&str; 3] = ["Work_Email__c", "Personal_Email__c", "Alternate_Email__c"];

    #[test]
    fn test_build_or_equals() {
        let condition = build_or_equals(&EMAIL_FIELDS, "dup+1@x.com", EscapeMode::Strict);
        assert_eq!(
            condition.to_string(),
            "(Work_Email__c = 'dup%2B1@x.com' OR Personal_Email__c = 'dup%2B1@x.com' OR Alternate_Email__c = 'dup%2B1@x.com')"
        );
    }

    #[test]
    fn test_build_or_equals_escapes_quotes() {
        let condition = build_or_equals(&["Work_Email__c"], "x' OR Id != '", EscapeMode::Strict);
        assert_eq!(condition.to_string(), r"(Work_Email__c = 'x\' OR Id != \'')");
    }

    #[test]
    fn test_select_query_rendering() {
        let query = SelectQuery::new("CampaignMember")
            .with_fields(&["Id", "CampaignId", "Campaign.Name"])
            .with_condition(Condition::equals(
                "ContactId",
                Literal::quoted("003A", EscapeMode::Strict),
            ))
            .with_condition(Condition::greater_than(
                "Campaign.StartDate",
                Literal::date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()),
            ))
            .order_by("Campaign.StartDate", SortDirection::Ascending)
            .with_limit(10);

        assert_eq!(
            query.to_soql(),
            "SELECT Id,CampaignId,Campaign.Name FROM CampaignMember \
             WHERE ContactId = '003A' AND Campaign.StartDate > 2024-03-09 \
             ORDER BY Campaign.StartDate ASC LIMIT 10"
        );
    }

    #[test]
    fn test_select_without_fields_selects_id() {
        assert_eq!(SelectQuery::new("Contact").to_soql(), "SELECT Id FROM Contact");
    }
}
