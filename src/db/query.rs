//! Typed filter conditions compiled into parameterized SQL.
//!
//! Callers describe filters as (column, operator, value) triples joined by AND/OR.
//! Column names come from closed enums and every value goes through
//! `QueryBuilder::push_bind`, so no caller-provided text reaches the SQL string.

use sqlx::{QueryBuilder, Sqlite};
use std::fmt;

pub trait Column: Copy + fmt::Debug {
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueColumn {
    Id,
    File,
    Number,
    Title,
    Date,
    Kind,
    Analyzed,
}

impl Column for IssueColumn {
    fn name(&self) -> &'static str {
        match self {
            IssueColumn::Id => "id",
            IssueColumn::File => "file",
            IssueColumn::Number => "number",
            IssueColumn::Title => "title",
            IssueColumn::Date => "date",
            IssueColumn::Kind => "type",
            IssueColumn::Analyzed => "analyzed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationColumn {
    Id,
    PersonName,
    Role,
    IssueTitle,
    IssueDate,
}

impl Column for ObservationColumn {
    fn name(&self) -> &'static str {
        match self {
            ObservationColumn::Id => "id",
            ObservationColumn::PersonName => "person_name",
            ObservationColumn::Role => "role",
            ObservationColumn::IssueTitle => "issue_title",
            ObservationColumn::IssueDate => "issue_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    // raw LIKE pattern, wildcards supplied by the caller
    Like,
    // value is matched literally at the end of the column
    EndsWith,
}

impl Operator {
    fn sql(&self) -> &'static str {
        match self {
            Operator::Eq => " = ",
            Operator::NotEq => " != ",
            Operator::Lt => " < ",
            Operator::Le => " <= ",
            Operator::Gt => " > ",
            Operator::Ge => " >= ",
            Operator::Like | Operator::EndsWith => " LIKE ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    And,
    Or,
}

impl Separator {
    fn sql(&self) -> &'static str {
        match self {
            Separator::And => " AND ",
            Separator::Or => " OR ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Integer(value as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition<C> {
    pub column: C,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause<C> {
    Single(Condition<C>),
    Group(Conditions<C>),
}

/// Ordered list of clauses. Each clause is joined to the previous one by its own
/// separator, with the usual SQL precedence (AND before OR) inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions<C> {
    clauses: Vec<(Separator, Clause<C>)>,
}

impl<C> Default for Conditions<C> {
    fn default() -> Self {
        Conditions {
            clauses: Vec::new(),
        }
    }
}

impl<C: Column> Conditions<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition joined with AND
    pub fn with(self, column: C, operator: Operator, value: impl Into<Value>) -> Self {
        self.push(Separator::And, column, operator, value)
    }

    /// Add a condition joined with OR
    pub fn or_with(self, column: C, operator: Operator, value: impl Into<Value>) -> Self {
        self.push(Separator::Or, column, operator, value)
    }

    pub fn eq(self, column: C, value: impl Into<Value>) -> Self {
        self.with(column, Operator::Eq, value)
    }

    pub fn push(
        mut self,
        separator: Separator,
        column: C,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses.push((
            separator,
            Clause::Single(Condition {
                column,
                operator,
                value: value.into(),
            }),
        ));
        self
    }

    /// AND `self` and `other` as two parenthesized groups, so an OR on either side
    /// stays inside its own group
    pub fn and_group(self, other: Conditions<C>) -> Self {
        if other.is_empty() {
            return self;
        }
        let mut clauses = Vec::with_capacity(2);
        if !self.is_empty() {
            clauses.push((Separator::And, Clause::Group(self)));
        }
        clauses.push((Separator::And, Clause::Group(other)));
        Conditions { clauses }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append ` WHERE (...)`, or nothing when there are no conditions
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        if self.is_empty() {
            return;
        }
        builder.push(" WHERE ");
        self.push_group(builder);
    }

    fn push_group(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push("(");
        for (position, (separator, clause)) in self.clauses.iter().enumerate() {
            if position > 0 {
                builder.push(separator.sql());
            }
            match clause {
                Clause::Single(condition) => push_condition(builder, condition),
                Clause::Group(group) => group.push_group(builder),
            }
        }
        builder.push(")");
    }
}

fn push_condition<C: Column>(builder: &mut QueryBuilder<'_, Sqlite>, condition: &Condition<C>) {
    builder.push(condition.column.name());
    builder.push(condition.operator.sql());

    match (&condition.operator, &condition.value) {
        (Operator::EndsWith, value) => {
            let literal = match value {
                Value::Text(text) => text.clone(),
                Value::Integer(number) => number.to_string(),
            };
            builder.push_bind(format!("%{}", escape_like(&literal)));
            builder.push(" ESCAPE '\\'");
        }
        (_, Value::Text(text)) => {
            builder.push_bind(text.clone());
        }
        (_, Value::Integer(number)) => {
            builder.push_bind(*number);
        }
    }
}

/// Escape LIKE wildcards so the text matches literally (escape character `\`)
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
