use serde_json::{json, Value};

/// Comparison used by range conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOperator::Gt => "gt",
            RangeOperator::Gte => "gte",
            RangeOperator::Lt => "lt",
            RangeOperator::Lte => "lte",
        }
    }
}

/// Represents the filter predicates a builder can accumulate
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Term {
        field: String,
        value: Value,
    },
    Terms {
        field: String,
        values: Vec<Value>,
    },
    Range {
        field: String,
        operator: RangeOperator,
        value: Value,
    },
    Exists {
        field: String,
    },
    Missing {
        field: String,
    },
    Raw {
        clause: Value,
    },
}

impl Condition {
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        Condition::Term {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn terms(field: &str, values: Vec<Value>) -> Self {
        Condition::Terms {
            field: field.to_string(),
            values,
        }
    }

    pub fn range(field: &str, operator: RangeOperator, value: impl Into<Value>) -> Self {
        Condition::Range {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn exists(field: &str) -> Self {
        Condition::Exists {
            field: field.to_string(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Condition::Missing {
            field: field.to_string(),
        }
    }

    /// Convert condition to a query DSL clause
    pub fn to_dsl(&self) -> Value {
        match self {
            Condition::Term { field, value } => json!({ "term": { field: value } }),
            Condition::Terms { field, values } => json!({ "terms": { field: values } }),
            Condition::Range {
                field,
                operator,
                value,
            } => json!({ "range": { field: { operator.as_str(): value } } }),
            Condition::Exists { field } => json!({ "exists": { "field": field } }),
            Condition::Missing { field } => {
                json!({ "bool": { "must_not": [{ "exists": { "field": field } }] } })
            }
            Condition::Raw { clause } => clause.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn to_dsl(&self) -> Value {
        json!({ self.field.as_str(): { "order": self.direction.as_str() } })
    }
}
