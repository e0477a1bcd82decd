use serde_json::{Map, Value};

/// Represents `size`/`from` parameters for search requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub size: Option<u32>,
    pub from: Option<u32>,
}

impl Pagination {
    /// Create pagination with page number (1-indexed) and per-page count.
    /// Offsets past `u32::MAX` saturate.
    pub fn new(page: u32, per_page: u32) -> Self {
        let from = if page > 1 {
            Some((page - 1).saturating_mul(per_page))
        } else {
            None
        };
        Self {
            size: Some(per_page),
            from,
        }
    }

    pub fn size_only(size: u32) -> Self {
        Self {
            size: Some(size),
            from: None,
        }
    }

    pub fn from_only(from: u32) -> Self {
        Self {
            size: None,
            from: Some(from),
        }
    }

    /// Write `size`/`from` into a request body
    pub fn apply_to(&self, body: &mut Map<String, Value>) {
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }

        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
    }
}
