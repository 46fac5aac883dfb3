//! Theme reference record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ThemeId;

/// A themed session that schedules are offered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: ThemeId,
    pub name: String,
    pub description: String,
    /// Stored price, read as-is.
    pub price: u32,
}

impl Theme {
    pub fn new(
        id: ThemeId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
        }
    }
}
