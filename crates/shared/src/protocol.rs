use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Student;

/// Collection path under the API base URL.
pub const STUDENTS_PATH: &str = "lasalle-student/";

/// Records requested per page.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListStudentsQuery {
    pub page: u32,
    pub limit: u32,
}

impl ListStudentsQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            limit: PAGE_SIZE,
        }
    }
}

/// The part of the `pagination` object the client reads; other keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_pages: u32,
}

/// One page as the client understands it after lenient parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPage {
    pub students: Vec<Student>,
    /// `None` when the body carried no usable page count.
    pub total_pages: Option<u32>,
}

impl StudentPage {
    /// Reads a list response body.
    ///
    /// A missing or non-array `students` field is an empty page, not an error,
    /// and carries no page count. Array entries that are not students are an
    /// error.
    pub fn from_json(body: &Value) -> Result<Self, serde_json::Error> {
        let Some(Value::Array(items)) = body.get("students") else {
            return Ok(Self::default());
        };
        let students = items
            .iter()
            .map(Student::deserialize)
            .collect::<Result<Vec<_>, _>>()?;
        let total_pages = body
            .get("pagination")
            .and_then(|pagination| PaginationInfo::deserialize(pagination).ok())
            .map(|pagination| pagination.total_pages);
        Ok(Self {
            students,
            total_pages,
        })
    }
}
