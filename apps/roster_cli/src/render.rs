use std::fmt::Write as _;

use client_core::ViewSnapshot;
use shared::domain::{DraftField, Student};

pub fn render(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Register Student ==");
    for field in DraftField::ALL {
        let _ = writeln!(out, "  {:<8} {}", format!("{field}:"), snapshot.draft.field(field));
    }
    if let Some(err) = &snapshot.draft_error {
        let _ = writeln!(out, "  ! {err}");
    }

    let _ = writeln!(out, "== Student List ==");
    match &snapshot.last_error {
        Some(err) => {
            let _ = writeln!(out, "  {err}");
        }
        None if snapshot.items.is_empty() => {
            let _ = writeln!(out, "  No students found");
        }
        None => {
            for student in &snapshot.items {
                let _ = writeln!(out, "  {}", student_line(student));
            }
        }
    }

    let previous = if snapshot.has_previous_page() { "[prev]" } else { " prev " };
    let next = if snapshot.has_next_page() { "[next]" } else { " next " };
    let _ = writeln!(out, "  {previous}  {next}");
    let _ = write!(
        out,
        "  Page {} of {}",
        snapshot.current_page, snapshot.total_pages
    );
    out
}

fn student_line(student: &Student) -> String {
    let dob = student
        .birth_date()
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| student.dob.clone());
    format!(
        "{} {} | {} | {}",
        student.name, student.surname, student.course, dob
    )
}

#[cfg(test)]
mod tests {
    use shared::{
        domain::{DraftStudent, StudentId},
        error::ViewError,
    };

    use super::*;

    fn snapshot() -> ViewSnapshot {
        ViewSnapshot {
            items: vec![Student {
                id: StudentId::Number(1),
                name: "Ana".to_string(),
                surname: "Li".to_string(),
                dob: "2001-05-03T00:00:00.000Z".to_string(),
                course: "CS".to_string(),
            }],
            current_page: 1,
            total_pages: 3,
            last_error: None,
            draft: DraftStudent::default(),
            draft_error: None,
        }
    }

    #[test]
    fn renders_students_and_page_counter() {
        let text = render(&snapshot());
        assert!(text.contains("Ana Li | CS | 5/3/2001"), "{text}");
        assert!(text.contains(" prev   [next]"), "{text}");
        assert!(text.ends_with("Page 1 of 3"), "{text}");
    }

    #[test]
    fn fetch_error_replaces_the_list() {
        let mut view = snapshot();
        view.last_error = Some(ViewError::FetchFailure);
        let text = render(&view);
        assert!(text.contains("Failed to fetch students. Please try again later."));
        assert!(!text.contains("Ana Li"));
    }

    #[test]
    fn empty_page_and_form_error() {
        let mut view = snapshot();
        view.items.clear();
        view.draft.surname = "B".to_string();
        view.draft_error = Some(ViewError::missing_fields(&[DraftField::Name]));
        let text = render(&view);
        assert!(text.contains("No students found"));
        assert!(text.contains("surname: B"));
        assert!(text.contains("! All fields are required."));
    }

    #[test]
    fn unreadable_server_date_is_shown_raw() {
        let mut view = snapshot();
        view.items[0].dob = "sometime".to_string();
        assert!(render(&view).contains("| CS | sometime"));
    }
}
