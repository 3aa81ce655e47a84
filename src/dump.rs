use std::io::Write;

use crate::error::{LecternError, Result};
use crate::paginator::{PageOutcome, Paginator};
use crate::source::LectureSource;
use crate::types::Lecture;

/// Walk pages until the list is exhausted or `max_pages` pages were
/// requested. Unlike the interactive grid, a failed page aborts the walk.
pub async fn collect(
    source: &dyn LectureSource,
    page_size: u32,
    max_pages: Option<u32>,
) -> Result<Vec<Lecture>> {
    let mut paginator = Paginator::new(page_size);
    let mut requested = 0;

    loop {
        match paginator.request_next_page(source).await {
            PageOutcome::Appended { added } => {
                tracing::info!(page = paginator.cursor(), added, "page loaded");
            }
            PageOutcome::Exhausted | PageOutcome::Skipped => break,
            PageOutcome::Failed => {
                return Err(LecternError::Fetch(format!(
                    "page {} of {} could not be loaded",
                    paginator.cursor(),
                    source.name()
                )));
            }
        }

        requested += 1;
        if max_pages.is_some_and(|max| requested >= max) {
            break;
        }
        paginator.advance();
    }

    Ok(paginator.items().to_vec())
}

pub fn write_tsv(out: &mut impl Write, lectures: &[Lecture]) -> std::io::Result<()> {
    for lecture in lectures {
        writeln!(
            out,
            "{}\t{}\t{}",
            lecture.id,
            lecture.title,
            lecture.instructor.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, lectures: &[Lecture]) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, lectures)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{lecture, lectures, ScriptedSource};

    #[tokio::test]
    async fn collects_until_exhausted() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=30, |_| true))
            .page(2, lectures(25..=40, |id| id != 40));
        let all = collect(&source, 30, None).await.unwrap();

        assert_eq!(all.len(), 39);
        assert_eq!(all.last().map(|l| l.id), Some(39));
        // page 3 is unscripted, i.e. empty
        assert_eq!(source.calls(), vec![(1, 30), (2, 30), (3, 30)]);
    }

    #[tokio::test]
    async fn stops_at_max_pages() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=2, |_| true))
            .page(2, lectures(3..=4, |_| true));
        let all = collect(&source, 2, Some(1)).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(source.calls(), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn failure_aborts() {
        let source = ScriptedSource::new()
            .page(1, lectures(1..=2, |_| true))
            .fail(2, "timeout");
        let err = collect(&source, 30, None).await.unwrap_err();
        assert!(matches!(err, LecternError::Fetch(msg) if msg.contains("page 2")));
    }

    #[test]
    fn tsv_lines() {
        let mut anonymous = lecture(2, true);
        anonymous.instructor = None;
        let mut out = Vec::new();
        write_tsv(&mut out, &[lecture(1, true), anonymous]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "1\tLecture 1\tInstructor 1\n2\tLecture 2\t-\n"
        );
    }

    #[test]
    fn json_keeps_wire_field_names() {
        let mut out = Vec::new();
        write_json(&mut out, &[lecture(1, true)]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["public_yn"], "Y");
    }
}
