// Internal cutoff: everything after the marker in a job posting is for the
// agency only. The model is told so, but the split is enforced here on the
// raw posting regardless of what the model returned.

use crate::models::job::{JobListing, JOB_SENTINEL};

/// Tail lines shorter than this are only scrubbed on an exact line match.
const MIN_SCRUB_CHARS: usize = 8;

/// Splits `raw` at the first occurrence of `marker`.
///
/// Returns the text before the marker and the trimmed text after it, or
/// `None` when the marker is empty or absent.
pub fn split_at_marker<'a>(raw: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    if marker.is_empty() {
        return None;
    }
    raw.split_once(marker)
        .map(|(public, internal)| (public, internal.trim()))
}

/// Rewrites `job` so that `internal_note` is exactly the posting's tail after
/// `marker` and no candidate-facing field carries any of it.
///
/// Without a marker in the posting, `internal_note` is cleared. Returns whether
/// the marker was found.
pub fn enforce_internal_cutoff(job: &mut JobListing, raw: &str, marker: &str) -> bool {
    let Some((_, internal)) = split_at_marker(raw, marker) else {
        job.internal_note = JOB_SENTINEL.to_string();
        return false;
    };

    let internal_lines: Vec<&str> = internal
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    for field in job.candidate_facing_fields_mut() {
        *field = scrub(field, marker, &internal_lines);
    }
    job.internal_note = internal.to_string();
    true
}

fn scrub(field: &str, marker: &str, internal_lines: &[&str]) -> String {
    let field = field.split(marker).next().unwrap_or_default();

    let leaks = |line: &str| {
        let line = line.trim();
        internal_lines.iter().any(|internal| {
            line == *internal
                || (internal.chars().count() >= MIN_SCRUB_CHARS && line.contains(internal))
        })
    };

    field
        .lines()
        .filter(|line| !leaks(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "【社内限定】";

    fn posting() -> String {
        format!(
            "ACME株式会社\nBackend Dev\n時給4000円\n{MARKER}\n30代まで希望\n手数料は35%で合意済み\n"
        )
    }

    #[test]
    fn test_split_at_marker() {
        let raw = posting();
        let (public, internal) = split_at_marker(&raw, MARKER).unwrap();
        assert!(public.contains("時給4000円"));
        assert_eq!(internal, "30代まで希望\n手数料は35%で合意済み");
    }

    #[test]
    fn test_split_without_marker_or_with_empty_marker() {
        assert!(split_at_marker("ACME株式会社", MARKER).is_none());
        assert!(split_at_marker("ACME株式会社", "").is_none());
    }

    #[test]
    fn test_split_at_first_marker_only() {
        let raw = format!("公開{MARKER}社内A{MARKER}社内B");
        let (_, internal) = split_at_marker(&raw, MARKER).unwrap();
        assert_eq!(internal, format!("社内A{MARKER}社内B"));
    }

    #[test]
    fn test_internal_note_is_the_verbatim_tail() {
        let mut job = JobListing {
            company: "ACME".to_string(),
            internal_note: "30代希望".to_string(),
            ..Default::default()
        };
        assert!(enforce_internal_cutoff(&mut job, &posting(), MARKER));
        assert_eq!(job.internal_note, "30代まで希望\n手数料は35%で合意済み");
        assert_eq!(job.company, "ACME");
    }

    #[test]
    fn test_internal_text_is_scrubbed_from_candidate_facing_fields() {
        let mut job = JobListing {
            overview: "決済基盤の開発\n手数料は35%で合意済み".to_string(),
            desired_profile: format!("Python経験3年以上\n{MARKER}\n30代まで希望"),
            working_conditions: "時給4000円（30代まで希望）".to_string(),
            ..Default::default()
        };

        enforce_internal_cutoff(&mut job, &posting(), MARKER);

        assert_eq!(job.overview, "決済基盤の開発");
        assert_eq!(job.desired_profile, "Python経験3年以上");
        for field in job.candidate_facing_fields_mut() {
            assert!(!field.contains("手数料は35%"));
            assert!(!field.contains(MARKER));
        }
        // "30代まで希望" is shorter than the scrub threshold, so only exact
        // line matches are removed.
        assert_eq!(job.working_conditions, "時給4000円（30代まで希望）");
    }

    #[test]
    fn test_no_marker_clears_internal_note() {
        let mut job = JobListing {
            company: "ACME".to_string(),
            internal_note: "model invented this".to_string(),
            ..Default::default()
        };
        assert!(!enforce_internal_cutoff(&mut job, "ACME株式会社\nBackend Dev", MARKER));
        assert_eq!(job.internal_note, "");
        assert_eq!(job.company, "ACME");
    }
}
