use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::model::{Directory, Employee};

#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub employee: &'a Employee,
    pub score: i64,
}

/// Employees matching `query` on name, department, location or email,
/// best first. Ties keep directory order.
pub fn find_employees<'a>(directory: &'a Directory, query: &str, limit: usize) -> Vec<SearchHit<'a>> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut hits: Vec<SearchHit<'a>> = directory
        .employees()
        .iter()
        .filter(|e| directory.get(e.id).is_some_and(|indexed| std::ptr::eq(indexed, *e)))
        .filter_map(|e| {
            [&e.name, &e.department, &e.location, &e.email]
                .into_iter()
                .filter_map(|field| matcher.fuzzy_match(field, query))
                .max()
                .map(|score| SearchHit { employee: e, score })
        })
        .collect();
    // stable sort keeps list order among equal scores
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EmployeeId;

    #[test]
    fn finds_by_name() {
        let dir = Directory::sample();
        let hits = find_employees(&dir, "grace", 5);
        assert_eq!(hits.first().map(|h| h.employee.id), Some(EmployeeId(9)));
    }

    #[test]
    fn matches_other_fields() {
        let dir = Directory::sample();
        let hits = find_employees(&dir, "sydney", 10);
        let ids: Vec<u32> = hits.iter().map(|h| h.employee.id.0).collect();
        assert!(ids.contains(&8));
        assert!(ids.contains(&14));
    }

    #[test]
    fn empty_query_and_zero_limit() {
        let dir = Directory::sample();
        assert!(find_employees(&dir, "   ", 5).is_empty());
        assert!(find_employees(&dir, "ava", 0).is_empty());
    }

    #[test]
    fn limit_truncates() {
        let dir = Directory::sample();
        assert!(find_employees(&dir, "e", 3).len() <= 3);
    }
}
