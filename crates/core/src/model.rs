use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::DirectoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// `None` marks the employee without a manager.
    #[serde(default)]
    pub reports_to: Option<EmployeeId>,
    /// Denormalized count of immediate subordinates.
    #[serde(default)]
    pub direct_reports: u32,
}

impl Employee {
    pub fn new(id: u32, name: impl Into<String>, reports_to: Option<u32>, direct_reports: u32) -> Self {
        Self {
            id: EmployeeId(id),
            name: name.into(),
            department: String::new(),
            location: String::new(),
            division: String::new(),
            email: String::new(),
            phone: String::new(),
            reports_to: reports_to.map(EmployeeId),
            direct_reports,
        }
    }

    pub fn has_reports(&self) -> bool {
        self.direct_reports > 0
    }
}

/// Data-integrity findings. None of these stop the chart from rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryIssue {
    NoRoot,
    MultipleRoots(Vec<EmployeeId>),
    DuplicateId(EmployeeId),
    DanglingManager { employee: EmployeeId, manager: EmployeeId },
    ReportCountMismatch { employee: EmployeeId, declared: u32, actual: u32 },
    Cycle(EmployeeId),
}

impl fmt::Display for DirectoryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryIssue::NoRoot => write!(f, "no employee without a manager"),
            DirectoryIssue::MultipleRoots(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "multiple employees without a manager: {}", ids.join(", "))
            }
            DirectoryIssue::DuplicateId(id) => write!(f, "duplicate employee id {id}"),
            DirectoryIssue::DanglingManager { employee, manager } => {
                write!(f, "employee {employee} reports to unknown id {manager}")
            }
            DirectoryIssue::ReportCountMismatch { employee, declared, actual } => write!(
                f,
                "employee {employee} declares {declared} direct reports but has {actual}"
            ),
            DirectoryIssue::Cycle(id) => write!(f, "management chain of {id} loops"),
        }
    }
}

/// Read-only employee list indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    employees: Vec<Employee>,
    index: HashMap<EmployeeId, usize>,
    reports: HashMap<EmployeeId, Vec<usize>>,
}

impl Directory {
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut index = HashMap::with_capacity(employees.len());
        for (i, e) in employees.iter().enumerate() {
            // First occurrence of an id wins.
            index.entry(e.id).or_insert(i);
        }
        let mut reports: HashMap<EmployeeId, Vec<usize>> = HashMap::new();
        for (i, e) in employees.iter().enumerate() {
            if let (Some(manager), Some(&first)) = (e.reports_to, index.get(&e.id)) {
                if first == i {
                    reports.entry(manager).or_default().push(i);
                }
            }
        }
        Self { employees, index, reports }
    }

    pub fn from_json_str(s: &str) -> Result<Self, DirectoryError> {
        let employees: Vec<Employee> = serde_json::from_str(s)?;
        Ok(Self::new(employees))
    }

    pub fn from_json_reader(r: impl std::io::Read) -> Result<Self, DirectoryError> {
        let employees: Vec<Employee> = serde_json::from_reader(r)?;
        Ok(Self::new(employees))
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, DirectoryError> {
        let file = std::fs::File::open(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.index.get(&id).and_then(|&i| self.employees.get(i))
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.index.contains_key(&id)
    }

    /// First employee in list order without a manager.
    pub fn root(&self) -> Option<&Employee> {
        self.employees.iter().find(|e| e.reports_to.is_none())
    }

    /// Immediate subordinates in list order. Shadowed duplicates are skipped.
    pub fn children(&self, id: EmployeeId) -> impl Iterator<Item = &Employee> + '_ {
        self.reports
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.employees.get(i))
    }

    /// Manager chain of `id`, nearest first. Stops at the top of the chart, at
    /// the first id that does not resolve, or when the chain loops.
    pub fn ancestors(&self, id: EmployeeId) -> Vec<EmployeeId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(id);
        let mut current = self.get(id).and_then(|e| e.reports_to);
        while let Some(manager) = current {
            if !seen.insert(manager) {
                break;
            }
            chain.push(manager);
            current = self.get(manager).and_then(|e| e.reports_to);
        }
        chain
    }

    pub fn validate(&self) -> Vec<DirectoryIssue> {
        let mut issues = Vec::new();

        let roots: Vec<EmployeeId> = self
            .employees
            .iter()
            .filter(|e| e.reports_to.is_none())
            .map(|e| e.id)
            .collect();
        match roots.len() {
            0 => issues.push(DirectoryIssue::NoRoot),
            1 => {}
            _ => issues.push(DirectoryIssue::MultipleRoots(roots)),
        }

        let mut seen = HashSet::new();
        let mut actual: HashMap<EmployeeId, u32> = HashMap::new();
        for e in &self.employees {
            if !seen.insert(e.id) {
                issues.push(DirectoryIssue::DuplicateId(e.id));
                continue;
            }
            if let Some(manager) = e.reports_to {
                if self.contains(manager) {
                    *actual.entry(manager).or_default() += 1;
                } else {
                    issues.push(DirectoryIssue::DanglingManager { employee: e.id, manager });
                }
            }
        }

        for (i, e) in self.employees.iter().enumerate() {
            if self.index.get(&e.id) != Some(&i) {
                continue;
            }
            let count = actual.get(&e.id).copied().unwrap_or(0);
            if count != e.direct_reports {
                issues.push(DirectoryIssue::ReportCountMismatch {
                    employee: e.id,
                    declared: e.direct_reports,
                    actual: count,
                });
            }
            if self.in_cycle(e.id) {
                issues.push(DirectoryIssue::Cycle(e.id));
            }
        }

        issues
    }

    fn in_cycle(&self, id: EmployeeId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            if !seen.insert(cur) {
                return cur == id;
            }
            current = self.get(cur).and_then(|e| e.reports_to);
        }
        false
    }

    /// Small mock company used by the demos.
    pub fn sample() -> Self {
        fn person(
            id: u32,
            name: &str,
            title: (&str, &str, &str),
            reports_to: Option<u32>,
            direct_reports: u32,
        ) -> Employee {
            let (department, location, division) = title;
            let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
            Employee {
                department: department.to_string(),
                location: location.to_string(),
                division: division.to_string(),
                email,
                phone: format!("(801) 555-{:04}", 100 + id),
                ..Employee::new(id, name, reports_to, direct_reports)
            }
        }

        let exec = ("Executive", "Lindon, Utah", "North America");
        let cs = ("Customer Success", "Lindon, Utah", "CA-UT");
        let eng = ("Engineering", "Remote", "North America");
        let ux = ("UX", "Vancouver, Canada", "North America");
        let apac = ("Customer Success", "Sydney, Australia", "Asia-Pacific");

        Self::new(vec![
            person(1, "Ava Martinez", exec, None, 3),
            person(2, "Ben Thompson", eng, Some(1), 3),
            person(3, "Charlotte Webb", cs, Some(1), 2),
            person(4, "Victor Ramirez", ux, Some(1), 2),
            person(5, "Daniel Okafor", eng, Some(2), 2),
            person(6, "Elena Petrova", eng, Some(2), 0),
            person(7, "Farah Haddad", eng, Some(2), 0),
            person(8, "David Kim", apac, Some(3), 1),
            person(9, "Grace Liu", cs, Some(3), 0),
            person(10, "Willow Hayes", ux, Some(4), 0),
            person(11, "Hugo Lambert", ux, Some(4), 0),
            person(12, "Isla Novak", eng, Some(5), 0),
            person(13, "Jonah Reyes", eng, Some(5), 0),
            person(14, "Kenji Sato", apac, Some(8), 0),
        ])
    }
}
