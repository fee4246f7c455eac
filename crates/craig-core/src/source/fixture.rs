use super::ComplianceSource;
use crate::error::{CraigError, Result};
use crate::task::{OutstandingTask, WeeklyDigestInput};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed records, either built in code or read from a YAML file:
///
/// ```yaml
/// outstanding_tasks:
///   - email: sarah@company.com
///     name: Sarah Chen
///     first_name: Sarah
///     task_name: Security Awareness Training
///     task_url: https://training.example.com/abc123
///     days_overdue: 3
/// weekly_digest:
///   compliance_percentage: 87.0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureSource {
    #[serde(default)]
    pub outstanding_tasks: Vec<OutstandingTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_digest: Option<WeeklyDigestInput>,
    #[serde(skip)]
    origin: String,
}

impl FixtureSource {
    pub fn new(tasks: Vec<OutstandingTask>, digest: Option<WeeklyDigestInput>) -> Self {
        Self {
            outstanding_tasks: tasks,
            weekly_digest: digest,
            origin: "in-memory fixture".to_string(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            CraigError::Source(format!("cannot read fixture {}: {e}", path.display()))
        })?;
        let mut fixture: FixtureSource = serde_yaml::from_str(&data)?;
        fixture.origin = format!("fixture {}", path.display());
        Ok(fixture)
    }
}

impl ComplianceSource for FixtureSource {
    fn outstanding_tasks(&self) -> Result<Vec<OutstandingTask>> {
        Ok(self.outstanding_tasks.clone())
    }

    fn weekly_digest(&self) -> Result<Option<WeeklyDigestInput>> {
        Ok(self.weekly_digest.clone())
    }

    fn describe(&self) -> String {
        self.origin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_reads_tasks_and_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixture.yaml");
        std::fs::write(
            &path,
            r#"
outstanding_tasks:
  - email: mike@company.com
    name: Mike Wilson
    first_name: Mike
    task_name: Security Awareness Training
    task_url: https://training.example.com/def456
    days_overdue: 10
    manager_email: lead@company.com
weekly_digest:
  compliance_percentage: 87.0
  completed_this_week:
    - name: Sarah Chen
      task: Security Awareness Training
"#,
        )
        .unwrap();

        let source = FixtureSource::load(&path).unwrap();
        let tasks = source.outstanding_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].manager_email.as_deref(), Some("lead@company.com"));
        let digest = source.weekly_digest().unwrap().unwrap();
        assert_eq!(digest.completed_this_week.len(), 1);
        assert!(digest.outstanding_items.is_empty());
        assert!(source.describe().contains("fixture.yaml"));
    }

    #[test]
    fn missing_file_is_source_error() {
        let dir = TempDir::new().unwrap();
        let err = FixtureSource::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, CraigError::Source(_)));
    }

    #[test]
    fn empty_fixture_is_fully_compliant() {
        let source = FixtureSource::default();
        assert!(source.outstanding_tasks().unwrap().is_empty());
        assert!(source.weekly_digest().unwrap().is_none());
    }
}
